//! Byte-exact checks of the encoded file structure.

use unpng_core::checksum::{adler32, crc32};
use unpng_core::{encode_to_vec, Error, Layout, PixelBuffer, PixelFormat, PNG_SIGNATURE};

fn be32(b: &[u8]) -> u32 {
    u32::from_be_bytes([b[0], b[1], b[2], b[3]])
}

/// Splits a file into (type, data) pairs, asserting every CRC on the way.
fn chunks(png: &[u8]) -> Vec<([u8; 4], &[u8])> {
    assert_eq!(&png[..8], &PNG_SIGNATURE);
    let mut out = Vec::new();
    let mut pos = 8;
    while pos < png.len() {
        let len = be32(&png[pos..]) as usize;
        let ty = [png[pos + 4], png[pos + 5], png[pos + 6], png[pos + 7]];
        let data = &png[pos + 8..pos + 8 + len];
        let crc = be32(&png[pos + 8 + len..]);
        assert_eq!(crc, crc32(&png[pos + 4..pos + 8 + len]), "CRC of {:?}", ty);
        out.push((ty, data));
        pos += 12 + len;
    }
    assert_eq!(pos, png.len());
    out
}

#[test]
fn test_single_rgb_pixel_vector() {
    let img = PixelBuffer::new(1, 1, PixelFormat::Rgb8, vec![10, 20, 30]).unwrap();
    let png = encode_to_vec(PixelFormat::Rgb8, &img).unwrap();

    let c = chunks(&png);
    assert_eq!(c.len(), 4);

    assert_eq!(&c[0].0, b"IHDR");
    assert_eq!(c[0].1, &[0, 0, 0, 1, 0, 0, 0, 1, 8, 2, 0, 0, 0]);
    assert_eq!(&c[1].0, b"unPn");
    assert_eq!(c[1].1, b"G");
    assert_eq!(&c[2].0, b"IDAT");
    assert_eq!(&c[3].0, b"IEND");
    assert!(c[3].1.is_empty());

    let mut idat = vec![
        0x78, 0x01, 0x02, 0x08, 0x00, 0x04, 0x00, 0xFB, 0xFF, 0x00, 0x0A, 0x14, 0x1E, 0x03, 0x00,
    ];
    idat.extend_from_slice(&adler32(&[0x00, 0x0A, 0x14, 0x1E]).to_be_bytes());
    assert_eq!(c[2].1, &idat[..]);

    // 8 + 25 + 13 + (12 + 19) + 12
    assert_eq!(png.len(), 89);
}

#[test]
fn test_single_rgba_pixel_vector() {
    let img = PixelBuffer::new(1, 1, PixelFormat::Rgba8, vec![10, 20, 30, 255]).unwrap();
    let png = encode_to_vec(PixelFormat::Rgba8, &img).unwrap();
    let c = chunks(&png);
    assert_eq!(c[0].1[9], 6);
    assert_eq!(&c[2].1[2..10], &[0x02, 0x08, 0x00, 0x05, 0x00, 0xFA, 0xFF, 0x00]);
    assert_eq!(&c[2].1[10..14], &[10, 20, 30, 255]);
}

#[test]
fn test_row_headers_and_trailer() {
    let (w, h) = (33u32, 17u32);
    let data: Vec<u8> = (0..w * h * 4).map(|i| (i * 31 % 256) as u8).collect();
    let img = PixelBuffer::new(w, h, PixelFormat::Rgba8, data.clone()).unwrap();
    let png = encode_to_vec(PixelFormat::Rgba8, &img).unwrap();
    let layout = Layout::new(w, h, PixelFormat::Rgba8);
    assert_eq!(png.len(), layout.file_len());

    let stride = layout.row_len();
    let mut logical = Vec::new();
    for y in 0..h {
        let off = layout.row_record_offset(y);
        let len = u16::from_le_bytes([png[off + 3], png[off + 4]]);
        let nlen = u16::from_le_bytes([png[off + 5], png[off + 6]]);
        assert_eq!(&png[off..off + 3], &[0x02, 0x08, 0x00]);
        assert_eq!(len as usize, stride + 1);
        assert_eq!(nlen, 0xFFFF ^ len);
        assert_eq!(png[off + 7], 0);

        let row = &png[layout.row_pixels_offset(y)..][..stride];
        assert_eq!(row, &data[y as usize * stride..][..stride]);
        logical.push(0);
        logical.extend_from_slice(row);
    }

    let t = layout.trailer_offset();
    assert_eq!(&png[t..t + 2], &[0x03, 0x00]);
    assert_eq!(be32(&png[t + 2..]), adler32(&logical));
}

#[test]
fn test_ceiling_edges() {
    let at = PixelBuffer::new(8192, 2, PixelFormat::Rgba8, vec![1; 8192 * 2 * 4]).unwrap();
    assert!(encode_to_vec(PixelFormat::Rgba8, &at).is_ok());

    let tall = PixelBuffer::new(1, 8193, PixelFormat::Rgb8, vec![0; 8193 * 3]).unwrap();
    assert!(matches!(
        encode_to_vec(PixelFormat::Rgb8, &tall),
        Err(Error::ImageTooLarge { width: 1, height: 8193, limit: 8192 })
    ));
}

#[test]
fn test_encoding_is_deterministic() {
    let img = PixelBuffer::new(16, 16, PixelFormat::Rgb8, (0..768).map(|i| (i % 256) as u8).collect()).unwrap();
    assert_eq!(
        encode_to_vec(PixelFormat::Rgb8, &img).unwrap(),
        encode_to_vec(PixelFormat::Rgb8, &img).unwrap()
    );
}
