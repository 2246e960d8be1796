//! Encoded files decode back to the original pixels through an independent
//! PNG decoder, through the verifier, and through the direct-offset reader.

use std::io::Cursor;

use unpng_core::{encode_file, encode_to_vec, verify, Encoder, Error, PixelBuffer, PixelFormat, Profile, UnPng};

fn noise(width: u32, height: u32, format: PixelFormat, seed: u32) -> PixelBuffer {
    let len = width as usize * height as usize * format.bytes_per_pixel();
    let mut state = seed.wrapping_mul(2_654_435_761).max(1);
    let data = (0..len)
        .map(|_| {
            // xorshift32
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            state as u8
        })
        .collect();
    PixelBuffer::new(width, height, format, data).unwrap()
}

fn decode_with_png_crate(bytes: &[u8]) -> (png::OutputInfo, Vec<u8>) {
    let decoder = png::Decoder::new(Cursor::new(bytes));
    let mut reader = decoder.read_info().unwrap();
    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf).unwrap();
    buf.truncate(info.buffer_size());
    (info, buf)
}

const SIZES: [(u32, u32); 7] = [(1, 1), (1, 7), (7, 1), (3, 5), (64, 64), (257, 3), (1000, 2)];

#[test]
fn test_png_crate_decodes_rgb() {
    for (i, &(w, h)) in SIZES.iter().enumerate() {
        let img = noise(w, h, PixelFormat::Rgb8, i as u32 + 1);
        let bytes = encode_to_vec(PixelFormat::Rgb8, &img).unwrap();
        let (info, pixels) = decode_with_png_crate(&bytes);
        assert_eq!((info.width, info.height), (w, h));
        assert_eq!(info.color_type, png::ColorType::Rgb);
        assert_eq!(info.bit_depth, png::BitDepth::Eight);
        assert_eq!(pixels, img.data(), "{}x{}", w, h);
    }
}

#[test]
fn test_png_crate_decodes_rgba() {
    for (i, &(w, h)) in SIZES.iter().enumerate() {
        let img = noise(w, h, PixelFormat::Rgba8, i as u32 + 100);
        let bytes = encode_to_vec(PixelFormat::Rgba8, &img).unwrap();
        let (info, pixels) = decode_with_png_crate(&bytes);
        assert_eq!(info.color_type, png::ColorType::Rgba);
        assert_eq!(pixels, img.data(), "{}x{}", w, h);
    }
}

#[test]
fn test_widest_row_decodes() {
    let img = noise(8192, 2, PixelFormat::Rgba8, 7);
    let bytes = encode_to_vec(PixelFormat::Rgba8, &img).unwrap();
    let (_, pixels) = decode_with_png_crate(&bytes);
    assert_eq!(pixels, img.data());
}

#[test]
fn test_verifier_and_reader_agree() {
    for format in [PixelFormat::Rgb8, PixelFormat::Rgba8] {
        let img = noise(45, 31, format, 42);
        let bytes = encode_to_vec(format, &img).unwrap();

        let report = verify(&bytes).unwrap();
        assert_eq!(report.format, format);
        assert_eq!(report.pixels(), img.data());

        let parsed = UnPng::parse(&bytes).unwrap();
        assert_eq!(parsed.to_pixel_buffer().unwrap(), img);
        assert_eq!(parsed.stored_adler32(), report.adler32);
    }
}

#[test]
fn test_encode_file_roundtrip() {
    let img = noise(20, 10, PixelFormat::Rgb8, 9);
    let path = std::env::temp_dir().join(format!("unpng-roundtrip-{}.png", std::process::id()));
    encode_file(&path, PixelFormat::Rgb8, &img).unwrap();
    let bytes = std::fs::read(&path).unwrap();
    let _ = std::fs::remove_file(&path);
    assert_eq!(bytes, encode_to_vec(PixelFormat::Rgb8, &img).unwrap());
    assert_eq!(UnPng::parse(&bytes).unwrap().row(9), img.row(9));
}

#[test]
fn test_encode_file_failure_leaves_file() {
    let dir = std::env::temp_dir();
    let path = dir.join(format!("unpng-too-wide-{}.png", std::process::id()));
    let img = noise(8193, 1, PixelFormat::Rgb8, 3);
    let r = encode_file(&path, PixelFormat::Rgb8, &img);
    assert!(matches!(r, Err(Error::ImageTooLarge { width: 8193, .. })));
    // the file is created and closed, nothing is written before the ceiling check
    let bytes = std::fs::read(&path).unwrap();
    let _ = std::fs::remove_file(&path);
    assert!(bytes.is_empty());
}

#[test]
fn test_encode_file_failure_with_profile() {
    let path = std::env::temp_dir().join(format!("unpng-profile-{}.png", std::process::id()));
    let encoder = Encoder::new(Profile::default().with_max_resolution(4)).unwrap();
    let img = noise(5, 5, PixelFormat::Rgba8, 4);
    assert!(matches!(
        encoder.encode_file(&path, PixelFormat::Rgba8, &img),
        Err(Error::ImageTooLarge { limit: 4, .. })
    ));
    assert!(path.exists());
    let _ = std::fs::remove_file(&path);
}

#[test]
fn test_encode_to_vec_rejects_oversized_without_allocating() {
    let img = PixelBuffer::new(0, u32::MAX, PixelFormat::Rgba8, Vec::new()).unwrap();
    assert!(matches!(encode_to_vec(PixelFormat::Rgba8, &img), Err(Error::ImageTooLarge { .. })));
}
