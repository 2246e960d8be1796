//! Zero-copy unPNG reader.
//!
//! Parsing is byte comparison against the fixed framing the encoder emits
//! plus two big-endian reads (width, height). No inflate, no checksum
//! recomputation: rows are slices straight into the input. Anything that
//! is a valid PNG but not laid out exactly like an unPNG is rejected.
//! Use [`crate::verify`] to check the checksums.

use crate::chunk::{self, png_uint31};
use crate::encoder::PNG_SIGNATURE;
use crate::error::{Error, Result};
use crate::header::{BIT_DEPTH, COMPRESSION_METHOD, FILTER_METHOD, INTERLACE_METHOD};
use crate::layout::{Layout, HEADER_LEN, IHDR_CHUNK_LEN, SIGNATURE_LEN};
use crate::pixel::{PixelBuffer, PixelFormat};
use crate::profile::Profile;
use crate::stored::{row_header, FINAL_BLOCK};

/// Offset of the IHDR width field.
const WIDTH_OFF: usize = SIGNATURE_LEN + 8;
/// Offset of the IHDR bit depth byte.
const DEPTH_OFF: usize = WIDTH_OFF + 8;
const MARKER_OFF: usize = SIGNATURE_LEN + IHDR_CHUNK_LEN;
const IDAT_OFF: usize = HEADER_LEN - 10;

const IHDR_PREFIX: [u8; 8] = [0x00, 0x00, 0x00, 0x0D, b'I', b'H', b'D', b'R'];
const MARKER_CHUNK: [u8; 13] = [0x00, 0x00, 0x00, 0x01, b'u', b'n', b'P', b'n', b'G', 0x53, 0x93, 0xA4, 0x38];
const IEND_CHUNK: [u8; 12] = [0x00, 0x00, 0x00, 0x00, b'I', b'E', b'N', b'D', 0xAE, 0x42, 0x60, 0x82];

fn be32(b: &[u8]) -> u32 {
    u32::from_be_bytes([b[0], b[1], b[2], b[3]])
}

/// A parsed unPNG borrowing its bytes.
#[derive(Debug, Clone, Copy)]
pub struct UnPng<'a> {
    layout: Layout,
    data: &'a [u8],
}

impl<'a> UnPng<'a> {
    /// Parse with the default profile.
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        Self::parse_with(&Profile::default(), data)
    }

    pub fn parse_with(profile: &Profile, data: &'a [u8]) -> Result<Self> {
        if data.len() < HEADER_LEN {
            return Err(Error::BadLength { expected: HEADER_LEN, actual: data.len() });
        }
        if data[..SIGNATURE_LEN] != PNG_SIGNATURE {
            return Err(Error::BadMagic("signature"));
        }
        if data[SIGNATURE_LEN..WIDTH_OFF] != IHDR_PREFIX {
            return Err(Error::BadMagic("IHDR chunk header"));
        }

        let width = be32(&data[WIDTH_OFF..]);
        let height = be32(&data[WIDTH_OFF + 4..]);
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions { width, height });
        }
        profile.check_resolution(width, height)?;

        let tail = &data[DEPTH_OFF..DEPTH_OFF + 5];
        if tail[0] != BIT_DEPTH || tail[2..] != [COMPRESSION_METHOD, FILTER_METHOD, INTERLACE_METHOD] {
            return Err(Error::BadMagic("IHDR parameters"));
        }
        let format = PixelFormat::try_from(tail[1]).map_err(|_| Error::BadMagic("IHDR colour type"))?;

        if data[MARKER_OFF..MARKER_OFF + MARKER_CHUNK.len()] != MARKER_CHUNK {
            return Err(Error::BadMagic("unPn marker chunk"));
        }

        let layout = Layout::new(width, height, format);
        if data.len() != layout.file_len() {
            return Err(Error::BadLength { expected: layout.file_len(), actual: data.len() });
        }

        // From here on the file is known to be long enough; what remains
        // only confirms a standard decoder will read it the same way.
        let idat_len = png_uint31(layout.idat_len() as u64)?;
        let idat = &data[IDAT_OFF..HEADER_LEN];
        if idat[..4] != idat_len || idat[4..8] != chunk::IDAT {
            return Err(Error::BadMagic("IDAT chunk header"));
        }
        if idat[8..] != profile.zlib_header {
            return Err(Error::BadMagic("zlib header"));
        }

        let header = row_header(layout.row_len())?;
        for y in 0..height {
            let off = layout.row_record_offset(y);
            if data[off..off + header.len()] != header {
                return Err(Error::BadMagic("row header"));
            }
        }

        let trailer = layout.trailer_offset();
        if data[trailer..trailer + FINAL_BLOCK.len()] != FINAL_BLOCK {
            return Err(Error::BadMagic("final deflate block"));
        }
        // skip Adler-32 and the IDAT CRC
        let iend = trailer + FINAL_BLOCK.len() + 8;
        if data[iend..] != IEND_CHUNK {
            return Err(Error::BadMagic("IEND chunk"));
        }

        Ok(UnPng { layout, data })
    }

    pub fn width(&self) -> u32 { self.layout.width }
    pub fn height(&self) -> u32 { self.layout.height }
    pub fn format(&self) -> PixelFormat { self.layout.format }
    pub fn layout(&self) -> &Layout { &self.layout }

    /// Pixel bytes of row `y`, `None` past the last row.
    pub fn row(&self, y: u32) -> Option<&'a [u8]> {
        if y >= self.layout.height {
            return None;
        }
        let start = self.layout.row_pixels_offset(y);
        Some(&self.data[start..start + self.layout.row_len()])
    }

    pub fn rows(&self) -> impl Iterator<Item = &'a [u8]> + '_ {
        (0..self.layout.height).filter_map(move |y| self.row(y))
    }

    /// Samples of the pixel at (`x`, `y`).
    pub fn pixel(&self, x: u32, y: u32) -> Option<&'a [u8]> {
        if x >= self.layout.width {
            return None;
        }
        let bpp = self.layout.format.bytes_per_pixel();
        let row = self.row(y)?;
        let start = x as usize * bpp;
        Some(&row[start..start + bpp])
    }

    /// The Adler-32 stored in the file, not recomputed.
    pub fn stored_adler32(&self) -> u32 {
        be32(&self.data[self.layout.trailer_offset() + FINAL_BLOCK.len()..])
    }

    /// Copies the pixels out into an owned buffer.
    pub fn to_pixel_buffer(&self) -> Result<PixelBuffer> {
        let mut pixels = Vec::with_capacity(self.layout.row_len() * self.layout.height as usize);
        for row in self.rows() {
            pixels.extend_from_slice(row);
        }
        PixelBuffer::new(self.layout.width, self.layout.height, self.layout.format, pixels)
    }
}
