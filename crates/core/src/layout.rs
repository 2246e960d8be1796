//! Byte offsets inside an unPNG file.
//!
//! Every part of the file except the pixel bytes and the two checksums at
//! the end is a function of width, height and format, so the position of
//! any row is plain arithmetic.
//!
//! ```text
//! +----------------------+  0
//! | PNG signature        |  8 bytes
//! | IHDR chunk           |  25 bytes
//! | unPn chunk ("G")     |  13 bytes
//! | IDAT length + type   |  8 bytes
//! | zlib header          |  2 bytes
//! +----------------------+  56 = HEADER_LEN
//! | row record × height  |  8-byte row header + stride pixel bytes each
//! +----------------------+
//! | final empty block    |  2 bytes (03 00)
//! | Adler-32             |  4 bytes
//! | IDAT CRC             |  4 bytes
//! | IEND chunk           |  12 bytes
//! +----------------------+
//! ```

use crate::pixel::PixelFormat;

pub const SIGNATURE_LEN: usize = 8;
/// Length + type + 13-byte payload + CRC.
pub const IHDR_CHUNK_LEN: usize = 25;
pub const MARKER_CHUNK_LEN: usize = 13;
/// IDAT length and type fields plus the 2-byte zlib header.
pub const IDAT_HEADER_LEN: usize = 10;
pub const HEADER_LEN: usize = SIGNATURE_LEN + IHDR_CHUNK_LEN + MARKER_CHUNK_LEN + IDAT_HEADER_LEN;
/// Stored block header (3 + LEN + NLEN) plus the filter byte.
pub const ROW_OVERHEAD: usize = 8;
/// Final block, Adler-32, IDAT CRC.
pub const IDAT_TRAILER_LEN: usize = 2 + 4 + 4;
pub const IEND_CHUNK_LEN: usize = 12;
pub const FILE_OVERHEAD: usize = HEADER_LEN + IDAT_TRAILER_LEN + IEND_CHUNK_LEN;

/// IDAT payload bytes that do not depend on height: zlib header, final
/// block, Adler-32.
const IDAT_FIXED_LEN: usize = 2 + 2 + 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
}

impl Layout {
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Self {
        Layout { width, height, format }
    }

    /// Pixel bytes per row.
    pub fn row_len(&self) -> usize {
        self.width as usize * self.format.bytes_per_pixel()
    }

    pub fn row_record_len(&self) -> usize {
        self.row_len() + ROW_OVERHEAD
    }

    /// Payload length of the IDAT chunk.
    pub fn idat_len(&self) -> usize {
        self.height as usize * self.row_record_len() + IDAT_FIXED_LEN
    }

    /// Offset of row `y`'s 8-byte header.
    pub fn row_record_offset(&self, y: u32) -> usize {
        HEADER_LEN + y as usize * self.row_record_len()
    }

    /// Offset of row `y`'s first pixel byte.
    pub fn row_pixels_offset(&self, y: u32) -> usize {
        self.row_record_offset(y) + ROW_OVERHEAD
    }

    /// Offset of the terminal `03 00` block.
    pub fn trailer_offset(&self) -> usize {
        self.row_record_offset(self.height)
    }

    pub fn file_len(&self) -> usize {
        self.height as usize * self.row_record_len() + FILE_OVERHEAD
    }
}
