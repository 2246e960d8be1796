//! IHDR payload.

use crate::chunk::png_uint31;
use crate::error::Result;

pub const IHDR_LEN: usize = 13;

/// Bits per sample.
pub const BIT_DEPTH: u8 = 8;
/// zlib/DEFLATE, the only method PNG defines.
pub const COMPRESSION_METHOD: u8 = 0;
/// Adaptive filtering; every row here uses filter type None within it.
pub const FILTER_METHOD: u8 = 0;
/// No interlacing.
pub const INTERLACE_METHOD: u8 = 0;

/// `width || height || depth || colour type || compression || filter || interlace`.
pub fn build_ihdr(width: u32, height: u32, colour_type: u8) -> Result<[u8; IHDR_LEN]> {
    let mut ihdr = [0u8; IHDR_LEN];
    ihdr[0..4].copy_from_slice(&png_uint31(width as u64)?);
    ihdr[4..8].copy_from_slice(&png_uint31(height as u64)?);
    ihdr[8] = BIT_DEPTH;
    ihdr[9] = colour_type;
    ihdr[10] = COMPRESSION_METHOD;
    ihdr[11] = FILTER_METHOD;
    ihdr[12] = INTERLACE_METHOD;
    Ok(ihdr)
}
