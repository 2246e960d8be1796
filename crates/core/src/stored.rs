//! zlib stream made of one stored deflate block per scanline.
//!
//! ```text
//! 78 01                          zlib header (profile)
//! 02 08 00 LEN NLEN 00 <row 0>   one record per row, LEN/NLEN little-endian
//! 02 08 00 LEN NLEN 00 <row 1>
//! ...
//! 03 00                          empty final block
//! <adler32 big-endian>
//! ```
//!
//! The 3-byte block prefix and the terminal pair are fixed bit patterns.
//! `02 08 00` packs two empty fixed-Huffman blocks followed by the header
//! of a non-final stored block, padded out to the byte boundary where LEN
//! starts; `03 00` is an empty final block. Every record therefore has the
//! same size and starts byte-aligned. LEN counts the filter byte plus the
//! row, and the Adler-32 is fed exactly those bytes.

use std::io::Write;

use crate::checksum::Adler32;
use crate::error::{Error, Result};
use crate::profile::DEFAULT_ZLIB_HEADER;

/// Prefix of every row record.
pub const ROW_BLOCK_PREFIX: [u8; 3] = [0x02, 0x08, 0x00];
/// Empty final stored block.
pub const FINAL_BLOCK: [u8; 2] = [0x03, 0x00];
/// PNG filter type None.
pub const FILTER_NONE: u8 = 0x00;
/// Largest stored block LEN.
pub const MAX_BLOCK_LEN: usize = 0xFFFF;

/// The 8 bytes preceding every row's pixels for a row of `row_len` bytes.
pub fn row_header(row_len: usize) -> Result<[u8; 8]> {
    let block_len = row_len + 1;
    if block_len > MAX_BLOCK_LEN {
        return Err(Error::ValueTooLarge { value: block_len as u64, limit: MAX_BLOCK_LEN as u64 });
    }
    let len = block_len as u16;
    let nlen = len ^ 0xFFFF;
    let [l0, l1] = len.to_le_bytes();
    let [n0, n1] = nlen.to_le_bytes();
    let [p0, p1, p2] = ROW_BLOCK_PREFIX;
    Ok([p0, p1, p2, l0, l1, n0, n1, FILTER_NONE])
}

/// Streams the stored image data for `rows` into `out`.
///
/// Every row must be exactly `row_len` bytes. Returns the final Adler-32.
pub fn write_stored_stream<'r, W, I>(out: &mut W, zlib_header: [u8; 2], row_len: usize, rows: I) -> Result<u32>
where
    W: Write,
    I: IntoIterator<Item = &'r [u8]>,
{
    let header = row_header(row_len)?;
    out.write_all(&zlib_header)?;

    let mut adler = Adler32::new();
    for row in rows {
        if row.len() != row_len {
            return Err(Error::BufferSize { expected: row_len, actual: row.len() });
        }
        out.write_all(&header)?;
        out.write_all(row)?;
        adler.update(&[FILTER_NONE]);
        adler.update(row);
    }

    let sum = adler.finish();
    out.write_all(&FINAL_BLOCK)?;
    out.write_all(&sum.to_be_bytes())?;
    Ok(sum)
}

/// The whole stream for a contiguous row-major buffer, in memory.
pub fn build_stored_stream(data: &[u8], row_len: usize, height: usize) -> Result<Vec<u8>> {
    let expected = row_len * height;
    if data.len() != expected {
        return Err(Error::BufferSize { expected, actual: data.len() });
    }
    let mut out = Vec::with_capacity(height * (row_len + 8) + 8);
    let rows = (0..height).map(|y| &data[y * row_len..(y + 1) * row_len]);
    write_stored_stream(&mut out, DEFAULT_ZLIB_HEADER, row_len, rows)?;
    Ok(out)
}
