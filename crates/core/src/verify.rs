//! Reads a file back the way a general PNG decoder would.
//!
//! Every chunk CRC is recomputed, the IDAT stream is inflated with
//! miniz_oxide and its Adler-32 is checked against the inflated bytes.
//! This is the slow path the reader exists to avoid; the encoder's
//! `--verify` option and the test suite use it to prove conformance.

use log::debug;

use crate::checksum::{adler32, crc32};
use crate::chunk::{self, png_uint31};
use crate::encoder::PNG_SIGNATURE;
use crate::error::{Error, Result};
use crate::header::IHDR_LEN;
use crate::pixel::PixelFormat;
use crate::stored::FILTER_NONE;

/// One chunk as found in the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkInfo {
    pub chunk_type: [u8; 4],
    /// Offset of the length field.
    pub offset: usize,
    pub len: usize,
    pub crc: u32,
}

impl ChunkInfo {
    pub fn type_str(&self) -> String {
        String::from_utf8_lossy(&self.chunk_type).into_owned()
    }

    /// Ancillary chunks have bit 5 set in the first type byte.
    pub fn is_ancillary(&self) -> bool {
        self.chunk_type[0] & 0x20 != 0
    }
}

#[derive(Debug, Clone)]
pub struct VerifyReport {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub chunks: Vec<ChunkInfo>,
    pub adler32: u32,
    /// Inflated IDAT contents: filter byte + row, for every row.
    pub scanlines: Vec<u8>,
}

impl VerifyReport {
    /// Pixel bytes with the filter bytes removed.
    pub fn pixels(&self) -> Vec<u8> {
        let line = self.width as usize * self.format.bytes_per_pixel() + 1;
        self.scanlines.chunks_exact(line).flat_map(|l| l[1..].iter().copied()).collect()
    }
}

fn be32(b: &[u8]) -> u32 {
    u32::from_be_bytes([b[0], b[1], b[2], b[3]])
}

/// Walks the chunk list, checking framing and CRCs.
pub fn read_chunks(data: &[u8]) -> Result<Vec<ChunkInfo>> {
    if data.len() < PNG_SIGNATURE.len() || data[..PNG_SIGNATURE.len()] != PNG_SIGNATURE {
        return Err(Error::BadMagic("signature"));
    }
    let mut chunks = Vec::new();
    let mut pos = PNG_SIGNATURE.len();
    while pos < data.len() {
        if data.len() - pos < 12 {
            return Err(Error::Malformed(format!("truncated chunk at offset {}", pos)));
        }
        let len = be32(&data[pos..]) as usize;
        if len as u64 > chunk::PNG_UINT31_MAX {
            return Err(Error::ValueTooLarge { value: len as u64, limit: chunk::PNG_UINT31_MAX });
        }
        let body_end = pos + 8 + len;
        if body_end + 4 > data.len() {
            return Err(Error::Malformed(format!("chunk at offset {} runs past end of file", pos)));
        }
        let chunk_type = [data[pos + 4], data[pos + 5], data[pos + 6], data[pos + 7]];
        let stored = be32(&data[body_end..]);
        let computed = crc32(&data[pos + 4..body_end]);
        let info = ChunkInfo { chunk_type, offset: pos, len, crc: stored };
        if stored != computed {
            return Err(Error::Checksum { what: format!("{} CRC", info.type_str()), expected: stored, actual: computed });
        }
        chunks.push(info);
        pos = body_end + 4;
        if chunk_type == chunk::IEND {
            break;
        }
    }
    if pos != data.len() {
        return Err(Error::Malformed(format!("{} bytes after IEND", data.len() - pos)));
    }
    Ok(chunks)
}

/// Full standards-path check of an encoded file.
pub fn verify(data: &[u8]) -> Result<VerifyReport> {
    let chunks = read_chunks(data)?;

    let ihdr = match chunks.first() {
        Some(c) if c.chunk_type == chunk::IHDR && c.len == IHDR_LEN => &data[c.offset + 8..c.offset + 8 + IHDR_LEN],
        _ => return Err(Error::Malformed("IHDR must be the first chunk".into())),
    };
    if chunks.last().map(|c| c.chunk_type) != Some(chunk::IEND) {
        return Err(Error::Malformed("missing IEND".into()));
    }
    for c in &chunks {
        if !c.is_ancillary() && ![chunk::IHDR, chunk::IDAT, chunk::IEND].contains(&c.chunk_type) {
            return Err(Error::Malformed(format!("unexpected critical chunk {}", c.type_str())));
        }
    }

    let width = be32(&ihdr[0..]);
    let height = be32(&ihdr[4..]);
    if ihdr[8] != 8 || ihdr[10..] != [0, 0, 0] {
        return Err(Error::Malformed("only 8-bit, non-interlaced images are produced".into()));
    }
    let format = PixelFormat::try_from(ihdr[9])?;
    if width == 0 || height == 0 {
        return Err(Error::InvalidDimensions { width, height });
    }
    png_uint31(width as u64)?;
    png_uint31(height as u64)?;
    let line = (width as usize)
        .checked_mul(format.bytes_per_pixel())
        .and_then(|n| n.checked_add(1))
        .ok_or_else(|| Error::Malformed(format!("row of {} pixels overflows", width)))?;
    let expected = line
        .checked_mul(height as usize)
        .ok_or_else(|| Error::Malformed(format!("{}x{} image overflows", width, height)))?;

    let mut zlib = Vec::new();
    for c in chunks.iter().filter(|c| c.chunk_type == chunk::IDAT) {
        zlib.extend_from_slice(&data[c.offset + 8..c.offset + 8 + c.len]);
    }
    if zlib.len() < 6 {
        return Err(Error::Malformed("IDAT stream too short".into()));
    }

    let scanlines = miniz_oxide::inflate::decompress_to_vec_zlib(&zlib)
        .map_err(|e| Error::Inflate(format!("{:?}", e)))?;

    let stored_adler = be32(&zlib[zlib.len() - 4..]);
    let computed_adler = adler32(&scanlines);
    if stored_adler != computed_adler {
        return Err(Error::Checksum { what: "zlib Adler-32".into(), expected: stored_adler, actual: computed_adler });
    }

    if scanlines.len() != expected {
        return Err(Error::BadLength { expected, actual: scanlines.len() });
    }
    if let Some(y) = scanlines.chunks_exact(line).position(|l| l[0] != FILTER_NONE) {
        return Err(Error::Malformed(format!("row {} uses filter type {}", y, scanlines[y * line])));
    }

    debug!("verified {}x{} {}: {} chunks, adler32 {:08x}", width, height, format, chunks.len(), stored_adler);
    Ok(VerifyReport { width, height, format, chunks, adler32: stored_adler, scanlines })
}
