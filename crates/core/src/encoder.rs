//! unPNG encoder.
//!
//! Writes, strictly in this order: signature, IHDR, the `unPn` marker,
//! one IDAT holding the stored stream, and an empty IEND. Output goes
//! straight to the sink; the IDAT payload is never held in memory.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::debug;

use crate::chunk::{self, ChunkWriter};
use crate::error::{Error, Result};
use crate::header::build_ihdr;
use crate::layout::Layout;
use crate::pixel::{PixelBuffer, PixelFormat};
use crate::profile::Profile;
use crate::stored::write_stored_stream;

/// `\x89 P N G \r \n \x1a \n`
pub const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// Encoder bound to one profile. Holds no per-image state.
#[derive(Debug, Clone, Default)]
pub struct Encoder {
    profile: Profile,
}

impl Encoder {
    pub fn new(profile: Profile) -> Result<Self> {
        profile.validate()?;
        Ok(Encoder { profile })
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    /// Encode `buffer` as `format` into `sink`.
    ///
    /// A buffer in the other format is converted first (alpha added as 255
    /// or dropped). On error the sink may hold a truncated file.
    pub fn encode<W: Write>(&self, sink: &mut W, format: PixelFormat, buffer: &PixelBuffer) -> Result<()> {
        let (width, height) = (buffer.width(), buffer.height());
        self.check_geometry(width, height)?;

        let pixels = buffer.convert(format);
        let layout = Layout::new(width, height, format);
        let ihdr = build_ihdr(width, height, format.colour_type())?;

        sink.write_all(&PNG_SIGNATURE)?;
        chunk::write_chunk(sink, chunk::IHDR, &ihdr)?;
        chunk::write_chunk(sink, chunk::UNPN, chunk::UNPN_PAYLOAD)?;

        let mut idat = ChunkWriter::begin(sink, chunk::IDAT, layout.idat_len() as u64)?;
        let adler = write_stored_stream(&mut idat, self.profile.zlib_header, layout.row_len(), pixels.rows())?;
        idat.finish()?;

        chunk::write_chunk(sink, chunk::IEND, &[])?;

        debug!(
            "encoded {}x{} {} unPNG: {} bytes, adler32 {:08x}",
            width,
            height,
            format,
            layout.file_len(),
            adler
        );
        Ok(())
    }

    /// Ceiling first, then zero sides. Runs before anything is sized or written.
    fn check_geometry(&self, width: u32, height: u32) -> Result<()> {
        self.profile.check_resolution(width, height)?;
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions { width, height });
        }
        Ok(())
    }

    pub fn encode_to_vec(&self, format: PixelFormat, buffer: &PixelBuffer) -> Result<Vec<u8>> {
        self.check_geometry(buffer.width(), buffer.height())?;
        let layout = Layout::new(buffer.width(), buffer.height(), format);
        let mut out = Vec::with_capacity(layout.file_len());
        self.encode(&mut out, format, buffer)?;
        Ok(out)
    }

    /// Encode into a new file at `path`.
    ///
    /// The writer is flushed on every path out, including errors. The
    /// encode error wins over a flush error; a partial file is left in
    /// place for the caller to deal with.
    pub fn encode_file(&self, path: &Path, format: PixelFormat, buffer: &PixelBuffer) -> Result<()> {
        let mut out = BufWriter::new(File::create(path)?);
        let encoded = self.encode(&mut out, format, buffer);
        let flushed = out.flush().map_err(Error::from);
        encoded.and(flushed)
    }
}

/// Encode with the default profile.
pub fn encode<W: Write>(sink: &mut W, format: PixelFormat, buffer: &PixelBuffer) -> Result<()> {
    Encoder::default().encode(sink, format, buffer)
}

/// Encode with the default profile into memory.
pub fn encode_to_vec(format: PixelFormat, buffer: &PixelBuffer) -> Result<Vec<u8>> {
    Encoder::default().encode_to_vec(format, buffer)
}

/// Encode with the default profile into a file.
pub fn encode_file(path: &Path, format: PixelFormat, buffer: &PixelBuffer) -> Result<()> {
    Encoder::default().encode_file(path, format, buffer)
}
