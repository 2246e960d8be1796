//! PNG chunk framing: `length || type || data || crc32(type || data)`.

use std::io::{self, Write};

use log::trace;

use crate::checksum::Crc32;
use crate::error::{Error, Result};

/// Largest value a "PNG four-byte unsigned integer" may hold.
pub const PNG_UINT31_MAX: u64 = (1 << 31) - 1;

pub const IHDR: [u8; 4] = *b"IHDR";
pub const IDAT: [u8; 4] = *b"IDAT";
pub const IEND: [u8; 4] = *b"IEND";
/// Ancillary marker chunk (lowercase first letter).
pub const UNPN: [u8; 4] = *b"unPn";
pub const UNPN_PAYLOAD: &[u8] = b"G";

/// Big-endian bytes of `value`, which must fit in 31 bits.
pub fn png_uint31(value: u64) -> Result<[u8; 4]> {
    if value > PNG_UINT31_MAX {
        return Err(Error::ValueTooLarge { value, limit: PNG_UINT31_MAX });
    }
    Ok((value as u32).to_be_bytes())
}

/// Writes a complete chunk in emission order.
pub fn write_chunk<W: Write>(sink: &mut W, chunk_type: [u8; 4], data: &[u8]) -> Result<()> {
    let mut chunk = ChunkWriter::begin(sink, chunk_type, data.len() as u64)?;
    chunk.write_all(data)?;
    chunk.finish()
}

/// A chunk whose payload is streamed in pieces.
///
/// The length is declared up front, so nothing has to be buffered or
/// rewritten. `finish` refuses to write the CRC unless exactly the
/// declared number of payload bytes went through.
pub struct ChunkWriter<'a, W: Write> {
    sink: &'a mut W,
    chunk_type: [u8; 4],
    crc: Crc32,
    declared: u64,
    written: u64,
}

impl<'a, W: Write> ChunkWriter<'a, W> {
    pub fn begin(sink: &'a mut W, chunk_type: [u8; 4], len: u64) -> Result<Self> {
        let len_bytes = png_uint31(len)?;
        trace!("chunk {} ({} bytes)", String::from_utf8_lossy(&chunk_type), len);
        sink.write_all(&len_bytes)?;
        sink.write_all(&chunk_type)?;
        let mut crc = Crc32::new();
        crc.update(&chunk_type);
        Ok(ChunkWriter { sink, chunk_type, crc, declared: len, written: 0 })
    }

    /// Writes the CRC. Fails if the payload was short.
    pub fn finish(self) -> Result<()> {
        if self.written != self.declared {
            return Err(Error::Malformed(format!(
                "{} chunk declared {} bytes but received {}",
                String::from_utf8_lossy(&self.chunk_type), self.declared, self.written
            )));
        }
        self.sink.write_all(&self.crc.finish().to_be_bytes())?;
        Ok(())
    }
}

impl<W: Write> Write for ChunkWriter<'_, W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.written + buf.len() as u64 > self.declared {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "write past the declared chunk length",
            ));
        }
        let n = self.sink.write(buf)?;
        self.crc.update(&buf[..n]);
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.sink.flush()
    }
}
