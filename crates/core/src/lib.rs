//! # unpng-core
//!
//! Encoder and reader for unPNG: ordinary PNG files whose image data is a
//! zlib stream of stored (uncompressed) deflate blocks, one per scanline,
//! each behind an identical 8-byte header. Any PNG decoder opens them;
//! [`UnPng`] reads them by offset arithmetic with no inflate step.
//!
//! ## Architecture
//!
//! - [`checksum`] — CRC-32 for chunks, Adler-32 for the zlib trailer
//! - [`chunk`] — chunk framing, streamed through [`chunk::ChunkWriter`]
//! - [`header`] — IHDR payload
//! - [`stored`] — the per-row stored-block zlib stream
//! - [`encoder`] — [`Encoder`] sequencing signature, IHDR, `unPn`, IDAT, IEND
//! - [`layout`] — byte offsets of every part of a file
//! - [`reader`] — [`UnPng`], zero-copy parser
//! - [`verify`] — general-decoder style check (CRCs, inflate, Adler-32)
//! - [`profile`] — [`Profile`], the resolution ceiling and zlib header policy
//!
//! ## Example
//!
//! ```
//! use unpng_core::{encode_to_vec, PixelBuffer, PixelFormat, UnPng};
//!
//! let img = PixelBuffer::new(1, 1, PixelFormat::Rgb8, vec![10, 20, 30])?;
//! let png = encode_to_vec(PixelFormat::Rgb8, &img)?;
//! let parsed = UnPng::parse(&png)?;
//! assert_eq!(parsed.row(0), Some(&[10u8, 20, 30][..]));
//! # Ok::<(), unpng_core::Error>(())
//! ```

pub mod checksum;
pub mod chunk;
pub mod encoder;
pub mod error;
pub mod header;
pub mod layout;
pub mod pixel;
pub mod profile;
pub mod reader;
pub mod stored;
pub mod verify;

pub use encoder::{encode, encode_file, encode_to_vec, Encoder, PNG_SIGNATURE};
pub use error::{Error, Result};
pub use layout::Layout;
pub use pixel::{PixelBuffer, PixelFormat};
pub use profile::Profile;
pub use reader::UnPng;
pub use verify::{verify, VerifyReport};
