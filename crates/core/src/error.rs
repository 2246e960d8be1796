//! Error type shared by the encoder, the reader and the verifier.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A length does not fit the field it is written into (31-bit chunk
    /// length, 16-bit stored block length).
    #[error("value {value} does not fit in a field limited to {limit}")]
    ValueTooLarge { value: u64, limit: u64 },

    #[error("image {width}x{height} exceeds the {limit}x{limit} resolution ceiling")]
    ImageTooLarge { width: u32, height: u32, limit: u32 },

    #[error("unsupported pixel format: {0}")]
    UnsupportedPixelFormat(String),

    #[error("invalid image dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("pixel buffer holds {actual} bytes, geometry requires {expected}")]
    BufferSize { expected: usize, actual: usize },

    #[error("invalid encoder profile: {0}")]
    InvalidProfile(&'static str),

    #[error("not an unPNG file: bad {0}")]
    BadMagic(&'static str),

    #[error("bad file length: expected {expected} bytes, got {actual}")]
    BadLength { expected: usize, actual: usize },

    #[error("{what} checksum mismatch: stored {expected:#010x}, computed {actual:#010x}")]
    Checksum { what: String, expected: u32, actual: u32 },

    #[error("malformed PNG: {0}")]
    Malformed(String),

    #[error("zlib stream failed to inflate: {0}")]
    Inflate(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
