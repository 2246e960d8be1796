//! Pixel formats and the raw row-major pixel buffer handed to the encoder.

use std::borrow::Cow;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// PNG colour type for truecolour (RGB).
pub const COLOUR_TYPE_RGB: u8 = 2;
/// PNG colour type for truecolour with alpha (RGBA).
pub const COLOUR_TYPE_RGBA: u8 = 6;

/// 8-bit-per-channel sample layouts an unPNG can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PixelFormat {
    /// 3 bytes per pixel, PNG colour type 2
    Rgb8,
    /// 4 bytes per pixel, PNG colour type 6
    Rgba8,
}

impl PixelFormat {
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Rgb8 => 3,
            PixelFormat::Rgba8 => 4,
        }
    }

    /// Colour-type byte written into IHDR.
    pub fn colour_type(self) -> u8 {
        match self {
            PixelFormat::Rgb8 => COLOUR_TYPE_RGB,
            PixelFormat::Rgba8 => COLOUR_TYPE_RGBA,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PixelFormat::Rgb8 => "rgb8",
            PixelFormat::Rgba8 => "rgba8",
        }
    }
}

impl std::fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PixelFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "rgb" | "rgb8" | "rgb888" => Ok(PixelFormat::Rgb8),
            "rgba" | "rgba8" | "rgba8888" => Ok(PixelFormat::Rgba8),
            _ => Err(Error::UnsupportedPixelFormat(s.to_string())),
        }
    }
}

/// Maps a PNG colour-type code back to a format.
impl TryFrom<u8> for PixelFormat {
    type Error = Error;

    fn try_from(colour_type: u8) -> Result<Self> {
        match colour_type {
            COLOUR_TYPE_RGB => Ok(PixelFormat::Rgb8),
            COLOUR_TYPE_RGBA => Ok(PixelFormat::Rgba8),
            other => Err(Error::UnsupportedPixelFormat(format!("colour type {}", other))),
        }
    }
}

/// Rectangular image in row-major order with no padding between rows.
///
/// `data.len()` always equals `width * height * format.bytes_per_pixel()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    format: PixelFormat,
    data: Vec<u8>,
}

impl PixelBuffer {
    pub fn new(width: u32, height: u32, format: PixelFormat, data: Vec<u8>) -> Result<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(format.bytes_per_pixel()))
            .ok_or(Error::ValueTooLarge {
                value: width as u64 * height as u64,
                limit: usize::MAX as u64 / format.bytes_per_pixel() as u64,
            })?;
        if data.len() != expected {
            return Err(Error::BufferSize { expected, actual: data.len() });
        }
        Ok(PixelBuffer { width, height, format, data })
    }

    pub fn width(&self) -> u32 { self.width }
    pub fn height(&self) -> u32 { self.height }
    pub fn format(&self) -> PixelFormat { self.format }
    pub fn data(&self) -> &[u8] { &self.data }

    /// Bytes in one row (without the PNG filter byte).
    pub fn stride(&self) -> usize {
        self.width as usize * self.format.bytes_per_pixel()
    }

    /// Row `y`, or `None` past the last row.
    pub fn row(&self, y: u32) -> Option<&[u8]> {
        if y >= self.height {
            return None;
        }
        let stride = self.stride();
        let start = y as usize * stride;
        Some(&self.data[start..start + stride])
    }

    /// Rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> + '_ {
        // chunks_exact(0) panics, and a zero-width buffer has no bytes anyway
        let stride = self.stride().max(1);
        self.data.chunks_exact(stride).take(self.height as usize)
    }

    /// Same image in `format`. RGB → RGBA adds an opaque alpha channel,
    /// RGBA → RGB drops alpha. Borrows when no conversion is needed.
    pub fn convert(&self, format: PixelFormat) -> Cow<'_, PixelBuffer> {
        if format == self.format {
            return Cow::Borrowed(self);
        }
        let pixels = self.width as usize * self.height as usize;
        let mut data = Vec::with_capacity(pixels * format.bytes_per_pixel());
        match (self.format, format) {
            (PixelFormat::Rgb8, PixelFormat::Rgba8) => {
                for px in self.data.chunks_exact(3) {
                    data.extend_from_slice(px);
                    data.push(0xFF);
                }
            }
            (PixelFormat::Rgba8, PixelFormat::Rgb8) => {
                for px in self.data.chunks_exact(4) {
                    data.extend_from_slice(&px[..3]);
                }
            }
            _ => unreachable!("identical formats handled above"),
        }
        Cow::Owned(PixelBuffer { width: self.width, height: self.height, format, data })
    }
}
