//! Encoder policy knobs.
//!
//! The resolution ceiling and the zlib header bytes are policy, not format
//! requirements, so they live in a small value passed to the encoder and
//! reader rather than in globals.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::stored::MAX_BLOCK_LEN;

/// Default resolution ceiling (0x2000).
pub const DEFAULT_MAX_RESOLUTION: u32 = 8192;

/// zlib CMF (deflate, 32K window) and FLG ("fastest" level, FCHECK valid).
pub const DEFAULT_ZLIB_HEADER: [u8; 2] = [0x78, 0x01];

/// Widest format in bytes per pixel, used to bound `max_resolution`.
const WIDEST_PIXEL: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    /// Largest accepted width and height.
    pub max_resolution: u32,
    /// The two zlib header bytes opening the IDAT stream.
    pub zlib_header: [u8; 2],
}

impl Default for Profile {
    fn default() -> Self {
        Profile {
            max_resolution: DEFAULT_MAX_RESOLUTION,
            zlib_header: DEFAULT_ZLIB_HEADER,
        }
    }
}

impl Profile {
    pub fn with_max_resolution(mut self, max_resolution: u32) -> Self {
        self.max_resolution = max_resolution;
        self
    }

    /// Checks the profile can only produce well-formed files.
    pub fn validate(&self) -> Result<()> {
        if self.max_resolution == 0 {
            return Err(Error::InvalidProfile("max_resolution must be at least 1"));
        }
        // widest row plus its filter byte must fit a stored block
        let widest_block = self.max_resolution as u64 * WIDEST_PIXEL as u64 + 1;
        if widest_block > MAX_BLOCK_LEN as u64 {
            return Err(Error::InvalidProfile("max_resolution overflows the 16-bit stored block length"));
        }
        let [cmf, flg] = self.zlib_header;
        if cmf & 0x0F != 8 || cmf >> 4 > 7 {
            return Err(Error::InvalidProfile("zlib header must select deflate with a window of at most 32K"));
        }
        if flg & 0x20 != 0 {
            return Err(Error::InvalidProfile("zlib header must not request a preset dictionary"));
        }
        if (cmf as u16 * 256 + flg as u16) % 31 != 0 {
            return Err(Error::InvalidProfile("zlib header FCHECK is wrong"));
        }
        Ok(())
    }

    /// Fails with `ImageTooLarge` when either side exceeds the ceiling.
    pub fn check_resolution(&self, width: u32, height: u32) -> Result<()> {
        if width > self.max_resolution || height > self.max_resolution {
            return Err(Error::ImageTooLarge { width, height, limit: self.max_resolution });
        }
        Ok(())
    }
}
