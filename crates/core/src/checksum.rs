//! CRC-32 (ISO/IEC 15948 chunk integrity) and Adler-32 (RFC 1950 zlib trailer).
//!
//! Both are incremental: feeding `a` then `b` gives the same value as
//! feeding `a ++ b`. The encoder relies on that to checksum the filter
//! byte and the row bytes of each scanline without concatenating them.

/// Reversed CRC-32 polynomial.
const CRC32_POLY: u32 = 0xEDB8_8320;

/// Largest prime below 2^16.
const ADLER_MOD: u32 = 65521;
/// Largest n such that 255n(n+1)/2 + (n+1)(ADLER_MOD-1) fits in a u32.
const ADLER_NMAX: usize = 5552;

// Static rather than const so debug builds index it in place.
static CRC32_TABLE: [u32; 256] = make_crc32_table();

const fn make_crc32_table() -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut n = 0;
    while n < 256 {
        let mut c = n as u32;
        let mut k = 0;
        while k < 8 {
            c = if c & 1 != 0 { CRC32_POLY ^ (c >> 1) } else { c >> 1 };
            k += 1;
        }
        table[n] = c;
        n += 1;
    }
    table
}

/// Running CRC-32.
#[derive(Clone, Debug)]
pub struct Crc32 {
    state: u32,
}

impl Crc32 {
    pub fn new() -> Self {
        Crc32 { state: 0xFFFF_FFFF }
    }

    pub fn update(&mut self, buf: &[u8]) {
        let mut crc = self.state;
        for &byte in buf {
            crc = CRC32_TABLE[((crc ^ byte as u32) & 0xFF) as usize] ^ (crc >> 8);
        }
        self.state = crc;
    }

    pub fn finish(&self) -> u32 {
        self.state ^ 0xFFFF_FFFF
    }
}

impl Default for Crc32 {
    fn default() -> Self {
        Self::new()
    }
}

/// One-shot CRC-32 of `buf`.
pub fn crc32(buf: &[u8]) -> u32 {
    let mut h = Crc32::new();
    h.update(buf);
    h.finish()
}

/// Feed `buf` into a running Adler-32 value. Seed a fresh stream with 1.
pub fn adler32_update(buf: &[u8], running: u32) -> u32 {
    let mut a = running & 0xFFFF;
    let mut b = running >> 16;
    for block in buf.chunks(ADLER_NMAX) {
        for &byte in block {
            a += byte as u32;
            b += a;
        }
        a %= ADLER_MOD;
        b %= ADLER_MOD;
    }
    (b << 16) | a
}

/// Running Adler-32, seeded at 1.
#[derive(Clone, Copy, Debug)]
pub struct Adler32 {
    state: u32,
}

impl Adler32 {
    pub fn new() -> Self {
        Adler32 { state: 1 }
    }

    pub fn update(&mut self, buf: &[u8]) {
        self.state = adler32_update(buf, self.state);
    }

    pub fn finish(&self) -> u32 {
        self.state
    }
}

impl Default for Adler32 {
    fn default() -> Self {
        Self::new()
    }
}

/// One-shot Adler-32 of `buf`.
pub fn adler32(buf: &[u8]) -> u32 {
    adler32_update(buf, 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crc32_check_value() {
        assert_eq!(crc32(b"123456789"), 0xCBF4_3926);
        assert_eq!(crc32(b""), 0);
    }

    #[test]
    fn test_crc32_png_chunks() {
        assert_eq!(crc32(b"IEND"), 0xAE42_6082);
        assert_eq!(crc32(b"unPnG"), 0x5393_A438);
    }

    #[test]
    fn test_crc32_incremental() {
        let mut h = Crc32::new();
        h.update(b"IDAT");
        h.update(&[0x78, 0x01, 0x03, 0x00]);
        assert_eq!(h.finish(), crc32(b"IDAT\x78\x01\x03\x00"));
    }

    #[test]
    fn test_adler32_known_values() {
        assert_eq!(adler32(b""), 1);
        assert_eq!(adler32(b"Wikipedia"), 0x11E6_0398);
        assert_eq!(adler32(&[0x00, 0x0A, 0x14, 0x1E]), 0x0068_003D);
    }

    #[test]
    fn test_adler32_split_feed() {
        let row = [10u8, 20, 30];
        let split = adler32_update(&row, adler32_update(&[0], 1));
        assert_eq!(split, adler32(&[0, 10, 20, 30]));
    }

    #[test]
    fn test_adler32_long_input_matches_naive() {
        let data: Vec<u8> = (0..100_000u32).map(|i| (i * 7 + 3) as u8 | 0x80).collect();
        let mut a: u32 = 1;
        let mut b: u32 = 0;
        for &byte in &data {
            a = (a + byte as u32) % ADLER_MOD;
            b = (b + a) % ADLER_MOD;
        }
        let mut h = Adler32::new();
        for piece in data.chunks(777) {
            h.update(piece);
        }
        assert_eq!(h.finish(), (b << 16) | a);
    }
}
