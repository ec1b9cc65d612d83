//! Frame fingerprinting for cross-medium duplicate detection.
//!
//! CRC-16 with polynomial 0x1021 (x^16 + x^12 + x^5 + 1), zero initial
//! value, bytes processed most-significant-bit first, no reflection and no
//! final XOR. Table-driven, matching the reference lookup table.

const POLY: u16 = 0x1021;

const fn build_table() -> [u16; 256] {
    let mut table = [0u16; 256];
    let mut i = 0;
    while i < 256 {
        let mut crc = (i as u16) << 8;
        let mut bit = 0;
        while bit < 8 {
            crc = if crc & 0x8000 != 0 {
                (crc << 1) ^ POLY
            } else {
                crc << 1
            };
            bit += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
}

static CRC16_TAB: [u16; 256] = build_table();

/// 16-bit fingerprint of `data`.
///
/// Pure and deterministic; identical input always yields an identical value.
pub fn fingerprint(data: &[u8]) -> u16 {
    let mut crc = 0u16;
    for byte in data {
        crc = CRC16_TAB[((crc >> 8) ^ *byte as u16) as usize] ^ (crc << 8);
    }
    crc
}
