//! CRC-64 checksum engine (Jones polynomial, bit-reflected, table-driven).
//!
//! The accumulator starts at [`INITIAL`] and is advanced with [`update`] as byte
//! spans become available. Feeding a fixed byte stream in order yields the same
//! value however it is split into chunks.

/// Reflected form of the Jones polynomial `0xAD93D23594C935A9`.
pub const POLY: u64 = 0x95AC_9329_AC4B_C9B5;

/// Value of the accumulator before any bytes are fed.
pub const INITIAL: u64 = 0;

static TABLE: [u64; 256] = generate_table(POLY);

const fn table_entry(poly: u64, index: u8) -> u64 {
    let mut crc = index as u64;
    let mut bit = 0;
    while bit < 8 {
        if crc & 1 != 0 {
            crc = (crc >> 1) ^ poly;
        } else {
            crc >>= 1;
        }
        bit += 1;
    }
    crc
}

const fn generate_table(poly: u64) -> [u64; 256] {
    let mut table = [0u64; 256];
    let mut i = 0usize;
    while i < 256 {
        table[i] = table_entry(poly, i as u8);
        i += 1;
    }
    table
}

/// Advance `crc` over `data` and return the new accumulator value.
#[must_use]
pub fn update(crc: u64, data: &[u8]) -> u64 {
    data.iter().fold(crc, |crc, &byte| {
        TABLE[((crc ^ byte as u64) & 0xFF) as usize] ^ (crc >> 8)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bitwise(mut crc: u64, data: &[u8]) -> u64 {
        for &byte in data {
            crc ^= byte as u64;
            for _ in 0..8 {
                crc = if crc & 1 != 0 { (crc >> 1) ^ POLY } else { crc >> 1 };
            }
        }
        crc
    }

    #[test]
    fn check_value() {
        assert_eq!(update(INITIAL, b"123456789"), 0xe9c6_d914_c4b8_d9ca);
    }

    #[test]
    fn empty_input_keeps_state() {
        assert_eq!(update(INITIAL, &[]), INITIAL);
        assert_eq!(update(0x1234, &[]), 0x1234);
    }

    #[test]
    fn table_matches_bitwise_reference() {
        let data: Vec<u8> = (0u8..=255).cycle().take(4099).collect();
        assert_eq!(update(INITIAL, &data), bitwise(INITIAL, &data));
    }

    #[test]
    fn chunking_does_not_change_result() {
        let data: Vec<u8> = (0u32..10_000).map(|i| (i * 31 % 251) as u8).collect();
        let whole = update(INITIAL, &data);
        for chunk_size in [1, 3, 7, 64, 1000, 9_999] {
            let chunked = data
                .chunks(chunk_size)
                .fold(INITIAL, |crc, chunk| update(crc, chunk));
            assert_eq!(chunked, whole, "chunk size {}", chunk_size);
        }
    }

    #[test]
    fn order_of_spans_matters() {
        let a = b"low block";
        let b = b"high block";
        let ab = update(update(INITIAL, a), b);
        let ba = update(update(INITIAL, b), a);
        assert_ne!(ab, ba);
    }
}
