//! # CRC8-DVB-S2
//!
//! The CRC8 variant mandated by the CRSF working group:
//! polynomial `0xD5`, initial value `0x00`, no input or output reflection.
//! Computed over the type byte and payload of every frame.

/// CRC-8-DVB-S2 polynomial.
const CRC8_POLY: u8 = 0xD5;

/// Lookup table, built once at compile time.
const CRC8_TABLE: [u8; 256] = generate_crc8_table();

const fn generate_crc8_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        let mut crc = i as u8;
        let mut j = 0;
        while j < 8 {
            if crc & 0x80 != 0 {
                crc = (crc << 1) ^ CRC8_POLY;
            } else {
                crc <<= 1;
            }
            j += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
}

/// Compute the CRC8-DVB-S2 checksum of `data` (table-driven).
///
/// # Examples
///
/// ```
/// use crsf_link::crsf::crc::crc8_dvb_s2;
///
/// // RC channels frame with all-zero payload: type byte + 22 zero bytes.
/// let mut data = vec![0x16u8];
/// data.extend_from_slice(&[0u8; 22]);
/// assert_eq!(crc8_dvb_s2(&data), 239);
/// ```
pub fn crc8_dvb_s2(data: &[u8]) -> u8 {
    let mut crc: u8 = 0;
    for &byte in data {
        crc = CRC8_TABLE[(crc ^ byte) as usize];
    }
    crc
}

/// Bitwise reference implementation, used by tests to verify the table.
#[cfg(test)]
fn crc8_dvb_s2_bitwise(data: &[u8]) -> u8 {
    let mut crc: u8 = 0;
    for &byte in data {
        crc ^= byte;
        for _ in 0..8 {
            if crc & 0x80 != 0 {
                crc = (crc << 1) ^ CRC8_POLY;
            } else {
                crc <<= 1;
            }
        }
    }
    crc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_is_zero() {
        assert_eq!(crc8_dvb_s2(&[]), 0x00);
    }

    #[test]
    fn known_rc_channels_vector() {
        // 0xC8 0x18 0x16 [0; 22] 0xEF is a valid all-zero RC frame;
        // the CRC spans type + payload only.
        let mut data = vec![0x16u8];
        data.extend_from_slice(&[0u8; 22]);
        assert_eq!(crc8_dvb_s2(&data), 0xEF);
    }

    #[test]
    fn table_matches_bitwise_reference() {
        let cases: [&[u8]; 5] = [
            &[0x00],
            &[0xFF],
            &[0x16, 0xE0, 0x03, 0x1F],
            &[0xAA; 23],
            &[0x01, 0x02, 0x03, 0x04, 0x05],
        ];
        for data in cases {
            assert_eq!(crc8_dvb_s2(data), crc8_dvb_s2_bitwise(data), "data: {data:02X?}");
        }
    }

    #[test]
    fn single_bit_flip_changes_crc() {
        // Every single-bit corruption of a representative type+payload
        // buffer must produce a different checksum.
        let mut data = vec![0x16u8];
        data.extend_from_slice(&[0x5A; 22]);
        let baseline = crc8_dvb_s2(&data);
        for byte in 0..data.len() {
            for bit in 0..8 {
                let mut corrupted = data.clone();
                corrupted[byte] ^= 1 << bit;
                assert_ne!(
                    crc8_dvb_s2(&corrupted),
                    baseline,
                    "flip of byte {byte} bit {bit} went undetected"
                );
            }
        }
    }
}
