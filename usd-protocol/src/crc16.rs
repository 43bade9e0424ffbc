//! CRC-16-CCITT checksum
//!
//! - Polynomial: 0x1021 (x^16 + x^12 + x^5 + 1)
//! - Initial value: 0xFFFF
//! - No input/output reflection, no final XOR
//!
//! On the wire the checksum follows the data it covers, least-significant
//! byte first.

use heapless::Vec;

use crate::error::CrcError;
use crate::MSG_MAX_SIZE;

/// CRC-16-CCITT polynomial
pub const CRC16_POLY: u16 = 0x1021;

/// CRC-16-CCITT initial value
pub const CRC16_INIT: u16 = 0xFFFF;

/// Size of the checksum on the wire
pub const CRC16_SIZE: usize = 2;

/// Largest checksum-protected unit (header + payload + CRC)
pub type Checked = Vec<u8, MSG_MAX_SIZE>;

const TABLE: [u16; 256] = build_table();

const fn build_table() -> [u16; 256] {
    let mut table = [0u16; 256];
    let mut i = 0;
    while i < 256 {
        let mut crc = (i as u16) << 8;
        let mut bit = 0;
        while bit < 8 {
            crc = if crc & 0x8000 != 0 {
                (crc << 1) ^ CRC16_POLY
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

/// Calculate the checksum of `data` from the initial value
pub fn calculate(data: &[u8]) -> u16 {
    update(CRC16_INIT, data)
}

/// Continue a running checksum over more data
///
/// Pass [`CRC16_INIT`] for the first chunk; feeding a sequence in any number
/// of chunks gives the same result as [`calculate`] over the whole.
pub fn update(crc: u16, data: &[u8]) -> u16 {
    data.iter().fold(crc, |crc, &byte| {
        (crc << 8) ^ TABLE[usize::from((crc >> 8) as u8 ^ byte)]
    })
}

/// Returns true if `data` checksums to `expected`
pub fn verify(data: &[u8], expected: u16) -> bool {
    calculate(data) == expected
}

/// Return `data` followed by its little-endian checksum
pub fn append(data: &[u8]) -> Result<Checked, CrcError> {
    let too_large = CrcError::TooLarge {
        size: data.len(),
        max: MSG_MAX_SIZE - CRC16_SIZE,
    };

    let mut out = Checked::new();
    out.extend_from_slice(data).map_err(|_| too_large)?;
    out.extend_from_slice(&calculate(data).to_le_bytes())
        .map_err(|_| too_large)?;
    Ok(out)
}

/// Verify the trailing checksum and return the data it covers
pub fn check_and_strip(data_with_crc: &[u8]) -> Result<&[u8], CrcError> {
    if data_with_crc.len() < CRC16_SIZE {
        return Err(CrcError::TooShort {
            len: data_with_crc.len(),
        });
    }

    let (data, crc_bytes) = data_with_crc.split_at(data_with_crc.len() - CRC16_SIZE);
    let expected = u16::from_le_bytes([crc_bytes[0], crc_bytes[1]]);
    let actual = calculate(data);
    if actual != expected {
        return Err(CrcError::Mismatch { expected, actual });
    }

    Ok(data)
}
