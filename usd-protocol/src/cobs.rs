//! COBS (Consistent Overhead Byte Stuffing)
//!
//! Encodes data so it contains no zero bytes, leaving 0x00 free to act as the
//! frame delimiter on the serial link.
//!
//! Encoded layout:
//! ```text
//! ┌──────┬───────────────┬──────┬───────────────┬─────┐
//! │ CODE │ CODE-1 bytes  │ CODE │ CODE-1 bytes  │ ... │
//! └──────┴───────────────┴──────┴───────────────┴─────┘
//! ```
//! Each code byte is the distance to the next (removed) zero, or to the end
//! of the data. Code 0xFF marks a full block of 254 non-zero bytes that is
//! not followed by a zero.

use heapless::Vec;

use crate::error::CobsError;

/// Maximum input size for encoding
pub const COBS_MAX_INPUT_SIZE: usize = 250;

/// Maximum encoded size (without delimiter)
pub const COBS_MAX_OUTPUT_SIZE: usize = COBS_MAX_INPUT_SIZE + 2;

/// Frame delimiter
pub const COBS_DELIMITER: u8 = 0x00;

/// Largest code value; closes a block without an implied zero
const MAX_CODE: u8 = 0xFF;

/// COBS-encoded bytes, without delimiter
pub type Encoded = Vec<u8, COBS_MAX_OUTPUT_SIZE>;

/// COBS-encoded bytes plus trailing delimiter
pub type Framed = Vec<u8, { COBS_MAX_OUTPUT_SIZE + 1 }>;

/// Decoded bytes
pub type Decoded = Vec<u8, COBS_MAX_OUTPUT_SIZE>;

/// Worst-case encoded length for `len` input bytes
pub const fn max_encoded_len(len: usize) -> usize {
    len + len / 254 + 1
}

/// Encode `data` into `output`
///
/// Returns the number of bytes written. The trailing delimiter is not
/// written.
pub fn encode_into(data: &[u8], output: &mut [u8]) -> Result<usize, CobsError> {
    if data.len() > COBS_MAX_INPUT_SIZE {
        return Err(CobsError::InputTooLarge {
            size: data.len(),
            max: COBS_MAX_INPUT_SIZE,
        });
    }
    if output.len() < max_encoded_len(data.len()) {
        return Err(CobsError::BufferTooSmall);
    }

    // Code bytes are written as placeholders and patched once the block
    // length is known
    let mut code_idx = 0;
    let mut write_idx = 1;
    let mut code: u8 = 1;

    for &byte in data {
        if byte == 0 {
            output[code_idx] = code;
            code_idx = write_idx;
            write_idx += 1;
            code = 1;
        } else {
            output[write_idx] = byte;
            write_idx += 1;
            code += 1;

            if code == MAX_CODE {
                output[code_idx] = code;
                code_idx = write_idx;
                write_idx += 1;
                code = 1;
            }
        }
    }

    output[code_idx] = code;
    Ok(write_idx)
}

/// Encode `data`
///
/// Empty input encodes to `[0x01]`.
pub fn encode(data: &[u8]) -> Result<Encoded, CobsError> {
    let mut buffer = [0u8; COBS_MAX_OUTPUT_SIZE];
    let len = encode_into(data, &mut buffer)?;
    Vec::from_slice(&buffer[..len]).map_err(|_| CobsError::BufferTooSmall)
}

/// Decode COBS `data` (without delimiter) into `output`
///
/// Returns the number of bytes written.
pub fn decode_into(data: &[u8], output: &mut [u8]) -> Result<usize, CobsError> {
    let mut read_idx = 0;
    let mut write_idx = 0;

    while read_idx < data.len() {
        let code = data[read_idx];
        if code == 0 {
            return Err(CobsError::ZeroCode { offset: read_idx });
        }

        let block_start = read_idx;
        read_idx += 1;

        let block_end = read_idx + usize::from(code) - 1;
        if block_end > data.len() {
            return Err(CobsError::Truncated {
                offset: block_start,
            });
        }

        for (offset, &byte) in data[read_idx..block_end].iter().enumerate() {
            if byte == 0 {
                return Err(CobsError::UnexpectedZero {
                    offset: read_idx + offset,
                });
            }
            *output.get_mut(write_idx).ok_or(CobsError::BufferTooSmall)? = byte;
            write_idx += 1;
        }
        read_idx = block_end;

        if code < MAX_CODE && read_idx < data.len() {
            *output.get_mut(write_idx).ok_or(CobsError::BufferTooSmall)? = 0;
            write_idx += 1;
        }
    }

    Ok(write_idx)
}

/// Decode COBS `data` (without delimiter)
///
/// Input longer than [`COBS_MAX_OUTPUT_SIZE`] cannot come from [`encode`]
/// and fails with [`CobsError::InputTooLarge`].
pub fn decode(data: &[u8]) -> Result<Decoded, CobsError> {
    if data.len() > COBS_MAX_OUTPUT_SIZE {
        return Err(CobsError::InputTooLarge {
            size: data.len(),
            max: COBS_MAX_OUTPUT_SIZE,
        });
    }

    let mut buffer = [0u8; COBS_MAX_OUTPUT_SIZE];
    let len = decode_into(data, &mut buffer)?;
    Vec::from_slice(&buffer[..len]).map_err(|_| CobsError::BufferTooSmall)
}

/// Encode `data` and append the delimiter
pub fn frame(data: &[u8]) -> Result<Framed, CobsError> {
    let mut buffer = [0u8; COBS_MAX_OUTPUT_SIZE + 1];
    let len = encode_into(data, &mut buffer)?;
    buffer[len] = COBS_DELIMITER;
    Vec::from_slice(&buffer[..=len]).map_err(|_| CobsError::BufferTooSmall)
}

/// Strip the trailing delimiter and decode
pub fn unframe(data: &[u8]) -> Result<Decoded, CobsError> {
    match data.split_last() {
        Some((&COBS_DELIMITER, encoded)) => decode(encoded),
        _ => Err(CobsError::MissingDelimiter),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_no_zeros() {
        let encoded = encode(&[0x01, 0x02, 0x03]).unwrap();
        assert_eq!(encoded.as_slice(), &[0x04, 0x01, 0x02, 0x03]);
    }

    #[test]
    fn test_encode_single_zero() {
        let encoded = encode(&[0x00]).unwrap();
        assert_eq!(encoded.as_slice(), &[0x01, 0x01]);
    }

    #[test]
    fn test_encode_mixed() {
        let encoded = encode(&[0x01, 0x00, 0x02]).unwrap();
        assert_eq!(encoded.as_slice(), &[0x02, 0x01, 0x02, 0x02]);
    }

    #[test]
    fn test_encode_empty() {
        let encoded = encode(&[]).unwrap();
        assert_eq!(encoded.as_slice(), &[0x01]);
    }

    #[test]
    fn test_decode_no_zeros() {
        let decoded = decode(&[0x04, 0x01, 0x02, 0x03]).unwrap();
        assert_eq!(decoded.as_slice(), &[0x01, 0x02, 0x03]);
    }

    #[test]
    fn test_decode_with_zero() {
        let decoded = decode(&[0x01, 0x01]).unwrap();
        assert_eq!(decoded.as_slice(), &[0x00]);
    }

    #[test]
    fn test_decode_empty() {
        assert!(decode(&[]).unwrap().is_empty());
        assert!(decode(&[0x01]).unwrap().is_empty());
    }

    #[test]
    fn test_roundtrip() {
        let original = [0x45, 0x00, 0x00, 0x2C, 0x4C, 0x79, 0x00, 0x05];
        let encoded = encode(&original).unwrap();
        let decoded = decode(&encoded).unwrap();
        assert_eq!(decoded.as_slice(), &original);
    }

    #[test]
    fn test_decode_zero_code_byte() {
        // Second block's code byte is zero
        assert_eq!(
            decode(&[0x03, 0x01, 0x02, 0x00]),
            Err(CobsError::ZeroCode { offset: 3 })
        );
    }

    #[test]
    fn test_decode_zero_inside_block() {
        assert_eq!(
            decode(&[0x03, 0x00, 0x01]),
            Err(CobsError::UnexpectedZero { offset: 1 })
        );
    }

    #[test]
    fn test_decode_block_past_end() {
        assert_eq!(
            decode(&[0x05, 0x01, 0x02]),
            Err(CobsError::Truncated { offset: 0 })
        );
    }

    #[test]
    fn test_encode_max_size() {
        let data = [0xFF; COBS_MAX_INPUT_SIZE];
        let encoded = encode(&data).unwrap();

        assert!(encoded.len() <= COBS_MAX_OUTPUT_SIZE);
        assert!(!encoded.contains(&0));
        assert_eq!(decode(&encoded).unwrap().as_slice(), &data[..]);
    }

    #[test]
    fn test_encode_too_large() {
        let data = [0xFF; COBS_MAX_INPUT_SIZE + 1];
        assert_eq!(
            encode(&data),
            Err(CobsError::InputTooLarge {
                size: 251,
                max: COBS_MAX_INPUT_SIZE
            })
        );
    }

    #[test]
    fn test_decode_full_block_without_trailing_zero() {
        // 254 non-zero bytes followed by a terminating one-byte block
        let mut encoded = [0x11u8; 256];
        encoded[0] = 0xFF;
        encoded[255] = 0x01;

        let mut output = [0u8; 256];
        let len = decode_into(&encoded, &mut output).unwrap();
        assert_eq!(len, 254);
        assert!(output[..len].iter().all(|&b| b == 0x11));
    }

    #[test]
    fn test_decode_oversized_input() {
        // Two full blocks: longer than any encoded frame
        let mut encoded = [0x11u8; 510];
        encoded[0] = 0xFF;
        encoded[255] = 0xFF;

        assert_eq!(
            decode(&encoded),
            Err(CobsError::InputTooLarge {
                size: 510,
                max: COBS_MAX_OUTPUT_SIZE
            })
        );

        let mut framed = [0x11u8; 511];
        framed[0] = 0xFF;
        framed[255] = 0xFF;
        framed[510] = COBS_DELIMITER;
        assert!(matches!(
            unframe(&framed),
            Err(CobsError::InputTooLarge { size: 510, .. })
        ));
    }

    #[test]
    fn test_encode_into_buffer_too_small() {
        let mut buffer = [0u8; 3];
        assert_eq!(
            encode_into(&[0x01, 0x02, 0x03], &mut buffer),
            Err(CobsError::BufferTooSmall)
        );
    }

    #[test]
    fn test_frame_unframe() {
        let framed = frame(&[0x01, 0x02, 0x03]).unwrap();
        assert_eq!(framed.last(), Some(&COBS_DELIMITER));
        assert_eq!(framed.iter().filter(|&&b| b == 0).count(), 1);

        let unframed = unframe(&framed).unwrap();
        assert_eq!(unframed.as_slice(), &[0x01, 0x02, 0x03]);
    }

    #[test]
    fn test_unframe_missing_delimiter() {
        assert_eq!(unframe(&[]), Err(CobsError::MissingDelimiter));
        assert_eq!(
            unframe(&[0x04, 0x01, 0x02, 0x03]),
            Err(CobsError::MissingDelimiter)
        );
    }
}
