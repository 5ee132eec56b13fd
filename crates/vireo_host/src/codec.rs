//! Parameter Payload Codec
//!
//! Wire encodings for the numeric parameter protocol. All integers and
//! floats are little-endian. Four shapes exist:
//!
//! | Shape           | Layout                                              |
//! |-----------------|-----------------------------------------------------|
//! | short scalar    | `i16`                                               |
//! | float array     | `f32` sequence                                      |
//! | char buffer     | `sub_key: i32`, `len: i32`, UTF-8 bytes             |
//! | impulse buffer  | `sub_key: i32`, `channels: i32`, `frames: i32`, `f32` samples |
//!
//! Sub-keyed shapes multiplex several logical targets (VDC document,
//! graphic EQ string, liveprog path, convolver impulse) over the two
//! generic buffer-write parameter ids.

/// Encode a boolean as the protocol's short representation.
pub fn encode_bool(value: bool) -> Vec<u8> {
    encode_short(i16::from(value))
}

/// Encode a short scalar.
pub fn encode_short(value: i16) -> Vec<u8> {
    value.to_le_bytes().to_vec()
}

/// Encode a packed float array.
pub fn encode_float_array(values: &[f32]) -> Vec<u8> {
    let mut out = Vec::with_capacity(values.len() * 4);
    for v in values {
        out.extend_from_slice(&v.to_le_bytes());
    }
    out
}

/// Encode a length-prefixed text buffer addressed by sub-key.
pub fn encode_char_buffer(sub_key: u32, text: &str) -> Vec<u8> {
    let bytes = text.as_bytes();
    let mut out = Vec::with_capacity(8 + bytes.len());
    out.extend_from_slice(&(sub_key as i32).to_le_bytes());
    out.extend_from_slice(&(bytes.len() as i32).to_le_bytes());
    out.extend_from_slice(bytes);
    out
}

/// Encode a length-prefixed impulse-response buffer addressed by sub-key.
///
/// `frames` is derived from the sample count and channel layout; a channel
/// count of zero yields zero frames rather than panicking.
pub fn encode_impulse_buffer(sub_key: u32, samples: &[f32], channels: i32) -> Vec<u8> {
    let frames = if channels > 0 {
        samples.len() as i32 / channels
    } else {
        0
    };
    let mut out = Vec::with_capacity(12 + samples.len() * 4);
    out.extend_from_slice(&(sub_key as i32).to_le_bytes());
    out.extend_from_slice(&channels.to_le_bytes());
    out.extend_from_slice(&frames.to_le_bytes());
    for s in samples {
        out.extend_from_slice(&s.to_le_bytes());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bool_encoding() {
        assert_eq!(encode_bool(true), vec![1, 0]);
        assert_eq!(encode_bool(false), vec![0, 0]);
    }

    #[test]
    fn test_short_encoding() {
        assert_eq!(encode_short(258), vec![2, 1]);
        assert_eq!(encode_short(-1), vec![0xff, 0xff]);
    }

    #[test]
    fn test_float_array_layout() {
        let payload = encode_float_array(&[1.0, -2.5]);
        assert_eq!(payload.len(), 8);
        assert_eq!(&payload[0..4], &1.0f32.to_le_bytes());
        assert_eq!(&payload[4..8], &(-2.5f32).to_le_bytes());
    }

    #[test]
    fn test_char_buffer_layout() {
        let payload = encode_char_buffer(10006, "GraphicEQ: 0.0 0.0;");
        assert_eq!(&payload[0..4], &10006i32.to_le_bytes());
        assert_eq!(&payload[4..8], &19i32.to_le_bytes());
        assert_eq!(&payload[8..], b"GraphicEQ: 0.0 0.0;");
    }

    #[test]
    fn test_impulse_buffer_layout() {
        // 4 samples, 2 channels => 2 frames
        let payload = encode_impulse_buffer(10004, &[0.0, 0.1, 0.2, 0.3], 2);
        assert_eq!(&payload[0..4], &10004i32.to_le_bytes());
        assert_eq!(&payload[4..8], &2i32.to_le_bytes());
        assert_eq!(&payload[8..12], &2i32.to_le_bytes());
        assert_eq!(payload.len(), 12 + 16);
    }

    #[test]
    fn test_impulse_buffer_zero_channels() {
        let payload = encode_impulse_buffer(10004, &[0.0, 0.1], 0);
        assert_eq!(&payload[4..8], &0i32.to_le_bytes());
        assert_eq!(&payload[8..12], &0i32.to_le_bytes());
    }
}
