use crate::frame::Frame;

/// Sum of the four payload bytes, wrapping at 8 bits.
pub fn checksum(payload: &[u8; 4]) -> u8 {
    payload.iter().fold(0u8, |sum, v| sum.wrapping_add(*v))
}

/// Whether the frame's last byte matches the sum of the first four.
pub fn validate(frame: &Frame) -> bool {
    checksum(&frame.payload()) == frame.checksum()
}
