//! Bit classification and frame assembly.

use embedded_hal::digital::PinState;

use crate::config::DecoderConfig;
use crate::error::Timeout;
use crate::scanner::{Cursor, SampleBuffer, measure_run};

/// Number of payload bytes in a frame, checksum included.
pub const FRAME_BYTES: usize = 5;

/// Number of data bits in a complete frame.
pub const FRAME_BITS: u8 = (FRAME_BYTES * 8) as u8;

/// Measured pulse widths of one data bit.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BitTiming {
    /// Time the line spent low.
    pub down_us: u64,
    /// Time the line spent high.
    pub up_us: u64,
}

impl BitTiming {
    /// Classifies the pulse pair: `true` when the high pulse outweighs the
    /// low pulse by the configured ratio.
    pub fn is_one(&self, config: &DecoderConfig) -> bool {
        let up = u128::from(self.up_us) * u128::from(config.ratio_numerator)
            / u128::from(config.ratio_denominator.max(1));
        up > u128::from(self.down_us)
    }
}

/// Reads one data bit.
///
/// Any high level still under the cursor is skipped first, then the low
/// pulse and the following high pulse are measured. The returned cursor sits
/// on the low that starts the next bit.
///
/// A [`Timeout`] here usually means the sensor finished sending and the line
/// went idle.
pub fn classify_bit(
    buffer: &SampleBuffer<'_>,
    cursor: Cursor,
    config: &DecoderConfig,
) -> Result<(bool, BitTiming, Cursor), Timeout> {
    let (_, cursor) = measure_run(buffer, cursor, PinState::Low, config)?;
    let (down, cursor) = measure_run(buffer, cursor, PinState::High, config)?;
    let (up, cursor) = measure_run(buffer, cursor, PinState::Low, config)?;

    let timing = BitTiming {
        down_us: down.duration_us,
        up_us: up.duration_us,
    };
    let bit = timing.is_one(config);

    #[cfg(feature = "defmt")]
    defmt::trace!(
        "bit: down {=u64}us, up {=u64}us -> {=bool}",
        timing.down_us,
        timing.up_us,
        bit
    );

    Ok((bit, timing, cursor))
}

/// Five payload bytes, filled most-significant bit first.
///
/// Bytes not reached by a short read stay zero.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Frame {
    bytes: [u8; FRAME_BYTES],
    bits: u8,
}

impl Frame {
    /// Builds a complete frame from raw bytes.
    pub fn from_bytes(bytes: [u8; FRAME_BYTES]) -> Self {
        Frame {
            bytes,
            bits: FRAME_BITS,
        }
    }

    /// All five bytes, checksum last.
    pub fn bytes(&self) -> &[u8; FRAME_BYTES] {
        &self.bytes
    }

    /// Number of bits actually decoded into this frame.
    pub fn bits_decoded(&self) -> u8 {
        self.bits
    }

    /// `true` when fewer than 40 bits were decoded.
    pub fn is_truncated(&self) -> bool {
        self.bits < FRAME_BITS
    }

    /// The four data bytes: humidity high/low, temperature high/low.
    pub fn payload(&self) -> [u8; 4] {
        let [hum_hi, hum_lo, temp_hi, temp_lo, _] = self.bytes;
        [hum_hi, hum_lo, temp_hi, temp_lo]
    }

    /// The checksum byte as received.
    pub fn checksum(&self) -> u8 {
        self.bytes[FRAME_BYTES - 1]
    }

    fn is_full(&self) -> bool {
        self.bits >= FRAME_BITS
    }

    /// Shifts `bit` into the byte currently being filled. Bits offered to a
    /// full frame are dropped.
    fn push_bit(&mut self, bit: bool) {
        if self.is_full() {
            return;
        }
        let byte = &mut self.bytes[usize::from(self.bits / 8)];
        *byte = (*byte << 1) | u8::from(bit);
        self.bits += 1;
    }
}

/// Reads up to 40 bits into a [`Frame`].
///
/// Stops at the first classifier timeout and keeps whatever was decoded so
/// far; [`Frame::is_truncated`] tells a short read from a complete one.
pub fn assemble(
    buffer: &SampleBuffer<'_>,
    cursor: Cursor,
    config: &DecoderConfig,
) -> (Frame, Cursor) {
    let mut frame = Frame::default();
    let mut cursor = cursor;

    while !frame.is_full() {
        match classify_bit(buffer, cursor, config) {
            Ok((bit, _, next)) => {
                frame.push_bit(bit);
                cursor = next;
            }
            Err(Timeout) => break,
        }
    }

    #[cfg(feature = "defmt")]
    if frame.is_truncated() {
        defmt::warn!("frame truncated after {=u8} bits", frame.bits);
    }

    (frame, cursor)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Nominal sensor timings at 1 MHz.
    pub(crate) const LOW_US: usize = 50;
    pub(crate) const ZERO_HIGH_US: usize = 26;
    pub(crate) const ONE_HIGH_US: usize = 70;

    /// Appends the waveform for `bytes`, each bit a 50us low followed by a
    /// 26us or 70us high, and closes with the sensor's trailing low.
    pub(crate) fn encode_bytes(out: &mut Vec<bool>, bytes: &[u8]) {
        for byte in bytes {
            for i in 0..8 {
                let bit = (byte >> (7 - i)) & 1 == 1;
                out.extend(core::iter::repeat_n(false, LOW_US));
                let high = if bit { ONE_HIGH_US } else { ZERO_HIGH_US };
                out.extend(core::iter::repeat_n(true, high));
            }
        }
        out.extend(core::iter::repeat_n(false, LOW_US));
    }

    fn buffer_of(samples: &[bool]) -> SampleBuffer<'_> {
        SampleBuffer::new(samples, 1_000_000)
    }

    #[test]
    fn test_ratio_threshold() {
        let config = DecoderConfig::default();
        assert!(BitTiming { down_us: 50, up_us: 70 }.is_one(&config));
        assert!(!BitTiming { down_us: 50, up_us: 26 }.is_one(&config));
        // 20 * 3 == 30 * 2 sits exactly on the boundary.
        assert!(!BitTiming { down_us: 30, up_us: 20 }.is_one(&config));
        assert!(BitTiming { down_us: 30, up_us: 21 }.is_one(&config));
    }

    #[test]
    fn test_ratio_with_huge_durations() {
        let config = DecoderConfig::default().with_ratio(u32::MAX, 1);
        let timing = BitTiming {
            down_us: u64::MAX,
            up_us: u64::MAX / 2,
        };
        assert!(timing.is_one(&config));
        assert!(!BitTiming { down_us: u64::MAX, up_us: 0 }.is_one(&config));
    }

    #[test]
    fn test_custom_ratio() {
        let config = DecoderConfig::default().with_ratio(1, 1);
        assert!(!BitTiming { down_us: 50, up_us: 50 }.is_one(&config));
        assert!(BitTiming { down_us: 50, up_us: 51 }.is_one(&config));
    }

    #[test]
    fn test_classify_bit_one_and_zero() {
        let mut samples = Vec::new();
        encode_bytes(&mut samples, &[0b1000_0000]);
        let buffer = buffer_of(&samples);
        let config = DecoderConfig::default();

        let (bit, timing, cursor) = classify_bit(&buffer, buffer.start(), &config).unwrap();
        assert!(bit);
        assert_eq!(timing, BitTiming { down_us: 50, up_us: 70 });
        assert_eq!(cursor.position(), 120);

        let (bit, timing, _) = classify_bit(&buffer, cursor, &config).unwrap();
        assert!(!bit);
        assert_eq!(timing, BitTiming { down_us: 50, up_us: 26 });
    }

    #[test]
    fn test_classify_bit_skips_leading_high() {
        let mut samples = vec![true; 80];
        encode_bytes(&mut samples, &[0xFF]);
        let buffer = buffer_of(&samples);

        let (bit, timing, _) =
            classify_bit(&buffer, buffer.start(), &DecoderConfig::default()).unwrap();
        assert!(bit);
        assert_eq!(timing.down_us, 50);
    }

    #[test]
    fn test_classify_bit_is_deterministic() {
        let mut samples = Vec::new();
        encode_bytes(&mut samples, &[0xA5]);
        let buffer = buffer_of(&samples);
        let config = DecoderConfig::default();

        let first = classify_bit(&buffer, buffer.start(), &config);
        let second = classify_bit(&buffer, buffer.start(), &config);
        assert_eq!(first, second);
    }

    #[test]
    fn test_classify_bit_times_out_on_idle_line() {
        let samples = vec![false, false, true, true];
        let buffer = buffer_of(&samples);
        assert_eq!(
            classify_bit(&buffer, buffer.start(), &DecoderConfig::default()),
            Err(Timeout)
        );
    }

    #[test]
    fn test_assemble_full_frame() {
        let bytes = [0x02, 0x3B, 0x01, 0x04, 0x40];
        let mut samples = Vec::new();
        encode_bytes(&mut samples, &bytes);
        let buffer = buffer_of(&samples);

        let (frame, _) = assemble(&buffer, buffer.start(), &DecoderConfig::default());
        assert_eq!(frame.bytes(), &bytes);
        assert_eq!(frame.bits_decoded(), 40);
        assert!(!frame.is_truncated());
    }

    #[test]
    fn test_assemble_stops_after_forty_bits() {
        let mut samples = Vec::new();
        encode_bytes(&mut samples, &[0xFF; 7]);
        let buffer = buffer_of(&samples);

        let (frame, cursor) = assemble(&buffer, buffer.start(), &DecoderConfig::default());
        assert_eq!(frame.bytes(), &[0xFF; 5]);
        assert_eq!(frame.bits_decoded(), 40);
        assert_eq!(cursor.position(), 40 * (LOW_US + ONE_HIGH_US));
    }

    #[test]
    fn test_assemble_truncated_frame_zero_fills() {
        let mut samples = Vec::new();
        encode_bytes(&mut samples, &[0x02, 0x3B, 0x01, 0x04]);
        // One extra bit, then the line idles high.
        samples.extend(core::iter::repeat_n(true, ONE_HIGH_US));
        samples.extend(core::iter::repeat_n(false, 1));
        samples.extend(core::iter::repeat_n(true, 2000));
        let buffer = buffer_of(&samples);

        let (frame, _) = assemble(&buffer, buffer.start(), &DecoderConfig::default());
        assert_eq!(frame.bits_decoded(), 33);
        assert!(frame.is_truncated());
        assert_eq!(frame.payload(), [0x02, 0x3B, 0x01, 0x04]);
        // The partial checksum byte holds only the single bit shifted in.
        assert_eq!(frame.checksum(), 0x01);
    }

    #[test]
    fn test_assemble_empty_capture() {
        let buffer = buffer_of(&[]);
        let (frame, cursor) = assemble(&buffer, buffer.start(), &DecoderConfig::default());
        assert_eq!(frame, Frame::default());
        assert_eq!(frame.bits_decoded(), 0);
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn test_push_bit_refuses_past_capacity() {
        let mut frame = Frame::from_bytes([0; FRAME_BYTES]);
        frame.push_bit(true);
        assert_eq!(frame.bytes(), &[0; FRAME_BYTES]);
        assert_eq!(frame.bits_decoded(), FRAME_BITS);
    }
}
