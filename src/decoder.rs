use crate::config::DecoderConfig;
use crate::error::DecodeError;
use crate::frame::{self, Frame};
use crate::handshake::{self, Handshake};
use crate::reading::{self, Reading};
use crate::scanner::SampleBuffer;

/// Everything one decode cycle learned from a capture.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Decoded {
    pub handshake: Handshake,
    pub frame: Frame,
    pub reading: Reading,
}

impl Decoded {
    /// `true` when the sensor stopped sending before all 40 bits arrived.
    /// The reading is still filled in but should not be trusted.
    pub fn is_truncated(&self) -> bool {
        self.frame.is_truncated()
    }

    /// A complete frame with a matching checksum.
    pub fn is_valid(&self) -> bool {
        !self.is_truncated() && self.reading.checksum_valid
    }
}

/// Decodes one capture into a reading.
///
/// Only a missing handshake, an unusable configuration or a capture taken at
/// a rate other than `config.sample_rate_hz` is an error.
/// Short frames and checksum mismatches still produce a [`Decoded`].
pub fn decode(
    buffer: &SampleBuffer<'_>,
    config: &DecoderConfig,
) -> Result<Decoded, DecodeError> {
    config.validate()?;
    if buffer.sample_rate_hz() != config.sample_rate_hz {
        return Err(DecodeError::SampleRateMismatch {
            config_hz: config.sample_rate_hz,
            buffer_hz: buffer.sample_rate_hz(),
        });
    }

    let (handshake, cursor) = handshake::detect(buffer, buffer.start(), config)?;
    let (frame, _) = frame::assemble(buffer, cursor, config);
    let reading = reading::decode(&frame);

    Ok(Decoded {
        handshake,
        frame,
        reading,
    })
}
