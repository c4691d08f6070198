use crate::config::DecoderConfig;
use crate::error::DecodeError;
use crate::scanner::{Cursor, SampleBuffer, measure_run};

/// Lower bound of the sensor's nominal response time, in microseconds.
pub const NOMINAL_RESPONSE_MIN_US: u64 = 95;

/// Upper bound of the sensor's nominal response time, in microseconds.
pub const NOMINAL_RESPONSE_MAX_US: u64 = 285;

/// A confirmed start-of-frame sequence.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Handshake {
    /// Total time spent across all handshake waits. Informational only.
    pub elapsed_us: u64,
}

impl Handshake {
    /// Whether the sensor answered inside its datasheet window.
    pub fn within_nominal(&self) -> bool {
        (NOMINAL_RESPONSE_MIN_US..=NOMINAL_RESPONSE_MAX_US).contains(&self.elapsed_us)
    }
}

/// Confirms the sensor's start-of-frame sequence.
///
/// Runs one wait per stage of `config.handshake`. On success the returned
/// cursor sits on the first sample after the last handshake transition.
/// Any stage timing out abandons the whole capture.
pub fn detect(
    buffer: &SampleBuffer<'_>,
    cursor: Cursor,
    config: &DecoderConfig,
) -> Result<(Handshake, Cursor), DecodeError> {
    let mut cursor = cursor;
    let mut elapsed_us: u64 = 0;

    for (stage, &expected) in config.handshake.stages().iter().enumerate() {
        let (run, next) = measure_run(buffer, cursor, expected, config).map_err(|_| {
            DecodeError::HandshakeTimeout {
                stage: stage as u8,
            }
        })?;
        elapsed_us = elapsed_us.saturating_add(run.duration_us);
        cursor = next;
    }

    #[cfg(feature = "defmt")]
    defmt::debug!("handshake took {=u64}us", elapsed_us);

    Ok((Handshake { elapsed_us }, cursor))
}
