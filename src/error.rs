use core::fmt::Debug;

/// A wait for a level transition ran past the configured ceiling, or off the
/// end of the capture.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("no level transition within the run ceiling")]
pub struct Timeout;

/// Reasons a capture cannot be turned into a reading.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// The start-of-frame sequence did not complete. `stage` is the index of
    /// the handshake wait that timed out.
    #[error("handshake timed out at stage {stage}")]
    HandshakeTimeout { stage: u8 },
    /// The configured sample rate is zero.
    #[error("sample rate must be non-zero")]
    ZeroSampleRate,
    /// The configured sample rate is faster than one sample per nanosecond.
    #[error("sample rate {rate_hz} Hz exceeds 1 GHz")]
    SampleRateTooHigh { rate_hz: u32 },
    /// The capture was taken at a different rate than the one configured.
    #[error("capture sampled at {buffer_hz} Hz, configured for {config_hz} Hz")]
    SampleRateMismatch { config_hz: u32, buffer_hz: u32 },
    /// The configured bit ratio has a zero denominator.
    #[error("bit ratio denominator must be non-zero")]
    ZeroRatioDenominator,
}

/// Possible errors from the DHT21 transport adapter.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum DhtError<E>
where
    E: Debug,
{
    /// Error from the GPIO pin (input/output).
    #[error("pin error: {0:?}")]
    PinError(E),
    /// The capture was taken but could not be decoded.
    #[error("decode failed: {0}")]
    Decode(DecodeError),
    /// The caller supplied a zero-length capture buffer.
    #[error("capture buffer is empty")]
    EmptyCapture,
}

impl<E: Debug> From<E> for DhtError<E> {
    fn from(value: E) -> Self {
        Self::PinError(value)
    }
}
