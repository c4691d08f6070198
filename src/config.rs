use embedded_hal::digital::PinState;

use crate::error::DecodeError;

/// Sample rate the reference timings are expressed in.
pub const DEFAULT_SAMPLE_RATE_HZ: u32 = 1_000_000;

/// Longest run, in samples, a single wait may cover before it times out.
pub const DEFAULT_MAX_RUN_SAMPLES: u32 = 1000;

/// Fastest sample rate with a non-zero sample period.
pub const MAX_SAMPLE_RATE_HZ: u32 = 1_000_000_000;

/// Length of the host's wake-up pulse, in microseconds.
pub const DEFAULT_START_PULSE_US: u32 = 1000;

/// Start-of-frame sequences the sensor may present at the head of a capture.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HandshakeVariant {
    /// Wait for high, then wait for low.
    #[default]
    Standard,
    /// Wait for high, wait for low, then wait for high again.
    Extended,
}

impl HandshakeVariant {
    /// The level each handshake stage waits for, in order.
    pub fn stages(self) -> &'static [PinState] {
        match self {
            HandshakeVariant::Standard => &[PinState::High, PinState::Low],
            HandshakeVariant::Extended => &[PinState::High, PinState::Low, PinState::High],
        }
    }
}

/// Timing profile for one decode cycle.
///
/// Every operation takes the configuration explicitly, so a single build can
/// decode captures taken at different rates or against different thresholds.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecoderConfig {
    /// Samples per second of the capture. Decoding a buffer taken at any
    /// other rate is rejected.
    pub sample_rate_hz: u32,
    /// Ceiling for a single run measurement.
    pub max_run_samples: u32,
    /// A bit is `1` when `up * numerator / denominator > down`.
    pub ratio_numerator: u32,
    /// See [`DecoderConfig::ratio_numerator`].
    pub ratio_denominator: u32,
    /// Which start-of-frame sequence to expect.
    pub handshake: HandshakeVariant,
    /// Wake-up pulse length used by the transport adapter.
    pub start_pulse_us: u32,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        DecoderConfig {
            sample_rate_hz: DEFAULT_SAMPLE_RATE_HZ,
            max_run_samples: DEFAULT_MAX_RUN_SAMPLES,
            ratio_numerator: 3,
            ratio_denominator: 2,
            handshake: HandshakeVariant::Standard,
            start_pulse_us: DEFAULT_START_PULSE_US,
        }
    }
}

impl DecoderConfig {
    /// Sets the capture rate.
    pub fn with_sample_rate(mut self, sample_rate_hz: u32) -> Self {
        self.sample_rate_hz = sample_rate_hz;
        self
    }

    /// Sets the longest run a single wait may cover.
    pub fn with_max_run_samples(mut self, max_run_samples: u32) -> Self {
        self.max_run_samples = max_run_samples;
        self
    }

    /// Sets the bit threshold to `up * numerator / denominator > down`.
    pub fn with_ratio(mut self, numerator: u32, denominator: u32) -> Self {
        self.ratio_numerator = numerator;
        self.ratio_denominator = denominator;
        self
    }

    /// Selects the start-of-frame sequence.
    pub fn with_handshake(mut self, handshake: HandshakeVariant) -> Self {
        self.handshake = handshake;
        self
    }

    /// Sets the wake-up pulse length for the transport adapter.
    pub fn with_start_pulse_us(mut self, start_pulse_us: u32) -> Self {
        self.start_pulse_us = start_pulse_us;
        self
    }

    /// Rejects configurations that would divide by zero or sample with no
    /// delay between reads.
    pub fn validate(&self) -> Result<(), DecodeError> {
        if self.sample_rate_hz == 0 {
            return Err(DecodeError::ZeroSampleRate);
        }
        if self.sample_rate_hz > MAX_SAMPLE_RATE_HZ {
            return Err(DecodeError::SampleRateTooHigh {
                rate_hz: self.sample_rate_hz,
            });
        }
        if self.ratio_denominator == 0 {
            return Err(DecodeError::ZeroRatioDenominator);
        }
        Ok(())
    }

    /// Time between two samples, rounded down to whole nanoseconds.
    pub fn sample_period_ns(&self) -> u32 {
        1_000_000_000 / self.sample_rate_hz.max(1)
    }
}
