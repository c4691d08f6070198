//! Run-length measurement over a captured sample buffer.

use embedded_hal::digital::PinState;

use crate::config::DecoderConfig;
use crate::error::Timeout;

/// Line levels captured at a fixed rate, `true` meaning high.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SampleBuffer<'a> {
    samples: &'a [bool],
    sample_rate_hz: u32,
}

impl<'a> SampleBuffer<'a> {
    /// Wraps `samples` taken at `sample_rate_hz`.
    pub fn new(samples: &'a [bool], sample_rate_hz: u32) -> Self {
        SampleBuffer {
            samples,
            sample_rate_hz,
        }
    }

    /// The captured levels, oldest first.
    pub fn samples(&self) -> &'a [bool] {
        self.samples
    }

    /// Samples per second of the capture. Run durations are converted
    /// with this rate.
    pub fn sample_rate_hz(&self) -> u32 {
        self.sample_rate_hz
    }

    /// Number of samples captured.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// `true` when nothing was captured.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Cursor positioned on the first sample.
    pub fn start(&self) -> Cursor {
        Cursor {
            position: 0,
            sample_rate_hz: self.sample_rate_hz,
        }
    }

    fn level_at(&self, position: usize) -> Option<PinState> {
        self.samples.get(position).map(|&s| PinState::from(s))
    }
}

/// Read position within a [`SampleBuffer`].
///
/// Cursors only move forward: every scan returns a new cursor at or after
/// the one it was given.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cursor {
    position: usize,
    sample_rate_hz: u32,
}

impl Cursor {
    /// Index of the sample under the cursor.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Rate of the buffer this cursor walks.
    pub fn sample_rate_hz(&self) -> u32 {
        self.sample_rate_hz
    }
}

/// A completed run of constant level.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PulseRun {
    /// Samples spent before the expected level appeared.
    pub samples: u32,
    /// `samples` converted to microseconds, truncated.
    pub duration_us: u64,
}

/// Converts a sample count to microseconds at `sample_rate_hz`.
///
/// The result is exact for any `u32` sample count and rate.
pub fn samples_to_us(samples: u32, sample_rate_hz: u32) -> u64 {
    u64::from(samples) * 1_000_000 / u64::from(sample_rate_hz.max(1))
}

/// Waits for the line to reach `expected`, starting at `cursor`.
///
/// Counts the samples that differ from `expected` before the first one that
/// matches. The returned cursor sits on that matching sample, so the next
/// wait starts measuring the run that just began. If the sample under the
/// cursor already matches, the run is zero samples long.
///
/// Fails with [`Timeout`] when more than `config.max_run_samples` samples
/// pass without a match, or when the capture ends first.
pub fn measure_run(
    buffer: &SampleBuffer<'_>,
    cursor: Cursor,
    expected: PinState,
    config: &DecoderConfig,
) -> Result<(PulseRun, Cursor), Timeout> {
    let mut position = cursor.position;
    let mut samples: u32 = 0;

    loop {
        match buffer.level_at(position) {
            Some(level) if level == expected => break,
            Some(_) => {
                samples += 1;
                if samples > config.max_run_samples {
                    return Err(Timeout);
                }
                position += 1;
            }
            None => return Err(Timeout),
        }
    }

    let run = PulseRun {
        samples,
        duration_us: samples_to_us(samples, cursor.sample_rate_hz),
    };
    Ok((
        run,
        Cursor {
            position,
            sample_rate_hz: cursor.sample_rate_hz,
        },
    ))
}
