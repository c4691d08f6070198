use core::fmt::Debug;

use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
};

use crate::config::DecoderConfig;
use crate::decoder::{self, Decoded};
use crate::error::DhtError;
use crate::scanner::SampleBuffer;

/// Bit-banged capture of a DHT21/AM2302 response over a single GPIO pin.
///
/// The driver only wakes the sensor and samples the line into a
/// caller-provided buffer; decoding runs afterwards over the finished
/// capture. Retrying and pacing reads is left to the caller.
pub struct Dht21<PIN, D> {
    pin: PIN,
    delay: D,
    config: DecoderConfig,
}

impl<PIN, DELAY, E> Dht21<PIN, DELAY>
where
    PIN: InputPin<Error = E> + OutputPin<Error = E>,
    DELAY: DelayNs,
    E: Debug,
{
    /// Creates a new instance of the DHT21 driver with the default timing.
    ///
    /// # Arguments
    ///
    /// * `pin` - The GPIO pin connected to the DHT21 data line. Must support both input and output.
    /// * `delay` - A delay provider implementing the `DelayNs` trait.
    pub fn new(pin: PIN, delay: DELAY) -> Self {
        Self::with_config(pin, delay, DecoderConfig::default())
    }

    /// Creates a driver with an explicit timing profile.
    pub fn with_config(pin: PIN, delay: DELAY, config: DecoderConfig) -> Self {
        Dht21 { pin, delay, config }
    }

    /// The timing profile captures are taken and decoded with.
    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Releases the pin and delay provider.
    pub fn release(self) -> (PIN, DELAY) {
        (self.pin, self.delay)
    }

    /// Wakes the sensor and decodes its response.
    ///
    /// `samples` is scratch space for the capture; it must be long enough to
    /// hold the handshake, all 40 bits and the trailing low at the
    /// configured sample rate.
    ///
    /// # Returns
    ///
    /// * `Ok(Decoded)` once a handshake was found, even if the frame is short
    ///   or its checksum does not match.
    /// * `Err(DhtError)` on pin failure or when no handshake was found.
    pub fn read(&mut self, samples: &mut [bool]) -> Result<Decoded, DhtError<E>> {
        let buffer = self.capture(samples)?;
        let decoded = decoder::decode(&buffer, &self.config).map_err(DhtError::Decode)?;

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "read: {=u16} humidity, {=i16} temperature (tenths), valid {=bool}",
            decoded.reading.humidity_tenths,
            decoded.reading.temperature_tenths,
            decoded.is_valid()
        );

        Ok(decoded)
    }

    /// Wakes the sensor and fills `samples` with the line level, one sample
    /// per configured sample period.
    pub fn capture<'b>(
        &mut self,
        samples: &'b mut [bool],
    ) -> Result<SampleBuffer<'b>, DhtError<E>> {
        if samples.is_empty() {
            return Err(DhtError::EmptyCapture);
        }
        self.config.validate().map_err(DhtError::Decode)?;

        self.start()?;

        let period_ns = self.config.sample_period_ns();
        for sample in samples.iter_mut() {
            *sample = self.pin.is_high()?;
            self.delay.delay_ns(period_ns);
        }

        Ok(SampleBuffer::new(samples, self.config.sample_rate_hz))
    }

    /// Sends the wake-up pulse: the line is held low, then released high.
    fn start(&mut self) -> Result<(), DhtError<E>> {
        self.pin.set_low()?;
        self.delay.delay_us(self.config.start_pulse_us);
        self.pin.set_high()?;
        Ok(())
    }
}
