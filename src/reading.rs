use crate::checksum;
use crate::frame::Frame;

/// Reading decoded from a DHT21 frame.
///
/// Values are kept as fixed-point tenths, exactly as the sensor sends them.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Reading {
    /// Relative humidity in tenths of a percent.
    pub humidity_tenths: u16,
    /// Temperature in tenths of a degree Celsius.
    pub temperature_tenths: i16,
    /// Whether the frame's checksum matched its payload.
    pub checksum_valid: bool,
}

impl Reading {
    /// Relative humidity in percent.
    pub fn relative_humidity(&self) -> f32 {
        f32::from(self.humidity_tenths) / 10.0
    }

    /// Temperature in degrees Celsius.
    pub fn temperature(&self) -> f32 {
        f32::from(self.temperature_tenths) / 10.0
    }

    /// Temperature magnitude in tenths of a degree, sign discarded.
    pub fn temperature_magnitude_tenths(&self) -> u16 {
        self.temperature_tenths.unsigned_abs()
    }
}

/// Converts a frame's payload into a [`Reading`].
///
/// The checksum verdict rides along instead of gating the result, so a
/// corrupt or short frame still yields numbers for the caller to judge.
pub fn decode(frame: &Frame) -> Reading {
    let [hum_hi, hum_lo, temp_hi, temp_lo] = frame.payload();

    let humidity_tenths = u16::from_be_bytes([hum_hi, hum_lo]);

    let is_temp_negative = (temp_hi >> 7) != 0;
    let temp_hi = temp_hi & 0b0111_1111;
    // 15 bits always fit in an i16.
    let magnitude = u16::from_be_bytes([temp_hi, temp_lo]) as i16;
    let temperature_tenths = if is_temp_negative {
        -magnitude
    } else {
        magnitude
    };

    let checksum_valid = checksum::validate(frame);

    #[cfg(feature = "defmt")]
    if !checksum_valid {
        defmt::warn!("invalid checksum");
    }

    Reading {
        humidity_tenths,
        temperature_tenths,
        checksum_valid,
    }
}
