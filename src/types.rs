use crate::hw_def::*;

use core::fmt;

#[cfg(feature = "defmt")]
use defmt::Format;

/// HTU21D driver over a blocking I²C bus
#[cfg(feature = "blocking")]
#[derive(Debug)]
pub struct Htu21d<I2C, Delay> {
    pub(crate) i2c: I2C,
    pub(crate) delay: Delay,
    pub(crate) register: UserRegister,
}

/// HTU21D driver over an async I²C bus
#[cfg(feature = "async")]
#[derive(Debug)]
pub struct Htu21dAsync<I2C, Delay> {
    pub(crate) i2c: I2C,
    pub(crate) delay: Delay,
    pub(crate) register: UserRegister,
}

/// All possible errors in this crate
#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Error<E> {
    /// I²C communication error, including bus timeouts reported by the HAL
    I2c(E),
    /// Checksum of a measurement response did not match the transmitted CRC byte
    CrcMismatch {
        /// CRC computed over the received 16-bit code
        expected: u8,
        /// CRC byte transmitted by the device
        received: u8,
    },
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::I2c(e) => write!(f, "I2C communication error: {e:?}"),
            Error::CrcMismatch { expected, received } => {
                write!(f, "CRC mismatch: computed 0x{expected:02X}, received 0x{received:02X}")
            }
        }
    }
}

impl<E: fmt::Debug> core::error::Error for Error<E> {}

/// Snapshot of the device user register
#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct UserRegister(u8);

/// Datasheet power-on value: RH12/T14, heater off, OTP reload disabled.
impl Default for UserRegister {
    fn default() -> Self {
        Self(REGISTER_MASK_OTP)
    }
}
impl From<u8> for UserRegister {
    fn from(raw: u8) -> Self {
        Self(raw)
    }
}
impl From<UserRegister> for u8 {
    fn from(register: UserRegister) -> u8 {
        register.0
    }
}
impl UserRegister {
    /// Get the raw register byte
    pub fn raw(&self) -> u8 {
        self.0
    }
    /// Measurement resolution currently configured
    pub fn resolution(&self) -> Resolution {
        Resolution::from_register(self.0)
    }
    /// Supply voltage dropped below 2.25 V
    pub fn end_of_battery(&self) -> bool {
        self.0 & REGISTER_MASK_END_OF_BATTERY != 0
    }
    /// On-chip heater is enabled
    pub fn heater_enabled(&self) -> bool {
        self.0 & REGISTER_MASK_HEATER != 0
    }
    /// OTP reload on each measurement is disabled
    pub fn otp_reload_disabled(&self) -> bool {
        self.0 & REGISTER_MASK_OTP != 0
    }
    /// Reserved bits, as read from the device
    pub fn reserved(&self) -> u8 {
        self.0 & REGISTER_MASK_RESERVED
    }
}
impl fmt::Display for UserRegister {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let resolution = self.resolution();
        write!(
            f,
            "UserRegister {{ 0x{:02x}; RH{}/T{} ",
            self.0,
            resolution.humidity_bits(),
            resolution.temperature_bits()
        )?;
        if self.end_of_battery() {
            write!(f, "end_of_battery ")?;
        }
        if self.heater_enabled() {
            write!(f, "heater_enabled ")?;
        }
        if self.otp_reload_disabled() {
            write!(f, "otp_reload_disabled ")?;
        }
        write!(f, "}}")
    }
}

/// Outcome of a register status query
///
/// `register` is the snapshot cached *before* the query and is always usable. `refresh` reports
/// whether the cache was updated for the next query; a failed refresh leaves the cache untouched.
#[cfg_attr(feature = "defmt", derive(Format))]
#[must_use]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RegisterStatus<E> {
    /// snapshot cached before this query
    pub register: UserRegister,
    /// result of re-reading the register into the cache
    pub refresh: Result<(), Error<E>>,
}
impl<E> RegisterStatus<E> {
    /// Collapse into a `Result`, discarding the stale snapshot if the refresh failed
    pub fn into_result(self) -> Result<UserRegister, Error<E>> {
        self.refresh.map(|()| self.register)
    }
}

/// Convert a raw humidity code to percent relative humidity
///
/// The value is passed through unmodified: the device may report slightly below 0 % or above
/// 100 % near saturation, and callers decide how to treat that.
pub fn raw_humidity_to_percent(raw: u16) -> f64 {
    -6.0 + 125.0 * (raw as f64 / 65536.0)
}

/// Convert a raw temperature code to degrees centigrade
pub fn raw_temp_to_centigrade(raw: u16) -> f64 {
    -46.85 + 175.72 * (raw as f64 / 65536.0)
}

/// Convert a raw temperature code to degrees fahrenheit
pub fn raw_temp_to_fahrenheit(raw: u16) -> f64 {
    raw_temp_to_centigrade(raw) * 1.8 + 32.0
}
