//! Wire-level definitions for the HTU21D: address, command bytes, user register layout.

#[cfg(feature = "defmt")]
use defmt::Format;

/// 7-bit I²C address of the HTU21D (fixed, not strappable)
///
/// The HAL appends the R/W bit, so this appears on the wire as 0x80 (write) and 0x81 (read).
pub const I2C_ADDR: u8 = 0x40;

/// Time the device needs after a soft reset before it accepts new commands
pub const SOFT_RESET_SETTLE_MS: u32 = 15;

/// Number of bytes in a measurement response: MSB, LSB, CRC
pub(crate) const MEASUREMENT_LEN: usize = 3;

/// User register bit: disable OTP reload
pub const REGISTER_MASK_OTP: u8 = 0x02;
/// User register bit: on-chip heater enabled
pub const REGISTER_MASK_HEATER: u8 = 0x04;
/// User register bits: reserved, must not be changed
pub const REGISTER_MASK_RESERVED: u8 = 0x38;
/// User register bit: end of battery (VDD < 2.25 V)
pub const REGISTER_MASK_END_OF_BATTERY: u8 = 0x40;
/// User register bits: measurement resolution
pub const REGISTER_MASK_RESOLUTION: u8 = 0x81;

/// Commands understood by the device
#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Command {
    /// Trigger temperature measurement, hold master (clock stretching)
    TriggerTempMeasurement,
    /// Trigger humidity measurement, hold master (clock stretching)
    TriggerHumidMeasurement,
    /// Write user register
    WriteUserRegister,
    /// Read user register
    ReadUserRegister,
    /// Soft reset
    SoftReset,
}
impl Command {
    /// Command byte as sent on the bus
    pub const fn as_u8(self) -> u8 {
        match self {
            Command::TriggerTempMeasurement => 0xE3,
            Command::TriggerHumidMeasurement => 0xE5,
            Command::WriteUserRegister => 0xE6,
            Command::ReadUserRegister => 0xE7,
            Command::SoftReset => 0xFE,
        }
    }
}

/// Measurement resolution, as stored in bits 7 and 0 of the user register
#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Resolution {
    /// 12 bit relative humidity, 14 bit temperature (power-on default)
    #[default]
    Rh12Temp14,
    /// 8 bit relative humidity, 12 bit temperature
    Rh8Temp12,
    /// 10 bit relative humidity, 13 bit temperature
    Rh10Temp13,
    /// 11 bit relative humidity, 11 bit temperature
    Rh11Temp11,
}
impl Resolution {
    /// All resolutions, in register-value order
    pub const ALL: [Resolution; 4] = [
        Resolution::Rh12Temp14,
        Resolution::Rh8Temp12,
        Resolution::Rh10Temp13,
        Resolution::Rh11Temp11,
    ];

    /// Register bit pattern for this resolution
    pub const fn bits(self) -> u8 {
        match self {
            Resolution::Rh12Temp14 => 0x00,
            Resolution::Rh8Temp12 => 0x01,
            Resolution::Rh10Temp13 => 0x80,
            Resolution::Rh11Temp11 => 0x81,
        }
    }

    /// Extract the resolution from a full user register byte, ignoring all other bits
    pub const fn from_register(register: u8) -> Self {
        match register & REGISTER_MASK_RESOLUTION {
            0x00 => Resolution::Rh12Temp14,
            0x01 => Resolution::Rh8Temp12,
            0x80 => Resolution::Rh10Temp13,
            _ => Resolution::Rh11Temp11,
        }
    }

    /// Relative humidity resolution in bits
    pub const fn humidity_bits(self) -> u8 {
        match self {
            Resolution::Rh12Temp14 => 12,
            Resolution::Rh8Temp12 => 8,
            Resolution::Rh10Temp13 => 10,
            Resolution::Rh11Temp11 => 11,
        }
    }

    /// Temperature resolution in bits
    pub const fn temperature_bits(self) -> u8 {
        match self {
            Resolution::Rh12Temp14 => 14,
            Resolution::Rh8Temp12 => 12,
            Resolution::Rh10Temp13 => 13,
            Resolution::Rh11Temp11 => 11,
        }
    }
}

/// Accepts only the four exact bit patterns; any other byte is handed back as the error.
impl TryFrom<u8> for Resolution {
    type Error = u8;

    fn try_from(bits: u8) -> Result<Self, Self::Error> {
        Resolution::ALL
            .into_iter()
            .find(|resolution| resolution.bits() == bits)
            .ok_or(bits)
    }
}

impl From<Resolution> for u8 {
    fn from(resolution: Resolution) -> u8 {
        resolution.bits()
    }
}
