use crate::hw_def::*;
use crate::logging::{debug, trace};
use crate::protocol::decode_measurement;
use crate::types::*;

use embedded_hal::{delay::DelayNs, i2c::I2c};

impl<I2C, Delay, E> Htu21d<I2C, Delay>
where
    I2C: I2c<Error = E>,
    Delay: DelayNs,
{
    /// Create a new HTU21D driver instance. No bus traffic happens until [`Self::init`].
    pub fn new(i2c: I2C, delay: Delay) -> Self {
        Self {
            i2c,
            delay,
            register: UserRegister::default(),
        }
    }

    /// Give back the bus and delay
    pub fn destroy(self) -> (I2C, Delay) {
        (self.i2c, self.delay)
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), Error<E>> {
        trace!("htu21d::write(): bytes={:?}", bytes);
        self.i2c.write(I2C_ADDR, bytes).map_err(Error::I2c)
    }

    // Write and read are separate transfers: a measurement command holds the bus (clock
    // stretching) until conversion ends, and a failed write must not be followed by a read.
    fn cmd_and_read(&mut self, cmd: Command, read_buf: &mut [u8]) -> Result<(), Error<E>> {
        self.write(&[cmd.as_u8()])?;
        trace!("htu21d::cmd_and_read(): read_buf.len()={}", read_buf.len());
        self.i2c.read(I2C_ADDR, read_buf).map_err(Error::I2c)
    }

    /// Read the user register into the status cache. Call once after power-up.
    pub fn init(&mut self) -> Result<(), Error<E>> {
        self.read_register()?;
        Ok(())
    }

    /// Soft reset. The device ignores commands for [`SOFT_RESET_SETTLE_MS`] afterwards; waiting is
    /// up to the caller (or use [`Self::reset_and_wait`]).
    pub fn reset(&mut self) -> Result<(), Error<E>> {
        self.write(&[Command::SoftReset.as_u8()])
    }

    /// Soft reset, then block for the settle time
    pub fn reset_and_wait(&mut self) -> Result<(), Error<E>> {
        self.reset()?;
        self.delay.delay_ms(SOFT_RESET_SETTLE_MS);
        Ok(())
    }

    /// Write the resolution bits to the user register
    ///
    /// The whole register byte is written, so heater and OTP bits return to their defaults. The
    /// status cache is not updated; call [`Self::read_register`] to observe the new value.
    pub fn set_resolution(&mut self, resolution: Resolution) -> Result<(), Error<E>> {
        self.write(&[Command::WriteUserRegister.as_u8(), resolution.bits()])
    }

    /// Trigger a humidity measurement and return the CRC-checked raw code
    pub fn read_raw_humidity(&mut self) -> Result<u16, Error<E>> {
        let mut buf = [0u8; MEASUREMENT_LEN];
        self.cmd_and_read(Command::TriggerHumidMeasurement, &mut buf)?;
        decode_measurement(&buf)
    }

    /// Trigger a temperature measurement and return the CRC-checked raw code
    pub fn read_raw_temperature(&mut self) -> Result<u16, Error<E>> {
        let mut buf = [0u8; MEASUREMENT_LEN];
        self.cmd_and_read(Command::TriggerTempMeasurement, &mut buf)?;
        decode_measurement(&buf)
    }

    /// Relative humidity in percent, not clamped to 0..=100
    pub fn read_humidity(&mut self) -> Result<f64, Error<E>> {
        self.read_raw_humidity().map(raw_humidity_to_percent)
    }

    /// Temperature in degrees centigrade
    pub fn read_temperature(&mut self) -> Result<f64, Error<E>> {
        self.read_raw_temperature().map(raw_temp_to_centigrade)
    }

    /// Read the user register, update the status cache and return the fresh value
    pub fn read_register(&mut self) -> Result<UserRegister, Error<E>> {
        let mut buf = [0u8; 1];
        self.cmd_and_read(Command::ReadUserRegister, &mut buf)?;
        self.register = UserRegister::from(buf[0]);
        debug!("htu21d::read_register(): register={:#x}", buf[0]);
        Ok(self.register)
    }

    /// Return the cached register snapshot, then re-read the register for next time
    pub fn register_status(&mut self) -> RegisterStatus<E> {
        let register = self.register;
        let refresh = self.read_register().map(|_| ());
        RegisterStatus { register, refresh }
    }

    /// Cached register snapshot, without touching the bus
    pub fn cached_register(&self) -> UserRegister {
        self.register
    }
}
