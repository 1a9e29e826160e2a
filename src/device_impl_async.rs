use crate::hw_def::*;
use crate::logging::{debug, trace};
use crate::protocol::decode_measurement;
use crate::types::*;

use embedded_hal_async::{delay::DelayNs, i2c::I2c};

impl<I2C, Delay, E> Htu21dAsync<I2C, Delay>
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

    async fn write(&mut self, bytes: &[u8]) -> Result<(), Error<E>> {
        trace!("htu21d::write(): bytes={:?}", bytes);
        self.i2c.write(I2C_ADDR, bytes).await.map_err(Error::I2c)
    }

    async fn cmd_and_read(&mut self, cmd: Command, read_buf: &mut [u8]) -> Result<(), Error<E>> {
        self.write(&[cmd.as_u8()]).await?;
        trace!("htu21d::cmd_and_read(): read_buf.len()={}", read_buf.len());
        self.i2c.read(I2C_ADDR, read_buf).await.map_err(Error::I2c)
    }

    /// Read the user register into the status cache
    pub async fn init(&mut self) -> Result<(), Error<E>> {
        self.read_register().await?;
        Ok(())
    }

    /// Soft reset, without waiting for the device to settle
    pub async fn reset(&mut self) -> Result<(), Error<E>> {
        self.write(&[Command::SoftReset.as_u8()]).await
    }

    /// Soft reset, then wait [`SOFT_RESET_SETTLE_MS`]
    pub async fn reset_and_wait(&mut self) -> Result<(), Error<E>> {
        self.reset().await?;
        self.delay.delay_ms(SOFT_RESET_SETTLE_MS).await;
        Ok(())
    }

    /// Write the resolution bits to the user register. The status cache is left as is.
    pub async fn set_resolution(&mut self, resolution: Resolution) -> Result<(), Error<E>> {
        self.write(&[Command::WriteUserRegister.as_u8(), resolution.bits()]).await
    }

    /// Trigger a humidity measurement and return the CRC-checked raw code
    pub async fn read_raw_humidity(&mut self) -> Result<u16, Error<E>> {
        let mut buf = [0u8; MEASUREMENT_LEN];
        self.cmd_and_read(Command::TriggerHumidMeasurement, &mut buf).await?;
        decode_measurement(&buf)
    }

    /// Trigger a temperature measurement and return the CRC-checked raw code
    pub async fn read_raw_temperature(&mut self) -> Result<u16, Error<E>> {
        let mut buf = [0u8; MEASUREMENT_LEN];
        self.cmd_and_read(Command::TriggerTempMeasurement, &mut buf).await?;
        decode_measurement(&buf)
    }

    /// Relative humidity in percent, not clamped
    pub async fn read_humidity(&mut self) -> Result<f64, Error<E>> {
        self.read_raw_humidity().await.map(raw_humidity_to_percent)
    }

    /// Temperature in degrees centigrade
    pub async fn read_temperature(&mut self) -> Result<f64, Error<E>> {
        self.read_raw_temperature().await.map(raw_temp_to_centigrade)
    }

    /// Read the user register and update the status cache
    pub async fn read_register(&mut self) -> Result<UserRegister, Error<E>> {
        let mut buf = [0u8; 1];
        self.cmd_and_read(Command::ReadUserRegister, &mut buf).await?;
        self.register = UserRegister::from(buf[0]);
        debug!("htu21d::read_register(): register={:#x}", buf[0]);
        Ok(self.register)
    }

    /// Return the cached register snapshot, then re-read the register for next time
    pub async fn register_status(&mut self) -> RegisterStatus<E> {
        let register = self.register;
        let refresh = self.read_register().await.map(|_| ());
        RegisterStatus { register, refresh }
    }

    /// Cached register snapshot
    pub fn cached_register(&self) -> UserRegister {
        self.register
    }
}

#[cfg(test)]
mod tests {
    extern crate alloc;

    use super::*;
    use crate::protocol::crc8;

    use embassy_futures::block_on;
    use embedded_hal::i2c::ErrorKind;
    use embedded_hal_mock::eh1::{
        delay::NoopDelay,
        i2c::{Mock as I2cMock, Transaction},
    };
    use float_cmp::approx_eq;

    fn done(htu: Htu21dAsync<I2cMock, NoopDelay>) {
        let (mut i2c, _) = htu.destroy();
        i2c.done();
    }

    #[test]
    fn init_then_measure() {
        let raw_temp: u16 = 0x6650;
        let [msb, lsb] = raw_temp.to_be_bytes();
        let expectations = [
            Transaction::write(I2C_ADDR, alloc::vec![0xE7]),
            Transaction::read(I2C_ADDR, alloc::vec![0x02]),
            Transaction::write(I2C_ADDR, alloc::vec![0xE5]),
            Transaction::read(I2C_ADDR, alloc::vec![0x68, 0x3A, 0x7C]),
            Transaction::write(I2C_ADDR, alloc::vec![0xE3]),
            Transaction::read(I2C_ADDR, alloc::vec![msb, lsb, crc8(raw_temp)]),
        ];
        let mut htu = Htu21dAsync::new(I2cMock::new(&expectations), NoopDelay);
        block_on(async {
            htu.init().await.unwrap();
            assert_eq!(htu.cached_register().raw(), 0x02);
            let humidity = htu.read_humidity().await.unwrap();
            assert!(approx_eq!(f64, humidity, 44.8919, epsilon = 1e-3));
            let temperature = htu.read_temperature().await.unwrap();
            assert!(approx_eq!(f64, temperature, raw_temp_to_centigrade(raw_temp), epsilon = 1e-9));
        });
        done(htu);
    }

    #[test]
    fn crc_mismatch() {
        let expectations = [
            Transaction::write(I2C_ADDR, alloc::vec![0xE3]),
            Transaction::read(I2C_ADDR, alloc::vec![0x4E, 0x85, 0x6A]),
        ];
        let mut htu = Htu21dAsync::new(I2cMock::new(&expectations), NoopDelay);
        let result = block_on(htu.read_temperature());
        assert_eq!(result, Err(Error::CrcMismatch { expected: 0x6B, received: 0x6A }));
        done(htu);
    }

    #[test]
    fn write_failure_skips_read() {
        let expectations = [Transaction::write(I2C_ADDR, alloc::vec![0xE5]).with_error(ErrorKind::Other)];
        let mut htu = Htu21dAsync::new(I2cMock::new(&expectations), NoopDelay);
        assert_eq!(block_on(htu.read_humidity()), Err(Error::I2c(ErrorKind::Other)));
        done(htu);
    }

    #[test]
    fn reset_and_resolution() {
        let expectations = [
            Transaction::write(I2C_ADDR, alloc::vec![0xFE]),
            Transaction::write(I2C_ADDR, alloc::vec![0xFE]),
            Transaction::write(I2C_ADDR, alloc::vec![0xE6, 0x80]),
        ];
        let mut htu = Htu21dAsync::new(I2cMock::new(&expectations), NoopDelay);
        block_on(async {
            htu.reset().await.unwrap();
            htu.reset_and_wait().await.unwrap();
            htu.set_resolution(Resolution::Rh10Temp13).await.unwrap();
        });
        done(htu);
    }

    #[test]
    fn register_status_keeps_snapshot_when_refresh_fails() {
        let expectations = [
            Transaction::write(I2C_ADDR, alloc::vec![0xE7]),
            Transaction::read(I2C_ADDR, alloc::vec![0x01]),
            Transaction::write(I2C_ADDR, alloc::vec![0xE7]),
            Transaction::read(I2C_ADDR, alloc::vec![0x00]).with_error(ErrorKind::Other),
        ];
        let mut htu = Htu21dAsync::new(I2cMock::new(&expectations), NoopDelay);
        block_on(async {
            htu.init().await.unwrap();
            let status = htu.register_status().await;
            assert_eq!(status.register.resolution(), Resolution::Rh8Temp12);
            assert_eq!(status.refresh, Err(Error::I2c(ErrorKind::Other)));
        });
        assert_eq!(htu.cached_register().raw(), 0x01);
        done(htu);
    }

    #[test]
    fn reset_failure() {
        let expectations = [Transaction::write(I2C_ADDR, alloc::vec![0xFE]).with_error(ErrorKind::Other)];
        let mut htu = Htu21dAsync::new(I2cMock::new(&expectations), NoopDelay);
        assert_eq!(block_on(htu.reset()), Err(Error::I2c(ErrorKind::Other)));
        done(htu);
    }

    #[test]
    fn set_resolution_writes_each_pattern() {
        for (resolution, bits) in [
            (Resolution::Rh12Temp14, 0x00),
            (Resolution::Rh8Temp12, 0x01),
            (Resolution::Rh10Temp13, 0x80),
            (Resolution::Rh11Temp11, 0x81),
        ] {
            let expectations = [Transaction::write(I2C_ADDR, alloc::vec![0xE6, bits])];
            let mut htu = Htu21dAsync::new(I2cMock::new(&expectations), NoopDelay);
            block_on(htu.set_resolution(resolution)).unwrap();
            assert_eq!(htu.cached_register(), UserRegister::default());
            done(htu);
        }
    }

    #[test]
    fn humidity_crc_bit_flip_is_rejected() {
        for bit in 0..8 {
            let received = 0x7C ^ (1u8 << bit);
            let expectations = [
                Transaction::write(I2C_ADDR, alloc::vec![0xE5]),
                Transaction::read(I2C_ADDR, alloc::vec![0x68, 0x3A, received]),
            ];
            let mut htu = Htu21dAsync::new(I2cMock::new(&expectations), NoopDelay);
            assert_eq!(
                block_on(htu.read_humidity()),
                Err(Error::CrcMismatch { expected: 0x7C, received })
            );
            done(htu);
        }
    }

    #[test]
    fn measurement_read_failure() {
        let expectations = [
            Transaction::write(I2C_ADDR, alloc::vec![0xE3]),
            Transaction::read(I2C_ADDR, alloc::vec![0x00, 0x00, 0x00]).with_error(ErrorKind::Other),
        ];
        let mut htu = Htu21dAsync::new(I2cMock::new(&expectations), NoopDelay);
        assert_eq!(block_on(htu.read_raw_temperature()), Err(Error::I2c(ErrorKind::Other)));
        done(htu);
    }
}
