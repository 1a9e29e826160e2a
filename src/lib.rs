//! This is a platform-agnostic Rust driver for the HTU21D digital relative humidity and
//! temperature sensor using the [`embedded-hal`] or [`embedded-hal-async`] traits.
//!
//! [`embedded-hal`]: https://github.com/rust-embedded/embedded-hal/tree/master/embedded-hal
//! [`embedded-hal-async`]: https://github.com/rust-embedded/embedded-hal/tree/master/embedded-hal-async
//!
//! This driver allows you to:
//! - Trigger humidity and temperature measurements (hold master mode) and read them as
//!   CRC-checked raw codes or converted to %RH / °C.
//! - Set the measurement resolution.
//! - Trigger a software reset, optionally waiting out the settle time.
//! - Read the user register, with a cached snapshot per driver instance.
//! - blocking API support.
//! - async API support.
//!
//! This driver does not support the following device features:
//! - Measurements in no hold master mode (polling instead of clock stretching).
//! - Enabling the on-chip heater or the OTP reload bit.
//!
//! ## Features
//!
//! - `async`: Enables async API ([`Htu21dAsync`]).
//! - `blocking`: Enables blocking API ([`Htu21d`]).
//! - `defmt`: Enables logging using the `defmt` framework.
//! - `log`: Enables logging using the `log` framework.
//!
//! ## Measurement range
//!
//! Converted values are passed through as the datasheet formulas give them. Relative humidity may
//! come out slightly below 0 % or above 100 % near saturation; no clamping or error is applied.
//!
//! Datasheet:
//!   [HTU21D(F)](https://www.te.com/commerce/DocumentDelivery/DDEController?Action=showdoc&DocId=Data+Sheet%7FHPC199_6%7FA6%7Fpdf%7FEnglish%7FENG_DS_HPC199_6_A6.pdf)
//!
//! ## Blocking Example:
//!
//! ```ignore
//! use htu21d::{Htu21d, Resolution};
//!
//! // Platform-specific
//! let i2c = /* embedded_hal::i2c::I2c instance */;
//! let delay = /* embedded_hal::delay::DelayNs instance */;
//!
//! let mut htu21d = Htu21d::new(i2c, delay);
//! htu21d.reset_and_wait().unwrap();
//! htu21d.init().unwrap();
//! htu21d.set_resolution(Resolution::Rh12Temp14).unwrap();
//!
//! println!("{:0.1} %RH, {:0.1} °C",
//!     htu21d.read_humidity().unwrap(),
//!     htu21d.read_temperature().unwrap());
//!
//! let status = htu21d.register_status();
//! if status.register.end_of_battery() {
//!     println!("supply below 2.25 V");
//! }
//! ```
//!
//! ## Async Example:
//!
//! ```ignore
//! use htu21d::Htu21dAsync;
//!
//! let mut htu21d = Htu21dAsync::new(i2c, delay);
//! htu21d.init().await.unwrap();
//! let humidity = htu21d.read_humidity().await.unwrap();
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![no_std]

#[cfg(not(any(feature = "async", feature = "blocking")))]
compile_error!("At least one of \"async\" and \"blocking\" features must be enabled");

#[cfg(all(feature = "defmt", feature = "log"))]
compile_error!("Features \"defmt\" and \"log\" are mutually exclusive and cannot be enabled together");

#[cfg(feature = "blocking")]
mod device_impl;
#[cfg(feature = "async")]
mod device_impl_async;
mod hw_def;
mod logging;
mod protocol;
mod types;

pub use crate::{hw_def::*, protocol::crc8, types::*};
