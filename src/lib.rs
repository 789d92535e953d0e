//! This is a platform-agnostic Rust driver for the MAX31865 RTD-to-digital converter using the
//! [`embedded-hal`] traits, with Callendar-Van Dusen linearization for platinum RTDs.
//!
//! [`embedded-hal`]: https://github.com/rust-embedded/embedded-hal/tree/master/embedded-hal
//!
//! This driver allows you to:
//! - Configure 2-, 3- or 4-wire RTDs, the 50/60 Hz notch filter and the reference/RTD resistances.
//! - Run one-shot conversions, with bias handled by the driver or by the caller.
//! - Convert raw codes with the datasheet's linear approximation or with Callendar-Van Dusen.
//! - Read and clear the fault status.
//! - Set and read the fault thresholds.
//!
//! This driver does not support the following device features:
//! - Automatic (continuous) conversion mode.
//! - The automatic and manual fault detection cycles.
//!
//! ## Features
//!
//! - `defmt`: Enables logging using the `defmt` framework.
//! - `log`: Enables logging using the `log` framework.
//!
//! ## Supported devices: MAX31865
//!
//! The MAX31865 measures the ratio between an RTD and a reference resistor and reports it as a
//! 15-bit code, with a fault flag in the least significant bit of the RTD data register. It
//! talks SPI mode 1 or 3 at up to 5 MHz, see [`SPI_MODE`] and [`MAX_SPI_FREQUENCY_HZ`].
//!
//! Datasheet:
//!   [MAX31865](https://www.analog.com/media/en/technical-documentation/data-sheets/max31865.pdf)
//!
//! To use this driver, import this crate and an `embedded_hal` implementation, then instantiate
//! the device.
//!
//! ## Example:
//!
//! ```ignore
//! use max31865::{BiasMode, Max31865, Reading, WireMode};
//!
//! // Platform-specific
//! let spi = /* embedded_hal::spi::SpiDevice instance, mode 1 or 3 */;
//! let delay = /* embedded_hal::delay::DelayNs instance */;
//!
//! let mut max31865 = Max31865::new(spi, delay, WireMode::ThreeWire, BiasMode::Auto).unwrap();
//! // PT100 on a 430 Ω reference, 60 Hz mains
//! max31865.configure(3, 60, 430.0, Some(100.0)).unwrap();
//!
//! loop {
//!     match max31865.read().unwrap() {
//!         Reading::Code(code) => println!("{:0.2} °C",
//!             max31865::precise_temperature(code, 430.0, 100.0).unwrap()),
//!         Reading::Fault => println!("fault: {}", max31865.read_fault_status().unwrap()),
//!         Reading::DeviceOff => unreachable!(),
//!     }
//! }
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![cfg_attr(not(test), no_std)]

#[cfg(all(feature = "defmt", feature = "log"))]
compile_error!("Features \"defmt\" and \"log\" are mutually exclusive and cannot be enabled together");

mod device_impl;
mod hw_def;
pub mod newton;
pub mod temperature;
mod types;

pub use crate::{
    hw_def::*,
    newton::{DidNotConverge, newton_raphson},
    temperature::{precise_temperature, resistance, simple_temperature, temperature_from_resistance},
    types::*,
};
