//! Register map, bit masks and timing constants of the MAX31865

use embedded_hal::spi::{MODE_1, MODE_3, Mode};

/// SPI mode the device samples correctly in (mode 1 works as well, see [`SPI_MODE_ALT`])
pub const SPI_MODE: Mode = MODE_3;
/// Alternative SPI mode supported by the device
pub const SPI_MODE_ALT: Mode = MODE_1;
/// Maximum SPI clock frequency supported by the device
pub const MAX_SPI_FREQUENCY_HZ: u32 = 5_000_000;

/// Register addresses
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u8)]
pub enum Register {
    /// configuration
    Config = 0x00,
    /// RTD resistance data, most significant byte
    RtdMsb = 0x01,
    /// RTD resistance data, least significant byte
    RtdLsb = 0x02,
    /// high fault threshold, most significant byte
    HighFaultThresholdMsb = 0x03,
    /// high fault threshold, least significant byte
    HighFaultThresholdLsb = 0x04,
    /// low fault threshold, most significant byte
    LowFaultThresholdMsb = 0x05,
    /// low fault threshold, least significant byte
    LowFaultThresholdLsb = 0x06,
    /// fault status
    FaultStatus = 0x07,
}
impl Register {
    /// address byte for a read transaction (A7 clear)
    pub const fn read_address(self) -> u8 {
        self as u8 & !WRITE_FLAG
    }
    /// address byte for a write transaction (A7 set)
    pub const fn write_address(self) -> u8 {
        self as u8 | WRITE_FLAG
    }
}

pub(crate) const WRITE_FLAG: u8 = 0x80;

// Configuration register
pub(crate) const CONFIG_BIAS: u8 = 0x80;
pub(crate) const CONFIG_ONE_SHOT: u8 = 0x20;
pub(crate) const CONFIG_THREE_WIRE: u8 = 0x10;
pub(crate) const CONFIG_FAULT_CLEAR: u8 = 0x02;
pub(crate) const CONFIG_FILTER_50HZ: u8 = 0x01;

// Fault status register
pub(crate) const FAULT_HIGH_THRESHOLD: u8 = 0x80;
pub(crate) const FAULT_LOW_THRESHOLD: u8 = 0x40;
pub(crate) const FAULT_REFIN_HIGH: u8 = 0x20;
pub(crate) const FAULT_REFIN_LOW_FORCE_OPEN: u8 = 0x10;
pub(crate) const FAULT_RTDIN_LOW_FORCE_OPEN: u8 = 0x08;
pub(crate) const FAULT_OVER_UNDER_VOLTAGE: u8 = 0x04;

/// Bit 0 of the RTD data register flags a fault during the conversion
pub(crate) const RTD_FAULT_BIT: u16 = 0x0001;
/// Largest 15-bit code the ADC produces
pub const RAW_CODE_MAX: u16 = 0x7FFF;

/// Settling time of the bias voltage before a conversion may start
pub const BIAS_WARM_UP_MS: u32 = 10;
/// One-shot conversion time with the 50 Hz filter selected
pub const CONVERSION_50HZ_MS: u32 = 63;
/// One-shot conversion time with the 60 Hz filter selected
pub const CONVERSION_60HZ_MS: u32 = 53;

/// Reference resistor fitted on the common PT100 breakout boards
pub const DEFAULT_REFERENCE_OHMS: f64 = 400.0;
