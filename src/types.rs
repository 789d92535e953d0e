use crate::hw_def::*;
use crate::newton::DidNotConverge;
use crate::temperature;

use core::fmt;

#[cfg(feature="defmt")]
use defmt::Format;

/// MAX31865 device driver
#[derive(Debug)]
pub struct Max31865<SPI, Delay> {
    pub(crate) spi: SPI,
    pub(crate) delay: Delay,
    pub(crate) config: ConfigRegister,
    pub(crate) calibration: Calibration,
    pub(crate) bias_mode: BiasMode,
}

/// All possible errors in this crate
#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Debug, PartialEq)]
pub enum Error<E> {
    /// SPI communication error
    Spi(E),
    /// Invalid wire count, filter frequency or calibration constant
    InvalidArgument,
    /// The device flagged a fault during the conversion
    Fault,
    /// Bias is off while the driver runs with [`BiasMode::Manual`]
    DeviceOff,
    /// The Callendar-Van Dusen inversion did not converge
    DidNotConverge,
}
impl<E> From<DidNotConverge> for Error<E> {
    fn from(_: DidNotConverge) -> Self {
        Error::DidNotConverge
    }
}

/// Notch filter frequency, matched to the local mains frequency
#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum FilterHz {
    /// 50 Hz rejection
    #[default]
    Fifty,
    /// 60 Hz rejection
    Sixty,
}
impl FilterHz {
    /// Map a mains frequency in Hz to a filter setting, only 50 and 60 are accepted
    pub fn from_hz(hz: u16) -> Option<Self> {
        match hz {
            50 => Some(FilterHz::Fifty),
            60 => Some(FilterHz::Sixty),
            _ => None,
        }
    }
    /// One-shot conversion time for this filter setting
    pub fn conversion_time_ms(self) -> u32 {
        match self {
            FilterHz::Fifty => CONVERSION_50HZ_MS,
            FilterHz::Sixty => CONVERSION_60HZ_MS,
        }
    }
}

/// RTD lead configuration
#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum WireMode {
    /// 2-wire or 4-wire RTD
    TwoOrFourWire,
    /// 3-wire RTD
    ThreeWire,
}
impl WireMode {
    /// Map a lead count to a wire mode, only 2, 3 and 4 are accepted
    pub fn from_wires(wires: u8) -> Option<Self> {
        match wires {
            2 | 4 => Some(WireMode::TwoOrFourWire),
            3 => Some(WireMode::ThreeWire),
            _ => None,
        }
    }
}

/// Who owns the bias voltage across reads
#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum BiasMode {
    /// Every read turns bias on, waits for it to settle and turns it off again
    #[default]
    Auto,
    /// The caller switches bias with `set_bias()`; reads with bias off report
    /// [`Reading::DeviceOff`] and bias stays on between reads
    Manual,
}

/// Shadow of the configuration register
///
/// The driver writes every change straight through, so this always matches the last byte sent
/// to the device.
#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ConfigRegister {
    /// bias voltage enabled
    pub bias: bool,
    /// one-shot conversion requested, cleared by the device when the conversion completes
    pub one_shot: bool,
    /// lead configuration
    pub wire_mode: WireMode,
    /// fault status clear strobe
    pub fault_clear: bool,
    /// notch filter
    pub filter: FilterHz,
}
impl ConfigRegister {
    /// Power-up configuration for the given lead configuration: 50 Hz filter, bias off
    pub fn new(wire_mode: WireMode) -> Self {
        Self {
            bias: false,
            one_shot: false,
            wire_mode,
            fault_clear: false,
            filter: FilterHz::default(),
        }
    }

    /// Serialize to the register byte. Auto conversion and the fault detection cycle are
    /// never requested.
    pub fn bits(&self) -> u8 {
        let mut bits = 0;
        if self.bias {
            bits |= CONFIG_BIAS;
        }
        if self.one_shot {
            bits |= CONFIG_ONE_SHOT;
        }
        if self.wire_mode == WireMode::ThreeWire {
            bits |= CONFIG_THREE_WIRE;
        }
        if self.fault_clear {
            bits |= CONFIG_FAULT_CLEAR;
        }
        if self.filter == FilterHz::Fifty {
            bits |= CONFIG_FILTER_50HZ;
        }
        bits
    }
}

/// Reference and 0 °C resistance used to turn a raw code into a temperature
#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Calibration {
    r_ref: f64,
    r0: f64,
}
impl Calibration {
    /// Build a calibration, `r0` defaults to a quarter of the reference resistor.
    /// Returns `None` unless both resistances are finite and positive.
    pub fn new(r_ref: f64, r0: Option<f64>) -> Option<Self> {
        let r0 = r0.unwrap_or(r_ref / 4.0);
        if r_ref.is_finite() && r_ref > 0.0 && r0.is_finite() && r0 > 0.0 {
            Some(Self { r_ref, r0 })
        } else {
            None
        }
    }
    /// reference resistor in ohms
    pub fn r_ref(&self) -> f64 {
        self.r_ref
    }
    /// RTD resistance at 0 °C in ohms
    pub fn r0(&self) -> f64 {
        self.r0
    }
}
impl Default for Calibration {
    fn default() -> Self {
        Self {
            r_ref: DEFAULT_REFERENCE_OHMS,
            r0: DEFAULT_REFERENCE_OHMS / 4.0,
        }
    }
}

/// Outcome of a one-shot acquisition
#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Reading {
    /// 15-bit conversion result with the fault flag stripped
    Code(u16),
    /// the device flagged a fault, read the fault status register for details
    Fault,
    /// bias is off in [`BiasMode::Manual`], nothing was converted
    DeviceOff,
}
impl Reading {
    /// Get the raw code, if there is one
    pub fn code(&self) -> Option<u16> {
        match self {
            Self::Code(code) => Some(*code),
            Self::Fault | Self::DeviceOff => None,
        }
    }
    /// Get the linear approximation of the temperature in Centigrade
    pub fn simple_temperature(&self) -> Option<f64> {
        self.code().map(temperature::simple_temperature)
    }
    /// Get the Callendar-Van Dusen temperature in Centigrade
    pub fn precise_temperature(&self, calibration: &Calibration) -> Option<Result<f64, DidNotConverge>> {
        self.code().map(|code| temperature::precise_temperature(code, calibration.r_ref, calibration.r0))
    }
    /// Turn the no-reading outcomes into errors
    pub fn into_code<E>(self) -> Result<u16, Error<E>> {
        match self {
            Self::Code(code) => Ok(code),
            Self::Fault => Err(Error::Fault),
            Self::DeviceOff => Err(Error::DeviceOff),
        }
    }
}

/// Fault status bits from the device
#[cfg_attr(feature = "defmt", derive(Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FaultStatus {
    raw: u8,
    /// RTD code above the high fault threshold
    pub high_threshold: bool,
    /// RTD code below the low fault threshold
    pub low_threshold: bool,
    /// REFIN- > 0.85 x V_BIAS
    pub refin_high: bool,
    /// REFIN- < 0.85 x V_BIAS, FORCE- open
    pub refin_low_force_open: bool,
    /// RTDIN- < 0.85 x V_BIAS, FORCE- open
    pub rtdin_low_force_open: bool,
    /// over- or under-voltage on an input
    pub over_under_voltage: bool,
}
impl From<u8> for FaultStatus {
    fn from(raw: u8) -> Self {
        Self {
            raw,
            high_threshold: raw & FAULT_HIGH_THRESHOLD != 0,
            low_threshold: raw & FAULT_LOW_THRESHOLD != 0,
            refin_high: raw & FAULT_REFIN_HIGH != 0,
            refin_low_force_open: raw & FAULT_REFIN_LOW_FORCE_OPEN != 0,
            rtdin_low_force_open: raw & FAULT_RTDIN_LOW_FORCE_OPEN != 0,
            over_under_voltage: raw & FAULT_OVER_UNDER_VOLTAGE != 0,
        }
    }
}
impl FaultStatus {
    /// Get the raw status bits
    pub fn raw(&self) -> u8 {
        self.raw
    }
    /// no fault bit is set
    pub fn is_clear(&self) -> bool {
        self.raw == 0
    }
}
impl fmt::Display for FaultStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FaultStatus {{ 0x{:02x}; ", self.raw)?;
        if self.high_threshold {
            write!(f, "high_threshold ")?;
        }
        if self.low_threshold {
            write!(f, "low_threshold ")?;
        }
        if self.refin_high {
            write!(f, "refin_high ")?;
        }
        if self.refin_low_force_open {
            write!(f, "refin_low_force_open ")?;
        }
        if self.rtdin_low_force_open {
            write!(f, "rtdin_low_force_open ")?;
        }
        if self.over_under_voltage {
            write!(f, "over_under_voltage ")?;
        }
        write!(f, "}}")
    }
}
