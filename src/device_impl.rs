use crate::hw_def::*;
use crate::temperature::{precise_temperature, resistance, simple_temperature};
use crate::types::*;

use embedded_hal::{
    delay::DelayNs,
    spi::{Operation, SpiDevice},
};

cfg_if::cfg_if! {
    if #[cfg(feature = "defmt")] {
        use defmt::{debug, trace};
    } else if #[cfg(feature = "log")] {
        use log::{debug, trace};
    } else {
        macro_rules! trace {
            ($($arg:tt)*) => {};
        }
        macro_rules! debug {
            ($($arg:tt)*) => {};
        }
    }
}

// TODO: a fault detection cycle (config bits 3:2) would let read() report which comparator
// tripped without a separate read_fault_status() call.
impl<SPI, Delay, E> Max31865<SPI, Delay>
where
    SPI: SpiDevice<u8, Error = E>,
    Delay: DelayNs,
{
    /// Create a new MAX31865 driver instance and write the default configuration: 50 Hz filter,
    /// bias off, default calibration (400 Ω reference, 100 Ω RTD)
    pub fn new(spi: SPI, delay: Delay, wire_mode: WireMode, bias_mode: BiasMode) -> Result<Self, Error<E>> {
        let config = ConfigRegister::new(wire_mode);
        let mut max31865 = Self {
            spi,
            delay,
            config,
            calibration: Calibration::default(),
            bias_mode,
        };
        max31865.write_config(config)?;
        Ok(max31865)
    }

    /// Give back the bus and the delay
    pub fn release(self) -> (SPI, Delay) {
        (self.spi, self.delay)
    }

    /// Last configuration byte written to the device
    pub fn config(&self) -> ConfigRegister {
        self.config
    }

    /// Calibration used by the temperature reads
    pub fn calibration(&self) -> Calibration {
        self.calibration
    }

    /// Bias discipline chosen at construction
    pub fn bias_mode(&self) -> BiasMode {
        self.bias_mode
    }

    fn write_register(&mut self, reg: Register, value: u8) -> Result<(), Error<E>> {
        self.spi.write(&[reg.write_address(), value]).map_err(Error::Spi)
    }

    fn read_registers(&mut self, reg: Register, read_buf: &mut [u8]) -> Result<(), Error<E>> {
        self.spi
            .transaction(&mut [Operation::Write(&[reg.read_address()]), Operation::Read(read_buf)])
            .map_err(Error::Spi)
    }

    fn read_u16(&mut self, reg: Register) -> Result<u16, Error<E>> {
        let mut read_buf = [0u8; 2];
        self.read_registers(reg, &mut read_buf)?;
        Ok(u16::from_be_bytes(read_buf))
    }

    // The shadow only changes once the byte is on the device.
    fn write_config(&mut self, config: ConfigRegister) -> Result<(), Error<E>> {
        let bits = config.bits();
        trace!("max31865::write_config(): bits={}", bits);
        self.write_register(Register::Config, bits)?;
        self.config = config;
        Ok(())
    }

    /// Set lead configuration, notch filter and calibration, then clear any latched fault.
    ///
    /// `wires` must be 2, 3 or 4 and `filter_hz` 50 or 60. `rtd_zero` defaults to a quarter of
    /// `reference`. Bad arguments are rejected before anything is written.
    pub fn configure(&mut self, wires: u8, filter_hz: u16, reference: f64, rtd_zero: Option<f64>) -> Result<(), Error<E>> {
        let (Some(wire_mode), Some(filter), Some(calibration)) = (
            WireMode::from_wires(wires),
            FilterHz::from_hz(filter_hz),
            Calibration::new(reference, rtd_zero),
        ) else {
            return Err(Error::InvalidArgument);
        };

        self.write_config(ConfigRegister { wire_mode, filter, ..self.config })?;
        self.clear_fault()?;
        self.calibration = calibration;
        Ok(())
    }

    /// Unlatch the fault status by strobing the fault clear bit
    pub fn clear_fault(&mut self) -> Result<(), Error<E>> {
        self.write_config(ConfigRegister { fault_clear: true, ..self.config })?;
        self.write_config(ConfigRegister { fault_clear: false, ..self.config })
    }

    /// Switch the bias voltage. Turning it on blocks until it has settled.
    pub fn set_bias(&mut self, enable: bool) -> Result<(), Error<E>> {
        self.write_config(ConfigRegister { bias: enable, ..self.config })?;
        if enable {
            self.delay.delay_ms(BIAS_WARM_UP_MS);
        }
        Ok(())
    }

    /// Run a one-shot conversion and return the 15-bit code.
    ///
    /// With [`BiasMode::Auto`] bias is switched on (with its warm-up) and off around the
    /// conversion, and switched off again if the conversion hits a bus error. With
    /// [`BiasMode::Manual`] bias must already be on, otherwise the bus is left
    /// alone and [`Reading::DeviceOff`] comes back. A set fault bit yields [`Reading::Fault`];
    /// nothing is retried.
    pub fn read(&mut self) -> Result<Reading, Error<E>> {
        let auto_bias = self.bias_mode == BiasMode::Auto;
        if !auto_bias && !self.config.bias {
            debug!("max31865::read(): bias is off");
            return Ok(Reading::DeviceOff);
        }

        self.clear_fault()?;
        if auto_bias {
            self.set_bias(true)?;
        }

        let raw = match self.convert() {
            Ok(raw) => raw,
            Err(err) => {
                if auto_bias {
                    // best effort, the caller gets the original error
                    let _ = self.set_bias(false);
                }
                return Err(err);
            }
        };
        trace!("max31865::read(): raw={}", raw);

        if auto_bias {
            self.set_bias(false)?;
        }

        if raw & RTD_FAULT_BIT != 0 {
            Ok(Reading::Fault)
        } else {
            Ok(Reading::Code(raw >> 1))
        }
    }

    fn convert(&mut self) -> Result<u16, Error<E>> {
        let conversion_ms = self.config.filter.conversion_time_ms();
        self.write_config(ConfigRegister { one_shot: true, ..self.config })?;
        self.delay.delay_ms(conversion_ms);
        // the device has dropped the one-shot bit by now
        self.config.one_shot = false;
        self.read_u16(Register::RtdMsb)
    }

    /// Read the fault status register
    pub fn read_fault_status(&mut self) -> Result<FaultStatus, Error<E>> {
        let mut read_buf = [0u8; 1];
        self.read_registers(Register::FaultStatus, &mut read_buf)?;
        Ok(FaultStatus::from(read_buf[0]))
    }

    /// Set the low and high fault thresholds, in raw codes
    pub fn set_fault_thresholds(&mut self, low: u16, high: u16) -> Result<(), Error<E>> {
        if low > RAW_CODE_MAX || high > RAW_CODE_MAX {
            return Err(Error::InvalidArgument);
        }
        let [high_msb, high_lsb] = (high << 1).to_be_bytes();
        let [low_msb, low_lsb] = (low << 1).to_be_bytes();
        self.write_register(Register::HighFaultThresholdMsb, high_msb)?;
        self.write_register(Register::HighFaultThresholdLsb, high_lsb)?;
        self.write_register(Register::LowFaultThresholdMsb, low_msb)?;
        self.write_register(Register::LowFaultThresholdLsb, low_lsb)
    }

    /// Read the low and high fault thresholds, in raw codes
    pub fn fault_thresholds(&mut self) -> Result<(u16, u16), Error<E>> {
        let high = self.read_u16(Register::HighFaultThresholdMsb)? >> 1;
        let low = self.read_u16(Register::LowFaultThresholdMsb)? >> 1;
        Ok((low, high))
    }

    /// One-shot read, converted to ohms with the configured reference
    pub fn read_resistance(&mut self) -> Result<f64, Error<E>> {
        let code = self.read()?.into_code()?;
        Ok(resistance(code, self.calibration.r_ref()))
    }

    /// One-shot read, converted with the linear approximation
    pub fn read_simple_temperature(&mut self) -> Result<f64, Error<E>> {
        let code = self.read()?.into_code()?;
        Ok(simple_temperature(code))
    }

    /// One-shot read, converted with Callendar-Van Dusen and the configured calibration
    pub fn read_temperature(&mut self) -> Result<f64, Error<E>> {
        let code = self.read()?.into_code()?;
        Ok(precise_temperature(code, self.calibration.r_ref(), self.calibration.r0())?)
    }
}
