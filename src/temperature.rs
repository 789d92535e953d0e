//! Raw code to temperature conversion
//!
//! The RTD register holds `R_rtd / R_ref` scaled to 15 bits. [`simple_temperature`] is the
//! datasheet's straight line, good to about 1.5 °C over -100..100 °C for a PT100 on a 400 Ω
//! reference. [`precise_temperature`] inverts the Callendar-Van Dusen equation
//!
//! ```text
//! R(t) / R0 = 1 + A·t + B·t² + C·(t - 100)·t³
//! ```
//!
//! with the IEC 60751 coefficients, where the `C` term only applies below 0 °C.

use crate::newton::{DidNotConverge, newton_raphson};

/// Callendar-Van Dusen `A` coefficient
pub const CVD_A: f64 = 3.9083e-3;
/// Callendar-Van Dusen `B` coefficient
pub const CVD_B: f64 = -5.775e-7;
/// Callendar-Van Dusen `C` coefficient, below 0 °C only
pub const CVD_C: f64 = -4.18301e-12;

const FULL_SCALE: f64 = 32768.0;

/// Linear approximation, ignores calibration entirely
pub fn simple_temperature(code: u16) -> f64 {
    code as f64 / 32.0 - 256.0
}

/// Measured RTD resistance in ohms
pub fn resistance(code: u16, r_ref: f64) -> f64 {
    code as f64 * r_ref / FULL_SCALE
}

/// `R(t) / R0` for a temperature in Centigrade
pub fn callendar_van_dusen(t: f64) -> f64 {
    let c = if t < 0.0 { CVD_C } else { 0.0 };
    1.0 + CVD_A * t + CVD_B * t * t - 100.0 * c * t * t * t + c * t * t * t * t
}

fn callendar_van_dusen_slope(t: f64) -> f64 {
    let c = if t < 0.0 { CVD_C } else { 0.0 };
    CVD_A + 2.0 * CVD_B * t - 300.0 * c * t * t + 4.0 * c * t * t * t
}

/// Solve Callendar-Van Dusen for the temperature at which the RTD measures `r_rtd` ohms
pub fn temperature_from_resistance(r_rtd: f64, r0: f64) -> Result<f64, DidNotConverge> {
    newton_raphson(callendar_van_dusen, callendar_van_dusen_slope, r_rtd / r0, 0.0)
}

/// Callendar-Van Dusen temperature in Centigrade for a raw code
pub fn precise_temperature(code: u16, r_ref: f64, r0: f64) -> Result<f64, DidNotConverge> {
    temperature_from_resistance(resistance(code, r_ref), r0)
}
