//! Conversion from the units a provider reports in to the unit system
//! the caller asked for. Bright Sky's `dwd` units are already metric,
//! so the metric branch is the identity everywhere.

use crate::model::UnitSystem;

const KMH_PER_MPH: f64 = 1.609_344;
const HPA_PER_INHG: f64 = 33.863_886_666_667;
const MM_PER_INCH: f64 = 25.4;

/// °C into the target system (°F for imperial).
pub fn temperature_from_celsius(value: f64, units: UnitSystem) -> f64 {
    match units {
        UnitSystem::Metric => value,
        UnitSystem::Imperial => value * 9.0 / 5.0 + 32.0,
    }
}

/// hPa into the target system (inHg for imperial).
pub fn pressure_from_hpa(value: f64, units: UnitSystem) -> f64 {
    match units {
        UnitSystem::Metric => value,
        UnitSystem::Imperial => value / HPA_PER_INHG,
    }
}

/// km/h into the target system (mph for imperial).
pub fn speed_from_kmh(value: f64, units: UnitSystem) -> f64 {
    match units {
        UnitSystem::Metric => value,
        UnitSystem::Imperial => value / KMH_PER_MPH,
    }
}

/// mm into the target system (inches for imperial).
pub fn precipitation_from_mm(value: f64, units: UnitSystem) -> f64 {
    match units {
        UnitSystem::Metric => value,
        UnitSystem::Imperial => value / MM_PER_INCH,
    }
}
