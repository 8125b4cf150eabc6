pub mod distance_units;
pub mod energy_units;
pub mod mass_units;

/// Trait for units that can be converted to the nuclear base units
/// (MeV for energies and masses, fm for distances).
pub trait Unit: Copy + Clone {
    const TO_BASE_MUL: f64;

    fn to_base(&self, value: f64) -> f64 {
        value * Self::TO_BASE_MUL
    }
}

/// Mega electronvolt, the base unit of energies and of masses (MeV / c^2).
#[derive(Copy, Clone, Debug)]
pub struct MeV;

impl Unit for MeV {
    const TO_BASE_MUL: f64 = 1.0;
}
