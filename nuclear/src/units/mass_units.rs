use crate::constants::MEV_PER_AMU;

use super::{MeV, Unit};

pub trait MassUnit: Unit {}

/// Struct for representing mass unit values, with MeV / c^2 as the base unit.
/// # Examples
/// ```
/// use nuclear::units::{MeV, mass_units::{Amu, Mass}};
/// let mass_amu = Mass(1.0, Amu);
/// let mass_mev = mass_amu.to(MeV);
/// assert_eq!(mass_amu.to_base(), mass_mev.value());
/// ```
#[derive(Debug, Copy, Clone)]
pub struct Mass<U: MassUnit>(pub f64, pub U);

impl<U: MassUnit> Mass<U> {
    pub fn to_base(&self) -> f64 {
        self.1.to_base(self.0)
    }

    pub fn to<V: MassUnit>(&self, unit: V) -> Mass<V> {
        Mass(self.1.to_base(self.0) / unit.to_base(1.0), unit)
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    pub fn unit(&self) -> U {
        self.1
    }
}

impl MassUnit for MeV {}

/// Atomic mass unit
#[derive(Copy, Clone, Debug)]
pub struct Amu;

impl Unit for Amu {
    const TO_BASE_MUL: f64 = MEV_PER_AMU;
}
impl MassUnit for Amu {}
