use super::Unit;

pub trait DistanceUnit: Unit {}

/// Struct for representing distance unit values, with fm as the base unit.
/// # Examples
/// ```
/// use nuclear::units::distance_units::{Distance, Fm, Pm};
/// let distance_pm = Distance(0.012, Pm);
/// let distance_fm = distance_pm.to(Fm);
/// assert!((distance_fm.value() - 12.0).abs() < 1e-9);
/// ```
#[derive(Debug, Copy, Clone)]
pub struct Distance<U: DistanceUnit>(pub f64, pub U);

impl<U: DistanceUnit> Distance<U> {
    pub fn to_base(&self) -> f64 {
        self.1.to_base(self.0)
    }

    pub fn to<V: DistanceUnit>(&self, unit: V) -> Distance<V> {
        Distance(self.1.to_base(self.0) / unit.to_base(1.0), unit)
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    pub fn unit(&self) -> U {
        self.1
    }
}

/// Femtometer
#[derive(Copy, Clone, Debug)]
pub struct Fm;

impl Unit for Fm {
    const TO_BASE_MUL: f64 = 1.0;
}
impl DistanceUnit for Fm {}

/// Picometer
#[derive(Copy, Clone, Debug)]
pub struct Pm;

impl Unit for Pm {
    const TO_BASE_MUL: f64 = 1e3;
}
impl DistanceUnit for Pm {}
