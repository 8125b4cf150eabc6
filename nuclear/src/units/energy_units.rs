use super::{MeV, Unit};

pub trait EnergyUnit: Unit {}

/// Struct for representing energy unit values
/// # Examples
/// ```
/// use nuclear::units::{MeV, energy_units::{Energy, KeV}};
/// let energy_kev = Energy(1500.0, KeV);
/// let energy_mev = energy_kev.to(MeV);
/// assert!((energy_mev.value() - 1.5).abs() < 1e-12);
/// ```
#[derive(Debug, Copy, Clone)]
pub struct Energy<U: EnergyUnit>(pub f64, pub U);

impl<U: EnergyUnit> Energy<U> {
    pub fn to_base(&self) -> f64 {
        self.1.to_base(self.0)
    }

    pub fn to<V: EnergyUnit>(&self, unit: V) -> Energy<V> {
        Energy(self.1.to_base(self.0) / unit.to_base(1.0), unit)
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    pub fn unit(&self) -> U {
        self.1
    }
}

impl EnergyUnit for MeV {}

#[derive(Copy, Clone, Debug)]
pub struct KeV;

impl Unit for KeV {
    const TO_BASE_MUL: f64 = 1e-3;
}
impl EnergyUnit for KeV {}

#[derive(Copy, Clone, Debug)]
pub struct Ev;

impl Unit for Ev {
    const TO_BASE_MUL: f64 = 1e-6;
}
impl EnergyUnit for Ev {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn energy_units() {
        let energy_kev = Energy(250.0, KeV);
        let energy_ev = energy_kev.to(Ev);

        assert_eq!(energy_kev.to_base(), 0.25);
        assert!((energy_ev.value() - 2.5e5).abs() < 1e-6);
        assert!((energy_ev.to_base() - energy_kev.to_base()).abs() < 1e-15);
    }
}
