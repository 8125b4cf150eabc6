use nuclear::angular_momentum::FermionSpinOrbitCoupling;
use num::complex::Complex64;

use crate::channel::Energetics;

/// Trait defining a local potential, diagonal in coordinate space
/// <r|V|r'> = V(r) delta(r - r').
pub trait Potential: Send + Sync {
    /// Value [MeV] at radius `r` [fm].
    fn value(&self, r: f64, erg: &Energetics, am: &FermionSpinOrbitCoupling) -> Complex64;

    fn value_reduced(&self, r: f64, erg: &Energetics, am: &FermionSpinOrbitCoupling) -> Complex64 {
        r * self.value(r, erg, am)
    }
}

/// Trait defining a non-local potential symmetric in its arguments, V(r, r') = V(r', r).
pub trait NonlocalPotential: Send + Sync {
    fn value(&self, r: f64, rp: f64, erg: &Energetics, am: &FermionSpinOrbitCoupling) -> Complex64;

    fn value_reduced(&self, r: f64, rp: f64, erg: &Energetics, am: &FermionSpinOrbitCoupling) -> Complex64 {
        self.value(r, rp, erg, am) * r * rp
    }

    /// Diagonal V(r, r).
    fn diagonal(&self, r: f64, erg: &Energetics, am: &FermionSpinOrbitCoupling) -> Complex64 {
        self.value(r, r, erg, am)
    }
}

/// Shape of a potential term that depends on the radius only.
pub trait FormFactor: Send + Sync {
    fn form(&self, r: f64) -> Complex64;
}

impl<F: FormFactor> Potential for F {
    fn value(&self, r: f64, _erg: &Energetics, _am: &FermionSpinOrbitCoupling) -> Complex64 {
        self.form(r)
    }
}
