use nuclear::utility::{hankel_minus, hankel_minus_deriv, hankel_plus, hankel_plus_deriv};
use num::complex::Complex64;
use serde::{Deserialize, Serialize};

/// Free solutions of the reduced radial Schrödinger equation at z = k r,
/// also the asymptotic solutions of any interaction vanishing faster than 1/r.
/// Derivatives are taken with respect to z.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Asymptotics {
    pub wave_out: Complex64,
    pub wave_in: Complex64,
    pub deriv_out: Complex64,
    pub deriv_in: Complex64,
}

impl Asymptotics {
    pub fn new(l: u32, k: f64, r: f64) -> Self {
        Self::at(l, k * r)
    }

    /// Asymptotics at the dimensionless point `s = k r`.
    pub fn at(l: u32, s: f64) -> Self {
        Self {
            wave_out: hankel_plus(l, s),
            wave_in: hankel_minus(l, s),
            deriv_out: hankel_plus_deriv(l, s),
            deriv_in: hankel_minus_deriv(l, s),
        }
    }

    /// Asymptotics of every l < lmax.
    pub fn for_waves(lmax: usize, k: f64, r: f64) -> Vec<Self> {
        (0..lmax as u32).map(|l| Self::new(l, k, r)).collect()
    }
}
