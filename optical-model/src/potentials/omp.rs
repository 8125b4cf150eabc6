use std::{fs::File, io::BufReader, path::Path};

use nuclear::angular_momentum::FermionSpinOrbitCoupling;
use num::complex::Complex64;
use serde_json::Value;
use thiserror::Error;

use crate::channel::{Energetics, Isotope, Projectile};

use super::{
    form_factors::{DerivWoodsSaxon, Thomas, WoodsSaxon},
    potential::{FormFactor, Potential},
};

/// Terms of the global phenomenological optical potential
/// V(r) + V_s(r) + V_so(r) l·s + i W(r) + i W_s(r) + i W_so(r) l·s.
///
/// Real parts carry real depths, imaginary parts imaginary depths.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OmTerms {
    pub real_volume: WoodsSaxon,
    pub imag_volume: WoodsSaxon,
    pub real_surface: DerivWoodsSaxon,
    pub imag_surface: DerivWoodsSaxon,
    pub real_spin_orbit: Thomas,
    pub imag_spin_orbit: Thomas,
}

impl OmTerms {
    /// Number of parameters (depth, radius, diffuseness) of all six terms.
    pub const PARAMS: usize = 18;

    /// Terms from the flat parameter layout of [`OmTerms::to_params`].
    pub fn from_params(params: &[f64]) -> Self {
        assert!(
            params.len() >= Self::PARAMS,
            "optical potential needs {} parameters, got {}",
            Self::PARAMS,
            params.len()
        );
        let p = params;
        let i = Complex64::i();

        Self {
            real_volume: WoodsSaxon::new(p[0], p[1], p[2]),
            imag_volume: WoodsSaxon::new(i * p[3], p[4], p[5]),
            real_surface: DerivWoodsSaxon::new(p[6], p[7], p[8]),
            imag_surface: DerivWoodsSaxon::new(i * p[9], p[10], p[11]),
            real_spin_orbit: Thomas::new(p[12], p[13], p[14]),
            imag_spin_orbit: Thomas::new(i * p[15], p[16], p[17]),
        }
    }

    /// Flat layout (depth, radius, diffuseness) per term, in the order
    /// real volume, imaginary volume, real surface, imaginary surface,
    /// real spin-orbit, imaginary spin-orbit. Imaginary depths are stored by their imaginary part.
    pub fn to_params(&self) -> [f64; Self::PARAMS] {
        [
            self.real_volume.depth.re,
            self.real_volume.radius,
            self.real_volume.diffuseness,
            self.imag_volume.depth.im,
            self.imag_volume.radius,
            self.imag_volume.diffuseness,
            self.real_surface.depth.re,
            self.real_surface.radius,
            self.real_surface.diffuseness,
            self.imag_surface.depth.im,
            self.imag_surface.radius,
            self.imag_surface.diffuseness,
            self.real_spin_orbit.depth.re,
            self.real_spin_orbit.radius,
            self.real_spin_orbit.diffuseness,
            self.imag_spin_orbit.depth.im,
            self.imag_spin_orbit.radius,
            self.imag_spin_orbit.diffuseness,
        ]
    }

    pub fn value(&self, r: f64, l_dot_s: f64) -> Complex64 {
        self.real_volume.form(r)
            + self.real_surface.form(r)
            + self.real_spin_orbit.form(r) * l_dot_s
            + self.imag_volume.form(r)
            + self.imag_surface.form(r)
            + self.imag_spin_orbit.form(r) * l_dot_s
    }
}

/// Global parametrization of the optical potential terms as functions of the target and the lab energy.
///
/// Radii are the full radii entering the form factors, not reduced by A^(1/3).
pub trait OmParams: Send + Sync {
    fn projectile(&self) -> Projectile;

    fn terms(&self, z: u32, a: u32, erg_lab: f64) -> OmTerms;
}

#[derive(Debug, Error)]
pub enum ParamsError {
    #[error("missing or non-numeric parameter {0:?}")]
    MissingKey(String),
    #[error("could not read parameter file: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not parse parameter file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parameter file of a global parametrization as a JSON value.
pub fn read_params(path: &Path) -> Result<Value, ParamsError> {
    Ok(serde_json::from_reader(BufReader::new(File::open(path)?))?)
}

/// -(N - Z) / A for neutrons and (N - Z) / A for protons.
pub fn asymmetry(projectile: Projectile, z: u32, a: u32) -> f64 {
    let alpha = (a as f64 - 2. * z as f64) / a as f64;

    match projectile {
        Projectile::Neutron => -alpha,
        Projectile::Proton => alpha,
    }
}

/// Optical potential of a fixed target with a global parametrization.
#[derive(Clone, Debug)]
pub struct OpticalPotential<P: OmParams> {
    pub target: Isotope,
    pub params: P,
}

impl<P: OmParams> OpticalPotential<P> {
    pub fn new(target: Isotope, params: P) -> Self {
        Self { target, params }
    }

    pub fn terms(&self, erg_lab: f64) -> OmTerms {
        self.params.terms(self.target.z, self.target.a, erg_lab)
    }
}

impl<P: OmParams> Potential for OpticalPotential<P> {
    fn value(&self, r: f64, erg: &Energetics, am: &FermionSpinOrbitCoupling) -> Complex64 {
        self.terms(erg.erg_lab).value(r, am.l_dot_s())
    }
}

#[cfg(test)]
mod test {
    use approx::assert_relative_eq;
    use num::complex::Complex64;

    use crate::potentials::{form_factors::WoodsSaxon, potential::FormFactor};

    use super::OmTerms;

    fn params() -> Vec<f64> {
        vec![
            -49.2, 5.9, 0.67, -3.1, 5.9, 0.67, 0., 6.1, 0.55, -28.0, 6.4, 0.54, 5.6, 5.2, 0.59, -0.1, 5.2, 0.59,
        ]
    }

    #[test]
    fn test_params_layout() {
        let terms = OmTerms::from_params(&params());

        assert_eq!(terms.to_params().to_vec(), params());
        assert_eq!(terms.imag_volume.depth, Complex64::new(0., -3.1));
        assert_eq!(terms.real_spin_orbit.radius, 5.2);
    }

    #[test]
    fn test_spin_orbit_splitting() {
        let terms = OmTerms::from_params(&params());
        let r = 5.0;

        let up = terms.value(r, 0.5);
        let down = terms.value(r, -1.0);
        let central = terms.value(r, 0.);

        let so = terms.real_spin_orbit.form(r) + terms.imag_spin_orbit.form(r);
        assert_relative_eq!(up - central, so * 0.5, epsilon = 1e-12, max_relative = 1e-12);
        assert_relative_eq!(down - central, -so, epsilon = 1e-12, max_relative = 1e-12);

        let absorption = terms.imag_volume.form(r) + terms.imag_surface.form(r);
        assert_relative_eq!(central.im, absorption.im, epsilon = 1e-12, max_relative = 1e-12);

        let volume = WoodsSaxon::new(Complex64::new(-49.2, -3.1), 5.9, 0.67);
        assert_relative_eq!(volume.form(r), terms.real_volume.form(r) + terms.imag_volume.form(r), epsilon = 1e-12, max_relative = 1e-12);
    }

    #[test]
    #[should_panic]
    fn test_too_few_params() {
        OmTerms::from_params(&[1., 2., 3.]);
    }
}
