use std::f64::consts::PI;

use nuclear::{
    angular_momentum::FermionSpinOrbitCoupling,
    constants::{C, HBAR, MEV_PER_AMU},
};
use num::complex::Complex64;

use crate::channel::Energetics;

use super::potential::{NonlocalPotential, Potential};

/// Local potential smeared off the diagonal by a normalized Gaussian in r - r',
/// F. Perey and B. Buck, Nucl. Phys. 32, 353 (1962).
#[derive(Clone, Debug)]
pub struct PereyBuck<P: Potential> {
    pub local: P,
    /// non-locality range [fm]
    pub beta: f64,
}

impl<P: Potential> PereyBuck<P> {
    pub fn new(local: P, beta: f64) -> Self {
        assert!(beta > 0., "non-locality range must be positive");

        Self { local, beta }
    }

    pub fn non_local_factor(&self, x: f64) -> f64 {
        (-(x * x) / (self.beta * self.beta)).exp() / (PI.powf(1.5) * self.beta.powi(3))
    }
}

impl<P: Potential> NonlocalPotential for PereyBuck<P> {
    fn value(&self, r: f64, rp: f64, erg: &Energetics, am: &FermionSpinOrbitCoupling) -> Complex64 {
        self.local.value(0.5 * (r + rp), erg, am) * self.non_local_factor(r - rp)
    }
}

/// Separable potential of Y. Yamaguchi, Phys. Rev. 95, 1628 (1954).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Yamaguchi {
    /// [fm^-1]
    pub alpha: f64,
    /// [fm^-1]
    pub beta: f64,
    /// hbar^2 / mu [MeV fm^2]
    pub f: f64,
}

impl Yamaguchi {
    /// `mass` [amu] enters the strength as f = hbar^2 / mass.
    pub fn new(mass: f64, alpha: f64, beta: f64) -> Self {
        let hbarc = HBAR * C;

        Self {
            alpha,
            beta,
            f: hbarc * hbarc / (mass * MEV_PER_AMU),
        }
    }

    /// Analytic s-wave K-matrix tan(delta) at momentum `k` [fm^-1].
    pub fn analytic_swave_kmatrix(&self, k: f64) -> f64 {
        let (a, b) = (self.alpha, self.beta);
        let d = 2. * (a + b) * (a + b);
        let k2 = k * k;

        let cot_delta =
            (a * b * (a + 2. * b) / d + k2 * (a * a + 2. * a * b + 3. * b * b) / (b * d) + k2 * k2 / (b * d)) / k;

        1. / cot_delta
    }
}

impl Default for Yamaguchi {
    /// Reproduces the deuteron binding and the triplet neutron-proton scattering length.
    fn default() -> Self {
        Self {
            alpha: 0.2316053,
            beta: 1.3918324,
            f: 41.472,
        }
    }
}

impl NonlocalPotential for Yamaguchi {
    fn value(&self, r: f64, rp: f64, _erg: &Energetics, _am: &FermionSpinOrbitCoupling) -> Complex64 {
        let ab = self.alpha + self.beta;

        Complex64::from(self.f * 2. * self.beta * ab * ab * (-self.beta * (r + rp)).exp())
    }
}

#[cfg(test)]
mod test {
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use nuclear::{angular_momentum::FermionSpinOrbitCoupling, constants::N_MASS_AMU};

    use crate::{
        channel::Channel,
        potentials::{form_factors::WoodsSaxon, potential::{FormFactor, NonlocalPotential}},
    };

    use super::{PereyBuck, Yamaguchi};

    #[test]
    fn test_perey_buck() {
        let channel = Channel::new(0., 12., N_MASS_AMU, 0, 2, 40., 20);
        let erg = channel.energetics_cms(10.);
        let am = FermionSpinOrbitCoupling::default();

        let ws = WoodsSaxon::new(-70., 4.2, 0.65);
        let pb = PereyBuck::new(ws, 0.85);

        assert_relative_eq!(pb.value(2., 3., &erg, &am), pb.value(3., 2., &erg, &am), epsilon = 1e-15, max_relative = 1e-15);
        assert_relative_eq!(pb.diagonal(3., &erg, &am), ws.form(3.) * pb.non_local_factor(0.), epsilon = 1e-14, max_relative = 1e-14);
        assert_relative_eq!(pb.value_reduced(2., 3., &erg, &am), pb.value(2., 3., &erg, &am) * 6., epsilon = 1e-14, max_relative = 1e-14);

        // the factor integrates to one over three dimensions
        let h = 0.01;
        let norm: f64 = (1..1000)
            .map(|i| i as f64 * h)
            .map(|x| 4. * std::f64::consts::PI * x * x * pb.non_local_factor(x) * h)
            .sum();
        assert_abs_diff_eq!(norm, 1., epsilon = 1e-6);
    }

    #[test]
    fn test_yamaguchi() {
        let y = Yamaguchi::default();
        let channel = Channel::new(0., 15., N_MASS_AMU, 0, 2, 1.00727646688, 1);
        let erg = channel.energetics_cms(1.);
        let am = FermionSpinOrbitCoupling::default();

        assert_relative_eq!(y.value(1., 2., &erg, &am), y.value(2., 1., &erg, &am), epsilon = 1e-15, max_relative = 1e-15);
        assert_relative_eq!(y.value(0.5, 0.5, &erg, &am).re, y.value(0., 1., &erg, &am).re, epsilon = 1e-14, max_relative = 1e-14);

        // low momentum limit of tan(delta) / k
        let k = 1e-4;
        let scattering_length = y.analytic_swave_kmatrix(k) / k;
        let (a, b) = (y.alpha, y.beta);
        let expected = 2. * (a + b) * (a + b) / (a * b * (a + 2. * b));
        assert_relative_eq!(scattering_length, expected, max_relative = 1e-6);
        assert!(scattering_length > 5. && scattering_length < 6.);

        let nucleon = Yamaguchi::new(1.0079, a, b);
        assert_relative_eq!(nucleon.f, 41.472, max_relative = 1e-3);
    }
}
