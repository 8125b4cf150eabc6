use num::complex::Complex64;

use super::potential::FormFactor;

/// Woods-Saxon central form V / (1 + exp((r - R) / a)).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WoodsSaxon {
    pub depth: Complex64,
    pub radius: f64,
    pub diffuseness: f64,
}

impl WoodsSaxon {
    pub fn new(depth: impl Into<Complex64>, radius: f64, diffuseness: f64) -> Self {
        Self {
            depth: depth.into(),
            radius,
            diffuseness,
        }
    }
}

impl FormFactor for WoodsSaxon {
    fn form(&self, r: f64) -> Complex64 {
        self.depth / (1. + ((r - self.radius) / self.diffuseness).exp())
    }
}

/// Surface peaked radial derivative of a Woods-Saxon form.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DerivWoodsSaxon {
    pub depth: Complex64,
    pub radius: f64,
    pub diffuseness: f64,
}

impl DerivWoodsSaxon {
    pub fn new(depth: impl Into<Complex64>, radius: f64, diffuseness: f64) -> Self {
        Self {
            depth: depth.into(),
            radius,
            diffuseness,
        }
    }
}

impl FormFactor for DerivWoodsSaxon {
    fn form(&self, r: f64) -> Complex64 {
        // y / (1 + y)^2 is symmetric under y -> 1 / y
        let y = (-(r - self.radius).abs() / self.diffuseness).exp();

        -self.depth / self.diffuseness * y / ((1. + y) * (1. + y))
    }
}

/// Spin-orbit form, derivative of a Woods-Saxon times 1/r.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Thomas {
    pub depth: Complex64,
    pub radius: f64,
    pub diffuseness: f64,
}

impl Thomas {
    pub fn new(depth: impl Into<Complex64>, radius: f64, diffuseness: f64) -> Self {
        Self {
            depth: depth.into(),
            radius,
            diffuseness,
        }
    }
}

impl FormFactor for Thomas {
    fn form(&self, r: f64) -> Complex64 {
        DerivWoodsSaxon::new(self.depth, self.radius, self.diffuseness).form(r) / r
    }
}

/// V exp(-(r - R)^2 / sigma^2)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Gaussian {
    pub depth: Complex64,
    pub center: f64,
    pub sigma: f64,
}

impl Gaussian {
    pub fn new(depth: impl Into<Complex64>, center: f64, sigma: f64) -> Self {
        Self {
            depth: depth.into(),
            center,
            sigma,
        }
    }
}

impl FormFactor for Gaussian {
    fn form(&self, r: f64) -> Complex64 {
        let x = (r - self.center) / self.sigma;

        self.depth * (-x * x).exp()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MultiGaussian(pub Vec<Gaussian>);

impl FormFactor for MultiGaussian {
    fn form(&self, r: f64) -> Complex64 {
        self.0.iter().map(|g| g.form(r)).sum()
    }
}

/// Minnesota nucleon-nucleon interaction,
/// Thompson, LeMere, Tang, Nucl. Phys. A 286, 53 (1977).
pub struct Minnesota;

impl Minnesota {
    /// Sum of two Gaussians V0_i exp(-kappa_i r^2).
    pub fn new(v01: f64, v02: f64, kappa1: f64, kappa2: f64) -> MultiGaussian {
        MultiGaussian(vec![
            Gaussian::new(v01, 0., 1. / kappa1.sqrt()),
            Gaussian::new(v02, 0., 1. / kappa2.sqrt()),
        ])
    }

    pub fn build_1s0() -> MultiGaussian {
        Self::new(200., -98.15, 1.487, 0.465)
    }

    pub fn build_3s1() -> MultiGaussian {
        Self::new(200., -178., 1.487, 0.639)
    }
}

/// -g exp(-r / mu) / r
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Yukawa {
    pub range: f64,
    pub coupling: f64,
}

impl Yukawa {
    pub fn new(range: f64, coupling: f64) -> Self {
        Self { range, coupling }
    }
}

impl FormFactor for Yukawa {
    fn form(&self, r: f64) -> Complex64 {
        Complex64::from(-self.coupling * (-r / self.range).exp() / r)
    }
}

/// Constant attractive well of the given depth inside the radius.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SphereWell {
    pub radius: f64,
    pub depth: Complex64,
}

impl SphereWell {
    pub fn new(radius: f64, depth: impl Into<Complex64>) -> Self {
        Self {
            radius,
            depth: depth.into(),
        }
    }
}

impl FormFactor for SphereWell {
    fn form(&self, r: f64) -> Complex64 {
        if r < self.radius { -self.depth } else { Complex64::new(0., 0.) }
    }
}
