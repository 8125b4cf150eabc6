use std::f64::consts::PI;

use nuclear::{angular_momentum::FermionSpinOrbitCoupling, constants::MB_PER_FM2};
use num::complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::asymptotics::Asymptotics;

/// Elastic S-matrix element of a single partial wave.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PartialWaveSMatrix {
    pub s_matrix: Complex64,
    pub coupling: FermionSpinOrbitCoupling,
}

impl PartialWaveSMatrix {
    pub fn new(s_matrix: Complex64, coupling: FermionSpinOrbitCoupling) -> Self {
        Self { s_matrix, coupling }
    }

    /// Matches the dimensionless R-matrix u / (s u') at the point `s`
    /// to the asymptotic waves evaluated at the same point.
    pub fn from_r_matrix(
        r_matrix: Complex64,
        s: f64,
        asymptotics: &Asymptotics,
        coupling: FermionSpinOrbitCoupling,
    ) -> Self {
        let s_matrix = (asymptotics.wave_in - r_matrix * s * asymptotics.deriv_in)
            / (asymptotics.wave_out - r_matrix * s * asymptotics.deriv_out);

        Self { s_matrix, coupling }
    }

    /// Complex phase shift ln(S) / 2i.
    pub fn phase_shift(&self) -> Complex64 {
        self.s_matrix.ln() / Complex64::new(0., 2.)
    }

    /// Statistical weight (2j + 1) / (2s + 1) of the partial wave.
    fn weight(&self) -> f64 {
        self.coupling.j21 as f64 / 2.
    }
}

/// Integrated cross sections [mb], summed over the partial waves of a spin 1/2 projectile.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct CrossSections {
    pub elastic: f64,
    pub reaction: f64,
    pub total: f64,
}

impl CrossSections {
    /// `k` is the CMS momentum [fm^-1].
    pub fn from_partial_waves<'a>(waves: impl IntoIterator<Item = &'a PartialWaveSMatrix>, k: f64) -> Self {
        let mut cross_sections = Self::default();

        for wave in waves {
            let s = wave.s_matrix;
            let g = wave.weight();

            cross_sections.elastic += g * (1. - s).norm_sqr();
            cross_sections.reaction += g * (1. - s.norm_sqr());
            cross_sections.total += g * 2. * (1. - s.re);
        }

        let scale = PI / (k * k) * MB_PER_FM2;
        cross_sections.elastic *= scale;
        cross_sections.reaction *= scale;
        cross_sections.total *= scale;

        cross_sections
    }
}
