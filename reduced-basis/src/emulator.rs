use faer::{
    Mat, c64,
    linalg::solvers::{DenseSolveCore, Solve},
};
use log::{debug, warn};
use nuclear::angular_momentum::{FermionSpinOrbitCoupling, Polarization};
use optical_model::{
    asymptotics::Asymptotics,
    observables::s_matrix::{CrossSections, PartialWaveSMatrix},
};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{
    basis::Basis,
    error::{EmulatorError, ShapeError},
    interaction::{EimInteractionSpace, energy_momentum},
};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmulatorConfig {
    /// Solve the partial waves with a rayon parallel iterator.
    pub parallel: bool,
    /// Largest accepted relative residual ||A x - b|| / (||A|| ||x|| + ||b||) of a reduced solve.
    pub residual_tolerance: f64,
    /// Smallest accepted reciprocal condition number 1 / (||A||_1 ||A^-1||_1) of a reduced system.
    pub min_rcond: f64,
}

impl Default for EmulatorConfig {
    fn default() -> Self {
        Self {
            parallel: false,
            residual_tolerance: 1e-8,
            min_rcond: 1e-12,
        }
    }
}

/// Offline data of one polarization.
#[derive(Clone)]
pub struct ReducedSpace {
    pub interaction: EimInteractionSpace,
    pub basis: Basis,
}

impl ReducedSpace {
    pub fn try_new(interaction: EimInteractionSpace, basis: Basis) -> Result<Self, ShapeError> {
        let expected = [interaction.lmax(), interaction.nbasis(), interaction.mesh_size()];
        let found = [basis.lmax(), basis.nbasis(), basis.mesh_size()];
        if expected != found {
            return Err(ShapeError::new("basis (lmax, nbasis, mesh size)", &expected, &found));
        }

        Ok(Self { interaction, basis })
    }
}

/// Reduced basis emulator of the elastic partial waves of a spin 1/2 projectile.
///
/// The `Down` polarization stores one partial wave less than `Up`,
/// its row `i` belongs to l = i + 1.
#[derive(Clone)]
pub struct ReducedBasisEmulator {
    up: ReducedSpace,
    down: ReducedSpace,
    s_match: f64,
    asymptotics_up: Vec<Asymptotics>,
    asymptotics_down: Vec<Asymptotics>,
    config: EmulatorConfig,
}

impl ReducedBasisEmulator {
    /// # Panics
    /// If the offline data of the polarizations do not fit together or `s_match` is not positive,
    /// see [`ReducedBasisEmulator::try_new`].
    pub fn new(
        up_interaction: EimInteractionSpace,
        up_basis: Basis,
        down_interaction: EimInteractionSpace,
        down_basis: Basis,
        s_match: f64,
    ) -> Self {
        Self::try_new(up_interaction, up_basis, down_interaction, down_basis, s_match).unwrap_or_else(|e| panic!("{e}"))
    }

    pub fn try_new(
        up_interaction: EimInteractionSpace,
        up_basis: Basis,
        down_interaction: EimInteractionSpace,
        down_basis: Basis,
        s_match: f64,
    ) -> Result<Self, EmulatorError> {
        if !(s_match > 0. && s_match.is_finite()) {
            return Err(EmulatorError::InvalidMatchingPoint { s_match });
        }

        let up = ReducedSpace::try_new(up_interaction, up_basis)?;
        let down = ReducedSpace::try_new(down_interaction, down_basis)?;

        let lmax = up.basis.lmax();
        let expected_down = Polarization::Down.partial_waves(lmax);
        if down.basis.lmax() != expected_down {
            return Err(ShapeError::new("down partial waves", &[expected_down], &[down.basis.lmax()]).into());
        }

        let asymptotics = |polarization: Polarization| -> Vec<Asymptotics> {
            (0..polarization.partial_waves(lmax))
                .map(|i| Asymptotics::at(polarization.l(i), s_match))
                .collect()
        };

        Ok(Self {
            asymptotics_up: asymptotics(Polarization::Up),
            asymptotics_down: asymptotics(Polarization::Down),
            up,
            down,
            s_match,
            config: EmulatorConfig::default(),
        })
    }

    pub fn with_config(mut self, config: EmulatorConfig) -> Self {
        self.config = config;

        self
    }

    pub fn config(&self) -> &EmulatorConfig {
        &self.config
    }

    pub fn s_match(&self) -> f64 {
        self.s_match
    }

    /// Number of partial waves of the `Up` polarization, l < lmax.
    pub fn lmax(&self) -> usize {
        self.up.basis.lmax()
    }

    pub fn space(&self, polarization: Polarization) -> &ReducedSpace {
        match polarization {
            Polarization::Up => &self.up,
            Polarization::Down => &self.down,
        }
    }

    fn asymptotics(&self, polarization: Polarization) -> &[Asymptotics] {
        match polarization {
            Polarization::Up => &self.asymptotics_up,
            Polarization::Down => &self.asymptotics_down,
        }
    }

    pub fn partial_waves(&self, polarization: Polarization) -> usize {
        self.space(polarization).basis.lmax()
    }

    pub fn couplings(&self, polarization: Polarization) -> Vec<FermionSpinOrbitCoupling> {
        FermionSpinOrbitCoupling::couplings(polarization, self.lmax())
    }

    /// Reduced coefficients of every partial wave, each solved independently as a N×1 column.
    pub fn solve_waves(&self, polarization: Polarization, alpha: &[f64]) -> Vec<Result<Mat<c64>, EmulatorError>> {
        let space = self.space(polarization);
        let beta = space.interaction.coefficients(alpha);
        debug!(
            "emulating {} partial waves of the {polarization} polarization at E = {} MeV",
            beta.nrows(),
            alpha[0]
        );

        let solve = |index: usize| {
            let row: Vec<c64> = (0..beta.ncols()).map(|k| beta[(index, k)]).collect();
            self.solve_wave(space, polarization, index, &row)
        };
        let waves: Vec<Result<Mat<c64>, EmulatorError>> = if self.config.parallel {
            (0..beta.nrows()).into_par_iter().map(solve).collect()
        } else {
            (0..beta.nrows()).map(solve).collect()
        };

        for err in waves.iter().filter_map(|wave| wave.as_ref().err()) {
            warn!("{err}");
        }

        waves
    }

    fn solve_wave(
        &self,
        space: &ReducedSpace,
        polarization: Polarization,
        index: usize,
        beta: &[c64],
    ) -> Result<Mat<c64>, EmulatorError> {
        let matrix = space.basis.system_matrix(index, beta);
        let rhs = space.basis.rhs(index, beta);

        let singular = EmulatorError::SingularSystem {
            polarization,
            l: polarization.l(index),
        };

        let lu = matrix.partial_piv_lu();
        let x = lu.solve(rhs.as_ref());
        if !all_finite(&x) {
            return Err(singular);
        }

        // NaN fails the comparison as well
        let rcond = 1. / (one_norm(&matrix) * one_norm(&lu.inverse()));
        if !(rcond >= self.config.min_rcond) {
            debug!("reduced system of the {polarization} polarization at index {index} has rcond {rcond:e}");
            return Err(singular);
        }

        let ax = &matrix * &x;
        let residual = (0..rhs.nrows())
            .map(|i| (ax[(i, 0)] - rhs[(i, 0)]).norm_sqr())
            .sum::<f64>()
            .sqrt();
        let scale = frobenius_norm(&matrix) * frobenius_norm(&x) + frobenius_norm(&rhs);
        let relative = if scale > 0. { residual / scale } else { residual };

        if relative <= self.config.residual_tolerance {
            Ok(x)
        } else {
            Err(singular)
        }
    }

    /// Reduced coefficients as a partial waves × N matrix,
    /// failing with the first partial wave that could not be solved.
    pub fn coefficients(&self, polarization: Polarization, alpha: &[f64]) -> Result<Mat<c64>, EmulatorError> {
        let waves = self
            .solve_waves(polarization, alpha)
            .into_iter()
            .collect::<Result<Vec<Mat<c64>>, EmulatorError>>()?;

        let nbasis = self.space(polarization).basis.nbasis();
        Ok(Mat::from_fn(waves.len(), nbasis, |i, n| waves[i][(n, 0)]))
    }

    /// Emulated wavefunction on the mesh of the partial wave at `index`, solving only that wave.
    pub fn wavefunction(&self, polarization: Polarization, index: usize, alpha: &[f64]) -> Result<Mat<c64>, EmulatorError> {
        let partial_waves = self.partial_waves(polarization);
        if index >= partial_waves {
            return Err(EmulatorError::PartialWaveOutOfRange {
                polarization,
                index,
                partial_waves,
            });
        }

        let space = self.space(polarization);
        let beta = space.interaction.coefficients_for(alpha, index);
        let x = self.solve_wave(space, polarization, index, &beta)?;

        Ok(space.basis.wavefunction(index, &x))
    }

    /// Dimensionless R-matrix u / (s u') at the matching point of every partial wave.
    pub fn r_matrix(&self, polarization: Polarization, alpha: &[f64]) -> Result<Vec<c64>, EmulatorError> {
        let basis = &self.space(polarization).basis;
        if !basis.has_boundary() {
            return Err(EmulatorError::MissingBoundary { polarization });
        }

        let coefficients = self.coefficients(polarization, alpha)?;
        (0..coefficients.nrows())
            .map(|index| {
                let x = Mat::from_fn(coefficients.ncols(), 1, |n, _| coefficients[(index, n)]);
                basis
                    .boundary(index, &x)
                    .map(|(u, du)| u / (self.s_match * du))
                    .ok_or(EmulatorError::MissingBoundary { polarization })
            })
            .collect()
    }

    pub fn s_matrix(&self, polarization: Polarization, alpha: &[f64]) -> Result<Vec<PartialWaveSMatrix>, EmulatorError> {
        let r_matrix = self.r_matrix(polarization, alpha)?;

        Ok(r_matrix
            .into_iter()
            .zip(self.asymptotics(polarization))
            .zip(self.couplings(polarization))
            .map(|((r, asymptotics), coupling)| PartialWaveSMatrix::from_r_matrix(r, self.s_match, asymptotics, coupling))
            .collect())
    }

    /// Complex phase shifts of every partial wave.
    pub fn phase_shifts(&self, polarization: Polarization, alpha: &[f64]) -> Result<Vec<c64>, EmulatorError> {
        Ok(self
            .s_matrix(polarization, alpha)?
            .iter()
            .map(|wave| wave.phase_shift())
            .collect())
    }

    /// Integrated cross sections [mb] summed over both polarizations.
    pub fn cross_sections(&self, alpha: &[f64]) -> Result<CrossSections, EmulatorError> {
        let (_, k) = energy_momentum(alpha);
        let mut waves = self.s_matrix(Polarization::Up, alpha)?;
        waves.extend(self.s_matrix(Polarization::Down, alpha)?);

        Ok(CrossSections::from_partial_waves(&waves, k))
    }
}

fn all_finite(matrix: &Mat<c64>) -> bool {
    (0..matrix.nrows()).all(|i| (0..matrix.ncols()).all(|j| matrix[(i, j)].is_finite()))
}

/// Largest absolute column sum.
fn one_norm(matrix: &Mat<c64>) -> f64 {
    (0..matrix.ncols())
        .map(|j| (0..matrix.nrows()).map(|i| matrix[(i, j)].norm()).sum::<f64>())
        .fold(0., f64::max)
}

fn frobenius_norm(matrix: &Mat<c64>) -> f64 {
    let mut norm = 0.;
    for i in 0..matrix.nrows() {
        for j in 0..matrix.ncols() {
            norm += matrix[(i, j)].norm_sqr();
        }
    }

    norm.sqrt()
}
