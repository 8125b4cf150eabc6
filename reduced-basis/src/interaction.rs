use std::sync::Arc;

use faer::{Mat, c64, linalg::solvers::DenseSolveCore};
use nuclear::{
    angular_momentum::{FermionSpinOrbitCoupling, Polarization},
    constants::HBARC,
};
use optical_model::potentials::omp::OmTerms;

use crate::{error::ShapeError, tensor::Tensor};

/// Family of local potentials V(r; params) [MeV] of radius r [fm].
pub trait ParametricPotential: Send + Sync {
    fn value(&self, r: f64, params: &[f64]) -> c64;
}

/// Family of symmetric non-local potentials V(r, r'; params).
pub trait ParametricNonlocalPotential: Send + Sync {
    fn value(&self, r: f64, rp: f64, params: &[f64]) -> c64;

    fn diagonal(&self, r: f64, params: &[f64]) -> c64 {
        self.value(r, r, params)
    }
}

/// Parametric potential given by a closure.
pub struct FunctionPotential<F>
where
    F: Fn(f64, &[f64]) -> c64 + Send + Sync,
{
    function: F,
}

impl<F> FunctionPotential<F>
where
    F: Fn(f64, &[f64]) -> c64 + Send + Sync,
{
    pub fn new(function: F) -> Self {
        Self { function }
    }
}

impl<F> ParametricPotential for FunctionPotential<F>
where
    F: Fn(f64, &[f64]) -> c64 + Send + Sync,
{
    fn value(&self, r: f64, params: &[f64]) -> c64 {
        (self.function)(r, params)
    }
}

/// Optical potential of one partial wave with all 18 term parameters free,
/// in the layout of [`OmTerms::from_params`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParametricOpticalPotential {
    pub l_dot_s: f64,
}

impl ParametricOpticalPotential {
    pub fn new(coupling: &FermionSpinOrbitCoupling) -> Self {
        Self {
            l_dot_s: coupling.l_dot_s(),
        }
    }
}

impl ParametricPotential for ParametricOpticalPotential {
    fn value(&self, r: f64, params: &[f64]) -> c64 {
        OmTerms::from_params(params).value(r, self.l_dot_s)
    }
}

/// Interaction of one partial wave.
#[derive(Clone)]
pub enum Interaction {
    Local(Arc<dyn ParametricPotential>),
    Nonlocal(Arc<dyn ParametricNonlocalPotential>),
}

impl Interaction {
    pub fn local(potential: impl ParametricPotential + 'static) -> Self {
        Interaction::Local(Arc::new(potential))
    }

    pub fn nonlocal(potential: impl ParametricNonlocalPotential + 'static) -> Self {
        Interaction::Nonlocal(Arc::new(potential))
    }

    /// Value entering the affine decomposition, the diagonal for non-local potentials.
    pub fn value(&self, r: f64, params: &[f64]) -> c64 {
        match self {
            Interaction::Local(potential) => potential.value(r, params),
            Interaction::Nonlocal(potential) => potential.diagonal(r, params),
        }
    }

    /// Energy scaled value V(s / k, alpha[2..]) / E at the dimensionless point `s`.
    pub fn scaled(&self, s: f64, alpha: &[f64]) -> c64 {
        let (energy, k) = energy_momentum(alpha);

        self.value(s / k, &alpha[2..]) / energy
    }

    /// Parametric optical potentials for every partial wave of a polarization.
    pub fn optical(polarization: Polarization, lmax: usize) -> Vec<Self> {
        FermionSpinOrbitCoupling::couplings(polarization, lmax)
            .iter()
            .map(|coupling| Self::local(ParametricOpticalPotential::new(coupling)))
            .collect()
    }
}

/// Energy and wave number of the parameter vector, alpha[0] energy [MeV], alpha[1] reduced mass [MeV].
pub fn energy_momentum(alpha: &[f64]) -> (f64, f64) {
    assert!(
        alpha.len() >= 2,
        "parameter vector needs the energy and the reduced mass, got {} elements",
        alpha.len()
    );
    let (energy, reduced_mass) = (alpha[0], alpha[1]);

    (energy, (2. * reduced_mass * energy).sqrt() / HBARC)
}

/// Empirical interpolation of the energy scaled potential at `N` collocation points
/// in the dimensionless coordinate s = k r.
#[derive(Clone)]
pub struct EimInteractionSpace {
    mesh_size: usize,
    nbasis: usize,
    lmax: usize,
    r_matches: Vec<f64>,
    /// [L, N, N]
    ainv: Tensor,
    potentials: Vec<Interaction>,
}

impl EimInteractionSpace {
    /// # Panics
    /// On inconsistent shapes, see [`EimInteractionSpace::try_new`].
    pub fn new(
        mesh_size: usize,
        nbasis: usize,
        lmax: usize,
        r_matches: Vec<f64>,
        ainv: Tensor,
        potentials: Vec<Interaction>,
    ) -> Self {
        Self::try_new(mesh_size, nbasis, lmax, r_matches, ainv, potentials).unwrap_or_else(|e| panic!("{e}"))
    }

    pub fn try_new(
        mesh_size: usize,
        nbasis: usize,
        lmax: usize,
        r_matches: Vec<f64>,
        ainv: Tensor,
        potentials: Vec<Interaction>,
    ) -> Result<Self, ShapeError> {
        ainv.check_shape("inverse interpolation tensor", &[lmax, nbasis, nbasis])?;
        if r_matches.len() != nbasis {
            return Err(ShapeError::new("collocation points", &[nbasis], &[r_matches.len()]));
        }
        if potentials.len() != lmax {
            return Err(ShapeError::new("potentials", &[lmax], &[potentials.len()]));
        }
        if nbasis > mesh_size {
            return Err(ShapeError::new("collocation points on the mesh", &[mesh_size], &[nbasis]));
        }

        Ok(Self {
            mesh_size,
            nbasis,
            lmax,
            r_matches,
            ainv,
            potentials,
        })
    }

    /// Builds the inverse interpolation tensor from the collocation matrices
    /// U[l][i][k] = u_k(r_matches[i]) of every partial wave.
    pub fn from_collocation(
        mesh_size: usize,
        r_matches: Vec<f64>,
        collocation: &[Mat<c64>],
        potentials: Vec<Interaction>,
    ) -> Result<Self, ShapeError> {
        let nbasis = r_matches.len();
        for u in collocation {
            if u.nrows() != nbasis || u.ncols() != nbasis {
                return Err(ShapeError::new("collocation matrix", &[nbasis, nbasis], &[u.nrows(), u.ncols()]));
            }
        }

        let inverses: Vec<Mat<c64>> = collocation.iter().map(|u| u.partial_piv_lu().inverse()).collect();
        let ainv = if inverses.is_empty() {
            Tensor::zeros(&[0, nbasis, nbasis])
        } else {
            Tensor::from_matrices(&inverses)
        };

        Self::try_new(mesh_size, nbasis, collocation.len(), r_matches, ainv, potentials)
    }

    pub fn mesh_size(&self) -> usize {
        self.mesh_size
    }

    pub fn nbasis(&self) -> usize {
        self.nbasis
    }

    /// Number of partial waves.
    pub fn lmax(&self) -> usize {
        self.lmax
    }

    pub fn r_matches(&self) -> &[f64] {
        &self.r_matches
    }

    pub fn ainv(&self) -> &Tensor {
        &self.ainv
    }

    /// Energy scaled potential V_l(s / k, alpha[2..]) / E at the dimensionless point `s`.
    pub fn tilde_at(&self, s: f64, alpha: &[f64], l: usize) -> c64 {
        self.potentials[l].scaled(s, alpha)
    }

    pub fn potentials(&self) -> &[Interaction] {
        &self.potentials
    }

    /// Energy scaled potential at every collocation point.
    pub fn tilde(&self, alpha: &[f64], l: usize) -> Vec<c64> {
        let (energy, k) = energy_momentum(alpha);

        self.tilde_with(energy, k, alpha, l)
    }

    fn tilde_with(&self, energy: f64, k: f64, alpha: &[f64], l: usize) -> Vec<c64> {
        let potential = &self.potentials[l];
        let params = &alpha[2..];

        self.r_matches.iter().map(|s| potential.value(s / k, params) / energy).collect()
    }

    fn interpolate(&self, l: usize, tilde: &[c64]) -> Vec<c64> {
        let n = self.nbasis;
        let ainv = self.ainv.block(&[l]);

        (0..n)
            .map(|i| {
                ainv[i * n..(i + 1) * n]
                    .iter()
                    .zip(tilde)
                    .map(|(a, t)| a * t)
                    .sum()
            })
            .collect()
    }

    /// EIM coefficients Ainv[l] · tilde of the partial wave at index `l`.
    pub fn coefficients_for(&self, alpha: &[f64], l: usize) -> Vec<c64> {
        assert!(l < self.lmax, "partial wave index {l} out of {}", self.lmax);

        self.interpolate(l, &self.tilde(alpha, l))
    }

    /// EIM coefficients of every partial wave as a L×N matrix.
    pub fn coefficients(&self, alpha: &[f64]) -> Mat<c64> {
        let (energy, k) = energy_momentum(alpha);
        let mut beta = Mat::zeros(self.lmax, self.nbasis);

        for l in 0..self.lmax {
            let row = self.interpolate(l, &self.tilde_with(energy, k, alpha, l));
            for (n, value) in row.into_iter().enumerate() {
                beta[(l, n)] = value;
            }
        }

        beta
    }
}
