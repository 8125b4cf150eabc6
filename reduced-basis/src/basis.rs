use faer::{Mat, c64};
use serde::{Deserialize, Serialize};

use crate::{error::ShapeError, tensor::Tensor};

/// Reduced tensors of a Galerkin projected affine system.
///
/// The EIM coefficient axis of `a2` and `b2` is axis 1, right after the partial wave.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BasisTensors {
    /// [L, M, N], column n of slice l is the basis vector n on the mesh
    pub snapshots: Tensor,
    /// [L, N, N, N]
    pub a2: Tensor,
    /// [L, N, N]
    pub a13: Tensor,
    /// [L, N, N]
    pub b2: Tensor,
    /// [L, N]
    pub b13: Tensor,
}

/// Values and dimensionless derivatives of every basis vector at the matching point.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundaryData {
    /// [L, N]
    pub values: Tensor,
    /// [L, N]
    pub derivatives: Tensor,
}

/// Reduced basis of one polarization, validated on construction and on deserialization.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawBasis")]
pub struct Basis {
    nbasis: usize,
    lmax: usize,
    mesh_size: usize,
    tensors: BasisTensors,
    boundary: Option<BoundaryData>,
}

#[derive(Deserialize)]
struct RawBasis {
    nbasis: usize,
    lmax: usize,
    mesh_size: usize,
    tensors: BasisTensors,
    #[serde(default)]
    boundary: Option<BoundaryData>,
}

impl TryFrom<RawBasis> for Basis {
    type Error = ShapeError;

    fn try_from(raw: RawBasis) -> Result<Self, Self::Error> {
        let basis = Self {
            nbasis: raw.nbasis,
            lmax: raw.lmax,
            mesh_size: raw.mesh_size,
            tensors: raw.tensors,
            boundary: raw.boundary,
        };
        basis.validate()?;

        Ok(basis)
    }
}

impl Basis {
    /// # Panics
    /// If the tensor shapes do not match the dimensions.
    pub fn new(nbasis: usize, lmax: usize, mesh_size: usize, tensors: BasisTensors) -> Self {
        Self::try_new(nbasis, lmax, mesh_size, tensors).unwrap_or_else(|e| panic!("{e}"))
    }

    pub fn try_new(nbasis: usize, lmax: usize, mesh_size: usize, tensors: BasisTensors) -> Result<Self, ShapeError> {
        let basis = Self {
            nbasis,
            lmax,
            mesh_size,
            tensors,
            boundary: None,
        };
        basis.validate()?;

        Ok(basis)
    }

    pub fn with_boundary(mut self, boundary: BoundaryData) -> Result<Self, ShapeError> {
        self.boundary = Some(boundary);
        self.validate()?;

        Ok(self)
    }

    /// Checks every tensor against the stored dimensions.
    pub fn validate(&self) -> Result<(), ShapeError> {
        let (n, l, m) = (self.nbasis, self.lmax, self.mesh_size);
        let t = &self.tensors;

        t.snapshots.check_shape("snapshots", &[l, m, n])?;
        t.a2.check_shape("A2", &[l, n, n, n])?;
        t.a13.check_shape("A13", &[l, n, n])?;
        t.b2.check_shape("b2", &[l, n, n])?;
        t.b13.check_shape("b13", &[l, n])?;

        if let Some(boundary) = &self.boundary {
            boundary.values.check_shape("boundary values", &[l, n])?;
            boundary.derivatives.check_shape("boundary derivatives", &[l, n])?;
        }

        Ok(())
    }

    pub fn nbasis(&self) -> usize {
        self.nbasis
    }

    /// Number of partial waves.
    pub fn lmax(&self) -> usize {
        self.lmax
    }

    pub fn mesh_size(&self) -> usize {
        self.mesh_size
    }

    pub fn tensors(&self) -> &BasisTensors {
        &self.tensors
    }

    pub fn has_boundary(&self) -> bool {
        self.boundary.is_some()
    }

    /// Reduced matrix A13[l] + Σ_k β_k A2[l, k].
    pub fn system_matrix(&self, l: usize, beta: &[c64]) -> Mat<c64> {
        assert_eq!(beta.len(), self.nbasis, "EIM coefficients of wrong length");
        let n = self.nbasis;

        let mut matrix = self.tensors.a13.matrix(&[l]);
        for (k, beta_k) in beta.iter().enumerate() {
            let block = self.tensors.a2.block(&[l, k]);
            for i in 0..n {
                for j in 0..n {
                    matrix[(i, j)] += beta_k * block[i * n + j];
                }
            }
        }

        matrix
    }

    /// Reduced right hand side b13[l] + Σ_k β_k b2[l, k] as a column.
    pub fn rhs(&self, l: usize, beta: &[c64]) -> Mat<c64> {
        assert_eq!(beta.len(), self.nbasis, "EIM coefficients of wrong length");

        let mut rhs = self.tensors.b13.column(&[l]);
        for (k, beta_k) in beta.iter().enumerate() {
            let block = self.tensors.b2.block(&[l, k]);
            for (i, b) in block.iter().enumerate() {
                rhs[(i, 0)] += beta_k * b;
            }
        }

        rhs
    }

    /// Emulated wavefunction snapshots[l] · x on the mesh.
    pub fn wavefunction(&self, l: usize, x: &Mat<c64>) -> Mat<c64> {
        self.tensors.snapshots.matrix(&[l]) * x
    }

    /// Emulated value and derivative at the matching point, if the basis carries boundary data.
    pub fn boundary(&self, l: usize, x: &Mat<c64>) -> Option<(c64, c64)> {
        let boundary = self.boundary.as_ref()?;
        let contract = |tensor: &Tensor| -> c64 {
            tensor
                .block(&[l])
                .iter()
                .enumerate()
                .map(|(n, phi)| phi * x[(n, 0)])
                .sum()
        };

        Some((contract(&boundary.values), contract(&boundary.derivatives)))
    }
}

#[cfg(test)]
mod test {
    use approx::assert_relative_eq;
    use faer::{Mat, c64};
    use crate::tensor::Tensor;

    use super::{Basis, BasisTensors, BoundaryData};

    fn count(shape: &[usize], scale: f64) -> Tensor {
        let mut counter = 0.;
        Tensor::from_fn(shape, |_| {
            counter += 1.;
            c64::new(scale * counter, 0.5 * counter)
        })
    }

    fn tensors(l: usize, n: usize, m: usize) -> BasisTensors {
        BasisTensors {
            snapshots: count(&[l, m, n], 1.),
            a2: count(&[l, n, n, n], 0.1),
            a13: count(&[l, n, n], 1.),
            b2: count(&[l, n, n], 0.2),
            b13: count(&[l, n], 1.),
        }
    }

    #[test]
    fn test_affine_assembly() {
        let basis = Basis::new(3, 2, 5, tensors(2, 3, 5));
        let beta = [c64::new(0.5, 0.), c64::new(0., -1.), c64::new(2., 0.3)];
        let t = basis.tensors();

        let matrix = basis.system_matrix(1, &beta);
        let rhs = basis.rhs(1, &beta);
        for i in 0..3 {
            for j in 0..3 {
                let mut expected = t.a13.get(&[1, i, j]);
                for (k, b) in beta.iter().enumerate() {
                    expected += b * t.a2.get(&[1, k, i, j]);
                }
                assert_relative_eq!(matrix[(i, j)], expected, epsilon = 1e-14, max_relative = 1e-14);
            }

            let mut expected = t.b13.get(&[1, i]);
            for (k, b) in beta.iter().enumerate() {
                expected += b * t.b2.get(&[1, k, i]);
            }
            assert_relative_eq!(rhs[(i, 0)], expected, epsilon = 1e-14, max_relative = 1e-14);
        }

        let zero = [c64::new(0., 0.); 3];
        assert_eq!(basis.system_matrix(0, &zero), t.a13.matrix(&[0]));
        assert_eq!(basis.rhs(0, &zero), t.b13.column(&[0]));
    }

    #[test]
    fn test_wavefunction() {
        let basis = Basis::new(3, 2, 5, tensors(2, 3, 5));
        let x = Mat::from_fn(3, 1, |i, _| if i == 1 { c64::new(1., 0.) } else { c64::new(0., 0.) });

        let wave = basis.wavefunction(1, &x);
        assert_eq!(wave.nrows(), 5);
        for i in 0..5 {
            assert_eq!(wave[(i, 0)], basis.tensors().snapshots.get(&[1, i, 1]));
        }
        assert!(basis.boundary(1, &x).is_none());
    }

    #[test]
    fn test_boundary() {
        let boundary = BoundaryData {
            values: count(&[2, 3], 1.),
            derivatives: count(&[2, 3], -1.),
        };
        let basis = Basis::new(3, 2, 5, tensors(2, 3, 5)).with_boundary(boundary.clone()).unwrap();
        assert!(basis.has_boundary());

        let x = Mat::from_fn(3, 1, |i, _| c64::new(i as f64, 1.));
        let (u, du) = basis.boundary(0, &x).unwrap();
        let expected: c64 = (0..3).map(|n| boundary.values.get(&[0, n]) * x[(n, 0)]).sum();
        assert_relative_eq!(u, expected, epsilon = 1e-14, max_relative = 1e-14);
        let expected: c64 = (0..3).map(|n| boundary.derivatives.get(&[0, n]) * x[(n, 0)]).sum();
        assert_relative_eq!(du, expected, epsilon = 1e-14, max_relative = 1e-14);

        let wrong = BoundaryData {
            values: count(&[2, 4], 1.),
            derivatives: count(&[2, 3], 1.),
        };
        assert!(Basis::new(3, 2, 5, tensors(2, 3, 5)).with_boundary(wrong).is_err());
    }

    #[test]
    fn test_shape_validation() {
        let mut wrong = tensors(2, 3, 5);
        wrong.a2 = count(&[2, 3, 3], 1.);
        let err = Basis::try_new(3, 2, 5, wrong).unwrap_err();
        assert_eq!(err.name, "A2");

        assert!(Basis::try_new(3, 2, 6, tensors(2, 3, 5)).is_err());
        assert!(Basis::try_new(3, 3, 5, tensors(2, 3, 5)).is_err());
    }

    #[test]
    fn test_deserialization_validates() {
        let basis = Basis::new(3, 2, 5, tensors(2, 3, 5));
        let mut value = serde_json::to_value(&basis).unwrap();

        value.as_object_mut().unwrap().remove("boundary");
        let loaded: Basis = serde_json::from_value(value.clone()).unwrap();
        assert_eq!((loaded.nbasis(), loaded.lmax(), loaded.mesh_size()), (3, 2, 5));
        assert!(!loaded.has_boundary());

        value["nbasis"] = serde_json::json!(4);
        let err = serde_json::from_value::<Basis>(value).unwrap_err();
        assert!(err.to_string().contains("snapshots"));
    }

    #[test]
    #[should_panic]
    fn test_shape_assertion() {
        Basis::new(4, 2, 5, tensors(2, 3, 5));
    }
}
