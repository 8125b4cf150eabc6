//! Offline construction of the reduced tensors from full order snapshots.

use faer::{Mat, c64, linalg::solvers::{DenseSolveCore, Solve}};
use log::debug;

use crate::{
    basis::{BasisTensors, BoundaryData},
    tensor::Tensor,
};

/// Galerkin projection of one partial wave.
#[derive(Clone, Debug)]
pub struct ProjectedWave {
    /// M×N
    pub snapshots: Mat<c64>,
    pub a13: Mat<c64>,
    pub a2: Vec<Mat<c64>>,
    /// N×1
    pub b13: Mat<c64>,
    pub b2: Vec<Mat<c64>>,
}

/// Projects the affine full order system (K + Σ_k β_k G_k) u = f + Σ_k β_k f_k
/// with the test space given by the transpose of the M×N snapshot matrix.
///
/// `affine_sources` may be empty for a parameter independent source.
pub fn project(
    snapshots: Mat<c64>,
    operator: &Mat<c64>,
    affine_operators: &[Mat<c64>],
    source: &Mat<c64>,
    affine_sources: &[Mat<c64>],
) -> ProjectedWave {
    let (m, n) = (snapshots.nrows(), snapshots.ncols());
    assert!(operator.nrows() == m && operator.ncols() == m, "operator does not act on the snapshot mesh");
    assert!(source.nrows() == m && source.ncols() == 1, "source is not a mesh column");
    assert_eq!(affine_operators.len(), n, "one affine operator per basis vector is required");
    assert!(
        affine_sources.is_empty() || affine_sources.len() == n,
        "one affine source per basis vector is required"
    );

    let phi = snapshots.as_ref();
    let phi_t = snapshots.transpose();

    let a13 = phi_t * operator.as_ref() * phi;
    let a2 = affine_operators.iter().map(|g| phi_t * g.as_ref() * phi).collect();
    let b13 = phi_t * source.as_ref();
    let b2 = if affine_sources.is_empty() {
        vec![Mat::zeros(n, 1); n]
    } else {
        affine_sources.iter().map(|f| phi_t * f.as_ref()).collect()
    };

    ProjectedWave {
        snapshots,
        a13,
        a2,
        b13,
        b2,
    }
}

/// Stacks the projected partial waves of one polarization into basis tensors.
pub fn assemble(waves: &[ProjectedWave]) -> BasisTensors {
    let (m, n) = waves.first().map_or((0, 0), |w| (w.snapshots.nrows(), w.snapshots.ncols()));
    assert!(
        waves.iter().all(|w| w.snapshots.nrows() == m && w.snapshots.ncols() == n),
        "partial waves have to share the mesh and the basis size"
    );
    let l = waves.len();
    debug!("assembling reduced tensors of {l} partial waves, {n} basis vectors on {m} mesh points");

    BasisTensors {
        snapshots: Tensor::from_fn(&[l, m, n], |i| waves[i[0]].snapshots[(i[1], i[2])]),
        a2: Tensor::from_fn(&[l, n, n, n], |i| waves[i[0]].a2[i[1]][(i[2], i[3])]),
        a13: Tensor::from_fn(&[l, n, n], |i| waves[i[0]].a13[(i[1], i[2])]),
        b2: Tensor::from_fn(&[l, n, n], |i| waves[i[0]].b2[i[1]][(i[2], 0)]),
        b13: Tensor::from_fn(&[l, n], |i| waves[i[0]].b13[(i[1], 0)]),
    }
}

/// Value and second order one sided derivative of every snapshot at the last mesh point
/// of a uniform mesh with spacing `step`.
pub fn boundary_from_snapshots(snapshots: &Mat<c64>, step: f64) -> (Vec<c64>, Vec<c64>) {
    let m = snapshots.nrows();
    assert!(m >= 3, "one sided derivative needs three mesh points");

    (0..snapshots.ncols())
        .map(|n| {
            let last = snapshots[(m - 1, n)];
            let deriv = (3. * last - 4. * snapshots[(m - 2, n)] + snapshots[(m - 3, n)]) / (2. * step);

            (last, deriv)
        })
        .unzip()
}

/// Boundary data of the projected partial waves, matched at the last mesh point.
pub fn boundary_data(waves: &[ProjectedWave], step: f64) -> BoundaryData {
    let n = waves.first().map_or(0, |w| w.snapshots.ncols());
    let (values, derivatives): (Vec<Vec<c64>>, Vec<Vec<c64>>) =
        waves.iter().map(|w| boundary_from_snapshots(&w.snapshots, step)).unzip();

    BoundaryData {
        values: Tensor::from_fn(&[waves.len(), n], |i| values[i[0]][i[1]]),
        derivatives: Tensor::from_fn(&[waves.len(), n], |i| derivatives[i[0]][i[1]]),
    }
}

/// Free radial operator -d²/ds² + l(l + 1)/s² - 1 on the uniform interior mesh,
/// with the wavefunction vanishing below the first and above the last point.
pub fn radial_operator(mesh: &[f64], l: u32) -> Mat<c64> {
    assert!(mesh.len() >= 2, "mesh needs at least two points");
    let h = mesh[1] - mesh[0];
    let h2 = h * h;
    let centrifugal = (l * (l + 1)) as f64;

    Mat::from_fn(mesh.len(), mesh.len(), |i, j| {
        if i == j {
            c64::new(2. / h2 + centrifugal / (mesh[i] * mesh[i]) - 1., 0.)
        } else if i.abs_diff(j) == 1 {
            c64::new(-1. / h2, 0.)
        } else {
            c64::new(0., 0.)
        }
    })
}

pub fn diagonal(values: &[c64]) -> Mat<c64> {
    Mat::from_fn(values.len(), values.len(), |i, j| if i == j { values[i] } else { c64::new(0., 0.) })
}

/// Collocation matrix U[i][k] = u_k(mesh[indices[i]]) of basis functions stored as columns.
pub fn collocation_matrix(basis_functions: &Mat<c64>, indices: &[usize]) -> Mat<c64> {
    Mat::from_fn(indices.len(), basis_functions.ncols(), |i, k| basis_functions[(indices[i], k)])
}

/// Inverse of the collocation matrix.
pub fn eim_inverse(basis_functions: &Mat<c64>, indices: &[usize]) -> Mat<c64> {
    assert_eq!(indices.len(), basis_functions.ncols(), "one collocation point per basis function");

    collocation_matrix(basis_functions, indices).partial_piv_lu().inverse()
}

/// Greedy collocation points of the empirical interpolation,
/// each chosen where the interpolant of the previous functions deviates most from the next one.
pub fn greedy_points(basis_functions: &Mat<c64>) -> Vec<usize> {
    let (m, n) = (basis_functions.nrows(), basis_functions.ncols());
    let mut points: Vec<usize> = Vec::with_capacity(n);

    for k in 0..n {
        let residual: Vec<f64> = if points.is_empty() {
            (0..m).map(|i| basis_functions[(i, k)].norm()).collect()
        } else {
            let collocation = Mat::from_fn(k, k, |i, j| basis_functions[(points[i], j)]);
            let target = Mat::from_fn(k, 1, |i, _| basis_functions[(points[i], k)]);
            let coeffs = collocation.partial_piv_lu().solve(target.as_ref());

            (0..m)
                .map(|i| {
                    let interpolant: c64 = (0..k).map(|j| basis_functions[(i, j)] * coeffs[(j, 0)]).sum();
                    (basis_functions[(i, k)] - interpolant).norm()
                })
                .collect()
        };

        let best = residual
            .iter()
            .enumerate()
            .filter(|(i, _)| !points.contains(i))
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i);

        match best {
            Some(i) => points.push(i),
            None => break,
        }
    }

    points
}

#[cfg(test)]
mod test {
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use faer::{Mat, c64, linalg::solvers::Solve};
    use nuclear::{assert_approx_eq, utility::linspace};

    use super::{
        assemble, boundary_from_snapshots, collocation_matrix, diagonal, eim_inverse, greedy_points, project,
        radial_operator,
    };

    fn gaussians(mesh: &[f64]) -> Mat<c64> {
        Mat::from_fn(mesh.len(), 3, |i, k| {
            let center = 1. + 1.5 * k as f64;
            c64::new((-(mesh[i] - center).powi(2)).exp(), 0.)
        })
    }

    #[test]
    fn test_greedy_interpolation() {
        let mesh = linspace(0.2, 6., 30);
        let functions = gaussians(&mesh);

        let points = greedy_points(&functions);
        assert_eq!(points.len(), 3);
        let mut unique = points.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), 3);

        let identity = collocation_matrix(&functions, &points) * eim_inverse(&functions, &points);
        assert_approx_eq!(mat => identity, Mat::<c64>::identity(3, 3), epsilon = 1e-10);
    }

    #[test]
    fn test_galerkin_exactness() {
        let mesh = linspace(0.5, 6., 12);
        let operator = radial_operator(&mesh, 1);
        let functions = gaussians(&mesh);
        let affine: Vec<Mat<c64>> = (0..3)
            .map(|k| diagonal(&(0..12).map(|i| functions[(i, k)] * c64::new(-2., -0.5)).collect::<Vec<_>>()))
            .collect();
        let source = Mat::from_fn(12, 1, |i, _| if i == 11 { c64::new(1., 0.) } else { c64::new(0., 0.) });

        // snapshots are the full order solutions at beta = e_k
        let mut snapshots = Mat::<c64>::zeros(12, 3);
        for k in 0..3 {
            let full = &operator + &affine[k];
            let solution = full.partial_piv_lu().solve(source.as_ref());
            for i in 0..12 {
                snapshots[(i, k)] = solution[(i, 0)];
            }
        }

        let wave = project(snapshots.clone(), &operator, &affine, &source, &[]);
        assert_eq!((wave.a13.nrows(), wave.a13.ncols()), (3, 3));
        assert_eq!(wave.b2.len(), 3);

        let reduced = &wave.a13 + &wave.a2[1];
        let x = reduced.partial_piv_lu().solve(wave.b13.as_ref());
        assert_abs_diff_eq!(x[(0, 0)], c64::new(0., 0.), epsilon = 1e-8);
        assert_abs_diff_eq!(x[(1, 0)], c64::new(1., 0.), epsilon = 1e-8);
        assert_abs_diff_eq!(x[(2, 0)], c64::new(0., 0.), epsilon = 1e-8);

        let tensors = assemble(&[wave.clone(), wave]);
        assert_eq!(tensors.snapshots.shape(), &[2, 12, 3]);
        assert_eq!(tensors.a2.shape(), &[2, 3, 3, 3]);
        assert_eq!(tensors.a2.get(&[1, 2, 0, 1]), tensors.a2.matrix(&[0, 2])[(0, 1)]);
        assert_eq!(tensors.b13.get(&[0, 2]), tensors.b13.get(&[1, 2]));
        assert_eq!(tensors.snapshots.get(&[0, 4, 1]), snapshots[(4, 1)]);
    }

    #[test]
    fn test_boundary_derivative() {
        let h = 0.1;
        let mesh = linspace(0.1, 1.5, 15);
        let snapshots = Mat::from_fn(15, 2, |i, k| c64::new(mesh[i].powi(k as i32 + 1), 0.));

        let (values, derivatives) = boundary_from_snapshots(&snapshots, h);
        assert_relative_eq!(values[0], c64::new(1.5, 0.), epsilon = 1e-12, max_relative = 1e-12);
        assert_relative_eq!(derivatives[0], c64::new(1., 0.), epsilon = 1e-12, max_relative = 1e-12);
        assert_relative_eq!(values[1], c64::new(2.25, 0.), epsilon = 1e-12, max_relative = 1e-12);
        assert_relative_eq!(derivatives[1], c64::new(3., 0.), epsilon = 1e-12, max_relative = 1e-12);
    }

    #[test]
    fn test_radial_operator() {
        let mesh = linspace(0.5, 2., 4);
        let operator = radial_operator(&mesh, 2);
        let h2 = 0.25;

        assert_relative_eq!(operator[(0, 0)], c64::new(2. / h2 + 6. / 0.25 - 1., 0.), max_relative = 1e-14);
        assert_eq!(operator[(1, 0)], c64::new(-1. / h2, 0.));
        assert_eq!(operator[(3, 1)], c64::new(0., 0.));
    }
}
