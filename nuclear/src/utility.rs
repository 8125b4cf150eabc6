use num::complex::Complex64;

/// Riccati-Bessel function of the first kind, F_l(z) = z j_l(z).
///
/// Upward recurrence is used above the turning point `z > l`,
/// below it the values come from a normalized downward (Miller) recurrence.
pub fn riccati_j(l: u32, z: f64) -> f64 {
    assert!(z > 0., "Riccati-Bessel functions need positive argument, got {z}");

    let (sin, cos) = z.sin_cos();
    let f0 = sin;
    if l == 0 {
        return f0;
    }
    let f1 = sin / z - cos;

    if z > l as f64 {
        let (mut f_prev, mut f) = (f0, f1);
        for n in 1..l {
            let f_next = (2 * n + 1) as f64 / z * f - f_prev;
            f_prev = f;
            f = f_next;
        }

        return f;
    }

    let start = l + 20 + z as u32;
    let mut f_next = 0.;
    let mut f = 1e-250;
    let mut f_l = 0.;
    let mut f_1 = 0.;
    for n in (1..=start).rev() {
        let f_prev = (2 * n + 1) as f64 / z * f - f_next;
        f_next = f;
        f = f_prev;

        // f now holds F_{n-1}, f_next F_n
        if n == l {
            f_l = f_next;
        }
        if n == 1 {
            f_1 = f_next;
        }

        if f.abs() > 1e250 {
            f *= 1e-250;
            f_next *= 1e-250;
            f_l *= 1e-250;
            f_1 *= 1e-250;
        }
    }
    let f_0 = f;

    if f0.abs() > f1.abs() {
        f_l * f0 / f_0
    } else {
        f_l * f1 / f_1
    }
}

/// Riccati-Bessel function of the second kind with the sign convention
/// G_l(z) = -z y_l(z), so that G_0(z) = cos(z).
pub fn riccati_n(l: u32, z: f64) -> f64 {
    assert!(z > 0., "Riccati-Bessel functions need positive argument, got {z}");

    let (sin, cos) = z.sin_cos();
    let g0 = cos;
    if l == 0 {
        return g0;
    }

    let (mut g_prev, mut g) = (g0, cos / z + sin);
    for n in 1..l {
        let g_next = (2 * n + 1) as f64 / z * g - g_prev;
        g_prev = g;
        g = g_next;
    }

    g
}

/// d/dz F_l(z)
pub fn riccati_j_deriv(l: u32, z: f64) -> f64 {
    riccati_j(l, z) * (l + 1) as f64 / z - riccati_j(l + 1, z)
}

/// d/dz G_l(z)
pub fn riccati_n_deriv(l: u32, z: f64) -> f64 {
    riccati_n(l, z) * (l + 1) as f64 / z - riccati_n(l + 1, z)
}

/// Outgoing reduced spherical Hankel function H+_l = G_l + i F_l
pub fn hankel_plus(l: u32, z: f64) -> Complex64 {
    Complex64::new(riccati_n(l, z), riccati_j(l, z))
}

/// Incoming reduced spherical Hankel function H-_l = G_l - i F_l
pub fn hankel_minus(l: u32, z: f64) -> Complex64 {
    Complex64::new(riccati_n(l, z), -riccati_j(l, z))
}

pub fn hankel_plus_deriv(l: u32, z: f64) -> Complex64 {
    Complex64::new(riccati_n_deriv(l, z), riccati_j_deriv(l, z))
}

pub fn hankel_minus_deriv(l: u32, z: f64) -> Complex64 {
    Complex64::new(riccati_n_deriv(l, z), -riccati_j_deriv(l, z))
}

pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    if n == 1 {
        return vec![start];
    }

    let step = (end - start) / (n as f64 - 1.0);

    (0..n).map(|i| start + (i as f64) * step).collect()
}

/// Element-wise [`approx::assert_relative_eq!`] of two collections,
/// the options after the operands are forwarded to every comparison.
///
/// # Syntax
///
/// - `assert_approx_eq!(mat => $left, $right, epsilon = 1e-10)` for matrices indexable by `(row, col)`
/// - `assert_approx_eq!(iter => $left, $right, max_relative = 1e-10)` for iterators of values
#[macro_export]
macro_rules! assert_approx_eq {
    (mat => $left:expr, $right:expr, $($opt:ident = $val:expr),+) => {{
        let (left, right) = (&$left, &$right);
        assert_eq!((left.nrows(), left.ncols()), (right.nrows(), right.ncols()), "matrix shape mismatch");

        for i in 0..left.nrows() {
            for j in 0..left.ncols() {
                ::approx::assert_relative_eq!(left[(i, j)], right[(i, j)], $($opt = $val),+);
            }
        }
    }};
    (iter => $left:expr, $right:expr, $($opt:ident = $val:expr),+) => {{
        let left: Vec<_> = $left.into_iter().collect();
        let right: Vec<_> = $right.into_iter().collect();
        assert_eq!(left.len(), right.len(), "length mismatch");

        for (l, r) in left.into_iter().zip(right) {
            ::approx::assert_relative_eq!(l, r, $($opt = $val),+);
        }
    }};
}

#[cfg(test)]
mod test {
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use num::complex::Complex64;

    use super::{hankel_minus, hankel_minus_deriv, hankel_plus, linspace, riccati_j, riccati_j_deriv, riccati_n, riccati_n_deriv};

    #[test]
    fn test_riccati_low_order() {
        let z = 2.3;

        assert_abs_diff_eq!(riccati_j(0, z), z.sin(), epsilon = 1e-12);
        assert_abs_diff_eq!(riccati_j(1, z), z.sin() / z - z.cos(), epsilon = 1e-12);
        assert_abs_diff_eq!(riccati_n(0, z), z.cos(), epsilon = 1e-12);
        assert_abs_diff_eq!(riccati_n(1, z), z.cos() / z + z.sin(), epsilon = 1e-12);

        let f2 = (3. / (z * z) - 1.) * z.sin() - 3. / z * z.cos();
        assert_abs_diff_eq!(riccati_j(2, z), f2, epsilon = 1e-10);
    }

    #[test]
    fn test_riccati_below_turning_point() {
        // small argument limit F_l(z) ~ z^{l+1} / (2l+1)!!
        let z = 1e-3;
        let l = 4;
        let double_factorial = 9. * 7. * 5. * 3.;

        assert_relative_eq!(riccati_j(l, z), z.powi(5) / double_factorial, max_relative = 1e-5);

        // upward and downward recurrences agree at the turning point
        let z = 7.0;
        let upward = riccati_j(6, z);
        let downward = riccati_j(7, z) * 15. / z - riccati_j(8, z);
        assert_abs_diff_eq!(upward, downward, epsilon = 1e-8);
    }

    #[test]
    fn test_wronskian() {
        for l in 0..12 {
            for &z in &[0.5, 2.62, 9.0, 30.0] {
                let wronskian = riccati_n(l, z) * riccati_j_deriv(l, z) - riccati_j(l, z) * riccati_n_deriv(l, z);
                assert_abs_diff_eq!(wronskian, 1.0, epsilon = 1e-7);
            }
        }
    }

    #[test]
    fn test_hankel() {
        let z = 0.21894494044652124 * 12.;

        assert_abs_diff_eq!(hankel_minus(1, z), Complex64::new(0.16050015525632866, -1.0578781142007916), epsilon = 1e-7);
        assert_abs_diff_eq!(hankel_plus(1, z), hankel_minus(1, z).conj(), epsilon = 1e-14);
        assert_abs_diff_eq!(hankel_minus_deriv(1, z), Complex64::new(-0.9317486986265555, -0.08924255501252532), epsilon = 1e-7);
    }

    #[test]
    fn test_linspace() {
        let grid = linspace(1., 3., 5);

        assert_approx_eq!(iter => grid, vec![1., 1.5, 2., 2.5, 3.], epsilon = 1e-14);
        assert_eq!(linspace(2., 5., 1), vec![2.]);
    }
}
