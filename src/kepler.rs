//! # Kepler equation solvers
//!
//! Two-body anomaly solvers used to propagate osculating elements to the requested
//! instant. Each conic has its own formulation:
//!
//! | Orbit      | Equation                      | Method                       |
//! |------------|-------------------------------|------------------------------|
//! | elliptic   | `M = E − e·sin E`             | Newton, safeguarded start    |
//! | hyperbolic | `M = e·sinh F − F`            | Newton with step halving     |
//! | parabolic  | `M = tan(ν/2) + tan³(ν/2)/3`  | Barker, closed form          |
use std::f64::consts::PI;

use super::constants::DPI;
use crate::coord_errors::{CoordError, CoordResult};

const MAX_ITER: usize = 100;
const CONTR: f64 = 100.0 * f64::EPSILON;

/// Principal value of an angle in radians, in [0, 2π).
pub(crate) fn principal_angle(a: f64) -> f64 {
    a.rem_euclid(DPI)
}

/// Solve the elliptic Kepler equation `M = E − e·sin E` for the eccentric anomaly.
///
/// Arguments
/// ---------
/// * `mean_anomaly`: mean anomaly `M` in radians (any range).
/// * `e`: eccentricity, `0 ≤ e < 1`.
///
/// Return
/// ------
/// * Eccentric anomaly `E` in [0, 2π), or [`CoordError::KeplerNoConvergence`].
pub fn solve_elliptic(mean_anomaly: f64, e: f64) -> CoordResult<f64> {
    let ell = principal_angle(mean_anomaly);

    // Starting at π for high eccentricities avoids the overshoot near perihelion
    let mut u = if e < 0.8 { ell } else { PI };

    for _ in 0..MAX_ITER {
        let du = -(u - e * u.sin() - ell) / (1.0 - e * u.cos());
        u += du;
        if du.abs() < CONTR * 1e3 {
            return Ok(principal_angle(u));
        }
    }

    Err(CoordError::KeplerNoConvergence {
        eccentricity: e,
        mean_anomaly,
    })
}

/// Solve the hyperbolic Kepler equation `M = e·sinh F − F`.
///
/// Return
/// ------
/// * Hyperbolic anomaly `F` (same sign as `M`), or [`CoordError::KeplerNoConvergence`].
pub fn solve_hyperbolic(mean_anomaly: f64, e: f64) -> CoordResult<f64> {
    let ell = mean_anomaly;
    let mut f = (2.0 * ell / e).asinh();

    for _ in 0..MAX_ITER {
        let df = -(e * f.sinh() - f - ell) / (e * f.cosh() - 1.0);
        let ff = f + df;
        // a sign flip means Newton jumped across the root: halve instead
        f = if f * ff < 0.0 { f / 2.0 } else { ff };
        if df.abs() < CONTR * 1e3 * (1.0 + f.abs()) {
            return Ok(f);
        }
    }

    Err(CoordError::KeplerNoConvergence {
        eccentricity: e,
        mean_anomaly,
    })
}

/// Barker's equation for parabolic orbits.
///
/// Arguments
/// ---------
/// * `w`: `3·k·(t − T) / (2·√2 · q^{3/2})`, the scaled time since perihelion.
///
/// Return
/// ------
/// * True anomaly `ν` in radians, in (−π, π).
pub fn solve_parabolic(w: f64) -> f64 {
    // s = tan(ν/2) is the real root of s³ + 3s − 2w = 0
    let y = (w + (w * w + 1.0).sqrt()).cbrt();
    let s = y - 1.0 / y;
    2.0 * s.atan()
}

/// True anomaly from the eccentric anomaly of an elliptic orbit.
pub fn true_anomaly_elliptic(u: f64, e: f64) -> f64 {
    2.0 * (((1.0 + e) / (1.0 - e)).sqrt() * (u / 2.0).tan()).atan()
}

/// True anomaly from the hyperbolic anomaly.
pub fn true_anomaly_hyperbolic(f: f64, e: f64) -> f64 {
    2.0 * (((e + 1.0) / (e - 1.0)).sqrt() * (f / 2.0).tanh()).atan()
}

#[cfg(test)]
mod kepler_test {
    use super::*;
    use approx::assert_relative_eq;

    /// Principal difference between two angles, in [−π, π].
    fn angle_diff(a: f64, b: f64) -> f64 {
        let mut diff = principal_angle(a) - principal_angle(b);

        if diff > PI {
            diff -= DPI;
        } else if diff < -PI {
            diff += DPI;
        }

        diff
    }

    #[test]
    fn test_angle_helpers() {
        assert_relative_eq!(principal_angle(-PI / 2.0), 1.5 * PI, epsilon = 1e-15);
        assert_relative_eq!(angle_diff(0.1, DPI - 0.1), 0.2, epsilon = 1e-12);
        assert_relative_eq!(angle_diff(DPI - 0.1, 0.1), -0.2, epsilon = 1e-12);
    }

    #[test]
    fn test_solve_elliptic() {
        for &e in &[0.0, 0.1, 0.5, 0.9, 0.99] {
            for &m in &[0.0, 0.3, 1.0, 3.0, 5.5, -2.0] {
                let u = solve_elliptic(m, e).unwrap();
                let back = principal_angle(u - e * u.sin());
                assert!(angle_diff(back, m).abs() < 1e-11, "e={e} M={m}");
            }
        }

        // circular orbit: anomalies coincide
        assert_relative_eq!(solve_elliptic(1.2, 0.0).unwrap(), 1.2, epsilon = 1e-14);
    }

    #[test]
    fn test_solve_hyperbolic() {
        for &e in &[1.01, 1.5, 3.0] {
            for &m in &[-10.0, -0.5, 0.0, 0.2, 4.0, 50.0] {
                let f = solve_hyperbolic(m, e).unwrap();
                assert_relative_eq!(e * f.sinh() - f, m, epsilon = 1e-9, max_relative = 1e-12);
            }
        }
    }

    #[test]
    fn test_solve_parabolic() {
        for &w in &[-3.0, -0.2, 0.0, 0.7, 12.0] {
            let nu = solve_parabolic(w);
            let s = (nu / 2.0).tan();
            assert_relative_eq!(s + s.powi(3) / 3.0, 2.0 * w / 3.0, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_true_anomaly() {
        // at perihelion and aphelion the anomalies agree
        assert_relative_eq!(true_anomaly_elliptic(0.0, 0.3), 0.0);
        assert_relative_eq!(true_anomaly_elliptic(PI - 1e-12, 0.3).abs(), PI, epsilon = 1e-6);
        assert!(true_anomaly_elliptic(1.0, 0.3) > 1.0);
        assert!(true_anomaly_hyperbolic(0.5, 2.0) > 0.0);
    }
}
