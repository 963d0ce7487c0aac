//! # Celestial reference frames
//!
//! Input positions may be supplied in several sky frames; internally every fixed
//! position is held as FK5 J2000 right ascension and declination. This module owns the
//! frame labels ([`SkyFrame`]), the constant rotations between frames and the helpers
//! moving between spherical and Cartesian coordinates.
//!
//! ```text
//! Supergalactic ──► Galactic ──┐
//!                              ├──► FK5 J2000 ◄── Ecliptic (mean J2000)
//! B1950 (FK4) ──(precession)───┘        ▲
//!                                       └──(nutation⁻¹, precession⁻¹)── Apparent of date
//! ```
use std::fmt;
use std::str::FromStr;

use log::debug;
use nalgebra::{Matrix3, Vector3};

use crate::constants::{Radian, B1950, DPI, MJD, RADEG, T2000, VLIGHT_AU};
use crate::coord_errors::CoordError;
use crate::earth_orientation::{nutation_matrix, obleq, prec};

/// Rotation from FK5 J2000 equatorial to galactic coordinates (IAU 1958 definition,
/// expressed in J2000).
const EQUATORIAL_TO_GALACTIC: [[f64; 3]; 3] = [
    [-0.054_875_539_390, -0.873_437_104_725, -0.483_834_991_775],
    [0.494_109_453_633, -0.444_829_594_298, 0.746_982_248_696],
    [-0.867_666_135_681, -0.198_076_389_622, 0.455_983_794_523],
];

/// Galactic coordinates (l, b) of the supergalactic origin and north pole, degrees.
const SUPERGALACTIC_ORIGIN: (f64, f64) = (137.37, 0.0);
const SUPERGALACTIC_POLE: (f64, f64) = (47.37, 6.32);

/// Sky frame in which a fixed position was supplied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SkyFrame {
    /// FK5, mean equator and equinox of J2000.0
    J2000,
    /// FK4, mean equator and equinox of B1950.0
    B1950,
    Galactic,
    Supergalactic,
    /// Mean ecliptic and equinox of J2000.0
    Ecliptic,
    /// True equator and equinox of the given epoch (MJD TT)
    Apparent(MJD),
}

impl SkyFrame {
    /// Short label used in summaries.
    pub fn label(&self) -> &'static str {
        match self {
            SkyFrame::J2000 => "J2000",
            SkyFrame::B1950 => "B1950",
            SkyFrame::Galactic => "GALACTIC",
            SkyFrame::Supergalactic => "SUPERGALACTIC",
            SkyFrame::Ecliptic => "ECLIPTIC",
            SkyFrame::Apparent(_) => "APPARENT",
        }
    }

    /// Whether positions in this frame are given as longitude/latitude rather than RA/Dec.
    pub fn uses_longitude_latitude(&self) -> bool {
        matches!(
            self,
            SkyFrame::Galactic | SkyFrame::Supergalactic | SkyFrame::Ecliptic
        )
    }

    /// Rotation matrix taking a unit vector in this frame to FK5 J2000.
    pub fn to_j2000_matrix(&self) -> Matrix3<f64> {
        match *self {
            SkyFrame::J2000 => Matrix3::identity(),
            // precession only: the FK4 E-terms of aberration are not removed
            SkyFrame::B1950 => prec(B1950).transpose(),
            SkyFrame::Galactic => galactic_to_j2000(),
            SkyFrame::Supergalactic => galactic_to_j2000() * supergalactic_to_galactic(),
            SkyFrame::Ecliptic => rotmt(obleq(T2000), 0).transpose(),
            SkyFrame::Apparent(tjm) => prec(tjm).transpose() * nutation_matrix(tjm).transpose(),
        }
    }

    /// Convert a position given in this frame to FK5 J2000 (RA, Dec).
    pub fn to_j2000(&self, lon: Radian, lat: Radian) -> (Radian, Radian) {
        let v = self.to_j2000_matrix() * radec_to_cartesian(lon, lat);
        let (ra, dec, _) = cartesian_to_radec(v);
        debug!(
            "{} ({:.6}, {:.6}) -> J2000 ({:.6}, {:.6}) rad",
            self.label(),
            lon,
            lat,
            ra,
            dec
        );
        (ra, dec)
    }
}

impl fmt::Display for SkyFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SkyFrame {
    type Err = CoordError;

    /// Case-insensitive frame names. `APPARENT` defaults to the J2000 epoch; callers
    /// supplying an epoch replace it afterwards.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "J2000" | "FK5" | "ICRS" | "RJ" => Ok(SkyFrame::J2000),
            "B1950" | "FK4" | "RB" => Ok(SkyFrame::B1950),
            "GALACTIC" | "GAL" | "GA" => Ok(SkyFrame::Galactic),
            "SUPERGALACTIC" | "SUPERGAL" => Ok(SkyFrame::Supergalactic),
            "ECLIPTIC" | "ECL" => Ok(SkyFrame::Ecliptic),
            "APPARENT" | "APP" | "GAPPT" => Ok(SkyFrame::Apparent(T2000)),
            other => Err(CoordError::UnknownFrame(other.to_string())),
        }
    }
}

/// Construct a 3×3 frame rotation around one of the principal axes (X, Y, or Z).
///
/// The matrix rotates the **coordinate frame** by `alpha` (positive = counter-clockwise
/// looking from the positive axis towards the origin), so a fixed vector appears rotated
/// by `−alpha`. This is the convention of the IAU precession/nutation formulae.
///
/// # Arguments
///
/// * `alpha` - Rotation angle in **radians**.
/// * `k` - Axis index: `0` → X, `1` → Y, `2` → Z. Any other value is treated as Z.
pub fn rotmt(alpha: f64, k: usize) -> Matrix3<f64> {
    let (s, c) = alpha.sin_cos();
    match k {
        0 => Matrix3::new(1.0, 0.0, 0.0, 0.0, c, s, 0.0, -s, c),
        1 => Matrix3::new(c, 0.0, -s, 0.0, 1.0, 0.0, s, 0.0, c),
        _ => Matrix3::new(c, s, 0.0, -s, c, 0.0, 0.0, 0.0, 1.0),
    }
}

fn galactic_to_j2000() -> Matrix3<f64> {
    Matrix3::from_fn(|i, j| EQUATORIAL_TO_GALACTIC[j][i])
}

/// Columns are the galactic unit vectors of the supergalactic X, Y and Z axes.
fn supergalactic_to_galactic() -> Matrix3<f64> {
    let x = radec_to_cartesian(
        SUPERGALACTIC_ORIGIN.0 * RADEG,
        SUPERGALACTIC_ORIGIN.1 * RADEG,
    );
    let z = radec_to_cartesian(SUPERGALACTIC_POLE.0 * RADEG, SUPERGALACTIC_POLE.1 * RADEG);
    let y = z.cross(&x).normalize();
    Matrix3::from_columns(&[x, y, z])
}

/// Galactic longitude and latitude of a FK5 J2000 position.
pub fn j2000_to_galactic(ra: Radian, dec: Radian) -> (Radian, Radian) {
    let v = galactic_to_j2000().transpose() * radec_to_cartesian(ra, dec);
    let (l, b, _) = cartesian_to_radec(v);
    (l, b)
}

/// Unit vector of a spherical position.
pub fn radec_to_cartesian(ra: Radian, dec: Radian) -> Vector3<f64> {
    let (sin_dec, cos_dec) = dec.sin_cos();
    let (sin_ra, cos_ra) = ra.sin_cos();
    Vector3::new(cos_dec * cos_ra, cos_dec * sin_ra, sin_dec)
}

/// Apply the first-order aberration correction to a relative position vector.
///
/// Arguments
/// ---------
/// * `xrel`: position of the target relative to the observer [AU].
/// * `vobs`: velocity of the observer [AU/day].
///
/// Returns
/// --------
/// * The apparent direction vector `xrel + (‖xrel‖ / c) · vobs` (not normalized).
pub(crate) fn correct_aberration(xrel: Vector3<f64>, vobs: Vector3<f64>) -> Vector3<f64> {
    let dt = xrel.norm() / VLIGHT_AU;
    xrel + dt * vobs
}

/// Convert a 3D Cartesian position vector to right ascension and declination.
///
/// Returns
/// --------
/// * Tuple `(α, δ, ρ)`:
///     - `α`: right ascension in radians, in the range [0, 2π).
///     - `δ`: declination in radians, in the range [−π/2, +π/2].
///     - `ρ`: Euclidean norm of the vector.
///
/// Remarks
/// -------
/// * A zero vector gives `(0.0, 0.0, 0.0)`; a vector along the pole gives `α = 0`.
pub fn cartesian_to_radec(cartesian_position: Vector3<f64>) -> (f64, f64, f64) {
    let pos_norm = cartesian_position.norm();
    if pos_norm == 0. {
        return (0.0, 0.0, pos_norm);
    }

    let delta = (cartesian_position.z / pos_norm).clamp(-1.0, 1.0).asin();

    let rho_xy = cartesian_position.x.hypot(cartesian_position.y);
    if rho_xy == 0.0 {
        return (0.0, delta, pos_norm);
    }

    let alpha = cartesian_position.y.atan2(cartesian_position.x);
    let alpha = if alpha < 0.0 { alpha + DPI } else { alpha };
    (alpha, delta, pos_norm)
}
