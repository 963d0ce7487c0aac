//! # Keplerian orbital elements
//!
//! Classical element set `(a, e, i, Ω, ω, M)` at a reference epoch, for **elliptic**
//! orbits only. Propagation to another epoch is pure two-body motion around the Sun:
//! the mean anomaly advances linearly with the daily motion `n`, and the eccentric
//! anomaly is recovered with [`solve_elliptic`].
//!
//! ## Units
//!
//! - Lengths: **AU**
//! - Angles: **radians**
//! - Time: **days** (epochs in **MJD**, TT scale)
//!
//! The orbital plane is referred to the mean ecliptic and equinox of J2000.
use std::fmt;

use nalgebra::Vector3;

use crate::constants::{GAUSS_GRAV, MJD};
use crate::coord_errors::{CoordError, CoordResult};
use crate::kepler::{principal_angle, solve_elliptic};
use crate::orbit_type::perifocal_to_ecliptic;

/// Keplerian orbital elements (osculating, two-body).
///
/// Units
/// -----
/// * `reference_epoch`: MJD (TT).
/// * `semi_major_axis`: Astronomical Units (AU).
/// * `eccentricity`: unitless, in `[0, 1)`.
/// * `inclination`, `ascending_node_longitude`, `periapsis_argument`, `mean_anomaly`: radians.
/// * `daily_motion`: radians/day. When absent, `n = k / a^{3/2}` is used.
#[derive(Debug, PartialEq, Clone)]
pub struct KeplerianElements {
    pub reference_epoch: MJD,
    pub semi_major_axis: f64,
    pub eccentricity: f64,
    pub inclination: f64,
    pub ascending_node_longitude: f64,
    pub periapsis_argument: f64,
    pub mean_anomaly: f64,
    pub daily_motion: Option<f64>,
}

impl KeplerianElements {
    /// Validate the element domain.
    ///
    /// Errors
    /// ------
    /// * [`CoordError::InvalidElements`] if `a ≤ 0`, `e ∉ [0, 1)` or any value is not finite.
    pub fn validate(&self) -> CoordResult<()> {
        let values = [
            self.reference_epoch,
            self.semi_major_axis,
            self.eccentricity,
            self.inclination,
            self.ascending_node_longitude,
            self.periapsis_argument,
            self.mean_anomaly,
            self.daily_motion.unwrap_or(0.0),
        ];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(CoordError::InvalidElements(
                "non-finite orbital element".into(),
            ));
        }
        if self.semi_major_axis <= 0.0 {
            return Err(CoordError::InvalidElements(format!(
                "semi-major axis must be positive, got {}",
                self.semi_major_axis
            )));
        }
        if !(0.0..1.0).contains(&self.eccentricity) {
            return Err(CoordError::InvalidElements(format!(
                "eccentricity {} is not elliptic; give a perihelion epoch for e >= 1",
                self.eccentricity
            )));
        }
        Ok(())
    }

    /// Mean motion in radians per day.
    pub fn mean_motion(&self) -> f64 {
        self.daily_motion
            .unwrap_or_else(|| GAUSS_GRAV / self.semi_major_axis.powf(1.5))
    }

    /// Heliocentric position at `tjm` (MJD TT), mean ecliptic J2000, AU.
    ///
    /// Return
    /// ------
    /// * Position vector, or [`CoordError::KeplerNoConvergence`].
    pub fn position_at(&self, tjm: MJD) -> CoordResult<Vector3<f64>> {
        let e = self.eccentricity;
        let a = self.semi_major_axis;

        let mean_anomaly =
            principal_angle(self.mean_anomaly + self.mean_motion() * (tjm - self.reference_epoch));
        let u = solve_elliptic(mean_anomaly, e)?;

        let x = a * (u.cos() - e);
        let y = a * (1.0 - e * e).sqrt() * u.sin();

        Ok(perifocal_to_ecliptic(
            x,
            y,
            self.inclination,
            self.ascending_node_longitude,
            self.periapsis_argument,
        ))
    }
}

impl fmt::Display for KeplerianElements {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Keplerian Elements @ epoch (MJD): {:.6}",
            self.reference_epoch
        )?;
        writeln!(f, "-------------------------------------------")?;
        writeln!(f, "  a   (semi-major axis)       = {:.6} AU", self.semi_major_axis)?;
        writeln!(f, "  e   (eccentricity)          = {:.6}", self.eccentricity)?;
        writeln!(
            f,
            "  i   (inclination)           = {:.6}°",
            self.inclination.to_degrees()
        )?;
        writeln!(
            f,
            "  Ω   (longitude of node)     = {:.6}°",
            self.ascending_node_longitude.to_degrees()
        )?;
        writeln!(
            f,
            "  ω   (argument of periapsis) = {:.6}°",
            self.periapsis_argument.to_degrees()
        )?;
        write!(
            f,
            "  M   (mean anomaly)          = {:.6}°",
            self.mean_anomaly.to_degrees()
        )
    }
}

#[cfg(test)]
pub(crate) mod test_keplerian_element {
    use super::*;
    use crate::constants::{DPI, RADEG};
    use approx::assert_relative_eq;

    pub(crate) fn circular_orbit() -> KeplerianElements {
        KeplerianElements {
            reference_epoch: 60000.0,
            semi_major_axis: 1.0,
            eccentricity: 0.0,
            inclination: 0.0,
            ascending_node_longitude: 0.0,
            periapsis_argument: 0.0,
            mean_anomaly: 0.0,
            daily_motion: None,
        }
    }

    #[test]
    fn test_circular_orbit_period() {
        let kep = circular_orbit();
        let period = DPI / kep.mean_motion();
        // sidereal year of a massless body at 1 AU
        assert_relative_eq!(period, 365.2568983, epsilon = 1e-6);

        let quarter = kep.position_at(60000.0 + period / 4.0).unwrap();
        assert_relative_eq!(quarter, Vector3::new(0.0, 1.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_perihelion_and_aphelion_distances() {
        let kep = KeplerianElements {
            eccentricity: 0.25,
            semi_major_axis: 2.0,
            inclination: 10.0 * RADEG,
            ascending_node_longitude: 30.0 * RADEG,
            periapsis_argument: 60.0 * RADEG,
            ..circular_orbit()
        };
        let at_peri = kep.position_at(kep.reference_epoch).unwrap();
        assert_relative_eq!(at_peri.norm(), 1.5, epsilon = 1e-12);

        let half = std::f64::consts::PI / kep.mean_motion();
        let at_aph = kep.position_at(kep.reference_epoch + half).unwrap();
        assert_relative_eq!(at_aph.norm(), 2.5, epsilon = 1e-9);
        assert_relative_eq!(at_aph.normalize(), -at_peri.normalize(), epsilon = 1e-9);
    }

    #[test]
    fn test_daily_motion_override() {
        let kep = KeplerianElements {
            daily_motion: Some(1.0 * RADEG),
            ..circular_orbit()
        };
        let p = kep.position_at(60090.0).unwrap();
        assert_relative_eq!(p.y.atan2(p.x), 90.0 * RADEG, epsilon = 1e-12);
    }

    #[test]
    fn test_validate() {
        assert!(circular_orbit().validate().is_ok());
        let hyperbolic = KeplerianElements {
            eccentricity: 1.2,
            ..circular_orbit()
        };
        assert!(matches!(
            hyperbolic.validate(),
            Err(CoordError::InvalidElements(_))
        ));
        let negative = KeplerianElements {
            semi_major_axis: -1.0,
            ..circular_orbit()
        };
        assert!(negative.validate().is_err());
    }
}
