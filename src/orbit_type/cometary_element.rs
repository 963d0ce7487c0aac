use std::fmt;

use nalgebra::Vector3;

use crate::constants::{GAUSS_GRAV, MJD};
use crate::coord_errors::{CoordError, CoordResult};
use crate::kepler::{
    solve_elliptic, solve_hyperbolic, solve_parabolic, true_anomaly_elliptic,
    true_anomaly_hyperbolic,
};
use crate::orbit_type::perifocal_to_ecliptic;

/// Eccentricities closer to 1 than this are propagated as parabolas.
const PARABOLIC_TOLERANCE: f64 = 1e-8;

/// # Cometary orbital elements
///
/// Perihelion-based elements `(T, q, e, i, Ω, ω)`, valid for **every conic**: the
/// perihelion distance stays finite where the semi-major axis does not.
///
/// Units & conventions
/// --------------------
/// - Distances in **AU**; angles in **radians**; epochs in **MJD (TT)**.
/// - Heliocentric, mean ecliptic and equinox J2000.
/// - `reference_epoch` is the osculation epoch; propagation only uses the perihelion
///   passage `perihelion_epoch`.
#[derive(Debug, Clone, PartialEq)]
pub struct CometaryElements {
    /// Osculation epoch of the element set (MJD, TT).
    pub reference_epoch: MJD,

    /// Time of perihelion passage `T` (MJD, TT).
    pub perihelion_epoch: MJD,

    /// Perihelion distance `q` (AU).
    pub perihelion_distance: f64,

    /// Eccentricity `e` (≥ 0).
    pub eccentricity: f64,

    /// Inclination `i` (rad).
    pub inclination: f64,

    /// Longitude of the ascending node `Ω` (rad).
    pub ascending_node_longitude: f64,

    /// Argument of perihelion `ω` (rad).
    pub periapsis_argument: f64,
}

impl CometaryElements {
    pub fn validate(&self) -> CoordResult<()> {
        let values = [
            self.reference_epoch,
            self.perihelion_epoch,
            self.perihelion_distance,
            self.eccentricity,
            self.inclination,
            self.ascending_node_longitude,
            self.periapsis_argument,
        ];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(CoordError::InvalidElements(
                "non-finite orbital element".into(),
            ));
        }
        if self.perihelion_distance <= 0.0 {
            return Err(CoordError::InvalidElements(format!(
                "perihelion distance must be positive, got {}",
                self.perihelion_distance
            )));
        }
        if self.eccentricity < 0.0 {
            return Err(CoordError::InvalidElements(format!(
                "negative eccentricity {}",
                self.eccentricity
            )));
        }
        Ok(())
    }

    /// True anomaly and heliocentric distance at `tjm`.
    ///
    /// The conic is selected from the eccentricity: elliptic, parabolic (within
    /// `1e-8` of 1) or hyperbolic.
    pub fn true_anomaly_at(&self, tjm: MJD) -> CoordResult<(f64, f64)> {
        let q = self.perihelion_distance;
        let e = self.eccentricity;
        let dt = tjm - self.perihelion_epoch;

        if (e - 1.0).abs() < PARABOLIC_TOLERANCE {
            let w = 3.0 * GAUSS_GRAV * dt / (2.0 * (2.0 * q.powi(3)).sqrt());
            let nu = solve_parabolic(w);
            return Ok((nu, 2.0 * q / (1.0 + nu.cos())));
        }

        let p = q * (1.0 + e);
        let nu = if e < 1.0 {
            let a = q / (1.0 - e);
            let u = solve_elliptic(GAUSS_GRAV / a.powf(1.5) * dt, e)?;
            true_anomaly_elliptic(u, e)
        } else {
            let a = q / (e - 1.0);
            let f = solve_hyperbolic(GAUSS_GRAV / a.powf(1.5) * dt, e)?;
            true_anomaly_hyperbolic(f, e)
        };

        Ok((nu, p / (1.0 + e * nu.cos())))
    }

    /// Heliocentric position at `tjm` (MJD TT), mean ecliptic J2000, AU.
    pub fn position_at(&self, tjm: MJD) -> CoordResult<Vector3<f64>> {
        let (nu, r) = self.true_anomaly_at(tjm)?;
        Ok(perifocal_to_ecliptic(
            r * nu.cos(),
            r * nu.sin(),
            self.inclination,
            self.ascending_node_longitude,
            self.periapsis_argument,
        ))
    }
}

impl fmt::Display for CometaryElements {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Cometary Elements @ epoch (MJD): {:.6}",
            self.reference_epoch
        )?;
        writeln!(f, "-------------------------------------------")?;
        writeln!(f, "  T   (perihelion passage)    = {:.6} MJD", self.perihelion_epoch)?;
        writeln!(f, "  q   (perihelion distance)   = {:.6} AU", self.perihelion_distance)?;
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
        write!(
            f,
            "  ω   (argument of periapsis) = {:.6}°",
            self.periapsis_argument.to_degrees()
        )
    }
}
