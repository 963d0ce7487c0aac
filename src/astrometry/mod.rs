//! # Astrometry engine
//!
//! Everything a coordinate target needs from positional astronomy goes through the
//! [`AstrometryEngine`] trait: apparent places of catalogue positions, of orbital
//! element sets and of the major bodies, horizon transforms, the parallactic angle and
//! local sidereal time. All angles are in **radians**.
//!
//! The pure spherical-geometry parts (horizon transforms, parallactic angle, angle
//! normalization) have default implementations; an engine only has to provide the
//! time-dependent reductions. [`StandardEngine`] is the built-in low-precision engine.
//!
//! ## Conventions
//!
//! - Azimuth is measured from **North through East**, in [0, 2π).
//! - Hour angle is positive **west** of the meridian.
//! - Longitudes are **east-positive**; latitudes are geodetic.
//! - Apparent places refer to the true equator and equinox of date and are geocentric.
use hifitime::Epoch;

use crate::constants::Radian;
use crate::conversion::{normalize_positive, normalize_signed_pi};
use crate::coord_errors::CoordResult;
use crate::orbit_type::ElementSet;
use crate::planets::Planet;

mod standard_engine;

pub use standard_engine::StandardEngine;

/// Contract for the positional-astronomy collaborator.
///
/// Implementors must be thread-safe: targets hold an engine behind a shared reference
/// and may be evaluated from several threads.
pub trait AstrometryEngine: Send + Sync {
    /// Apparent place of a mean FK5 J2000 position at `epoch`.
    fn apparent_from_mean(
        &self,
        ra: Radian,
        dec: Radian,
        epoch: &Epoch,
    ) -> CoordResult<(Radian, Radian)>;

    /// Apparent place of a body moving on the given osculating orbit.
    fn apparent_from_elements(
        &self,
        elements: &ElementSet,
        epoch: &Epoch,
    ) -> CoordResult<(Radian, Radian)>;

    /// Apparent place of a major body.
    fn apparent_planet(&self, planet: Planet, epoch: &Epoch) -> CoordResult<(Radian, Radian)>;

    /// Local apparent sidereal time at `epoch` for an east-positive `longitude`, in [0, 2π).
    fn local_sidereal_time(&self, epoch: &Epoch, longitude: Radian) -> Radian;

    /// Inverse horizon transform: `(az, el)` seen from latitude `lat` at local sidereal time
    /// `lst` gives the apparent `(ra, dec)`.
    fn horizon_to_equatorial(
        &self,
        az: Radian,
        el: Radian,
        lat: Radian,
        lst: Radian,
    ) -> (Radian, Radian) {
        let (ha, dec) = horizon_to_hour_angle(az, el, lat);
        (normalize_positive(lst - ha), dec)
    }

    /// Horizon transform: `(ha, dec)` seen from latitude `lat` gives `(az, el)`.
    fn equatorial_to_horizon(&self, ha: Radian, dec: Radian, lat: Radian) -> (Radian, Radian) {
        equatorial_to_horizon(ha, dec, lat)
    }

    /// Angle between the directions to the zenith and to the pole, seen from the object.
    fn parallactic_angle(&self, ha: Radian, dec: Radian, lat: Radian) -> Radian {
        parallactic_angle(ha, dec, lat)
    }

    /// Normalization applied to hour angles derived from an apparent place, (−π, π].
    fn normalize_to_signed_pi(&self, angle: Radian) -> Radian {
        normalize_signed_pi(angle)
    }
}

/// `(ha, dec)` to `(az, el)`.
///
/// ```text
/// x = −cos H cos δ sin φ + sin δ cos φ
/// y = −sin H cos δ
/// z =  cos H cos δ cos φ + sin δ sin φ
/// A = atan2(y, x),  E = atan2(z, √(x² + y²))
/// ```
pub fn equatorial_to_horizon(ha: Radian, dec: Radian, lat: Radian) -> (Radian, Radian) {
    let (sh, ch) = ha.sin_cos();
    let (sd, cd) = dec.sin_cos();
    let (sp, cp) = lat.sin_cos();

    let x = -ch * cd * sp + sd * cp;
    let y = -sh * cd;
    let z = ch * cd * cp + sd * sp;

    let r = x.hypot(y);
    let az = if r == 0.0 { 0.0 } else { normalize_positive(y.atan2(x)) };
    (az, z.atan2(r))
}

/// `(az, el)` to `(ha, dec)`, the exact inverse of [`equatorial_to_horizon`].
///
/// The hour angle is returned in (−π, π].
pub fn horizon_to_hour_angle(az: Radian, el: Radian, lat: Radian) -> (Radian, Radian) {
    let (sa, ca) = az.sin_cos();
    let (se, ce) = el.sin_cos();
    let (sp, cp) = lat.sin_cos();

    let x = -ca * ce * sp + se * cp;
    let y = -sa * ce;
    let z = ca * ce * cp + se * sp;

    let r = x.hypot(y);
    let ha = if r == 0.0 { 0.0 } else { y.atan2(x) };
    (normalize_signed_pi(ha), z.atan2(r))
}

/// Parallactic angle of an object at `(ha, dec)` seen from latitude `lat`.
///
/// At the zenith (undefined) the result is 0.
pub fn parallactic_angle(ha: Radian, dec: Radian, lat: Radian) -> Radian {
    let cp = lat.cos();
    let sqsz = cp * ha.sin();
    let mut cqsz = lat.sin() * dec.cos() - cp * dec.sin() * ha.cos();
    if sqsz == 0.0 && cqsz == 0.0 {
        cqsz = 1.0;
    }
    sqsz.atan2(cqsz)
}
