//! # Orbital element sets
//!
//! Heliocentric osculating elements supplied for minor bodies, in one of two
//! parameterizations:
//!
//! - [`keplerian_element`](crate::orbit_type::keplerian_element): `(a, e, i, Ω, ω, M)` at an
//!   epoch, elliptic orbits only.
//! - [`cometary_element`](crate::orbit_type::cometary_element): `(T, q, e, i, Ω, ω)`, any conic.
//!
//! The [`ElementSet`] enum wraps either form and offers the two operations the rest of
//! the crate needs: the heliocentric position at an instant, and the list of defining
//! parameters reported in target summaries.
//!
//! All element sets are referred to the **mean ecliptic and equinox of J2000**.
use std::fmt;

use nalgebra::Vector3;

use crate::constants::MJD;
use crate::coord_errors::CoordResult;
use crate::orbit_type::{cometary_element::CometaryElements, keplerian_element::KeplerianElements};
use crate::ref_system::rotmt;

/// Perihelion-based elements for any conic.
pub mod cometary_element;

/// Classical elliptic elements.
pub mod keplerian_element;

/// Osculating element set of a minor body.
///
/// Variants
/// --------
/// * `Keplerian`: semi-major axis and mean anomaly at the reference epoch.
/// * `Cometary` : perihelion distance and time of perihelion passage.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementSet {
    Keplerian(KeplerianElements),
    Cometary(CometaryElements),
}

impl ElementSet {
    /// Osculation epoch (MJD, TT).
    pub fn reference_epoch(&self) -> MJD {
        match self {
            ElementSet::Keplerian(k) => k.reference_epoch,
            ElementSet::Cometary(c) => c.reference_epoch,
        }
    }

    /// Check that the elements describe a valid conic.
    pub fn validate(&self) -> CoordResult<()> {
        match self {
            ElementSet::Keplerian(k) => k.validate(),
            ElementSet::Cometary(c) => c.validate(),
        }
    }

    /// Heliocentric position at `tjm` (MJD TT), mean ecliptic J2000, in AU.
    pub fn position_at(&self, tjm: MJD) -> CoordResult<Vector3<f64>> {
        match self {
            ElementSet::Keplerian(k) => k.position_at(tjm),
            ElementSet::Cometary(c) => c.position_at(tjm),
        }
    }

    /// The eight defining parameters, in input units (MJD, AU, degrees).
    ///
    /// Order: `epoch, orbinc, anode, perih, aorq, e, aorl | epochperih, dm`.
    /// Parameters the set does not carry are `None`. Sets with a daily motion report
    /// `perih` and `aorl` as longitudes of perihelion and mean longitude.
    pub fn summary_parameters(&self) -> [Option<f64>; 8] {
        match self {
            ElementSet::Keplerian(k) => {
                let node = k.ascending_node_longitude.to_degrees();
                let mut perih = k.periapsis_argument.to_degrees();
                let mut aorl = k.mean_anomaly.to_degrees();
                if k.daily_motion.is_some() {
                    perih += node;
                    aorl += perih;
                }
                [
                    Some(k.reference_epoch),
                    Some(k.inclination.to_degrees()),
                    Some(node),
                    Some(perih),
                    Some(k.semi_major_axis),
                    Some(k.eccentricity),
                    Some(aorl),
                    k.daily_motion.map(f64::to_degrees),
                ]
            }
            ElementSet::Cometary(c) => [
                Some(c.reference_epoch),
                Some(c.inclination.to_degrees()),
                Some(c.ascending_node_longitude.to_degrees()),
                Some(c.periapsis_argument.to_degrees()),
                Some(c.perihelion_distance),
                Some(c.eccentricity),
                Some(c.perihelion_epoch),
                None,
            ],
        }
    }
}

/// Rotate an in-plane position `(x, y)` (x towards perihelion) to the ecliptic frame.
///
/// ```text
/// r_ecl = R3(−Ω) · R1(−i) · R3(−ω) · (x, y, 0)ᵀ
/// ```
pub(crate) fn perifocal_to_ecliptic(
    x: f64,
    y: f64,
    inclination: f64,
    node: f64,
    periapsis_argument: f64,
) -> Vector3<f64> {
    rotmt(-node, 2) * rotmt(-inclination, 0) * rotmt(-periapsis_argument, 2) * Vector3::new(x, y, 0.0)
}

impl fmt::Display for ElementSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementSet::Keplerian(k) => write!(f, "[Keplerian]\n{k}"),
            ElementSet::Cometary(c) => write!(f, "[Cometary]\n{c}"),
        }
    }
}
