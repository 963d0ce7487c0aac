use hifitime::Epoch;
use log::trace;
use nalgebra::{Matrix3, Vector3};

use crate::astrometry::AstrometryEngine;
use crate::constants::{Radian, MJD, VLIGHT_AU};
use crate::conversion::normalize_positive;
use crate::coord_errors::CoordResult;
use crate::earth_orientation::{equequ, nutation_matrix, obleq, prec};
use crate::orbit_type::ElementSet;
use crate::planets::{
    earth_heliocentric_ecliptic, heliocentric_ecliptic, moon_geocentric_of_date, Planet,
};
use crate::ref_system::{
    cartesian_to_radec, correct_aberration, radec_to_cartesian, rotmt, SkyFrame,
};
use crate::time::{gmst, mjd_tt, mjd_utc};

/// Half-width of the central difference used for the Earth's velocity, days.
const VELOCITY_STEP: f64 = 0.05;

/// Low-precision astrometry engine.
///
/// Reduction chain for a catalogue position:
///
/// ```text
/// mean J2000 ──(annual aberration)──► proper J2000 ──P(t)──► mean of date ──N(t)──► true of date
/// ```
///
/// Solar-system bodies additionally get one light-time iteration on the heliocentric
/// position, so that `P(t − τ) − E(t)` plus annual aberration yields the apparent
/// direction. The Moon series is geocentric and already referred to the equinox of date.
///
/// Accuracy is dominated by the truncated nutation (≲ 0.5″), the approximate planetary
/// elements (≲ 1′) and the neglect of polar motion and UT1 − UTC (≲ 15″ in LST).
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardEngine;

impl StandardEngine {
    pub fn new() -> Self {
        StandardEngine
    }

    /// Precession then nutation: mean J2000 to true equator and equinox of date.
    fn mean_to_true(tjm: MJD) -> Matrix3<f64> {
        nutation_matrix(tjm) * prec(tjm)
    }

    /// Heliocentric Earth position, equatorial J2000, AU.
    fn earth_position(tjm: MJD) -> CoordResult<Vector3<f64>> {
        Ok(ecliptic_to_equatorial() * earth_heliocentric_ecliptic(tjm)?)
    }

    /// Heliocentric Earth velocity, equatorial J2000, AU/day.
    fn earth_velocity(tjm: MJD) -> CoordResult<Vector3<f64>> {
        let after = Self::earth_position(tjm + VELOCITY_STEP)?;
        let before = Self::earth_position(tjm - VELOCITY_STEP)?;
        Ok((after - before) / (2.0 * VELOCITY_STEP))
    }

    /// Geocentric apparent place of a body whose heliocentric ecliptic position is
    /// given by `position_at`.
    fn apparent_from_heliocentric<F>(tjm: MJD, position_at: F) -> CoordResult<(Radian, Radian)>
    where
        F: Fn(MJD) -> CoordResult<Vector3<f64>>,
    {
        let to_equatorial = ecliptic_to_equatorial();
        let earth = Self::earth_position(tjm)?;

        let geometric = to_equatorial * position_at(tjm)? - earth;
        let light_time = geometric.norm() / VLIGHT_AU;
        let retarded = to_equatorial * position_at(tjm - light_time)? - earth;

        let proper = correct_aberration(retarded, Self::earth_velocity(tjm)?);
        let (ra, dec, distance) = cartesian_to_radec(Self::mean_to_true(tjm) * proper);
        trace!(
            "apparent place at MJD {tjm:.6}: ra {ra:.8} dec {dec:.8} rad, delta {distance:.6} AU, tau {light_time:.6} d"
        );
        Ok((ra, dec))
    }
}

fn ecliptic_to_equatorial() -> Matrix3<f64> {
    SkyFrame::Ecliptic.to_j2000_matrix()
}

impl AstrometryEngine for StandardEngine {
    fn apparent_from_mean(
        &self,
        ra: Radian,
        dec: Radian,
        epoch: &Epoch,
    ) -> CoordResult<(Radian, Radian)> {
        let tjm = mjd_tt(epoch);
        // a unit vector at 1 AU: the aberration shift is v/c
        let proper = correct_aberration(radec_to_cartesian(ra, dec), Self::earth_velocity(tjm)?);
        let (ra_app, dec_app, _) = cartesian_to_radec(Self::mean_to_true(tjm) * proper);
        trace!("mean ({ra:.8}, {dec:.8}) -> apparent ({ra_app:.8}, {dec_app:.8}) at MJD {tjm:.6}");
        Ok((ra_app, dec_app))
    }

    fn apparent_from_elements(
        &self,
        elements: &ElementSet,
        epoch: &Epoch,
    ) -> CoordResult<(Radian, Radian)> {
        Self::apparent_from_heliocentric(mjd_tt(epoch), |t| elements.position_at(t))
    }

    fn apparent_planet(&self, planet: Planet, epoch: &Epoch) -> CoordResult<(Radian, Radian)> {
        let tjm = mjd_tt(epoch);
        match planet {
            Planet::Moon => {
                let of_date = rotmt(obleq(tjm), 0).transpose() * moon_geocentric_of_date(tjm);
                let (ra, dec, _) = cartesian_to_radec(nutation_matrix(tjm) * of_date);
                trace!("moon at MJD {tjm:.6}: ra {ra:.8} dec {dec:.8}");
                Ok((ra, dec))
            }
            _ => Self::apparent_from_heliocentric(tjm, |t| heliocentric_ecliptic(planet, t)),
        }
    }

    fn local_sidereal_time(&self, epoch: &Epoch, longitude: Radian) -> Radian {
        normalize_positive(gmst(mjd_utc(epoch)) + equequ(mjd_tt(epoch)) + longitude)
    }
}

#[cfg(test)]
mod standard_engine_test {
    use super::*;
    use crate::constants::{DPI, RADEG, RADH, T2000};
    use crate::orbit_type::keplerian_element::KeplerianElements;
    use approx::assert_relative_eq;
    use hifitime::TimeScale;

    fn epoch(mjd_tt: f64) -> Epoch {
        Epoch::from_mjd_in_time_scale(mjd_tt, TimeScale::TT)
    }

    #[test]
    fn test_earth_speed() {
        let v = StandardEngine::earth_velocity(60000.0).unwrap();
        // ~29.8 km/s
        assert_relative_eq!(v.norm(), 0.0172, epsilon = 4e-4);
    }

    #[test]
    fn test_apparent_from_mean_offsets() {
        let engine = StandardEngine::new();
        // near J2000 the shift is dominated by aberration (≤ 20.5″) and nutation (≲ 20″)
        let (ra, dec) = engine
            .apparent_from_mean(1.0, 0.3, &epoch(T2000 + 10.0))
            .unwrap();
        assert!((ra - 1.0).abs() < 60.0 * RADEG / 3600.0);
        assert!((dec - 0.3).abs() < 60.0 * RADEG / 3600.0);

        // 25 years later precession dominates: ~21′ in RA for a star on the equator at 0h
        let (ra, _) = engine
            .apparent_from_mean(0.0, 0.0, &epoch(T2000 + 25.0 * 365.25))
            .unwrap();
        assert_relative_eq!(ra / RADH * 3600.0, 25.0 * 3.074, epsilon = 2.5);
    }

    #[test]
    fn test_sun_position_at_equinox() {
        let engine = StandardEngine::new();
        // 2000 March 20 07:35 UT, the Sun at the vernal equinox
        let (ra, dec) = engine
            .apparent_planet(Planet::Sun, &epoch(51623.317))
            .unwrap();
        let ra = if ra > std::f64::consts::PI { ra - DPI } else { ra };
        assert!(ra.abs() < 0.02 * RADEG, "ra = {}", ra.to_degrees());
        assert!(dec.abs() < 0.02 * RADEG, "dec = {}", dec.to_degrees());
    }

    #[test]
    fn test_moon_stays_near_ecliptic() {
        let engine = StandardEngine::new();
        for day in 0..10 {
            let (ra, dec) = engine
                .apparent_planet(Planet::Moon, &epoch(60000.0 + 3.0 * day as f64))
                .unwrap();
            // ecliptic latitude ≤ 5.3°, so |dec| ≤ ε + 5.3°
            assert!(dec.abs() < 29.0 * RADEG, "dec = {}", dec.to_degrees());
            assert!((0.0..DPI).contains(&ra));
        }
    }

    #[test]
    fn test_apparent_from_elements_main_belt() {
        let engine = StandardEngine::new();
        let kep = ElementSet::Keplerian(KeplerianElements {
            reference_epoch: T2000,
            semi_major_axis: 2.5,
            eccentricity: 0.1,
            inclination: 5.0 * RADEG,
            ascending_node_longitude: 80.0 * RADEG,
            periapsis_argument: 70.0 * RADEG,
            mean_anomaly: 10.0 * RADEG,
            daily_motion: None,
        });
        let (ra, dec) = engine.apparent_from_elements(&kep, &epoch(60000.0)).unwrap();
        assert!((0.0..DPI).contains(&ra));
        // a 5° inclined main-belt orbit never strays far from the ecliptic
        assert!(dec.abs() < (23.44 + 10.0) * RADEG);
    }

    #[test]
    fn test_local_sidereal_time() {
        let engine = StandardEngine::new();
        let t = Epoch::from_gregorian_utc_at_midnight(2021, 1, 1);
        let greenwich = engine.local_sidereal_time(&t, 0.0);
        // GMST at 2021-01-01 0h UT = 6h 43m 28.5s, minus ~1 s of equation of the equinoxes
        assert_relative_eq!(greenwich / RADH, 6.7243, epsilon = 1e-3);

        let east = engine.local_sidereal_time(&t, 90.0 * RADEG);
        assert_relative_eq!(
            (east - greenwich).rem_euclid(DPI),
            90.0 * RADEG,
            epsilon = 1e-12
        );
    }
}
