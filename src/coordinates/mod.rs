//! # Coordinate variants
//!
//! A target position is one of five closed variants ([`CoordinateVariant`]):
//!
//! | Variant           | Defining data                         | Apparent place obtained from            |
//! |-------------------|---------------------------------------|-----------------------------------------|
//! | `FixedEquatorial` | FK5 J2000 RA/Dec                      | engine, mean → apparent                 |
//! | `OrbitalElements` | heliocentric osculating elements      | engine, two-body propagation            |
//! | `NamedPlanet`     | body name                             | engine, planetary theory                |
//! | `FixedHorizon`    | Az/El or HA/Dec                       | engine, inverse horizon transform       |
//! | `Calibration`     | nothing                               | zenith of the current site, no engine   |
//!
//! Every derivation is an exhaustive `match`, so adding a variant forces every consumer
//! to handle it.
//!
//! ## Calibration convention
//!
//! A calibration target has no geometry. It reports the **zenith** of the current site:
//! azimuth 0, elevation π/2, hour angle 0, apparent declination equal to the site latitude
//! and apparent right ascension equal to the local sidereal time. It is never observable.
use std::fmt;

use log::trace;

use crate::astrometry::AstrometryEngine;
use crate::constants::Radian;
use crate::conversion::normalize_positive;
use crate::coord_errors::{CoordError, CoordResult};
use crate::orbit_type::ElementSet;
use crate::planets::Planet;
use crate::ref_system::SkyFrame;
use crate::target::context::ObservingContext;

pub mod equatorial;
pub mod horizon;

pub use equatorial::Equatorial;
pub use horizon::HorizonPosition;

/// Number of slots in a target summary array.
pub const SUMMARY_LEN: usize = 11;

/// The defining representation of a target.
#[derive(Debug, Clone, PartialEq)]
pub enum CoordinateVariant {
    FixedEquatorial(Equatorial),
    OrbitalElements(ElementSet),
    NamedPlanet(Planet),
    FixedHorizon(HorizonPosition),
    Calibration,
}

/// One slot of a summary array.
#[derive(Debug, Clone, PartialEq)]
pub enum SummaryField {
    Tag(String),
    Value(f64),
    NotAvailable,
}

impl From<Option<f64>> for SummaryField {
    fn from(v: Option<f64>) -> Self {
        v.map_or(SummaryField::NotAvailable, SummaryField::Value)
    }
}

impl fmt::Display for SummaryField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SummaryField::Tag(t) => f.write_str(t),
            SummaryField::Value(v) => write!(f, "{v}"),
            SummaryField::NotAvailable => f.write_str("na"),
        }
    }
}

impl CoordinateVariant {
    /// Type label: `RADEC`, `ELEMENTS`, the upper-case planet name, `AZEL`, `HADEC` or `CAL`.
    pub fn type_label(&self) -> String {
        match self {
            CoordinateVariant::FixedEquatorial(_) => "RADEC".into(),
            CoordinateVariant::OrbitalElements(_) => "ELEMENTS".into(),
            CoordinateVariant::NamedPlanet(p) => p.name().to_ascii_uppercase(),
            CoordinateVariant::FixedHorizon(h) => h.label().into(),
            CoordinateVariant::Calibration => "CAL".into(),
        }
    }

    /// Catalogue position (FK5 J2000), for variants that have one.
    pub fn ra2000_dec2000(&self) -> Option<(Radian, Radian)> {
        match self {
            CoordinateVariant::FixedEquatorial(eq) => Some((eq.ra2000(), eq.dec2000())),
            CoordinateVariant::OrbitalElements(_)
            | CoordinateVariant::NamedPlanet(_)
            | CoordinateVariant::FixedHorizon(_)
            | CoordinateVariant::Calibration => None,
        }
    }

    /// Apparent right ascension and declination at the context's epoch and site.
    ///
    /// Errors
    /// ------
    /// * [`CoordError::TelescopeRequired`] for an HA/Dec position without a telescope.
    /// * Any error reported by the engine (e.g. a non-converging Kepler solution).
    pub fn apparent_position(
        &self,
        context: &ObservingContext,
        engine: &dyn AstrometryEngine,
    ) -> CoordResult<(Radian, Radian)> {
        let epoch = context.epoch();
        let position = match self {
            CoordinateVariant::FixedEquatorial(eq) => {
                engine.apparent_from_mean(eq.ra2000(), eq.dec2000(), &epoch)?
            }
            CoordinateVariant::OrbitalElements(elements) => {
                engine.apparent_from_elements(elements, &epoch)?
            }
            CoordinateVariant::NamedPlanet(planet) => engine.apparent_planet(*planet, &epoch)?,
            CoordinateVariant::FixedHorizon(HorizonPosition::AzEl { az, el }) => {
                let lst = engine.local_sidereal_time(&epoch, context.longitude());
                engine.horizon_to_equatorial(*az, *el, context.latitude(), lst)
            }
            CoordinateVariant::FixedHorizon(HorizonPosition::HaDec { ha, dec }) => {
                let telescope = context.telescope().ok_or(CoordError::TelescopeRequired(
                    "the apparent place of an HA/Dec position",
                ))?;
                let lst = engine.local_sidereal_time(&epoch, telescope.longitude());
                (normalize_positive(lst - ha), *dec)
            }
            CoordinateVariant::Calibration => {
                let lst = engine.local_sidereal_time(&epoch, context.longitude());
                (lst, context.latitude())
            }
        };
        trace!("{} apparent place: {:?}", self.type_label(), position);
        Ok(position)
    }

    /// Fixed-shape summary: `[tag, ra2000|na, dec2000|na, p1 … p8]`.
    ///
    /// Defining parameters per variant:
    /// * `RADEC`: input longitude and latitude (radians, input frame), apparent-frame
    ///   epoch (MJD) when the input frame is `APPARENT`.
    /// * `ELEMENTS`: `epoch, orbinc, anode, perih, aorq, e, aorl | epochperih, dm`
    ///   (MJD, degrees, AU).
    /// * `AZEL` / `HADEC`: the two stored angles (radians).
    /// * planets and `CAL`: none.
    pub fn summary_array(&self) -> [SummaryField; SUMMARY_LEN] {
        let (ra2000, dec2000) = match self.ra2000_dec2000() {
            Some((ra, dec)) => (Some(ra), Some(dec)),
            None => (None, None),
        };

        let mut params: [Option<f64>; 8] = [None; 8];
        match self {
            CoordinateVariant::FixedEquatorial(eq) => {
                let (lon, lat) = eq.input();
                params[0] = Some(lon);
                params[1] = Some(lat);
                if let SkyFrame::Apparent(epoch) = eq.frame() {
                    params[2] = Some(epoch);
                }
            }
            CoordinateVariant::OrbitalElements(elements) => {
                params = elements.summary_parameters();
            }
            CoordinateVariant::FixedHorizon(h) => {
                let (a, b) = h.angles();
                params[0] = Some(a);
                params[1] = Some(b);
            }
            CoordinateVariant::NamedPlanet(_) | CoordinateVariant::Calibration => {}
        }

        let mut out: [SummaryField; SUMMARY_LEN] =
            std::array::from_fn(|_| SummaryField::NotAvailable);
        out[0] = SummaryField::Tag(self.type_label());
        out[1] = ra2000.into();
        out[2] = dec2000.into();
        for (slot, value) in out[3..].iter_mut().zip(params) {
            *slot = value.into();
        }
        out
    }
}
