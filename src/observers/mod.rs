//! # Telescopes & pointing limits
//!
//! A target only needs three things from the instrument it is observed with: where it
//! is on the Earth, what it is called, and which part of the sky it can reach. The
//! [`Telescope`] trait captures exactly that; [`Observatory`] is the plain-data
//! implementation shipped with the crate.
//!
//! ## Limit windows
//!
//! Pointing envelopes come in two flavours ([`LimitWindow`]):
//!
//! - **AZEL** mounts are bounded in elevation only;
//! - **HADEC** (equatorial) mounts are bounded in hour angle and in declination.
//!
//! A telescope whose limit type is unknown reports `None` from [`Telescope::limits`].
//!
//! ## Units
//!
//! - Longitudes: **radians**, east positive.
//! - Latitudes: **radians**, geodetic.
//! - Altitude: **meters** above the reference ellipsoid.
use std::fmt;

use ordered_float::NotNan;
use serde::{Deserialize, Serialize};

use crate::constants::{Degree, Radian, RADEG};
use crate::coord_errors::{CoordError, CoordResult};

/// Telescope pointing envelope. All bounds in radians, exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum LimitWindow {
    AzEl {
        el_min: Radian,
        el_max: Radian,
    },
    HaDec {
        ha_min: Radian,
        ha_max: Radian,
        dec_min: Radian,
        dec_max: Radian,
    },
}

impl LimitWindow {
    pub fn label(&self) -> &'static str {
        match self {
            LimitWindow::AzEl { .. } => "AZEL",
            LimitWindow::HaDec { .. } => "HADEC",
        }
    }
}

/// Capabilities a coordinate target needs from a telescope.
pub trait Telescope: Send + Sync + fmt::Debug {
    /// Geodetic longitude, east positive, radians.
    fn longitude(&self) -> Radian;

    /// Geodetic latitude, radians.
    fn latitude(&self) -> Radian;

    /// Pointing envelope, or `None` when the limit type is not recognised.
    fn limits(&self) -> Option<LimitWindow>;

    fn display_name(&self) -> String;
}

/// A fixed observing site.
///
/// See also
/// ------------
/// * [`Observatory::from_degrees`] – Build from longitude/latitude in degrees.
/// * [`Observatory::with_limits`] – Attach a pointing envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observatory {
    /// Human-readable site name.
    pub name: String,

    /// Geodetic longitude, east positive, **radians**.
    pub longitude: NotNan<f64>,

    /// Geodetic latitude, **radians**.
    pub latitude: NotNan<f64>,

    /// Altitude above the ellipsoid, **meters**.
    pub altitude: NotNan<f64>,

    /// Pointing envelope, if known.
    pub limits: Option<LimitWindow>,
}

impl Observatory {
    /// Create a site from coordinates in radians.
    ///
    /// Errors
    /// ----------
    /// * [`CoordError::MalformedAngle`] if a coordinate is NaN or infinite, or the latitude
    ///   lies outside [−π/2, π/2].
    pub fn new(
        name: impl Into<String>,
        longitude: Radian,
        latitude: Radian,
        altitude: f64,
    ) -> CoordResult<Self> {
        if !latitude.is_finite() || latitude.abs() > std::f64::consts::FRAC_PI_2 {
            return Err(CoordError::MalformedAngle(format!(
                "latitude {latitude} out of range"
            )));
        }
        Ok(Observatory {
            name: name.into(),
            longitude: finite(longitude, "longitude")?,
            latitude: finite(latitude, "latitude")?,
            altitude: finite(altitude, "altitude")?,
            limits: None,
        })
    }

    /// Create a site from coordinates in degrees (east-positive longitude).
    pub fn from_degrees(
        name: impl Into<String>,
        longitude: Degree,
        latitude: Degree,
        altitude: f64,
    ) -> CoordResult<Self> {
        Self::new(name, longitude * RADEG, latitude * RADEG, altitude)
    }

    /// Attach a pointing envelope.
    pub fn with_limits(mut self, limits: LimitWindow) -> Self {
        self.limits = Some(limits);
        self
    }
}

fn finite(value: f64, what: &str) -> CoordResult<NotNan<f64>> {
    if !value.is_finite() {
        return Err(CoordError::MalformedAngle(format!("{what} is not finite")));
    }
    NotNan::new(value).map_err(|_| CoordError::MalformedAngle(format!("{what} is NaN")))
}

impl Telescope for Observatory {
    fn longitude(&self) -> Radian {
        self.longitude.into_inner()
    }

    fn latitude(&self) -> Radian {
        self.latitude.into_inner()
    }

    fn limits(&self) -> Option<LimitWindow> {
        self.limits
    }

    fn display_name(&self) -> String {
        self.name.clone()
    }
}

impl fmt::Display for Observatory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (lon {:.5}°, lat {:.5}°, alt {:.1} m",
            self.name,
            self.longitude.to_degrees(),
            self.latitude.to_degrees(),
            self.altitude.into_inner()
        )?;
        match self.limits {
            Some(l) => write!(f, ", {} limits)", l.label()),
            None => write!(f, ")"),
        }
    }
}
