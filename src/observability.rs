//! # Observability
//!
//! Decides whether a derived position lies inside a telescope's pointing envelope.
//! The decision is a pure function of the telescope's limits and the current pointing:
//!
//! 1. no telescope → [`Observability::NoTelescope`];
//! 2. unrecognised limit type → [`Observability::UnknownLimits`];
//! 3. `AZEL` → observable iff `el_min < el < el_max`;
//! 4. `HADEC` → hour angle normalized to (−π, π], observable iff `ha_min < ha < ha_max`
//!    and then `dec_min < dec < dec_max`.
//!
//! All comparisons are strict: a position exactly on a limit is not observable.
use std::fmt;

use crate::constants::Radian;
use crate::conversion::normalize_signed_pi;
use crate::coord_errors::CoordResult;
use crate::observers::{LimitWindow, Telescope};

/// Outcome of an observability check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observability {
    Observable,
    /// A telescope with known limits is set, but the target is outside them.
    OutsideLimits,
    NoTelescope,
    /// The telescope does not report a recognised limit type.
    UnknownLimits,
    /// The target has no sky position to test (calibration).
    NotApplicable,
}

impl Observability {
    /// Collapse to a yes/no answer: only [`Observability::Observable`] is `true`.
    pub fn is_observable(&self) -> bool {
        matches!(self, Observability::Observable)
    }
}

impl fmt::Display for Observability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Observability::Observable => "observable",
            Observability::OutsideLimits => "not observable",
            Observability::NoTelescope => "no telescope",
            Observability::UnknownLimits => "unknown telescope limits",
            Observability::NotApplicable => "not applicable",
        })
    }
}

/// Current pointing of a target, radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pointing {
    pub elevation: Radian,
    pub hour_angle: Radian,
    pub declination: Radian,
}

/// Whether `pointing` lies strictly inside `limits`.
pub fn within_limits(limits: &LimitWindow, pointing: &Pointing) -> bool {
    match *limits {
        LimitWindow::AzEl { el_min, el_max } => {
            el_min < pointing.elevation && pointing.elevation < el_max
        }
        LimitWindow::HaDec {
            ha_min,
            ha_max,
            dec_min,
            dec_max,
        } => {
            let ha = normalize_signed_pi(pointing.hour_angle);
            if !(ha_min < ha && ha < ha_max) {
                return false;
            }
            dec_min < pointing.declination && pointing.declination < dec_max
        }
    }
}

/// Evaluate observability against an optional telescope.
///
/// `pointing` is only evaluated when a telescope with recognised limits is present.
pub fn check<F>(telescope: Option<&dyn Telescope>, pointing: F) -> CoordResult<Observability>
where
    F: FnOnce() -> CoordResult<Pointing>,
{
    let Some(telescope) = telescope else {
        return Ok(Observability::NoTelescope);
    };
    let Some(limits) = telescope.limits() else {
        return Ok(Observability::UnknownLimits);
    };

    if within_limits(&limits, &pointing()?) {
        Ok(Observability::Observable)
    } else {
        Ok(Observability::OutsideLimits)
    }
}
