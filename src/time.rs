//! # Time handling
//!
//! The reference time of an observation is a [`hifitime::Epoch`]. Anything that can
//! report calendar fields ([`HasCalendarFields`]) can be turned into one, which keeps
//! the rest of the crate independent from how callers represent dates.
//!
//! Sidereal time uses the IAU 1982 GMST polynomial, with UT1 approximated by UTC.
use std::str::FromStr;

use hifitime::Epoch;

use crate::constants::{DPI, MJD, T2000};
use crate::coord_errors::{CoordError, CoordResult};

/// A value exposing UTC calendar fields.
pub trait HasCalendarFields {
    fn year(&self) -> i32;
    fn month(&self) -> u8;
    fn day(&self) -> u8;
    fn hour(&self) -> u8;
    fn minute(&self) -> u8;
    /// Seconds including the fractional part.
    fn second(&self) -> f64;
}

impl HasCalendarFields for Epoch {
    fn year(&self) -> i32 {
        self.to_gregorian_utc().0
    }
    fn month(&self) -> u8 {
        self.to_gregorian_utc().1
    }
    fn day(&self) -> u8 {
        self.to_gregorian_utc().2
    }
    fn hour(&self) -> u8 {
        self.to_gregorian_utc().3
    }
    fn minute(&self) -> u8 {
        self.to_gregorian_utc().4
    }
    fn second(&self) -> f64 {
        let (_, _, _, _, _, s, ns) = self.to_gregorian_utc();
        s as f64 + ns as f64 * 1e-9
    }
}

/// Plain UTC calendar date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalendarDate {
    pub year: i32,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: f64,
}

impl HasCalendarFields for CalendarDate {
    fn year(&self) -> i32 {
        self.year
    }
    fn month(&self) -> u8 {
        self.month
    }
    fn day(&self) -> u8 {
        self.day
    }
    fn hour(&self) -> u8 {
        self.hour
    }
    fn minute(&self) -> u8 {
        self.minute
    }
    fn second(&self) -> f64 {
        self.second
    }
}

impl FromStr for CalendarDate {
    type Err = CoordError;

    /// Parse a date in the format `YYYY MM DD.FFFFF` (UTC, fractional day).
    fn from_str(date_str: &str) -> Result<Self, Self::Err> {
        let invalid = || {
            CoordError::UnrecognizedSpecification(format!(
                "invalid date '{date_str}', expected: YYYY MM DD.FFFFF"
            ))
        };

        let parts: Vec<&str> = date_str.split_whitespace().collect();
        if parts.len() != 3 {
            return Err(invalid());
        }

        let year = i32::from_str(parts[0]).map_err(|_| invalid())?;
        let month = u8::from_str(parts[1]).map_err(|_| invalid())?;
        let day_fraction = f64::from_str(parts[2]).map_err(|_| invalid())?;
        if !(1.0..32.0).contains(&day_fraction) {
            return Err(invalid());
        }

        // Separation of day and fraction of day
        let day = day_fraction.trunc() as u8;
        let hours = day_fraction.fract() * 24.0;
        let hour = hours.trunc() as u8;
        let minutes = (hours - hour as f64) * 60.0;
        let minute = minutes.trunc() as u8;
        let second = (minutes - minute as f64) * 60.0;

        Ok(CalendarDate {
            year,
            month,
            day,
            hour,
            minute,
            second,
        })
    }
}

/// Build a UTC [`Epoch`] from any calendar-like value.
///
/// Return
/// ------
/// * The epoch, or [`CoordError::InvalidTime`] if the fields do not form a valid date.
pub fn epoch_from_calendar<T: HasCalendarFields + ?Sized>(date: &T) -> CoordResult<Epoch> {
    let second = date.second();
    if !(0.0..61.0).contains(&second) {
        return Err(CoordError::UnrecognizedSpecification(format!(
            "seconds out of range: {second}"
        )));
    }
    let whole = second.trunc();
    let nanos = ((second - whole) * 1e9).round().min(999_999_999.0) as u32;

    Ok(Epoch::maybe_from_gregorian_utc(
        date.year(),
        date.month(),
        date.day(),
        date.hour(),
        date.minute(),
        whole as u8,
        nanos,
    )?)
}

/// Modified Julian Date on the UTC scale (used as a UT1 proxy for Earth rotation).
pub fn mjd_utc(epoch: &Epoch) -> MJD {
    epoch.to_mjd_utc_days()
}

/// Modified Julian Date on the TT scale (used for precession, nutation and ephemerides).
pub fn mjd_tt(epoch: &Epoch) -> MJD {
    epoch.to_mjd_tt_days()
}

/// Compute the Greenwich Mean Sidereal Time (GMST) in radians
/// for a given Modified Julian Date (UT1 time scale).
///
/// This function implements the IAU 1982 polynomial formula
/// for the mean sidereal time at 0h UT1, plus the fractional-day
/// correction term due to Earth's rotation rate.
///
/// # Arguments
/// * `tjm` - Modified Julian Date (MJD, UT1 time scale)
///
/// # Returns
/// * GMST angle in radians, normalized to the interval [0, 2π).
///
/// # References
/// * IAU 1982, Explanatory Supplement to the Astronomical Almanac (1992).
pub fn gmst(tjm: MJD) -> f64 {
    // Polynomial coefficients for GMST at 0h UT1 (in seconds)
    const C0: f64 = 24110.54841;
    const C1: f64 = 8640184.812866;
    const C2: f64 = 9.3104e-2;
    const C3: f64 = -6.2e-6;

    // Ratio of sidereal day to solar day
    const RAP: f64 = 1.00273790934;

    let itjm = tjm.floor();
    let t = (itjm - T2000) / 36525.0;

    // GMST at 0h UT1, seconds → radians
    let gmst0 = (((C3 * t + C2) * t + C1) * t + C0) * DPI / 86400.0;

    // Earth rotation during the elapsed fraction of the day
    let h = (tjm - itjm) * DPI;

    (gmst0 + h * RAP).rem_euclid(DPI)
}
