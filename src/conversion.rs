//! # Angle conversion layer
//!
//! Every angle stored by the crate is a finite number of **radians**. This module
//! turns the heterogeneous representations accepted on input (sexagesimal strings,
//! decimal degrees, decimal hours, radians) into radians, and renders radians back
//! into the documented output formats.
//!
//! ## Input
//!
//! [`to_radians`] takes an [`AngleInput`] (text or number), an optional
//! [`AngleUnits`] hint and an `hours` flag. Without a hint the units are inferred:
//!
//! - text containing a colon or whitespace is sexagesimal,
//! - otherwise a magnitude above 2π is taken as degrees,
//! - anything else is radians.
//!
//! Sexagesimal strings carrying right ascension or hour angle are in hours; the
//! `hours` flag multiplies the parsed value by 15 before conversion.
//!
//! ## Output
//!
//! [`from_radians`] renders a radian value according to an [`AngleFormat`]. The
//! [`AngleScale`] argument says whether the quantity is hour-like (RA, HA, LST) so
//! that sexagesimal renderings are in hours rather than degrees. Seconds are always
//! rendered with two fractional digits.
//!
//! ```rust
//! use obscoords::conversion::{from_radians, to_radians, AngleFormat, AngleScale, AngleUnits};
//!
//! let ra = to_radians("02 24 28.428", Some(AngleUnits::Sexagesimal), true).unwrap();
//! let text = from_radians(ra, AngleFormat::Sexagesimal, AngleScale::Hours);
//! assert_eq!(text.to_string(), "+02:24:28.43");
//! ```
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use log::warn;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::coord_errors::{CoordError, CoordResult};
use crate::constants::{Radian, DPI, RADEG, RADH};

/// `[+-] D [sep M [sep S]] [.fraction]` where `sep` is a colon or whitespace. The
/// fraction belongs to the last field present.
static SEXAGESIMAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^([+-])?\s*(\d+)(?:(?:\s*:\s*|\s+)(\d+))?(?:(?:\s*:\s*|\s+)(\d+))?(\.\d*)?$",
    )
    .expect("sexagesimal pattern is valid")
});

/// Hundredths of a second in one unit (degree or hour).
const HUNDREDTHS_PER_UNIT: f64 = 360_000.0;

/// Largest magnitude that fits the `whole` field of a [`Sexagesimal`].
const MAX_WHOLE_UNITS: f64 = u32::MAX as f64;

/// Units hint attached to an input angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AngleUnits {
    Sexagesimal,
    Degrees,
    Hours,
    Radians,
}

impl FromStr for AngleUnits {
    type Err = CoordError;

    /// Prefix match, case-insensitive: `s…`, `d…`, `h…`, `r…`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().chars().next() {
            Some('s') => Ok(AngleUnits::Sexagesimal),
            Some('d') => Ok(AngleUnits::Degrees),
            Some('h') => Ok(AngleUnits::Hours),
            Some('r') => Ok(AngleUnits::Radians),
            _ => Err(CoordError::MalformedAngle(format!("unknown units '{s}'"))),
        }
    }
}

/// Raw angle as supplied by a caller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AngleInput<'a> {
    Text(&'a str),
    Number(f64),
}

impl<'a> From<&'a str> for AngleInput<'a> {
    fn from(s: &'a str) -> Self {
        AngleInput::Text(s)
    }
}

impl<'a> From<&'a String> for AngleInput<'a> {
    fn from(s: &'a String) -> Self {
        AngleInput::Text(s.as_str())
    }
}

impl From<f64> for AngleInput<'_> {
    fn from(v: f64) -> Self {
        AngleInput::Number(v)
    }
}

/// Convert an angle in any supported representation to radians.
///
/// Arguments
/// ---------
/// * `input`: the angle, either as text (`"12:30:00"`, `"-05 12 33.2"`, `"45.0"`) or as a number
/// * `units`: optional units hint; `None` triggers the inference rules of the module docs
/// * `hours`: the sexagesimal value is in hours (RA, HA) and must be multiplied by 15
///
/// Return
/// ------
/// * The angle in radians, or [`CoordError::MalformedAngle`] if the text cannot be parsed
///   or the result is not finite.
pub fn to_radians<'a>(
    input: impl Into<AngleInput<'a>>,
    units: Option<AngleUnits>,
    hours: bool,
) -> CoordResult<Radian> {
    let input = input.into();

    let units = match units {
        Some(u) => u,
        None => infer_units(input)?,
    };

    let radians = match (input, units) {
        (AngleInput::Text(s), AngleUnits::Sexagesimal) => {
            let value = parse_sexagesimal(s)?;
            scale_sexagesimal(value, hours)
        }
        (AngleInput::Number(v), AngleUnits::Sexagesimal) => scale_sexagesimal(v, hours),
        (input, AngleUnits::Degrees) => numeric(input)? * RADEG,
        (input, AngleUnits::Hours) => numeric(input)? * RADH,
        (input, AngleUnits::Radians) => numeric(input)?,
    };

    if !radians.is_finite() {
        return Err(CoordError::MalformedAngle(format!("{input:?} is not finite")));
    }
    Ok(radians)
}

fn infer_units(input: AngleInput<'_>) -> CoordResult<AngleUnits> {
    let value = match input {
        AngleInput::Text(s) => {
            let s = s.trim();
            if s.contains(':') || s.contains(char::is_whitespace) {
                return Ok(AngleUnits::Sexagesimal);
            }
            parse_number(s)?
        }
        AngleInput::Number(v) => v,
    };

    if value.abs() > DPI {
        Ok(AngleUnits::Degrees)
    } else {
        Ok(AngleUnits::Radians)
    }
}

fn scale_sexagesimal(value: f64, hours: bool) -> Radian {
    if hours {
        value * 15.0 * RADEG
    } else {
        value * RADEG
    }
}

fn numeric(input: AngleInput<'_>) -> CoordResult<f64> {
    match input {
        AngleInput::Number(v) => Ok(v),
        AngleInput::Text(s) => parse_number(s.trim()),
    }
}

fn parse_number(s: &str) -> CoordResult<f64> {
    s.parse::<f64>()
        .map_err(|_| CoordError::MalformedAngle(format!("'{s}' is not a number")))
}

/// Parse a sexagesimal string into decimal units (degrees or hours, unscaled).
///
/// Accepts `[+-]D[.d]`, `[+-]D M[.m]` and `[+-]D M S[.s]`, with colons or whitespace
/// between fields; only the last field may carry a fraction. Minutes and seconds must be
/// below 60. A negative sign on a zero leading field (`"-00 30 14.2"`) is honoured.
pub fn parse_sexagesimal(s: &str) -> CoordResult<f64> {
    let s = s.trim();
    let caps = SEXAGESIMAL_RE
        .captures(s)
        .ok_or_else(|| CoordError::MalformedAngle(format!("'{s}' is not sexagesimal")))?;

    let mut fields = [0.0; 3];
    let mut last = 0;
    for (slot, group) in (2..=4).enumerate() {
        if let Some(m) = caps.get(group) {
            fields[slot] = parse_number(m.as_str())?;
            last = slot;
        }
    }
    if let Some(fraction) = caps.get(5) {
        fields[last] += parse_number(&format!("0{}", fraction.as_str()))?;
    }
    let [whole, minutes, seconds] = fields;

    if minutes >= 60.0 || seconds >= 60.0 {
        return Err(CoordError::MalformedAngle(format!(
            "'{s}': minutes and seconds must be below 60"
        )));
    }

    let sign = match caps.get(1).map(|m| m.as_str()) {
        Some("-") => -1.0,
        _ => 1.0,
    };

    Ok(sign * (whole + minutes / 60.0 + seconds / 3600.0))
}

// -------------------------------------------------------------------------------------------------
// Output side
// -------------------------------------------------------------------------------------------------

/// Output format of a derived angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AngleFormat {
    #[default]
    Radians,
    Degrees,
    Hours,
    Sexagesimal,
    Components,
}

impl FromStr for AngleFormat {
    type Err = CoordError;

    /// Prefix match on the legacy single-letter codes: `r`, `d`, `h`, `s`, `a` (array).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().chars().next() {
            None | Some('r') => Ok(AngleFormat::Radians),
            Some('d') => Ok(AngleFormat::Degrees),
            Some('h') => Ok(AngleFormat::Hours),
            Some('s') => Ok(AngleFormat::Sexagesimal),
            Some('a') => Ok(AngleFormat::Components),
            _ => Err(CoordError::MalformedAngle(format!("unknown format '{s}'"))),
        }
    }
}

/// Base unit used by sexagesimal renderings.
///
/// Right ascension, hour angle and sidereal time are hour-like: their sexagesimal and
/// component renderings are in hours (the radian value is divided by 15 after conversion
/// to degrees). Everything else is in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AngleScale {
    Degrees,
    Hours,
}

/// Sign, whole units, minutes, seconds and hundredths of a second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sexagesimal {
    pub negative: bool,
    pub whole: u32,
    pub minutes: u8,
    pub seconds: u8,
    pub hundredths: u8,
}

impl Sexagesimal {
    /// Decompose a decimal value (degrees or hours) rounded to 0.01 s, carrying into the
    /// minutes and whole fields when the rounded seconds reach 60.
    ///
    /// Magnitudes above `u32::MAX` units are clamped to it and NaN renders as zero; both
    /// cases are logged.
    pub fn from_decimal(value: f64) -> Self {
        let mut magnitude = value.abs();
        if magnitude.is_nan() {
            warn!("cannot decompose NaN into sexagesimal fields, using 0");
            magnitude = 0.0;
        } else if magnitude > MAX_WHOLE_UNITS {
            warn!("sexagesimal value {value} clamped to {MAX_WHOLE_UNITS}");
            magnitude = MAX_WHOLE_UNITS;
        }
        let total = (magnitude * HUNDREDTHS_PER_UNIT).round() as u64;
        let whole = total / 360_000;
        let rest = total % 360_000;
        let minutes = rest / 6_000;
        let rest = rest % 6_000;

        Sexagesimal {
            negative: value < 0.0 && total > 0,
            whole: whole as u32,
            minutes: minutes as u8,
            seconds: (rest / 100) as u8,
            hundredths: (rest % 100) as u8,
        }
    }

    pub fn sign(&self) -> char {
        if self.negative {
            '-'
        } else {
            '+'
        }
    }

    /// `[sign, whole, minutes, seconds, hundredths]`
    pub fn to_array(&self) -> (char, u32, u8, u8, u8) {
        (
            self.sign(),
            self.whole,
            self.minutes,
            self.seconds,
            self.hundredths,
        )
    }

    /// Decimal value in the base unit (degrees or hours).
    pub fn to_decimal(&self) -> f64 {
        let magnitude = self.whole as f64
            + self.minutes as f64 / 60.0
            + (self.seconds as f64 + self.hundredths as f64 / 100.0) / 3600.0;
        if self.negative {
            -magnitude
        } else {
            magnitude
        }
    }
}

impl fmt::Display for Sexagesimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{:02}:{:02}:{:02}.{:02}",
            self.sign(),
            self.whole,
            self.minutes,
            self.seconds,
            self.hundredths
        )
    }
}

/// A rendered angle.
#[derive(Debug, Clone, PartialEq)]
pub enum AngleValue {
    Number(f64),
    Text(String),
    Components(Sexagesimal),
}

impl AngleValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AngleValue::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            AngleValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_components(&self) -> Option<&Sexagesimal> {
        match self {
            AngleValue::Components(c) => Some(c),
            _ => None,
        }
    }
}

impl fmt::Display for AngleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AngleValue::Number(v) => write!(f, "{v}"),
            AngleValue::Text(s) => write!(f, "{s}"),
            AngleValue::Components(c) => write!(f, "{c}"),
        }
    }
}

/// Render a radian value in the requested format.
///
/// Arguments
/// ---------
/// * `value`: the angle in radians
/// * `format`: requested output format
/// * `scale`: whether the quantity is hour-like; only affects `Sexagesimal` and `Components`
///
/// Return
/// ------
/// * `Radians`, `Degrees`, `Hours` give an [`AngleValue::Number`]
/// * `Sexagesimal` gives `±DD:MM:SS.ss` as [`AngleValue::Text`]
/// * `Components` gives the same decomposition as [`AngleValue::Components`]
pub fn from_radians(value: Radian, format: AngleFormat, scale: AngleScale) -> AngleValue {
    match format {
        AngleFormat::Radians => AngleValue::Number(value),
        AngleFormat::Degrees => AngleValue::Number(value.to_degrees()),
        AngleFormat::Hours => AngleValue::Number(value / RADH),
        AngleFormat::Sexagesimal => {
            AngleValue::Text(Sexagesimal::from_decimal(scaled(value, scale)).to_string())
        }
        AngleFormat::Components => {
            AngleValue::Components(Sexagesimal::from_decimal(scaled(value, scale)))
        }
    }
}

fn scaled(value: Radian, scale: AngleScale) -> f64 {
    match scale {
        AngleScale::Degrees => value.to_degrees(),
        AngleScale::Hours => value.to_degrees() / 15.0,
    }
}

/// Normalize an angle to the interval (−π, π].
pub fn normalize_signed_pi(angle: Radian) -> Radian {
    let a = angle.rem_euclid(DPI);
    if a > std::f64::consts::PI {
        a - DPI
    } else {
        a
    }
}

/// Normalize an angle to the interval [0, 2π).
pub fn normalize_positive(angle: Radian) -> Radian {
    let a = angle.rem_euclid(DPI);
    // rem_euclid may round up to exactly 2π for tiny negative inputs
    if a >= DPI {
        0.0
    } else {
        a
    }
}

#[cfg(test)]
mod conversion_test {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_sexagesimal_hours_matches_decimal_hours() {
        let sexa = to_radians("02 24 28.428", Some(AngleUnits::Sexagesimal), true).unwrap();
        let hours = 2.0 + 24.0 / 60.0 + 28.428 / 3600.0;
        let decimal = to_radians(hours, Some(AngleUnits::Hours), false).unwrap();
        assert_relative_eq!(sexa, decimal, epsilon = 1e-14);
        assert_relative_eq!(sexa, 2.40789666666666 * PI / 12.0, epsilon = 1e-12);
    }

    #[test]
    fn test_parse_sexagesimal() {
        assert_relative_eq!(parse_sexagesimal("22 52 23.37").unwrap(), 22.873158333333333, epsilon = 1e-12);
        assert_relative_eq!(parse_sexagesimal("-00 30 14.2").unwrap(), -0.5039444444444444, epsilon = 1e-12);
        assert_relative_eq!(parse_sexagesimal("+13:55:42.7").unwrap(), 13.928527777777777, epsilon = 1e-12);
        assert_relative_eq!(parse_sexagesimal("12 30").unwrap(), 12.5, epsilon = 1e-12);
        assert_relative_eq!(parse_sexagesimal("12").unwrap(), 12.0, epsilon = 1e-12);

        assert_relative_eq!(parse_sexagesimal("12 30.5").unwrap(), 12.508333333333333, epsilon = 1e-12);
        assert_relative_eq!(parse_sexagesimal("-7.25").unwrap(), -7.25, epsilon = 1e-12);

        // a fraction is only allowed on the last field
        assert!(parse_sexagesimal("12.5 30 00").is_err());
        assert!(parse_sexagesimal("10 30.5 20").is_err());
        assert!(parse_sexagesimal("10:30.5:20").is_err());
        assert!(parse_sexagesimal("1 2 3.4.5").is_err());
        assert!(parse_sexagesimal("1 2 3 4").is_err());
        assert!(parse_sexagesimal("10 61 00").is_err());
        assert!(parse_sexagesimal("10 00 60").is_err());
        assert!(parse_sexagesimal("ab:cd").is_err());
        assert!(parse_sexagesimal("").is_err());
    }

    #[test]
    fn test_inferred_units() {
        // colon → sexagesimal degrees
        assert_relative_eq!(to_radians("45:00:00", None, false).unwrap(), PI / 4.0, epsilon = 1e-12);
        // whitespace → sexagesimal hours
        assert_relative_eq!(to_radians("06 00 00", None, true).unwrap(), PI / 2.0, epsilon = 1e-12);
        // magnitude above 2π → degrees
        assert_relative_eq!(to_radians(90.0, None, false).unwrap(), PI / 2.0, epsilon = 1e-12);
        assert_relative_eq!(to_radians("180", None, false).unwrap(), PI, epsilon = 1e-12);
        // otherwise radians
        assert_relative_eq!(to_radians(1.5, None, false).unwrap(), 1.5, epsilon = 1e-12);
        assert_relative_eq!(to_radians("-0.25", None, false).unwrap(), -0.25, epsilon = 1e-12);
    }

    #[test]
    fn test_explicit_units_override_inference() {
        assert_relative_eq!(
            to_radians(3.0, Some(AngleUnits::Degrees), false).unwrap(),
            3.0 * RADEG
        );
        assert_relative_eq!(
            to_radians(45.0, Some(AngleUnits::Radians), false).unwrap(),
            45.0
        );
        assert_relative_eq!(
            to_radians("6", Some(AngleUnits::Hours), false).unwrap(),
            PI / 2.0
        );
    }

    #[test]
    fn test_malformed_inputs() {
        assert!(matches!(
            to_radians("twelve", None, false),
            Err(CoordError::MalformedAngle(_))
        ));
        assert!(matches!(
            to_radians(f64::NAN, Some(AngleUnits::Radians), false),
            Err(CoordError::MalformedAngle(_))
        ));
        assert!(matches!(
            to_radians("12 xx 00", Some(AngleUnits::Sexagesimal), false),
            Err(CoordError::MalformedAngle(_))
        ));
        assert!(matches!(
            to_radians("10 30.5 20", Some(AngleUnits::Sexagesimal), false),
            Err(CoordError::MalformedAngle(_))
        ));
    }

    #[test]
    fn test_from_radians_numbers() {
        let v = PI / 3.0;
        assert_eq!(
            from_radians(v, AngleFormat::Radians, AngleScale::Degrees),
            AngleValue::Number(v)
        );
        let deg = from_radians(v, AngleFormat::Degrees, AngleScale::Hours)
            .as_f64()
            .unwrap();
        assert_relative_eq!(deg, 60.0, epsilon = 1e-12);
        let hrs = from_radians(v, AngleFormat::Hours, AngleScale::Degrees)
            .as_f64()
            .unwrap();
        assert_relative_eq!(hrs, 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_sexagesimal_rendering() {
        let dec = to_radians("-05 12 33.2", Some(AngleUnits::Sexagesimal), false).unwrap();
        assert_eq!(
            from_radians(dec, AngleFormat::Sexagesimal, AngleScale::Degrees).to_string(),
            "-05:12:33.20"
        );

        let ra = to_radians("12 30 00", Some(AngleUnits::Sexagesimal), true).unwrap();
        assert_eq!(
            from_radians(ra, AngleFormat::Sexagesimal, AngleScale::Hours).to_string(),
            "+12:30:00.00"
        );
        assert_eq!(
            from_radians(ra, AngleFormat::Sexagesimal, AngleScale::Degrees).to_string(),
            "+187:30:00.00"
        );
    }

    #[test]
    fn test_components_and_carry() {
        let comps = Sexagesimal::from_decimal(-10.5);
        assert_eq!(comps.to_array(), ('-', 10, 30, 0, 0));

        // 59.999 s rounds to 60.00 and must carry into the minutes
        let v = 1.0 + 59.0 / 60.0 + 59.999 / 3600.0;
        let comps = Sexagesimal::from_decimal(v);
        assert_eq!(comps.to_array(), ('+', 2, 0, 0, 0));

        // a tiny negative value that rounds to zero is not signed
        assert_eq!(Sexagesimal::from_decimal(-1e-9).sign(), '+');

        let value = from_radians(PI, AngleFormat::Components, AngleScale::Hours);
        assert_eq!(value.as_components().unwrap().to_array(), ('+', 12, 0, 0, 0));
    }

    #[test]
    fn test_out_of_range_decomposition() {
        let huge = Sexagesimal::from_decimal(-1e300);
        assert_eq!(huge.to_array(), ('-', u32::MAX, 0, 0, 0));

        let rendered = from_radians(1e12, AngleFormat::Sexagesimal, AngleScale::Degrees);
        assert_eq!(rendered.to_string(), format!("+{}:00:00.00", u32::MAX));

        assert_eq!(Sexagesimal::from_decimal(f64::NAN).to_array(), ('+', 0, 0, 0, 0));
        assert_eq!(
            Sexagesimal::from_decimal(f64::INFINITY).to_array(),
            ('+', u32::MAX, 0, 0, 0)
        );
    }

    #[test]
    fn test_format_codes() {
        assert_eq!("degrees".parse::<AngleFormat>().unwrap(), AngleFormat::Degrees);
        assert_eq!("s".parse::<AngleFormat>().unwrap(), AngleFormat::Sexagesimal);
        assert_eq!("array".parse::<AngleFormat>().unwrap(), AngleFormat::Components);
        assert_eq!("".parse::<AngleFormat>().unwrap(), AngleFormat::Radians);
        assert!("x".parse::<AngleFormat>().is_err());
        assert_eq!("RAD".parse::<AngleUnits>().unwrap(), AngleUnits::Radians);
        assert_eq!("sexagesimal".parse::<AngleUnits>().unwrap(), AngleUnits::Sexagesimal);
    }

    #[test]
    fn test_normalize() {
        assert_relative_eq!(normalize_signed_pi(3.0 * PI / 2.0), -PI / 2.0, epsilon = 1e-12);
        assert_relative_eq!(normalize_signed_pi(-3.0 * PI / 2.0), PI / 2.0, epsilon = 1e-12);
        assert_relative_eq!(normalize_signed_pi(PI), PI, epsilon = 1e-12);
        assert_relative_eq!(normalize_signed_pi(-PI), PI, epsilon = 1e-12);
        assert_relative_eq!(normalize_positive(-PI / 2.0), 3.0 * PI / 2.0, epsilon = 1e-12);
        assert_relative_eq!(normalize_positive(5.0 * PI), PI, epsilon = 1e-12);
    }
}
