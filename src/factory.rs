//! # Target factory
//!
//! Builds a [`CoordinateVariant`] from a loosely-typed argument set ([`CoordArgs`]).
//! Keys are matched case-insensitively and the first matching rule wins:
//!
//! 1. `planet` with a non-empty value → [`CoordinateVariant::NamedPlanet`];
//! 2. `elements`, a map holding an `epoch` → [`CoordinateVariant::OrbitalElements`]
//!    (any other `elements` value falls through to the next rules);
//! 3. `type` (a sky frame) with `ra`/`dec` or `long`/`lat`, optional `units` →
//!    [`CoordinateVariant::FixedEquatorial`];
//! 4. any of `az`, `el`, `ha` → [`CoordinateVariant::FixedHorizon`] (`az`+`el` or `ha`+`dec`);
//! 5. nothing besides an optional `name` → [`CoordinateVariant::Calibration`];
//! 6. anything else fails with [`CoordError::UnrecognizedSpecification`].
//!
//! Construction either yields a complete variant or an error; nothing is partially built.
//!
//! ## Orbital elements
//!
//! Angles are in degrees, `aorq` in AU and epochs in MJD (TT) or ISO 8601 text. A set with
//! `epochperih` is cometary (`aorq` is the perihelion distance). Otherwise it is
//! Keplerian with `aorq` the semi-major axis, `perih` the argument of perihelion and
//! `aorl` the mean anomaly at `epoch`. When the daily motion `dm` is given the set follows
//! the major-planet convention instead: `perih` is the longitude of perihelion ϖ and
//! `aorl` the mean longitude L, so ω = ϖ − Ω and M = L − ϖ.
//!
//! ## JSON input
//!
//! Argument sets deserialize from JSON objects, nested objects becoming maps:
//!
//! ```rust
//! use obscoords::factory::{build_variant, CoordArgs};
//!
//! let args = CoordArgs::from_json_str(
//!     r#"{"type": "J2000", "ra": "05:35:17.3", "dec": "-05:23:28", "name": "M42"}"#,
//! ).unwrap();
//! let variant = build_variant(&args).unwrap();
//! assert_eq!(variant.type_label(), "RADEC");
//! ```
use std::collections::BTreeMap;
use std::str::FromStr;

use hifitime::Epoch;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::constants::{Radian, MJD, RADEG};
use crate::conversion::{to_radians, AngleInput, AngleUnits};
use crate::coord_errors::{CoordError, CoordResult};
use crate::coordinates::{CoordinateVariant, Equatorial, HorizonPosition};
use crate::orbit_type::{
    cometary_element::CometaryElements, keplerian_element::KeplerianElements, ElementSet,
};
use crate::planets::Planet;
use crate::ref_system::SkyFrame;
use crate::time::mjd_tt;

/// A single argument value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArgValue {
    Number(f64),
    Text(String),
    Map(CoordArgs),
}

impl ArgValue {
    fn kind(&self) -> &'static str {
        match self {
            ArgValue::Number(_) => "number",
            ArgValue::Text(_) => "text",
            ArgValue::Map(_) => "map",
        }
    }
}

impl From<f64> for ArgValue {
    fn from(v: f64) -> Self {
        ArgValue::Number(v)
    }
}

impl From<&str> for ArgValue {
    fn from(v: &str) -> Self {
        ArgValue::Text(v.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(v: String) -> Self {
        ArgValue::Text(v)
    }
}

impl From<CoordArgs> for ArgValue {
    fn from(v: CoordArgs) -> Self {
        ArgValue::Map(v)
    }
}

/// Named construction arguments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CoordArgs(BTreeMap<String, ArgValue>);

impl CoordArgs {
    pub fn new() -> Self {
        CoordArgs::default()
    }

    /// Parse a JSON object into an argument set.
    pub fn from_json_str(json: &str) -> CoordResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Builder-style insertion.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ArgValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ArgValue>) {
        self.0.insert(key.into(), value.into());
    }

    /// Case-insensitive lookup.
    pub fn get(&self, key: &str) -> Option<&ArgValue> {
        self.0
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// The optional free-text `name`.
    pub fn name(&self) -> CoordResult<Option<String>> {
        match self.get("name") {
            None => Ok(None),
            Some(ArgValue::Text(s)) => Ok(Some(s.clone())),
            Some(ArgValue::Number(n)) => Ok(Some(n.to_string())),
            Some(other) => Err(mismatch("name", other, "text")),
        }
    }

    fn text(&self, key: &str) -> CoordResult<Option<&str>> {
        match self.get(key) {
            None => Ok(None),
            Some(ArgValue::Text(s)) => Ok(Some(s.as_str())),
            Some(other) => Err(mismatch(key, other, "text")),
        }
    }

    fn number(&self, key: &str) -> CoordResult<Option<f64>> {
        match self.get(key) {
            None => Ok(None),
            Some(ArgValue::Number(v)) => Ok(Some(*v)),
            Some(ArgValue::Text(s)) => s.trim().parse().map(Some).map_err(|_| {
                CoordError::UnrecognizedSpecification(format!("'{key}': '{s}' is not a number"))
            }),
            Some(other) => Err(mismatch(key, other, "number")),
        }
    }

    fn angle(&self, key: &str, units: Option<AngleUnits>, hours: bool) -> CoordResult<Option<Radian>> {
        let input = match self.get(key) {
            None => return Ok(None),
            Some(ArgValue::Text(s)) => AngleInput::Text(s),
            Some(ArgValue::Number(v)) => AngleInput::Number(*v),
            Some(other) => return Err(mismatch(key, other, "angle")),
        };
        to_radians(input, units, hours).map(Some)
    }

    fn required_angle(&self, key: &str, units: Option<AngleUnits>, hours: bool) -> CoordResult<Radian> {
        self.angle(key, units, hours)?
            .ok_or_else(|| CoordError::InsufficientArguments(format!("missing '{key}'")))
    }

    /// An epoch given either as an MJD (TT) number or as an ISO 8601 / Gregorian string.
    fn epoch(&self, key: &str) -> CoordResult<Option<MJD>> {
        match self.get(key) {
            Some(ArgValue::Text(s)) if s.trim().parse::<f64>().is_err() => {
                Ok(Some(mjd_tt(&Epoch::from_str(s.trim())?)))
            }
            _ => self.number(key),
        }
    }

    fn units(&self) -> CoordResult<Option<AngleUnits>> {
        self.text("units")?.map(AngleUnits::from_str).transpose()
    }
}

fn mismatch(key: &str, found: &ArgValue, expected: &'static str) -> CoordError {
    debug!("argument '{key}' holds a {}, expected {expected}", found.kind());
    CoordError::TypeMismatch {
        key: key.to_string(),
        expected,
    }
}

/// Select and build the coordinate variant described by `args`.
pub fn build_variant(args: &CoordArgs) -> CoordResult<CoordinateVariant> {
    // 1. planet, attempted first and unconditionally
    if let Some(name) = args.text("planet")? {
        if !name.trim().is_empty() {
            let planet = Planet::from_str(name)?;
            debug!("factory: planet {planet}");
            return Ok(CoordinateVariant::NamedPlanet(planet));
        }
    }

    // 2. orbital elements
    if let Some(ArgValue::Map(elements)) = args.get("elements") {
        if elements.contains("epoch") {
            let set = element_set(elements)?;
            debug!("factory: orbital elements at MJD {}", set.reference_epoch());
            return Ok(CoordinateVariant::OrbitalElements(set));
        }
    }

    // 3. fixed sky position
    if let Some(frame) = args.text("type")? {
        let equatorial = fixed_position(args, frame)?;
        return Ok(CoordinateVariant::FixedEquatorial(equatorial));
    }

    // 4. horizon-fixed
    if ["az", "el", "ha"].iter().any(|k| args.contains(k)) {
        return horizon_position(args).map(CoordinateVariant::FixedHorizon);
    }

    // 5. nothing at all
    if args.is_empty() || (args.len() == 1 && args.contains("name")) {
        debug!("factory: calibration target");
        return Ok(CoordinateVariant::Calibration);
    }

    let keys: Vec<&str> = args.0.keys().map(String::as_str).collect();
    Err(CoordError::UnrecognizedSpecification(format!(
        "no rule matches keys [{}]",
        keys.join(", ")
    )))
}

fn fixed_position(args: &CoordArgs, frame: &str) -> CoordResult<Equatorial> {
    let mut frame = SkyFrame::from_str(frame)?;
    if let SkyFrame::Apparent(_) = frame {
        if let Some(epoch) = args.epoch("epoch")? {
            frame = SkyFrame::Apparent(epoch);
        }
    }
    let units = args.units()?;

    let (lon, lat) = if frame.uses_longitude_latitude() {
        (
            args.required_angle("long", units, false)?,
            args.required_angle("lat", units, false)?,
        )
    } else {
        (
            args.required_angle("ra", units, true)?,
            args.required_angle("dec", units, false)?,
        )
    };
    debug!("factory: fixed position, frame {frame}, units {units:?}");
    Equatorial::new(frame, lon, lat)
}

fn horizon_position(args: &CoordArgs) -> CoordResult<HorizonPosition> {
    let units = args.units()?;

    if args.contains("az") && args.contains("el") {
        debug!("factory: fixed azimuth/elevation");
        return HorizonPosition::az_el(
            args.required_angle("az", units, false)?,
            args.required_angle("el", units, false)?,
        );
    }
    if args.contains("ha") && args.contains("dec") {
        debug!("factory: fixed hour angle/declination");
        return HorizonPosition::ha_dec(
            args.required_angle("ha", units, true)?,
            args.required_angle("dec", units, false)?,
        );
    }
    Err(CoordError::InsufficientArguments(
        "a horizon position needs az and el, or ha and dec".into(),
    ))
}

fn element_set(elements: &CoordArgs) -> CoordResult<ElementSet> {
    let required = |key: &str| -> CoordResult<f64> {
        elements
            .number(key)?
            .ok_or_else(|| CoordError::InsufficientArguments(format!("missing element '{key}'")))
    };
    let epoch = elements
        .epoch("epoch")?
        .ok_or_else(|| CoordError::InsufficientArguments("missing element 'epoch'".into()))?;

    let set = match elements.epoch("epochperih")? {
        Some(perihelion_epoch) => ElementSet::Cometary(CometaryElements {
            reference_epoch: epoch,
            perihelion_epoch,
            perihelion_distance: required("aorq")?,
            eccentricity: required("e")?,
            inclination: required("orbinc")? * RADEG,
            ascending_node_longitude: required("anode")? * RADEG,
            periapsis_argument: required("perih")? * RADEG,
        }),
        None => {
            let node = required("anode")?;
            let perih = required("perih")?;
            let aorl = required("aorl")?;
            let daily_motion = elements.number("dm")?;
            // with `dm`, perih is the longitude of perihelion and aorl the mean longitude
            let (periapsis, anomaly) = match daily_motion {
                Some(_) => (perih - node, aorl - perih),
                None => (perih, aorl),
            };
            ElementSet::Keplerian(KeplerianElements {
                reference_epoch: epoch,
                semi_major_axis: required("aorq")?,
                eccentricity: required("e")?,
                inclination: required("orbinc")? * RADEG,
                ascending_node_longitude: node * RADEG,
                periapsis_argument: periapsis * RADEG,
                mean_anomaly: anomaly * RADEG,
                daily_motion: daily_motion.map(|dm| dm * RADEG),
            })
        }
    };
    set.validate()?;
    Ok(set)
}
