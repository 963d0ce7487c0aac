//! # Coordinate targets
//!
//! [`CoordinateTarget`] is the outward-facing object of the crate. It owns one
//! [`CoordinateVariant`], one [`ObservingContext`] (time + optional telescope), an
//! optional name and a shared [`AstrometryEngine`].
//!
//! Every accessor recomputes from the current context; nothing is cached, so
//! [`CoordinateTarget::set_time`] or [`CoordinateTarget::set_telescope`] take effect on the
//! next call.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use hifitime::Epoch;
//! use obscoords::conversion::AngleFormat;
//! use obscoords::factory::CoordArgs;
//! use obscoords::observers::{LimitWindow, Observatory};
//! use obscoords::target::{context::ObservingContext, CoordinateTarget};
//!
//! let site = Observatory::from_degrees("Mauna Kea", -155.4681, 19.8253, 4205.0)
//!     .unwrap()
//!     .with_limits(LimitWindow::AzEl { el_min: 0.1, el_max: 1.5 });
//! let context = ObservingContext::new(Epoch::from_gregorian_utc_hms(2024, 1, 10, 8, 0, 0))
//!     .with_telescope(Arc::new(site));
//!
//! let args = CoordArgs::new()
//!     .with("type", "J2000")
//!     .with("ra", "05:35:17.3")
//!     .with("dec", "-05:23:28")
//!     .with("name", "M42");
//! let target = CoordinateTarget::from_args(&args, context).unwrap();
//!
//! let el = target.elevation(AngleFormat::Degrees).unwrap();
//! println!("{} is at {el} deg ({})", target.name().unwrap_or("?"), target.observability().unwrap());
//! ```
use std::fmt;
use std::sync::Arc;

use hifitime::{Epoch, TimeScale};
use log::warn;

use crate::astrometry::{AstrometryEngine, StandardEngine};
use crate::constants::Radian;
use crate::conversion::{from_radians, AngleFormat, AngleScale, AngleValue};
use crate::coord_errors::{CoordError, CoordResult};
use crate::coordinates::{CoordinateVariant, HorizonPosition, SummaryField, SUMMARY_LEN};
use crate::factory::{build_variant, CoordArgs};
use crate::observability::{check, Observability, Pointing};
use crate::observers::Telescope;
use crate::ref_system::j2000_to_galactic;
use crate::time::{epoch_from_calendar, HasCalendarFields};

pub mod context;

use context::ObservingContext;

/// A target position evaluated against an observing context.
#[derive(Clone)]
pub struct CoordinateTarget {
    variant: CoordinateVariant,
    context: ObservingContext,
    name: Option<String>,
    engine: Arc<dyn AstrometryEngine>,
}

impl CoordinateTarget {
    /// Wrap a variant, using the built-in [`StandardEngine`].
    pub fn new(variant: CoordinateVariant, context: ObservingContext) -> Self {
        CoordinateTarget {
            variant,
            context,
            name: None,
            engine: Arc::new(StandardEngine::new()),
        }
    }

    /// Build a target from an argument set (see [`crate::factory`]); the `name` key,
    /// if any, becomes the target name.
    pub fn from_args(args: &CoordArgs, context: ObservingContext) -> CoordResult<Self> {
        let variant = build_variant(args)?;
        Ok(Self::new(variant, context).with_name_opt(args.name()?))
    }

    /// Replace the astrometry engine.
    pub fn with_engine(mut self, engine: Arc<dyn AstrometryEngine>) -> Self {
        self.engine = engine;
        self
    }

    pub fn with_name(self, name: impl Into<String>) -> Self {
        self.with_name_opt(Some(name.into()))
    }

    fn with_name_opt(mut self, name: Option<String>) -> Self {
        self.name = name;
        self
    }

    pub fn variant(&self) -> &CoordinateVariant {
        &self.variant
    }

    pub fn context(&self) -> &ObservingContext {
        &self.context
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    pub fn epoch(&self) -> Epoch {
        self.context.epoch()
    }

    pub fn set_time(&mut self, epoch: Epoch) {
        self.context.set_epoch(epoch);
    }

    /// Set the reference time from anything exposing calendar fields (UTC).
    pub fn set_time_from<T: HasCalendarFields + ?Sized>(&mut self, date: &T) -> CoordResult<()> {
        self.context.set_epoch(epoch_from_calendar(date)?);
        Ok(())
    }

    pub fn telescope(&self) -> Option<&Arc<dyn Telescope>> {
        self.context.telescope()
    }

    pub fn set_telescope(&mut self, telescope: Arc<dyn Telescope>) {
        self.context.set_telescope(telescope);
    }

    pub fn clear_telescope(&mut self) {
        self.context.clear_telescope();
    }

    pub fn type_label(&self) -> String {
        self.variant.type_label()
    }

    // ---------------------------------------------------------------------------------------------
    // Radian-valued derivations
    // ---------------------------------------------------------------------------------------------

    fn apparent(&self) -> CoordResult<(Radian, Radian)> {
        self.variant
            .apparent_position(&self.context, self.engine.as_ref())
    }

    fn lst(&self) -> Radian {
        self.context.local_sidereal_time(self.engine.as_ref())
    }

    /// Latitude to project with; an HA/Dec position has no meaning without a site.
    fn site_latitude(&self) -> CoordResult<Radian> {
        match (&self.variant, self.context.telescope()) {
            (CoordinateVariant::FixedHorizon(HorizonPosition::HaDec { .. }), None) => Err(
                CoordError::TelescopeRequired("the horizon position of an HA/Dec position"),
            ),
            _ => Ok(self.context.latitude()),
        }
    }

    fn hour_angle_dec_radians(&self) -> CoordResult<(Radian, Radian)> {
        match &self.variant {
            CoordinateVariant::FixedHorizon(HorizonPosition::HaDec { ha, dec }) => Ok((*ha, *dec)),
            CoordinateVariant::Calibration => Ok((0.0, self.context.latitude())),
            _ => {
                let (ra, dec) = self.apparent()?;
                Ok((self.engine.normalize_to_signed_pi(self.lst() - ra), dec))
            }
        }
    }

    fn az_el_radians(&self) -> CoordResult<(Radian, Radian)> {
        match &self.variant {
            CoordinateVariant::FixedHorizon(HorizonPosition::AzEl { az, el }) => Ok((*az, *el)),
            CoordinateVariant::Calibration => Ok((0.0, std::f64::consts::FRAC_PI_2)),
            _ => {
                let lat = self.site_latitude()?;
                let (ha, dec) = self.hour_angle_dec_radians()?;
                Ok(self.engine.equatorial_to_horizon(ha, dec, lat))
            }
        }
    }

    fn parallactic_angle_radians(&self) -> CoordResult<Radian> {
        let lat = self.site_latitude()?;
        let (ha, dec) = self.hour_angle_dec_radians()?;
        Ok(self.engine.parallactic_angle(ha, dec, lat))
    }

    // ---------------------------------------------------------------------------------------------
    // Formatted accessors
    // ---------------------------------------------------------------------------------------------

    /// Apparent right ascension (true equator and equinox of date), hour-like.
    pub fn apparent_ra(&self, format: AngleFormat) -> CoordResult<AngleValue> {
        let (ra, _) = self.apparent()?;
        Ok(from_radians(ra, format, AngleScale::Hours))
    }

    /// Apparent declination. An HA/Dec position reports its stored declination.
    pub fn apparent_dec(&self, format: AngleFormat) -> CoordResult<AngleValue> {
        let dec = match &self.variant {
            CoordinateVariant::FixedHorizon(HorizonPosition::HaDec { dec, .. }) => *dec,
            _ => self.apparent()?.1,
        };
        Ok(from_radians(dec, format, AngleScale::Degrees))
    }

    /// Local apparent sidereal time at the telescope (Greenwich without one).
    pub fn local_sidereal_time(&self, format: AngleFormat) -> AngleValue {
        from_radians(self.lst(), format, AngleScale::Hours)
    }

    /// Hour angle, normalized to (−π, π] before formatting.
    pub fn hour_angle(&self, format: AngleFormat) -> CoordResult<AngleValue> {
        let (ha, _) = self.hour_angle_dec_radians()?;
        Ok(from_radians(ha, format, AngleScale::Hours))
    }

    /// Azimuth from North through East, in [0, 2π).
    pub fn azimuth(&self, format: AngleFormat) -> CoordResult<AngleValue> {
        let (az, _) = self.az_el_radians()?;
        Ok(from_radians(az, format, AngleScale::Degrees))
    }

    pub fn elevation(&self, format: AngleFormat) -> CoordResult<AngleValue> {
        let (_, el) = self.az_el_radians()?;
        Ok(from_radians(el, format, AngleScale::Degrees))
    }

    /// Parallactic angle; zero at the zenith (and hence for calibration targets).
    pub fn parallactic_angle(&self, format: AngleFormat) -> CoordResult<AngleValue> {
        let pa = self.parallactic_angle_radians()?;
        Ok(from_radians(pa, format, AngleScale::Degrees))
    }

    /// Airmass as the secant of the zenith distance; `None` at or below the horizon.
    pub fn airmass(&self) -> CoordResult<Option<f64>> {
        let (_, el) = self.az_el_radians()?;
        let sin_el = el.sin();
        Ok((sin_el > 0.0).then(|| 1.0 / sin_el))
    }

    /// Angular distance between the apparent places of two targets, each taken at its own
    /// context.
    pub fn separation(&self, other: &CoordinateTarget) -> CoordResult<Radian> {
        let (ra1, dec1) = self.apparent()?;
        let (ra2, dec2) = other.apparent()?;
        let (sd1, cd1) = dec1.sin_cos();
        let (sd2, cd2) = dec2.sin_cos();
        let (sdra, cdra) = (ra2 - ra1).sin_cos();

        // Vincenty form, well conditioned at every separation
        let x = cd2 * sdra;
        let y = cd1 * sd2 - sd1 * cd2 * cdra;
        let z = sd1 * sd2 + cd1 * cd2 * cdra;
        Ok(x.hypot(y).atan2(z))
    }

    /// Catalogue position, for fixed equatorial targets.
    pub fn ra2000(&self, format: AngleFormat) -> Option<AngleValue> {
        self.variant
            .ra2000_dec2000()
            .map(|(ra, _)| from_radians(ra, format, AngleScale::Hours))
    }

    pub fn dec2000(&self, format: AngleFormat) -> Option<AngleValue> {
        self.variant
            .ra2000_dec2000()
            .map(|(_, dec)| from_radians(dec, format, AngleScale::Degrees))
    }

    /// Galactic longitude and latitude of the catalogue position, radians.
    pub fn galactic(&self) -> Option<(Radian, Radian)> {
        self.variant
            .ra2000_dec2000()
            .map(|(ra, dec)| j2000_to_galactic(ra, dec))
    }

    // ---------------------------------------------------------------------------------------------
    // Observability and summaries
    // ---------------------------------------------------------------------------------------------

    /// Observability verdict against the current telescope's limits.
    pub fn observability(&self) -> CoordResult<Observability> {
        if let CoordinateVariant::Calibration = self.variant {
            return Ok(Observability::NotApplicable);
        }
        check(self.context.telescope().map(|t| t.as_ref()), || {
            let (_, elevation) = self.az_el_radians()?;
            let (hour_angle, declination) = self.hour_angle_dec_radians()?;
            Ok(Pointing {
                elevation,
                hour_angle,
                declination,
            })
        })
    }

    /// `true` only when a telescope is set and the target lies strictly inside its limits.
    ///
    /// Derivation failures count as not observable.
    pub fn is_observable(&self) -> bool {
        match self.observability() {
            Ok(state) => state.is_observable(),
            Err(err) => {
                warn!("observability of {} could not be derived: {err}", self.label());
                false
            }
        }
    }

    /// Fixed-shape summary, see [`CoordinateVariant::summary_array`].
    pub fn summary_array(&self) -> [SummaryField; SUMMARY_LEN] {
        self.variant.summary_array()
    }

    fn label(&self) -> String {
        match &self.name {
            Some(name) => format!("{} '{name}'", self.type_label()),
            None => self.type_label(),
        }
    }

    /// Multi-line human-readable report of the target at the current context.
    pub fn status_summary(&self) -> String {
        let number = |v: CoordResult<AngleValue>, unit: &str| match v {
            Ok(AngleValue::Number(x)) => format!("{x:.4} {unit}"),
            Ok(other) => other.to_string(),
            Err(_) => "n/a".to_string(),
        };

        let mut lines = vec![format!("Coordinate type: {}", self.type_label())];
        if let Some(name) = &self.name {
            lines.push(format!("Name:            {name}"));
        }
        lines.push(format!(
            "Elevation:       {}",
            number(self.elevation(AngleFormat::Degrees), "deg")
        ));
        lines.push(format!(
            "Azimuth:         {}",
            number(self.azimuth(AngleFormat::Degrees), "deg")
        ));
        lines.push(format!(
            "Hour angle:      {}",
            number(self.hour_angle(AngleFormat::Hours), "h")
        ));
        lines.push(format!(
            "Apparent dec:    {}",
            number(self.apparent_dec(AngleFormat::Degrees), "deg")
        ));
        if let Some(telescope) = self.context.telescope() {
            lines.push(format!("Telescope:       {}", telescope.display_name()));
            let verdict = match self.observability() {
                Ok(state) => state.to_string(),
                Err(err) => format!("unknown ({err})"),
            };
            lines.push(format!("Observability:   {verdict}"));
        }
        lines.push(format!(
            "Time:            {}",
            self.context.epoch().to_time_scale(TimeScale::UTC)
        ));
        lines.join("\n")
    }
}

impl fmt::Display for CoordinateTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.status_summary())
    }
}

impl fmt::Debug for CoordinateTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoordinateTarget")
            .field("variant", &self.variant)
            .field("name", &self.name)
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod target_test {
    use super::*;
    use crate::constants::{DPI, RADEG, RADH};
    use crate::conversion::normalize_signed_pi;
    use crate::coordinates::Equatorial;
    use crate::observers::{LimitWindow, Observatory};
    use approx::assert_relative_eq;

    fn epoch() -> Epoch {
        Epoch::from_gregorian_utc_hms(2023, 6, 15, 22, 0, 0)
    }

    fn site() -> Arc<dyn Telescope> {
        Arc::new(
            Observatory::from_degrees("Roque", -17.8792, 28.7606, 2396.0)
                .unwrap()
                .with_limits(LimitWindow::AzEl {
                    el_min: 15.0 * RADEG,
                    el_max: 87.0 * RADEG,
                }),
        )
    }

    fn vega(with_site: bool) -> CoordinateTarget {
        let eq = Equatorial::j2000(279.2347 * RADEG, 38.7837 * RADEG).unwrap();
        let mut ctx = ObservingContext::new(epoch());
        if with_site {
            ctx = ctx.with_telescope(site());
        }
        CoordinateTarget::new(CoordinateVariant::FixedEquatorial(eq), ctx).with_name("Vega")
    }

    fn radians(v: AngleValue) -> f64 {
        v.as_f64().unwrap()
    }

    #[test]
    fn test_hour_angle_consistency() {
        let target = vega(true);
        let ra = radians(target.apparent_ra(AngleFormat::Radians).unwrap());
        let lst = radians(target.local_sidereal_time(AngleFormat::Radians));
        let ha = radians(target.hour_angle(AngleFormat::Radians).unwrap());
        assert!(ha > -std::f64::consts::PI && ha <= std::f64::consts::PI);
        assert_relative_eq!(normalize_signed_pi(lst - ra - ha), 0.0, epsilon = 1e-12);

        let ha_hours = radians(target.hour_angle(AngleFormat::Hours).unwrap());
        assert_relative_eq!(ha_hours * RADH, ha, epsilon = 1e-12);
    }

    /// Standard reductions, but hour angles reported in [0, 2π).
    struct PositiveHourAngles(StandardEngine);

    impl AstrometryEngine for PositiveHourAngles {
        fn apparent_from_mean(
            &self,
            ra: Radian,
            dec: Radian,
            epoch: &Epoch,
        ) -> CoordResult<(Radian, Radian)> {
            self.0.apparent_from_mean(ra, dec, epoch)
        }

        fn apparent_from_elements(
            &self,
            elements: &crate::orbit_type::ElementSet,
            epoch: &Epoch,
        ) -> CoordResult<(Radian, Radian)> {
            self.0.apparent_from_elements(elements, epoch)
        }

        fn apparent_planet(
            &self,
            planet: crate::planets::Planet,
            epoch: &Epoch,
        ) -> CoordResult<(Radian, Radian)> {
            self.0.apparent_planet(planet, epoch)
        }

        fn local_sidereal_time(&self, epoch: &Epoch, longitude: Radian) -> Radian {
            self.0.local_sidereal_time(epoch, longitude)
        }

        fn normalize_to_signed_pi(&self, angle: Radian) -> Radian {
            crate::conversion::normalize_positive(angle)
        }
    }

    #[test]
    fn test_hour_angle_uses_engine_normalization() {
        let standard = radians(vega(true).hour_angle(AngleFormat::Radians).unwrap());
        let target = vega(true).with_engine(Arc::new(PositiveHourAngles(StandardEngine::new())));
        let ha = radians(target.hour_angle(AngleFormat::Radians).unwrap());
        assert!((0.0..DPI).contains(&ha));
        assert_relative_eq!(normalize_signed_pi(ha), standard, epsilon = 1e-12);
    }

    #[test]
    fn test_airmass() {
        let target = vega(true);
        let el = radians(target.elevation(AngleFormat::Radians).unwrap());
        match target.airmass().unwrap() {
            Some(x) => {
                assert!(el > 0.0);
                assert_relative_eq!(x, 1.0 / el.sin(), epsilon = 1e-12);
            }
            None => assert!(el <= 0.0),
        }

        let below = CoordinateTarget::new(
            CoordinateVariant::FixedHorizon(HorizonPosition::az_el(0.0, -0.2).unwrap()),
            ObservingContext::new(epoch()),
        );
        assert_eq!(below.airmass().unwrap(), None);
    }

    #[test]
    fn test_hadec_needs_telescope() {
        let h = HorizonPosition::ha_dec(-0.3, 0.4).unwrap();
        let mut target = CoordinateTarget::new(
            CoordinateVariant::FixedHorizon(h),
            ObservingContext::new(epoch()),
        );
        // stored values are available without a site
        assert_eq!(radians(target.hour_angle(AngleFormat::Radians).unwrap()), -0.3);
        assert_eq!(radians(target.apparent_dec(AngleFormat::Radians).unwrap()), 0.4);
        assert!(matches!(
            target.apparent_ra(AngleFormat::Radians),
            Err(CoordError::TelescopeRequired(_))
        ));
        assert!(matches!(
            target.azimuth(AngleFormat::Radians),
            Err(CoordError::TelescopeRequired(_))
        ));
        assert!(target.status_summary().contains("n/a"));

        target.set_telescope(site());
        let el = radians(target.elevation(AngleFormat::Radians).unwrap());
        let lat = 28.7606 * RADEG;
        let expected = (lat.sin() * 0.4f64.sin() + lat.cos() * 0.4f64.cos() * 0.3f64.cos()).asin();
        assert_relative_eq!(el, expected, epsilon = 1e-12);
    }

    #[test]
    fn test_calibration_zenith() {
        let target =
            CoordinateTarget::new(CoordinateVariant::Calibration, ObservingContext::new(epoch()))
                .with_name("dark");
        assert_eq!(radians(target.azimuth(AngleFormat::Radians).unwrap()), 0.0);
        assert_relative_eq!(
            radians(target.elevation(AngleFormat::Degrees).unwrap()),
            90.0
        );
        assert_eq!(radians(target.hour_angle(AngleFormat::Radians).unwrap()), 0.0);
        assert_eq!(
            radians(target.parallactic_angle(AngleFormat::Radians).unwrap()),
            0.0
        );
        assert_relative_eq!(
            radians(target.apparent_ra(AngleFormat::Radians).unwrap()),
            radians(target.local_sidereal_time(AngleFormat::Radians))
        );
        assert_eq!(target.observability().unwrap(), Observability::NotApplicable);
        assert!(!target.is_observable());
    }

    #[test]
    fn test_observability_follows_context() {
        let mut target = vega(false);
        assert_eq!(target.observability().unwrap(), Observability::NoTelescope);
        target.set_telescope(site());

        let el = radians(target.elevation(AngleFormat::Degrees).unwrap());
        let expected = el > 15.0 && el < 87.0;
        assert_eq!(target.is_observable(), expected);

        target.clear_telescope();
        assert!(!target.is_observable());
    }

    #[test]
    fn test_separation() {
        let a = vega(false);
        assert_relative_eq!(a.separation(&a).unwrap(), 0.0, epsilon = 1e-12);

        let south = CoordinateTarget::new(
            CoordinateVariant::FixedEquatorial(Equatorial::j2000(1.0, -0.5).unwrap()),
            ObservingContext::new(epoch()),
        );
        let north = CoordinateTarget::new(
            CoordinateVariant::FixedEquatorial(Equatorial::j2000(1.0, 0.5).unwrap()),
            ObservingContext::new(epoch()),
        );
        // precession moves both points together; only differential aberration remains
        assert_relative_eq!(south.separation(&north).unwrap(), 1.0, epsilon = 5e-4);
    }

    #[test]
    fn test_status_summary() {
        let target = vega(true);
        let summary = target.to_string();
        assert!(summary.starts_with("Coordinate type: RADEC"));
        assert!(summary.contains("Name:            Vega"));
        assert!(summary.contains("Telescope:       Roque"));
        assert!(summary.contains("Observability:"));
        assert!(summary.contains("2023-06-15T22:00:00 UTC"));
        assert_eq!(summary, target.status_summary());

        let bare = vega(false).status_summary();
        assert!(!bare.contains("Telescope"));
    }

    #[test]
    fn test_set_time_changes_results() {
        let mut target = vega(true);
        let before = radians(target.azimuth(AngleFormat::Radians).unwrap());
        target.set_time(epoch() + hifitime::Unit::Hour * 2);
        let after = radians(target.azimuth(AngleFormat::Radians).unwrap());
        assert!((before - after).abs() > 1e-3);

        target
            .set_time_from(&"2023 06 15.9166666666667".parse::<crate::time::CalendarDate>().unwrap())
            .unwrap();
        assert_relative_eq!(
            radians(target.azimuth(AngleFormat::Radians).unwrap()),
            before,
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_catalogue_accessors() {
        let target = vega(false);
        assert_relative_eq!(
            radians(target.ra2000(AngleFormat::Degrees).unwrap()),
            279.2347,
            epsilon = 1e-9
        );
        assert!(target.galactic().is_some());

        let planet = CoordinateTarget::new(
            CoordinateVariant::NamedPlanet(crate::planets::Planet::Mars),
            ObservingContext::new(epoch()),
        );
        assert!(planet.ra2000(AngleFormat::Radians).is_none());
        assert!(planet.galactic().is_none());
    }
}
