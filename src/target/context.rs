use std::fmt;
use std::sync::Arc;

use hifitime::Epoch;

use crate::astrometry::AstrometryEngine;
use crate::constants::Radian;
use crate::coord_errors::CoordResult;
use crate::observers::Telescope;
use crate::time::{epoch_from_calendar, HasCalendarFields};

/// Reference time and (optional) telescope against which a target is evaluated.
///
/// Both fields may be replaced at any time. Nothing derived from them is cached.
#[derive(Clone)]
pub struct ObservingContext {
    epoch: Epoch,
    telescope: Option<Arc<dyn Telescope>>,
}

impl ObservingContext {
    /// Context at a given instant, without a telescope.
    pub fn new(epoch: Epoch) -> Self {
        ObservingContext {
            epoch,
            telescope: None,
        }
    }

    /// Context at the current wall-clock instant.
    ///
    /// This is the only place where the crate reads the system clock; callers opting into
    /// it take the snapshot explicitly.
    pub fn now() -> CoordResult<Self> {
        Ok(Self::new(Epoch::now()?))
    }

    /// Context at the instant described by calendar fields (UTC).
    pub fn from_calendar<T: HasCalendarFields + ?Sized>(date: &T) -> CoordResult<Self> {
        Ok(Self::new(epoch_from_calendar(date)?))
    }

    pub fn with_telescope(mut self, telescope: Arc<dyn Telescope>) -> Self {
        self.telescope = Some(telescope);
        self
    }

    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    pub fn set_epoch(&mut self, epoch: Epoch) {
        self.epoch = epoch;
    }

    pub fn telescope(&self) -> Option<&Arc<dyn Telescope>> {
        self.telescope.as_ref()
    }

    pub fn set_telescope(&mut self, telescope: Arc<dyn Telescope>) {
        self.telescope = Some(telescope);
    }

    pub fn clear_telescope(&mut self) {
        self.telescope = None;
    }

    /// Telescope latitude, or 0 without a telescope.
    pub fn latitude(&self) -> Radian {
        self.telescope.as_ref().map_or(0.0, |t| t.latitude())
    }

    /// Telescope longitude (east positive), or 0 without a telescope.
    pub fn longitude(&self) -> Radian {
        self.telescope.as_ref().map_or(0.0, |t| t.longitude())
    }

    /// Local apparent sidereal time at the context's site and epoch.
    pub fn local_sidereal_time(&self, engine: &dyn AstrometryEngine) -> Radian {
        engine.local_sidereal_time(&self.epoch, self.longitude())
    }
}

impl fmt::Debug for ObservingContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservingContext")
            .field("epoch", &self.epoch)
            .field(
                "telescope",
                &self.telescope.as_ref().map(|t| t.display_name()),
            )
            .finish()
    }
}

#[cfg(test)]
mod context_test {
    use super::*;
    use crate::astrometry::StandardEngine;
    use crate::constants::RADEG;
    use crate::observers::Observatory;
    use crate::time::CalendarDate;
    use approx::assert_relative_eq;

    #[test]
    fn test_defaults_without_telescope() {
        let ctx = ObservingContext::new(Epoch::from_gregorian_utc_at_midnight(2022, 3, 1));
        assert!(ctx.telescope().is_none());
        assert_eq!(ctx.latitude(), 0.0);
        assert_eq!(ctx.longitude(), 0.0);
    }

    #[test]
    fn test_replace_fields() {
        let start = Epoch::from_gregorian_utc_at_midnight(2022, 3, 1);
        let site = Arc::new(Observatory::from_degrees("Paranal", -70.4045, -24.6272, 2635.0).unwrap());
        let mut ctx = ObservingContext::new(start).with_telescope(site);
        assert_relative_eq!(ctx.latitude(), -24.6272 * RADEG, epsilon = 1e-15);

        let engine = StandardEngine::new();
        let lst_before = ctx.local_sidereal_time(&engine);
        ctx.set_epoch(Epoch::from_gregorian_utc_hms(2022, 3, 1, 6, 0, 0));
        assert!(ctx.local_sidereal_time(&engine) != lst_before);

        ctx.clear_telescope();
        assert_eq!(ctx.latitude(), 0.0);
        assert!(format!("{ctx:?}").contains("telescope: None"));
    }

    #[test]
    fn test_from_calendar() {
        let date: CalendarDate = "2022 03 01.25".parse().unwrap();
        let ctx = ObservingContext::from_calendar(&date).unwrap();
        assert_eq!(ctx.epoch(), Epoch::from_gregorian_utc_hms(2022, 3, 1, 6, 0, 0));
    }
}
