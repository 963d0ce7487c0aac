pub mod astrometry;
pub mod constants;
pub mod conversion;
pub mod coord_errors;
pub mod coordinates;
pub mod earth_orientation;
pub mod factory;
pub mod kepler;
pub mod observability;
pub mod observers;
pub mod orbit_type;
pub mod planets;
pub mod ref_system;
pub mod target;
pub mod time;

pub use astrometry::{AstrometryEngine, StandardEngine};
pub use conversion::{AngleFormat, AngleUnits, AngleValue};
pub use coord_errors::{CoordError, CoordResult};
pub use coordinates::CoordinateVariant;
pub use factory::CoordArgs;
pub use observability::Observability;
pub use observers::{LimitWindow, Observatory, Telescope};
pub use target::{context::ObservingContext, CoordinateTarget};
