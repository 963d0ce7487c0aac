#![allow(dead_code)]

use std::sync::Arc;

use approx::assert_relative_eq;
use hifitime::Epoch;
use obscoords::conversion::{AngleFormat, AngleValue};
use obscoords::observers::{LimitWindow, Observatory, Telescope};
use obscoords::target::CoordinateTarget;

pub fn reference_epoch() -> Epoch {
    Epoch::from_gregorian_utc_hms(2024, 3, 12, 23, 30, 0)
}

/// Kitt Peak, with an elevation window of 20°–85°.
pub fn kitt_peak() -> Arc<dyn Telescope> {
    Arc::new(
        Observatory::from_degrees("Kitt Peak", -111.5967, 31.9583, 2096.0)
            .unwrap()
            .with_limits(LimitWindow::AzEl {
                el_min: 20f64.to_radians(),
                el_max: 85f64.to_radians(),
            }),
    )
}

pub fn value(v: AngleValue) -> f64 {
    v.as_f64().expect("numeric angle format")
}

/// Compare two radian values to five significant figures (absolute near zero).
pub fn assert_five_figures(actual: f64, expected: f64) {
    assert_relative_eq!(actual, expected, epsilon = 1e-8, max_relative = 1e-5);
}

/// Radian accessors of a target that are defined for every variant once a telescope is set.
pub fn derived_radians(target: &CoordinateTarget) -> [f64; 6] {
    let r = AngleFormat::Radians;
    [
        value(target.azimuth(r).unwrap()),
        value(target.elevation(r).unwrap()),
        value(target.apparent_ra(r).unwrap()),
        value(target.apparent_dec(r).unwrap()),
        value(target.hour_angle(r).unwrap()),
        value(target.local_sidereal_time(r)),
    ]
}
