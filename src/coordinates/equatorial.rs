use std::f64::consts::FRAC_PI_2;

use log::debug;

use crate::constants::Radian;
use crate::conversion::normalize_positive;
use crate::coord_errors::{CoordError, CoordResult};
use crate::ref_system::{j2000_to_galactic, SkyFrame};

/// A fixed sky position, held as FK5 J2000.
///
/// The frame and coordinates originally supplied are kept for reporting; every
/// computation uses `ra2000`/`dec2000`.
#[derive(Debug, Clone, PartialEq)]
pub struct Equatorial {
    ra2000: Radian,
    dec2000: Radian,
    frame: SkyFrame,
    input: (Radian, Radian),
}

impl Equatorial {
    /// Build from a longitude-like and a latitude-like angle in `frame`.
    ///
    /// Errors
    /// ------
    /// * [`CoordError::MalformedAngle`] if an angle is not finite or the latitude lies
    ///   outside [−π/2, π/2].
    pub fn new(frame: SkyFrame, lon: Radian, lat: Radian) -> CoordResult<Self> {
        if !lon.is_finite() || !lat.is_finite() {
            return Err(CoordError::MalformedAngle(format!(
                "non-finite position ({lon}, {lat})"
            )));
        }
        if lat.abs() > FRAC_PI_2 + 1e-12 {
            return Err(CoordError::MalformedAngle(format!(
                "latitude {lat} rad outside [-pi/2, pi/2]"
            )));
        }
        let lat = lat.clamp(-FRAC_PI_2, FRAC_PI_2);

        let (ra2000, dec2000) = match frame {
            SkyFrame::J2000 => (normalize_positive(lon), lat),
            _ => frame.to_j2000(lon, lat),
        };
        debug!("fixed position in {frame}: J2000 ({ra2000:.9}, {dec2000:.9}) rad");

        Ok(Equatorial {
            ra2000,
            dec2000,
            frame,
            input: (lon, lat),
        })
    }

    /// Shorthand for an FK5 J2000 position.
    pub fn j2000(ra: Radian, dec: Radian) -> CoordResult<Self> {
        Self::new(SkyFrame::J2000, ra, dec)
    }

    pub fn ra2000(&self) -> Radian {
        self.ra2000
    }

    pub fn dec2000(&self) -> Radian {
        self.dec2000
    }

    /// Frame in which the position was supplied.
    pub fn frame(&self) -> SkyFrame {
        self.frame
    }

    /// Coordinates as supplied, in the input frame.
    pub fn input(&self) -> (Radian, Radian) {
        self.input
    }

    /// Galactic longitude and latitude.
    pub fn galactic(&self) -> (Radian, Radian) {
        j2000_to_galactic(self.ra2000, self.dec2000)
    }
}
