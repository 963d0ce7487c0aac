use crate::constants::Radian;
use crate::conversion::{normalize_positive, normalize_signed_pi};
use crate::coord_errors::{CoordError, CoordResult};

/// A position fixed relative to the local horizon or to the local meridian.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HorizonPosition {
    /// Azimuth (from North through East) and elevation.
    AzEl { az: Radian, el: Radian },
    /// Hour angle and declination; needs a telescope to be placed on the sky.
    HaDec { ha: Radian, dec: Radian },
}

impl HorizonPosition {
    /// Azimuth/elevation position; azimuth is wrapped to [0, 2π).
    pub fn az_el(az: Radian, el: Radian) -> CoordResult<Self> {
        check_finite(az, el)?;
        check_latitude_like(el, "elevation")?;
        Ok(HorizonPosition::AzEl {
            az: normalize_positive(az),
            el,
        })
    }

    /// Hour-angle/declination position; hour angle is wrapped to (−π, π].
    pub fn ha_dec(ha: Radian, dec: Radian) -> CoordResult<Self> {
        check_finite(ha, dec)?;
        check_latitude_like(dec, "declination")?;
        Ok(HorizonPosition::HaDec {
            ha: normalize_signed_pi(ha),
            dec,
        })
    }

    pub fn label(&self) -> &'static str {
        match self {
            HorizonPosition::AzEl { .. } => "AZEL",
            HorizonPosition::HaDec { .. } => "HADEC",
        }
    }

    /// The two stored angles, in declaration order.
    pub fn angles(&self) -> (Radian, Radian) {
        match *self {
            HorizonPosition::AzEl { az, el } => (az, el),
            HorizonPosition::HaDec { ha, dec } => (ha, dec),
        }
    }
}

fn check_finite(a: Radian, b: Radian) -> CoordResult<()> {
    if a.is_finite() && b.is_finite() {
        Ok(())
    } else {
        Err(CoordError::MalformedAngle(format!(
            "non-finite horizon position ({a}, {b})"
        )))
    }
}

fn check_latitude_like(angle: Radian, what: &str) -> CoordResult<()> {
    if angle.abs() > std::f64::consts::FRAC_PI_2 + 1e-12 {
        return Err(CoordError::MalformedAngle(format!(
            "{what} {angle} rad outside [-pi/2, pi/2]"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod horizon_test {
    use super::*;
    use crate::constants::RADEG;
    use approx::assert_relative_eq;

    #[test]
    fn test_wrapping() {
        let p = HorizonPosition::az_el(-15.0 * RADEG, 45.0 * RADEG).unwrap();
        let (az, el) = p.angles();
        assert_relative_eq!(az, 345.0 * RADEG, epsilon = 1e-12);
        assert_relative_eq!(el, 45.0 * RADEG);
        assert_eq!(p.label(), "AZEL");

        let p = HorizonPosition::ha_dec(350.0 * RADEG, 0.1).unwrap();
        assert_relative_eq!(p.angles().0, -10.0 * RADEG, epsilon = 1e-12);
        assert_eq!(p.label(), "HADEC");
    }

    #[test]
    fn test_invalid() {
        assert!(HorizonPosition::az_el(0.0, 2.0).is_err());
        assert!(HorizonPosition::ha_dec(f64::INFINITY, 0.0).is_err());
    }
}
