//! # Solar-system bodies
//!
//! Low-precision positions of the Sun, the Moon and the planets.
//!
//! - Planets (and the Earth–Moon barycentre) use the Keplerian mean elements of
//!   Standish (JPL, "Approximate positions of the planets"), valid 1800–2050 AD,
//!   propagated with the crate's two-body solver. Typical error: below 1 arcminute.
//! - The Moon uses the truncated geocentric series of the Astronomical Almanac
//!   (about 0.3° in longitude, 0.2° in latitude).
use std::fmt;
use std::str::FromStr;

use nalgebra::Vector3;

use crate::constants::{DAYS_PER_CENTURY, EARTH_RADIUS_KM, AU, MJD, RADEG, T2000};
use crate::coord_errors::{CoordError, CoordResult};
use crate::orbit_type::keplerian_element::KeplerianElements;
use crate::ref_system::radec_to_cartesian;

/// A named solar-system body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Planet {
    Sun,
    Mercury,
    Venus,
    Moon,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
}

impl Planet {
    pub const ALL: [Planet; 10] = [
        Planet::Sun,
        Planet::Mercury,
        Planet::Venus,
        Planet::Moon,
        Planet::Mars,
        Planet::Jupiter,
        Planet::Saturn,
        Planet::Uranus,
        Planet::Neptune,
        Planet::Pluto,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Planet::Sun => "sun",
            Planet::Mercury => "mercury",
            Planet::Venus => "venus",
            Planet::Moon => "moon",
            Planet::Mars => "mars",
            Planet::Jupiter => "jupiter",
            Planet::Saturn => "saturn",
            Planet::Uranus => "uranus",
            Planet::Neptune => "neptune",
            Planet::Pluto => "pluto",
        }
    }

    fn mean_elements(&self) -> Option<&'static MeanElements> {
        let idx = match self {
            Planet::Mercury => 0,
            Planet::Venus => 1,
            Planet::Mars => 3,
            Planet::Jupiter => 4,
            Planet::Saturn => 5,
            Planet::Uranus => 6,
            Planet::Neptune => 7,
            Planet::Pluto => 8,
            Planet::Sun | Planet::Moon => return None,
        };
        Some(&STANDISH[idx])
    }
}

impl fmt::Display for Planet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Planet {
    type Err = CoordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Planet::ALL
            .into_iter()
            .find(|p| p.name() == lower)
            .ok_or_else(|| CoordError::UnknownPlanet(s.to_string()))
    }
}

/// Mean elements at J2000 and their rates per Julian century.
///
/// Order of both arrays: `a` [AU], `e`, `I` [deg], `L` [deg], `ϖ` [deg], `Ω` [deg].
struct MeanElements {
    at_j2000: [f64; 6],
    per_century: [f64; 6],
}

#[rustfmt::skip]
const STANDISH: [MeanElements; 9] = [
    // Mercury
    MeanElements {
        at_j2000: [0.38709927, 0.20563593, 7.00497902, 252.25032350, 77.45779628, 48.33076593],
        per_century: [0.00000037, 0.00001906, -0.00594749, 149472.67411175, 0.16047689, -0.12534081],
    },
    // Venus
    MeanElements {
        at_j2000: [0.72333566, 0.00677672, 3.39467605, 181.97909950, 131.60246718, 76.67984255],
        per_century: [0.00000390, -0.00004107, -0.00078890, 58517.81538729, 0.00268329, -0.27769418],
    },
    // Earth-Moon barycentre
    MeanElements {
        at_j2000: [1.00000261, 0.01671123, -0.00001531, 100.46457166, 102.93768193, 0.0],
        per_century: [0.00000562, -0.00004392, -0.01294668, 35999.37244981, 0.32327364, 0.0],
    },
    // Mars
    MeanElements {
        at_j2000: [1.52371034, 0.09339410, 1.84969142, -4.55343205, -23.94362959, 49.55953891],
        per_century: [0.00001847, 0.00007882, -0.00813131, 19140.30268499, 0.44441088, -0.29257343],
    },
    // Jupiter
    MeanElements {
        at_j2000: [5.20288700, 0.04838624, 1.30439695, 34.39644051, 14.72847983, 100.47390909],
        per_century: [-0.00011607, -0.00013253, -0.00183714, 3034.74612775, 0.21252668, 0.20469106],
    },
    // Saturn
    MeanElements {
        at_j2000: [9.53667594, 0.05386179, 2.48599187, 49.95424423, 92.59887831, 113.66242448],
        per_century: [-0.00125060, -0.00050991, 0.00193609, 1222.49362201, -0.41897216, -0.28867794],
    },
    // Uranus
    MeanElements {
        at_j2000: [19.18916464, 0.04725744, 0.77263783, 313.23810451, 170.95427630, 74.01692503],
        per_century: [-0.00196176, -0.00004397, -0.00242939, 428.48202785, 0.40805281, 0.04240589],
    },
    // Neptune
    MeanElements {
        at_j2000: [30.06992276, 0.00859048, 1.77004347, -55.12002969, 44.96476227, 131.78422574],
        per_century: [0.00026291, 0.00005105, 0.00035372, 218.45945325, -0.32241464, -0.00508664],
    },
    // Pluto
    MeanElements {
        at_j2000: [39.48211675, 0.24882730, 17.14001206, 238.92903833, 224.06891629, 110.30393684],
        per_century: [-0.00031596, 0.00005170, 0.00004818, 145.20780515, -0.04062942, -0.01183482],
    },
];

const EARTH_MOON_BARYCENTRE: usize = 2;

impl MeanElements {
    /// Osculating-like Keplerian elements at `tjm`, with the mean anomaly at that epoch.
    fn at(&self, tjm: MJD) -> KeplerianElements {
        let t = (tjm - T2000) / DAYS_PER_CENTURY;
        let el: [f64; 6] = std::array::from_fn(|i| self.at_j2000[i] + self.per_century[i] * t);
        let [a, e, incl, mean_longitude, long_peri, node] = el;

        KeplerianElements {
            reference_epoch: tjm,
            semi_major_axis: a,
            eccentricity: e,
            inclination: incl * RADEG,
            ascending_node_longitude: node * RADEG,
            periapsis_argument: (long_peri - node) * RADEG,
            mean_anomaly: (mean_longitude - long_peri) * RADEG,
            daily_motion: None,
        }
    }
}

/// Heliocentric position of a planet, mean ecliptic J2000, AU.
///
/// The Sun is at the origin. The Moon has no heliocentric mean elements and yields
/// [`CoordError::UnknownPlanet`]; use [`moon_geocentric_of_date`] instead.
pub fn heliocentric_ecliptic(planet: Planet, tjm: MJD) -> CoordResult<Vector3<f64>> {
    match planet {
        Planet::Sun => Ok(Vector3::zeros()),
        Planet::Moon => Err(CoordError::UnknownPlanet(
            "moon has no heliocentric mean elements".into(),
        )),
        _ => match planet.mean_elements() {
            Some(elements) => elements.at(tjm).position_at(tjm),
            None => Err(CoordError::UnknownPlanet(planet.to_string())),
        },
    }
}

/// Heliocentric position of the Earth–Moon barycentre, mean ecliptic J2000, AU.
pub fn earth_heliocentric_ecliptic(tjm: MJD) -> CoordResult<Vector3<f64>> {
    STANDISH[EARTH_MOON_BARYCENTRE].at(tjm).position_at(tjm)
}

/// Geocentric position of the Moon, mean ecliptic and equinox **of date**, AU.
///
/// Formula
/// -------
/// Six terms in longitude, four in latitude and in horizontal parallax π, with the
/// distance recovered as `r = R⊕ / sin π`.
pub fn moon_geocentric_of_date(tjm: MJD) -> Vector3<f64> {
    let t = (tjm - T2000) / DAYS_PER_CENTURY;
    let s = |a: f64, b: f64| ((a + b * t) * RADEG).sin();
    let c = |a: f64, b: f64| ((a + b * t) * RADEG).cos();

    let longitude = 218.32 + 481_267.881 * t + 6.29 * s(135.0, 477_198.87)
        - 1.27 * s(259.3, -413_335.36)
        + 0.66 * s(235.7, 890_534.22)
        + 0.21 * s(269.9, 954_397.74)
        - 0.19 * s(357.5, 35_999.05)
        - 0.11 * s(186.5, 966_404.03);

    let latitude = 5.13 * s(93.3, 483_202.02) + 0.28 * s(228.2, 960_400.89)
        - 0.28 * s(318.3, 6_003.15)
        - 0.17 * s(217.6, -407_332.21);

    let parallax = 0.9508
        + 0.0518 * c(135.0, 477_198.87)
        + 0.0095 * c(259.3, -413_335.36)
        + 0.0078 * c(235.7, 890_534.22)
        + 0.0028 * c(269.9, 954_397.74);

    let distance = EARTH_RADIUS_KM / (parallax * RADEG).sin() / AU;
    distance * radec_to_cartesian(longitude * RADEG, latitude * RADEG)
}
