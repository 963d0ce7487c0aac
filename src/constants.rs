//! # Constants and type definitions for obscoords
//!
//! Physical constants, conversion factors and the angle/time aliases shared by
//! every module of the crate.
//!
//! ## Overview
//!
//! - Astronomical constants (AU, speed of light, Gaussian gravitational constant)
//! - Unit conversions (degrees ↔ radians, hours ↔ radians, arcseconds ↔ radians)
//! - Reference epochs (J2000.0, B1950.0) as Modified Julian Dates
//! - Type aliases used across the crate for self-documenting signatures

// -------------------------------------------------------------------------------------------------
// Physical constants and unit conversions
// -------------------------------------------------------------------------------------------------

/// 2π, useful for trigonometric conversions
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// Number of seconds in a Julian day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Days in a Julian century
pub const DAYS_PER_CENTURY: f64 = 36_525.0;

/// Astronomical Unit in kilometers (IAU 2012)
pub const AU: f64 = 149_597_870.7;

/// MJD epoch of J2000.0 (2000-01-01 12:00:00 TT)
pub const T2000: f64 = 51544.5;

/// MJD epoch of B1950.0 (Besselian)
pub const B1950: f64 = 33281.923_5;

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Arcseconds → radians
pub const RADSEC: f64 = std::f64::consts::PI / 648000.0;

/// Hours → radians
pub const RADH: f64 = DPI / 24.0;

/// Gaussian gravitational constant k (rad/day, AU³ solar masses)
pub const GAUSS_GRAV: f64 = 0.01720209895;

/// Speed of light in km/s
pub const VLIGHT: f64 = 2.99792458e5;

/// Speed of light in astronomical units per day
pub const VLIGHT_AU: f64 = VLIGHT / AU * SECONDS_PER_DAY;

/// Earth equatorial radius in kilometers (GRS1980/WGS84)
pub const EARTH_RADIUS_KM: f64 = 6_378.137;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle in arcseconds
pub type ArcSec = f64;
/// Angle in radians
pub type Radian = f64;
/// Angle in (decimal) hours
pub type Hour = f64;

/// Modified Julian Date (days)
pub type MJD = f64;
