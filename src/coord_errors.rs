use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoordError {
    #[error("Unrecognized coordinate specification: {0}")]
    UnrecognizedSpecification(String),

    #[error("Insufficient arguments: {0}")]
    InsufficientArguments(String),

    #[error("Malformed angle: {0}")]
    MalformedAngle(String),

    #[error("Unknown coordinate frame: {0}")]
    UnknownFrame(String),

    #[error("Unknown solar system body: {0}")]
    UnknownPlanet(String),

    #[error("Invalid orbital elements: {0}")]
    InvalidElements(String),

    #[error("A telescope is required to compute {0}")]
    TelescopeRequired(&'static str),

    #[error("Type mismatch for argument '{key}': expected {expected}")]
    TypeMismatch { key: String, expected: &'static str },

    #[error("Kepler equation did not converge (e = {eccentricity}, M = {mean_anomaly})")]
    KeplerNoConvergence {
        eccentricity: f64,
        mean_anomaly: f64,
    },

    #[error("Invalid time: {0}")]
    InvalidTime(#[from] hifitime::HifitimeError),

    #[error("Invalid argument set: {0}")]
    InvalidConfig(#[from] serde_json::Error),
}

impl PartialEq for CoordError {
    fn eq(&self, other: &Self) -> bool {
        use CoordError::*;
        match (self, other) {
            (UnrecognizedSpecification(a), UnrecognizedSpecification(b)) => a == b,
            (InsufficientArguments(a), InsufficientArguments(b)) => a == b,
            (MalformedAngle(a), MalformedAngle(b)) => a == b,
            (UnknownFrame(a), UnknownFrame(b)) => a == b,
            (UnknownPlanet(a), UnknownPlanet(b)) => a == b,
            (InvalidElements(a), InvalidElements(b)) => a == b,
            (TelescopeRequired(a), TelescopeRequired(b)) => a == b,
            (
                TypeMismatch {
                    key: k1,
                    expected: e1,
                },
                TypeMismatch {
                    key: k2,
                    expected: e2,
                },
            ) => k1 == k2 && e1 == e2,
            (
                KeplerNoConvergence {
                    eccentricity: e1,
                    mean_anomaly: m1,
                },
                KeplerNoConvergence {
                    eccentricity: e2,
                    mean_anomaly: m2,
                },
            ) => e1 == e2 && m1 == m2,

            // Wrapped foreign errors: equal when the variant matches
            (InvalidTime(_), InvalidTime(_)) => true,
            (InvalidConfig(_), InvalidConfig(_)) => true,

            _ => false,
        }
    }
}

/// Shorthand result type for fallible coordinate operations.
pub type CoordResult<T> = Result<T, CoordError>;
