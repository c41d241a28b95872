use std::fmt;
use std::error::Error;

/// Represents errors that can occur while setting up or driving a simulation.
#[derive(Debug, Clone, PartialEq)]
pub enum PhysicsError {
    /// Indicates an invalid mass value (e.g., negative, zero or non-finite mass).
    InvalidMass,
    /// Indicates an invalid radius value (e.g., negative or non-finite radius).
    InvalidRadius,
    /// Indicates a non-finite position coordinate.
    InvalidPosition,
    /// Indicates a non-finite velocity component.
    InvalidVelocity,
    /// Indicates an arena or quadrant with a non-positive side length.
    InvalidArena,
    /// Indicates a Barnes-Hut opening threshold outside the accepted range.
    InvalidTheta,
    /// Indicates an invalid time value (e.g., negative or non-finite step length).
    InvalidTime,
    /// A general error for configuration values that break an invariant.
    InvalidConfiguration(String),
}

impl fmt::Display for PhysicsError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PhysicsError::InvalidMass => write!(f, "Invalid mass value: mass must be finite and positive"),
            PhysicsError::InvalidRadius => write!(f, "Invalid radius value: radius must be finite and non-negative"),
            PhysicsError::InvalidPosition => write!(f, "Invalid position value: coordinates must be finite"),
            PhysicsError::InvalidVelocity => write!(f, "Invalid velocity value: components must be finite"),
            PhysicsError::InvalidArena => write!(f, "Invalid arena: side length must be finite and positive"),
            PhysicsError::InvalidTheta => write!(f, "Invalid theta: approximation threshold must be finite and non-negative"),
            PhysicsError::InvalidTime => write!(f, "Invalid time value"),
            PhysicsError::InvalidConfiguration(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}


impl Error for PhysicsError {}
