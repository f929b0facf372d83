//! Hanging mass load model module
//!
//! Models a servo arm raising a mass hung from the arm tip by a cord. No
//! elastic element and no implicit equation: the tension is the weight of the
//! mass and the torque follows directly from the arm geometry.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod model;
mod params;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use model::*;
pub use params::*;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Standard gravitational acceleration.
///
/// Units: metres/second^2
pub const GRAVITY_MS2: f64 = 9.81;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur while evaluating the weight model.
#[derive(Debug, thiserror::Error)]
pub enum WeightError {
    #[error("Invalid weight model configuration: {0}")]
    InvalidConfiguration(String),
}
