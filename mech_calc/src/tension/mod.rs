//! Cord/spring/cord load model module
//!
//! Models a servo arm pulled towards a wall anchor through an inextensible
//! cord, a linear spring and a second cord. The spring only extends once the
//! arm-tip-to-anchor distance exceeds the total slack length of the chain, so
//! the transmitted tension depends purely on geometry.

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
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur while evaluating the tension model.
#[derive(Debug, thiserror::Error)]
pub enum TensionError {
    #[error(
        "The arm tip coincides with the wall anchor, the cable direction is \
         undefined"
    )]
    DegenerateGeometry,

    #[error("Invalid tension model configuration: {0}")]
    InvalidConfiguration(String),
}
