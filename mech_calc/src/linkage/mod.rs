//! Four-bar linkage solver module
//!
//! Models a servo roseta driving a control surface through a rigid coupling
//! rod. The servo's rotation plane may be tilted about the global X axis to
//! model a servo mounted at an angle to the surface's hinge plane.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;
mod solver;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use params::*;
pub use solver::*;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Convergence tolerance on the coupling rod length residual.
///
/// Units: same length unit as the linkage parameters (millimetres)
pub const ROD_RESIDUAL_TOL_MM: f64 = 1e-6;

/// Maximum number of Newton iterations before the pose solve is abandoned.
pub const MAX_SOLVER_ITERS: usize = 50;

/// Surface angle of the neutral pose, in which the surface bar and the
/// roseta both point straight down.
///
/// Units: degrees
pub const NEUTRAL_THETA_DEG: f64 = -90.0;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur while solving the linkage.
#[derive(Debug, thiserror::Error)]
pub enum LinkageError {
    #[error(
        "The linkage is geometrically infeasible: d^2 - Sy^2 = {0} is \
         negative, so no neutral servo axis position exists"
    )]
    GeometricInfeasible(f64),

    #[error(
        "The pose solver did not converge after {iters} iterations \
         (rod residual {residual_mm} mm)"
    )]
    NoConvergence { iters: usize, residual_mm: f64 },

    #[error("The surface tip coincides with the roseta tip, pose is degenerate")]
    DegenerateGeometry,

    #[error("Invalid linkage configuration: {0}")]
    InvalidConfiguration(String),
}
