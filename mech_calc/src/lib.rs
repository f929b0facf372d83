//! # Mechanism calculation library
//!
//! Kinematics and load-transmission solvers for servo-driven mechanisms:
//!
//! - [`linkage`] - four-bar linkage connecting a servo roseta to a control
//!   surface through a rigid coupling rod, with an optional out-of-plane tilt
//!   of the servo's rotation plane.
//! - [`tension`] - servo arm loaded through a cord, a linear spring and a
//!   second cord anchored to a wall.
//! - [`weight`] - servo arm raising a hanging mass through a cord.
//! - [`sweep`] - drives a load model over an angle range to build the
//!   torque-vs-angle curve used for bound checking against a servo's maximum
//!   torque.
//!
//! All solvers are pure functions of (parameters, angle). Parameters are
//! loaded from TOML files with [`params::load`] and are never mutated after
//! construction, so a single parameter set may be shared across many solver
//! calls.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod convert;
pub mod linkage;
pub mod maths;
pub mod params;
pub mod sweep;
pub mod tension;
pub mod weight;
