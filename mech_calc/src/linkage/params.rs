//! Parameters structure for the linkage solver

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

use super::LinkageError;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the four-bar linkage.
///
/// Point names used throughout the solver:
/// - `A`: surface pivot, fixed at the origin
/// - `S`: servo axis, fixed per configuration
/// - `B`: roseta tip, moves with the servo angle phi
/// - `C`: surface tip, moves with the surface angle theta
#[derive(Clone, Debug, Default, Deserialize)]
pub struct LinkageParams {
    // ---- GEOMETRY ----
    /// Distance between the surface pivot `A` and the servo axis `S`.
    ///
    /// Units: millimetres
    pub pivot_dist_mm: f64,

    /// Length (radius) of the servo roseta, `|S - B|`.
    ///
    /// Units: millimetres
    pub roseta_radius_mm: f64,

    /// Length of the rigid coupling rod, `|B - C|`.
    ///
    /// Units: millimetres
    pub rod_length_mm: f64,

    /// Length of the surface bar from the pivot `A` to the tip `C`.
    ///
    /// Units: millimetres
    pub surface_length_mm: f64,

    /// Tilt of the servo's rotation plane about the global X axis.
    ///
    /// Units: degrees
    pub tilt_deg: f64,

    // ---- CAPABILITIES ----
    /// Lowest servo angle the servo can be commanded to.
    ///
    /// Units: degrees
    pub phi_min_deg: f64,

    /// Highest servo angle the servo can be commanded to.
    ///
    /// Units: degrees
    pub phi_max_deg: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl LinkageParams {
    /// Check that all lengths are physical.
    ///
    /// The neutral position solve additionally requires `a != R`, as the
    /// servo axis height is undefined when the roseta and the surface bar
    /// have the same length.
    pub fn validate(&self) -> Result<(), LinkageError> {
        if self.pivot_dist_mm <= 0.0 {
            return Err(LinkageError::InvalidConfiguration(format!(
                "pivot_dist_mm must be positive, got {}",
                self.pivot_dist_mm
            )));
        }
        if self.roseta_radius_mm <= 0.0 {
            return Err(LinkageError::InvalidConfiguration(format!(
                "roseta_radius_mm must be positive, got {}",
                self.roseta_radius_mm
            )));
        }
        if self.rod_length_mm <= 0.0 {
            return Err(LinkageError::InvalidConfiguration(format!(
                "rod_length_mm must be positive, got {}",
                self.rod_length_mm
            )));
        }
        if self.surface_length_mm <= 0.0 {
            return Err(LinkageError::InvalidConfiguration(format!(
                "surface_length_mm must be positive, got {}",
                self.surface_length_mm
            )));
        }
        if (self.surface_length_mm - self.roseta_radius_mm).abs() < 1e-9 {
            return Err(LinkageError::InvalidConfiguration(format!(
                "surface_length_mm and roseta_radius_mm must differ, both are {}",
                self.surface_length_mm
            )));
        }
        if self.phi_max_deg < self.phi_min_deg {
            return Err(LinkageError::InvalidConfiguration(format!(
                "phi_max_deg ({}) is below phi_min_deg ({})",
                self.phi_max_deg, self.phi_min_deg
            )));
        }

        Ok(())
    }
}
