//! Parameters structure for the tension load model

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

use super::TensionError;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the cord/spring/cord load model.
///
/// The servo axis sits at the origin, the wall anchor at
/// `(wall_dist_m, anchor_y_m)`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct TensionParams {
    // ---- GEOMETRY ----
    /// Length of the servo arm from the axis to the tip `A`.
    ///
    /// Units: metres
    pub arm_radius_m: f64,

    /// Horizontal distance from the servo axis to the wall anchor `D`.
    ///
    /// Units: metres
    pub wall_dist_m: f64,

    /// Height of the wall anchor `D`.
    ///
    /// Units: metres
    pub anchor_y_m: f64,

    // ---- ELASTICITY ----
    /// Spring rate of the elastic element.
    ///
    /// Units: newtons/metre
    pub spring_rate_npm: f64,

    /// Free (unstretched) length of the spring.
    ///
    /// Units: metres
    pub spring_free_len_m: f64,

    /// Length of the first cord, from the arm tip `A` to the spring.
    ///
    /// Units: metres
    pub cord_1_len_m: f64,

    /// Length of the second cord, from the spring to the anchor `D`.
    ///
    /// Units: metres
    pub cord_2_len_m: f64,

    // ---- LOAD ----
    /// Extra tension added to the spring force, e.g. a load cell reading.
    /// May be negative.
    ///
    /// Units: newtons
    pub external_offset_n: f64,

    // ---- CAPABILITIES ----
    /// Reference torque limit of the servo under test.
    ///
    /// Units: kilogram-force centimetres
    pub tau_max_kgfcm: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl TensionParams {
    /// Check that the geometry and the spring are physical.
    pub fn validate(&self) -> Result<(), TensionError> {
        if self.arm_radius_m <= 0.0 {
            return Err(TensionError::InvalidConfiguration(format!(
                "arm_radius_m must be positive, got {}",
                self.arm_radius_m
            )));
        }
        if self.spring_rate_npm <= 0.0 {
            return Err(TensionError::InvalidConfiguration(format!(
                "spring_rate_npm must be positive, got {}",
                self.spring_rate_npm
            )));
        }
        for (name, len) in &[
            ("spring_free_len_m", self.spring_free_len_m),
            ("cord_1_len_m", self.cord_1_len_m),
            ("cord_2_len_m", self.cord_2_len_m),
        ] {
            if *len < 0.0 {
                return Err(TensionError::InvalidConfiguration(format!(
                    "{} must not be negative, got {}",
                    name, len
                )));
            }
        }

        Ok(())
    }

    /// Total unstretched length of the cord-spring-cord chain.
    ///
    /// Units: metres
    pub fn slack_len_m(&self) -> f64 {
        self.cord_1_len_m + self.spring_free_len_m + self.cord_2_len_m
    }
}
