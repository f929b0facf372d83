//! Parameters structure for the weight load model

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

use super::WeightError;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the hanging mass load model.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct WeightParams {
    // ---- GEOMETRY ----
    /// Length of the servo arm from the axis to the tip `A`.
    ///
    /// Units: metres
    pub arm_radius_m: f64,

    /// Length of the cord from the arm tip down to the mass.
    ///
    /// Units: metres
    pub cord_len_m: f64,

    // ---- LOAD ----
    /// Hanging mass.
    ///
    /// Units: kilograms
    pub mass_kg: f64,

    /// Extra tension added to the weight, e.g. a load cell reading. May be
    /// negative.
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

impl WeightParams {
    /// Check that the geometry and the mass are physical.
    pub fn validate(&self) -> Result<(), WeightError> {
        if self.arm_radius_m <= 0.0 {
            return Err(WeightError::InvalidConfiguration(format!(
                "arm_radius_m must be positive, got {}",
                self.arm_radius_m
            )));
        }
        if self.cord_len_m <= 0.0 {
            return Err(WeightError::InvalidConfiguration(format!(
                "cord_len_m must be positive, got {}",
                self.cord_len_m
            )));
        }
        if self.mass_kg < 0.0 {
            return Err(WeightError::InvalidConfiguration(format!(
                "mass_kg must not be negative, got {}",
                self.mass_kg
            )));
        }

        Ok(())
    }
}
