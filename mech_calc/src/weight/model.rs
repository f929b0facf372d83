//! Weight load model calculations

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::debug;
use nalgebra::Vector2;
use serde::Serialize;

// Internal
use super::{WeightError, WeightParams, GRAVITY_MS2};
use crate::convert::{newton_to_kgf, nm_to_kgfcm};
use crate::maths::perp;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The hanging mass load model.
#[derive(Clone, Debug)]
pub struct WeightModel {
    params: WeightParams,
}

/// Force and pose state of the weight rig at one arm angle.
#[derive(Clone, Debug, Serialize)]
pub struct WeightState {
    /// The arm angle this state was evaluated at.
    ///
    /// Units: degrees
    pub theta_deg: f64,

    /// Arm tip.
    ///
    /// Units: metres
    pub a_m: Vector2<f64>,

    /// Position of the mass, hanging straight down from the arm tip.
    ///
    /// Units: metres
    pub mass_pos_m: Vector2<f64>,

    /// Cable tension `max(0, M * g + external_offset_n)`. A cord cannot
    /// push, so this is clamped at zero.
    ///
    /// Units: newtons
    pub tension_n: f64,

    /// Cable tension in scale-reading units.
    ///
    /// Units: kilogram-force
    pub tension_kgf: f64,

    /// Component of the load force along the arm. Diagnostic only.
    ///
    /// Units: newtons
    pub radial_force_n: f64,

    /// Component of the load force perpendicular to the arm, the part the
    /// servo works against. Diagnostic only.
    ///
    /// Units: newtons
    pub tangential_force_n: f64,

    /// Shaft torque the servo must supply to hold this angle.
    ///
    /// Units: newton-metres
    pub torque_nm: f64,

    /// Shaft torque in servo datasheet units.
    ///
    /// Units: kilogram-force centimetres
    pub torque_kgfcm: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl WeightModel {
    /// Build the model from the given parameters, rejecting unphysical ones.
    pub fn new(params: WeightParams) -> Result<Self, WeightError> {
        params.validate()?;

        Ok(Self { params })
    }

    /// The parameters this model was built from.
    pub fn params(&self) -> &WeightParams {
        &self.params
    }

    /// Evaluate the rig state at the given arm angle.
    ///
    /// Closed form throughout: the moment arm of the vertical load is the
    /// horizontal offset of the arm tip, `R * cos(theta)`, so there is no
    /// equation to iterate on and the evaluation cannot fail to converge.
    pub fn evaluate(&self, theta_deg: f64) -> WeightState {
        let r = self.params.arm_radius_m;
        let theta = theta_deg.to_radians();

        let a_m = Vector2::new(r * theta.cos(), r * theta.sin());
        let mass_pos_m = Vector2::new(a_m[0], a_m[1] - self.params.cord_len_m);

        let tension_n = (self.params.mass_kg * GRAVITY_MS2 + self.params.external_offset_n).max(0.0);
        let tension_kgf = newton_to_kgf(tension_n);

        let torque_nm = r * tension_n * theta.cos();
        let torque_kgfcm = nm_to_kgfcm(torque_nm);

        // Decompose the vertical load into radial/tangential components
        // relative to the arm
        let radial_dir = Vector2::new(theta.cos(), theta.sin());
        let tangential_dir = perp(&radial_dir);
        let f_load = Vector2::new(0.0, tension_n);
        let radial_force_n = f_load.dot(&radial_dir);
        let tangential_force_n = f_load.dot(&tangential_dir);

        debug!(
            "weight eval: theta = {:.2} deg, T = {:.3} N, tau = {:.4} Nm",
            theta_deg, tension_n, torque_nm
        );

        WeightState {
            theta_deg,
            a_m,
            mass_pos_m,
            tension_n,
            tension_kgf,
            radial_force_n,
            tangential_force_n,
            torque_nm,
            torque_kgfcm,
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    /// Reference geometry of the weight bench, dimensions in metres.
    fn bench_params() -> WeightParams {
        WeightParams {
            arm_radius_m: 0.0226,
            cord_len_m: 0.10,
            mass_kg: 4.774,
            external_offset_n: 0.0,
            tau_max_kgfcm: 20.0,
        }
    }

    #[test]
    fn test_tension_is_weight() {
        let model = WeightModel::new(bench_params()).unwrap();
        let state = model.evaluate(0.0);

        assert!((state.tension_n - 4.774 * GRAVITY_MS2).abs() < 1e-12);
        assert!((state.tension_kgf - state.tension_n * 0.101971621).abs() < 1e-12);

        // At theta = 0 the full weight acts tangentially
        assert!((state.torque_nm - 0.0226 * state.tension_n).abs() < 1e-12);
        assert!((state.tangential_force_n - state.tension_n).abs() < 1e-12);
        assert!(state.radial_force_n.abs() < 1e-12);
    }

    #[test]
    fn test_zero_torque_arm_vertical() {
        // Arm aligned with gravity produces no moment
        let model = WeightModel::new(bench_params()).unwrap();
        let state = model.evaluate(90.0);

        assert!(state.torque_nm.abs() < 1e-12);
    }

    #[test]
    fn test_mass_hangs_below_tip() {
        let model = WeightModel::new(bench_params()).unwrap();
        let state = model.evaluate(30.0);

        assert_eq!(state.mass_pos_m[0], state.a_m[0]);
        assert!((state.a_m[1] - state.mass_pos_m[1] - 0.10).abs() < 1e-12);
    }

    #[test]
    fn test_negative_offset_clamped() {
        // The cord cannot push, so the tension bottoms out at zero
        let mut params = bench_params();
        params.external_offset_n = -(4.774 * GRAVITY_MS2 + 1.0);

        let model = WeightModel::new(params).unwrap();
        let state = model.evaluate(45.0);

        assert_eq!(state.tension_n, 0.0);
        assert_eq!(state.torque_nm, 0.0);
    }

    #[test]
    fn test_invalid_radius_rejected() {
        let mut params = bench_params();
        params.arm_radius_m = 0.0;

        match WeightModel::new(params) {
            Err(WeightError::InvalidConfiguration(_)) => (),
            Ok(_) => panic!("expected InvalidConfiguration"),
        }
    }
}
