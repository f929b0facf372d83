//! Tension load model calculations

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::debug;
use nalgebra::Vector2;
use serde::Serialize;

// Internal
use super::{TensionError, TensionParams};
use crate::convert::{newton_to_kgf, nm_to_kgfcm};
use crate::maths::angle_between;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The cord/spring/cord load model.
#[derive(Clone, Debug)]
pub struct TensionModel {
    params: TensionParams,
}

/// Full force and pose state of the tension rig at one arm angle.
#[derive(Clone, Debug, Serialize)]
pub struct TensionState {
    /// The arm angle this state was evaluated at.
    ///
    /// Units: degrees
    pub theta_deg: f64,

    /// Arm tip.
    ///
    /// Units: metres
    pub a_m: Vector2<f64>,

    /// Far end of the first cord (where the spring starts).
    ///
    /// Units: metres
    pub b_m: Vector2<f64>,

    /// Far end of the stretched spring.
    ///
    /// Units: metres
    pub c_m: Vector2<f64>,

    /// Wall anchor.
    ///
    /// Units: metres
    pub anchor_m: Vector2<f64>,

    /// Distance from the arm tip to the anchor.
    ///
    /// Units: metres
    pub dist_m: f64,

    /// Spring extension beyond the slack length. Never negative.
    ///
    /// Units: metres
    pub delta_m: f64,

    /// Cable tension `k * delta + external_offset_n`.
    ///
    /// A large negative offset can make this negative; the model preserves
    /// that rather than clamping, leaving the interpretation to the caller.
    ///
    /// Units: newtons
    pub tension_n: f64,

    /// Cable tension in scale-reading units.
    ///
    /// Units: kilogram-force
    pub tension_kgf: f64,

    /// Tension component along the cable frame X, `T * sin(gamma)`.
    /// Diagnostic only.
    ///
    /// Units: newtons
    pub fx_real_n: f64,

    /// Tension component along the cable frame Y, `T * cos(gamma)`.
    /// Diagnostic only.
    ///
    /// Units: newtons
    pub fy_real_n: f64,

    /// Magnitude of the cable force component perpendicular to the arm,
    /// the part that does work against the servo.
    ///
    /// Units: newtons
    pub perp_force_n: f64,

    /// Unit direction of the reaction to the perpendicular force component,
    /// for overlaying force arrows. Zero when the perpendicular force
    /// vanishes.
    pub perp_dir: Vector2<f64>,

    /// Shaft torque the servo must supply to hold this angle.
    ///
    /// Units: newton-metres
    pub torque_nm: f64,

    /// Shaft torque in servo datasheet units.
    ///
    /// Units: kilogram-force centimetres
    pub torque_kgfcm: f64,

    /// Angle between the cable and the arm extended through the axis,
    /// `pi - zeta`.
    ///
    /// Units: radians
    pub gamma_rad: f64,

    /// Angle between the second cord C->D and the vertical.
    ///
    /// Units: radians
    pub beta_rad: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl TensionModel {
    /// Build the model from the given parameters, rejecting unphysical ones.
    pub fn new(params: TensionParams) -> Result<Self, TensionError> {
        params.validate()?;

        Ok(Self { params })
    }

    /// The parameters this model was built from.
    pub fn params(&self) -> &TensionParams {
        &self.params
    }

    /// Evaluate the rig state at the given arm angle.
    ///
    /// Closed form: the arm tip `A` and the anchor `D` fix the cable line,
    /// the spring extension follows from the distance along it, and the
    /// tension is resolved against the arm to obtain the shaft torque.
    pub fn evaluate(&self, theta_deg: f64) -> Result<TensionState, TensionError> {
        let r = self.params.arm_radius_m;
        let theta = theta_deg.to_radians();

        // Arm tip and anchor
        let a_m = Vector2::new(r * theta.cos(), r * theta.sin());
        let anchor_m = Vector2::new(self.params.wall_dist_m, self.params.anchor_y_m);

        let ad = anchor_m - a_m;
        let dist_m = ad.norm();

        if dist_m < 1e-12 {
            return Err(TensionError::DegenerateGeometry);
        }

        let u_rope = ad / dist_m;

        // Spring extension starts once the chain is taut
        let delta_m = (dist_m - self.params.slack_len_m()).max(0.0);
        let tension_n = self.params.spring_rate_npm * delta_m + self.params.external_offset_n;
        let tension_kgf = newton_to_kgf(tension_n);

        // Angle between the cable and the tip-to-axis vector. `zeta` drives
        // the torque, `gamma` is its supplement used for the cable frame
        // force components.
        let ao = -a_m;
        let zeta_rad = angle_between(&ad, &ao).ok_or(TensionError::DegenerateGeometry)?;
        let gamma_rad = std::f64::consts::PI - zeta_rad;

        let fx_real_n = tension_n * gamma_rad.sin();
        let fy_real_n = tension_n * gamma_rad.cos();

        // Only the component perpendicular to the arm produces torque
        let f_servo_n = tension_n * zeta_rad.sin();
        let torque_nm = r * f_servo_n;
        let torque_kgfcm = nm_to_kgfcm(torque_nm);

        // Perpendicular force decomposition, for arrow overlays
        let u_arm = a_m / r;
        let f_total = tension_n * u_rope;
        let f_perp = f_total - u_arm * f_total.dot(&u_arm);
        let perp_force_n = f_perp.norm();
        let perp_dir = if perp_force_n > 1e-9 {
            -f_perp / perp_force_n
        } else {
            Vector2::zeros()
        };

        // Cord endpoints, pose only
        let b_m = a_m + self.params.cord_1_len_m * u_rope;
        let c_m = b_m + (self.params.spring_free_len_m + delta_m) * u_rope;

        // Angle of the second cord to the vertical
        let beta_rad = angle_between(&Vector2::new(0.0, 1.0), &(anchor_m - c_m)).unwrap_or(0.0);

        debug!(
            "tension eval: theta = {:.2} deg, dist = {:.4} m, delta = {:.4} m, \
             T = {:.3} N, tau = {:.4} Nm",
            theta_deg, dist_m, delta_m, tension_n, torque_nm
        );

        Ok(TensionState {
            theta_deg,
            a_m,
            b_m,
            c_m,
            anchor_m,
            dist_m,
            delta_m,
            tension_n,
            tension_kgf,
            fx_real_n,
            fy_real_n,
            perp_force_n,
            perp_dir,
            torque_nm,
            torque_kgfcm,
            gamma_rad,
            beta_rad,
        })
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    /// Reference geometry of the spring bench, dimensions in metres.
    fn bench_params() -> TensionParams {
        TensionParams {
            arm_radius_m: 0.02,
            wall_dist_m: 0.42,
            anchor_y_m: 0.035,
            spring_rate_npm: 1167.0,
            spring_free_len_m: 0.05,
            cord_1_len_m: 0.36,
            cord_2_len_m: 0.001,
            external_offset_n: 0.0,
            tau_max_kgfcm: 20.0,
        }
    }

    #[test]
    fn test_slack_chain_carries_no_tension() {
        // At theta = 0 the tip-to-anchor distance (~0.4015 m) is below the
        // slack length (0.411 m), so the spring is not engaged
        let model = TensionModel::new(bench_params()).unwrap();
        let state = model.evaluate(0.0).unwrap();

        assert!(state.dist_m < model.params().slack_len_m());
        assert_eq!(state.delta_m, 0.0);
        assert_eq!(state.tension_n, 0.0);
        assert_eq!(state.torque_nm, 0.0);
    }

    #[test]
    fn test_taut_chain_tension_is_spring_law() {
        let model = TensionModel::new(bench_params()).unwrap();
        let state = model.evaluate(90.0).unwrap();

        let expected_dist = (0.42f64.powi(2) + 0.015f64.powi(2)).sqrt();
        assert!((state.dist_m - expected_dist).abs() < 1e-12);

        // Taut: delta > 0 and T = k * delta exactly (no offset)
        let expected_delta = expected_dist - 0.411;
        assert!(expected_delta > 0.0);
        assert!((state.delta_m - expected_delta).abs() < 1e-12);
        assert!((state.tension_n - 1167.0 * expected_delta).abs() < 1e-9);
        assert!((state.tension_kgf - state.tension_n * 0.101971621).abs() < 1e-12);

        // Torque equals arm radius times the perpendicular force component
        assert!((state.torque_nm - 0.02 * state.perp_force_n).abs() < 1e-9);
        assert!((state.torque_kgfcm - state.torque_nm / 0.0980665).abs() < 1e-9);
    }

    #[test]
    fn test_tension_non_negative_without_offset() {
        let model = TensionModel::new(bench_params()).unwrap();

        for angle in 0..=180 {
            let state = model.evaluate(angle as f64).unwrap();
            assert!(
                state.tension_n >= 0.0,
                "negative tension {} at {} deg",
                state.tension_n,
                angle
            );
        }
    }

    #[test]
    fn test_extension_monotonic_in_distance() {
        // Increasing the tip-to-anchor distance never decreases the spring
        // extension, and vice versa
        let model = TensionModel::new(bench_params()).unwrap();

        let mut prev = model.evaluate(0.0).unwrap();
        for angle in 1..=180 {
            let state = model.evaluate(angle as f64).unwrap();
            if state.dist_m >= prev.dist_m {
                assert!(state.delta_m >= prev.delta_m);
            } else {
                assert!(state.delta_m <= prev.delta_m);
            }
            prev = state;
        }
    }

    #[test]
    fn test_negative_offset_preserved() {
        // The external offset is applied verbatim, a slack chain with a
        // negative offset reads as negative tension
        let mut params = bench_params();
        params.external_offset_n = -5.0;

        let model = TensionModel::new(params).unwrap();
        let state = model.evaluate(0.0).unwrap();

        assert_eq!(state.tension_n, -5.0);
    }

    #[test]
    fn test_degenerate_anchor_on_tip() {
        let mut params = bench_params();
        params.arm_radius_m = 0.1;
        params.wall_dist_m = 0.1;
        params.anchor_y_m = 0.0;

        let model = TensionModel::new(params).unwrap();
        match model.evaluate(0.0) {
            Err(TensionError::DegenerateGeometry) => (),
            other => panic!("expected DegenerateGeometry, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_invalid_spring_rate_rejected() {
        let mut params = bench_params();
        params.spring_rate_npm = 0.0;

        match TensionModel::new(params) {
            Err(TensionError::InvalidConfiguration(_)) => (),
            other => panic!("expected InvalidConfiguration, got {:?}", other.err()),
        }
    }
}
