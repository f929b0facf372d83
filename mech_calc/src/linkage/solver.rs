//! Linkage pose calculations
//!
//! The linkage closes a loop A-S-B-C-A: the base bar A-S is fixed, the
//! roseta S-B is driven by the servo, and the coupling rod B-C forces the
//! surface bar A-C to follow. Solving a pose means finding the surface angle
//! theta at which the rod exactly spans from the roseta tip to the surface
//! tip.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::trace;
use nalgebra::{Rotation3, Vector2, Vector3};
use serde::Serialize;

// Internal
use super::{
    LinkageError, LinkageParams, MAX_SOLVER_ITERS, NEUTRAL_THETA_DEG, ROD_RESIDUAL_TOL_MM,
};
use crate::maths::wrap_pi;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The four-bar linkage solver.
///
/// Holds the immutable linkage parameters together with the servo axis
/// position derived from them, so repeated pose solves don't repeat the
/// neutral position calculation.
#[derive(Clone, Debug)]
pub struct LinkageSolver {
    params: LinkageParams,

    /// Position of the servo axis `S` in the surface pivot frame.
    ///
    /// Units: millimetres
    servo_axis_mm: Vector2<f64>,
}

/// A fully determined pose of the linkage for one servo angle.
///
/// Recomputed fresh for every query, never mutated in place.
#[derive(Clone, Debug, Serialize)]
pub struct LinkagePose {
    /// The commanded servo angle this pose was solved for.
    ///
    /// Units: degrees
    pub phi_deg: f64,

    /// The solved surface angle.
    ///
    /// Units: degrees
    pub theta_deg: f64,

    /// Surface pivot (always the origin).
    pub a_mm: Vector3<f64>,

    /// Servo axis lifted into 3D with z = 0.
    pub s_mm: Vector3<f64>,

    /// Roseta tip. Off-plane when the tilt is non-zero.
    pub b_mm: Vector3<f64>,

    /// Surface tip, always in the XY plane.
    pub c_mm: Vector3<f64>,

    /// Residual of the rod length constraint `||C - B|| - L` at convergence.
    ///
    /// Units: millimetres
    pub rod_residual_mm: f64,

    /// Angle between the base bar A->S and the roseta S->B, projected onto
    /// the XY plane. Diagnostic only.
    ///
    /// Units: degrees, wrapped to [-180, 180]
    pub base_to_roseta_deg: f64,

    /// Angle between the roseta S->B and the rod B->C, projected onto the XY
    /// plane. Diagnostic only.
    ///
    /// Units: degrees, wrapped to [-180, 180]
    pub roseta_to_rod_deg: f64,

    /// Angle between the rod B->C and the surface bar A->C, projected onto
    /// the XY plane. Diagnostic only.
    ///
    /// Units: degrees, wrapped to [-180, 180]
    pub rod_to_surface_deg: f64,

    /// Absolute direction of the surface bar A->C in the XY plane.
    ///
    /// Units: degrees
    pub surface_angle_deg: f64,

    /// Measured bar lengths |A-S|, |S-B|, |B-C|, |A-C| of this pose.
    ///
    /// Units: millimetres
    pub bar_lengths_mm: [f64; 4],
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Compute the servo axis position `S` for the neutral pose.
///
/// In neutral the surface bar points straight down (`C = (0, -a)`) and so
/// does the roseta (`B = S + (0, -R)`), with the rod spanning `||B - C|| = L`
/// and the base `||S|| = d`. Closed form, taking the positive `Sx` root: the
/// servo axis is assumed to sit in front of the surface pivot.
pub fn neutral_axis_position(params: &LinkageParams) -> Result<Vector2<f64>, LinkageError> {
    let d = params.pivot_dist_mm;
    let r = params.roseta_radius_mm;
    let l = params.rod_length_mm;
    let a = params.surface_length_mm;

    let sy = (l.powi(2) - d.powi(2) - (a - r).powi(2)) / (2.0 * (a - r));

    let disc = d.powi(2) - sy.powi(2);
    if disc < 0.0 {
        return Err(LinkageError::GeometricInfeasible(disc));
    }

    Ok(Vector2::new(disc.sqrt(), sy))
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl LinkageSolver {
    /// Build a solver from the given parameters.
    ///
    /// Validates the parameters and solves the neutral servo axis position,
    /// so an infeasible configuration is rejected here rather than at the
    /// first pose query.
    pub fn new(params: LinkageParams) -> Result<Self, LinkageError> {
        params.validate()?;

        let servo_axis_mm = neutral_axis_position(&params)?;

        Ok(Self {
            params,
            servo_axis_mm,
        })
    }

    /// The linkage parameters this solver was built from.
    pub fn params(&self) -> &LinkageParams {
        &self.params
    }

    /// Position of the servo axis `S`.
    ///
    /// Units: millimetres
    pub fn servo_axis_mm(&self) -> Vector2<f64> {
        self.servo_axis_mm
    }

    /// Solve the linkage pose for the given servo angle, seeding the
    /// iteration from the neutral surface angle.
    pub fn solve_pose(&self, phi_deg: f64) -> Result<LinkagePose, LinkageError> {
        self.solve_pose_seeded(phi_deg, NEUTRAL_THETA_DEG.to_radians())
    }

    /// Solve the linkage pose for the given servo angle, seeding the
    /// iteration from a caller-supplied surface angle.
    ///
    /// The rod length constraint generically has two roots (elbow-up and
    /// elbow-down). The Newton iteration converges to the root nearest the
    /// seed, so callers sweeping the servo angle should seed each solve from
    /// the previous solution to stay on one branch. This seed-nearest
    /// behaviour is the reproducibility contract of the solver.
    pub fn solve_pose_seeded(
        &self,
        phi_deg: f64,
        seed_theta_rad: f64,
    ) -> Result<LinkagePose, LinkageError> {
        let r = self.params.roseta_radius_mm;
        let l = self.params.rod_length_mm;
        let a = self.params.surface_length_mm;

        let s_mm = Vector3::new(self.servo_axis_mm[0], self.servo_axis_mm[1], 0.0);

        // Roseta tip direction in the servo's own rotation plane. The -90
        // degree offset encodes the reference orientation in which phi = 0 is
        // the neutral pose with the roseta pointing down.
        let roseta_rad = (phi_deg - 90.0).to_radians();
        let v = Vector3::new(roseta_rad.cos(), roseta_rad.sin(), 0.0);

        // Tilt the rotation plane about the global X axis
        let tilt = Rotation3::from_axis_angle(&Vector3::x_axis(), self.params.tilt_deg.to_radians());
        let b_mm = s_mm + r * (tilt * v);

        // Newton iteration on f(theta) = ||C(theta) - B|| - L. The analytic
        // derivative is ((C - B) . C'(theta)) / ||C - B||.
        let mut theta = seed_theta_rad;
        let mut converged = false;
        let mut residual = f64::MAX;

        for iter in 0..MAX_SOLVER_ITERS {
            let c = Vector3::new(a * theta.cos(), a * theta.sin(), 0.0);
            let diff = c - b_mm;
            let dist = diff.norm();

            if dist < 1e-12 {
                return Err(LinkageError::DegenerateGeometry);
            }

            residual = dist - l;

            trace!(
                "pose solve iter {}: theta = {:.9} rad, residual = {:.3e} mm",
                iter,
                theta,
                residual
            );

            if residual.abs() < ROD_RESIDUAL_TOL_MM {
                converged = true;
                break;
            }

            let c_dot = Vector3::new(-a * theta.sin(), a * theta.cos(), 0.0);
            let deriv = diff.dot(&c_dot) / dist;

            if deriv.abs() < 1e-12 {
                // Stationary point of the residual, Newton cannot proceed
                return Err(LinkageError::NoConvergence {
                    iters: iter,
                    residual_mm: residual,
                });
            }

            theta -= residual / deriv;
        }

        if !converged {
            return Err(LinkageError::NoConvergence {
                iters: MAX_SOLVER_ITERS,
                residual_mm: residual,
            });
        }

        let a_mm: Vector3<f64> = Vector3::zeros();
        let c_mm = Vector3::new(a * theta.cos(), a * theta.sin(), 0.0);

        // Joint angles between bar directions, projected onto the XY plane
        let dir_as = (s_mm[1] - a_mm[1]).atan2(s_mm[0] - a_mm[0]);
        let dir_sb = (b_mm[1] - s_mm[1]).atan2(b_mm[0] - s_mm[0]);
        let dir_bc = (c_mm[1] - b_mm[1]).atan2(c_mm[0] - b_mm[0]);
        let dir_ac = (c_mm[1] - a_mm[1]).atan2(c_mm[0] - a_mm[0]);

        Ok(LinkagePose {
            phi_deg,
            theta_deg: theta.to_degrees(),
            a_mm,
            s_mm,
            b_mm,
            c_mm,
            rod_residual_mm: residual,
            base_to_roseta_deg: wrap_pi(dir_sb - dir_as).to_degrees(),
            roseta_to_rod_deg: wrap_pi(dir_bc - dir_sb).to_degrees(),
            rod_to_surface_deg: wrap_pi(dir_ac - dir_bc).to_degrees(),
            surface_angle_deg: dir_ac.to_degrees(),
            bar_lengths_mm: [
                (s_mm - a_mm).norm(),
                (b_mm - s_mm).norm(),
                (c_mm - b_mm).norm(),
                (c_mm - a_mm).norm(),
            ],
        })
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    /// Reference geometry of the aileron bench, dimensions in millimetres.
    fn bench_params(tilt_deg: f64) -> LinkageParams {
        LinkageParams {
            pivot_dist_mm: 69.32,
            roseta_radius_mm: 19.00,
            rod_length_mm: 68.31,
            surface_length_mm: 42.33,
            tilt_deg,
            phi_min_deg: -35.0,
            phi_max_deg: 40.29,
        }
    }

    #[test]
    fn test_neutral_round_trip() {
        // With no tilt the neutral pose used to place the servo axis must be
        // reproduced exactly by the general pose solver at phi = 0.
        let solver = LinkageSolver::new(bench_params(0.0)).unwrap();
        let pose = solver.solve_pose(0.0).unwrap();

        assert!((pose.theta_deg - NEUTRAL_THETA_DEG).abs() < 1e-6);
        assert!(pose.c_mm[0].abs() < 1e-4);
        assert!((pose.c_mm[1] + 42.33).abs() < 1e-4);
        assert!(pose.rod_residual_mm.abs() < ROD_RESIDUAL_TOL_MM);
    }

    #[test]
    fn test_rod_length_invariant() {
        let solver = LinkageSolver::new(bench_params(15.0)).unwrap();

        let mut phi = solver.params().phi_min_deg;
        let mut seed = NEUTRAL_THETA_DEG.to_radians();

        while phi <= solver.params().phi_max_deg {
            let pose = solver.solve_pose_seeded(phi, seed).unwrap();

            let rod_len = (pose.c_mm - pose.b_mm).norm();
            assert!(
                (rod_len - 68.31).abs() < ROD_RESIDUAL_TOL_MM,
                "rod length {} violated at phi = {}",
                rod_len,
                phi
            );

            seed = pose.theta_deg.to_radians();
            phi += 1.0;
        }
    }

    #[test]
    fn test_tilted_neutral_scenario() {
        // Concrete bench scenario with a 15 degree tilt
        let solver = LinkageSolver::new(bench_params(15.0)).unwrap();
        let pose = solver.solve_pose(0.0).unwrap();

        assert!(pose.rod_residual_mm.abs() < ROD_RESIDUAL_TOL_MM);

        // C must lie on the surface circle at the solved theta
        let theta = pose.theta_deg.to_radians();
        assert!((pose.c_mm[0] - 42.33 * theta.cos()).abs() < 1e-4);
        assert!((pose.c_mm[1] - 42.33 * theta.sin()).abs() < 1e-4);
        assert!(pose.c_mm[2].abs() < 1e-12);
    }

    #[test]
    fn test_branch_determinism() {
        // Two solves with the same seed must land on the same branch
        let solver = LinkageSolver::new(bench_params(15.0)).unwrap();

        let first = solver.solve_pose(20.0).unwrap();
        let second = solver.solve_pose(20.0).unwrap();

        assert_eq!(first.theta_deg, second.theta_deg);
    }

    #[test]
    fn test_infeasible_config_rejected() {
        // Pivots far apart with a short rod have no neutral solution
        let mut params = bench_params(0.0);
        params.pivot_dist_mm = 10.0;
        params.rod_length_mm = 200.0;

        match LinkageSolver::new(params) {
            Err(LinkageError::GeometricInfeasible(_)) => (),
            other => panic!("expected GeometricInfeasible, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut params = bench_params(0.0);
        params.roseta_radius_mm = -1.0;

        match LinkageSolver::new(params) {
            Err(LinkageError::InvalidConfiguration(_)) => (),
            other => panic!("expected InvalidConfiguration, got {:?}", other.err()),
        }
    }
}
