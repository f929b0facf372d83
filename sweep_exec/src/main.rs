//! # Torque Sweep Executable
//!
//! This executable analyses the three servo bench rigs:
//! - the four-bar aileron linkage, sweeping the servo angle between its
//!   limits and archiving the solved surface deflection curve
//! - the cord/spring/cord tension rig, archiving its torque-vs-angle curve
//! - the hanging mass rig, archiving its torque-vs-angle curve
//!
//! Each torque curve is bound-checked against the configured servo torque
//! limit. All outputs land in a timestamped session directory as CSV files.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Logging setup for the executable.
mod logger;

/// Parameters for the sweep executable.
mod params;

/// Session directory management.
mod session;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

// External
use color_eyre::{
    eyre::{eyre, WrapErr},
    Result,
};
use log::{info, warn};
use serde::Serialize;
use std::path::Path;

// Internal
use mech_calc::linkage::{LinkageSolver, NEUTRAL_THETA_DEG};
use mech_calc::sweep::{exceeds_limit, peak, SweepSampler, TorqueModel, TorqueSample};
use mech_calc::tension::TensionModel;
use mech_calc::weight::WeightModel;

use logger::{logger_init, LevelFilter};
use params::SweepExecParams;
use session::Session;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Flattened linkage pose record archived per servo angle.
#[derive(Serialize)]
struct LinkagePoseRecord {
    phi_deg: f64,
    theta_deg: f64,
    rod_residual_mm: f64,
    surface_angle_deg: f64,
    base_to_roseta_deg: f64,
    roseta_to_rod_deg: f64,
    rod_to_surface_deg: f64,
}

// ------------------------------------------------------------------------------------------------
// MAIN
// ------------------------------------------------------------------------------------------------

fn main() -> Result<()> {
    color_eyre::install()?;

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new("sweep_exec", "sessions").wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Debug, &session).wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Torque Sweep Executable\n");
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD PARAMETERS ----

    let params_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| String::from("params/sweep_exec.toml"));

    let params: SweepExecParams = mech_calc::params::load(&params_path)
        .wrap_err_with(|| format!("Failed to load parameters from {:?}", params_path))?;

    info!("Parameters loaded from {:?}", params_path);

    // ---- SWEEPS ----

    run_linkage_sweep(&params, &session)?;

    let tension =
        TensionModel::new(params.tension.clone()).wrap_err("Failed to build the tension model")?;
    run_torque_sweep(
        "tension",
        &tension,
        &params.tension_sweep,
        params.tension.tau_max_kgfcm,
        &session,
    )?;

    let weight =
        WeightModel::new(params.weight.clone()).wrap_err("Failed to build the weight model")?;
    run_torque_sweep(
        "weight",
        &weight,
        &params.weight_sweep,
        params.weight.tau_max_kgfcm,
        &session,
    )?;

    info!("Analysis complete");

    Ok(())
}

// ------------------------------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Sweep the linkage between its servo angle limits, archiving the solved
/// pose for each step.
///
/// Each solve is seeded from the previous solution so the sweep tracks a
/// single geometric branch of the mechanism.
fn run_linkage_sweep(params: &SweepExecParams, session: &Session) -> Result<()> {
    info!("---- LINKAGE SWEEP ----");

    if params.linkage_step_deg <= 0.0 {
        return Err(eyre!(
            "linkage_step_deg must be positive, got {}",
            params.linkage_step_deg
        ));
    }

    let solver =
        LinkageSolver::new(params.linkage.clone()).wrap_err("Failed to build the linkage solver")?;

    info!(
        "Servo axis position: ({:.4}, {:.4}) mm",
        solver.servo_axis_mm()[0],
        solver.servo_axis_mm()[1]
    );

    let csv_path = session.session_root.join("linkage_pose.csv");
    let mut writer =
        csv::Writer::from_path(&csv_path).wrap_err("Failed to create the linkage CSV file")?;

    let mut phi = params.linkage.phi_min_deg;
    let mut seed = NEUTRAL_THETA_DEG.to_radians();
    let mut theta_min = f64::MAX;
    let mut theta_max = f64::MIN;

    while phi <= params.linkage.phi_max_deg + 1e-9 {
        let pose = solver
            .solve_pose_seeded(phi, seed)
            .wrap_err_with(|| format!("Pose solve failed at phi = {} deg", phi))?;

        seed = pose.theta_deg.to_radians();
        theta_min = theta_min.min(pose.theta_deg);
        theta_max = theta_max.max(pose.theta_deg);

        writer
            .serialize(LinkagePoseRecord {
                phi_deg: pose.phi_deg,
                theta_deg: pose.theta_deg,
                rod_residual_mm: pose.rod_residual_mm,
                surface_angle_deg: pose.surface_angle_deg,
                base_to_roseta_deg: pose.base_to_roseta_deg,
                roseta_to_rod_deg: pose.roseta_to_rod_deg,
                rod_to_surface_deg: pose.rod_to_surface_deg,
            })
            .wrap_err("Failed to write a linkage pose record")?;

        phi += params.linkage_step_deg;
    }

    writer.flush().wrap_err("Failed to flush the linkage CSV")?;

    info!(
        "Surface angle range: {:.2} to {:.2} deg, archived to {:?}",
        theta_min, theta_max, csv_path
    );

    Ok(())
}

/// Sweep a load model over its angle domain, archive the curve and bound
/// check it against the servo's torque limit.
fn run_torque_sweep<M: TorqueModel>(
    name: &str,
    model: &M,
    sampler: &SweepSampler,
    tau_max_kgfcm: f64,
    session: &Session,
) -> Result<()> {
    info!("---- {} SWEEP ----", name.to_uppercase());

    let samples = sampler
        .sample(model)
        .wrap_err_with(|| format!("Failed to sweep the {} model", name))?;

    let csv_path = session.session_root.join(format!("{}_torque.csv", name));
    write_curve(&csv_path, &samples)
        .wrap_err_with(|| format!("Failed to archive the {} curve", name))?;

    if let Some(p) = peak(&samples) {
        info!(
            "Peak torque: {:.3} kgf cm at {:.1} deg ({} samples archived to {:?})",
            p.torque_kgfcm,
            p.angle_deg,
            samples.len(),
            csv_path
        );
    }

    if exceeds_limit(&samples, tau_max_kgfcm) {
        warn!(
            "The {} curve exceeds the servo torque limit of {:.2} kgf cm",
            name, tau_max_kgfcm
        );
    } else {
        info!(
            "The {} curve stays within the servo torque limit of {:.2} kgf cm",
            name, tau_max_kgfcm
        );
    }

    Ok(())
}

/// Archive a torque curve as CSV.
fn write_curve(path: &Path, samples: &[TorqueSample]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;

    for sample in samples {
        writer.serialize(sample)?;
    }

    writer.flush()?;

    Ok(())
}
