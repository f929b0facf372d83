//! # Sweep Executable Parameters

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::Deserialize;

use mech_calc::linkage::LinkageParams;
use mech_calc::sweep::SweepSampler;
use mech_calc::tension::TensionParams;
use mech_calc::weight::WeightParams;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Deserialize)]
pub struct SweepExecParams {
    /// Four-bar linkage geometry for the aileron rig.
    pub linkage: LinkageParams,

    /// Servo angle increment used when sweeping the linkage between its phi
    /// limits.
    ///
    /// Units: degrees
    pub linkage_step_deg: f64,

    /// Cord/spring/cord rig geometry.
    pub tension: TensionParams,

    /// Angle domain swept over the tension rig.
    pub tension_sweep: SweepSampler,

    /// Hanging mass rig geometry.
    pub weight: WeightParams,

    /// Angle domain swept over the weight rig.
    pub weight_sweep: SweepSampler,
}
