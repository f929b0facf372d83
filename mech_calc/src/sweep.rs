//! Torque sweep sampling
//!
//! Drives a load model over a closed angle interval to build the
//! torque-vs-angle curve of a rig, used to bound-check a servo's maximum
//! torque before committing to a geometry.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};

// Internal
use crate::tension::{TensionError, TensionModel};
use crate::weight::{WeightError, WeightModel};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// One point of a torque-vs-angle curve.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct TorqueSample {
    /// The sampled arm angle.
    ///
    /// Units: degrees
    pub angle_deg: f64,

    /// Shaft torque at that angle.
    ///
    /// Units: kilogram-force centimetres
    pub torque_kgfcm: f64,
}

/// A sampling domain over a closed angle interval.
///
/// The lower boundary is always sampled; the upper boundary is included when
/// the span is an integer multiple of the step, otherwise the sweep stops at
/// the last in-interval sample. The sampler holds no state of its own, so the
/// same domain may be swept over any number of models.
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct SweepSampler {
    /// Lower boundary of the swept interval.
    ///
    /// Units: degrees
    pub angle_min_deg: f64,

    /// Upper boundary of the swept interval.
    ///
    /// Units: degrees
    pub angle_max_deg: f64,

    /// Angle increment between samples.
    ///
    /// Units: degrees
    pub step_deg: f64,
}

/// Lazy iterator over the samples of one sweep. Restartable by calling
/// [`SweepSampler::iter`] again.
pub struct SweepIter<'a, M: TorqueModel> {
    model: &'a M,
    sampler: SweepSampler,
    index: usize,
    num_samples: usize,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during a torque sweep.
#[derive(Debug, thiserror::Error)]
pub enum SweepError {
    #[error(transparent)]
    Tension(#[from] TensionError),

    #[error(transparent)]
    Weight(#[from] WeightError),

    #[error("Invalid sweep domain: {0}")]
    InvalidDomain(String),
}

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// A load model that can be queried for shaft torque at an arm angle.
pub trait TorqueModel {
    /// Shaft torque at the given arm angle.
    ///
    /// Units: kilogram-force centimetres
    fn torque_kgfcm(&self, angle_deg: f64) -> Result<f64, SweepError>;
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl TorqueModel for TensionModel {
    fn torque_kgfcm(&self, angle_deg: f64) -> Result<f64, SweepError> {
        Ok(self.evaluate(angle_deg)?.torque_kgfcm)
    }
}

impl TorqueModel for WeightModel {
    fn torque_kgfcm(&self, angle_deg: f64) -> Result<f64, SweepError> {
        Ok(self.evaluate(angle_deg).torque_kgfcm)
    }
}

impl SweepSampler {
    /// Check that the domain is sweepable.
    pub fn validate(&self) -> Result<(), SweepError> {
        if self.step_deg <= 0.0 {
            return Err(SweepError::InvalidDomain(format!(
                "step_deg must be positive, got {}",
                self.step_deg
            )));
        }
        if self.angle_max_deg < self.angle_min_deg {
            return Err(SweepError::InvalidDomain(format!(
                "angle_max_deg ({}) is below angle_min_deg ({})",
                self.angle_max_deg, self.angle_min_deg
            )));
        }

        Ok(())
    }

    /// Number of samples the sweep produces, lower boundary included.
    pub fn num_samples(&self) -> usize {
        // The small slack keeps the upper boundary included when floating
        // point error leaves the span just short of a multiple of the step
        let span = self.angle_max_deg - self.angle_min_deg;
        (span / self.step_deg + 1e-9).floor() as usize + 1
    }

    /// Lazily iterate over the samples of the given model.
    pub fn iter<'a, M: TorqueModel>(&self, model: &'a M) -> Result<SweepIter<'a, M>, SweepError> {
        self.validate()?;

        Ok(SweepIter {
            model,
            sampler: *self,
            index: 0,
            num_samples: self.num_samples(),
        })
    }

    /// Sweep the given model, collecting the full curve.
    pub fn sample<M: TorqueModel>(&self, model: &M) -> Result<Vec<TorqueSample>, SweepError> {
        self.iter(model)?.collect()
    }
}

impl<'a, M: TorqueModel> Iterator for SweepIter<'a, M> {
    type Item = Result<TorqueSample, SweepError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.num_samples {
            return None;
        }

        let angle_deg = self.sampler.angle_min_deg + self.index as f64 * self.sampler.step_deg;
        self.index += 1;

        Some(sample_at(self.model, angle_deg))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.num_samples - self.index;
        (left, Some(left))
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Sample the given model at a single angle, e.g. for overlaying the current
/// servo angle onto a swept curve.
pub fn sample_at<M: TorqueModel>(model: &M, angle_deg: f64) -> Result<TorqueSample, SweepError> {
    Ok(TorqueSample {
        angle_deg,
        torque_kgfcm: model.torque_kgfcm(angle_deg)?,
    })
}

/// The sample with the largest torque magnitude, or `None` for an empty
/// curve.
pub fn peak(samples: &[TorqueSample]) -> Option<TorqueSample> {
    samples.iter().copied().fold(None, |acc, s| match acc {
        Some(p) if p.torque_kgfcm.abs() >= s.torque_kgfcm.abs() => Some(p),
        _ => Some(s),
    })
}

/// True if any sample of the curve exceeds the given torque limit.
pub fn exceeds_limit(samples: &[TorqueSample], tau_max_kgfcm: f64) -> bool {
    samples.iter().any(|s| s.torque_kgfcm > tau_max_kgfcm)
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::weight::WeightParams;

    fn weight_model() -> WeightModel {
        WeightModel::new(WeightParams {
            arm_radius_m: 0.0226,
            cord_len_m: 0.10,
            mass_kg: 4.774,
            external_offset_n: 0.0,
            tau_max_kgfcm: 20.0,
        })
        .unwrap()
    }

    #[test]
    fn test_sample_count_boundary_inclusive() {
        let sampler = SweepSampler {
            angle_min_deg: -90.0,
            angle_max_deg: 90.0,
            step_deg: 1.0,
        };

        let samples = sampler.sample(&weight_model()).unwrap();
        assert_eq!(samples.len(), 181);
        assert_eq!(samples[0].angle_deg, -90.0);
        assert_eq!(samples[180].angle_deg, 90.0);
    }

    #[test]
    fn test_samples_match_direct_evaluation() {
        let sampler = SweepSampler {
            angle_min_deg: -90.0,
            angle_max_deg: 90.0,
            step_deg: 1.0,
        };
        let model = weight_model();

        for sample in sampler.sample(&model).unwrap() {
            let direct = model.evaluate(sample.angle_deg);
            assert_eq!(sample.torque_kgfcm, direct.torque_kgfcm);
        }
    }

    #[test]
    fn test_iter_restartable() {
        let sampler = SweepSampler {
            angle_min_deg: 0.0,
            angle_max_deg: 10.0,
            step_deg: 2.5,
        };
        let model = weight_model();

        let first: Vec<_> = sampler.iter(&model).unwrap().map(Result::unwrap).collect();
        let second: Vec<_> = sampler.iter(&model).unwrap().map(Result::unwrap).collect();

        assert_eq!(first.len(), 5);
        assert_eq!(first, second);
    }

    #[test]
    fn test_partial_final_step_stops_inside_interval() {
        // The span is not a multiple of the step, so the last sample falls
        // short of the upper boundary rather than overshooting it
        let sampler = SweepSampler {
            angle_min_deg: 0.0,
            angle_max_deg: 10.0,
            step_deg: 3.0,
        };

        let samples = sampler.sample(&weight_model()).unwrap();

        assert_eq!(samples.len(), 4);
        assert_eq!(samples[0].angle_deg, 0.0);
        assert_eq!(samples[3].angle_deg, 9.0);
    }

    #[test]
    fn test_peak_and_limit() {
        let sampler = SweepSampler {
            angle_min_deg: -90.0,
            angle_max_deg: 90.0,
            step_deg: 1.0,
        };

        let samples = sampler.sample(&weight_model()).unwrap();

        // The weight rig peaks with the arm horizontal
        let peak = peak(&samples).unwrap();
        assert_eq!(peak.angle_deg, 0.0);

        assert!(exceeds_limit(&samples, peak.torque_kgfcm - 1.0));
        assert!(!exceeds_limit(&samples, peak.torque_kgfcm + 1.0));
    }

    #[test]
    fn test_invalid_domain_rejected() {
        let sampler = SweepSampler {
            angle_min_deg: 10.0,
            angle_max_deg: 0.0,
            step_deg: 1.0,
        };

        match sampler.sample(&weight_model()) {
            Err(SweepError::InvalidDomain(_)) => (),
            other => panic!("expected InvalidDomain, got {:?}", other.err()),
        }
    }
}
