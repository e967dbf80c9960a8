//! inference::toys — toy Monte Carlo distributions of the test statistic.
//!
//! Purpose
//! -------
//! Build the sampling distribution of `chi2` under a hypothesis by fitting
//! many simulated datasets, and read thresholds off it (Neyman
//! construction). The asymptotic χ² quantile is provided as the reference
//! the toy threshold is compared with.
//!
//! Key behaviors
//! -------------
//! - Toy `i` uses a `ChaCha8Rng` seeded with `seed + i`, so ensembles are
//!   reproducible and independent of the thread count.
//! - Each toy works on a clone of the prototype likelihood: simulate at the
//!   truth, fit the global maximum from the truth, evaluate `chi2` at the
//!   tested point.
//! - A toy whose simulation or fit fails is logged at `warn` and counted in
//!   [`ToyEnsemble::n_failed`]; the ensemble fails only if every toy does.
//!
//! Conventions
//! -----------
//! - Quantiles interpolate linearly between order statistics.
use crate::inference::errors::{InferenceError, InferenceResult};
use crate::likelihood::{
    errors::LikelihoodResult, profiled::ProfiledLikelihood, traits::LikelihoodModel,
};
use crate::model::inputs::ParamMap;
use crate::parallel::{ParallelOptions, compute_many};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use statrs::distribution::{ChiSquared, Continuous, ContinuousCDF};

/// Newton refinements applied to the statrs χ² quantile.
const QUANTILE_NEWTON_STEPS: usize = 8;

/// Test statistics of the successful toys, in toy order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToyEnsemble {
    pub chi2: Vec<f64>,
    pub n_failed: usize,
}

/// What one toy fits.
#[derive(Debug, Clone, PartialEq)]
pub struct ToyPlan {
    /// Parameters the toys are simulated at; also the global fit guess.
    pub truth: ParamMap,
    /// Parameters held fixed for the tested hypothesis.
    pub poi: ParamMap,
    /// Nuisance parameters profiled at the tested hypothesis.
    pub nuisance_guess: ParamMap,
}

/// Run `n_toys` toys from clones of `prototype`.
///
/// # Errors
/// - [`InferenceError::AllToysFailed`] when no toy succeeds.
/// - [`InferenceError::ThreadPool`] if the pool cannot be built.
pub fn toy_chi2_ensemble<L>(
    prototype: &ProfiledLikelihood<L>, plan: &ToyPlan, n_toys: usize, seed: u64,
    opts: &ParallelOptions,
) -> InferenceResult<ToyEnsemble>
where
    L: LikelihoodModel + Clone,
{
    let ids: Vec<u64> = (0..n_toys as u64).collect();
    let outcomes = compute_many(&ids, opts, |&i| {
        Ok(match run_toy(prototype, plan, seed.wrapping_add(i)) {
            Ok(chi2) => Some(chi2),
            Err(e) => {
                log::warn!("toy {i} failed: {e}");
                None
            }
        })
    })?;

    let chi2: Vec<f64> = outcomes.iter().flatten().copied().collect();
    let n_failed = n_toys - chi2.len();
    if chi2.is_empty() && n_toys > 0 {
        return Err(InferenceError::AllToysFailed { n_toys });
    }
    Ok(ToyEnsemble { chi2, n_failed })
}

fn run_toy<L>(prototype: &ProfiledLikelihood<L>, plan: &ToyPlan, seed: u64) -> LikelihoodResult<f64>
where
    L: LikelihoodModel + Clone,
{
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut llh = prototype.clone();
    llh.set_data_from_toymc(&plan.truth, &mut rng)?;
    llh.set_max_loglikelihood(&plan.truth)?;
    llh.chi2(&plan.poi, &plan.nuisance_guess)
}

/// Empirical `confidence` quantile of `samples`.
///
/// # Errors
/// - [`InferenceError::InvalidConfidence`] outside `(0, 1)`.
/// - [`InferenceError::EmptySample`] for an empty slice.
pub fn critical_value(samples: &[f64], confidence: f64) -> InferenceResult<f64> {
    check_confidence(confidence)?;
    if samples.is_empty() {
        return Err(InferenceError::EmptySample);
    }
    let mut sorted = samples.to_vec();
    sorted.sort_by(f64::total_cmp);
    let pos = confidence * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    Ok(sorted[lo] + (pos - lo as f64) * (sorted[hi] - sorted[lo]))
}

/// `confidence` quantile of a χ² distribution with `dof` degrees of
/// freedom (Wilks).
///
/// The statrs inverse CDF stops at about `1e-5` relative accuracy; a few
/// Newton steps on `cdf(x) = confidence` bring it to double precision.
pub fn asymptotic_critical_value(dof: f64, confidence: f64) -> InferenceResult<f64> {
    check_confidence(confidence)?;
    let dist = ChiSquared::new(dof).map_err(|_| InferenceError::InvalidDof { dof })?;
    let mut x = dist.inverse_cdf(confidence);
    for _ in 0..QUANTILE_NEWTON_STEPS {
        let density = dist.pdf(x);
        if !(density.is_finite() && density > 0.0) {
            break;
        }
        let step = (dist.cdf(x) - confidence) / density;
        // Stay inside the support.
        let next = if x - step > 0.0 { x - step } else { 0.5 * x };
        let done = (next - x).abs() <= 1e-15 * x;
        x = next;
        if done {
            break;
        }
    }
    Ok(x)
}

fn check_confidence(confidence: f64) -> InferenceResult<()> {
    if confidence > 0.0 && confidence < 1.0 {
        Ok(())
    } else {
        Err(InferenceError::InvalidConfidence { value: confidence })
    }
}
