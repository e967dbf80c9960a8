//! inference::scan — profile likelihood-ratio scans over one parameter.
//!
//! Each grid value fixes the parameter of interest and profiles the
//! nuisance parameters from the same initial guess, so points are
//! independent and can run in parallel.
use crate::inference::errors::{InferenceError, InferenceResult};
use crate::likelihood::{profiled::ProfiledLikelihood, traits::LikelihoodModel};
use crate::model::inputs::ParamMap;
use crate::parallel::{ParallelOptions, compute_many};
use ndarray::Array1;
use serde::Serialize;

/// One point of a scan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanPoint {
    pub value: f64,
    pub chi2: f64,
    /// Profiled nuisance parameters at this point.
    pub bestfit: ParamMap,
}

/// `points` evenly spaced values from `start` to `stop`, both included.
pub fn linear_grid(start: f64, stop: f64, points: usize) -> InferenceResult<Vec<f64>> {
    if points == 0 || !start.is_finite() || !stop.is_finite() {
        return Err(InferenceError::InvalidGrid {
            reason: format!("need finite bounds and at least one point, got ({start}, {stop}, {points})"),
        });
    }
    Ok(Array1::linspace(start, stop, points).to_vec())
}

/// Serial scan; see [`chi2_scan_with`].
pub fn chi2_scan<L: LikelihoodModel>(
    llh: &ProfiledLikelihood<L>, poi: &str, grid: &[f64], nuisance_guess: &ParamMap,
) -> InferenceResult<Vec<ScanPoint>> {
    chi2_scan_with(llh, poi, grid, nuisance_guess, &ParallelOptions::default())
}

/// `chi2` at every grid value of `poi`, profiling over `nuisance_guess`.
///
/// # Errors
/// - [`InferenceError::InvalidGrid`] for an empty or non-finite grid.
/// - The first likelihood error, including
///   [`MaxLikelihoodNotSet`](crate::likelihood::errors::LikelihoodError::MaxLikelihoodNotSet).
pub fn chi2_scan_with<L: LikelihoodModel>(
    llh: &ProfiledLikelihood<L>, poi: &str, grid: &[f64], nuisance_guess: &ParamMap,
    opts: &ParallelOptions,
) -> InferenceResult<Vec<ScanPoint>> {
    if grid.is_empty() {
        return Err(InferenceError::InvalidGrid { reason: "grid is empty".to_string() });
    }
    if let Some(v) = grid.iter().find(|v| !v.is_finite()) {
        return Err(InferenceError::InvalidGrid { reason: format!("grid value {v} is not finite") });
    }

    compute_many(grid, opts, |&value| {
        let fixed = ParamMap::from([(poi.to_string(), value)]);
        let (chi2, bestfit) = llh.chi2_with_bestfit(&fixed, nuisance_guess)?;
        log::debug!("{poi} = {value}: chi2 = {chi2:.4}");
        Ok(ScanPoint { value, chi2, bestfit })
    })
}
