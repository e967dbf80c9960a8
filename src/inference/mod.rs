//! inference — uncertainties, scans and toy ensembles on top of profiled
//! likelihoods.
//!
//! Purpose
//! -------
//! Turn a fitted [`ProfiledLikelihood`](crate::likelihood::ProfiledLikelihood)
//! into statements about its parameters: standard errors at the best fit,
//! `chi2` curves over a parameter of interest, and thresholds for those
//! curves from toy Monte Carlo or from Wilks' theorem.
//!
//! Key behaviors
//! -------------
//! - [`calc_standard_errors`]: eigen pseudo-inverse of the observed
//!   information from a finite-difference Hessian.
//! - [`chi2_scan`] / [`chi2_scan_with`]: profile likelihood-ratio curves.
//! - [`toy_chi2_ensemble`]: seeded, thread-count independent toy ensembles.
//! - [`critical_value`] and [`asymptotic_critical_value`]: thresholds.
//!
//! Invariants & assumptions
//! ------------------------
//! - Scans and ensembles require the wrapped likelihood to be `Sync`; every
//!   likelihood in this crate is.
//! - All routines return [`InferenceError`] on failure rather than
//!   panicking.
//!
//! Testing notes
//! -------------
//! - Unit tests use unit Gaussians (parabolic `chi2`) and Poisson counts,
//!   and compare serial with pooled runs.

pub mod errors;
pub mod hessian;
pub mod scan;
pub mod toys;

// ---- Re-exports (primary surface) -----------------------------------------

pub use self::errors::{InferenceError, InferenceResult};
pub use self::hessian::calc_standard_errors;
pub use self::scan::{ScanPoint, chi2_scan, chi2_scan_with, linear_grid};
pub use self::toys::{
    ToyEnsemble, ToyPlan, asymptotic_critical_value, critical_value, toy_chi2_ensemble,
};
