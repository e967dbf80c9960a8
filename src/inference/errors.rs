//! Unified error handling for inference routines.
//!
//! This module defines `InferenceError`, the error type used by standard
//! errors, parameter scans, toy ensembles and critical values. It wraps the
//! likelihood and optimizer layers and adds the failures specific to
//! ensembles (empty samples, invalid confidence levels, thread pools). An
//! alias `InferenceResult<T>` standardizes the return type across inference
//! code.
use crate::likelihood::errors::LikelihoodError;
use crate::optimization::errors::OptError;

/// Unified error type for inference routines.
#[derive(Debug, Clone, PartialEq)]
pub enum InferenceError {
    // ---- Layers ----
    Likelihood(LikelihoodError),
    Optimization(OptError),

    // ---- Scans ----
    /// Scan grid that is empty or not finite.
    InvalidGrid {
        reason: String,
    },

    // ---- Ensembles ----
    /// Confidence level outside `(0, 1)`.
    InvalidConfidence {
        value: f64,
    },

    /// Chi-square degrees of freedom must be positive.
    InvalidDof {
        dof: f64,
    },

    /// Quantile requested from an empty sample.
    EmptySample,

    /// Every toy of an ensemble failed.
    AllToysFailed {
        n_toys: usize,
    },

    /// Worker pool could not be created.
    ThreadPool {
        text: String,
    },

    // ---- Anyhow catchall ----
    Anyhow(String),
}

pub type InferenceResult<T> = Result<T, InferenceError>;

impl std::error::Error for InferenceError {}

impl From<anyhow::Error> for InferenceError {
    fn from(err: anyhow::Error) -> Self {
        InferenceError::Anyhow(err.to_string())
    }
}

impl From<LikelihoodError> for InferenceError {
    fn from(err: LikelihoodError) -> Self {
        InferenceError::Likelihood(err)
    }
}

impl From<OptError> for InferenceError {
    fn from(err: OptError) -> Self {
        InferenceError::Optimization(err)
    }
}

impl std::fmt::Display for InferenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Layers ----
            InferenceError::Likelihood(e) => write!(f, "Inference Error: {e}"),
            InferenceError::Optimization(e) => write!(f, "Inference Error: {e}"),

            // ---- Scans ----
            InferenceError::InvalidGrid { reason } => {
                write!(f, "Inference Error: Invalid scan grid: {reason}")
            }

            // ---- Ensembles ----
            InferenceError::InvalidConfidence { value } => {
                write!(f, "Inference Error: Confidence level {value} must lie in (0, 1)")
            }
            InferenceError::InvalidDof { dof } => {
                write!(f, "Inference Error: Degrees of freedom {dof} must be positive")
            }
            InferenceError::EmptySample => {
                write!(f, "Inference Error: Cannot take a quantile of an empty sample")
            }
            InferenceError::AllToysFailed { n_toys } => {
                write!(f, "Inference Error: All {n_toys} toys failed")
            }
            InferenceError::ThreadPool { text } => {
                write!(f, "Inference Error: Could not build worker pool: {text}")
            }

            // ---- Anyhow catchall ----
            InferenceError::Anyhow(msg) => write!(f, "Inference Error: {msg}"),
        }
    }
}
