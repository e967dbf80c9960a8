//! optimization — MLE stack with a minimizer fallback chain and unified errors.
//!
//! Purpose
//! -------
//! Provide the optimization layer used to profile likelihoods: an
//! Argmin-backed log-likelihood maximizer, a derivative-free simplex
//! fallback, and a single error/result surface. Callers implement a
//! log-likelihood over an unconstrained parameter vector, choose
//! tolerances, and obtain fitted parameters and diagnostics without
//! touching backend solver details.
//!
//! Key behaviors
//! -------------
//! - Expose a high-level API for **maximizing log-likelihoods** `ℓ(θ)`
//!   (`loglik_optimizer`), including configuration of solvers and stopping
//!   criteria.
//! - Chain minimizers (`Method::Sequence`): L-BFGS with finite-difference
//!   gradients first, Nelder–Mead second, failing only when every method
//!   fails.
//! - Normalize configuration issues, numerical failures, and backend solver
//!   errors into a single enum (`errors::OptError`) with a common result
//!   alias (`OptResult<T>`).
//!
//! Invariants & assumptions
//! ------------------------
//! - Optimizers operate in an unconstrained parameter space `θ`; soft
//!   bounds are the responsibility of the log-likelihood (see
//!   `likelihood::bounds`).
//! - Log-likelihood implementations treat domain violations as recoverable
//!   errors surfaced through the optimization layer, never panics.
//!
//! Conventions
//! -----------
//! - All solvers conceptually maximize a log-likelihood `ℓ(θ)` by minimizing
//!   an internal cost `c(θ) = -ℓ(θ)`; user-facing APIs and outcomes are
//!   expressed in terms of `ℓ`.
//! - Parameters, gradients, and Hessians are represented using `ndarray`
//!   aliases (`Theta`, `Grad`, `Hessian`).
//! - Public optimization entrypoints that can fail return `OptResult<T>`;
//!   callers never see raw Argmin errors.
//! - Fallbacks between methods are reported through the `log` facade at
//!   `warn` level; nothing else in this module logs.
//!
//! Testing notes
//! -------------
//! - Unit tests in the submodules cover solver wiring, tolerance handling,
//!   the fallback chain, and finite-difference helpers on toy objectives.
//! - Integration tests exercise the optimizer through full profiled
//!   likelihood fits.

pub mod errors;
pub mod loglik_optimizer;

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use aptinf::optimization::prelude::*;
//
// to import the main optimization surface in a single line.

pub mod prelude {
    pub use super::errors::{OptError, OptResult};
    pub use super::loglik_optimizer::prelude::*;
}
