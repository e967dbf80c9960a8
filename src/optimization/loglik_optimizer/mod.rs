//! loglik_optimizer — MLE-friendly, argmin-powered log-likelihood optimizer.
//!
//! Purpose
//! -------
//! Provide a high-level, Argmin-backed optimization layer for **maximizing
//! log-likelihoods** `ℓ(θ)`. Callers implement a single trait,
//! [`LogLikelihood`], and invoke [`maximize`] (L-BFGS),
//! [`maximize_nelder_mead`] (simplex) or [`maximize_with`] (a chosen
//! [`Method`], including the fallback [`Method::Sequence`]).
//!
//! Key behaviors
//! -------------
//! - Convert user-supplied log-likelihoods `ℓ(θ)` into Argmin-compatible
//!   cost functions `c(θ) = -ℓ(θ)` via [`adapter::ArgMinAdapter`].
//! - Validate the initial guess with [`LogLikelihood::check`], select a
//!   solver via [`builders`], execute it via [`run`], and normalize results
//!   into an [`OptimOutcome`].
//! - Provide finite-difference helpers in [`finite_diff`] for gradients and
//!   Hessians when analytic derivatives are missing.
//! - Centralize optimizer configuration ([`Tolerances`], [`MLEOptions`],
//!   [`NelderMeadOptions`]) and validation logic ([`validation`]).
//!
//! Invariants & assumptions
//! ------------------------
//! - The optimizer **always maximizes** a log-likelihood `ℓ(θ)` by minimizing
//!   a cost `c(θ) = -ℓ(θ)`; user code implements `ℓ(θ)`, never the cost.
//! - [`LogLikelihood::value`] must treat invalid inputs as recoverable
//!   [`OptError`] values, not panics.
//! - An outcome is accepted by the fallback chain only if the solver
//!   reports convergence; iteration caps count as failure.
//!
//! Conventions
//! -----------
//! - Parameters live in an unconstrained optimizer space as [`Theta`]
//!   (`Array1<f64>`).
//! - All user-facing diagnostics (including [`OptimOutcome::value`]) are
//!   expressed in terms of the log-likelihood `ℓ`.
//! - Errors bubble up as [`OptResult<T>`] / [`OptError`].
//!
//! Testing notes
//! -------------
//! - Unit tests in submodules cover sign conventions in [`adapter`], solver
//!   construction in [`builders`], finite differences in [`finite_diff`],
//!   option validation in [`traits`], and the fallback chain in
//!   [`fallback`].

pub mod adapter;
pub mod api;
pub mod builders;
pub mod fallback;
pub mod finite_diff;
pub mod run;
pub mod traits;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::api::{maximize, maximize_nelder_mead};
pub use self::fallback::{Method, maximize_with};
pub use self::traits::{
    LineSearcher, LogLikelihood, MLEOptions, NelderMeadOptions, OptimOutcome, Tolerances,
};
pub use self::types::{Cost, DEFAULT_LBFGS_MEM, FnEvalMap, Grad, Hessian, Theta};

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use super::api::{maximize, maximize_nelder_mead};
    pub use super::fallback::{Method, maximize_with};
    pub use super::traits::{
        LineSearcher, LogLikelihood, MLEOptions, NelderMeadOptions, OptimOutcome, Tolerances,
    };
    pub use super::types::{Cost, Grad, Theta};
}
