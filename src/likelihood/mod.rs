//! likelihood — composite, profiled and combined likelihoods.
//!
//! Purpose
//! -------
//! Sum model terms into a likelihood ([`Likelihood`]), profile it over
//! nuisance parameters ([`ProfiledLikelihood`]) and join independent
//! measurements ([`CombinedLikelihood`]). The profiled likelihood provides the
//! test statistic `chi2 = 2 (max_llh - profiled_llh)`.
//!
//! Key behaviors
//! -------------
//! - [`LikelihoodModel`] is the seam between the profiler and what it
//!   profiles; single and combined likelihoods both implement it.
//! - Parameter ranges are soft: leaving a range costs `exp(distance)` in
//!   log-likelihood ([`bounds::bound_penalty`]).
//! - Toy datasets come from a [`ToySimulator`] attached to the likelihood.
//!
//! Invariants & assumptions
//! ------------------------
//! - Parameters are named; maps are sorted by name, so the order of profiled
//!   parameters is alphabetical.
//! - Data passed to a combined likelihood is given to every member.
//!
//! Testing notes
//! -------------
//! - Gaussian measurements give closed-form `chi2` and standard errors and
//!   are used throughout the unit tests.

pub mod bounds;
pub mod combined;
pub mod composite;
pub mod errors;
pub mod profiled;
pub mod simulate;
pub mod traits;

pub use self::bounds::ParamRange;
pub use self::combined::{CombinedLikelihood, combine_profile_likelihoods};
pub use self::composite::Likelihood;
pub use self::errors::{LikelihoodError, LikelihoodResult};
pub use self::profiled::{Profile, ProfileOptions, ProfiledLikelihood};
pub use self::simulate::{CountThenShapeSimulator, ToySimulator};
pub use self::traits::LikelihoodModel;
