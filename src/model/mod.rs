//! model — statistical terms and the aliases that feed them.
//!
//! Purpose
//! -------
//! Provide the building blocks of a likelihood: statistical models with
//! fixed argument/observable names ([`Model`]), aliases that map those names
//! onto a likelihood's parameters and data ([`Alias`], [`Remap`]), and
//! tagged model instances ([`Term`]).
//!
//! Key behaviors
//! -------------
//! - Concrete models: [`Gaussian`], [`Poisson`], [`SingleSourceUnbinnedPdf`],
//!   [`MultiSourceUnbinnedPdf`]; each evaluates a log-likelihood and
//!   simulates its observables.
//! - [`Inputs`] resolves names against parameters first and the dataset
//!   second; dataset values are borrowed.
//!
//! Invariants & assumptions
//! ------------------------
//! - Remaps are validated when a term is built: every declared name has an
//!   alias and no alias targets an undeclared argument.
//! - Model domain violations (negative rates, zero widths, bad weights) are
//!   [`ModelError::InvalidArgument`], never panics.
//!
//! Testing notes
//! -------------
//! - Each model file checks its log-likelihood against the closed form and
//!   its simulation against simple moments or support.

pub mod alias;
pub mod errors;
pub mod gaussian;
pub mod inputs;
pub mod poisson;
pub mod remap;
pub mod term;
pub mod traits;
pub mod unbinned;
pub mod value;

pub use self::alias::{Alias, AliasFn};
pub use self::errors::{ModelError, ModelResult};
pub use self::gaussian::Gaussian;
pub use self::inputs::{DataSet, Inputs, ParamMap};
pub use self::poisson::Poisson;
pub use self::remap::{Bindings, Remap};
pub use self::term::{Term, TermSpec};
pub use self::traits::Model;
pub use self::unbinned::{MultiSourceUnbinnedPdf, SingleSourceUnbinnedPdf};
pub use self::value::Value;
