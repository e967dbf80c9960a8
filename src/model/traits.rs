//! Statistical model interface.
//!
//! A model declares fixed argument and observable names; a [`Remap`]
//! supplies the values. Implementations only see evaluated [`Bindings`].
//!
//! [`Remap`]: crate::model::remap::Remap
use crate::model::{errors::ModelResult, remap::Bindings, value::Value};
use rand::RngCore;
use std::fmt::Debug;

pub trait Model: Debug + Send + Sync {
    /// Type name shown in views and errors.
    fn name(&self) -> &'static str;
    fn arg_needed(&self) -> &'static [&'static str];
    fn obs_needed(&self) -> &'static [&'static str];

    /// Log-likelihood of the observables given the arguments.
    fn loglikelihood(&self, arg: &Bindings<'_>, obs: &Bindings<'_>) -> ModelResult<f64>;

    /// Draw observables given the arguments. `size` is the number of draws
    /// (events for unbinned models); `None` means the model's natural unit.
    fn simulate(
        &self, arg: &Bindings<'_>, size: Option<usize>, rng: &mut dyn RngCore,
    ) -> ModelResult<Value>;
}
