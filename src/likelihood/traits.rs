use crate::likelihood::{bounds::ParamRange, errors::LikelihoodResult};
use crate::model::inputs::{DataSet, ParamMap};
use rand::RngCore;
use std::collections::BTreeSet;

/// Shared surface of single and combined likelihoods, as seen by the
/// profiler.
///
/// Required:
/// - `loglikelihood(&ParamMap)`: total log-likelihood including the bound
///   penalty, evaluated on the bound dataset.
/// - `simulate(&ParamMap, rng)`: a toy dataset at the given parameters.
/// - `set_data(DataSet)`: replace the bound dataset.
/// - `param_needed()`, `param_range()`, `view()`.
pub trait LikelihoodModel: Send + Sync {
    fn loglikelihood(&self, params: &ParamMap) -> LikelihoodResult<f64>;
    fn simulate(&self, params: &ParamMap, rng: &mut dyn RngCore) -> LikelihoodResult<DataSet>;
    fn set_data(&mut self, data: DataSet);
    fn param_needed(&self) -> &BTreeSet<String>;
    fn param_range(&self) -> &ParamRange;
    fn view(&self) -> String;
}
