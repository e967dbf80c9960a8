//! Toy dataset generation for composite likelihoods.
use crate::likelihood::{
    composite::Likelihood,
    errors::{LikelihoodError, LikelihoodResult},
};
use crate::model::inputs::{DataSet, Inputs, ParamMap};
use rand::RngCore;
use std::fmt::Debug;

/// How a likelihood turns parameters into a toy dataset.
pub trait ToySimulator: Debug + Send + Sync {
    fn simulate(
        &self, llh: &Likelihood, params: &ParamMap, rng: &mut dyn RngCore,
    ) -> LikelihoodResult<DataSet>;
}

/// Draw the event count from one term, then that many events from another.
///
/// The usual extended unbinned recipe: a Poisson term tagged `count_tag`
/// gives `n`, the shape term tagged `shape_tag` is sampled with `size = n`,
/// and the events are stored under `data_key`. Only term arguments are
/// evaluated, so the bound dataset plays no part.
#[derive(Debug, Clone)]
pub struct CountThenShapeSimulator {
    pub count_tag: String,
    pub shape_tag: String,
    pub data_key: String,
}

impl CountThenShapeSimulator {
    pub fn new(count_tag: &str, shape_tag: &str, data_key: &str) -> Self {
        Self {
            count_tag: count_tag.to_string(),
            shape_tag: shape_tag.to_string(),
            data_key: data_key.to_string(),
        }
    }
}

impl ToySimulator for CountThenShapeSimulator {
    fn simulate(
        &self, llh: &Likelihood, params: &ParamMap, rng: &mut dyn RngCore,
    ) -> LikelihoodResult<DataSet> {
        let inputs = Inputs::new(params, None);
        let count = llh
            .term(&self.count_tag)
            .ok_or_else(|| LikelihoodError::UnknownTerm { tag: self.count_tag.clone() })?;
        let shape = llh
            .term(&self.shape_tag)
            .ok_or_else(|| LikelihoodError::UnknownTerm { tag: self.shape_tag.clone() })?;

        let n = count.simulate_from_inputs(&inputs, None, rng)?.as_count(&self.count_tag)?;
        let events = shape.simulate_from_inputs(&inputs, Some(n as usize), rng)?;
        log::debug!("{}: simulated {n} events", llh.name());
        Ok(DataSet::from([(self.data_key.clone(), events)]))
    }
}
