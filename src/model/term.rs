//! model::term — a tagged model instance inside a likelihood.
//!
//! Purpose
//! -------
//! Pair a [`Model`] with the [`Remap`] that feeds it, so a likelihood can
//! evaluate and simulate each of its terms from a single set of inputs.
//!
//! Conventions
//! -----------
//! - Terms are declared with the [`TermSpec`] builder and validated once,
//!   when the owning likelihood is constructed.
//! - Views follow `ModelName(\n\t<name> = <alias>\n...)`.
use crate::model::{
    alias::Alias,
    errors::ModelResult,
    inputs::Inputs,
    remap::{Bindings, Remap},
    traits::Model,
    value::Value,
};
use rand::RngCore;
use std::sync::Arc;

/// Declaration of one likelihood term.
#[derive(Debug, Clone)]
pub struct TermSpec {
    tag: String,
    model: Arc<dyn Model>,
    args: Vec<(String, Alias)>,
    obs: Vec<(String, Alias)>,
}

impl TermSpec {
    pub fn new(tag: &str, model: impl Model + 'static) -> Self {
        Self { tag: tag.to_string(), model: Arc::new(model), args: Vec::new(), obs: Vec::new() }
    }

    pub fn arg(mut self, name: &str, alias: Alias) -> Self {
        self.args.push((name.to_string(), alias));
        self
    }

    pub fn obs(mut self, name: &str, alias: Alias) -> Self {
        self.obs.push((name.to_string(), alias));
        self
    }

    /// Validate the aliases against the model.
    pub fn build(self) -> ModelResult<Term> {
        let remap = Remap::new(
            self.model.name(),
            self.model.arg_needed(),
            self.model.obs_needed(),
            self.args,
            self.obs,
        )?;
        Ok(Term { tag: self.tag, model: self.model, remap })
    }
}

#[derive(Debug, Clone)]
pub struct Term {
    tag: String,
    model: Arc<dyn Model>,
    remap: Remap,
}

impl Term {
    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn model(&self) -> &dyn Model {
        self.model.as_ref()
    }

    pub fn remap(&self) -> &Remap {
        &self.remap
    }

    pub fn arg_from_inputs<'a>(&'a self, inputs: &Inputs<'a>) -> ModelResult<Bindings<'a>> {
        self.remap.arg_from_inputs(inputs)
    }

    pub fn obs_from_inputs<'a>(&'a self, inputs: &Inputs<'a>) -> ModelResult<Bindings<'a>> {
        self.remap.obs_from_inputs(inputs)
    }

    pub fn loglikelihood_from_inputs(&self, inputs: &Inputs<'_>) -> ModelResult<f64> {
        let arg = self.arg_from_inputs(inputs)?;
        let obs = self.obs_from_inputs(inputs)?;
        self.model.loglikelihood(&arg, &obs)
    }

    /// Simulate observables; only the arguments are evaluated.
    pub fn simulate_from_inputs(
        &self, inputs: &Inputs<'_>, size: Option<usize>, rng: &mut dyn RngCore,
    ) -> ModelResult<Value> {
        let arg = self.arg_from_inputs(inputs)?;
        self.model.simulate(&arg, size, rng)
    }

    pub fn view(&self) -> String {
        let mut out = format!("{}(\n", self.model.name());
        for line in self.remap.view_lines() {
            out.push('\t');
            out.push_str(&line);
            out.push('\n');
        }
        out.push(')');
        out
    }
}
