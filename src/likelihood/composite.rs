//! likelihood::composite — a named sum of tagged model terms.
//!
//! Purpose
//! -------
//! Hold the terms of one likelihood together with the configuration they
//! were built from, the parameter ranges, the bound dataset and the recipe
//! for simulating toys. This is the unit a [`ProfiledLikelihood`] wraps.
//!
//! Key behaviors
//! -------------
//! - `loglikelihood(params) = bound_penalty(params) + Σ_terms llh`, with
//!   every term resolved against `params` first and the dataset second.
//! - `param_needed` is the union of the terms' inputs minus the dataset keys
//!   that observables read directly.
//!
//! Invariants & assumptions
//! ------------------------
//! - Term tags are unique; terms keep declaration order.
//! - Ranges satisfy `lower <= upper`.
//!
//! [`ProfiledLikelihood`]: crate::likelihood::profiled::ProfiledLikelihood
use crate::config::options::BuiltConfig;
use crate::likelihood::{
    bounds::{ParamRange, bound_penalty, validate_ranges},
    errors::{LikelihoodError, LikelihoodResult},
    simulate::ToySimulator,
    traits::LikelihoodModel,
};
use crate::model::{
    inputs::{DataSet, Inputs, ParamMap},
    term::{Term, TermSpec},
};
use rand::RngCore;
use std::collections::BTreeSet;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct Likelihood {
    name: String,
    config: BuiltConfig,
    terms: Vec<Term>,
    param_needed: BTreeSet<String>,
    param_range: ParamRange,
    data: Option<DataSet>,
    simulator: Option<Arc<dyn ToySimulator>>,
}

impl Likelihood {
    /// Bind `terms` into a likelihood named `name`.
    ///
    /// # Errors
    /// - [`LikelihoodError::Model`] when a term's aliases do not match its
    ///   model.
    /// - [`LikelihoodError::DuplicateTag`] when two terms share a tag.
    pub fn new(name: &str, config: BuiltConfig, terms: Vec<TermSpec>) -> LikelihoodResult<Self> {
        let mut built: Vec<Term> = Vec::with_capacity(terms.len());
        for spec in terms {
            let term = spec.build()?;
            if built.iter().any(|t| t.tag() == term.tag()) {
                return Err(LikelihoodError::DuplicateTag { tag: term.tag().to_string() });
            }
            built.push(term);
        }

        // A name read directly as an observable is data, unless some term
        // also takes it as an argument input.
        let mut needed = BTreeSet::new();
        let mut arg_inputs = BTreeSet::new();
        let mut observed = BTreeSet::new();
        for term in &built {
            needed.extend(term.remap().input_needed.iter().cloned());
            arg_inputs.extend(term.remap().arg_input_needed.iter().cloned());
            observed.extend(term.remap().direct_observables().map(str::to_string));
        }
        let param_needed = needed
            .into_iter()
            .filter(|name| !observed.contains(name) || arg_inputs.contains(name))
            .collect();

        Ok(Self {
            name: name.to_string(),
            config,
            terms: built,
            param_needed,
            param_range: ParamRange::new(),
            data: None,
            simulator: None,
        })
    }

    pub fn with_simulator(mut self, simulator: impl ToySimulator + 'static) -> Self {
        self.simulator = Some(Arc::new(simulator));
        self
    }

    /// Insert or overwrite ranges; the whole update is rejected if any
    /// range is inverted.
    pub fn set_param_range(&mut self, ranges: ParamRange) -> LikelihoodResult<()> {
        validate_ranges(&ranges)?;
        self.param_range.extend(ranges);
        Ok(())
    }

    pub fn bound_penalty(&self, params: &ParamMap) -> f64 {
        bound_penalty(&self.param_range, params)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &BuiltConfig {
        &self.config
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    pub fn term(&self, tag: &str) -> Option<&Term> {
        self.terms.iter().find(|t| t.tag() == tag)
    }

    pub fn data(&self) -> Option<&DataSet> {
        self.data.as_ref()
    }

    /// Simulate toy data and bind it.
    pub fn set_data_from_toymc(
        &mut self, params: &ParamMap, rng: &mut dyn RngCore,
    ) -> LikelihoodResult<()> {
        let data = LikelihoodModel::simulate(self, params, rng)?;
        self.data = Some(data);
        Ok(())
    }
}

impl LikelihoodModel for Likelihood {
    fn loglikelihood(&self, params: &ParamMap) -> LikelihoodResult<f64> {
        let inputs = Inputs::new(params, self.data.as_ref());
        let mut llh = self.bound_penalty(params);
        for term in &self.terms {
            llh += term.loglikelihood_from_inputs(&inputs)?;
        }
        Ok(llh)
    }

    fn simulate(&self, params: &ParamMap, rng: &mut dyn RngCore) -> LikelihoodResult<DataSet> {
        match &self.simulator {
            Some(sim) => sim.simulate(self, params, rng),
            None => Err(LikelihoodError::SimulationNotDefined { name: self.name.clone() }),
        }
    }

    fn set_data(&mut self, data: DataSet) {
        self.data = Some(data);
    }

    fn param_needed(&self) -> &BTreeSet<String> {
        &self.param_needed
    }

    fn param_range(&self) -> &ParamRange {
        &self.param_range
    }

    fn view(&self) -> String {
        self.terms.iter().map(Term::view).collect::<Vec<_>>().join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::likelihood::simulate::CountThenShapeSimulator;
    use crate::model::{Alias, Gaussian, Poisson, Value};
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Parameter bookkeeping (`param_needed`, duplicate tags).
    // - Summation of terms with the bound penalty.
    // - Data binding and the missing-simulator error.
    // -------------------------------------------------------------------------

    fn counting() -> Likelihood {
        Likelihood::new(
            "Counting",
            BuiltConfig::default(),
            vec![
                TermSpec::new("count", Poisson)
                    .arg("lam", Alias::scalar_fn(&["s", "b"], "s + b", |v| v[0] + v[1]))
                    .obs("n", Alias::input("n")),
                TermSpec::new("anc_b", Gaussian)
                    .arg("mu", Alias::constant(3.0))
                    .arg("std", Alias::constant(1.0))
                    .obs("x", Alias::input("b")),
            ],
        )
        .unwrap()
    }

    fn params(s: f64, b: f64) -> ParamMap {
        [("s".to_string(), s), ("b".to_string(), b)].into_iter().collect()
    }

    #[test]
    // Purpose
    // -------
    // Observables read directly from data are not parameters, unless another
    // term uses the same name as an argument input.
    //
    // Given
    // -----
    // - `n` read from data, `b` feeding both a rate and a constraint.
    //
    // Expect
    // ------
    // - `param_needed == {b, s}`.
    fn param_needed_excludes_direct_observables() {
        let llh = counting();
        let names: Vec<&str> = llh.param_needed().iter().map(String::as_str).collect();
        assert_eq!(names, vec!["b", "s"]);
        assert!(!llh.param_needed().contains("n"));
    }

    #[test]
    // Purpose
    // -------
    // Two terms with the same tag are rejected.
    fn duplicate_tags_are_rejected() {
        let term = || TermSpec::new("t", Poisson).arg("lam", Alias::constant(1.0)).obs("n", Alias::input("n"));
        let err = Likelihood::new("Dup", BuiltConfig::default(), vec![term(), term()]).unwrap_err();
        assert_eq!(err, LikelihoodError::DuplicateTag { tag: "t".to_string() });
    }

    #[test]
    // Purpose
    // -------
    // The total is the sum of terms plus the bound penalty.
    //
    // Given
    // -----
    // - Data `n = 5`; `s = 2, b = 3`; range `s ∈ (0, 1)`.
    //
    // Expect
    // ------
    // - Poisson(5 | 5) + Gaussian(3 | 3, 1) - exp(2 - 1).
    fn loglikelihood_sums_terms_and_penalty() {
        let mut llh = counting();
        llh.set_data(DataSet::from([("n".to_string(), Value::Count(5))]));
        llh.set_param_range([("s".to_string(), (0.0, 1.0))].into_iter().collect()).unwrap();

        let value = llh.loglikelihood(&params(2.0, 3.0)).unwrap();

        let poisson = 5.0 * 5f64.ln() - 5.0 - 120f64.ln();
        let gauss = -0.5 * (2.0 * std::f64::consts::PI).ln();
        assert_relative_eq!(value, poisson + gauss - 1f64.exp(), epsilon = 1e-10);
    }

    #[test]
    // Purpose
    // -------
    // Without data the observable cannot be resolved.
    fn loglikelihood_without_data_reports_missing_input() {
        let err = counting().loglikelihood(&params(1.0, 1.0)).unwrap_err();
        assert!(matches!(err, LikelihoodError::Model(_)));
    }

    #[test]
    // Purpose
    // -------
    // Simulation needs a simulator; with one, toys are bound as data.
    fn set_data_from_toymc_requires_simulator() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut llh = counting();
        assert!(matches!(
            llh.set_data_from_toymc(&params(1.0, 1.0), &mut rng),
            Err(LikelihoodError::SimulationNotDefined { .. })
        ));

        // The count term alone stands in for the shape: n events of count type.
        let mut llh = counting().with_simulator(CountThenShapeSimulator::new("count", "count", "n"));
        llh.set_data_from_toymc(&params(1.0, 1.0), &mut rng).unwrap();
        assert!(llh.data().is_some_and(|d| d.contains_key("n")));
    }

    #[test]
    // Purpose
    // -------
    // The view stacks term views in declaration order.
    fn view_lists_terms_in_order() {
        let view = counting().view();
        let poisson = view.find("Poisson(").unwrap();
        let gauss = view.find("Gaussian(").unwrap();
        assert!(poisson < gauss);
        assert!(view.contains("lam = s + b"));
    }
}
