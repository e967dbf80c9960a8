//! model::unbinned — extended-free unbinned template likelihoods.
//!
//! Purpose
//! -------
//! Evaluate per-event template densities: a single source
//! ([`SingleSourceUnbinnedPdf`]) or a weighted mixture of sources
//! ([`MultiSourceUnbinnedPdf`]). The overall event count is a separate
//! Poisson term; these models only describe shapes.
//!
//! Key behaviors
//! -------------
//! - Single source: `Σ_events ln pdf(event)`.
//! - Multi source: mixture probabilities `p_k = w_k / Σw`, log-likelihood
//!   `Σ_events ln Σ_k p_k pdf_k(event)`.
//! - Multi-source simulation splits the requested size over sources
//!   multinomially (sequential binomials) and concatenates per-source
//!   samples in source order.
//!
//! Invariants & assumptions
//! ------------------------
//! - Weights are finite, non-negative, one per template, with a positive
//!   total.
//! - All templates of a mixture share the event dimension.
use crate::config::template::Template;
use crate::model::{
    errors::{ModelError, ModelResult},
    remap::{Bindings, bound},
    traits::Model,
    value::Value,
};
use ndarray::{Array1, Array2, ArrayView2, Axis, concatenate};
use rand::RngCore;
use rand_distr::{Binomial, Distribution};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, Default)]
pub struct SingleSourceUnbinnedPdf;

impl SingleSourceUnbinnedPdf {
    const NAME: &'static str = "SingleSourceUnbinnedPDF";
}

impl Model for SingleSourceUnbinnedPdf {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn arg_needed(&self) -> &'static [&'static str] {
        &["template"]
    }

    fn obs_needed(&self) -> &'static [&'static str] {
        &["events"]
    }

    fn loglikelihood(&self, arg: &Bindings<'_>, obs: &Bindings<'_>) -> ModelResult<f64> {
        let template = bound(arg, Self::NAME, "template")?.as_template("template")?;
        let events = bound(obs, Self::NAME, "events")?.as_events("events")?;
        Ok(template.pdf(events.view())?.mapv(f64::ln).sum())
    }

    fn simulate(
        &self, arg: &Bindings<'_>, size: Option<usize>, rng: &mut dyn RngCore,
    ) -> ModelResult<Value> {
        let template = bound(arg, Self::NAME, "template")?.as_template("template")?;
        Ok(Value::Events(template.sample(size.unwrap_or(1), rng)))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MultiSourceUnbinnedPdf;

impl MultiSourceUnbinnedPdf {
    const NAME: &'static str = "MultiSourceUnbinnedPDF";

    fn sources<'b>(arg: &'b Bindings<'_>) -> ModelResult<(&'b [Arc<Template>], Vec<f64>)> {
        let templates = bound(arg, Self::NAME, "templates")?.as_templates("templates")?;
        let weights = bound(arg, Self::NAME, "weights")?.as_scalars("weights")?;
        let invalid = |reason: String| ModelError::InvalidArgument {
            model: Self::NAME,
            name: "weights",
            reason,
        };
        if templates.is_empty() || weights.len() != templates.len() {
            return Err(invalid(format!(
                "need one weight per template, got {} weights for {} templates",
                weights.len(),
                templates.len()
            )));
        }
        if let Some(w) = weights.iter().find(|w| !(w.is_finite() && **w >= 0.0)) {
            return Err(invalid(format!("weights must be finite and >= 0, got {w}")));
        }
        let total: f64 = weights.iter().sum();
        if !(total.is_finite() && total > 0.0) {
            return Err(invalid(format!("total weight must be finite and > 0, got {total}")));
        }
        Ok((templates, weights.iter().map(|w| w / total).collect()))
    }

    /// Mixture density per event.
    pub fn mixture_pdf(
        templates: &[Arc<Template>], probs: &[f64], events: ArrayView2<'_, f64>,
    ) -> ModelResult<Array1<f64>> {
        let mut total = Array1::zeros(events.nrows());
        for (template, &p) in templates.iter().zip(probs) {
            total.scaled_add(p, &template.pdf(events)?);
        }
        Ok(total)
    }
}

impl Model for MultiSourceUnbinnedPdf {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn arg_needed(&self) -> &'static [&'static str] {
        &["templates", "weights"]
    }

    fn obs_needed(&self) -> &'static [&'static str] {
        &["events"]
    }

    fn loglikelihood(&self, arg: &Bindings<'_>, obs: &Bindings<'_>) -> ModelResult<f64> {
        let (templates, probs) = Self::sources(arg)?;
        let events = bound(obs, Self::NAME, "events")?.as_events("events")?;
        Ok(Self::mixture_pdf(templates, &probs, events.view())?.mapv(f64::ln).sum())
    }

    fn simulate(
        &self, arg: &Bindings<'_>, size: Option<usize>, rng: &mut dyn RngCore,
    ) -> ModelResult<Value> {
        let (templates, probs) = Self::sources(arg)?;
        let mut remaining = size.unwrap_or(1) as u64;
        let mut rest = 1.0;
        let mut parts: Vec<Array2<f64>> = Vec::with_capacity(templates.len());
        for (k, (template, &p)) in templates.iter().zip(&probs).enumerate() {
            let n = if k + 1 == templates.len() || remaining == 0 {
                remaining
            } else {
                let q = if rest > 0.0 { (p / rest).clamp(0.0, 1.0) } else { 1.0 };
                Binomial::new(remaining, q)
                    .map_err(|e| ModelError::InvalidArgument {
                        model: Self::NAME,
                        name: "weights",
                        reason: e.to_string(),
                    })?
                    .sample(rng)
            };
            remaining -= n;
            rest -= p;
            parts.push(template.sample(n as usize, rng));
        }
        let views: Vec<ArrayView2<'_, f64>> = parts.iter().map(|a| a.view()).collect();
        concatenate(Axis(0), &views).map(Value::Events).map_err(|e| ModelError::InvalidArgument {
            model: Self::NAME,
            name: "templates",
            reason: format!("templates differ in dimension: {e}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::borrow::Cow;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Closed-form log-likelihoods on flat and step templates.
    // - Weight validation.
    // - Multinomial splitting in simulation.
    // -------------------------------------------------------------------------

    fn flat() -> Arc<Template> {
        // Uniform on [0, 2): density 0.5 everywhere inside.
        Arc::new(Template::from_histogram("flat", vec![vec![0.0, 1.0, 2.0]], vec![5.0, 5.0]).unwrap())
    }

    fn low() -> Arc<Template> {
        // Concentrated in the first bin; interpolation at its centre gives 1.0.
        Arc::new(Template::from_histogram("low", vec![vec![0.0, 1.0, 2.0]], vec![1.0, 0.0]).unwrap())
    }

    fn bindings(items: Vec<(&'static str, Value)>) -> Bindings<'static> {
        items.into_iter().map(|(k, v)| (k, Cow::Owned(v))).collect()
    }

    #[test]
    // Purpose
    // -------
    // A single flat source gives `n ln 0.5`.
    fn single_source_sums_log_density() {
        let arg = bindings(vec![("template", Value::from(flat()))]);
        let obs = bindings(vec![("events", Value::Events(array![[0.5], [1.5], [1.0]]))]);

        let llh = SingleSourceUnbinnedPdf.loglikelihood(&arg, &obs).unwrap();

        assert_relative_eq!(llh, 3.0 * 0.5f64.ln(), epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Mixture probabilities are the normalized weights.
    //
    // Given
    // -----
    // - Sources (flat, low) with weights (3, 1), one event at 0.5.
    //
    // Expect
    // ------
    // - `ln(0.75 · 0.5 + 0.25 · 1.0)`.
    fn multi_source_mixes_with_normalized_weights() {
        let arg = bindings(vec![
            ("templates", Value::Templates(vec![flat(), low()])),
            ("weights", Value::Tuple(vec![Value::Scalar(3.0), Value::Scalar(1.0)])),
        ]);
        let obs = bindings(vec![("events", Value::Events(array![[0.5]]))]);

        let llh = MultiSourceUnbinnedPdf.loglikelihood(&arg, &obs).unwrap();

        assert_relative_eq!(llh, (0.75f64 * 0.5 + 0.25).ln(), epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Weights must match the templates and have a positive total.
    fn multi_source_validates_weights() {
        for weights in [vec![1.0], vec![0.0, 0.0], vec![-1.0, 2.0]] {
            let arg = bindings(vec![
                ("templates", Value::Templates(vec![flat(), low()])),
                ("weights", Value::Tuple(weights.into_iter().map(Value::Scalar).collect())),
            ]);
            let obs = bindings(vec![("events", Value::Events(array![[0.5]]))]);
            assert!(matches!(
                MultiSourceUnbinnedPdf.loglikelihood(&arg, &obs),
                Err(ModelError::InvalidArgument { name: "weights", .. })
            ));
        }
    }

    #[test]
    // Purpose
    // -------
    // Simulation returns exactly `size` events; a zero-weight source
    // contributes none.
    //
    // Given
    // -----
    // - Sources (flat, low) with weights (1, 0) and `size = 500`.
    //
    // Expect
    // ------
    // - 500 events, all drawn from the flat source over [0, 2).
    fn multi_source_simulation_splits_size() {
        let arg = bindings(vec![
            ("templates", Value::Templates(vec![low(), flat()])),
            ("weights", Value::Tuple(vec![Value::Scalar(0.0), Value::Scalar(1.0)])),
        ]);
        let mut rng = ChaCha8Rng::seed_from_u64(5);

        let events = MultiSourceUnbinnedPdf.simulate(&arg, Some(500), &mut rng).unwrap();
        let events = events.as_events("events").unwrap();

        assert_eq!(events.dim(), (500, 1));
        assert!(events.iter().any(|&x| x >= 1.0));
    }
}
