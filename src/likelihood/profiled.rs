//! likelihood::profiled — profile likelihoods and the likelihood-ratio test
//! statistic.
//!
//! Purpose
//! -------
//! Wrap any [`LikelihoodModel`] and maximize it over a chosen set of
//! nuisance parameters while the remaining parameters are held fixed. The
//! global maximum is stored once, and every later profile is compared with
//! it through `chi2 = 2 (max_llh - profiled_llh)`.
//!
//! Key behaviors
//! -------------
//! - Profiled parameters are the keys of the initial guess, optimized in
//!   alphabetical order (the `ParamMap` order).
//! - An empty guess means no optimization: the likelihood is evaluated at
//!   the fixed parameters and the best fit is empty.
//! - The maximizer is chosen by [`ProfileOptions::method`]; the default
//!   [`Method::Sequence`] falls back from L-BFGS to Nelder–Mead.
//! - Binding new data clears the stored maximum, so a stale maximum is never
//!   compared with a profile on different data.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every fixed and guessed name is in the model's `param_needed`;
//!   otherwise [`LikelihoodError::UnknownParameter`].
//! - A guessed name that is also fixed is optimized (the guess wins).
//!
//! Conventions
//! -----------
//! - Failures of the model inside the optimizer surface as
//!   [`OptError::ObjectiveFailed`] carrying the model's message.
use crate::likelihood::{
    errors::{LikelihoodError, LikelihoodResult},
    traits::LikelihoodModel,
};
use crate::inference::hessian::calc_standard_errors;
use crate::model::inputs::{DataSet, ParamMap};
use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::{LogLikelihood, MLEOptions, Method, NelderMeadOptions, Theta, maximize_with},
};
use ndarray::Array1;
use rand::RngCore;

/// Maximizer settings used for every profile.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProfileOptions {
    pub method: Method,
    pub mle: MLEOptions,
    pub nelder_mead: NelderMeadOptions,
}

/// Result of one profile: the maximum and where it was found.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub loglikelihood: f64,
    pub bestfit: ParamMap,
}

/// `ℓ` as a function of the profiled parameters only.
struct ProfileObjective<'m, L> {
    model: &'m L,
    fixed: &'m ParamMap,
    names: &'m [String],
}

impl<L: LikelihoodModel> ProfileObjective<'_, L> {
    fn params(&self, theta: &Theta) -> ParamMap {
        let mut params = self.fixed.clone();
        for (name, &v) in self.names.iter().zip(theta.iter()) {
            params.insert(name.clone(), v);
        }
        params
    }
}

impl<L: LikelihoodModel> LogLikelihood for ProfileObjective<'_, L> {
    type Data = ();

    fn value(&self, theta: &Theta, _: &()) -> OptResult<f64> {
        self.model
            .loglikelihood(&self.params(theta))
            .map_err(|e| OptError::ObjectiveFailed { text: e.to_string() })
    }

    fn check(&self, theta: &Theta, data: &()) -> OptResult<()> {
        if theta.len() != self.names.len() {
            return Err(OptError::ConditionViolated {
                text: format!("expected {} profiled parameters, got {}", self.names.len(), theta.len()),
            });
        }
        let value = self.value(theta, data)?;
        if !value.is_finite() {
            return Err(OptError::NonFiniteCost { value });
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct ProfiledLikelihood<L> {
    model: L,
    options: ProfileOptions,
    max_loglikelihood: Option<f64>,
    bestfit: Option<ParamMap>,
}

impl<L: LikelihoodModel> ProfiledLikelihood<L> {
    pub fn new(model: L) -> Self {
        Self { model, options: ProfileOptions::default(), max_loglikelihood: None, bestfit: None }
    }

    pub fn with_options(mut self, options: ProfileOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &ProfileOptions {
        &self.options
    }

    pub fn model(&self) -> &L {
        &self.model
    }

    /// Mutable access to the wrapped model; the stored maximum is cleared
    /// because the model may change under it.
    pub fn model_mut(&mut self) -> &mut L {
        self.clear_maximum();
        &mut self.model
    }

    pub fn max_loglikelihood(&self) -> Option<f64> {
        self.max_loglikelihood
    }

    /// Best fit found by the last [`set_max_loglikelihood`](Self::set_max_loglikelihood).
    pub fn bestfit(&self) -> Option<&ParamMap> {
        self.bestfit.as_ref()
    }

    pub fn loglikelihood(&self, params: &ParamMap) -> LikelihoodResult<f64> {
        self.model.loglikelihood(params)
    }

    pub fn view(&self) -> String {
        self.model.view()
    }

    pub fn set_data(&mut self, data: DataSet) {
        self.clear_maximum();
        self.model.set_data(data);
    }

    /// Simulate a toy dataset at `params` and bind it.
    pub fn set_data_from_toymc(
        &mut self, params: &ParamMap, rng: &mut dyn RngCore,
    ) -> LikelihoodResult<()> {
        let data = self.model.simulate(params, rng)?;
        self.set_data(data);
        Ok(())
    }

    /// Maximize over the keys of `guess` with `fixed` held.
    ///
    /// # Errors
    /// - [`LikelihoodError::UnknownParameter`] for names the model does not
    ///   use.
    /// - [`LikelihoodError::Optimization`] when the maximizer fails.
    /// - Any evaluation error when `guess` is empty.
    pub fn profiled_loglikelihood(
        &self, fixed: &ParamMap, guess: &ParamMap,
    ) -> LikelihoodResult<Profile> {
        self.check_names(fixed.keys().chain(guess.keys()))?;
        if guess.is_empty() {
            let loglikelihood = self.model.loglikelihood(fixed)?;
            return Ok(Profile { loglikelihood, bestfit: ParamMap::new() });
        }

        let names: Vec<String> = guess.keys().cloned().collect();
        let theta0: Theta = guess.values().copied().collect::<Array1<f64>>();
        let objective = ProfileObjective { model: &self.model, fixed, names: &names };
        let out = maximize_with(
            &objective,
            &theta0,
            &(),
            self.options.method,
            &self.options.mle,
            &self.options.nelder_mead,
        )?;

        let bestfit: ParamMap = names.into_iter().zip(out.theta_hat.iter().copied()).collect();
        log::debug!("profiled llh {:.6} after {} iterations at {bestfit:?}", out.value, out.iterations);
        Ok(Profile { loglikelihood: out.value, bestfit })
    }

    /// Fit the global maximum from `guess`, store it and return the best fit.
    pub fn set_max_loglikelihood(&mut self, guess: &ParamMap) -> LikelihoodResult<ParamMap> {
        let profile = self.profiled_loglikelihood(&ParamMap::new(), guess)?;
        self.max_loglikelihood = Some(profile.loglikelihood);
        self.bestfit = Some(profile.bestfit.clone());
        Ok(profile.bestfit)
    }

    /// `2 (max_llh - profiled_llh)` at `fixed`, profiling over `guess`.
    ///
    /// # Errors
    /// [`LikelihoodError::MaxLikelihoodNotSet`] before
    /// [`set_max_loglikelihood`](Self::set_max_loglikelihood).
    pub fn chi2(&self, fixed: &ParamMap, guess: &ParamMap) -> LikelihoodResult<f64> {
        self.chi2_with_bestfit(fixed, guess).map(|(chi2, _)| chi2)
    }

    pub fn chi2_with_bestfit(
        &self, fixed: &ParamMap, guess: &ParamMap,
    ) -> LikelihoodResult<(f64, ParamMap)> {
        let max = self.max_loglikelihood.ok_or(LikelihoodError::MaxLikelihoodNotSet)?;
        let profile = self.profiled_loglikelihood(fixed, guess)?;
        Ok((2.0 * (max - profile.loglikelihood), profile.bestfit))
    }

    /// Standard errors of the parameters in `bestfit` from the observed
    /// information of the full likelihood.
    pub fn bestfit_uncertainties(&self, bestfit: &ParamMap) -> LikelihoodResult<ParamMap> {
        self.check_names(bestfit.keys())?;
        let names: Vec<String> = bestfit.keys().cloned().collect();
        let theta_hat: Theta = bestfit.values().copied().collect::<Array1<f64>>();
        let empty = ParamMap::new();
        let objective = ProfileObjective { model: &self.model, fixed: &empty, names: &names };
        let f = |theta: &Theta| objective.value(theta, &());
        let se = calc_standard_errors(&f, &theta_hat)?;
        Ok(names.into_iter().zip(se.iter().copied()).collect())
    }

    fn check_names<'n>(&self, names: impl Iterator<Item = &'n String>) -> LikelihoodResult<()> {
        let needed = self.model.param_needed();
        for name in names {
            if !needed.contains(name) {
                return Err(LikelihoodError::UnknownParameter { name: name.clone() });
            }
        }
        Ok(())
    }

    fn clear_maximum(&mut self) {
        self.max_loglikelihood = None;
        self.bestfit = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::options::BuiltConfig;
    use crate::likelihood::composite::Likelihood;
    use crate::model::{Alias, Gaussian, TermSpec, Value};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - The closed-form chi2 of a Gaussian measurement.
    // - Profiling over a nuisance parameter.
    // - Error paths (unknown names, missing maximum).
    // - Standard errors at the best fit.
    // -------------------------------------------------------------------------

    /// `x_obs ~ N(mu + b, 1)` and `b_obs ~ N(b, 0.5)`.
    fn measurement(x_obs: f64, b_obs: f64) -> ProfiledLikelihood<Likelihood> {
        let llh = Likelihood::new(
            "Measurement",
            BuiltConfig::default(),
            vec![
                TermSpec::new("signal", Gaussian)
                    .arg("mu", Alias::scalar_fn(&["mu", "b"], "mu + b", |v| v[0] + v[1]))
                    .arg("std", Alias::constant(1.0))
                    .obs("x", Alias::input("x_obs")),
                TermSpec::new("anc_b", Gaussian)
                    .arg("mu", Alias::input("b"))
                    .arg("std", Alias::constant(0.5))
                    .obs("x", Alias::input("b_obs")),
            ],
        )
        .unwrap();
        let mut profiled = ProfiledLikelihood::new(llh);
        profiled.set_data(DataSet::from([
            ("x_obs".to_string(), Value::Scalar(x_obs)),
            ("b_obs".to_string(), Value::Scalar(b_obs)),
        ]));
        profiled
    }

    fn pm(items: &[(&str, f64)]) -> ParamMap {
        items.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    // Purpose
    // -------
    // The global fit sits at the observations and chi2 matches the closed
    // form after profiling the nuisance.
    //
    // Given
    // -----
    // - `x_obs = 3`, `b_obs = 1`.
    //
    // Expect
    // ------
    // - Best fit `mu = 2, b = 1`.
    // - Profiling `b` at fixed `mu` gives `chi2 = (mu - 2)² / (1 + 0.25)`.
    fn chi2_matches_closed_form_after_profiling() {
        let mut profiled = measurement(3.0, 1.0);

        let best = profiled.set_max_loglikelihood(&pm(&[("mu", 0.0), ("b", 0.0)])).unwrap();
        assert!((best["mu"] - 2.0).abs() < 1e-3);
        assert!((best["b"] - 1.0).abs() < 1e-3);

        let (chi2, nuisance) =
            profiled.chi2_with_bestfit(&pm(&[("mu", 4.0)]), &pm(&[("b", 1.0)])).unwrap();
        assert!((chi2 - 4.0 / 1.25).abs() < 1e-3);
        assert!(nuisance.contains_key("b"));
    }

    #[test]
    // Purpose
    // -------
    // An empty guess evaluates the likelihood directly.
    fn empty_guess_evaluates_directly() {
        let profiled = measurement(3.0, 1.0);
        let params = pm(&[("mu", 2.0), ("b", 1.0)]);

        let profile = profiled.profiled_loglikelihood(&params, &ParamMap::new()).unwrap();

        assert_eq!(profile.loglikelihood, profiled.loglikelihood(&params).unwrap());
        assert!(profile.bestfit.is_empty());
    }

    #[test]
    // Purpose
    // -------
    // chi2 needs the maximum; new data clears it; unknown names fail.
    fn error_paths() {
        let mut profiled = measurement(3.0, 1.0);
        assert_eq!(
            profiled.chi2(&pm(&[("mu", 0.0), ("b", 0.0)]), &ParamMap::new()).unwrap_err(),
            LikelihoodError::MaxLikelihoodNotSet
        );

        profiled.set_max_loglikelihood(&pm(&[("mu", 0.0), ("b", 0.0)])).unwrap();
        assert!(profiled.max_loglikelihood().is_some());
        profiled.set_data(DataSet::from([
            ("x_obs".to_string(), Value::Scalar(0.0)),
            ("b_obs".to_string(), Value::Scalar(0.0)),
        ]));
        assert!(profiled.max_loglikelihood().is_none());

        assert_eq!(
            profiled.profiled_loglikelihood(&ParamMap::new(), &pm(&[("typo", 0.0)])).unwrap_err(),
            LikelihoodError::UnknownParameter { name: "typo".to_string() }
        );
    }

    #[test]
    // Purpose
    // -------
    // Uncertainties at the best fit follow from the Gaussian information.
    //
    // Given
    // -----
    // - Information `[[1, 1], [1, 5]]` in `(mu, b)`.
    //
    // Expect
    // ------
    // - Covariance `[[5, -1], [-1, 1]] / 4`: errors `(√1.25, 0.5)`.
    fn bestfit_uncertainties_from_information() {
        let mut profiled = measurement(3.0, 1.0);
        let best = profiled.set_max_loglikelihood(&pm(&[("mu", 0.0), ("b", 0.0)])).unwrap();

        let se = profiled.bestfit_uncertainties(&best).unwrap();

        assert!((se["mu"] - 1.25f64.sqrt()).abs() < 1e-3);
        assert!((se["b"] - 0.5).abs() < 1e-3);
    }
}
