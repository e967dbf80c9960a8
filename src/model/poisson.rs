//! Poisson counting term.
use crate::model::{
    errors::{ModelError, ModelResult},
    remap::{Bindings, bound},
    traits::Model,
    value::Value,
};
use rand::RngCore;
use rand_distr::Distribution;
use statrs::function::gamma::ln_gamma;

/// Poisson probability of observing `n` events with expectation `lam`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Poisson;

impl Poisson {
    const NAME: &'static str = "Poisson";

    fn lam(arg: &Bindings<'_>) -> ModelResult<f64> {
        let lam = bound(arg, Self::NAME, "lam")?.as_scalar("lam")?;
        if !(lam.is_finite() && lam >= 0.0) {
            return Err(ModelError::InvalidArgument {
                model: Self::NAME,
                name: "lam",
                reason: format!("expectation must be finite and >= 0, got {lam}"),
            });
        }
        Ok(lam)
    }

    fn draw(lam: f64, rng: &mut dyn RngCore) -> ModelResult<u64> {
        if lam == 0.0 {
            return Ok(0);
        }
        let dist = rand_distr::Poisson::new(lam).map_err(|e| ModelError::InvalidArgument {
            model: Self::NAME,
            name: "lam",
            reason: e.to_string(),
        })?;
        let n: f64 = dist.sample(rng);
        Ok(n as u64)
    }
}

impl Model for Poisson {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn arg_needed(&self) -> &'static [&'static str] {
        &["lam"]
    }

    fn obs_needed(&self) -> &'static [&'static str] {
        &["n"]
    }

    /// `n ln λ - λ - lnΓ(n + 1)`, exactly `-λ` for `n = 0` (so `λ = 0, n = 0`
    /// gives `0`).
    fn loglikelihood(&self, arg: &Bindings<'_>, obs: &Bindings<'_>) -> ModelResult<f64> {
        let lam = Self::lam(arg)?;
        let n = bound(obs, Self::NAME, "n")?.as_count("n")?;
        if n == 0 {
            return Ok(-lam);
        }
        let n = n as f64;
        Ok(n * lam.ln() - lam - ln_gamma(n + 1.0))
    }

    fn simulate(
        &self, arg: &Bindings<'_>, size: Option<usize>, rng: &mut dyn RngCore,
    ) -> ModelResult<Value> {
        let lam = Self::lam(arg)?;
        match size {
            None => Ok(Value::Count(Self::draw(lam, rng)?)),
            Some(k) => (0..k)
                .map(|_| Self::draw(lam, rng).map(Value::Count))
                .collect::<ModelResult<Vec<_>>>()
                .map(Value::Tuple),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::borrow::Cow;

    fn bindings(items: &[(&'static str, Value)]) -> Bindings<'static> {
        items.iter().map(|(k, v)| (*k, Cow::Owned(v.clone()))).collect()
    }

    #[test]
    // Purpose
    // -------
    // Log-pmf matches the closed form, including the empty limit.
    //
    // Given
    // -----
    // - `λ = 2.5, n = 3`, `λ = 0, n = 0` and `λ = 1.5, n = 0`.
    //
    // Expect
    // ------
    // - `3 ln 2.5 - 2.5 - ln 6`, exactly `0`, and exactly `-1.5`.
    fn loglikelihood_matches_closed_form() {
        let llh = Poisson
            .loglikelihood(
                &bindings(&[("lam", Value::Scalar(2.5))]),
                &bindings(&[("n", Value::Count(3))]),
            )
            .unwrap();
        assert_relative_eq!(llh, 3.0 * 2.5f64.ln() - 2.5 - 6f64.ln(), epsilon = 1e-10);

        let empty = Poisson
            .loglikelihood(
                &bindings(&[("lam", Value::Scalar(0.0))]),
                &bindings(&[("n", Value::Count(0))]),
            )
            .unwrap();
        assert_eq!(empty, 0.0);

        let no_events = Poisson
            .loglikelihood(
                &bindings(&[("lam", Value::Scalar(1.5))]),
                &bindings(&[("n", Value::Count(0))]),
            )
            .unwrap();
        assert_eq!(no_events, -1.5);
    }

    #[test]
    // Purpose
    // -------
    // Negative expectations are rejected.
    fn rejects_negative_rate() {
        let err = Poisson
            .loglikelihood(&bindings(&[("lam", Value::Scalar(-1.0))]), &bindings(&[("n", Value::Count(0))]))
            .unwrap_err();
        assert!(matches!(err, ModelError::InvalidArgument { name: "lam", .. }));
    }

    #[test]
    // Purpose
    // -------
    // Draws average to the expectation; a zero rate always gives zero.
    fn simulate_counts() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let draws = Poisson
            .simulate(&bindings(&[("lam", Value::Scalar(20.0))]), Some(2000), &mut rng)
            .unwrap()
            .as_scalars("n")
            .unwrap();
        let mean = draws.iter().sum::<f64>() / draws.len() as f64;
        assert!((mean - 20.0).abs() < 0.5);

        let zero = Poisson.simulate(&bindings(&[("lam", Value::Scalar(0.0))]), None, &mut rng).unwrap();
        assert_eq!(zero, Value::Count(0));
    }
}
