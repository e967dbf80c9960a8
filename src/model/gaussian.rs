//! Gaussian constraint term.
use crate::model::{
    errors::{ModelError, ModelResult},
    remap::{Bindings, bound},
    traits::Model,
    value::Value,
};
use rand::RngCore;
use rand_distr::{Distribution, Normal};
use std::f64::consts::PI;

/// Normal density of `x` with mean `mu` and standard deviation `std`.
///
/// `x` may be a scalar or a tuple of scalars; the log-likelihood sums over
/// its entries.
#[derive(Debug, Clone, Copy, Default)]
pub struct Gaussian;

impl Gaussian {
    const NAME: &'static str = "Gaussian";

    fn params(arg: &Bindings<'_>) -> ModelResult<(f64, f64)> {
        let mu = bound(arg, Self::NAME, "mu")?.as_scalar("mu")?;
        let std = bound(arg, Self::NAME, "std")?.as_scalar("std")?;
        if !(std.is_finite() && std > 0.0) || !mu.is_finite() {
            return Err(ModelError::InvalidArgument {
                model: Self::NAME,
                name: "std",
                reason: format!("need finite mu and std > 0, got mu={mu}, std={std}"),
            });
        }
        Ok((mu, std))
    }
}

impl Model for Gaussian {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn arg_needed(&self) -> &'static [&'static str] {
        &["mu", "std"]
    }

    fn obs_needed(&self) -> &'static [&'static str] {
        &["x"]
    }

    fn loglikelihood(&self, arg: &Bindings<'_>, obs: &Bindings<'_>) -> ModelResult<f64> {
        let (mu, std) = Self::params(arg)?;
        let var = std * std;
        let xs = bound(obs, Self::NAME, "x")?.as_scalars("x")?;
        Ok(xs.iter().map(|x| -0.5 * (2.0 * PI * var).ln() - 0.5 * (x - mu).powi(2) / var).sum())
    }

    fn simulate(
        &self, arg: &Bindings<'_>, size: Option<usize>, rng: &mut dyn RngCore,
    ) -> ModelResult<Value> {
        let (mu, std) = Self::params(arg)?;
        let normal = Normal::new(mu, std).map_err(|e| ModelError::InvalidArgument {
            model: Self::NAME,
            name: "std",
            reason: e.to_string(),
        })?;
        Ok(match size {
            None => Value::Scalar(normal.sample(rng)),
            Some(n) => Value::Tuple((0..n).map(|_| Value::Scalar(normal.sample(rng))).collect()),
        })
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
    // The log-density is the standard normal formula in `x - mu`.
    //
    // Given
    // -----
    // - `mu = 3`, `std = 2`, `x = 4`.
    //
    // Expect
    // ------
    // - `-½ ln(8π) - 1/8`.
    fn loglikelihood_matches_closed_form() {
        let arg = bindings(&[("mu", Value::Scalar(3.0)), ("std", Value::Scalar(2.0))]);
        let obs = bindings(&[("x", Value::Scalar(4.0))]);

        let llh = Gaussian.loglikelihood(&arg, &obs).unwrap();

        assert_relative_eq!(llh, -0.5 * (8.0 * PI).ln() - 0.125, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // A non-positive width is outside the model's domain.
    fn rejects_non_positive_std() {
        let arg = bindings(&[("mu", Value::Scalar(0.0)), ("std", Value::Scalar(0.0))]);
        let obs = bindings(&[("x", Value::Scalar(0.0))]);
        assert!(matches!(
            Gaussian.loglikelihood(&arg, &obs),
            Err(ModelError::InvalidArgument { name: "std", .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Draws scatter around the mean with the given width.
    fn simulate_draws_around_mean() {
        let arg = bindings(&[("mu", Value::Scalar(5.0)), ("std", Value::Scalar(0.5))]);
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        let draws = Gaussian.simulate(&arg, Some(4000), &mut rng).unwrap().as_scalars("x").unwrap();
        let mean = draws.iter().sum::<f64>() / draws.len() as f64;

        assert_eq!(draws.len(), 4000);
        assert!((mean - 5.0).abs() < 0.05);
    }
}
