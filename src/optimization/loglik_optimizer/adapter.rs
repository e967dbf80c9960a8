//! Adapter that exposes a user `LogLikelihood` as an `argmin` problem.
//!
//! We convert a *maximization* of a log-likelihood `ℓ(θ)` into a *minimization*
//! problem by defining the cost as `c(θ) = -ℓ(θ)`. Analytic gradients (if
//! provided by the user) are negated accordingly. If a gradient is not
//! provided, we finite-difference the **cost** closure, so no sign flip is
//! needed in that branch.
use std::cell::RefCell;

use crate::optimization::{
    errors::OptError,
    loglik_optimizer::{
        finite_diff::run_fd_diff,
        traits::LogLikelihood,
        types::{Cost, Grad, Theta},
        validation::validate_grad,
    },
};
use argmin::core::{CostFunction, Error, Gradient};
use finitediff::FiniteDiff;

/// Bridges a user `LogLikelihood` to `argmin`'s `CostFunction` and `Gradient`.
///
/// - `CostFunction::cost` returns `-ℓ(θ)` (negative log-likelihood).
/// - `Gradient::gradient` returns:
///   - `-∇ℓ(θ)` if the user provides an analytic gradient, or
///   - a finite-difference gradient of the cost (no sign flip needed).
#[derive(Debug, Clone)]
pub struct ArgMinAdapter<'a, F: LogLikelihood> {
    pub f: &'a F,
    pub data: &'a F::Data,
}

impl<'a, F: LogLikelihood> CostFunction for ArgMinAdapter<'a, F> {
    type Param = Theta;
    type Output = Cost;

    /// Evaluate the cost `c(θ) = -ℓ(θ)`.
    ///
    /// # Errors
    /// - Propagates any `OptError` from the user’s `value`.
    /// - `NonFiniteCost` if the value is not finite.
    fn cost(&self, theta: &Self::Param) -> Result<Self::Output, Error> {
        let output = self.f.value(theta, self.data)?;
        if !output.is_finite() {
            return Err((OptError::NonFiniteCost { value: output }).into());
        }
        Ok(-output)
    }
}

impl<'a, F: LogLikelihood> Gradient for ArgMinAdapter<'a, F> {
    type Param = Theta;
    type Gradient = Grad;

    /// Evaluate the gradient of the cost at `θ`.
    ///
    /// - If the user implements `grad(θ, data)`, we validate it and return `-grad`.
    /// - Otherwise central differences of the cost are tried first; if any
    ///   cost evaluation failed, or the result is non-finite, we retry once
    ///   with forward differences via [`run_fd_diff`].
    ///
    /// The FD closure must return `f64`, so the first error raised inside it
    /// is parked in `closure_err` and `NaN` is returned instead.
    fn gradient(&self, theta: &Self::Param) -> Result<Self::Gradient, Error> {
        let dim = theta.len();
        match self.f.grad(theta, self.data) {
            Ok(g) => {
                validate_grad(&g, dim)?;
                Ok(-g)
            }
            Err(OptError::GradientNotImplemented) => {
                let closure_err: RefCell<Option<Error>> = RefCell::new(None);
                let cost_func = |theta: &Theta| -> f64 {
                    match self.cost(theta) {
                        Ok(val) => val,
                        Err(e) => {
                            let mut slot = closure_err.borrow_mut();
                            if slot.is_none() {
                                *slot = Some(e);
                            }
                            f64::NAN
                        }
                    }
                };
                let fd_grad = theta.central_diff(&cost_func);
                if closure_err.borrow().is_some() || validate_grad(&fd_grad, dim).is_err() {
                    return Ok(run_fd_diff(theta, &cost_func, &closure_err)?);
                }
                Ok(fd_grad)
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl<'a, F: LogLikelihood> ArgMinAdapter<'a, F> {
    /// Construct a new adapter over a user `LogLikelihood` and its data.
    pub fn new(f: &'a F, data: &'a F::Data) -> Self {
        Self { f, data }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::errors::OptResult;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - The sign flip between log-likelihood and cost.
    // - Finite-difference gradients when no analytic gradient exists.
    // - Propagation of objective failures and non-finite values.
    // -------------------------------------------------------------------------

    struct Quadratic;

    impl LogLikelihood for Quadratic {
        type Data = f64;

        fn value(&self, theta: &Theta, center: &f64) -> OptResult<f64> {
            Ok(-theta.iter().map(|x| (x - center).powi(2)).sum::<f64>())
        }

        fn check(&self, _: &Theta, _: &f64) -> OptResult<()> {
            Ok(())
        }
    }

    struct Failing;

    impl LogLikelihood for Failing {
        type Data = ();

        fn value(&self, theta: &Theta, _: &()) -> OptResult<f64> {
            if theta[0] > 0.0 {
                Err(OptError::ObjectiveFailed { text: "positive".to_string() })
            } else {
                Ok(f64::NEG_INFINITY)
            }
        }

        fn check(&self, _: &Theta, _: &()) -> OptResult<()> {
            Ok(())
        }
    }

    #[test]
    // Purpose
    // -------
    // The cost is the negated log-likelihood.
    fn cost_is_negative_loglikelihood() {
        let adapter = ArgMinAdapter::new(&Quadratic, &1.0);
        let cost = adapter.cost(&array![3.0]).unwrap();
        assert!((cost - 4.0).abs() < 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Without an analytic gradient the adapter differentiates the cost.
    //
    // Given
    // -----
    // - `ℓ(θ) = -(θ - 1)²` at `θ = 3`.
    //
    // Expect
    // ------
    // - `∇c(θ) = 2(θ - 1) = 4`.
    fn gradient_falls_back_to_finite_differences() {
        let adapter = ArgMinAdapter::new(&Quadratic, &1.0);
        let grad = adapter.gradient(&array![3.0]).unwrap();
        assert!((grad[0] - 4.0).abs() < 1e-5);
    }

    #[test]
    // Purpose
    // -------
    // Objective failures and non-finite values surface as errors.
    fn failures_propagate_through_cost() {
        let adapter = ArgMinAdapter::new(&Failing, &());

        let err = OptError::from(adapter.cost(&array![1.0]).unwrap_err());
        assert_eq!(err, OptError::ObjectiveFailed { text: "positive".to_string() });

        let err = OptError::from(adapter.cost(&array![-1.0]).unwrap_err());
        assert!(matches!(err, OptError::NonFiniteCost { .. }));
    }
}
