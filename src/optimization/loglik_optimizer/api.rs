//! High-level entry points for maximizing a user-provided `LogLikelihood`.
//!
//! [`maximize`] selects an L-BFGS solver with either Hager–Zhang or
//! More–Thuente line search; [`maximize_nelder_mead`] builds a simplex around
//! the starting point. Both wrap the model in an `ArgMinAdapter` (which
//! *minimizes* `-ℓ(θ)`) and delegate to the runners in `run`.
use argmin::core::CostFunction;

use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        OptimOutcome, Theta,
        adapter::ArgMinAdapter,
        builders::{
            build_nelder_mead, build_optimizer_hager_zhang, build_optimizer_more_thuente,
            simplex_vertices,
        },
        run::{run_lbfgs, run_nelder_mead},
        traits::{LineSearcher, LogLikelihood, MLEOptions, NelderMeadOptions},
    },
};

/// Maximize a log-likelihood `ℓ(θ)` using L-BFGS with the chosen line search.
///
/// # Behavior
/// - Validates the initial guess via `f.check(theta0, data)`.
/// - Wraps `(f, data)` in an `ArgMinAdapter` that exposes a *minimization*
///   problem `c(θ) = -ℓ(θ)` to `argmin`.
/// - Builds an L-BFGS solver with either **Hager–Zhang** or **More–Thuente**
///   line search based on `opts.line_searcher`.
/// - Calls `run_lbfgs`, which configures the executor (initial params,
///   max iters, optional observers) and returns an `OptimOutcome`.
///
/// # Errors
/// - Propagates any error from `f.check`.
/// - Propagates builder errors from `build_optimizer_*`.
/// - Propagates runtime errors from `run_lbfgs` (e.g., line search failures).
///
/// # Example
/// ```no_run
/// use ndarray::array;
/// use aptinf::optimization::errors::OptResult;
/// use aptinf::optimization::loglik_optimizer::{maximize, LogLikelihood, MLEOptions, Theta};
///
/// struct MyLL;
/// impl LogLikelihood for MyLL {
///     type Data = ();
///     fn value(&self, theta: &Theta, _: &()) -> OptResult<f64> {
///         Ok(-theta.dot(theta))
///     }
///     fn check(&self, _: &Theta, _: &()) -> OptResult<()> {
///         Ok(())
///     }
/// }
///
/// let out = maximize(&MyLL, array![0.1, -0.2, 0.3], &(), &MLEOptions::default())?;
/// println!("θ̂ = {:?}", out.theta_hat);
/// # Ok::<(), aptinf::optimization::errors::OptError>(())
/// ```
pub fn maximize<F: LogLikelihood>(
    f: &F, theta0: Theta, data: &F::Data, opts: &MLEOptions,
) -> OptResult<OptimOutcome> {
    f.check(&theta0, data)?;
    let problem = ArgMinAdapter::new(f, data);
    match opts.line_searcher {
        LineSearcher::MoreThuente => {
            let solver = build_optimizer_more_thuente(opts)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
        LineSearcher::HagerZhang => {
            let solver = build_optimizer_hager_zhang(opts)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
    }
}

/// Maximize a log-likelihood `ℓ(θ)` with the derivative-free Nelder–Mead
/// simplex.
///
/// Every starting vertex is evaluated before the solver runs; later
/// evaluation failures end the run with an error.
///
/// # Errors
/// - Propagates any error from `f.check`.
/// - [`OptError::EmptyTheta`](crate::optimization::errors::OptError::EmptyTheta)
///   for a zero-length start.
/// - The objective's error, or `NonFiniteCost`, for the first starting
///   vertex that cannot be evaluated.
/// - Propagates runtime errors from `run_nelder_mead`.
pub fn maximize_nelder_mead<F: LogLikelihood>(
    f: &F, theta0: &Theta, data: &F::Data, opts: &NelderMeadOptions, verbose: bool,
) -> OptResult<OptimOutcome> {
    f.check(theta0, data)?;
    let vertices = simplex_vertices(theta0, opts)?;
    let problem = ArgMinAdapter::new(f, data);
    for vertex in &vertices {
        problem.cost(vertex)?;
    }
    let solver = build_nelder_mead(vertices, opts)?;
    run_nelder_mead(opts, verbose, problem, solver)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::errors::OptError;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Recovery of the maximum of a concave quadratic by both entry points.
    // - Early rejection by the `check` hook.
    // - Errors, not panics, when a starting simplex vertex cannot be
    //   evaluated.
    // -------------------------------------------------------------------------

    struct Bowl;

    impl LogLikelihood for Bowl {
        type Data = Theta;

        fn value(&self, theta: &Theta, center: &Theta) -> OptResult<f64> {
            let d = theta - center;
            Ok(-0.5 * d.dot(&d))
        }

        fn check(&self, theta: &Theta, center: &Theta) -> OptResult<()> {
            if theta.len() != center.len() {
                return Err(OptError::ObjectiveFailed { text: "dimension".to_string() });
            }
            Ok(())
        }
    }

    /// `ℓ(s) = -s` on `s ≤ 1`; undefined above.
    struct Ceiling;

    impl LogLikelihood for Ceiling {
        type Data = ();

        fn value(&self, theta: &Theta, _: &()) -> OptResult<f64> {
            if theta[0] > 1.0 {
                return Err(OptError::ObjectiveFailed { text: format!("s = {} above 1", theta[0]) });
            }
            Ok(-theta[0])
        }

        fn check(&self, _: &Theta, _: &()) -> OptResult<()> {
            Ok(())
        }
    }

    #[test]
    // Purpose
    // -------
    // L-BFGS finds the centre of a concave bowl.
    //
    // Given
    // -----
    // - `ℓ(θ) = -½|θ - c|²` with `c = (1, -2)`, started at the origin.
    //
    // Expect
    // ------
    // - Converged outcome with `θ̂ ≈ c` and `ℓ(θ̂) ≈ 0`.
    fn maximize_lbfgs_recovers_bowl_centre() {
        let center = array![1.0, -2.0];
        let out = maximize(&Bowl, array![0.0, 0.0], &center, &MLEOptions::default()).unwrap();

        assert!(out.converged, "status: {}", out.status);
        assert!((out.theta_hat[0] - 1.0).abs() < 1e-3);
        assert!((out.theta_hat[1] + 2.0).abs() < 1e-3);
        assert!(out.value.abs() < 1e-6);
    }

    #[test]
    // Purpose
    // -------
    // The simplex finds the same centre without gradients.
    fn maximize_nelder_mead_recovers_bowl_centre() {
        let center = array![1.0, -2.0];
        let out = maximize_nelder_mead(
            &Bowl,
            &array![0.5, 0.5],
            &center,
            &NelderMeadOptions::default(),
            false,
        )
        .unwrap();

        assert!(out.converged, "status: {}", out.status);
        assert!((out.theta_hat[0] - 1.0).abs() < 1e-3);
        assert!((out.theta_hat[1] + 2.0).abs() < 1e-3);
        assert!(out.grad_norm.is_none());
    }

    #[test]
    // Purpose
    // -------
    // The `check` hook runs before any solver is built.
    fn check_failure_short_circuits() {
        let center = array![1.0, -2.0];
        let err = maximize(&Bowl, array![0.0], &center, &MLEOptions::default()).unwrap_err();
        assert_eq!(err, OptError::ObjectiveFailed { text: "dimension".to_string() });
    }

    #[test]
    // Purpose
    // -------
    // A valid start whose simplex reaches outside the objective's domain
    // yields the objective's error instead of a solver panic.
    //
    // Given
    // -----
    // - `Ceiling` started at `s = 0.95`; the second vertex sits at
    //   `0.95 + 0.1 = 1.05`.
    //
    // Expect
    // ------
    // - `Err(ObjectiveFailed)` from the second vertex.
    fn invalid_simplex_vertex_is_an_error() {
        let result = std::panic::catch_unwind(|| {
            maximize_nelder_mead(&Ceiling, &array![0.95], &(), &NelderMeadOptions::default(), false)
        });

        let err = result.expect("no panic").unwrap_err();
        assert!(matches!(err, OptError::ObjectiveFailed { ref text } if text.contains("above 1")));
    }
}
