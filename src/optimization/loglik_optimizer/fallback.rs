//! loglik_optimizer::fallback — minimizer selection and fallback chain.
//!
//! Purpose
//! -------
//! Pick a maximizer by name and, for [`Method::Sequence`], retry with a more
//! robust method when the first one fails. Likelihood surfaces built from
//! sparse templates are often flat or kinked, so a gradient method alone is
//! not reliable enough for profiling.
//!
//! Key behaviors
//! -------------
//! - [`Method::Lbfgs`] runs [`maximize`] only.
//! - [`Method::NelderMead`] runs [`maximize_nelder_mead`] only.
//! - [`Method::Sequence`] runs L-BFGS, then Nelder–Mead, and returns the
//!   first converged outcome.
//!
//! Invariants & assumptions
//! ------------------------
//! - An outcome with `converged == false` is a failure: it is turned into
//!   [`OptError::NotConverged`] before the next method is tried.
//! - Each failure is logged with `log::warn!` and recorded; when every
//!   method fails the records are returned in
//!   [`OptError::AllMinimizersFailed`].
use std::str::FromStr;

use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::{
        api::{maximize, maximize_nelder_mead},
        traits::{LogLikelihood, MLEOptions, NelderMeadOptions, OptimOutcome},
        types::Theta,
    },
};

/// Maximizer selection.
///
/// Parsing accepts case-insensitive names: `"lbfgs"`, `"neldermead"` (or
/// `"nelder-mead"`), `"sequence"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    Lbfgs,
    NelderMead,
    #[default]
    Sequence,
}

impl Method {
    fn label(self) -> &'static str {
        match self {
            Method::Lbfgs => "L-BFGS",
            Method::NelderMead => "Nelder-Mead",
            Method::Sequence => "Sequence",
        }
    }

    fn chain(self) -> &'static [Method] {
        match self {
            Method::Lbfgs => &[Method::Lbfgs],
            Method::NelderMead => &[Method::NelderMead],
            Method::Sequence => &[Method::Lbfgs, Method::NelderMead],
        }
    }
}

impl FromStr for Method {
    type Err = OptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', '_'], "").as_str() {
            "lbfgs" => Ok(Method::Lbfgs),
            "neldermead" => Ok(Method::NelderMead),
            "sequence" => Ok(Method::Sequence),
            _ => Err(OptError::InvalidMethod {
                name: s.to_string(),
                reason: "Valid options are case insensitive 'lbfgs', 'neldermead' or 'sequence'.",
            }),
        }
    }
}

/// Maximize `f` with the requested method, falling back along its chain.
///
/// # Errors
/// - For single methods: the method's own error, or
///   [`OptError::NotConverged`] for an unconverged outcome.
/// - For [`Method::Sequence`]: [`OptError::AllMinimizersFailed`] listing
///   every attempt.
pub fn maximize_with<F: LogLikelihood>(
    f: &F, theta0: &Theta, data: &F::Data, method: Method, opts: &MLEOptions,
    nm_opts: &NelderMeadOptions,
) -> OptResult<OptimOutcome> {
    let chain = method.chain();
    let mut attempts = Vec::with_capacity(chain.len());
    for &step in chain {
        let attempt = match step {
            Method::NelderMead => maximize_nelder_mead(f, theta0, data, nm_opts, opts.verbose),
            _ => maximize(f, theta0.clone(), data, opts),
        }
        .and_then(|out| require_converged(step, out));
        match attempt {
            Ok(out) => return Ok(out),
            Err(err) if chain.len() == 1 => return Err(err),
            Err(err) => {
                log::warn!("{} failed, trying the next minimizer: {err}", step.label());
                attempts.push(format!("{}: {err}", step.label()));
            }
        }
    }
    Err(OptError::AllMinimizersFailed { attempts })
}

fn require_converged(method: Method, out: OptimOutcome) -> OptResult<OptimOutcome> {
    if out.converged {
        Ok(out)
    } else {
        Err(OptError::NotConverged { method: method.label(), status: out.status })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::loglik_optimizer::traits::Tolerances;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Parsing of method names.
    // - The Sequence fallback from a failing L-BFGS run to Nelder–Mead.
    // - The aggregated error when every method fails.
    // -------------------------------------------------------------------------

    struct Failing;

    impl LogLikelihood for Failing {
        type Data = ();

        fn value(&self, _: &Theta, _: &()) -> OptResult<f64> {
            Err(OptError::ObjectiveFailed { text: "always".to_string() })
        }

        fn check(&self, _: &Theta, _: &()) -> OptResult<()> {
            Ok(())
        }
    }

    /// Negated Rosenbrock function; maximum at (1, 1).
    struct Banana;

    impl LogLikelihood for Banana {
        type Data = ();

        fn value(&self, t: &Theta, _: &()) -> OptResult<f64> {
            Ok(-(100.0 * (t[1] - t[0] * t[0]).powi(2) + (1.0 - t[0]).powi(2)))
        }

        fn check(&self, _: &Theta, _: &()) -> OptResult<()> {
            Ok(())
        }
    }

    #[test]
    // Purpose
    // -------
    // Method names parse with any case and separator style.
    fn method_parses_names() {
        assert_eq!("LBFGS".parse::<Method>().unwrap(), Method::Lbfgs);
        assert_eq!("Nelder-Mead".parse::<Method>().unwrap(), Method::NelderMead);
        assert_eq!("sequence".parse::<Method>().unwrap(), Method::Sequence);
        assert!(matches!("powell".parse::<Method>(), Err(OptError::InvalidMethod { .. })));
    }

    #[test]
    // Purpose
    // -------
    // When every minimizer fails, each attempt is reported.
    //
    // Given
    // -----
    // - An objective that always errors.
    //
    // Expect
    // ------
    // - `AllMinimizersFailed` with one entry per method.
    fn sequence_reports_every_failed_attempt() {
        let f = Failing;
        let err = maximize_with(
            &f,
            &array![0.0],
            &(),
            Method::Sequence,
            &MLEOptions::default(),
            &NelderMeadOptions::default(),
        )
        .unwrap_err();

        match err {
            OptError::AllMinimizersFailed { attempts } => {
                assert_eq!(attempts.len(), 2);
                assert!(attempts[0].starts_with("L-BFGS"));
                assert!(attempts[1].starts_with("Nelder-Mead"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // A single method returns its own error rather than an aggregate.
    fn single_method_returns_its_own_error() {
        let f = Failing;
        let err = maximize_with(
            &f,
            &array![0.0],
            &(),
            Method::NelderMead,
            &MLEOptions::default(),
            &NelderMeadOptions::default(),
        )
        .unwrap_err();

        assert_eq!(err, OptError::ObjectiveFailed { text: "always".to_string() });
    }

    #[test]
    // Purpose
    // -------
    // An iteration cap that stops L-BFGS early is treated as failure and the
    // chain moves on to the simplex.
    //
    // Given
    // -----
    // - The negated Rosenbrock function from `(-1.2, 1)` with L-BFGS capped
    //   at one iteration.
    //
    // Expect
    // ------
    // - The Sequence result comes from Nelder–Mead and sits near `(1, 1)`.
    fn sequence_falls_back_when_lbfgs_stops_early() {
        let f = Banana;
        let tols = Tolerances::new(Some(1e-12), None, Some(1)).unwrap();
        let opts = MLEOptions { tols, ..MLEOptions::default() };

        let out = maximize_with(
            &f,
            &array![-1.2, 1.0],
            &(),
            Method::Sequence,
            &opts,
            &NelderMeadOptions::default(),
        )
        .unwrap();

        assert!(out.converged);
        assert!((out.theta_hat[0] - 1.0).abs() < 1e-2);
        assert!((out.theta_hat[1] - 1.0).abs() < 1e-2);
        assert!(out.grad_norm.is_none());
    }
}
