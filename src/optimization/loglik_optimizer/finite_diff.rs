//! loglik_optimizer::finite_diff — finite-difference gradient and Hessian helpers.
//!
//! Purpose
//! -------
//! Provide finite-difference gradient and Hessian approximations around a
//! parameter vector, together with validation and symmetry cleanup, so the
//! optimizer and the uncertainty estimates can request derivatives of a
//! plain scalar objective.
//!
//! Key behaviors
//! -------------
//! - Compute forward-difference gradients with error capture and
//!   post-hoc validation via [`run_fd_diff`].
//! - Construct central-difference Hessians directly from function values
//!   via [`compute_hessian_nograd`], with per-coordinate steps scaled to the
//!   parameter magnitude.
//! - Enforce symmetry of Hessian matrices in-place using
//!   [`symmetrize_hess`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Any error raised by the objective during gradient differencing is
//!   routed into the shared `closure_err` cell and treated as a hard failure.
//! - Hessians returned from this module satisfy [`validate_hessian`].
//!
//! Conventions
//! -----------
//! - Likelihood values are typically `O(10³)`; the Hessian step
//!   `h_i = step · max(|θ_i|, 1)` with `step ≈ 1e-4` keeps the rounding error
//!   `|f|·ε/h²` well below the curvature of interest. `finitediff`'s
//!   `sqrt(ε)` steps do not, which is why the Hessian is hand-rolled here.
//!
//! Testing notes
//! -------------
//! - Unit tests cover successful and failing gradient paths and Hessians of
//!   quadratic objectives with known curvature.
use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::{
        Grad, Theta,
        types::Hessian,
        validation::{validate_grad, validate_hessian},
    },
};
use argmin::core::Error;
use finitediff::FiniteDiff;
use ndarray::Array2;
use std::cell::RefCell;

/// Default relative step for [`compute_hessian_nograd`].
pub const HESSIAN_STEP: f64 = 1e-4;

/// run_fd_diff — forward-difference gradient with error capture and validation.
///
/// Clears `closure_err`, runs `forward_diff`, and turns a captured closure
/// error back into a real error.
///
/// # Errors
/// - The error captured from inside `func`, converted into `OptError`.
/// - `OptError::GradientDimMismatch` / `OptError::InvalidGradient` from
///   [`validate_grad`].
pub fn run_fd_diff<G: Fn(&Theta) -> f64>(
    theta: &Theta, func: &G, closure_err: &RefCell<Option<Error>>,
) -> OptResult<Grad> {
    closure_err.replace(None);
    let fd_grad = theta.forward_diff(func);
    let dim = theta.len();
    if let Some(err) = closure_err.take() {
        return Err(err.into());
    }
    validate_grad(&fd_grad, dim)?;
    Ok(fd_grad)
}

/// compute_hessian_nograd — central-difference Hessian from function values.
///
/// Parameters
/// ----------
/// - `f`: scalar objective `θ ↦ f(θ)`; evaluation errors abort the
///   computation.
/// - `theta`: point at which the Hessian is approximated.
/// - `step`: relative step; coordinate `i` uses `h_i = step · max(|θ_i|, 1)`.
///
/// Returns
/// -------
/// A symmetric `dim × dim` matrix with
/// `H_ii = (f(θ+h_i) − 2f(θ) + f(θ−h_i)) / h_i²` and the four-point rule
/// for off-diagonal entries.
///
/// Errors
/// ------
/// - `OptError::EmptyTheta` when `theta` has length zero.
/// - `OptError::InvalidSimplexStep` for a non-positive step.
/// - Any error returned by `f`.
/// - `OptError::InvalidHessian` when an entry is non-finite.
pub fn compute_hessian_nograd<F>(f: &F, theta: &Theta, step: f64) -> OptResult<Hessian>
where
    F: Fn(&Theta) -> OptResult<f64>,
{
    let dim = theta.len();
    if dim == 0 {
        return Err(OptError::EmptyTheta);
    }
    if !step.is_finite() || step <= 0.0 {
        return Err(OptError::InvalidSimplexStep {
            step,
            reason: "Hessian step must be finite and positive.",
        });
    }
    let h: Vec<f64> = theta.iter().map(|x| step * x.abs().max(1.0)).collect();
    let f0 = f(theta)?;
    let shifted = |moves: &[(usize, f64)]| -> OptResult<f64> {
        let mut x = theta.clone();
        for &(i, delta) in moves {
            x[i] += delta;
        }
        f(&x)
    };

    let mut hess = Array2::<f64>::zeros((dim, dim));
    for i in 0..dim {
        let fp = shifted(&[(i, h[i])])?;
        let fm = shifted(&[(i, -h[i])])?;
        hess[[i, i]] = (fp - 2.0 * f0 + fm) / (h[i] * h[i]);
        for j in 0..i {
            let fpp = shifted(&[(i, h[i]), (j, h[j])])?;
            let fpm = shifted(&[(i, h[i]), (j, -h[j])])?;
            let fmp = shifted(&[(i, -h[i]), (j, h[j])])?;
            let fmm = shifted(&[(i, -h[i]), (j, -h[j])])?;
            let value = (fpp - fpm - fmp + fmm) / (4.0 * h[i] * h[j]);
            hess[[i, j]] = value;
            hess[[j, i]] = value;
        }
    }
    validate_hessian(&hess, dim)?;
    symmetrize_hess(&mut hess);
    Ok(hess)
}

// ---- Helper methods ----

/// symmetrize_hess — enforce symmetry of a Hessian matrix in-place.
///
/// Replaces each off-diagonal pair `(i, j)` / `(j, i)` with their average;
/// the diagonal is left untouched.
pub fn symmetrize_hess(hess: &mut Hessian) {
    for i in 0..hess.nrows() {
        for j in 0..i {
            let avg = 0.5 * (hess[[i, j]] + hess[[j, i]]);
            hess[[i, j]] = avg;
            hess[[j, i]] = avg;
        }
    }
}
