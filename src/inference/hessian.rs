//! inference::hessian — standard errors from the observed information.
//!
//! Purpose
//! -------
//! Turn a log-likelihood evaluated around its maximum into a covariance
//! estimate. The Hessian comes from central differences of function values
//! only, so any likelihood (including ones with kinks from template
//! interpolation) can be used without an analytic gradient.
//!
//! Key behaviors
//! -------------
//! - [`observed_information`]: `J(θ̂) = -∇²ℓ(θ̂)` via
//!   [`compute_hessian_nograd`].
//! - [`pseudo_inverse`]: Moore–Penrose inverse of a symmetric matrix from its
//!   eigendecomposition, discarding eigenvalues `<= EIGEN_EPS`.
//! - [`calc_standard_errors`]: `sqrt(diag(J⁺))`.
//!
//! Invariants & assumptions
//! ------------------------
//! - `θ̂` is a maximum of `ℓ`; at a saddle or a flat direction the discarded
//!   eigenvalues contribute nothing, so the corresponding variances are
//!   understated rather than negative.
//!
//! Conventions
//! -----------
//! - Hessians are on the **total** log-likelihood scale (a sum over events,
//!   not an average), so the returned errors are directly the parameter
//!   uncertainties.
//! - No explicit matrix inverse is formed.
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        Theta,
        finite_diff::{HESSIAN_STEP, compute_hessian_nograd},
    },
};
use nalgebra::DMatrix;
use ndarray::{Array1, Array2};

/// Eigenvalues at or below this are treated as zero.
pub const EIGEN_EPS: f64 = 1e-12;

/// Observed information `-∇²ℓ(θ̂)` of a log-likelihood.
pub fn observed_information<F>(f: &F, theta_hat: &Theta) -> OptResult<Array2<f64>>
where
    F: Fn(&Theta) -> OptResult<f64>,
{
    let hess = compute_hessian_nograd(f, theta_hat, HESSIAN_STEP)?;
    Ok(-hess)
}

/// Moore–Penrose inverse of a symmetric matrix.
///
/// With `J = Q Λ Qᵀ`, returns `Σ_{k: λ_k > EIGEN_EPS} q_k q_kᵀ / λ_k`.
pub fn pseudo_inverse(sym: &Array2<f64>) -> Array2<f64> {
    let n = sym.nrows();
    let mut mat = DMatrix::<f64>::zeros(n, n);
    fill_dmatrix(sym, &mut mat);
    let eigen = mat.symmetric_eigen();
    let q = eigen.eigenvectors;

    let mut inv = Array2::<f64>::zeros((n, n));
    for (k, &lambda) in eigen.eigenvalues.iter().enumerate() {
        if lambda <= EIGEN_EPS {
            continue;
        }
        for i in 0..n {
            for j in 0..n {
                inv[[i, j]] += q[(i, k)] * q[(j, k)] / lambda;
            }
        }
    }
    inv
}

/// calc_standard_errors — `sqrt(diag(J⁺))` at the maximum `θ̂` of `f`.
///
/// # Errors
/// Any error of the objective or of the Hessian validation.
///
/// # Examples
/// ```rust
/// # use ndarray::{Array1, array};
/// # use aptinf::inference::hessian::calc_standard_errors;
/// # use aptinf::optimization::errors::OptResult;
/// // ℓ(θ) = -2 θ₀² - ½ θ₁²  ⇒  J = diag(4, 1).
/// let f = |t: &Array1<f64>| -> OptResult<f64> { Ok(-2.0 * t[0] * t[0] - 0.5 * t[1] * t[1]) };
/// let se = calc_standard_errors(&f, &array![0.0, 0.0]).unwrap();
/// assert!((se[0] - 0.5).abs() < 1e-4);
/// assert!((se[1] - 1.0).abs() < 1e-4);
/// ```
pub fn calc_standard_errors<F>(f: &F, theta_hat: &Theta) -> OptResult<Array1<f64>>
where
    F: Fn(&Theta) -> OptResult<f64>,
{
    let info = observed_information(f, theta_hat)?;
    Ok(pseudo_inverse(&info).diag().mapv(f64::sqrt))
}

// ---- Helper methods ----

/// Copy a square `ndarray` matrix into a preallocated `DMatrix`.
fn fill_dmatrix(src: &Array2<f64>, dst: &mut DMatrix<f64>) {
    for ((i, j), &v) in src.indexed_iter() {
        dst[(i, j)] = v;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Copying from `ndarray` into `DMatrix`.
    // - Pseudo-inverses of full-rank and rank-deficient matrices.
    // - Standard errors of a correlated Gaussian log-likelihood.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // `fill_dmatrix` copies entries without modification.
    fn fill_dmatrix_copies_entries() {
        let src = array![[2.0, 0.5], [0.5, 1.0]];
        let mut dst = DMatrix::<f64>::zeros(2, 2);
        fill_dmatrix(&src, &mut dst);
        assert_eq!(dst[(0, 1)], 0.5);
        assert_eq!(dst[(1, 0)], 0.5);
        assert_eq!(dst[(1, 1)], 1.0);
    }

    #[test]
    // Purpose
    // -------
    // The pseudo-inverse inverts full-rank matrices and ignores null
    // directions of singular ones.
    //
    // Given
    // -----
    // - `[[2, 1], [1, 2]]` and `diag(4, 0)`.
    //
    // Expect
    // ------
    // - `[[2, -1], [-1, 2]] / 3` and `diag(0.25, 0)`.
    fn pseudo_inverse_full_and_deficient_rank() {
        let inv = pseudo_inverse(&array![[2.0, 1.0], [1.0, 2.0]]);
        let expected = array![[2.0, -1.0], [-1.0, 2.0]] / 3.0;
        for (a, b) in inv.iter().zip(expected.iter()) {
            assert!((a - b).abs() < 1e-12);
        }

        let inv = pseudo_inverse(&array![[4.0, 0.0], [0.0, 0.0]]);
        assert!((inv[[0, 0]] - 0.25).abs() < 1e-12);
        assert_eq!(inv[[1, 1]], 0.0);
    }

    #[test]
    // Purpose
    // -------
    // Standard errors of a bivariate Gaussian log-density recover its
    // marginal widths.
    //
    // Given
    // -----
    // - Covariance `Σ = [[4, 1], [1, 1]]`, i.e. `ℓ = -½ θᵀ Σ⁻¹ θ`, with
    //   `Σ⁻¹ = [[1, -1], [-1, 4]] / 3`.
    //
    // Expect
    // ------
    // - Standard errors `(2, 1)`.
    fn standard_errors_recover_marginal_widths() {
        let prec = array![[1.0, -1.0], [-1.0, 4.0]] / 3.0;
        let f = |t: &Theta| -> OptResult<f64> { Ok(-0.5 * t.dot(&prec.dot(t))) };

        let se = calc_standard_errors(&f, &array![0.3, -0.2]).unwrap();

        assert!((se[0] - 2.0).abs() < 1e-4);
        assert!((se[1] - 1.0).abs() < 1e-4);
    }
}
