//! loglik_optimizer::builders — solver construction helpers.
//!
//! Purpose
//! -------
//! Provide small builders for the solvers used by the log-likelihood
//! optimizer: L-BFGS with either line search, and the Nelder–Mead simplex.
//! These helpers hide Argmin’s generic wiring and apply crate-level options.
//!
//! Conventions
//! -----------
//! - L-BFGS builders do **not** set the initial parameter vector or
//!   `max_iters`; these are runtime concerns applied by the runner.
//! - The simplex builder owns its initial vertices, since Nelder–Mead has no
//!   separate initial parameter.
//! - Errors are always reported via [`OptResult`].
use argmin::solver::quasinewton::LBFGS;

use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::{
        traits::{MLEOptions, NelderMeadOptions},
        types::{
            Cost, DEFAULT_LBFGS_MEM, Grad, HagerZhangLS, LbfgsHagerZhang, LbfgsMoreThuente,
            MoreThuenteLS, Simplex, Theta,
        },
    },
};

/// Construct L-BFGS with Hager–Zhang line search and the tolerances in `opts`.
///
/// # Errors
/// - `OptError` (via `From<argmin::core::Error>`) when Argmin rejects a tolerance.
pub fn build_optimizer_hager_zhang(opts: &MLEOptions) -> OptResult<LbfgsHagerZhang> {
    let hager_zhang = HagerZhangLS::new();
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    let lbfgs = LbfgsHagerZhang::new(hager_zhang, mem);
    configure_lbfgs(lbfgs, opts)
}

/// Construct L-BFGS with More–Thuente line search and the tolerances in `opts`.
///
/// # Errors
/// - `OptError` (via `From<argmin::core::Error>`) when Argmin rejects a tolerance.
pub fn build_optimizer_more_thuente(opts: &MLEOptions) -> OptResult<LbfgsMoreThuente> {
    let more_thuente = MoreThuenteLS::new();
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    let lbfgs = LbfgsMoreThuente::new(more_thuente, mem);
    configure_lbfgs(lbfgs, opts)
}

/// Apply optional gradient and cost-change tolerances to an L-BFGS solver.
///
/// When a tolerance is `None`, Argmin’s default remains in effect.
pub fn configure_lbfgs<L>(
    mut solver: LBFGS<L, Theta, Grad, Cost>, opts: &MLEOptions,
) -> OptResult<LBFGS<L, Theta, Grad, Cost>> {
    if let Some(g) = opts.tols.tol_grad {
        solver = solver.with_tolerance_grad(g)?;
    }
    if let Some(c) = opts.tols.tol_cost {
        solver = solver.with_tolerance_cost(c)?;
    }
    Ok(solver)
}

/// Starting vertices of a Nelder–Mead simplex around `theta0`.
///
/// Vertex `0` is `theta0`; vertex `i + 1` moves coordinate `i` by
/// `max(step · |θ₀ᵢ|, step)`.
///
/// # Errors
/// - [`OptError::EmptyTheta`] for a zero-length start.
pub fn simplex_vertices(theta0: &Theta, opts: &NelderMeadOptions) -> OptResult<Vec<Theta>> {
    if theta0.is_empty() {
        return Err(OptError::EmptyTheta);
    }
    let mut vertices = Vec::with_capacity(theta0.len() + 1);
    vertices.push(theta0.clone());
    for i in 0..theta0.len() {
        let mut vertex = theta0.clone();
        vertex[i] += (opts.initial_step * theta0[i].abs()).max(opts.initial_step);
        vertices.push(vertex);
    }
    Ok(vertices)
}

/// Construct a Nelder–Mead simplex from its starting vertices.
///
/// Argmin evaluates every vertex during initialization and panics on a
/// failed evaluation, so callers check the vertices first.
///
/// # Errors
/// - [`OptError::EmptyTheta`] for an empty vertex list.
/// - `OptError` (via `From<argmin::core::Error>`) when Argmin rejects the
///   simplex tolerance.
pub fn build_nelder_mead(vertices: Vec<Theta>, opts: &NelderMeadOptions) -> OptResult<Simplex> {
    if vertices.is_empty() {
        return Err(OptError::EmptyTheta);
    }
    Ok(Simplex::new(vertices).with_sd_tolerance(opts.sd_tolerance)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::loglik_optimizer::traits::{LineSearcher, Tolerances};
    use ndarray::{Array1, array};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Construction of L-BFGS solvers with both line searches.
    // - Propagation of `lbfgs_mem` (Some vs None).
    // - Construction of the Nelder–Mead simplex.
    //
    // They intentionally DO NOT cover end-to-end executor behavior, which is
    // tested in the runner and fallback layers.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Both line-search builders succeed with default and explicit memory.
    fn lbfgs_builders_accept_default_and_explicit_memory() {
        let tols = Tolerances::new(Some(1e-6), Some(1e-8), Some(50)).unwrap();
        let default_mem = MLEOptions::new(tols, LineSearcher::HagerZhang, false, None).unwrap();
        let explicit_mem = MLEOptions::new(tols, LineSearcher::MoreThuente, false, Some(11)).unwrap();

        assert!(build_optimizer_hager_zhang(&default_mem).is_ok());
        assert!(build_optimizer_more_thuente(&explicit_mem).is_ok());
    }

    #[test]
    // Purpose
    // -------
    // Absent tolerances leave Argmin defaults in place.
    fn configure_lbfgs_respects_absent_tolerances() {
        let raw = LBFGS::new(MoreThuenteLS::new(), DEFAULT_LBFGS_MEM);
        let tols = Tolerances::new(None, None, Some(50)).unwrap();
        let opts = MLEOptions::new(tols, LineSearcher::MoreThuente, false, None).unwrap();

        assert!(configure_lbfgs(raw, &opts).is_ok());
    }

    #[test]
    // Purpose
    // -------
    // Vertices span the start, including zero coordinates, and a simplex
    // builds from them.
    //
    // Given
    // -----
    // - `θ₀ = (0, 2)` with the default relative step of `0.1`.
    //
    // Expect
    // ------
    // - Vertices `θ₀`, `θ₀ + 0.1·e₀` and `θ₀ + 0.2·e₁`; the build succeeds.
    fn simplex_vertices_span_start() {
        let opts = NelderMeadOptions::default();
        let vertices = simplex_vertices(&array![0.0, 2.0], &opts).unwrap();

        assert_eq!(vertices.len(), 3);
        assert_eq!(vertices[0], array![0.0, 2.0]);
        assert!((vertices[1][0] - 0.1).abs() < 1e-12);
        assert!((vertices[2][1] - 2.2).abs() < 1e-12);
        assert!(build_nelder_mead(vertices, &opts).is_ok());
    }

    #[test]
    // Purpose
    // -------
    // An empty start cannot span a simplex.
    fn empty_start_is_rejected() {
        let opts = NelderMeadOptions::default();
        assert!(matches!(simplex_vertices(&Array1::zeros(0), &opts), Err(OptError::EmptyTheta)));
        assert!(matches!(build_nelder_mead(Vec::new(), &opts), Err(OptError::EmptyTheta)));
    }
}
