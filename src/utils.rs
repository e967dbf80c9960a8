//! utils — file resolution, JSON loading, timing, and option extraction.
//!
//! Purpose
//! -------
//! Small helpers shared by the configuration layer and the `aptinf-scan`
//! binary.
//!
//! Key behaviors
//! -------------
//! - [`get_file_path`] resolves a resource name: absolute paths as given,
//!   then `url_base` from the global registry, then the working directory.
//! - [`load_json`] reads a resolved JSON file into a `serde_json::Value`.
//! - [`timeit`] runs a closure and logs its wall time at `debug` level.
//! - [`extract_mle_opts`] turns loose optional settings (as they arrive from
//!   a command line) into validated [`MLEOptions`].
use crate::config::{
    errors::{ConfigError, ConfigResult},
    registry::{URL_BASE, get_global_config},
};
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::traits::{LineSearcher, MLEOptions, Tolerances},
};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Instant;

/// Find the full path to a resource file.
///
/// Resolution order:
/// 1. an absolute `fname` is returned unchanged;
/// 2. `url_base` (when set to an absolute directory) joined with `fname`, if
///    that file exists;
/// 3. `fname` relative to the working directory, if it exists.
///
/// # Errors
/// [`ConfigError::FileNotFound`] when no location holds the file.
pub fn get_file_path(fname: &str) -> ConfigResult<PathBuf> {
    let path = Path::new(fname);
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }

    if let Some(base) = get_global_config(URL_BASE).as_ref().and_then(|v| v.as_str().map(PathBuf::from)) {
        if base.is_absolute() {
            let candidate = base.join(path);
            if candidate.exists() {
                log::warn!("Load {fname} successfully from {}", candidate.display());
                return Ok(candidate);
            }
        }
    }

    if path.exists() {
        return Ok(path.to_path_buf());
    }
    Err(ConfigError::FileNotFound { name: fname.to_string() })
}

/// Load a JSON document after resolving `fname` with [`get_file_path`].
pub fn load_json(fname: &str) -> ConfigResult<serde_json::Value> {
    let path = get_file_path(fname)?;
    let shown = path.display().to_string();
    let text = std::fs::read_to_string(&path)
        .map_err(|e| ConfigError::Io { path: shown.clone(), text: e.to_string() })?;
    serde_json::from_str(&text).map_err(|e| ConfigError::Parse { path: shown, text: e.to_string() })
}

/// Run `f`, logging `label` and the elapsed time in milliseconds.
pub fn timeit<T>(label: &str, f: impl FnOnce() -> T) -> T {
    log::debug!("{label} starts.");
    let start = Instant::now();
    let out = f();
    log::debug!("{label} ends! Time cost = {:.2} msec.", start.elapsed().as_secs_f64() * 1e3);
    out
}

/// Build validated optimizer options from optional settings.
///
/// Absent settings fall back to [`MLEOptions::default`].
pub fn extract_mle_opts(
    tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>,
    line_searcher: Option<&str>, lbfgs_mem: Option<usize>,
) -> OptResult<MLEOptions> {
    let defaults = MLEOptions::default();
    let tols = Tolerances::new(
        tol_grad.or(defaults.tols.tol_grad),
        tol_cost.or(defaults.tols.tol_cost),
        max_iter.or(defaults.tols.max_iter),
    )?;
    let ls = match line_searcher {
        Some(name) => LineSearcher::from_str(name)?,
        None => defaults.line_searcher,
    };
    MLEOptions::new(tols, ls, false, lbfgs_mem)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::registry::set_global_config;
    use crate::optimization::errors::OptError;

    #[test]
    // Purpose
    // -------
    // Absolute paths are returned without touching the file system.
    fn absolute_paths_pass_through() {
        let p = std::env::temp_dir().join("definitely-not-there.json");
        assert_eq!(get_file_path(p.to_str().unwrap()).unwrap(), p);
    }

    #[test]
    // Purpose
    // -------
    // Relative names resolve against `url_base`; unknown names fail.
    //
    // Given
    // -----
    // - A temporary directory registered as `url_base` holding `sub/a.json`.
    //
    // Expect
    // ------
    // - `sub/a.json` resolves inside the directory and loads as JSON.
    // - A name present nowhere gives `FileNotFound`.
    fn relative_names_use_url_base() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("sub/a.json"), r#"{"k": 2}"#).unwrap();
        set_global_config([(URL_BASE, dir.path().to_path_buf())]);

        let resolved = get_file_path("sub/a.json").unwrap();
        let json = load_json("sub/a.json").unwrap();

        assert_eq!(resolved, dir.path().join("sub/a.json"));
        assert_eq!(json["k"], 2);
        assert_eq!(
            get_file_path("no/such/file.json").unwrap_err(),
            ConfigError::FileNotFound { name: "no/such/file.json".to_string() }
        );
    }

    #[test]
    // Purpose
    // -------
    // `timeit` returns the closure's value.
    fn timeit_returns_value() {
        assert_eq!(timeit("add", || 2 + 2), 4);
    }

    #[test]
    // Purpose
    // -------
    // Missing settings take defaults; invalid ones surface as `OptError`.
    fn extract_mle_opts_fills_defaults_and_validates() {
        let opts = extract_mle_opts(None, None, Some(50), Some("hagerzhang"), None).unwrap();
        assert_eq!(opts.tols.max_iter, Some(50));
        assert_eq!(opts.tols.tol_grad, MLEOptions::default().tols.tol_grad);
        assert_eq!(opts.line_searcher, LineSearcher::HagerZhang);

        assert!(matches!(
            extract_mle_opts(Some(-1.0), None, None, None, None),
            Err(OptError::InvalidTolGrad { .. })
        ));
    }
}
