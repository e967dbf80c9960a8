//! aptinf — profiled-likelihood inference for template-based searches.
//!
//! Purpose
//! -------
//! Build likelihoods from statistical terms bound to named parameters and
//! data, profile them over nuisance parameters, and compute the
//! likelihood-ratio test statistic `chi2 = 2 (max_llh - profiled_llh)` for
//! scans and toy Monte Carlo ensembles.
//!
//! Key behaviors
//! -------------
//! - `config`: process-wide option registry, option declarations, and
//!   N-dimensional histogram templates used as event densities.
//! - `model`: Poisson, Gaussian and unbinned template terms, and the aliases
//!   that feed them.
//! - `likelihood`: composite, profiled and combined likelihoods.
//! - `likelihoods`: ready-made likelihoods (the three-source demo).
//! - `optimization`: maximizers (L-BFGS, Nelder–Mead, fallback chain).
//! - `inference`: standard errors, scans, toy ensembles, thresholds.
//! - `parallel`: ordered, optionally pooled task execution.
//! - `utils`: file resolution, JSON loading, timing.
//!
//! Invariants & assumptions
//! ------------------------
//! - Parameters are named and kept in sorted maps; vectors handed to the
//!   optimizers follow that order.
//! - Library code logs through the `log` facade and never installs a
//!   logger; the `aptinf-scan` binary installs a `tracing` subscriber.
//!
//! Downstream usage
//! ----------------
//! ```no_run
//! use aptinf::config::set_global_config;
//! use aptinf::likelihoods::DemoLikelihood;
//! use aptinf::model::ParamMap;
//! use rand::SeedableRng;
//!
//! set_global_config([("url_base", "/data/templates")]);
//! let mut llh = DemoLikelihood::new()?;
//! println!("{}", llh.view());
//!
//! let truth: ParamMap = [("lg_er_rate", 2.0), ("lg_nr_rate", 1.0), ("lg_sig_mul", 0.0)]
//!     .into_iter()
//!     .map(|(k, v)| (k.to_string(), v))
//!     .collect();
//! let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(1);
//! llh.set_data_from_toymc(&truth, &mut rng)?;
//! llh.set_max_loglikelihood(&truth)?;
//! # Ok::<(), aptinf::likelihood::LikelihoodError>(())
//! ```

pub mod config;
pub mod inference;
pub mod likelihood;
pub mod likelihoods;
pub mod model;
pub mod optimization;
pub mod parallel;
pub mod utils;
