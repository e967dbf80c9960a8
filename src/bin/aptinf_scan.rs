//! aptinf-scan — fit a toy dataset with the demo likelihood and scan the
//! signal multiplier.

use anyhow::{Context, Result, bail};
use aptinf::config::{ConfigValue, URL_BASE, set_global_config};
use aptinf::inference::{ScanPoint, asymptotic_critical_value, chi2_scan_with, linear_grid};
use aptinf::likelihood::ProfileOptions;
use aptinf::likelihoods::DemoLikelihood;
use aptinf::model::ParamMap;
use aptinf::optimization::loglik_optimizer::Method;
use aptinf::parallel::ParallelOptions;
use aptinf::utils::{extract_mle_opts, load_json, timeit};
use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

const POI: &str = "lg_sig_mul";

#[derive(Parser)]
#[command(name = "aptinf-scan")]
#[command(about = "Profile likelihood-ratio scan of the demo likelihood on a toy dataset")]
#[command(version)]
struct Cli {
    /// Log verbosity level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: tracing::Level,

    /// JSON object merged into the global configuration
    #[arg(long)]
    config: Option<String>,

    /// Directory template paths are resolved against
    #[arg(long)]
    url_base: Option<PathBuf>,

    /// Toy truth as comma-separated name=value pairs
    #[arg(
        long,
        value_delimiter = ',',
        value_parser = parse_param,
        default_value = "lg_er_rate=2,lg_nr_rate=1,lg_sig_mul=0"
    )]
    truth: Vec<(String, f64)>,

    /// Seed of the toy dataset
    #[arg(long, default_value = "0")]
    seed: u64,

    /// First scanned value of lg_sig_mul
    #[arg(long, default_value = "-2.0", allow_hyphen_values = true)]
    start: f64,

    /// Last scanned value of lg_sig_mul
    #[arg(long, default_value = "1.0", allow_hyphen_values = true)]
    stop: f64,

    /// Number of scan points
    #[arg(long, default_value = "31")]
    points: usize,

    /// Maximizer: lbfgs, neldermead or sequence
    #[arg(long, default_value = "sequence")]
    method: String,

    /// Iteration cap of each maximizer run
    #[arg(long)]
    max_iter: Option<usize>,

    /// Worker threads for the scan (0 = one per core)
    #[arg(long, default_value = "1")]
    threads: usize,

    /// Output file for the scan (pretty JSON). Defaults to stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Serialize)]
struct ScanReport {
    poi: &'static str,
    truth: ParamMap,
    seed: u64,
    max_loglikelihood: Option<f64>,
    bestfit: ParamMap,
    /// Wilks 90% threshold for one parameter of interest.
    threshold_90: f64,
    points: Vec<ScanPoint>,
}

fn parse_param(s: &str) -> Result<(String, f64), String> {
    let (name, value) = s.split_once('=').ok_or_else(|| format!("expected name=value, got '{s}'"))?;
    let value: f64 = value.trim().parse().map_err(|e| format!("bad value in '{s}': {e}"))?;
    Ok((name.trim().to_string(), value))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt().with_max_level(cli.log_level).with_target(false).with_writer(std::io::stderr).init();

    if let Some(config) = &cli.config {
        let value = load_json(config)?;
        let options: BTreeMap<String, ConfigValue> =
            serde_json::from_value(value).context("config file must be a JSON object of options")?;
        set_global_config(options);
    }
    if let Some(dir) = &cli.url_base {
        set_global_config([(URL_BASE, ConfigValue::from(dir.clone()))]);
    }

    let truth: ParamMap = cli.truth.iter().cloned().collect();
    for name in DemoLikelihood::PARAMS {
        if !truth.contains_key(name) {
            bail!("--truth is missing {name}");
        }
    }

    let options = ProfileOptions {
        method: cli.method.parse::<Method>()?,
        mle: extract_mle_opts(None, None, cli.max_iter, None, None)?,
        ..ProfileOptions::default()
    };
    let mut llh = timeit("building likelihood", DemoLikelihood::new)?.with_options(options);
    eprintln!("{}", llh.view());

    let mut rng = ChaCha8Rng::seed_from_u64(cli.seed);
    llh.set_data_from_toymc(&truth, &mut rng)?;
    let bestfit = timeit("global fit", || llh.set_max_loglikelihood(&truth))?;
    tracing::info!(?bestfit, "global fit done");

    let nuisance: ParamMap = bestfit.iter().filter(|(k, _)| k.as_str() != POI).map(|(k, v)| (k.clone(), *v)).collect();
    let grid = linear_grid(cli.start, cli.stop, cli.points)?;
    let points = timeit("scan", || {
        chi2_scan_with(&llh, POI, &grid, &nuisance, &ParallelOptions::new(cli.threads, cli.output.is_some()))
    })?;

    let report = ScanReport {
        poi: POI,
        truth,
        seed: cli.seed,
        max_loglikelihood: llh.max_loglikelihood(),
        bestfit,
        threshold_90: asymptotic_critical_value(1.0, 0.9)?,
        points,
    };
    let text = serde_json::to_string_pretty(&report)?;
    match &cli.output {
        Some(path) => std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))?,
        None => println!("{text}"),
    }
    Ok(())
}
