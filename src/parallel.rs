//! parallel — run a pipeline over many independent tasks.
//!
//! Purpose
//! -------
//! Toy ensembles and parameter scans evaluate the same pipeline over many
//! task identifiers. [`compute_many`] runs them serially for
//! `n_threads == 1` and on a dedicated rayon pool otherwise, with an
//! optional `indicatif` progress bar.
//!
//! Invariants & assumptions
//! ------------------------
//! - Results keep task order regardless of the thread count.
//! - The first error aborts the run and is returned; tasks already running
//!   finish but their results are dropped.
//! - `n_threads == 0` uses rayon's default (one thread per core).
use crate::inference::errors::{InferenceError, InferenceResult};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;

/// Thread count and progress display for [`compute_many`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParallelOptions {
    pub n_threads: usize,
    pub progress: bool,
}

impl Default for ParallelOptions {
    fn default() -> Self {
        Self { n_threads: 1, progress: false }
    }
}

impl ParallelOptions {
    pub fn new(n_threads: usize, progress: bool) -> Self {
        Self { n_threads, progress }
    }
}

/// Apply `pipeline` to every task.
///
/// # Errors
/// - [`InferenceError::ThreadPool`] if the pool cannot be built.
/// - The first error returned by `pipeline`.
pub fn compute_many<T, R, F>(tasks: &[T], opts: &ParallelOptions, pipeline: F) -> InferenceResult<Vec<R>>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> InferenceResult<R> + Sync,
{
    let bar = progress_bar(tasks.len(), opts);
    let run = |task: &T| {
        let out = pipeline(task);
        bar.inc(1);
        out
    };

    let results = if opts.n_threads == 1 {
        tasks.iter().map(run).collect()
    } else {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(opts.n_threads)
            .build()
            .map_err(|e| InferenceError::ThreadPool { text: e.to_string() })?;
        pool.install(|| tasks.par_iter().map(run).collect())
    };
    bar.finish_and_clear();
    results
}

fn progress_bar(len: usize, opts: &ParallelOptions) -> ProgressBar {
    if !opts.progress {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(len as u64);
    let style = ProgressStyle::default_bar()
        .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} ({percent}%) {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##-");
    bar.set_style(style);
    match opts.n_threads {
        1 => bar.set_message("computing on one core"),
        0 => bar.set_message("computing on all cores"),
        n => bar.set_message(format!("computing on {n} cores")),
    }
    bar
}
