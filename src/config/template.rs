//! config::template — N-dimensional histogram templates.
//!
//! Purpose
//! -------
//! Represent a binned Monte-Carlo shape as a probability density that can be
//! evaluated at arbitrary event coordinates and sampled from. Templates are
//! the building blocks of the unbinned PDF terms.
//!
//! Key behaviors
//! -------------
//! - `norm` is the sum of all bin counts; it is the expected number of
//!   events the template stands for and is the only field [`Template::scaled`]
//!   changes.
//! - The density grid is `counts / norm / bin_volume`, placed at the bin
//!   centres. [`Template::pdf`] interpolates it multilinearly, extrapolates
//!   linearly beyond the outermost centres, and clips the result below at
//!   [`DENSITY_FLOOR`].
//! - [`Template::sample`] picks a bin with probability proportional to its
//!   counts and draws a uniform position inside it.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every axis has at least one bin; edges are finite and strictly
//!   increasing.
//! - Counts are finite, non-negative, stored row-major (last axis fastest),
//!   and have a positive total.
//!
//! Conventions
//! -----------
//! - Events are rows of an `n × d` array, `d` being the template dimension.
//! - On disk a template is one entry of a JSON document
//!   `{"histograms": {name: {"axes": [[edges]], "counts": [...]}}}`.
use crate::config::errors::{ConfigError, ConfigResult};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use rand::{
    Rng, RngCore,
    distributions::{Distribution, WeightedIndex},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Lower clip applied to every density value so its logarithm is finite.
pub const DENSITY_FLOOR: f64 = 1e-99;

/// One histogram as stored in a template file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramRecord {
    pub axes: Vec<Vec<f64>>,
    pub counts: Vec<f64>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TemplateFile {
    histograms: BTreeMap<String, HistogramRecord>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    name: String,
    edges: Vec<Vec<f64>>,
    centers: Vec<Vec<f64>>,
    shape: Vec<usize>,
    counts: Vec<f64>,
    density: Vec<f64>,
    norm: f64,
}

impl Template {
    /// Build a template from bin edges per axis and row-major counts.
    ///
    /// # Errors
    /// [`ConfigError::InvalidTemplate`] when an axis has fewer than two
    /// edges, edges are non-finite or not strictly increasing, the count
    /// length does not match the bin grid, or counts are negative,
    /// non-finite, or sum to zero.
    pub fn from_histogram(
        name: impl Into<String>, edges: Vec<Vec<f64>>, counts: Vec<f64>,
    ) -> ConfigResult<Self> {
        let name = name.into();
        let invalid = |reason: String| ConfigError::InvalidTemplate { name: name.clone(), reason };

        if edges.is_empty() {
            return Err(invalid("template needs at least one axis".to_string()));
        }
        for (axis, e) in edges.iter().enumerate() {
            if e.len() < 2 {
                return Err(invalid(format!(
                    "axis {axis} requires at least 2 bin edges, got {}",
                    e.len()
                )));
            }
            if let Some(x) = e.iter().find(|x| !x.is_finite()) {
                return Err(invalid(format!("axis {axis} has non-finite edge {x}")));
            }
            if let Some(i) = (1..e.len()).find(|&i| e[i - 1] >= e[i]) {
                return Err(invalid(format!(
                    "axis {axis} edges must be strictly increasing, got edges[{}]={} and edges[{i}]={}",
                    i - 1,
                    e[i - 1],
                    e[i]
                )));
            }
        }

        let shape: Vec<usize> = edges.iter().map(|e| e.len() - 1).collect();
        let n_bins: usize = shape.iter().product();
        if counts.len() != n_bins {
            return Err(invalid(format!(
                "counts length mismatch: expected {n_bins}, got {}",
                counts.len()
            )));
        }
        if let Some((i, w)) = counts.iter().enumerate().find(|(_, w)| !w.is_finite() || **w < 0.0) {
            return Err(invalid(format!("counts[{i}] must be finite and >=0, got {w}")));
        }
        let norm: f64 = counts.iter().sum();
        if !(norm.is_finite() && norm > 0.0) {
            return Err(invalid(format!("total counts must be finite and >0, got {norm}")));
        }

        let centers: Vec<Vec<f64>> =
            edges.iter().map(|e| e.windows(2).map(|w| 0.5 * (w[0] + w[1])).collect()).collect();
        let density = counts
            .iter()
            .enumerate()
            .map(|(flat, &c)| {
                let volume: f64 = unravel(flat, &shape)
                    .iter()
                    .zip(&edges)
                    .map(|(&i, e)| e[i + 1] - e[i])
                    .product();
                c / norm / volume
            })
            .collect();

        Ok(Self { name, edges, centers, shape, counts, density, norm })
    }

    /// Load histogram `hist_name` from a JSON template file.
    ///
    /// An empty `hist_name` selects the only histogram of a single-entry file.
    ///
    /// # Errors
    /// - [`ConfigError::Io`] / [`ConfigError::Parse`] for unreadable files.
    /// - [`ConfigError::HistogramNotFound`] when the name is absent or
    ///   ambiguous.
    /// - Any validation error of [`Template::from_histogram`].
    pub fn load(path: impl AsRef<Path>, hist_name: &str) -> ConfigResult<Self> {
        let path = path.as_ref();
        let shown = path.display().to_string();
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io { path: shown.clone(), text: e.to_string() })?;
        let mut file: TemplateFile = serde_json::from_str(&text)
            .map_err(|e| ConfigError::Parse { path: shown.clone(), text: e.to_string() })?;

        let key = if hist_name.is_empty() && file.histograms.len() == 1 {
            file.histograms.keys().next().cloned()
        } else {
            Some(hist_name.to_string())
        };
        let record = key
            .and_then(|k| file.histograms.remove(&k))
            .ok_or_else(|| ConfigError::HistogramNotFound {
                hist_name: hist_name.to_string(),
                path: shown.clone(),
            })?;
        let name = path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or(shown);
        Self::from_histogram(name, record.axes, record.counts)
    }

    /// Write this template as the single histogram `hist_name` of a JSON file.
    pub fn save(&self, path: impl AsRef<Path>, hist_name: &str) -> ConfigResult<()> {
        let path = path.as_ref();
        let shown = path.display().to_string();
        let mut histograms = BTreeMap::new();
        histograms.insert(hist_name.to_string(), self.to_record());
        let text = serde_json::to_string(&TemplateFile { histograms })
            .map_err(|e| ConfigError::Parse { path: shown.clone(), text: e.to_string() })?;
        std::fs::write(path, text).map_err(|e| ConfigError::Io { path: shown, text: e.to_string() })
    }

    pub fn to_record(&self) -> HistogramRecord {
        HistogramRecord { axes: self.edges.clone(), counts: self.counts.clone() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ndim(&self) -> usize {
        self.edges.len()
    }

    pub fn norm(&self) -> f64 {
        self.norm
    }

    pub fn edges(&self) -> &[Vec<f64>] {
        &self.edges
    }

    /// Copy with `norm` multiplied by `factor`; the shape is unchanged.
    pub fn scaled(&self, factor: f64) -> Self {
        let mut out = self.clone();
        out.norm *= factor;
        out
    }

    /// Density at each event (row) of `events`.
    ///
    /// # Errors
    /// [`ConfigError::DimensionMismatch`] if `events.ncols() != self.ndim()`.
    pub fn pdf(&self, events: ArrayView2<'_, f64>) -> ConfigResult<Array1<f64>> {
        if events.ncols() != self.ndim() {
            return Err(ConfigError::DimensionMismatch {
                expected: self.ndim(),
                found: events.ncols(),
            });
        }
        Ok(events.rows().into_iter().map(|row| self.interpolate(row)).collect())
    }

    /// Draw `n` events as an `n × d` array.
    pub fn sample(&self, n: usize, rng: &mut dyn RngCore) -> Array2<f64> {
        let d = self.ndim();
        let mut out = Array2::zeros((n, d));
        if n == 0 {
            return out;
        }
        // Construction guarantees a positive, finite total.
        let Ok(bins) = WeightedIndex::new(&self.counts) else {
            return out;
        };
        for mut row in out.rows_mut() {
            let flat = bins.sample(rng);
            for (axis, &i) in unravel(flat, &self.shape).iter().enumerate() {
                let (lo, hi) = (self.edges[axis][i], self.edges[axis][i + 1]);
                row[axis] = lo + (hi - lo) * rng.gen::<f64>();
            }
        }
        out
    }

    // ---- Helper methods ----

    fn interpolate(&self, x: ArrayView1<'_, f64>) -> f64 {
        let d = self.ndim();
        // Per axis: lower grid index and fractional offset (may fall outside [0, 1]).
        let mut lower = Vec::with_capacity(d);
        let mut frac = Vec::with_capacity(d);
        for (axis, &xi) in x.iter().enumerate() {
            let c = &self.centers[axis];
            if c.len() == 1 {
                lower.push(0);
                frac.push(0.0);
                continue;
            }
            let i = c.partition_point(|&ci| ci <= xi).saturating_sub(1).min(c.len() - 2);
            lower.push(i);
            frac.push((xi - c[i]) / (c[i + 1] - c[i]));
        }

        let mut value = 0.0;
        'corners: for corner in 0..(1usize << d) {
            let mut weight = 1.0;
            let mut flat = 0;
            for axis in 0..d {
                let upper = corner >> axis & 1 == 1;
                if upper && self.centers[axis].len() == 1 {
                    continue 'corners;
                }
                let (idx, w) =
                    if upper { (lower[axis] + 1, frac[axis]) } else { (lower[axis], 1.0 - frac[axis]) };
                weight *= w;
                flat = flat * self.shape[axis] + idx;
            }
            value += weight * self.density[flat];
        }
        value.max(DENSITY_FLOOR)
    }
}

/// Row-major multi-index of `flat` in a grid of `shape`.
fn unravel(mut flat: usize, shape: &[usize]) -> Vec<usize> {
    let mut idx = vec![0; shape.len()];
    for (slot, &n) in idx.iter_mut().zip(shape).rev() {
        *slot = flat % n;
        flat /= n;
    }
    idx
}
