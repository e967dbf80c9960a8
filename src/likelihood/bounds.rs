//! Soft parameter bounds.
//!
//! Optimizers run unconstrained, so ranges are enforced by a penalty that is
//! zero inside the range and falls off exponentially outside it.
use crate::likelihood::errors::{LikelihoodError, LikelihoodResult};
use crate::model::inputs::ParamMap;
use std::collections::BTreeMap;

/// Allowed `(lower, upper)` range per parameter name.
pub type ParamRange = BTreeMap<String, (f64, f64)>;

/// Check that every range is finite-or-infinite with `lower <= upper`.
pub fn validate_ranges(ranges: &ParamRange) -> LikelihoodResult<()> {
    for (name, &(lower, upper)) in ranges {
        if lower.is_nan() || upper.is_nan() || lower > upper {
            return Err(LikelihoodError::InvalidRange { name: name.clone(), lower, upper });
        }
    }
    Ok(())
}

/// `-exp(lo - v)` below the range, `-exp(v - hi)` above it, summed over
/// the ranged parameters present in `params`.
pub fn bound_penalty(ranges: &ParamRange, params: &ParamMap) -> f64 {
    params
        .iter()
        .filter_map(|(name, &v)| ranges.get(name).map(|&(lo, hi)| (v, lo, hi)))
        .map(|(v, lo, hi)| {
            if v < lo {
                -(lo - v).exp()
            } else if v > hi {
                -(v - hi).exp()
            } else {
                0.0
            }
        })
        .sum()
}

/// Intersection of two range maps: tighter of the two for shared names.
pub fn intersect_ranges(into: &mut ParamRange, other: &ParamRange) {
    for (name, &(lo, hi)) in other {
        into.entry(name.clone())
            .and_modify(|r| *r = (r.0.max(lo), r.1.min(hi)))
            .or_insert((lo, hi));
    }
}
