//! Joint likelihood of several independent measurements.
//!
//! Members share parameters by name. The combined ranges are the
//! intersection of the members' ranges, and the combined penalty is added on
//! top of the members' own penalties.
use crate::likelihood::{
    bounds::{ParamRange, bound_penalty, intersect_ranges, validate_ranges},
    composite::Likelihood,
    errors::{LikelihoodError, LikelihoodResult},
    profiled::ProfiledLikelihood,
    traits::LikelihoodModel,
};
use crate::model::inputs::{DataSet, ParamMap};
use rand::RngCore;
use std::collections::BTreeSet;

#[derive(Debug, Clone)]
pub struct CombinedLikelihood {
    likelihoods: Vec<Likelihood>,
    param_needed: BTreeSet<String>,
    param_range: ParamRange,
}

impl CombinedLikelihood {
    /// # Errors
    /// - [`LikelihoodError::EmptyCombination`] for an empty list.
    /// - [`LikelihoodError::InvalidRange`] when the members' ranges for a
    ///   shared parameter do not overlap.
    pub fn new(likelihoods: Vec<Likelihood>) -> LikelihoodResult<Self> {
        if likelihoods.is_empty() {
            return Err(LikelihoodError::EmptyCombination);
        }
        let mut param_needed = BTreeSet::new();
        let mut param_range = ParamRange::new();
        for llh in &likelihoods {
            param_needed.extend(llh.param_needed().iter().cloned());
            intersect_ranges(&mut param_range, llh.param_range());
        }
        validate_ranges(&param_range)?;
        Ok(Self { likelihoods, param_needed, param_range })
    }

    pub fn likelihoods(&self) -> &[Likelihood] {
        &self.likelihoods
    }
}

impl LikelihoodModel for CombinedLikelihood {
    fn loglikelihood(&self, params: &ParamMap) -> LikelihoodResult<f64> {
        let mut llh = bound_penalty(&self.param_range, params);
        for member in &self.likelihoods {
            llh += member.loglikelihood(params)?;
        }
        Ok(llh)
    }

    /// Members' toys merged in order; a later member overwrites keys of an
    /// earlier one.
    fn simulate(&self, params: &ParamMap, rng: &mut dyn RngCore) -> LikelihoodResult<DataSet> {
        let mut data = DataSet::new();
        for member in &self.likelihoods {
            data.extend(member.simulate(params, rng)?);
        }
        Ok(data)
    }

    fn set_data(&mut self, data: DataSet) {
        for member in &mut self.likelihoods {
            member.set_data(data.clone());
        }
    }

    fn param_needed(&self) -> &BTreeSet<String> {
        &self.param_needed
    }

    fn param_range(&self) -> &ParamRange {
        &self.param_range
    }

    fn view(&self) -> String {
        self.likelihoods.iter().map(LikelihoodModel::view).collect::<Vec<_>>().join("\n")
    }
}

/// Join `likelihoods` into one profiled likelihood.
pub fn combine_profile_likelihoods(
    likelihoods: Vec<Likelihood>,
) -> LikelihoodResult<ProfiledLikelihood<CombinedLikelihood>> {
    CombinedLikelihood::new(likelihoods).map(ProfiledLikelihood::new)
}
