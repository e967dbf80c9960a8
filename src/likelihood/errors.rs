use crate::config::errors::ConfigError;
use crate::model::errors::ModelError;
use crate::optimization::errors::OptError;

/// Result alias for likelihood construction, evaluation and profiling.
pub type LikelihoodResult<T> = Result<T, LikelihoodError>;

#[derive(Debug, Clone, PartialEq)]
pub enum LikelihoodError {
    // ---- Layers ----
    Config(ConfigError),
    Model(ModelError),
    Optimization(OptError),

    // ---- Construction ----
    /// Two terms share a tag.
    DuplicateTag {
        tag: String,
    },

    /// Parameter range with `lower > upper` or non-finite ends.
    InvalidRange {
        name: String,
        lower: f64,
        upper: f64,
    },

    /// A combined likelihood needs at least one member.
    EmptyCombination,

    // ---- Evaluation ----
    /// Parameter name the likelihood does not use.
    UnknownParameter {
        name: String,
    },

    /// Term tag not present in the likelihood.
    UnknownTerm {
        tag: String,
    },

    /// No toy simulator was attached to the likelihood.
    SimulationNotDefined {
        name: String,
    },

    /// `chi2` was requested before `set_max_loglikelihood`.
    MaxLikelihoodNotSet,
}

impl std::error::Error for LikelihoodError {}

impl std::fmt::Display for LikelihoodError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Layers ----
            LikelihoodError::Config(e) => write!(f, "Configuration error: {e}"),
            LikelihoodError::Model(e) => write!(f, "Model error: {e}"),
            LikelihoodError::Optimization(e) => write!(f, "Optimization error: {e}"),

            // ---- Construction ----
            LikelihoodError::DuplicateTag { tag } => {
                write!(f, "Likelihood term tag '{tag}' used twice")
            }
            LikelihoodError::InvalidRange { name, lower, upper } => {
                write!(f, "Invalid range for {name}: ({lower}, {upper})")
            }
            LikelihoodError::EmptyCombination => {
                write!(f, "Cannot combine an empty list of likelihoods")
            }

            // ---- Evaluation ----
            LikelihoodError::UnknownParameter { name } => {
                write!(f, "Unknown parameter '{name}'")
            }
            LikelihoodError::UnknownTerm { tag } => {
                write!(f, "Unknown likelihood term '{tag}'")
            }
            LikelihoodError::SimulationNotDefined { name } => {
                write!(f, "{name} does not define how to simulate toy data")
            }
            LikelihoodError::MaxLikelihoodNotSet => {
                write!(f, "Maximum log-likelihood not set; call set_max_loglikelihood first")
            }
        }
    }
}

impl From<ConfigError> for LikelihoodError {
    fn from(err: ConfigError) -> Self {
        LikelihoodError::Config(err)
    }
}

impl From<ModelError> for LikelihoodError {
    fn from(err: ModelError) -> Self {
        LikelihoodError::Model(err)
    }
}

impl From<OptError> for LikelihoodError {
    fn from(err: OptError) -> Self {
        LikelihoodError::Optimization(err)
    }
}
