use crate::config::errors::ConfigError;

/// Result alias for alias binding and model evaluation.
pub type ModelResult<T> = Result<T, ModelError>;

#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    // ---- Inputs ----
    /// Neither the parameters nor the dataset provide this name.
    MissingInput {
        name: String,
    },

    /// Input has a different kind than the consumer expects.
    TypeMismatch {
        name: String,
        expected: &'static str,
        found: &'static str,
    },

    // ---- Remap ----
    /// Alias given for a name the model does not take as argument.
    UnknownArgument {
        model: &'static str,
        name: String,
    },

    /// Declared argument or observable without an alias.
    MissingAlias {
        model: &'static str,
        name: String,
    },

    // ---- Evaluation ----
    /// Argument outside the model's domain (e.g. negative rate).
    InvalidArgument {
        model: &'static str,
        name: &'static str,
        reason: String,
    },

    /// Template evaluation failed.
    Template {
        source: ConfigError,
    },
}

impl std::error::Error for ModelError {}

impl std::fmt::Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Inputs ----
            ModelError::MissingInput { name } => {
                write!(f, "Input '{name}' is neither a parameter nor a data key")
            }
            ModelError::TypeMismatch { name, expected, found } => {
                write!(f, "Input '{name}' must be {expected}, found {found}")
            }

            // ---- Remap ----
            ModelError::UnknownArgument { model, name } => {
                write!(f, "{model} takes no argument '{name}'")
            }
            ModelError::MissingAlias { model, name } => {
                write!(f, "{model} needs an alias for '{name}'")
            }

            // ---- Evaluation ----
            ModelError::InvalidArgument { model, name, reason } => {
                write!(f, "Invalid {model} argument '{name}': {reason}")
            }
            ModelError::Template { source } => {
                write!(f, "Template evaluation failed: {source}")
            }
        }
    }
}

impl From<ConfigError> for ModelError {
    fn from(source: ConfigError) -> Self {
        ModelError::Template { source }
    }
}
