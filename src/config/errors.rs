/// Result alias for configuration, template, and file-resolution operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    // ---- Options ----
    /// Option has neither a registry value nor a default.
    MissingOption {
        name: String,
        taken_by: String,
    },

    /// Option declared twice for the same likelihood.
    DuplicateOption {
        name: String,
        taken_by: String,
    },

    /// Registry value has the wrong kind for the option.
    WrongValueType {
        name: String,
        expected: &'static str,
    },

    // ---- Files ----
    /// File could not be resolved against any search location.
    FileNotFound {
        name: String,
    },

    /// Reading the file failed.
    Io {
        path: String,
        text: String,
    },

    /// File content is not a valid template document.
    Parse {
        path: String,
        text: String,
    },

    /// Requested histogram is not in the template file.
    HistogramNotFound {
        hist_name: String,
        path: String,
    },

    // ---- Templates ----
    /// Histogram axes or counts are malformed.
    InvalidTemplate {
        name: String,
        reason: String,
    },

    /// Events have a different dimensionality than the template.
    DimensionMismatch {
        expected: usize,
        found: usize,
    },
}

impl std::error::Error for ConfigError {}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Options ----
            ConfigError::MissingOption { name, taken_by } => {
                write!(f, "Missing option {name} required by {taken_by}")
            }
            ConfigError::DuplicateOption { name, taken_by } => {
                write!(f, "Attempt to specify config {name} twice for {taken_by}")
            }
            ConfigError::WrongValueType { name, expected } => {
                write!(f, "Option {name} must be {expected}")
            }

            // ---- Files ----
            ConfigError::FileNotFound { name } => {
                write!(f, "Can not find {name}")
            }
            ConfigError::Io { path, text } => {
                write!(f, "Failed to read {path}: {text}")
            }
            ConfigError::Parse { path, text } => {
                write!(f, "Failed to parse template file {path}: {text}")
            }
            ConfigError::HistogramNotFound { hist_name, path } => {
                write!(f, "Histogram '{hist_name}' not found in {path}")
            }

            // ---- Templates ----
            ConfigError::InvalidTemplate { name, reason } => {
                write!(f, "Invalid template {name}: {reason}")
            }
            ConfigError::DimensionMismatch { expected, found } => {
                write!(f, "Event dimension mismatch: expected {expected}, found {found}")
            }
        }
    }
}
