//! config::options — declared options and their built values.
//!
//! Purpose
//! -------
//! Let a likelihood declare the options it needs ([`ConfigSpec`]) and turn
//! those declarations into concrete values ([`BuiltConfig`]) by consulting
//! the global registry, falling back to defaults.
//!
//! Key behaviors
//! -------------
//! - Constants read a numeric registry value, else their default; a used
//!   default is written back to the registry.
//! - Templates read a file path from the registry, else resolve their
//!   default through [`get_file_path`]; the resolved path is written back and
//!   the histogram is loaded from it.
//! - Declaring the same option name twice is an error, including across a
//!   parent/child [`ConfigSpec::extend`].
use crate::config::{
    errors::{ConfigError, ConfigResult},
    registry::{ConfigValue, get_or_insert_global_config},
    template::Template,
};
use crate::utils::get_file_path;
use std::collections::BTreeMap;
use std::sync::Arc;

/// One option a likelihood takes.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigOption {
    Constant { name: String, default: Option<f64>, help: String },
    Template { name: String, default: Option<String>, hist_name: String, help: String },
}

impl ConfigOption {
    pub fn constant(name: &str, default: Option<f64>, help: &str) -> Self {
        ConfigOption::Constant { name: name.to_string(), default, help: help.to_string() }
    }

    pub fn template(name: &str, default: Option<&str>, hist_name: &str, help: &str) -> Self {
        ConfigOption::Template {
            name: name.to_string(),
            default: default.map(str::to_string),
            hist_name: hist_name.to_string(),
            help: help.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ConfigOption::Constant { name, .. } | ConfigOption::Template { name, .. } => name,
        }
    }

    pub fn help(&self) -> &str {
        match self {
            ConfigOption::Constant { help, .. } | ConfigOption::Template { help, .. } => help,
        }
    }

    /// Resolve this option's value.
    ///
    /// # Errors
    /// - [`ConfigError::MissingOption`] with no registry value and no default.
    /// - [`ConfigError::WrongValueType`] for a registry value of the wrong kind.
    /// - File resolution and template loading errors for templates.
    pub fn build(&self, taken_by: &str) -> ConfigResult<BuiltOption> {
        let missing = || ConfigError::MissingOption {
            name: self.name().to_string(),
            taken_by: taken_by.to_string(),
        };
        match self {
            ConfigOption::Constant { name, default, .. } => {
                let value = match crate::config::get_global_config(name) {
                    Some(v) => v,
                    None => get_or_insert_global_config(name, default.ok_or_else(missing)?.into()),
                };
                let x = value
                    .as_f64()
                    .ok_or(ConfigError::WrongValueType { name: name.clone(), expected: "a number" })?;
                Ok(BuiltOption::Constant(x))
            }
            ConfigOption::Template { name, default, hist_name, .. } => {
                let value = match crate::config::get_global_config(name) {
                    Some(v) => v,
                    None => {
                        let fname = default.as_deref().ok_or_else(missing)?;
                        get_or_insert_global_config(name, ConfigValue::from(get_file_path(fname)?))
                    }
                };
                let path = value
                    .as_str()
                    .ok_or(ConfigError::WrongValueType { name: name.clone(), expected: "a file path" })?;
                log::debug!("loading template {name} from {path}");
                Ok(BuiltOption::Template(Arc::new(Template::load(path, hist_name)?)))
            }
        }
    }
}

#[derive(Debug, Clone)]
pub enum BuiltOption {
    Constant(f64),
    Template(Arc<Template>),
}

/// Ordered option declarations of one likelihood.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfigSpec {
    pub taken_by: String,
    pub options: Vec<ConfigOption>,
}

impl ConfigSpec {
    pub fn new(taken_by: &str) -> Self {
        Self { taken_by: taken_by.to_string(), options: Vec::new() }
    }

    /// Add one declaration.
    ///
    /// # Errors
    /// [`ConfigError::DuplicateOption`] if the name is already declared.
    pub fn with(mut self, option: ConfigOption) -> ConfigResult<Self> {
        if self.options.iter().any(|o| o.name() == option.name()) {
            return Err(ConfigError::DuplicateOption {
                name: option.name().to_string(),
                taken_by: self.taken_by,
            });
        }
        self.options.push(option);
        Ok(self)
    }

    /// Merge another set of declarations (e.g. a parent likelihood's).
    ///
    /// # Errors
    /// [`ConfigError::DuplicateOption`] on the first shared name.
    pub fn extend(self, other: ConfigSpec) -> ConfigResult<Self> {
        other.options.into_iter().try_fold(self, ConfigSpec::with)
    }

    /// Build every declared option from the registry and defaults.
    pub fn build(&self) -> ConfigResult<BuiltConfig> {
        self.build_with(&BTreeMap::new())
    }

    /// Build every declared option, taking templates named in `templates`
    /// as given instead of loading them from disk.
    pub fn build_with(&self, templates: &BTreeMap<String, Arc<Template>>) -> ConfigResult<BuiltConfig> {
        let mut built = BuiltConfig::default();
        for option in &self.options {
            let name = option.name().to_string();
            if let (ConfigOption::Template { .. }, Some(t)) = (option, templates.get(&name)) {
                built.templates.insert(name, Arc::clone(t));
                continue;
            }
            match option.build(&self.taken_by)? {
                BuiltOption::Constant(x) => {
                    built.constants.insert(name, x);
                }
                BuiltOption::Template(t) => {
                    built.templates.insert(name, t);
                }
            }
        }
        Ok(built)
    }
}

/// Built option values of one likelihood.
#[derive(Debug, Clone, Default)]
pub struct BuiltConfig {
    pub constants: BTreeMap<String, f64>,
    pub templates: BTreeMap<String, Arc<Template>>,
}

impl BuiltConfig {
    pub fn constant(&self, name: &str) -> ConfigResult<f64> {
        self.constants.get(name).copied().ok_or_else(|| ConfigError::MissingOption {
            name: name.to_string(),
            taken_by: "built config".to_string(),
        })
    }

    pub fn template(&self, name: &str) -> ConfigResult<Arc<Template>> {
        self.templates.get(name).cloned().ok_or_else(|| ConfigError::MissingOption {
            name: name.to_string(),
            taken_by: "built config".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::registry::{get_global_config, set_global_config};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Registry precedence and default write-back for constants.
    // - Missing and duplicate option errors.
    // - Template options resolved from a registry path and from overrides.
    //
    // Every test uses its own option names because the registry is global.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // A used default is written back to the registry.
    fn constant_default_is_written_back() {
        let opt = ConfigOption::constant("opt_test_writeback", Some(0.25), "");

        let built = opt.build("Owner").unwrap();

        assert!(matches!(built, BuiltOption::Constant(x) if x == 0.25));
        assert_eq!(get_global_config("opt_test_writeback"), Some(ConfigValue::Float(0.25)));
    }

    #[test]
    // Purpose
    // -------
    // Registry values win over defaults.
    fn registry_overrides_default() {
        set_global_config([("opt_test_override", 3.0)]);
        let spec = ConfigSpec::new("Owner")
            .with(ConfigOption::constant("opt_test_override", Some(1.0), ""))
            .unwrap();

        let built = spec.build().unwrap();

        assert_eq!(built.constant("opt_test_override").unwrap(), 3.0);
    }

    #[test]
    // Purpose
    // -------
    // Options without value or default name their owner in the error.
    fn missing_option_names_owner() {
        let spec =
            ConfigSpec::new("Owner").with(ConfigOption::constant("opt_test_missing", None, "")).unwrap();

        let err = spec.build().unwrap_err();

        assert_eq!(
            err,
            ConfigError::MissingOption {
                name: "opt_test_missing".to_string(),
                taken_by: "Owner".to_string()
            }
        );
    }

    #[test]
    // Purpose
    // -------
    // Declaring the same option twice fails, also through `extend`.
    fn duplicate_declarations_fail() {
        let parent = ConfigSpec::new("Parent").with(ConfigOption::constant("a", Some(1.0), "")).unwrap();
        let child = ConfigSpec::new("Child").with(ConfigOption::constant("a", Some(2.0), "")).unwrap();

        assert!(matches!(child.clone().extend(parent), Err(ConfigError::DuplicateOption { .. })));
        assert!(matches!(
            child.with(ConfigOption::constant("a", None, "")),
            Err(ConfigError::DuplicateOption { .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Template options load from the registry path, and overrides skip disk.
    fn template_options_load_and_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.json");
        let t = Template::from_histogram("t", vec![vec![0.0, 1.0, 2.0]], vec![1.0, 3.0]).unwrap();
        t.save(&path, "h").unwrap();
        set_global_config([("opt_test_template", path.clone())]);

        let spec = ConfigSpec::new("Owner")
            .with(ConfigOption::template("opt_test_template", None, "h", ""))
            .unwrap()
            .with(ConfigOption::template("opt_test_memory", Some("never/read.json"), "h", ""))
            .unwrap();
        let mut overrides = BTreeMap::new();
        overrides.insert("opt_test_memory".to_string(), Arc::new(t.scaled(2.0)));

        let built = spec.build_with(&overrides).unwrap();

        assert_eq!(built.template("opt_test_template").unwrap().norm(), 4.0);
        assert_eq!(built.template("opt_test_memory").unwrap().norm(), 8.0);
    }
}
