//! config — options, templates, and the process-wide registry.
//!
//! Purpose
//! -------
//! Provide everything a likelihood needs before it can be evaluated: the
//! constants and histogram templates it declares, resolved against a
//! process-wide registry of option values.
//!
//! Key behaviors
//! -------------
//! - [`registry`]: the global option map ([`set_global_config`],
//!   [`get_global_config`], [`clear_global_config`]) including the
//!   `url_base` search directory.
//! - [`options`]: option declarations ([`ConfigOption`], [`ConfigSpec`]) and
//!   built values ([`BuiltConfig`]).
//! - [`template`]: N-dimensional histogram templates with interpolated
//!   densities and sampling.
//!
//! Invariants & assumptions
//! ------------------------
//! - The registry is shared by every likelihood in the process; building a
//!   likelihood may write defaults into it.
//! - Built templates are immutable and shared through `Arc`.
//!
//! Testing notes
//! -------------
//! - Tests touching the registry use unique keys since the test harness runs
//!   them concurrently in one process.

pub mod errors;
pub mod options;
pub mod registry;
pub mod template;

pub use self::errors::{ConfigError, ConfigResult};
pub use self::options::{BuiltConfig, BuiltOption, ConfigOption, ConfigSpec};
pub use self::registry::{
    ConfigValue, URL_BASE, clear_global_config, get_global_config, set_global_config,
};
pub use self::template::{DENSITY_FLOOR, HistogramRecord, Template};
