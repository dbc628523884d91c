//! YAML helpers for configuration files

pub mod diagnostics;

pub use diagnostics::{YamlError, YamlSyntaxError};
