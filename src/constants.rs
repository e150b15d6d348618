//! # System Constants
//!
//! Separators, file names and environment variable names shared by the registry,
//! plugin and configuration layers.

/// Separators used when rendering keys and deriving identifiers
pub mod separators {
    /// Joins namespace segments into an entry-point group identifier
    pub const DEFAULT_GROUP_SEPARATOR: &str = "_";

    /// Joins the remainder of a nested key when it is flattened into a name
    pub const NESTED_NAME_SEPARATOR: &str = ".";

    /// Used when a namespace is shown to humans in error messages
    pub const NAMESPACE_DISPLAY_SEPARATOR: &str = " -> ";

    /// Splits a plugin reference into module and attribute
    pub const REFERENCE_ATTR_SEPARATOR: char = ':';
}

/// Configuration discovery
pub mod config_files {
    /// Base configuration file, looked up inside the configuration directory
    pub const BASE_CONFIG_FILE: &str = "catalogue.toml";

    /// Default configuration directory, relative to the working directory
    pub const DEFAULT_CONFIG_DIR: &str = "config";

    /// Prefix for configuration overrides taken from the environment
    pub const ENV_PREFIX: &str = "CATALOGUE";

    /// Nesting separator for environment overrides (`CATALOGUE_PLUGINS__GROUP_SEPARATOR`)
    pub const ENV_NESTING_SEPARATOR: &str = "__";

    /// Environment variables consulted, in order, to detect the runtime environment
    pub const ENVIRONMENT_VARIABLES: [&str; 2] = ["CATALOGUE_ENV", "APP_ENV"];

    /// Environment assumed when none of the variables above is set
    pub const DEFAULT_ENVIRONMENT: &str = "development";
}

pub mod system {
    /// Shown in "available names" lists when a namespace is empty
    pub const NO_AVAILABLE_NAMES: &str = "none";
}
