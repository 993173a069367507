//! Run Configuration
//!
//! One configuration per run, bound to a single configuration/platform pair.
//!
//! # Examples
//!
//! ```rust,ignore
//! use solution_builder::config::SolutionConfig;
//!
//! // Defaults (Release|x64, parallel, graph written)
//! let config = SolutionConfig::new("Release", "x64");
//!
//! // Versioned YAML file
//! let config = SolutionConfig::from_yaml("solution-builder.yaml")?;
//! ```

pub mod error;
pub mod solution_config;

pub use error::{ConfigError, ConfigResult};
pub use solution_config::{
    ConfigFileV1, ManifestConfig, OutputConfig, ParallelConfig, SolutionConfig,
};
