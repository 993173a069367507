//! Solution run configuration
//!
//! YAML schema v1:
//!
//! ```yaml
//! version: 1
//! configuration: Release
//! platform: x64
//! parallel:
//!   enabled: true
//!   num_workers: 0
//! output:
//!   use_project_references: false
//!   write_graph: true
//!   write_debug_manifests: false
//! manifest:
//!   path: build/product.proj
//!   items_name: ProductProjects
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::error::{ConfigError, ConfigResult};

const SUPPORTED_VERSIONS: &[u32] = &[1];

/// Worker pool settings for ingestion and source scanning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParallelConfig {
    /// `false` selects the strictly sequential mode
    pub enabled: bool,

    /// Number of workers (0=auto, 1..=256)
    pub num_workers: usize,
}

impl ParallelConfig {
    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if self.num_workers > 256 {
            return Err(ConfigError::range_with_hint(
                "num_workers",
                self.num_workers,
                0,
                256,
                "Number of workers must be reasonable (0=auto)",
            ));
        }
        Ok(())
    }

    /// Workers actually used: 75% of the cores when left on auto
    pub fn effective_workers(&self) -> usize {
        if !self.enabled {
            return 1;
        }
        if self.num_workers > 0 {
            return self.num_workers;
        }
        (num_cpus::get() * 3 / 4).max(1)
    }

    pub fn sequential() -> Self {
        Self {
            enabled: false,
            num_workers: 1,
        }
    }
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            num_workers: 0,
        }
    }
}

/// Artifact selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Push dependencies into descriptors as project references instead of
    /// inlining them in the solution
    pub use_project_references: bool,

    /// Write `<solution stem>.dgml` beside the solution
    pub write_graph: bool,

    /// Write the plain-text debug listings beside the solution
    pub write_debug_manifests: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            use_project_references: false,
            write_graph: true,
            write_debug_manifests: false,
        }
    }
}

/// Build manifest declaring the official entry points
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManifestConfig {
    pub path: PathBuf,

    /// Item type listing the entry points
    pub items_name: String,
}

/// Complete configuration for one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SolutionConfig {
    pub configuration: String,
    pub platform: String,

    #[serde(default)]
    pub parallel: ParallelConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manifest: Option<ManifestConfig>,
}

/// YAML Schema v1
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFileV1 {
    /// Schema version (always 1 for v1)
    pub version: Option<u32>,

    pub configuration: String,
    pub platform: String,

    #[serde(default)]
    pub parallel: ParallelConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manifest: Option<ManifestConfig>,
}

impl From<ConfigFileV1> for SolutionConfig {
    fn from(file: ConfigFileV1) -> Self {
        Self {
            configuration: file.configuration,
            platform: file.platform,
            parallel: file.parallel,
            output: file.output,
            manifest: file.manifest,
        }
    }
}

impl SolutionConfig {
    pub fn new(configuration: impl Into<String>, platform: impl Into<String>) -> Self {
        Self {
            configuration: configuration.into(),
            platform: platform.into(),
            parallel: ParallelConfig::default(),
            output: OutputConfig::default(),
            manifest: None,
        }
    }

    /// Load a versioned YAML configuration and validate it
    pub fn from_yaml(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        let file: ConfigFileV1 = serde_yaml::from_str(content)?;

        match file.version {
            None => return Err(ConfigError::MissingVersion),
            Some(found) if !SUPPORTED_VERSIONS.contains(&found) => {
                return Err(ConfigError::UnsupportedVersion {
                    found,
                    supported: SUPPORTED_VERSIONS.to_vec(),
                });
            }
            Some(_) => {}
        }

        let config = SolutionConfig::from(file);
        config.validate()?;
        Ok(config)
    }

    /// Export as YAML v1
    pub fn to_yaml(&self) -> ConfigResult<String> {
        let file = ConfigFileV1 {
            version: Some(1),
            configuration: self.configuration.clone(),
            platform: self.platform.clone(),
            parallel: self.parallel.clone(),
            output: self.output.clone(),
            manifest: self.manifest.clone(),
        };
        Ok(serde_yaml::to_string(&file)?)
    }

    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if self.configuration.trim().is_empty() {
            return Err(ConfigError::empty_field(
                "configuration",
                "Name the build configuration, e.g. 'Release'",
            ));
        }
        if self.platform.trim().is_empty() {
            return Err(ConfigError::empty_field(
                "platform",
                "Name the build platform, e.g. 'x64'",
            ));
        }
        if let Some(manifest) = &self.manifest {
            if manifest.items_name.trim().is_empty() {
                return Err(ConfigError::empty_field(
                    "manifest.items_name",
                    "Name the item type listing the official projects",
                ));
            }
        }
        self.parallel.validate()
    }

    /// `Configuration|Platform`
    pub fn config_platform(&self) -> String {
        format!("{}|{}", self.configuration, self.platform)
    }

    /// Global properties handed to the evaluator for every descriptor
    pub fn global_properties(&self) -> BTreeMap<String, String> {
        BTreeMap::from([
            ("Configuration".to_string(), self.configuration.clone()),
            ("Platform".to_string(), self.platform.clone()),
        ])
    }
}

impl Default for SolutionConfig {
    fn default() -> Self {
        Self::new("Release", "x64")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_yaml_roundtrip() {
        let mut config = SolutionConfig::new("Debug", "Win32");
        config.output.use_project_references = true;

        let yaml = config.to_yaml().unwrap();
        assert!(yaml.contains("version: 1"));
        assert!(yaml.contains("configuration: Debug"));

        let recovered = SolutionConfig::from_yaml_str(&yaml).unwrap();
        assert_eq!(recovered, config);
    }

    #[test]
    fn test_yaml_loading() {
        let yaml_content = r#"
version: 1
configuration: Release
platform: x64
parallel:
  enabled: false
manifest:
  path: product.proj
  items_name: ProductProjects
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(yaml_content.as_bytes()).unwrap();

        let config = SolutionConfig::from_yaml(temp_file.path()).unwrap();
        assert!(!config.parallel.enabled);
        assert_eq!(config.parallel.effective_workers(), 1);
        assert!(config.output.write_graph);
        assert_eq!(
            config.manifest.unwrap().items_name,
            "ProductProjects".to_string()
        );
    }

    #[test]
    fn test_yaml_missing_version() {
        let result = SolutionConfig::from_yaml_str("configuration: Release\nplatform: x64\n");
        assert!(matches!(result, Err(ConfigError::MissingVersion)));
    }

    #[test]
    fn test_yaml_unsupported_version() {
        let result =
            SolutionConfig::from_yaml_str("version: 2\nconfiguration: Release\nplatform: x64\n");
        assert!(matches!(
            result,
            Err(ConfigError::UnsupportedVersion { found: 2, .. })
        ));
    }

    #[test]
    fn test_yaml_unknown_field_rejected() {
        let result = SolutionConfig::from_yaml_str(
            "version: 1\nconfiguration: Release\nplatform: x64\nflavour: spicy\n",
        );
        assert!(matches!(result, Err(ConfigError::Yaml(_))));
    }

    #[test]
    fn test_validation_rejects_worker_overflow() {
        let mut config = SolutionConfig::default();
        config.parallel.num_workers = 1000;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Range { .. })
        ));
    }

    #[test]
    fn test_validation_rejects_empty_platform() {
        let config = SolutionConfig::new("Release", " ");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyField { .. })
        ));
    }

    #[test]
    fn test_global_properties() {
        let config = SolutionConfig::new("Debug", "Win32");
        let globals = config.global_properties();
        assert_eq!(globals["Configuration"], "Debug");
        assert_eq!(globals["Platform"], "Win32");
        assert_eq!(config.config_platform(), "Debug|Win32");
    }
}
