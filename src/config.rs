//! Compiler settings, loaded from YAML.
//!
//! Every field has a default, so an empty file (or no file at all) yields the
//! stock configuration.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::diagnostics::QuovaError;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompilerConfig {
    /// Version of the baseline `org.jetbrains.kotlin.jvm` plugin.
    pub kotlin_version: String,
    pub baseline_repository: String,
    /// Prefix each compiled file with `@file:JvmName("{Name}Qv")`.
    pub jvm_name_header: bool,
    /// Added to the dependency block as `implementation files('<path>')`.
    pub stdlib_jar: Option<PathBuf>,
    pub source_extension: String,
    pub module_file: String,
    pub output_dir: PathBuf,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            kotlin_version: "1.4.10".to_string(),
            baseline_repository: "mavenCentral".to_string(),
            jvm_name_header: true,
            stdlib_jar: None,
            source_extension: "qv".to_string(),
            module_file: "module.qvm".to_string(),
            output_dir: PathBuf::from("build/quova"),
        }
    }
}

impl CompilerConfig {
    pub fn from_yaml(text: &str, path: &Path) -> Result<Self, QuovaError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text).map_err(|e| QuovaError::config(path, e))
    }

    pub fn load(path: &Path) -> Result<Self, QuovaError> {
        let text = fs::read_to_string(path).map_err(|e| QuovaError::io(path, e))?;
        let config = Self::from_yaml(&text, path)?;
        debug!(path = %path.display(), ?config, "loaded configuration");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::ErrorType;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_file_is_the_default() {
        let config = CompilerConfig::from_yaml("", Path::new("quova.yaml")).unwrap();
        assert_eq!(config, CompilerConfig::default());
        assert_eq!(config.kotlin_version, "1.4.10");
        assert!(config.jvm_name_header);
    }

    #[test]
    fn partial_files_keep_the_other_defaults() {
        let config = CompilerConfig::from_yaml(
            "kotlin_version: \"1.5.0\"\nstdlib_jar: libs/quova-std.jar\n",
            Path::new("quova.yaml"),
        )
        .unwrap();
        assert_eq!(config.kotlin_version, "1.5.0");
        assert_eq!(config.stdlib_jar, Some(PathBuf::from("libs/quova-std.jar")));
        assert_eq!(config.baseline_repository, "mavenCentral");
        assert_eq!(config.module_file, "module.qvm");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = CompilerConfig::from_yaml("kotlin: 1\n", Path::new("quova.yaml")).unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Config);
        assert!(err.to_string().contains("quova.yaml"));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = CompilerConfig::load(&dir.path().join("absent.yaml")).unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Io);
    }
}
