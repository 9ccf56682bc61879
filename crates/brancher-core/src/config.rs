use std::fs;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use serde::Deserialize;
use thiserror::Error;

use crate::category::{CategoryDefinition, CategoryRegistry};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BrancherConfig {
    pub version: u32,
    #[serde(default)]
    pub categories: Option<Vec<CategoryDefinition>>,
}

impl BrancherConfig {
    /// Categories from the config, or the built-in table when none are listed.
    pub fn category_registry(&self) -> Result<CategoryRegistry, ConfigError> {
        match &self.categories {
            None => Ok(CategoryRegistry::default()),
            Some(categories) => {
                CategoryRegistry::new(categories.clone()).map_err(|error| {
                    ConfigError::Validation {
                        message: error.to_string(),
                    }
                })
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not resolve home directory for config path")]
    HomeDirectoryUnavailable,
    #[error("failed to read config at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid config: {message}")]
    Validation { message: String },
}

pub fn resolve_config_path() -> anyhow::Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or(ConfigError::HomeDirectoryUnavailable)?;
    Ok(base_dirs
        .home_dir()
        .join(".config")
        .join("brancher")
        .join("config.toml"))
}

pub fn load_config(path: &Path) -> Result<BrancherConfig, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let parsed: BrancherConfig = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    validate_config(&parsed)?;
    Ok(parsed)
}

/// The registry for this run: built-in defaults unless a config file exists.
pub fn load_category_registry(path: &Path) -> Result<CategoryRegistry, ConfigError> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using default categories");
        return Ok(CategoryRegistry::default());
    }

    let config = load_config(path)?;
    let registry = config.category_registry()?;
    tracing::info!(
        path = %path.display(),
        categories = registry.len(),
        "loaded categories from config"
    );
    Ok(registry)
}

pub fn validate_config(config: &BrancherConfig) -> Result<(), ConfigError> {
    if config.version != 1 {
        return Err(ConfigError::Validation {
            message: "version must be 1".to_string(),
        });
    }

    config.category_registry().map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(raw: &str) -> tempfile::NamedTempFile {
        let file = tempfile::NamedTempFile::new().expect("temp file");
        fs::write(file.path(), raw).expect("write temp config");
        file
    }

    #[test]
    fn version_only_config_uses_default_categories() {
        let file = write_config("version = 1\n");
        let registry = load_category_registry(file.path()).expect("registry");
        assert_eq!(registry, CategoryRegistry::default());
    }

    #[test]
    fn missing_config_uses_default_categories() {
        let dir = tempfile::tempdir().expect("temp dir");
        let registry =
            load_category_registry(&dir.path().join("config.toml")).expect("registry");
        assert_eq!(registry.len(), 6);
    }

    #[test]
    fn configured_categories_replace_defaults_in_order() {
        let file = write_config(
            r#"
version = 1

[[categories]]
display = "Docs"
code = "docs"

[[categories]]
display = "Chore"
code = "chore"
"#,
        );

        let registry = load_category_registry(file.path()).expect("registry");
        let codes: Vec<&str> = registry
            .categories()
            .iter()
            .map(|category| category.code.as_str())
            .collect();
        assert_eq!(codes, vec!["docs", "chore"]);
    }

    #[test]
    fn rejects_unsupported_version() {
        let file = write_config("version = 2\n");
        let error = load_config(file.path()).expect_err("config should fail");
        assert!(error.to_string().contains("version must be 1"));
    }

    #[test]
    fn rejects_empty_category_list() {
        let file = write_config("version = 1\ncategories = []\n");
        let error = load_config(file.path()).expect_err("config should fail");
        assert!(error.to_string().contains("at least one category"));
    }

    #[test]
    fn rejects_category_code_with_slash() {
        let file = write_config(
            r#"
version = 1

[[categories]]
display = "Nested"
code = "a/b"
"#,
        );

        let error = load_config(file.path()).expect_err("config should fail");
        assert!(error.to_string().contains("code 'a/b'"));
    }

    #[test]
    fn rejects_unknown_keys() {
        let file = write_config("version = 1\ncolour = \"blue\"\n");
        let error = load_config(file.path()).expect_err("config should fail");
        assert!(matches!(error, ConfigError::Parse { .. }));
    }
}
