use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::category::ClassifierConfig;
use crate::error::{CodebookError, Result};

const CONFIG_FILE: &str = "config.toml";

pub const DEFAULT_FRAMEWORK_FILE: &str = "life_framework.yaml";
pub const DEFAULT_EXPORT_FILE: &str = "life_framework_export.yaml";

/// Default config template with rich comments
const DEFAULT_CONFIG_TEMPLATE: &str = r#"# codebook configuration file
# Location: <base-dir>/config.toml

[store]
# Framework file, relative to the base directory
framework_file = "life_framework.yaml"

# Default export target when none is given
export_file = "life_framework_export.yaml"

# Metadata written into a freshly created framework
[meta]
name = "LIFE"
version = "1.0"
author = "Anonymous Developer"
goal = "Structured codebook for the LIFE framework"

# Extra classifier keywords. Entries for existing categories extend their
# keyword list (or replace it with `replace = true`); unknown keys are added
# after the built-in categories.
#
# [[classifier.categories]]
# key = "rules"
# keywords = ["policy", "guideline"]
# replace = false
"#;

/// Global configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub meta: MetaConfig,

    #[serde(default)]
    pub classifier: ClassifierConfig,
}

/// Storage locations relative to the base directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_framework_file")]
    pub framework_file: String,

    #[serde(default = "default_export_file")]
    pub export_file: String,
}

fn default_framework_file() -> String {
    DEFAULT_FRAMEWORK_FILE.to_string()
}

fn default_export_file() -> String {
    DEFAULT_EXPORT_FILE.to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            framework_file: default_framework_file(),
            export_file: default_export_file(),
        }
    }
}

/// Values used for the `meta` block of a newly synthesized framework
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetaConfig {
    #[serde(default = "default_meta_name")]
    pub name: String,

    #[serde(default = "default_meta_version")]
    pub version: String,

    #[serde(default = "default_meta_author")]
    pub author: String,

    #[serde(default = "default_meta_goal")]
    pub goal: String,
}

fn default_meta_name() -> String {
    "LIFE".to_string()
}

fn default_meta_version() -> String {
    "1.0".to_string()
}

fn default_meta_author() -> String {
    "Anonymous Developer".to_string()
}

fn default_meta_goal() -> String {
    "Structured codebook for the LIFE framework".to_string()
}

impl Default for MetaConfig {
    fn default() -> Self {
        Self {
            name: default_meta_name(),
            version: default_meta_version(),
            author: default_meta_author(),
            goal: default_meta_goal(),
        }
    }
}

const KEYS: &[&str] = &[
    "store.framework_file",
    "store.export_file",
    "meta.name",
    "meta.version",
    "meta.author",
    "meta.goal",
];

impl Config {
    /// Load config from base directory
    pub fn load(base_dir: &Path) -> Result<Self> {
        let path = base_dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&content).map_err(|e| CodebookError::ConfigParse {
            path: path.clone(),
            message: e.to_string(),
        })?;

        Ok(config)
    }

    /// Save config to base directory
    pub fn save(&self, base_dir: &Path) -> Result<()> {
        let path = base_dir.join(CONFIG_FILE);
        fs::create_dir_all(base_dir)?;

        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    /// Get config file path
    pub fn path(base_dir: &Path) -> PathBuf {
        base_dir.join(CONFIG_FILE)
    }

    /// Initialize config with default template (rich comments)
    pub fn init(base_dir: &Path) -> Result<PathBuf> {
        let path = base_dir.join(CONFIG_FILE);
        fs::create_dir_all(base_dir)?;

        if !path.exists() {
            fs::write(&path, DEFAULT_CONFIG_TEMPLATE)?;
        }

        Ok(path)
    }

    /// Get a config value by dot-notation key
    pub fn get(&self, key: &str) -> Option<String> {
        let value = match key {
            "store.framework_file" => &self.store.framework_file,
            "store.export_file" => &self.store.export_file,
            "meta.name" => &self.meta.name,
            "meta.version" => &self.meta.version,
            "meta.author" => &self.meta.author,
            "meta.goal" => &self.meta.goal,
            _ => return None,
        };
        Some(value.clone())
    }

    /// Set a config value by dot-notation key
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let slot = match key {
            "store.framework_file" => &mut self.store.framework_file,
            "store.export_file" => &mut self.store.export_file,
            "meta.name" => &mut self.meta.name,
            "meta.version" => &mut self.meta.version,
            "meta.author" => &mut self.meta.author,
            "meta.goal" => &mut self.meta.goal,
            _ => {
                return Err(CodebookError::ConfigKeyNotFound {
                    key: key.to_string(),
                })
            }
        };
        *slot = value.trim().to_string();
        Ok(())
    }

    /// List all config keys with their current values
    pub fn list(&self) -> Vec<(String, String)> {
        KEYS.iter()
            .filter_map(|key| self.get(key).map(|v| (key.to_string(), v)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert_eq!(config.store.framework_file, DEFAULT_FRAMEWORK_FILE);
        assert_eq!(config.meta.name, "LIFE");
        assert!(config.classifier.categories.is_empty());
    }

    #[test]
    fn test_config_get_set() {
        let mut config = Config::default();

        config.set("meta.author", "Jane Doe").unwrap();
        assert_eq!(config.meta.author, "Jane Doe");
        assert_eq!(config.get("meta.author").as_deref(), Some("Jane Doe"));

        assert!(config.get("meta.unknown").is_none());
        assert!(matches!(
            config.set("meta.unknown", "x"),
            Err(CodebookError::ConfigKeyNotFound { .. })
        ));
    }

    #[test]
    fn test_config_list_covers_all_keys() {
        let config = Config::default();
        let keys: Vec<String> = config.list().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys.len(), KEYS.len());
        assert!(keys.contains(&"store.export_file".to_string()));
    }

    #[test]
    fn test_config_init_template_parses() {
        let tmp = TempDir::new().unwrap();
        let path = Config::init(tmp.path()).unwrap();
        assert!(path.exists());

        let config = Config::load(tmp.path()).unwrap();
        assert_eq!(config.store.export_file, DEFAULT_EXPORT_FILE);
        assert_eq!(config.meta.version, "1.0");
    }

    #[test]
    fn test_config_save_load_classifier_section() {
        let tmp = TempDir::new().unwrap();
        let content = r#"
[store]
framework_file = "kb.yaml"

[[classifier.categories]]
key = "rules"
keywords = ["policy"]
"#;
        fs::write(Config::path(tmp.path()), content).unwrap();

        let config = Config::load(tmp.path()).unwrap();
        assert_eq!(config.store.framework_file, "kb.yaml");
        assert_eq!(config.store.export_file, DEFAULT_EXPORT_FILE);
        assert_eq!(config.classifier.categories.len(), 1);
        assert!(!config.classifier.categories[0].replace);

        config.save(tmp.path()).unwrap();
        let reloaded = Config::load(tmp.path()).unwrap();
        assert_eq!(reloaded.classifier.categories[0].keywords, vec!["policy"]);
    }

    #[test]
    fn test_config_parse_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(Config::path(tmp.path()), "[store\nbroken").unwrap();
        assert!(matches!(
            Config::load(tmp.path()),
            Err(CodebookError::ConfigParse { .. })
        ));
    }
}
