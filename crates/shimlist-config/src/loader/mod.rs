//! Project option discovery, layering, and environment overrides

use std::collections::HashMap;

use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use serde_json::Value;
use shimlist_core::error::ShimError;
use tracing::debug;

use crate::options::{parse_raw_toml, CompatOptions, RawOptions};
use crate::ConfigResult;

/// Project options file
pub const CONFIG_FILE: &str = "shimlist.toml";

/// Fallback project manifest
pub const PACKAGE_JSON: &str = "package.json";

const ENV_PREFIX: &str = "SHIMLIST_";

/// Main configuration loading interface
pub struct ConfigLoader {
    /// Current working directory
    cwd: Utf8PathBuf,
}

/// Configuration layering and merging
pub struct ConfigLayering;

/// Configuration source tracking
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    /// Project shimlist.toml file
    ProjectToml(Utf8PathBuf),
    /// Project package.json file (fallback)
    ProjectJson(Utf8PathBuf),
}

/// The parts of package.json shimlist reads
#[derive(Debug, Default, Deserialize)]
struct PackageJsonOptions {
    #[serde(default)]
    shimlist: Option<RawOptions>,
    #[serde(default)]
    browserslist: Option<Value>,
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new(cwd: Utf8PathBuf) -> Self {
        Self { cwd }
    }

    /// Load project options with fallbacks
    pub async fn load_project_config(&self) -> ConfigResult<(RawOptions, ConfigSource)> {
        let toml_path = self.resolve_config_path(CONFIG_FILE)?;
        if toml_path.exists() {
            let options = load_toml_file(&toml_path).await?;
            debug!(path = %toml_path, "loaded project options");
            return Ok((options, ConfigSource::ProjectToml(toml_path)));
        }

        let package_json_path = self.resolve_config_path(PACKAGE_JSON)?;
        if package_json_path.exists() {
            let options = load_package_json(&package_json_path).await?;
            debug!(path = %package_json_path, "loaded project options from package.json");
            return Ok((options, ConfigSource::ProjectJson(package_json_path)));
        }

        Err(ShimError::ConfigValidation {
            field: "config".to_string(),
            reason: format!(
                "No {} or {} found in current directory or parent directories",
                CONFIG_FILE, PACKAGE_JSON
            ),
        })
    }

    /// Find a configuration file in the project (walks up the directory tree)
    pub fn resolve_config_path(&self, filename: &str) -> ConfigResult<Utf8PathBuf> {
        let mut current = self.cwd.as_path();

        loop {
            let config_path = current.join(filename);
            if config_path.exists() {
                return Ok(config_path);
            }

            match current.parent() {
                Some(parent) => current = parent,
                None => break,
            }
        }

        // Return path in current directory even if it doesn't exist
        Ok(self.cwd.join(filename))
    }
}

/// Load raw options from a shimlist.toml file
pub async fn load_toml_file(path: &Utf8Path) -> ConfigResult<RawOptions> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ShimError::io(format!("Failed to read {}", path), e))?;

    parse_raw_toml(&content).map_err(|e| match e {
        ShimError::TomlParse { message } => ShimError::TomlParse {
            message: format!("In file {}: {}", path, message),
        },
        other => other,
    })
}

/// Load raw options from the `shimlist` and `browserslist` fields of package.json
pub async fn load_package_json(path: &Utf8Path) -> ConfigResult<RawOptions> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ShimError::io(format!("Failed to read {}", path), e))?;

    let package: PackageJsonOptions =
        serde_json::from_str(&content).map_err(|e| ShimError::JsonParse {
            message: format!("In file {}: {}", path, e),
        })?;

    let mut options = package.shimlist.unwrap_or_default();
    if options.targets.is_none() {
        options.targets = package.browserslist.map(browserslist_targets).transpose()?;
    }
    Ok(options)
}

/// `browserslist` may be a query, a list of queries, or per-environment queries
fn browserslist_targets(value: Value) -> ConfigResult<Value> {
    match value {
        Value::String(_) | Value::Array(_) => Ok(value),
        Value::Object(mut environments) => environments.remove("production").ok_or_else(|| {
            ShimError::ConfigValidation {
                field: "browserslist".to_string(),
                reason: "per-environment browserslist needs a 'production' entry".to_string(),
            }
        }),
        other => Err(ShimError::ConfigValidation {
            field: "browserslist".to_string(),
            reason: format!("expected a query string or list, got {}", other),
        }),
    }
}

impl ConfigLayering {
    /// Merge project options, environment overrides and explicit overrides,
    /// in increasing priority, then validate the result
    pub fn merge(
        project: RawOptions,
        env_overrides: &HashMap<String, String>,
        explicit: RawOptions,
    ) -> ConfigResult<CompatOptions> {
        let mut merged = project;
        Self::apply_env_overrides(&mut merged, env_overrides)?;
        CompatOptions::try_from(merged.overlay(explicit))
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(
        options: &mut RawOptions,
        overrides: &HashMap<String, String>,
    ) -> ConfigResult<()> {
        for (key, value) in overrides {
            match key.as_str() {
                "SHIMLIST_TARGETS" => {
                    options.targets = Some(Value::String(value.clone()));
                },
                "SHIMLIST_MODULES" => {
                    let modules = value
                        .split(',')
                        .map(str::trim)
                        .filter(|item| !item.is_empty())
                        .map(|item| Value::String(item.to_string()))
                        .collect();
                    options.modules = Some(Value::Array(modules));
                },
                "SHIMLIST_INVERSE" => {
                    options.inverse = Some(parse_flag(key, value)?);
                },
                "SHIMLIST_VERSION" => {
                    options.version = Some(Value::String(value.clone()));
                },
                _ => {
                    // Unknown environment variable, ignore
                },
            }
        }

        Ok(())
    }

    /// Collect environment variable overrides
    pub fn collect_env_overrides() -> HashMap<String, String> {
        std::env::vars()
            .filter(|(key, _)| key.starts_with(ENV_PREFIX))
            .collect()
    }
}

fn parse_flag(key: &str, value: &str) -> ConfigResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" | "" => Ok(false),
        other => Err(ShimError::ConfigValidation {
            field: key.to_string(),
            reason: format!("expected a boolean, got '{}'", other),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::Selector;
    use crate::targets::TargetsSpec;
    use serde_json::json;
    use tempfile::TempDir;

    fn temp_path(temp_dir: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap()
    }

    #[tokio::test]
    async fn test_resolve_config_path_walks_up() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_path(&temp_dir);
        let nested = root.join("packages").join("app");
        tokio::fs::create_dir_all(&nested).await.unwrap();
        tokio::fs::write(root.join(CONFIG_FILE), "inverse = true").await.unwrap();

        let loader = ConfigLoader::new(nested);
        let resolved = loader.resolve_config_path(CONFIG_FILE).unwrap();

        assert_eq!(resolved, root.join(CONFIG_FILE));
    }

    #[tokio::test]
    async fn test_load_project_config_toml() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_path(&temp_dir);
        let content = r#"
modules = ["core-js/es/math"]

[targets]
chrome = 40
"#;
        tokio::fs::write(root.join(CONFIG_FILE), content).await.unwrap();

        let loader = ConfigLoader::new(root);
        let (options, source) = loader.load_project_config().await.unwrap();

        assert_eq!(options.modules, Some(json!(["core-js/es/math"])));
        assert_eq!(options.targets, Some(json!({ "chrome": 40 })));
        assert!(matches!(source, ConfigSource::ProjectToml(_)));
    }

    #[tokio::test]
    async fn test_load_project_config_package_json_fallback() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_path(&temp_dir);
        let content = r#"
{
  "name": "test-package",
  "version": "1.0.0",
  "shimlist": { "exclude": "es.math.hypot" },
  "browserslist": ["chrome 40", "firefox 27"]
}
"#;
        tokio::fs::write(root.join(PACKAGE_JSON), content).await.unwrap();

        let loader = ConfigLoader::new(root);
        let (options, source) = loader.load_project_config().await.unwrap();

        assert_eq!(options.exclude, Some(json!("es.math.hypot")));
        assert_eq!(options.targets, Some(json!(["chrome 40", "firefox 27"])));
        assert!(matches!(source, ConfigSource::ProjectJson(_)));
    }

    #[tokio::test]
    async fn test_package_json_browserslist_environments() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_path(&temp_dir);
        let content = r#"{ "browserslist": { "production": "safari 10.1", "development": "chrome 120" } }"#;
        tokio::fs::write(root.join(PACKAGE_JSON), content).await.unwrap();

        let options = load_package_json(&root.join(PACKAGE_JSON)).await.unwrap();
        assert_eq!(options.targets, Some(json!("safari 10.1")));
    }

    #[tokio::test]
    async fn test_toml_error_names_the_file() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_path(&temp_dir);
        let path = root.join(CONFIG_FILE);
        tokio::fs::write(&path, "inverse = [").await.unwrap();

        let err = load_toml_file(&path).await.unwrap_err();
        assert!(matches!(err, ShimError::TomlParse { ref message } if message.contains(CONFIG_FILE)));
    }

    #[test]
    fn test_merge_layers() {
        let project = RawOptions {
            modules: Some(json!("core-js/es/math")),
            targets: Some(json!("chrome 40")),
            ..Default::default()
        };
        let env_overrides = HashMap::from([
            ("SHIMLIST_TARGETS".to_string(), "firefox 27".to_string()),
            ("SHIMLIST_INVERSE".to_string(), "true".to_string()),
        ]);
        let explicit = RawOptions {
            inverse: Some(false),
            ..Default::default()
        };

        let merged = ConfigLayering::merge(project, &env_overrides, explicit).unwrap();

        // Project value survives where nothing overrides it
        assert_eq!(merged.modules, Selector::group("core-js/es/math"));
        // Environment beats project
        assert_eq!(merged.targets, TargetsSpec::Query("firefox 27".to_string()));
        // Explicit beats environment
        assert!(!merged.inverse);
    }

    #[test]
    fn test_env_modules_and_version() {
        let env_overrides = HashMap::from([
            ("SHIMLIST_MODULES".to_string(), "es.map, /^es\\.set/".to_string()),
            ("SHIMLIST_VERSION".to_string(), "3.30".to_string()),
        ]);
        let merged =
            ConfigLayering::merge(RawOptions::default(), &env_overrides, RawOptions::default())
                .unwrap();

        let Selector::Sequence(items) = merged.modules else {
            panic!("expected a sequence");
        };
        assert_eq!(items[0], Selector::literal("es.map"));
        assert!(matches!(items[1], Selector::Pattern(_)));
        assert_eq!(merged.version.map(|v| v.to_string()), Some("3.30".to_string()));
    }

    #[test]
    fn test_bad_env_flag() {
        let env_overrides =
            HashMap::from([("SHIMLIST_INVERSE".to_string(), "sometimes".to_string())]);
        let err = ConfigLayering::merge(RawOptions::default(), &env_overrides, RawOptions::default())
            .unwrap_err();
        assert!(matches!(err, ShimError::ConfigValidation { ref field, .. } if field == "SHIMLIST_INVERSE"));
    }

    #[test]
    fn test_collect_env_overrides() {
        std::env::set_var("SHIMLIST_TEST_ONLY", "1");
        std::env::set_var("NOT_SHIMLIST_VAR", "ignored");

        let overrides = ConfigLayering::collect_env_overrides();

        assert!(overrides.contains_key("SHIMLIST_TEST_ONLY"));
        assert!(!overrides.contains_key("NOT_SHIMLIST_VAR"));

        std::env::remove_var("SHIMLIST_TEST_ONLY");
        std::env::remove_var("NOT_SHIMLIST_VAR");
    }
}
