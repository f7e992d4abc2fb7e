use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde_json::Value;

use crate::config::types::Config;
use crate::config::validation;
use crate::utils::error::{BoxResult, PagetocError};

/// Configuration file names to look for, in merge order
const CONFIG_FILES: [&str; 4] = ["_pagetoc.yml", "_pagetoc.yaml", "_pagetoc.toml", "_pagetoc.json"];

/// Load configuration from config files.
///
/// Files are merged in order: keys in later files replace keys in earlier
/// ones, nested tables are merged key by key. Anything left unset keeps its
/// default.
pub fn load_config<P: AsRef<Path>>(
    config_dir: P,
    config_files: Option<Vec<PathBuf>>,
) -> BoxResult<Config> {
    let config_paths = match config_files {
        Some(paths) if !paths.is_empty() => paths,
        _ => find_default_config_files(&config_dir),
    };

    let mut merged = Value::Object(Default::default());
    if config_paths.is_empty() {
        debug!("No configuration files found, using defaults");
    } else {
        for path in config_paths {
            debug!("Loading configuration from {}", path.display());
            let value = read_config_file(&path)?;
            merge_values(&mut merged, value);
        }
    }

    let config: Config = serde_json::from_value(merged)
        .map_err(|e| PagetocError::Config(format!("Invalid configuration: {}", e)))?;

    validation::validate_config(&config)?;

    debug!("Configuration loaded: {:?}", config);
    Ok(config)
}

/// Find default configuration files
fn find_default_config_files<P: AsRef<Path>>(config_dir: P) -> Vec<PathBuf> {
    CONFIG_FILES
        .iter()
        .map(|name| config_dir.as_ref().join(name))
        .filter(|path| path.exists())
        .collect()
}

/// Read a configuration file into a generic value, choosing the format by extension
fn read_config_file(config_path: &Path) -> BoxResult<Value> {
    if !config_path.exists() {
        return Err(PagetocError::Config(format!(
            "Configuration file not found: {}", config_path.display()
        )).into());
    }

    let content = fs::read_to_string(config_path)
        .map_err(|e| PagetocError::Config(format!(
            "Failed to read configuration file {}: {}", config_path.display(), e
        )))?;

    let ext = config_path
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_else(|| "yml".to_string());

    let value = match ext.as_str() {
        "yml" | "yaml" => parse_yaml_config(&content, config_path)?,
        "toml" => parse_toml_config(&content, config_path)?,
        "json" => parse_json_config(&content, config_path)?,
        other => {
            return Err(PagetocError::Config(format!(
                "Unsupported configuration file format: {}", other
            )).into());
        }
    };

    // An empty YAML file parses to null
    Ok(if value.is_null() { Value::Object(Default::default()) } else { value })
}

/// Parse a YAML configuration file
fn parse_yaml_config(content: &str, path: &Path) -> BoxResult<Value> {
    serde_yaml::from_str(content)
        .map_err(|e| PagetocError::Config(format!(
            "Failed to parse YAML configuration ({}): {}", path.display(), e
        )).into())
}

/// Parse a TOML configuration file
fn parse_toml_config(content: &str, path: &Path) -> BoxResult<Value> {
    toml::from_str(content)
        .map_err(|e| PagetocError::Config(format!(
            "Failed to parse TOML configuration ({}): {}", path.display(), e
        )).into())
}

/// Parse a JSON configuration file
fn parse_json_config(content: &str, path: &Path) -> BoxResult<Value> {
    serde_json::from_str(content)
        .map_err(|e| PagetocError::Config(format!(
            "Failed to parse JSON configuration ({}): {}", path.display(), e
        )).into())
}

/// Deep-merge `source` into `target`
fn merge_values(target: &mut Value, source: Value) {
    match (target, source) {
        (Value::Object(target_map), Value::Object(source_map)) => {
            for (key, value) in source_map {
                let nested = value.is_object()
                    && target_map.get(&key).map_or(false, Value::is_object);
                if nested {
                    if let Some(existing) = target_map.get_mut(&key) {
                        merge_values(existing, value);
                    }
                } else {
                    target_map.insert(key, value);
                }
            }
        }
        (target, source) => *target = source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_defaults_without_files() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(dir.path(), None).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(
            config.retry.delays(),
            vec![Duration::from_millis(100), Duration::from_millis(500), Duration::from_millis(1000)]
        );
    }

    #[test]
    fn test_yaml_then_toml_merge() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("_pagetoc.yml"),
            "toc:\n  title: Contents\n  max_level: 3\nhighlight:\n  look_ahead: 90\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("_pagetoc.toml"),
            "[toc]\ntitle = \"In this chapter\"\n\n[retry]\ndelays_ms = [0]\nmount_retry_ms = 50\n",
        )
        .unwrap();

        let config = load_config(dir.path(), None).unwrap();
        assert_eq!(config.toc.title, "In this chapter");
        assert_eq!(config.toc.max_level, 3);
        assert_eq!(config.toc.container_class, "page-toc");
        assert_eq!(config.highlight.look_ahead, 90.0);
        assert_eq!(config.retry.delays_ms, vec![0]);
        assert_eq!(config.retry.mount_retry(), Some(Duration::from_millis(50)));
    }

    #[test]
    fn test_explicit_file_and_initial_metrics() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.json");
        fs::write(
            &path,
            r#"{"source": "out", "highlight": {"initial": {"scroll_y": 0, "viewport_height": 800, "document_height": 4000}}}"#,
        )
        .unwrap();

        let config = load_config(dir.path(), Some(vec![path])).unwrap();
        assert_eq!(config.source, PathBuf::from("out"));
        let initial = config.highlight.initial.unwrap();
        assert_eq!(initial.document_height, 4000.0);
    }

    #[test]
    fn test_invalid_selector_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("_pagetoc.yml"), "selectors:\n  sidebar: \"a[\"\n").unwrap();
        assert!(load_config(dir.path(), None).is_err());
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_config(dir.path(), Some(vec![dir.path().join("nope.yml")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_yaml_file_is_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("_pagetoc.yml"), "").unwrap();
        assert_eq!(load_config(dir.path(), None).unwrap(), Config::default());
    }
}
