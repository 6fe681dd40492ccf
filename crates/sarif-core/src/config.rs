use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::enumeration::DEFAULT_CHANNEL_CAPACITY;
use crate::errors::ConfigError;
use crate::version::SarifVersion;

pub const SUPPORTED_CONFIG_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolkitConfig {
    #[serde(rename = "configVersion")]
    pub version: u32,
    #[serde(default)]
    pub enumeration: EnumerationSettings,
    #[serde(default)]
    pub transform: TransformSettings,
}

impl Default for ToolkitConfig {
    fn default() -> Self {
        Self {
            version: SUPPORTED_CONFIG_VERSION,
            enumeration: EnumerationSettings::default(),
            transform: TransformSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumerationSettings {
    #[serde(default)]
    pub recurse: bool,
    #[serde(default)]
    pub max_file_size_kb: Option<u64>,
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

fn default_channel_capacity() -> usize {
    DEFAULT_CHANNEL_CAPACITY
}

impl Default for EnumerationSettings {
    fn default() -> Self {
        Self {
            recurse: false,
            max_file_size_kb: None,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransformSettings {
    #[serde(default)]
    pub pretty: bool,
    /// `v1`, `v2`, `1.0.0` or `2.1.0`.
    #[serde(default)]
    pub target_version: Option<String>,
}

impl TransformSettings {
    pub fn target(&self) -> Result<Option<SarifVersion>, ConfigError> {
        self.target_version
            .as_deref()
            .map(|v| {
                v.parse::<SarifVersion>()
                    .map_err(|e| ConfigError(format!("transform.target_version: {}", e)))
            })
            .transpose()
    }
}

pub fn load_config(path: &Path, strict: bool) -> Result<ToolkitConfig, ConfigError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| ConfigError(format!("failed to read config {}: {}", path.display(), e)))?;
    parse_config(&raw, strict).map_err(|e| ConfigError(format!("{} (file: {})", e.0, path.display())))
}

pub fn parse_config(raw: &str, strict: bool) -> Result<ToolkitConfig, ConfigError> {
    let mut ignored_keys = BTreeSet::new();
    let deserializer = serde_yaml::Deserializer::from_str(raw);

    let cfg: ToolkitConfig = serde_ignored::deserialize(deserializer, |path| {
        ignored_keys.insert(path.to_string());
    })
    .map_err(|e| ConfigError(format!("failed to parse YAML: {}", e)))?;

    // YAML anchors and extension keys are allowed anywhere.
    let meaningful_unknowns: Vec<_> = ignored_keys
        .iter()
        .filter(|k| !k.starts_with('_') && !k.starts_with("x-"))
        .collect();

    if !meaningful_unknowns.is_empty() {
        if strict {
            return Err(ConfigError(format!(
                "Unknown fields detected in strict mode: {:?}",
                meaningful_unknowns
            )));
        }
        tracing::warn!(
            event = "sarif.config.unknown_fields",
            fields = ?meaningful_unknowns,
            "ignored unknown config fields"
        );
    }

    if cfg.version != SUPPORTED_CONFIG_VERSION {
        return Err(ConfigError(format!(
            "unsupported config version {} (supported: {})",
            cfg.version, SUPPORTED_CONFIG_VERSION
        )));
    }
    cfg.transform.target()?;

    Ok(cfg)
}

impl ToolkitConfig {
    /// Overrides from `SARIF_RECURSE`, `SARIF_MAX_FILE_SIZE_KB` and
    /// `SARIF_CHANNEL_CAPACITY`. Unparseable values are ignored.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("SARIF_RECURSE") {
            match v.to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => self.enumeration.recurse = true,
                "0" | "false" | "no" => self.enumeration.recurse = false,
                _ => {}
            }
        }
        if let Some(v) = lookup("SARIF_MAX_FILE_SIZE_KB") {
            if let Ok(n) = v.parse() {
                self.enumeration.max_file_size_kb = Some(n);
            }
        }
        if let Some(v) = lookup("SARIF_CHANNEL_CAPACITY") {
            if let Ok(n) = v.parse::<usize>() {
                self.enumeration.channel_capacity = n.max(1);
            }
        }
    }
}

pub fn write_sample_config(path: &Path) -> Result<(), ConfigError> {
    std::fs::write(
        path,
        r#"configVersion: 1
enumeration:
  recurse: true
  max_file_size_kb: 10240
  channel_capacity: 10240
transform:
  pretty: true
  target_version: v2
"#,
    )
    .map_err(|e| ConfigError(format!("failed to write sample config: {}", e)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_config_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sarif.yaml");
        write_sample_config(&path).unwrap();

        let cfg = load_config(&path, true).unwrap();
        assert!(cfg.enumeration.recurse);
        assert_eq!(cfg.enumeration.max_file_size_kb, Some(10240));
        assert_eq!(cfg.transform.target().unwrap(), Some(SarifVersion::Current));
    }

    #[test]
    fn test_unknown_fields_rejected_in_strict_mode() {
        let raw = "configVersion: 1\nenumeration:\n  recurse: true\n  follow_links: true\n";
        let err = parse_config(raw, true).unwrap_err();
        assert!(err.0.contains("enumeration.follow_links"), "{}", err);

        let cfg = parse_config(raw, false).unwrap();
        assert!(cfg.enumeration.recurse);
    }

    #[test]
    fn test_extension_keys_allowed() {
        let raw = "configVersion: 1\nx-owner: team\n";
        assert!(parse_config(raw, true).is_ok());
    }

    #[test]
    fn test_unsupported_version() {
        let err = parse_config("configVersion: 7\n", false).unwrap_err();
        assert!(err.to_string().contains("unsupported config version 7"));
    }

    #[test]
    fn test_bad_target_version() {
        let err = parse_config("configVersion: 1\ntransform:\n  target_version: v3\n", false)
            .unwrap_err();
        assert!(err.0.contains("transform.target_version"));
    }

    #[test]
    fn test_env_overrides() {
        let mut cfg = ToolkitConfig::default();
        cfg.apply_env_from(|key| match key {
            "SARIF_RECURSE" => Some("true".into()),
            "SARIF_MAX_FILE_SIZE_KB" => Some("64".into()),
            "SARIF_CHANNEL_CAPACITY" => Some("not-a-number".into()),
            _ => None,
        });
        assert!(cfg.enumeration.recurse);
        assert_eq!(cfg.enumeration.max_file_size_kb, Some(64));
        assert_eq!(cfg.enumeration.channel_capacity, DEFAULT_CHANNEL_CAPACITY);
    }
}
