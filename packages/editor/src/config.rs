use crate::EditorError;
use prose_model::Schema;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_NAME: &str = "prose.config.json";

/// Editor configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorConfig {
    /// Node type created for new empty text blocks
    #[serde(default = "default_text_type")]
    pub default_text_type: String,

    /// Behavior packages to register, by name
    #[serde(default = "default_behaviors")]
    pub behaviors: Vec<String>,
}

fn default_text_type() -> String {
    "paragraph".to_string()
}

fn default_behaviors() -> Vec<String> {
    vec!["text".to_string(), "list".to_string()]
}

impl EditorConfig {
    /// Load config from a directory
    pub fn load(cwd: impl AsRef<Path>) -> anyhow::Result<Self> {
        let config_path = cwd.as_ref().join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: EditorConfig = serde_json::from_str(&content)?;
            tracing::debug!(path = %config_path.display(), "loaded editor config");
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(EditorConfig::default())
        }
    }

    /// Prose schema with the configured default text type
    pub fn schema(&self) -> Result<Schema, EditorError> {
        Schema::prose()
            .with_default_text_type(&self.default_text_type)
            .map_err(|err| EditorError::Config(err.to_string()))
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            default_text_type: default_text_type(),
            behaviors: default_behaviors(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "defaultTextType": "heading",
            "behaviors": ["text"]
        }"#;

        let config: EditorConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.default_text_type, "heading");
        assert_eq!(config.behaviors, vec!["text"]);
        assert_eq!(config.schema().unwrap().default_text_type(), "heading");
    }

    #[test]
    fn test_default_config() {
        let config: EditorConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, EditorConfig::default());
        assert_eq!(config.behaviors, vec!["text", "list"]);
    }

    #[test]
    fn test_unknown_text_type() {
        let config = EditorConfig {
            default_text_type: "list".to_string(),
            ..Default::default()
        };
        assert!(matches!(config.schema(), Err(EditorError::Config(_))));
    }

    #[test]
    fn test_load_missing_file_gives_default() {
        let dir = std::env::temp_dir().join("prose-config-missing");
        let config = EditorConfig::load(&dir).unwrap();
        assert_eq!(config, EditorConfig::default());
    }

    #[test]
    fn test_load_from_dir() -> anyhow::Result<()> {
        let dir = std::env::temp_dir().join(format!("prose-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir)?;
        std::fs::write(dir.join(DEFAULT_CONFIG_NAME), r#"{ "behaviors": ["list"] }"#)?;

        let config = EditorConfig::load(&dir)?;
        assert_eq!(config.behaviors, vec!["list"]);
        assert_eq!(config.default_text_type, "paragraph");

        std::fs::remove_dir_all(&dir)?;
        Ok(())
    }
}
