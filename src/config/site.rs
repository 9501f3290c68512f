//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CmsConfig {
    // Storage
    pub data_file: String,
    pub backup_dir: String,

    // Writing
    pub default_author: String,
    pub date_format: String,

    #[serde(default)]
    pub server: ServerConfig,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for CmsConfig {
    fn default() -> Self {
        Self {
            data_file: "data/blog.json".to_string(),
            backup_dir: "backups".to_string(),
            default_author: "Admin".to_string(),
            date_format: "MMMM DD, YYYY".to_string(),
            server: ServerConfig::default(),
            extra: HashMap::new(),
        }
    }
}

impl CmsConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: CmsConfig = serde_yaml::from_str(&content)?;
        tracing::debug!("Loaded config from {:?}", path.as_ref());
        Ok(config)
    }

    /// Render the configuration back to YAML
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

/// Read-only API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub ip: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            ip: "localhost".to_string(),
            port: 4000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CmsConfig::default();
        assert_eq!(config.data_file, "data/blog.json");
        assert_eq!(config.server.port, 4000);
        assert_eq!(config.date_format, "MMMM DD, YYYY");
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
data_file: content/posts.json
default_author: Fire Engineer
server:
  port: 8080
analytics: true
"#;
        let config: CmsConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.data_file, "content/posts.json");
        assert_eq!(config.default_author, "Fire Engineer");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.ip, "localhost");
        assert_eq!(config.backup_dir, "backups");
        assert!(config.extra.contains_key("analytics"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("_config.yml");
        fs::write(&path, "backup_dir: archive\n").unwrap();
        let config = CmsConfig::load(&path).unwrap();
        assert_eq!(config.backup_dir, "archive");
    }
}
