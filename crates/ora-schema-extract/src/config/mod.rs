//! Configuration loading and validation.

mod types;

pub use types::*;

use crate::error::{ExtractError, Result};
use std::path::Path;

impl Config {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.connection.host.is_empty() {
            return Err(ExtractError::Config("connection.host is required".into()));
        }
        if self.connection.user.is_empty() {
            return Err(ExtractError::Config("connection.user is required".into()));
        }
        if self.connection.password.is_empty() {
            return Err(ExtractError::Config(
                "connection.password is required".into(),
            ));
        }
        if self.connection.service.is_none() && self.connection.sid.is_none() {
            return Err(ExtractError::Config(
                "connection.service or connection.sid is required".into(),
            ));
        }
        if self.extraction.schemas.is_empty() {
            return Err(ExtractError::Config(
                "extraction.schemas must list at least one schema".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        Config {
            connection: ConnectionConfig {
                host: "oracle.example.com".to_string(),
                port: 1521,
                service: Some("ORCL".to_string()),
                sid: None,
                user: "migration_user".to_string(),
                password: "secret".to_string(),
            },
            extraction: ExtractionConfig {
                schemas: vec!["HR".to_string()],
                ..ExtractionConfig::default()
            },
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_missing_host() {
        let mut config = valid_config();
        config.connection.host = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_service_and_sid() {
        let mut config = valid_config();
        config.connection.service = None;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_schemas() {
        let mut config = valid_config();
        config.extraction.schemas.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_yaml() {
        let yaml = r#"
connection:
  host: oracle.example.com
  service: ORCL
  user: migration_user
  password: secret
extraction:
  schemas: [HR, FINANCE]
  output_dir: /data/staging
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.connection.port, 1521);
        assert_eq!(config.extraction.schemas.len(), 2);
        assert_eq!(
            config.extraction.output_dir.to_string_lossy(),
            "/data/staging"
        );
    }

    #[test]
    fn test_from_yaml_rejects_incomplete() {
        let yaml = r#"
connection:
  host: oracle.example.com
  service: ORCL
  user: migration_user
  password: secret
"#;
        // No schemas configured
        assert!(Config::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_connect_descriptor_service_and_sid() {
        let config = valid_config();
        assert_eq!(
            config.connection.connect_descriptor(),
            "//oracle.example.com:1521/ORCL"
        );

        let mut config = valid_config();
        config.connection.service = None;
        config.connection.sid = Some("XE".to_string());
        let descriptor = config.connection.connect_descriptor();
        assert!(descriptor.contains("(SID=XE)"));
        assert!(descriptor.contains("(HOST=oracle.example.com)"));
    }

    #[test]
    fn test_identifier_prefers_service() {
        let config = valid_config();
        assert_eq!(config.connection.identifier(), "ORCL");
    }
}
