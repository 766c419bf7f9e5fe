use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Load configuration from file with environment variable overrides
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    let config: Config = Figment::new()
        .merge(Toml::file(path))
        .merge(Env::prefixed("SHUFFLEBOT_").split("_"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    Ok(config)
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config_from_str_valid() {
        let toml = r#"
[catalog]
base_url = "http://localhost:2283"
api_key = "abc"

[bot]
command_prefix = "!"
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.catalog.base_url, "http://localhost:2283");
        assert_eq!(config.bot.command_prefix, "!");
        // Unspecified sections take defaults.
        assert_eq!(config.search.max_rejections, 200);
        assert_eq!(config.catalog.timeout_secs, 30);
    }

    #[test]
    fn test_load_config_from_str_missing_catalog() {
        let toml = r#"
[bot]
command_prefix = "."
"#;
        let result = load_config_from_str(toml);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[catalog]
base_url = "http://photos.local"
api_key = "abc"
admin_api_key = "admin"
timeout_secs = 10

[search]
max_rejections = 50
"#
        )
        .unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.catalog.base_url, "http://photos.local");
        assert_eq!(config.catalog.timeout_secs, 10);
        assert_eq!(config.search.max_rejections, 50);
    }
}
