use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;
use tracing::{info, warn};

use super::{types::Config, ConfigError};

/// Environment variable prefix for overrides, e.g. `MEDIABATCH_APP__MAX_FILES=5`
const ENV_PREFIX: &str = "MEDIABATCH_";

/// Load configuration from file with environment variable overrides
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    let config: Config = Figment::new()
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    Ok(config)
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Load configuration, writing a default file first if none exists
pub fn load_or_create_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        warn!(path = %path.display(), "Configuration file not found, creating default");
        write_default_config(path)?;
    }

    load_config(path)
}

/// Write the default configuration to `path`, creating parent directories
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let contents = toml::to_string_pretty(&Config::default())
        .map_err(|e| ConfigError::WriteError(e.to_string()))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| ConfigError::WriteError(format!("{}: {}", parent.display(), e)))?;
    }

    std::fs::write(path, contents)
        .map_err(|e| ConfigError::WriteError(format!("{}: {}", path.display(), e)))?;

    info!(path = %path.display(), "Wrote default configuration");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converter::TargetFormat;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_load_config_from_str_valid() {
        let toml = r#"
[transcoder]
path = "/opt/ffmpeg/bin/ffmpeg"
default_format = "mp4"

[app]
max_files = 10
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.app.max_files, 10);
        assert_eq!(config.default_format(), TargetFormat::Mp4);
    }

    #[test]
    fn test_load_config_from_str_bad_type() {
        let toml = r#"
[app]
max_files = "many"
"#;
        let result = load_config_from_str(toml);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/mediabatch.toml"));
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
[transcoder]
path = "/usr/local/bin/ffmpeg"

[transcoder.formats.mp3]
bitrate = "256k"
"#
        )
        .unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(
            config.transcoder.path,
            Path::new("/usr/local/bin/ffmpeg")
        );
        assert_eq!(
            config
                .transcoder
                .formats
                .get(TargetFormat::Mp3)
                .bitrate
                .as_deref(),
            Some("256k")
        );
        assert_eq!(config.app.max_files, 20);
    }

    #[test]
    fn test_load_or_create_writes_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = load_or_create_config(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.app.max_files, 20);
        assert_eq!(
            config
                .transcoder
                .formats
                .get(TargetFormat::Mp3)
                .bitrate
                .as_deref(),
            Some("192k")
        );

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("[transcoder.formats.mp3]"));
        assert!(written.contains("max_files = 20"));
    }

    #[test]
    fn test_load_or_create_keeps_existing() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "[app]\nmax_files = 3").unwrap();

        let config = load_or_create_config(temp_file.path()).unwrap();
        assert_eq!(config.app.max_files, 3);
    }
}
