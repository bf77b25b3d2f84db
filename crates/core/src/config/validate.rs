use super::{types::Config, ConfigError};
use crate::converter::TargetFormat;

/// Validate configuration
/// Currently validates:
/// - app.max_files is not 0
/// - app.allowed_extensions is not empty
/// - transcoder.path is not empty
/// - transcoder.formats only names supported output formats
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.app.max_files == 0 {
        return Err(ConfigError::ValidationError(
            "app.max_files cannot be 0".to_string(),
        ));
    }

    if config.app.allowed_extensions.is_empty() {
        return Err(ConfigError::ValidationError(
            "app.allowed_extensions cannot be empty".to_string(),
        ));
    }

    if config.transcoder.path.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "transcoder.path cannot be empty".to_string(),
        ));
    }

    for format in config.transcoder.formats.formats() {
        if format.parse::<TargetFormat>().is_err() {
            return Err(ConfigError::ValidationError(format!(
                "transcoder.formats.{} is not a supported output format",
                format
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppConfig, TranscoderConfig};
    use crate::converter::{CodecSettings, FormatSettings};
    use std::path::PathBuf;

    #[test]
    fn test_validate_valid_config() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_max_files_zero_fails() {
        let config = Config {
            app: AppConfig {
                max_files: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        let result = validate_config(&config);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_validate_empty_path_fails() {
        let config = Config {
            transcoder: TranscoderConfig {
                path: PathBuf::new(),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_validate_no_extensions_fails() {
        let config = Config {
            app: AppConfig {
                allowed_extensions: Vec::new(),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_unknown_format_section_fails() {
        let toml = r#"
[transcoder.formats.ogg]
bitrate = "160k"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("transcoder.formats.ogg"));

        let config = Config {
            transcoder: TranscoderConfig {
                formats: FormatSettings::empty()
                    .with(TargetFormat::Mp4, CodecSettings::default()),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(validate_config(&config).is_ok());
    }
}
