pub mod batch;
pub mod config;
pub mod converter;
pub mod files;
pub mod testing;

pub use batch::{
    BatchError, BatchHandle, BatchOrchestrator, BatchSummary, ChannelProgressSink,
    ConversionOutcome, ConversionRequest, ProgressEvent, ProgressSink, RequestTemplate,
};
pub use config::{
    load_config, load_config_from_str, load_or_create_config, validate_config,
    write_default_config, AppConfig, Config, ConfigError, TranscoderConfig,
};
pub use converter::{
    ConverterError, FfmpegTranscoder, FormatSettings, MediaMetadata, QualityPreset, TargetFormat,
    Transcoder,
};
pub use files::{remove_files, resolve_output_path, FileValidator};
