//! Layered application configuration

mod app_config;

pub use app_config::{
    AppConfig, CorpusConfig, EmbeddingConfig, LlmConfig, LogFormat, LoggingConfig, ServerConfig,
};
