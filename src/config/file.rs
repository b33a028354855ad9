//! TOML configuration file loading
//!
//! Supports `~/.config/omni/lumen/config.toml` as a persistent config source.
//! All fields are optional — the file is a partial overlay on top of defaults.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Top-level TOML configuration file schema
#[derive(Debug, Default, Deserialize)]
pub struct LumenConfigFile {
    /// HTTP ingest API configuration
    #[serde(default)]
    pub api: ApiFileConfig,

    /// Panic-gesture configuration
    #[serde(default)]
    pub gesture: GestureFileConfig,

    /// Frame pipeline configuration
    #[serde(default)]
    pub pipeline: PipelineFileConfig,

    /// Vision provider configuration
    #[serde(default)]
    pub vision: VisionFileConfig,

    /// Speech output configuration
    #[serde(default)]
    pub speech: SpeechFileConfig,

    /// Announcement language configuration
    #[serde(default)]
    pub language: LanguageFileConfig,
}

/// Ingest API configuration
#[derive(Debug, Default, Deserialize)]
pub struct ApiFileConfig {
    /// API server port
    pub port: Option<u16>,
}

/// Panic-gesture thresholds
#[derive(Debug, Default, Deserialize)]
pub struct GestureFileConfig {
    /// Max gap between presses in the same sequence (milliseconds)
    pub press_threshold_ms: Option<u64>,

    /// Silence after which a partial sequence resets (milliseconds)
    pub reset_time_ms: Option<u64>,

    /// Presses required to trigger
    pub required_presses: Option<u32>,

    /// Shell command that brings the assistant to the foreground
    pub launch_command: Option<String>,
}

/// Frame pipeline configuration
#[derive(Debug, Default, Deserialize)]
pub struct PipelineFileConfig {
    /// Minimum interval between analyzed frames (milliseconds)
    pub sample_interval_ms: Option<u64>,
}

/// Vision provider configuration
#[derive(Debug, Default, Deserialize)]
pub struct VisionFileConfig {
    /// Provider name ("gemini" or "deepseek")
    pub provider: Option<String>,

    /// Model identifier (e.g. "gemini-1.5-flash")
    pub model: Option<String>,

    /// Provider API key (env vars take precedence)
    pub api_key: Option<String>,
}

/// Speech output configuration
#[derive(Debug, Default, Deserialize)]
pub struct SpeechFileConfig {
    /// Enable spoken output (disabled falls back to logging)
    pub enabled: Option<bool>,

    /// TTS model (e.g. "gpt-4o-mini-tts")
    pub model: Option<String>,

    /// TTS voice identifier (e.g. "alloy")
    pub voice: Option<String>,

    /// TTS speed multiplier
    pub speed: Option<f32>,

    /// TTS API key (env vars take precedence)
    pub api_key: Option<String>,
}

/// Announcement language configuration
#[derive(Debug, Default, Deserialize)]
pub struct LanguageFileConfig {
    /// Default language when nothing is persisted yet
    pub default: Option<String>,
}

/// Load the TOML config file from `path`, or the standard path if `None`
///
/// Returns `LumenConfigFile::default()` if the file doesn't exist or can't
/// be parsed.
#[must_use]
pub fn load_config_file(path: Option<&Path>) -> LumenConfigFile {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => {
            let Some(p) = config_file_path() else {
                return LumenConfigFile::default();
            };
            p
        }
    };

    if !path.exists() {
        return LumenConfigFile::default();
    }

    match std::fs::read_to_string(&path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "loaded config file");
                config
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to parse config file, using defaults"
                );
                LumenConfigFile::default()
            }
        },
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to read config file"
            );
            LumenConfigFile::default()
        }
    }
}

/// Return the config file path: `~/.config/omni/lumen/config.toml`
#[must_use]
pub fn config_file_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| {
        d.config_dir()
            .join("omni")
            .join("lumen")
            .join("config.toml")
    })
}
