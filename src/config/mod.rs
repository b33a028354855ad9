//! Configuration management for the Lumen daemon

pub mod file;

use std::path::PathBuf;
use std::time::Duration;

use crate::gesture::GestureSettings;
use crate::language::Language;
use crate::pipeline::SAMPLE_INTERVAL;
use crate::{Error, Result};

/// Default ingest API port
pub const DEFAULT_PORT: u16 = 18990;

/// Resolved daemon configuration, defaults applied
#[derive(Debug, Clone)]
pub struct Config {
    /// Ingest API settings
    pub api: ApiConfig,

    /// Panic-gesture settings
    pub gesture: GestureConfig,

    /// Frame pipeline settings
    pub pipeline: PipelineConfig,

    /// Vision provider settings
    pub vision: VisionConfig,

    /// Speech output settings
    pub speech: SpeechConfig,

    /// Language used until a preference is persisted
    pub default_language: Language,
}

/// Ingest API settings
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Port to listen on
    pub port: u16,
}

/// Panic-gesture settings
#[derive(Debug, Clone)]
pub struct GestureConfig {
    /// Detector thresholds
    pub settings: GestureSettings,

    /// Command run when the gesture fires; `None` logs only
    pub launch_command: Option<String>,
}

/// Frame pipeline settings
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Minimum interval between analyzed frames
    pub sample_interval: Duration,
}

/// Supported vision providers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisionProvider {
    Gemini,
    DeepSeek,
}

/// Vision provider settings
#[derive(Debug, Clone)]
pub struct VisionConfig {
    /// Which provider to call
    pub provider: VisionProvider,

    /// Model identifier (Gemini only)
    pub model: String,

    /// Provider API key
    pub api_key: Option<String>,
}

/// Speech output settings
#[derive(Debug, Clone)]
pub struct SpeechConfig {
    /// Whether to synthesize audio (false logs announcements instead)
    pub enabled: bool,

    /// TTS model
    pub model: String,

    /// TTS voice identifier
    pub voice: String,

    /// TTS speed multiplier
    pub speed: f32,

    /// TTS API key
    pub api_key: Option<String>,
}

impl Config {
    /// Load configuration from the TOML overlay, environment, and overrides
    ///
    /// # Errors
    ///
    /// Returns error if a value fails validation (unknown provider or
    /// language, zero press count, zero interval)
    pub fn load(config_path: Option<PathBuf>, port_override: Option<u16>) -> Result<Self> {
        let file = file::load_config_file(config_path.as_deref());
        Self::resolve(&file, port_override)
    }

    /// Resolve a parsed overlay file into a full configuration
    ///
    /// # Errors
    ///
    /// Returns error if a value fails validation
    pub fn resolve(file: &file::LumenConfigFile, port_override: Option<u16>) -> Result<Self> {
        let provider = match file.vision.provider.as_deref() {
            None => VisionProvider::Gemini,
            Some(name) => match name.to_lowercase().as_str() {
                "gemini" => VisionProvider::Gemini,
                "deepseek" => VisionProvider::DeepSeek,
                other => {
                    return Err(Error::Config(format!("unknown vision provider: {other}")));
                }
            },
        };

        let settings = GestureSettings {
            press_threshold: file
                .gesture
                .press_threshold_ms
                .map_or(GestureSettings::default().press_threshold, Duration::from_millis),
            reset_time: file
                .gesture
                .reset_time_ms
                .map_or(GestureSettings::default().reset_time, Duration::from_millis),
            required_presses: file
                .gesture
                .required_presses
                .unwrap_or(GestureSettings::default().required_presses),
        };

        if settings.required_presses == 0 {
            return Err(Error::Config(
                "gesture.required_presses must be at least 1".to_string(),
            ));
        }

        let sample_interval = file
            .pipeline
            .sample_interval_ms
            .map_or(SAMPLE_INTERVAL, Duration::from_millis);

        if sample_interval.is_zero() {
            return Err(Error::Config(
                "pipeline.sample_interval_ms must be positive".to_string(),
            ));
        }

        let default_language = match &file.language.default {
            None => Language::default(),
            Some(name) => name.parse()?,
        };

        let vision_api_key = env_key(&["LUMEN_GEMINI_API_KEY", "GEMINI_API_KEY"])
            .filter(|_| provider == VisionProvider::Gemini)
            .or_else(|| {
                env_key(&["LUMEN_DEEPSEEK_API_KEY", "DEEPSEEK_API_KEY"])
                    .filter(|_| provider == VisionProvider::DeepSeek)
            })
            .or_else(|| file.vision.api_key.clone());

        let speech_api_key = env_key(&["LUMEN_OPENAI_API_KEY", "OPENAI_API_KEY"])
            .or_else(|| file.speech.api_key.clone());

        Ok(Self {
            api: ApiConfig {
                port: port_override
                    .or(file.api.port)
                    .unwrap_or(DEFAULT_PORT),
            },
            gesture: GestureConfig {
                settings,
                launch_command: file.gesture.launch_command.clone(),
            },
            pipeline: PipelineConfig { sample_interval },
            vision: VisionConfig {
                provider,
                model: file
                    .vision
                    .model
                    .clone()
                    .unwrap_or_else(|| "gemini-1.5-flash".to_string()),
                api_key: vision_api_key,
            },
            speech: SpeechConfig {
                enabled: file.speech.enabled.unwrap_or(true),
                model: file
                    .speech
                    .model
                    .clone()
                    .unwrap_or_else(|| "gpt-4o-mini-tts".to_string()),
                voice: file
                    .speech
                    .voice
                    .clone()
                    .unwrap_or_else(|| "alloy".to_string()),
                speed: file.speech.speed.unwrap_or(1.0),
                api_key: speech_api_key,
            },
            default_language,
        })
    }
}

/// First set environment variable among `names`, ignoring empty values
fn env_key(names: &[&str]) -> Option<String> {
    names
        .iter()
        .find_map(|name| std::env::var(name).ok())
        .filter(|v| !v.is_empty())
}
