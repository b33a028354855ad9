//! Announcement language selection
//!
//! The daemon announces scene descriptions in one of four supported
//! languages. The active selection is process-wide, cached in memory for
//! lock-cheap reads on the dispatch path, and written through to the
//! preference store so it survives restarts.

use std::str::FromStr;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::store::PrefStore;
use crate::{Error, Result};

/// Preference store key for the selected language
const LANGUAGE_KEY: &str = "selected_language";

/// Supported announcement languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Language {
    English,
    Malayalam,
    Hindi,
    Kannada,
}

impl Default for Language {
    fn default() -> Self {
        Self::Malayalam
    }
}

impl Language {
    /// BCP-47 primary language tag, as passed to the speech boundary
    #[must_use]
    pub const fn as_tag(&self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Malayalam => "ml",
            Self::Hindi => "hi",
            Self::Kannada => "kn",
        }
    }

    /// Human-readable name, also the persisted representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::English => "English",
            Self::Malayalam => "Malayalam",
            Self::Hindi => "Hindi",
            Self::Kannada => "Kannada",
        }
    }

    /// All supported languages, in display order
    #[must_use]
    pub const fn all() -> [Self; 4] {
        [Self::English, Self::Malayalam, Self::Hindi, Self::Kannada]
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "english" | "en" => Ok(Self::English),
            "malayalam" | "ml" => Ok(Self::Malayalam),
            "hindi" | "hi" => Ok(Self::Hindi),
            "kannada" | "kn" => Ok(Self::Kannada),
            other => Err(Error::Config(format!("unknown language: {other}"))),
        }
    }
}

/// Process-wide language preference, backed by the preference store
///
/// Reads go to the in-memory cache and never touch the store; writes update
/// the cache first, then write through. A failed store write keeps the new
/// in-memory value — losing persistence is not worth losing the selection.
pub struct LanguageStore {
    cache: RwLock<Language>,
    store: Arc<dyn PrefStore>,
}

impl LanguageStore {
    /// Load the persisted selection, falling back to `default` when the
    /// store has no value, an unreadable value, or fails outright.
    pub async fn load(store: Arc<dyn PrefStore>, default: Language) -> Self {
        let language = match store.read(LANGUAGE_KEY).await {
            Ok(Some(value)) => match value.parse() {
                Ok(lang) => lang,
                Err(_) => {
                    tracing::warn!(value, "unrecognized stored language, using default");
                    default
                }
            },
            Ok(None) => default,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read language preference, using default");
                default
            }
        };

        tracing::debug!(language = %language, "language preference loaded");

        Self {
            cache: RwLock::new(language),
            store,
        }
    }

    /// Current selection
    pub async fn get(&self) -> Language {
        *self.cache.read().await
    }

    /// Update the selection and write it through to the store
    pub async fn set(&self, language: Language) {
        *self.cache.write().await = language;

        if let Err(e) = self.store.write(LANGUAGE_KEY, language.as_str()).await {
            tracing::warn!(error = %e, language = %language, "failed to persist language preference");
        } else {
            tracing::info!(language = %language, "language preference updated");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_malayalam() {
        assert_eq!(Language::default(), Language::Malayalam);
    }

    #[test]
    fn tags_match_locales() {
        assert_eq!(Language::English.as_tag(), "en");
        assert_eq!(Language::Malayalam.as_tag(), "ml");
        assert_eq!(Language::Hindi.as_tag(), "hi");
        assert_eq!(Language::Kannada.as_tag(), "kn");
    }

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!("hindi".parse::<Language>().unwrap(), Language::Hindi);
        assert_eq!("MALAYALAM".parse::<Language>().unwrap(), Language::Malayalam);
        assert_eq!("  Kannada ".parse::<Language>().unwrap(), Language::Kannada);
    }

    #[test]
    fn parses_tags() {
        assert_eq!("en".parse::<Language>().unwrap(), Language::English);
        assert_eq!("kn".parse::<Language>().unwrap(), Language::Kannada);
    }

    #[test]
    fn rejects_unknown() {
        assert!("klingon".parse::<Language>().is_err());
        assert!(String::new().parse::<Language>().is_err());
    }

    #[test]
    fn display_roundtrips_through_parse() {
        for lang in Language::all() {
            assert_eq!(lang.as_str().parse::<Language>().unwrap(), lang);
        }
    }
}
