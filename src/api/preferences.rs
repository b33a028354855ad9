//! Language preference handlers

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use super::ApiState;
use crate::language::Language;

/// Current language selection
#[derive(Serialize)]
pub struct LanguageResponse {
    pub language: &'static str,
    pub tag: &'static str,
}

impl From<Language> for LanguageResponse {
    fn from(language: Language) -> Self {
        Self {
            language: language.as_str(),
            tag: language.as_tag(),
        }
    }
}

/// Body of a language change request
#[derive(Deserialize)]
pub struct LanguageUpdate {
    /// Language name or tag, case-insensitive (e.g. "Hindi" or "hi")
    pub language: String,
}

/// Read the current announcement language
pub async fn get_language(State(state): State<Arc<ApiState>>) -> Json<LanguageResponse> {
    Json(state.language.get().await.into())
}

/// Change the announcement language
pub async fn put_language(
    State(state): State<Arc<ApiState>>,
    Json(update): Json<LanguageUpdate>,
) -> Result<Json<LanguageResponse>, (StatusCode, String)> {
    let language: Language = update
        .language
        .parse()
        .map_err(|e| (StatusCode::UNPROCESSABLE_ENTITY, format!("{e}")))?;

    state.language.set(language).await;
    Ok(Json(language.into()))
}
