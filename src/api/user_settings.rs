use axum::{Json, extract::State};
use std::sync::Arc;
use tracing::info;

use crate::api::payloads::{AckResponse, VoiceSettings, VoiceSettingsResponse};
use crate::api::server::AppState;
use crate::api::token::BearerClaims;
use crate::db::preferences;
use crate::error::{ApiError, settings};

pub async fn save_voice(
    State(state): State<Arc<AppState>>,
    BearerClaims(claims): BearerClaims,
    Json(voice): Json<VoiceSettings>,
) -> Result<Json<AckResponse>, ApiError> {
    preferences::save_voice_settings(&state.db, &claims.id, &voice)
        .await
        .map_err(settings("Server error while saving voice settings"))?;

    info!(user_id = %claims.id, rate = voice.rate, pitch = voice.pitch, "Voice settings saved");

    Ok(Json(AckResponse {
        success: true,
        message: "Voice settings saved successfully".to_string(),
    }))
}

pub async fn get_voice(
    State(state): State<Arc<AppState>>,
    BearerClaims(claims): BearerClaims,
) -> Result<Json<VoiceSettingsResponse>, ApiError> {
    let voice = preferences::load_voice_settings(&state.db, &claims.id)
        .await
        .map_err(settings("Server error while fetching voice settings"))?;

    Ok(Json(VoiceSettingsResponse {
        success: true,
        settings: voice,
    }))
}
