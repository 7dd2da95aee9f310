use serde_json::{Map, Value, json};
use sqlx::SqlitePool;

use crate::api::payloads::{DEFAULT_PITCH, DEFAULT_RATE, VoiceSettings};
use crate::db::StoreError;
use crate::db::models::USER_PROFILE;
use crate::db::repo;

/// The `user_profiles.preferences` document. Only `voice` is interpreted;
/// every other key is written back untouched, and a `voice` entry of the
/// wrong shape is read leniently and replaced on the next save.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Preferences {
    doc: Map<String, Value>,
}

impl Preferences {
    /// Accepts a JSON object, a JSON string holding an object, or nothing.
    pub fn parse(raw: Option<&str>) -> Result<Self, serde_json::Error> {
        let Some(raw) = raw.filter(|r| !r.trim().is_empty()) else {
            return Ok(Self::default());
        };

        let value = match serde_json::from_str::<Value>(raw)? {
            Value::String(inner) => serde_json::from_str::<Value>(&inner)?,
            other => other,
        };

        match value {
            Value::Null => Ok(Self::default()),
            Value::Object(doc) => Ok(Self { doc }),
            _ => Err(serde::de::Error::custom(
                "preferences document is not a JSON object",
            )),
        }
    }

    pub fn with_voice(mut self, voice: &VoiceSettings) -> Self {
        self.doc.insert(
            "voice".to_string(),
            json!({
                "rate": voice.rate,
                "pitch": voice.pitch,
                "voiceName": voice.voice_name,
            }),
        );
        self
    }

    /// Field-by-field read of `voice`: anything missing, zero or of the
    /// wrong type takes its default.
    pub fn voice_or_default(&self) -> VoiceSettings {
        let voice = self.doc.get("voice");
        let field = |key: &str| voice.and_then(|v| v.get(key));

        VoiceSettings {
            rate: field("rate").and_then(Value::as_f64).unwrap_or(DEFAULT_RATE),
            pitch: field("pitch").and_then(Value::as_f64).unwrap_or(DEFAULT_PITCH),
            voice_name: field("voiceName")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        }
        .normalized()
    }

    pub fn to_document(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.doc)
    }
}

/// Read-modify-write of the `voice` key; creates the profile row if the
/// user has none yet.
pub async fn save_voice_settings(
    pool: &SqlitePool,
    user_id: &str,
    voice: &VoiceSettings,
) -> Result<(), StoreError> {
    match repo::get_profile(pool, user_id, USER_PROFILE).await? {
        Some(profile) => {
            let merged =
                Preferences::parse(profile.preferences.as_deref())?.with_voice(voice);
            repo::update_profile_preferences(pool, user_id, USER_PROFILE, &merged.to_document()?)
                .await?;
        }
        None => {
            let fresh = Preferences::default().with_voice(voice);
            repo::insert_profile(pool, user_id, USER_PROFILE, &fresh.to_document()?).await?;
        }
    }

    Ok(())
}

pub async fn load_voice_settings(
    pool: &SqlitePool,
    user_id: &str,
) -> Result<VoiceSettings, StoreError> {
    let Some(profile) = repo::get_profile(pool, user_id, USER_PROFILE).await? else {
        return Ok(VoiceSettings::default());
    };

    Ok(Preferences::parse(profile.preferences.as_deref())?.voice_or_default())
}
