//! JSON bodies exchanged between the backend and the front-end client.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// The parts of a user record that may leave the server. Names are omitted
/// from the signup acknowledgement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupResponse {
    pub message: String,
    pub user: PublicUser,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
    pub user: PublicUser,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeResponse {
    pub user: PublicUser,
}

pub const DEFAULT_RATE: f64 = 1.0;
pub const DEFAULT_PITCH: f64 = 1.0;

/// Speech parameters stored under `preferences.voice`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceSettings {
    #[serde(default = "default_rate")]
    pub rate: f64,
    #[serde(default = "default_pitch")]
    pub pitch: f64,
    #[serde(default)]
    pub voice_name: String,
}

fn default_rate() -> f64 {
    DEFAULT_RATE
}

fn default_pitch() -> f64 {
    DEFAULT_PITCH
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            rate: DEFAULT_RATE,
            pitch: DEFAULT_PITCH,
            voice_name: String::new(),
        }
    }
}

impl VoiceSettings {
    /// Zero or NaN rate/pitch read back as the defaults.
    pub fn normalized(mut self) -> Self {
        if self.rate == 0.0 || self.rate.is_nan() {
            self.rate = DEFAULT_RATE;
        }
        if self.pitch == 0.0 || self.pitch.is_nan() {
            self.pitch = DEFAULT_PITCH;
        }
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceSettingsResponse {
    pub success: bool,
    pub settings: VoiceSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AckResponse {
    pub success: bool,
    pub message: String,
}

/// Error body of every non-proxy route.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageBody {
    #[serde(default)]
    pub message: Option<String>,
}

/// One OpenSymbols search hit. Only the fields the board uses are typed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Symbol {
    pub image_url: String,
    #[serde(default)]
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_voice_settings_wire_names() {
        let settings = VoiceSettings {
            rate: 1.5,
            pitch: 0.8,
            voice_name: "X".into(),
        };
        assert_eq!(
            serde_json::to_value(&settings).unwrap(),
            json!({ "rate": 1.5, "pitch": 0.8, "voiceName": "X" })
        );
    }

    #[test]
    fn test_partial_voice_fills_defaults() {
        let settings: VoiceSettings = serde_json::from_value(json!({ "rate": 0.0 })).unwrap();
        assert_eq!(settings.normalized(), VoiceSettings::default());
    }

    #[test]
    fn test_signup_summary_omits_names() {
        let user = PublicUser {
            id: "1".into(),
            username: "sam".into(),
            email: "sam@example.com".into(),
            first_name: None,
            last_name: None,
        };
        assert_eq!(
            serde_json::to_value(&user).unwrap(),
            json!({ "id": "1", "username": "sam", "email": "sam@example.com" })
        );
    }
}
