//! Text-to-speech seam. The host supplies the engine (Web Speech in a
//! browser, a native TTS elsewhere); the board only builds utterances.

use crate::api::payloads::VoiceSettings;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceInfo {
    pub name: String,
    pub lang: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub rate: f64,
    pub pitch: f64,
    pub voice: Option<VoiceInfo>,
}

impl Utterance {
    /// The voice is looked up by name; an unknown or empty name leaves the
    /// engine default in place.
    pub fn new(text: impl Into<String>, settings: &VoiceSettings, voices: &[VoiceInfo]) -> Self {
        let voice = if settings.voice_name.is_empty() {
            None
        } else {
            voices
                .iter()
                .find(|v| v.name == settings.voice_name)
                .cloned()
        };

        Self {
            text: text.into(),
            rate: settings.rate,
            pitch: settings.pitch,
            voice,
        }
    }
}

pub trait SpeechSynthesizer {
    fn voices(&self) -> Vec<VoiceInfo>;

    fn is_speaking(&self) -> bool;

    fn speak(&mut self, utterance: Utterance);

    fn cancel(&mut self);
}
