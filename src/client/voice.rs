//! Voice preferences on the client: where they come from, and the dialog
//! that edits them.
//!
//! Settings are resolved in priority order: the in-memory [`VoiceContext`],
//! then the server (only with a token), then local storage, then defaults.

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::api::payloads::{DEFAULT_PITCH, DEFAULT_RATE, VoiceSettings};
use crate::client::api_client::ClientError;
use crate::client::speech::{SpeechSynthesizer, Utterance, VoiceInfo};
use crate::client::storage::{KeyValueStore, VOICE_NAME_KEY, VOICE_PITCH_KEY, VOICE_RATE_KEY};

pub const RATE_MIN: f64 = 0.5;
pub const RATE_MAX: f64 = 2.0;
pub const PITCH_MIN: f64 = 0.5;
pub const PITCH_MAX: f64 = 2.0;
pub const STEP: f64 = 0.1;

pub const TEST_PHRASE: &str = "Testing the voice to hear how it sounds.";

/// Settings shared by every component of one signed-in session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VoiceContext {
    settings: Option<VoiceSettings>,
}

impl VoiceContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<&VoiceSettings> {
        self.settings.as_ref()
    }

    pub fn set(&mut self, settings: VoiceSettings) {
        self.settings = Some(settings);
    }

    pub fn reset(&mut self) {
        self.settings = None;
    }
}

#[async_trait]
pub trait VoiceSettingsRemote: Send + Sync {
    async fn fetch_voice_settings(&self, token: &str) -> Result<VoiceSettings, ClientError>;

    async fn store_voice_settings(
        &self,
        token: &str,
        settings: &VoiceSettings,
    ) -> Result<(), ClientError>;
}

// ─── Resolution steps ─────────────────────────────────────────────────────────

pub fn from_context(ctx: &VoiceContext) -> Option<VoiceSettings> {
    ctx.get().cloned()
}

pub async fn from_server(
    remote: &dyn VoiceSettingsRemote,
    token: Option<&str>,
) -> Option<VoiceSettings> {
    let token = token?;
    match remote.fetch_voice_settings(token).await {
        Ok(settings) => Some(settings.normalized()),
        Err(e) => {
            warn!("Could not load voice settings from server: {e}");
            None
        }
    }
}

/// `None` unless at least one voice key is stored. Unparseable numbers read
/// as the defaults.
pub fn from_local_store(store: &dyn KeyValueStore) -> Option<VoiceSettings> {
    let rate = store.get(VOICE_RATE_KEY);
    let pitch = store.get(VOICE_PITCH_KEY);
    let voice_name = store.get(VOICE_NAME_KEY);
    if rate.is_none() && pitch.is_none() && voice_name.is_none() {
        return None;
    }

    let parse = |raw: Option<String>, default: f64| {
        raw.and_then(|s| s.trim().parse::<f64>().ok())
            .unwrap_or(default)
    };

    Some(
        VoiceSettings {
            rate: parse(rate, DEFAULT_RATE),
            pitch: parse(pitch, DEFAULT_PITCH),
            voice_name: voice_name.unwrap_or_default(),
        }
        .normalized(),
    )
}

pub async fn resolve_voice_settings(
    ctx: &VoiceContext,
    token: Option<&str>,
    remote: &dyn VoiceSettingsRemote,
    store: &dyn KeyValueStore,
) -> VoiceSettings {
    if let Some(settings) = from_context(ctx) {
        return settings;
    }
    if let Some(settings) = from_server(remote, token).await {
        return settings;
    }
    if let Some(settings) = from_local_store(store) {
        debug!("Using voice settings from local storage");
        return settings;
    }
    VoiceSettings::default()
}

pub fn write_local(store: &mut dyn KeyValueStore, settings: &VoiceSettings) {
    store.set(VOICE_RATE_KEY, &settings.rate.to_string());
    store.set(VOICE_PITCH_KEY, &settings.pitch.to_string());
    store.set(VOICE_NAME_KEY, &settings.voice_name);
}

fn step(value: f64, delta: f64, min: f64, max: f64) -> f64 {
    (((value + delta) * 10.0).round() / 10.0).clamp(min, max)
}

// ─── Dialog ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveStatus {
    Idle,
    Saving,
    Saved,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct VoiceDialog {
    pub open: bool,
    pub draft: VoiceSettings,
    pub status: SaveStatus,
    pub testing: bool,
}

impl Default for VoiceDialog {
    fn default() -> Self {
        Self {
            open: false,
            draft: VoiceSettings::default(),
            status: SaveStatus::Idle,
            testing: false,
        }
    }
}

impl VoiceDialog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn open(
        &mut self,
        ctx: &VoiceContext,
        token: Option<&str>,
        remote: &dyn VoiceSettingsRemote,
        store: &dyn KeyValueStore,
    ) {
        self.draft = resolve_voice_settings(ctx, token, remote, store).await;
        self.status = SaveStatus::Idle;
        self.testing = false;
        self.open = true;
    }

    pub fn adjust_rate(&mut self, delta: f64) {
        self.draft.rate = step(self.draft.rate, delta, RATE_MIN, RATE_MAX);
    }

    pub fn adjust_pitch(&mut self, delta: f64) {
        self.draft.pitch = step(self.draft.pitch, delta, PITCH_MIN, PITCH_MAX);
    }

    pub fn can_lower_rate(&self) -> bool {
        self.draft.rate > RATE_MIN
    }

    pub fn can_raise_rate(&self) -> bool {
        self.draft.rate < RATE_MAX
    }

    pub fn can_lower_pitch(&self) -> bool {
        self.draft.pitch > PITCH_MIN
    }

    pub fn can_raise_pitch(&self) -> bool {
        self.draft.pitch < PITCH_MAX
    }

    pub fn select_voice(&mut self, name: impl Into<String>) {
        self.draft.voice_name = name.into();
    }

    /// Called whenever the engine's voice list changes.
    pub fn reconcile_voices(&mut self, voices: &[VoiceInfo]) {
        let Some(first) = voices.first() else {
            return;
        };
        let known = voices.iter().any(|v| v.name == self.draft.voice_name);
        if !known {
            self.draft.voice_name = first.name.clone();
        }
    }

    /// Speaks the communicator buffer (or [`TEST_PHRASE`] when it is empty)
    /// with the draft settings. A second press stops playback.
    pub fn test(&mut self, synth: &mut dyn SpeechSynthesizer, buffer: &str) {
        if synth.is_speaking() {
            synth.cancel();
            self.testing = false;
            return;
        }

        let text = if buffer.is_empty() { TEST_PHRASE } else { buffer };
        if text.trim().is_empty() {
            return;
        }

        let utterance = Utterance::new(text, &self.draft, &synth.voices());
        synth.speak(utterance);
        self.testing = true;
    }

    pub fn utterance_ended(&mut self) {
        self.testing = false;
    }

    /// Local storage and the context are always updated. The server is
    /// only contacted with a token; its failure is reported through
    /// `status` but does not keep the dialog open.
    pub async fn save(
        &mut self,
        store: &mut dyn KeyValueStore,
        ctx: &mut VoiceContext,
        token: Option<&str>,
        remote: &dyn VoiceSettingsRemote,
    ) {
        self.begin_save(store, ctx, token.is_some());
        let outcome = match token {
            Some(token) => Some(remote.store_voice_settings(token, &self.draft).await),
            None => None,
        };
        self.finish_save(outcome);
    }

    /// Local half of [`VoiceDialog::save`]. Leaves `status` at `Saving`
    /// when a server write follows, so a host driving the two halves itself
    /// can render it.
    pub fn begin_save(
        &mut self,
        store: &mut dyn KeyValueStore,
        ctx: &mut VoiceContext,
        server_write: bool,
    ) {
        write_local(store, &self.draft);
        ctx.set(self.draft.clone());
        if server_write {
            self.status = SaveStatus::Saving;
        }
    }

    /// `None` when no server write was attempted.
    pub fn finish_save(&mut self, outcome: Option<Result<(), ClientError>>) {
        if let Some(outcome) = outcome {
            self.status = match outcome {
                Ok(()) => SaveStatus::Saved,
                Err(e) => {
                    warn!("Failed to save voice settings to server: {e}");
                    SaveStatus::Failed(e.to_string())
                }
            };
        }
        self.open = false;
    }

    pub fn cancel(&mut self) {
        self.open = false;
        self.testing = false;
        self.status = SaveStatus::Idle;
    }
}


#[cfg(test)]
mod tests {
    use super::fake::FakeRemote;
    use super::*;
    use crate::client::speech::fake::RecordingSynth;
    use crate::client::storage::MemoryStore;

    fn settings(rate: f64, pitch: f64, name: &str) -> VoiceSettings {
        VoiceSettings {
            rate,
            pitch,
            voice_name: name.to_string(),
        }
    }

    #[tokio::test]
    async fn test_context_wins_over_everything() {
        let mut ctx = VoiceContext::new();
        ctx.set(settings(1.2, 1.0, "ctx"));
        let remote = FakeRemote::holding(settings(1.5, 1.0, "server"));
        let mut store = MemoryStore::new();
        write_local(&mut store, &settings(0.6, 0.6, "local"));

        let resolved = resolve_voice_settings(&ctx, Some("good"), &remote, &store).await;
        assert_eq!(resolved.voice_name, "ctx");
        assert_eq!(*remote.fetches.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_server_used_only_with_token() {
        let ctx = VoiceContext::new();
        let remote = FakeRemote::holding(settings(1.5, 1.0, "server"));
        let mut store = MemoryStore::new();
        write_local(&mut store, &settings(0.6, 0.6, "local"));

        let with_token = resolve_voice_settings(&ctx, Some("good"), &remote, &store).await;
        assert_eq!(with_token.voice_name, "server");

        let without = resolve_voice_settings(&ctx, None, &remote, &store).await;
        assert_eq!(without.voice_name, "local");
        assert_eq!(*remote.fetches.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_server_failure_falls_through_to_local_then_default() {
        let ctx = VoiceContext::new();
        let remote = FakeRemote::default();
        let mut store = MemoryStore::new();

        let resolved = resolve_voice_settings(&ctx, Some("bad"), &remote, &store).await;
        assert_eq!(resolved, VoiceSettings::default());

        store.set(VOICE_RATE_KEY, "1.7");
        let resolved = resolve_voice_settings(&ctx, Some("bad"), &remote, &store).await;
        assert_eq!(resolved, settings(1.7, 1.0, ""));
    }

    #[test]
    fn test_local_store_garbage_reads_as_defaults() {
        let mut store = MemoryStore::new();
        assert!(from_local_store(&store).is_none());
        store.set(VOICE_PITCH_KEY, "loud");
        store.set(VOICE_RATE_KEY, "0");
        assert_eq!(from_local_store(&store), Some(VoiceSettings::default()));
    }

    #[test]
    fn test_rate_and_pitch_steps_clamp_and_round() {
        let mut dialog = VoiceDialog::new();
        for _ in 0..20 {
            dialog.adjust_rate(STEP);
        }
        assert_eq!(dialog.draft.rate, RATE_MAX);
        assert!(!dialog.can_raise_rate());

        for _ in 0..20 {
            dialog.adjust_pitch(-STEP);
        }
        assert_eq!(dialog.draft.pitch, PITCH_MIN);
        assert!(!dialog.can_lower_pitch());

        dialog.draft.rate = 1.0;
        dialog.adjust_rate(STEP);
        dialog.adjust_rate(STEP);
        dialog.adjust_rate(STEP);
        assert_eq!(dialog.draft.rate, 1.3);
    }

    #[test]
    fn test_reconcile_keeps_known_voice_else_first() {
        let synth = RecordingSynth::with_voices(&["Ava", "Tom"]);
        let mut dialog = VoiceDialog::new();

        dialog.select_voice("Tom");
        dialog.reconcile_voices(&synth.voices());
        assert_eq!(dialog.draft.voice_name, "Tom");

        dialog.select_voice("Gone");
        dialog.reconcile_voices(&synth.voices());
        assert_eq!(dialog.draft.voice_name, "Ava");

        dialog.select_voice("Gone");
        dialog.reconcile_voices(&[]);
        assert_eq!(dialog.draft.voice_name, "Gone");
    }

    #[test]
    fn test_speak_test_phrase_and_stop() {
        let mut synth = RecordingSynth::with_voices(&["Ava", "Tom"]);
        let mut dialog = VoiceDialog::new();
        dialog.draft = settings(1.4, 0.9, "Tom");

        dialog.test(&mut synth, "");
        assert!(dialog.testing);
        let spoken = &synth.spoken[0];
        assert_eq!(spoken.text, TEST_PHRASE);
        assert_eq!(spoken.rate, 1.4);
        assert_eq!(spoken.voice.as_ref().unwrap().name, "Tom");

        dialog.test(&mut synth, "");
        assert_eq!(synth.cancels, 1);
        assert!(!dialog.testing);
        assert_eq!(synth.spoken.len(), 1);

        dialog.test(&mut synth, "I want");
        assert_eq!(synth.spoken[1].text, "I want");
        synth.finish();
        dialog.utterance_ended();

        dialog.test(&mut synth, "   ");
        assert_eq!(synth.spoken.len(), 2);
    }

    #[tokio::test]
    async fn test_save_with_token_persists_everywhere() {
        let remote = FakeRemote::default();
        let mut store = MemoryStore::new();
        let mut ctx = VoiceContext::new();
        let mut dialog = VoiceDialog::new();
        dialog.open(&ctx, Some("good"), &remote, &store).await;
        assert!(dialog.open);

        dialog.adjust_rate(0.5);
        dialog.select_voice("Ava");
        dialog.save(&mut store, &mut ctx, Some("good"), &remote).await;

        let expected = settings(1.5, 1.0, "Ava");
        assert!(!dialog.open);
        assert_eq!(dialog.status, SaveStatus::Saved);
        assert_eq!(ctx.get(), Some(&expected));
        assert_eq!(from_local_store(&store), Some(expected.clone()));
        assert_eq!(*remote.stored.lock().unwrap(), Some(expected));
    }

    #[tokio::test]
    async fn test_save_without_token_or_with_bad_token() {
        let remote = FakeRemote::default();
        let mut store = MemoryStore::new();
        let mut ctx = VoiceContext::new();
        let mut dialog = VoiceDialog::new();
        dialog.open = true;
        dialog.draft = settings(0.8, 1.2, "");

        dialog.save(&mut store, &mut ctx, None, &remote).await;
        assert_eq!(dialog.status, SaveStatus::Idle);
        assert!(remote.stored.lock().unwrap().is_none());
        assert_eq!(store.get(VOICE_RATE_KEY).as_deref(), Some("0.8"));

        dialog.open = true;
        dialog.save(&mut store, &mut ctx, Some("bad"), &remote).await;
        assert_eq!(dialog.status, SaveStatus::Failed("Invalid token".to_string()));
        assert!(!dialog.open);
        assert_eq!(ctx.get().map(|s| s.pitch), Some(1.2));
    }

    #[test]
    fn test_saving_status_between_halves() {
        let mut store = MemoryStore::new();
        let mut ctx = VoiceContext::new();
        let mut dialog = VoiceDialog::new();
        dialog.open = true;

        dialog.begin_save(&mut store, &mut ctx, true);
        assert_eq!(dialog.status, SaveStatus::Saving);
        assert!(dialog.open);
        assert!(ctx.get().is_some());

        dialog.finish_save(Some(Ok(())));
        assert_eq!(dialog.status, SaveStatus::Saved);
        assert!(!dialog.open);

        dialog.open = true;
        dialog.status = SaveStatus::Idle;
        dialog.begin_save(&mut store, &mut ctx, false);
        dialog.finish_save(None);
        assert_eq!(dialog.status, SaveStatus::Idle);
        assert!(!dialog.open);
    }

    #[test]
    fn test_cancel_closes_without_side_effects() {
        let mut dialog = VoiceDialog::new();
        dialog.open = true;
        dialog.adjust_rate(STEP);
        dialog.cancel();
        assert!(!dialog.open);
    }
}
