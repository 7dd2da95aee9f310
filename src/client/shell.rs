//! Top-level front-end state: the landing page until someone logs in, the
//! communicator afterwards.

use tracing::{info, warn};

use crate::api::payloads::{PublicUser, SignupRequest};
use crate::client::api_client::{ApiClient, ClientError};
use crate::client::communicator::Communicator;
use crate::client::speech::SpeechSynthesizer;
use crate::client::storage::{AUTH_TOKEN_KEY, KeyValueStore};
use crate::client::voice::{VoiceContext, VoiceDialog, resolve_voice_settings};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Landing,
    Communicator,
}

pub struct Shell<S: KeyValueStore> {
    api: ApiClient,
    store: S,
    view: View,
    user: Option<PublicUser>,
    communicator: Option<Communicator>,
    voice: VoiceContext,
    voice_dialog: VoiceDialog,
    /// Last user-facing message (the browser build shows these as alerts).
    pub notice: Option<String>,
}

impl<S: KeyValueStore> Shell<S> {
    pub fn new(api: ApiClient, store: S) -> Self {
        Self {
            api,
            store,
            view: View::Landing,
            user: None,
            communicator: None,
            voice: VoiceContext::new(),
            voice_dialog: VoiceDialog::new(),
            notice: None,
        }
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn user(&self) -> Option<&PublicUser> {
        self.user.as_ref()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn token(&self) -> Option<String> {
        self.store.get(AUTH_TOKEN_KEY)
    }

    pub fn communicator(&self) -> Option<&Communicator> {
        self.communicator.as_ref()
    }

    pub fn communicator_mut(&mut self) -> Option<&mut Communicator> {
        self.communicator.as_mut()
    }

    pub fn voice_dialog(&self) -> &VoiceDialog {
        &self.voice_dialog
    }

    pub fn voice_dialog_mut(&mut self) -> &mut VoiceDialog {
        &mut self.voice_dialog
    }

    fn enter_communicator(&mut self, user: PublicUser) {
        self.user = Some(user);
        self.communicator = Some(Communicator::new());
        self.view = View::Communicator;
    }

    /// Resumes a session from a stored token. A token the server no longer
    /// accepts is dropped.
    pub async fn restore(&mut self) -> bool {
        let Some(token) = self.token() else {
            return false;
        };

        match self.api.me(&token).await {
            Ok(user) => {
                info!("Restored session for {}", user.username);
                self.enter_communicator(user);
                true
            }
            Err(e) => {
                warn!("Stored token rejected: {e}");
                self.store.remove(AUTH_TOKEN_KEY);
                false
            }
        }
    }

    pub async fn signup(&mut self, request: &SignupRequest) -> Result<(), ClientError> {
        match self.api.signup(request).await {
            Ok(_) => {
                self.notice = Some("Sign up successful! Please log in.".to_string());
                Ok(())
            }
            Err(e) => {
                self.notice = Some(format!("Sign up failed: {e}"));
                Err(e)
            }
        }
    }

    pub async fn login(&mut self, username: &str, password: &str) -> Result<(), ClientError> {
        match self.api.login(username, password).await {
            Ok(response) => {
                self.store.set(AUTH_TOKEN_KEY, &response.token);
                self.notice = Some("Login successful!".to_string());
                self.enter_communicator(response.user);
                Ok(())
            }
            Err(e) => {
                self.notice = Some(match &e {
                    ClientError::Api { message, .. } => format!("Login failed: {message}"),
                    ClientError::Http(_) => {
                        "Login failed due to a network error. Please try again.".to_string()
                    }
                });
                Err(e)
            }
        }
    }

    /// Ends the session: speech stops, local storage is wiped and the
    /// landing page comes back.
    pub fn logout(&mut self, synth: &mut dyn SpeechSynthesizer) {
        if let Some(mut communicator) = self.communicator.take() {
            communicator.shutdown(synth);
        }
        self.store.clear();
        self.voice.reset();
        self.voice_dialog = VoiceDialog::new();
        self.user = None;
        self.view = View::Landing;
        self.notice = Some("You are logged out.".to_string());
    }

    /// Speak/Stop button of the communicator.
    ///
    /// Stopping never touches the network; settings are only resolved when
    /// there is something to say.
    pub async fn speak(&mut self, synth: &mut dyn SpeechSynthesizer) {
        let Some(communicator) = self.communicator.as_mut() else {
            return;
        };
        if synth.is_speaking() {
            communicator.stop(synth);
            return;
        }

        let token = self.token();
        let settings =
            resolve_voice_settings(&self.voice, token.as_deref(), &self.api, &self.store).await;
        if let Some(communicator) = self.communicator.as_mut() {
            communicator.speak_or_stop(synth, &settings);
        }
    }

    pub async fn open_voice_dialog(&mut self, synth: &dyn SpeechSynthesizer) {
        let token = self.token();
        self.voice_dialog
            .open(&self.voice, token.as_deref(), &self.api, &self.store)
            .await;
        self.voice_dialog.reconcile_voices(&synth.voices());
    }

    pub async fn save_voice_dialog(&mut self) {
        let token = self.token();
        self.voice_dialog
            .save(&mut self.store, &mut self.voice, token.as_deref(), &self.api)
            .await;
    }

    /// Opens the card editor and fills its picker with the default query.
    pub async fn edit_card(&mut self, card_id: &str) {
        let Some(communicator) = self.communicator.as_mut() else {
            return;
        };
        communicator.click_card(card_id);
        if let Some(dialog) = communicator.edit_dialog_mut() {
            dialog.search.load_initial(&self.api).await;
        }
    }

    pub async fn search_symbols(&mut self, query: &str) {
        let Some(dialog) = self
            .communicator
            .as_mut()
            .and_then(Communicator::edit_dialog_mut)
        else {
            return;
        };
        dialog.search.set_input(query);
        dialog.search.submit(&self.api).await;
    }
}
