use tracing::debug;

use crate::api::payloads::VoiceSettings;
use crate::client::cards::CardBoard;
use crate::client::speech::{SpeechSynthesizer, Utterance};
use crate::client::symbol_search::SymbolSearch;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Normal,
    Edit,
}

/// Open card editor: new label text plus the image picker.
#[derive(Debug, Clone, PartialEq)]
pub struct EditDialog {
    pub card_id: String,
    pub text: String,
    pub search: SymbolSearch,
}

/// One communicator session: the board, the sentence being built, and the
/// transient drag / edit / speech state.
#[derive(Debug, Clone, Default)]
pub struct Communicator {
    pub board: CardBoard,
    pub sentence: String,
    pub mode: Mode,
    pub speaking: bool,
    dragged: Option<String>,
    drop_target: Option<String>,
    editing: Option<EditDialog>,
}

impl Communicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle_edit_mode(&mut self) {
        self.mode = match self.mode {
            Mode::Normal => Mode::Edit,
            Mode::Edit => {
                self.drag_end();
                Mode::Normal
            }
        };
        debug!("Communicator mode: {:?}", self.mode);
    }

    pub fn is_editing(&self) -> bool {
        self.mode == Mode::Edit
    }

    /// In normal mode the card's text is appended to the sentence; in edit
    /// mode the card editor opens instead.
    pub fn click_card(&mut self, card_id: &str) {
        let Some(card) = self.board.card(card_id) else {
            return;
        };

        match self.mode {
            Mode::Normal => {
                if !self.sentence.is_empty() {
                    self.sentence.push(' ');
                }
                self.sentence.push_str(&card.text);
            }
            Mode::Edit => {
                self.editing = Some(EditDialog {
                    card_id: card.id.clone(),
                    text: card.text.clone(),
                    search: SymbolSearch::new(),
                });
            }
        }
    }

    pub fn set_sentence(&mut self, text: impl Into<String>) {
        self.sentence = text.into();
    }

    pub fn delete_last_word(&mut self) {
        let mut words: Vec<&str> = self.sentence.split_whitespace().collect();
        words.pop();
        self.sentence = words.join(" ");
    }

    pub fn clear(&mut self) {
        self.sentence.clear();
    }

    // ─── Speech ───────────────────────────────────────────────────────────────

    /// Stops playback if the engine is speaking, otherwise speaks the
    /// sentence. A blank sentence is not spoken.
    pub fn speak_or_stop(&mut self, synth: &mut dyn SpeechSynthesizer, settings: &VoiceSettings) {
        if synth.is_speaking() {
            self.stop(synth);
            return;
        }
        if self.sentence.trim().is_empty() {
            return;
        }

        let utterance = Utterance::new(self.sentence.clone(), settings, &synth.voices());
        synth.speak(utterance);
        self.speaking = true;
    }

    pub fn stop(&mut self, synth: &mut dyn SpeechSynthesizer) {
        synth.cancel();
        self.speaking = false;
    }

    pub fn utterance_ended(&mut self) {
        self.speaking = false;
    }

    /// Called when the communicator goes away.
    pub fn shutdown(&mut self, synth: &mut dyn SpeechSynthesizer) {
        if synth.is_speaking() {
            synth.cancel();
        }
        self.speaking = false;
    }

    // ─── Drag and drop ────────────────────────────────────────────────────────

    pub fn drag_start(&mut self, card_id: &str) {
        if self.mode == Mode::Edit {
            self.dragged = Some(card_id.to_string());
        }
    }

    pub fn drag_over(&mut self, card_id: &str) {
        self.drop_target = Some(card_id.to_string());
    }

    pub fn drag_end(&mut self) {
        self.dragged = None;
        self.drop_target = None;
    }

    /// Moves the dragged card into the slot of `target_id`. Returns whether
    /// the board changed.
    pub fn drop(&mut self, target_id: &str) -> bool {
        let dragged = self.dragged.take();
        self.drop_target = None;
        let Some(dragged) = dragged.filter(|_| self.mode == Mode::Edit) else {
            return false;
        };
        self.board.move_card(&dragged, target_id)
    }

    pub fn is_dragging(&self, card_id: &str) -> bool {
        self.dragged.as_deref() == Some(card_id)
    }

    pub fn is_drop_target(&self, card_id: &str) -> bool {
        self.drop_target.as_deref() == Some(card_id)
    }

    // ─── Card editor ──────────────────────────────────────────────────────────

    pub fn edit_dialog(&self) -> Option<&EditDialog> {
        self.editing.as_ref()
    }

    pub fn edit_dialog_mut(&mut self) -> Option<&mut EditDialog> {
        self.editing.as_mut()
    }

    pub fn set_edit_text(&mut self, text: impl Into<String>) {
        if let Some(dialog) = self.editing.as_mut() {
            dialog.text = text.into();
        }
    }

    /// Applies the editor's non-empty text and selected image, then closes it.
    pub fn save_edit(&mut self) -> bool {
        let Some(dialog) = self.editing.take() else {
            return false;
        };
        let text = Some(dialog.text).filter(|t| !t.is_empty());
        self.board
            .update_card(&dialog.card_id, text, dialog.search.selected)
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }
}
