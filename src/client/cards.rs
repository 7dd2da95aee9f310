use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Section {
    Column1,
    Column2,
    Grid,
}

impl Section {
    pub const ALL: [Section; 3] = [Section::Column1, Section::Column2, Section::Grid];

    fn id_prefix(self) -> &'static str {
        match self {
            Section::Column1 => "col1",
            Section::Column2 => "col2",
            Section::Grid => "grid",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Section::Column1 => write!(f, "column1"),
            Section::Column2 => write!(f, "column2"),
            Section::Grid => write!(f, "grid"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    pub text: String,
    pub image: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardLocation {
    pub section: Section,
    pub index: usize,
}

// ─── Default vocabulary ───────────────────────────────────────────────────────

/// Navigation column.
const COLUMN1: [(&str, &str); 6] = [
    ("Back", "images/nav/back.png"),
    ("Core", "images/nav/core.png"),
    ("Social", "images/nav/social.png"),
    ("Vocabulary", "images/nav/vocabulary.png"),
    ("Keyboard", "images/nav/keyboard.png"),
    ("Personal", "images/nav/personal.png"),
];

/// Gestalt starters.
const COLUMN2: [(&str, &str); 7] = [
    ("Let's", "images/gestalt/lets.png"),
    ("It's a", "images/gestalt/its_a.png"),
    ("Get the", "images/gestalt/get_the.png"),
    ("Don't", "images/gestalt/dont.png"),
    ("How about", "images/gestalt/how_about.png"),
    ("Help me", "images/gestalt/help_me.png"),
    ("+", "images/core/plus.png"),
];

/// Core words, six per row.
const GRID: [(&str, &str); 42] = [
    ("I", "images/core/i_1.png"),
    ("want", "images/core/want.png"),
    ("can", "images/core/can.png"),
    ("do", "images/core/do_1.png"),
    ("that", "images/core/that.png"),
    ("no", "images/core/no.png"),
    ("you", "images/core/you.png"),
    ("go", "images/core/go.png"),
    ("stop", "images/core/stop.png"),
    ("take", "images/core/take.png"),
    ("this", "images/core/this_1.png"),
    ("yes", "images/core/yes.png"),
    ("he", "images/core/he.png"),
    ("open", "images/core/open.png"),
    ("get", "images/core/get.png"),
    ("help", "images/core/help.png"),
    ("some", "images/core/some.png"),
    ("more", "images/core/more.png"),
    ("she", "images/core/she.png"),
    ("give", "images/core/give.png"),
    ("make", "images/core/make.png"),
    ("put", "images/core/put.png"),
    ("here", "images/core/here.png"),
    ("in", "images/core/in_1.png"),
    ("they", "images/core/they.png"),
    ("tell", "images/core/tell.png"),
    ("is", "images/core/is.png"),
    ("listen", "images/core/listen.png"),
    ("there", "images/core/there.png"),
    ("out", "images/core/out.png"),
    ("it", "images/core/it.png"),
    ("find", "images/core/find.png"),
    ("come", "images/core/come.png"),
    ("drink", "images/core/drink.png"),
    ("up", "images/core/up.png"),
    ("down", "images/core/down.png"),
    ("+", "images/core/plus.png"),
    ("+", "images/core/plus.png"),
    ("eat", "images/core/eat.png"),
    ("sleep", "images/core/sleep.png"),
    ("+", "images/core/plus.png"),
    ("+", "images/core/plus.png"),
];

fn build(section: Section, defaults: &[(&str, &str)]) -> Vec<Card> {
    defaults
        .iter()
        .enumerate()
        .map(|(i, (text, image))| Card {
            id: format!("{}-{i}", section.id_prefix()),
            text: (*text).to_string(),
            image: (*image).to_string(),
        })
        .collect()
}

// ─── Board ────────────────────────────────────────────────────────────────────

/// The three card collections of one communicator session. Cards are only
/// ever edited or moved, never created or dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardBoard {
    column1: Vec<Card>,
    column2: Vec<Card>,
    grid: Vec<Card>,
}

impl Default for CardBoard {
    fn default() -> Self {
        Self {
            column1: build(Section::Column1, &COLUMN1),
            column2: build(Section::Column2, &COLUMN2),
            grid: build(Section::Grid, &GRID),
        }
    }
}

impl CardBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn section(&self, section: Section) -> &[Card] {
        match section {
            Section::Column1 => &self.column1,
            Section::Column2 => &self.column2,
            Section::Grid => &self.grid,
        }
    }

    fn section_mut(&mut self, section: Section) -> &mut Vec<Card> {
        match section {
            Section::Column1 => &mut self.column1,
            Section::Column2 => &mut self.column2,
            Section::Grid => &mut self.grid,
        }
    }

    pub fn total(&self) -> usize {
        self.column1.len() + self.column2.len() + self.grid.len()
    }

    pub fn find(&self, card_id: &str) -> Option<CardLocation> {
        Section::ALL.into_iter().find_map(|section| {
            self.section(section)
                .iter()
                .position(|card| card.id == card_id)
                .map(|index| CardLocation { section, index })
        })
    }

    pub fn card(&self, card_id: &str) -> Option<&Card> {
        let loc = self.find(card_id)?;
        self.section(loc.section).get(loc.index)
    }

    /// Moves `dragged_id` to the slot currently held by `target_id`, in the
    /// target's collection. Returns false when nothing moved.
    pub fn move_card(&mut self, dragged_id: &str, target_id: &str) -> bool {
        if dragged_id == target_id {
            return false;
        }
        let (Some(source), Some(target)) = (self.find(dragged_id), self.find(target_id)) else {
            return false;
        };

        let card = self.section_mut(source.section).remove(source.index);
        let destination = self.section_mut(target.section);
        let index = target.index.min(destination.len());
        destination.insert(index, card);
        true
    }

    /// Applies a relabel and/or re-image to the card with `card_id`,
    /// wherever it currently sits.
    pub fn update_card(
        &mut self,
        card_id: &str,
        text: Option<String>,
        image: Option<String>,
    ) -> bool {
        let Some(loc) = self.find(card_id) else {
            return false;
        };
        let card = &mut self.section_mut(loc.section)[loc.index];
        if let Some(text) = text {
            card.text = text;
        }
        if let Some(image) = image {
            card.image = image;
        }
        true
    }
}
