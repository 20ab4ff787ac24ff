use crate::session::StudySession;

/// A term parsed from one line of a terms file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    pub label: String,
    pub abbreviations: Vec<String>,
    pub definition: String,
    pub active: bool,
}

impl Term {
    pub fn new(label: impl Into<String>, definition: impl Into<String>) -> Self {
        Self::with_abbreviations(label, Vec::new(), definition)
    }

    pub fn with_abbreviations(
        label: impl Into<String>,
        abbreviations: Vec<String>,
        definition: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            abbreviations,
            definition: definition.into(),
            active: true,
        }
    }

    pub fn add_abbreviation(&mut self, abbreviation: impl Into<String>) {
        self.abbreviations.push(abbreviation.into());
    }

    pub fn add_abbreviations<I>(&mut self, abbreviations: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.abbreviations.extend(abbreviations);
    }

    /// Removes the first matching abbreviation, returning it if it was present.
    pub fn remove_abbreviation(&mut self, abbreviation: &str) -> Option<String> {
        let pos = self.abbreviations.iter().position(|a| a == abbreviation)?;
        Some(self.abbreviations.remove(pos))
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Label followed by its abbreviations, e.g. `Photosynthesis (PS, P)`.
    pub fn display_label(&self) -> String {
        if self.abbreviations.is_empty() {
            self.label.clone()
        } else {
            format!("{} ({})", self.label, self.abbreviations.join(", "))
        }
    }
}

/// Stable handle to a term owned by a [`StudySession`]. Never reused after removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TermId(pub(crate) usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    /// Show the label first, reveal the definition on the next advance.
    Flip,
    /// Show label and definition together.
    #[default]
    AllInOne,
}

impl DisplayMode {
    pub fn toggled(self) -> Self {
        match self {
            DisplayMode::Flip => DisplayMode::AllInOne,
            DisplayMode::AllInOne => DisplayMode::Flip,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            DisplayMode::Flip => "Flip",
            DisplayMode::AllInOne => "All in one",
        }
    }
}

/// Which side(s) of the card are visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardFace {
    Question,
    Answer,
    Both,
}

impl CardFace {
    pub fn shows_label(self) -> bool {
        matches!(self, CardFace::Question | CardFace::Both)
    }

    pub fn shows_definition(self) -> bool {
        matches!(self, CardFace::Answer | CardFace::Both)
    }
}

/// What the presentation layer should render after an advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardView<'a> {
    pub term: &'a Term,
    pub face: CardFace,
}

/// A loaded deck being studied, plus the screen state around it.
pub struct StudyApp {
    pub session: StudySession,
    pub deck_name: String,
    pub status: Option<String>,
    pub show_history: bool,
}

impl StudyApp {
    pub fn new(session: StudySession, deck_name: impl Into<String>) -> Self {
        Self {
            session,
            deck_name: deck_name.into(),
            status: None,
            show_history: false,
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum AppState {
    Menu,
    Study,
    StudyQuitConfirm,
}
