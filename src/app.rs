use crate::error::ParseError;
use crate::models::{DisplayMode, StudyApp};
use crate::parser::{deck_name, get_term_files, load_terms, TermParser};
use crate::session::StudySession;
use crossterm::event::{KeyCode, KeyEvent};
use std::path::{Path, PathBuf};

/// Session settings chosen on the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct StudyOptions {
    pub shuffle: bool,
    pub mode: DisplayMode,
    pub seed: Option<u64>,
}

/// Parses `path` and starts a session over its terms.
pub fn open_deck(
    path: &Path,
    parser: &TermParser,
    options: StudyOptions,
) -> Result<StudyApp, ParseError> {
    let parsed = load_terms(path, parser)?;
    let skipped = parsed.warnings.len();

    let mut session = match options.seed {
        Some(seed) => StudySession::with_seed(parsed.terms, seed),
        None => StudySession::new(parsed.terms),
    };
    session.set_shuffle(options.shuffle);
    session.set_display_mode(options.mode);

    let mut study = StudyApp::new(session, deck_name(path));
    if skipped > 0 {
        study.status = Some(format!("Skipped {} malformed line(s), see log", skipped));
    }
    Ok(study)
}

pub struct MenuState {
    pub dir: PathBuf,
    pub term_files: Vec<PathBuf>,
    pub selected_file_index: usize,
    pub status: Option<String>,
}

/// What the menu asks the event loop to do after a key press.
#[derive(Debug, PartialEq, Eq)]
pub enum MenuAction {
    None,
    Open(PathBuf),
    Quit,
}

impl MenuState {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let mut menu = Self {
            dir: dir.into(),
            term_files: Vec::new(),
            selected_file_index: 0,
            status: None,
        };
        menu.refresh();
        menu
    }

    pub fn refresh(&mut self) {
        self.term_files = get_term_files(&self.dir);
        self.selected_file_index = self
            .selected_file_index
            .min(self.term_files.len().saturating_sub(1));
    }

    pub fn handle_input(&mut self, key: KeyEvent) -> MenuAction {
        match key.code {
            KeyCode::Up => {
                if self.selected_file_index > 0 {
                    self.selected_file_index -= 1;
                }
                MenuAction::None
            }
            KeyCode::Down => {
                if self.selected_file_index < self.term_files.len().saturating_sub(1) {
                    self.selected_file_index += 1;
                }
                MenuAction::None
            }
            KeyCode::Enter => match self.term_files.get(self.selected_file_index) {
                Some(path) => MenuAction::Open(path.clone()),
                None => MenuAction::None,
            },
            KeyCode::F(5) => {
                self.refresh();
                MenuAction::None
            }
            KeyCode::Esc | KeyCode::Char('q') => MenuAction::Quit,
            _ => MenuAction::None,
        }
    }
}
