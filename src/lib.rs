pub mod app;
pub mod cli;
pub mod error;
pub mod logger;
pub mod models;
pub mod parser;
pub mod session;
pub mod ui;
pub mod utils;


// Re-exports for convenience
pub use app::{open_deck, MenuAction, MenuState, StudyOptions};
pub use error::{AppError, LineIssue, ParseError, SessionError};
pub use models::{AppState, CardFace, CardView, DisplayMode, StudyApp, Term, TermId};
pub use parser::{get_term_files, load_terms, MalformedLine, ParsedTerms, TermParser, DEFAULT_DELIMITER};
pub use session::{handle_study_input, StudySession, HISTORY_CAPACITY};
pub use ui::{draw_menu, draw_quit_confirmation, draw_study};
