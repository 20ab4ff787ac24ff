mod card;
pub mod layout;
mod menu;

pub use card::{draw_quit_confirmation, draw_study};
pub use layout::{calculate_study_chunks, centered_rect};
pub use menu::draw_menu;
