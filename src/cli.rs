use crate::logger::DEFAULT_LOG_FILE;
use crate::models::DisplayMode;
use crate::parser::DEFAULT_DELIMITER;
use clap::{Parser, ValueEnum};
use log::LevelFilter;
use std::path::PathBuf;

/// Study flashcards from `term: definition` text files.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Terms file to study. Opens the deck menu when omitted or unreadable.
    pub file: Option<PathBuf>,

    /// Directory listed by the deck menu.
    #[arg(short, long, default_value = "flashcards")]
    pub dir: PathBuf,

    /// Separator between a term and its definition.
    #[arg(short = 'D', long, default_value = DEFAULT_DELIMITER)]
    pub delimiter: String,

    /// Draw terms in random order.
    #[arg(short, long)]
    pub shuffle: bool,

    #[arg(short, long, value_enum, default_value_t = ModeArg::AllInOne)]
    pub mode: ModeArg,

    /// Seed for shuffling, for a repeatable order.
    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long, default_value = DEFAULT_LOG_FILE)]
    pub log_file: PathBuf,

    #[arg(long, default_value_t = LevelFilter::Info)]
    pub log_level: LevelFilter,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModeArg {
    Flip,
    AllInOne,
}

impl From<ModeArg> for DisplayMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Flip => DisplayMode::Flip,
            ModeArg::AllInOne => DisplayMode::AllInOne,
        }
    }
}
