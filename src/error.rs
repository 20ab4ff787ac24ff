use crate::models::TermId;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("could not read terms file {}: {source}", .path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("delimiter must not be empty")]
    EmptyDelimiter,
}

/// Why a single input line was skipped.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineIssue {
    #[error("not enough values to create term")]
    InsufficientValues,

    #[error("term label is empty")]
    EmptyLabel,

    #[error("definition is empty")]
    EmptyDefinition,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    #[error("no more terms left in this pass")]
    NoMoreTerms,

    #[error("no active terms to study")]
    NoActiveTerms,

    #[error("unknown term {0:?}")]
    UnknownTerm(TermId),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Parse(#[from] ParseError),
}
