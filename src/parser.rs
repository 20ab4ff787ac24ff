use crate::error::{LineIssue, ParseError};
use crate::models::Term;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_DELIMITER: &str = ":";
pub const TERMS_EXTENSION: &str = "txt";

// Groups past this limit stay joined in the final piece.
const MAX_HEAD_PIECES: usize = 11;

lazy_static::lazy_static! {
    static ref ABBREVIATION_SPLIT: Regex = Regex::new(r"[(/)]+").expect("valid regex");
}

/// A line that could not be turned into a term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedLine {
    /// 1-based line number in the source.
    pub line_number: usize,
    pub line: String,
    pub issue: LineIssue,
}

#[derive(Debug, Default)]
pub struct ParsedTerms {
    pub terms: Vec<Term>,
    pub warnings: Vec<MalformedLine>,
}

/// Parses `head<delimiter>definition` lines into terms.
#[derive(Debug, Clone)]
pub struct TermParser {
    delimiter: String,
}

impl Default for TermParser {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER.to_string(),
        }
    }
}

impl TermParser {
    pub fn new(delimiter: &str) -> Result<Self, ParseError> {
        let mut parser = Self::default();
        parser.set_delimiter(delimiter)?;
        Ok(parser)
    }

    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    pub fn set_delimiter(&mut self, delimiter: &str) -> Result<(), ParseError> {
        if delimiter.is_empty() {
            return Err(ParseError::EmptyDelimiter);
        }
        self.delimiter = delimiter.to_string();
        Ok(())
    }

    pub fn parse_file(&self, path: &Path) -> Result<ParsedTerms, ParseError> {
        let content = fs::read_to_string(path).map_err(|source| ParseError::FileAccess {
            path: path.to_path_buf(),
            source,
        })?;
        let parsed = self.parse_str(&content);
        log::info!(
            "Parsed {} terms from {} ({} lines skipped)",
            parsed.terms.len(),
            path.display(),
            parsed.warnings.len()
        );
        Ok(parsed)
    }

    pub fn parse_str(&self, content: &str) -> ParsedTerms {
        self.parse_lines(content.lines())
    }

    pub fn parse_lines<'a, I>(&self, lines: I) -> ParsedTerms
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut parsed = ParsedTerms::default();

        for (idx, line) in lines.into_iter().enumerate() {
            match self.parse_line(line) {
                Ok(term) => parsed.terms.push(term),
                Err(issue) => {
                    log::warn!(
                        "Skipping line {}: {}: \"{}\" using delimiter: {}",
                        idx + 1,
                        issue,
                        line,
                        self.delimiter
                    );
                    parsed.warnings.push(MalformedLine {
                        line_number: idx + 1,
                        line: line.to_string(),
                        issue,
                    });
                }
            }
        }

        parsed
    }

    pub fn parse_line(&self, line: &str) -> Result<Term, LineIssue> {
        let mut segments: Vec<&str> = line.split(self.delimiter.as_str()).collect();
        // Trailing empty segments do not count as values.
        while segments.last().is_some_and(|s| s.is_empty()) {
            segments.pop();
        }
        if segments.len() < 2 {
            return Err(LineIssue::InsufficientValues);
        }

        let head = segments[0];
        let definition = segments[segments.len() - 1].trim();

        let mut pieces = ABBREVIATION_SPLIT.splitn(head, MAX_HEAD_PIECES);
        let label = pieces.next().unwrap_or_default().trim();
        let abbreviations: Vec<String> = pieces
            .map(str::trim)
            .filter(|piece| !piece.is_empty())
            .map(str::to_string)
            .collect();

        if label.is_empty() {
            return Err(LineIssue::EmptyLabel);
        }
        if definition.is_empty() {
            return Err(LineIssue::EmptyDefinition);
        }

        Ok(Term::with_abbreviations(label, abbreviations, definition))
    }
}

/// Lists the term files in `dir`, sorted by path.
pub fn get_term_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();

    if dir.is_dir()
        && let Ok(entries) = fs::read_dir(dir)
    {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_file()
                && let Some(ext) = path.extension()
                && ext == TERMS_EXTENSION
            {
                files.push(path);
            }
        }
    }

    files.sort();
    files
}

/// Reads a deck file; skipped lines are also logged with their deck name.
pub fn load_terms(path: &Path, parser: &TermParser) -> Result<ParsedTerms, ParseError> {
    let parsed = parser.parse_file(path)?;
    for warning in &parsed.warnings {
        log::debug!(
            "{}:{}: {}",
            deck_name(path),
            warning.line_number,
            warning.issue
        );
    }
    Ok(parsed)
}

pub fn deck_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
