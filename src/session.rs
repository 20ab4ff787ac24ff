use crate::error::SessionError;
use crate::models::{AppState, CardFace, CardView, DisplayMode, StudyApp, Term, TermId};
use crossterm::event::{KeyCode, KeyEvent};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

/// Number of recently shown terms kept in the history.
pub const HISTORY_CAPACITY: usize = 50;

/// Session controller: owns the terms and decides which one is shown next.
///
/// Terms live in an arena addressed by [`TermId`]. The master list, the active
/// list, the draw queue and the history all hold ids into that arena, so
/// toggling a term is visible everywhere while list membership is managed
/// explicitly here.
#[derive(Debug)]
pub struct StudySession<R = StdRng> {
    terms: Vec<Option<Term>>,
    all: Vec<TermId>,
    active: Vec<TermId>,
    remaining: VecDeque<TermId>,
    history: VecDeque<TermId>,
    current: Option<TermId>,
    shuffle: bool,
    display_mode: DisplayMode,
    answer_revealed: bool,
    rng: R,
}

impl StudySession<StdRng> {
    pub fn new(terms: Vec<Term>) -> Self {
        Self::with_rng(terms, StdRng::from_entropy())
    }

    pub fn with_seed(terms: Vec<Term>, seed: u64) -> Self {
        Self::with_rng(terms, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> StudySession<R> {
    pub fn with_rng(terms: Vec<Term>, rng: R) -> Self {
        let mut session = Self {
            terms: Vec::with_capacity(terms.len()),
            all: Vec::with_capacity(terms.len()),
            active: Vec::new(),
            remaining: VecDeque::new(),
            history: VecDeque::with_capacity(HISTORY_CAPACITY),
            current: None,
            shuffle: false,
            display_mode: DisplayMode::default(),
            answer_revealed: false,
            rng,
        };
        for term in terms {
            session.add_term(term);
        }
        session
    }

    /// Handles the single "advance" action.
    ///
    /// In flip mode with the question showing, this reveals the definition of the
    /// current term. Otherwise the next term is drawn and pushed onto the history.
    /// A failed draw leaves the session unchanged.
    pub fn advance(&mut self) -> Result<CardView<'_>, SessionError> {
        if self.display_mode == DisplayMode::Flip
            && !self.answer_revealed
            && let Some(id) = self.current
        {
            self.answer_revealed = true;
            log::debug!("Revealed definition for {:?}", id);
            return self.view_of(id, CardFace::Answer);
        }

        let id = self.draw()?;
        self.push_history(id);
        self.current = Some(id);

        let face = match self.display_mode {
            DisplayMode::Flip => {
                self.answer_revealed = false;
                CardFace::Question
            }
            DisplayMode::AllInOne => CardFace::Both,
        };
        log::debug!(
            "Drew {:?} ({} remaining, shuffle: {})",
            id,
            self.remaining.len(),
            self.shuffle
        );
        self.view_of(id, face)
    }

    /// The card currently on display, if any term has been drawn.
    pub fn current(&self) -> Option<CardView<'_>> {
        let id = self.current?;
        let term = self.term(id)?;
        let face = match self.display_mode {
            DisplayMode::AllInOne => CardFace::Both,
            DisplayMode::Flip if self.answer_revealed => CardFace::Answer,
            DisplayMode::Flip => CardFace::Question,
        };
        Some(CardView { term, face })
    }

    fn view_of(&self, id: TermId, face: CardFace) -> Result<CardView<'_>, SessionError> {
        let term = self.term(id).ok_or(SessionError::UnknownTerm(id))?;
        Ok(CardView { term, face })
    }

    fn draw(&mut self) -> Result<TermId, SessionError> {
        if self.active.is_empty() {
            return Err(SessionError::NoActiveTerms);
        }

        if self.shuffle {
            if self.remaining.is_empty() {
                self.refill();
            }
            let idx = self.rng.gen_range(0..self.remaining.len());
            self.remaining
                .remove(idx)
                .ok_or(SessionError::NoMoreTerms)
        } else {
            self.remaining.pop_front().ok_or(SessionError::NoMoreTerms)
        }
    }

    fn refill(&mut self) {
        self.remaining.clear();
        self.remaining.extend(self.active.iter().copied());
    }

    fn push_history(&mut self, id: TermId) {
        if self.history.len() >= HISTORY_CAPACITY {
            self.history.pop_front();
        }
        self.history.push_back(id);
    }

    /// Starts a new pass over the active terms, in order.
    pub fn restart(&mut self) {
        self.refill();
        log::info!("Restarted pass over {} active terms", self.active.len());
    }

    pub fn display_mode(&self) -> DisplayMode {
        self.display_mode
    }

    pub fn set_display_mode(&mut self, mode: DisplayMode) {
        if self.display_mode == DisplayMode::Flip && mode != DisplayMode::Flip {
            self.answer_revealed = false;
        }
        self.display_mode = mode;
    }

    pub fn is_answer_revealed(&self) -> bool {
        self.answer_revealed
    }

    pub fn is_shuffle(&self) -> bool {
        self.shuffle
    }

    pub fn set_shuffle(&mut self, shuffle: bool) {
        self.shuffle = shuffle;
    }

    /// Adds a new term to the master list, and to the active list if the term is active.
    pub fn add_term(&mut self, term: Term) -> TermId {
        let id = TermId(self.terms.len());
        let active = term.active;
        self.terms.push(Some(term));
        self.all.push(id);
        if active {
            self.active.push(id);
            self.remaining.push_back(id);
        }
        id
    }

    /// Marks an existing term active and makes it drawable in the current pass.
    pub fn add_active_term(&mut self, id: TermId) -> Result<(), SessionError> {
        self.set_term_active(id, true)
    }

    pub fn set_term_active(&mut self, id: TermId, active: bool) -> Result<(), SessionError> {
        let term = self
            .terms
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .ok_or(SessionError::UnknownTerm(id))?;
        term.set_active(active);

        if active {
            if !self.active.contains(&id) {
                self.active.push(id);
                self.remaining.push_back(id);
            }
        } else {
            self.active.retain(|&a| a != id);
            self.remaining.retain(|&r| r != id);
        }
        Ok(())
    }

    /// Removes a term from every list, returning it.
    pub fn remove_term(&mut self, id: TermId) -> Result<Term, SessionError> {
        let term = self
            .terms
            .get_mut(id.0)
            .and_then(Option::take)
            .ok_or(SessionError::UnknownTerm(id))?;

        self.all.retain(|&a| a != id);
        self.active.retain(|&a| a != id);
        self.remaining.retain(|&r| r != id);
        self.history.retain(|&h| h != id);
        if self.current == Some(id) {
            self.current = None;
            self.answer_revealed = false;
        }
        Ok(term)
    }

    pub fn term(&self, id: TermId) -> Option<&Term> {
        self.terms.get(id.0).and_then(Option::as_ref)
    }

    pub fn find(&self, label: &str) -> Option<TermId> {
        self.all
            .iter()
            .copied()
            .find(|&id| self.term(id).is_some_and(|t| t.label == label))
    }

    /// All terms in master-list order.
    pub fn terms(&self) -> impl Iterator<Item = (TermId, &Term)> + '_ {
        self.all
            .iter()
            .filter_map(|&id| self.term(id).map(|t| (id, t)))
    }

    pub fn active_terms(&self) -> impl Iterator<Item = &Term> + '_ {
        self.active.iter().filter_map(|&id| self.term(id))
    }

    /// Recently shown terms, oldest first.
    pub fn history(&self) -> impl DoubleEndedIterator<Item = &Term> + '_ {
        self.history.iter().filter_map(|&id| self.term(id))
    }

    pub fn len(&self) -> usize {
        self.all.len()
    }

    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }

    pub fn active_len(&self) -> usize {
        self.active.len()
    }

    pub fn remaining_len(&self) -> usize {
        self.remaining.len()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }
}

pub fn handle_study_input(study: &mut StudyApp, key: KeyEvent, app_state: &mut AppState) {
    match key.code {
        KeyCode::Esc => {
            *app_state = AppState::StudyQuitConfirm;
        }
        KeyCode::Enter | KeyCode::Char(' ') => match study.session.advance() {
            Ok(_) => study.status = None,
            Err(SessionError::NoMoreTerms) => {
                log::info!("Reached the end of deck {}", study.deck_name);
                study.status = Some("End of deck. Press r to start over.".to_string());
            }
            Err(err) => {
                log::warn!("Advance failed in deck {}: {}", study.deck_name, err);
                study.status = Some(format!("Cannot advance: {}", err));
            }
        },
        KeyCode::Char('s') => {
            let shuffle = !study.session.is_shuffle();
            study.session.set_shuffle(shuffle);
            study.status = Some(format!(
                "Shuffle {}",
                if shuffle { "on" } else { "off" }
            ));
        }
        KeyCode::Char('f') => {
            let mode = study.session.display_mode().toggled();
            study.session.set_display_mode(mode);
            study.status = Some(format!("Display mode: {}", mode.name()));
        }
        KeyCode::Char('r') => {
            study.session.restart();
            study.status = Some("Started a new pass".to_string());
        }
        KeyCode::Char('h') => {
            study.show_history = !study.show_history;
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use std::collections::HashSet;

    fn terms(labels: &[&str]) -> Vec<Term> {
        labels
            .iter()
            .map(|l| Term::new(*l, format!("definition of {l}")))
            .collect()
    }

    fn numbered(n: usize) -> Vec<Term> {
        (0..n)
            .map(|i| Term::new(format!("T{i}"), format!("D{i}")))
            .collect()
    }

    fn label_of(session: &mut StudySession) -> Result<String, SessionError> {
        session.advance().map(|view| view.term.label.clone())
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::empty())
    }

    #[test]
    fn test_sequential_end_to_end() {
        let parsed = crate::parser::TermParser::default()
            .parse_str("Cat: a small domesticated feline\nDog: a domesticated canine");
        assert_eq!(parsed.terms.len(), 2);

        let mut session = StudySession::with_seed(parsed.terms, 7);
        let first = session.advance().unwrap();
        assert_eq!(first.term.label, "Cat");
        assert_eq!(first.face, CardFace::Both);
        assert_eq!(label_of(&mut session).unwrap(), "Dog");
        assert_eq!(session.advance().unwrap_err(), SessionError::NoMoreTerms);
    }

    #[test]
    fn test_failed_draw_keeps_current_card() {
        let mut session = StudySession::with_seed(terms(&["Only"]), 1);
        session.advance().unwrap();
        assert!(session.advance().is_err());
        let current = session.current().unwrap();
        assert_eq!(current.term.label, "Only");
        assert_eq!(session.history_len(), 1);
    }

    #[test]
    fn test_restart_after_end_of_deck() {
        let mut session = StudySession::with_seed(terms(&["A", "B"]), 1);
        session.advance().unwrap();
        session.advance().unwrap();
        assert!(session.advance().is_err());

        session.restart();
        assert_eq!(session.remaining_len(), 2);
        assert_eq!(label_of(&mut session).unwrap(), "A");
    }

    #[test]
    fn test_no_active_terms() {
        let mut session = StudySession::with_seed(Vec::new(), 1);
        assert_eq!(session.advance().unwrap_err(), SessionError::NoActiveTerms);
        session.set_shuffle(true);
        assert_eq!(session.advance().unwrap_err(), SessionError::NoActiveTerms);
        assert!(session.current().is_none());
    }

    #[test]
    fn test_flip_mode_cycle() {
        let mut session = StudySession::with_seed(terms(&["A", "B"]), 1);
        session.set_display_mode(DisplayMode::Flip);
        assert!(session.current().is_none());

        let view = session.advance().unwrap();
        assert_eq!(view.term.label, "A");
        assert_eq!(view.face, CardFace::Question);
        assert!(!session.is_answer_revealed());

        let view = session.advance().unwrap();
        assert_eq!(view.term.label, "A");
        assert_eq!(view.face, CardFace::Answer);
        assert!(session.is_answer_revealed());

        let view = session.advance().unwrap();
        assert_eq!(view.term.label, "B");
        assert_eq!(view.face, CardFace::Question);
        assert!(!session.is_answer_revealed());
        assert_eq!(session.history_len(), 2);
    }

    #[test]
    fn test_leaving_flip_resets_revealed() {
        let mut session = StudySession::with_seed(terms(&["A", "B"]), 1);
        session.set_display_mode(DisplayMode::Flip);
        session.advance().unwrap();
        session.advance().unwrap();
        assert!(session.is_answer_revealed());

        session.set_display_mode(DisplayMode::AllInOne);
        assert!(!session.is_answer_revealed());
        assert_eq!(session.current().unwrap().face, CardFace::Both);

        let view = session.advance().unwrap();
        assert_eq!(view.term.label, "B");
        assert_eq!(view.face, CardFace::Both);
    }

    #[test]
    fn test_switching_to_flip_reveals_on_next_advance() {
        let mut session = StudySession::with_seed(terms(&["A", "B"]), 1);
        session.advance().unwrap();
        session.set_display_mode(DisplayMode::Flip);
        assert_eq!(session.current().unwrap().face, CardFace::Question);

        let view = session.advance().unwrap();
        assert_eq!(view.term.label, "A");
        assert_eq!(view.face, CardFace::Answer);
    }

    #[test]
    fn test_history_is_bounded() {
        let mut session = StudySession::with_seed(numbered(HISTORY_CAPACITY + 1), 1);
        for _ in 0..HISTORY_CAPACITY {
            session.advance().unwrap();
        }
        assert_eq!(session.history_len(), HISTORY_CAPACITY);
        assert_eq!(session.history().next().unwrap().label, "T0");

        session.advance().unwrap();
        assert_eq!(session.history_len(), HISTORY_CAPACITY);
        assert!(session.history().all(|t| t.label != "T0"));
        assert_eq!(session.history().next().unwrap().label, "T1");
        assert_eq!(
            session.history().next_back().unwrap().label,
            format!("T{HISTORY_CAPACITY}")
        );
    }

    #[test]
    fn test_shuffle_never_repeats_within_a_pass() {
        let mut session = StudySession::with_seed(numbered(8), 42);
        session.set_shuffle(true);

        for _ in 0..3 {
            let mut seen = HashSet::new();
            for _ in 0..8 {
                let label = label_of(&mut session).unwrap();
                assert!(seen.insert(label), "term repeated within a pass");
            }
            assert_eq!(seen.len(), 8);
            assert_eq!(session.remaining_len(), 0);
        }
    }

    #[test]
    fn test_shuffle_is_deterministic_for_a_seed() {
        let draw = |seed| {
            let mut session = StudySession::with_seed(numbered(10), seed);
            session.set_shuffle(true);
            (0..10)
                .map(|_| label_of(&mut session).unwrap())
                .collect::<Vec<_>>()
        };
        assert_eq!(draw(3), draw(3));
    }

    #[test]
    fn test_shuffle_toggle_mid_pass_keeps_remaining() {
        let mut session = StudySession::with_seed(numbered(5), 9);
        session.set_shuffle(true);
        let first = label_of(&mut session).unwrap();
        session.set_shuffle(false);

        let mut rest = Vec::new();
        while let Ok(label) = label_of(&mut session) {
            rest.push(label);
        }
        assert_eq!(rest.len(), 4);
        assert!(!rest.contains(&first));
    }

    #[test]
    fn test_add_term_is_drawable_in_current_pass() {
        let mut session = StudySession::with_seed(terms(&["A"]), 1);
        session.advance().unwrap();
        let id = session.add_term(Term::new("B", "b"));
        assert_eq!(session.len(), 2);
        assert_eq!(session.active_len(), 2);
        assert_eq!(session.term(id).unwrap().label, "B");
        assert_eq!(label_of(&mut session).unwrap(), "B");
    }

    #[test]
    fn test_inactive_terms_are_not_drawn() {
        let mut input = terms(&["A", "B", "C"]);
        input[1].set_active(false);
        let mut session = StudySession::with_seed(input, 1);
        assert_eq!(session.len(), 3);
        assert_eq!(session.active_len(), 2);

        assert_eq!(label_of(&mut session).unwrap(), "A");
        assert_eq!(label_of(&mut session).unwrap(), "C");
        assert!(session.advance().is_err());

        let b = session.find("B").unwrap();
        session.add_active_term(b).unwrap();
        assert!(session.term(b).unwrap().is_active());
        assert_eq!(label_of(&mut session).unwrap(), "B");

        // Adding again does not duplicate.
        session.add_active_term(b).unwrap();
        assert_eq!(session.active_len(), 3);
    }

    #[test]
    fn test_deactivating_term_removes_it_from_queue() {
        let mut session = StudySession::with_seed(terms(&["A", "B", "C"]), 1);
        let b = session.find("B").unwrap();
        session.set_term_active(b, false).unwrap();
        assert_eq!(session.remaining_len(), 2);
        assert_eq!(session.len(), 3);

        let labels: Vec<_> = session.active_terms().map(|t| t.label.clone()).collect();
        assert_eq!(labels, vec!["A", "C"]);
    }

    #[test]
    fn test_remove_term() {
        let mut session = StudySession::with_seed(terms(&["A", "B", "C"]), 1);
        let a = session.find("A").unwrap();
        session.set_display_mode(DisplayMode::Flip);
        session.advance().unwrap();

        let removed = session.remove_term(a).unwrap();
        assert_eq!(removed.label, "A");
        assert_eq!(session.len(), 2);
        assert_eq!(session.active_len(), 2);
        assert!(session.current().is_none());
        assert_eq!(session.history_len(), 0);
        let labels: Vec<&str> = session.terms().map(|(_, t)| t.label.as_str()).collect();
        assert_eq!(labels, vec!["B", "C"]);

        // Nothing left to reveal, so the next advance draws.
        let view = session.advance().unwrap();
        assert_eq!(view.term.label, "B");
        assert_eq!(view.face, CardFace::Question);

        assert_eq!(session.remove_term(a).unwrap_err(), SessionError::UnknownTerm(a));
        assert!(session.term(a).is_none());
    }

    #[test]
    fn test_remove_displayed_term_with_older_history_in_flip_mode() {
        let mut session = StudySession::with_seed(terms(&["A", "B", "C"]), 1);
        session.set_display_mode(DisplayMode::Flip);
        session.advance().unwrap(); // A question
        session.advance().unwrap(); // A answer
        session.advance().unwrap(); // B question

        let b = session.find("B").unwrap();
        session.remove_term(b).unwrap();
        assert!(session.current().is_none());
        assert_eq!(session.history_len(), 1);
        assert!(!session.is_answer_revealed());

        // A is still in history but must not be revealed again.
        let view = session.advance().unwrap();
        assert_eq!(view.term.label, "C");
        assert_eq!(view.face, CardFace::Question);
        assert_eq!(session.history_len(), 2);
    }

    #[test]
    fn test_remove_displayed_term_with_older_history_in_all_in_one_mode() {
        let mut session = StudySession::with_seed(terms(&["A", "B", "C"]), 1);
        session.advance().unwrap();
        session.advance().unwrap();

        let b = session.find("B").unwrap();
        session.remove_term(b).unwrap();
        assert!(session.current().is_none());
        let history: Vec<&str> = session.history().map(|t| t.label.as_str()).collect();
        assert_eq!(history, vec!["A"]);

        let view = session.advance().unwrap();
        assert_eq!(view.term.label, "C");
        assert_eq!(view.face, CardFace::Both);
    }

    #[test]
    fn test_remove_older_term_keeps_displayed_card() {
        let mut session = StudySession::with_seed(terms(&["A", "B", "C"]), 1);
        session.set_display_mode(DisplayMode::Flip);
        session.advance().unwrap(); // A question
        session.advance().unwrap(); // A answer
        session.advance().unwrap(); // B question

        let a = session.find("A").unwrap();
        session.remove_term(a).unwrap();
        assert_eq!(session.current().unwrap().term.label, "B");

        let view = session.advance().unwrap();
        assert_eq!(view.term.label, "B");
        assert_eq!(view.face, CardFace::Answer);
    }

    #[test]
    fn test_removed_ids_are_not_reused() {
        let mut session = StudySession::with_seed(terms(&["A"]), 1);
        let a = session.find("A").unwrap();
        session.remove_term(a).unwrap();
        let b = session.add_term(Term::new("B", "b"));
        assert_ne!(a, b);
        assert!(session.term(a).is_none());
    }

    #[test]
    fn test_remaining_stays_within_active() {
        let mut session = StudySession::with_seed(numbered(6), 5);
        session.set_shuffle(true);
        session.advance().unwrap();
        let t2 = session.find("T2").unwrap();
        let t4 = session.find("T4").unwrap();
        session.set_term_active(t2, false).unwrap();
        session.remove_term(t4).unwrap();
        session.add_term(Term::new("New", "n"));

        let active: HashSet<String> = session.active_terms().map(|t| t.label.clone()).collect();
        for _ in 0..12 {
            let label = label_of(&mut session).unwrap();
            assert!(active.contains(&label));
        }
    }

    #[test]
    fn test_handle_input_advances_and_reports_end() {
        let mut study = StudyApp::new(StudySession::with_seed(terms(&["A"]), 1), "Test");
        let mut app_state = AppState::Study;

        handle_study_input(&mut study, key(KeyCode::Char(' ')), &mut app_state);
        assert_eq!(study.session.current().unwrap().term.label, "A");
        assert!(study.status.is_none());

        handle_study_input(&mut study, key(KeyCode::Enter), &mut app_state);
        assert_eq!(
            study.status.as_deref(),
            Some("End of deck. Press r to start over.")
        );

        handle_study_input(&mut study, key(KeyCode::Char('r')), &mut app_state);
        assert_eq!(study.session.remaining_len(), 1);
        handle_study_input(&mut study, key(KeyCode::Enter), &mut app_state);
        assert!(study.status.is_none());
        assert_eq!(app_state, AppState::Study);
    }

    #[test]
    fn test_handle_input_toggles() {
        let mut study = StudyApp::new(StudySession::with_seed(terms(&["A", "B"]), 1), "Test");
        let mut app_state = AppState::Study;

        handle_study_input(&mut study, key(KeyCode::Char('s')), &mut app_state);
        assert!(study.session.is_shuffle());
        assert_eq!(study.status.as_deref(), Some("Shuffle on"));

        handle_study_input(&mut study, key(KeyCode::Char('f')), &mut app_state);
        assert_eq!(study.session.display_mode(), DisplayMode::Flip);

        handle_study_input(&mut study, key(KeyCode::Char('h')), &mut app_state);
        assert!(study.show_history);

        handle_study_input(&mut study, key(KeyCode::Esc), &mut app_state);
        assert_eq!(app_state, AppState::StudyQuitConfirm);
    }
}
