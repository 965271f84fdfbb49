use crate::quotes::{Passage, QuoteFetchError, QuoteSource};
use std::time::Instant;

/// a single race being typed by the user
///
/// Owns the target passage, the characters typed so far, and the timing
/// boundaries of the race. All statistics are derived from this state by
/// [`crate::metrics`].
#[derive(Debug, Clone)]
pub struct RaceSession {
    passage: Passage,
    target: Vec<char>,
    typed: Vec<char>,
    started_at: Option<Instant>,
    ended_at: Option<Instant>,
    total_keystrokes: u32,
}

impl RaceSession {
    /// Fetches a passage from `source` and starts a fresh session with it.
    pub fn new(source: &dyn QuoteSource) -> Result<Self, QuoteFetchError> {
        let passage = source.fetch()?;
        Ok(Self::with_passage(passage))
    }

    /// Starts a fresh session over an already-validated passage.
    pub fn with_passage(passage: Passage) -> Self {
        let target = passage.content().chars().collect();
        Self {
            passage,
            target,
            typed: vec![],
            started_at: None,
            ended_at: None,
            total_keystrokes: 0,
        }
    }

    /// Registers one pressed character.
    ///
    /// The first accepted keystroke starts the clock; the keystroke that
    /// fills the last position stops it. Keystrokes after the race has
    /// finished are ignored entirely (not appended, not counted).
    pub fn type_char(&mut self, c: char) {
        if self.is_finished() {
            return;
        }

        if self.started_at.is_none() {
            self.started_at = Some(Instant::now());
        }

        self.typed.push(c);
        self.total_keystrokes += 1;

        if self.typed.len() == self.target.len() {
            self.ended_at = Some(Instant::now());
        }
    }

    /// Removes the last typed character, if any.
    ///
    /// A finished race is immutable: once the end timestamp is set,
    /// backspace is ignored. Counters and timestamps are never affected.
    pub fn backspace(&mut self) {
        if self.ended_at.is_some() {
            return;
        }
        self.typed.pop();
    }

    /// Replaces this session with a fresh one over a newly fetched passage.
    ///
    /// On fetch failure the error is returned and the session is left
    /// exactly as it was.
    pub fn reset(&mut self, source: &dyn QuoteSource) -> Result<(), QuoteFetchError> {
        let passage = source.fetch()?;
        *self = Self::with_passage(passage);
        Ok(())
    }

    pub fn is_started(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn is_finished(&self) -> bool {
        self.typed.len() >= self.target.len()
    }

    /// Seconds since the first keystroke; 0 before the race starts, frozen
    /// at the finishing keystroke once the race ends.
    pub fn elapsed_seconds(&self) -> f64 {
        match self.started_at {
            Some(started) => {
                let end = self.ended_at.unwrap_or_else(Instant::now);
                end.duration_since(started).as_secs_f64()
            }
            None => 0.0,
        }
    }

    pub fn passage(&self) -> &Passage {
        &self.passage
    }

    pub fn target(&self) -> &[char] {
        &self.target
    }

    pub fn typed(&self) -> &[char] {
        &self.typed
    }

    pub fn total_keystrokes(&self) -> u32 {
        self.total_keystrokes
    }

    pub fn started_at(&self) -> Option<Instant> {
        self.started_at
    }

    pub fn ended_at(&self) -> Option<Instant> {
        self.ended_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(target: &str) -> RaceSession {
        RaceSession::with_passage(Passage::new(target, None).unwrap())
    }

    struct FixedQuote(&'static str);

    impl QuoteSource for FixedQuote {
        fn fetch(&self) -> Result<Passage, QuoteFetchError> {
            Passage::new(self.0, Some("Tester".into()))
        }
    }

    struct FailingSource;

    impl QuoteSource for FailingSource {
        fn fetch(&self) -> Result<Passage, QuoteFetchError> {
            Err(QuoteFetchError::Unavailable("connection refused".into()))
        }
    }

    #[test]
    fn test_initial_state() {
        let session = session("Hello world.");
        assert_eq!(session.target().len(), 12);
        assert!(session.typed().is_empty());
        assert!(!session.is_started());
        assert!(!session.is_finished());
        assert_eq!(session.total_keystrokes(), 0);
        assert_eq!(session.elapsed_seconds(), 0.0);
    }

    #[test]
    fn test_first_keystroke_starts_clock() {
        let mut session = session("Hi");
        assert!(!session.is_started());

        session.type_char('H');
        assert!(session.is_started());
        assert!(session.started_at().is_some());
        assert!(!session.is_finished());
    }

    #[test]
    fn test_start_time_constant_after_first_keystroke() {
        let mut session = session("abc");
        session.type_char('a');
        let started = session.started_at();

        session.type_char('b');
        session.backspace();
        session.type_char('b');
        assert_eq!(session.started_at(), started);
    }

    #[test]
    fn test_finishing_keystroke_sets_end_time() {
        let mut session = session("Hi");
        session.type_char('H');
        assert!(session.ended_at().is_none());

        session.type_char('i');
        assert!(session.is_finished());
        assert!(session.ended_at().is_some());
        assert_eq!(session.total_keystrokes(), 2);
    }

    #[test]
    fn test_wrong_chars_still_finish_the_race() {
        let mut session = session("ab");
        session.type_char('a');
        session.type_char('x');
        assert!(session.is_finished());
        assert!(session.ended_at().is_some());
    }

    #[test]
    fn test_keystrokes_ignored_after_finish() {
        let mut session = session("Hi");
        session.type_char('H');
        session.type_char('i');
        assert!(session.is_finished());

        session.type_char('!');
        assert_eq!(session.typed().len(), 2);
        assert_eq!(session.total_keystrokes(), 2);
    }

    #[test]
    fn test_backspace_removes_last_char() {
        let mut session = session("abc");
        session.type_char('a');
        session.type_char('b');
        assert_eq!(session.typed().len(), 2);

        session.backspace();
        assert_eq!(session.typed(), &['a']);
    }

    #[test]
    fn test_backspace_on_empty_is_noop() {
        let mut session = session("abc");
        session.backspace();
        assert!(session.typed().is_empty());
        assert_eq!(session.total_keystrokes(), 0);
    }

    #[test]
    fn test_backspace_does_not_touch_counters() {
        let mut session = session("abc");
        session.type_char('a');
        session.type_char('x');
        session.backspace();

        assert_eq!(session.typed().len(), 1);
        assert_eq!(session.total_keystrokes(), 2);
    }

    #[test]
    fn test_backspace_ignored_once_finished() {
        let mut session = session("Hi");
        session.type_char('H');
        session.type_char('i');
        assert!(session.is_finished());

        session.backspace();
        assert_eq!(session.typed().len(), 2);
        assert!(session.is_finished());
        assert!(session.ended_at().is_some());
    }

    #[test]
    fn test_typed_never_exceeds_target() {
        let mut session = session("ab");
        for c in "abcdef".chars() {
            session.type_char(c);
        }
        assert_eq!(session.typed().len(), session.target().len());
    }

    #[test]
    fn test_elapsed_frozen_after_finish() {
        let mut session = session("a");
        session.type_char('a');
        assert!(session.is_finished());

        let first = session.elapsed_seconds();
        std::thread::sleep(std::time::Duration::from_millis(15));
        assert_eq!(session.elapsed_seconds(), first);
    }

    #[test]
    fn test_elapsed_grows_while_active() {
        let mut session = session("ab");
        session.type_char('a');

        let first = session.elapsed_seconds();
        std::thread::sleep(std::time::Duration::from_millis(15));
        assert!(session.elapsed_seconds() > first);
    }

    #[test]
    fn test_new_from_source() {
        let session = RaceSession::new(&FixedQuote("Hello world.")).unwrap();
        assert_eq!(session.passage().content(), "Hello world.");
        assert_eq!(session.passage().author(), "Tester");
    }

    #[test]
    fn test_new_propagates_fetch_failure() {
        let err = RaceSession::new(&FailingSource).unwrap_err();
        assert!(matches!(err, QuoteFetchError::Unavailable(_)));
    }

    #[test]
    fn test_reset_round_trip() {
        let mut session = RaceSession::new(&FixedQuote("test")).unwrap();
        session.type_char('t');
        session.type_char('e');

        session.reset(&FixedQuote("new quote")).unwrap();

        assert_eq!(session.passage().content(), "new quote");
        assert!(session.typed().is_empty());
        assert!(!session.is_started());
        assert_eq!(session.total_keystrokes(), 0);
    }

    #[test]
    fn test_failed_reset_leaves_session_untouched() {
        let mut session = RaceSession::new(&FixedQuote("test")).unwrap();
        session.type_char('t');
        session.type_char('x');

        let err = session.reset(&FailingSource).unwrap_err();
        assert!(matches!(err, QuoteFetchError::Unavailable(_)));

        assert_eq!(session.passage().content(), "test");
        assert_eq!(session.typed(), &['t', 'x']);
        assert_eq!(session.total_keystrokes(), 2);
        assert!(session.is_started());
    }
}
