use std::cell::RefCell;

use typerace::metrics::{self, RaceSnapshot};
use typerace::quotes::{Passage, QuoteFetchError, QuoteSource};
use typerace::race::RaceSession;

/// Deterministic source that yields a scripted sequence of fetch outcomes.
struct ScriptedSource {
    outcomes: RefCell<Vec<Result<Passage, QuoteFetchError>>>,
}

impl ScriptedSource {
    fn new(outcomes: Vec<Result<Passage, QuoteFetchError>>) -> Self {
        Self {
            outcomes: RefCell::new(outcomes),
        }
    }
}

impl QuoteSource for ScriptedSource {
    fn fetch(&self) -> Result<Passage, QuoteFetchError> {
        self.outcomes
            .borrow_mut()
            .pop()
            .unwrap_or_else(|| Err(QuoteFetchError::Unavailable("script exhausted".into())))
    }
}

fn passage(content: &str) -> Passage {
    Passage::new(content, Some("Tester".into())).unwrap()
}

#[test]
fn full_race_over_fetched_passage() {
    let source = ScriptedSource::new(vec![Ok(passage("Hi"))]);
    let mut session = RaceSession::new(&source).unwrap();

    assert_eq!(session.passage().author(), "Tester");

    session.type_char('H');
    assert!(session.is_started());
    assert!(!session.is_finished());

    session.type_char('i');
    assert!(session.is_finished());

    let snapshot = RaceSnapshot::capture(&session);
    assert_eq!(snapshot.correct_chars, 2);
    assert_eq!(snapshot.total_keystrokes, 2);
    assert_eq!(snapshot.accuracy, 100.0);
}

#[test]
fn reset_swaps_in_the_next_fetched_passage() {
    let source = ScriptedSource::new(vec![Ok(passage("second")), Ok(passage("first"))]);
    let mut session = RaceSession::new(&source).unwrap();
    assert_eq!(session.passage().content(), "first");

    for c in "fir".chars() {
        session.type_char(c);
    }

    session.reset(&source).unwrap();
    assert_eq!(session.passage().content(), "second");
    assert!(session.typed().is_empty());
    assert!(!session.is_started());
    assert_eq!(session.total_keystrokes(), 0);
    assert_eq!(metrics::progress(&session), 0.0);
}

#[test]
fn failed_reset_is_a_full_noop() {
    let source = ScriptedSource::new(vec![
        Err(QuoteFetchError::Unavailable("connection timed out".into())),
        Ok(passage("steady")),
    ]);
    let mut session = RaceSession::new(&source).unwrap();

    session.type_char('s');
    session.type_char('x');
    let keystrokes_before = session.total_keystrokes();

    let err = session.reset(&source).unwrap_err();
    assert!(matches!(err, QuoteFetchError::Unavailable(_)));

    // everything exactly as before the failed call
    assert_eq!(session.passage().content(), "steady");
    assert_eq!(session.typed(), &['s', 'x']);
    assert_eq!(session.total_keystrokes(), keystrokes_before);
    assert!(session.is_started());
    assert_eq!(metrics::correct_chars(&session), 1);
}

#[test]
fn retry_after_failure_succeeds() {
    let source = ScriptedSource::new(vec![
        Ok(passage("eventually")),
        Err(QuoteFetchError::Unavailable("network unreachable".into())),
    ]);

    // first attempt fails, caller retries against the same source
    let first = RaceSession::new(&source);
    assert!(first.is_err());

    let session = RaceSession::new(&source).unwrap();
    assert_eq!(session.passage().content(), "eventually");
}

#[test]
fn empty_passages_never_reach_a_session() {
    let source = ScriptedSource::new(vec![Passage::new("", None)]);
    let err = RaceSession::new(&source).unwrap_err();
    assert_eq!(err, QuoteFetchError::EmptyPassage);
}
