//! Derived statistics over a [`RaceSession`].
//!
//! Everything here is a pure read of session state, safe to call on every
//! render tick. Divide-by-zero cases are pinned down explicitly: no metric
//! ever returns NaN or infinity.

use crate::race::RaceSession;

/// How a single target position should be painted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CharClass {
    Correct,
    Incorrect,
    /// The next position to type (the cursor).
    Pending,
    Untyped,
}

/// Number of typed characters that match the target at their position.
pub fn correct_chars(session: &RaceSession) -> usize {
    session
        .typed()
        .iter()
        .zip(session.target())
        .filter(|(typed, expected)| typed == expected)
        .count()
}

/// Percentage of keystrokes ever made that were correct.
///
/// 100.0 with no keystrokes yet. Backspacing does not improve this: the
/// denominator counts every accepted keystroke, corrected or not.
pub fn accuracy(session: &RaceSession) -> f64 {
    let keystrokes = session.total_keystrokes();
    if keystrokes == 0 {
        return 100.0;
    }
    correct_chars(session) as f64 / keystrokes as f64 * 100.0
}

/// Percentage of the passage currently filled, regardless of correctness.
pub fn progress(session: &RaceSession) -> f64 {
    if session.target().is_empty() {
        return 0.0;
    }
    session.typed().len() as f64 / session.target().len() as f64 * 100.0
}

pub fn elapsed_minutes(session: &RaceSession) -> f64 {
    session.elapsed_seconds() / 60.0
}

/// Net words per minute: correctly placed characters, 5 chars per word.
pub fn wpm(session: &RaceSession) -> f64 {
    let minutes = elapsed_minutes(session);
    if minutes <= 0.0 {
        return 0.0;
    }
    (correct_chars(session) as f64 / 5.0) / minutes
}

/// Raw words per minute: every typed character, 5 chars per word.
pub fn raw_wpm(session: &RaceSession) -> f64 {
    let minutes = elapsed_minutes(session);
    if minutes <= 0.0 {
        return 0.0;
    }
    (session.typed().len() as f64 / 5.0) / minutes
}

/// Classification of one target position for rendering.
pub fn classify(session: &RaceSession, idx: usize) -> CharClass {
    let typed = session.typed();
    if idx < typed.len() {
        if typed[idx] == session.target()[idx] {
            CharClass::Correct
        } else {
            CharClass::Incorrect
        }
    } else if idx == typed.len() {
        CharClass::Pending
    } else {
        CharClass::Untyped
    }
}

/// Classification of every target position, in order.
pub fn classifications(session: &RaceSession) -> Vec<CharClass> {
    (0..session.target().len())
        .map(|idx| classify(session, idx))
        .collect()
}

/// All per-tick statistics bundled for a single render pass.
#[derive(Clone, Copy, Debug)]
pub struct RaceSnapshot {
    pub wpm: f64,
    pub raw_wpm: f64,
    pub accuracy: f64,
    pub progress: f64,
    pub elapsed_seconds: f64,
    pub correct_chars: usize,
    pub total_keystrokes: u32,
}

impl RaceSnapshot {
    pub fn capture(session: &RaceSession) -> Self {
        Self {
            wpm: wpm(session),
            raw_wpm: raw_wpm(session),
            accuracy: accuracy(session),
            progress: progress(session),
            elapsed_seconds: session.elapsed_seconds(),
            correct_chars: correct_chars(session),
            total_keystrokes: session.total_keystrokes(),
        }
    }
}
