use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyCode, KeyEvent, KeyModifiers};

/// Input the race loop consumes, already mapped from raw terminal events.
///
/// The mapping happens at this boundary so the loop and the session only
/// ever see the race vocabulary: characters to type, a correction, a
/// cancellation. Raw key codes stop existing past this point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    /// A printable character was pressed.
    Char(char),
    /// Delete the last typed character.
    Backspace,
    /// Esc or ctrl-c: end the loop.
    Cancel,
    /// A key with no typing meaning; still wakes screens that start on any key.
    OtherKey,
    /// The terminal was resized; redraw only.
    Resize,
    /// Nothing arrived within the tick interval; refresh live stats.
    Tick,
}

/// Maps one raw key event onto the race vocabulary.
pub fn map_key(key: KeyEvent) -> InputEvent {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return InputEvent::Cancel;
    }

    match key.code {
        KeyCode::Esc => InputEvent::Cancel,
        KeyCode::Backspace => InputEvent::Backspace,
        KeyCode::Char(c) => InputEvent::Char(c),
        _ => InputEvent::OtherKey,
    }
}

/// Hands the race loop one event at a time.
pub trait InputSource {
    /// Next event, or [`InputEvent::Tick`] if `timeout` passes quietly.
    fn next(&mut self, timeout: Duration) -> InputEvent;
}

/// Terminal-backed source: a reader thread maps crossterm events as they
/// arrive and feeds them through a channel.
pub struct TerminalInput {
    rx: Receiver<InputEvent>,
}

impl TerminalInput {
    pub fn spawn() -> Self {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || loop {
            let mapped = match event::read() {
                Ok(CtEvent::Key(key)) => map_key(key),
                Ok(CtEvent::Resize(_, _)) => InputEvent::Resize,
                Ok(_) => continue,
                Err(_) => break,
            };

            if tx.send(mapped).is_err() {
                break;
            }
        });

        Self { rx }
    }
}

impl InputSource for TerminalInput {
    fn next(&mut self, timeout: Duration) -> InputEvent {
        match self.rx.recv_timeout(timeout) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                InputEvent::Tick
            }
        }
    }
}

/// Scripted source for headless tests: plays back a fixed sequence, then
/// ticks forever.
pub struct ScriptedInput {
    events: std::vec::IntoIter<InputEvent>,
}

impl ScriptedInput {
    pub fn new(events: Vec<InputEvent>) -> Self {
        Self {
            events: events.into_iter(),
        }
    }
}

impl InputSource for ScriptedInput {
    fn next(&mut self, _timeout: Duration) -> InputEvent {
        self.events.next().unwrap_or(InputEvent::Tick)
    }
}
