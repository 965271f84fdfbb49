pub mod config;
pub mod metrics;
pub mod quotes;
pub mod race;
pub mod runtime;
pub mod ui;

use crate::{
    config::Config,
    quotes::{BundledQuotes, FileQuotes, Passage, QuoteSource},
    race::RaceSession,
    runtime::{InputEvent, InputSource, TerminalInput},
};
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    time::Duration,
};

/// terminal type racing with live wpm, accuracy, and progress tracking
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A terminal type-racing game: race against a quoted passage while your words per minute, accuracy, and progress update live, then get a full summary."
)]
pub struct Cli {
    /// custom passage to race against (skips the quote source)
    #[clap(short = 'p', long)]
    passage: Option<String>,

    /// JSON file of {content, author} records to pull passages from
    #[clap(short = 'q', long)]
    quotes_file: Option<String>,

    /// render refresh interval in milliseconds
    #[clap(short = 't', long)]
    tick_rate: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppState {
    Welcome,
    Typing,
    Results,
    FetchFailed(String),
}

#[derive(Debug)]
pub struct App {
    pub cli: Cli,
    pub session: Option<RaceSession>,
    pub state: AppState,
}

impl App {
    pub fn new(cli: Cli) -> Self {
        Self {
            cli,
            session: None,
            state: AppState::Welcome,
        }
    }

    /// Starts a race over a fresh passage, or moves to the failure screen.
    /// A failed fetch keeps whatever session was there before.
    pub fn new_race(&mut self, source: &dyn QuoteSource) {
        if let Some(text) = &self.cli.passage {
            match Passage::new(text.clone(), None) {
                Ok(passage) => {
                    self.session = Some(RaceSession::with_passage(passage));
                    self.state = AppState::Typing;
                }
                Err(e) => self.state = AppState::FetchFailed(e.to_string()),
            }
            return;
        }

        let outcome = match self.session.as_mut() {
            Some(session) => session.reset(source),
            None => match RaceSession::new(source) {
                Ok(session) => {
                    self.session = Some(session);
                    Ok(())
                }
                Err(e) => Err(e),
            },
        };

        match outcome {
            Ok(()) => self.state = AppState::Typing,
            Err(e) => self.state = AppState::FetchFailed(e.to_string()),
        }
    }

    /// Restarts the current passage from the beginning.
    pub fn restart_race(&mut self) {
        if let Some(session) = &self.session {
            self.session = Some(RaceSession::with_passage(session.passage().clone()));
            self.state = AppState::Typing;
        }
    }

    fn is_racing(&self) -> bool {
        self.state == AppState::Typing
            && self
                .session
                .as_ref()
                .is_some_and(|s| s.is_started() && !s.is_finished())
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let config_path = Config::default_path();
    let mut cfg = Config::load_or_default(&config_path);
    // CLI flags become the new persisted preferences
    if let Some(q) = &cli.quotes_file {
        cfg.quotes_file = Some(q.clone());
    }
    if let Some(t) = cli.tick_rate {
        cfg.tick_rate_ms = t;
    }
    let _ = cfg.save(&config_path);

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(cli);
    let res = start_tui(&mut terminal, &mut app, &cfg);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

#[derive(Debug, PartialEq)]
enum Flow {
    Continue,
    Quit,
}

fn start_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    cfg: &Config,
) -> Result<(), Box<dyn Error>> {
    let source: Box<dyn QuoteSource> = match &cfg.quotes_file {
        Some(path) => Box::new(FileQuotes::new(path)),
        None => Box::new(BundledQuotes::new()),
    };

    let mut input = TerminalInput::spawn();
    let tick = Duration::from_millis(cfg.tick_rate_ms);

    terminal.draw(|f| ui(app, f))?;

    loop {
        match input.next(tick) {
            InputEvent::Tick => {
                // live stats only move while a race is underway
                if app.is_racing() {
                    terminal.draw(|f| ui(app, f))?;
                }
            }
            InputEvent::Resize => {
                terminal.draw(|f| ui(app, f))?;
            }
            ev => {
                if handle_input(app, ev, source.as_ref()) == Flow::Quit {
                    break;
                }
                terminal.draw(|f| ui(app, f))?;
            }
        }
    }

    Ok(())
}

fn handle_input(app: &mut App, ev: InputEvent, source: &dyn QuoteSource) -> Flow {
    if ev == InputEvent::Cancel {
        return Flow::Quit;
    }

    match app.state.clone() {
        AppState::Welcome | AppState::FetchFailed(_) => {
            // any key starts (or retries) a race
            app.new_race(source);
        }
        AppState::Typing => match ev {
            InputEvent::Backspace => {
                if let Some(session) = app.session.as_mut() {
                    session.backspace();
                }
            }
            InputEvent::Char(c) => {
                if let Some(session) = app.session.as_mut() {
                    session.type_char(c);
                    if session.is_finished() {
                        app.state = AppState::Results;
                    }
                }
            }
            _ => {}
        },
        AppState::Results => match ev {
            InputEvent::Char('r') => app.restart_race(),
            InputEvent::Char('n') => app.new_race(source),
            _ => {}
        },
    }

    Flow::Continue
}

fn ui(app: &App, f: &mut Frame) {
    f.render_widget(app, f.area());
}
