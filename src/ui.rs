use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Gauge, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::metrics::{self, CharClass, RaceSnapshot};
use crate::race::RaceSession;
use crate::{App, AppState};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match &self.state {
            AppState::Welcome => render_welcome(area, buf),
            AppState::FetchFailed(reason) => render_fetch_failed(reason, area, buf),
            AppState::Typing => {
                if let Some(session) = &self.session {
                    render_typing(session, area, buf);
                }
            }
            AppState::Results => {
                if let Some(session) = &self.session {
                    render_results(session, area, buf);
                }
            }
        }
    }
}

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn dim_bold() -> Style {
    bold().add_modifier(Modifier::DIM)
}

fn render_typing(session: &RaceSession, area: Rect, buf: &mut Buffer) {
    let green_bold_style = bold().fg(Color::Green);
    let red_bold_style = bold().fg(Color::Red);
    let underlined_dim_bold_style = dim_bold().add_modifier(Modifier::UNDERLINED);
    let italic_style = Style::default().add_modifier(Modifier::ITALIC | Modifier::DIM);
    let magenta_style = Style::default().fg(Color::Magenta);

    let snapshot = RaceSnapshot::capture(session);
    let content = session.passage().content();

    let max_chars_per_line = area.width.saturating_sub(HORIZONTAL_MARGIN * 2).max(1);
    let mut prompt_occupied_lines =
        ((content.width() as f64 / max_chars_per_line as f64).ceil() + 1.0) as u16;

    if content.width() <= max_chars_per_line as usize {
        prompt_occupied_lines = 1;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints(
            [
                Constraint::Length(1), // stats
                Constraint::Length(1), // progress gauge
                Constraint::Min(1),
                Constraint::Length(prompt_occupied_lines),
                Constraint::Length(1), // attribution
                Constraint::Min(1),
                Constraint::Length(1), // key hint
            ]
            .as_ref(),
        )
        .split(area);

    let stats_text = if session.is_started() {
        format!(
            "{:5.1} wpm   {:5.1}% acc   {:5.1}s   {:3.0}%",
            snapshot.wpm, snapshot.accuracy, snapshot.elapsed_seconds, snapshot.progress
        )
    } else {
        "  --- wpm     ---% acc     0.0s     0%".to_string()
    };

    let stats = Paragraph::new(Span::styled(stats_text, bold())).alignment(Alignment::Center);
    stats.render(chunks[0], buf);

    let gauge = Gauge::default()
        .gauge_style(magenta_style)
        .ratio((snapshot.progress / 100.0).clamp(0.0, 1.0))
        .label(format!("{:.0}%", snapshot.progress));
    gauge.render(chunks[1], buf);

    let spans = session
        .target()
        .iter()
        .enumerate()
        .map(|(idx, &expected)| match metrics::classify(session, idx) {
            CharClass::Correct => Span::styled(expected.to_string(), green_bold_style),
            CharClass::Incorrect => Span::styled(
                match session.typed()[idx] {
                    // make mistyped spaces visible
                    ' ' => "·".to_owned(),
                    c => c.to_string(),
                },
                red_bold_style,
            ),
            CharClass::Pending => Span::styled(expected.to_string(), underlined_dim_bold_style),
            CharClass::Untyped => Span::styled(expected.to_string(), dim_bold()),
        })
        .collect::<Vec<Span>>();

    let passage = Paragraph::new(Line::from(spans))
        .alignment(if prompt_occupied_lines == 1 {
            // small passages read best centered
            Alignment::Center
        } else {
            Alignment::Left
        })
        .wrap(Wrap { trim: true });
    passage.render(chunks[3], buf);

    let attribution = Paragraph::new(Span::styled(
        format!("- {}", session.passage().author()),
        italic_style,
    ))
    .alignment(Alignment::Center);
    attribution.render(chunks[4], buf);

    let hint = Paragraph::new(Span::styled(
        "esc to quit   backspace to correct",
        italic_style,
    ))
    .alignment(Alignment::Center);
    hint.render(chunks[6], buf);
}

fn render_results(session: &RaceSession, area: Rect, buf: &mut Buffer) {
    let magenta_bold_style = bold().fg(Color::Magenta);
    let italic_style = Style::default().add_modifier(Modifier::ITALIC | Modifier::DIM);

    let snapshot = RaceSnapshot::capture(session);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints(
            [
                Constraint::Min(1),
                Constraint::Length(1), // title
                Constraint::Length(1),
                Constraint::Length(1), // speed stats
                Constraint::Length(1), // volume stats
                Constraint::Length(1),
                Constraint::Length(1), // rating
                Constraint::Min(1),
                Constraint::Length(1), // legend
            ]
            .as_ref(),
        )
        .split(area);

    let title = Paragraph::new(Span::styled("race complete", magenta_bold_style))
        .alignment(Alignment::Center);
    title.render(chunks[1], buf);

    let speed = Paragraph::new(Span::styled(
        format!(
            "{:.1} wpm   {:.1} raw wpm   {:.1}% acc",
            snapshot.wpm, snapshot.raw_wpm, snapshot.accuracy
        ),
        bold(),
    ))
    .alignment(Alignment::Center);
    speed.render(chunks[3], buf);

    let volume = Paragraph::new(Span::styled(
        format!(
            "{:.1}s   {}/{} chars   {} keystrokes",
            snapshot.elapsed_seconds,
            snapshot.correct_chars,
            session.target().len(),
            snapshot.total_keystrokes
        ),
        dim_bold(),
    ))
    .alignment(Alignment::Center);
    volume.render(chunks[4], buf);

    let rating = Paragraph::new(Span::styled(rating_for(snapshot.wpm), magenta_bold_style))
        .alignment(Alignment::Center);
    rating.render(chunks[6], buf);

    let legend = Paragraph::new(Span::styled("(r)etry / (n)ew passage / (esc)ape", italic_style))
        .alignment(Alignment::Center);
    legend.render(chunks[8], buf);
}

fn render_welcome(area: Rect, buf: &mut Buffer) {
    let magenta_bold_style = bold().fg(Color::Magenta);
    let italic_style = Style::default().add_modifier(Modifier::ITALIC | Modifier::DIM);

    let lines = vec![
        Line::from(Span::styled("typerace", magenta_bold_style)),
        Line::from(""),
        Line::from(Span::styled("test your typing speed", italic_style)),
        Line::from(""),
        Line::from(Span::styled(
            "type the displayed passage as fast and accurately as you can",
            dim_bold(),
        )),
        Line::from(Span::styled(
            "wpm and accuracy are tracked in real time",
            dim_bold(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "press any key to start, esc to quit",
            bold(),
        )),
    ];

    centered_paragraph(lines, area, buf);
}

fn render_fetch_failed(reason: &str, area: Rect, buf: &mut Buffer) {
    let red_bold_style = bold().fg(Color::Red);
    let italic_style = Style::default().add_modifier(Modifier::ITALIC | Modifier::DIM);

    let lines = vec![
        Line::from(Span::styled("could not fetch a passage", red_bold_style)),
        Line::from(""),
        Line::from(Span::styled(reason.to_string(), dim_bold())),
        Line::from(""),
        Line::from(Span::styled(
            "press any key to retry, esc to quit",
            italic_style,
        )),
    ];

    centered_paragraph(lines, area, buf);
}

fn centered_paragraph(lines: Vec<Line>, area: Rect, buf: &mut Buffer) {
    let height = lines.len() as u16;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints(
            [
                Constraint::Min(1),
                Constraint::Length(height),
                Constraint::Min(1),
            ]
            .as_ref(),
        )
        .split(area);

    let widget = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    widget.render(chunks[1], buf);
}

fn rating_for(wpm: f64) -> &'static str {
    if wpm >= 100.0 {
        "legendary"
    } else if wpm >= 80.0 {
        "blazing fast"
    } else if wpm >= 60.0 {
        "impressive"
    } else if wpm >= 40.0 {
        "solid"
    } else if wpm >= 25.0 {
        "keep practicing"
    } else {
        "warming up"
    }
}
