use crate::core::app::{App, NoticeKind};
use crate::core::message::Role;
use crate::ui::sidebar::SidebarItem;
use crate::ui::view::{Focus, ViewState};
use crate::ui::wrap::wrap_line;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

const SIDEBAR_WIDTH: u16 = 34;
const INPUT_HEIGHT: u16 = 3;
const SPINNER: [&str; 4] = ["○", "◔", "◑", "◕"];
const WELCOME: &str = "Welcome to our Slogan Generator! This chatbot helps you craft memorable, \
catchy slogans that resonate with your brand’s essence and leave a lasting impression on your \
audience.";

pub fn ui(f: &mut Frame, app: &App, view: &mut ViewState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
        .split(f.area());

    render_sidebar(f, app, view, columns[0]);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(INPUT_HEIGHT),
        ])
        .split(columns[1]);

    render_transcript(f, app, view, rows[0]);
    f.render_widget(Paragraph::new(status_line(app)), rows[1]);
    render_input(f, app, view, rows[2]);
}

fn render_sidebar(f: &mut Frame, app: &App, view: &ViewState, area: Rect) {
    let focused = view.focus == Focus::Sidebar;
    let mut lines = Vec::with_capacity(SidebarItem::ALL.len() * 2 + 4);
    lines.push(Line::from(Span::styled(WELCOME, Style::default().fg(Color::Gray))));
    lines.push(Line::from(""));

    for (index, item) in SidebarItem::ALL.into_iter().enumerate() {
        let selected = focused && index == view.sidebar_index;
        let marker = if selected { "› " } else { "  " };
        let style = if selected {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };

        let mut spans = vec![Span::styled(format!("{marker}{}", item.label()), style)];
        if let Some(value) = item.value(&app.settings) {
            spans.push(Span::raw(": "));
            spans.push(Span::styled(
                format!("◀ {value} ▶"),
                Style::default().fg(Color::Yellow),
            ));
        }
        lines.push(Line::from(spans));
        if item == SidebarItem::Creativity {
            lines.push(Line::from(""));
        }
    }

    lines.push(Line::from(""));
    let credential_line = match &app.credential {
        Some(credential) => Span::styled(
            format!("✓ Token ({})", credential.source().describe()),
            Style::default().fg(Color::Green),
        ),
        None => Span::styled("✗ No API token", Style::default().fg(Color::Red)),
    };
    lines.push(Line::from(credential_line));

    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::Reset)
    };

    let sidebar = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(Span::styled(
                    "GenContentHub",
                    Style::default().add_modifier(Modifier::BOLD),
                )),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(sidebar, area);
}

fn transcript_lines(app: &App) -> Vec<Line<'_>> {
    let mut lines = Vec::new();

    for message in app.session.messages() {
        match message.role {
            Role::User => {
                let mut content = message.content.lines();
                lines.push(Line::from(vec![
                    Span::styled(
                        "You: ",
                        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        content.next().unwrap_or_default(),
                        Style::default().fg(Color::Cyan),
                    ),
                ]));
                for rest in content {
                    lines.push(Line::from(Span::styled(rest, Style::default().fg(Color::Cyan))));
                }
            }
            Role::Assistant => {
                for content_line in message.content.lines() {
                    lines.push(Line::from(content_line));
                }
            }
        }
        lines.push(Line::from(""));
    }

    if let Some(pending) = app.in_flight_response() {
        for content_line in pending.lines() {
            lines.push(Line::from(content_line));
        }
        lines.push(Line::from(Span::styled(
            "▌",
            Style::default().fg(Color::DarkGray),
        )));
    }

    lines
}

fn render_transcript(f: &mut Frame, app: &App, view: &mut ViewState, area: Rect) {
    let rows: Vec<Line<'static>> = transcript_lines(app)
        .iter()
        .flat_map(|line| wrap_line(line, area.width))
        .collect();

    let available_height = area.height.saturating_sub(1);
    let total_height = u16::try_from(rows.len()).unwrap_or(u16::MAX);

    view.max_scroll = total_height.saturating_sub(available_height);
    if view.auto_scroll {
        view.scroll_offset = view.max_scroll;
    }
    let scroll_offset = view.scroll_offset.min(view.max_scroll);

    let title = format!(
        "GenContentHub v{} - {} • {} • {} slogan(s)",
        env!("CARGO_PKG_VERSION"),
        app.settings.model.label(),
        app.settings.creativity.label(),
        app.settings.slogan_count,
    );

    let transcript = Paragraph::new(rows)
        .block(Block::default().title(title))
        .scroll((scroll_offset, 0));
    f.render_widget(transcript, area);
}

fn status_line(app: &App) -> Line<'static> {
    let notice = app.notice.as_ref().map(|notice| {
        let color = match notice.kind {
            NoticeKind::Info => Color::Blue,
            NoticeKind::Success => Color::Green,
            NoticeKind::Warning => Color::Yellow,
            NoticeKind::Error => Color::Red,
        };
        Span::styled(notice.text.clone(), Style::default().fg(color))
    });

    if app.is_busy() {
        let elapsed = app
            .stream
            .started_at
            .map(|started| started.elapsed().as_millis())
            .unwrap_or_default();
        let frame = SPINNER[(elapsed / 250) as usize % SPINNER.len()];
        let style = Style::default().fg(Color::Yellow);
        // A pending notice takes the place of the progress text.
        return match notice {
            Some(notice) => Line::from(vec![Span::styled(format!("{frame} "), style), notice]),
            None => Line::from(Span::styled(format!("{frame} Generating response..."), style)),
        };
    }

    if let Some(notice) = notice {
        return Line::from(notice);
    }

    if !app.has_credential() {
        return Line::from(Span::styled(
            "⚠ Please enter your credentials!",
            Style::default().fg(Color::Yellow),
        ));
    }

    Line::from(Span::styled(
        "Ctrl+L clear • F2 👍 • F3 👎 • PgUp/PgDn scroll",
        Style::default().fg(Color::DarkGray),
    ))
}

fn render_input(f: &mut Frame, app: &App, view: &mut ViewState, area: Rect) {
    let title = if view.is_masked() {
        "Replicate API token (Enter to save, Ctrl+C to quit)"
    } else if app.is_busy() {
        "Type your message (waiting for the current response, Ctrl+C to quit)"
    } else {
        "Type your message (Enter to send, Tab for settings, Ctrl+C to quit)"
    };

    let style = if view.focus == Focus::Input {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };

    view.textarea.set_block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Reset))
            .title(title),
    );
    view.textarea.set_style(style);
    let cursor_style = if view.focus == Focus::Input {
        Style::default().add_modifier(Modifier::REVERSED)
    } else {
        Style::default()
    };
    view.textarea.set_cursor_style(cursor_style);

    f.render_widget(&view.textarea, area);
}
