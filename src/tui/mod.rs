mod export;
mod help;
mod state;

use crate::cli::Cli;
use crate::controller::ReplSession;
use crate::engine;
use crate::model::ReplConfig;
use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use export::{
    copy_to_clipboard, export_transcript_json, export_transcript_text, save_and_show_path,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Terminal,
};
use state::UiState;
use std::{io, time::Duration, time::Instant};

pub fn run(args: Cli) -> Result<()> {
    let cfg = crate::cli::build_config(&args);
    let mut session = ReplSession::new(engine::evaluator_from_config(&cfg));

    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).ok();

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;
    terminal.clear().ok();

    let mut state = UiState {
        auto_save: args.auto_save,
        ..Default::default()
    };
    state.transcripts = crate::storage::load_recent(200).unwrap_or_default();

    let res = event_loop(&cfg, &mut session, &mut state, &mut terminal);

    disable_raw_mode().ok();
    let mut stdout = io::stdout();
    execute!(stdout, LeaveAlternateScreen).ok();

    // Exit-path exports and auto-save are shared with the non-TUI modes.
    let finish_args = Cli {
        auto_save: state.auto_save,
        ..args
    };
    crate::cli::finish_session(&finish_args, &cfg, &session)?;
    res
}

fn event_loop(
    cfg: &ReplConfig,
    session: &mut ReplSession,
    state: &mut UiState,
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
) -> Result<()> {
    let tick_rate = Duration::from_millis(100);
    let mut last_tick = Instant::now();

    loop {
        if last_tick.elapsed() >= tick_rate {
            terminal.draw(|f| draw(f.area(), f, state, session)).ok();
            last_tick = Instant::now();
        }

        // Poll input with a short timeout to keep the render loop ticking.
        if event::poll(Duration::from_millis(10)).unwrap_or(false) {
            if let Ok(Event::Key(k)) = event::read() {
                if k.kind != KeyEventKind::Press {
                    continue;
                }
                if let (KeyModifiers::CONTROL, KeyCode::Char('c')) = (k.modifiers, k.code) {
                    return Ok(());
                }
                if k.code == KeyCode::Tab {
                    state.tab = (state.tab + 1) % 3;
                    continue;
                }
                let quit = match state.tab {
                    0 => handle_session_key(k.modifiers, k.code, cfg, session, state),
                    1 => handle_transcripts_key(k.code, state),
                    _ => matches!(k.code, KeyCode::Char('q')),
                };
                if quit {
                    return Ok(());
                }
            }
        }
    }
}

/// Key dispatch for the Session tab. Returns true to quit.
fn handle_session_key(
    modifiers: KeyModifiers,
    code: KeyCode,
    cfg: &ReplConfig,
    session: &mut ReplSession,
    state: &mut UiState,
) -> bool {
    match (modifiers, code) {
        // Committing the input line and pressing a dedicated run key go
        // through the same session pipeline; the empty guard lives there.
        (m, KeyCode::Enter) if !m.contains(KeyModifiers::CONTROL) => {
            let line = state.input.clone();
            state.push_input_history(&line);
            match session.commit_source(line) {
                Ok(Some(_)) => {
                    state.take_input();
                    state.scroll_to_bottom();
                    state.info.clear();
                }
                Ok(None) => {}
                // The fault is surfaced here, not in the pipeline; the log
                // stays unchanged and the input stays editable.
                Err(e) => state.info = format!("Evaluator failed: {e:#}"),
            }
        }
        (KeyModifiers::CONTROL, KeyCode::Char('r')) => {
            // Map away the entry borrow so the status line can read the source.
            match session.activate().map(|entry| entry.is_some()) {
                Ok(true) => {
                    state.scroll_to_bottom();
                    state.info = format!("Re-ran: {}", session.source());
                }
                Ok(false) => state.info = "Nothing to re-run yet.".into(),
                Err(e) => state.info = format!("Evaluator failed: {e:#}"),
            }
        }
        (KeyModifiers::CONTROL, KeyCode::Char('s')) => {
            if session.log().is_empty() {
                state.info = "No entries to save yet.".into();
            } else {
                let t = session.transcript(cfg);
                save_and_show_path(&t, state);
            }
        }
        (KeyModifiers::CONTROL, KeyCode::Char('y')) => {
            if let Some(entry) = session.log().entries().last() {
                match copy_to_clipboard(entry.rendered.as_str()) {
                    Ok(_) => state.info = "✓ Copied last output to clipboard".into(),
                    Err(e) => state.info = format!("Clipboard copy failed: {e:#}"),
                }
            } else {
                state.info = "No output to copy yet.".into();
            }
        }
        (KeyModifiers::CONTROL, KeyCode::Char('a')) => {
            state.auto_save = !state.auto_save;
            state.info = if state.auto_save {
                "Auto-save enabled".into()
            } else {
                "Auto-save disabled".into()
            };
        }
        (_, KeyCode::Esc) => state.clear_input(),
        (_, KeyCode::Backspace) => state.backspace(),
        (_, KeyCode::Delete) => state.delete(),
        (_, KeyCode::Left) => state.move_left(),
        (_, KeyCode::Right) => state.move_right(),
        (_, KeyCode::Home) => state.move_home(),
        (_, KeyCode::End) => state.move_end(),
        (_, KeyCode::Up) => state.history_prev(),
        (_, KeyCode::Down) => state.history_next(),
        (_, KeyCode::PageUp) => state.scroll_up(5),
        (_, KeyCode::PageDown) => state.scroll_down(5),
        (m, KeyCode::Char(c)) if !m.contains(KeyModifiers::CONTROL) => state.insert_char(c),
        _ => {}
    }
    false
}

/// Key dispatch for the Transcripts tab. Returns true to quit.
fn handle_transcripts_key(code: KeyCode, state: &mut UiState) -> bool {
    match code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('r') => match crate::storage::load_recent(200) {
            Ok(transcripts) => {
                state.transcripts = transcripts;
                if state.transcript_selected >= state.transcripts.len() {
                    state.transcript_selected = state.transcripts.len().saturating_sub(1);
                }
                if state.transcript_scroll_offset >= state.transcripts.len() {
                    state.transcript_scroll_offset = 0;
                }
                state.info = "Refreshed".into();
            }
            Err(e) => state.info = format!("Refresh failed: {e:#}"),
        },
        KeyCode::Up | KeyCode::Char('k') => {
            if !state.transcripts.is_empty() && state.transcript_selected > 0 {
                state.transcript_selected -= 1;
                if state.transcript_selected < state.transcript_scroll_offset {
                    state.transcript_scroll_offset = state.transcript_selected;
                }
            }
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if !state.transcripts.is_empty()
                && state.transcript_selected < state.transcripts.len().saturating_sub(1)
            {
                state.transcript_selected += 1;
                let estimated_max_items = 30;
                if state.transcript_selected >= state.transcript_scroll_offset + estimated_max_items
                {
                    state.transcript_scroll_offset = state
                        .transcript_selected
                        .saturating_sub(estimated_max_items - 1);
                }
            }
        }
        KeyCode::Char('e') => {
            if let Some(t) = state.transcripts.get(state.transcript_selected) {
                match export_transcript_json(t) {
                    Ok(p) => {
                        let path_str = p.to_string_lossy().to_string();
                        state.last_exported_path = Some(path_str);
                        state.info =
                            format!("Exported JSON: {} (press 'y' to copy path)", p.display());
                    }
                    Err(e) => state.info = format!("JSON export failed: {e:#}"),
                }
            }
        }
        KeyCode::Char('c') => {
            if let Some(t) = state.transcripts.get(state.transcript_selected) {
                match export_transcript_text(t) {
                    Ok(p) => {
                        let path_str = p.to_string_lossy().to_string();
                        state.last_exported_path = Some(path_str);
                        state.info =
                            format!("Exported text: {} (press 'y' to copy path)", p.display());
                    }
                    Err(e) => state.info = format!("Text export failed: {e:#}"),
                }
            }
        }
        KeyCode::Char('y') => {
            if let Some(ref path) = state.last_exported_path {
                match copy_to_clipboard(path) {
                    Ok(_) => state.info = format!("✓ Copied to clipboard: {}", path),
                    Err(e) => state.info = format!("Clipboard copy failed: {e:#}"),
                }
            } else {
                state.info = "No exported file path to copy. Export a file first (e/c)".into();
            }
        }
        KeyCode::Char('d') => {
            if !state.transcripts.is_empty() && state.transcript_selected < state.transcripts.len()
            {
                let to_delete = state.transcripts[state.transcript_selected].clone();
                if let Err(e) = crate::storage::delete_transcript(&to_delete) {
                    state.info = format!("Delete failed: {e:#}");
                } else {
                    state.transcripts.remove(state.transcript_selected);
                    if state.transcript_selected >= state.transcripts.len()
                        && !state.transcripts.is_empty()
                    {
                        state.transcript_selected = state.transcripts.len() - 1;
                    } else if state.transcripts.is_empty() {
                        state.transcript_selected = 0;
                        state.transcript_scroll_offset = 0;
                    }
                    state.info = "Deleted".into();
                }
            }
        }
        _ => {}
    }
    false
}

fn draw(area: Rect, f: &mut ratatui::Frame, state: &UiState, session: &ReplSession) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)].as_ref())
        .split(area);

    let tabs = Tabs::new(vec![
        Line::from("Session"),
        Line::from("Transcripts"),
        Line::from("Help"),
    ])
    .select(state.tab)
    .block(Block::default().borders(Borders::ALL).title("replpad"))
    .highlight_style(Style::default().fg(Color::Yellow));
    f.render_widget(tabs, chunks[0]);

    match state.tab {
        0 => draw_session(chunks[1], f, state, session),
        1 => draw_transcripts(chunks[1], f, state),
        _ => help::draw_help(chunks[1], f),
    }
}

fn draw_session(area: Rect, f: &mut ratatui::Frame, state: &UiState, session: &ReplSession) {
    let main = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Min(0),    // results panel
                Constraint::Length(3), // input line
                Constraint::Length(4), // status
            ]
            .as_ref(),
        )
        .split(area);

    draw_results(main[0], f, state, session);
    draw_input(main[1], f, state);
    draw_status(main[2], f, state, session);
}

fn draw_results(area: Rect, f: &mut ratatui::Frame, state: &UiState, session: &ReplSession) {
    let mut lines: Vec<Line> = Vec::new();
    for entry in session.log().entries() {
        lines.push(Line::from(vec![
            Span::styled("> ", Style::default().fg(Color::Gray)),
            Span::styled(entry.source.clone(), Style::default().fg(Color::Gray)),
        ]));
        // Rendered output is trusted markup: shown verbatim, line by line.
        for rendered_line in entry.rendered.as_str().split('\n') {
            lines.push(Line::from(rendered_line.to_string()));
        }
    }

    let inner_height = area.height.saturating_sub(2) as usize;
    let max_offset = lines.len().saturating_sub(inner_height);
    let offset = max_offset.saturating_sub(state.scroll_from_bottom);

    let title = if state.scroll_from_bottom > 0 {
        format!("Results ({} entries, scrolled)", session.log().len())
    } else {
        format!("Results ({} entries)", session.log().len())
    };
    let results = Paragraph::new(lines)
        .scroll((offset as u16, 0))
        .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(results, area);
}

fn draw_input(area: Rect, f: &mut ratatui::Frame, state: &UiState) {
    let inner_width = area.width.saturating_sub(2) as usize;
    // Keep the cursor visible on long lines by scrolling horizontally.
    let x_scroll = state.cursor.saturating_sub(inner_width.saturating_sub(1));

    let input = Paragraph::new(state.input.as_str())
        .scroll((0, x_scroll as u16))
        .block(Block::default().borders(Borders::ALL).title("Input"));
    f.render_widget(input, area);

    let cursor_x = area.x + 1 + (state.cursor - x_scroll) as u16;
    f.set_cursor_position(Position::new(cursor_x, area.y + 1));
}

fn draw_status(area: Rect, f: &mut ratatui::Frame, state: &UiState, session: &ReplSession) {
    let status_lines = vec![
        Line::from(vec![
            Span::styled("Evaluator: ", Style::default().fg(Color::Gray)),
            Span::raw(session.evaluator_description()),
            Span::raw("   "),
            Span::styled("Auto-save: ", Style::default().fg(Color::Gray)),
            Span::styled(
                if state.auto_save { "ON" } else { "OFF" },
                if state.auto_save {
                    Style::default().fg(Color::Green)
                } else {
                    Style::default().fg(Color::Red)
                },
            ),
        ]),
        Line::from(vec![
            Span::styled("Info: ", Style::default().fg(Color::Gray)),
            Span::raw(state.info.clone()),
        ]),
    ];

    let status =
        Paragraph::new(status_lines).block(Block::default().borders(Borders::ALL).title("Status"));
    f.render_widget(status, area);
}

fn draw_transcripts(area: Rect, f: &mut ratatui::Frame, state: &UiState) {
    let inner_height = area.height.saturating_sub(2) as usize;
    let start = state
        .transcript_scroll_offset
        .min(state.transcripts.len().saturating_sub(1));

    let mut lines: Vec<Line> = Vec::new();
    if state.transcripts.is_empty() {
        lines.push(Line::from("No saved transcripts yet."));
    }
    for (i, t) in state
        .transcripts
        .iter()
        .enumerate()
        .skip(start)
        .take(inner_height.max(1))
    {
        let label = format!(
            "{}  {:>4} entries  [{}]",
            t.started_utc,
            t.entries.len(),
            t.evaluator
        );
        let line = if i == state.transcript_selected {
            Line::from(Span::styled(
                format!("> {}", label),
                Style::default().fg(Color::Yellow),
            ))
        } else {
            Line::from(format!("  {}", label))
        };
        lines.push(line);
    }

    let list = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Transcripts (e export JSON, c export text, y copy path, d delete, r refresh)"),
    );
    f.render_widget(list, area);
}
