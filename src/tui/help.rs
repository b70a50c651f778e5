use ratatui::{
    layout::Rect,
    style::Color,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn draw_help(area: Rect, f: &mut Frame) {
    let p = Paragraph::new(vec![
        Line::from("Session tab:"),
        Line::from(vec![
            Span::raw("  "),
            Span::styled("Enter", Style::default().fg(Color::Magenta)),
            Span::raw("      Run the input line"),
        ]),
        Line::from(vec![
            Span::raw("  "),
            Span::styled("Ctrl-R", Style::default().fg(Color::Magenta)),
            Span::raw("     Re-run the last submitted source"),
        ]),
        Line::from(vec![
            Span::raw("  "),
            Span::styled("Up/Down", Style::default().fg(Color::Magenta)),
            Span::raw("    Recall input history"),
        ]),
        Line::from(vec![
            Span::raw("  "),
            Span::styled("PgUp/PgDn", Style::default().fg(Color::Magenta)),
            Span::raw("  Scroll results"),
        ]),
        Line::from(vec![
            Span::raw("  "),
            Span::styled("Ctrl-S", Style::default().fg(Color::Magenta)),
            Span::raw("     Save transcript"),
        ]),
        Line::from(vec![
            Span::raw("  "),
            Span::styled("Ctrl-Y", Style::default().fg(Color::Magenta)),
            Span::raw("     Copy last output to clipboard"),
        ]),
        Line::from(vec![
            Span::raw("  "),
            Span::styled("Ctrl-A", Style::default().fg(Color::Magenta)),
            Span::raw("     Toggle auto-save"),
        ]),
        Line::from(vec![
            Span::raw("  "),
            Span::styled("Esc", Style::default().fg(Color::Magenta)),
            Span::raw("        Clear the input line"),
        ]),
        Line::from(""),
        Line::from("Transcripts tab:"),
        Line::from(vec![
            Span::raw("  "),
            Span::styled("↑/↓", Style::default().fg(Color::Magenta)),
            Span::raw(" or "),
            Span::styled("j/k", Style::default().fg(Color::Magenta)),
            Span::raw("  Navigate"),
        ]),
        Line::from(vec![
            Span::raw("  "),
            Span::styled("e", Style::default().fg(Color::Magenta)),
            Span::raw("           Export selected as JSON"),
        ]),
        Line::from(vec![
            Span::raw("  "),
            Span::styled("c", Style::default().fg(Color::Magenta)),
            Span::raw("           Export selected as plain text"),
        ]),
        Line::from(vec![
            Span::raw("  "),
            Span::styled("y", Style::default().fg(Color::Magenta)),
            Span::raw("           Copy exported path to clipboard"),
        ]),
        Line::from(vec![
            Span::raw("  "),
            Span::styled("d", Style::default().fg(Color::Magenta)),
            Span::raw("           Delete selected"),
        ]),
        Line::from(vec![
            Span::raw("  "),
            Span::styled("r", Style::default().fg(Color::Magenta)),
            Span::raw("           Refresh list"),
        ]),
        Line::from(""),
        Line::from("Everywhere:"),
        Line::from(vec![
            Span::raw("  "),
            Span::styled("Tab", Style::default().fg(Color::Magenta)),
            Span::raw("        Switch tabs"),
        ]),
        Line::from(vec![
            Span::raw("  "),
            Span::styled("Ctrl-C", Style::default().fg(Color::Magenta)),
            Span::raw("     Quit"),
        ]),
    ])
    .block(Block::default().borders(Borders::ALL).title("Help"));
    f.render_widget(p, area);
}
