use ratatui::{prelude::*, widgets::*};

fn key_line(key: &'static str, what: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::from(key).light_cyan().bold(),
        Span::raw(" : "),
        Span::raw(what),
    ])
}

/// Popup listing the key bindings of the common keys and of the selected tab
pub fn render_help(area: Rect, buf: &mut Buffer, selected_tab: usize) {
    let mut lines = vec![
        key_line("  q  ", "Stop training and exit"),
        key_line("Space", "Pause / resume training"),
        key_line("  h  ", "Toggle this help"),
        key_line(" Tab ", "Switch tabs"),
    ];

    match selected_tab {
        1 => lines.push(key_line("⬅ / ➡", "Switch plots")),
        2 => lines.extend([
            key_line("  s  ", "Show / hide the target selector"),
            key_line("  f  ", "Focus on the selected target"),
            key_line("⬆ / ⬇", "Select log target"),
            key_line("⬅ / ➡", "Show fewer / more log levels"),
            key_line("- / +", "Capture fewer / more log levels"),
            key_line("PgUp ", "Scroll back through the log history"),
            key_line("PgDn ", "Scroll forward in page mode"),
            key_line(" Esc ", "Leave page mode"),
        ]),
        _ => {}
    }

    let [_, center_vert, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length((lines.len() + 4) as u16),
        Constraint::Fill(1),
    ])
    .areas(area);

    let [_, center, _] = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(60),
        Constraint::Fill(1),
    ])
    .areas(center_vert);

    Clear.render(center, buf);

    Paragraph::new(lines)
        .block(
            Block::bordered()
                .border_type(BorderType::Rounded)
                .padding(Padding::horizontal(1))
                .title("Help"),
        )
        .render(center, buf);
}
