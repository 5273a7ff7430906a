use crossterm::event::{Event, KeyCode, KeyEventKind};
use ratatui::style::Color;

/// Background of empty cells and of the grid panel
pub(super) const BACKGROUND: Color = Color::Rgb(45, 55, 72);
pub(super) const AGENT: Color = Color::Rgb(255, 165, 0);

/// Takes an event, checks if it is a key press event, and returns the [`KeyCode`]
pub(super) fn event_keycode(event: &Event) -> Option<KeyCode> {
    let Event::Key(key) = event else {
        return None;
    };

    if key.kind != KeyEventKind::Press {
        return None;
    }

    Some(key.code)
}
