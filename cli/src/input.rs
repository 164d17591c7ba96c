use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::Action;

pub mod keys {
    pub const QUIT: &str = "Q";
    pub const REFRESH: &str = "R";
}

pub struct KeyBinding {
    pub key: &'static str,
    pub description: &'static str,
}

/// Bindings advertised in the dashboard footer, in display order.
pub const KEY_BINDINGS: &[KeyBinding] = &[
    KeyBinding {
        key: keys::QUIT,
        description: "Quit",
    },
    KeyBinding {
        key: keys::REFRESH,
        description: "Refresh",
    },
];

pub fn handle_key(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Action::Quit,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::Quit,
        KeyCode::Char('r') | KeyCode::Char('R') => Action::Refresh,
        _ => Action::None,
    }
}

/// Drains every pending terminal event without blocking.
///
/// Returns the most recent key press, if any. Older presses from the same
/// tick are dropped.
pub fn poll_latest_key() -> io::Result<Option<KeyEvent>> {
    let mut latest = None;
    while event::poll(Duration::ZERO)? {
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                latest = Some(key);
            }
        }
    }
    Ok(latest)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_quit_keys() {
        assert_eq!(handle_key(press(KeyCode::Char('q'))), Action::Quit);
        assert_eq!(handle_key(press(KeyCode::Char('Q'))), Action::Quit);
        assert_eq!(handle_key(press(KeyCode::Esc)), Action::Quit);
        assert_eq!(
            handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Action::Quit
        );
    }

    #[test]
    fn test_refresh_keys() {
        assert_eq!(handle_key(press(KeyCode::Char('r'))), Action::Refresh);
        assert_eq!(handle_key(press(KeyCode::Char('R'))), Action::Refresh);
    }

    #[test]
    fn test_other_keys_are_ignored() {
        for code in [
            KeyCode::Char('c'),
            KeyCode::Char('x'),
            KeyCode::Char(' '),
            KeyCode::Enter,
            KeyCode::Up,
        ] {
            assert_eq!(handle_key(press(code)), Action::None, "{code:?}");
        }
    }

    #[test]
    fn test_footer_bindings_in_order() {
        let keys: Vec<_> = KEY_BINDINGS.iter().map(|b| b.key).collect();
        assert_eq!(keys, vec!["Q", "R"]);
    }
}
