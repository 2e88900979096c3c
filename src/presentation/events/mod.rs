//! Event handling.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Result of event handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    /// Continue processing.
    Continue,
    /// Exit application.
    Exit,
}

/// Checks if key quits from the auth screen.
#[must_use]
pub fn is_quit_event(key: &KeyEvent) -> bool {
    key.code == KeyCode::Esc || is_ctrl(key, 'c')
}

/// Checks if key is a submit event.
#[must_use]
pub fn is_submit_event(key: &KeyEvent) -> bool {
    key.code == KeyCode::Enter
}

/// Checks for `Ctrl` plus the given letter.
#[must_use]
pub fn is_ctrl(key: &KeyEvent, c: char) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char(pressed) if pressed.eq_ignore_ascii_case(&c))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventKind;
    use test_case::test_case;

    fn make_key_event(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new_with_kind(code, modifiers, KeyEventKind::Press)
    }

    #[test_case(KeyCode::Char('c'), KeyModifiers::CONTROL, true ; "ctrl c")]
    #[test_case(KeyCode::Esc, KeyModifiers::NONE, true ; "escape")]
    #[test_case(KeyCode::Char('q'), KeyModifiers::NONE, false ; "plain q is text")]
    #[test_case(KeyCode::Char('c'), KeyModifiers::NONE, false ; "plain c")]
    #[test_case(KeyCode::Enter, KeyModifiers::NONE, false ; "enter")]
    fn test_quit_events(code: KeyCode, modifiers: KeyModifiers, expected: bool) {
        assert_eq!(is_quit_event(&make_key_event(code, modifiers)), expected);
    }

    #[test]
    fn test_submit_event() {
        assert!(is_submit_event(&make_key_event(
            KeyCode::Enter,
            KeyModifiers::NONE
        )));
        assert!(!is_submit_event(&make_key_event(
            KeyCode::Char('a'),
            KeyModifiers::NONE
        )));
    }

    #[test]
    fn test_ctrl_ignores_case() {
        let shifted = make_key_event(
            KeyCode::Char('O'),
            KeyModifiers::CONTROL | KeyModifiers::SHIFT,
        );

        assert!(is_ctrl(&shifted, 'o'));
        assert!(!is_ctrl(&make_key_event(KeyCode::Char('o'), KeyModifiers::NONE), 'o'));
    }
}
