use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::App;

/// Lines moved by PageUp/PageDown.
const PAGE: u16 = 10;

/// Poll for events with a timeout
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Handle a key event
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    match key.code {
        // Raw mode swallows SIGINT, so Ctrl-C arrives as a key.
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit(),
        KeyCode::Char('q') | KeyCode::Esc => app.quit(),

        KeyCode::Char('r') => app.request_refresh(),

        KeyCode::Up | KeyCode::Char('k') => app.scroll_up(1),
        KeyCode::Down | KeyCode::Char('j') => app.scroll_down(1),
        KeyCode::PageUp => app.scroll_up(PAGE),
        KeyCode::PageDown => app.scroll_down(PAGE),
        KeyCode::Home => app.scroll_to_top(),
        KeyCode::End => app.scroll_to_bottom(),

        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Overrides, Settings};
    use crate::source::ChannelSource;

    fn app() -> App {
        let settings = Settings::resolve(&Overrides::default(), Some(Default::default())).unwrap();
        let (_tx, source) = ChannelSource::create("keys");
        App::new(Box::new(source), &settings)
    }

    fn press(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
        handle_key_event(app, KeyEvent::new(code, modifiers));
    }

    #[test]
    fn test_quit_keys() {
        for (code, modifiers) in [
            (KeyCode::Char('q'), KeyModifiers::NONE),
            (KeyCode::Esc, KeyModifiers::NONE),
            (KeyCode::Char('c'), KeyModifiers::CONTROL),
        ] {
            let mut app = app();
            press(&mut app, code, modifiers);
            assert!(!app.running, "{:?} should quit", code);
        }
    }

    #[test]
    fn test_plain_c_does_not_quit() {
        let mut app = app();
        press(&mut app, KeyCode::Char('c'), KeyModifiers::NONE);
        assert!(app.running);
    }

    #[test]
    fn test_refresh_key() {
        let mut app = app();
        press(&mut app, KeyCode::Char('r'), KeyModifiers::NONE);
        assert!(app.refresh_requested);
    }

    #[test]
    fn test_scroll_keys() {
        let mut app = app();
        press(&mut app, KeyCode::PageDown, KeyModifiers::NONE);
        press(&mut app, KeyCode::Down, KeyModifiers::NONE);
        assert_eq!(app.scroll, 11);
        press(&mut app, KeyCode::Char('k'), KeyModifiers::NONE);
        assert_eq!(app.scroll, 10);
        press(&mut app, KeyCode::Home, KeyModifiers::NONE);
        assert_eq!(app.scroll, 0);
    }

    #[test]
    fn test_release_is_ignored() {
        let mut app = app();
        let mut key = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        key.kind = KeyEventKind::Release;
        handle_key_event(&mut app, key);
        assert!(app.running);
    }
}
