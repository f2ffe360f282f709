//! Key handling for the chat screen.
//!
//! Keys are resolved against the current focus and turned into
//! [`AppAction`]s; nothing here mutates [`App`] directly.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tui_textarea::Input as TAInput;

use crate::core::app::{App, AppAction};
use crate::core::feedback::Sentiment;
use crate::ui::view::{Focus, ViewState};

const PAGE_SCROLL_LINES: u16 = 5;

#[derive(Debug)]
pub enum KeyResult {
    Exit,
    Dispatch(AppAction),
    Handled,
    Ignored,
}

pub fn handle_key(view: &mut ViewState, app: &App, key: KeyEvent) -> KeyResult {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Char('c') if ctrl => return KeyResult::Exit,
        KeyCode::Char('l') if ctrl => return KeyResult::Dispatch(AppAction::ClearHistory),
        KeyCode::F(2) => {
            return KeyResult::Dispatch(AppAction::SubmitFeedback {
                sentiment: Sentiment::Positive,
            })
        }
        KeyCode::F(3) => {
            return KeyResult::Dispatch(AppAction::SubmitFeedback {
                sentiment: Sentiment::Negative,
            })
        }
        KeyCode::Tab | KeyCode::BackTab => {
            view.toggle_focus();
            return KeyResult::Handled;
        }
        KeyCode::PageUp => {
            view.scroll_up(PAGE_SCROLL_LINES);
            return KeyResult::Handled;
        }
        KeyCode::PageDown => {
            view.scroll_down(PAGE_SCROLL_LINES);
            return KeyResult::Handled;
        }
        _ => {}
    }

    match view.focus {
        Focus::Sidebar => handle_sidebar_key(view, app, key),
        Focus::Input => handle_input_key(view, app, key),
    }
}

fn handle_sidebar_key(view: &mut ViewState, app: &App, key: KeyEvent) -> KeyResult {
    let item = view.selected_item();
    match key.code {
        KeyCode::Up => {
            view.select_previous();
            KeyResult::Handled
        }
        KeyCode::Down => {
            view.select_next();
            KeyResult::Handled
        }
        KeyCode::Left => dispatch_or_ignore(item.adjust(&app.settings, false)),
        KeyCode::Right => dispatch_or_ignore(item.adjust(&app.settings, true)),
        KeyCode::Enter | KeyCode::Char(' ') => dispatch_or_ignore(item.activate(&app.settings)),
        KeyCode::Esc => {
            view.focus = Focus::Input;
            KeyResult::Handled
        }
        _ => KeyResult::Ignored,
    }
}

fn handle_input_key(view: &mut ViewState, app: &App, key: KeyEvent) -> KeyResult {
    match key.code {
        KeyCode::Enter if key.modifiers.contains(KeyModifiers::ALT) && !view.is_masked() => {
            view.textarea.insert_newline();
            KeyResult::Handled
        }
        KeyCode::Enter if view.is_masked() => {
            let token = view.take_input();
            KeyResult::Dispatch(AppAction::SubmitCredential { token })
        }
        KeyCode::Enter if app.is_busy() => {
            // The prompt stays in the box; the app answers with a busy notice.
            KeyResult::Dispatch(AppAction::SubmitPrompt {
                prompt: view.input_text(),
            })
        }
        KeyCode::Enter => {
            let prompt = view.take_input();
            if prompt.trim().is_empty() {
                return KeyResult::Handled;
            }
            KeyResult::Dispatch(AppAction::SubmitPrompt { prompt })
        }
        KeyCode::Up if view.textarea.cursor().0 == 0 => {
            view.scroll_up(1);
            KeyResult::Handled
        }
        KeyCode::Down if view.textarea.cursor().0 + 1 >= view.textarea.lines().len() => {
            view.scroll_down(1);
            KeyResult::Handled
        }
        _ => {
            if view.textarea.input(TAInput::from(key)) {
                KeyResult::Handled
            } else {
                KeyResult::Ignored
            }
        }
    }
}

fn dispatch_or_ignore(action: Option<AppAction>) -> KeyResult {
    match action {
        Some(action) => KeyResult::Dispatch(action),
        None => KeyResult::Ignored,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::settings::Tone;
    use crate::ui::sidebar::SidebarItem;
    use crate::utils::test_utils::{create_app_without_credential, create_test_app, TEST_TOKEN};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn type_text(view: &mut ViewState, app: &App, text: &str) {
        for c in text.chars() {
            handle_key(view, app, press(KeyCode::Char(c)));
        }
    }

    #[test]
    fn ctrl_c_exits_from_any_focus() {
        let app = create_test_app();
        let mut view = ViewState::new(false);
        assert!(matches!(handle_key(&mut view, &app, ctrl('c')), KeyResult::Exit));
        view.focus = Focus::Sidebar;
        assert!(matches!(handle_key(&mut view, &app, ctrl('c')), KeyResult::Exit));
    }

    #[test]
    fn enter_submits_typed_prompt_and_clears_box() {
        let app = create_test_app();
        let mut view = ViewState::new(false);
        type_text(&mut view, &app, "a bakery");

        match handle_key(&mut view, &app, press(KeyCode::Enter)) {
            KeyResult::Dispatch(AppAction::SubmitPrompt { prompt }) => {
                assert_eq!(prompt, "a bakery")
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(view.input_text(), "");
    }

    #[test]
    fn blank_enter_does_nothing() {
        let app = create_test_app();
        let mut view = ViewState::new(false);
        type_text(&mut view, &app, "   ");
        assert!(matches!(
            handle_key(&mut view, &app, press(KeyCode::Enter)),
            KeyResult::Handled
        ));
    }

    #[test]
    fn masked_box_submits_credential() {
        let app = create_app_without_credential();
        let mut view = ViewState::new(true);
        type_text(&mut view, &app, TEST_TOKEN);

        match handle_key(&mut view, &app, press(KeyCode::Enter)) {
            KeyResult::Dispatch(AppAction::SubmitCredential { token }) => {
                assert_eq!(token, TEST_TOKEN)
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn busy_enter_keeps_the_prompt() {
        let mut app = create_test_app();
        crate::core::app::apply_action(
            &mut app,
            AppAction::SubmitPrompt {
                prompt: "first".into(),
            },
        );
        let mut view = ViewState::new(false);
        type_text(&mut view, &app, "second");

        assert!(matches!(
            handle_key(&mut view, &app, press(KeyCode::Enter)),
            KeyResult::Dispatch(AppAction::SubmitPrompt { .. })
        ));
        assert_eq!(view.input_text(), "second");
    }

    #[test]
    fn sidebar_navigation_and_adjustment() {
        let app = create_test_app();
        let mut view = ViewState::new(false);
        handle_key(&mut view, &app, press(KeyCode::Tab));
        assert_eq!(view.focus, Focus::Sidebar);
        assert_eq!(view.selected_item(), SidebarItem::Tone);

        match handle_key(&mut view, &app, press(KeyCode::Right)) {
            KeyResult::Dispatch(AppAction::SelectTone { tone }) => assert_eq!(tone, Tone::Formal),
            other => panic!("unexpected {other:?}"),
        }

        for _ in 0..5 {
            handle_key(&mut view, &app, press(KeyCode::Down));
        }
        assert_eq!(view.selected_item(), SidebarItem::ThumbsUp);
        assert!(matches!(
            handle_key(&mut view, &app, press(KeyCode::Enter)),
            KeyResult::Dispatch(AppAction::SubmitFeedback {
                sentiment: Sentiment::Positive
            })
        ));

        handle_key(&mut view, &app, press(KeyCode::Esc));
        assert_eq!(view.focus, Focus::Input);
    }

    #[test]
    fn shortcuts_map_to_actions() {
        let app = create_test_app();
        let mut view = ViewState::new(false);
        assert!(matches!(
            handle_key(&mut view, &app, ctrl('l')),
            KeyResult::Dispatch(AppAction::ClearHistory)
        ));
        assert!(matches!(
            handle_key(&mut view, &app, press(KeyCode::F(3))),
            KeyResult::Dispatch(AppAction::SubmitFeedback {
                sentiment: Sentiment::Negative
            })
        ));
    }
}
