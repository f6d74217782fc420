// File: src/tui/handlers.rs
use crate::controller::lookup;
use crate::screen::{Action, AppEvent};
use crate::tui::state::{AppState, InputMode};
use crossterm::event::{KeyCode, KeyEvent};

pub fn handle_app_event(state: &mut AppState, event: AppEvent) {
    let was_list = matches!(event, AppEvent::EventsFetched(..));
    state.screen.apply(event);
    if was_list {
        state.clamp_selection();
        state.message = match (state.screen.list.error(), state.screen.list.pagination()) {
            (Some(e), _) => format!("Error: {}", e),
            (None, Some(p)) => format!("{} events", p.total_count),
            (None, None) => String::new(),
        };
    }
}

pub fn handle_key_event(key: KeyEvent, state: &mut AppState) -> Option<Action> {
    match state.mode {
        InputMode::Searching => handle_search_key(key, state),
        InputMode::Normal if state.screen.lookup.dialog().is_open() => {
            handle_dialog_key(key, state);
            None
        }
        InputMode::Normal => handle_normal_key(key, state),
    }
}

// Every edit of the search box refetches; no debounce.
fn handle_search_key(key: KeyEvent, state: &mut AppState) -> Option<Action> {
    match key.code {
        KeyCode::Enter => {
            state.mode = InputMode::Normal;
            None
        }
        KeyCode::Esc => {
            state.mode = InputMode::Normal;
            let had_term = !state.input_buffer.is_empty();
            state.reset_input();
            had_term.then(|| state.screen.search(""))
        }
        KeyCode::Char(c) => {
            state.enter_char(c);
            Some(state.screen.search(state.input_buffer.clone()))
        }
        KeyCode::Backspace => {
            if state.cursor_position == 0 {
                return None;
            }
            state.delete_char();
            Some(state.screen.search(state.input_buffer.clone()))
        }
        KeyCode::Left => {
            state.move_cursor_left();
            None
        }
        KeyCode::Right => {
            state.move_cursor_right();
            None
        }
        _ => None,
    }
}

fn handle_dialog_key(key: KeyEvent, state: &mut AppState) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('i') => state.screen.close_user(),
        KeyCode::Char('m') | KeyCode::Char('c') => {
            let wanted = if key.code == KeyCode::Char('m') {
                "mailto:"
            } else {
                "tel:"
            };
            let action = state
                .screen
                .lookup
                .contact_actions()
                .into_iter()
                .find(|a| a.uri.starts_with(wanted));
            if let Some(action) = action {
                match lookup::launch(&action.uri) {
                    Ok(()) => state.screen.notices.info(format!("Opening {}", action.uri)),
                    Err(e) => state
                        .screen
                        .notices
                        .error(format!("Could not open {}: {}", action.uri, e)),
                }
            }
        }
        _ => {}
    }
}

fn handle_normal_key(key: KeyEvent, state: &mut AppState) -> Option<Action> {
    match key.code {
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Char('/') => {
            let current = state.screen.list.search().to_string();
            state.load_input(&current);
            state.mode = InputMode::Searching;
            None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            state.next();
            None
        }
        KeyCode::Up | KeyCode::Char('k') => {
            state.previous();
            None
        }
        KeyCode::Right | KeyCode::Char('n') => state.screen.next_page(),
        KeyCode::Left | KeyCode::Char('p') => state.screen.previous_page(),
        KeyCode::Char(c @ '1'..='9') => {
            let slot = c.to_digit(10).unwrap_or(1) as usize - 1;
            let page = state.screen.list.page_window().nth(slot)?;
            state.screen.go_to_page(page)
        }
        KeyCode::Char('s') => {
            let action = state.screen.cycle_sort();
            state.message = format!("Sort: {}", state.screen.list.sort().label());
            Some(action)
        }
        KeyCode::Char(']') | KeyCode::Char('[') => {
            let id = state.selected_event_id()?;
            state.screen.cycle_status(&id, key.code == KeyCode::Char(']'));
            None
        }
        KeyCode::Enter => {
            let id = state.selected_event_id()?;
            if state.screen.edits.is_updating() {
                state.message = "An update is already in progress.".to_string();
                return None;
            }
            let action = state.screen.confirm(&id);
            if action.is_some() {
                state.message = "Updating delivery status...".to_string();
            }
            action
        }
        KeyCode::Char('i') => {
            let id = state.selected_event_id()?;
            state.screen.view_user(&id)
        }
        KeyCode::Char('r') => {
            state.message = "Refreshing...".to_string();
            Some(state.screen.retry())
        }
        KeyCode::Char('b') => {
            state.layout.toggle_sidebar();
            None
        }
        KeyCode::Char('M') => {
            state.layout.toggle_mobile_menu();
            None
        }
        _ => None,
    }
}
