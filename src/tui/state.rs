use crate::layout::LayoutHandle;
use crate::model::{EventSummary, SortKey};
use crate::screen::EventsScreen;
use ratatui::widgets::TableState;

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum InputMode {
    Normal,
    Searching,
}

pub struct AppState {
    pub screen: EventsScreen,
    pub layout: LayoutHandle,

    // UI State
    pub table_state: TableState,
    pub mode: InputMode,
    pub message: String,

    // Input Buffer (search box)
    pub input_buffer: String,
    pub cursor_position: usize,
}

impl AppState {
    pub fn new(sort: SortKey, layout: LayoutHandle) -> Self {
        let mut table_state = TableState::default();
        table_state.select(Some(0));
        Self {
            screen: EventsScreen::new(sort, &layout),
            layout,
            table_state,
            mode: InputMode::Normal,
            message: "Loading...".to_string(),
            input_buffer: String::new(),
            cursor_position: 0,
        }
    }

    pub fn events(&self) -> &[EventSummary] {
        self.screen.list.events()
    }

    pub fn get_selected_event(&self) -> Option<&EventSummary> {
        self.table_state
            .selected()
            .and_then(|idx| self.events().get(idx))
    }

    pub fn selected_event_id(&self) -> Option<String> {
        self.get_selected_event().map(|e| e.event_id.clone())
    }

    /// Keep the highlighted row inside the (possibly replaced) page.
    pub fn clamp_selection(&mut self) {
        let len = self.events().len();
        if len == 0 {
            self.table_state.select(None);
        } else {
            let current = self.table_state.selected().unwrap_or(0);
            self.table_state.select(Some(current.min(len - 1)));
        }
    }

    // --- NAVIGATION ---
    pub fn next(&mut self) {
        let len = self.events().len();
        if len == 0 {
            return;
        }
        let i = match self.table_state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.table_state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.events().len();
        if len == 0 {
            return;
        }
        let i = match self.table_state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.table_state.select(Some(i));
    }

    // --- INPUT HELPERS ---
    pub fn move_cursor_left(&mut self) {
        let cursor_moved_left = self.cursor_position.saturating_sub(1);
        self.cursor_position = self.clamp_cursor(cursor_moved_left);
    }
    pub fn move_cursor_right(&mut self) {
        let cursor_moved_right = self.cursor_position.saturating_add(1);
        self.cursor_position = self.clamp_cursor(cursor_moved_right);
    }
    pub fn enter_char(&mut self, new_char: char) {
        let byte_idx = self.byte_index();
        self.input_buffer.insert(byte_idx, new_char);
        self.move_cursor_right();
    }
    pub fn delete_char(&mut self) {
        if self.cursor_position != 0 {
            let current_index = self.cursor_position;
            let before = self.input_buffer.chars().take(current_index - 1);
            let after = self.input_buffer.chars().skip(current_index);
            self.input_buffer = before.chain(after).collect();
            self.move_cursor_left();
        }
    }
    pub fn reset_input(&mut self) {
        self.input_buffer.clear();
        self.cursor_position = 0;
    }
    pub fn load_input(&mut self, text: &str) {
        self.input_buffer = text.to_string();
        self.cursor_position = self.input_buffer.chars().count();
    }
    fn byte_index(&self) -> usize {
        self.input_buffer
            .char_indices()
            .map(|(i, _)| i)
            .nth(self.cursor_position)
            .unwrap_or(self.input_buffer.len())
    }
    fn clamp_cursor(&self, new_cursor_pos: usize) -> usize {
        new_cursor_pos.clamp(0, self.input_buffer.chars().count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::fixtures::single_page;
    use crate::controller::fixtures::make_event;
    use crate::layout::LayoutState;
    use crate::model::DeliveryStatus;
    use crate::screen::{Action, AppEvent};

    fn state_with(n: usize) -> AppState {
        let mut state = AppState::new(SortKey::default(), LayoutHandle::new(LayoutState::default()));
        let Action::FetchEvents(ticket) = state.screen.start() else {
            panic!("start should fetch");
        };
        let events = (0..n)
            .map(|i| make_event(&format!("e{}", i), DeliveryStatus::Pending))
            .collect();
        state
            .screen
            .apply(AppEvent::EventsFetched(ticket, Ok(single_page(events))));
        state
    }

    #[test]
    fn test_navigation_next_wraps() {
        let mut state = state_with(3);
        state.table_state.select(Some(0));

        state.next();
        assert_eq!(state.table_state.selected(), Some(1));
        state.next();
        assert_eq!(state.table_state.selected(), Some(2));
        state.next();
        assert_eq!(state.table_state.selected(), Some(0));
    }

    #[test]
    fn test_navigation_previous_wraps() {
        let mut state = state_with(3);
        state.table_state.select(Some(0));

        state.previous();
        assert_eq!(state.table_state.selected(), Some(2));
        state.previous();
        assert_eq!(state.table_state.selected(), Some(1));
        assert_eq!(state.selected_event_id().as_deref(), Some("e1"));
    }

    #[test]
    fn test_navigation_empty_list_safety() {
        let mut state = state_with(0);
        state.next();
        state.previous();
        state.clamp_selection();
        assert_eq!(state.table_state.selected(), None);
        assert!(state.get_selected_event().is_none());
    }

    #[test]
    fn test_clamp_after_shorter_page() {
        let mut state = state_with(2);
        state.table_state.select(Some(7));
        state.clamp_selection();
        assert_eq!(state.table_state.selected(), Some(1));
    }

    #[test]
    fn test_cursor_clamping_and_unicode() {
        let mut state = state_with(0);
        state.load_input("gal");
        assert_eq!(state.cursor_position, 3);
        state.move_cursor_right();
        assert_eq!(state.cursor_position, 3);

        state.move_cursor_left();
        state.enter_char('é');
        assert_eq!(state.input_buffer, "gaél");
        state.enter_char('x');
        assert_eq!(state.input_buffer, "gaéxl");

        state.delete_char();
        state.delete_char();
        assert_eq!(state.input_buffer, "gal");
        for _ in 0..5 {
            state.move_cursor_left();
        }
        assert_eq!(state.cursor_position, 0);
    }
}
