use std::time::Instant;

use arboard::Clipboard;
use tracing::{debug, info, trace};

use crate::columns::{self, ColumnId};
use crate::domain::{HELP_TEXT, Message, UtvConfig, UtvError};
use crate::inputter::{InputResult, SearchInput};
use crate::record::User;
use crate::view::{self, SortDirection, ViewState};

#[derive(Debug, PartialEq)]
pub enum Status {
    LOADING,
    READY,
    FAILED,
    QUITTING,
}

/// One rendered header cell: label, sort indicator and whether the column
/// cursor sits on it.
#[derive(Debug, Clone)]
pub struct HeaderCell {
    pub id: ColumnId,
    pub label: &'static str,
    pub sort: Option<SortDirection>,
    pub selected: bool,
}

/// Everything the UI needs to draw one frame. Rebuilt on every state
/// transition; the UI derives no filter/sort/pagination logic of its own.
#[derive(Debug, Clone)]
pub struct UiData {
    pub title: String,
    pub headers: Vec<HeaderCell>,
    pub rows: Vec<Vec<String>>,
    pub total_rows: usize,
    pub current_page: usize,
    pub page_count: usize,
    pub page_size: usize,
    pub can_go_previous: bool,
    pub can_go_next: bool,
    pub search: InputResult,
    pub search_active: bool,
    pub show_popup: bool,
    pub popup_message: String,
    pub status_message: String,
    pub last_update: Instant,
}

impl UiData {
    fn empty() -> Self {
        UiData {
            title: String::new(),
            headers: Vec::new(),
            rows: Vec::new(),
            total_rows: 0,
            current_page: 1,
            page_count: 1,
            page_size: 0,
            can_go_previous: false,
            can_go_next: false,
            search: InputResult::default(),
            search_active: false,
            show_popup: false,
            popup_message: String::new(),
            status_message: String::new(),
            last_update: Instant::now(),
        }
    }
}

pub struct Model {
    records: Vec<User>,
    state: ViewState,
    cursor_column: usize,
    pub status: Status,
    search: SearchInput,
    search_active: bool,
    show_popup: bool,
    popup_message: String,
    status_message: String,
    uidata: UiData,
}

impl Model {
    pub fn init(config: &UtvConfig) -> Self {
        let mut model = Self {
            records: Vec::new(),
            state: ViewState::new(config.page_size),
            cursor_column: 0,
            status: Status::LOADING,
            search: SearchInput::default(),
            search_active: false,
            show_popup: false,
            popup_message: String::new(),
            status_message: "Loading ...".to_string(),
            uidata: UiData::empty(),
        };
        model.recompute();
        model
    }

    /// Populate the record store. Called exactly once per run with the
    /// fetch result; the records are immutable from here on.
    pub fn load(&mut self, users: Vec<User>) {
        info!("Loaded {} users", users.len());
        self.records = users;
        self.status = Status::READY;
        self.set_status_message(format!("Loaded {} users", self.records.len()));
        self.recompute();
    }

    /// Enter the explicit failure state: zero rows, one page, the error in
    /// the status line. Never a silently empty table.
    pub fn load_failed(&mut self, err: &UtvError) {
        self.status = Status::FAILED;
        self.set_status_message(err.to_string());
        self.recompute();
    }

    pub fn get_uidata(&self) -> &UiData {
        &self.uidata
    }

    /// True while the search box swallows keystrokes raw.
    pub fn raw_keyevents(&self) -> bool {
        self.search_active
    }

    pub fn quit(&mut self) {
        self.status = Status::QUITTING;
    }

    pub fn update(&mut self, message: Message) {
        trace!("Update: {message:?}");
        match message {
            Message::Quit => self.quit(),
            Message::RawKey(key) => self.search_input(key),
            Message::EnterSearch => self.enter_search(),
            Message::NextPage => self.next_page(),
            Message::PreviousPage => self.previous_page(),
            Message::FirstPage => self.set_page(0),
            Message::LastPage => self.set_page(self.uidata.page_count.saturating_sub(1)),
            Message::SelectPreviousColumn => self.move_cursor(-1),
            Message::SelectNextColumn => self.move_cursor(1),
            Message::ToggleSort => self.toggle_sort(),
            Message::GrowPageSize => self.change_page_size(1),
            Message::ShrinkPageSize => self.change_page_size(-1),
            Message::CopyPage => self.copy_page(),
            Message::Help => self.show_help(),
            Message::Exit => self.exit(),
        }
    }

    // ------------------ transition handlers ------------------ //

    fn enter_search(&mut self) {
        self.search_active = true;
        self.search.clear();
        self.search.set(&self.state.query);
        self.recompute();
    }

    fn search_input(&mut self, key: ratatui::crossterm::event::KeyEvent) {
        if !self.search_active {
            return;
        }
        let result = self.search.read(key);
        if result.changed {
            // Live filtering: every edit re-runs the pipeline and resets
            // to the first page.
            self.state.set_query(result.input.clone());
        }
        if result.finished {
            self.search_active = false;
            let shown = self.uidata.total_rows;
            if result.canceled {
                self.set_status_message("Search cleared");
            } else {
                self.set_status_message(format!("{} matching users", shown));
            }
        }
        self.recompute();
    }

    fn next_page(&mut self) {
        // Guarded: a no-op on the last page, not an error.
        if self.uidata.can_go_next {
            self.state.set_page_index(self.state.page_index + 1);
            self.recompute();
        }
    }

    fn previous_page(&mut self) {
        if self.uidata.can_go_previous {
            self.state.set_page_index(self.state.page_index - 1);
            self.recompute();
        }
    }

    fn set_page(&mut self, page_index: usize) {
        self.state.set_page_index(page_index);
        self.recompute();
    }

    fn move_cursor(&mut self, step: isize) {
        let last = columns::columns().len() - 1;
        self.cursor_column = if step < 0 {
            self.cursor_column.saturating_sub(step.unsigned_abs())
        } else {
            (self.cursor_column + step as usize).min(last)
        };
        self.recompute();
    }

    fn toggle_sort(&mut self) {
        let column = columns::columns()[self.cursor_column].id;
        self.state.toggle_sort(column);
        self.recompute();
    }

    fn change_page_size(&mut self, step: isize) {
        let size = if step < 0 {
            self.state.page_size.saturating_sub(step.unsigned_abs()).max(1)
        } else {
            self.state.page_size + step as usize
        };
        self.state.set_page_size(size);
        self.recompute();
    }

    fn show_help(&mut self) {
        self.show_popup = true;
        self.popup_message = HELP_TEXT.to_string();
        self.recompute();
    }

    fn exit(&mut self) {
        if self.show_popup {
            self.show_popup = false;
            self.recompute();
        }
    }

    fn copy_page(&mut self) {
        let csv = self.page_as_csv();
        match Clipboard::new().and_then(|mut c| c.set_text(csv)) {
            Ok(()) => {
                self.set_status_message(format!("Copied {} rows as CSV", self.uidata.rows.len()));
            }
            Err(e) => {
                debug!("Clipboard unavailable: {e:?}");
                self.set_status_message("Clipboard unavailable");
            }
        }
    }

    /// Headers plus the visible rows as CSV, with the usual quoting rules.
    fn page_as_csv(&self) -> String {
        let mut lines = Vec::with_capacity(self.uidata.rows.len() + 1);
        lines.push(
            self.uidata
                .headers
                .iter()
                .map(|h| Self::wrap_cell_content(h.label))
                .collect::<Vec<String>>()
                .join(","),
        );
        for row in self.uidata.rows.iter() {
            lines.push(
                row.iter()
                    .map(|c| Self::wrap_cell_content(c))
                    .collect::<Vec<String>>()
                    .join(","),
            );
        }
        lines.join("\n")
    }

    fn wrap_cell_content(c: &str) -> String {
        let needs_escaping = c.chars().any(|c| c == '"');
        let needs_wrapping = c.chars().any(|c| c == ' ' || c == '\t' || c == ',');
        let mut out = String::from(c);

        if needs_escaping {
            out = out.replace("\"", "\"\"");
        }
        if needs_wrapping || needs_escaping {
            out = format!("\"{out}\"");
        }
        out
    }

    fn set_status_message(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
        self.uidata.status_message = self.status_message.clone();
        self.uidata.last_update = Instant::now();
    }

    // ------------------ recomputation ------------------ //

    /// Record store -> filter -> sort -> page window -> UiData. Runs on
    /// every transition; the dataset is small enough that nothing is cached
    /// between frames.
    fn recompute(&mut self) {
        let visible = view::recompute(&self.records, &mut self.state);

        let headers = columns::columns()
            .iter()
            .enumerate()
            .map(|(idx, spec)| HeaderCell {
                id: spec.id,
                label: spec.header,
                sort: self
                    .state
                    .sort
                    .filter(|s| s.column == spec.id)
                    .map(|s| s.direction),
                selected: idx == self.cursor_column,
            })
            .collect();

        let rows = visible
            .rows
            .iter()
            .map(|&ridx| {
                let user = &self.records[ridx];
                columns::columns()
                    .iter()
                    .map(|spec| (spec.accessor)(user).to_string())
                    .collect()
            })
            .collect();

        let title = match self.status {
            Status::FAILED => "utv (load failed)".to_string(),
            _ => "utv".to_string(),
        };

        self.uidata = UiData {
            title,
            headers,
            rows,
            total_rows: visible.total,
            current_page: visible.page.page_index + 1,
            page_count: visible.page.page_count,
            page_size: self.state.page_size,
            can_go_previous: visible.page.can_go_previous(),
            can_go_next: visible.page.can_go_next(),
            search: self.search.get(),
            search_active: self.search_active,
            show_popup: self.show_popup,
            popup_message: self.popup_message.clone(),
            status_message: self.status_message.clone(),
            last_update: Instant::now(),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    use crate::record::Address;

    fn config() -> UtvConfig {
        UtvConfig {
            url: "http://localhost/users".to_string(),
            page_size: 5,
            fetch_timeout_secs: 10,
            event_poll_time: 100,
        }
    }

    fn user(id: u64, name: &str, city: &str) -> User {
        User {
            id,
            name: name.to_string(),
            username: format!("user{id}"),
            email: format!("user{id}@example.org"),
            address: Address {
                city: city.to_string(),
            },
            ..User::default()
        }
    }

    fn loaded_model() -> Model {
        let mut model = Model::init(&config());
        model.load(vec![
            user(1, "Leanne Graham", "Gwenborough"),
            user(2, "Ervin Howell", "Wisokyburgh"),
            user(3, "Clementine Bauch", "McKenziehaven"),
            user(4, "Patricia Lebsack", "South Elvis"),
            user(5, "Chelsey Dietrich", "Roscoeview"),
            user(6, "Mrs. Dennis Schulist", "South Christy"),
            user(7, "Kurtis Weissnat", "Howemouth"),
        ]);
        model
    }

    fn type_query(model: &mut Model, query: &str) {
        model.update(Message::EnterSearch);
        for c in query.chars() {
            model.update(Message::RawKey(KeyEvent::new(
                KeyCode::Char(c),
                KeyModifiers::NONE,
            )));
        }
    }

    #[test]
    fn page_navigation_is_guarded_at_both_edges() {
        let mut model = loaded_model();
        assert_eq!(model.get_uidata().rows.len(), 5);
        assert_eq!(model.get_uidata().page_count, 2);
        assert!(!model.get_uidata().can_go_previous);

        // Previous on the first page is a no-op.
        model.update(Message::PreviousPage);
        assert_eq!(model.get_uidata().current_page, 1);

        model.update(Message::NextPage);
        assert_eq!(model.get_uidata().current_page, 2);
        assert_eq!(model.get_uidata().rows.len(), 2);

        // Next on the last page is a no-op.
        model.update(Message::NextPage);
        assert_eq!(model.get_uidata().current_page, 2);
    }

    #[test]
    fn toggle_sort_orders_rows_and_flags_the_header() {
        let mut model = loaded_model();
        // Cursor starts on the ID column.
        model.update(Message::ToggleSort);
        let ui = model.get_uidata();
        assert_eq!(ui.headers[0].sort, Some(SortDirection::Ascending));
        assert_eq!(ui.rows[0][0], "1");

        model.update(Message::ToggleSort);
        let ui = model.get_uidata();
        assert_eq!(ui.headers[0].sort, Some(SortDirection::Descending));
        assert_eq!(ui.rows[0][0], "7");

        model.update(Message::ToggleSort);
        let ui = model.get_uidata();
        assert_eq!(ui.headers[0].sort, None);
        assert_eq!(ui.rows[0][0], "1");
    }

    #[test]
    fn selecting_another_column_moves_the_sort() {
        let mut model = loaded_model();
        model.update(Message::ToggleSort);
        model.update(Message::SelectNextColumn);
        model.update(Message::ToggleSort);
        let ui = model.get_uidata();
        assert_eq!(ui.headers[0].sort, None);
        assert_eq!(ui.headers[1].sort, Some(SortDirection::Ascending));
        assert!(ui.headers[1].selected);
        // Name ascending puts Chelsey Dietrich first.
        assert_eq!(ui.rows[0][1], "Chelsey Dietrich");
    }

    #[test]
    fn live_search_filters_and_resets_the_page() {
        let mut model = loaded_model();
        model.update(Message::NextPage);
        assert_eq!(model.get_uidata().current_page, 2);

        type_query(&mut model, "south");
        let ui = model.get_uidata();
        assert_eq!(ui.current_page, 1);
        assert_eq!(ui.total_rows, 2);
        assert_eq!(ui.rows.len(), 2);
        assert!(ui.search_active);

        model.update(Message::RawKey(KeyEvent::new(
            KeyCode::Enter,
            KeyModifiers::NONE,
        )));
        assert!(!model.get_uidata().search_active);
        assert_eq!(model.get_uidata().total_rows, 2);
    }

    #[test]
    fn escape_clears_the_query_again() {
        let mut model = loaded_model();
        type_query(&mut model, "nomatch");
        assert_eq!(model.get_uidata().total_rows, 0);
        assert_eq!(model.get_uidata().page_count, 1);

        model.update(Message::RawKey(KeyEvent::new(
            KeyCode::Esc,
            KeyModifiers::NONE,
        )));
        assert_eq!(model.get_uidata().total_rows, 7);
    }

    #[test]
    fn shrinking_the_page_size_reclamps_the_page_index() {
        let mut model = loaded_model();
        model.update(Message::ShrinkPageSize); // 4 -> pages of 4,3
        model.update(Message::LastPage);
        assert_eq!(model.get_uidata().current_page, 2);

        model.update(Message::GrowPageSize);
        model.update(Message::GrowPageSize);
        model.update(Message::GrowPageSize); // size 7, one page
        let ui = model.get_uidata();
        assert_eq!(ui.page_count, 1);
        assert_eq!(ui.current_page, 1);
        assert_eq!(ui.rows.len(), 7);
    }

    #[test]
    fn load_failure_renders_an_explicit_empty_state() {
        let mut model = Model::init(&config());
        model.load_failed(&UtvError::LoadFailed("connection refused".to_string()));
        let ui = model.get_uidata();
        assert_eq!(model.status, Status::FAILED);
        assert!(ui.rows.is_empty());
        assert_eq!(ui.page_count, 1);
        assert!(ui.status_message.contains("connection refused"));
        assert_eq!(ui.title, "utv (load failed)");
    }

    #[test]
    fn help_popup_opens_and_closes() {
        let mut model = loaded_model();
        model.update(Message::Help);
        assert!(model.get_uidata().show_popup);
        model.update(Message::Exit);
        assert!(!model.get_uidata().show_popup);
    }

    #[test]
    fn page_as_csv_quotes_what_needs_quoting() {
        let mut model = Model::init(&config());
        let mut odd = user(1, "Ann \"Lee\", Jr", "East Lyme");
        odd.username = "plain".to_string();
        model.load(vec![odd]);
        let csv = model.page_as_csv();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "ID,Name,Username,Email,City,Phone,Website,\"Company Name\",\"Catch Phrase\",\"Business Service\""
        );
        let row = lines.next().unwrap();
        assert!(row.starts_with("1,\"Ann \"\"Lee\"\", Jr\",plain,"));
        assert!(row.contains("\"East Lyme\""));
    }
}
