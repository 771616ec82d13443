use ratatui::crossterm::event::KeyEvent;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UtvError {
    #[error("loading users failed: {0}")]
    LoadFailed(String),
    #[error(transparent)]
    IoError(#[from] std::io::Error),
}

/// Runtime configuration, filled in from the CLI.
#[derive(Debug, Clone)]
pub struct UtvConfig {
    pub url: String,
    pub page_size: usize,
    pub fetch_timeout_secs: u64,
    pub event_poll_time: u64,
}

/// Everything the controller can ask the model to do.
#[derive(Debug, Clone, Copy)]
pub enum Message {
    Quit,
    NextPage,
    PreviousPage,
    FirstPage,
    LastPage,
    SelectPreviousColumn,
    SelectNextColumn,
    ToggleSort,
    GrowPageSize,
    ShrinkPageSize,
    EnterSearch,
    CopyPage,
    Help,
    Exit,
    RawKey(KeyEvent),
}

pub const HELP_TEXT: &str = "\
utv - user table browser

  /          search (type to filter live, Enter keeps, Esc clears)
  Left/Right select a column header
  s, Enter   cycle sort on the selected column (asc > desc > off)
  n, PgDn    next page
  p, PgUp    previous page
  g / G      first / last page
  + / -      grow / shrink page size
  y          copy the visible page as CSV
  ?          this help
  q          quit
";
