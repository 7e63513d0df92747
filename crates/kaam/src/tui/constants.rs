//! Shared constants for the TUI to keep layout and timing in sync.

/// Interval in milliseconds between UI ticks/redraws.
pub const TUI_TICK_RATE_MS: u64 = 200;
/// Time-to-live in seconds for transient status messages.
pub const UI_MESSAGE_TTL_SECS: u64 = 5;
/// Highlight symbol shown beside selected list entries.
pub const TASK_LIST_HIGHLIGHT_SYMBOL: &str = "▶ ";
/// Text shown in place of the list while a mutation is pending.
pub const LOADING_TEXT: &str = "Loading...";
/// Headline of the fallback screen after a render fault.
pub const FAULT_HEADLINE: &str = "Something went wrong!";
/// Height of the form pane, borders included.
pub const FORM_PANE_HEIGHT: u16 = 6;
/// Height of the filter/sort indicator bar, borders included.
pub const INDICATOR_BAR_HEIGHT: u16 = 3;
/// Height of the status footer, borders included.
pub const STATUS_FOOTER_HEIGHT: u16 = 4;
/// Longest task text shown in the form pane before truncation.
pub const FORM_TEXT_MAX_GRAPHEMES: usize = 60;
