//! Actions that commands return to communicate with the app

/// Actions returned by command handlers to describe what should happen
#[derive(Debug, Clone)]
pub enum Action {
    /// No action needed
    None,

    /// Copy text to the clipboard
    Copy(String),

    /// Show notification in status bar
    Notify(String, NotifyLevel),
}

/// Notification levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyLevel {
    Info,
    Warn,
    Error,
}
