use std::time::{Duration, Instant};

use chrono::Local;

use crate::config::Config;
use crate::core::{parse_command, Action, Command, NotifyLevel};
use crate::domain::advisory::{
    band_counts, ioc_suggestions, source_counts, Advisory, SeverityBand,
};
use crate::modules::intel::AlertPolicy;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Sidebar,
    Feed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Command,
    Prompt(PromptKind),
}

/// Live filter prompts: search over row text, or over IOC values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    Search,
    Ioc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataMode {
    Sample,
    Api,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warn,
    Error,
}

/// The single active row predicate.
///
/// Exactly one filter is in force at a time; applying a new one replaces
/// the previous one wholesale. The text and IOC filters intentionally do
/// not compose.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowFilter {
    All,
    Text(String),
    Ioc(String),
    Severity(String),
    Source(String),
}

impl RowFilter {
    pub fn matches(&self, advisory: &Advisory) -> bool {
        match self {
            RowFilter::All => true,
            RowFilter::Text(query) => advisory.search_text().contains(&query.to_lowercase()),
            RowFilter::Ioc(query) => {
                let needle = query.to_lowercase();
                let ioc_data = advisory.iocs.join(" ").to_lowercase();
                ioc_data.contains(&needle) || advisory.search_text().contains(&needle)
            }
            RowFilter::Severity(label) => contains_case_insensitive(&advisory.severity, label),
            RowFilter::Source(name) => advisory.source == *name,
        }
    }

    pub fn describe(&self) -> Option<String> {
        match self {
            RowFilter::All => None,
            RowFilter::Text(query) => Some(format!("text:{query}")),
            RowFilter::Ioc(query) => Some(format!("ioc:{query}")),
            RowFilter::Severity(label) => Some(format!("sev:{label}")),
            RowFilter::Source(name) => Some(format!("source:{name}")),
        }
    }
}

/// Classified mouse click, resolved against the frame's layout before any
/// state changes. Sidebar collapse/expand is decided from this in one
/// place, so there is no ordering dependency between handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickTarget {
    SidebarToggle,
    SidebarSource(usize),
    SidebarIoc(usize),
    SidebarBody,
    ChartBar(usize),
    FeedRow(usize),
    Outside,
}

/// The one authoritative sidebar rule: the toggle flips, any click inside
/// the sidebar preserves state, a source entry always expands, everything
/// else collapses an expanded sidebar.
pub fn sidebar_after_click(target: &ClickTarget, collapsed: bool) -> bool {
    match target {
        ClickTarget::SidebarToggle => !collapsed,
        ClickTarget::SidebarSource(_) => false,
        ClickTarget::SidebarIoc(_) | ClickTarget::SidebarBody => collapsed,
        ClickTarget::ChartBar(_) | ClickTarget::FeedRow(_) | ClickTarget::Outside => true,
    }
}

#[derive(Debug, Default, Clone)]
pub struct CommandBar {
    pub input: String,
    pub last: Option<String>,
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub level: StatusLevel,
    pub since: Instant,
}

#[derive(Debug, Clone)]
pub struct EndpointOption {
    pub label: String,
    pub display: String,
}

#[derive(Debug)]
pub struct App {
    /// The advisory feed as last fetched.
    pub rows: Vec<Advisory>,
    pub row_filter: RowFilter,
    /// Sidebar tallies, rebuilt wholesale on each ingest.
    pub source_counts: Vec<(String, usize)>,
    pub ioc_suggestions: Vec<String>,
    pub alert_policy: AlertPolicy,
    pub data_mode: DataMode,
    pub focus: Focus,
    pub input_mode: InputMode,
    pub command: CommandBar,
    /// Selection index into the *visible* row list.
    pub selected_row: usize,
    pub selected_source: Option<usize>,
    pub sidebar_collapsed: bool,
    /// Absolute row index shown in the detail modal.
    pub detail_row: Option<usize>,
    pub help_open: bool,
    pub should_quit: bool,
    pub api_endpoint: String,
    pub api_endpoints: Vec<EndpointOption>,
    pub api_endpoint_index: usize,
    pub clipboard: Option<String>,
    pub status: Option<StatusMessage>,
    pub last_fetch_error: Option<String>,
    pub pending_refresh_request: bool,
    pub pending_endpoint_switch: Option<usize>,
}

impl App {
    pub fn new(config: &Config) -> Self {
        Self {
            rows: Vec::new(),
            row_filter: RowFilter::All,
            source_counts: Vec::new(),
            ioc_suggestions: Vec::new(),
            alert_policy: AlertPolicy::from_config(config),
            data_mode: DataMode::Api,
            focus: Focus::Feed,
            input_mode: InputMode::Normal,
            command: CommandBar::default(),
            selected_row: 0,
            selected_source: None,
            sidebar_collapsed: false,
            detail_row: None,
            help_open: false,
            should_quit: false,
            api_endpoint: String::new(),
            api_endpoints: Vec::new(),
            api_endpoint_index: 0,
            clipboard: None,
            status: None,
            last_fetch_error: None,
            pending_refresh_request: false,
            pending_endpoint_switch: None,
        }
    }

    // --- feed state -------------------------------------------------------

    /// Indices of rows passing the active filter, in feed order.
    pub fn visible_indices(&self) -> Vec<usize> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, row)| self.row_filter.matches(row))
            .map(|(idx, _)| idx)
            .collect()
    }

    /// The displayed count: always the currently-visible rows, never the
    /// fetched total.
    pub fn visible_count(&self) -> usize {
        self.visible_indices().len()
    }

    pub fn selected_advisory(&self) -> Option<&Advisory> {
        self.visible_indices()
            .get(self.selected_row)
            .and_then(|idx| self.rows.get(*idx))
    }

    pub fn detail_advisory(&self) -> Option<&Advisory> {
        self.detail_row.and_then(|idx| self.rows.get(idx))
    }

    pub fn ingest_advisories(&mut self, advisories: Vec<Advisory>) {
        self.rows = advisories;
        self.source_counts = source_counts(&self.rows);
        self.ioc_suggestions = ioc_suggestions(&self.rows);
        self.row_filter = RowFilter::All;
        self.selected_row = 0;
        self.selected_source = None;
        self.detail_row = None;
        self.last_fetch_error = None;
        self.set_status(
            format!("Loaded {} advisories", self.rows.len()),
            StatusLevel::Info,
        );
    }

    /// The fetch is the single error path: record it, keep the feed as-is.
    pub fn apply_fetch_error(&mut self, message: String) {
        self.set_status(message.clone(), StatusLevel::Error);
        self.last_fetch_error = Some(message);
    }

    pub fn apply_connected(&mut self, endpoint: String) {
        self.api_endpoint = endpoint;
    }

    pub fn alert_count(&self) -> usize {
        self.alert_policy.active(&self.rows).len()
    }

    pub fn chart_labels(&self) -> [&'static str; 5] {
        let mut labels = [""; 5];
        for (i, band) in SeverityBand::ALL.iter().enumerate() {
            labels[i] = band.label();
        }
        labels
    }

    pub fn chart_counts(&self) -> [u64; 5] {
        band_counts(&self.rows)
    }

    /// Bar index matching the active severity filter, for chart highlight.
    pub fn chart_highlight(&self) -> Option<usize> {
        let RowFilter::Severity(label) = &self.row_filter else {
            return None;
        };
        SeverityBand::ALL.iter().position(|band| band.label() == label)
    }

    // --- filtering --------------------------------------------------------

    pub fn set_filter(&mut self, filter: RowFilter) {
        self.row_filter = filter;
        self.selected_row = 0;
        if !matches!(self.row_filter, RowFilter::Source(_)) {
            self.selected_source = None;
        }
    }

    pub fn clear_filter(&mut self) {
        self.set_filter(RowFilter::All);
    }

    // --- detail modal -----------------------------------------------------

    pub fn open_detail(&mut self) {
        self.detail_row = self.visible_indices().get(self.selected_row).copied();
    }

    pub fn close_detail(&mut self) {
        self.detail_row = None;
    }

    // --- sidebar ----------------------------------------------------------

    pub fn toggle_sidebar(&mut self) {
        self.sidebar_collapsed = !self.sidebar_collapsed;
    }

    /// Apply a classified click: state change first, then the sidebar rule.
    pub fn apply_click(&mut self, target: ClickTarget) {
        match &target {
            ClickTarget::SidebarToggle | ClickTarget::SidebarBody | ClickTarget::Outside => {}
            ClickTarget::SidebarSource(idx) => {
                let source = self.source_counts.get(*idx).map(|(source, _)| source.clone());
                if let Some(source) = source {
                    self.set_filter(RowFilter::Source(source));
                    self.selected_source = Some(*idx);
                    self.focus = Focus::Sidebar;
                }
            }
            ClickTarget::SidebarIoc(idx) => {
                let ioc = self.ioc_suggestions.get(*idx).cloned();
                if let Some(ioc) = ioc {
                    self.set_filter(RowFilter::Ioc(ioc));
                }
            }
            ClickTarget::ChartBar(idx) => {
                if let Some(band) = SeverityBand::ALL.get(*idx) {
                    self.set_filter(RowFilter::Severity(band.label().to_string()));
                }
            }
            ClickTarget::FeedRow(visible_idx) => {
                if *visible_idx < self.visible_indices().len() {
                    self.selected_row = *visible_idx;
                    self.focus = Focus::Feed;
                    self.open_detail();
                }
            }
        }
        self.sidebar_collapsed = sidebar_after_click(&target, self.sidebar_collapsed);
    }

    /// Keyboard navigation over the sidebar source entries.
    pub fn sidebar_select_next(&mut self) {
        if self.source_counts.is_empty() {
            return;
        }
        let next = match self.selected_source {
            Some(idx) => (idx + 1).min(self.source_counts.len() - 1),
            None => 0,
        };
        self.selected_source = Some(next);
    }

    pub fn sidebar_select_prev(&mut self) {
        if self.source_counts.is_empty() {
            return;
        }
        let prev = match self.selected_source {
            Some(idx) => idx.saturating_sub(1),
            None => 0,
        };
        self.selected_source = Some(prev);
    }

    /// Activate the highlighted source entry as if it had been clicked.
    pub fn apply_selected_source(&mut self) {
        if let Some(idx) = self.selected_source {
            self.apply_click(ClickTarget::SidebarSource(idx));
        }
    }

    // --- selection --------------------------------------------------------

    pub fn move_selection_up(&mut self) {
        self.selected_row = self.selected_row.saturating_sub(1);
    }

    pub fn move_selection_down(&mut self) {
        let len = self.visible_count();
        if len > 0 && self.selected_row + 1 < len {
            self.selected_row += 1;
        }
    }

    pub fn go_to_top(&mut self) {
        self.selected_row = 0;
    }

    pub fn go_to_bottom(&mut self) {
        self.selected_row = self.visible_count().saturating_sub(1);
    }

    pub fn page_up(&mut self, amount: usize) {
        self.selected_row = self.selected_row.saturating_sub(amount);
    }

    pub fn page_down(&mut self, amount: usize) {
        let len = self.visible_count();
        if len > 0 {
            self.selected_row = (self.selected_row + amount).min(len - 1);
        }
    }

    /// First visible-list index shown on screen for the given viewport
    /// height; shared by the renderer and the click classifier.
    pub fn list_offset(&self, visible_height: usize) -> usize {
        let visible_height = visible_height.max(1);
        if self.selected_row >= visible_height {
            self.selected_row - (visible_height - 1)
        } else {
            0
        }
    }

    // --- command bar and prompts ------------------------------------------

    pub fn enter_command(&mut self) {
        self.input_mode = InputMode::Command;
        self.command.input.clear();
    }

    pub fn exit_command(&mut self) {
        self.input_mode = InputMode::Normal;
        self.command.input.clear();
    }

    pub fn apply_command(&mut self) {
        let input = self.command.input.trim().to_string();
        self.input_mode = InputMode::Normal;
        self.command.input.clear();
        if input.is_empty() {
            return;
        }
        self.command.last = Some(input.clone());
        let command = parse_command(&input);
        let action = self.execute_command(&command);
        self.apply_action(action);
    }

    pub fn enter_prompt(&mut self, kind: PromptKind) {
        self.input_mode = InputMode::Prompt(kind);
        self.command.input.clear();
        // An empty query matches everything, so opening the prompt resets
        // visibility the way clearing the input box does.
        self.apply_prompt_input(kind);
    }

    /// Leave the prompt; the filter built from its content stays active.
    pub fn exit_prompt(&mut self) {
        self.input_mode = InputMode::Normal;
        self.command.input.clear();
    }

    /// Re-apply the live filter for the current prompt text. Runs on every
    /// keystroke; no debounce.
    pub fn apply_prompt_input(&mut self, kind: PromptKind) {
        let query = self.command.input.to_lowercase();
        let filter = match kind {
            PromptKind::Search => RowFilter::Text(query),
            PromptKind::Ioc => RowFilter::Ioc(query),
        };
        self.set_filter(filter);
    }

    // --- commands ---------------------------------------------------------

    pub fn execute_command(&mut self, cmd: &Command) -> Action {
        match cmd {
            Command::Filter(query) => {
                let query = query.clone().unwrap_or_default().to_lowercase();
                if query.is_empty() {
                    self.clear_filter();
                } else {
                    self.set_filter(RowFilter::Text(query));
                }
                self.filter_notification()
            }
            Command::Ioc(query) => {
                let query = query.clone().unwrap_or_default().to_lowercase();
                if query.is_empty() {
                    self.clear_filter();
                } else {
                    self.set_filter(RowFilter::Ioc(query));
                }
                self.filter_notification()
            }
            Command::Severity(label) => {
                self.set_filter(RowFilter::Severity(label.clone()));
                self.filter_notification()
            }
            Command::Source(name) => {
                self.selected_source = self
                    .source_counts
                    .iter()
                    .position(|(source, _)| source == name);
                self.set_filter(RowFilter::Source(name.clone()));
                self.filter_notification()
            }
            Command::Clear => {
                self.clear_filter();
                Action::Notify(
                    format!("Cleared filters, {} advisories", self.visible_count()),
                    NotifyLevel::Info,
                )
            }
            Command::Refresh => {
                self.request_refresh();
                Action::None
            }
            Command::Export(format) => crate::modules::export::export_feed(&self.rows, *format),
            Command::Connect(url) => {
                let needle = url.trim();
                match self
                    .api_endpoints
                    .iter()
                    .position(|option| option.display.contains(needle))
                {
                    Some(index) => {
                        self.pending_endpoint_switch = Some(index);
                        Action::Notify(
                            format!("Connecting to {}…", self.api_endpoints[index].display),
                            NotifyLevel::Info,
                        )
                    }
                    None => Action::Notify(
                        format!("Unknown endpoint: {needle} (add it to config.toml)"),
                        NotifyLevel::Warn,
                    ),
                }
            }
            Command::Sources => {
                self.sidebar_collapsed = false;
                self.focus = Focus::Sidebar;
                Action::Notify(
                    format!(
                        "{} sources, {} distinct IOCs",
                        self.source_counts.len(),
                        self.ioc_suggestions.len()
                    ),
                    NotifyLevel::Info,
                )
            }
            Command::Alerts => {
                crate::modules::intel::alerts::alerts(&self.rows, &self.alert_policy)
            }
            Command::Stats => {
                crate::modules::intel::stats::stats(&self.rows, Local::now().date_naive())
            }
            Command::Copy => match self.selected_advisory() {
                Some(advisory) => {
                    let text = advisory
                        .ioc_text()
                        .unwrap_or_else(|| advisory.title.clone());
                    Action::Copy(text)
                }
                None => Action::Notify("Nothing to copy".to_string(), NotifyLevel::Warn),
            },
            Command::Unknown(input) => {
                Action::Notify(format!("Unknown command: {}", input), NotifyLevel::Warn)
            }
        }
    }

    fn filter_notification(&self) -> Action {
        let count = self.visible_count();
        match self.row_filter.describe() {
            Some(desc) => Action::Notify(
                format!("{} — {} advisories", desc, count),
                NotifyLevel::Info,
            ),
            None => Action::Notify(format!("{} advisories", count), NotifyLevel::Info),
        }
    }

    pub fn apply_action(&mut self, action: Action) {
        match action {
            Action::None => {}
            Action::Copy(text) => {
                self.clipboard = Some(text.clone());
                let shown = if text.chars().count() > 32 {
                    let head: String = text.chars().take(32).collect();
                    format!("{head}…")
                } else {
                    text
                };
                self.set_status(format!("Copied: {shown}"), StatusLevel::Info);
            }
            Action::Notify(msg, level) => {
                let level = match level {
                    NotifyLevel::Info => StatusLevel::Info,
                    NotifyLevel::Warn => StatusLevel::Warn,
                    NotifyLevel::Error => StatusLevel::Error,
                };
                self.set_status(msg, level);
            }
        }
    }

    // --- worker requests --------------------------------------------------

    pub fn request_refresh(&mut self) {
        match self.data_mode {
            DataMode::Sample => {
                let sample = sample_feed();
                self.ingest_advisories(sample);
                self.set_status("Reseeded sample feed", StatusLevel::Info);
            }
            DataMode::Api => {
                self.pending_refresh_request = true;
                self.set_status("Refreshing feed…", StatusLevel::Info);
            }
        }
    }

    pub fn take_refresh_request(&mut self) -> bool {
        if self.pending_refresh_request {
            self.pending_refresh_request = false;
            true
        } else {
            false
        }
    }

    pub fn take_endpoint_switch_request(&mut self) -> Option<usize> {
        self.pending_endpoint_switch.take()
    }

    pub fn cycle_endpoint(&mut self, forward: bool) {
        if self.api_endpoints.len() < 2 {
            self.set_status("Only one endpoint configured", StatusLevel::Warn);
            return;
        }
        let len = self.api_endpoints.len();
        let next = if forward {
            (self.api_endpoint_index + 1) % len
        } else {
            (self.api_endpoint_index + len - 1) % len
        };
        self.api_endpoint_index = next;
        self.pending_endpoint_switch = Some(next);
        self.set_status(
            format!("Switching to {}", self.api_endpoints[next].label),
            StatusLevel::Info,
        );
    }

    // --- status -----------------------------------------------------------

    pub fn set_status(&mut self, text: impl Into<String>, level: StatusLevel) {
        self.status = Some(StatusMessage {
            text: text.into(),
            level,
            since: Instant::now(),
        });
    }

    pub fn status_text(&self) -> Option<(&str, StatusLevel)> {
        self.status
            .as_ref()
            .map(|status| (status.text.as_str(), status.level))
    }

    pub fn on_tick(&mut self) {
        if let Some(status) = self.status.as_ref() {
            if status.since.elapsed() > Duration::from_secs(4) {
                self.status = None;
            }
        }
        let len = self.visible_count();
        if len == 0 {
            self.selected_row = 0;
        } else if self.selected_row >= len {
            self.selected_row = len - 1;
        }
    }
}

fn contains_case_insensitive(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Deterministic feed for `--offline` runs and tests.
pub fn sample_feed() -> Vec<Advisory> {
    let published = |days_ago: i64| {
        (chrono::Utc::now() - chrono::Duration::days(days_ago)).to_rfc3339()
    };
    vec![
        Advisory {
            title: "OpenSSL heap overflow in session handling".to_string(),
            source: "NVD".to_string(),
            description: "Remote attackers can trigger a heap overflow via crafted handshakes."
                .to_string(),
            severity: "CVSS 9.8".to_string(),
            published: published(0),
            iocs: vec!["203.0.113.10".to_string(), "evil-handshake.example".to_string()],
        },
        Advisory {
            title: "Actively exploited path traversal in FileServ".to_string(),
            source: "CISA KEV".to_string(),
            description: "Known exploited vulnerability; patch immediately.".to_string(),
            severity: "CVSS 8.6".to_string(),
            published: published(1),
            iocs: vec!["198.51.100.77".to_string()],
        },
        Advisory {
            title: "Phishing campaign targeting federal agencies".to_string(),
            source: "US-CERT".to_string(),
            description: "Credential harvesting infrastructure observed in the wild.".to_string(),
            severity: "High".to_string(),
            published: published(2),
            iocs: vec![
                "login-secure.example".to_string(),
                "203.0.113.10".to_string(),
            ],
        },
        Advisory {
            title: "SQLi proof of concept for LegacyCMS 2.4".to_string(),
            source: "ExploitDB".to_string(),
            description: "Public exploit code available.".to_string(),
            severity: "CVSS 6.3".to_string(),
            published: published(5),
            iocs: Vec::new(),
        },
        Advisory {
            title: "Weak default credentials in IoT camera firmware".to_string(),
            source: "NVD".to_string(),
            description: "Devices ship with documented default passwords.".to_string(),
            severity: "CVSS 4.4".to_string(),
            published: published(12),
            iocs: Vec::new(),
        },
        Advisory {
            title: "Informational: TLS certificate pinning bypass technique".to_string(),
            source: "US-CERT".to_string(),
            description: String::new(),
            severity: "Unknown".to_string(),
            published: published(25),
            iocs: vec!["pin-bypass.example".to_string()],
        },
    ]
}
