//! Feed intelligence summaries (alerts, publication stats)

pub mod alerts;
pub mod stats;

pub use alerts::AlertPolicy;

use crate::core::{Action, NotifyLevel};

/// Result of an intel summary
pub struct IntelResult {
    pub title: String,
    pub items: Vec<IntelItem>,
}

pub struct IntelItem {
    pub label: String,
    pub value: String,
    pub status: IntelStatus,
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum IntelStatus {
    Ok,
    Warning,
    Error,
}

impl IntelResult {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            items: Vec::new(),
        }
    }

    pub fn add(
        mut self,
        label: impl Into<String>,
        value: impl Into<String>,
        status: IntelStatus,
    ) -> Self {
        self.items.push(IntelItem {
            label: label.into(),
            value: value.into(),
            status,
        });
        self
    }

    pub fn into_action(self) -> Action {
        let msg = self
            .items
            .iter()
            .map(|item| {
                let icon = match item.status {
                    IntelStatus::Ok => "●",
                    IntelStatus::Warning => "◐",
                    IntelStatus::Error => "○",
                };
                format!("{} {}: {}", icon, item.label, item.value)
            })
            .collect::<Vec<_>>()
            .join(" | ");
        Action::Notify(format!("{} - {}", self.title, msg), NotifyLevel::Info)
    }
}
