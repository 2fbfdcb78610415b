//! Alert rules over the advisory feed
//!
//! An advisory alerts when its numeric severity clears the threshold or
//! when it comes from an escalation source.

use super::{IntelResult, IntelStatus};
use crate::config::Config;
use crate::core::Action;
use crate::domain::advisory::{severity_score, Advisory};

#[derive(Clone, Debug)]
pub struct AlertPolicy {
    pub threshold: f64,
    pub trusted_sources: Vec<String>,
}

impl Default for AlertPolicy {
    fn default() -> Self {
        Self {
            threshold: 7.0,
            trusted_sources: vec!["CISA KEV".to_string(), "US-CERT".to_string()],
        }
    }
}

impl AlertPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            threshold: config.alert_threshold,
            trusted_sources: config.trusted_sources.clone(),
        }
    }

    pub fn is_alerting(&self, advisory: &Advisory) -> bool {
        if severity_score(&advisory.severity).unwrap_or(0.0) >= self.threshold {
            return true;
        }
        self.trusted_sources
            .iter()
            .any(|source| *source == advisory.source)
    }

    pub fn active<'a>(&self, rows: &'a [Advisory]) -> Vec<&'a Advisory> {
        rows.iter().filter(|row| self.is_alerting(row)).collect()
    }
}

/// Summarize active alerts on the status line
pub fn alerts(rows: &[Advisory], policy: &AlertPolicy) -> Action {
    let active = policy.active(rows);

    let mut result = IntelResult::new("Alerts");

    if active.is_empty() {
        result = result.add("status", "All clear", IntelStatus::Ok);
    } else {
        result = result.add("count", active.len().to_string(), IntelStatus::Warning);
        for (i, advisory) in active.iter().take(3).enumerate() {
            result = result.add(
                format!("alert{}", i + 1),
                format!("{} ({})", advisory.title, advisory.source),
                IntelStatus::Warning,
            );
        }
    }

    result.into_action()
}
