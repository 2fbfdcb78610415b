//! Publication statistics summary

use chrono::NaiveDate;

use super::{IntelResult, IntelStatus};
use crate::core::Action;
use crate::domain::advisory::{severity_bins, Advisory, FeedStats};
use crate::ui::widgets::sparkline::sparkline_text;

/// Summarize publication windows and the CVSS score distribution.
pub fn stats(rows: &[Advisory], today: NaiveDate) -> Action {
    let stats = FeedStats::compute(rows, today);

    let mut result = IntelResult::new("Stats")
        .add("today", stats.published_today.to_string(), IntelStatus::Ok)
        .add("7d", stats.published_7d.to_string(), IntelStatus::Ok)
        .add("30d", stats.published_30d.to_string(), IntelStatus::Ok);

    let bins = severity_bins(rows);
    if bins.iter().any(|count| *count > 0) {
        result = result.add("cvss 0-9", sparkline_text(&bins, 10), IntelStatus::Ok);
    }

    result.into_action()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Action;

    #[test]
    fn test_stats_summary_mentions_windows() {
        let rows = vec![Advisory {
            title: "No title".to_string(),
            source: "NVD".to_string(),
            description: String::new(),
            severity: "CVSS 8.0".to_string(),
            published: "2026-08-06T00:00:00Z".to_string(),
            iocs: Vec::new(),
        }];
        let today = NaiveDate::from_ymd_opt(2026, 8, 6).expect("date");
        let Action::Notify(message, _) = stats(&rows, today) else {
            panic!("stats should notify");
        };
        assert!(message.contains("today: 1"));
        assert!(message.contains("30d: 1"));
        assert!(message.contains("cvss 0-9"));
    }
}
