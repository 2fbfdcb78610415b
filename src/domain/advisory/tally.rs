//! Feed aggregation: source counts, IOC suggestions, severity histograms,
//! publication stats

use std::collections::BTreeSet;

use chrono::{DateTime, Days, NaiveDate};

use super::severity::{band_of, severity_score, SeverityBand};
use super::Advisory;

/// Tally advisories per source, ordered by first appearance.
pub fn source_counts(rows: &[Advisory]) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for row in rows {
        match counts.iter_mut().find(|(source, _)| *source == row.source) {
            Some((_, count)) => *count += 1,
            None => counts.push((row.source.clone(), 1)),
        }
    }
    counts
}

/// Distinct trimmed IOC values across all advisories.
pub fn ioc_suggestions(rows: &[Advisory]) -> Vec<String> {
    let set: BTreeSet<String> = rows
        .iter()
        .flat_map(|row| row.iocs.iter())
        .map(|ioc| ioc.trim().to_string())
        .filter(|ioc| !ioc.is_empty())
        .collect();
    set.into_iter().collect()
}

/// Row counts per severity band, aligned with `SeverityBand::ALL`.
pub fn band_counts(rows: &[Advisory]) -> [u64; 5] {
    let mut counts = [0u64; 5];
    for row in rows {
        let band = band_of(&row.severity);
        let idx = SeverityBand::ALL
            .iter()
            .position(|b| *b == band)
            .unwrap_or(SeverityBand::ALL.len() - 1);
        counts[idx] += 1;
    }
    counts
}

/// CVSS score histogram: ten buckets for integer scores 0 through 9+.
/// Only severities carrying a parseable `CVSS <score>` value are binned.
pub fn severity_bins(rows: &[Advisory]) -> [u64; 10] {
    let mut bins = [0u64; 10];
    for row in rows {
        if !row.severity.trim_start().starts_with("CVSS") {
            continue;
        }
        if let Some(score) = severity_score(&row.severity) {
            let idx = (score.max(0.0) as usize).min(9);
            bins[idx] += 1;
        }
    }
    bins
}

/// Parse a published timestamp: RFC 3339 first, RFC 2822 fallback.
pub fn parse_published(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    DateTime::parse_from_rfc3339(trimmed)
        .or_else(|_| DateTime::parse_from_rfc2822(trimmed))
        .ok()
        .map(|dt| dt.date_naive())
}

/// Advisories published per day over the trailing `days` window, oldest
/// first. Feeds the sidebar sparkline.
pub fn publications_per_day(rows: &[Advisory], days: usize, today: NaiveDate) -> Vec<u64> {
    let mut counts = vec![0u64; days];
    for row in rows {
        let Some(date) = parse_published(&row.published) else {
            continue;
        };
        let Ok(age) = usize::try_from((today - date).num_days()) else {
            continue;
        };
        if age < days {
            counts[days - 1 - age] += 1;
        }
    }
    counts
}

/// Publication-window counts for the stats summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedStats {
    pub published_today: usize,
    pub published_7d: usize,
    pub published_30d: usize,
}

impl FeedStats {
    pub fn compute(rows: &[Advisory], today: NaiveDate) -> Self {
        let days_7 = today.checked_sub_days(Days::new(7)).unwrap_or(today);
        let days_30 = today.checked_sub_days(Days::new(30)).unwrap_or(today);

        let mut stats = FeedStats::default();
        for row in rows {
            let Some(date) = parse_published(&row.published) else {
                continue;
            };
            if date == today {
                stats.published_today += 1;
            }
            if date >= days_7 {
                stats.published_7d += 1;
            }
            if date >= days_30 {
                stats.published_30d += 1;
            }
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn advisory(source: &str, iocs: &[&str]) -> Advisory {
        Advisory {
            title: "No title".to_string(),
            source: source.to_string(),
            description: String::new(),
            severity: "Unknown".to_string(),
            published: String::new(),
            iocs: iocs.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_source_counts_first_seen_order() {
        let rows = vec![
            advisory("A", &["1.1.1.1"]),
            advisory("A", &["1.1.1.1", "2.2.2.2"]),
            advisory("B", &[]),
        ];
        let counts = source_counts(&rows);
        assert_eq!(
            counts,
            vec![("A".to_string(), 2), ("B".to_string(), 1)]
        );
    }

    #[test]
    fn test_ioc_suggestions_dedup_and_trim() {
        let rows = vec![
            advisory("A", &["1.1.1.1"]),
            advisory("A", &[" 1.1.1.1", "2.2.2.2 "]),
            advisory("B", &[]),
        ];
        let suggestions = ioc_suggestions(&rows);
        assert_eq!(suggestions, vec!["1.1.1.1".to_string(), "2.2.2.2".to_string()]);
    }

    #[test]
    fn test_ioc_suggestions_skip_blank_entries() {
        let rows = vec![advisory("A", &["  ", ""])];
        assert!(ioc_suggestions(&rows).is_empty());
    }

    #[test]
    fn test_band_counts_alignment() {
        let mut rows = vec![advisory("A", &[]), advisory("B", &[])];
        rows[0].severity = "CVSS 9.8".to_string();
        rows[1].severity = "Low".to_string();
        let counts = band_counts(&rows);
        assert_eq!(counts[0], 1); // Critical
        assert_eq!(counts[3], 1); // Low
        assert_eq!(counts[4], 0); // Unknown
    }

    #[test]
    fn test_severity_bins_requires_cvss_prefix() {
        let mut rows = vec![advisory("A", &[]), advisory("B", &[]), advisory("C", &[])];
        rows[0].severity = "CVSS 8.1".to_string();
        rows[1].severity = "CVSS 0.5".to_string();
        rows[2].severity = "8.1".to_string(); // no prefix: ignored
        let bins = severity_bins(&rows);
        assert_eq!(bins[8], 1);
        assert_eq!(bins[0], 1);
        assert_eq!(bins.iter().sum::<u64>(), 2);
    }

    #[test]
    fn test_parse_published_formats() {
        assert_eq!(
            parse_published("2026-08-01T12:30:00Z"),
            NaiveDate::from_ymd_opt(2026, 8, 1)
        );
        assert_eq!(
            parse_published("Sat, 01 Aug 2026 12:30:00 GMT"),
            NaiveDate::from_ymd_opt(2026, 8, 1)
        );
        assert_eq!(parse_published("not a date"), None);
        assert_eq!(parse_published(""), None);
    }

    #[test]
    fn test_feed_stats_windows() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 6).expect("date");
        let mut rows = vec![
            advisory("A", &[]),
            advisory("A", &[]),
            advisory("A", &[]),
            advisory("A", &[]),
        ];
        rows[0].published = "2026-08-06T01:00:00Z".to_string(); // today
        rows[1].published = "2026-08-02T01:00:00Z".to_string(); // 7d window
        rows[2].published = "2026-07-20T01:00:00Z".to_string(); // 30d window
        rows[3].published = "2026-01-01T01:00:00Z".to_string(); // outside

        let stats = FeedStats::compute(&rows, today);
        assert_eq!(stats.published_today, 1);
        assert_eq!(stats.published_7d, 2);
        assert_eq!(stats.published_30d, 3);
    }

    #[test]
    fn test_publications_per_day_ordering() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 6).expect("date");
        let mut rows = vec![advisory("A", &[]), advisory("A", &[]), advisory("A", &[])];
        rows[0].published = "2026-08-06T01:00:00Z".to_string();
        rows[1].published = "2026-08-05T01:00:00Z".to_string();
        rows[2].published = "2026-08-05T09:00:00Z".to_string();

        let counts = publications_per_day(&rows, 3, today);
        assert_eq!(counts, vec![0, 2, 1]);
    }
}
