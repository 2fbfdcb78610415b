//! Advisory domain model and feed aggregation

mod severity;
mod tally;

pub use severity::{band_of, severity_score, SeverityBand};
pub use tally::{
    band_counts, ioc_suggestions, parse_published, publications_per_day, severity_bins,
    source_counts, FeedStats,
};

use serde::{Deserialize, Serialize};

/// One advisory record as returned by the feed API.
///
/// Every field is optional on the wire; defaults mirror the backend's
/// normalization so a sparse record still renders as a complete row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Advisory {
    #[serde(default = "default_title")]
    pub title: String,

    #[serde(default = "default_source")]
    pub source: String,

    #[serde(default)]
    pub description: String,

    #[serde(default = "default_severity")]
    pub severity: String,

    #[serde(default)]
    pub published: String,

    #[serde(default)]
    pub iocs: Vec<String>,
}

fn default_title() -> String {
    "No title".to_string()
}

fn default_source() -> String {
    "Unknown".to_string()
}

fn default_severity() -> String {
    "Unknown".to_string()
}

impl Advisory {
    /// Joined, trimmed IOC list, or None when the advisory carries no IOCs.
    pub fn ioc_text(&self) -> Option<String> {
        let iocs: Vec<&str> = self
            .iocs
            .iter()
            .map(|ioc| ioc.trim())
            .filter(|ioc| !ioc.is_empty())
            .collect();
        if iocs.is_empty() {
            None
        } else {
            Some(iocs.join(", "))
        }
    }

    /// The detail-modal IOC line: joined IOCs, or the literal "none".
    pub fn ioc_line(&self) -> String {
        match self.ioc_text() {
            Some(iocs) => format!("IOCs: {}", iocs),
            None => "IOCs: none".to_string(),
        }
    }

    /// Lower-cased concatenation of everything a rendered row would show.
    ///
    /// This is the haystack for the free-text filter; a row matches a query
    /// iff this text contains it.
    pub fn search_text(&self) -> String {
        let mut text = String::with_capacity(
            self.title.len() + self.source.len() + self.description.len() + 32,
        );
        for part in [
            self.title.as_str(),
            self.source.as_str(),
            self.description.as_str(),
            self.severity.as_str(),
            self.published.as_str(),
        ] {
            text.push_str(part);
            text.push(' ');
        }
        for ioc in &self.iocs {
            text.push_str(ioc);
            text.push(' ');
        }
        text.to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let advisory: Advisory = serde_json::from_str("{}").expect("empty object");
        assert_eq!(advisory.title, "No title");
        assert_eq!(advisory.source, "Unknown");
        assert_eq!(advisory.description, "");
        assert_eq!(advisory.severity, "Unknown");
        assert_eq!(advisory.published, "");
        assert!(advisory.iocs.is_empty());
    }

    #[test]
    fn test_ioc_text_trims_and_joins() {
        let advisory: Advisory = serde_json::from_str(
            r#"{"source":"NVD","iocs":[" 1.1.1.1 ","evil.example","  "]}"#,
        )
        .expect("advisory");
        assert_eq!(advisory.ioc_text().as_deref(), Some("1.1.1.1, evil.example"));
    }

    #[test]
    fn test_ioc_text_none_when_absent() {
        let advisory: Advisory = serde_json::from_str(r#"{"source":"NVD"}"#).expect("advisory");
        assert_eq!(advisory.ioc_text(), None);
    }

    #[test]
    fn test_search_text_covers_all_rendered_fields() {
        let advisory = Advisory {
            title: "OpenSSL RCE".to_string(),
            source: "CISA KEV".to_string(),
            description: "Remote code execution".to_string(),
            severity: "CVSS 9.8".to_string(),
            published: "2026-07-01T00:00:00Z".to_string(),
            iocs: vec!["10.0.0.7".to_string()],
        };
        let text = advisory.search_text();
        assert!(text.contains("openssl rce"));
        assert!(text.contains("cisa kev"));
        assert!(text.contains("cvss 9.8"));
        assert!(text.contains("10.0.0.7"));
    }
}
