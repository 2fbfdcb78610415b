//! Filtering behavior over the real application state

use vigil::app::{App, RowFilter};
use vigil::config::Config;
use vigil::domain::advisory::Advisory;

fn advisory(title: &str, source: &str, severity: &str, iocs: &[&str]) -> Advisory {
    Advisory {
        title: title.to_string(),
        source: source.to_string(),
        description: format!("{title} description"),
        severity: severity.to_string(),
        published: String::new(),
        iocs: iocs.iter().map(|s| s.to_string()).collect(),
    }
}

fn app_with_feed() -> App {
    let mut app = App::new(&Config::default());
    app.ingest_advisories(vec![
        advisory("OpenSSL heap overflow", "NVD", "CVSS 9.8", &["203.0.113.10"]),
        advisory("Path traversal exploited", "CISA KEV", "High", &["198.51.100.77"]),
        advisory("Phishing campaign", "US-CERT", "Medium", &[]),
    ]);
    app
}

#[test]
fn test_text_filter_is_case_insensitive_substring() {
    let mut app = app_with_feed();

    app.set_filter(RowFilter::Text("openssl".to_string()));
    let visible = app.visible_indices();
    assert_eq!(visible, vec![0]);

    // Every visible row contains the query; every hidden row does not.
    for (idx, row) in app.rows.iter().enumerate() {
        let matches = row.search_text().contains("openssl");
        assert_eq!(visible.contains(&idx), matches);
    }
}

#[test]
fn test_empty_text_query_matches_all() {
    let mut app = app_with_feed();
    app.set_filter(RowFilter::Text(String::new()));
    assert_eq!(app.visible_count(), app.rows.len());
}

#[test]
fn test_displayed_count_tracks_visible_rows() {
    let mut app = app_with_feed();
    assert_eq!(app.visible_count(), 3);

    app.set_filter(RowFilter::Text("phishing".to_string()));
    assert_eq!(app.visible_count(), 1);

    // The chart filter updates the same derived count, never the fetched
    // total.
    app.set_filter(RowFilter::Severity("High".to_string()));
    assert_eq!(app.visible_count(), 1);

    app.clear_filter();
    assert_eq!(app.visible_count(), 3);
}

#[test]
fn test_ioc_filter_matches_ioc_values_or_row_text() {
    let mut app = app_with_feed();

    // Matches via the IOC list
    app.set_filter(RowFilter::Ioc("198.51".to_string()));
    assert_eq!(app.visible_indices(), vec![1]);

    // Matches via the row text even when no IOC matches
    app.set_filter(RowFilter::Ioc("phishing".to_string()));
    assert_eq!(app.visible_indices(), vec![2]);
}

#[test]
fn test_filters_replace_rather_than_compose() {
    let mut app = app_with_feed();

    app.set_filter(RowFilter::Text("phishing".to_string()));
    assert_eq!(app.visible_indices(), vec![2]);

    // The IOC filter does not respect rows hidden by the text filter; its
    // own predicate alone decides visibility.
    app.set_filter(RowFilter::Ioc("203.0.113.10".to_string()));
    assert_eq!(app.visible_indices(), vec![0]);
}

#[test]
fn test_severity_filter_is_substring_match() {
    let mut app = app_with_feed();

    app.set_filter(RowFilter::Severity("High".to_string()));
    // "High" matches the textual severity; "CVSS 9.8" and "Medium" do not.
    assert_eq!(app.visible_indices(), vec![1]);
}

#[test]
fn test_source_filter_is_exact() {
    let mut app = app_with_feed();

    app.set_filter(RowFilter::Source("NVD".to_string()));
    assert_eq!(app.visible_indices(), vec![0]);

    app.set_filter(RowFilter::Source("nvd".to_string()));
    assert!(app.visible_indices().is_empty());
}

#[test]
fn test_filter_resets_selection() {
    let mut app = app_with_feed();
    app.selected_row = 2;
    app.set_filter(RowFilter::Text("phishing".to_string()));
    assert_eq!(app.selected_row, 0);
}

#[test]
fn test_live_prompt_applies_per_keystroke() {
    use vigil::app::PromptKind;

    let mut app = app_with_feed();
    app.enter_prompt(PromptKind::Search);
    assert_eq!(app.visible_count(), 3);

    for ch in "open".chars() {
        app.command.input.push(ch);
        app.apply_prompt_input(PromptKind::Search);
    }
    assert_eq!(app.visible_indices(), vec![0]);

    // Leaving the prompt keeps the filter in force.
    app.exit_prompt();
    assert_eq!(app.row_filter, RowFilter::Text("open".to_string()));
}
