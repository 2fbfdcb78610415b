//! Click classification, sidebar rules, modal, and loader flows over the
//! real application state

use vigil::app::{sample_feed, sidebar_after_click, App, ClickTarget, RowFilter};
use vigil::config::Config;
use vigil::domain::advisory::Advisory;

fn advisory(source: &str, severity: &str, iocs: &[&str]) -> Advisory {
    Advisory {
        title: "No title".to_string(),
        source: source.to_string(),
        description: String::new(),
        severity: severity.to_string(),
        published: String::new(),
        iocs: iocs.iter().map(|s| s.to_string()).collect(),
    }
}

#[test]
fn test_ingest_builds_sidebar_tallies() {
    let mut app = App::new(&Config::default());
    app.ingest_advisories(vec![
        advisory("A", "Unknown", &["1.1.1.1"]),
        advisory("A", "Unknown", &["1.1.1.1", "2.2.2.2"]),
        advisory("B", "Unknown", &[]),
    ]);

    assert_eq!(
        app.source_counts,
        vec![("A".to_string(), 2), ("B".to_string(), 1)]
    );
    assert_eq!(
        app.ioc_suggestions,
        vec!["1.1.1.1".to_string(), "2.2.2.2".to_string()]
    );
    // Freshly loaded feed shows the full fetched length.
    assert_eq!(app.visible_count(), 3);
}

#[test]
fn test_fetch_error_leaves_sidebar_empty() {
    let mut app = App::new(&Config::default());
    app.apply_fetch_error("Fetch failed: connection refused".to_string());

    assert!(app.source_counts.is_empty());
    assert!(app.ioc_suggestions.is_empty());
    assert_eq!(app.visible_count(), 0);
    assert!(app.last_fetch_error.is_some());
}

#[test]
fn test_sidebar_toggle_flips_once_per_activation() {
    let mut app = App::new(&Config::default());
    assert!(!app.sidebar_collapsed);

    app.apply_click(ClickTarget::SidebarToggle);
    assert!(app.sidebar_collapsed);

    app.apply_click(ClickTarget::SidebarToggle);
    assert!(!app.sidebar_collapsed);
}

#[test]
fn test_outside_click_collapses_only_when_expanded() {
    // Expanded + outside click = collapsed
    assert!(sidebar_after_click(&ClickTarget::Outside, false));
    // Already collapsed stays collapsed (no flip-flop)
    assert!(sidebar_after_click(&ClickTarget::Outside, true));
    // Clicks inside the sidebar never collapse it
    assert!(!sidebar_after_click(&ClickTarget::SidebarBody, false));
    assert!(sidebar_after_click(&ClickTarget::SidebarBody, true));
}

#[test]
fn test_source_click_always_expands() {
    let mut app = App::new(&Config::default());
    app.ingest_advisories(vec![advisory("CISA KEV", "Unknown", &[])]);
    app.sidebar_collapsed = true;

    app.apply_click(ClickTarget::SidebarSource(0));
    assert!(!app.sidebar_collapsed);
    assert_eq!(app.row_filter, RowFilter::Source("CISA KEV".to_string()));
    assert_eq!(app.selected_source, Some(0));
}

#[test]
fn test_feed_row_click_opens_populated_modal() {
    let mut app = App::new(&Config::default());
    app.ingest_advisories(vec![
        advisory("NVD", "CVSS 9.8", &["203.0.113.10"]),
        advisory("US-CERT", "High", &[]),
    ]);

    app.apply_click(ClickTarget::FeedRow(1));
    let detail = app.detail_advisory().expect("modal advisory");
    assert_eq!(detail.source, "US-CERT");
    assert_eq!(detail.ioc_line(), "IOCs: none");
    // A row click is outside the sidebar, so an expanded sidebar collapses.
    assert!(app.sidebar_collapsed);

    app.close_detail();
    assert!(app.detail_advisory().is_none());
}

#[test]
fn test_modal_ioc_line_joins_values() {
    let row = advisory("NVD", "CVSS 9.8", &["203.0.113.10", " evil.example "]);
    assert_eq!(row.ioc_line(), "IOCs: 203.0.113.10, evil.example");
}

#[test]
fn test_chart_click_filters_by_band_label() {
    let mut app = App::new(&Config::default());
    app.ingest_advisories(vec![
        advisory("NVD", "High", &[]),
        advisory("NVD", "Medium", &[]),
    ]);

    // Bar index 1 is the High band.
    app.apply_click(ClickTarget::ChartBar(1));
    assert_eq!(app.row_filter, RowFilter::Severity("High".to_string()));
    assert_eq!(app.visible_indices(), vec![0]);
    assert_eq!(app.visible_count(), 1);
}

#[test]
fn test_chart_reclick_replaces_severity_filter() {
    let mut app = App::new(&Config::default());
    app.ingest_advisories(vec![
        advisory("NVD", "High", &[]),
        advisory("NVD", "Medium", &[]),
    ]);

    app.apply_click(ClickTarget::ChartBar(1));
    assert_eq!(app.visible_indices(), vec![0]);

    // Clicking another bar restores the rows the first click hid.
    app.apply_click(ClickTarget::ChartBar(2));
    assert_eq!(app.visible_indices(), vec![1]);

    app.clear_filter();
    assert_eq!(app.visible_count(), 2);
}

#[test]
fn test_ioc_suggestion_click_applies_ioc_filter() {
    let mut app = App::new(&Config::default());
    app.ingest_advisories(vec![
        advisory("NVD", "Unknown", &["1.1.1.1"]),
        advisory("NVD", "Unknown", &["2.2.2.2"]),
    ]);

    app.apply_click(ClickTarget::SidebarIoc(0));
    assert_eq!(app.row_filter, RowFilter::Ioc("1.1.1.1".to_string()));
    assert_eq!(app.visible_indices(), vec![0]);
    // Suggestion clicks land inside the sidebar: no collapse.
    assert!(!app.sidebar_collapsed);
}

#[test]
fn test_command_line_round_trip() {
    let mut app = App::new(&Config::default());
    app.ingest_advisories(sample_feed());

    app.enter_command();
    for ch in "sev High".chars() {
        app.command.input.push(ch);
    }
    app.apply_command();

    assert_eq!(app.row_filter, RowFilter::Severity("High".to_string()));
    assert!(app.status_text().is_some());
    assert_eq!(app.command.last.as_deref(), Some("sev High"));
}

#[test]
fn test_unknown_command_warns() {
    use vigil::app::StatusLevel;

    let mut app = App::new(&Config::default());
    app.enter_command();
    app.command.input.push_str("bogus");
    app.apply_command();

    let (text, level) = app.status_text().expect("status message");
    assert!(text.contains("Unknown command"));
    assert_eq!(level, StatusLevel::Warn);
}

#[test]
fn test_sample_feed_alerts() {
    let app = {
        let mut app = App::new(&Config::default());
        app.ingest_advisories(sample_feed());
        app
    };
    // Two CVSS >= 7.0 rows plus the trusted-source rows.
    assert!(app.alert_count() >= 3);
}

#[test]
fn test_selection_clamps_after_filter_shrinks_feed() {
    let mut app = App::new(&Config::default());
    app.ingest_advisories(sample_feed());
    app.selected_row = app.visible_count() - 1;

    app.set_filter(RowFilter::Source("ExploitDB".to_string()));
    app.on_tick();
    assert!(app.selected_row < app.visible_count().max(1));
}
