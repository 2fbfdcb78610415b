//! CSV Export
//!
//! Column set matches the backend's own CSV download: IOCs are
//! semicolon-joined and description newlines flatten to spaces.

use std::path::Path;

use crate::domain::advisory::Advisory;

/// Write the advisory feed to a CSV file
pub fn write_feed(path: &Path, rows: &[Advisory]) -> Result<usize, Box<dyn std::error::Error>> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "source",
        "title",
        "severity",
        "published",
        "description",
        "iocs",
    ])?;

    for row in rows {
        wtr.write_record([
            row.source.clone(),
            row.title.clone(),
            row.severity.clone(),
            row.published.clone(),
            row.description.replace('\n', " "),
            row.iocs.join(";"),
        ])?;
    }

    wtr.flush()?;
    Ok(rows.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_columns_and_ioc_join() {
        let rows = vec![Advisory {
            title: "OpenSSL RCE".to_string(),
            source: "NVD".to_string(),
            description: "line one\nline two".to_string(),
            severity: "CVSS 9.8".to_string(),
            published: "2026-08-01T00:00:00Z".to_string(),
            iocs: vec!["1.1.1.1".to_string(), "evil.example".to_string()],
        }];

        let dir = std::env::temp_dir().join("vigil-csv-test");
        std::fs::create_dir_all(&dir).expect("temp dir");
        let path = dir.join("feed.csv");
        let count = write_feed(&path, &rows).expect("write");
        assert_eq!(count, 1);

        let content = std::fs::read_to_string(&path).expect("read back");
        let mut lines = content.lines();
        assert_eq!(
            lines.next(),
            Some("source,title,severity,published,description,iocs")
        );
        let row = lines.next().expect("data row");
        assert!(row.contains("1.1.1.1;evil.example"));
        assert!(row.contains("line one line two"));
    }
}
