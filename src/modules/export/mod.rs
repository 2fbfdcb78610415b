//! Export Module
//!
//! Writes the advisory feed to CSV or JSON files.
//!
//! - 'e' key or :export triggers an export of the full feed
//! - Files saved under the platform data dir, exports/

mod csv_export;
mod json_export;

use std::fs;
use std::path::PathBuf;

use chrono::Local;
use directories::ProjectDirs;

use crate::core::{Action, ExportFormat, NotifyLevel};
use crate::domain::advisory::Advisory;

/// Get the export directory path, creating it if needed
fn get_export_dir() -> std::io::Result<PathBuf> {
    let export_dir = ProjectDirs::from("io", "vigil", "vigil")
        .map(|dirs| dirs.data_dir().join("exports"))
        .unwrap_or_else(|| PathBuf::from(".vigil").join("exports"));
    fs::create_dir_all(&export_dir)?;
    Ok(export_dir)
}

/// Generate a timestamped filename
fn generate_filename(prefix: &str, extension: &str) -> String {
    let timestamp = Local::now().format("%Y-%m-%d-%H%M%S");
    format!("{}-{}.{}", prefix, timestamp, extension)
}

/// Export the full feed in the requested format
pub fn export_feed(rows: &[Advisory], format: ExportFormat) -> Action {
    if rows.is_empty() {
        return Action::Notify("No advisories to export".to_string(), NotifyLevel::Warn);
    }

    let export_dir = match get_export_dir() {
        Ok(dir) => dir,
        Err(e) => {
            return Action::Notify(
                format!("Failed to create export directory: {}", e),
                NotifyLevel::Error,
            )
        }
    };

    let (filename, written) = match format {
        ExportFormat::Csv => {
            let filename = generate_filename("advisories", "csv");
            let path = export_dir.join(&filename);
            (filename, csv_export::write_feed(&path, rows))
        }
        ExportFormat::Json => {
            let filename = generate_filename("advisories", "json");
            let path = export_dir.join(&filename);
            (filename, json_export::write_feed(&path, rows))
        }
    };

    match written {
        Ok(count) => Action::Notify(
            format!("Exported {} advisories to {}", count, filename),
            NotifyLevel::Info,
        ),
        Err(e) => Action::Notify(format!("Export failed: {}", e), NotifyLevel::Error),
    }
}
