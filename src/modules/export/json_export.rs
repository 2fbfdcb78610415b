//! JSON Export

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::advisory::Advisory;

/// Write the advisory feed to a pretty-printed JSON file
pub fn write_feed(path: &Path, rows: &[Advisory]) -> Result<usize, Box<dyn std::error::Error>> {
    let json = serde_json::to_string_pretty(rows)?;

    let mut file = File::create(path)?;
    file.write_all(json.as_bytes())?;

    Ok(rows.len())
}
