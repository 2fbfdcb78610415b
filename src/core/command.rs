//! Command parser for the : command system

/// Export output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

/// Parsed command from user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    // Filtering
    Filter(Option<String>),
    Ioc(Option<String>),
    Severity(String),
    Source(String),
    Clear,

    // Feed data
    Refresh,
    Export(ExportFormat),
    Connect(String),

    // Summaries
    Sources,
    Alerts,
    Stats,
    Copy,

    // Unknown command
    Unknown(String),
}

/// Parse a command string (without the leading :)
pub fn parse_command(input: &str) -> Command {
    let input = input.trim();
    let mut parts = input.splitn(2, ' ');
    let cmd = parts.next().unwrap_or("");
    let args = parts.next().map(|s| s.trim().to_string());

    match cmd.to_lowercase().as_str() {
        // Filtering
        "filter" | "f" | "search" => Command::Filter(args),
        "ioc" => Command::Ioc(args),
        "sev" | "severity" => {
            if let Some(label) = args {
                Command::Severity(label)
            } else {
                Command::Unknown(input.to_string())
            }
        }
        "source" | "src" => {
            if let Some(name) = args {
                Command::Source(name)
            } else {
                Command::Unknown(input.to_string())
            }
        }
        "clear" | "reset" => Command::Clear,

        // Feed data
        "refresh" => Command::Refresh,
        "export" => match args.as_deref() {
            None | Some("csv") => Command::Export(ExportFormat::Csv),
            Some("json") => Command::Export(ExportFormat::Json),
            Some(_) => Command::Unknown(input.to_string()),
        },
        "connect" | "conn" => {
            if let Some(url) = args {
                Command::Connect(url)
            } else {
                Command::Unknown(input.to_string())
            }
        }

        // Summaries
        "sources" => Command::Sources,
        "alerts" => Command::Alerts,
        "stats" => Command::Stats,
        "copy" | "yank" => Command::Copy,

        _ => Command::Unknown(input.to_string()),
    }
}
