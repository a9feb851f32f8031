//! Console rendering of results and history.

use fwcheck_core::CheckResult;
use fwcheck_engine::ResultSink;

/// Print one result prominently (manual check output).
pub fn print_result(result: &CheckResult, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
        return Ok(());
    }

    println!("Result : {}", result.verdict);
    println!("Input  : {}", result.input_version);
    println!("Popup  : {}", result.popup_version.as_deref().unwrap_or("-"));
    println!("Message: {}", result.message);
    println!("Time   : {}", result.timestamp);
    Ok(())
}

/// Print history rows as a table (or JSON), newest first.
pub fn print_history(rows: &[CheckResult], json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(rows)?);
        return Ok(());
    }

    println!(
        "{:<4} {:<16} {:<16} {:<10} {:<52} {}",
        "No", "Input", "Popup", "Result", "Message", "Time"
    );
    for (i, row) in rows.iter().enumerate() {
        println!(
            "{:<4} {:<16} {:<16} {:<10} {:<52} {}",
            i + 1,
            row.input_version,
            row.popup_version.as_deref().unwrap_or(""),
            row.verdict.as_str(),
            row.message,
            row.timestamp
        );
    }
    Ok(())
}

/// Sink printing each automatic result as one line.
pub struct ConsoleSink {
    json: bool,
}

impl ConsoleSink {
    /// Create a console sink.
    pub fn new(json: bool) -> Self {
        Self { json }
    }
}

impl ResultSink for ConsoleSink {
    fn publish(&self, result: &CheckResult, _modal: bool) {
        if self.json {
            if let Ok(line) = serde_json::to_string(result) {
                println!("{line}");
            }
            return;
        }

        println!(
            "[{}] {:<10} input={} popup={} - {}",
            result.timestamp,
            result.verdict.as_str(),
            result.input_version,
            result.popup_version.as_deref().unwrap_or("-"),
            result.message
        );
    }
}
