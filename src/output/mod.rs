use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use thiserror::Error;

use crate::aggregator::LoginAggregator;
use crate::models::LoginEvent;

/// Errors that can occur while rendering or exporting reports
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Report output format
#[derive(Debug, Clone)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => OutputFormat::Json,
            _ => OutputFormat::Text, // Default
        }
    }
}

/// Per-user summary as emitted by the JSON report
#[derive(Debug, Serialize)]
struct UserSummary<'a> {
    username: &'a str,
    success_count: usize,
    failure_count: usize,
    recent: Vec<&'a LoginEvent>,
}

/// Writes per-user login reports
pub struct ReportWriter<W: Write> {
    format: OutputFormat,
    writer: W,
}

impl<W: Write> ReportWriter<W> {
    pub fn new(format: OutputFormat, writer: W) -> Self {
        ReportWriter { format, writer }
    }

    /// Write the report for every aggregated user, in first-seen
    /// order, with up to `limit` recent entries each.
    pub fn write_report(
        &mut self,
        aggregator: &LoginAggregator,
        limit: usize,
    ) -> Result<(), ReportError> {
        match self.format {
            OutputFormat::Text => self.write_text(aggregator, limit)?,
            OutputFormat::Json => self.write_json(aggregator, limit)?,
        }
        self.writer.flush()?;
        Ok(())
    }

    fn write_text(
        &mut self,
        aggregator: &LoginAggregator,
        limit: usize,
    ) -> Result<(), ReportError> {
        for username in aggregator.all_users() {
            let stats = match aggregator.stats(username) {
                Some(stats) => stats,
                None => continue,
            };

            writeln!(self.writer, "User: {}", username)?;
            writeln!(self.writer, "Successful logins: {}", stats.success_count)?;
            writeln!(self.writer, "Failed logins: {}", stats.failure_count)?;

            let recent = aggregator.recent_history(username, limit);
            if !recent.is_empty() {
                writeln!(self.writer, "Login history (last {}):", limit)?;
                for event in recent {
                    writeln!(self.writer, "  {}", format_history_line(event))?;
                }
            }
            writeln!(self.writer)?;
        }
        Ok(())
    }

    fn write_json(
        &mut self,
        aggregator: &LoginAggregator,
        limit: usize,
    ) -> Result<(), ReportError> {
        let summaries: Vec<UserSummary<'_>> = aggregator
            .all_users()
            .iter()
            .filter_map(|username| {
                aggregator.stats(username).map(|stats| UserSummary {
                    username: username.as_str(),
                    success_count: stats.success_count,
                    failure_count: stats.failure_count,
                    recent: aggregator.recent_history(username, limit),
                })
            })
            .collect();

        let json = serde_json::to_string_pretty(&summaries)?;
        writeln!(self.writer, "{}", json)?;
        Ok(())
    }
}

/// Write the complete history for every user, oldest first, to `path`.
/// Any existing file at that path is overwritten.
pub fn export_full_history(aggregator: &LoginAggregator, path: &Path) -> Result<(), ReportError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_full_history(&mut writer, aggregator)?;
    writer.flush()?;
    Ok(())
}

/// Render the full-history export to any writer
pub fn write_full_history<W: Write>(
    writer: &mut W,
    aggregator: &LoginAggregator,
) -> Result<(), ReportError> {
    for username in aggregator.all_users() {
        let stats = match aggregator.stats(username) {
            Some(stats) => stats,
            None => continue,
        };

        writeln!(writer, "User: {}", username)?;
        writeln!(writer, "Successful logins: {}", stats.success_count)?;
        writeln!(writer, "Failed logins: {}", stats.failure_count)?;

        let history = aggregator.full_history_sorted(username);
        if !history.is_empty() {
            writeln!(writer, "Full login history:")?;
            for event in history {
                writeln!(writer, "  {}", format_history_line(event))?;
            }
        }
        writeln!(writer)?;
    }
    Ok(())
}

/// One rendered history entry: source, port, outcome label, and the
/// timestamp as `MM-DD HH:MM:SS` (log timestamps carry no year)
fn format_history_line(event: &LoginEvent) -> String {
    format!(
        "IP: {}, port: {}, result: {}, time: {}",
        event.source_ip,
        event.port,
        event.outcome.label(),
        event.timestamp.format("%m-%d %H:%M:%S"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Outcome;
    use chrono::NaiveDate;

    fn create_event(user: &str, outcome: Outcome, day: u32, sec: u32) -> LoginEvent {
        LoginEvent {
            username: user.to_string(),
            source_ip: "10.0.0.5".to_string(),
            port: 52344,
            outcome,
            timestamp: NaiveDate::from_ymd_opt(1900, 3, day)
                .unwrap()
                .and_hms_opt(10, 22, sec)
                .unwrap(),
        }
    }

    fn sample_aggregator() -> LoginAggregator {
        let mut aggregator = LoginAggregator::new();
        aggregator.record(create_event("alice", Outcome::Success, 5, 1));
        aggregator.record(create_event("alice", Outcome::Failure, 5, 30));
        aggregator.record(create_event("bob", Outcome::Failure, 6, 0));
        aggregator
    }

    #[test]
    fn test_text_report_shape() {
        let aggregator = sample_aggregator();
        let mut buf = Vec::new();
        ReportWriter::new(OutputFormat::Text, &mut buf)
            .write_report(&aggregator, 10)
            .unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("User: alice"));
        assert!(text.contains("Successful logins: 1"));
        assert!(text.contains("Failed logins: 1"));
        assert!(text.contains("time: 03-05 10:22:01"));
        assert!(text.contains("result: ❗failed"));
        // alice was seen first, so her block comes first
        assert!(text.find("alice").unwrap() < text.find("bob").unwrap());
    }

    #[test]
    fn test_text_report_recent_first() {
        let aggregator = sample_aggregator();
        let mut buf = Vec::new();
        ReportWriter::new(OutputFormat::Text, &mut buf)
            .write_report(&aggregator, 10)
            .unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert!(text.find("10:22:30").unwrap() < text.find("10:22:01").unwrap());
    }

    #[test]
    fn test_json_report_parses() {
        let aggregator = sample_aggregator();
        let mut buf = Vec::new();
        ReportWriter::new(OutputFormat::Json, &mut buf)
            .write_report(&aggregator, 10)
            .unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        let users = value.as_array().unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0]["username"], "alice");
        assert_eq!(users[0]["success_count"], 1);
        assert_eq!(users[0]["recent"].as_array().unwrap().len(), 2);
        assert_eq!(users[1]["username"], "bob");
        assert_eq!(users[1]["failure_count"], 1);
    }

    #[test]
    fn test_empty_aggregator_produces_empty_report() {
        let aggregator = LoginAggregator::new();
        let mut buf = Vec::new();
        ReportWriter::new(OutputFormat::Text, &mut buf)
            .write_report(&aggregator, 10)
            .unwrap();
        assert!(buf.is_empty());
    }

    #[test]
    fn test_export_overwrites_and_sorts_ascending() {
        let aggregator = sample_aggregator();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.txt");
        std::fs::write(&path, "stale contents\n").unwrap();

        export_full_history(&aggregator, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(!text.contains("stale contents"));
        assert!(text.contains("Full login history:"));
        // full export is oldest-first, the reverse of the report
        assert!(text.find("10:22:01").unwrap() < text.find("10:22:30").unwrap());
    }

    #[test]
    fn test_format_from_str() {
        assert!(matches!(OutputFormat::from_str("json"), OutputFormat::Json));
        assert!(matches!(OutputFormat::from_str("JSON"), OutputFormat::Json));
        assert!(matches!(OutputFormat::from_str("text"), OutputFormat::Text));
        assert!(matches!(OutputFormat::from_str("bogus"), OutputFormat::Text));
    }
}
