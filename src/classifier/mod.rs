//! SSH authentication line classification
//!
//! Turns raw auth log lines into [`LoginEvent`]s. Anything that is not
//! a publickey success or password failure record classifies to `None`;
//! unrelated sshd chatter is expected and not an error.

use chrono::NaiveDateTime;
use regex::{Captures, Regex};

use crate::models::{LoginEvent, Outcome};

/// Marker every sshd-originated syslog line carries; checked before
/// the regexes run so non-SSH lines cost almost nothing.
const SSHD_MARKER: &str = "sshd";

/// Syslog timestamps have no year field. Parsing fills in this fixed
/// placeholder, so histories that span a calendar-year rollover sort
/// incorrectly against each other; callers must not read an absolute
/// year out of event timestamps.
const PLACEHOLDER_YEAR: i32 = 1900;

/// Classifies auth log lines into login events
pub struct LineClassifier {
    success: Regex,
    failure: Regex,
}

impl LineClassifier {
    pub fn new() -> Self {
        LineClassifier {
            success: Regex::new(
                r"(\w{3}\s+\d{1,2} \d{2}:\d{2}:\d{2}) .+? Accepted publickey for (.+) from (.+) port (\d+)",
            )
            .expect("success pattern"),
            failure: Regex::new(
                r"(\w{3}\s+\d{1,2} \d{2}:\d{2}:\d{2}) .+? Failed password for (.+) from (.+) port (\d+)",
            )
            .expect("failure pattern"),
        }
    }

    /// Classify one raw log line.
    ///
    /// Returns the extracted event, or `None` for lines without the
    /// sshd marker, lines matching neither pattern, and matched lines
    /// whose captured fields do not parse (all skipped silently).
    pub fn classify(&self, line: &str) -> Option<LoginEvent> {
        if !line.contains(SSHD_MARKER) {
            return None;
        }

        if let Some(caps) = self.success.captures(line) {
            return Self::build_event(&caps, Outcome::Success);
        }
        if let Some(caps) = self.failure.captures(line) {
            return Self::build_event(&caps, Outcome::Failure);
        }
        None
    }

    fn build_event(caps: &Captures<'_>, outcome: Outcome) -> Option<LoginEvent> {
        let timestamp = parse_syslog_timestamp(caps.get(1)?.as_str())?;
        let username = caps.get(2)?.as_str().to_string();
        let source_ip = caps.get(3)?.as_str().to_string();
        let port: u16 = caps.get(4)?.as_str().parse().ok()?;

        Some(LoginEvent {
            username,
            source_ip,
            port,
            outcome,
            timestamp,
        })
    }
}

impl Default for LineClassifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a `Mon DD HH:MM:SS` syslog timestamp (day may be space-padded)
fn parse_syslog_timestamp(text: &str) -> Option<NaiveDateTime> {
    let with_year = format!("{} {}", PLACEHOLDER_YEAR, text);
    NaiveDateTime::parse_from_str(&with_year, "%Y %b %d %H:%M:%S").ok()
}
