use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Outcome of an SSH authentication attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Success,
    Failure,
}

impl Outcome {
    /// Label shown in reports; failed attempts carry a visual marker
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Success => "success",
            Outcome::Failure => "❗failed",
        }
    }
}

/// One SSH login event extracted from a single auth log line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginEvent {
    pub username: String,
    pub source_ip: String,
    pub port: u16,
    pub outcome: Outcome,
    /// Syslog timestamps carry no year; parsed with a placeholder year
    pub timestamp: NaiveDateTime,
}
