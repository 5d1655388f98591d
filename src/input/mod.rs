//! Log source discovery and ingestion
//!
//! Supplies raw auth log lines to the classifier. One file is open at
//! a time; bytes are decoded permissively so a corrupt line never
//! aborts a run, and an unreadable file is warned about and skipped.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::aggregator::LoginAggregator;
use crate::classifier::LineClassifier;

/// Errors raised while reading a single log source
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("cannot open {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("read failed on {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Discover log files in `dir` whose names start with `prefix`,
/// sorted by file name descending (the auth.log rotation convention).
///
/// An unreadable directory yields an empty list with a warning, the
/// same recovery as an unreadable file during ingestion.
pub fn discover_log_files(dir: &Path, prefix: &str) -> Vec<PathBuf> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            log::warn!("cannot list log directory {}: {}", dir.display(), e);
            return Vec::new();
        }
    };

    let mut paths: Vec<PathBuf> = entries
        .flatten()
        .filter(|entry| {
            entry
                .file_name()
                .to_str()
                .map(|name| name.starts_with(prefix))
                .unwrap_or(false)
        })
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();

    paths.sort_by(|a, b| b.cmp(a));
    paths
}

/// Read one file as permissively-decoded lines.
///
/// Invalid UTF-8 byte sequences are replaced rather than failing the
/// read, so a single corrupt line cannot take down a whole source.
pub fn read_lines(path: &Path) -> Result<Vec<String>, SourceError> {
    let file = File::open(path).map_err(|source| SourceError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = BufReader::new(file);

    let mut lines = Vec::new();
    let mut buf = Vec::new();
    loop {
        buf.clear();
        let bytes_read = reader
            .read_until(b'\n', &mut buf)
            .map_err(|source| SourceError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        if bytes_read == 0 {
            break; // EOF
        }
        lines.push(String::from_utf8_lossy(&buf).trim_end().to_string());
    }

    Ok(lines)
}

/// Feed every line of every path through `classifier` into
/// `aggregator`.
///
/// An unreadable source is warned about and skipped; the remaining
/// paths are still processed. Returns the number of events recorded.
pub fn ingest<P: AsRef<Path>>(
    paths: &[P],
    classifier: &LineClassifier,
    aggregator: &mut LoginAggregator,
) -> usize {
    let mut recorded = 0;

    for path in paths {
        let path = path.as_ref();
        let lines = match read_lines(path) {
            Ok(lines) => lines,
            Err(e) => {
                log::warn!("skipping log source: {}", e);
                continue;
            }
        };

        log::debug!("scanning {} ({} lines)", path.display(), lines.len());
        for line in &lines {
            if let Some(event) = classifier.classify(line) {
                aggregator.record(event);
                recorded += 1;
            }
        }
    }

    recorded
}
