//! Crossing list error types.

use std::path::{Path, PathBuf};

/// Errors that can occur when loading the crossing list.
#[derive(Debug, thiserror::Error)]
pub enum TrackError {
    /// Crossing file could not be read
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Crossing file is not valid JSON or has invalid points
    #[error("invalid crossing data{}: {message}", location(.path.as_deref()))]
    Json {
        path: Option<PathBuf>,
        message: String,
    },
}

fn location(path: Option<&Path>) -> String {
    path.map(|p| format!(" in {}", p.display()))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = TrackError::Json {
            path: None,
            message: "expected value".into(),
        };
        assert_eq!(err.to_string(), "invalid crossing data: expected value");

        let err = TrackError::Json {
            path: Some(PathBuf::from("/tmp/c.json")),
            message: "expected value".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid crossing data in /tmp/c.json: expected value"
        );
    }
}
