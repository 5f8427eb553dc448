use std::path::PathBuf;

use thiserror::Error;

/// Why the recommendation file could not be turned into a record list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataLoadKind {
    Missing,
    Unreadable(String),
    Malformed(String),
    NotAList,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", describe(.path, .kind))]
pub struct DataLoadError {
    pub path: PathBuf,
    pub kind: DataLoadKind,
}

fn describe(path: &std::path::Path, kind: &DataLoadKind) -> String {
    let path = path.display();
    match kind {
        DataLoadKind::Missing => format!("{path} not found. It must sit in the data directory."),
        DataLoadKind::Unreadable(msg) => format!("Failed to read {path}: {msg}"),
        DataLoadKind::Malformed(msg) => format!("Invalid JSON in {path}: {msg}"),
        DataLoadKind::NotAList => {
            format!("{path} must contain a LIST of objects [ {{...}}, {{...}} ]")
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("No objectives detected in the recommendation file")]
pub struct NoObjectivesError;

/// Conditions that stop rendering altogether.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TisaneError {
    #[error(transparent)]
    DataLoad(#[from] DataLoadError),
    #[error(transparent)]
    NoObjectives(#[from] NoObjectivesError),
}

impl TisaneError {
    /// Message safe to show a visitor: names the data file but not where it
    /// lives, and leaves out parser details.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::DataLoad(e) => {
                let file = e
                    .path
                    .file_name()
                    .map_or_else(|| "The data file".into(), |f| f.to_string_lossy());
                match e.kind {
                    DataLoadKind::Missing => {
                        format!("{file} not found. It must sit in the data directory.")
                    }
                    DataLoadKind::Unreadable(_) => format!("{file} could not be read."),
                    DataLoadKind::Malformed(_) => format!("JSON format error in {file}."),
                    DataLoadKind::NotAList => {
                        format!("{file} must contain a LIST of objects [ {{...}}, {{...}} ]")
                    }
                }
            }
            Self::NoObjectives(e) => e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_load_messages_name_the_file() {
        let err = DataLoadError {
            path: PathBuf::from("/tmp/melanges.json"),
            kind: DataLoadKind::NotAList,
        };
        let msg = err.to_string();
        assert!(msg.contains("/tmp/melanges.json"));
        assert!(msg.contains("LIST"));
    }

    #[test]
    fn test_user_message_hides_location_and_parser_detail() {
        let err = TisaneError::DataLoad(DataLoadError {
            path: PathBuf::from("/srv/private/data/melanges.json"),
            kind: DataLoadKind::Malformed("EOF while parsing a list at line 1".to_string()),
        });
        let msg = err.user_message();
        assert_eq!(msg, "JSON format error in melanges.json.");
        assert!(!msg.contains("/srv/private"));
        assert!(!msg.contains("EOF"));
        // The full detail stays available for logs.
        assert!(err.to_string().contains("/srv/private/data/melanges.json"));
    }

    #[test]
    fn test_tisane_error_is_transparent() {
        let err: TisaneError = NoObjectivesError.into();
        assert_eq!(
            err.to_string(),
            "No objectives detected in the recommendation file"
        );
    }
}
