use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::Value;

use crate::error::{DataLoadError, DataLoadKind};
use crate::models::{RawRecord, Recommendation};

/// How long a successful load is reused before the file is read again.
pub const DEFAULT_TTL: Duration = Duration::from_secs(1);

/// Parse the contents of a recommendation file.
///
/// The top level must be an array. Elements that are not objects are
/// dropped without complaint.
pub fn parse_records(text: &str, path: &Path) -> Result<Vec<Recommendation>, DataLoadError> {
    let fail = |kind| DataLoadError {
        path: path.to_path_buf(),
        kind,
    };

    let value: Value =
        serde_json::from_str(text).map_err(|e| fail(DataLoadKind::Malformed(e.to_string())))?;

    let Value::Array(items) = value else {
        return Err(fail(DataLoadKind::NotAList));
    };

    Ok(items
        .into_iter()
        .filter_map(|item| match item {
            Value::Object(map) => Some(Recommendation::from(RawRecord::from_object(map))),
            _ => None,
        })
        .collect())
}

/// Read and parse the recommendation file at `path`, bypassing any cache.
pub fn read_records(path: &Path) -> Result<Vec<Recommendation>, DataLoadError> {
    let text = std::fs::read_to_string(path).map_err(|e| DataLoadError {
        path: path.to_path_buf(),
        kind: if e.kind() == ErrorKind::NotFound {
            DataLoadKind::Missing
        } else {
            DataLoadKind::Unreadable(e.to_string())
        },
    })?;
    parse_records(&text, path)
}

struct Cached {
    loaded_at: Instant,
    records: Arc<Vec<Recommendation>>,
}

/// File-backed record source with a short-lived cache, so edits to the data
/// file show up quickly without rereading it on every interaction.
pub struct RecordStore {
    path: PathBuf,
    ttl: Duration,
    cache: Option<Cached>,
}

impl RecordStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_ttl(path, DEFAULT_TTL)
    }

    #[must_use]
    pub fn with_ttl(path: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self {
            path: path.into(),
            ttl,
            cache: None,
        }
    }

    /// Current records, from cache while it is fresh. Failures are not cached.
    pub fn load(&mut self) -> Result<Arc<Vec<Recommendation>>, DataLoadError> {
        self.load_at(Instant::now())
    }

    fn load_at(&mut self, now: Instant) -> Result<Arc<Vec<Recommendation>>, DataLoadError> {
        if let Some(cached) = &self.cache {
            if now.saturating_duration_since(cached.loaded_at) < self.ttl {
                tracing::debug!(path = %self.path.display(), "recommendations served from cache");
                return Ok(Arc::clone(&cached.records));
            }
        }

        self.cache = None;
        let records = Arc::new(read_records(&self.path)?);
        tracing::debug!(
            path = %self.path.display(),
            count = records.len(),
            "recommendations reloaded"
        );
        self.cache = Some(Cached {
            loaded_at: now,
            records: Arc::clone(&records),
        });
        Ok(records)
    }

    /// Drop the cached copy so the next load reads the file.
    pub fn invalidate(&mut self) {
        self.cache = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_data(dir: &TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join("melanges.json");
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let mut store = RecordStore::new(dir.path().join("melanges.json"));
        let err = store.load().unwrap_err();
        assert_eq!(err.kind, DataLoadKind::Missing);
    }

    #[test]
    fn test_top_level_object_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_data(&dir, r#"{"nom": "Tisane", "objectifs": ["Stress"]}"#);
        let err = RecordStore::new(path).load().unwrap_err();
        assert_eq!(err.kind, DataLoadKind::NotAList);
    }

    #[test]
    fn test_malformed_json() {
        let dir = TempDir::new().unwrap();
        let path = write_data(&dir, r#"[{"nom": "Tisane",]"#);
        let err = RecordStore::new(path).load().unwrap_err();
        assert!(matches!(err.kind, DataLoadKind::Malformed(_)));
    }

    #[test]
    fn test_non_objects_dropped() {
        let records = parse_records(
            r#"[1, "two", {"nom": "A"}, null, [], {"nom": "B"}]"#,
            Path::new("melanges.json"),
        )
        .unwrap();
        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn test_empty_array_is_fine() {
        let records = parse_records("[]", Path::new("melanges.json")).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_cache_reused_within_ttl() {
        let dir = TempDir::new().unwrap();
        let path = write_data(&dir, r#"[{"nom": "A"}]"#);
        let mut store = RecordStore::with_ttl(&path, Duration::from_secs(3600));
        let start = Instant::now();

        assert_eq!(store.load_at(start).unwrap()[0].name, "A");
        std::fs::write(&path, r#"[{"nom": "B"}]"#).unwrap();
        assert_eq!(store.load_at(start).unwrap()[0].name, "A");

        store.invalidate();
        assert_eq!(store.load_at(start).unwrap()[0].name, "B");
    }

    #[test]
    fn test_cache_expires_after_ttl() {
        let dir = TempDir::new().unwrap();
        let path = write_data(&dir, r#"[{"nom": "A"}]"#);
        let mut store = RecordStore::with_ttl(&path, Duration::from_secs(1));
        let start = Instant::now();

        assert_eq!(store.load_at(start).unwrap()[0].name, "A");
        std::fs::write(&path, r#"[{"nom": "B"}]"#).unwrap();
        let later = start + Duration::from_secs(2);
        assert_eq!(store.load_at(later).unwrap()[0].name, "B");
    }

    #[test]
    fn test_failure_not_cached() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("melanges.json");
        let mut store = RecordStore::with_ttl(&path, Duration::from_secs(3600));

        assert!(store.load().is_err());
        std::fs::write(&path, r#"[{"nom": "A"}]"#).unwrap();
        assert_eq!(store.load().unwrap().len(), 1);
    }

    #[test]
    fn test_expired_cache_dropped_on_error() {
        let dir = TempDir::new().unwrap();
        let path = write_data(&dir, r#"[{"nom": "A"}]"#);
        let mut store = RecordStore::with_ttl(&path, Duration::ZERO);

        assert!(store.load().is_ok());
        std::fs::write(&path, "{}").unwrap();
        assert_eq!(store.load().unwrap_err().kind, DataLoadKind::NotAList);
    }
}
