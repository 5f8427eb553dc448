use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use anyhow::{Context, Result};
use serde_json::{Map, Value};

const VISITS_KEY: &str = "visits";

/// Where the counter document lives.
///
/// `get` returns `None` when nothing has been stored yet.
pub trait CounterStore: Send + Sync {
    fn get(&self) -> Result<Option<Value>>;
    fn set(&self, document: &Value) -> Result<()>;
}

/// Counter document persisted as pretty-printed JSON, e.g. `visits.json`.
pub struct FileCounterStore {
    path: PathBuf,
}

impl FileCounterStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CounterStore for FileCounterStore {
    fn get(&self) -> Result<Option<Value>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let text = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        let value = serde_json::from_str(&text)
            .with_context(|| format!("Invalid JSON in {}", self.path.display()))?;
        Ok(Some(value))
    }

    fn set(&self, document: &Value) -> Result<()> {
        let text = serde_json::to_string_pretty(document)?;
        std::fs::write(&self.path, text)
            .with_context(|| format!("Failed to write {}", self.path.display()))
    }
}

/// Counter document held in memory only.
#[derive(Default)]
pub struct MemoryCounterStore {
    document: Mutex<Option<Value>>,
}

impl MemoryCounterStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_document(document: Value) -> Self {
        Self {
            document: Mutex::new(Some(document)),
        }
    }
}

impl CounterStore for MemoryCounterStore {
    fn get(&self) -> Result<Option<Value>> {
        Ok(self
            .document
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn set(&self, document: &Value) -> Result<()> {
        *self.document.lock().unwrap_or_else(PoisonError::into_inner) = Some(document.clone());
        Ok(())
    }
}

/// Per-visitor state the caller keeps for the length of one visit.
#[derive(Debug, Clone, Default)]
pub struct Session {
    visit_counted: bool,
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A returning visitor whose visit was counted on an earlier request.
    #[must_use]
    pub fn resumed() -> Self {
        Self {
            visit_counted: true,
        }
    }

    #[must_use]
    pub fn visit_counted(&self) -> bool {
        self.visit_counted
    }
}

/// Anonymous visit counter. Never fails: unreadable state counts as zero
/// and write failures are only logged.
pub struct VisitCounter {
    store: Box<dyn CounterStore>,
}

impl VisitCounter {
    #[must_use]
    pub fn new(store: Box<dyn CounterStore>) -> Self {
        Self { store }
    }

    /// Load the document, falling back to an empty one when it is missing,
    /// unreadable or not an object.
    fn read_document(&self) -> Map<String, Value> {
        match self.store.get() {
            Ok(Some(Value::Object(map))) => map,
            Ok(_) => Map::new(),
            Err(e) => {
                tracing::warn!("visit counter unreadable, starting from 0: {e:#}");
                Map::new()
            }
        }
    }

    fn visits_in(document: &Map<String, Value>) -> u64 {
        document.get(VISITS_KEY).and_then(Value::as_u64).unwrap_or(0)
    }

    /// Add one visit and return the new total.
    pub fn increment(&self) -> u64 {
        let mut document = self.read_document();
        let visits = Self::visits_in(&document).saturating_add(1);
        document.insert(VISITS_KEY.to_string(), Value::from(visits));

        if let Err(e) = self.store.set(&Value::Object(document)) {
            tracing::warn!("failed to persist visit counter: {e:#}");
        }
        visits
    }

    /// Current total without counting anything.
    #[must_use]
    pub fn peek(&self) -> u64 {
        Self::visits_in(&self.read_document())
    }

    /// Count the visit the first time a session is seen; afterwards just read.
    pub fn record_view(&self, session: &mut Session) -> u64 {
        if session.visit_counted {
            self.peek()
        } else {
            session.visit_counted = true;
            self.increment()
        }
    }
}
