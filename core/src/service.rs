use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::counter::{CounterStore, Session, VisitCounter};
use crate::error::TisaneError;
use crate::index::{ObjectiveIndex, filter};
use crate::models::Recommendation;
use crate::store::RecordStore;

/// Everything needed to render the objective picker and its results.
#[derive(Debug, Clone)]
pub struct Selection {
    pub objectives: Vec<String>,
    pub selected: String,
    pub recommendations: Vec<Recommendation>,
}

pub struct TisaneService {
    store: RecordStore,
    counter: VisitCounter,
}

impl TisaneService {
    #[must_use]
    pub fn new(data_file: impl Into<PathBuf>, counter_store: Box<dyn CounterStore>) -> Self {
        Self::from_parts(RecordStore::new(data_file), VisitCounter::new(counter_store))
    }

    #[must_use]
    pub fn with_ttl(
        data_file: impl Into<PathBuf>,
        ttl: Duration,
        counter_store: Box<dyn CounterStore>,
    ) -> Self {
        Self::from_parts(
            RecordStore::with_ttl(data_file, ttl),
            VisitCounter::new(counter_store),
        )
    }

    #[must_use]
    pub fn from_parts(store: RecordStore, counter: VisitCounter) -> Self {
        Self { store, counter }
    }

    // --- Recommendations ---

    pub fn records(&mut self) -> Result<Arc<Vec<Recommendation>>, TisaneError> {
        Ok(self.store.load()?)
    }

    /// Objective index over the current records; empty is an error.
    pub fn index(&mut self) -> Result<ObjectiveIndex, TisaneError> {
        let records = self.records()?;
        Ok(ObjectiveIndex::build(&records).require_objectives()?)
    }

    /// Sorted labels for the objective picker.
    pub fn objectives(&mut self) -> Result<Vec<String>, TisaneError> {
        Ok(self.index()?.display_list())
    }

    /// Records matching `objective` under normalization. No match is `Ok(vec![])`.
    pub fn recommendations(&mut self, objective: &str) -> Result<Vec<Recommendation>, TisaneError> {
        let records = self.records()?;
        Ok(filter(&records, objective).into_iter().cloned().collect())
    }

    /// Resolve the picker state. Without a choice, or with one that is not
    /// offered, the first label is selected.
    pub fn select(&mut self, objective: Option<&str>) -> Result<Selection, TisaneError> {
        let records = self.records()?;
        let index = ObjectiveIndex::build(&records).require_objectives()?;
        let objectives = index.display_list();

        let selected = objective
            .and_then(|o| index.resolve(o))
            .map(str::to_string)
            .or_else(|| objectives.first().cloned())
            .unwrap_or_default();

        let recommendations = filter(&records, &selected).into_iter().cloned().collect();

        Ok(Selection {
            objectives,
            selected,
            recommendations,
        })
    }

    // --- Visits ---

    pub fn record_view(&self, session: &mut Session) -> u64 {
        self.counter.record_view(session)
    }

    #[must_use]
    pub fn visits(&self) -> u64 {
        self.counter.peek()
    }
}
