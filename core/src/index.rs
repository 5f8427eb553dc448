use std::collections::HashMap;

use crate::error::NoObjectivesError;
use crate::models::Recommendation;
use crate::normalize::normalize;

/// Distinct objectives across all records, keyed by their normalized form.
///
/// When several spellings normalize to the same key, the one seen last (records
/// in file order, then each record's objectives in order) is the one displayed.
#[derive(Debug, Clone, Default)]
pub struct ObjectiveIndex {
    labels: HashMap<String, String>,
}

impl ObjectiveIndex {
    /// Index every objective in `records`. An empty index is allowed here;
    /// use [`ObjectiveIndex::require_objectives`] where it must not be.
    #[must_use]
    pub fn build(records: &[Recommendation]) -> Self {
        let mut labels = HashMap::new();
        for record in records {
            for objective in &record.objectives {
                labels.insert(normalize(objective), objective.clone());
            }
        }
        Self { labels }
    }

    pub fn require_objectives(self) -> Result<Self, NoObjectivesError> {
        if self.labels.is_empty() {
            Err(NoObjectivesError)
        } else {
            Ok(self)
        }
    }

    /// Stored labels, sorted by their original text.
    #[must_use]
    pub fn display_list(&self) -> Vec<String> {
        let mut list: Vec<String> = self.labels.values().cloned().collect();
        list.sort();
        list
    }

    /// The label displayed for an already-normalized key.
    #[must_use]
    pub fn lookup(&self, normalized_key: &str) -> Option<&str> {
        self.labels.get(normalized_key).map(String::as_str)
    }

    /// The displayed label equivalent to `label`, whatever its spelling.
    #[must_use]
    pub fn resolve(&self, label: &str) -> Option<&str> {
        self.lookup(&normalize(label))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Records with at least one objective equal to `selected` once normalized,
/// in their original order.
#[must_use]
pub fn filter<'a>(records: &'a [Recommendation], selected: &str) -> Vec<&'a Recommendation> {
    let wanted = normalize(selected);
    records
        .iter()
        .filter(|r| r.objective_keys.iter().any(|k| *k == wanted))
        .collect()
}
