use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::normalize::normalize_value;

/// Name shown for a record without a usable `nom`.
pub const DEFAULT_NAME: &str = "unnamed";

/// Shown in place of an empty ingredient list or preparation.
pub const PLACEHOLDER: &str = "—";

/// A field that the data file may hold either as one string or as a list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TextOrList {
    Text(String),
    List(Vec<Value>),
    Other(Value),
}

impl TextOrList {
    /// Flatten into ordered lines. Anything malformed yields nothing.
    #[must_use]
    pub fn into_lines(self) -> Vec<String> {
        match self {
            Self::Text(s) => vec![s],
            Self::List(items) => items
                .into_iter()
                .filter_map(|v| match v {
                    Value::String(s) => Some(s),
                    _ => None,
                })
                .collect(),
            Self::Other(_) => Vec::new(),
        }
    }
}

/// One entry of `melanges.json` exactly as written, before any cleanup.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRecord {
    #[serde(default, rename = "nom")]
    pub name: Option<Value>,
    #[serde(default, rename = "objectifs")]
    pub objectives: Option<Value>,
    #[serde(default)]
    pub ingredients: Option<TextOrList>,
    #[serde(default)]
    pub preparation: Option<TextOrList>,
    #[serde(default)]
    pub precautions: Option<Value>,
}

impl RawRecord {
    /// Read the known fields out of a JSON object; unknown keys are ignored.
    #[must_use]
    pub fn from_object(object: Map<String, Value>) -> Self {
        // Every field is optional and untyped, so this cannot fail on an object.
        serde_json::from_value(Value::Object(object)).unwrap_or_default()
    }
}

/// A recommendation with every field already coerced to a display-safe shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub name: String,
    pub objectives: Vec<String>,
    /// Comparison key of every raw `objectifs` entry, in order. Entries that
    /// are not strings keep their slot with an empty key.
    #[serde(skip)]
    pub objective_keys: Vec<String>,
    pub ingredients: Vec<String>,
    pub preparation: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precautions: Option<String>,
}

impl From<RawRecord> for Recommendation {
    fn from(raw: RawRecord) -> Self {
        let name = match raw.name {
            Some(Value::String(s)) => s,
            _ => DEFAULT_NAME.to_string(),
        };

        let items = match raw.objectives {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        };
        let objective_keys = items.iter().map(normalize_value).collect();
        let objectives = items
            .into_iter()
            .filter_map(|v| match v {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect();

        let precautions = match raw.precautions {
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s),
            _ => None,
        };

        Self {
            name,
            objectives,
            objective_keys,
            ingredients: raw.ingredients.map(TextOrList::into_lines).unwrap_or_default(),
            preparation: raw.preparation.map(TextOrList::into_lines).unwrap_or_default(),
            precautions,
        }
    }
}

impl Recommendation {
    /// Ingredients joined for a single line, or the placeholder.
    #[must_use]
    pub fn ingredients_line(&self) -> String {
        if self.ingredients.is_empty() {
            PLACEHOLDER.to_string()
        } else {
            self.ingredients.join(", ")
        }
    }

    /// Preparation steps numbered from 1, or just the placeholder.
    #[must_use]
    pub fn numbered_steps(&self) -> Vec<String> {
        if self.preparation.is_empty() {
            return vec![PLACEHOLDER.to_string()];
        }
        self.preparation
            .iter()
            .enumerate()
            .map(|(i, step)| format!("{}. {step}", i + 1))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Recommendation {
        match value {
            Value::Object(map) => Recommendation::from(RawRecord::from_object(map)),
            other => panic!("expected an object, got {other}"),
        }
    }

    #[test]
    fn test_bare_string_ingredient_matches_list() {
        let bare = record(json!({ "ingredients": "Ginger" }));
        let list = record(json!({ "ingredients": ["Ginger"] }));
        assert_eq!(bare.ingredients, list.ingredients);
        assert_eq!(bare.ingredients_line(), "Ginger");
    }

    #[test]
    fn test_malformed_lists_degrade_to_empty() {
        let r = record(json!({
            "ingredients": 12,
            "preparation": { "step": "boil" }
        }));
        assert!(r.ingredients.is_empty());
        assert!(r.preparation.is_empty());
        assert_eq!(r.ingredients_line(), PLACEHOLDER);
        assert_eq!(r.numbered_steps(), vec![PLACEHOLDER.to_string()]);
    }

    #[test]
    fn test_non_string_list_elements_dropped() {
        let r = record(json!({ "ingredients": ["Mint", 3, null, "Lemon"] }));
        assert_eq!(r.ingredients, vec!["Mint", "Lemon"]);
        assert_eq!(r.ingredients_line(), "Mint, Lemon");
    }

    #[test]
    fn test_default_name() {
        assert_eq!(record(json!({})).name, DEFAULT_NAME);
        assert_eq!(record(json!({ "nom": 7 })).name, DEFAULT_NAME);
        assert_eq!(record(json!({ "nom": "Tisane calme" })).name, "Tisane calme");
    }

    #[test]
    fn test_blank_precautions_are_absent() {
        assert_eq!(record(json!({ "precautions": "   " })).precautions, None);
        assert_eq!(record(json!({ "precautions": 1 })).precautions, None);
        assert_eq!(
            record(json!({ "precautions": "Avoid during pregnancy." })).precautions,
            Some("Avoid during pregnancy.".to_string())
        );
    }

    #[test]
    fn test_steps_are_numbered() {
        let r = record(json!({ "preparation": ["Boil water", "Steep 5 minutes"] }));
        assert_eq!(r.numbered_steps(), vec!["1. Boil water", "2. Steep 5 minutes"]);

        let single = record(json!({ "preparation": "Mix everything" }));
        assert_eq!(single.numbered_steps(), vec!["1. Mix everything"]);
    }

    #[test]
    fn test_objectives_keep_only_strings() {
        let r = record(json!({ "objectifs": ["Stress", 4, "Sommeil"] }));
        assert_eq!(r.objectives, vec!["Stress", "Sommeil"]);

        let missing = record(json!({ "nom": "x" }));
        assert!(missing.objectives.is_empty());

        let scalar = record(json!({ "objectifs": "Stress" }));
        assert!(scalar.objectives.is_empty());
        assert!(scalar.objective_keys.is_empty());
    }

    #[test]
    fn test_objective_keys_follow_raw_entries() {
        let r = record(json!({ "objectifs": ["Rétention d’eau", 4, " Sommeil "] }));
        assert_eq!(r.objective_keys, vec!["retention d'eau", "", "sommeil"]);
        assert_eq!(r.objectives, vec!["Rétention d’eau", " Sommeil "]);
    }

    #[test]
    fn test_objective_keys_not_serialized() {
        let r = record(json!({ "nom": "A", "objectifs": ["Stress"] }));
        let value = serde_json::to_value(&r).unwrap();
        assert!(value.get("objective_keys").is_none());
        assert_eq!(value["objectives"], json!(["Stress"]));
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let r = record(json!({ "nom": "A", "source": "grand-mère", "objectifs": ["x"] }));
        assert_eq!(r.name, "A");
    }
}
