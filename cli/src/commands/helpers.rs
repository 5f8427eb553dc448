use serde::Serialize;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};

use tisane_core::models::Recommendation;

pub(crate) fn print_objective_table(objectives: &[String], counts: &[usize]) {
    #[derive(Tabled)]
    struct ObjectiveRow {
        #[tabled(rename = "#")]
        idx: usize,
        #[tabled(rename = "Objective")]
        objective: String,
        #[tabled(rename = "Mixtures")]
        mixtures: usize,
    }

    let rows: Vec<ObjectiveRow> = objectives
        .iter()
        .zip(counts)
        .enumerate()
        .map(|(i, (objective, &mixtures))| ObjectiveRow {
            idx: i + 1,
            objective: truncate(objective, 40),
            mixtures,
        })
        .collect();

    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(2..3)).with(Alignment::right()))
        .to_string();
    println!("{table}");
}

/// Terminal rendering of one recommendation card.
pub(crate) fn format_recommendation(rec: &Recommendation) -> String {
    let mut out = format!("### {}\n\n", rec.name);

    out.push_str("Ingredients\n");
    out.push_str(&format!("  {}\n\n", rec.ingredients_line()));

    out.push_str("Preparation\n");
    for step in rec.numbered_steps() {
        out.push_str(&format!("  {step}\n"));
    }

    if let Some(precautions) = &rec.precautions {
        out.push_str(&format!("\n  ! {precautions}\n"));
    }
    out
}

pub(crate) fn json_error(message: &str) -> String {
    #[derive(Serialize)]
    struct CliError<'a> {
        error: &'a str,
    }
    serde_json::to_string(&CliError { error: message })
        .unwrap_or_else(|_| format!("{{\"error\":\"{message}\"}}"))
}

pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let end = s.char_indices().nth(max - 3).map_or(s.len(), |(i, _)| i);
        format!("{}...", &s[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec() -> Recommendation {
        Recommendation {
            name: "Tisane du soir".to_string(),
            objectives: vec!["Sommeil".to_string()],
            objective_keys: vec!["sommeil".to_string()],
            ingredients: vec!["Camomille".to_string(), "Tilleul".to_string()],
            preparation: vec!["Boil water".to_string(), "Steep".to_string()],
            precautions: Some("Not for children.".to_string()),
        }
    }

    #[test]
    fn test_format_recommendation_full() {
        let text = format_recommendation(&rec());
        assert!(text.starts_with("### Tisane du soir\n"));
        assert!(text.contains("  Camomille, Tilleul\n"));
        assert!(text.contains("  1. Boil water\n  2. Steep\n"));
        assert!(text.contains("! Not for children."));
    }

    #[test]
    fn test_format_recommendation_placeholders() {
        let mut r = rec();
        r.ingredients.clear();
        r.preparation.clear();
        r.precautions = None;
        let text = format_recommendation(&r);
        assert!(text.contains("Ingredients\n  —\n"));
        assert!(text.contains("Preparation\n  —\n"));
        assert!(!text.contains('!'));
    }

    #[test]
    fn test_json_error() {
        assert_eq!(json_error("nope"), r#"{"error":"nope"}"#);
    }

    #[test]
    fn test_truncate_utf8() {
        assert_eq!(truncate("Rétention d'eau", 40), "Rétention d'eau");
        assert_eq!(truncate("Crème fraîche", 10), "Crème f...");
    }
}
