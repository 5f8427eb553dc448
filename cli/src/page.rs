//! HTML rendering for the recommendation form.

use std::fmt::Write;

use tisane_core::error::TisaneError;
use tisane_core::models::{PLACEHOLDER, Recommendation};
use tisane_core::service::Selection;

pub const TITLE: &str = "Tisane | Health & Well-being";

pub const DISCLAIMER: &str = "Educational and preventive information only. It does not replace \
medical advice. Natural-health tips are everywhere on social media, but they are often scattered.";

pub const NO_RECOMMENDATIONS: &str = "No recommendations available for this objective yet.";

const STYLE: &str = "body{font-family:sans-serif;max-width:46rem;margin:2rem auto;padding:0 1rem;color:#222}\
.caption{color:#666;font-size:.9rem}\
.disclaimer{background:#eef4fb;padding:.75rem 1rem;border-radius:.4rem}\
.card{border:1px solid #ddd;border-radius:.5rem;padding:.5rem 1rem 1rem;margin:1rem 0}\
.info{background:#eef4fb;padding:.75rem 1rem;border-radius:.4rem}\
.warning{background:#fff6e0;padding:.75rem 1rem;border-radius:.4rem}\
.error{background:#fdecea;padding:.75rem 1rem;border-radius:.4rem;color:#8a1c1c}";

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn document(body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
<title>{title}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n{body}</body>\n</html>\n",
        title = escape_html(TITLE),
    )
}

fn header(out: &mut String, visits: u64) {
    let _ = writeln!(out, "<h1>{}</h1>", escape_html(TITLE));
    let _ = writeln!(out, "<p class=\"disclaimer\">{}</p>", escape_html(DISCLAIMER));
    let _ = writeln!(out, "<p class=\"caption\">Total platform visits: {visits}</p>");
}

fn card(out: &mut String, rec: &Recommendation) {
    out.push_str("<section class=\"card\">\n");
    let _ = writeln!(out, "<h3>{}</h3>", escape_html(&rec.name));

    out.push_str("<h4>Ingredients</h4>\n");
    let _ = writeln!(out, "<p>{}</p>", escape_html(&rec.ingredients_line()));

    out.push_str("<h4>Preparation</h4>\n");
    if rec.preparation.is_empty() {
        let _ = writeln!(out, "<p>{PLACEHOLDER}</p>");
    } else {
        out.push_str("<ol>\n");
        for step in &rec.preparation {
            let _ = writeln!(out, "<li>{}</li>", escape_html(step));
        }
        out.push_str("</ol>\n");
    }

    if let Some(precautions) = &rec.precautions {
        let _ = writeln!(out, "<p class=\"warning\">{}</p>", escape_html(precautions));
    }
    out.push_str("</section>\n");
}

/// The full form page: picker, then the matching cards.
pub fn render_selection(visits: u64, selection: &Selection) -> String {
    let mut out = String::new();
    header(&mut out, visits);

    out.push_str("<form method=\"get\" action=\"/\">\n");
    out.push_str("<label for=\"objective\">Choose your health objective:</label>\n");
    out.push_str("<select id=\"objective\" name=\"objective\">\n");
    for objective in &selection.objectives {
        let selected = if *objective == selection.selected {
            " selected"
        } else {
            ""
        };
        let value = escape_html(objective);
        let _ = writeln!(out, "<option value=\"{value}\"{selected}>{value}</option>");
    }
    out.push_str("</select>\n<button type=\"submit\">Show</button>\n</form>\n");

    out.push_str("<h2>Recommendations</h2>\n");
    if selection.recommendations.is_empty() {
        let _ = writeln!(out, "<p class=\"info\">{NO_RECOMMENDATIONS}</p>");
    } else {
        for rec in &selection.recommendations {
            card(&mut out, rec);
        }
    }

    document(&out)
}

/// Page for a condition that stops rendering. A data file problem is shown
/// alone; a missing objective list still shows the page header.
pub fn render_fatal(visits: u64, error: &TisaneError) -> String {
    let mut out = String::new();
    if matches!(error, TisaneError::NoObjectives(_)) {
        header(&mut out, visits);
    }
    let _ = writeln!(out, "<p class=\"error\">{}</p>", escape_html(&error.user_message()));
    document(&out)
}
