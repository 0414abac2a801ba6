//! JSON output for the history summary.
//!
//! Emits the full history plus per-platform growth for scripting.

use serde::Serialize;

use crate::store::growth::{self, Growth};
use crate::store::History;

#[derive(Serialize)]
struct Summary<'a> {
    history: &'a History,
    growth: Vec<Growth>,
}

pub fn render(history: &History) -> String {
    let summary = Summary {
        history,
        growth: growth::compute(history),
    };

    // History and Growth hold only strings, dates and numbers
    let mut out = serde_json::to_string_pretty(&summary).unwrap_or_else(|_| String::from("{}"));
    out.push('\n');
    out
}
