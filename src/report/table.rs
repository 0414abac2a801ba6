//! Text rendering of the history summary.
//!
//! - Date count and range
//! - Per-date counts, platforms sorted by name
//! - Growth for platforms seen on more than one day

use std::fmt::Write;

use crate::store::growth;
use crate::store::History;
use crate::util::{format_count, format_delta};

pub fn render(history: &History) -> String {
    let mut dates = history.days().map(|(date, _)| *date);
    let (Some(first), last) = (dates.next(), dates.last()) else {
        return String::from("No data available\n");
    };
    let last = last.unwrap_or(first);

    let rule = "=".repeat(50);
    let mut out = String::new();

    // writing into a String cannot fail
    let _ = writeln!(out, "{rule}\nSUMMARY\n{rule}");
    let _ = writeln!(out, "\nTotal dates recorded: {}", history.len());
    let _ = writeln!(out, "Date range: {first} to {last}");

    out.push_str("\nData by date:\n");
    for (date, counts) in history.days() {
        let _ = writeln!(out, "\n  {date}:");
        for (platform, followers) in counts {
            let _ = writeln!(out, "    {platform}: {} followers", format_count(*followers));
        }
    }

    let growth: Vec<_> = growth::compute(history)
        .into_iter()
        .filter(|g| g.spans_days())
        .collect();

    if !growth.is_empty() {
        out.push_str("\nGrowth Analysis:\n");
        for g in growth {
            let _ = writeln!(
                out,
                "  {}: {} → {} ({}, {:+.2}%)",
                g.platform,
                format_count(g.first_count),
                format_count(g.last_count),
                format_delta(g.delta),
                g.percent
            );
        }
    }

    let _ = writeln!(out, "\n{rule}");
    out
}
