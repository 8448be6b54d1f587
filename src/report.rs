//! Plain-text reports for the command line.

use std::fmt;

use crate::analytics::{AnalyticsSummary, DrawingBounds};
use crate::dsl::ParseError;

/// Render the solution statistics and drawing bounds.
///
/// Bars are listed by id so the output is stable between runs.
#[must_use]
pub fn render_summary(summary: &AnalyticsSummary, bounds: &DrawingBounds) -> String {
    SummaryReport { summary, bounds }.to_string()
}

/// Render parse errors one per line, in the order given.
#[must_use]
pub fn render_errors(errors: &[ParseError]) -> String {
    errors
        .iter()
        .map(|error| format!("error: {error}\n"))
        .collect()
}

struct SummaryReport<'a> {
    summary: &'a AnalyticsSummary,
    bounds: &'a DrawingBounds,
}

impl fmt::Display for SummaryReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let SummaryReport { summary, bounds } = self;

        writeln!(
            f,
            "Stress range: min = {:+.3}, max = {:+.3}",
            summary.stress.min, summary.stress.max
        )?;
        writeln!(
            f,
            "Displacement: p50 = {:.3e}, max = {:.3e}, suggested scale = {}",
            summary.displacement.p50, summary.displacement.max, summary.displacement.suggested_scale
        )?;
        writeln!(
            f,
            "Reaction: p50 = {:.3}, max = {:.3}, suggested scale = {}",
            summary.reaction.p50, summary.reaction.max, summary.reaction.suggested_scale
        )?;

        let mut widths: Vec<(&String, &f64)> = summary.bar_stroke_width.iter().collect();
        widths.sort_by(|(a, _), (b, _)| by_id(a, b));
        writeln!(f, "Bar stroke widths:")?;
        for (id, width) in widths {
            writeln!(f, "  {id}: {width:.2}")?;
        }

        writeln!(
            f,
            "Drawing: {:.2} x {:.2} at ({:.2}, {:.2}), margin {}",
            bounds.width, bounds.height, bounds.left, bounds.top, bounds.margin
        )
    }
}

// Numeric ids sort by value, anything else after them by text.
fn by_id(a: &str, b: &str) -> std::cmp::Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(a), Ok(b)) => a.cmp(&b),
        (Ok(_), Err(_)) => std::cmp::Ordering::Less,
        (Err(_), Ok(_)) => std::cmp::Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}
