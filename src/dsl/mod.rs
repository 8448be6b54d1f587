//! DSL (Domain Specific Language) for truss structure definitions.
//!
//! A definition is line-oriented and split into sections. Each section header
//! changes how the following lines are read.
//!
//! # Grammar Overview
//!
//! ```text
//! definition  = { line }
//! line        = empty | comment | header | node | load | bar
//! comment     = [ws] '#' { any_char }
//! header      = [ws] ("nodes" | "loads" | "bars") [ws]      (case-insensitive)
//! node        = id ':' '(' number ',' number ')' '(' { 'x' | 'y' } ')'
//! load        = id '->' '(' number ',' number ')'
//! bar         = id ':' '(' id '->' id ')' number ws number
//!
//! id          = digit+
//! number      = ['+' | '-'] digit+ ['.' digit+]
//! ```
//!
//! Whitespace is allowed between any two tokens of a record.
//!
//! # Sections
//!
//! | Section | Record | Meaning |
//! |---------|--------|---------|
//! | nodes | `<id>: (<x>, <y>) (<constraints>)` | Node position; `x`/`y` fix the node along that axis |
//! | loads | `<node id> -> (<fx>, <fy>)` | External force on a node |
//! | bars | `<id>: (<start id> -> <end id>) <section> <young>` | Bar with its cross section and Young modulus |
//!
//! Headers may appear in any order and more than once. Lines before the first
//! header are errors.
//!
//! # Example
//!
//! ```text
//! # Two-node bar fixed on the left
//! nodes
//! 1: (0, 0) (xy)
//! 2: (4, 0) ()
//!
//! loads
//! 2 -> (0, -10)
//!
//! bars
//! 1: (1 -> 2) 1.0 200000
//! ```

mod ast;
pub mod grammar;
pub mod lexer;
mod parser;

pub use ast::*;
pub use lexer::{highlight, highlight_line, MarkedLine, Span, SpanKind};
pub use parser::{ParseOutcome, Parser};

/// Parse a structure definition.
///
/// Never fails: problems are reported per line in [`ParseOutcome::errors`].
///
/// ```
/// let outcome = truss_core::dsl::parse("nodes\n1: (0, 0) (xy)\nloads\n9 -> (0, 1)");
/// assert_eq!(outcome.structure.nodes().len(), 1);
/// assert_eq!(outcome.errors[0].line, 4);
/// assert_eq!(outcome.errors[0].message, "Node with id 9 doesn't exist");
/// ```
pub fn parse(input: &str) -> ParseOutcome {
    parse_lines(input.lines())
}

/// Parse a structure definition given as lines.
pub fn parse_lines<I, S>(lines: I) -> ParseOutcome
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    Parser::new().parse(lines)
}

/// Highlight a structure definition.
///
/// ```
/// let marked = truss_core::dsl::highlight_text("2 -> (0, -10)");
/// assert_eq!(marked[0].to_string(), "2 -> (0, -10)");
/// ```
pub fn highlight_text(input: &str) -> Vec<MarkedLine> {
    highlight(input.lines())
}

/// Read and parse a structure definition file.
#[cfg(feature = "cli")]
pub fn parse_file(path: &std::path::Path) -> crate::error::Result<(Vec<String>, ParseOutcome)> {
    let content =
        std::fs::read_to_string(path).map_err(|e| crate::error::TrussError::FileReadError {
            path: path.display().to_string(),
            source: e,
        })?;
    let lines: Vec<String> = content.lines().map(str::to_string).collect();
    let outcome = parse_lines(&lines);
    Ok((lines, outcome))
}
