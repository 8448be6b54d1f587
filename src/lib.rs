//! # Truss Core
//!
//! Editing support and solution analytics for 2D truss structures.
//!
//! This library provides:
//! - A line-oriented DSL for describing nodes, loads and bars
//! - An error-tolerant parser that reports problems per line
//! - A permissive tokenizer for syntax highlighting as the user types
//! - A boundary to an external solver and the solution payload it returns
//! - Statistics and drawing geometry derived from a solution
//!
//! ## Architecture
//!
//! - [`dsl`] - Line grammar, parser and highlighter for structure definitions
//! - [`solution`] - Solution payload, solver trait and solve pipeline
//! - [`analytics`] - Stress range, percentiles, suggested scales, bar widths
//!   and drawing bounds
//! - [`report`] - Plain-text summaries for the command line
//!
//! ## Usage
//!
//! ### Native CLI
//!
//! ```bash
//! truss bridge.truss --solution bridge.solution.json --margin 20
//! ```
//!
//! ### Library
//!
//! ```
//! use truss_core::dsl;
//!
//! let outcome = dsl::parse("nodes\n1: (0, 0) (xy)\n2: (4, 0) ()\nbars\n1: (1 -> 2) 1 200000");
//! assert!(outcome.is_clean());
//! assert_eq!(outcome.structure.bars().len(), 1);
//! ```
//!
//! ### WASM
//!
//! ```javascript
//! import init, { highlight_code, parse_structure } from 'truss_core';
//!
//! await init();
//! editor.innerHTML = highlight_code(source);
//! const { structure, errors } = JSON.parse(parse_structure(source));
//! ```

pub mod analytics;
pub mod dsl;
pub mod error;
pub mod report;
pub mod solution;

// Re-export main types for convenience
pub use analytics::{AnalyticsSummary, DrawingBounds, SizeOptions};
pub use dsl::{ParseError, ParseOutcome, StructuralModel};
pub use error::{Result, TrussError};
pub use solution::{RecordedSolver, Solution, Solver};

// WASM bindings
#[cfg(feature = "wasm")]
mod wasm;
