//! Boundary with the external structure solver.
//!
//! The solver is opaque: it receives the raw definition text and answers with
//! either a [`Solution`] or an error payload. This module describes that
//! payload, decodes solver responses, and runs the solve-then-analyse
//! pipeline.
//!
//! ## Response format
//!
//! A successful response wraps the solution in a `data` object:
//!
//! ```text
//! {"data": {
//!   "nodes": [{"id": 1,
//!              "position": {"original": {"x": 0, "y": 0}, "displaced": {"x": 0, "y": 0}},
//!              "reaction": {"x": 0, "y": 10}}],
//!   "bars":  [{"id": 1, "nodes": {"start": 1, "end": 2},
//!              "axial": "tension", "elongation": 0.0, "strain": 0.0, "stress": 0.0}]
//! }}
//! ```
//!
//! A failed one carries a message, either as `{"error": {"cause", "message"}}`
//! or as a bare `{"message"}`.

mod types;

pub use types::*;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::analytics::AnalyticsSummary;
use crate::dsl::StructuralModel;
use crate::error::Result;

/// The external solver.
///
/// Implementations perform a single blocking request: no retries, batching
/// or cancellation.
pub trait Solver {
    /// Solve the structure described by `raw_text`.
    ///
    /// A rejected solve is reported as [`TrussError::Solve`](crate::TrussError::Solve).
    fn solve(&self, raw_text: &str) -> Result<Solution>;
}

/// A solver that replays a recorded response.
#[derive(Debug, Clone)]
pub struct RecordedSolver {
    status: u16,
    body: String,
}

impl RecordedSolver {
    /// Replay `body` as a response with the given status code.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Replay `body` as a successful response.
    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(200, body)
    }
}

impl Solver for RecordedSolver {
    fn solve(&self, _raw_text: &str) -> Result<Solution> {
        decode_response(self.status, &self.body)
    }
}

#[derive(Deserialize)]
struct SuccessBody {
    data: Solution,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FailureBody {
    Nested { error: ErrorDetail },
    Flat { message: String },
}

#[derive(Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    cause: Option<String>,
    message: String,
}

/// Decode a solver response.
///
/// 2xx responses must hold a solution; any other status becomes a
/// [`TrussError::Solve`](crate::TrussError::Solve) carrying the solver's
/// message (or the raw body when it is not a recognised error payload).
pub fn decode_response(status: u16, body: &str) -> Result<Solution> {
    if (200..300).contains(&status) {
        let SuccessBody { data } = serde_json::from_str(body)?;
        debug!(
            nodes = data.nodes.len(),
            bars = data.bars.len(),
            "decoded solution"
        );
        return Ok(data);
    }

    let failure = match serde_json::from_str::<FailureBody>(body) {
        Ok(FailureBody::Nested { error }) => SolveFailure {
            cause: error.cause,
            ..SolveFailure::new(error.message)
        },
        Ok(FailureBody::Flat { message }) => SolveFailure::new(message),
        Err(_) => SolveFailure::new(body.trim()),
    };
    Err(SolveFailure {
        status: Some(status),
        ..failure
    }
    .into())
}

/// A solution together with the statistics derived from it.
#[derive(Debug, Clone)]
pub struct SolvedStructure {
    pub solution: Solution,
    pub meta: AnalyticsSummary,
}

/// Send the definition text to the solver and analyse the result.
///
/// The solver gets the raw lines, not the parsed model; the model is only
/// used to interpret the solution.
pub fn solve_structure<S: AsRef<str>>(
    solver: &dyn Solver,
    structure: &StructuralModel,
    lines: &[S],
) -> Result<SolvedStructure> {
    let raw_text = lines
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join("\n");

    let solution = solver.solve(&raw_text).map_err(|err| {
        warn!(error = %err, "solve failed");
        err
    })?;

    let meta = AnalyticsSummary::compute(&solution, structure).map_err(|err| {
        warn!(error = %err, "cannot analyse solution");
        err
    })?;

    Ok(SolvedStructure { solution, meta })
}
