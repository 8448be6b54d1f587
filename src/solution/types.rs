//! Solution payload returned by the solver.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::dsl::Point;

/// Solved structure: node displacements and reactions, bar stresses.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Solution {
    pub nodes: Vec<NodeSolution>,
    pub bars: Vec<BarSolution>,
}

impl Solution {
    /// Look up a solved node by id.
    pub fn node(&self, id: &str) -> Option<&NodeSolution> {
        self.nodes.iter().find(|node| node.id == id)
    }

    /// Look up a solved bar by id.
    pub fn bar(&self, id: &str) -> Option<&BarSolution> {
        self.bars.iter().find(|bar| bar.id == id)
    }
}

/// Original and displaced position of a node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodePosition {
    pub original: Point,
    pub displaced: Point,
}

/// Support reaction at a constrained node.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Reaction {
    pub x: f64,
    pub y: f64,
}

impl Reaction {
    /// Magnitude of the reaction force.
    pub fn magnitude(&self) -> f64 {
        self.x.hypot(self.y)
    }
}

/// A solved node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSolution {
    #[serde(deserialize_with = "id_text")]
    pub id: String,
    pub position: NodePosition,
    /// Present only for constrained nodes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reaction: Option<Reaction>,
}

impl NodeSolution {
    /// Distance between the original and displaced positions.
    pub fn displacement(&self) -> f64 {
        self.position.original.distance_to(&self.position.displaced)
    }

    /// Position along the displacement, `scale` times as far as the solved one.
    ///
    /// A scale of 1 gives the solved displaced position, 0 the original one.
    pub fn displaced_pos(&self, scale: f64) -> Point {
        let NodePosition {
            original,
            displaced,
        } = self.position;
        original.displaced(displaced.x - original.x, displaced.y - original.y, scale)
    }
}

/// Ends of a solved bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarEnds {
    #[serde(deserialize_with = "id_text")]
    pub start: String,
    #[serde(deserialize_with = "id_text")]
    pub end: String,
}

/// Whether a bar is stretched or compressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axial {
    Tension,
    Compression,
}

/// A solved bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarSolution {
    #[serde(deserialize_with = "id_text")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nodes: Option<BarEnds>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub axial: Option<Axial>,
    #[serde(default)]
    pub elongation: f64,
    #[serde(default)]
    pub strain: f64,
    /// Signed axial stress, positive in tension
    pub stress: f64,
}

impl BarSolution {
    /// Axial state, derived from the stress sign when the solver omits it.
    pub fn axial(&self) -> Axial {
        self.axial.unwrap_or(if self.stress >= 0.0 {
            Axial::Tension
        } else {
            Axial::Compression
        })
    }
}

/// Error payload of a failed solve, with whatever transport details came
/// with it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SolveFailure {
    /// Error message from the solver
    pub message: String,
    /// What the solver blamed, e.g. `definition`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
    /// Response status code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// Response status text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_text: Option<String>,
    /// Address the solve was sent to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl SolveFailure {
    /// Create a failure from its message alone.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    pub fn with_status(mut self, status: u16, status_text: impl Into<String>) -> Self {
        self.status = Some(status);
        self.status_text = Some(status_text.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

impl fmt::Display for SolveFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;
        match (self.status, &self.status_text) {
            (Some(status), Some(text)) if !text.is_empty() => write!(f, " ({} {})", status, text)?,
            (Some(status), _) => write!(f, " ({})", status)?,
            _ => {}
        }
        if let Some(url) = &self.url {
            write!(f, " from {}", url)?;
        }
        Ok(())
    }
}

impl std::error::Error for SolveFailure {}

/// Ids come back as JSON numbers from some solvers and as strings from others.
fn id_text<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(text) => text,
        RawId::Number(number) => number.to_string(),
    })
}
