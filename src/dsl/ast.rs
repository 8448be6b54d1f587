//! Structural model produced by the DSL parser.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A point (or free vector) in the plane.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a new point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// This point moved by `(dx, dy)` scaled by `scale`.
    pub fn displaced(&self, dx: f64, dy: f64, scale: f64) -> Point {
        Point::new(self.x + dx * scale, self.y + dy * scale)
    }
}

/// Support condition of a node, per axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Constraint {
    /// Displacement along x is fixed
    pub x: bool,
    /// Displacement along y is fixed
    pub y: bool,
}

impl Constraint {
    /// Read constraint letters such as `"xy"`, `"y"` or `""`.
    pub fn from_flags(flags: &str) -> Self {
        Self {
            x: flags.contains('x'),
            y: flags.contains('y'),
        }
    }

    /// Constraint letters in canonical order.
    pub fn flags(&self) -> &'static str {
        match (self.x, self.y) {
            (true, true) => "xy",
            (true, false) => "x",
            (false, true) => "y",
            (false, false) => "",
        }
    }
}

/// An external force applied to a node.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Load {
    pub fx: f64,
    pub fy: f64,
}

/// A truss node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    /// Identifier as written in the definition
    pub id: String,
    /// Position
    pub pos: Point,
    /// Support condition
    pub constraint: Constraint,
    /// Loads in definition order
    pub loads: Vec<Load>,
}

impl Node {
    /// Create an unloaded node.
    pub fn new(id: impl Into<String>, pos: Point, constraint: Constraint) -> Self {
        Self {
            id: id.into(),
            pos,
            constraint,
            loads: Vec::new(),
        }
    }

    pub fn is_x_constrained(&self) -> bool {
        self.constraint.x
    }

    pub fn is_y_constrained(&self) -> bool {
        self.constraint.y
    }

    pub fn is_fully_constrained(&self) -> bool {
        self.constraint.x && self.constraint.y
    }

    /// Sum of all loads applied to the node.
    pub fn net_load(&self) -> Load {
        self.loads.iter().fold(Load::default(), |acc, load| Load {
            fx: acc.fx + load.fx,
            fy: acc.fy + load.fy,
        })
    }
}

/// A truss bar joining two nodes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bar {
    /// Identifier as written in the definition
    pub id: String,
    /// Start node identifier
    pub start_node_id: String,
    /// End node identifier
    pub end_node_id: String,
    /// Cross-sectional area
    pub section: f64,
    /// Young modulus
    pub young: f64,
}

/// A load read from the `loads` section, not yet attached to its node.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingLoad {
    /// Target node identifier
    pub node_id: String,
    /// The force
    pub load: Load,
    /// Source line number for error reporting
    pub line: usize,
}

/// A problem found on one line of the definition.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("line {line}: {message}")]
pub struct ParseError {
    /// Line number (1-indexed)
    pub line: usize,
    /// Human readable description
    pub message: String,
}

impl ParseError {
    /// Create a new parse error.
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

/// The parsed structure: nodes, bars and a node lookup by id.
///
/// The lookup is rebuilt from the node list on construction and the node list
/// can only be read, so the two never disagree.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StructuralModel {
    nodes: Vec<Node>,
    bars: Vec<Bar>,
    #[serde(skip)]
    nodes_by_id: HashMap<String, usize>,
}

impl StructuralModel {
    /// Build a model from its nodes and bars.
    ///
    /// When two nodes share an id the first one wins the lookup; the parser
    /// never produces such a list.
    pub fn new(nodes: Vec<Node>, bars: Vec<Bar>) -> Self {
        let nodes_by_id = index_by_id(&nodes);
        Self {
            nodes,
            bars,
            nodes_by_id,
        }
    }

    /// Nodes in definition order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Bars in definition order.
    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    /// Look up a node by id.
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes_by_id.get(id).map(|&index| &self.nodes[index])
    }

    /// Check whether a node id is declared.
    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes_by_id.contains_key(id)
    }

    /// Look up a bar by id.
    pub fn bar(&self, id: &str) -> Option<&Bar> {
        self.bars.iter().find(|bar| bar.id == id)
    }

    /// Start and end nodes of a bar.
    pub fn bar_nodes(&self, bar: &Bar) -> Option<(&Node, &Node)> {
        Some((self.node(&bar.start_node_id)?, self.node(&bar.end_node_id)?))
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.bars.is_empty()
    }
}

impl PartialEq for StructuralModel {
    fn eq(&self, other: &Self) -> bool {
        self.nodes == other.nodes && self.bars == other.bars
    }
}

/// Writes the canonical text form of the model, which parses back to an
/// equal model.
impl fmt::Display for StructuralModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "nodes")?;
        for node in &self.nodes {
            writeln!(
                f,
                "{}: ({}, {}) ({})",
                node.id,
                node.pos.x,
                node.pos.y,
                node.constraint.flags()
            )?;
        }

        writeln!(f, "loads")?;
        for node in &self.nodes {
            for load in &node.loads {
                writeln!(f, "{} -> ({}, {})", node.id, load.fx, load.fy)?;
            }
        }

        writeln!(f, "bars")?;
        for bar in &self.bars {
            writeln!(
                f,
                "{}: ({} -> {}) {} {}",
                bar.id, bar.start_node_id, bar.end_node_id, bar.section, bar.young
            )?;
        }

        Ok(())
    }
}

fn index_by_id(nodes: &[Node]) -> HashMap<String, usize> {
    let mut index = HashMap::with_capacity(nodes.len());
    for (position, node) in nodes.iter().enumerate() {
        index.entry(node.id.clone()).or_insert(position);
    }
    index
}
