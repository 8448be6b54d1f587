//! Drawing geometry: the canvas bounds of a structure and its solution, and
//! the placement of bar labels.

use std::collections::HashMap;

use serde::Serialize;

use crate::dsl::{Point, StructuralModel};
use crate::solution::Solution;

/// Scales and margin used to lay out a drawing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeOptions {
    /// Blank space around the drawing, on every side
    pub margin: f64,
    /// Geometry scale
    pub scale: f64,
    /// Drawn length per unit of load
    pub loads_scale: f64,
    /// Displacement amplification of the solved geometry
    pub solution_scale: f64,
    /// Drawn length per unit of reaction
    pub reactions_scale: f64,
}

impl Default for SizeOptions {
    fn default() -> Self {
        Self {
            margin: 0.0,
            scale: 1.0,
            loads_scale: 1.0,
            solution_scale: 1.0,
            reactions_scale: 1.0,
        }
    }
}

impl SizeOptions {
    /// Create options with no margin and every scale at 1.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_loads_scale(mut self, loads_scale: f64) -> Self {
        self.loads_scale = loads_scale;
        self
    }

    /// Set the displacement amplification.
    ///
    /// Usually the `suggested_scale` of the displacement summary.
    pub fn with_solution_scale(mut self, solution_scale: f64) -> Self {
        self.solution_scale = solution_scale;
        self
    }

    /// Set the reaction scale.
    ///
    /// Usually the `suggested_scale` of the reaction summary.
    pub fn with_reactions_scale(mut self, reactions_scale: f64) -> Self {
        self.reactions_scale = reactions_scale;
        self
    }
}

/// Canvas size and placement for a drawing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DrawingBounds {
    pub width: f64,
    pub height: f64,
    /// Smallest x, minus the margin
    pub left: f64,
    /// Smallest y, minus the margin
    pub top: f64,
    pub margin: f64,
    /// Extent along x, `None` for an empty structure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<[f64; 2]>,
    /// Extent along y, `None` for an empty structure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<[f64; 2]>,
}

/// Axis-aligned box grown one point at a time.
#[derive(Debug, Clone, Copy)]
struct Extent {
    min: Point,
    max: Point,
}

impl Extent {
    fn at(point: Point) -> Self {
        Self {
            min: point,
            max: point,
        }
    }

    fn include(&mut self, point: Point) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
    }
}

/// Bounds of everything a drawing shows.
///
/// Covers every node, the tip of every load arrow, and, when a solution is
/// given, every displaced node (amplified by `solution_scale`) and the tip of
/// its reaction arrow. An empty structure gets a zero-size box at the origin.
pub fn structure_bounds(
    structure: &StructuralModel,
    solution: Option<&Solution>,
    options: &SizeOptions,
) -> DrawingBounds {
    let Some(first) = structure.nodes().first() else {
        return DrawingBounds {
            width: 0.0,
            height: 0.0,
            left: 0.0,
            top: 0.0,
            margin: options.margin,
            x: None,
            y: None,
        };
    };

    let mut extent = Extent::at(first.pos);
    for node in structure.nodes() {
        extent.include(node.pos);
        for load in &node.loads {
            extent.include(node.pos.displaced(load.fx, load.fy, options.loads_scale));
        }
    }

    for node in solution.map(|s| s.nodes.as_slice()).unwrap_or_default() {
        let displaced = node.displaced_pos(options.solution_scale);
        extent.include(displaced);
        if let Some(reaction) = &node.reaction {
            extent.include(displaced.displaced(reaction.x, reaction.y, options.reactions_scale));
        }
    }

    let margin = options.margin;
    DrawingBounds {
        width: options.scale * (extent.max.x - extent.min.x) + 2.0 * margin,
        height: options.scale * (extent.max.y - extent.min.y) + 2.0 * margin,
        left: extent.min.x - margin,
        top: extent.min.y - margin,
        margin,
        x: Some([extent.min.x, extent.max.x]),
        y: Some([extent.min.y, extent.max.y]),
    }
}

/// Placement of a bar label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelTransform {
    /// SVG transform applied around the label center
    pub transform: String,
    /// Label center x
    pub cx: f64,
    /// Label center y
    pub cy: f64,
}

/// Place a label along the segment from `start` to `end`.
///
/// The label sits at the rounded midpoint, rotated with the segment but never
/// upside down, and pushed `separation` units off the segment. The trailing
/// `scale(1, -1)` undoes the y flip of a drawing whose y axis points up.
pub fn label_transform(start: Point, end: Point, separation: f64) -> LabelTransform {
    let cx = round_half_up((start.x + end.x) / 2.0);
    let cy = round_half_up((start.y + end.y) / 2.0);

    let angle = (end.y - start.y).atan2(end.x - start.x).to_degrees();
    let readable = if angle > 90.0 {
        angle - 180.0
    } else if angle < -90.0 {
        angle + 180.0
    } else {
        angle
    };

    LabelTransform {
        transform: format!(
            "rotate({:.3}) translate(0, {}) scale(1, -1)",
            readable, separation
        ),
        cx,
        cy,
    }
}

/// Label placement of every bar whose nodes are declared, keyed by bar id.
pub fn bar_labels(
    structure: &StructuralModel,
    separation: f64,
) -> HashMap<String, LabelTransform> {
    structure
        .bars()
        .iter()
        .filter_map(|bar| {
            let (start, end) = structure.bar_nodes(bar)?;
            Some((bar.id.clone(), label_transform(start.pos, end.pos, separation)))
        })
        .collect()
}

fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsl;
    use crate::solution::{NodePosition, NodeSolution, Reaction};

    fn solved(
        id: &str,
        original: Point,
        displaced: Point,
        reaction: Option<Reaction>,
    ) -> NodeSolution {
        NodeSolution {
            id: id.to_string(),
            position: NodePosition {
                original,
                displaced,
            },
            reaction,
        }
    }

    #[test]
    fn test_empty_structure_bounds() {
        let structure = StructuralModel::default();
        let bounds = structure_bounds(&structure, None, &SizeOptions::new().with_margin(20.0));
        assert_eq!(bounds.width, 0.0);
        assert_eq!(bounds.height, 0.0);
        assert_eq!(bounds.left, 0.0);
        assert_eq!(bounds.top, 0.0);
        assert_eq!(bounds.margin, 20.0);
        assert!(bounds.x.is_none());
    }

    #[test]
    fn test_bounds_include_loads() {
        let outcome = dsl::parse("nodes\n1: (0, 0) (xy)\n2: (4, 2) ()\nloads\n2 -> (0, -10)");
        let options = SizeOptions::new().with_loads_scale(0.5).with_margin(1.0);
        let bounds = structure_bounds(&outcome.structure, None, &options);

        assert_eq!(bounds.x, Some([0.0, 4.0]));
        assert_eq!(bounds.y, Some([-3.0, 2.0]));
        assert_eq!(bounds.width, 6.0);
        assert_eq!(bounds.height, 7.0);
        assert_eq!(bounds.left, -1.0);
        assert_eq!(bounds.top, -4.0);
    }

    #[test]
    fn test_bounds_include_solution_and_reactions() {
        let outcome = dsl::parse("nodes\n1: (0, 0) (xy)\n2: (4, 0) ()");
        let solution = Solution {
            nodes: vec![
                solved(
                    "1",
                    Point::new(0.0, 0.0),
                    Point::new(0.0, 0.0),
                    Some(Reaction { x: -1.0, y: 2.0 }),
                ),
                solved("2", Point::new(4.0, 0.0), Point::new(4.0, -0.25), None),
            ],
            bars: Vec::new(),
        };
        let options = SizeOptions::new()
            .with_scale(2.0)
            .with_solution_scale(10.0)
            .with_reactions_scale(3.0);
        let bounds = structure_bounds(&outcome.structure, Some(&solution), &options);

        assert_eq!(bounds.x, Some([-3.0, 4.0]));
        assert_eq!(bounds.y, Some([-2.5, 6.0]));
        assert_eq!(bounds.width, 14.0);
        assert_eq!(bounds.height, 17.0);
    }

    #[test]
    fn test_displaced_position_scales_from_original() {
        let node = solved("1", Point::new(1.0, 1.0), Point::new(1.5, 0.75), None);
        assert_eq!(node.displaced_pos(0.0), Point::new(1.0, 1.0));
        assert_eq!(node.displaced_pos(1.0), Point::new(1.5, 0.75));
        assert_eq!(node.displaced_pos(4.0), Point::new(3.0, 0.0));
    }

    #[test]
    fn test_label_transform() {
        let label = label_transform(Point::new(0.0, 0.0), Point::new(4.0, 3.0), 15.0);
        assert_eq!(label.cx, 2.0);
        assert_eq!(label.cy, 2.0);
        assert_eq!(
            label.transform,
            "rotate(36.870) translate(0, 15) scale(1, -1)"
        );
    }

    #[test]
    fn test_bar_labels() {
        let outcome = dsl::parse(
            "nodes\n1: (0, 0) (xy)\n2: (4, 3) ()\nbars\n1: (1 -> 2) 1 1\n2: (2 -> 9) 1 1",
        );
        let labels = bar_labels(&outcome.structure, 15.0);
        assert_eq!(labels.len(), 1);
        assert_eq!(
            labels["1"],
            label_transform(Point::new(0.0, 0.0), Point::new(4.0, 3.0), 15.0)
        );
    }

    #[test]
    fn test_label_transform_never_upside_down() {
        let label = label_transform(Point::new(4.0, 0.0), Point::new(0.0, 3.0), 10.0);
        assert_eq!(label.transform, "rotate(-36.870) translate(0, 10) scale(1, -1)");
        assert_eq!(label.cx, 2.0);
        assert_eq!(label.cy, 2.0);

        let label = label_transform(Point::new(0.0, 0.0), Point::new(-1.0, -1.0), 10.0);
        assert_eq!(label.transform, "rotate(45.000) translate(0, 10) scale(1, -1)");
    }
}
