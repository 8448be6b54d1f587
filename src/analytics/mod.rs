//! Post-solution analytics.
//!
//! Turns a [`Solution`] into the numbers a drawing needs: the stress range,
//! displacement and reaction statistics with suggested drawing scales, and a
//! stroke width for every bar. See [`geometry`] for the drawing bounds.
//!
//! Everything here is recomputed from scratch for each solution. Inputs that
//! cannot produce a meaningful number (no bars, all-zero displacements or
//! reactions) are reported as [`TrussError::InsufficientData`] instead of
//! leaking NaN or infinity into the drawing.

pub mod geometry;

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, warn};

use crate::dsl::StructuralModel;
use crate::error::{Result, TrussError};
use crate::solution::{BarSolution, NodeSolution, Solution};

pub use geometry::{
    bar_labels, label_transform, structure_bounds, DrawingBounds, LabelTransform, SizeOptions,
};

/// Drawn length, in drawing units, of the median node displacement.
pub const TARGET_MEDIAN_DISPLACEMENT: f64 = 50.0;

/// Drawn length, in drawing units, of the largest reaction.
pub const TARGET_MAX_REACTION: f64 = 200.0;

/// Stroke width of the least stressed bar.
pub const MIN_STROKE_WIDTH: f64 = 2.0;

/// Stroke width of the most stressed bar.
pub const MAX_STROKE_WIDTH: f64 = 10.0;

/// Stroke widths are multiples of this step.
pub const STROKE_WIDTH_STEP: f64 = 0.25;

/// Stroke width of every bar when all bars carry the same stress.
pub const UNIFORM_STROKE_WIDTH: f64 = 6.0;

/// Range of absolute bar stresses.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StressRange {
    pub min: f64,
    pub max: f64,
}

impl StressRange {
    /// Check whether every bar carries the same absolute stress.
    pub fn is_uniform(&self) -> bool {
        self.max - self.min <= f64::EPSILON * self.max.abs()
    }
}

/// Maximum and median of a sample.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Percentiles {
    pub max: f64,
    pub p50: f64,
}

/// Percentiles of a sample plus the drawing scale they suggest.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaledPercentiles {
    pub max: f64,
    pub p50: f64,
    pub suggested_scale: f64,
}

/// Everything derived from one solution.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub stress: StressRange,
    pub displacement: ScaledPercentiles,
    pub reaction: ScaledPercentiles,
    pub bar_stroke_width: HashMap<String, f64>,
}

impl AnalyticsSummary {
    /// Compute the summary of a solution of `structure`.
    pub fn compute(solution: &Solution, structure: &StructuralModel) -> Result<Self> {
        for bar in &solution.bars {
            if structure.bar(&bar.id).is_none() {
                warn!(bar = %bar.id, "solution has a bar the definition does not declare");
            }
        }
        for node in &solution.nodes {
            if !structure.contains_node(&node.id) {
                warn!(node = %node.id, "solution has a node the definition does not declare");
            }
        }

        let stress = stress_range(&solution.bars)?;
        let displacement = displacement_summary(&solution.nodes)?;
        let reaction = reaction_summary(&solution.nodes)?;
        let bar_stroke_width = solution
            .bars
            .iter()
            .map(|bar| (bar.id.clone(), stroke_width(bar.stress, &stress)))
            .collect();

        debug!(
            stress_min = stress.min,
            stress_max = stress.max,
            displacement_p50 = displacement.p50,
            displacement_scale = displacement.suggested_scale,
            reaction_max = reaction.max,
            reaction_scale = reaction.suggested_scale,
            "computed solution analytics"
        );

        Ok(Self {
            stress,
            displacement,
            reaction,
            bar_stroke_width,
        })
    }
}

/// Minimum and maximum absolute stress over the bars.
pub fn stress_range(bars: &[BarSolution]) -> Result<StressRange> {
    let first = bars
        .first()
        .ok_or_else(|| TrussError::insufficient_data("no bars to compute a stress range"))?;
    let start = first.stress.abs();

    Ok(bars.iter().fold(
        StressRange {
            min: start,
            max: start,
        },
        |range, bar| StressRange {
            min: range.min.min(bar.stress.abs()),
            max: range.max.max(bar.stress.abs()),
        },
    ))
}

/// Maximum and median of a sample; both are zero for an empty sample.
///
/// ```
/// use truss_core::analytics::{percentile_summary, Percentiles};
///
/// assert_eq!(percentile_summary(&[]), Percentiles { max: 0.0, p50: 0.0 });
/// assert_eq!(percentile_summary(&[5.0]), Percentiles { max: 5.0, p50: 5.0 });
/// assert_eq!(percentile_summary(&[4.0, 1.0, 3.0, 2.0]), Percentiles { max: 4.0, p50: 2.5 });
/// ```
pub fn percentile_summary(samples: &[f64]) -> Percentiles {
    match samples {
        [] => Percentiles::default(),
        [only] => Percentiles {
            max: *only,
            p50: *only,
        },
        _ => {
            let mut sorted = samples.to_vec();
            sorted.sort_by(f64::total_cmp);

            let mid = sorted.len() / 2;
            let p50 = if sorted.len() % 2 == 0 {
                (sorted[mid - 1] + sorted[mid]) / 2.0
            } else {
                sorted[mid]
            };

            Percentiles {
                max: sorted[sorted.len() - 1],
                p50,
            }
        }
    }
}

/// Displacement statistics of the solved nodes.
///
/// The scale is sized on the median displacement. When at least half of the
/// nodes do not move, it is sized on the largest one instead, and only a
/// solution where no node moves has no scale.
pub fn displacement_summary(nodes: &[NodeSolution]) -> Result<ScaledPercentiles> {
    let displacements: Vec<f64> = nodes.iter().map(NodeSolution::displacement).collect();
    let Percentiles { max, p50 } = percentile_summary(&displacements);

    let suggested_scale = if p50 > 0.0 {
        displacement_scale(p50)?
    } else {
        debug!(max, "median displacement is 0, sizing on the largest one");
        displacement_scale(max)?
    };

    Ok(ScaledPercentiles {
        max,
        p50,
        suggested_scale,
    })
}

/// Reaction statistics of the constrained nodes.
pub fn reaction_summary(nodes: &[NodeSolution]) -> Result<ScaledPercentiles> {
    let reactions: Vec<f64> = nodes
        .iter()
        .filter_map(|node| node.reaction.as_ref())
        .map(|reaction| reaction.magnitude())
        .collect();
    let Percentiles { max, p50 } = percentile_summary(&reactions);

    Ok(ScaledPercentiles {
        max,
        p50,
        suggested_scale: reaction_scale(max)?,
    })
}

/// Smallest whole scale that draws a displacement of `reference` at least
/// [`TARGET_MEDIAN_DISPLACEMENT`] long.
pub fn displacement_scale(reference: f64) -> Result<f64> {
    if !(reference > 0.0 && reference.is_finite()) {
        return Err(TrussError::insufficient_data(format!(
            "displacement is {}, cannot suggest a displacement scale",
            reference
        )));
    }
    Ok((TARGET_MEDIAN_DISPLACEMENT / reference).ceil())
}

/// Scale, to four decimals, that draws the largest reaction
/// [`TARGET_MAX_REACTION`] long.
pub fn reaction_scale(max: f64) -> Result<f64> {
    if !(max > 0.0 && max.is_finite()) {
        return Err(TrussError::insufficient_data(format!(
            "largest reaction is {}, cannot suggest a reaction scale",
            max
        )));
    }
    Ok(round_to(TARGET_MAX_REACTION / max, 4))
}

/// Stroke width for a bar with the given stress.
///
/// The absolute stress is mapped linearly from the stress range onto
/// [`MIN_STROKE_WIDTH`]..=[`MAX_STROKE_WIDTH`] and rounded to the nearest
/// [`STROKE_WIDTH_STEP`].
pub fn stroke_width(stress: f64, range: &StressRange) -> f64 {
    if range.is_uniform() {
        return UNIFORM_STROKE_WIDTH;
    }

    let ratio = (stress.abs() - range.min) / (range.max - range.min);
    let width = MIN_STROKE_WIDTH + ratio * (MAX_STROKE_WIDTH - MIN_STROKE_WIDTH);
    (width / STROKE_WIDTH_STEP).round() * STROKE_WIDTH_STEP
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsl::{self, Point};
    use crate::solution::{NodePosition, Reaction};
    use approx::assert_relative_eq;

    fn bar(id: &str, stress: f64) -> BarSolution {
        BarSolution {
            id: id.to_string(),
            nodes: None,
            axial: None,
            elongation: 0.0,
            strain: 0.0,
            stress,
        }
    }

    fn node(
        id: &str,
        original: (f64, f64),
        displaced: (f64, f64),
        reaction: Option<(f64, f64)>,
    ) -> NodeSolution {
        NodeSolution {
            id: id.to_string(),
            position: NodePosition {
                original: Point::new(original.0, original.1),
                displaced: Point::new(displaced.0, displaced.1),
            },
            reaction: reaction.map(|(x, y)| Reaction { x, y }),
        }
    }

    #[test]
    fn test_percentile_summary() {
        assert_eq!(percentile_summary(&[]), Percentiles { max: 0.0, p50: 0.0 });
        assert_eq!(percentile_summary(&[5.0]), Percentiles { max: 5.0, p50: 5.0 });
        assert_eq!(
            percentile_summary(&[1.0, 2.0, 3.0, 4.0]),
            Percentiles { max: 4.0, p50: 2.5 }
        );
        assert_eq!(
            percentile_summary(&[9.0, 1.0, 3.0]),
            Percentiles { max: 9.0, p50: 3.0 }
        );
        // Numeric order, not text order
        assert_eq!(
            percentile_summary(&[10.0, 9.0, 100.0, 2.0]),
            Percentiles { max: 100.0, p50: 9.5 }
        );
    }

    #[test]
    fn test_stress_range_uses_absolute_values() {
        let range = stress_range(&[bar("1", -5.0), bar("2", 10.0), bar("3", -20.0)]).unwrap();
        assert_eq!(range, StressRange { min: 5.0, max: 20.0 });
    }

    #[test]
    fn test_stress_range_without_bars() {
        let err = stress_range(&[]).unwrap_err();
        assert!(matches!(err, TrussError::InsufficientData { .. }));
    }

    #[test]
    fn test_stroke_widths() {
        let range = StressRange { min: 5.0, max: 20.0 };
        assert_eq!(stroke_width(-5.0, &range), 2.0);
        assert_eq!(stroke_width(-20.0, &range), 10.0);
        // 2 + 8 * 5 / 15 = 4.67
        assert_eq!(stroke_width(10.0, &range), 4.75);
        assert_eq!(stroke_width(12.5, &range), 6.0);
    }

    #[test]
    fn test_uniform_stress_stroke_width() {
        let range = stress_range(&[bar("1", 7.0), bar("2", -7.0)]).unwrap();
        assert!(range.is_uniform());
        assert_eq!(stroke_width(7.0, &range), UNIFORM_STROKE_WIDTH);
    }

    #[test]
    fn test_displacement_summary() {
        let nodes = [
            node("1", (0.0, 0.0), (0.0, 0.0), Some((0.0, 5.0))),
            node("2", (4.0, 0.0), (4.0, -0.5), None),
            node("3", (8.0, 0.0), (8.0, -1.0), None),
        ];
        let summary = displacement_summary(&nodes).unwrap();
        assert_relative_eq!(summary.max, 1.0);
        assert_relative_eq!(summary.p50, 0.5);
        assert_eq!(summary.suggested_scale, 100.0);
    }

    #[test]
    fn test_displacement_scale_falls_back_to_max() {
        let nodes = [
            node("1", (0.0, 0.0), (0.0, 0.0), Some((0.0, 10.0))),
            node("2", (4.0, 0.0), (4.0, 0.0), Some((0.0, 10.0))),
            node("3", (2.0, 2.0), (2.0, 1.5), None),
        ];
        let summary = displacement_summary(&nodes).unwrap();
        assert_eq!(summary.p50, 0.0);
        assert_eq!(summary.max, 0.5);
        assert_eq!(summary.suggested_scale, 100.0);
    }

    #[test]
    fn test_displacement_summary_without_movement() {
        let nodes = [
            node("1", (0.0, 0.0), (0.0, 0.0), Some((0.0, 10.0))),
            node("2", (4.0, 0.0), (4.0, 0.0), Some((0.0, 10.0))),
        ];
        assert!(matches!(
            displacement_summary(&nodes),
            Err(TrussError::InsufficientData { .. })
        ));
    }

    #[test]
    fn test_summary_of_truss_on_two_pins() {
        let outcome = dsl::parse(
            "nodes\n1: (0, 0) (xy)\n2: (4, 0) (xy)\n3: (2, 2) ()\nloads\n3 -> (0, -10)\n\
             bars\n1: (1 -> 3) 1 1\n2: (2 -> 3) 1 1",
        );
        assert!(outcome.is_clean());

        let solution = Solution {
            nodes: vec![
                node("1", (0.0, 0.0), (0.0, 0.0), Some((5.0, 5.0))),
                node("2", (4.0, 0.0), (4.0, 0.0), Some((-5.0, 5.0))),
                node("3", (2.0, 2.0), (2.0, 1.5), None),
            ],
            bars: vec![bar("1", -7.07), bar("2", -7.07)],
        };

        let summary = AnalyticsSummary::compute(&solution, &outcome.structure).unwrap();
        assert_eq!(summary.stress, StressRange { min: 7.07, max: 7.07 });
        assert_eq!(summary.bar_stroke_width["1"], UNIFORM_STROKE_WIDTH);
        assert_eq!(summary.displacement.p50, 0.0);
        assert_eq!(summary.displacement.suggested_scale, 100.0);
        assert_relative_eq!(summary.reaction.max, 50f64.sqrt());
    }

    #[test]
    fn test_displacement_scale_rounds_up() {
        assert_eq!(displacement_scale(0.3).unwrap(), 167.0);
        assert_eq!(displacement_scale(100.0).unwrap(), 1.0);
        assert!(matches!(
            displacement_scale(0.0),
            Err(TrussError::InsufficientData { .. })
        ));
    }

    #[test]
    fn test_reaction_summary() {
        let nodes = [
            node("1", (0.0, 0.0), (0.0, 0.0), Some((3.0, 4.0))),
            node("2", (4.0, 0.0), (4.0, 0.0), None),
            node("3", (8.0, 0.0), (8.0, 0.0), Some((0.0, 15.0))),
        ];
        let summary = reaction_summary(&nodes).unwrap();
        assert_eq!(summary.max, 15.0);
        assert_eq!(summary.p50, 10.0);
        assert_eq!(summary.suggested_scale, 13.3333);
    }

    #[test]
    fn test_reaction_scale_guards_zero() {
        let nodes = [node("1", (0.0, 0.0), (0.0, 1.0), None)];
        assert!(matches!(
            reaction_summary(&nodes),
            Err(TrussError::InsufficientData { .. })
        ));
    }

    #[test]
    fn test_summary_of_solution() {
        let outcome = dsl::parse(
            "nodes\n1: (0, 0) (xy)\n2: (4, 0) (y)\n3: (2, 2) ()\nloads\n3 -> (0, -10)\n\
             bars\n1: (1 -> 2) 1 1\n2: (2 -> 3) 1 1\n3: (3 -> 1) 1 1",
        );
        assert!(outcome.is_clean());

        let solution = Solution {
            nodes: vec![
                node("1", (0.0, 0.0), (0.0, 0.0), Some((0.0, 5.0))),
                node("2", (4.0, 0.0), (4.001, 0.0), Some((0.0, 5.0))),
                node("3", (2.0, 2.0), (2.0005, 1.998), None),
            ],
            bars: vec![bar("1", 5.0), bar("2", -7.07), bar("3", -7.07)],
        };

        let summary = AnalyticsSummary::compute(&solution, &outcome.structure).unwrap();
        assert_eq!(summary.stress, StressRange { min: 5.0, max: 7.07 });
        assert_eq!(summary.bar_stroke_width["1"], 2.0);
        assert_eq!(summary.bar_stroke_width["2"], 10.0);
        assert_eq!(summary.bar_stroke_width.len(), 3);
        assert_relative_eq!(summary.displacement.p50, 0.001, epsilon = 1e-9);
        assert_eq!(summary.reaction.max, 5.0);
        assert_eq!(summary.reaction.suggested_scale, 40.0);
    }

    #[test]
    fn test_summary_serializes_camel_case() {
        let summary = AnalyticsSummary {
            stress: StressRange { min: 1.0, max: 2.0 },
            displacement: ScaledPercentiles {
                max: 1.0,
                p50: 0.5,
                suggested_scale: 100.0,
            },
            reaction: ScaledPercentiles {
                max: 4.0,
                p50: 4.0,
                suggested_scale: 50.0,
            },
            bar_stroke_width: HashMap::from([("1".to_string(), 2.0)]),
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["displacement"]["suggestedScale"], 100.0);
        assert_eq!(json["barStrokeWidth"]["1"], 2.0);
    }
}
