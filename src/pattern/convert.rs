use tracing::debug;

use crate::error::{OperationError, Result};
use crate::geometry::{Line, Point};
use crate::tiling::{Domain, DomainClass, Grid};

use super::{LineGroup, PatternDefinition};

/// Fallback length for groups that carry neither dashes nor spacing.
const DEFAULT_LENGTH: f64 = 10.0;

/// Below this a delta or extent is treated as absent.
const EPSILON: f64 = 1e-6;

/// Projected dash extents below this are replaced by the dash length.
const MIN_PROJECTION: f64 = 1e-3;

const MIN_SEGMENT: f64 = 1.0;
const MAX_SEGMENT: f64 = 1000.0;

/// A pattern definition resolved into one domain and one grid per line group.
#[derive(Debug, Clone)]
pub struct ConvertedPattern {
    source: PatternDefinition,
    domain: Domain,
    grids: Vec<Grid>,
}

impl ConvertedPattern {
    /// The definition this pattern was converted from.
    #[must_use]
    pub fn source(&self) -> &PatternDefinition {
        &self.source
    }

    /// The shared tiling domain.
    #[must_use]
    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    /// One grid per line group, in definition order.
    #[must_use]
    pub fn grids(&self) -> &[Grid] {
        &self.grids
    }
}

/// Converts a [`PatternDefinition`] into safe grids.
///
/// The domain is sized from the largest line-group spacing and is never
/// expanded.
pub struct ConvertPattern<'a> {
    definition: &'a PatternDefinition,
    force_model: bool,
}

impl<'a> ConvertPattern<'a> {
    /// Creates a new `ConvertPattern` operation.
    #[must_use]
    pub fn new(definition: &'a PatternDefinition) -> Self {
        Self {
            definition,
            force_model: false,
        }
    }

    /// Treats the pattern as a model pattern regardless of its definition.
    #[must_use]
    pub fn force_model(mut self, force_model: bool) -> Self {
        self.force_model = force_model;
        self
    }

    /// Executes the conversion.
    ///
    /// # Errors
    ///
    /// Returns an error if the definition has no line groups or the derived
    /// domain is degenerate.
    pub fn execute(&self) -> Result<ConvertedPattern> {
        let groups = &self.definition.line_groups;
        if groups.is_empty() {
            return Err(OperationError::InvalidInput(format!(
                "pattern '{}' has no line groups",
                self.definition.name
            ))
            .into());
        }

        let (max_u, max_v) = domain_extent(groups);
        let class = DomainClass::from_model_flag(self.force_model || self.definition.is_model);
        let mut domain = Domain::new(0.0, 0.0, max_u, max_v, class, false)?;
        debug!(pattern = %self.definition.name, %domain, "built pattern domain");

        let grids = groups
            .iter()
            .map(|group| Grid::new(&mut domain, group_line(group)))
            .collect::<Result<Vec<_>>>()?;

        Ok(ConvertedPattern {
            source: self.definition.clone(),
            domain,
            grids,
        })
    }
}

/// Largest U and V spacing over all groups.
///
/// Groups without spacing fall back to their first dash projected onto the
/// group angle.
fn domain_extent(groups: &[LineGroup]) -> (f64, f64) {
    let (mut max_u, mut max_v) = (0.0_f64, 0.0_f64);
    for group in groups {
        let mut du = group.delta_u.abs();
        let mut dv = group.delta_v.abs();
        if du < EPSILON && dv < EPSILON {
            let dash = group.first_positive_dash().unwrap_or(DEFAULT_LENGTH);
            du = (dash * group.angle().cos()).abs();
            dv = (dash * group.angle().sin()).abs();
            if du < MIN_PROJECTION {
                du = dash;
            }
            if dv < MIN_PROJECTION {
                dv = dash;
            }
        }
        max_u = max_u.max(du);
        max_v = max_v.max(dv);
    }
    if max_u < EPSILON {
        max_u = DEFAULT_LENGTH;
    }
    if max_v < EPSILON {
        max_v = DEFAULT_LENGTH;
    }
    (max_u, max_v)
}

/// Representative line of a group: from its origin along its angle.
fn group_line(group: &LineGroup) -> Line {
    let length = segment_length(group);
    let (sin, cos) = group.angle().sin_cos();
    let start = Point::new(group.origin_u, group.origin_v);
    let end = Point::new(group.origin_u + cos * length, group.origin_v + sin * length);
    Line::new(start, end)
}

fn segment_length(group: &LineGroup) -> f64 {
    let drawn: Vec<f64> = group.dashes.iter().copied().filter(|&d| d > 0.0).collect();
    if !drawn.is_empty() {
        return drawn.iter().sum::<f64>().clamp(MIN_SEGMENT, MAX_SEGMENT);
    }
    let spacing = group.delta_u.hypot(group.delta_v);
    if spacing > EPSILON {
        return spacing.clamp(MIN_SEGMENT, MAX_SEGMENT);
    }
    DEFAULT_LENGTH
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::error::HatchError;

    #[test]
    fn empty_definition_is_rejected() {
        let definition = PatternDefinition::new("EMPTY", true, vec![]);
        let result = ConvertPattern::new(&definition).execute();
        assert!(matches!(
            result,
            Err(HatchError::Operation(OperationError::InvalidInput(_)))
        ));
    }

    #[test]
    fn extent_uses_largest_spacing() {
        let groups = vec![
            LineGroup::new(0.0, 0.0, 0.0, 0.0, 2.0),
            LineGroup::new(90.0, 0.0, 0.0, 3.0, 0.5),
        ];
        let (u, v) = domain_extent(&groups);
        assert_abs_diff_eq!(u, 3.0);
        assert_abs_diff_eq!(v, 2.0);
    }

    #[test]
    fn extent_falls_back_to_projected_dash() {
        let groups = vec![LineGroup::new(0.0, 0.0, 0.0, 0.0, 0.0).with_dashes(vec![4.0, -1.0])];
        let (u, v) = domain_extent(&groups);
        assert_abs_diff_eq!(u, 4.0);
        // The V projection of a horizontal dash vanishes and is replaced.
        assert_abs_diff_eq!(v, 4.0);

        let groups = vec![LineGroup::new(30.0, 0.0, 0.0, 0.0, 0.0).with_dashes(vec![2.0])];
        let (u, v) = domain_extent(&groups);
        assert_abs_diff_eq!(u, 3.0_f64.sqrt(), epsilon = 1e-12);
        assert_abs_diff_eq!(v, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn extent_defaults_when_nothing_is_known() {
        let groups = vec![LineGroup::new(45.0, 0.0, 0.0, 0.0, 0.0)];
        let (u, v) = domain_extent(&groups);
        assert_abs_diff_eq!(u, 10.0 * FRAC_PI_4.cos(), epsilon = 1e-12);
        assert_abs_diff_eq!(v, 10.0 * FRAC_PI_4.sin(), epsilon = 1e-12);
    }

    #[test]
    fn segment_length_prefers_dashes_then_spacing() {
        let dashed = LineGroup::new(0.0, 0.0, 0.0, 0.0, 1.0).with_dashes(vec![0.25, -0.5, 0.5]);
        assert_abs_diff_eq!(segment_length(&dashed), 1.0);
        let long = LineGroup::new(0.0, 0.0, 0.0, 0.0, 1.0).with_dashes(vec![800.0, 900.0]);
        assert_abs_diff_eq!(segment_length(&long), 1000.0);
        let spaced = LineGroup::new(0.0, 0.0, 0.0, 3.0, 4.0);
        assert_abs_diff_eq!(segment_length(&spaced), 5.0);
        let bare = LineGroup::new(0.0, 0.0, 0.0, 0.0, 0.0);
        assert_abs_diff_eq!(segment_length(&bare), 10.0);
    }

    #[test]
    fn converts_crosshatch() {
        let definition = PatternDefinition::new(
            "CROSSHATCH",
            false,
            vec![
                LineGroup::new(0.0, 0.0, 0.0, 0.0, 3.0),
                LineGroup::new(90.0, 0.0, 0.0, 0.0, 3.0),
            ],
        );
        let converted = ConvertPattern::new(&definition).execute().unwrap();
        assert_eq!(converted.source().name, "CROSSHATCH");
        // Neither group spaces along U, so the width falls back to the default.
        assert_abs_diff_eq!(converted.domain().width(), 10.0);
        assert_abs_diff_eq!(converted.domain().max_extent(), 10.0);
        assert!(!converted.domain().is_expandable());

        let grids = converted.grids();
        assert_eq!(grids.len(), 2);
        assert_abs_diff_eq!(grids[0].angle(), 0.0);
        assert_abs_diff_eq!(grids[1].angle(), FRAC_PI_2, epsilon = 1e-12);
        assert_abs_diff_eq!(grids[0].segments()[0], 3.0, epsilon = 1e-9);
    }

    #[test]
    fn force_model_selects_model_extent() {
        let definition =
            PatternDefinition::new("DIAG", false, vec![LineGroup::new(45.0, 0.0, 0.0, 0.0, 2.0)]);
        let converted = ConvertPattern::new(&definition).force_model(true).execute().unwrap();
        assert_abs_diff_eq!(converted.domain().max_extent(), 100.0);
        assert_eq!(converted.grids().len(), 1);
    }
}
