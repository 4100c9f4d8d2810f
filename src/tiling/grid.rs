use std::f64::consts::FRAC_PI_2;
use std::fmt;

use tracing::debug;

use crate::error::{GridError, Result};
use crate::geometry::{Line, Point};

use super::{Domain, SafeGrid};

/// A pattern line snapped onto the closest safe grid of its domain.
#[derive(Debug, Clone)]
pub struct Grid {
    safe_grid: SafeGrid,
    angle: f64,
    span: f64,
    offset: f64,
    shift: f64,
    domain_width: f64,
    segment_lines: Vec<Line>,
}

impl Grid {
    /// Resolves the safe grid for `line` and rotates the line about its
    /// center onto that grid's angle.
    ///
    /// The domain may expand while searching (see [`Domain::best_angle`]).
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidGrid`] if the selected candidate has no
    /// resolvable shift.
    pub fn new(domain: &mut Domain, mut line: Line) -> Result<Self> {
        let line_angle = line.angle();
        let safe_grid = domain.best_angle(line_angle).clone();
        debug!(grid = %safe_grid, "closest safe angle");

        let shift = safe_grid.shift().ok_or(GridError::InvalidGrid {
            u_tiles: safe_grid.u_tiles(),
            v_tiles: safe_grid.v_tiles(),
        })?;
        let angle = safe_grid.grid_angle();

        let center = line.center_point();
        line.rotate(angle - line_angle, Some(&center));

        Ok(Self {
            angle,
            span: safe_grid.span(),
            offset: safe_grid.offset(),
            shift,
            domain_width: domain.width(),
            segment_lines: vec![line],
            safe_grid,
        })
    }

    /// The selected safe grid.
    #[must_use]
    pub fn safe_grid(&self) -> &SafeGrid {
        &self.safe_grid
    }

    /// Grid line angle, in radians.
    #[must_use]
    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// Repeat period along the grid direction.
    #[must_use]
    pub fn span(&self) -> f64 {
        self.span
    }

    /// Signed spacing between parallel grid lines.
    #[must_use]
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Along-axis shift between consecutive parallel lines.
    #[must_use]
    pub fn shift(&self) -> f64 {
        self.shift
    }

    /// The rotated segment lines owned by this grid.
    #[must_use]
    pub fn segment_lines(&self) -> &[Line] {
        &self.segment_lines
    }

    /// Tiling anchor: the segment endpoint closest to the domain corner the
    /// grid leans away from.
    ///
    /// Grids at or below `π/2` anchor at `(0, 0)`, steeper ones at
    /// `(width, 0)`.
    #[must_use]
    pub fn origin(&self) -> Point {
        let corner = if self.angle <= FRAC_PI_2 {
            Point::origin()
        } else {
            Point::new(self.domain_width, 0.0)
        };
        let mut endpoints = self
            .segment_lines
            .iter()
            .flat_map(|line| [line.start(), line.end()]);
        let mut best = endpoints.next().unwrap_or(corner);
        for point in endpoints {
            if point.distance_to(&corner) < best.distance_to(&corner) {
                best = point;
            }
        }
        best
    }

    /// Dash lengths of one period: the drawn segment, then the gap to the
    /// next repeat.
    #[must_use]
    pub fn segments(&self) -> [f64; 2] {
        let pen_down = self.segment_lines.first().map_or(0.0, Line::length);
        [pen_down, self.span - pen_down]
    }

    /// Merges an overlapping co-linear line into this grid.
    ///
    /// Merging is not supported yet; every line gets its own grid.
    #[allow(clippy::unused_self)]
    pub fn adopt_line(&mut self, _line: &Line) -> bool {
        false
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<Grid Angle:{} Span:{} Offset:{} Shift:{}>",
            self.angle, self.span, self.offset, self.shift
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::f64::consts::{FRAC_PI_4, PI};

    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::tiling::DomainClass;

    fn line(u0: f64, v0: f64, u1: f64, v1: f64) -> Line {
        Line::new(Point::new(u0, v0), Point::new(u1, v1))
    }

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    #[test]
    fn snaps_to_closest_candidate() {
        init_tracing();
        let mut domain = Domain::new(0.0, 0.0, 10.0, 5.0, DomainClass::Model, false).unwrap();
        let input = line(0.0, 0.0, 3.0, 3.0);
        let expected = domain.grid_params(input.angle()).clone();

        let grid = Grid::new(&mut domain, input).unwrap();
        assert_abs_diff_eq!(grid.angle(), expected.grid_angle());
        assert_abs_diff_eq!(grid.span(), expected.span());
        assert_abs_diff_eq!(grid.offset(), expected.offset());
        assert_abs_diff_eq!(grid.shift(), expected.shift().unwrap());
        // 10x5 has an exact 1:2 lattice point at 45°.
        assert_eq!((expected.u_tiles(), expected.v_tiles()), (1, 2));
        assert!(domain.required_correction(FRAC_PI_4) < 1e-12);
    }

    #[test]
    fn seeded_diagonal_scenario() {
        let mut domain = Domain::new(0.0, 0.0, 10.0, 5.0, DomainClass::Detail, false).unwrap();
        let grid = Grid::new(&mut domain, line(0.0, 0.0, 2.0, 2.0)).unwrap();
        assert_abs_diff_eq!(grid.angle(), 0.5_f64.atan(), epsilon = 1e-12);
        assert_abs_diff_eq!(grid.span(), 125.0_f64.sqrt(), epsilon = 1e-12);
        assert!(domain.required_correction(FRAC_PI_4) > 0.3);
        assert_abs_diff_eq!(grid.segment_lines()[0].angle(), grid.angle(), epsilon = 1e-9);
    }

    #[test]
    fn rotation_keeps_length_and_center() {
        let mut domain = Domain::new(0.0, 0.0, 10.0, 5.0, DomainClass::Detail, false).unwrap();
        let input = line(1.0, 1.0, 4.0, 3.0);
        let center = input.center_point();
        let grid = Grid::new(&mut domain, input).unwrap();
        let rotated = grid.segment_lines()[0];
        assert_abs_diff_eq!(rotated.length(), input.length(), epsilon = 1e-9);
        assert_abs_diff_eq!(rotated.center_point().u(), center.u(), epsilon = 1e-9);
        assert_abs_diff_eq!(rotated.center_point().v(), center.v(), epsilon = 1e-9);
    }

    #[test]
    fn segments_split_span_into_dash_and_gap() {
        let mut domain = Domain::new(0.0, 0.0, 10.0, 5.0, DomainClass::Model, false).unwrap();
        let grid = Grid::new(&mut domain, line(0.0, 1.0, 4.0, 1.0)).unwrap();
        assert_abs_diff_eq!(grid.angle(), 0.0);
        let [pen_down, pen_up] = grid.segments();
        assert_abs_diff_eq!(pen_down, 4.0, epsilon = 1e-12);
        assert_abs_diff_eq!(pen_up, 6.0, epsilon = 1e-12);
        assert_abs_diff_eq!(pen_down + pen_up, grid.span(), epsilon = 1e-12);
    }

    #[test]
    fn shallow_grid_anchors_at_domain_origin() {
        let mut domain = Domain::new(0.0, 0.0, 10.0, 5.0, DomainClass::Model, false).unwrap();
        let grid = Grid::new(&mut domain, line(6.0, 2.0, 2.0, 2.0)).unwrap();
        assert_eq!(grid.origin(), Point::new(2.0, 2.0));
    }

    #[test]
    fn steep_grid_anchors_at_far_corner() {
        let mut domain = Domain::new(0.0, 0.0, 10.0, 5.0, DomainClass::Model, false).unwrap();
        let grid = Grid::new(&mut domain, line(1.0, 4.0, 4.0, 1.0)).unwrap();
        assert!(grid.angle() > PI / 2.0);
        let origin = grid.origin();
        let lines = grid.segment_lines();
        let far = Point::new(10.0, 0.0);
        assert!(lines
            .iter()
            .flat_map(|l| [l.start(), l.end()])
            .all(|p| origin.distance_to(&far) <= p.distance_to(&far)));
        assert_abs_diff_eq!(origin.u(), 4.0, epsilon = 1e-9);
        assert_abs_diff_eq!(origin.v(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn expandable_domain_grows_for_grid() {
        let mut domain = Domain::new(0.0, 0.0, 1.0, 1.0, DomainClass::Detail, true).unwrap();
        let input = Line::new(Point::origin(), Point::new(0.3_f64.cos(), 0.3_f64.sin()));
        let grid = Grid::new(&mut domain, input).unwrap();
        assert!(domain.target_extent() > domain.max_extent());
        assert!((grid.angle() - 0.3).abs() < 0.01);
    }

    #[test]
    fn adopt_line_never_merges() {
        let mut domain = Domain::new(0.0, 0.0, 10.0, 5.0, DomainClass::Model, false).unwrap();
        let mut grid = Grid::new(&mut domain, line(0.0, 0.0, 1.0, 0.0)).unwrap();
        assert!(!grid.adopt_line(&line(1.0, 0.0, 2.0, 0.0)));
        assert_eq!(grid.segment_lines().len(), 1);
    }
}
