use std::f64::consts::{FRAC_PI_2, PI};
use std::fmt;

use tracing::warn;

use crate::geometry::{Line, Point};
use crate::math::ZERO_TOL;

/// Canonical "shallow axis" frame of a safe grid.
///
/// Axes steeper than the domain diagonal are mirrored into the frame of the
/// transposed domain, so the offset and shift formulas only ever deal with
/// angles at or below the diagonal.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Frame {
    offset_direction: f64,
    angle: f64,
    u_tiles: u32,
    v_tiles: u32,
    domain_u: f64,
    domain_v: f64,
}

impl Frame {
    fn resolve(
        axis_angle: f64,
        diagonal_angle: f64,
        bounds: Point,
        u_tiles: u32,
        v_tiles: u32,
        flipped: bool,
    ) -> Self {
        if axis_angle <= diagonal_angle {
            Self {
                offset_direction: if flipped { 1.0 } else { -1.0 },
                angle: axis_angle,
                u_tiles,
                v_tiles,
                domain_u: bounds.u(),
                domain_v: bounds.v(),
            }
        } else {
            Self {
                offset_direction: if flipped { -1.0 } else { 1.0 },
                angle: if flipped {
                    axis_angle - FRAC_PI_2
                } else {
                    FRAC_PI_2 - axis_angle
                },
                u_tiles: v_tiles,
                v_tiles: u_tiles,
                domain_u: bounds.v(),
                domain_v: bounds.u(),
            }
        }
    }

    fn offset(&self) -> f64 {
        if self.angle == 0.0 {
            self.domain_v * self.offset_direction
        } else {
            (self.domain_u * self.angle.sin() / f64::from(self.v_tiles)).abs()
                * self.offset_direction
        }
    }

    fn shift(&self) -> Option<f64> {
        if self.angle == 0.0 {
            return Some(0.0);
        }
        if self.u_tiles == 1 && self.v_tiles == 1 {
            return Some((self.domain_u * self.angle.cos()).abs());
        }

        let offset = self.offset();
        let offset_vector = Point::new(
            (offset * self.angle.sin()).abs(),
            -(offset * self.angle.cos()).abs(),
        );
        let axis_end = Point::new(
            self.domain_u * f64::from(self.u_tiles),
            self.domain_v * f64::from(self.v_tiles),
        );
        let offset_axis = Line::new(Point::origin() + offset_vector, axis_end + offset_vector);

        let Some(lattice_point) = self.next_lattice_point(&offset_axis) else {
            warn!(
                u_tiles = self.u_tiles,
                v_tiles = self.v_tiles,
                "can not determine next repeating grid"
            );
            return None;
        };
        Some(offset_axis.start().distance_to(&lattice_point))
    }

    /// First lattice point on `offset_axis`, scanning U outer and V inner.
    fn next_lattice_point(&self, offset_axis: &Line) -> Option<Point> {
        (0..self.u_tiles)
            .flat_map(|u| (0..self.v_tiles).map(move |v| (u, v)))
            .map(|(u, v)| {
                Point::new(
                    self.domain_u * f64::from(u),
                    self.domain_v * f64::from(v),
                )
            })
            .find(|point| offset_axis.point_on_line(point, ZERO_TOL))
    }
}

/// A candidate grid line through the domain origin and the lattice point
/// `(bounds.u * u_tiles, bounds.v * v_tiles)`.
///
/// The flipped variant mirrors the candidate across the V axis. A candidate is
/// only usable when its [`shift`](SafeGrid::shift) could be resolved.
#[derive(Debug, Clone)]
pub struct SafeGrid {
    u_tiles: u32,
    v_tiles: u32,
    flipped: bool,
    axis: Line,
    frame: Frame,
    shift: Option<f64>,
}

impl SafeGrid {
    /// Creates the candidate for `(u_tiles, v_tiles)` in a domain of size
    /// `bounds` whose diagonal measures `diagonal_angle`.
    #[must_use]
    pub fn new(bounds: Point, diagonal_angle: f64, u_tiles: u32, v_tiles: u32, flipped: bool) -> Self {
        let axis = Line::new(
            Point::origin(),
            Point::new(
                bounds.u() * f64::from(u_tiles),
                bounds.v() * f64::from(v_tiles),
            ),
        );
        let frame = Frame::resolve(axis.angle(), diagonal_angle, bounds, u_tiles, v_tiles, flipped);
        let shift = frame.shift();
        Self {
            u_tiles,
            v_tiles,
            flipped,
            axis,
            frame,
            shift,
        }
    }

    /// Tile count along U, as requested.
    #[must_use]
    pub fn u_tiles(&self) -> u32 {
        self.u_tiles
    }

    /// Tile count along V, as requested.
    #[must_use]
    pub fn v_tiles(&self) -> u32 {
        self.v_tiles
    }

    /// Whether this is the mirrored variant.
    #[must_use]
    pub fn flipped(&self) -> bool {
        self.flipped
    }

    /// The unmirrored axis from the origin to the lattice point.
    #[must_use]
    pub fn axis(&self) -> &Line {
        &self.axis
    }

    /// Angle of the grid lines, in `[0, π]`.
    #[must_use]
    pub fn grid_angle(&self) -> f64 {
        if self.flipped {
            PI - self.axis.angle()
        } else {
            self.axis.angle()
        }
    }

    /// Length of one repeat period along the grid direction.
    #[must_use]
    pub fn span(&self) -> f64 {
        self.axis.length()
    }

    /// Signed perpendicular spacing between adjacent grid lines.
    #[must_use]
    pub fn offset(&self) -> f64 {
        self.frame.offset()
    }

    /// Along-axis displacement that brings the next parallel line back onto
    /// the lattice, or `None` when no repeating lattice point exists.
    #[must_use]
    pub fn shift(&self) -> Option<f64> {
        self.shift
    }

    /// Whether the shift could be resolved.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.shift.is_some()
    }
}

impl PartialEq for SafeGrid {
    fn eq(&self, other: &Self) -> bool {
        (self.grid_angle() - other.grid_angle()).abs() <= ZERO_TOL
    }
}

impl fmt::Display for SafeGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<SafeGrid GridAngle:{} Angle:{} U_Tiles:{} V_Tiles:{} Domain_U:{} Domain_V:{} Offset_Dir:{} Span:{} Offset:{} Shift:",
            self.grid_angle(),
            self.frame.angle,
            self.frame.u_tiles,
            self.frame.v_tiles,
            self.frame.domain_u,
            self.frame.domain_v,
            self.frame.offset_direction,
            self.span(),
            self.offset(),
        )?;
        match self.shift {
            Some(shift) => write!(f, "{shift}>"),
            None => f.write_str("none>"),
        }
    }
}
