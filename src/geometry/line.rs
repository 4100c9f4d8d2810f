use std::f64::consts::PI;
use std::fmt;

use crate::error::{GeometryError, Result};
use crate::math::{Vector2, ZERO_TOL};

use super::Point;

/// An undirected pattern line between two points.
///
/// The endpoints are ordered on construction so that `start` has the smaller
/// V coordinate (the first argument wins a tie). The ordering is kept as-is
/// through later rotations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    start: Point,
    end: Point,
}

impl Line {
    /// Creates a new line, ordering the endpoints by ascending V.
    #[must_use]
    pub fn new(a: Point, b: Point) -> Self {
        if a.v() <= b.v() {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    /// Returns the start point.
    #[must_use]
    pub fn start(&self) -> Point {
        self.start
    }

    /// Returns the end point.
    #[must_use]
    pub fn end(&self) -> Point {
        self.end
    }

    /// Returns `end - start`.
    #[must_use]
    pub fn direction(&self) -> Point {
        Point::new(self.end.u() - self.start.u(), self.end.v() - self.start.v())
    }

    /// Angle between the line and the U axis, in `[0, π)`.
    ///
    /// A degenerate line has angle `0`. A horizontal line whose endpoints were
    /// given right-to-left measures `π` against the U axis and is folded back
    /// to `0`, since hatch lines carry no direction.
    #[must_use]
    pub fn angle(&self) -> f64 {
        let dir = self.direction();
        // `angle` clamps the cosine into [-1, 1] and returns 0 for a zero vector.
        let angle = Vector2::x().angle(&Vector2::new(dir.u(), dir.v()));
        if angle >= PI {
            0.0
        } else {
            angle
        }
    }

    /// Euclidean length.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.start.distance_to(&self.end)
    }

    /// Midpoint of the two endpoints.
    #[must_use]
    pub fn center_point(&self) -> Point {
        Point::new(
            (self.end.u() + self.start.u()) / 2.0,
            (self.end.v() + self.start.v()) / 2.0,
        )
    }

    /// Returns whether `point` is collinear with this line, treating the line
    /// as infinite.
    ///
    /// The test uses the cross product of `start - point` and `end - point`,
    /// so `tolerance` scales with the line length.
    #[must_use]
    pub fn point_on_line(&self, point: &Point, tolerance: f64) -> bool {
        let (a, b, c) = (self.start, self.end, *point);
        let cross = (a.u() - c.u()) * (b.v() - c.v()) - (a.v() - c.v()) * (b.u() - c.u());
        cross.abs() <= tolerance
    }

    /// [`Line::point_on_line`] at the default lattice tolerance.
    #[must_use]
    pub fn contains(&self, point: &Point) -> bool {
        self.point_on_line(point, ZERO_TOL)
    }

    /// Intersection point of the two infinite lines.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::NoIntersection`] when the lines are parallel or
    /// coincident.
    pub fn intersect(&self, other: &Line) -> Result<Point> {
        fn det(a: (f64, f64), b: (f64, f64)) -> f64 {
            a.0 * b.1 - a.1 * b.0
        }

        let x_diff = (self.start.u() - self.end.u(), other.start.u() - other.end.u());
        let y_diff = (self.start.v() - self.end.v(), other.start.v() - other.end.v());

        let div = det(x_diff, y_diff);
        if div == 0.0 {
            return Err(GeometryError::NoIntersection.into());
        }

        let d = (
            det(
                (self.start.u(), self.start.v()),
                (self.end.u(), self.end.v()),
            ),
            det(
                (other.start.u(), other.start.v()),
                (other.end.u(), other.end.v()),
            ),
        );
        Ok(Point::new(det(d, x_diff) / div, det(d, y_diff) / div))
    }

    /// Rotates both endpoints in place by `angle` radians around `origin`.
    pub fn rotate(&mut self, angle: f64, origin: Option<&Point>) {
        self.start.rotate(angle, origin);
        self.end.rotate(angle, origin);
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<Line Start:{} End:{} Length:{} Angle:{}>",
            self.start,
            self.end,
            self.length(),
            self.angle()
        )
    }
}
