use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Add, Sub};

use nalgebra::Rotation2;

use crate::math::{round_coord, Point2};

/// A point in pattern-domain coordinates `(U, V)`.
///
/// Both coordinates are rounded on construction (see [`round_coord`]), and
/// equality and hashing compare the rounded values only. Points produced by a
/// trigonometric round-trip therefore compare equal to the lattice points they
/// approximate.
#[derive(Debug, Clone, Copy)]
pub struct Point {
    coords: Point2,
}

impl Point {
    /// Creates a new point, rounding both coordinates.
    #[must_use]
    pub fn new(u: f64, v: f64) -> Self {
        Self {
            coords: Point2::new(round_coord(u), round_coord(v)),
        }
    }

    /// The domain origin `(0, 0)`.
    #[must_use]
    pub fn origin() -> Self {
        Self::new(0.0, 0.0)
    }

    /// Returns the U coordinate.
    #[must_use]
    pub fn u(&self) -> f64 {
        self.coords.x
    }

    /// Returns the V coordinate.
    #[must_use]
    pub fn v(&self) -> f64 {
        self.coords.y
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance_to(&self, other: &Point) -> f64 {
        nalgebra::distance(&self.coords, &other.coords)
    }

    /// Rotates this point in place by `angle` radians around `origin`
    /// (the domain origin when `None`).
    ///
    /// Always succeeds for finite input.
    pub fn rotate(&mut self, angle: f64, origin: Option<&Point>) -> bool {
        let pivot = origin.copied().unwrap_or_else(Point::origin);
        let rotated = pivot.coords + Rotation2::new(angle) * (self.coords - pivot.coords);
        *self = Self::new(rotated.x, rotated.y);
        true
    }
}

impl Default for Point {
    fn default() -> Self {
        Self::origin()
    }
}

impl PartialEq for Point {
    #[allow(clippy::float_cmp)]
    fn eq(&self, other: &Self) -> bool {
        self.u() == other.u() && self.v() == other.v()
    }
}

impl Eq for Point {}

impl Hash for Point {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.u().to_bits().hash(state);
        self.v().to_bits().hash(state);
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.u() + rhs.u(), self.v() + rhs.v())
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.u() - rhs.u(), self.v() - rhs.v())
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Point U:{:.20} V:{:.20}>", self.u(), self.v())
    }
}
