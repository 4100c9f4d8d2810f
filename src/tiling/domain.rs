use std::collections::HashSet;
use std::fmt;

use tracing::debug;

use crate::error::{GeometryError, Result};
use crate::geometry::{Line, Point};
use crate::math::round_to;

use super::{DomainClass, DomainParams, SafeGrid};

/// A rectangular tiling domain and the safe grids reachable inside its
/// current search extent.
///
/// The candidate set is rebuilt from scratch whenever the extent grows, so a
/// domain is best shared by every line of one pattern conversion.
#[derive(Debug, Clone)]
pub struct Domain {
    origin: Point,
    bounds: Point,
    params: DomainParams,
    max_extent: f64,
    expandable: bool,
    target_extent: f64,
    diagonal: Line,
    safe_grids: Vec<SafeGrid>,
}

impl Domain {
    /// Creates a domain spanning the two corners with default parameters.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::ZeroDomain`] if the rectangle has no extent
    /// along U or V.
    pub fn new(
        start_u: f64,
        start_v: f64,
        end_u: f64,
        end_v: f64,
        class: DomainClass,
        expandable: bool,
    ) -> Result<Self> {
        Self::with_params(
            start_u,
            start_v,
            end_u,
            end_v,
            class,
            expandable,
            DomainParams::default(),
        )
    }

    /// Creates a domain spanning the two corners with custom parameters.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::ZeroDomain`] if the rectangle has no extent
    /// along U or V.
    pub fn with_params(
        start_u: f64,
        start_v: f64,
        end_u: f64,
        end_v: f64,
        class: DomainClass,
        expandable: bool,
        params: DomainParams,
    ) -> Result<Self> {
        let origin = Point::new(start_u.min(end_u), start_v.min(end_v));
        let corner = Point::new(start_u.max(end_u), start_v.max(end_v));
        let bounds = corner - origin;
        if bounds.u() == 0.0 || bounds.v() == 0.0 {
            return Err(GeometryError::ZeroDomain {
                u: bounds.u(),
                v: bounds.v(),
            }
            .into());
        }

        let max_extent = params.max_extent(class);
        let mut domain = Self {
            origin,
            bounds,
            params,
            max_extent,
            expandable,
            target_extent: max_extent,
            diagonal: Line::new(Point::origin(), bounds),
            safe_grids: Vec::new(),
        };
        domain.recompute_safe_grids();
        Ok(domain)
    }

    /// Width of the domain along U.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.bounds.u()
    }

    /// Whether [`Domain::best_angle`] may grow the search extent.
    #[must_use]
    pub fn is_expandable(&self) -> bool {
        self.expandable
    }

    /// Maximum extent of this domain's class.
    #[must_use]
    pub fn max_extent(&self) -> f64 {
        self.max_extent
    }

    /// Current search extent. Starts at [`Domain::max_extent`] and only grows.
    #[must_use]
    pub fn target_extent(&self) -> f64 {
        self.target_extent
    }

    /// The current candidate set, in enumeration order.
    #[must_use]
    pub fn safe_grids(&self) -> &[SafeGrid] {
        &self.safe_grids
    }

    /// Rebuilds the candidate set for the current target extent.
    ///
    /// The domain edges and diagonal are always present. Every further tile
    /// pair within half the target extent contributes its unmirrored and
    /// mirrored grid, once per distinct V/U ratio, provided both resolve a
    /// shift.
    pub fn recompute_safe_grids(&mut self) {
        let diagonal_angle = self.diagonal.angle();
        let bounds = self.bounds;
        let seed = |u_tiles, v_tiles, flipped| {
            SafeGrid::new(bounds, diagonal_angle, u_tiles, v_tiles, flipped)
        };
        let mut safe_grids = vec![
            seed(1, 0, false),
            seed(1, 0, true),
            seed(1, 1, false),
            seed(1, 1, true),
            seed(0, 1, false),
        ];

        let resolution = self.params.ratio_resolution;
        let mut processed_ratios: HashSet<i64> = HashSet::from([ratio_key(1, 1, resolution)]);

        let reach = self.target_extent / 2.0;
        let mut u_tiles = 1;
        while bounds.u() * f64::from(u_tiles) <= reach {
            let mut v_tiles = 1;
            while bounds.v() * f64::from(v_tiles) <= reach {
                let ratio = ratio_key(u_tiles, v_tiles, resolution);
                if !processed_ratios.contains(&ratio) {
                    if let Some(pair) = candidate_pair(bounds, diagonal_angle, u_tiles, v_tiles) {
                        safe_grids.extend(pair);
                        processed_ratios.insert(ratio);
                    } else {
                        debug!(u_tiles, v_tiles, "skipping safe angle for grid point");
                    }
                }
                v_tiles += 1;
            }
            u_tiles += 1;
        }

        debug!(
            target_extent = self.target_extent,
            candidates = safe_grids.len(),
            "recomputed safe grids"
        );
        self.safe_grids = safe_grids;
    }

    /// Grows the target extent by half the class maximum and rebuilds the
    /// candidate set.
    ///
    /// Returns `false`, leaving the domain untouched, once the target extent
    /// has passed the class maximum times the extent multiplier.
    pub fn expand(&mut self) -> bool {
        if self.target_extent > self.max_extent * f64::from(self.params.max_extent_multiplier) {
            return false;
        }
        self.target_extent += self.max_extent / 2.0;
        self.recompute_safe_grids();
        true
    }

    /// The candidate whose grid angle is closest to `axis_angle`.
    ///
    /// Ties go to the candidate enumerated first.
    #[must_use]
    pub fn grid_params(&self, axis_angle: f64) -> &SafeGrid {
        let distance = |grid: &SafeGrid| (grid.grid_angle() - axis_angle).abs();
        // The seeded edges and diagonal keep the set non-empty.
        let mut best = &self.safe_grids[0];
        for grid in &self.safe_grids[1..] {
            if distance(grid) < distance(best) {
                best = grid;
            }
        }
        best
    }

    /// Angular error left after snapping `axis_angle` to the closest candidate.
    #[must_use]
    pub fn required_correction(&self, axis_angle: f64) -> f64 {
        (axis_angle - self.grid_params(axis_angle).grid_angle()).abs()
    }

    /// The closest candidate to `axis_angle`, growing an expandable domain
    /// until the error drops below the correction threshold or expansion is
    /// exhausted.
    pub fn best_angle(&mut self, axis_angle: f64) -> &SafeGrid {
        if self.expandable {
            while self.required_correction(axis_angle) >= self.params.angle_correction {
                if !self.expand() {
                    break;
                }
            }
        }
        self.grid_params(axis_angle)
    }

    /// Translates `line` into domain-local coordinates.
    #[must_use]
    pub fn domain_coords(&self, line: &Line) -> Line {
        Line::new(line.start() - self.origin, line.end() - self.origin)
    }
}

/// V/U ratio rounded to `resolution` digits, as an exact set key.
#[allow(clippy::cast_possible_truncation)]
fn ratio_key(u_tiles: u32, v_tiles: u32, resolution: i32) -> i64 {
    let ratio = round_to(f64::from(v_tiles) / f64::from(u_tiles), resolution);
    (ratio * 10f64.powi(resolution)).round() as i64
}

/// Both variants of a tile pair, or `None` if either fails to resolve a shift.
fn candidate_pair(
    bounds: Point,
    diagonal_angle: f64,
    u_tiles: u32,
    v_tiles: u32,
) -> Option<[SafeGrid; 2]> {
    let grid = SafeGrid::new(bounds, diagonal_angle, u_tiles, v_tiles, false);
    let mirrored = SafeGrid::new(bounds, diagonal_angle, u_tiles, v_tiles, true);
    (grid.is_valid() && mirrored.is_valid()).then_some([grid, mirrored])
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<Domain U:{} V:{} SafeAngles:{}>",
            self.bounds.u(),
            self.bounds.v(),
            self.safe_grids.len()
        )
    }
}
