//! Safe-angle search over a rectangular tiling domain.
//!
//! A [`Domain`] enumerates the [`SafeGrid`] candidates whose angle closes the
//! domain into an exact lattice, and a [`Grid`] binds one pattern line to the
//! closest of them.

mod domain;
mod grid;
mod safe_grid;

pub use domain::Domain;
pub use grid::Grid;
pub use safe_grid::SafeGrid;

/// Scale class of a pattern domain, selecting its maximum search extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainClass {
    /// Model patterns, measured in real-world units.
    Model,
    /// Drafting/detail patterns, measured in sheet units.
    Detail,
}

impl DomainClass {
    /// Picks [`DomainClass::Model`] when `is_model` is set.
    #[must_use]
    pub fn from_model_flag(is_model: bool) -> Self {
        if is_model {
            Self::Model
        } else {
            Self::Detail
        }
    }
}

/// Tunables controlling candidate enumeration and expansion.
#[derive(Debug, Clone, Copy)]
pub struct DomainParams {
    /// Maximum search extent of a model-class domain.
    pub max_model_extent: f64,
    /// Detail-class maximum is `max_model_extent / detail_divisor`.
    pub detail_divisor: f64,
    /// Expansion stops once the target extent exceeds the class maximum times this.
    pub max_extent_multiplier: u32,
    /// Fractional digits used when deduplicating tile ratios.
    pub ratio_resolution: i32,
    /// Angular error, in radians, below which no further expansion is attempted.
    pub angle_correction: f64,
}

impl DomainParams {
    /// Maximum search extent for the given domain class.
    #[must_use]
    pub fn max_extent(&self, class: DomainClass) -> f64 {
        match class {
            DomainClass::Model => self.max_model_extent,
            DomainClass::Detail => self.max_model_extent / self.detail_divisor,
        }
    }
}

impl Default for DomainParams {
    fn default() -> Self {
        Self {
            max_model_extent: 100.0,
            detail_divisor: 10.0,
            max_extent_multiplier: 8,
            ratio_resolution: 2,
            angle_correction: 0.01,
        }
    }
}
