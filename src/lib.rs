//! Safe-angle tiling engine for CAD hatch and fill patterns.
//!
//! Hatch lines only tile a rectangular pattern domain without seams when they
//! run through integer multiples of the domain corner. This crate finds the
//! closest such "safe" angle for each pattern line and derives the repeat
//! parameters (span, offset and shift) a renderer needs to lay out parallel
//! copies of the line.
//!
//! Diagnostics are emitted through [`tracing`]; install a subscriber to see
//! them.

pub mod error;
pub mod geometry;
pub mod math;
pub mod pattern;
pub mod tiling;

pub use error::{HatchError, Result};
