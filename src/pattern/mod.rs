//! Parsed fill-pattern model and its conversion into safe grids.

mod convert;
mod definition;

pub use convert::{ConvertPattern, ConvertedPattern};
pub use definition::{LineGroup, PatternDefinition};
