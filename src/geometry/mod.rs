mod line;
mod point;

pub use line::Line;
pub use point::Point;
