/// One family of parallel lines in a fill pattern.
///
/// Angles are in degrees from the U axis. Dashes follow the usual hatch
/// convention: positive lengths are drawn, negative lengths are gaps and zero
/// is a dot.
#[derive(Debug, Clone, PartialEq)]
pub struct LineGroup {
    pub angle_deg: f64,
    pub origin_u: f64,
    pub origin_v: f64,
    pub delta_u: f64,
    pub delta_v: f64,
    pub dashes: Vec<f64>,
}

impl LineGroup {
    /// Creates a continuous (undashed) line group.
    #[must_use]
    pub fn new(angle_deg: f64, origin_u: f64, origin_v: f64, delta_u: f64, delta_v: f64) -> Self {
        Self {
            angle_deg,
            origin_u,
            origin_v,
            delta_u,
            delta_v,
            dashes: Vec::new(),
        }
    }

    /// Sets the dash sequence.
    #[must_use]
    pub fn with_dashes(mut self, dashes: Vec<f64>) -> Self {
        self.dashes = dashes;
        self
    }

    /// Line angle in radians.
    #[must_use]
    pub fn angle(&self) -> f64 {
        self.angle_deg.to_radians()
    }

    /// First drawn dash length, if any.
    #[must_use]
    pub fn first_positive_dash(&self) -> Option<f64> {
        self.dashes.iter().copied().find(|&d| d > 0.0)
    }
}

/// A named fill pattern made of line groups.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternDefinition {
    pub name: String,
    pub description: Option<String>,
    /// Model patterns scale with the model; drafting patterns with the sheet.
    pub is_model: bool,
    pub line_groups: Vec<LineGroup>,
}

impl PatternDefinition {
    /// Creates a pattern definition without a description.
    #[must_use]
    pub fn new(name: impl Into<String>, is_model: bool, line_groups: Vec<LineGroup>) -> Self {
        Self {
            name: name.into(),
            description: None,
            is_model,
            line_groups,
        }
    }
}
