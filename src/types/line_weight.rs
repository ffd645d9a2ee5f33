//! Line weight values for entities

use std::fmt;

/// Line weight in hundredths of millimeters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineWeight {
    /// Use the layer's line weight
    #[default]
    ByLayer,
    /// Use the block's line weight
    ByBlock,
    /// The document default line weight
    Standard,
    /// Explicit weight in hundredths of a millimeter (0-211)
    Value(i16),
}

impl LineWeight {
    /// Create a line weight from a raw value
    pub fn from_raw(value: i16) -> Self {
        match value {
            -3 => LineWeight::Standard,
            -2 => LineWeight::ByBlock,
            -1 => LineWeight::ByLayer,
            v if v >= 0 => LineWeight::Value(v),
            _ => LineWeight::Standard,
        }
    }

    /// Get the raw value
    pub fn raw_value(&self) -> i16 {
        match self {
            LineWeight::Standard => -3,
            LineWeight::ByBlock => -2,
            LineWeight::ByLayer => -1,
            LineWeight::Value(v) => *v,
        }
    }
}

impl fmt::Display for LineWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineWeight::ByLayer => write!(f, "ByLayer"),
            LineWeight::ByBlock => write!(f, "ByBlock"),
            LineWeight::Standard => write!(f, "Standard"),
            LineWeight::Value(v) => write!(f, "{:.2}mm", *v as f64 / 100.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_weight_round_trip() {
        assert_eq!(LineWeight::from_raw(-1), LineWeight::ByLayer);
        assert_eq!(LineWeight::from_raw(25).raw_value(), 25);
    }
}
