//! Core value types shared across the document model

pub mod color;
pub mod handle;
pub mod line_weight;
pub mod transparency;
pub mod vector;

pub use color::Color;
pub use handle::Handle;
pub use line_weight::LineWeight;
pub use transparency::Transparency;
pub use vector::{Vector2, Vector3};

/// Geometric comparison tolerance.
///
/// A point is considered to lie on a curve when its distance to the
/// curve does not exceed `equal_point`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    /// Maximum distance at which two points compare equal
    pub equal_point: f64,
}

impl Tolerance {
    /// The global default tolerance
    pub const GLOBAL: Tolerance = Tolerance {
        equal_point: 1e-10,
    };

    /// Create a tolerance with a specific point-equality distance
    pub const fn new(equal_point: f64) -> Self {
        Tolerance { equal_point }
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Tolerance::GLOBAL
    }
}
