//! Entity transparency

use std::fmt;

/// Transparency value for entities
///
/// Stored as an alpha value: 255 is fully opaque, 0 is fully transparent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transparency(u8);

impl Transparency {
    /// Fully opaque
    pub const OPAQUE: Transparency = Transparency(255);

    /// Create from an alpha value (255 = opaque, 0 = transparent)
    pub const fn from_alpha(alpha: u8) -> Self {
        Transparency(alpha)
    }

    /// Create from a percentage (0 = opaque, 100 = fully transparent)
    pub fn from_percent(percent: u8) -> Self {
        let percent = percent.min(100) as u16;
        Transparency((255 - percent * 255 / 100) as u8)
    }

    /// Get the alpha value
    pub const fn alpha(&self) -> u8 {
        self.0
    }

    /// Check if fully opaque
    pub const fn is_opaque(&self) -> bool {
        self.0 == 255
    }
}

impl Default for Transparency {
    fn default() -> Self {
        Transparency::OPAQUE
    }
}

impl fmt::Display for Transparency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_opaque() {
            write!(f, "Opaque")
        } else {
            write!(f, "{}%", (255 - self.0 as u16) * 100 / 255)
        }
    }
}
