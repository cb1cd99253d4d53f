//! Build-time watchface configuration
//!
//! The watchface has no runtime settings. Variants are picked with cargo
//! features: `gauge-ring` swaps the battery bar for a ring, `round` lays the
//! face out for a round screen.

use crate::ui::{gauge::GaugeStyle, layout::ScreenShape};

/// Watchface variant selection
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WatchfaceConfig {
    /// Battery gauge rendering
    pub gauge: GaugeStyle,
    /// Screen shape used for the layout
    pub shape: ScreenShape,
}

impl WatchfaceConfig {
    /// Configuration selected by the enabled cargo features
    pub const DEFAULT: Self = Self {
        gauge: if cfg!(feature = "gauge-ring") {
            GaugeStyle::Ring
        } else {
            GaugeStyle::Bar
        },
        shape: if cfg!(feature = "round") {
            ScreenShape::Round
        } else {
            ScreenShape::Rectangular
        },
    };
}

impl Default for WatchfaceConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
