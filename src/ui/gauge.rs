//! Battery gauge
//!
//! Both variants are drawn from the charge percentage alone, nothing is kept
//! between two paints.

use embedded_graphics::{
    draw_target::DrawTarget,
    geometry::{Point, Size},
    primitives::{
        Circle, Primitive, PrimitiveStyle, PrimitiveStyleBuilder, Rectangle, StrokeAlignment,
    },
    Drawable,
};

use super::Theme;

/// Width of the notch that marks the charge level on the bar
pub const NOTCH_WIDTH: u32 = 4;
/// Keeps some of the ring visible at 0%
pub const RING_PADDING: u32 = 10;

/// Gauge variant
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GaugeStyle {
    /// Solid bar with a notch at the charge level
    #[default]
    Bar,
    /// Disc emptied from the top as the battery drains
    Ring,
}

impl GaugeStyle {
    /// Part of the gauge painted in the background colour.
    ///
    /// The area never grows with the charge percentage.
    pub fn erased_area(self, bounds: &Rectangle, percent: u8) -> Rectangle {
        match self {
            GaugeStyle::Bar => bar_notch(bounds, percent),
            GaugeStyle::Ring => ring_band(bounds, percent),
        }
    }

    /// Paint the gauge into `bounds`.
    pub fn draw<D>(
        self,
        target: &mut D,
        bounds: &Rectangle,
        percent: u8,
        theme: &Theme<D::Color>,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget,
    {
        let erase = PrimitiveStyle::with_fill(theme.background);
        match self {
            GaugeStyle::Bar => {
                bounds
                    .into_styled(PrimitiveStyle::with_fill(theme.foreground))
                    .draw(target)?;
                bar_notch(bounds, percent)
                    .into_styled(erase)
                    .draw(target)?;
            }
            GaugeStyle::Ring => {
                let circle = ring_circle(bounds);
                circle
                    .into_styled(PrimitiveStyle::with_fill(theme.foreground))
                    .draw(target)?;
                ring_band(bounds, percent).into_styled(erase).draw(target)?;

                let outline = PrimitiveStyleBuilder::new()
                    .stroke_color(theme.foreground)
                    .stroke_width(1)
                    .stroke_alignment(StrokeAlignment::Inside)
                    .build();
                circle.into_styled(outline).draw(target)?;
            }
        }
        Ok(())
    }
}

fn clamp_percent(percent: u8) -> u32 {
    u32::from(percent.min(100))
}

/// Notch at `width * percent / 100`, inset by 1px top and bottom
fn bar_notch(bounds: &Rectangle, percent: u8) -> Rectangle {
    let offset = bounds.size.width * clamp_percent(percent) / 100;
    let notch = Rectangle::new(
        bounds.top_left + Point::new(offset as i32, 1),
        Size::new(NOTCH_WIDTH, bounds.size.height.saturating_sub(2)),
    );
    notch.intersection(bounds)
}

/// Largest circle centred in `bounds`
fn ring_circle(bounds: &Rectangle) -> Circle {
    let diameter = bounds.size.width.min(bounds.size.height);
    let inset = Point::new(
        ((bounds.size.width - diameter) / 2) as i32,
        ((bounds.size.height - diameter) / 2) as i32,
    );
    Circle::new(bounds.top_left + inset, diameter)
}

/// Band from the top of the circle: full charge erases nothing, an empty
/// battery erases `100 / (100 + RING_PADDING)` of the diameter.
fn ring_band(bounds: &Rectangle, percent: u8) -> Rectangle {
    let circle = ring_circle(bounds);
    let height = circle.diameter * (100 - clamp_percent(percent)) / (100 + RING_PADDING);
    Rectangle::new(circle.top_left, Size::new(circle.diameter, height))
}
