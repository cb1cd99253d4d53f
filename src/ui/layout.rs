//! Watchface layout
//!
//! The battery bar runs across the middle of the screen, the date sits above
//! it and the time below. The status label goes to the bottom edge, or just
//! above the date on a round screen where the corners are cut off.

use embedded_graphics::{
    geometry::{Point, Size},
    primitives::Rectangle,
};

use super::gauge::GaugeStyle;

const TIME_LAYER_HEIGHT: u32 = 58;
const TIME_LAYER_TOP_PADDING: i32 = -14;

const DATE_LAYER_HEIGHT: u32 = 24;
const DATE_LAYER_BOTTOM_PADDING: i32 = 2;

const STATUS_LAYER_HEIGHT: u32 = 24;
const STATUS_LAYER_TOP_PADDING: i32 = 4;
const STATUS_LAYER_BOTTOM_PADDING: i32 = 4;

const BATTERY_LEVEL_HEIGHT: u32 = 4;
const BATTERY_LEVEL_HORIZONTAL_PADDING: u32 = 4;

/// Diameter of the ring gauge
pub const RING_DIAMETER: u32 = 20;
const RING_TOP_PADDING: i32 = 4;

/// Screen outline
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScreenShape {
    #[default]
    Rectangular,
    Round,
}

/// Independently repainted part of the watchface
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Region {
    Time,
    Date,
    Status,
    Gauge,
}

impl Region {
    /// All regions in paint order
    pub const ALL: [Region; 4] = [Region::Time, Region::Date, Region::Status, Region::Gauge];

    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Bounds of every region
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Layout {
    pub time: Rectangle,
    pub date: Rectangle,
    pub status: Rectangle,
    pub gauge: Rectangle,
}

impl Layout {
    /// Lay the watchface out on `screen`.
    pub fn compute(screen: &Rectangle, shape: ScreenShape, gauge: GaugeStyle) -> Self {
        let origin = screen.top_left;
        let width = screen.size.width;
        let height = screen.size.height as i32;

        let bar = Rectangle::new(
            origin
                + Point::new(
                    BATTERY_LEVEL_HORIZONTAL_PADDING as i32,
                    (height - BATTERY_LEVEL_HEIGHT as i32) / 2,
                ),
            Size::new(
                width.saturating_sub(BATTERY_LEVEL_HORIZONTAL_PADDING * 2),
                BATTERY_LEVEL_HEIGHT,
            ),
        );

        let date = Rectangle::new(
            Point::new(
                origin.x,
                bar.top_left.y - DATE_LAYER_HEIGHT as i32 - DATE_LAYER_BOTTOM_PADDING,
            ),
            Size::new(width, DATE_LAYER_HEIGHT),
        );

        let time = Rectangle::new(
            Point::new(
                origin.x,
                bar.top_left.y + BATTERY_LEVEL_HEIGHT as i32 + TIME_LAYER_TOP_PADDING,
            ),
            Size::new(width, TIME_LAYER_HEIGHT),
        );

        let status_y = match shape {
            ScreenShape::Round => {
                date.top_left.y - STATUS_LAYER_HEIGHT as i32 + STATUS_LAYER_TOP_PADDING
            }
            ScreenShape::Rectangular => {
                origin.y + height - STATUS_LAYER_HEIGHT as i32 - STATUS_LAYER_BOTTOM_PADDING
            }
        };
        let status = Rectangle::new(
            Point::new(origin.x, status_y),
            Size::new(width, STATUS_LAYER_HEIGHT),
        );

        let gauge = match gauge {
            GaugeStyle::Bar => bar,
            GaugeStyle::Ring => Rectangle::new(
                Point::new(
                    origin.x + (width.saturating_sub(RING_DIAMETER) / 2) as i32,
                    time.top_left.y + TIME_LAYER_HEIGHT as i32 + RING_TOP_PADDING,
                ),
                Size::new(RING_DIAMETER, RING_DIAMETER),
            ),
        };

        Self {
            time,
            date,
            status,
            gauge,
        }
    }

    pub fn bounds(&self, region: Region) -> Rectangle {
        match region {
            Region::Time => self.time,
            Region::Date => self.date,
            Region::Status => self.status,
            Region::Gauge => self.gauge,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn screen() -> Rectangle {
        Rectangle::new(Point::zero(), Size::new(240, 240))
    }

    #[test]
    fn bar_layout_on_pinetime() {
        let layout = Layout::compute(&screen(), ScreenShape::Rectangular, GaugeStyle::Bar);

        assert_eq!(
            layout.gauge,
            Rectangle::new(Point::new(4, 118), Size::new(232, 4))
        );
        assert_eq!(
            layout.date,
            Rectangle::new(Point::new(0, 92), Size::new(240, 24))
        );
        assert_eq!(
            layout.time,
            Rectangle::new(Point::new(0, 108), Size::new(240, 58))
        );
        assert_eq!(
            layout.status,
            Rectangle::new(Point::new(0, 212), Size::new(240, 24))
        );
    }

    #[test]
    fn round_screen_moves_status_above_date() {
        let layout = Layout::compute(&screen(), ScreenShape::Round, GaugeStyle::Bar);
        assert_eq!(layout.status.top_left, Point::new(0, 72));
        assert!(layout.status.top_left.y < layout.date.top_left.y);
    }

    #[test]
    fn ring_sits_below_time() {
        let layout = Layout::compute(&screen(), ScreenShape::Rectangular, GaugeStyle::Ring);
        assert_eq!(
            layout.gauge,
            Rectangle::new(Point::new(110, 170), Size::new(20, 20))
        );
        assert!(layout.gauge.intersection(&layout.status).is_zero_sized());
    }

    #[test]
    fn layout_follows_screen_origin() {
        let offset = Rectangle::new(Point::new(10, 20), Size::new(240, 240));
        let layout = Layout::compute(&offset, ScreenShape::Rectangular, GaugeStyle::Bar);
        assert_eq!(layout.gauge.top_left, Point::new(14, 138));
        assert_eq!(layout.status.top_left, Point::new(10, 232));
    }

    #[test]
    fn region_bounds() {
        let layout = Layout::compute(&screen(), ScreenShape::Rectangular, GaugeStyle::Bar);
        for region in Region::ALL {
            let bounds = layout.bounds(region);
            assert!(!bounds.is_zero_sized());
            assert_eq!(Region::ALL[region.index()], region);
        }
    }
}
