//! UI definitions module
//! Based on: https://github.com/lupyuen/pinetime-watchface/blob/master/src/lib.rs

use embedded_graphics::{
    mono_font::{ascii::FONT_10X20, MonoFont},
    pixelcolor::PixelColor,
};
use profont::PROFONT_24_POINT;

pub mod clock;
pub mod gauge;
pub mod layout;
pub mod status;
pub mod watchface;

pub use watchface::{Watchface, WatchfaceState};

/// Font of the large time text
pub const TIME_FONT: &MonoFont<'static> = &PROFONT_24_POINT;
/// Font shared by the date and status texts
pub const LABEL_FONT: &MonoFont<'static> = &FONT_10X20;

/// Colour roles of the watchface, applied to every text region and the gauge
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Theme<C> {
    pub background: C,
    pub foreground: C,
}

impl<C> Theme<C>
where
    C: PixelColor,
{
    pub const fn new(background: C, foreground: C) -> Self {
        Self {
            background,
            foreground,
        }
    }
}
