//! PineTime digital watchface
//!
//! Presentation model of the watchface: time and date text, the aggregated
//! charging / connectivity status label and the battery gauge. Everything is
//! driven by events delivered from a [`host::Host`], which owns the display,
//! the clock and the sensors.
#![cfg_attr(not(test), no_std)]

// Must come first so the other modules see its macros.
mod fmt;

pub mod config;
pub mod host;
pub mod ui;

pub use config::WatchfaceConfig;
pub use host::{Event, Host, Subscriptions};
pub use ui::{Theme, Watchface};
