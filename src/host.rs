//! Host environment seam
//!
//! The watchface does not own the display, the clock or any sensor. A host
//! delivers [`Event`]s to the [`Watchface`](crate::ui::Watchface), answers its
//! queries and carries out its redraw and vibration requests. On the watch the
//! host is backed by the embassy tasks, in tests by a scripted fake.

use chrono::NaiveDateTime;
use embedded_graphics::primitives::Rectangle;

use crate::ui::{layout::Region, status::BatteryState};

/// Event delivered by the host
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// Wall clock moved on to a new minute
    MinuteTick(NaiveDateTime),
    /// Battery charge or charger state changed
    BatteryChanged(BatteryState),
    /// Phone link came up or went down
    ConnectionChanged(bool),
}

/// Event sources the watchface listens to
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Subscriptions {
    pub minute_tick: bool,
    pub battery: bool,
    pub connection: bool,
}

impl Subscriptions {
    pub const NONE: Self = Self {
        minute_tick: false,
        battery: false,
        connection: false,
    };

    pub const ALL: Self = Self {
        minute_tick: true,
        battery: true,
        connection: true,
    };

    /// Whether `event` comes from a subscribed source.
    pub fn accepts(&self, event: &Event) -> bool {
        match event {
            Event::MinuteTick(_) => self.minute_tick,
            Event::BatteryChanged(_) => self.battery,
            Event::ConnectionChanged(_) => self.connection,
        }
    }
}

/// Services the watchface consumes from its environment.
///
/// All queries return cached values and never block.
pub trait Host {
    /// Bounds of the whole screen
    fn screen_bounds(&self) -> Rectangle;

    /// Current wall clock time
    fn clock_sample(&self) -> NaiveDateTime;

    /// Current battery reading
    fn battery_state(&self) -> BatteryState;

    /// Whether the phone is connected
    fn is_connected(&self) -> bool;

    /// Whether the user prefers the 24 hour clock
    fn prefers_24h(&self) -> bool;

    /// Start delivering events from the given sources.
    fn subscribe(&mut self, subscriptions: Subscriptions);

    /// Stop delivering events from every source.
    fn unsubscribe(&mut self);

    /// Mark a region as needing a repaint.
    fn request_redraw(&mut self, region: Region);

    /// Queue a vibration pattern: durations in ms, alternating on and off,
    /// starting with on.
    fn enqueue_vibration(&mut self, pattern: &'static [u32]);
}

/// Set of regions waiting to be repainted
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DirtyRegions(u8);

impl DirtyRegions {
    pub const fn new() -> Self {
        Self(0)
    }

    pub fn insert(&mut self, region: Region) {
        self.0 |= 1 << region.index();
    }

    pub fn contains(&self, region: Region) -> bool {
        self.0 & (1 << region.index()) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Remove and return all pending regions in paint order.
    pub fn take(&mut self) -> impl Iterator<Item = Region> {
        let pending = core::mem::take(self);
        Region::ALL
            .into_iter()
            .filter(move |region| pending.contains(*region))
    }
}
