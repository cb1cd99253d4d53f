//! Hardware side of the watchface host

use chrono::NaiveDateTime;
use embassy_sync::{blocking_mutex::raw::ThreadModeRawMutex, signal::Signal};
use embedded_graphics::primitives::Rectangle;
use pinetime_watchface::{
    host::{DirtyRegions, Event, Host, Subscriptions},
    ui::{layout::Region, status::BatteryState},
    Watchface,
};

use super::time::TimeManager;

/// Show the time in 24 hour format
const CLOCK_24H: bool = true;

/// Serves the cached sensor values to the watchface and collects its
/// redraw and vibration requests
pub struct WatchHost {
    bounds: Rectangle,
    clock: TimeManager,
    battery: BatteryState,
    connected: bool,
    subscriptions: Subscriptions,
    dirty: DirtyRegions,
    vibrate: &'static Signal<ThreadModeRawMutex, &'static [u32]>,
}

impl WatchHost {
    pub fn new(
        bounds: Rectangle,
        clock: TimeManager,
        battery: BatteryState,
        vibrate: &'static Signal<ThreadModeRawMutex, &'static [u32]>,
    ) -> Self {
        Self {
            bounds,
            clock,
            battery,
            // No phone until the first connection
            connected: false,
            subscriptions: Subscriptions::NONE,
            dirty: DirtyRegions::new(),
            vibrate,
        }
    }

    /// Cache the new value and hand the event to the watchface if it
    /// subscribed to its source.
    pub fn deliver<C>(&mut self, face: &mut Watchface<C>, event: Event)
    where
        C: embedded_graphics::pixelcolor::PixelColor,
    {
        match event {
            Event::MinuteTick(_) => {}
            Event::BatteryChanged(battery) => self.battery = battery,
            Event::ConnectionChanged(connected) => self.connected = connected,
        }
        if self.subscriptions.accepts(&event) {
            face.handle(self, event);
        }
    }

    /// Regions waiting to be repainted, in paint order
    pub fn take_dirty(&mut self) -> impl Iterator<Item = Region> {
        self.dirty.take()
    }
}

impl Host for WatchHost {
    fn screen_bounds(&self) -> Rectangle {
        self.bounds
    }

    fn clock_sample(&self) -> NaiveDateTime {
        self.clock.get_time()
    }

    fn battery_state(&self) -> BatteryState {
        self.battery
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn prefers_24h(&self) -> bool {
        CLOCK_24H
    }

    fn subscribe(&mut self, subscriptions: Subscriptions) {
        self.subscriptions = subscriptions;
    }

    fn unsubscribe(&mut self) {
        self.subscriptions = Subscriptions::NONE;
    }

    fn request_redraw(&mut self, region: Region) {
        self.dirty.insert(region);
    }

    fn enqueue_vibration(&mut self, pattern: &'static [u32]) {
        self.vibrate.signal(pattern);
    }
}
