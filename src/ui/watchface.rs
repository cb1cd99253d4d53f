//! Default watchface
//!
//! Keeps the texts and the status label in step with the events delivered by
//! the host, and paints the regions the host asks for.

use chrono::NaiveDateTime;
use embedded_graphics::{
    draw_target::{DrawTarget, DrawTargetExt},
    mono_font::{MonoFont, MonoTextStyle},
    pixelcolor::PixelColor,
    primitives::{Primitive, PrimitiveStyle, Rectangle},
    text::{Alignment, Baseline, Text, TextStyleBuilder},
    Drawable,
};

use super::{
    clock::ClockText,
    layout::{Layout, Region},
    status::{BatteryState, DeviceStatus, StatusLabel},
    Theme, LABEL_FONT, TIME_FONT,
};
use crate::{
    config::WatchfaceConfig,
    host::{Event, Host, Subscriptions},
};

/// Everything the watchface knows about the world
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WatchfaceState {
    pub clock: ClockText,
    pub status: DeviceStatus,
    pub label: StatusLabel,
}

impl WatchfaceState {
    pub const fn new() -> Self {
        Self {
            clock: ClockText::new(),
            status: DeviceStatus::new(),
            label: StatusLabel::Empty,
        }
    }

    /// Dispatch a host event to its handler.
    pub fn handle<H: Host>(&mut self, host: &mut H, event: Event) {
        match event {
            Event::MinuteTick(sample) => self.on_minute_tick(host, &sample),
            Event::BatteryChanged(battery) => self.on_battery_changed(host, battery),
            Event::ConnectionChanged(connected) => self.on_connection_changed(host, connected),
        }
    }

    pub fn on_minute_tick<H: Host>(&mut self, host: &mut H, sample: &NaiveDateTime) {
        let update = self.clock.update(sample, host.prefers_24h());
        host.request_redraw(Region::Time);
        if update.date_changed {
            debug!("Date changed");
            host.request_redraw(Region::Date);
        }
    }

    pub fn on_battery_changed<H: Host>(&mut self, host: &mut H, battery: BatteryState) {
        self.status.apply_battery(battery);
        debug!(
            "Battery: {}% (charging: {}, plugged: {})",
            battery.charge_percent,
            self.status.charging,
            battery.is_plugged
        );
        self.refresh_label();
        host.request_redraw(Region::Status);
        host.request_redraw(Region::Gauge);
    }

    pub fn on_connection_changed<H: Host>(&mut self, host: &mut H, connected: bool) {
        if let Some(pattern) = self.status.apply_connection(connected) {
            info!("Phone disconnected");
            host.enqueue_vibration(pattern);
        }
        self.refresh_label();
        host.request_redraw(Region::Status);
    }

    fn refresh_label(&mut self) {
        self.label = self.status.label();
    }
}

/// Watchface owning its state and display layers
pub struct Watchface<C> {
    state: WatchfaceState,
    layout: Layout,
    config: WatchfaceConfig,
    theme: Theme<C>,
}

impl<C> Watchface<C>
where
    C: PixelColor,
{
    /// Create the layers, subscribe to the host's events and fill every
    /// region from the current clock, battery and link state.
    pub fn load<H: Host>(host: &mut H, config: WatchfaceConfig, theme: Theme<C>) -> Self {
        let layout = Layout::compute(&host.screen_bounds(), config.shape, config.gauge);
        let mut face = Self {
            state: WatchfaceState::new(),
            layout,
            config,
            theme,
        };

        host.subscribe(Subscriptions::ALL);

        let now = host.clock_sample();
        face.state.on_minute_tick(host, &now);
        let battery = host.battery_state();
        face.state.on_battery_changed(host, battery);
        let connected = host.is_connected();
        face.state.on_connection_changed(host, connected);

        info!("Watchface loaded");
        face
    }

    /// Unsubscribe from the host and release the layers.
    pub fn unload<H: Host>(self, host: &mut H) {
        host.unsubscribe();
        info!("Watchface unloaded");
    }

    pub fn handle<H: Host>(&mut self, host: &mut H, event: Event) {
        self.state.handle(host, event);
    }

    pub fn state(&self) -> &WatchfaceState {
        &self.state
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn config(&self) -> WatchfaceConfig {
        self.config
    }

    /// Paint every region.
    pub fn draw<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = C>,
    {
        for region in Region::ALL {
            self.draw_region(region, target)?;
        }
        Ok(())
    }

    /// Paint a single region, nothing outside its bounds is touched.
    pub fn draw_region<D>(&self, region: Region, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = C>,
    {
        let bounds = self.layout.bounds(region);
        let mut layer = target.clipped(&bounds);

        bounds
            .into_styled(PrimitiveStyle::with_fill(self.theme.background))
            .draw(&mut layer)?;

        let text = match region {
            Region::Time => self.state.clock.time_text(),
            Region::Date => self.state.clock.date_text(),
            Region::Status => self.state.label.text(),
            Region::Gauge => "",
        };

        match region {
            Region::Time => self.draw_text(&mut layer, &bounds, text, TIME_FONT),
            Region::Date | Region::Status => self.draw_text(&mut layer, &bounds, text, LABEL_FONT),
            Region::Gauge => self.config.gauge.draw(
                &mut layer,
                &bounds,
                self.state.status.charge_percent,
                &self.theme,
            ),
        }
    }

    fn draw_text<D>(
        &self,
        target: &mut D,
        bounds: &Rectangle,
        text: &str,
        font: &MonoFont<'_>,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = C>,
    {
        if text.is_empty() {
            return Ok(());
        }

        let character_style = MonoTextStyle::new(font, self.theme.foreground);
        let text_style = TextStyleBuilder::new()
            .alignment(Alignment::Center)
            .baseline(Baseline::Middle)
            .build();
        Text::with_text_style(text, bounds.center(), character_style, text_style).draw(target)?;
        Ok(())
    }
}
