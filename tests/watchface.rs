//! Watchface driven end to end through a scripted host

use chrono::{NaiveDate, NaiveDateTime};
use embedded_graphics::{
    draw_target::DrawTarget,
    geometry::{Dimensions, OriginDimensions, Point, Size},
    pixelcolor::BinaryColor,
    primitives::{PointsIter, Rectangle},
    Pixel,
};
use pinetime_watchface::{
    config::WatchfaceConfig,
    host::{Event, Host, Subscriptions},
    ui::{
        gauge::GaugeStyle,
        layout::Region,
        status::{BatteryState, StatusLabel, DISCONNECT_VIBE_PATTERN},
        Theme, Watchface,
    },
};

const THEME: Theme<BinaryColor> = Theme::new(BinaryColor::Off, BinaryColor::On);

fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, 0)
        .unwrap()
}

fn on_battery(charge_percent: u8) -> BatteryState {
    BatteryState {
        charge_percent,
        is_charging: false,
        is_plugged: false,
    }
}

/// Host fake that serves fixed sensor values and records every request
struct ScriptedHost {
    now: NaiveDateTime,
    battery: BatteryState,
    connected: bool,
    use_24h: bool,
    subscriptions: Subscriptions,
    redraws: Vec<Region>,
    vibrations: Vec<&'static [u32]>,
}

impl ScriptedHost {
    fn new(now: NaiveDateTime, battery: BatteryState, connected: bool) -> Self {
        Self {
            now,
            battery,
            connected,
            use_24h: true,
            subscriptions: Subscriptions::NONE,
            redraws: Vec::new(),
            vibrations: Vec::new(),
        }
    }

    /// Deliver events the way the watch does: update the cached sensor
    /// values, then call into the watchface if the source is subscribed.
    fn run(&mut self, face: &mut Watchface<BinaryColor>, script: &[Event]) {
        for event in script {
            match *event {
                Event::MinuteTick(now) => self.now = now,
                Event::BatteryChanged(battery) => self.battery = battery,
                Event::ConnectionChanged(connected) => self.connected = connected,
            }
            if self.subscriptions.accepts(event) {
                face.handle(self, *event);
            }
        }
    }

    fn clear(&mut self) {
        self.redraws.clear();
        self.vibrations.clear();
    }
}

impl Host for ScriptedHost {
    fn screen_bounds(&self) -> Rectangle {
        Rectangle::new(Point::zero(), Size::new(240, 240))
    }

    fn clock_sample(&self) -> NaiveDateTime {
        self.now
    }

    fn battery_state(&self) -> BatteryState {
        self.battery
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn prefers_24h(&self) -> bool {
        self.use_24h
    }

    fn subscribe(&mut self, subscriptions: Subscriptions) {
        self.subscriptions = subscriptions;
    }

    fn unsubscribe(&mut self) {
        self.subscriptions = Subscriptions::NONE;
    }

    fn request_redraw(&mut self, region: Region) {
        self.redraws.push(region);
    }

    fn enqueue_vibration(&mut self, pattern: &'static [u32]) {
        self.vibrations.push(pattern);
    }
}

/// 240x240 monochrome frame that remembers which pixels were painted
struct Canvas {
    pixels: Vec<Option<BinaryColor>>,
}

impl Canvas {
    const SIZE: u32 = 240;

    fn new() -> Self {
        Self {
            pixels: vec![None; (Self::SIZE * Self::SIZE) as usize],
        }
    }

    fn get(&self, point: Point) -> Option<BinaryColor> {
        self.pixels[(point.y as u32 * Self::SIZE + point.x as u32) as usize]
    }

    fn painted(&self) -> impl Iterator<Item = (Point, BinaryColor)> + '_ {
        self.pixels.iter().enumerate().filter_map(|(i, pixel)| {
            let point = Point::new(i as i32 % Self::SIZE as i32, i as i32 / Self::SIZE as i32);
            pixel.map(|color| (point, color))
        })
    }
}

impl OriginDimensions for Canvas {
    fn size(&self) -> Size {
        Size::new(Self::SIZE, Self::SIZE)
    }
}

impl DrawTarget for Canvas {
    type Color = BinaryColor;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if self.bounding_box().contains(point) {
                self.pixels[(point.y as u32 * Self::SIZE + point.x as u32) as usize] = Some(color);
            }
        }
        Ok(())
    }
}

fn load(host: &mut ScriptedHost) -> Watchface<BinaryColor> {
    Watchface::load(host, WatchfaceConfig::DEFAULT, THEME)
}

#[test]
fn load_populates_every_region() {
    let mut host = ScriptedHost::new(at(2024, 3, 4, 9, 5), on_battery(50), true);
    let face = load(&mut host);

    assert_eq!(host.subscriptions, Subscriptions::ALL);
    assert_eq!(face.state().clock.time_text(), "09:05");
    assert_eq!(face.state().clock.date_text(), "Mon 04 Mar");
    assert_eq!(face.state().label, StatusLabel::Empty);
    assert_eq!(face.state().status.charge_percent, 50);
    for region in Region::ALL {
        assert!(host.redraws.contains(&region), "{:?} not requested", region);
    }
    assert!(host.vibrations.is_empty());
}

#[test]
fn minute_ticks_only_reformat_the_date_on_a_new_day() {
    let mut host = ScriptedHost::new(at(2024, 3, 4, 9, 5), on_battery(50), true);
    let mut face = load(&mut host);
    host.clear();

    host.run(&mut face, &[Event::MinuteTick(at(2024, 3, 4, 9, 6))]);
    assert_eq!(face.state().clock.time_text(), "09:06");
    assert_eq!(face.state().clock.date_text(), "Mon 04 Mar");
    assert_eq!(host.redraws, vec![Region::Time]);

    host.clear();
    host.run(&mut face, &[Event::MinuteTick(at(2024, 3, 5, 0, 1))]);
    assert_eq!(face.state().clock.time_text(), "00:01");
    assert_eq!(face.state().clock.date_text(), "Tue 05 Mar");
    assert_eq!(host.redraws, vec![Region::Time, Region::Date]);
}

#[test]
fn twelve_hour_clock() {
    let mut host = ScriptedHost::new(at(2024, 3, 4, 0, 1), on_battery(50), true);
    host.use_24h = false;
    let mut face = load(&mut host);
    assert_eq!(face.state().clock.time_text(), "12:01");

    host.run(&mut face, &[Event::MinuteTick(at(2024, 3, 4, 13, 45))]);
    assert_eq!(face.state().clock.time_text(), "1:45");
}

#[test]
fn disconnect_alerts_once_per_report() {
    let mut host = ScriptedHost::new(at(2024, 3, 4, 9, 5), on_battery(50), true);
    let mut face = load(&mut host);
    host.clear();

    host.run(&mut face, &[Event::ConnectionChanged(false)]);
    assert_eq!(face.state().label, StatusLabel::Disconnected);
    assert_eq!(face.state().label.text(), "DISCONNECTED");
    assert_eq!(host.vibrations, vec![&DISCONNECT_VIBE_PATTERN[..]]);
    assert_eq!(host.redraws, vec![Region::Status]);
}

#[test]
fn repeated_connect_is_idempotent() {
    let mut host = ScriptedHost::new(at(2024, 3, 4, 9, 5), on_battery(50), true);
    let mut face = load(&mut host);
    host.clear();

    host.run(&mut face, &[Event::ConnectionChanged(true)]);
    assert_eq!(face.state().label.text(), "");
    let after_first = *face.state();

    host.run(&mut face, &[Event::ConnectionChanged(true)]);
    assert_eq!(face.state().label.text(), "");
    assert_eq!(*face.state(), after_first);
    assert!(host.vibrations.is_empty());
}

#[test]
fn starting_disconnected_alerts_at_load() {
    let mut host = ScriptedHost::new(at(2024, 3, 4, 9, 5), on_battery(50), false);
    let face = load(&mut host);

    assert_eq!(face.state().label, StatusLabel::Disconnected);
    assert_eq!(host.vibrations.len(), 1);
}

#[test]
fn charger_states() {
    let mut host = ScriptedHost::new(at(2024, 3, 4, 9, 5), on_battery(50), false);
    let mut face = load(&mut host);

    host.run(
        &mut face,
        &[Event::BatteryChanged(BatteryState {
            charge_percent: 87,
            is_charging: false,
            is_plugged: true,
        })],
    );
    assert!(face.state().status.charging);
    assert_eq!(face.state().label, StatusLabel::Charging);

    host.clear();
    host.run(
        &mut face,
        &[Event::BatteryChanged(BatteryState {
            charge_percent: 100,
            is_charging: false,
            is_plugged: true,
        })],
    );
    assert_eq!(face.state().label, StatusLabel::Charged);
    assert_eq!(host.redraws, vec![Region::Status, Region::Gauge]);

    host.run(&mut face, &[Event::BatteryChanged(on_battery(100))]);
    assert_eq!(face.state().label, StatusLabel::Disconnected);
}

#[test]
fn unload_stops_event_delivery() {
    let mut host = ScriptedHost::new(at(2024, 3, 4, 9, 5), on_battery(50), true);
    let face = load(&mut host);
    face.unload(&mut host);
    assert_eq!(host.subscriptions, Subscriptions::NONE);

    // A fresh load after unload starts from the host's current values
    host.clear();
    host.now = at(2024, 3, 6, 7, 0);
    let face = load(&mut host);
    assert_eq!(face.state().clock.date_text(), "Wed 06 Mar");
    assert!(host.redraws.contains(&Region::Date));
}

#[test]
fn draw_region_stays_inside_its_layer() {
    let mut host = ScriptedHost::new(at(2024, 3, 4, 9, 5), on_battery(50), false);
    let face = load(&mut host);

    for region in Region::ALL {
        let mut canvas = Canvas::new();
        face.draw_region(region, &mut canvas).unwrap();

        let bounds = face.layout().bounds(region);
        let mut painted = 0;
        for (point, _) in canvas.painted() {
            assert!(bounds.contains(point), "{:?} painted at {:?}", region, point);
            painted += 1;
        }
        assert_eq!(painted, (bounds.size.width * bounds.size.height) as usize);
    }
}

#[test]
fn empty_status_paints_only_background() {
    let mut host = ScriptedHost::new(at(2024, 3, 4, 9, 5), on_battery(50), true);
    let face = load(&mut host);

    let mut canvas = Canvas::new();
    face.draw_region(Region::Status, &mut canvas).unwrap();
    assert!(canvas.painted().all(|(_, color)| color == BinaryColor::Off));

    let mut canvas = Canvas::new();
    face.draw_region(Region::Time, &mut canvas).unwrap();
    assert!(canvas.painted().any(|(_, color)| color == BinaryColor::On));
}

#[test]
fn gauge_follows_battery_events() {
    let mut host = ScriptedHost::new(at(2024, 3, 4, 9, 5), on_battery(0), true);
    let mut face = load(&mut host);
    let bounds = face.layout().gauge;
    let erased = |face: &Watchface<BinaryColor>| {
        let mut canvas = Canvas::new();
        face.draw_region(Region::Gauge, &mut canvas).unwrap();
        canvas
            .painted()
            .filter(|(_, color)| *color == BinaryColor::Off)
            .count()
    };

    let mut previous = erased(&face);
    for percent in (10..=100).step_by(10) {
        host.run(&mut face, &[Event::BatteryChanged(on_battery(percent))]);
        let now = erased(&face);
        assert!(now <= previous);
        previous = now;
    }

    let mut canvas = Canvas::new();
    face.draw_region(Region::Gauge, &mut canvas).unwrap();
    if face.config().gauge == GaugeStyle::Bar {
        // Full battery pushes the notch off the bar
        assert!(bounds.points().all(|p| canvas.get(p) == Some(BinaryColor::On)));
    }
}

#[test]
fn full_paint_covers_exactly_the_layers() {
    let mut host = ScriptedHost::new(at(2024, 3, 4, 9, 5), on_battery(50), false);
    let face = load(&mut host);

    let mut canvas = Canvas::new();
    face.draw(&mut canvas).unwrap();

    let layout = face.layout();
    let screen = Rectangle::new(Point::zero(), Size::new(Canvas::SIZE, Canvas::SIZE));
    for point in screen.points() {
        let in_layer = Region::ALL
            .iter()
            .any(|region| layout.bounds(*region).contains(point));
        assert_eq!(canvas.get(point).is_some(), in_layer, "at {:?}", point);
    }

    // Every text made it to the frame
    for region in [Region::Time, Region::Date, Region::Status] {
        let bounds = layout.bounds(region);
        assert!(
            bounds.points().any(|p| canvas.get(p) == Some(BinaryColor::On)),
            "{:?} is blank",
            region
        );
    }
}

#[test]
fn quick_reconnect_still_alerts() {
    let mut host = ScriptedHost::new(at(2024, 3, 4, 9, 5), on_battery(50), true);
    let mut face = load(&mut host);
    host.clear();

    // Both reports arrive between two paints
    host.run(
        &mut face,
        &[Event::ConnectionChanged(false), Event::ConnectionChanged(true)],
    );
    assert_eq!(host.vibrations, vec![&DISCONNECT_VIBE_PATTERN[..]]);
    assert_eq!(face.state().label, StatusLabel::Empty);
    assert_eq!(host.redraws, vec![Region::Status, Region::Status]);
}
