#![no_std]
#![no_main]

mod peripherals;
mod system;

// Panic handler and debugging
use defmt::unwrap;

use defmt_rtt as _;
use panic_probe as _;

// Device
use embassy_executor::Spawner;
use embassy_nrf::{
    bind_interrupts,
    gpio::{Input, Level, Output, OutputDrive, Pin, Pull},
    interrupt::{self, InterruptExt, Priority},
    peripherals::SPI2,
    saadc::{self, ChannelConfig, Resolution, Saadc},
    spim,
};
use embassy_sync::{blocking_mutex::raw::ThreadModeRawMutex, signal::Signal};
use embassy_time::{Duration, Ticker, Timer};
use nrf_softdevice::Softdevice;
use static_cell::StaticCell;

bind_interrupts!(struct Irqs {
    SAADC => saadc::InterruptHandler;
    SPIM2_SPIS2_SPI2 => spim::InterruptHandler<SPI2>;
});

// Crate
use peripherals::{
    backlight::Backlight, battery::Battery, display::Display, vibration::VibrationMotor,
};
use pinetime_watchface::{ui::status::BatteryState, Event, Theme, Watchface, WatchfaceConfig};
use system::{
    bluetooth::{self, LinkReports, Server},
    config::SystemConfig,
    host::WatchHost,
    time::{TimeManager, TimeReference},
};

// Others
use chrono::{NaiveDateTime, Timelike};
use embedded_graphics::{pixelcolor::Rgb565, prelude::RgbColor};

// Include current UTC epoch at compile time
include!(concat!(env!("OUT_DIR"), "/utc.rs"));
const TIMEZONE: i32 = 1 * 3_600;

/// Fixed backlight level (0 - 7)
const BRIGHTNESS: u8 = 2;

const THEME: Theme<Rgb565> = Theme::new(Rgb565::BLACK, Rgb565::WHITE);

// Communication channels
static BATTERY_STATUS: Signal<ThreadModeRawMutex, BatteryState> = Signal::new();
static CONNECTED: LinkReports = LinkReports::new();
static TIME: Signal<ThreadModeRawMutex, NaiveDateTime> = Signal::new();
static VIBRATE: Signal<ThreadModeRawMutex, &'static [u32]> = Signal::new();

static BACKLIGHT: StaticCell<Backlight> = StaticCell::new();

#[embassy_executor::task]
async fn softdevice_task(sd: &'static Softdevice) -> ! {
    sd.run().await
}

/// Keep the phone link up and report its state.
#[embassy_executor::task]
async fn bluetooth_task(sd: &'static Softdevice, server: Server) -> ! {
    bluetooth::run(sd, &server, &CONNECTED).await
}

/// Play vibration patterns requested by the watchface.
#[embassy_executor::task(pool_size = 1)]
async fn notify(mut motor: VibrationMotor<'static>) {
    loop {
        let pattern = VIBRATE.wait().await;
        motor.play(pattern).await;
    }
}

/// Fetch the battery status from the hardware.
#[embassy_executor::task(pool_size = 1)]
async fn update_battery_status(mut battery: Battery) {
    loop {
        match battery.update().await {
            Ok(true) => {
                // Battery status changed
                let state = battery.state();
                defmt::info!("Battery status updated");
                bluetooth::publish_battery_level(state.charge_percent);
                BATTERY_STATUS.signal(state);
            }
            Ok(false) => {}
            Err(e) => defmt::warn!("Battery read failed: {}", e),
        }

        // Re-schedule the timer interrupt in 1s
        Timer::after(Duration::from_secs(1)).await;
    }
}

/// Signal the current time once per minute.
#[embassy_executor::task(pool_size = 1)]
async fn update_time(clock: TimeManager) {
    let mut tick = Ticker::every(Duration::from_secs(1));
    let mut last_minute = clock.get_time().minute();
    loop {
        let now = clock.get_time();
        if now.minute() != last_minute {
            last_minute = now.minute();
            defmt::debug!("Current time: {}:{}", now.hour(), now.minute());
            TIME.signal(now);
        }

        // Re-schedule the timer interrupt
        tick.next().await;
    }
}

/// Feed events to the watchface and repaint what it asks for.
#[embassy_executor::task(pool_size = 1)]
async fn update_lcd(mut display: Display, mut host: WatchHost) {
    let mut face = Watchface::load(&mut host, WatchfaceConfig::DEFAULT, THEME);
    let mut tick = Ticker::every(Duration::from_millis(100));
    loop {
        if BATTERY_STATUS.signaled() {
            let status = BATTERY_STATUS.wait().await;
            host.deliver(&mut face, Event::BatteryChanged(status));
        }

        while let Ok(connected) = CONNECTED.try_receive() {
            host.deliver(&mut face, Event::ConnectionChanged(connected));
        }

        if TIME.signaled() {
            let time = TIME.wait().await;
            host.deliver(&mut face, Event::MinuteTick(time));
        }

        for region in host.take_dirty() {
            if let Err(e) = face.draw_region(region, &mut display) {
                defmt::warn!("Failed to draw {}: {}", region, defmt::Debug2Format(&e));
            }
        }

        // Re-schedule the timer interrupt in 100ms
        tick.next().await;
    }
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_nrf::init(SystemConfig::new());
    defmt::info!("Initializing");

    // Priorities 0, 1 and 4 belong to the SoftDevice
    interrupt::SAADC.set_priority(Priority::P3);
    interrupt::SPIM2_SPIS2_SPI2.set_priority(Priority::P3);

    // Initialize Bluetooth
    let sd = Softdevice::enable(&bluetooth::softdevice_config());
    let server = unwrap!(Server::new(sd));
    let sd: &'static Softdevice = sd;
    unwrap!(spawner.spawn(softdevice_task(sd)));

    // Initialize SAADC
    let mut saadc_config = saadc::Config::default();
    // Set resolution to 12bit, necessary for correct battery status calculation
    saadc_config.resolution = Resolution::_12BIT;
    // Pin P0.31: Voltage level
    let channel_config = ChannelConfig::single_ended(p.P0_31);
    let saadc = Saadc::new(p.SAADC, Irqs, saadc_config, [channel_config]);
    saadc.calibrate().await;

    // Initialize Battery
    let battery = unwrap!(
        Battery::init(
            saadc,
            Input::new(p.P0_12, Pull::None),
            Input::new(p.P0_19, Pull::None),
        )
        .await
    );
    bluetooth::publish_battery_level(battery.state().charge_percent);

    // Initialize vibration motor
    let vibration = VibrationMotor::init(Output::new(p.P0_16, Level::High, OutputDrive::Standard));

    // Initialize Backlight
    let backlight = BACKLIGHT.init(Backlight::init(
        Output::new(p.P0_14.degrade(), Level::High, OutputDrive::Standard),
        Output::new(p.P0_22.degrade(), Level::High, OutputDrive::Standard),
        Output::new(p.P0_23.degrade(), Level::High, OutputDrive::Standard),
    ));

    // Initialize SPI
    let mut spim_config = spim::Config::default();
    // Use SPI at 8MHz (the fastest clock available on the nRF52832),
    // otherwise refreshing will be super slow.
    spim_config.frequency = spim::Frequency::M8;
    // SPI must be used in mode 3. Mode 0 (the default) won't work.
    spim_config.mode = spim::MODE_3;

    let spim = spim::Spim::new(p.SPI2, Irqs, p.P0_02, p.P0_04, p.P0_03, spim_config);

    // Initialize LCD
    let display = unwrap!(Display::init(
        spim,
        Output::new(p.P0_25, Level::Low, OutputDrive::Standard),
        Output::new(p.P0_18, Level::Low, OutputDrive::Standard),
        Output::new(p.P0_26, Level::Low, OutputDrive::Standard),
    ));
    unwrap!(backlight.set(BRIGHTNESS));

    // Initialize clock
    let clock = TimeManager::init(TimeReference::from_epoch(UTC_EPOCH, TIMEZONE));

    let host = WatchHost::new(Display::bounds(), clock, battery.state(), &VIBRATE);

    defmt::info!("Initialization finished");

    // Schedule tasks
    unwrap!(spawner.spawn(bluetooth_task(sd, server)));
    unwrap!(spawner.spawn(update_battery_status(battery)));
    unwrap!(spawner.spawn(update_time(clock)));
    unwrap!(spawner.spawn(notify(vibration)));
    unwrap!(spawner.spawn(update_lcd(display, host)));
}
