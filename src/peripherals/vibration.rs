//! Control the vibration motor
//!
//! Pinout from https://wiki.pine64.org/wiki/PineTime.

use embassy_nrf::{gpio::Output, peripherals::P0_16};
use embassy_time::Timer;

/// Controller for the internal vibration motor
pub struct VibrationMotor<'a> {
    /// Pin P0.16: High = off, Low = on
    control_pin: Output<'a, P0_16>,
}

impl<'a> VibrationMotor<'a> {
    /// Initialize vibration controller
    pub fn init(control_pin: Output<'a, P0_16>) -> Self {
        let mut motor = Self { control_pin };
        motor.off();
        motor
    }

    /// Play a pattern of durations in ms, alternating on and off,
    /// starting with on. The motor is always left off.
    pub async fn play(&mut self, pattern: &[u32]) {
        for (segment, duration_ms) in pattern.iter().enumerate() {
            if segment % 2 == 0 {
                self.on();
            } else {
                self.off();
            }
            Timer::after_millis(*duration_ms as u64).await;
        }
        self.off();
    }

    fn on(&mut self) {
        self.control_pin.set_low();
    }

    fn off(&mut self) {
        self.control_pin.set_high();
    }
}
