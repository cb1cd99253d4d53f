//! Battery status check
//!
//! Implementation based upon https://github.com/dbrgn/pinetime-rtic/blob/master/pinetime-rtic/src/battery.rs
//! and https://wiki.pine64.org/wiki/PineTime.

use embassy_nrf::{
    gpio::Input,
    peripherals::{P0_12, P0_19},
    saadc::Saadc,
};
use pinetime_watchface::ui::status::BatteryState;

/// Battery API
pub struct Battery {
    /// ADC instance for battery voltage measurement
    adc: Saadc<'static, 1>,
    /// Pin P0.12: high = battery, low = charging
    pin_charge_indication: Input<'static, P0_12>,
    /// Pin P0.19: high = battery, low = external power present
    pin_power_presence: Input<'static, P0_19>,
    /// Last reading
    state: BatteryState,
}

impl Battery {
    /// Configure battery settings on boot and take a first reading
    pub async fn init(
        adc: Saadc<'static, 1>,
        charge_pin: Input<'static, P0_12>,
        power_pin: Input<'static, P0_19>,
    ) -> Result<Self, Error> {
        let mut battery = Self {
            adc,
            pin_charge_indication: charge_pin,
            pin_power_presence: power_pin,
            state: BatteryState::default(),
        };
        battery.state = battery.read().await?;
        Ok(battery)
    }

    /// Last reading.
    ///
    /// This returns the stored value. To fetch current data, call `update()` first.
    pub fn state(&self) -> BatteryState {
        self.state
    }

    /// Update the battery state by reading information from the
    /// hardware. Return whether or not the values changed.
    pub async fn update(&mut self) -> Result<bool, Error> {
        let state = self.read().await?;
        let changed = state != self.state;
        self.state = state;
        Ok(changed)
    }

    async fn read(&mut self) -> Result<BatteryState, Error> {
        let voltage = self.voltage().await?;
        Ok(BatteryState {
            charge_percent: percent(voltage),
            is_charging: self.pin_charge_indication.is_low(),
            is_plugged: self.pin_power_presence.is_low(),
        })
    }

    /// Battery voltage in millivolts
    async fn voltage(&mut self) -> Result<u16, Error> {
        let mut buf = [0; 1];
        self.adc.sample(&mut buf).await;
        convert_adc_measurement(buf[0])
    }
}

/// Convert a 12 bit ADC measurement into the battery voltage in millivolts.
fn convert_adc_measurement(raw_measurement: i16) -> Result<u16, Error> {
    match raw_measurement {
        0..=4095 => {
            // Multiply by 2 * 1000 for mV and divide by (2 ^ 12 / 3.3V reference).
            // Use u32 during calculation to prevent overflow
            Ok((raw_measurement as u32 * 2000 / 1241) as u16)
        }
        _ => Err(Error::InvalidMeasurement),
    }
}

/// Estimate the remaining capacity from the voltage.
fn percent(voltage: u16) -> u8 {
    // Use fixed data points and linear interpolation in between.
    (match voltage {
        0..=3449 => 0,
        3450..=3699 => (voltage - 3450) / 5,
        3700..=4199 => 50 + (voltage - 3700) / 10,
        _ => 100,
    }) as u8
}

#[derive(Debug, defmt::Format)]
pub enum Error {
    InvalidMeasurement,
}
