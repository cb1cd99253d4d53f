//! Charging and connectivity status

/// Vibration played when the phone link is reported down:
/// on 200ms, off 100ms, three times, then a final 200ms pulse.
pub const DISCONNECT_VIBE_PATTERN: [u32; 7] = [200, 100, 200, 100, 200, 100, 200];

/// Battery reading as reported by the hardware
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BatteryState {
    /// Charge in percent (0–100)
    pub charge_percent: u8,
    /// Charger reports an active charge cycle
    pub is_charging: bool,
    /// External power is present
    pub is_plugged: bool,
}

impl BatteryState {
    /// Whether the battery should be shown as charging.
    ///
    /// Some chargers stop reporting a charge cycle while still topping up, so
    /// a plugged in battery that is not full counts as charging too.
    pub fn charging(&self) -> bool {
        self.is_charging || (self.is_plugged && self.charge_percent < 100)
    }
}

/// Text shown in the status region
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StatusLabel {
    Charging,
    Charged,
    Disconnected,
    #[default]
    Empty,
}

impl StatusLabel {
    pub const fn text(self) -> &'static str {
        match self {
            StatusLabel::Charging => "CHARGING",
            StatusLabel::Charged => "CHARGED",
            StatusLabel::Disconnected => "DISCONNECTED",
            StatusLabel::Empty => "",
        }
    }
}

/// Last known battery and link state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceStatus {
    pub connected: bool,
    pub charging: bool,
    pub plugged: bool,
    pub charge_percent: u8,
}

impl DeviceStatus {
    pub const fn new() -> Self {
        Self {
            connected: false,
            charging: false,
            plugged: false,
            charge_percent: 0,
        }
    }

    /// Take over a new battery reading.
    pub fn apply_battery(&mut self, battery: BatteryState) {
        self.charging = battery.charging();
        self.plugged = battery.is_plugged;
        self.charge_percent = battery.charge_percent;
    }

    /// Take over a new link state.
    ///
    /// Returns the alert to play. Every report of a lost link alerts, not only
    /// the transition from connected.
    pub fn apply_connection(&mut self, connected: bool) -> Option<&'static [u32]> {
        self.connected = connected;
        if connected {
            None
        } else {
            Some(&DISCONNECT_VIBE_PATTERN)
        }
    }

    /// Aggregate the status into a single label, first match wins.
    pub fn label(&self) -> StatusLabel {
        if self.charging {
            StatusLabel::Charging
        } else if self.plugged {
            StatusLabel::Charged
        } else if !self.connected {
            StatusLabel::Disconnected
        } else {
            StatusLabel::Empty
        }
    }
}
