//! Bluetooth module

// Core
use core::{
    cell::Cell,
    mem,
    sync::atomic::{AtomicU8, Ordering},
};

// BLE
use nrf_softdevice::{
    self,
    ble::{
        advertisement_builder::{
            Flag, LegacyAdvertisementBuilder, LegacyAdvertisementPayload, ServiceList,
            ServiceUuid16,
        },
        gatt_server, peripheral, Connection,
    },
    raw, Config, Softdevice,
};

// Embassy
use embassy_futures::select::{select, Either};
use embassy_sync::{blocking_mutex::raw::ThreadModeRawMutex, channel::Channel, signal::Signal};

const DEVICE_NAME: &str = "PineTime";

/// Link state reports, in order. Every report reaches the watchface.
pub type LinkReports = Channel<ThreadModeRawMutex, bool, 4>;

/// Last battery level, served when a phone connects
static BATTERY_LEVEL: AtomicU8 = AtomicU8::new(0);
/// Battery level changes while a phone is connected
static BATTERY_UPDATE: Signal<ThreadModeRawMutex, u8> = Signal::new();

/// Publish a new battery level to the battery service.
pub fn publish_battery_level(level: u8) {
    BATTERY_LEVEL.store(level, Ordering::Relaxed);
    BATTERY_UPDATE.signal(level);
}

pub static ADV_DATA: LegacyAdvertisementPayload = LegacyAdvertisementBuilder::new()
    .flags(&[Flag::GeneralDiscovery, Flag::LE_Only])
    .services_16(ServiceList::Complete, &[ServiceUuid16::BATTERY])
    .full_name(DEVICE_NAME)
    .build();

pub static SCAN_DATA: LegacyAdvertisementPayload = LegacyAdvertisementBuilder::new()
    .services_16(ServiceList::Complete, &[ServiceUuid16::BATTERY])
    .build();

#[nrf_softdevice::gatt_server]
pub struct Server {
    pub bas: BatteryService,
}

#[nrf_softdevice::gatt_service(uuid = "180f")]
pub struct BatteryService {
    #[characteristic(uuid = "2a19", read, notify)]
    pub battery_level: u8,
}

/// SoftDevice configuration for a single peripheral link
pub fn softdevice_config() -> Config {
    Config {
        clock: Some(raw::nrf_clock_lf_cfg_t {
            source: raw::NRF_CLOCK_LF_SRC_RC as u8,
            rc_ctiv: 16,
            rc_temp_ctiv: 2,
            accuracy: raw::NRF_CLOCK_LF_ACCURACY_500_PPM as u8,
        }),
        conn_gap: Some(raw::ble_gap_conn_cfg_t {
            conn_count: 1,
            event_length: 24,
        }),
        conn_gatt: Some(raw::ble_gatt_conn_cfg_t { att_mtu: 256 }),
        gatts_attr_tab_size: Some(raw::ble_gatts_cfg_attr_tab_size_t {
            attr_tab_size: raw::BLE_GATTS_ATTR_TAB_SIZE_DEFAULT,
        }),
        gap_role_count: Some(raw::ble_gap_cfg_role_count_t {
            adv_set_count: 1,
            periph_role_count: 1,
        }),
        gap_device_name: Some(raw::ble_gap_cfg_device_name_t {
            p_value: DEVICE_NAME.as_ptr() as _,
            current_len: DEVICE_NAME.len() as u16,
            max_len: DEVICE_NAME.len() as u16,
            write_perm: unsafe { mem::zeroed() },
            _bitfield_1: raw::ble_gap_cfg_device_name_t::new_bitfield_1(
                raw::BLE_GATTS_VLOC_STACK as u8,
            ),
        }),
        ..Default::default()
    }
}

/// Advertise and serve one phone at a time, reporting every link state
/// change on `link`.
pub async fn run(sd: &'static Softdevice, server: &Server, link: &'static LinkReports) -> ! {
    let config = peripheral::Config::default();
    loop {
        let advertisement = peripheral::ConnectableAdvertisement::ScannableUndirected {
            adv_data: &ADV_DATA,
            scan_data: &SCAN_DATA,
        };
        let conn = match peripheral::advertise_connectable(sd, advertisement, &config).await {
            Ok(conn) => conn,
            Err(e) => {
                defmt::warn!("Advertising failed: {:?}", e);
                continue;
            }
        };

        defmt::info!("Phone connected");
        link.send(true).await;

        // Drop updates queued while nobody was connected
        BATTERY_UPDATE.reset();
        serve_battery_level(server, &conn, BATTERY_LEVEL.load(Ordering::Relaxed), false);

        let notifications = Cell::new(false);
        let gatt = gatt_server::run(&conn, server, |event| match event {
            ServerEvent::Bas(BatteryServiceEvent::BatteryLevelCccdWrite {
                notifications: enabled,
            }) => {
                defmt::debug!("Battery notifications: {}", enabled);
                notifications.set(enabled);
            }
        });
        let updates = battery_updates(server, &conn, &notifications);

        let reason = match select(gatt, updates).await {
            Either::First(reason) => reason,
            Either::Second(never) => never,
        };

        defmt::info!("Phone disconnected: {:?}", reason);
        link.send(false).await;
    }
}

/// Push battery level changes to the connected phone.
async fn battery_updates(server: &Server, conn: &Connection, notifications: &Cell<bool>) -> ! {
    loop {
        let level = BATTERY_UPDATE.wait().await;
        serve_battery_level(server, conn, level, notifications.get());
    }
}

fn serve_battery_level(server: &Server, conn: &Connection, level: u8, notify: bool) {
    if let Err(e) = server.bas.battery_level_set(&level) {
        defmt::warn!("Failed to set battery level: {:?}", e);
    }
    if notify {
        if let Err(e) = server.bas.battery_level_notify(conn, &level) {
            defmt::warn!("Failed to notify battery level: {:?}", e);
        }
    }
}
