//! Switch-track firmware — main entry point.
//!
//! Hexagonal architecture with a cooperative control loop.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                  Adapters (outer ring)                   │
//! │                                                          │
//! │  HardwareAdapter   WifiAdapter   WsChannel   LogEventSink│
//! │  (Motor+Indicator) (Connectivity)(Channel)   (EventSink) │
//! │                                                          │
//! │  ───────────── Port Trait Boundary ──────────────        │
//! │                                                          │
//! │  ┌────────────────────────────────────────────────┐      │
//! │  │            AppService (pure logic)             │      │
//! │  │  Session · Command · Actuator · Telemetry      │      │
//! │  └────────────────────────────────────────────────┘      │
//! └──────────────────────────────────────────────────────────┘
//! ```

#![deny(unused_must_use)]

use anyhow::Result;
use log::{info, warn};

use switchtrack::adapters::channel::WsChannel;
use switchtrack::adapters::hardware::HardwareAdapter;
use switchtrack::adapters::log_sink::LogEventSink;
use switchtrack::adapters::sysinfo;
use switchtrack::adapters::time::Esp32TimeAdapter;
use switchtrack::adapters::wifi::WifiAdapter;
use switchtrack::app::service::AppService;
use switchtrack::config::SystemConfig;
use switchtrack::drivers;

// WiFi credentials are baked in at build time; a provisioning channel
// can replace this later.
const WIFI_SSID: &str = match option_env!("SWITCHTRACK_WIFI_SSID") {
    Some(s) => s,
    None => "microcoaster",
};
const WIFI_PASSWORD: &str = match option_env!("SWITCHTRACK_WIFI_PASSWORD") {
    Some(s) => s,
    None => "",
};

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("switch-track v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Hardware peripherals ───────────────────────────────
    if let Err(e) = drivers::hw_init::init_peripherals() {
        // Peripheral init failure is critical — log and halt; the
        // watchdog resets the module after timeout.
        log::error!("HAL init failed: {} — halting", e);
        #[allow(clippy::empty_loop)]
        loop {}
    }

    // ── 3. Configuration ──────────────────────────────────────
    let config = SystemConfig::default();
    info!(
        "module {} ({}) -> wss://{}:{}{}",
        config.identity.id,
        config.identity.module_type,
        config.server_host,
        config.server_port,
        config.server_path
    );

    // ── 4. Adapters ───────────────────────────────────────────
    let time = Esp32TimeAdapter::new();
    let mut hw = HardwareAdapter::default();
    let mut sink = LogEventSink::new();
    let mut channel = WsChannel::new(&config);

    let mut wifi = WifiAdapter::new();
    if let Err(e) = wifi.set_credentials(WIFI_SSID, WIFI_PASSWORD) {
        warn!("WiFi credentials rejected: {}", e);
    } else if let Err(e) = wifi.connect() {
        // Not fatal; the adapter retries with backoff from poll().
        warn!("WiFi connect failed: {}", e);
    }

    // ── 5. Application service ────────────────────────────────
    let mut app = AppService::new(&config);
    app.start(&mut hw, &mut sink);

    info!("system ready, entering control loop");

    // ── 6. Control loop ───────────────────────────────────────
    loop {
        let now_ms = time.uptime_ms();
        let stats = sysinfo::sample_link_stats(&wifi);

        app.tick(
            now_ms,
            now_ms,
            stats,
            &mut wifi,
            &mut channel,
            &mut hw,
            &mut sink,
        );

        std::thread::sleep(std::time::Duration::from_millis(u64::from(
            config.loop_idle_delay_ms,
        )));
    }
}
