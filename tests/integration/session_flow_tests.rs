//! Session lifecycle through the full application service.
//!
//! Drives [`AppService`] tick by tick with mock adapters: network up at
//! boot, channel handshake, authentication, periodic reporting, link
//! loss and recovery.

use switchtrack::actuator::SwitchPosition;
use switchtrack::app::events::AppEvent;
use switchtrack::app::ports::LinkStats;
use switchtrack::app::service::AppService;
use switchtrack::config::SystemConfig;
use switchtrack::session::SessionState;

use crate::mock_ports::{CollectSink, MockHardware, MockNet, ScriptedChannel};

struct Rig {
    app: AppService,
    net: MockNet,
    channel: ScriptedChannel,
    hw: MockHardware,
    sink: CollectSink,
}

fn boot() -> Rig {
    let mut rig = Rig {
        app: AppService::new(&SystemConfig::default()),
        net: MockNet { up: true },
        channel: ScriptedChannel::new(),
        hw: MockHardware::new(),
        sink: CollectSink::new(),
    };
    rig.app.start(&mut rig.hw, &mut rig.sink);
    rig
}

fn tick(rig: &mut Rig, now_ms: u64) {
    let stats = LinkStats {
        wifi_rssi: -58,
        free_heap: 180_000,
    };
    rig.app.tick(
        now_ms,
        now_ms,
        stats,
        &mut rig.net,
        &mut rig.channel,
        &mut rig.hw,
        &mut rig.sink,
    );
}

/// Boot, connect and complete the identify/ack handshake.
fn authenticate(rig: &mut Rig) {
    tick(rig, 0);
    rig.channel.inject_text(r#"{"type":"connected"}"#);
    tick(rig, 100);
    assert!(rig.app.is_authenticated());
}

#[test]
fn boot_connects_channel_and_identifies() {
    let mut rig = boot();
    tick(&mut rig, 0);

    // Network was up at boot: the first poll is immediate, the channel
    // connects and the identify handshake goes out in the same tick.
    assert_eq!(rig.channel.connect_calls, 1);
    assert_eq!(rig.app.session_state(), SessionState::AwaitingAuthAck);

    let v = rig.channel.sent_json(0);
    assert_eq!(v["type"], "module_identify");
    assert_eq!(v["moduleId"], "MC-0001-ST");
    assert_eq!(v["moduleType"], "switch-track");
    assert_eq!(v["uptime"], 0);
    assert_eq!(v["position"], "left");
    assert!(v["password"].is_string());

    // Not yet authenticated: no indicator lit, no telemetry.
    assert!(rig.hw.leds_dark());
    assert_eq!(rig.channel.sent_of_type("telemetry"), 0);
}

#[test]
fn auth_ack_lights_indicator_and_sends_initial_telemetry() {
    let mut rig = boot();
    authenticate(&mut rig);

    assert_eq!(rig.app.session_state(), SessionState::Authenticated);
    assert_eq!(rig.hw.lit(), Some(SwitchPosition::Left));

    // The first telemetry report goes out on the authenticating tick.
    assert_eq!(rig.channel.sent_of_type("telemetry"), 1);
    let v = rig.channel.last_json();
    assert_eq!(v["type"], "telemetry");
    assert_eq!(v["position"], "left");
    assert_eq!(v["status"], "operational");

    assert!(rig.sink.0.iter().any(|e| matches!(
        e,
        AppEvent::SessionChanged {
            to: SessionState::Authenticated,
            ..
        }
    )));
}

#[test]
fn telemetry_every_ten_seconds() {
    let mut rig = boot();
    authenticate(&mut rig);

    for now in (200..=20_100).step_by(100) {
        tick(&mut rig, now);
    }
    // Initial report at t=100, then t=10_100 and t=20_100.
    assert_eq!(rig.channel.sent_of_type("telemetry"), 3);
}

#[test]
fn heartbeat_every_thirty_seconds_with_link_stats() {
    let mut rig = boot();
    authenticate(&mut rig);

    for now in (200..=30_100).step_by(100) {
        tick(&mut rig, now);
    }
    assert_eq!(rig.channel.sent_of_type("heartbeat"), 1);

    let v = rig
        .channel
        .sent
        .iter()
        .map(|s| serde_json::from_str::<serde_json::Value>(s).unwrap())
        .find(|v| v["type"] == "heartbeat")
        .expect("no heartbeat frame");
    assert_eq!(v["wifiRSSI"], -58);
    assert_eq!(v["freeHeap"], 180_000);
    assert_eq!(v["position"], "left");
}

#[test]
fn nothing_is_sent_before_authentication() {
    let mut rig = boot();
    tick(&mut rig, 0);
    for now in (100..=30_100).step_by(100) {
        tick(&mut rig, now);
    }
    // Identify only — periodic reporting waits for the ack.
    assert_eq!(rig.channel.sent.len(), 1);
}

#[test]
fn link_loss_deauthenticates_and_darkens_indicators() {
    let mut rig = boot();
    authenticate(&mut rig);

    rig.net.up = false;
    // The monitor polls again at the 30 s boundary.
    tick(&mut rig, 30_000);

    assert_eq!(rig.app.session_state(), SessionState::Disconnected);
    assert!(rig.hw.leds_dark());
    assert!(rig.sink.0.iter().any(|e| matches!(e, AppEvent::LinkChanged(false))));

    // Reporting stops with the session.
    let frames = rig.channel.sent.len();
    for now in (30_100..=60_000).step_by(100) {
        tick(&mut rig, now);
    }
    assert_eq!(rig.channel.sent.len(), frames);
}

#[test]
fn link_recovery_reconnects_and_reauthenticates() {
    let mut rig = boot();
    authenticate(&mut rig);

    rig.net.up = false;
    tick(&mut rig, 30_000);
    assert_eq!(rig.app.session_state(), SessionState::Disconnected);

    rig.net.up = true;
    tick(&mut rig, 60_000);
    assert_eq!(rig.channel.connect_calls, 2);
    assert_eq!(rig.app.session_state(), SessionState::AwaitingAuthAck);

    rig.channel.inject_text(r#"{"type":"connected"}"#);
    tick(&mut rig, 60_100);
    assert!(rig.app.is_authenticated());
    assert_eq!(rig.hw.lit(), Some(SwitchPosition::Left));
}

#[test]
fn server_error_faults_session_and_stops_reporting() {
    let mut rig = boot();
    authenticate(&mut rig);

    rig.channel
        .inject_text(r#"{"type":"error","message":"module not registered"}"#);
    tick(&mut rig, 200);

    assert_eq!(rig.app.session_state(), SessionState::Faulted);
    assert!(rig.hw.leds_dark());

    let frames = rig.channel.sent.len();
    for now in (300..=20_000).step_by(100) {
        tick(&mut rig, now);
    }
    assert_eq!(rig.channel.sent.len(), frames);
}

#[test]
fn transport_disconnect_clears_authentication() {
    let mut rig = boot();
    authenticate(&mut rig);

    rig.channel.inject_disconnect();
    tick(&mut rig, 200);

    assert_eq!(rig.app.session_state(), SessionState::Disconnected);
    assert!(rig.hw.leds_dark());
    assert!(rig.sink.0.iter().any(|e| matches!(
        e,
        AppEvent::SessionChanged {
            to: SessionState::Disconnected,
            ..
        }
    )));
}

#[test]
fn malformed_frames_do_not_disturb_the_session() {
    let mut rig = boot();
    authenticate(&mut rig);

    rig.channel.inject_text("%%% not json %%%");
    rig.channel.inject_text(r#"{"no":"type"}"#);
    rig.channel.inject_text(r#"{"type":"firmware_update"}"#);
    tick(&mut rig, 200);

    assert!(rig.app.is_authenticated());
    assert_eq!(rig.hw.lit(), Some(SwitchPosition::Left));
}
