//! Command execution through the full application service.
//!
//! End-to-end: an authenticated session receives command frames, the
//! actuator sequences the bridge across ticks, and the response goes out
//! on the completing tick with the confirmed position.

use switchtrack::actuator::SwitchPosition;
use switchtrack::app::events::AppEvent;
use switchtrack::app::ports::LinkStats;
use switchtrack::app::service::AppService;
use switchtrack::config::SystemConfig;
use switchtrack::session::SessionState;

use crate::mock_ports::{CollectSink, HwCall, MockHardware, MockNet, ScriptedChannel};

struct Rig {
    app: AppService,
    net: MockNet,
    channel: ScriptedChannel,
    hw: MockHardware,
    sink: CollectSink,
}

fn tick(rig: &mut Rig, now_ms: u64) {
    rig.app.tick(
        now_ms,
        now_ms,
        LinkStats::default(),
        &mut rig.net,
        &mut rig.channel,
        &mut rig.hw,
        &mut rig.sink,
    );
}

/// Boot straight to an authenticated session at t=100.
fn authenticated_rig() -> Rig {
    let mut rig = Rig {
        app: AppService::new(&SystemConfig::default()),
        net: MockNet { up: true },
        channel: ScriptedChannel::new(),
        hw: MockHardware::new(),
        sink: CollectSink::new(),
    };
    rig.app.start(&mut rig.hw, &mut rig.sink);
    tick(&mut rig, 0);
    rig.channel.inject_text(r#"{"type":"connected"}"#);
    tick(&mut rig, 100);
    assert!(rig.app.is_authenticated());
    rig
}

fn inject_command(rig: &mut Rig, command: &str) {
    rig.channel.inject_text(&format!(
        r#"{{"type":"command","data":{{"command":"{}"}}}}"#,
        command
    ));
}

#[test]
fn switch_right_full_cycle() {
    let mut rig = authenticated_rig();

    inject_command(&mut rig, "switch_right");
    tick(&mut rig, 200);

    // Move started: bridge coasting through the dead-time window, no
    // response yet, deferred until completion.
    assert!(rig.app.is_moving());
    assert_eq!(rig.hw.bridge_levels(), Some((false, false)));
    assert_eq!(rig.channel.sent_of_type("command_response"), 0);
    assert!(rig
        .sink
        .0
        .iter()
        .any(|e| matches!(e, AppEvent::MoveStarted(SwitchPosition::Right))));

    // Dead-time elapsed: IN1 alone drives right.
    tick(&mut rig, 300);
    assert_eq!(rig.hw.bridge_levels(), Some((true, false)));

    // Still travelling just before the run time is up.
    tick(&mut rig, 1300);
    assert!(rig.app.is_moving());
    assert_eq!(rig.app.position(), SwitchPosition::Left);

    // Completion: coast, commit, light the indicator, answer.
    tick(&mut rig, 1400);
    assert!(!rig.app.is_moving());
    assert_eq!(rig.app.position(), SwitchPosition::Right);
    assert_eq!(rig.hw.bridge_levels(), Some((false, false)));
    assert_eq!(rig.hw.lit(), Some(SwitchPosition::Right));

    let v = rig.channel.last_json();
    assert_eq!(v["type"], "command_response");
    assert_eq!(v["command"], "switch_right");
    assert_eq!(v["status"], "success");
    assert_eq!(v["position"], "right");

    assert!(rig
        .sink
        .0
        .iter()
        .any(|e| matches!(e, AppEvent::MoveCompleted(SwitchPosition::Right))));
}

#[test]
fn bridge_never_shoots_through_across_reversals() {
    let mut rig = authenticated_rig();

    inject_command(&mut rig, "switch_right");
    for now in (200..=1500).step_by(100) {
        tick(&mut rig, now);
    }
    inject_command(&mut rig, "switch_left");
    for now in (1600..=2900).step_by(100) {
        tick(&mut rig, now);
    }
    assert_eq!(rig.app.position(), SwitchPosition::Left);

    for call in &rig.hw.calls {
        if let HwCall::Bridge(in1, in2) = call {
            assert!(!(*in1 && *in2), "shoot-through: both inputs asserted");
        }
    }
}

#[test]
fn get_position_answers_immediately() {
    let mut rig = authenticated_rig();

    inject_command(&mut rig, "get_position");
    tick(&mut rig, 200);

    assert!(!rig.app.is_moving());
    let v = rig.channel.last_json();
    assert_eq!(v["type"], "command_response");
    assert_eq!(v["command"], "get_position");
    assert_eq!(v["status"], "success");
    assert_eq!(v["position"], "left");
}

#[test]
fn unknown_command_answered_without_motion() {
    let mut rig = authenticated_rig();

    inject_command(&mut rig, "open_lift_hill");
    tick(&mut rig, 200);

    assert!(!rig.app.is_moving());
    let v = rig.channel.last_json();
    assert_eq!(v["command"], "open_lift_hill");
    assert_eq!(v["status"], "unknown_command");
    assert_eq!(v["position"], "left");
}

#[test]
fn command_before_authentication_is_dropped() {
    let mut rig = Rig {
        app: AppService::new(&SystemConfig::default()),
        net: MockNet { up: true },
        channel: ScriptedChannel::new(),
        hw: MockHardware::new(),
        sink: CollectSink::new(),
    };
    rig.app.start(&mut rig.hw, &mut rig.sink);
    tick(&mut rig, 0);
    assert_eq!(rig.app.session_state(), SessionState::AwaitingAuthAck);

    inject_command(&mut rig, "switch_right");
    tick(&mut rig, 100);

    assert!(!rig.app.is_moving());
    assert_eq!(rig.channel.sent_of_type("command_response"), 0);
}

#[test]
fn second_command_during_move_is_dropped() {
    let mut rig = authenticated_rig();

    inject_command(&mut rig, "switch_right");
    tick(&mut rig, 200);
    inject_command(&mut rig, "switch_left");
    tick(&mut rig, 300);

    for now in (400..=1600).step_by(100) {
        tick(&mut rig, now);
    }

    // Only the original move ran and only it was answered.
    assert_eq!(rig.app.position(), SwitchPosition::Right);
    assert_eq!(rig.channel.sent_of_type("command_response"), 1);
    assert_eq!(rig.channel.last_json()["command"], "switch_right");
}

#[test]
fn deauth_mid_move_drops_response_but_commits_position() {
    let mut rig = authenticated_rig();

    inject_command(&mut rig, "switch_right");
    tick(&mut rig, 200);
    rig.channel.inject_disconnect();
    tick(&mut rig, 300);
    assert_eq!(rig.app.session_state(), SessionState::Disconnected);

    for now in (400..=1600).step_by(100) {
        tick(&mut rig, now);
    }

    // Motion has no failure path: the position is committed, but no
    // response goes out and the indicators stay dark.
    assert_eq!(rig.app.position(), SwitchPosition::Right);
    assert_eq!(rig.channel.sent_of_type("command_response"), 0);
    assert!(rig.hw.leds_dark());
}
