//! Telemetry monitor and origin-wait tests against a scripted transport.

mod common;

use std::time::{Duration, Instant};

use common::{scripted, written_bytes};
use sanxi_protocol::{Sanxi, SanxiError, TelemetryFrame};

/// Give the reader thread time to drain a short read script.
const DRAIN: Duration = Duration::from_millis(100);

#[test]
fn monitor_converges_to_the_latest_nonempty_line() {
    let (transport, _state) = scripted(&["a", "", "b"]);
    let mut arm = Sanxi::with_transport(transport);

    arm.start_telemetry();
    std::thread::sleep(DRAIN);
    arm.stop_telemetry();

    // Empty reads never overwrite the slot.
    assert_eq!(arm.latest_message(), "b");
}

#[test]
fn latest_frame_decodes_the_published_line() {
    let (transport, _state) = scripted(&["J1=1.0 J2=2.0 J3=3.0 J4=4.0 J5=5.0 J6=6.0\r"]);
    let mut arm = Sanxi::with_transport(transport);

    arm.start_telemetry();
    std::thread::sleep(DRAIN);
    arm.stop_telemetry();

    let expected = ["1.0", "2.0", "3.0", "4.0", "5.0", "6.0"].map(String::from);
    assert_eq!(arm.latest_frame(), Some(TelemetryFrame::Joint(expected)));
}

#[test]
fn unmatched_lines_publish_raw_but_decode_to_nothing() {
    let (transport, _state) = scripted(&["hello arm\r"]);
    let mut arm = Sanxi::with_transport(transport);

    arm.start_telemetry();
    std::thread::sleep(DRAIN);
    arm.stop_telemetry();

    assert_eq!(arm.latest_message(), "hello arm\r");
    assert_eq!(arm.latest_frame(), None);
}

#[test]
fn starting_twice_runs_a_single_reader() {
    let (transport, _state) = scripted(&["x"]);
    let mut arm = Sanxi::with_transport(transport);

    arm.start_telemetry();
    arm.start_telemetry();
    assert!(arm.telemetry_running());
    arm.stop_telemetry();
    assert!(!arm.telemetry_running());
}

#[test]
fn stop_returns_promptly() {
    let (transport, _state) = scripted(&[]);
    let mut arm = Sanxi::with_transport(transport);

    arm.start_telemetry();
    let started = Instant::now();
    arm.stop_telemetry();

    // Cooperative cancellation is bounded by one read-timeout interval.
    assert!(started.elapsed() < Duration::from_millis(500));
}

#[test]
fn origin_wait_times_out_when_the_arm_never_reports_idle() {
    let (transport, state) = scripted(&[]);
    let mut arm = Sanxi::with_transport(transport);

    arm.start_telemetry();
    let result = arm.back_to_origin_blocking(Duration::from_millis(200));
    arm.stop_telemetry();

    assert!(matches!(result, Err(SanxiError::Timeout)));
    // The wait polled the arm's status at least once before giving up.
    assert!(written_bytes(&state).iter().any(|chunk| chunk == &[0x05]));
}

#[test]
fn origin_wait_completes_on_the_idle_marker() {
    let (transport, _state) = scripted(&["\x10", "\x10", "\x10", "\x10", "\x10"]);
    let mut arm = Sanxi::with_transport(transport);

    arm.start_telemetry();
    let result = arm.back_to_origin_blocking(Duration::from_secs(5));
    arm.stop_telemetry();

    assert!(result.is_ok());
}
