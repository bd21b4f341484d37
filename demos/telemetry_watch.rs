//! Telemetry Watch Example
//!
//! Streams the arm's telemetry to stdout. Each new line is decoded into a
//! joint or Cartesian frame and printed as JSON; lines that match neither
//! shape are shown raw.
//!
//! Usage:
//!   cargo run --example telemetry_watch -- /dev/ttyUSB0          # joint frames
//!   cargo run --example telemetry_watch -- /dev/ttyUSB0 xyz      # Cartesian frames
//!
//! Set RUST_LOG environment variable to control logging:
//!   RUST_LOG=debug cargo run --example telemetry_watch -- /dev/ttyUSB0

use log::info;
use sanxi_protocol::{DisplayMode, Result, Sanxi};
use std::thread;
use std::time::Duration;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let port_name = match std::env::args().nth(1) {
        Some(name) => name,
        None => {
            eprintln!("usage: telemetry_watch <port> [xyz]");
            std::process::exit(1);
        }
    };
    let display_mode = match std::env::args().nth(2).as_deref() {
        Some("xyz") => DisplayMode::Cartesian,
        _ => DisplayMode::Joint,
    };

    info!("Connecting to SANXI arm on {}...", port_name);
    let mut arm = Sanxi::new(&port_name);
    if !arm.connect() {
        eprintln!("Failed to open {}", port_name);
        std::process::exit(1);
    }
    arm.start_telemetry();
    arm.set_display_mode(display_mode);

    info!("Watching telemetry for 30 seconds (Ctrl-C to quit early)");
    let mut last = String::new();
    for _ in 0..300 {
        thread::sleep(Duration::from_millis(100));
        let message = arm.latest_message();
        if message.is_empty() || message == last {
            continue;
        }
        last = message.clone();
        match arm.latest_frame() {
            Some(frame) => match serde_json::to_string(&frame) {
                Ok(json) => println!("{}", json),
                Err(e) => info!("encode failed: {}", e),
            },
            None => println!("raw: {:?}", message),
        }
    }

    arm.stop_telemetry();
    arm.disconnect();
    Ok(())
}
