//! Basic Usage Example
//!
//! This example demonstrates the core functionality of the SANXI protocol
//! library:
//! - Listing and selecting serial ports
//! - Connecting to the arm and starting the telemetry reader
//! - Setting motion parameters
//! - Returning to origin with a bounded wait
//! - Jogging a single joint
//! - Reading the latest decoded telemetry frame
//!
//! Usage:
//!   cargo run --example basic_usage                  # Interactive mode
//!   cargo run --example basic_usage -- COM3          # Specify port
//!   cargo run --example basic_usage -- /dev/ttyUSB0
//!
//! Set RUST_LOG environment variable to control logging:
//!   RUST_LOG=debug cargo run --example basic_usage
//!   RUST_LOG=info cargo run --example basic_usage

use inquire::Select;
use log::{info, warn};
use sanxi_protocol::{JogDirection, Result, Sanxi};
use std::thread;
use std::time::Duration;

/// Interactive serial port selection using inquire
fn select_port() -> Result<String> {
    let ports = Sanxi::list_ports()?;

    if ports.is_empty() {
        eprintln!("No serial ports found!");
        std::process::exit(1);
    }

    let port_names: Vec<String> = ports
        .iter()
        .map(|p| format!("{} - {:?}", p.port_name, p.port_type))
        .collect();

    let selection = Select::new("Select a serial port:", port_names)
        .prompt()
        .map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("Selection cancelled: {}", e),
            )
        })?;

    // Extract just the port name (before " - ")
    let port_name = selection.split(" - ").next().unwrap().to_string();
    Ok(port_name)
}

fn main() -> Result<()> {
    // Initialize logger with default info level if RUST_LOG is not set
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Get port name from command line argument or interactive selection
    let port_name = std::env::args()
        .nth(1)
        .map(Ok)
        .unwrap_or_else(select_port)?;

    info!("Connecting to SANXI arm on {}...", port_name);
    let mut arm = Sanxi::new(&port_name);
    if !arm.connect() {
        eprintln!("Failed to open {}", port_name);
        std::process::exit(1);
    }
    arm.start_telemetry();

    info!("=== Motion Parameters ===");
    arm.set_motion_params(30, 30, 30)?;
    info!("Velocity/acceleration/deceleration set to 30%");

    info!("=== Return to Origin ===");
    match arm.back_to_origin_blocking(Duration::from_secs(60)) {
        Ok(()) => info!("✓ Arm reported origin reached"),
        Err(e) => warn!("✗ Origin not confirmed: {}", e),
    }

    info!("=== Jog Demo (joint 1) ===");
    arm.jog_start(1, JogDirection::Positive)?;
    thread::sleep(Duration::from_millis(500));
    arm.jog_stop(1)?;
    arm.jog_start(1, JogDirection::Negative)?;
    thread::sleep(Duration::from_millis(500));
    arm.jog_stop(1)?;

    info!("=== Latest Telemetry ===");
    match arm.latest_frame() {
        Some(frame) => info!("{:?}", frame),
        None => info!("raw: {:?}", arm.latest_message()),
    }
    info!("Dropped writes so far: {}", arm.write_failures());

    arm.disconnect();
    info!("=== Basic Usage Complete ===");

    Ok(())
}
