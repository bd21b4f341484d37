//! # SANXI Protocol Library
//!
//! A Rust library for driving SANXI six-axis robot arms over a serial
//! connection. The arm speaks an ASCII/binary hybrid protocol: single
//! control bytes switch its operating mode, newline-terminated text lines
//! carry motion commands, and the arm streams telemetry lines (joint
//! angles or Cartesian pose) back over the same link.
//!
//! ## Features
//!
//! - Synchronous motion commands: Cartesian point-to-point and linear
//!   moves, multi-joint moves, per-joint jogging, velocity/acceleration/
//!   deceleration parameters, raw command pass-through
//! - Mode sequencing with the settle delays the arm requires, including
//!   origin search, return-to-origin with a bounded wait, and emergency
//!   stop
//! - A background telemetry reader that always exposes the latest frame
//!   without blocking the command path
//! - Regex-based decoding of joint and Cartesian telemetry frames
//!
//! ## Example
//!
//! ```no_run
//! use sanxi_protocol::{JogDirection, Sanxi};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut arm = Sanxi::new("/dev/ttyUSB0");
//!     if !arm.connect() {
//!         return Err("connect failed".into());
//!     }
//!     arm.start_telemetry();
//!     arm.set_motion_params(50, 50, 50)?;
//!     arm.jog_start(1, JogDirection::Positive)?;
//!     arm.jog_stop(1)?;
//!     println!("latest telemetry: {:?}", arm.latest_frame());
//!     Ok(())
//! }
//! ```

pub mod constants;
pub mod error;
pub mod frames;
pub mod monitor;
pub mod protocol;
pub mod transport;
pub mod types;

pub use error::{Result, SanxiError};
pub use frames::{match_cartesian_frame, match_joint_frame, TelemetryFrame};
pub use monitor::TelemetryMonitor;
pub use protocol::Sanxi;
pub use transport::{shared, SerialTransport, SharedTransport, Transport};
pub use types::*;
