//! Protocol constants for SANXI robot arm communication.
//!
//! This module defines all the constants used in the SANXI serial protocol,
//! including control bytes, timing parameters, and serial port configuration.

use std::time::Duration;

/// Control byte reported by the arm (and sent to it) when it is idle
pub const CTRL_IDLE: u8 = 0x10;

/// Control byte that resets the arm's command interpreter
pub const CTRL_RESET: u8 = 0x30;

/// Control byte selecting command mode 14 (required before motion commands)
pub const CTRL_MODE14: u8 = 0x14;

/// Control byte starting the built-in origin-search program
pub const CTRL_SEARCH_ORIGIN: u8 = 0x12;

/// Control byte starting the return-to-origin program
pub const CTRL_BACK_TO_ORIGIN: u8 = 0x15;

/// Control byte polling the arm for its motion status
pub const CTRL_STATUS_POLL: u8 = 0x05;

/// Telemetry value the arm reports once a return-to-origin has completed
pub const IDLE_MARKER: &str = "\x10";

/// Baud rate (115200 bps)
pub const BAUD_RATE: u32 = 115_200;

/// Serial read timeout
pub const READ_TIMEOUT: Duration = Duration::from_millis(200);

/// Settle delay between the control bytes of a command-mode switch
pub const MODE_SETTLE: Duration = Duration::from_millis(50);

/// Settle delay between the control bytes of the origin sequences
pub const ORIGIN_SETTLE: Duration = Duration::from_millis(100);

/// Settle delay after the reset byte of an emergency stop
pub const STOP_SETTLE: Duration = Duration::from_millis(200);

/// Settle delay between successive motion-parameter lines
pub const PARAM_SETTLE: Duration = Duration::from_millis(50);

/// Delay between successive lines of a raw command batch
pub const RAW_LINE_DELAY: Duration = Duration::from_millis(100);

/// Interval between status polls while waiting for a return-to-origin
pub const ORIGIN_POLL_INTERVAL: Duration = Duration::from_millis(300);

/// Maximum velocity the `G07 VE=` parameter scales against
pub const VELOCITY_MAX: u32 = 250_000;

/// Maximum acceleration the `G07 AC=` parameter scales against
pub const ACCEL_MAX: u32 = 250_000;

/// Maximum deceleration the `G07 DE=` parameter scales against
pub const DECEL_MAX: u32 = 250_000;

/// Number of joint axes on the arm
pub const JOINT_COUNT: u8 = 6;
