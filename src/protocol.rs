use std::fmt::Write as _;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

use crate::constants::*;
use crate::error::{Result, SanxiError};
use crate::frames::TelemetryFrame;
use crate::monitor::TelemetryMonitor;
use crate::transport::{shared, SerialTransport, SharedTransport, Transport};
use crate::types::{CartesianTarget, DeviceMode, DisplayMode, JogDirection, JointTarget, MoveMode};

/// Main SANXI robot arm interface.
///
/// One `Sanxi` owns one serial connection and at most one background
/// telemetry reader. Command-issuing methods run synchronously on the
/// caller's thread, interleaving protocol bytes with the settle delays the
/// arm requires; the telemetry reader shares the transport and publishes
/// the most recent line for [`latest_message`](Sanxi::latest_message) and
/// [`latest_frame`](Sanxi::latest_frame).
///
/// The protocol carries no acknowledgments: success of a command means
/// "the bytes were written". Write faults are logged and counted (see
/// [`write_failures`](Sanxi::write_failures)), never raised.
pub struct Sanxi {
    transport: SharedTransport,
    monitor: TelemetryMonitor,
    mode: Mutex<DeviceMode>,
}

impl Sanxi {
    /// Create an interface for the arm on `port_name`. The port is not
    /// opened until [`connect`](Sanxi::connect).
    pub fn new(port_name: &str) -> Self {
        Self::with_transport(shared(SerialTransport::new(port_name)))
    }

    /// Create an interface over an arbitrary transport. This is the seam
    /// for tests and for non-serial back-ends.
    pub fn with_transport(transport: SharedTransport) -> Self {
        let monitor = TelemetryMonitor::new(Arc::clone(&transport));
        Sanxi {
            transport,
            monitor,
            mode: Mutex::new(DeviceMode::Idle),
        }
    }

    /// List available serial ports.
    pub fn list_ports() -> Result<Vec<serialport::SerialPortInfo>> {
        Ok(serialport::available_ports()?)
    }

    /// Open the configured port. Returns `true` iff the connection is
    /// usable afterwards; failure is logged, never raised.
    pub fn connect(&mut self) -> bool {
        self.transport_mut().open()
    }

    /// Stop the telemetry reader (if running) and close the port. Returns
    /// `true` iff the connection is confirmed closed afterwards.
    pub fn disconnect(&mut self) -> bool {
        self.monitor.stop();
        self.transport_mut().close()
    }

    /// Whether the port is currently open.
    pub fn is_connected(&self) -> bool {
        self.transport_mut().is_open()
    }

    /// Start the background telemetry reader. A no-op when it is already
    /// running.
    pub fn start_telemetry(&mut self) {
        self.monitor.start();
    }

    /// Stop the background telemetry reader. Returns within one read
    /// timeout.
    pub fn stop_telemetry(&mut self) {
        self.monitor.stop();
    }

    /// Whether the telemetry reader is running.
    pub fn telemetry_running(&self) -> bool {
        self.monitor.is_running()
    }

    /// The most recent raw telemetry line, for logging or display.
    pub fn latest_message(&self) -> String {
        self.monitor.latest()
    }

    /// The most recent telemetry line decoded as a joint or Cartesian
    /// frame, or `None` when it matches neither shape.
    pub fn latest_frame(&self) -> Option<TelemetryFrame> {
        TelemetryFrame::decode(&self.monitor.latest())
    }

    /// The mode the arm is believed to be in, inferred from the last
    /// control byte sent. The arm cannot be queried for its true mode.
    pub fn last_commanded_mode(&self) -> DeviceMode {
        *self.mode.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Writes dropped by the transport since this interface was created.
    pub fn write_failures(&self) -> u64 {
        self.transport_mut().write_failures()
    }

    /// Force the arm into command mode 14.
    ///
    /// The protocol has no mode query, so every motion and parameter
    /// command re-enters mode 14 through this sequence instead of trusting
    /// the last believed mode.
    pub fn force_command_mode(&self) {
        self.send_control(CTRL_RESET, MODE_SETTLE);
        self.send_control(CTRL_IDLE, MODE_SETTLE);
        self.send_control(CTRL_MODE14, MODE_SETTLE);
    }

    /// Start the arm's built-in origin-search program (limit-switch
    /// homing). Fire-and-forget: returns once the bytes are written.
    pub fn search_origin(&self) {
        self.send_control(CTRL_RESET, ORIGIN_SETTLE);
        self.send_control(CTRL_IDLE, ORIGIN_SETTLE);
        self.send_control(CTRL_SEARCH_ORIGIN, ORIGIN_SETTLE);
    }

    /// Command a return to the origin pose. Fire-and-forget; use
    /// [`back_to_origin_blocking`](Sanxi::back_to_origin_blocking) to wait
    /// for completion.
    pub fn back_to_origin(&self) {
        self.send_control(CTRL_RESET, ORIGIN_SETTLE);
        self.send_control(CTRL_IDLE, ORIGIN_SETTLE);
        self.send_control(CTRL_BACK_TO_ORIGIN, ORIGIN_SETTLE);
    }

    /// Command a return to origin and block until the arm reports
    /// completion or `timeout` expires.
    ///
    /// Completion is detected by polling the arm's status and watching the
    /// telemetry stream for the idle marker, so the telemetry reader must
    /// be running. Returns [`SanxiError::Timeout`] when the deadline
    /// passes first. Run this off the main control path: it sleeps in
    /// 300 ms poll intervals.
    pub fn back_to_origin_blocking(&self, timeout: Duration) -> Result<()> {
        self.back_to_origin();
        let deadline = Instant::now() + timeout;
        while self.monitor.latest() != IDLE_MARKER {
            if Instant::now() >= deadline {
                log::warn!("Return to origin not confirmed within {:?}", timeout);
                return Err(SanxiError::Timeout);
            }
            self.send_control(CTRL_STATUS_POLL, ORIGIN_POLL_INTERVAL);
        }
        Ok(())
    }

    /// Stop all motion immediately. Safe to call in any mode; leaves the
    /// arm idle.
    pub fn emergency_stop(&self) {
        self.send_control(CTRL_RESET, STOP_SETTLE);
        self.send_control(CTRL_IDLE, ORIGIN_SETTLE);
    }

    /// Set the arm's velocity, acceleration and deceleration, each as a
    /// percentage of the fixed maxima. The arm retains the values until
    /// they are overwritten or it is power-cycled.
    pub fn set_motion_params(&self, velocity_pct: u8, accel_pct: u8, decel_pct: u8) -> Result<()> {
        validate_pct("Velocity", velocity_pct)?;
        validate_pct("Acceleration", accel_pct)?;
        validate_pct("Deceleration", decel_pct)?;

        let ve = u32::from(velocity_pct) * VELOCITY_MAX / 100;
        let ac = u32::from(accel_pct) * ACCEL_MAX / 100;
        let de = u32::from(decel_pct) * DECEL_MAX / 100;

        self.force_command_mode();
        self.send_line(&format!("G07 VE={}\n", ve));
        thread::sleep(PARAM_SETTLE);
        self.send_line(&format!("G07 AC={}\n", ac));
        thread::sleep(PARAM_SETTLE);
        self.send_line(&format!("G07 DE={}\n", de));
        thread::sleep(PARAM_SETTLE);
        Ok(())
    }

    /// Move in Cartesian space. Axes whose target is absent or blank are
    /// omitted from the command and hold their position.
    pub fn move_cartesian(&self, mode: MoveMode, target: &CartesianTarget) {
        let line = render_move(mode.opcode(), &target.fields());
        self.force_command_mode();
        self.send_line(&line);
    }

    /// Move all six joints to the given angles (`G00`). Same
    /// omit-if-absent rule as [`move_cartesian`](Sanxi::move_cartesian).
    pub fn move_joints(&self, target: &JointTarget) {
        let line = render_move("G00", &target.fields());
        self.force_command_mode();
        self.send_line(&line);
    }

    /// Start jogging a single joint. Motion continues until
    /// [`jog_stop`](Sanxi::jog_stop) is called for the same axis.
    pub fn jog_start(&self, axis: u8, direction: JogDirection) -> Result<()> {
        validate_axis(axis)?;
        let positive = direction == JogDirection::Positive;
        // Joints 2, 3 and 5 have their jog polarity inverted by the drive
        // wiring; the sign on the wire differs from the panel direction.
        let sign = if matches!(axis, 2 | 3 | 5) {
            if positive {
                '+'
            } else {
                '-'
            }
        } else if positive {
            '-'
        } else {
            '+'
        };
        self.force_command_mode();
        self.send_line(&format!("J{}{}\n", axis, sign));
        Ok(())
    }

    /// Stop jogging a single joint. Does not touch the arm's mode, so it
    /// is safe to call at any time, including mid-jog.
    pub fn jog_stop(&self, axis: u8) -> Result<()> {
        validate_axis(axis)?;
        self.send_line(&format!("J{}0\n", axis));
        Ok(())
    }

    /// Send raw command lines straight through the protocol. Command mode
    /// is forced once, then each non-empty line is written with a fixed
    /// inter-line delay.
    pub fn send_raw<I, S>(&self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.force_command_mode();
        for line in lines {
            let line = line.as_ref().trim_end_matches('\n');
            if line.is_empty() {
                continue;
            }
            self.send_line(&format!("{}\n", line));
            thread::sleep(RAW_LINE_DELAY);
        }
    }

    /// Select which coordinate frame the arm streams in its telemetry.
    pub fn set_display_mode(&self, mode: DisplayMode) {
        let line = match mode {
            DisplayMode::Cartesian => "G07 GCM=1\n",
            DisplayMode::Joint => "G07 GCM=0\n",
        };
        self.send_line(line);
    }

    /// Send one control byte, record the mode it selects, and let the arm
    /// settle. Omitting the settle delays causes the arm to drop commands.
    fn send_control(&self, byte: u8, settle: Duration) {
        log::debug!("Control byte 0x{:02X}", byte);
        self.transport_mut().write_bytes(&[byte]);
        if let Some(mode) = DeviceMode::from_control_byte(byte) {
            *self.mode.lock().unwrap_or_else(PoisonError::into_inner) = mode;
        }
        thread::sleep(settle);
    }

    fn send_line(&self, line: &str) {
        log::debug!("Command line {:?}", line);
        self.transport_mut().write_bytes(line.as_bytes());
    }

    fn transport_mut(&self) -> MutexGuard<'_, Box<dyn Transport>> {
        self.transport.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Render a move command: the opcode, then `NAME=value` for every present
/// axis, then the terminating newline.
fn render_move(opcode: &str, fields: &[(&'static str, Option<&str>)]) -> String {
    let mut line = String::from(opcode);
    line.push(' ');
    for (name, value) in fields {
        if let Some(value) = value {
            if !value.trim().is_empty() {
                let _ = write!(line, "{}={} ", name, value);
            }
        }
    }
    line.push('\n');
    line
}

fn validate_axis(axis: u8) -> Result<()> {
    if (1..=JOINT_COUNT).contains(&axis) {
        Ok(())
    } else {
        Err(SanxiError::InvalidAxis { axis })
    }
}

fn validate_pct(name: &'static str, value: u8) -> Result<()> {
    if value <= 100 {
        Ok(())
    } else {
        Err(SanxiError::ParameterOutOfRange { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::render_move;

    #[test]
    fn render_move_omits_absent_and_blank_axes() {
        let fields = [
            ("X", Some("10.5")),
            ("Y", None),
            ("Z", Some("")),
            ("A", Some(" ")),
            ("B", Some("-3")),
        ];
        assert_eq!(render_move("G20", &fields), "G20 X=10.5 B=-3 \n");
    }

    #[test]
    fn render_move_with_no_axes_is_opcode_only() {
        let fields: [(&'static str, Option<&str>); 2] = [("X", None), ("Y", None)];
        assert_eq!(render_move("G00", &fields), "G00 \n");
    }
}
