//! Serial transport layer.
//!
//! [`Transport`] is the seam between the protocol logic and the wire: the
//! production implementation ([`SerialTransport`]) owns a `serialport`
//! handle, while tests and alternative back-ends provide their own. All I/O
//! faults are captured here and reported as status values or logged --
//! nothing at this boundary panics or propagates an error into the
//! command-issuing layers.

use std::io::{self, Read, Write};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serialport::SerialPort;

use crate::constants::{BAUD_RATE, READ_TIMEOUT};

/// Byte-in, line-out channel to the arm.
///
/// The same object is shared between the background telemetry reader and
/// the command-issuing calls, so implementations must be [`Send`]. Writes
/// are fire-and-forget: the arm never acknowledges them, so a failed write
/// is logged and counted, not surfaced as an error.
pub trait Transport: Send {
    /// Attempt to open the configured channel. Returns `true` iff the
    /// channel is usable afterwards. Never panics on failure.
    fn open(&mut self) -> bool;

    /// Close the channel. Returns `true` iff the channel is confirmed
    /// closed afterwards.
    fn close(&mut self) -> bool;

    /// Whether the channel is currently open.
    fn is_open(&self) -> bool;

    /// Write raw bytes. A no-op (with a logged warning) when the channel
    /// is closed or the underlying write fails.
    fn write_bytes(&mut self, bytes: &[u8]);

    /// Read the next newline-delimited payload, decoded as text with the
    /// trailing newline stripped. Returns whatever arrived before the read
    /// timeout -- possibly a partial line, possibly empty. Decode failures
    /// are replaced lossily, never propagated.
    fn read_line(&mut self) -> String;

    /// Number of writes that failed since the transport was created.
    fn write_failures(&self) -> u64;
}

/// Transport handle shared between the telemetry reader thread and the
/// synchronous command path.
pub type SharedTransport = Arc<Mutex<Box<dyn Transport>>>;

/// Wrap a transport for shared use.
pub fn shared(transport: impl Transport + 'static) -> SharedTransport {
    Arc::new(Mutex::new(Box::new(transport)))
}

/// Production transport over a serial port.
pub struct SerialTransport {
    port_name: String,
    baud_rate: u32,
    timeout: Duration,
    port: Option<Box<dyn SerialPort>>,
    write_failures: u64,
}

impl SerialTransport {
    /// Configure a transport for `port_name` with the arm's standard
    /// settings (115200 baud, 200 ms read timeout). No I/O happens until
    /// [`Transport::open`].
    pub fn new(port_name: &str) -> Self {
        Self::with_settings(port_name, BAUD_RATE, READ_TIMEOUT)
    }

    /// Configure a transport with explicit settings.
    pub fn with_settings(port_name: &str, baud_rate: u32, timeout: Duration) -> Self {
        SerialTransport {
            port_name: port_name.to_string(),
            baud_rate,
            timeout,
            port: None,
            write_failures: 0,
        }
    }

    /// The configured port name.
    pub fn port_name(&self) -> &str {
        &self.port_name
    }
}

impl Transport for SerialTransport {
    fn open(&mut self) -> bool {
        if self.port.is_some() {
            return true;
        }
        match serialport::new(&self.port_name, self.baud_rate)
            .timeout(self.timeout)
            .open()
        {
            Ok(port) => {
                log::info!("Opened {} at {} baud", self.port_name, self.baud_rate);
                self.port = Some(port);
                true
            }
            Err(e) => {
                log::warn!("Failed to open {}: {}", self.port_name, e);
                false
            }
        }
    }

    fn close(&mut self) -> bool {
        if self.port.take().is_some() {
            log::info!("Closed {}", self.port_name);
        }
        // Dropping the handle releases the device.
        !self.is_open()
    }

    fn is_open(&self) -> bool {
        self.port.is_some()
    }

    fn write_bytes(&mut self, bytes: &[u8]) {
        let Some(port) = self.port.as_mut() else {
            log::warn!("Dropped {}-byte write: port not open", bytes.len());
            return;
        };
        if let Err(e) = port.write_all(bytes) {
            self.write_failures += 1;
            log::warn!("Serial write failed: {}", e);
        } else {
            log::trace!("Sent {:02X?}", bytes);
        }
    }

    fn read_line(&mut self) -> String {
        let Some(port) = self.port.as_mut() else {
            return String::new();
        };
        let mut buf: Vec<u8> = Vec::new();
        let mut byte = [0u8; 1];
        loop {
            match port.read(&mut byte) {
                Ok(0) => break,
                Ok(_) => {
                    if byte[0] == b'\n' {
                        break;
                    }
                    buf.push(byte[0]);
                }
                Err(e) if e.kind() == io::ErrorKind::TimedOut => break,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    log::warn!("Serial read failed: {}", e);
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    fn write_failures(&self) -> u64 {
        self.write_failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_on_unavailable_port_reports_false() {
        let mut transport = SerialTransport::new("/dev/ttyNONEXISTENT99");
        assert!(!transport.open());
        assert!(!transport.is_open());
    }

    #[test]
    fn closed_transport_ignores_io() {
        let mut transport = SerialTransport::new("/dev/ttyNONEXISTENT99");
        transport.write_bytes(&[0x10]);
        assert_eq!(transport.read_line(), "");
        assert!(transport.close());
        assert_eq!(transport.write_failures(), 0);
    }
}
