//! Background telemetry reader.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::transport::SharedTransport;

/// Pause between reader iterations, so command writes can take the
/// transport lock between reads.
const READER_YIELD: Duration = Duration::from_millis(2);

/// Continuously reads telemetry lines from the transport and publishes the
/// most recent non-empty one.
///
/// The monitor runs at most one reader thread. The published value is a
/// single overwrite slot, not a queue: readers always observe the latest
/// complete line, and older unread lines are discarded. Stopping is
/// cooperative -- the reader notices the flag after its current read
/// unblocks, so [`stop`](TelemetryMonitor::stop) can take up to one read
/// timeout to return.
pub struct TelemetryMonitor {
    transport: SharedTransport,
    running: Arc<AtomicBool>,
    latest: Arc<Mutex<String>>,
    handle: Option<JoinHandle<()>>,
}

impl TelemetryMonitor {
    /// Create a monitor over a shared transport. No thread is started yet.
    pub fn new(transport: SharedTransport) -> Self {
        TelemetryMonitor {
            transport,
            running: Arc::new(AtomicBool::new(false)),
            latest: Arc::new(Mutex::new(String::new())),
            handle: None,
        }
    }

    /// Start the reader thread. A no-op when the monitor is already
    /// running.
    pub fn start(&mut self) {
        if self.handle.is_some() {
            return;
        }
        self.running.store(true, Ordering::Relaxed);

        let transport = Arc::clone(&self.transport);
        let running = Arc::clone(&self.running);
        let latest = Arc::clone(&self.latest);

        let spawned = thread::Builder::new()
            .name("sanxi-telemetry".to_string())
            .spawn(move || {
                Self::reader_loop(transport, running, latest);
            });
        match spawned {
            Ok(handle) => self.handle = Some(handle),
            Err(e) => {
                self.running.store(false, Ordering::Relaxed);
                log::error!("Failed to spawn telemetry reader: {}", e);
            }
        }
    }

    /// Whether the reader thread is currently running.
    pub fn is_running(&self) -> bool {
        self.handle.is_some() && self.running.load(Ordering::Relaxed)
    }

    /// Stop the reader thread and wait for it to exit. Returns within one
    /// read-timeout interval.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("Telemetry reader panicked");
            }
        }
    }

    /// The most recently published telemetry line, or an empty string if
    /// nothing has been received yet.
    pub fn latest(&self) -> String {
        match self.latest.lock() {
            Ok(slot) => slot.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn reader_loop(
        transport: SharedTransport,
        running: Arc<AtomicBool>,
        latest: Arc<Mutex<String>>,
    ) {
        log::info!("Telemetry reader started");
        while running.load(Ordering::Relaxed) {
            let line = {
                let Ok(mut transport) = transport.lock() else {
                    log::error!("Telemetry reader: transport mutex poisoned, exiting");
                    break;
                };
                transport.read_line()
            };
            if !line.is_empty() {
                log::trace!("Telemetry: {:?}", line);
                match latest.lock() {
                    Ok(mut slot) => *slot = line,
                    Err(poisoned) => *poisoned.into_inner() = line,
                }
            }
            thread::sleep(READER_YIELD);
        }
        running.store(false, Ordering::Relaxed);
        log::info!("Telemetry reader exiting");
    }
}

impl Drop for TelemetryMonitor {
    fn drop(&mut self) {
        self.stop();
    }
}
