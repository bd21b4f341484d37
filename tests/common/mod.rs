#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use sanxi_protocol::{shared, SharedTransport, Transport};

/// Shared state of a scripted transport, inspectable from the test while
/// the transport itself is owned by the `Sanxi` under test.
#[derive(Default)]
pub struct MockState {
    pub reads: VecDeque<String>,
    pub written: Vec<Vec<u8>>,
    pub fail_writes: bool,
    pub write_failures: u64,
    pub open: bool,
}

/// In-memory transport that serves scripted read lines and records every
/// write. Once the read script is exhausted it behaves like a quiet line:
/// every further read times out empty.
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl Transport for MockTransport {
    fn open(&mut self) -> bool {
        self.state.lock().unwrap().open = true;
        true
    }

    fn close(&mut self) -> bool {
        self.state.lock().unwrap().open = false;
        true
    }

    fn is_open(&self) -> bool {
        self.state.lock().unwrap().open
    }

    fn write_bytes(&mut self, bytes: &[u8]) {
        let mut state = self.state.lock().unwrap();
        if !state.open {
            return;
        }
        if state.fail_writes {
            state.write_failures += 1;
            return;
        }
        state.written.push(bytes.to_vec());
    }

    fn read_line(&mut self) -> String {
        let mut state = self.state.lock().unwrap();
        if !state.open {
            return String::new();
        }
        state.reads.pop_front().unwrap_or_default()
    }

    fn write_failures(&self) -> u64 {
        self.state.lock().unwrap().write_failures
    }
}

/// Build an open scripted transport plus a handle to its state.
pub fn scripted(reads: &[&str]) -> (SharedTransport, Arc<Mutex<MockState>>) {
    let state = Arc::new(Mutex::new(MockState {
        reads: reads.iter().map(|s| s.to_string()).collect(),
        open: true,
        ..Default::default()
    }));
    let transport = shared(MockTransport {
        state: Arc::clone(&state),
    });
    (transport, state)
}

/// Everything written so far, as raw byte chunks in send order.
pub fn written_bytes(state: &Arc<Mutex<MockState>>) -> Vec<Vec<u8>> {
    state.lock().unwrap().written.clone()
}

/// The text command lines written so far, skipping single control bytes.
pub fn written_lines(state: &Arc<Mutex<MockState>>) -> Vec<String> {
    state
        .lock()
        .unwrap()
        .written
        .iter()
        .filter(|chunk| chunk.len() > 1)
        .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
        .collect()
}
