//! Shared fakes for exercising the engine without real media elements.

use std::sync::{Arc, Mutex};

use crate::handle::{HandleError, MediaHandle, ReadyState, TimeRange};

/// Initialize tracing for tests with appropriate settings
#[inline]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// One command delivered to a fake handle, tagged with the player id.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Op {
    Pause(usize),
    Seek(usize, f64),
    Play(usize),
}

/// Order-preserving recorder shared by every fake handle in a test, so the
/// global command order across players can be asserted.
#[derive(Clone, Default)]
pub struct CommandLog {
    ops: Arc<Mutex<Vec<Op>>>,
}

impl CommandLog {
    pub fn record(&self, op: Op) {
        self.ops.lock().unwrap().push(op);
    }

    pub fn ops(&self) -> Vec<Op> {
        self.ops.lock().unwrap().clone()
    }
}

/// In-memory media handle with scripted state.
///
/// Seeks move the fake's position, so a second pass over unchanged players
/// observes the aligned timeline exactly like a real element would.
pub struct FakeHandle {
    id: usize,
    ready_state: ReadyState,
    current_time: Mutex<f64>,
    buffered: Vec<TimeRange>,
    log: CommandLog,
    detached: bool,
}

impl FakeHandle {
    pub fn new(
        log: CommandLog,
        id: usize,
        ready_state: ReadyState,
        current_time: f64,
        buffered: &[TimeRange],
    ) -> Self {
        Self {
            id,
            ready_state,
            current_time: Mutex::new(current_time),
            buffered: buffered.to_vec(),
            log,
            detached: false,
        }
    }

    /// A fully buffered, master-eligible player.
    pub fn ready(log: CommandLog, id: usize, current_time: f64, buffered: &[TimeRange]) -> Self {
        Self::new(log, id, ReadyState::EnoughData, current_time, buffered)
    }

    /// Make every command fail as if the backing session had closed.
    pub fn with_detached(mut self) -> Self {
        self.detached = true;
        self
    }
}

impl MediaHandle for FakeHandle {
    fn ready_state(&self) -> ReadyState {
        self.ready_state
    }

    fn current_time(&self) -> f64 {
        *self.current_time.lock().unwrap()
    }

    fn buffered(&self) -> Vec<TimeRange> {
        self.buffered.clone()
    }

    fn pause(&self) -> Result<(), HandleError> {
        if self.detached {
            return Err(HandleError::Detached);
        }
        self.log.record(Op::Pause(self.id));
        Ok(())
    }

    fn seek(&self, position: f64) -> Result<(), HandleError> {
        if self.detached {
            return Err(HandleError::Detached);
        }
        *self.current_time.lock().unwrap() = position;
        self.log.record(Op::Seek(self.id, position));
        Ok(())
    }

    fn play(&self) -> Result<(), HandleError> {
        if self.detached {
            return Err(HandleError::Detached);
        }
        self.log.record(Op::Play(self.id));
        Ok(())
    }
}
