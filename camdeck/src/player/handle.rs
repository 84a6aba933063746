//! Media handle backed by a live player session.

use std::sync::Arc;

use parking_lot::RwLock;
use playsync::{HandleError, MediaHandle, ReadyState, TimeRange};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use crate::player::protocol::ServerCommand;

/// Commands buffered towards a player before backpressure kicks in.
const COMMAND_QUEUE_CAPACITY: usize = 16;

#[derive(Debug, Clone)]
struct PlayerState {
    current_time: f64,
    ready_state: ReadyState,
    buffered: Vec<TimeRange>,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            current_time: 0.0,
            ready_state: ReadyState::Nothing,
            buffered: Vec::new(),
        }
    }
}

/// A remote player's media element, observed through its state reports and
/// driven through its session socket.
///
/// Reads return the last reported state, so a pass observes one consistent
/// instant per handle. Commands are queued towards the socket writer; a
/// closed session surfaces as [`HandleError::Detached`] and is contained by
/// the pass rather than failing it.
pub struct RemoteHandle {
    stream: String,
    state: RwLock<PlayerState>,
    commands: mpsc::Sender<ServerCommand>,
}

impl RemoteHandle {
    /// Create a handle and the command receiver its session writer drains.
    pub fn channel(stream: String) -> (Arc<Self>, mpsc::Receiver<ServerCommand>) {
        let (commands, receiver) = mpsc::channel(COMMAND_QUEUE_CAPACITY);
        let handle = Arc::new(Self {
            stream,
            state: RwLock::new(PlayerState::default()),
            commands,
        });
        (handle, receiver)
    }

    /// Camera stream this player carries.
    pub fn stream(&self) -> &str {
        &self.stream
    }

    /// Apply a state report from the player.
    pub fn apply_report(&self, current_time: f64, ready_state: u8, buffered: &[(f64, f64)]) {
        let mut state = self.state.write();
        state.current_time = current_time;
        state.ready_state = ReadyState::from_ordinal(ready_state);
        state.buffered = buffered
            .iter()
            .map(|&(start, end)| TimeRange::new(start, end))
            .collect();
    }

    fn send(&self, command: ServerCommand) -> Result<(), HandleError> {
        match self.commands.try_send(command) {
            Ok(()) => Ok(()),
            Err(TrySendError::Closed(_)) => Err(HandleError::Detached),
            Err(TrySendError::Full(_)) => Err(HandleError::rejected("command queue full")),
        }
    }
}

impl MediaHandle for RemoteHandle {
    fn ready_state(&self) -> ReadyState {
        self.state.read().ready_state
    }

    fn current_time(&self) -> f64 {
        self.state.read().current_time
    }

    fn buffered(&self) -> Vec<TimeRange> {
        self.state.read().buffered.clone()
    }

    fn pause(&self) -> Result<(), HandleError> {
        self.send(ServerCommand::Pause)
    }

    fn seek(&self, position: f64) -> Result<(), HandleError> {
        self.send(ServerCommand::Seek { time: position })
    }

    fn play(&self) -> Result<(), HandleError> {
        self.send(ServerCommand::Play)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreported_handle_is_not_master_material() {
        let (handle, _receiver) = RemoteHandle::channel("cam1".to_string());
        assert_eq!(handle.ready_state(), ReadyState::Nothing);
        assert_eq!(handle.current_time(), 0.0);
        assert!(handle.buffered().is_empty());
        assert_eq!(handle.live_edge(), None);
    }

    #[test]
    fn report_updates_observable_state() {
        let (handle, _receiver) = RemoteHandle::channel("cam1".to_string());
        handle.apply_report(12.5, 4, &[(0.0, 5.0), (7.0, 12.9)]);

        assert_eq!(handle.ready_state(), ReadyState::EnoughData);
        assert_eq!(handle.current_time(), 12.5);
        assert_eq!(handle.live_edge(), Some(12.9));
    }

    #[tokio::test]
    async fn commands_arrive_in_issue_order() {
        let (handle, mut receiver) = RemoteHandle::channel("cam2".to_string());

        handle.pause().unwrap();
        handle.seek(10.05).unwrap();
        handle.play().unwrap();

        assert_eq!(receiver.recv().await, Some(ServerCommand::Pause));
        assert_eq!(receiver.recv().await, Some(ServerCommand::Seek { time: 10.05 }));
        assert_eq!(receiver.recv().await, Some(ServerCommand::Play));
    }

    #[test]
    fn closed_session_reports_detached() {
        let (handle, receiver) = RemoteHandle::channel("cam3".to_string());
        drop(receiver);

        assert!(matches!(handle.pause(), Err(HandleError::Detached)));
        assert!(matches!(handle.play(), Err(HandleError::Detached)));
    }

    #[test]
    fn full_queue_rejects_instead_of_blocking() {
        let (handle, _receiver) = RemoteHandle::channel("cam4".to_string());
        for _ in 0..COMMAND_QUEUE_CAPACITY {
            handle.pause().unwrap();
        }
        assert!(matches!(
            handle.play(),
            Err(HandleError::Rejected { .. })
        ));
    }
}
