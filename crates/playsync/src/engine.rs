//! Master selection and the pause/align/resume pass.
//!
//! The engine picks the player closest to its own buffered live edge as the
//! reference timeline, then brings every other player onto it. Alignment runs
//! as one logical pass: pause everything, seek the drifted players, wait for
//! the media pipelines to settle, resume everything. Passes are serialized;
//! a request arriving while a pass is in flight is coalesced into a single
//! follow-up pass instead of interleaving commands.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::SyncConfig;
use crate::handle::{MediaHandle, ReadyState};
use crate::registry::{PlayerRegistry, RegisterOutcome};

/// A handle's observable state, read once per pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandleSnapshot {
    pub ready_state: ReadyState,
    pub current_time: f64,
    /// End of the last buffered range; `None` when nothing is buffered.
    pub live_edge: Option<f64>,
}

impl HandleSnapshot {
    pub fn capture(handle: &dyn MediaHandle) -> Self {
        Self {
            ready_state: handle.ready_state(),
            current_time: handle.current_time(),
            live_edge: handle.live_edge(),
        }
    }

    /// Distance between the playback position and the buffered live edge.
    ///
    /// An empty buffer contributes a live edge of `0`, so the distance equals
    /// the playback position itself and the player makes a poor master
    /// candidate by construction.
    pub fn live_edge_distance(&self) -> f64 {
        (self.live_edge.unwrap_or(0.0) - self.current_time).abs()
    }
}

/// Select the reference player for an alignment pass.
///
/// Returns the index of the candidate with the smallest live-edge distance
/// among players at or above `min_ready`, ties resolved in favor of the
/// earlier-registered player. When every player is below `min_ready` the
/// first-registered player is selected regardless of readiness, so a
/// non-empty input never yields `None`.
pub fn select_master(snapshots: &[HandleSnapshot], min_ready: ReadyState) -> Option<usize> {
    if snapshots.is_empty() {
        return None;
    }

    let mut best_index = None;
    let mut best_distance = f64::INFINITY;

    for (index, snapshot) in snapshots.iter().enumerate() {
        if snapshot.ready_state < min_ready {
            continue;
        }

        let distance = snapshot.live_edge_distance();
        if distance < best_distance {
            best_distance = distance;
            best_index = Some(index);
        }
    }

    best_index.or(Some(0))
}

/// Outcome of one `sync_all` request.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncReport {
    /// Players the pass operated on.
    pub players: usize,
    /// Registration index of the selected master, if any player was tracked.
    pub master: Option<usize>,
    /// Timeline position every player was aligned to.
    pub target_time: f64,
    /// Seeks actually issued; drifts within tolerance are left alone.
    pub seeks: usize,
    /// Pause/seek/play commands that failed and were contained.
    pub command_failures: usize,
    /// The request arrived while a pass was in flight and was folded into it.
    pub coalesced: bool,
}

impl SyncReport {
    fn empty() -> Self {
        Self {
            players: 0,
            master: None,
            target_time: 0.0,
            seeks: 0,
            command_failures: 0,
            coalesced: false,
        }
    }

    fn coalesced() -> Self {
        Self {
            coalesced: true,
            ..Self::empty()
        }
    }
}

/// Coordinates synchronized playback across the registered players.
///
/// Media elements offer no locking primitive, so the engine's serialized pass
/// is the substitute: only one pass may be in flight, and no handle ever
/// receives overlapping pause/seek/play instructions.
pub struct SyncEngine {
    config: SyncConfig,
    registry: Mutex<PlayerRegistry>,
    pass_gate: Mutex<()>,
    resync_pending: AtomicBool,
}

impl SyncEngine {
    pub fn new(config: SyncConfig) -> Self {
        let registry = PlayerRegistry::new(config.expected_players);
        Self {
            config,
            registry: Mutex::new(registry),
            pass_gate: Mutex::new(()),
            resync_pending: AtomicBool::new(false),
        }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Number of currently registered players.
    pub async fn players(&self) -> usize {
        self.registry.lock().await.len()
    }

    /// Register a player and start an automatic alignment pass when the
    /// expected population is reached.
    ///
    /// The pass is spawned, so it observes the registry only after this call
    /// completes; its commands are still serialized through the pass gate.
    pub async fn register(self: &Arc<Self>, handle: Arc<dyn MediaHandle>) -> RegisterOutcome {
        let outcome = {
            let mut registry = self.registry.lock().await;
            registry.register(handle)
        };

        if outcome.reached_expected {
            let engine = Arc::clone(self);
            info!("expected player population reached, aligning playback");
            tokio::spawn(async move {
                engine.sync_all().await;
            });
        }

        outcome
    }

    /// Drop every registered player, for when the player set is rebuilt.
    pub async fn clear(&self) {
        self.registry.lock().await.clear();
    }

    /// Align every registered player to the master timeline.
    ///
    /// Runs at most one pass at a time. A request arriving while a pass is in
    /// flight (typically inside the settle wait) marks a follow-up and
    /// returns immediately with a coalesced report; the in-flight pass runs
    /// one more pass before releasing the gate.
    ///
    /// # Cancel Safety
    ///
    /// Dropping the future mid-pass can leave players paused, but never
    /// issues further commands; the next pass re-aligns and resumes them.
    pub async fn sync_all(&self) -> SyncReport {
        let Ok(_gate) = self.pass_gate.try_lock() else {
            self.resync_pending.store(true, Ordering::SeqCst);
            debug!("alignment pass already in flight, coalescing request");
            return SyncReport::coalesced();
        };

        let mut report = self.run_pass().await;
        while self.resync_pending.swap(false, Ordering::SeqCst) {
            report = self.run_pass().await;
        }
        report
    }

    async fn run_pass(&self) -> SyncReport {
        let handles = self.registry.lock().await.handles();
        if handles.is_empty() {
            debug!("no players registered, skipping alignment pass");
            return SyncReport::empty();
        }

        // One consistent read per handle for the whole pass.
        let snapshots: Vec<HandleSnapshot> = handles
            .iter()
            .map(|handle| HandleSnapshot::capture(handle.as_ref()))
            .collect();

        let master = select_master(&snapshots, self.config.min_ready);
        let target_time = master
            .map(|index| snapshots[index].current_time)
            .filter(|time| time.is_finite())
            .unwrap_or(0.0);

        let mut command_failures = 0;

        // Pause everything first; aligning against still-advancing positions
        // would race the seeks issued below.
        for (index, handle) in handles.iter().enumerate() {
            if let Err(error) = handle.pause() {
                warn!(player = index, %error, "failed to pause player");
                command_failures += 1;
            }
        }

        let mut seeks = 0;
        for (index, (handle, snapshot)) in handles.iter().zip(&snapshots).enumerate() {
            let drift = (snapshot.current_time - target_time).abs();
            if drift > self.config.drift_tolerance_secs {
                match handle.seek(target_time) {
                    Ok(()) => seeks += 1,
                    Err(error) => {
                        warn!(player = index, %error, "failed to seek player");
                        command_failures += 1;
                    }
                }
            }
        }

        // Let the media pipelines finish the seeks before resuming.
        tokio::time::sleep(self.config.settle_delay).await;

        // Resume every player, including any that failed earlier steps. A
        // handle whose session died during the wait reports Detached here and
        // is skipped without failing the pass.
        for (index, handle) in handles.iter().enumerate() {
            if let Err(error) = handle.play() {
                warn!(player = index, %error, "failed to resume player");
                command_failures += 1;
            }
        }

        debug!(
            players = handles.len(),
            master = ?master,
            target_time,
            seeks,
            command_failures,
            "alignment pass complete"
        );

        SyncReport {
            players: handles.len(),
            master,
            target_time,
            seeks,
            command_failures,
            coalesced: false,
        }
    }
}
