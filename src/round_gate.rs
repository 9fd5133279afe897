//! One-shot, resettable broadcast gate that starts the race for chairs.
//!
//! The coordinator drives the gate through `reset(round)` -> `open()` once per round, and
//! `shut_down()` once at the end of the game. Player threads only call
//! [`wait_until_open`](RoundGate::wait_until_open).
//!
//! The released flag, the round tag and the wake-up all live behind a single mutex, so a thread
//! that starts waiting while the gate opens either sees the flag already set or is parked before
//! the notification is sent. Passing the gate is decided by the state, never by the
//! notification alone, which makes an already-open gate an immediate pass.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tracing::trace;

/// Why a waiting player was let through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Release {
    /// The music stopped for the given round.
    Open(usize),
    /// The game is over.
    ShutDown,
}

#[derive(Debug, Default)]
struct GateState {
    /// Round the gate was last reset for. `None` before the first round.
    round: Option<usize>,
    released: bool,
    shut_down: bool,
}

impl GateState {
    fn release_for(&self, round: usize) -> Option<Release> {
        if self.shut_down {
            return Some(Release::ShutDown);
        }
        match self.round {
            Some(current) if self.released && current >= round => Some(Release::Open(current)),
            _ => None,
        }
    }
}

/// Broadcast gate holding every player until the music stops.
#[derive(Debug, Default)]
pub struct RoundGate {
    state: Mutex<GateState>,
    signal: Condvar,
}

impl RoundGate {
    /// A closed gate that has never been opened.
    pub fn new() -> Self {
        Self::default()
    }

    // every update is a single store, a poisoned state is still consistent
    fn lock(&self) -> MutexGuard<'_, GateState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Closes the gate for `round`.
    ///
    /// Players that finished the previous round are already waiting for `round` and stay parked,
    /// even though the gate was open a moment ago.
    pub fn reset(&self, round: usize) {
        let mut state = self.lock();
        debug_assert!(
            state.round.map_or(true, |previous| previous < round),
            "gate reset for round {round} after round {:?}",
            state.round
        );
        state.round = Some(round);
        state.released = false;
        trace!(round, "gate closed");
    }

    /// Releases every player waiting for the current round, and any that arrives later.
    pub fn open(&self) {
        let mut state = self.lock();
        state.released = true;
        trace!(round = ?state.round, "gate open");
        self.signal.notify_all();
    }

    /// Releases every player for good. Later calls to
    /// [`wait_until_open`](RoundGate::wait_until_open) return immediately.
    pub fn shut_down(&self) {
        let mut state = self.lock();
        state.shut_down = true;
        trace!("gate shut down");
        self.signal.notify_all();
    }

    /// Blocks until the gate opens for `round` (or a later round), or shuts down.
    pub fn wait_until_open(&self, round: usize) -> Release {
        let mut state = self.lock();
        loop {
            if let Some(release) = state.release_for(round) {
                return release;
            }
            state = self
                .signal
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Same as [`wait_until_open`](RoundGate::wait_until_open), giving up after `timeout`.
    pub fn wait_until_open_timeout(&self, round: usize, timeout: Duration) -> Option<Release> {
        let state = self.lock();
        let (state, _) = self
            .signal
            .wait_timeout_while(state, timeout, |s| s.release_for(round).is_none())
            .unwrap_or_else(PoisonError::into_inner);
        state.release_for(round)
    }

    /// True if a player waiting for the last reset round would pass right now, which includes
    /// every player once the gate is shut down.
    pub fn is_open(&self) -> bool {
        let state = self.lock();
        state.released || state.shut_down
    }
}
