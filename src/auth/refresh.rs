//! Single-flight refresh coordination
//!
//! At most one refresh-token exchange is in flight at any time. The first
//! request to hit a 401 becomes the leader and performs the exchange; every
//! concurrent 401 enqueues a waiter and suspends until the leader settles.
//! Waiters are released in FIFO enqueue order, each resolved exactly once.
//!
//! The Idle/Refreshing flag is checked and set before any suspension point,
//! which is what enforces the single-flight invariant.

use tokio::sync::{oneshot, Mutex};

use crate::error::ApiError;

enum RefreshState {
    Idle,
    Refreshing(Vec<oneshot::Sender<Result<(), ApiError>>>),
}

/// Outcome of joining the coordinator on a 401.
pub(crate) enum Ticket {
    /// This caller must perform the refresh and then call `settle`.
    Leader,
    /// A refresh is already in flight; await the shared outcome.
    Follower(oneshot::Receiver<Result<(), ApiError>>),
}

/// Per-client coordinator state. Not ambient: each `ApiClient` owns one, so
/// two clients in the same process never serialize each other's refreshes.
pub(crate) struct RefreshCoordinator {
    state: Mutex<RefreshState>,
}

impl RefreshCoordinator {
    pub(crate) fn new() -> Self {
        Self {
            state: Mutex::new(RefreshState::Idle),
        }
    }

    /// Join the coordinator after a 401. The state transition happens under
    /// the lock, before the caller suspends on any network I/O.
    pub(crate) async fn join(&self) -> Ticket {
        let mut state = self.state.lock().await;
        match &mut *state {
            RefreshState::Idle => {
                *state = RefreshState::Refreshing(Vec::new());
                Ticket::Leader
            }
            RefreshState::Refreshing(waiters) => {
                let (tx, rx) = oneshot::channel();
                waiters.push(tx);
                Ticket::Follower(rx)
            }
        }
    }

    /// Transition back to Idle and release every waiter, in enqueue order,
    /// with a copy of the outcome.
    pub(crate) async fn settle(&self, outcome: &Result<(), ApiError>) {
        let waiters = {
            let mut state = self.state.lock().await;
            match std::mem::replace(&mut *state, RefreshState::Idle) {
                RefreshState::Refreshing(waiters) => waiters,
                RefreshState::Idle => Vec::new(),
            }
        };

        if !waiters.is_empty() {
            tracing::debug!("Releasing {} request(s) queued behind refresh", waiters.len());
        }
        for tx in waiters {
            // A dropped receiver means the waiting task went away; fine.
            let _ = tx.send(outcome.clone());
        }
    }
}
