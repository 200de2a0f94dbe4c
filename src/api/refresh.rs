use crate::error::Error;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::oneshot;

/// How a refresh attempt ended, fanned out to every queued request.
#[derive(Debug, Clone)]
pub(crate) enum RefreshOutcome {
    Refreshed(String),
    Failed(Arc<Error>),
}

/// Admission result for a request that just saw a 401.
#[derive(Debug)]
pub(crate) enum Ticket<'a> {
    /// This request performs the token exchange and must settle the guard.
    Lead(LeadGuard<'a>),
    /// Another request is already refreshing; await its outcome.
    Wait(oneshot::Receiver<RefreshOutcome>),
}

/// Single-flight gate around the token refresh.
///
/// At most one refresh runs at a time. The flag flips inside a plain std
/// mutex that is never held across an await, so every 401 that arrives while
/// an exchange is in flight queues behind it instead of racing it.
#[derive(Debug, Default)]
pub(crate) struct RefreshGate {
    state: Mutex<GateState>,
}

#[derive(Debug, Default)]
struct GateState {
    refreshing: bool,
    waiters: Vec<oneshot::Sender<RefreshOutcome>>,
}

impl RefreshGate {
    pub(crate) fn begin_or_wait(&self) -> Ticket<'_> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.refreshing {
            let (tx, rx) = oneshot::channel();
            state.waiters.push(tx);
            Ticket::Wait(rx)
        } else {
            state.refreshing = true;
            Ticket::Lead(LeadGuard { gate: self, settled: false })
        }
    }

    /// Clears the flag and hands `outcome` to the queued requests in arrival
    /// order. Once the lock is released a new 401 may start a fresh cycle;
    /// the waiters drained here already belong to this one.
    fn settle(&self, outcome: &RefreshOutcome) {
        let waiters = {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            state.refreshing = false;
            std::mem::take(&mut state.waiters)
        };
        for waiter in waiters {
            // A queued request may have been cancelled meanwhile.
            let _ = waiter.send(outcome.clone());
        }
    }
}

/// Obliges the leading request to settle the gate. If the leader is dropped
/// mid-exchange the queue is failed rather than parked forever.
#[derive(Debug)]
pub(crate) struct LeadGuard<'a> {
    gate: &'a RefreshGate,
    settled: bool,
}

impl LeadGuard<'_> {
    pub(crate) fn settle(mut self, outcome: &RefreshOutcome) {
        self.settled = true;
        self.gate.settle(outcome);
    }
}

impl Drop for LeadGuard<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.gate.settle(&RefreshOutcome::Failed(Arc::new(Error::Unauthorized)));
        }
    }
}
