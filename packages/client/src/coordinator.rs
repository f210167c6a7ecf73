//! # Refresh coordination
//!
//! When several requests hit an expired access token at the same time, each of
//! them gets a 401. Only one of them may call the refresh endpoint; the rest
//! wait for that call and then act on its result.
//!
//! ## Roles
//!
//! [`RefreshCoordinator::begin_refresh`] decides, under a lock, which role a
//! caller plays in the current refresh cycle:
//!
//! - **Driver**: the first caller while idle. It receives a [`RefreshTicket`],
//!   performs the refresh and ends the cycle with [`RefreshTicket::complete`].
//! - **Waiter**: any caller while a refresh is in flight. It receives a
//!   [`RefreshWaiter`] and awaits the driver's [`RefreshOutcome`].
//!
//! Completing a cycle returns the coordinator to idle and hands the same
//! outcome to every waiter in registration order. Only a ticket can complete a
//! cycle, so only the driver can. A ticket dropped without being completed
//! (the driver's future was cancelled, or it panicked) fails the cycle with
//! [`RefreshFailure::Abandoned`] rather than leaving waiters suspended. The
//! oldest waiter still listening is then told to end the session in the
//! driver's place (see [`Settled::end_session`]).

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use reqwest::StatusCode;
use tokio::sync::oneshot;

/// Why a refresh cycle failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshFailure {
    /// The refresh endpoint answered with a non-success status.
    Rejected { status: StatusCode },
    /// The refresh endpoint could not be reached.
    Unreachable(String),
    /// The driver went away without reporting an outcome.
    Abandoned,
}

impl fmt::Display for RefreshFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefreshFailure::Rejected { status } => write!(f, "token refresh rejected ({status})"),
            RefreshFailure::Unreachable(reason) => write!(f, "token refresh failed: {reason}"),
            RefreshFailure::Abandoned => f.write_str("token refresh abandoned"),
        }
    }
}

/// Result of one refresh cycle, shared by the driver and all waiters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    Refreshed,
    Failed(RefreshFailure),
}

/// What a waiter learns when its cycle ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settled {
    pub outcome: RefreshOutcome,
    /// Set for exactly one waiter of an abandoned cycle.
    pub end_session: bool,
}

#[derive(Debug, Default)]
struct CoordinatorState {
    in_flight: bool,
    waiters: VecDeque<oneshot::Sender<Settled>>,
}

/// Serializes token refreshes across concurrent requests.
#[derive(Debug, Default)]
pub struct RefreshCoordinator {
    state: Mutex<CoordinatorState>,
}

/// The part a caller plays in the current refresh cycle.
#[derive(Debug)]
pub enum RefreshRole<'a> {
    Driver(RefreshTicket<'a>),
    Waiter(RefreshWaiter),
}

impl RefreshCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Become the driver of a new cycle, or a waiter on the one in flight.
    pub fn begin_refresh(&self) -> RefreshRole<'_> {
        let mut state = self.lock();
        if state.in_flight {
            let (tx, rx) = oneshot::channel();
            state.waiters.push_back(tx);
            tracing::debug!(waiting = state.waiters.len(), "refresh in flight, queued");
            RefreshRole::Waiter(RefreshWaiter { rx })
        } else {
            state.in_flight = true;
            tracing::debug!("starting token refresh");
            RefreshRole::Driver(RefreshTicket {
                coordinator: self,
                completed: false,
            })
        }
    }

    pub fn is_refreshing(&self) -> bool {
        self.lock().in_flight
    }

    /// Number of callers waiting on the refresh in flight.
    pub fn waiting(&self) -> usize {
        self.lock().waiters.len()
    }

    fn finish(&self, outcome: RefreshOutcome, abandoned: bool) -> usize {
        let waiters = {
            let mut state = self.lock();
            state.in_flight = false;
            std::mem::take(&mut state.waiters)
        };
        let notified = waiters.len();
        let mut handoff = abandoned;
        for waiter in waiters {
            let settled = Settled {
                outcome: outcome.clone(),
                end_session: handoff,
            };
            // A waiter whose request was dropped no longer listens, so the
            // handoff moves on to the next one.
            if waiter.send(settled).is_ok() {
                handoff = false;
            }
        }
        notified
    }

    fn lock(&self) -> MutexGuard<'_, CoordinatorState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Proof of being the driver of the current refresh cycle.
#[derive(Debug)]
#[must_use = "an unfinished ticket fails the refresh cycle when dropped"]
pub struct RefreshTicket<'a> {
    coordinator: &'a RefreshCoordinator,
    completed: bool,
}

impl RefreshTicket<'_> {
    /// End the cycle and hand `outcome` to every waiter, oldest first.
    /// Returns how many waiters were notified.
    pub fn complete(mut self, outcome: RefreshOutcome) -> usize {
        self.completed = true;
        self.coordinator.finish(outcome, false)
    }
}

impl Drop for RefreshTicket<'_> {
    fn drop(&mut self) {
        if !self.completed {
            tracing::warn!("refresh driver dropped before completing");
            self.coordinator
                .finish(RefreshOutcome::Failed(RefreshFailure::Abandoned), true);
        }
    }
}

/// A caller queued behind the refresh in flight.
#[derive(Debug)]
pub struct RefreshWaiter {
    rx: oneshot::Receiver<Settled>,
}

impl RefreshWaiter {
    /// Wait for the end of the cycle.
    pub async fn settled(self) -> Settled {
        self.rx.await.unwrap_or(Settled {
            outcome: RefreshOutcome::Failed(RefreshFailure::Abandoned),
            end_session: false,
        })
    }

    /// Wait for the driver's outcome.
    pub async fn outcome(self) -> RefreshOutcome {
        self.settled().await.outcome
    }
}
