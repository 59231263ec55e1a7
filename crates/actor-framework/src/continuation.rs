//! # Continuation Registry
//!
//! A continuation is the captured "resume here" logic of an actor that handed work
//! to some other execution context. The registry keeps every outstanding
//! continuation under a [`ContinuationHandle`] until whoever performed the work
//! calls [`ContinuationRegistry::resume`].
//!
//! ## Guarantees
//!
//! - **Own context**: resuming does not run the captured logic. It enqueues it onto
//!   the requestor's mailbox, so the logic executes inside that actor's turn loop,
//!   never on the resuming thread and never in another actor.
//! - **Exactly once**: a handle is removed from the registry the moment it is
//!   resumed. Handles come from a monotonic counter, so a second `resume` on an
//!   issued handle is recognised and reported as [`FrameworkError::DoubleResume`]
//!   instead of being silently accepted.
//! - **No timeout by default**: a continuation that is never resumed stays pending.
//!   [`ContinuationRegistry::expire_older_than`] and [`ContinuationRegistry::cancel`]
//!   are the explicit ways to reclaim them; reclaimed continuations are dropped,
//!   not resumed.
//! - **Late results are not faults**: the work behind a reclaimed continuation may
//!   still finish. Its handle is remembered until that result arrives, which is
//!   then discarded as [`FrameworkError::ContinuationReclaimed`] and logged at
//!   `debug`. Only a result for a handle that was already resumed is a
//!   [`FrameworkError::DoubleResume`].

use crate::actor::{Actor, ActorId, Context};
use crate::client::ActorRef;
use crate::error::FrameworkError;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, error, trace, warn};

/// Ticket identifying one suspended continuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContinuationHandle(u64);

impl ContinuationHandle {
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ContinuationHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "k#{}", self.0)
    }
}

type Dispatch<R> = Box<dyn FnOnce(ContinuationHandle, R) -> Result<(), FrameworkError> + Send>;

struct Pending<R> {
    requestor: ActorId,
    suspended_at: Instant,
    dispatch: Dispatch<R>,
}

struct RegistryState<R> {
    next_handle: u64,
    pending: HashMap<ContinuationHandle, Pending<R>>,
    /// Cancelled or expired, result not yet seen.
    reclaimed: HashSet<ContinuationHandle>,
}

/// Registry of continuations waiting for a result of type `R`.
pub struct ContinuationRegistry<R> {
    name: String,
    state: Mutex<RegistryState<R>>,
}

impl<R: Send + 'static> ContinuationRegistry<R> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: Mutex::new(RegistryState {
                next_handle: 1,
                pending: HashMap::new(),
                reclaimed: HashSet::new(),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Capture `resume` as a continuation bound to `requestor`.
    ///
    /// Returns immediately. The closure runs later, inside `requestor`'s turn loop,
    /// with the result passed to [`ContinuationRegistry::resume`].
    pub fn suspend<A, F>(&self, requestor: &ActorRef<A>, resume: F) -> ContinuationHandle
    where
        A: Actor,
        F: FnOnce(&mut A, &mut Context<A>, R) + Send + 'static,
    {
        let actor = requestor.clone();
        let dispatch: Dispatch<R> = Box::new(move |handle, result| {
            actor.resume_with(
                handle,
                Box::new(move |state: &mut A, ctx: &mut Context<A>| resume(state, ctx, result)),
            )
        });

        let mut state = self.state.lock();
        let handle = ContinuationHandle(state.next_handle);
        state.next_handle += 1;
        state.pending.insert(
            handle,
            Pending {
                requestor: requestor.id().clone(),
                suspended_at: Instant::now(),
                dispatch,
            },
        );
        trace!(registry = %self.name, %handle, requestor = %requestor.id(), "Suspended");
        handle
    }

    /// Deliver `result` to the continuation behind `handle`.
    ///
    /// The continuation is consumed whether or not its actor is still alive;
    /// scheduler faults are logged and returned, never retried.
    pub fn resume(&self, handle: ContinuationHandle, result: R) -> Result<(), FrameworkError> {
        let entry = {
            let mut state = self.state.lock();
            match state.pending.remove(&handle) {
                Some(entry) => entry,
                None if state.reclaimed.remove(&handle) => {
                    debug!(registry = %self.name, %handle, "Result for reclaimed continuation discarded");
                    return Err(FrameworkError::ContinuationReclaimed { handle });
                }
                None if handle.0 < state.next_handle => {
                    error!(registry = %self.name, %handle, "Continuation resumed twice");
                    return Err(FrameworkError::DoubleResume { handle });
                }
                None => {
                    error!(registry = %self.name, %handle, "Unknown continuation");
                    return Err(FrameworkError::UnknownContinuation { handle });
                }
            }
        };

        trace!(registry = %self.name, %handle, requestor = %entry.requestor, "Resuming");
        (entry.dispatch)(handle, result).inspect_err(|e| {
            error!(registry = %self.name, %handle, error = %e, "Resume dispatch failed");
        })
    }

    /// Drop a pending continuation without resuming it.
    ///
    /// A result that still arrives for `handle` is discarded quietly.
    pub fn cancel(&self, handle: ContinuationHandle) -> bool {
        let mut state = self.state.lock();
        let removed = state.pending.remove(&handle).is_some();
        if removed {
            state.reclaimed.insert(handle);
            trace!(registry = %self.name, %handle, "Cancelled");
        }
        removed
    }

    /// Drop a continuation whose work was never issued, so no result will follow.
    pub(crate) fn forget(&self, handle: ContinuationHandle) {
        self.state.lock().pending.remove(&handle);
    }

    /// Reclaimed continuations whose late result has not arrived yet.
    pub fn reclaimed(&self) -> usize {
        self.state.lock().reclaimed.len()
    }

    /// Number of continuations still waiting for a result.
    pub fn pending(&self) -> usize {
        self.state.lock().pending.len()
    }

    /// Whether `handle` is still waiting.
    pub fn is_pending(&self, handle: ContinuationHandle) -> bool {
        self.state.lock().pending.contains_key(&handle)
    }

    /// Drop every continuation suspended for longer than `ttl`. Returns how many.
    pub fn expire_older_than(&self, ttl: Duration) -> usize {
        let now = Instant::now();
        let expired: Vec<(ContinuationHandle, Pending<R>)> = {
            let mut state = self.state.lock();
            let stale: Vec<ContinuationHandle> = state
                .pending
                .iter()
                .filter(|(_, p)| now.duration_since(p.suspended_at) >= ttl)
                .map(|(h, _)| *h)
                .collect();
            let expired: Vec<(ContinuationHandle, Pending<R>)> = stale
                .into_iter()
                .filter_map(|h| state.pending.remove(&h).map(|p| (h, p)))
                .collect();
            state.reclaimed.extend(expired.iter().map(|(h, _)| *h));
            expired
        };

        for (handle, entry) in &expired {
            warn!(
                registry = %self.name,
                %handle,
                requestor = %entry.requestor,
                age_ms = now.duration_since(entry.suspended_at).as_millis() as u64,
                "Continuation expired"
            );
        }
        expired.len()
    }
}
