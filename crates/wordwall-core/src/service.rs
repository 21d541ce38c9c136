//! The single owner of all mutable word state.
//!
//! [`WordService`] wraps the [`ActiveWordBuffer`] and the [`ChangeNotifier`]
//! behind one mutex. Submissions, rotation ticks, and long-poll
//! registration/resolution all serialize through it, so no two mutations
//! interleave and no notification pass races a mutation.
//!
//! # Long-poll state machine
//!
//! A poll with `since` older than the current change token resolves
//! immediately. Otherwise the caller parks on a one-shot slot for at most
//! the configured timeout. Resolution is decided under the lock by whoever
//! removes the waiter from the registry first:
//!
//! - a mutation drains every waiter and sends the fresh update, or
//! - the timed-out caller cancels its own entry and reads the current state.
//!
//! If the timer fires after a mutation already drained the entry, the
//! caller finds its entry gone and takes the update that was sent. A
//! response is produced exactly once either way. Dropping the poll future
//! (client disconnect) deregisters the waiter.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};
use wordwall_types::{StatusResponse, WordSlot, WordsUpdate};

use crate::buffer::ActiveWordBuffer;
use crate::clock::{Clock, SystemClock};
use crate::config::WordsConfig;
use crate::error::WordError;
use crate::notifier::{ChangeNotifier, WaiterId};
use crate::rotation::RotationPolicy;
use crate::source::CandidatePool;

/// State guarded by the service lock.
#[derive(Debug)]
struct ServiceInner {
    buffer: ActiveWordBuffer,
    notifier: ChangeNotifier,
    rng: StdRng,
    closed: bool,
}

impl ServiceInner {
    /// Broadcast the current state to every parked waiter.
    fn publish(&mut self) -> usize {
        let update = self.buffer.update();
        self.notifier.notify_all(&update)
    }
}

/// Outcome of the synchronous half of a long poll.
#[derive(Debug)]
enum Registration {
    /// Newer data exists; no waiter was registered.
    Ready(WordsUpdate),
    /// The caller must wait on this slot.
    Waiting(WaiterId, oneshot::Receiver<WordsUpdate>),
}

/// Shared word service. Create once per process and share via [`Arc`].
#[derive(Debug)]
pub struct WordService {
    inner: Mutex<ServiceInner>,
    pool: CandidatePool,
    policy: RotationPolicy,
    poll_timeout: Duration,
    clock: Arc<dyn Clock>,
}

impl WordService {
    /// Build the service with the system clock.
    ///
    /// # Errors
    ///
    /// Returns [`WordError::InvariantViolation`] if `config.capacity` is zero.
    pub fn new(pool: CandidatePool, config: &WordsConfig) -> Result<Self, WordError> {
        Self::with_clock(pool, config, Arc::new(SystemClock))
    }

    /// Build the service with an explicit clock.
    ///
    /// The buffer is filled from the head of `pool`, every slot stamped
    /// with the current time, and the change token starts at that time.
    ///
    /// # Errors
    ///
    /// Returns [`WordError::InvariantViolation`] if `config.capacity` is zero.
    pub fn with_clock(
        pool: CandidatePool,
        config: &WordsConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, WordError> {
        let now = clock.now_ms();
        let buffer = ActiveWordBuffer::new(&pool, config.capacity, now)?;
        let rng = config
            .rotation_seed
            .map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);

        info!(
            capacity = buffer.capacity(),
            candidates = pool.len(),
            timeout_secs = config.timeout_secs,
            last_change = now,
            "Active words initialized"
        );

        Ok(Self {
            inner: Mutex::new(ServiceInner {
                buffer,
                notifier: ChangeNotifier::new(),
                rng,
                closed: false,
            }),
            pool,
            policy: RotationPolicy::new(config.timeout()),
            poll_timeout: config.timeout(),
            clock,
        })
    }

    fn lock(&self) -> MutexGuard<'_, ServiceInner> {
        // Every critical section completes its state transition before any
        // code that could panic, so a poisoned lock still holds valid state.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// Current slots and change token.
    pub fn snapshot(&self) -> WordsUpdate {
        self.lock().buffer.update()
    }

    /// Current change token.
    pub fn last_change(&self) -> u64 {
        self.lock().buffer.last_change()
    }

    /// Number of parked long-poll requests.
    pub fn pending_waiters(&self) -> usize {
        self.lock().notifier.pending()
    }

    /// Whether [`shutdown`](Self::shutdown) has been called.
    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// The long-poll timeout.
    pub const fn poll_timeout(&self) -> Duration {
        self.poll_timeout
    }

    /// The candidate pool rotation draws from.
    pub const fn pool(&self) -> &CandidatePool {
        &self.pool
    }

    /// Operational summary for the status endpoint.
    pub fn status(&self) -> StatusResponse {
        let inner = self.lock();
        StatusResponse {
            capacity: inner.buffer.capacity(),
            timeout_secs: self.poll_timeout.as_secs(),
            last_change: inner.buffer.last_change(),
            pending_waiters: inner.notifier.pending(),
            candidate_count: self.pool.len(),
            closed: inner.closed,
        }
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Replace the oldest visible word with `text` and wake every waiter.
    ///
    /// The oldest slot is the one with the smallest insertion time, ties
    /// going to the lowest index. `text` is trimmed before insertion.
    /// Returns the active set after the replacement.
    ///
    /// # Errors
    ///
    /// Returns [`WordError::Validation`] if `text` is blank and
    /// [`WordError::Closed`] after shutdown. No mutation happens in either
    /// case.
    pub fn submit(&self, text: &str) -> Result<Vec<WordSlot>, WordError> {
        let word = text.trim();
        if word.is_empty() {
            return Err(WordError::Validation("word must not be empty".to_owned()));
        }

        let now = self.clock.now_ms();
        let mut inner = self.lock();
        if inner.closed {
            return Err(WordError::Closed);
        }

        let index = inner.buffer.oldest_index();
        let last_change = inner.buffer.replace(index, word.to_owned(), now)?;
        let woken = inner.publish();
        debug!(index, word, last_change, woken, "Word submitted");

        Ok(inner.buffer.snapshot())
    }

    /// Rotate every slot that has aged past the timeout.
    ///
    /// All replacements made in one call form a single mutation batch and
    /// wake waiters once. Returns the number of slots replaced.
    pub fn rotate_expired(&self) -> usize {
        let now = self.clock.now_ms();
        let mut guard = self.lock();
        if guard.closed {
            return 0;
        }

        let inner = &mut *guard;
        let replaced = self
            .policy
            .rotate(&mut inner.buffer, &self.pool, now, &mut inner.rng);
        if replaced.is_empty() {
            return 0;
        }

        let woken = inner.publish();
        debug!(
            slots = ?replaced,
            last_change = inner.buffer.last_change(),
            woken,
            "Rotated stale words"
        );
        replaced.len()
    }

    // -----------------------------------------------------------------------
    // Long poll
    // -----------------------------------------------------------------------

    /// Wait until the change token moves past `since` or the timeout elapses.
    ///
    /// Resolves immediately when the current token is greater than `since`.
    /// Otherwise parks without blocking the runtime and resolves with the
    /// first mutation, or with the unchanged state at timeout.
    ///
    /// # Errors
    ///
    /// Returns [`WordError::Closed`] if the service is or becomes shut down.
    pub async fn long_poll(&self, since: u64) -> Result<WordsUpdate, WordError> {
        let (id, mut rx) = match self.register(since)? {
            Registration::Ready(update) => return Ok(update),
            Registration::Waiting(id, rx) => (id, rx),
        };

        let mut guard = WaiterGuard {
            service: self,
            id,
            armed: true,
        };

        let outcome = tokio::time::timeout(self.poll_timeout, &mut rx).await;
        let result = match outcome {
            Ok(Ok(update)) => Ok(update),
            Ok(Err(_)) => Err(WordError::Closed),
            Err(_) => self.resolve_timed_out(id, &mut rx),
        };
        // The waiter is out of the registry on every path above.
        guard.armed = false;
        result
    }

    fn register(&self, since: u64) -> Result<Registration, WordError> {
        let mut inner = self.lock();
        if inner.closed {
            return Err(WordError::Closed);
        }
        if inner.buffer.last_change() > since {
            return Ok(Registration::Ready(inner.buffer.update()));
        }
        let (id, rx) = inner.notifier.register();
        debug!(?id, since, pending = inner.notifier.pending(), "Waiter parked");
        Ok(Registration::Waiting(id, rx))
    }

    /// Settle a waiter whose timer fired.
    ///
    /// If the entry is still registered the timeout wins and the current
    /// state is returned. If a mutation removed it first, the update it sent
    /// is already in the slot and is returned instead.
    fn resolve_timed_out(
        &self,
        id: WaiterId,
        rx: &mut oneshot::Receiver<WordsUpdate>,
    ) -> Result<WordsUpdate, WordError> {
        let mut inner = self.lock();
        if inner.notifier.cancel(id) {
            debug!(?id, "Waiter timed out");
            return Ok(inner.buffer.update());
        }
        rx.try_recv().ok().ok_or(WordError::Closed)
    }

    fn cancel_waiter(&self, id: WaiterId) {
        if self.lock().notifier.cancel(id) {
            debug!(?id, "Waiter abandoned");
        }
    }

    // -----------------------------------------------------------------------
    // Shutdown
    // -----------------------------------------------------------------------

    /// Stop accepting work and reject every parked waiter.
    ///
    /// Parked polls return [`WordError::Closed`]; later polls, submissions,
    /// and rotations are refused. Returns the number of waiters rejected.
    pub fn shutdown(&self) -> usize {
        let mut inner = self.lock();
        if inner.closed {
            return 0;
        }
        inner.closed = true;
        let rejected = inner.notifier.close();
        if rejected > 0 {
            warn!(rejected, "Rejected pending waiters on shutdown");
        }
        info!("Word service shut down");
        rejected
    }
}

/// Deregisters a parked waiter if its poll future is dropped early.
struct WaiterGuard<'a> {
    service: &'a WordService,
    id: WaiterId,
    armed: bool,
}

impl Drop for WaiterGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.service.cancel_waiter(self.id);
        }
    }
}
