//! Timeout-driven rotation of stale words.
//!
//! On every tick each slot older than the timeout is replaced by a random
//! candidate that is not currently visible. When every candidate is already
//! on screen the pick falls back to the whole pool and a duplicate is
//! accepted.

use std::time::Duration;

use rand::Rng;
use rand::seq::IndexedRandom;
use tracing::{debug, warn};

use crate::buffer::ActiveWordBuffer;
use crate::source::CandidatePool;

/// Period of the rotation tick.
pub const ROTATION_TICK: Duration = Duration::from_secs(1);

/// Decides which slots have aged out and what replaces them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationPolicy {
    timeout_ms: u64,
}

impl RotationPolicy {
    /// Create a policy that rotates words older than `timeout`.
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// The rotation timeout in milliseconds.
    pub const fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    /// Choose a replacement word given the words currently visible.
    ///
    /// Returns `None` only if the pool is empty, which [`CandidatePool`]
    /// rules out at construction.
    pub fn pick_replacement<'a, R: Rng + ?Sized>(
        pool: &'a CandidatePool,
        buffer: &ActiveWordBuffer,
        rng: &mut R,
    ) -> Option<&'a str> {
        let visible = buffer.texts();
        let unused: Vec<&String> = pool
            .words()
            .iter()
            .filter(|word| !visible.contains(word.as_str()))
            .collect();

        if let Some(word) = unused.choose(rng).copied() {
            return Some(word.as_str());
        }
        pool.words().choose(rng).map(String::as_str)
    }

    /// Replace every slot that has aged past the timeout at `now`.
    ///
    /// Slots are evaluated independently, in index order, and the visible
    /// set is recomputed after each replacement so a single tick never
    /// introduces the same fresh word twice while unused candidates remain.
    /// Returns the indices that were replaced; the caller treats a non-empty
    /// result as one mutation batch.
    pub fn rotate<R: Rng + ?Sized>(
        &self,
        buffer: &mut ActiveWordBuffer,
        pool: &CandidatePool,
        now: u64,
        rng: &mut R,
    ) -> Vec<usize> {
        let mut replaced = Vec::new();

        for index in buffer.expired_indices(now, self.timeout_ms) {
            let Some(word) = Self::pick_replacement(pool, buffer, rng) else {
                warn!(index, "Candidate pool is empty, skipping rotation");
                continue;
            };
            let word = word.to_owned();
            debug!(index, word = %word, "Rotating stale word");

            match buffer.replace(index, word, now) {
                Ok(_) => replaced.push(index),
                Err(e) => warn!(error = %e, index, "Skipping rotation of slot"),
            }
        }

        replaced
    }
}
