//! Fixed-capacity buffer of currently visible words.
//!
//! The buffer is the sole owner of mutable word state: the slots and the
//! change token. Its length is fixed at construction and never changes;
//! the only mutation is [`ActiveWordBuffer::replace`], which overwrites a
//! slot in place.
//!
//! # Change tokens
//!
//! The change token is an epoch-millisecond value. Each replacement sets
//! it to `max(now, previous + 1)`, so it strictly increases per mutation
//! even when two mutations land in the same millisecond or the wall clock
//! steps backwards. A reader holding token `T` therefore always detects
//! the next mutation.

use std::collections::HashSet;

use tracing::warn;
use wordwall_types::{WordSlot, WordsUpdate};

use crate::error::WordError;
use crate::source::CandidatePool;

/// Fixed-size ordered collection of [`WordSlot`]s plus the last change token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveWordBuffer {
    slots: Vec<WordSlot>,
    last_change: u64,
}

impl ActiveWordBuffer {
    /// Fill a buffer of `capacity` slots from the head of `pool`, all
    /// stamped at `now`. The change token starts at `now`.
    ///
    /// If the pool holds fewer than `capacity` words the remaining slots are
    /// padded by cycling through the pool again.
    ///
    /// # Errors
    ///
    /// Returns [`WordError::InvariantViolation`] if `capacity` is zero.
    pub fn new(pool: &CandidatePool, capacity: usize, now: u64) -> Result<Self, WordError> {
        if capacity == 0 {
            return Err(WordError::InvariantViolation(
                "active word capacity must be at least 1".to_owned(),
            ));
        }
        if pool.len() < capacity {
            warn!(
                capacity,
                candidates = pool.len(),
                "Candidate pool smaller than capacity, padding with repeated words"
            );
        }

        let slots = pool
            .words()
            .iter()
            .cycle()
            .take(capacity)
            .map(|text| WordSlot::new(text.clone(), now))
            .collect();

        Ok(Self {
            slots,
            last_change: now,
        })
    }

    /// Overwrite the slot at `index` with `text`, stamped at `now`.
    ///
    /// Returns the new change token.
    ///
    /// # Errors
    ///
    /// An out-of-range index is a programming error: it panics in debug
    /// builds and returns [`WordError::InvariantViolation`] in release
    /// builds without touching the buffer.
    pub fn replace(&mut self, index: usize, text: String, now: u64) -> Result<u64, WordError> {
        debug_assert!(
            index < self.slots.len(),
            "slot index {index} out of range for capacity {}",
            self.slots.len()
        );
        let capacity = self.slots.len();
        let slot = self.slots.get_mut(index).ok_or_else(|| {
            WordError::InvariantViolation(format!(
                "slot index {index} out of range for capacity {capacity}"
            ))
        })?;

        *slot = WordSlot::new(text, now);
        self.last_change = now.max(self.last_change.saturating_add(1));
        Ok(self.last_change)
    }

    /// Index of the slot with the smallest insertion time. Ties go to the
    /// lowest index.
    pub fn oldest_index(&self) -> usize {
        self.slots
            .iter()
            .enumerate()
            .min_by_key(|(index, slot)| (slot.inserted_at, *index))
            .map_or(0, |(index, _)| index)
    }

    /// Indices of slots whose age at `now` is strictly greater than
    /// `timeout_ms`.
    pub fn expired_indices(&self, now: u64, timeout_ms: u64) -> Vec<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| now.saturating_sub(slot.inserted_at) > timeout_ms)
            .map(|(index, _)| index)
            .collect()
    }

    /// The set of texts currently visible.
    pub fn texts(&self) -> HashSet<&str> {
        self.slots.iter().map(|slot| slot.text.as_str()).collect()
    }

    /// Immutable copy of every slot, in index order.
    pub fn snapshot(&self) -> Vec<WordSlot> {
        self.slots.clone()
    }

    /// Snapshot paired with the current change token.
    pub fn update(&self) -> WordsUpdate {
        WordsUpdate {
            words: self.snapshot(),
            last_change: self.last_change,
        }
    }

    /// Borrow the slots without copying.
    pub fn slots(&self) -> &[WordSlot] {
        &self.slots
    }

    /// Current change token.
    pub const fn last_change(&self) -> u64 {
        self.last_change
    }

    /// Number of slots. Constant for the lifetime of the buffer.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }
}
