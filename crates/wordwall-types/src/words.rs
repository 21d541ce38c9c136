//! Visible word slots and the long-poll update payload.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// One currently visible word and the moment it became visible.
///
/// The timestamp is milliseconds since the Unix epoch. On the wire the
/// field is called `timestamp`, which is what the display frontend reads
/// to fade words in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct WordSlot {
    /// The displayed word.
    pub text: String,
    /// When the word was inserted into its slot (epoch milliseconds).
    #[serde(rename = "timestamp")]
    #[ts(type = "number")]
    pub inserted_at: u64,
}

impl WordSlot {
    /// Create a slot holding `text`, stamped at `inserted_at`.
    pub fn new(text: impl Into<String>, inserted_at: u64) -> Self {
        Self {
            text: text.into(),
            inserted_at,
        }
    }
}

/// The full active set plus the change token that produced it.
///
/// Returned by `GET /api/words`. Clients echo `last_change` back as
/// `since` on their next poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "camelCase")]
pub struct WordsUpdate {
    /// Snapshot of every slot, in slot-index order.
    pub words: Vec<WordSlot>,
    /// Change token of the mutation that produced `words`.
    #[ts(type = "number")]
    pub last_change: u64,
}
