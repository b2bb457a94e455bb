//! Identifier sequences
//!
//! Member and loan ids are handed out by monotonic counters owned by the
//! registry. They live only in memory and restart from their first value
//! whenever a new registry is created.

/// Monotonic `u32` id generator
///
/// Once `u32::MAX` has been handed out or observed the sequence is
/// exhausted and yields `None`.
#[derive(Debug, Clone)]
pub struct IdSequence {
    next: Option<u32>,
}

impl IdSequence {
    /// Start a sequence whose first id is `first`
    pub fn starting_at(first: u32) -> Self {
        IdSequence { next: Some(first) }
    }

    /// Hand out the next id, or `None` once the sequence is exhausted
    pub fn next_id(&mut self) -> Option<u32> {
        let id = self.next?;
        self.next = id.checked_add(1);
        Some(id)
    }

    /// The id the next call to [`next_id`](Self::next_id) will return
    pub fn peek(&self) -> Option<u32> {
        self.next
    }

    /// Whether observing `id` would leave ids to hand out
    pub fn can_observe(&self, id: u32) -> bool {
        id.checked_add(1).is_some()
    }

    /// Make sure an externally chosen `id` is never handed out again
    pub fn observe(&mut self, id: u32) {
        if let Some(next) = self.next {
            if id >= next {
                self.next = id.checked_add(1);
            }
        }
    }
}
