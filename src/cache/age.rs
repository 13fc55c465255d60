//! Age Index Module
//!
//! Orders batches by creation time so the sweeper can always find the
//! oldest one without scanning the whole map.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use crate::cache::BatchId;

// == Age Index ==
/// Tracks batches ordered oldest-first.
///
/// Keys are `(created_at, seq, id)`: creation time first, the admission
/// sequence number breaks ties between batches created in the same instant.
#[derive(Debug, Default)]
pub struct AgeIndex {
    order: BTreeSet<(DateTime<Utc>, u64, BatchId)>,
}

impl AgeIndex {
    // == Constructor ==
    pub fn new() -> Self {
        Self {
            order: BTreeSet::new(),
        }
    }

    // == Insert ==
    /// Starts tracking a batch.
    pub fn insert(&mut self, created_at: DateTime<Utc>, seq: u64, id: BatchId) {
        self.order.insert((created_at, seq, id));
    }

    // == Remove ==
    /// Stops tracking a batch.
    pub fn remove(&mut self, created_at: DateTime<Utc>, seq: u64, id: BatchId) -> bool {
        self.order.remove(&(created_at, seq, id))
    }

    // == Peek Oldest ==
    /// Returns the oldest batch id and its creation time.
    pub fn peek_oldest(&self) -> Option<(BatchId, DateTime<Utc>)> {
        self.order.first().map(|(created_at, _, id)| (*id, *created_at))
    }

    /// Iterates batch ids oldest-first.
    pub fn iter_oldest_first(&self) -> impl Iterator<Item = BatchId> + '_ {
        self.order.iter().map(|(_, _, id)| *id)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use uuid::Uuid;

    #[test]
    fn test_age_index_new() {
        let index = AgeIndex::new();
        assert!(index.peek_oldest().is_none());
        assert_eq!(index.iter_oldest_first().count(), 0);
    }

    #[test]
    fn test_oldest_by_created_at_not_insertion() {
        let mut index = AgeIndex::new();
        let now = Utc::now();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());

        index.insert(now, 0, a);
        index.insert(now - Duration::seconds(5), 1, b);

        assert_eq!(index.peek_oldest(), Some((b, now - Duration::seconds(5))));
    }

    #[test]
    fn test_seq_breaks_ties() {
        let mut index = AgeIndex::new();
        let now = Utc::now();
        let ids: Vec<BatchId> = (0..4).map(|_| Uuid::new_v4()).collect();

        for (seq, id) in ids.iter().enumerate() {
            index.insert(now, seq as u64, *id);
        }

        let order: Vec<BatchId> = index.iter_oldest_first().collect();
        assert_eq!(order, ids);
    }

    #[test]
    fn test_remove() {
        let mut index = AgeIndex::new();
        let now = Utc::now();
        let id = Uuid::new_v4();

        index.insert(now, 7, id);
        assert!(index.remove(now, 7, id));
        assert!(!index.remove(now, 7, id));
        assert!(index.peek_oldest().is_none());
    }
}
