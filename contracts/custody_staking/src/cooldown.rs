// custody_staking/src/cooldown.rs

use core::convert::TryFrom;
use ink::prelude::vec::Vec;
use scale::{Decode, Encode};

/// Withdraw compacts automatically once the cursor is past this index
/// and past half of the backing array.
pub const AUTO_COMPACT_MIN_CURSOR: u32 = 10;

/// One pending unstake request
#[derive(Debug, Encode, Decode, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(scale_info::TypeInfo, ink::storage::traits::StorageLayout))]
pub struct CooldownEntry {
    /// Amount released when the entry is withdrawn
    pub amount: u128,
    /// Timestamp in seconds at which the entry can be withdrawn
    pub unlock_time: u64,
}

/// Storage shape of a user's queue, as reported by `get_cooldown_array_info`
#[derive(Debug, Encode, Decode, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(scale_info::TypeInfo))]
pub struct CooldownArrayInfo {
    /// Physical length of the backing array, processed entries included
    pub length: u32,
    /// Index of the oldest live entry
    pub first_valid_index: u32,
    /// Number of entries not yet withdrawn
    pub live_count: u32,
}

/// Result of scanning the matured prefix of a queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaturedPrefix {
    /// Sum of every matured entry
    pub amount: u128,
    /// Cursor position just past the last matured entry
    pub next_cursor: u32,
}

/// Per-user cooldown queue.
///
/// Entries are appended at the tail and logically removed from the head by
/// moving `first_valid`. Everything before `first_valid` is dead and only
/// reclaimed by [`CooldownQueue::compact`].
#[derive(Debug, Encode, Decode, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(scale_info::TypeInfo, ink::storage::traits::StorageLayout))]
pub struct CooldownQueue {
    entries: Vec<CooldownEntry>,
    first_valid: u32,
}

impl CooldownQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Physical length of the backing array
    pub fn len(&self) -> u32 {
        u32::try_from(self.entries.len()).unwrap_or(u32::MAX)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn first_valid_index(&self) -> u32 {
        self.first_valid
    }

    /// Number of entries not yet consumed by a withdraw
    pub fn live_count(&self) -> u32 {
        self.len().saturating_sub(self.first_valid)
    }

    /// True when every entry, if any, has been withdrawn
    pub fn is_drained(&self) -> bool {
        self.first_valid >= self.len()
    }

    pub fn info(&self) -> CooldownArrayInfo {
        CooldownArrayInfo {
            length: self.len(),
            first_valid_index: self.first_valid,
            live_count: self.live_count(),
        }
    }

    pub fn push(&mut self, amount: u128, unlock_time: u64) {
        self.entries.push(CooldownEntry {
            amount,
            unlock_time,
        });
    }

    /// Entries from the cursor to the tail, oldest first
    pub fn live(&self) -> &[CooldownEntry] {
        let start = (self.first_valid as usize).min(self.entries.len());
        &self.entries[start..]
    }

    /// Live entry at `index`, where 0 is the oldest pending entry
    pub fn live_entry(&self, index: u32) -> Option<&CooldownEntry> {
        self.live().get(index as usize)
    }

    /// Walks live entries while they are unlocked at `now`.
    ///
    /// Stops at the first locked entry, so a younger entry that happens to
    /// unlock earlier stays behind it.
    pub fn matured_prefix(&self, now: u64) -> MaturedPrefix {
        let mut amount: u128 = 0;
        let mut next_cursor = self.first_valid;

        for entry in self.live() {
            if entry.unlock_time > now {
                break;
            }
            amount = amount.saturating_add(entry.amount);
            next_cursor = next_cursor.saturating_add(1);
        }

        MaturedPrefix {
            amount,
            next_cursor,
        }
    }

    /// Sum of every live entry, matured or not
    pub fn pending_amount(&self) -> u128 {
        self.live()
            .iter()
            .fold(0u128, |total, entry| total.saturating_add(entry.amount))
    }

    /// Moves the cursor forward. Never moves it backwards or past the tail.
    pub fn advance_to(&mut self, cursor: u32) {
        let cursor = cursor.min(self.len());
        if cursor > self.first_valid {
            self.first_valid = cursor;
        }
    }

    /// Whether withdraw should compact after advancing the cursor
    pub fn needs_compaction(&self) -> bool {
        self.first_valid > AUTO_COMPACT_MIN_CURSOR && self.first_valid > self.len() / 2
    }

    /// Drops processed entries and resets the cursor to zero.
    ///
    /// Returns `false` without touching anything if the cursor is already at
    /// the head.
    pub fn compact(&mut self) -> bool {
        if self.first_valid == 0 {
            return false;
        }
        let dead = (self.first_valid as usize).min(self.entries.len());
        self.entries.drain(..dead);
        self.first_valid = 0;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn queue_with(unlock_times: &[u64]) -> CooldownQueue {
        let mut queue = CooldownQueue::new();
        for (i, unlock_time) in unlock_times.iter().enumerate() {
            queue.push((i as u128 + 1) * 100, *unlock_time);
        }
        queue
    }

    #[test]
    fn new_queue_is_drained() {
        let queue = CooldownQueue::new();
        assert!(queue.is_empty());
        assert!(queue.is_drained());
        assert_eq!(queue.live_count(), 0);
        assert_eq!(queue.matured_prefix(u64::MAX).amount, 0);
        assert_eq!(queue.pending_amount(), 0);
    }

    #[test]
    fn matured_prefix_stops_at_first_locked_entry() {
        let queue = queue_with(&[100, 200, 300]);

        let prefix = queue.matured_prefix(250);
        assert_eq!(prefix.amount, 300);
        assert_eq!(prefix.next_cursor, 2);

        let none = queue.matured_prefix(99);
        assert_eq!(none.amount, 0);
        assert_eq!(none.next_cursor, 0);

        let all = queue.matured_prefix(300);
        assert_eq!(all.amount, 600);
        assert_eq!(all.next_cursor, 3);
    }

    #[test]
    fn younger_entry_with_earlier_unlock_waits_behind_older_one() {
        // Older entry queued under a long duration, newer one under a short one
        let queue = queue_with(&[1_000, 50]);

        let prefix = queue.matured_prefix(500);
        assert_eq!(prefix.amount, 0);
        assert_eq!(prefix.next_cursor, 0);
        assert_eq!(queue.pending_amount(), 300);
    }

    #[test]
    fn advance_moves_cursor_and_hides_entries() {
        let mut queue = queue_with(&[10, 20, 30]);
        queue.advance_to(2);

        assert_eq!(queue.first_valid_index(), 2);
        assert_eq!(queue.live_count(), 1);
        assert_eq!(queue.live_entry(0).map(|e| e.amount), Some(300));
        assert_eq!(queue.live_entry(1), None);
        assert_eq!(queue.pending_amount(), 300);

        // Cursor never goes backwards or past the tail
        queue.advance_to(1);
        assert_eq!(queue.first_valid_index(), 2);
        queue.advance_to(10);
        assert_eq!(queue.first_valid_index(), 3);
        assert!(queue.is_drained());
    }

    #[test]
    fn compact_keeps_live_entries_in_order() {
        let mut queue = queue_with(&[10, 20, 30, 40]);
        queue.advance_to(2);
        let live_before: Vec<CooldownEntry> = queue.live().to_vec();

        assert!(queue.compact());
        assert_eq!(queue.first_valid_index(), 0);
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.live(), &live_before[..]);
        assert_eq!(queue.matured_prefix(35).amount, 300);
    }

    #[test]
    fn compact_is_noop_at_head() {
        let mut queue = queue_with(&[10, 20]);
        assert!(!queue.compact());
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn compact_of_fully_drained_queue_empties_storage() {
        let mut queue = queue_with(&[10, 20]);
        queue.advance_to(2);
        assert!(queue.compact());
        assert!(queue.is_empty());
        assert!(queue.is_drained());
    }

    #[test]
    fn compaction_threshold_needs_cursor_past_ten_and_half() {
        let mut queue = queue_with(&[1; 30]);

        queue.advance_to(10);
        assert!(!queue.needs_compaction());

        queue.advance_to(15);
        assert!(!queue.needs_compaction());

        queue.advance_to(16);
        assert!(queue.needs_compaction());

        let mut short = queue_with(&[1; 12]);
        short.advance_to(11);
        assert!(short.needs_compaction());
    }

    #[test]
    fn info_reports_length_cursor_and_live_count() {
        let mut queue = queue_with(&[1, 2, 3, 4, 5]);
        queue.advance_to(3);
        assert_eq!(
            queue.info(),
            CooldownArrayInfo {
                length: 5,
                first_valid_index: 3,
                live_count: 2,
            }
        );
    }
}
