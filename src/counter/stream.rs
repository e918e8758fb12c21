//! Stream-Summary: the Space-Saving counter core.
//!
//! Tracks at most `m` keys and answers "which keys are most frequent, and
//! by how much could each estimate be off". Per-item state is an
//! overestimation bound `eps`: the count the item's slot carried when it
//! was last stolen from another key (0 if never stolen). The true
//! frequency of a tracked key always lies in `[count - eps, count]`.
//!
//! ## Architecture
//!
//! ```text
//!   index: FxHashMap<K, SlotId>          items: SlotArena<Item>
//!   ┌─────────┬────────┐                 ┌────────────────────────────┐
//!   │  key    │ SlotId │ ──────────────► │ key, count, eps, prev/next │
//!   └─────────┴────────┘                 └────────────────────────────┘
//!
//!   buckets: FxHashMap<count, Bucket>    one bucket per live count value
//!
//!   min ─► [count=1: a ◄─► b] ◄─► [count=4: c] ◄─► [count=9: d] ◄─ max
//! ```
//!
//! Buckets are keyed by their count and chained through `prev`/`next`
//! neighbor counts, strictly increasing from `min_count`. All items in a
//! bucket share its count, so a unit increment is O(1): detach, hop to
//! the successor bucket (creating it if its count is not exactly one
//! higher), drop the old bucket if it emptied. Eviction takes the head of
//! the minimum bucket (the oldest admission among the tied minima) and
//! reuses its slot in place.
//!
//! Weighted appends follow the same paths but may walk the chain to find
//! the target count, O(distance) in live bucket count.
use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::count::CountType;
use crate::ds::{SlotArena, SlotId};
use crate::error::ConfigError;
use crate::traits::Counter;

#[derive(Debug)]
struct Item<K, C> {
    key: K,
    count: C,
    eps: C,
    prev: Option<SlotId>,
    next: Option<SlotId>,
}

#[derive(Debug)]
struct Bucket<C> {
    head: Option<SlotId>,
    tail: Option<SlotId>,
    prev: Option<C>,
    next: Option<C>,
}

/// Bounded-memory heavy-hitter counter (Space-Saving).
///
/// # Example
///
/// ```
/// use freqkit::counter::stream::StreamSummary;
/// use freqkit::traits::Counter;
///
/// let mut summary: StreamSummary<&str, u32> = StreamSummary::new(2).unwrap();
/// for key in ["a", "b", "a", "c", "a", "b"] {
///     summary.append(key);
/// }
///
/// let (key, count, eps) = summary.top().unwrap();
/// assert_eq!((*key, count, eps), ("b", 3, 2));
/// assert_eq!(summary.total(), 6);
/// ```
#[derive(Debug)]
pub struct StreamSummary<K, C> {
    capacity: usize,
    items: SlotArena<Item<K, C>>,
    index: FxHashMap<K, SlotId>,
    buckets: FxHashMap<C, Bucket<C>>,
    min_count: Option<C>,
    max_count: Option<C>,
    total: C,
}

impl<K, C> StreamSummary<K, C>
where
    K: Eq + Hash + Clone,
    C: CountType,
{
    /// Creates a summary tracking at most `capacity` keys.
    ///
    /// # Errors
    /// Returns [`ConfigError`] when `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        Ok(Self {
            capacity,
            items: SlotArena::with_capacity(capacity),
            index: FxHashMap::default(),
            buckets: FxHashMap::default(),
            min_count: None,
            max_count: None,
            total: C::ZERO,
        })
    }

    /// Returns the maximum number of tracked keys.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns `true` if `key` is currently tracked.
    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Returns `(count, eps)` for a tracked key.
    pub fn count_of(&self, key: &K) -> Option<(C, C)> {
        let id = *self.index.get(key)?;
        self.items.get(id).map(|item| (item.count, item.eps))
    }

    /// Returns the item considered most frequent as `(key, count, eps)`.
    pub fn top(&self) -> Option<(&K, C, C)> {
        let tail = self
            .max_count
            .and_then(|count| self.buckets.get(&count))
            .and_then(|bucket| bucket.tail)?;
        self.items.get(tail).map(|item| (&item.key, item.count, item.eps))
    }

    /// Enumerates tracked items as `(key, count, eps)` in non-increasing
    /// count order. Equal counts report most-recently-promoted first.
    pub fn iter(&self) -> RankedIter<'_, K, C> {
        let start = self
            .max_count
            .and_then(|count| self.buckets.get(&count))
            .and_then(|bucket| bucket.tail);
        RankedIter {
            summary: self,
            cursor: start,
        }
    }

    fn admit(&mut self, key: K, weight: C) {
        let id = self.items.insert(Item {
            key: key.clone(),
            count: weight,
            eps: C::ZERO,
            prev: None,
            next: None,
        });
        self.index.insert(key, id);
        self.attach_new(id, weight);
    }

    // Place a fresh item into the bucket holding `count`, creating it at
    // its chain position if absent. O(distance from the lowest bucket).
    fn attach_new(&mut self, id: SlotId, count: C) {
        let mut prev: Option<C> = None;
        let mut next = self.min_count;
        while let Some(c) = next {
            if c >= count {
                break;
            }
            prev = Some(c);
            next = self.buckets.get(&c).and_then(|bucket| bucket.next);
        }
        if next != Some(count) {
            self.insert_bucket(count, prev, next);
        }
        self.push_tail(count, id);
    }

    // Move an item to the bucket holding its count plus `delta`. O(1) for
    // unit deltas; larger deltas walk forward along the chain.
    fn raise(&mut self, id: SlotId, delta: C) {
        let old_count = match self.items.get(id) {
            Some(item) => item.count,
            None => return,
        };
        let new_count = old_count.saturating_add(delta);
        if new_count == old_count {
            // Saturated at C::MAX; the item keeps its position.
            return;
        }

        self.detach(id);
        let (old_prev, old_next, old_empty) = match self.buckets.get(&old_count) {
            Some(bucket) => (bucket.prev, bucket.next, bucket.head.is_none()),
            None => return,
        };
        if old_empty {
            self.remove_bucket(old_count);
        }

        let mut prev = if old_empty { old_prev } else { Some(old_count) };
        let mut next = old_next;
        while let Some(c) = next {
            if c >= new_count {
                break;
            }
            prev = Some(c);
            next = self.buckets.get(&c).and_then(|bucket| bucket.next);
        }
        if next != Some(new_count) {
            self.insert_bucket(new_count, prev, next);
        }
        self.push_tail(new_count, id);
    }

    // The replacement step: steal the slot of the oldest minimum-count
    // item, recording the stolen count as the new key's error bound.
    fn replace_min(&mut self, key: K, weight: C) {
        let Some(min) = self.min_count else { return };
        let Some(victim) = self.buckets.get(&min).and_then(|bucket| bucket.head) else {
            return;
        };
        if let Some(item) = self.items.get_mut(victim) {
            let evicted = std::mem::replace(&mut item.key, key.clone());
            item.eps = min;
            self.index.remove(&evicted);
        }
        self.index.insert(key, victim);
        self.raise(victim, weight);
    }

    fn insert_bucket(&mut self, count: C, prev: Option<C>, next: Option<C>) {
        self.buckets.insert(
            count,
            Bucket {
                head: None,
                tail: None,
                prev,
                next,
            },
        );
        if let Some(prev) = prev
            && let Some(bucket) = self.buckets.get_mut(&prev)
        {
            bucket.next = Some(count);
        }
        if let Some(next) = next
            && let Some(bucket) = self.buckets.get_mut(&next)
        {
            bucket.prev = Some(count);
        }
        if prev.is_none() {
            self.min_count = Some(count);
        }
        if next.is_none() {
            self.max_count = Some(count);
        }
    }

    fn remove_bucket(&mut self, count: C) {
        let Some(bucket) = self.buckets.remove(&count) else { return };
        if let Some(prev) = bucket.prev
            && let Some(neighbor) = self.buckets.get_mut(&prev)
        {
            neighbor.next = bucket.next;
        }
        if let Some(next) = bucket.next
            && let Some(neighbor) = self.buckets.get_mut(&next)
        {
            neighbor.prev = bucket.prev;
        }
        if self.min_count == Some(count) {
            self.min_count = bucket.next;
        }
        if self.max_count == Some(count) {
            self.max_count = bucket.prev;
        }
    }

    fn push_tail(&mut self, count: C, id: SlotId) {
        let old_tail = match self.buckets.get(&count) {
            Some(bucket) => bucket.tail,
            None => return,
        };
        if let Some(item) = self.items.get_mut(id) {
            item.prev = old_tail;
            item.next = None;
            item.count = count;
        }
        match old_tail {
            Some(tail) => {
                if let Some(item) = self.items.get_mut(tail) {
                    item.next = Some(id);
                }
            },
            None => {
                if let Some(bucket) = self.buckets.get_mut(&count) {
                    bucket.head = Some(id);
                }
            },
        }
        if let Some(bucket) = self.buckets.get_mut(&count) {
            bucket.tail = Some(id);
        }
    }

    fn detach(&mut self, id: SlotId) {
        let (count, prev, next) = match self.items.get(id) {
            Some(item) => (item.count, item.prev, item.next),
            None => return,
        };
        match prev {
            Some(prev) => {
                if let Some(item) = self.items.get_mut(prev) {
                    item.next = next;
                }
            },
            None => {
                if let Some(bucket) = self.buckets.get_mut(&count) {
                    bucket.head = next;
                }
            },
        }
        match next {
            Some(next) => {
                if let Some(item) = self.items.get_mut(next) {
                    item.prev = prev;
                }
            },
            None => {
                if let Some(bucket) = self.buckets.get_mut(&count) {
                    bucket.tail = prev;
                }
            },
        }
        if let Some(item) = self.items.get_mut(id) {
            item.prev = None;
            item.next = None;
        }
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        assert_eq!(self.items.len(), self.index.len());
        assert!(self.index.len() <= self.capacity);
        self.items.debug_validate_invariants();

        if self.index.is_empty() {
            assert!(self.buckets.is_empty());
            assert_eq!(self.min_count, None);
            assert_eq!(self.max_count, None);
            return;
        }

        // The chain from min_count must cover every bucket in strictly
        // increasing count order, and every bucket must be non-empty.
        let mut seen_items = 0usize;
        let mut seen_buckets = 0usize;
        let mut prev: Option<C> = None;
        let mut last: Option<C> = None;
        let mut cursor = self.min_count;
        while let Some(count) = cursor {
            let bucket = self.buckets.get(&count).expect("chained bucket missing");
            if let Some(p) = prev {
                assert!(p < count);
            }
            assert_eq!(bucket.prev, prev);
            assert!(bucket.head.is_some());
            assert!(bucket.tail.is_some());

            let mut item_cursor = bucket.head;
            let mut item_prev = None;
            let mut walked = 0usize;
            while let Some(id) = item_cursor {
                let item = self.items.get(id).expect("listed item missing");
                assert_eq!(item.count, count);
                assert!(item.eps <= item.count);
                assert_eq!(item.prev, item_prev);
                assert_eq!(self.index.get(&item.key), Some(&id));
                item_prev = Some(id);
                item_cursor = item.next;
                walked += 1;
            }
            assert_eq!(bucket.tail, item_prev);
            assert!(walked > 0);
            seen_items += walked;
            seen_buckets += 1;

            prev = Some(count);
            last = Some(count);
            cursor = bucket.next;
        }
        assert_eq!(seen_items, self.items.len());
        assert_eq!(seen_buckets, self.buckets.len());
        assert_eq!(last, self.max_count);

        // Tracked mass never exceeds the appended total (absent saturation).
        if self.total < C::MAX {
            let mass: u64 = self.items.iter().map(|(_, item)| item.count.as_u64()).sum();
            assert!(mass <= self.total.as_u64());
        }
    }
}

impl<K, C> Counter<K, C> for StreamSummary<K, C>
where
    K: Eq + Hash + Clone,
    C: CountType,
{
    fn append_weighted(&mut self, key: K, weight: C) {
        if weight == C::ZERO {
            return;
        }
        if let Some(&id) = self.index.get(&key) {
            self.raise(id, weight);
        } else if self.index.len() < self.capacity {
            self.admit(key, weight);
        } else {
            self.replace_min(key, weight);
        }
        self.total = self.total.saturating_add(weight);
    }

    fn total(&self) -> C {
        self.total
    }

    fn len(&self) -> usize {
        self.index.len()
    }

    fn clear(&mut self) {
        self.items.clear();
        self.index.clear();
        self.buckets.clear();
        self.min_count = None;
        self.max_count = None;
        self.total = C::ZERO;
    }
}

/// Descending-count view over a [`StreamSummary`].
///
/// Starts at the tail of the highest bucket and follows `prev` links,
/// dropping to the next lower bucket's tail at each list head.
#[derive(Debug)]
pub struct RankedIter<'a, K, C> {
    summary: &'a StreamSummary<K, C>,
    cursor: Option<SlotId>,
}

impl<'a, K, C> Iterator for RankedIter<'a, K, C>
where
    K: Eq + Hash + Clone,
    C: CountType,
{
    type Item = (&'a K, C, C);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.cursor.take()?;
        let item = self.summary.items.get(id)?;
        self.cursor = match item.prev {
            Some(prev) => Some(prev),
            None => self
                .summary
                .buckets
                .get(&item.count)
                .and_then(|bucket| bucket.prev)
                .and_then(|count| self.summary.buckets.get(&count))
                .and_then(|bucket| bucket.tail),
        };
        Some((&item.key, item.count, item.eps))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranked(summary: &StreamSummary<&str, u32>) -> Vec<(String, u32, u32)> {
        summary
            .iter()
            .map(|(key, count, eps)| (key.to_string(), count, eps))
            .collect()
    }

    #[test]
    fn stream_summary_rejects_zero_capacity() {
        let err = StreamSummary::<&str, u32>::new(0).unwrap_err();
        assert_eq!(err, ConfigError::ZeroCapacity);
    }

    #[test]
    fn stream_summary_empty_state() {
        let summary: StreamSummary<&str, u32> = StreamSummary::new(4).unwrap();
        assert!(summary.is_empty());
        assert_eq!(summary.total(), 0);
        assert_eq!(summary.top(), None);
        assert_eq!(summary.iter().count(), 0);
        summary.debug_validate_invariants();
    }

    #[test]
    fn stream_summary_basic_flow() {
        let mut summary: StreamSummary<&str, u32> = StreamSummary::new(4).unwrap();
        summary.append("a");
        summary.append("b");
        summary.append("a");

        assert_eq!(summary.len(), 2);
        assert_eq!(summary.total(), 3);
        assert_eq!(summary.count_of(&"a"), Some((2, 0)));
        assert_eq!(summary.count_of(&"b"), Some((1, 0)));
        assert_eq!(summary.top().map(|(k, c, e)| (*k, c, e)), Some(("a", 2, 0)));
        summary.debug_validate_invariants();
    }

    #[test]
    fn stream_summary_monotone_stream_is_single_bucket() {
        let mut summary: StreamSummary<&str, u32> = StreamSummary::new(4).unwrap();
        for _ in 0..5 {
            summary.append("x");
        }
        assert_eq!(summary.len(), 1);
        assert_eq!(summary.total(), 5);
        assert_eq!(summary.count_of(&"x"), Some((5, 0)));
        assert_eq!(ranked(&summary), vec![("x".to_string(), 5, 0)]);
        summary.debug_validate_invariants();
    }

    #[test]
    fn stream_summary_eviction_records_error_bound() {
        // m=2 over "a b a c a b": c steals b's slot at count 1, b later
        // steals c's slot at count 2.
        let mut summary: StreamSummary<&str, u32> = StreamSummary::new(2).unwrap();
        for key in ["a", "b", "a", "c", "a", "b"] {
            summary.append(key);
            summary.debug_validate_invariants();
        }

        assert_eq!(summary.total(), 6);
        assert_eq!(summary.len(), 2);
        assert_eq!(summary.count_of(&"a"), Some((3, 0)));
        assert_eq!(summary.count_of(&"b"), Some((3, 2)));
        assert!(!summary.contains(&"c"));

        // True frequencies (3 for a, 2 for b) lie within [count - eps, count].
        let (count, eps) = summary.count_of(&"b").unwrap();
        assert!(count - eps <= 2 && 2 <= count);
    }

    #[test]
    fn stream_summary_evicts_oldest_of_tied_minima() {
        let mut summary: StreamSummary<&str, u32> = StreamSummary::new(2).unwrap();
        summary.append("a");
        summary.append("b");
        summary.append("c");

        // a and b tie at count 1; a is the older admission and loses its slot.
        assert!(!summary.contains(&"a"));
        assert_eq!(summary.count_of(&"b"), Some((1, 0)));
        assert_eq!(summary.count_of(&"c"), Some((2, 1)));
        summary.debug_validate_invariants();
    }

    #[test]
    fn stream_summary_single_counter_boundary() {
        let mut summary: StreamSummary<&str, u32> = StreamSummary::new(1).unwrap();
        for key in ["a", "b", "a", "c"] {
            summary.append(key);
        }
        assert_eq!(summary.len(), 1);
        assert_eq!(summary.total(), 4);
        // The surviving counter carries the whole stream's weight; its eps
        // is total minus the tracked key's own occurrences.
        assert_eq!(summary.count_of(&"c"), Some((4, 3)));
        summary.debug_validate_invariants();
    }

    #[test]
    fn stream_summary_ties_report_most_recently_promoted_first() {
        let mut summary: StreamSummary<&str, u32> = StreamSummary::new(4).unwrap();
        summary.append("a");
        summary.append("b");
        summary.append("a");
        summary.append("b");

        // Both sit at count 2; b reached it last.
        assert_eq!(
            ranked(&summary),
            vec![("b".to_string(), 2, 0), ("a".to_string(), 2, 0)]
        );
    }

    #[test]
    fn stream_summary_weighted_appends_group_by_count() {
        let mut summary: StreamSummary<&str, u32> = StreamSummary::new(4).unwrap();
        summary.append_weighted("a", 3);
        summary.append_weighted("b", 1);
        summary.append_weighted("c", 3);
        summary.debug_validate_invariants();

        assert_eq!(summary.total(), 7);
        assert_eq!(
            ranked(&summary),
            vec![
                ("c".to_string(), 3, 0),
                ("a".to_string(), 3, 0),
                ("b".to_string(), 1, 0),
            ]
        );

        summary.append_weighted("b", 5);
        summary.debug_validate_invariants();
        assert_eq!(summary.top().map(|(k, c, e)| (*k, c, e)), Some(("b", 6, 0)));
    }

    #[test]
    fn stream_summary_weighted_eviction_inherits_min_count() {
        let mut summary: StreamSummary<&str, u32> = StreamSummary::new(2).unwrap();
        summary.append_weighted("a", 4);
        summary.append_weighted("b", 2);
        summary.append_weighted("c", 3);

        // b held the minimum (2); c takes over with eps = 2, count = 5.
        assert!(!summary.contains(&"b"));
        assert_eq!(summary.count_of(&"c"), Some((5, 2)));
        assert_eq!(summary.total(), 9);
        summary.debug_validate_invariants();
    }

    #[test]
    fn stream_summary_zero_weight_is_noop() {
        let mut summary: StreamSummary<&str, u32> = StreamSummary::new(2).unwrap();
        summary.append_weighted("a", 0);
        assert!(summary.is_empty());
        assert_eq!(summary.total(), 0);
        summary.debug_validate_invariants();
    }

    #[test]
    fn stream_summary_counts_saturate_at_width_max() {
        let mut summary: StreamSummary<&str, u16> = StreamSummary::new(1).unwrap();
        summary.append_weighted("x", 60_000);
        summary.append_weighted("x", 10_000);

        // Saturation, not wrap-around: the count pins at u16::MAX.
        assert_eq!(summary.count_of(&"x"), Some((u16::MAX, 0)));
        assert_eq!(summary.total(), u16::MAX);
        summary.debug_validate_invariants();
    }

    #[test]
    fn stream_summary_clear_resets_state() {
        let mut summary: StreamSummary<&str, u32> = StreamSummary::new(4).unwrap();
        summary.append("a");
        summary.append("b");
        summary.clear();

        assert!(summary.is_empty());
        assert_eq!(summary.total(), 0);
        assert_eq!(summary.top(), None);
        assert_eq!(summary.capacity(), 4);
        summary.debug_validate_invariants();
    }

    #[test]
    fn stream_summary_iter_counts_non_increasing() {
        let mut summary: StreamSummary<&str, u32> = StreamSummary::new(3).unwrap();
        for key in ["a", "b", "c", "a", "b", "a", "d", "e", "d"] {
            summary.append(key);
            summary.debug_validate_invariants();
        }

        let counts: Vec<u32> = summary.iter().map(|(_, count, _)| count).collect();
        assert_eq!(counts.len(), 3);
        assert!(counts.windows(2).all(|w| w[0] >= w[1]));
    }
}
