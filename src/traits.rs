//! Common operation set shared by all counter realizations.
//!
//! Every counter, exact or approximate, accepts keyed observations
//! through the same three-method surface: `append` (unit weight),
//! `append_weighted`, and `total`. Realization-specific surface (ordered
//! enumeration, capacity, epsilon lookup) stays inherent on each type;
//! callers that need it branch once at construction.

use crate::count::CountType;

/// A streaming frequency counter over keys of type `K` with counts of
/// width `C`.
///
/// Appending never fails and never suspends; every call completes
/// synchronously. Counters are single-threaded: share across threads only
/// behind external synchronization.
///
/// # Example
///
/// ```
/// use freqkit::counter::exact::ExactCounter;
/// use freqkit::traits::Counter;
///
/// let mut counter: ExactCounter<&str, u32> = ExactCounter::new();
/// counter.append("a");
/// counter.append_weighted("b", 3);
/// assert_eq!(counter.total(), 4);
/// assert_eq!(counter.len(), 2);
/// ```
pub trait Counter<K, C: CountType> {
    /// Records one occurrence of `key`.
    fn append(&mut self, key: K) {
        self.append_weighted(key, C::ONE);
    }

    /// Records `weight` occurrences of `key`.
    ///
    /// A zero weight is a no-op: nothing is admitted and `total` is
    /// unchanged.
    fn append_weighted(&mut self, key: K, weight: C);

    /// Returns the cumulative weight of all appends, saturating at
    /// `C::MAX`.
    fn total(&self) -> C;

    /// Returns the number of currently tracked keys.
    fn len(&self) -> usize;

    /// Returns `true` if no keys are tracked.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Resets the counter to its freshly constructed state.
    fn clear(&mut self);
}
