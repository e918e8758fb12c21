//! Count-width abstraction for counters.
//!
//! Every counter in this crate is generic over the width of its counts so
//! callers can trade memory for headroom (`u16`, `u32`, `u64`). All count
//! arithmetic in the crate goes through this trait and **saturates at
//! `MAX`** instead of wrapping; a counter that has hit the ceiling simply
//! stops growing.

use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Unsigned integer usable as a count, weight, or error bound.
///
/// Implemented for `u16`, `u32`, and `u64`. Conversions from wider or
/// signed values saturate: `from_u64` clamps to `MAX`, `from_i64`
/// additionally clamps negatives to zero.
pub trait CountType:
    Copy + Ord + Eq + Hash + Debug + Display + Default + Send + Sync + 'static
{
    const ZERO: Self;
    const ONE: Self;
    const MAX: Self;

    /// Adds, clamping at `MAX`.
    fn saturating_add(self, rhs: Self) -> Self;

    /// Subtracts, clamping at `ZERO`.
    fn saturating_sub(self, rhs: Self) -> Self;

    /// Widens losslessly to `u64`.
    fn as_u64(self) -> u64;

    /// Narrows from `u64`, clamping at `MAX`.
    fn from_u64(value: u64) -> Self;

    /// Converts from a signed value; negatives become `ZERO`, overlarge
    /// values clamp at `MAX`.
    fn from_i64(value: i64) -> Self;
}

macro_rules! impl_count_type {
    ($($ty:ty),* $(,)?) => {
        $(
            impl CountType for $ty {
                const ZERO: Self = 0;
                const ONE: Self = 1;
                const MAX: Self = <$ty>::MAX;

                #[inline]
                fn saturating_add(self, rhs: Self) -> Self {
                    <$ty>::saturating_add(self, rhs)
                }

                #[inline]
                fn saturating_sub(self, rhs: Self) -> Self {
                    <$ty>::saturating_sub(self, rhs)
                }

                #[inline]
                fn as_u64(self) -> u64 {
                    self as u64
                }

                #[inline]
                fn from_u64(value: u64) -> Self {
                    if value > <$ty>::MAX as u64 {
                        <$ty>::MAX
                    } else {
                        value as $ty
                    }
                }

                #[inline]
                fn from_i64(value: i64) -> Self {
                    if value <= 0 {
                        0
                    } else {
                        Self::from_u64(value as u64)
                    }
                }
            }
        )*
    };
}

impl_count_type!(u16, u32, u64);
