//! Error types for the freqkit library.
//!
//! Counting itself is infallible: `append` never returns an error, so the
//! only fallible surface is construction from user-supplied parameters.
//! [`ConfigError`] enumerates the ways those parameters can be rejected.
//!
//! ## Example Usage
//!
//! ```
//! use freqkit::counter::stream::StreamSummary;
//! use freqkit::error::ConfigError;
//!
//! // Invalid capacity is caught without panicking
//! let bad = StreamSummary::<String, u32>::new(0);
//! assert_eq!(bad.unwrap_err(), ConfigError::ZeroCapacity);
//! ```

use std::fmt;

/// Error returned when counter configuration parameters are invalid.
///
/// Produced by the fallible constructors:
/// [`StreamSummary::new`](crate::counter::stream::StreamSummary::new) and
/// [`HeapSummary::new`](crate::counter::heap::HeapSummary::new) reject
/// zero capacities;
/// [`RecordLayout::new`](crate::record::RecordLayout::new) rejects zero
/// field indices, since record fields are numbered from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A summary was asked to track zero keys.
    ZeroCapacity,
    /// The token field index was 0.
    ZeroTokenField,
    /// The frequency field index was 0.
    ZeroFreqField,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroCapacity => write!(f, "capacity must be at least 1"),
            ConfigError::ZeroTokenField => write!(f, "token field index is 1-based; got 0"),
            ConfigError::ZeroFreqField => write!(f, "frequency field index is 1-based; got 0"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counter::{HeapSummary, StreamSummary};
    use crate::record::RecordLayout;

    #[test]
    fn zero_capacity_rejected_by_both_summaries() {
        assert_eq!(
            StreamSummary::<u64, u32>::new(0).unwrap_err(),
            ConfigError::ZeroCapacity
        );
        assert_eq!(
            HeapSummary::<u64, u32>::new(0).unwrap_err(),
            ConfigError::ZeroCapacity
        );
    }

    #[test]
    fn zero_field_indices_map_to_distinct_variants() {
        assert_eq!(
            RecordLayout::new(0, 2).unwrap_err(),
            ConfigError::ZeroTokenField
        );
        assert_eq!(
            RecordLayout::new(1, 0).unwrap_err(),
            ConfigError::ZeroFreqField
        );
    }

    #[test]
    fn display_names_the_offending_parameter() {
        assert!(ConfigError::ZeroCapacity.to_string().contains("capacity"));
        assert!(ConfigError::ZeroTokenField.to_string().contains("token"));
        assert!(ConfigError::ZeroFreqField.to_string().contains("frequency"));
    }

    #[test]
    fn boxes_into_dyn_error() {
        // The driver funnels construction failures through Box<dyn Error>.
        let boxed: Box<dyn std::error::Error> = Box::new(ConfigError::ZeroCapacity);
        assert_eq!(boxed.to_string(), "capacity must be at least 1");
    }
}
