//! Sum aggregation: feeding counters from pre-weighted records.
//!
//! A second-pass combiner for inputs that already carry partial counts,
//! one `(token, frequency)` record per line. [`RecordLayout`] names which
//! tab-separated fields hold the token and the frequency; [`SumAggregator`]
//! turns each record into a single `append_weighted` call on any counter.
//!
//! Parsing is deliberately pipeline-tolerant: a missing or non-numeric
//! frequency field parses as 0, so the record is consumed without effect.
//! [`RecordLayout`] reports the frequency as a raw signed value; it is
//! [`SumAggregator`] that narrows it to the counter's count width
//! (clamping negatives to 0) when it appends. A record without the token
//! field is skipped entirely.

use crate::count::CountType;
use crate::error::ConfigError;
use crate::traits::Counter;

/// Field positions of the token and frequency columns, 1-based, within a
/// tab-separated record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordLayout {
    token_field: usize,
    freq_field: usize,
}

impl RecordLayout {
    /// Creates a layout from 1-based field indices.
    ///
    /// # Errors
    /// Returns [`ConfigError`] when either index is zero.
    pub fn new(token_field: usize, freq_field: usize) -> Result<Self, ConfigError> {
        if token_field == 0 {
            return Err(ConfigError::ZeroTokenField);
        }
        if freq_field == 0 {
            return Err(ConfigError::ZeroFreqField);
        }
        Ok(Self {
            token_field,
            freq_field,
        })
    }

    /// Returns the token field of `record` verbatim, if present.
    pub fn token<'a>(&self, record: &'a str) -> Option<&'a str> {
        record.split('\t').nth(self.token_field - 1)
    }

    /// Returns the frequency field of `record` parsed as a raw signed
    /// value; missing or invalid fields yield 0.
    pub fn freq(&self, record: &str) -> i64 {
        record
            .split('\t')
            .nth(self.freq_field - 1)
            .and_then(|field| field.parse::<i64>().ok())
            .unwrap_or(0)
    }

    /// Splits a record into `(token, frequency)`, or `None` when the token
    /// field is absent.
    pub fn split<'a>(&self, record: &'a str) -> Option<(&'a str, i64)> {
        let token = self.token(record)?;
        Some((token, self.freq(record)))
    }
}

/// Wraps a counter and feeds it one weighted append per record.
#[derive(Debug)]
pub struct SumAggregator<A> {
    layout: RecordLayout,
    counter: A,
}

impl<A> SumAggregator<A> {
    /// Creates an aggregator feeding `counter` through `layout`.
    pub fn new(layout: RecordLayout, counter: A) -> Self {
        Self { layout, counter }
    }

    /// Consumes one record, appending its token with its frequency as the
    /// weight. Records without a token field are ignored.
    pub fn consume<C>(&mut self, record: &str)
    where
        A: Counter<String, C>,
        C: CountType,
    {
        if let Some((token, freq)) = self.layout.split(record) {
            self.counter.append_weighted(token.to_string(), C::from_i64(freq));
        }
    }

    /// Returns the wrapped counter.
    pub fn counter(&self) -> &A {
        &self.counter
    }

    /// Unwraps the aggregator, returning the counter.
    pub fn into_inner(self) -> A {
        self.counter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counter::exact::ExactCounter;
    use crate::counter::stream::StreamSummary;

    #[test]
    fn record_layout_rejects_zero_indices() {
        assert_eq!(RecordLayout::new(0, 2).unwrap_err(), ConfigError::ZeroTokenField);
        assert_eq!(RecordLayout::new(1, 0).unwrap_err(), ConfigError::ZeroFreqField);
        assert!(RecordLayout::new(1, 2).is_ok());
    }

    #[test]
    fn record_layout_splits_default_fields() {
        let layout = RecordLayout::new(1, 2).unwrap();
        assert_eq!(layout.split("x\t3"), Some(("x", 3)));
        assert_eq!(layout.split("y\t5\textra"), Some(("y", 5)));
    }

    #[test]
    fn record_layout_honors_custom_fields() {
        let layout = RecordLayout::new(2, 3).unwrap();
        assert_eq!(layout.split("id9\tword\t12"), Some(("word", 12)));
    }

    #[test]
    fn record_layout_invalid_or_missing_freq_yields_zero() {
        let layout = RecordLayout::new(1, 2).unwrap();
        assert_eq!(layout.split("x\tnot-a-number"), Some(("x", 0)));
        assert_eq!(layout.split("x"), Some(("x", 0)));
    }

    #[test]
    fn record_layout_passes_negative_freq_through() {
        // A signed value is a valid parse; the aggregator clamps it when
        // narrowing to the counter's width.
        let layout = RecordLayout::new(1, 2).unwrap();
        assert_eq!(layout.split("x\t-7"), Some(("x", -7)));
    }

    #[test]
    fn record_layout_missing_token_is_none() {
        let layout = RecordLayout::new(3, 2).unwrap();
        assert_eq!(layout.split("only\ttwo"), None);
    }

    #[test]
    fn sum_aggregator_combines_partial_counts() {
        let layout = RecordLayout::new(1, 2).unwrap();
        let mut agg = SumAggregator::new(layout, ExactCounter::<String, u32>::new());
        agg.consume("x\t3");
        agg.consume("y\t5");
        agg.consume("x\t2");

        let counter = agg.into_inner();
        assert_eq!(counter.count_of(&"x".to_string()), Some(5));
        assert_eq!(counter.count_of(&"y".to_string()), Some(5));
        assert_eq!(counter.total(), 10);
    }

    #[test]
    fn sum_aggregator_negative_and_invalid_freqs_are_inert() {
        let layout = RecordLayout::new(1, 2).unwrap();
        let mut agg = SumAggregator::new(layout, ExactCounter::<String, u32>::new());
        agg.consume("x\t-4");
        agg.consume("y\tjunk");
        agg.consume("z\t2");

        let counter = agg.into_inner();
        assert_eq!(counter.len(), 1);
        assert_eq!(counter.count_of(&"z".to_string()), Some(2));
        assert_eq!(counter.total(), 2);
    }

    #[test]
    fn sum_aggregator_feeds_stream_summary() {
        let layout = RecordLayout::new(1, 2).unwrap();
        let summary = StreamSummary::<String, u32>::new(2).unwrap();
        let mut agg = SumAggregator::new(layout, summary);
        agg.consume("a\t4");
        agg.consume("b\t2");
        agg.consume("c\t3");

        let summary = agg.into_inner();
        assert_eq!(summary.count_of(&"c".to_string()), Some((5, 2)));
        assert_eq!(summary.total(), 9);
    }
}
