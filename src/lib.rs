//! freqkit: bounded-memory heavy-hitter counters over keyed streams.
//!
//! The core is [`counter::stream::StreamSummary`], a Stream-Summary
//! realization of the Space-Saving algorithm (Metwally, Agrawal, El
//! Abbadi) with O(1) unit updates and per-item error bounds. An exact
//! baseline and a heap-backed alternative share the same
//! [`traits::Counter`] surface.

pub mod count;
pub mod counter;
pub mod ds;
pub mod error;
pub mod record;
pub mod traits;

pub mod prelude;
