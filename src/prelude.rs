pub use crate::count::CountType;
pub use crate::counter::{ExactCounter, HeapSummary, StreamSummary};
pub use crate::ds::{SlotArena, SlotId};
pub use crate::error::ConfigError;
pub use crate::record::{RecordLayout, SumAggregator};
pub use crate::traits::Counter;
