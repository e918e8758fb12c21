pub mod exact;
pub mod heap;
pub mod stream;

pub use exact::ExactCounter;
pub use heap::HeapSummary;
pub use stream::StreamSummary;
