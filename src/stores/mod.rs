//! Storage layer for the transaction service. Provides:
//! - Concurrent record storage with paginated listing ([`TransactionsStore`])
//! - Collision-free identifier generation ([`IdGenerator`])
//! - A read-through cache for point lookups ([`ReadCache`])
//!
//! Everything here is safe to share between threads and takes `&self`.

mod cache;
mod ids;
mod pagination;
mod transactions;

pub use cache::{CacheStats, ReadCache};
pub use ids::IdGenerator;
pub use pagination::paginate;
pub use transactions::TransactionsStore;
