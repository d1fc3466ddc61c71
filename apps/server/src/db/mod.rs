//! Data access: the query executor boundary and its in-memory backend

pub mod memory;
pub mod traits;

pub use memory::MemoryStore;
pub use traits::{QueryExecutor, QueryOutcome};
