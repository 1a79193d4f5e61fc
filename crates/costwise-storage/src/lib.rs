//! # costwise-storage
//!
//! Data Access Port implementations. The engine only depends on the
//! `ICostDataPort` contract; these cover tests, the CLI, and embedding.

pub mod memory_store;
pub mod retry;

pub use memory_store::InMemoryCostStore;
pub use retry::{RetryPolicy, RetryingPort};
