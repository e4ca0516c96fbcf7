//! Local key-value stores backing the history.

pub mod json_kv_store;
pub mod memory_kv_store;

pub use json_kv_store::JsonKvStore;
pub use memory_kv_store::MemoryKvStore;
