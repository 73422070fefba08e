//! Durable key-value records.

mod storage;

pub use storage::{load_json, save_json, FileStorage, KeyValueStorage, MemoryStorage};
