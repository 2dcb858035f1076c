//! Store Module - case persistence
//!
//! Key types:
//! - `KeyValueStore`: whole-value string storage (memory or JSON file)
//! - `CaseStore`: case list + compact preference under fixed keys

mod cases;
mod kv;

// Re-export all public types
pub use cases::{CaseList, CaseStore, CASES_KEY, COMPACT_KEY};
pub use kv::{FileStore, KeyValueStore, MemoryStore};
