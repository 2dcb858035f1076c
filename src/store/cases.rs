//! Case list persistence
//!
//! The record list lives under a single key as a JSON array and is written
//! wholesale on every change. Reads fail soft: anything unparseable becomes
//! an empty list (logged, never returned as an error).

use serde_json::Value;

use super::kv::KeyValueStore;
use crate::case::CaseRecord;
use crate::error::Result;

/// Key holding the JSON array of case records
pub const CASES_KEY: &str = "family-case-tree-cases";

/// Key holding the compact display preference (`"1"` / `"0"`)
pub const COMPACT_KEY: &str = "family-case-tree-compact";

/// Result of decoding the stored case list
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CaseList {
    pub records: Vec<CaseRecord>,
    /// Array elements that could not be decoded as a record
    pub skipped: usize,
}

/// Case records and display preference on top of a key-value backend
#[derive(Debug)]
pub struct CaseStore<S> {
    backend: S,
}

impl<S: KeyValueStore> CaseStore<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Load every record. Absent, corrupt or non-array data yields `[]`.
    pub fn load_cases(&self) -> Vec<CaseRecord> {
        self.load_case_list().records
    }

    /// Load every record that decodes, counting the ones that don't.
    ///
    /// A well-formed array never loads as a whole-list failure: bad elements
    /// are skipped one by one and the rest are kept.
    pub fn load_case_list(&self) -> CaseList {
        let raw = match self.backend.get(CASES_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return CaseList::default(),
            Err(e) => {
                tracing::warn!(error = %e, "failed to read case list, using empty list");
                return CaseList::default();
            }
        };

        let items = match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Array(items)) => items,
            Ok(_) => {
                tracing::warn!("case list is not a JSON array, using empty list");
                return CaseList::default();
            }
            Err(e) => {
                tracing::warn!(error = %e, "case list is not valid JSON, using empty list");
                return CaseList::default();
            }
        };

        let mut list = CaseList::default();
        for (index, item) in items.into_iter().enumerate() {
            match serde_json::from_value::<CaseRecord>(item) {
                Ok(record) => list.records.push(record),
                Err(e) => {
                    tracing::warn!(index, error = %e, "skipping malformed case record");
                    list.skipped += 1;
                }
            }
        }
        list
    }

    /// Replace the stored list with `cases`
    pub fn save_cases(&mut self, cases: &[CaseRecord]) -> Result<()> {
        let json = serde_json::to_string(cases)?;
        self.backend.set(CASES_KEY, &json)?;
        tracing::debug!(count = cases.len(), "saved case list");
        Ok(())
    }

    /// Stored compact preference, `None` when unset or unrecognised
    pub fn load_compact(&self) -> Option<bool> {
        match self.backend.get(COMPACT_KEY) {
            Ok(Some(raw)) => match raw.as_str() {
                "1" => Some(true),
                "0" => Some(false),
                other => {
                    tracing::warn!(value = other, "ignoring unrecognised compact preference");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read compact preference");
                None
            }
        }
    }

    pub fn save_compact(&mut self, compact: bool) -> Result<()> {
        self.backend.set(COMPACT_KEY, if compact { "1" } else { "0" })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::case::{sample_case, CustodyType};
    use crate::store::MemoryStore;

    fn store_with(raw: &str) -> CaseStore<MemoryStore> {
        let mut backend = MemoryStore::new();
        backend.set(CASES_KEY, raw).unwrap();
        CaseStore::new(backend)
    }

    #[test]
    fn absent_key_loads_empty() {
        let store = CaseStore::new(MemoryStore::new());
        assert!(store.load_cases().is_empty());
    }

    #[test]
    fn corrupt_json_loads_empty() {
        assert!(store_with("[{").load_cases().is_empty());
        assert!(store_with("not json at all").load_cases().is_empty());
    }

    #[test]
    fn non_array_loads_empty() {
        assert!(store_with(r#"{"fullName": "x"}"#).load_cases().is_empty());
        assert!(store_with("42").load_cases().is_empty());
    }

    #[test]
    fn bad_element_skips_only_that_record() {
        let store = store_with(
            r#"[{"fullName":"Alice","custodyType":"county"},42,{"fullName":"Bob","custodyType":"County","dob":null}]"#,
        );
        let list = store.load_case_list();
        let names: Vec<&str> = list.records.iter().map(|r| r.full_name.as_str()).collect();
        assert_eq!(names, ["Alice", "Bob"]);
        assert_eq!(list.skipped, 1);
        assert!(list.records[1].dob.is_empty());
    }

    #[test]
    fn save_then_load_round_trips() {
        let mut store = CaseStore::new(MemoryStore::new());
        let sparse = CaseRecord {
            full_name: "John Doe".into(),
            custody_type: CustodyType::Federal,
            ..CaseRecord::default()
        };
        let cases = vec![sample_case(), sparse];
        store.save_cases(&cases).unwrap();
        assert_eq!(store.load_cases(), cases);

        store.save_cases(&[]).unwrap();
        assert!(store.load_cases().is_empty());
    }

    #[test]
    fn compact_preference() {
        let mut store = CaseStore::new(MemoryStore::new());
        assert_eq!(store.load_compact(), None);
        store.save_compact(false).unwrap();
        assert_eq!(store.load_compact(), Some(false));
        store.save_compact(true).unwrap();
        assert_eq!(store.backend().get(COMPACT_KEY).unwrap().as_deref(), Some("1"));
    }
}
