//! CaseBook - application state and controller
//!
//! Owns the ordered case list, the active selection and the compact
//! preference. Every mutation persists the whole list before returning.

use crate::case::{sample_case, CaseForm, CaseRecord};
use crate::error::Result;
use crate::flow::{StageEntry, StageNode, CASE_FLOW};
use crate::render::{render, Density, VisualTree};
use crate::store::{CaseStore, KeyValueStore};

/// Shown when no case is active
pub const NO_CASE: &str = "No case loaded.";

/// Shown after "new case" clears the selection
pub const NEW_CASE: &str = "New case…";

/// Layout used until a preference is saved
pub const DEFAULT_COMPACT: bool = true;

/// What the detail pane shows for the current selection
#[derive(Debug, Clone, PartialEq)]
pub struct CaseView {
    pub meta: String,
    pub tree: Option<VisualTree>,
}

/// Application state: cases, selection and display preference
#[derive(Debug)]
pub struct CaseBook<S> {
    store: CaseStore<S>,
    flow: &'static StageNode,
    cases: Vec<CaseRecord>,
    active: Option<usize>,
    compact: bool,
    drafting: bool,
}

impl<S: KeyValueStore> CaseBook<S> {
    /// Load from `backend`, seeding a sample case when the list is empty
    pub fn open(backend: S) -> Result<Self> {
        Self::open_with(backend, true)
    }

    pub fn open_with(backend: S, seed: bool) -> Result<Self> {
        let mut store = CaseStore::new(backend);
        let loaded = store.load_case_list();
        if loaded.skipped > 0 {
            tracing::warn!(skipped = loaded.skipped, "some saved cases could not be read");
        }
        let mut cases = loaded.records;

        // Only a list that is really empty gets the sample; unreadable
        // records stay on disk untouched
        if cases.is_empty() && loaded.skipped == 0 && seed {
            tracing::info!("no saved cases, seeding sample case");
            cases.push(sample_case());
            store.save_cases(&cases)?;
        }

        let compact = store.load_compact().unwrap_or(DEFAULT_COMPACT);
        let active = if cases.is_empty() { None } else { Some(0) };

        tracing::debug!(count = cases.len(), compact, "case book opened");
        Ok(Self {
            store,
            flow: &CASE_FLOW,
            cases,
            active,
            compact,
            drafting: false,
        })
    }

    // ─────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────

    pub fn cases(&self) -> &[CaseRecord] {
        &self.cases
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&CaseRecord> {
        self.cases.get(index)
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn active_case(&self) -> Option<&CaseRecord> {
        self.active.and_then(|i| self.cases.get(i))
    }

    pub fn flow(&self) -> &'static StageNode {
        self.flow
    }

    pub fn is_compact(&self) -> bool {
        self.compact
    }

    pub fn density(&self) -> Density {
        Density::from_compact(self.compact)
    }

    pub fn store(&self) -> &CaseStore<S> {
        &self.store
    }

    // ─────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────

    /// Create or update from a form.
    ///
    /// A valid `index` replaces that record; `None`, negative or out-of-range
    /// indices append. Returns the index written. A failed presence check
    /// leaves the list untouched.
    pub fn submit(&mut self, index: Option<i64>, form: CaseForm) -> Result<usize> {
        let record = form.into_record()?;

        let slot = index
            .and_then(|i| usize::try_from(i).ok())
            .filter(|&i| i < self.cases.len());

        // Memory only changes once the new list is on disk
        let mut next = self.cases.clone();
        let written = match slot {
            Some(i) => {
                tracing::info!(index = i, name = %record.full_name, "updating case");
                next[i] = record;
                i
            }
            None => {
                tracing::info!(name = %record.full_name, "creating case");
                next.push(record);
                next.len() - 1
            }
        };

        self.store.save_cases(&next)?;
        self.cases = next;
        self.active = Some(written);
        self.drafting = false;
        Ok(written)
    }

    /// Move the case at `index` to `stage_id` (kept as-is, not validated)
    pub fn set_stage(&mut self, index: usize, stage_id: &str) -> Result<bool> {
        let Some(record) = self.cases.get(index) else {
            return Ok(false);
        };
        let mut form = CaseForm::from_record(record);
        form.current_stage = stage_id.to_string();
        self.submit(Some(index as i64), form)?;
        Ok(true)
    }

    /// Remove the record at `index`. Out of range is a no-op returning
    /// `false`. Afterwards the first remaining case (if any) is active.
    pub fn delete(&mut self, index: usize) -> Result<bool> {
        if index >= self.cases.len() {
            tracing::debug!(index, "delete ignored, index out of range");
            return Ok(false);
        }
        let mut next = self.cases.clone();
        let removed = next.remove(index);
        self.store.save_cases(&next)?;
        tracing::info!(index, name = %removed.full_name, "deleted case");
        self.cases = next;
        self.active = if self.cases.is_empty() { None } else { Some(0) };
        Ok(true)
    }

    /// Delete the active case, if there is one
    pub fn delete_active(&mut self) -> Result<bool> {
        match self.active {
            Some(index) => self.delete(index),
            None => Ok(false),
        }
    }

    /// Select a case; out of range clears the selection
    pub fn select(&mut self, index: usize) {
        self.active = (index < self.cases.len()).then_some(index);
        self.drafting = false;
    }

    /// Clear the selection so the next submit creates a new case
    pub fn new_case(&mut self) {
        self.active = None;
        self.drafting = true;
    }

    pub fn set_compact(&mut self, compact: bool) -> Result<()> {
        self.store.save_compact(compact)?;
        self.compact = compact;
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Views
    // ─────────────────────────────────────────────────────────────────────

    /// Summary and tree for the active case
    pub fn view(&self) -> CaseView {
        match self.active_case() {
            Some(case) => CaseView {
                meta: case.summary(),
                tree: Some(render(self.flow, &case.current_stage, self.density())),
            },
            None => CaseView {
                meta: if self.drafting { NEW_CASE } else { NO_CASE }.to_string(),
                tree: None,
            },
        }
    }

    /// Render the flow for a candidate stage without touching any record
    pub fn preview(&self, stage_id: &str) -> VisualTree {
        render(self.flow, stage_id, self.density())
    }

    /// Flattened stages for a stage picker
    pub fn stage_options(&self) -> Vec<StageEntry> {
        self.flow.flatten()
    }
}
