//! casetree - track criminal-case stages and render them as a flow tree

pub mod book;
pub mod case;
pub mod config;
pub mod error;
pub mod flow;
pub mod render;
pub mod store;
pub mod tui;

pub use book::{CaseBook, CaseView};
pub use case::{CaseForm, CaseRecord, CustodyType};
pub use config::CaseTreeConfig;
pub use error::{CaseTreeError, FixSuggestion};
pub use flow::{StageEntry, StageNode, CASE_FLOW};
pub use render::{render, Density, FitToWidth, TreeSurface, VisualNode, VisualTree};
pub use store::{CaseStore, FileStore, KeyValueStore, MemoryStore};
