//! TUI Module - case dashboard
//!
//! Case list, stage picker and flow tree side by side.
//!
//! Architecture:
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    UI LAYER (app.rs render, widgets/)               │
//! │  Pure rendering. Reads CaseBook + TuiState, draws the tree surface. │
//! └─────────────────────────────────────────────────────────────────────┘
//!                               ▲
//!                               │ Action (events.rs)
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      DOMAIN LAYER (book.rs)                         │
//! │  CaseBook owns cases, selection, compact preference, persistence.   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

mod app;
mod events;
mod state;
mod theme;

pub mod widgets;

pub use app::TuiApp;
pub use events::Action;
pub use state::{PanelFocus, TuiState};
pub use theme::CourtTheme;

use crate::book::CaseBook;
use crate::config::CaseTreeConfig;
use crate::store::FileStore;

/// Run the TUI dashboard against the configured store
pub fn run(config: &CaseTreeConfig) -> anyhow::Result<()> {
    let backend = FileStore::open(&config.data_path);
    let book = CaseBook::open_with(backend, config.seed_sample)?;
    TuiApp::new(book).run()
}
