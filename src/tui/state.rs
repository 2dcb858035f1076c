//! TuiState - view state for the dashboard
//!
//! Cursor positions, focus and transient messages. Case data itself lives in
//! the [`CaseBook`](crate::book::CaseBook) owned by the app.

use std::fmt;

use crate::flow::StageEntry;

/// Panel that receives navigation keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PanelFocus {
    #[default]
    Cases,
    Stages,
}

impl PanelFocus {
    pub fn next(self) -> Self {
        match self {
            PanelFocus::Cases => PanelFocus::Stages,
            PanelFocus::Stages => PanelFocus::Cases,
        }
    }

    // Two panels: previous and next coincide
    pub fn prev(self) -> Self {
        self.next()
    }
}

impl fmt::Display for PanelFocus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PanelFocus::Cases => write!(f, "Cases"),
            PanelFocus::Stages => write!(f, "Stages"),
        }
    }
}

/// Severity of the footer message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Dashboard view state
#[derive(Debug, Default)]
pub struct TuiState {
    pub focus: PanelFocus,
    pub case_cursor: usize,
    pub stage_cursor: usize,
    /// Stage id being previewed (stage cursor moved, not yet saved)
    pub preview: Option<&'static str>,
    pub notice: Option<Notice>,
    pub should_quit: bool,
}

impl TuiState {
    /// Move a cursor by `delta`, clamped to `[0, len)`
    pub fn step(cursor: usize, delta: i32, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        let moved = if delta < 0 {
            cursor.saturating_sub(delta.unsigned_abs() as usize)
        } else {
            cursor.saturating_add(delta as usize)
        };
        moved.min(len - 1)
    }

    /// Point the stage cursor at `stage_id`, or the root when unknown
    pub fn sync_stage_cursor(&mut self, stages: &[StageEntry], stage_id: &str) {
        self.stage_cursor = stages.iter().position(|s| s.id == stage_id).unwrap_or(0);
        self.preview = None;
    }

    pub fn notify(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::CASE_FLOW;

    #[test]
    fn focus_cycles() {
        assert_eq!(PanelFocus::Cases.next(), PanelFocus::Stages);
        assert_eq!(PanelFocus::Stages.next(), PanelFocus::Cases);
        assert_eq!(PanelFocus::Cases.prev(), PanelFocus::Stages);
    }

    #[test]
    fn step_clamps() {
        assert_eq!(TuiState::step(0, -1, 5), 0);
        assert_eq!(TuiState::step(4, 1, 5), 4);
        assert_eq!(TuiState::step(2, 1, 5), 3);
        assert_eq!(TuiState::step(3, 1, 0), 0);
    }

    #[test]
    fn sync_stage_cursor_falls_back_to_root() {
        let stages = CASE_FLOW.flatten();
        let mut state = TuiState {
            preview: Some("trial"),
            ..TuiState::default()
        };
        state.sync_stage_cursor(&stages, "plea");
        assert_eq!(stages[state.stage_cursor].id, "plea");
        assert!(state.preview.is_none());

        state.sync_stage_cursor(&stages, "nonexistent");
        assert_eq!(state.stage_cursor, 0);
    }
}
