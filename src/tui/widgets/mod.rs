//! TUI Widgets - UI Components
//!
//! Stateless helpers that turn domain values into Ratatui primitives.

use ratatui::text::{Line, Span};

use super::theme::CourtTheme;
use crate::render::VisualTree;

/// Styled lines for a rendered tree; the active stage's row is highlighted
pub fn tree_lines(tree: &VisualTree, theme: &CourtTheme) -> Vec<Line<'static>> {
    tree.to_text()
        .into_iter()
        .map(|text| {
            let style = if text.contains('●') {
                theme.active_node()
            } else if text.trim_start_matches(|c: char| c == '│' || c == ' ').starts_with("Stage ID:") {
                theme.dimmed()
            } else {
                theme.text()
            };
            Line::from(Span::styled(text, style))
        })
        .collect()
}

/// Common widget utilities
pub mod utils {
    /// Truncate string with ellipsis (counts chars, not bytes)
    pub fn truncate(s: &str, max_len: usize) -> String {
        if s.chars().count() <= max_len {
            s.to_string()
        } else if max_len <= 3 {
            s.chars().take(max_len).collect()
        } else {
            let head: String = s.chars().take(max_len - 3).collect();
            format!("{}...", head)
        }
    }

    /// Scale as a whole percentage, e.g. `0.8` -> `"80%"`
    pub fn percent(scale: f64) -> String {
        format!("{:.0}%", scale * 100.0)
    }
}
