//! Dashboard theme - colors, styles and symbols

use ratatui::style::{Color, Modifier, Style};

/// Color palette
pub struct CourtTheme {
    pub violet: Color,
    pub amber: Color,
    pub teal: Color,
    pub white: Color,
    pub grey: Color,

    pub success_green: Color,
    pub error_red: Color,
}

impl Default for CourtTheme {
    fn default() -> Self {
        Self {
            violet: Color::Rgb(138, 43, 226), // #8A2BE2
            amber: Color::Rgb(255, 191, 0),   // #FFBF00
            teal: Color::Rgb(0, 255, 255),    // #00FFFF
            white: Color::Rgb(230, 237, 243), // #E6EDF3
            grey: Color::Rgb(128, 128, 128),

            success_green: Color::Rgb(63, 185, 80), // #3FB950
            error_red: Color::Rgb(248, 81, 73),     // #F85149
        }
    }
}

impl CourtTheme {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> Style {
        Style::default().fg(self.white)
    }

    pub fn dimmed(&self) -> Style {
        Style::default().fg(self.grey)
    }

    pub fn header(&self) -> Style {
        Style::default().fg(self.violet).add_modifier(Modifier::BOLD)
    }

    pub fn accent(&self) -> Style {
        Style::default().fg(self.amber)
    }

    /// Focused panel border
    pub fn highlight(&self) -> Style {
        Style::default().fg(self.teal).add_modifier(Modifier::BOLD)
    }

    /// The active stage in the tree
    pub fn active_node(&self) -> Style {
        Style::default()
            .fg(self.amber)
            .add_modifier(Modifier::BOLD | Modifier::REVERSED)
    }

    /// Cursor row in a list
    pub fn cursor(&self) -> Style {
        Style::default().fg(self.teal).add_modifier(Modifier::BOLD)
    }

    pub fn success(&self) -> Style {
        Style::default().fg(self.success_green)
    }

    pub fn error(&self) -> Style {
        Style::default().fg(self.error_red).add_modifier(Modifier::BOLD)
    }

    pub fn border(&self, focused: bool) -> Style {
        if focused {
            self.highlight()
        } else {
            self.dimmed()
        }
    }
}

/// UI Icons used throughout the TUI
pub mod icons {
    pub const GAVEL: &str = "⚖";
    pub const CURSOR: &str = "▸";
    pub const ACTIVE_CASE: &str = "◉";
    pub const CASE: &str = "○";
    pub const PREVIEW: &str = "◎";
}
