//! TUI Application - Main entry point and run loop

use std::io::{self, Stdout};
use std::time::Duration;

use crossterm::{
    event::KeyEvent,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame, Terminal,
};

use super::events::{handle_key_event, poll_event, Action};
use super::state::{Notice, NoticeLevel, PanelFocus, TuiState};
use super::theme::{icons, CourtTheme};
use super::widgets::{tree_lines, utils};
use crate::book::CaseBook;
use crate::flow::StageEntry;
use crate::render::{FitToWidth, TreeSurface};
use crate::store::KeyValueStore;

/// Borders eat two columns of the tree panel
const TREE_PANEL_PADDING: usize = 2;

/// TUI Application
pub struct TuiApp<S> {
    book: CaseBook<S>,
    state: TuiState,
    theme: CourtTheme,
    stages: Vec<StageEntry>,
    surface: TreeSurface,
}

impl<S: KeyValueStore> TuiApp<S> {
    pub fn new(book: CaseBook<S>) -> Self {
        let stages = book.stage_options();
        let mut app = Self {
            book,
            state: TuiState::default(),
            theme: CourtTheme::new(),
            stages,
            surface: TreeSurface::new(),
        };
        if let Some(index) = app.book.active_index() {
            app.state.case_cursor = index;
        }
        app.sync_from_book();
        app
    }

    pub fn book(&self) -> &CaseBook<S> {
        &self.book
    }

    pub fn state(&self) -> &TuiState {
        &self.state
    }

    pub fn surface(&self) -> &TreeSurface {
        &self.surface
    }

    /// Run the TUI application
    pub fn run(mut self) -> anyhow::Result<()> {
        let mut terminal = self.setup_terminal()?;
        let result = self.main_loop(&mut terminal);
        self.restore_terminal(&mut terminal)?;
        result
    }

    /// Setup terminal for TUI
    fn setup_terminal(&self) -> anyhow::Result<Terminal<CrosstermBackend<Stdout>>> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(terminal)
    }

    /// Restore terminal to normal state
    fn restore_terminal(
        &self,
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    ) -> anyhow::Result<()> {
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;
        Ok(())
    }

    /// Main event loop
    fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> anyhow::Result<()> {
        let tick_rate = Duration::from_millis(100);

        while !self.state.should_quit {
            terminal.draw(|frame| self.render(frame))?;

            if let Some(key) = poll_event(tick_rate)? {
                self.handle_key(key);
            }
        }

        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Actions
    // ─────────────────────────────────────────────────────────────────────

    /// Route a key press through the keymap and apply the result
    pub fn handle_key(&mut self, key: KeyEvent) {
        let action = handle_key_event(key, &mut self.state);
        self.apply(action);
    }

    /// Apply an action to the case book and view state
    pub fn apply(&mut self, action: Action) {
        match action {
            Action::Quit => self.state.should_quit = true,
            Action::MoveUp => self.move_cursor(-1),
            Action::MoveDown => self.move_cursor(1),
            Action::Select => self.select(),
            Action::ToggleCompact => {
                let compact = !self.book.is_compact();
                match self.book.set_compact(compact) {
                    Ok(()) => {
                        let label = if compact { "compact" } else { "standard" };
                        self.state.notify(Notice::info(format!("Layout: {label}")));
                    }
                    Err(e) => self.state.notify(Notice::error(e.to_string())),
                }
                self.refresh_tree();
            }
            Action::Delete => match self.book.delete_active() {
                Ok(true) => {
                    self.state.case_cursor = 0;
                    self.state.notify(Notice::info("Case deleted"));
                    self.sync_from_book();
                }
                Ok(false) => self.state.notify(Notice::error("No case selected")),
                Err(e) => self.state.notify(Notice::error(e.to_string())),
            },
            Action::NextPanel | Action::PrevPanel | Action::None => {}
        }
    }

    fn move_cursor(&mut self, delta: i32) {
        match self.state.focus {
            PanelFocus::Cases => {
                self.state.case_cursor = TuiState::step(self.state.case_cursor, delta, self.book.len());
                self.book.select(self.state.case_cursor);
                self.sync_from_book();
            }
            PanelFocus::Stages => {
                self.state.stage_cursor = TuiState::step(self.state.stage_cursor, delta, self.stages.len());
                // Live preview while browsing stages
                self.state.preview = self.stages.get(self.state.stage_cursor).map(|s| s.id);
                self.refresh_tree();
            }
        }
    }

    fn select(&mut self) {
        match self.state.focus {
            PanelFocus::Cases => {
                self.book.select(self.state.case_cursor);
                self.sync_from_book();
            }
            PanelFocus::Stages => {
                let Some(stage) = self.stages.get(self.state.stage_cursor).copied() else {
                    return;
                };
                let Some(index) = self.book.active_index() else {
                    self.state.notify(Notice::error("Select a case first"));
                    return;
                };
                match self.book.set_stage(index, stage.id) {
                    Ok(_) => {
                        self.state.preview = None;
                        self.state.notify(Notice::info(format!("Saved stage: {}", stage.label)));
                    }
                    Err(e) => self.state.notify(Notice::error(e.to_string())),
                }
                self.refresh_tree();
            }
        }
    }

    /// Re-align cursors with the book's selection and re-render
    fn sync_from_book(&mut self) {
        self.state.preview = None;
        let stage = self
            .book
            .active_case()
            .map(|c| c.current_stage.clone())
            .unwrap_or_default();
        self.state.sync_stage_cursor(&self.stages, &stage);
        self.refresh_tree();
    }

    /// Replace the tree surface contents for the current selection/preview
    fn refresh_tree(&mut self) {
        let density = self.book.density();
        let flow = self.book.flow();
        match (self.state.preview, self.book.active_case()) {
            (Some(stage), _) => {
                self.surface.render(flow, stage, density);
            }
            (None, Some(case)) => {
                let stage = case.current_stage.clone();
                self.surface.render(flow, &stage, density);
            }
            (None, None) => self.surface.clear(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Rendering
    // ─────────────────────────────────────────────────────────────────────

    /// Render the UI
    pub fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(10),   // Content
                Constraint::Length(1), // Notice
                Constraint::Length(1), // Footer
            ])
            .split(area);

        self.render_header(frame, main_chunks[0]);

        let content_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
            .split(main_chunks[1]);

        let left_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(content_chunks[0]);

        self.render_cases(frame, left_chunks[0]);
        self.render_stages(frame, left_chunks[1]);
        self.render_tree(frame, content_chunks[1]);
        self.render_notice(frame, main_chunks[2]);
        self.render_footer(frame, main_chunks[3]);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let meta = self.book.view().meta;
        let header = Line::from(vec![
            Span::styled(format!("{} CASETREE", icons::GAVEL), self.theme.header()),
            Span::raw("  │  "),
            Span::styled(meta, self.theme.accent()),
        ]);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.header())
            .title(" CASE ");

        frame.render_widget(Paragraph::new(header).block(block), area);
    }

    fn render_cases(&self, frame: &mut Frame, area: Rect) {
        let focused = self.state.focus == PanelFocus::Cases;
        let width = area.width.saturating_sub(6) as usize;

        let lines: Vec<Line> = if self.book.is_empty() {
            vec![Line::from(Span::styled("  No cases yet", self.theme.dimmed()))]
        } else {
            self.book
                .cases()
                .iter()
                .enumerate()
                .map(|(i, case)| {
                    let is_active = self.book.active_index() == Some(i);
                    let is_cursor = focused && self.state.case_cursor == i;
                    let cursor = if is_cursor { icons::CURSOR } else { " " };
                    let icon = if is_active { icons::ACTIVE_CASE } else { icons::CASE };
                    let style = if is_cursor {
                        self.theme.cursor()
                    } else if is_active {
                        self.theme.accent()
                    } else {
                        self.theme.text()
                    };
                    Line::from(vec![
                        Span::raw(cursor),
                        Span::styled(format!("{icon} "), style),
                        Span::styled(utils::truncate(&case.full_name, width), style),
                    ])
                })
                .collect()
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border(focused))
            .title(format!(" CASES ({}) ", self.book.len()));

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn render_stages(&self, frame: &mut Frame, area: Rect) {
        let focused = self.state.focus == PanelFocus::Stages;
        let current = self.book.active_case().map(|c| c.current_stage.as_str());
        let width = area.width.saturating_sub(4) as usize;

        let lines: Vec<Line> = self
            .stages
            .iter()
            .enumerate()
            .map(|(i, stage)| {
                let is_cursor = focused && self.state.stage_cursor == i;
                let style = if is_cursor {
                    self.theme.cursor()
                } else if current == Some(stage.id) {
                    self.theme.accent()
                } else {
                    self.theme.text()
                };
                let cursor = if is_cursor { icons::CURSOR } else { " " };
                Line::from(vec![
                    Span::raw(cursor),
                    Span::styled(utils::truncate(&stage.indented_label(), width), style),
                ])
            })
            .collect();

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border(focused))
            .title(" STAGES ");

        // Keep the cursor row in view
        let visible = area.height.saturating_sub(2) as usize;
        let scroll = self.state.stage_cursor.saturating_sub(visible.saturating_sub(1));

        frame.render_widget(
            Paragraph::new(lines).block(block).scroll((scroll as u16, 0)),
            area,
        );
    }

    fn render_tree(&self, frame: &mut Frame, area: Rect) {
        let mut title = match self.state.preview {
            Some(stage) => format!(" {} PREVIEW: {} ", icons::PREVIEW, stage),
            None => " FLOW ".to_string(),
        };

        let body: Vec<Line> = match self.surface.tree() {
            Some(tree) => {
                // Terminal cells can't be scaled; report how far a scaled
                // display would shrink
                let fit = FitToWidth::new().with_padding(TREE_PANEL_PADDING);
                if let Some(scale) = fit.scale(tree.natural_width(), area.width as usize) {
                    title.push_str(&format!("[fit {}] ", utils::percent(scale)));
                }
                tree_lines(tree, &self.theme)
            }
            None => vec![Line::from(Span::styled(
                self.book.view().meta,
                self.theme.dimmed(),
            ))],
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.dimmed())
            .title(title);

        frame.render_widget(
            Paragraph::new(body).block(block).wrap(Wrap { trim: false }),
            area,
        );
    }

    fn render_notice(&self, frame: &mut Frame, area: Rect) {
        let line = match &self.state.notice {
            Some(notice) => {
                let style = match notice.level {
                    NoticeLevel::Info => self.theme.success(),
                    NoticeLevel::Error => self.theme.error(),
                };
                Line::from(Span::styled(format!(" {}", notice.message), style))
            }
            None => Line::from(""),
        };
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        let help = Line::from(vec![
            Span::styled(" [q]", self.theme.accent()),
            Span::styled("uit  ", self.theme.dimmed()),
            Span::styled("[Tab]", self.theme.accent()),
            Span::styled(" focus  ", self.theme.dimmed()),
            Span::styled("[↑↓]", self.theme.accent()),
            Span::styled(" move  ", self.theme.dimmed()),
            Span::styled("[Enter]", self.theme.accent()),
            Span::styled(" select/save  ", self.theme.dimmed()),
            Span::styled("[c]", self.theme.accent()),
            Span::styled("ompact  ", self.theme.dimmed()),
            Span::styled("[d]", self.theme.accent()),
            Span::styled("elete", self.theme.dimmed()),
        ]);

        frame.render_widget(Paragraph::new(help), area);
    }
}
