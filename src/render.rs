//! Tree renderer
//!
//! Turns the stage flow plus a current stage id into a [`VisualTree`]: a
//! display-independent structure that mirrors the flow's nesting and marks
//! at most one node active. Serializers for terminal text and HTML sit on
//! top of it, and [`TreeSurface`] models a display container that is fully
//! replaced on every render.
//!
//! ```text
//! StageNode ──render()──► VisualTree ──┬─► to_text()  (terminal)
//!                                      └─► to_html()  (markup)
//! ```

use crate::flow::StageNode;

/// Display density. Affects spacing only, never structure or active marking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Density {
    #[default]
    Standard,
    Compact,
}

impl Density {
    pub fn from_compact(compact: bool) -> Self {
        if compact {
            Density::Compact
        } else {
            Density::Standard
        }
    }

    pub fn is_compact(self) -> bool {
        self == Density::Compact
    }

    /// CSS class list for a nested list element
    pub fn list_class(self) -> &'static str {
        match self {
            Density::Standard => "tree-ul",
            Density::Compact => "tree-ul tree-ul--compact",
        }
    }
}

/// One rendered stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisualNode {
    pub id: &'static str,
    pub label: &'static str,
    pub active: bool,
    pub children: Vec<VisualNode>,
}

impl VisualNode {
    /// Secondary metadata line shown under the label
    pub fn meta(&self) -> String {
        format!("Stage ID: {}", self.id)
    }

    /// CSS class list for the node box
    pub fn class(&self) -> &'static str {
        if self.active {
            "tree-node tree-node--active"
        } else {
            "tree-node"
        }
    }
}

/// The full rendered tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisualTree {
    pub root: VisualNode,
    pub density: Density,
}

/// Build the visual tree for `root`, marking the node whose id equals
/// `current_stage_id`. An id that matches nothing marks nothing.
pub fn render(root: &StageNode, current_stage_id: &str, density: Density) -> VisualTree {
    VisualTree {
        root: build_node(root, current_stage_id),
        density,
    }
}

fn build_node(node: &StageNode, current_stage_id: &str) -> VisualNode {
    VisualNode {
        id: node.id,
        label: node.label,
        active: node.id == current_stage_id,
        children: node
            .children
            .iter()
            .map(|child| build_node(child, current_stage_id))
            .collect(),
    }
}

impl VisualTree {
    /// Pre-order `(depth, node)` traversal
    pub fn nodes(&self) -> Vec<(usize, &VisualNode)> {
        let mut out = Vec::new();
        let mut stack = vec![(0usize, &self.root)];
        while let Some((depth, node)) = stack.pop() {
            out.push((depth, node));
            for child in node.children.iter().rev() {
                stack.push((depth + 1, child));
            }
        }
        out
    }

    pub fn active(&self) -> Option<&VisualNode> {
        self.nodes().into_iter().map(|(_, n)| n).find(|n| n.active)
    }

    pub fn active_ids(&self) -> Vec<&'static str> {
        self.nodes()
            .into_iter()
            .filter(|(_, n)| n.active)
            .map(|(_, n)| n.id)
            .collect()
    }

    /// `(id, depth, active)` in pre-order, ignoring presentation
    pub fn structure(&self) -> Vec<(&'static str, usize, bool)> {
        self.nodes()
            .into_iter()
            .map(|(depth, n)| (n.id, depth, n.active))
            .collect()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Terminal text
    // ─────────────────────────────────────────────────────────────────────

    /// Box-drawing lines. Standard density puts the stage id on its own
    /// line; compact density inlines it.
    pub fn to_text(&self) -> Vec<String> {
        let mut lines = Vec::new();
        self.push_text(&self.root, "", None, &mut lines);
        lines
    }

    fn push_text(
        &self,
        node: &VisualNode,
        prefix: &str,
        is_last: Option<bool>,
        lines: &mut Vec<String>,
    ) {
        // Root has no connector
        let (connector, continuation) = match is_last {
            None => ("", ""),
            Some(true) => ("└─ ", "   "),
            Some(false) => ("├─ ", "│  "),
        };
        let marker = if node.active { "● " } else { "○ " };
        let child_prefix = format!("{prefix}{continuation}");

        match self.density {
            Density::Standard => {
                lines.push(format!("{prefix}{connector}{marker}{}", node.label));
                let rail = if node.children.is_empty() { "  " } else { "│ " };
                lines.push(format!("{child_prefix}{rail}  {}", node.meta()));
            }
            Density::Compact => {
                lines.push(format!("{prefix}{connector}{marker}{} · {}", node.label, node.id));
            }
        }

        let count = node.children.len();
        for (i, child) in node.children.iter().enumerate() {
            self.push_text(child, &child_prefix, Some(i + 1 == count), lines);
        }
    }

    /// Widest text line, in columns
    pub fn natural_width(&self) -> usize {
        self.to_text()
            .iter()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0)
    }

    // ─────────────────────────────────────────────────────────────────────
    // HTML
    // ─────────────────────────────────────────────────────────────────────

    /// Nested `<ul>/<li>` markup
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("<ul class=\"{}\">", self.density.list_class()));
        self.push_html(&self.root, &mut out);
        out.push_str("</ul>");
        out
    }

    fn push_html(&self, node: &VisualNode, out: &mut String) {
        out.push_str("<li>");
        out.push_str(&format!(
            "<div class=\"{}\" data-stage-id=\"{}\">",
            node.class(),
            escape_html(node.id)
        ));
        out.push_str(&format!(
            "<span class=\"tree-node__label\">{}</span>",
            escape_html(node.label)
        ));
        out.push_str(&format!(
            "<span class=\"tree-node__meta\">{}</span>",
            escape_html(&node.meta())
        ));
        out.push_str("</div>");
        if !node.children.is_empty() {
            out.push_str(&format!("<ul class=\"{}\">", self.density.list_class()));
            for child in &node.children {
                self.push_html(child, out);
            }
            out.push_str("</ul>");
        }
        out.push_str("</li>");
    }

    /// Standalone HTML page. `scale` comes from [`FitToWidth::scale`].
    pub fn to_html_document(&self, title: &str, scale: Option<f64>) -> String {
        let transform = match scale {
            Some(s) => format!(" style=\"transform: scale({s:.2}); transform-origin: top left\""),
            None => String::new(),
        };
        format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n<style>\n{}</style>\n</head>\n<body>\n<div id=\"treeScroll\">\n<div id=\"treeContainer\"{}>\n{}\n</div>\n</div>\n</body>\n</html>\n",
            escape_html(title),
            TREE_CSS,
            transform,
            self.to_html()
        )
    }
}

const TREE_CSS: &str = "\
.tree-ul { list-style: none; padding-left: 1.5rem; }
.tree-ul--compact { padding-left: 0.75rem; }
.tree-node { display: inline-block; border: 1px solid #999; border-radius: 6px; padding: 0.4rem 0.8rem; margin: 0.3rem 0; }
.tree-ul--compact .tree-node { padding: 0.15rem 0.4rem; margin: 0.1rem 0; }
.tree-node--active { background: #ffbf00; border-color: #8a2be2; font-weight: bold; }
.tree-node__meta { display: block; font-size: 0.75em; color: #666; }
";

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

// ─────────────────────────────────────────────────────────────────────────────
// Fit to width
// ─────────────────────────────────────────────────────────────────────────────

/// Smallest uniform scale applied when shrinking a tree to fit
pub const MIN_SCALE: f64 = 0.65;

/// Inner padding subtracted from the container width before measuring
pub const FIT_PADDING: usize = 16;

/// Uniform scale-down applied after rendering. Never reflows the tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitToWidth {
    pub padding: usize,
    pub min_scale: f64,
}

impl Default for FitToWidth {
    fn default() -> Self {
        Self {
            padding: FIT_PADDING,
            min_scale: MIN_SCALE,
        }
    }
}

impl FitToWidth {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_padding(mut self, padding: usize) -> Self {
        self.padding = padding;
        self
    }

    /// `None` when the tree already fits (or there is no room to measure)
    pub fn scale(&self, natural_width: usize, container_width: usize) -> Option<f64> {
        let available = container_width.saturating_sub(self.padding);
        if available == 0 || natural_width <= available {
            return None;
        }
        Some((available as f64 / natural_width as f64).max(self.min_scale))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Surface
// ─────────────────────────────────────────────────────────────────────────────

/// A display container holding at most one rendered tree
#[derive(Debug, Default)]
pub struct TreeSurface {
    tree: Option<VisualTree>,
}

impl TreeSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace whatever the surface shows with a fresh render
    pub fn render(&mut self, root: &StageNode, current_stage_id: &str, density: Density) -> &VisualTree {
        self.clear();
        let tree = render(root, current_stage_id, density);
        if tree.active().is_none() {
            tracing::debug!(stage = current_stage_id, "no stage matches, nothing marked active");
        }
        self.tree.insert(tree)
    }

    pub fn clear(&mut self) {
        self.tree = None;
    }

    pub fn tree(&self) -> Option<&VisualTree> {
        self.tree.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_none()
    }
}
