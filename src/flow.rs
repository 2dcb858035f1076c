//! Stage flow model
//!
//! The fixed hierarchy of case stages. The tree is a `'static` constant:
//! nothing in the crate mutates it, and a case's stage is only ever compared
//! against it by id.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{CaseTreeError, Result};

/// Prefix repeated once per depth level in stage selection lists
pub const INDENT_PREFIX: &str = "— ";

/// Stage ids are lowercase snake_case tokens
static STAGE_ID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z][a-z0-9_]*$").expect("valid regex"));

/// A single stage in the flow tree
#[derive(Debug, PartialEq, Eq)]
pub struct StageNode {
    pub id: &'static str,
    pub label: &'static str,
    pub children: &'static [StageNode],
}

impl StageNode {
    pub const fn leaf(id: &'static str, label: &'static str) -> Self {
        Self { id, label, children: &[] }
    }

    pub const fn branch(
        id: &'static str,
        label: &'static str,
        children: &'static [StageNode],
    ) -> Self {
        Self { id, label, children }
    }

    /// Pre-order traversal: node before its children, children in
    /// declaration order.
    pub fn walk(&self) -> Walk<'_> {
        Walk { stack: vec![(0, self)] }
    }

    /// Flatten to `{id, label, depth}` entries in pre-order
    pub fn flatten(&self) -> Vec<StageEntry> {
        self.walk()
            .map(|(depth, node)| StageEntry {
                id: node.id,
                label: node.label,
                depth,
            })
            .collect()
    }

    /// Find a stage by id. Absent ids yield `None`.
    pub fn find(&self, id: &str) -> Option<&StageNode> {
        self.walk().map(|(_, node)| node).find(|node| node.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    /// Chain of nodes from this node down to `id` (inclusive).
    ///
    /// Empty when `id` is not in the tree.
    pub fn path_to(&self, id: &str) -> Vec<&StageNode> {
        let mut path = Vec::new();
        if self.collect_path(id, &mut path) {
            path
        } else {
            Vec::new()
        }
    }

    fn collect_path<'a>(&'a self, id: &str, path: &mut Vec<&'a StageNode>) -> bool {
        path.push(self);
        if self.id == id {
            return true;
        }
        for child in self.children {
            if child.collect_path(id, path) {
                return true;
            }
        }
        path.pop();
        false
    }

    /// Number of nodes in the tree rooted here
    pub fn len(&self) -> usize {
        self.walk().count()
    }

    /// Check the id invariants: every id is a well-formed token and no id
    /// appears twice.
    pub fn validate(&self) -> Result<()> {
        let mut seen: HashSet<&str> = HashSet::new();
        for (_, node) in self.walk() {
            if !STAGE_ID_PATTERN.is_match(node.id) {
                return Err(CaseTreeError::InvalidStageId { id: node.id.to_string() });
            }
            if !seen.insert(node.id) {
                return Err(CaseTreeError::DuplicateStage { id: node.id.to_string() });
            }
        }
        Ok(())
    }
}

/// Pre-order iterator yielding `(depth, node)`
pub struct Walk<'a> {
    stack: Vec<(usize, &'a StageNode)>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = (usize, &'a StageNode);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, node) = self.stack.pop()?;
        // Reverse so the first child is popped next
        for child in node.children.iter().rev() {
            self.stack.push((depth + 1, child));
        }
        Some((depth, node))
    }
}

/// Flattened stage, used to populate stage pickers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageEntry {
    pub id: &'static str,
    pub label: &'static str,
    pub depth: usize,
}

impl StageEntry {
    /// Label prefixed with [`INDENT_PREFIX`] once per depth level
    pub fn indented_label(&self) -> String {
        format!("{}{}", INDENT_PREFIX.repeat(self.depth), self.label)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Built-in flow
// ─────────────────────────────────────────────────────────────────────────────

const PLEA_OUTCOMES: &[StageNode] = &[
    StageNode::leaf("probation", "Probation / Supervision"),
    StageNode::leaf("state_sentence", "Sentenced to State DOC"),
];

const ARRAIGNMENT_OUTCOMES: &[StageNode] = &[
    StageNode::leaf("bail_granted", "Bail Granted / Released"),
    StageNode::leaf("bail_denied", "Bail Denied / Remain in Custody"),
    StageNode::leaf("adjourned", "Adjourned / New Date"),
    StageNode::branch("plea", "Plea Deal", PLEA_OUTCOMES),
    StageNode::leaf("trial", "Trial"),
];

const AFTER_BOOKING: &[StageNode] = &[StageNode::branch(
    "arraignment",
    "Arraignment / First Appearance",
    ARRAIGNMENT_OUTCOMES,
)];

/// The case flow: every stage a case can be in
pub static CASE_FLOW: StageNode = StageNode::branch("arrested", "Arrested / Booked", AFTER_BOOKING);
