//! Decay chains walked directly over the reference table.

use std::fmt::Write as _;

use serde::Serialize;

use crate::decay_mode::DecayMode;
use crate::table::ReferenceTable;
use crate::timefmt::format_halflife;

pub const DEFAULT_MAX_DEPTH: usize = 32;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChainNode {
    pub isotope: String,
    /// Mode and percentage of the branch that led here; `None` at the root.
    pub mode: Option<DecayMode>,
    pub percentage: Option<f64>,
    pub halflife: Option<f64>,
    pub is_stable: Option<bool>,
    pub children: Vec<ChainNode>,
    /// Set when expansion stopped at a repeated isotope or the depth limit.
    pub truncated: bool,
}

impl ChainNode {
    /// Longest path from this node to a leaf, counted in decays.
    pub fn depth(&self) -> usize {
        self.children
            .iter()
            .map(|child| child.depth() + 1)
            .max()
            .unwrap_or(0)
    }

    /// Isotopes with no further daughters, in depth-first order, deduplicated.
    pub fn end_products(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a str>) {
        if self.children.is_empty() {
            if !out.contains(&self.isotope.as_str()) {
                out.push(&self.isotope);
            }
            return;
        }
        for child in &self.children {
            child.collect_leaves(out);
        }
    }

    /// Indented text rendering, one isotope per line.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out, 0);
        out
    }

    fn render_into(&self, out: &mut String, level: usize) {
        let indent = "  ".repeat(level);
        let via = match (self.mode, self.percentage) {
            (Some(mode), Some(pct)) => format!("[{mode} {pct}%] "),
            (Some(mode), None) => format!("[{mode}] "),
            (None, _) if level > 0 => "[?] ".to_string(),
            (None, _) => String::new(),
        };
        let state = match self.is_stable {
            Some(true) => "stable".to_string(),
            Some(false) => format!("t½ {}", format_halflife(self.halflife)),
            None => "not in table".to_string(),
        };
        let marker = if self.truncated { " ..." } else { "" };
        let _ = writeln!(out, "{indent}{via}{} ({state}){marker}", self.isotope);
        for child in &self.children {
            child.render_into(out, level + 1);
        }
    }
}

/// Build the tree of daughters reachable from `isotope`.
///
/// Branches without a daughter are skipped. An isotope already on the current
/// path, or a node at `max_depth`, is kept as a truncated leaf.
pub fn decay_chain(table: &ReferenceTable, isotope: &str, max_depth: usize) -> ChainNode {
    let mut path = Vec::new();
    expand(table, isotope, None, None, &mut path, max_depth)
}

fn expand(
    table: &ReferenceTable,
    isotope: &str,
    mode: Option<DecayMode>,
    percentage: Option<f64>,
    path: &mut Vec<String>,
    max_depth: usize,
) -> ChainNode {
    let record = table.isotope(isotope);
    let mut node = ChainNode {
        isotope: isotope.to_string(),
        mode,
        percentage,
        halflife: record.and_then(|r| r.halflife),
        is_stable: record.map(|r| r.is_stable),
        children: Vec::new(),
        truncated: false,
    };
    let Some(record) = record else {
        return node;
    };
    let has_daughters = record.decay.iter().any(|b| b.daughter.is_some());
    if has_daughters && (path.iter().any(|seen| seen == isotope) || path.len() >= max_depth) {
        node.truncated = true;
        return node;
    }

    path.push(isotope.to_string());
    for branch in &record.decay {
        if let Some(daughter) = &branch.daughter {
            node.children
                .push(expand(table, daughter, branch.mode, branch.percentage, path, max_depth));
        }
    }
    path.pop();
    node
}
