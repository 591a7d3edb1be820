//! Renders a parsed document as plain text.
//!
//! The rules follow the browser's rendered-text algorithm closely enough for
//! email bodies: block boxes start and end lines, paragraphs and headings are
//! separated by a blank line, whitespace collapses, and anything that would
//! not be painted is left out.  There is no wrapping or table layout.

use crate::logging::logger::PerfLogger;
use crate::logging::logging_defs::FLATTEN;
use crate::parser::{NodeExt, NodeRef};
use crate::utils::{body_or_root, is_ascii_whitespace};
use kuchikikiki::iter::NodeEdge;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Elements whose subtree never reaches the rendered text.
static NON_RENDERED_ELEMENTS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    HashSet::from([
        "head", "title", "script", "style", "noscript", "template", "textarea", "select",
        "meta", "link", "iframe", "object",
    ])
});

/// Elements laid out as blocks; each one sits on its own line(s).
static BLOCK_ELEMENTS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    HashSet::from([
        "address", "article", "aside", "blockquote", "center", "dd", "details", "dialog", "dir",
        "div", "dl", "dt", "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2",
        "h3", "h4", "h5", "h6", "header", "hgroup", "hr", "legend", "li", "listing", "main",
        "menu", "nav", "ol", "p", "pre", "section", "summary", "table", "caption", "tbody",
        "thead", "tfoot", "tr", "ul", "plaintext", "xmp",
    ])
});

/// Blocks that get a blank line above and below instead of a single break.
static PARAGRAPH_ELEMENTS: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| HashSet::from(["p", "h1", "h2", "h3", "h4", "h5", "h6"]));

static PREFORMATTED_ELEMENTS: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| HashSet::from(["pre", "listing", "plaintext", "xmp"]));

fn is_table_cell(node: &NodeRef) -> bool {
    matches!(node.element_name(), Some("td") | Some("th"))
}

/// Accumulates rendered text.
///
/// Line-break requirements from adjacent blocks collapse to the largest one
/// and are only materialised once real content follows, so the output never
/// starts with blank lines.  Collapsible whitespace is held back the same
/// way and dropped at line starts.
#[derive(Default)]
struct TextSink {
    out: String,
    pending_breaks: usize,
    pending_space: bool,
}

impl TextSink {
    /// True at the start of output, of a line, or of a table cell.
    fn at_line_start(&self) -> bool {
        self.out.is_empty() || self.out.ends_with(['\n', '\t'])
    }

    fn require_breaks(&mut self, count: usize) {
        self.pending_breaks = self.pending_breaks.max(count);
        self.pending_space = false;
    }

    fn flush_breaks(&mut self) {
        if self.pending_breaks == 0 {
            return;
        }
        if !self.out.is_empty() {
            let trailing = self.out.chars().rev().take_while(|c| *c == '\n').count();
            for _ in trailing..self.pending_breaks {
                self.out.push('\n');
            }
        }
        self.pending_breaks = 0;
    }

    fn emit_pending_space(&mut self) {
        if self.pending_space && !self.at_line_start() {
            self.out.push(' ');
        }
        self.pending_space = false;
    }

    fn push_text(&mut self, text: &str) {
        for ch in text.chars() {
            if is_ascii_whitespace(ch) {
                self.pending_space = true;
                continue;
            }
            self.flush_breaks();
            self.emit_pending_space();
            self.out.push(ch);
        }
    }

    fn push_preformatted(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.flush_breaks();
        self.emit_pending_space();
        self.out.push_str(text);
    }

    fn push_separator(&mut self, separator: char) {
        self.flush_breaks();
        self.pending_space = false;
        self.out.push(separator);
    }

    fn finish(self) -> String {
        self.out.trim_matches('\n').to_string()
    }
}

/// Render the body of `root` (or `root` itself when there is no body) as
/// plain text.  The tree is only read, so flattening the same tree twice
/// gives the same string.
pub fn flatten(root: &NodeRef) -> String {
    flatten_with_logger(root, &PerfLogger::disabled())
}

pub fn flatten_with_logger(root: &NodeRef, logger: &PerfLogger) -> String {
    start_span!(logger, FLATTEN);
    let body = body_or_root(root);
    let mut sink = TextSink::default();
    let mut skipping: Option<NodeRef> = None;
    let mut preformatted_depth = 0usize;

    for edge in body.traverse() {
        match edge {
            NodeEdge::Start(node) => {
                if skipping.is_some() {
                    continue;
                }
                if let Some(text) = node.as_text() {
                    if preformatted_depth > 0 {
                        sink.push_preformatted(text.borrow().as_str());
                    } else {
                        sink.push_text(text.borrow().as_str());
                    }
                    continue;
                }
                let Some(name) = node.element_name() else {
                    continue;
                };
                if NON_RENDERED_ELEMENTS.contains(name) || node.is_hidden() {
                    skipping = Some(node.clone());
                    continue;
                }
                if name == "br" {
                    sink.push_separator('\n');
                } else if PARAGRAPH_ELEMENTS.contains(name) {
                    sink.require_breaks(2);
                } else if BLOCK_ELEMENTS.contains(name) {
                    sink.require_breaks(1);
                }
                if PREFORMATTED_ELEMENTS.contains(name) {
                    preformatted_depth += 1;
                }
            }
            NodeEdge::End(node) => {
                if let Some(skipped) = &skipping {
                    if *skipped == node {
                        skipping = None;
                    }
                    continue;
                }
                let Some(name) = node.element_name() else {
                    continue;
                };
                if PARAGRAPH_ELEMENTS.contains(name) {
                    sink.require_breaks(2);
                } else if BLOCK_ELEMENTS.contains(name) {
                    sink.require_breaks(1);
                }
                if PREFORMATTED_ELEMENTS.contains(name) {
                    preformatted_depth = preformatted_depth.saturating_sub(1);
                }
                if is_table_cell(&node)
                    && node
                        .next_element_sibling()
                        .is_some_and(|next| is_table_cell(&next))
                {
                    sink.push_separator('\t');
                }
            }
        }
    }
    add_point_to_span_str!(logger, FLATTEN, "tree_walked");
    end_span!(logger, FLATTEN);
    sink.finish()
}
