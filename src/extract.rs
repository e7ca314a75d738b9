//! Visible-text extraction from raw HTML.
//!
//! Change detection must not fire on markup noise, so subtrees that never
//! render are dropped before fingerprinting and the remaining text is
//! collapsed into a whitespace-stable line sequence.

use ego_tree::NodeRef;
use scraper::{Html, Node};

/// Elements whose subtrees carry no visible textual signal.
const EXCLUDED_TAGS: &[&str] = &["script", "style", "noscript", "meta", "link"];

/// Extract the human-visible text of `html` as trimmed, non-empty lines
/// joined with `\n`.
///
/// The parser is error-tolerant, so this is total: malformed markup degrades
/// to whatever text can still be recovered rather than failing the run.
pub fn extract_visible_text(html: &str) -> String {
    let document = Html::parse_document(html);

    let mut fragments = Vec::new();
    collect_text(document.tree.root(), &mut fragments);

    fragments
        .join("\n")
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn collect_text(node: NodeRef<'_, Node>, out: &mut Vec<String>) {
    for child in node.children() {
        match child.value() {
            Node::Element(element) if EXCLUDED_TAGS.contains(&element.name()) => {}
            Node::Text(text) => out.push(text.text.to_string()),
            _ => collect_text(child, out),
        }
    }
}
