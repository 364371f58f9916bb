//! Order-faithful serializer — the write-side counterpart of
//! [`crate::parse`].

use serde_json::Value;

use crate::tree::{TranslationTree, TreeValue};

/// Render `tree` as an indented JSON object literal, one key per line in
/// the tree's current order. No trailing newline follows the closing
/// brace; the file writer appends it.
pub fn render(tree: &TranslationTree, indent: usize) -> String {
    render_level(tree, indent, 0)
}

fn render_level(tree: &TranslationTree, indent: usize, level: usize) -> String {
    let mut out = String::from("{\n");
    let last = tree.len().saturating_sub(1);
    for (position, (key, value)) in tree.iter().enumerate() {
        out.push_str(&" ".repeat((level + 1) * indent));
        out.push_str(&quote(key));
        out.push_str(": ");
        match value {
            TreeValue::Leaf(text) => out.push_str(&quote(text)),
            TreeValue::Subtree(subtree) => {
                out.push_str(&render_level(subtree, indent, level + 1))
            }
        }
        if position < last {
            out.push(',');
        }
        out.push('\n');
    }
    out.push_str(&" ".repeat(level * indent));
    out.push('}');
    out
}

/// JSON-escape and quote one string.
fn quote(text: &str) -> String {
    Value::from(text).to_string()
}
