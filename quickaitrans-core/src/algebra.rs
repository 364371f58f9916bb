//! Pure structural operations over translation trees.
//!
//! Each function walks the keys of one designated driving tree in order,
//! consults the other side by key lookup, and returns a fresh tree.
//! Inputs are never mutated.

use crate::tree::{TranslationTree, TreeValue};

/// Entries of `a` that are missing from `b`, in `a`'s order.
///
/// Two leaves under the same key never count as a difference, even when
/// their strings differ: only absent keys and shape mismatches are
/// reported, so an already-translated value is never queued again. A
/// leaf-vs-subtree mismatch reports `a`'s value wholesale.
pub fn diff(a: &TranslationTree, b: &TranslationTree) -> TranslationTree {
    let mut result = TranslationTree::new();
    for (key, a_value) in a.iter() {
        match (a_value, b.get(key)) {
            (value, None) => result.insert(key.clone(), value.clone()),
            (TreeValue::Subtree(a_sub), Some(TreeValue::Subtree(b_sub))) => {
                let nested = diff(a_sub, b_sub);
                if !nested.is_empty() {
                    result.insert(key.clone(), TreeValue::Subtree(nested));
                }
            }
            (TreeValue::Leaf(_), Some(TreeValue::Leaf(_))) => {}
            (value, Some(_)) => result.insert(key.clone(), value.clone()),
        }
    }
    result
}

/// Overlay `b` onto a copy of `a`.
///
/// Matching subtrees merge recursively; in every other case `b`'s value
/// replaces `a`'s. Keys new to `a` append after its existing entries, in
/// `b`'s order.
pub fn merge(a: &TranslationTree, b: &TranslationTree) -> TranslationTree {
    let mut result = a.clone();
    for (key, b_value) in b.iter() {
        let replacement = match (result.get(key), b_value) {
            (Some(TreeValue::Subtree(a_sub)), TreeValue::Subtree(b_sub)) => {
                TreeValue::Subtree(merge(a_sub, b_sub))
            }
            _ => b_value.clone(),
        };
        result.insert(key.clone(), replacement);
    }
    result
}

/// Keep only `a`'s entries whose key exists in `b` with a matching shape.
///
/// Nested results are included only when non-empty; shape mismatches and
/// keys absent from `b` are dropped.
pub fn filter_by_reference(a: &TranslationTree, b: &TranslationTree) -> TranslationTree {
    let mut result = TranslationTree::new();
    for (key, a_value) in a.iter() {
        match (a_value, b.get(key)) {
            (TreeValue::Subtree(a_sub), Some(TreeValue::Subtree(b_sub))) => {
                let nested = filter_by_reference(a_sub, b_sub);
                if !nested.is_empty() {
                    result.insert(key.clone(), TreeValue::Subtree(nested));
                }
            }
            (TreeValue::Leaf(text), Some(TreeValue::Leaf(_))) => {
                result.insert(key.clone(), TreeValue::leaf(text.clone()));
            }
            _ => {}
        }
    }
    result
}

/// Reconcile: `a` dictates the key set and order, `b` supplies leaf
/// values.
///
/// Both-subtree entries recurse (kept only when non-empty); both-leaf
/// entries take `b`'s string. Shape mismatches and keys absent from `b`
/// are dropped entirely.
pub fn insert_values_from_reference(
    a: &TranslationTree,
    b: &TranslationTree,
) -> TranslationTree {
    let mut result = TranslationTree::new();
    for (key, a_value) in a.iter() {
        match (a_value, b.get(key)) {
            (TreeValue::Subtree(a_sub), Some(TreeValue::Subtree(b_sub))) => {
                let nested = insert_values_from_reference(a_sub, b_sub);
                if !nested.is_empty() {
                    result.insert(key.clone(), TreeValue::Subtree(nested));
                }
            }
            (TreeValue::Leaf(_), Some(TreeValue::Leaf(text))) => {
                result.insert(key.clone(), TreeValue::leaf(text.clone()));
            }
            _ => {}
        }
    }
    result
}

/// Reorder keys case-insensitively, recursing into every subtree.
///
/// Comparison lowercases both keys; ties keep their original relative
/// order.
pub fn sort_keys(tree: &TranslationTree) -> TranslationTree {
    let mut entries: Vec<(&String, &TreeValue)> = tree.iter().collect();
    entries.sort_by(|(left, _), (right, _)| left.to_lowercase().cmp(&right.to_lowercase()));

    let mut result = TranslationTree::new();
    for (key, value) in entries {
        let sorted = match value {
            TreeValue::Subtree(subtree) => TreeValue::Subtree(sort_keys(subtree)),
            TreeValue::Leaf(text) => TreeValue::leaf(text.clone()),
        };
        result.insert(key.clone(), sorted);
    }
    result
}
