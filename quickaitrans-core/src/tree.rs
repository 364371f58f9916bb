//! The ordered translation tree — the only in-memory document
//! representation.
//!
//! Key order is data: a [`TranslationTree`] remembers the order keys were
//! inserted and every operation in [`crate::algebra`] preserves it. The
//! tree is backed by an insertion-ordered map rather than a structural
//! JSON value, so no decoder or transformation can silently reorder
//! siblings.

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::error::TreeError;

/// A string leaf or a nested group of keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeValue {
    /// A single translation entry.
    Leaf(String),
    /// A nested section of related keys.
    Subtree(TranslationTree),
}

impl TreeValue {
    /// Leaf constructor accepting anything string-like.
    pub fn leaf(text: impl Into<String>) -> Self {
        TreeValue::Leaf(text.into())
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, TreeValue::Leaf(_))
    }

    pub fn is_subtree(&self) -> bool {
        matches!(self, TreeValue::Subtree(_))
    }
}

/// Insertion-ordered mapping from string keys to [`TreeValue`]s.
///
/// Equality is order-sensitive: two trees holding the same entries in a
/// different order are not equal.
#[derive(Debug, Clone, Default)]
pub struct TranslationTree {
    entries: IndexMap<String, TreeValue>,
}

impl TranslationTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert `value` under `key`. An existing key keeps its position and
    /// takes the new value; a new key appends after all current entries.
    pub fn insert(&mut self, key: impl Into<String>, value: TreeValue) {
        self.entries.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&TreeValue> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &TreeValue)> {
        self.entries.iter()
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    /// Plain nested object for the translation boundary. The result
    /// carries no ordering contract.
    pub fn to_object(&self) -> Map<String, Value> {
        let mut map = Map::new();
        for (key, value) in &self.entries {
            let converted = match value {
                TreeValue::Leaf(text) => Value::String(text.clone()),
                TreeValue::Subtree(subtree) => subtree.to_value(),
            };
            map.insert(key.clone(), converted);
        }
        map
    }

    /// [`Self::to_object`] wrapped as a [`Value`].
    pub fn to_value(&self) -> Value {
        Value::Object(self.to_object())
    }

    /// Rebuild a tree from a plain nested object, e.g. a translation
    /// response. Rejects the same shapes the parser rejects.
    pub fn from_object(map: &Map<String, Value>) -> Result<Self, TreeError> {
        let mut tree = TranslationTree::new();
        for (key, value) in map {
            let converted = match value {
                Value::String(text) => TreeValue::Leaf(text.clone()),
                Value::Object(inner) => TreeValue::Subtree(Self::from_object(inner)?),
                Value::Array(_) => {
                    return Err(TreeError::ArrayValue {
                        key: Some(key.clone()),
                    })
                }
                _ => {
                    return Err(TreeError::NonStringLeaf {
                        key: Some(key.clone()),
                    })
                }
            };
            tree.insert(key.clone(), converted);
        }
        Ok(tree)
    }

    /// [`Self::from_object`] accepting any [`Value`]; non-object roots are
    /// shape errors.
    pub fn from_value(value: &Value) -> Result<Self, TreeError> {
        match value {
            Value::Object(map) => Self::from_object(map),
            Value::Array(_) => Err(TreeError::ArrayValue { key: None }),
            _ => Err(TreeError::NonStringLeaf { key: None }),
        }
    }
}

impl PartialEq for TranslationTree {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl Eq for TranslationTree {}

impl FromIterator<(String, TreeValue)> for TranslationTree {
    fn from_iter<I: IntoIterator<Item = (String, TreeValue)>>(iter: I) -> Self {
        let mut tree = TranslationTree::new();
        for (key, value) in iter {
            tree.insert(key, value);
        }
        tree
    }
}
