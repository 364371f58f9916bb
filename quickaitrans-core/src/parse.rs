//! Streaming, order-faithful parser.
//!
//! Built directly on `serde_json`'s event-driven deserializer: every
//! visitor callback corresponds to one token of the source text, so
//! sibling keys land in the tree in exactly the order they appear on
//! disk. The document is never materialised as a structural
//! `serde_json::Value`, whose map representation does not guarantee
//! source order.

use std::cell::RefCell;
use std::fmt;

use serde::de::{self, DeserializeSeed, Deserializer, MapAccess, SeqAccess, Visitor};

use crate::error::TreeError;
use crate::tree::{TranslationTree, TreeValue};

/// Parse a JSON document into a [`TranslationTree`].
///
/// Only nested objects with string leaves are accepted. Blank input
/// yields an empty tree. Arrays and non-string scalars yield
/// [`TreeError`]s that name the offending key where one is known; any
/// other malformed input surfaces as [`TreeError::Syntax`].
pub fn parse(input: &str) -> Result<TranslationTree, TreeError> {
    if input.trim().is_empty() {
        return Ok(TranslationTree::new());
    }

    let violation = RefCell::new(None);
    let mut deserializer = serde_json::Deserializer::from_str(input);
    let seed = DocumentSeed {
        violation: &violation,
    };
    let parsed = seed.deserialize(&mut deserializer);
    let parsed = parsed.and_then(|tree| deserializer.end().map(|()| tree));
    parsed.map_err(|syntax| {
        violation
            .into_inner()
            .unwrap_or(TreeError::Syntax(syntax))
    })
}

/// Record `violation` as the parse outcome and produce the serde error
/// that unwinds the deserializer.
fn reject<E: de::Error>(slot: &RefCell<Option<TreeError>>, violation: TreeError) -> E {
    let message = violation.to_string();
    *slot.borrow_mut() = Some(violation);
    E::custom(message)
}

/// Walk one object frame, inserting entries in token-arrival order.
fn walk_object<'de, A>(
    mut access: A,
    violation: &RefCell<Option<TreeError>>,
) -> Result<TranslationTree, A::Error>
where
    A: MapAccess<'de>,
{
    let mut tree = TranslationTree::new();
    while let Some(key) = access.next_key::<String>()? {
        let value = access.next_value_seed(ValueSeed {
            violation,
            key: &key,
        })?;
        tree.insert(key, value);
    }
    Ok(tree)
}

/// Seed for the top-level document, which must be an object.
struct DocumentSeed<'a> {
    violation: &'a RefCell<Option<TreeError>>,
}

impl<'de> DeserializeSeed<'de> for DocumentSeed<'_> {
    type Value = TranslationTree;

    fn deserialize<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(self)
    }
}

impl<'de> Visitor<'de> for DocumentSeed<'_> {
    type Value = TranslationTree;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a top-level object of strings and nested objects")
    }

    fn visit_map<A>(self, access: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        walk_object(access, self.violation)
    }

    fn visit_seq<A>(self, _access: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        Err(reject(self.violation, TreeError::ArrayValue { key: None }))
    }

    fn visit_str<E: de::Error>(self, _v: &str) -> Result<Self::Value, E> {
        Err(reject(self.violation, TreeError::NonStringLeaf { key: None }))
    }

    fn visit_bool<E: de::Error>(self, _v: bool) -> Result<Self::Value, E> {
        Err(reject(self.violation, TreeError::NonStringLeaf { key: None }))
    }

    fn visit_i64<E: de::Error>(self, _v: i64) -> Result<Self::Value, E> {
        Err(reject(self.violation, TreeError::NonStringLeaf { key: None }))
    }

    fn visit_u64<E: de::Error>(self, _v: u64) -> Result<Self::Value, E> {
        Err(reject(self.violation, TreeError::NonStringLeaf { key: None }))
    }

    fn visit_f64<E: de::Error>(self, _v: f64) -> Result<Self::Value, E> {
        Err(reject(self.violation, TreeError::NonStringLeaf { key: None }))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Err(reject(self.violation, TreeError::NonStringLeaf { key: None }))
    }
}

/// Seed for a value sitting under `key` inside an object frame.
struct ValueSeed<'a> {
    violation: &'a RefCell<Option<TreeError>>,
    key: &'a str,
}

impl ValueSeed<'_> {
    fn key(&self) -> Option<String> {
        Some(self.key.to_owned())
    }
}

impl<'de> DeserializeSeed<'de> for ValueSeed<'_> {
    type Value = TreeValue;

    fn deserialize<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(self)
    }
}

impl<'de> Visitor<'de> for ValueSeed<'_> {
    type Value = TreeValue;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a string or a nested object")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(TreeValue::Leaf(v.to_owned()))
    }

    fn visit_map<A>(self, access: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        walk_object(access, self.violation).map(TreeValue::Subtree)
    }

    fn visit_seq<A>(self, _access: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        Err(reject(
            self.violation,
            TreeError::ArrayValue { key: self.key() },
        ))
    }

    fn visit_bool<E: de::Error>(self, _v: bool) -> Result<Self::Value, E> {
        Err(reject(
            self.violation,
            TreeError::NonStringLeaf { key: self.key() },
        ))
    }

    fn visit_i64<E: de::Error>(self, _v: i64) -> Result<Self::Value, E> {
        Err(reject(
            self.violation,
            TreeError::NonStringLeaf { key: self.key() },
        ))
    }

    fn visit_u64<E: de::Error>(self, _v: u64) -> Result<Self::Value, E> {
        Err(reject(
            self.violation,
            TreeError::NonStringLeaf { key: self.key() },
        ))
    }

    fn visit_f64<E: de::Error>(self, _v: f64) -> Result<Self::Value, E> {
        Err(reject(
            self.violation,
            TreeError::NonStringLeaf { key: self.key() },
        ))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Err(reject(
            self.violation,
            TreeError::NonStringLeaf { key: self.key() },
        ))
    }
}
