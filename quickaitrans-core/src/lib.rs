//! # quickaitrans-core
//!
//! Order-preserving translation tree engine.
//!
//! Translation documents are nested JSON objects whose leaves are all
//! strings. This crate owns the canonical in-memory representation
//! ([`TranslationTree`]), a streaming parser that captures key order
//! exactly as it appears in the source text ([`parse`]), pure structural
//! operations over trees ([`algebra`]), and an order-faithful serializer
//! ([`render`]).
//!
//! No I/O happens here; callers hand in text and get text (or trees) back.

pub mod algebra;
pub mod error;
pub mod parse;
pub mod render;
pub mod tree;

pub use error::TreeError;
pub use parse::parse;
pub use render::render;
pub use tree::{TranslationTree, TreeValue};
