//! Structural hints: which properties of a resource type repeat.
//!
//! The navigator consults a hint provider when it meets an array without an
//! explicit index. Providers are built once and shared read-only.

mod known;
mod null;

pub use known::KnownStructuralHints;
pub use null::NullStructuralHints;

use std::fmt;

/// Answers structural questions about resource properties.
///
/// `property_path` is a dotted path relative to the resource, without indices
/// or predicates (`"name.given"`).
pub trait StructuralHintProvider: Send + Sync + fmt::Debug {
    /// Whether the property at `property_path` is known to be an array.
    fn is_repeating(&self, resource_type: &str, property_path: &str) -> bool;

    /// Whether the property at `property_path` is a Reference.
    ///
    /// Not tracked yet by the shipped providers, which always answer `false`.
    fn is_reference(&self, resource_type: &str, property_path: &str) -> bool;
}
