//! Path navigation over FHIR JSON documents.

pub mod entry;
pub mod navigator;
pub mod path;
pub mod pointer;

pub use entry::{EntryResolutionPolicy, entry_resource_type};
pub use navigator::{ResolvedLocation, SmartPathNavigator};
pub use path::{PathExpression, PathSegment};
pub use pointer::{JsonPointer, escape_token};
