//! # OctoFHIR SmartPath
//!
//! Locates validation issues inside FHIR JSON documents. Rule engines report
//! problems against semantic paths such as
//! `Observation.performer.where(display='Doctor B').display`; this crate
//! turns such a path into a JSON Pointer into the concrete document, plus a
//! breadcrumb trail for display.
//!
//! ## Quick Start
//!
//! ```rust
//! use octofhir_smartpath::{NavigatorConfig, SmartPathNavigator};
//! use serde_json::json;
//!
//! let bundle = json!({
//!     "resourceType": "Bundle",
//!     "entry": [
//!         {"resource": {"resourceType": "Patient", "id": "p1"}},
//!         {"resource": {"resourceType": "Observation", "status": "final"}}
//!     ]
//! });
//!
//! let navigator = SmartPathNavigator::from_config(&NavigatorConfig::default());
//! let location = navigator
//!     .resolve(&bundle, "Observation.status", None, None)
//!     .expect("observation status is present");
//! assert_eq!(location.pointer.as_str(), "/entry/1/resource/status");
//! assert_eq!(location.breadcrumbs, ["Bundle", "entry[1]", "Observation", "status"]);
//! ```
//!
//! ## Module Organization
//!
//! - [`predicate`] - `where(...)` expression tree, parser and evaluator
//! - [`hints`] - structural hint providers (which properties repeat)
//! - [`navigation`] - path tokenizer, entry resolution policy, navigator
//! - [`validation`] - attaches locations to rule violations
//! - [`core`] - navigator configuration

pub mod core;
pub mod error;
pub mod hints;
pub mod navigation;
pub mod predicate;
pub mod validation;

pub use crate::core::{HintSource, ImplicitIndexing, NavigatorConfig};
pub use error::{NavigationFailure, Result, SmartPathError};
pub use hints::{KnownStructuralHints, NullStructuralHints, StructuralHintProvider};
pub use navigation::{
    EntryResolutionPolicy, JsonPointer, PathExpression, PathSegment, ResolvedLocation,
    SmartPathNavigator,
};
pub use predicate::{
    FieldLookup, FieldPath, MAX_PREDICATE_TERMS, PredicateExpression, evaluate, parse_predicate,
};
pub use validation::{IssueLocator, LocatedIssue, RuleViolation, Severity};
