//! Error-model building: attach document locations to rule violations.
//!
//! Rule engines report *what* is wrong with a semantic path; the
//! [`IssueLocator`] turns each report into a JSON Pointer and breadcrumb
//! trail for display. Violations that cannot be located are kept, with the
//! reason, rather than dropped.

mod locator;

pub use locator::{IssueLocator, LocatedIssue, RuleViolation, Severity};
