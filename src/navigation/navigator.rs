//! Smart path navigation: semantic path → JSON Pointer inside a concrete document.

use super::entry::{EntryResolutionPolicy, entry_resource_type};
use super::path::{PathExpression, PathSegment};
use super::pointer::JsonPointer;
use crate::core::{ImplicitIndexing, NavigatorConfig};
use crate::error::NavigationFailure;
use crate::hints::{KnownStructuralHints, StructuralHintProvider};
use crate::predicate::evaluate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

const BUNDLE: &str = "Bundle";

/// Where a path landed: a pointer into the original document plus one
/// display label per traversal step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedLocation {
    pub pointer: JsonPointer,
    pub breadcrumbs: Vec<String>,
}

/// Resolves semantic paths against JSON documents.
///
/// Policy, hints and indexing mode are fixed at construction; `resolve` only
/// reads its arguments, so one navigator can serve any number of threads.
#[derive(Debug, Clone)]
pub struct SmartPathNavigator {
    policy: EntryResolutionPolicy,
    hints: Arc<dyn StructuralHintProvider>,
    implicit_indexing: ImplicitIndexing,
}

impl SmartPathNavigator {
    pub fn new(policy: EntryResolutionPolicy, hints: Arc<dyn StructuralHintProvider>) -> Self {
        Self {
            policy,
            hints,
            implicit_indexing: ImplicitIndexing::default(),
        }
    }

    pub fn from_config(config: &NavigatorConfig) -> Self {
        Self {
            policy: config.entry_policy,
            hints: config.build_hint_provider(),
            implicit_indexing: config.implicit_indexing,
        }
    }

    pub fn with_implicit_indexing(mut self, implicit_indexing: ImplicitIndexing) -> Self {
        self.implicit_indexing = implicit_indexing;
        self
    }

    pub fn policy(&self) -> EntryResolutionPolicy {
        self.policy
    }

    pub fn implicit_indexing(&self) -> ImplicitIndexing {
        self.implicit_indexing
    }

    pub fn hints(&self) -> &dyn StructuralHintProvider {
        self.hints.as_ref()
    }

    /// Resolve `path` inside `root`. `None` means not found.
    pub fn resolve(
        &self,
        root: &Value,
        path: &str,
        entry_index: Option<usize>,
        resource_type: Option<&str>,
    ) -> Option<ResolvedLocation> {
        self.try_resolve(root, path, entry_index, resource_type).ok()
    }

    /// Like [`resolve`](Self::resolve), reporting why a path did not resolve.
    pub fn try_resolve(
        &self,
        root: &Value,
        path: &str,
        entry_index: Option<usize>,
        resource_type: Option<&str>,
    ) -> Result<ResolvedLocation, NavigationFailure> {
        let result = PathExpression::parse(path)
            .and_then(|expr| self.resolve_expression(root, &expr, entry_index, resource_type));

        match &result {
            Ok(location) => tracing::trace!(path, pointer = %location.pointer, "path resolved"),
            Err(failure) => tracing::debug!(path, %failure, "path did not resolve"),
        }
        result
    }

    /// Resolve an already-parsed path.
    pub fn resolve_expression(
        &self,
        root: &Value,
        expr: &PathExpression,
        entry_index: Option<usize>,
        resource_type: Option<&str>,
    ) -> Result<ResolvedLocation, NavigationFailure> {
        let steps = expr.steps();
        let scope = expr.resource_scope();

        let (cursor, remaining) = match scope {
            Some(BUNDLE) => self.bundle_cursor(root, steps, entry_index, resource_type)?,
            Some(scope) => {
                if resource_type.is_some_and(|rt| rt != scope) {
                    tracing::debug!(scope, ?resource_type, "path scope overrides resourceType");
                }
                (self.resource_cursor(root, entry_index, Some(scope))?, steps)
            }
            None if starts_with_entry(steps) && is_bundle(root) => {
                self.bundle_cursor(root, steps, entry_index, resource_type)?
            }
            None if entry_index.is_some() || resource_type.is_some() => {
                (self.resource_cursor(root, entry_index, resource_type)?, steps)
            }
            None => (Cursor::at_root(root), steps),
        };

        self.walk(cursor, remaining)
    }

    /// Cursor for a path written relative to the bundle itself.
    fn bundle_cursor<'a, 's>(
        &self,
        root: &'a Value,
        steps: &'s [PathSegment],
        entry_index: Option<usize>,
        resource_type: Option<&str>,
    ) -> Result<(Cursor<'a>, &'s [PathSegment]), NavigationFailure> {
        if let Some(found) = root_resource_type(root).filter(|rt| *rt != BUNDLE) {
            return Err(NavigationFailure::ResourceTypeMismatch {
                expected: BUNDLE.to_string(),
                found: found.to_string(),
            });
        }

        let explicit = match steps.first() {
            Some(PathSegment::IndexedField { name, index }) if name == "entry" => Some(*index),
            // A bare, empty `entry` is found but empty: point at the array.
            Some(PathSegment::Field(name))
                if name == "entry"
                    && entry_index.is_none()
                    && steps.len() == 1
                    && has_no_entries(root) =>
            {
                return Ok((Cursor::at_root(root), steps));
            }
            Some(PathSegment::Field(name)) if name == "entry" => entry_index,
            _ => return Ok((Cursor::at_root(root), steps)),
        };

        let cursor = self.enter_entry(root, explicit, resource_type)?;
        Ok((cursor, &steps[1..]))
    }

    /// Cursor positioned on the resource a resource-relative path targets.
    fn resource_cursor<'a>(
        &self,
        root: &'a Value,
        entry_index: Option<usize>,
        resource_type: Option<&str>,
    ) -> Result<Cursor<'a>, NavigationFailure> {
        if !is_bundle(root) {
            if entry_index.is_some() {
                return Err(NavigationFailure::NotABundle);
            }
            check_resource_type(resource_type, root_resource_type(root))?;
            return Ok(Cursor::at_root(root));
        }

        let mut cursor = self.enter_entry(root, entry_index, resource_type)?;
        cursor.step(&PathSegment::Field("resource".to_string()), self)?;
        Ok(cursor)
    }

    /// Select a bundle entry through the policy and position a cursor on it.
    fn enter_entry<'a>(
        &self,
        root: &'a Value,
        explicit: Option<usize>,
        resource_type: Option<&str>,
    ) -> Result<Cursor<'a>, NavigationFailure> {
        let entries = root
            .get("entry")
            .and_then(Value::as_array)
            .ok_or(NavigationFailure::NotABundle)?;

        let index = self
            .policy
            .select_entry(entries, explicit, resource_type)?;
        let entry = &entries[index];

        if explicit.is_some() {
            check_resource_type(resource_type, entry_resource_type(entry))?;
        }
        tracing::trace!(index, policy = %self.policy, "selected bundle entry");

        let mut cursor = Cursor::at_root(root);
        cursor.pointer.push_key("entry");
        cursor.pointer.push_index(index);
        cursor.breadcrumbs.push(format!("entry[{index}]"));
        cursor.property_path.push("entry".to_string());
        cursor.value = entry;
        Ok(cursor)
    }

    fn walk<'a>(
        &self,
        mut cursor: Cursor<'a>,
        steps: &[PathSegment],
    ) -> Result<ResolvedLocation, NavigationFailure> {
        for (i, segment) in steps.iter().enumerate() {
            let is_last = i + 1 == steps.len();
            cursor.step_with(segment, self, is_last)?;
        }
        Ok(ResolvedLocation {
            pointer: cursor.pointer,
            breadcrumbs: cursor.breadcrumbs,
        })
    }

    fn defaults_to_first(&self, resource_type: &str, property_path: &str) -> bool {
        match self.implicit_indexing {
            ImplicitIndexing::DocumentShape => true,
            ImplicitIndexing::HintedOnly => self.hints.is_repeating(resource_type, property_path),
        }
    }
}

impl Default for SmartPathNavigator {
    fn default() -> Self {
        Self::new(
            EntryResolutionPolicy::default(),
            Arc::new(KnownStructuralHints::new()),
        )
    }
}

/// Walk state: the current node plus everything accumulated to reach it.
struct Cursor<'a> {
    value: &'a Value,
    pointer: JsonPointer,
    breadcrumbs: Vec<String>,
    /// Resource type used for structural hints.
    resource_type: String,
    /// Dotted element path from the enclosing resource, for hint lookups.
    property_path: Vec<String>,
}

impl<'a> Cursor<'a> {
    fn at_root(root: &'a Value) -> Self {
        let resource_type = root_resource_type(root).unwrap_or_default().to_string();
        let breadcrumbs = if resource_type.is_empty() {
            Vec::new()
        } else {
            vec![resource_type.clone()]
        };
        Self {
            value: root,
            pointer: JsonPointer::root(),
            breadcrumbs,
            resource_type,
            property_path: Vec::new(),
        }
    }

    fn step(
        &mut self,
        segment: &PathSegment,
        navigator: &SmartPathNavigator,
    ) -> Result<(), NavigationFailure> {
        self.step_with(segment, navigator, false)
    }

    fn step_with(
        &mut self,
        segment: &PathSegment,
        navigator: &SmartPathNavigator,
        is_last: bool,
    ) -> Result<(), NavigationFailure> {
        tracing::trace!(%segment, pointer = %self.pointer, "walking segment");

        let name = segment.name();
        let current: &'a Value = self.value;
        let object = current
            .as_object()
            .ok_or_else(|| NavigationFailure::NotAnObject {
                pointer: self.pointer.to_string(),
            })?;
        let child = object
            .get(name)
            .ok_or_else(|| NavigationFailure::MissingField {
                field: name.to_string(),
                pointer: self.pointer.to_string(),
            })?;

        let parent_pointer = self.pointer.to_string();
        self.pointer.push_key(name);
        self.property_path.push(name.to_string());

        match segment {
            PathSegment::Field(_) | PathSegment::ResourceScope(_) => match child {
                Value::Array(items)
                    if navigator
                        .defaults_to_first(&self.resource_type, &self.property_path.join(".")) =>
                {
                    match items.first() {
                        Some(first) => self.descend_into_element(name, 0, first),
                        // Found but empty: point at the array itself.
                        None if is_last => self.descend(name, child),
                        None => {
                            return Err(NavigationFailure::IndexOutOfRange {
                                field: name.to_string(),
                                index: 0,
                                len: 0,
                                pointer: parent_pointer,
                            });
                        }
                    }
                }
                _ => self.descend(name, child),
            },
            PathSegment::IndexedField { index, .. } => {
                let items = child.as_array().ok_or_else(|| NavigationFailure::NotAnArray {
                    field: name.to_string(),
                    pointer: parent_pointer.clone(),
                })?;
                let element = items
                    .get(*index)
                    .ok_or_else(|| NavigationFailure::IndexOutOfRange {
                        field: name.to_string(),
                        index: *index,
                        len: items.len(),
                        pointer: parent_pointer.clone(),
                    })?;
                self.descend_into_element(name, *index, element);
            }
            PathSegment::PredicateField { predicate, .. } => {
                let no_match = || NavigationFailure::NoPredicateMatch {
                    field: name.to_string(),
                    predicate: predicate.to_string(),
                    pointer: parent_pointer.clone(),
                };
                match child {
                    Value::Array(items) => {
                        let index = items
                            .iter()
                            .position(|item| evaluate(item, predicate))
                            .ok_or_else(no_match)?;
                        self.descend_into_element(name, index, &items[index]);
                    }
                    // A singleton object is a one-element collection without an index.
                    Value::Object(_) if evaluate(child, predicate) => self.descend(name, child),
                    Value::Object(_) => return Err(no_match()),
                    _ => {
                        return Err(NavigationFailure::NotAnArray {
                            field: name.to_string(),
                            pointer: parent_pointer.clone(),
                        });
                    }
                }
            }
        }

        Ok(())
    }

    fn descend(&mut self, name: &str, child: &'a Value) {
        let label = self.label_for(name, child);
        self.breadcrumbs.push(label);
        self.value = child;
    }

    fn descend_into_element(&mut self, name: &str, index: usize, element: &'a Value) {
        self.pointer.push_index(index);
        self.breadcrumbs.push(format!("{name}[{index}]"));
        self.value = element;
    }

    /// Label for a plain field step. Entering a nested resource switches the
    /// hint context to that resource.
    fn label_for(&mut self, name: &str, child: &Value) -> String {
        match (name, child.get("resourceType").and_then(Value::as_str)) {
            ("resource", Some(resource_type)) => {
                self.resource_type = resource_type.to_string();
                self.property_path.clear();
                resource_type.to_string()
            }
            _ => name.to_string(),
        }
    }
}

fn root_resource_type(root: &Value) -> Option<&str> {
    root.get("resourceType").and_then(Value::as_str)
}

fn is_bundle(root: &Value) -> bool {
    match root_resource_type(root) {
        Some(resource_type) => resource_type == BUNDLE,
        None => root.get("entry").is_some_and(Value::is_array),
    }
}

fn has_no_entries(root: &Value) -> bool {
    root.get("entry")
        .and_then(Value::as_array)
        .is_some_and(Vec::is_empty)
}

fn starts_with_entry(steps: &[PathSegment]) -> bool {
    matches!(
        steps.first(),
        Some(PathSegment::Field(name) | PathSegment::IndexedField { name, .. }) if name == "entry"
    )
}

fn check_resource_type(
    expected: Option<&str>,
    found: Option<&str>,
) -> Result<(), NavigationFailure> {
    match (expected, found) {
        (Some(expected), found) if found != Some(expected) => {
            Err(NavigationFailure::ResourceTypeMismatch {
                expected: expected.to_string(),
                found: found.unwrap_or_default().to_string(),
            })
        }
        _ => Ok(()),
    }
}
