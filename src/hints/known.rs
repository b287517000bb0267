use super::StructuralHintProvider;
use once_cell::sync::Lazy;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

/// Repeating (`max = *`) elements of common FHIR R4 resources.
const KNOWN_REPEATING: &[(&str, &[&str])] = &[
    (
        "Patient",
        &[
            "identifier",
            "name",
            "name.given",
            "name.prefix",
            "name.suffix",
            "telecom",
            "address",
            "address.line",
            "maritalStatus.coding",
            "photo",
            "contact",
            "contact.relationship",
            "contact.telecom",
            "communication",
            "generalPractitioner",
            "link",
        ],
    ),
    (
        "Observation",
        &[
            "identifier",
            "basedOn",
            "partOf",
            "category",
            "code.coding",
            "focus",
            "performer",
            "interpretation",
            "note",
            "referenceRange",
            "hasMember",
            "derivedFrom",
            "component",
        ],
    ),
    (
        "Condition",
        &[
            "identifier",
            "clinicalStatus.coding",
            "verificationStatus.coding",
            "category",
            "code.coding",
            "bodySite",
            "stage",
            "evidence",
            "note",
        ],
    ),
    (
        "Encounter",
        &[
            "identifier",
            "statusHistory",
            "classHistory",
            "type",
            "episodeOfCare",
            "basedOn",
            "participant",
            "reasonCode",
            "reasonReference",
            "diagnosis",
            "account",
            "location",
        ],
    ),
    (
        "Practitioner",
        &[
            "identifier",
            "name",
            "telecom",
            "address",
            "photo",
            "qualification",
            "communication",
        ],
    ),
    (
        "Organization",
        &[
            "identifier",
            "type",
            "alias",
            "telecom",
            "address",
            "contact",
            "endpoint",
        ],
    ),
    (
        "MedicationRequest",
        &[
            "identifier",
            "basedOn",
            "category",
            "medicationCodeableConcept.coding",
            "supportingInformation",
            "reasonCode",
            "reasonReference",
            "note",
            "dosageInstruction",
            "detectedIssue",
            "eventHistory",
            "insurance",
        ],
    ),
    (
        "Procedure",
        &[
            "identifier",
            "basedOn",
            "partOf",
            "code.coding",
            "performer",
            "reasonCode",
            "reasonReference",
            "bodySite",
            "report",
            "complication",
            "followUp",
            "note",
            "focalDevice",
            "usedReference",
            "usedCode",
        ],
    ),
    (
        "DiagnosticReport",
        &[
            "identifier",
            "basedOn",
            "category",
            "code.coding",
            "performer",
            "resultsInterpreter",
            "specimen",
            "result",
            "imagingStudy",
            "media",
            "conclusionCode",
            "presentedForm",
        ],
    ),
    (
        "AllergyIntolerance",
        &[
            "identifier",
            "category",
            "code.coding",
            "reaction",
            "note",
        ],
    ),
    (
        "Immunization",
        &[
            "identifier",
            "vaccineCode.coding",
            "performer",
            "note",
            "reasonCode",
            "reasonReference",
            "reaction",
            "protocolApplied",
        ],
    ),
    ("Bundle", &["link", "entry"]),
];

type HintTable = HashMap<String, BTreeSet<String>>;

/// Lower-cased copy of [`KNOWN_REPEATING`], built on first use.
static DEFAULT_TABLE: Lazy<Arc<HintTable>> = Lazy::new(|| {
    let mut table = HintTable::new();
    for (resource_type, paths) in KNOWN_REPEATING {
        table
            .entry(resource_type.to_ascii_lowercase())
            .or_default()
            .extend(paths.iter().map(|p| p.to_ascii_lowercase()));
    }
    Arc::new(table)
});

/// Hint provider backed by a static table of repeating element paths.
///
/// A known path also covers every path below it: once `name` repeats,
/// `name.family` is reported as repeating too. Lookups are case-insensitive.
#[derive(Debug, Clone)]
pub struct KnownStructuralHints {
    table: Arc<HintTable>,
}

impl KnownStructuralHints {
    pub fn new() -> Self {
        Self {
            table: Arc::clone(&DEFAULT_TABLE),
        }
    }

    /// Empty table, for callers that want to supply every path themselves.
    pub fn empty() -> Self {
        Self {
            table: Arc::new(HintTable::new()),
        }
    }

    /// Add a repeating path for `resource_type`.
    pub fn with_repeating(mut self, resource_type: &str, property_path: &str) -> Self {
        if resource_type.is_empty() || property_path.is_empty() {
            return self;
        }
        Arc::make_mut(&mut self.table)
            .entry(resource_type.to_ascii_lowercase())
            .or_default()
            .insert(property_path.to_ascii_lowercase());
        self
    }

    /// Resource types (lower-cased) that have at least one entry.
    pub fn resource_types(&self) -> impl Iterator<Item = &str> {
        self.table.keys().map(String::as_str)
    }
}

impl Default for KnownStructuralHints {
    fn default() -> Self {
        Self::new()
    }
}

impl StructuralHintProvider for KnownStructuralHints {
    fn is_repeating(&self, resource_type: &str, property_path: &str) -> bool {
        if resource_type.is_empty() || property_path.is_empty() {
            return false;
        }
        let Some(known) = self.table.get(&resource_type.to_ascii_lowercase()) else {
            return false;
        };
        let path = property_path.to_ascii_lowercase();
        known.iter().any(|k| {
            path == *k || (path.starts_with(k.as_str()) && path[k.len()..].starts_with('.'))
        })
    }

    fn is_reference(&self, _resource_type: &str, _property_path: &str) -> bool {
        false
    }
}
