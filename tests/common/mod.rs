use octofhir_smartpath::{
    EntryResolutionPolicy, KnownStructuralHints, NullStructuralHints, SmartPathNavigator,
};
use serde_json::{Value, json};
use std::sync::Arc;

#[allow(dead_code)]
pub const ALL_POLICIES: [EntryResolutionPolicy; 3] = [
    EntryResolutionPolicy::Strict,
    EntryResolutionPolicy::PreferExplicit,
    EntryResolutionPolicy::FallbackToFirst,
];

#[allow(dead_code)]
pub fn navigator(policy: EntryResolutionPolicy) -> SmartPathNavigator {
    SmartPathNavigator::new(policy, Arc::new(KnownStructuralHints::new()))
}

#[allow(dead_code)]
pub fn null_hints_navigator(policy: EntryResolutionPolicy) -> SmartPathNavigator {
    SmartPathNavigator::new(policy, Arc::new(NullStructuralHints))
}

/// Patient, final Observation, preliminary Observation.
#[allow(dead_code)]
pub fn observation_bundle() -> Value {
    json!({
        "resourceType": "Bundle",
        "id": "bundle-1",
        "type": "collection",
        "entry": [
            {
                "fullUrl": "urn:uuid:patient-1",
                "resource": {
                    "resourceType": "Patient",
                    "id": "patient-1",
                    "name": [
                        {"use": "official", "family": "Chalmers", "given": ["Peter", "James"]},
                        {"use": "usual", "given": ["Jim"]}
                    ],
                    "gender": "male"
                }
            },
            {
                "fullUrl": "urn:uuid:obs-1",
                "resource": {
                    "resourceType": "Observation",
                    "id": "obs-1",
                    "status": "final",
                    "code": {
                        "coding": [
                            {"system": "http://loinc.org", "code": "12345"},
                            {"system": "http://snomed.info/sct", "code": "67890"}
                        ]
                    },
                    "performer": [
                        {"display": "Doctor A"},
                        {"display": "Doctor B"},
                        {"display": "Doctor C"}
                    ]
                }
            },
            {
                "fullUrl": "urn:uuid:obs-2",
                "resource": {
                    "resourceType": "Observation",
                    "id": "obs-2",
                    "status": "preliminary",
                    "valueString": ""
                }
            }
        ]
    })
}

/// A single Observation resource, not wrapped in a bundle.
#[allow(dead_code)]
pub fn standalone_observation() -> Value {
    json!({
        "resourceType": "Observation",
        "status": "",
        "code": {
            "coding": [{"code": "12345"}, {"code": "67890"}]
        },
        "performer": [
            {"display": "Doctor A"},
            {"display": "Doctor B"},
            {"display": "Doctor C"}
        ]
    })
}
