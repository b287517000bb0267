mod common;

use common::*;
use octofhir_smartpath::{
    EntryResolutionPolicy, ImplicitIndexing, MAX_PREDICATE_TERMS, NavigationFailure,
    NavigatorConfig, SmartPathNavigator,
};
use serde_json::json;

#[test]
fn test_empty_string_is_found_but_missing_is_not() {
    let navigator = SmartPathNavigator::default();
    let root = json!({"status": ""});

    let location = navigator.resolve(&root, "status", None, None).unwrap();
    assert_eq!(location.pointer.as_str(), "/status");
    assert_eq!(location.breadcrumbs, vec!["status"]);

    assert_eq!(navigator.resolve(&root, "nonExistentProperty", None, None), None);
}

#[test]
fn test_empty_string_inside_bundle_entry() {
    let navigator = navigator(EntryResolutionPolicy::Strict);
    let location = navigator
        .resolve(&observation_bundle(), "valueString", Some(2), None)
        .unwrap();
    assert_eq!(location.pointer.as_str(), "/entry/2/resource/valueString");
}

#[test]
fn test_implicit_array_default() {
    let navigator = SmartPathNavigator::default();
    let root = json!({"code": {"coding": [{"code": "12345"}, {"code": "67890"}]}});

    let location = navigator.resolve(&root, "code.coding.code", None, None).unwrap();
    assert_eq!(location.pointer.as_str(), "/code/coding/0/code");
    assert_eq!(location.breadcrumbs, vec!["code", "coding[0]", "code"]);
}

#[test]
fn test_explicit_array_index() {
    let navigator = SmartPathNavigator::default();
    let root = standalone_observation();

    let location = navigator.resolve(&root, "code.coding[1].code", None, None).unwrap();
    assert_eq!(location.pointer.as_str(), "/code/coding/1/code");
    assert_eq!(location.breadcrumbs, vec!["Observation", "code", "coding[1]", "code"]);

    assert!(matches!(
        navigator.try_resolve(&root, "code.coding[2].code", None, None),
        Err(NavigationFailure::IndexOutOfRange { index: 2, len: 2, .. })
    ));
}

#[test]
fn test_predicate_selects_first_match() {
    let navigator = SmartPathNavigator::default();
    let root = standalone_observation();

    let location = navigator
        .resolve(&root, "performer.where(display='Doctor B').display", None, None)
        .unwrap();
    assert_eq!(location.pointer.as_str(), "/performer/1/display");
    assert_eq!(
        location.breadcrumbs,
        vec!["Observation", "performer[1]", "display"]
    );
}

#[test]
fn test_predicate_in_bundle_with_scope() {
    let navigator = navigator(EntryResolutionPolicy::PreferExplicit);
    let location = navigator
        .resolve(
            &observation_bundle(),
            "Observation.performer.where(display='Doctor C').display",
            None,
            None,
        )
        .unwrap();
    assert_eq!(location.pointer.as_str(), "/entry/1/resource/performer/2/display");
    assert_eq!(
        location.breadcrumbs,
        vec!["Bundle", "entry[1]", "Observation", "performer[2]", "display"]
    );
}

#[test]
fn test_predicate_without_match_is_not_found() {
    let navigator = SmartPathNavigator::default();
    let root = standalone_observation();
    assert!(matches!(
        navigator.try_resolve(&root, "performer.where(display='Doctor Z').display", None, None),
        Err(NavigationFailure::NoPredicateMatch { .. })
    ));
}

#[test]
fn test_malformed_predicate_is_not_found() {
    let navigator = SmartPathNavigator::default();
    let root = standalone_observation();
    assert_eq!(
        navigator.resolve(&root, "performer.where(display=).display", None, None),
        None
    );
    assert!(matches!(
        navigator.try_resolve(&root, "performer.where(display=).display", None, None),
        Err(NavigationFailure::InvalidPredicate { .. })
    ));
}

#[test]
fn test_compound_predicate() {
    let navigator = SmartPathNavigator::default();
    let bundle = observation_bundle();
    let location = navigator
        .resolve(
            &bundle,
            "Observation.code.coding.where(system='http://snomed.info/sct' and code.exists()).code",
            None,
            None,
        )
        .unwrap();
    assert_eq!(location.pointer.as_str(), "/entry/1/resource/code/coding/1/code");
}

#[test]
fn test_missing_intermediate_short_circuits() {
    let navigator = SmartPathNavigator::default();
    let root = standalone_observation();
    assert_eq!(
        navigator.try_resolve(&root, "subject.reference", None, None),
        Err(NavigationFailure::MissingField {
            field: "subject".to_string(),
            pointer: String::new(),
        })
    );
}

#[test]
fn test_walking_into_scalar_is_not_found() {
    let navigator = SmartPathNavigator::default();
    let root = standalone_observation();
    assert!(matches!(
        navigator.try_resolve(&root, "status.value", None, None),
        Err(NavigationFailure::NotAnObject { .. })
    ));
}

#[test]
fn test_resource_relative_path_on_standalone_resource() {
    let navigator = navigator(EntryResolutionPolicy::Strict);
    let root = standalone_observation();

    let location = navigator.resolve(&root, "Observation.status", None, None).unwrap();
    assert_eq!(location.pointer.as_str(), "/status");
    assert_eq!(location.breadcrumbs, vec!["Observation", "status"]);

    assert!(matches!(
        navigator.try_resolve(&root, "Patient.status", None, None),
        Err(NavigationFailure::ResourceTypeMismatch { .. })
    ));
    assert_eq!(
        navigator.try_resolve(&root, "status", Some(0), None),
        Err(NavigationFailure::NotABundle)
    );
}

#[test]
fn test_hinted_only_indexing_with_null_hints_stops_at_arrays() {
    let navigator = null_hints_navigator(EntryResolutionPolicy::Strict)
        .with_implicit_indexing(ImplicitIndexing::HintedOnly);
    let root = standalone_observation();

    let location = navigator.resolve(&root, "code.coding", None, None).unwrap();
    assert_eq!(location.pointer.as_str(), "/code/coding");
    assert_eq!(navigator.resolve(&root, "code.coding.code", None, None), None);

    let explicit = navigator.resolve(&root, "code.coding[0].code", None, None).unwrap();
    assert_eq!(explicit.pointer.as_str(), "/code/coding/0/code");
}

#[test]
fn test_hinted_only_indexing_with_known_hints() {
    let navigator = SmartPathNavigator::from_config(&NavigatorConfig::strict());
    let bundle = observation_bundle();

    let location = navigator
        .resolve(&bundle, "Bundle.entry[1].resource.code.coding.code", None, None)
        .unwrap();
    assert_eq!(location.pointer.as_str(), "/entry/1/resource/code/coding/0/code");

    let name = navigator
        .resolve(&bundle, "Patient.name.given", Some(0), None)
        .unwrap();
    assert_eq!(name.pointer.as_str(), "/entry/0/resource/name/0/given/0");
}

#[test]
fn test_empty_array_at_end_points_at_array() {
    let navigator = SmartPathNavigator::default();
    let root = json!({"resourceType": "Patient", "name": []});

    let location = navigator.resolve(&root, "name", None, None).unwrap();
    assert_eq!(location.pointer.as_str(), "/name");
    assert!(matches!(
        navigator.try_resolve(&root, "name.family", None, None),
        Err(NavigationFailure::IndexOutOfRange { index: 0, len: 0, .. })
    ));
}

#[test]
fn test_predicate_literal_with_slash() {
    let navigator = SmartPathNavigator::default();
    let root = json!({"resourceType": "Basic", "extension": [{"url": "a/b"}]});
    let location = navigator
        .resolve(&root, "extension.where(url='a/b').url", None, None)
        .unwrap();
    assert_eq!(location.pointer.as_str(), "/extension/0/url");
    assert_eq!(location.pointer.lookup(&root), Some(&json!("a/b")));
}

#[test]
fn test_pointer_addresses_original_document() {
    let navigator = SmartPathNavigator::default();
    let bundle = observation_bundle();
    for path in [
        "Observation.status",
        "Observation.code.coding.system",
        "Patient.name.where(use='usual').given",
        "Bundle.entry[2].resource.valueString",
        "Bundle.entry[0].fullUrl",
    ] {
        let location = navigator.resolve(&bundle, path, None, None).unwrap();
        assert!(
            location.pointer.lookup(&bundle).is_some(),
            "{path} -> {} does not address the document",
            location.pointer
        );
    }
}

#[test]
fn test_resolution_is_repeatable() {
    let navigator = SmartPathNavigator::default();
    let bundle = observation_bundle();
    let first = navigator.try_resolve(&bundle, "Observation.performer.display", None, None);
    for _ in 0..10 {
        assert_eq!(
            navigator.try_resolve(&bundle, "Observation.performer.display", None, None),
            first
        );
    }
}

#[test]
fn test_navigator_is_shareable_across_threads() {
    let navigator = std::sync::Arc::new(SmartPathNavigator::default());
    let bundle = std::sync::Arc::new(observation_bundle());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let navigator = navigator.clone();
            let bundle = bundle.clone();
            std::thread::spawn(move || {
                navigator
                    .resolve(&bundle, "Observation.status", None, None)
                    .map(|l| l.pointer.into_string())
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(
            handle.join().unwrap().as_deref(),
            Some("/entry/1/resource/status")
        );
    }
}

#[test]
fn test_invalid_paths_are_not_found() {
    let navigator = SmartPathNavigator::default();
    let bundle = observation_bundle();
    for path in ["", "..", "Observation..status", "Observation.status[", "a[-1]"] {
        assert_eq!(navigator.resolve(&bundle, path, None, None), None, "{path:?}");
    }
}

#[test]
fn test_keys_with_pointer_special_characters() {
    let navigator = SmartPathNavigator::default();
    let root = json!({"a/b": {"m~n": "x"}, "odd-key": [{"@value": 1}]});

    let location = navigator.resolve(&root, "a/b.m~n", None, None).unwrap();
    assert_eq!(location.pointer.as_str(), "/a~1b/m~0n");
    assert_eq!(location.breadcrumbs, vec!["a/b", "m~n"]);
    assert_eq!(location.pointer.lookup(&root), Some(&json!("x")));

    let location = navigator.resolve(&root, "odd-key.@value", None, None).unwrap();
    assert_eq!(location.pointer.as_str(), "/odd-key/0/@value");
    assert_eq!(location.pointer.lookup(&root), Some(&json!(1)));
}

#[test]
fn test_overlong_predicate_chain_is_not_found() {
    let navigator = SmartPathNavigator::default();
    let root = json!({"x": [{"a": "2"}, {"a": "1"}]});
    let chain = |terms: usize| vec!["a='1'"; terms].join(" and ");

    let location = navigator
        .resolve(&root, &format!("x.where({}).a", chain(MAX_PREDICATE_TERMS)), None, None)
        .unwrap();
    assert_eq!(location.pointer.as_str(), "/x/1/a");

    for terms in [MAX_PREDICATE_TERMS + 1, 5_000, 10_000] {
        assert!(matches!(
            navigator.try_resolve(&root, &format!("x.where({}).a", chain(terms)), None, None),
            Err(NavigationFailure::InvalidPredicate { .. })
        ));
    }
}
