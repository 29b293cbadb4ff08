use std::collections::HashSet;

use serde_json::json;

use crate::util::{draft, no_names, validator};
use surveyr_common::source::SourceDraft;
use surveyr_core::validation::{CREDENTIALS, NAME, PORT};

fn source1() -> serde_json::Value {
    json!({
        "name": "source1",
        "hosts": ["1.2.3.4"],
        "port": "22",
        "credentials": [1],
    })
}

#[test]
fn creating_the_same_name_twice_conflicts() {
    let v = validator();
    let mut names: HashSet<String> = no_names();

    let first = v.validate(&draft(source1()), &names).unwrap();
    names.insert(first.name.clone());

    let second = v.validate(&draft(source1()), &names).unwrap_err();
    assert_eq!(second.get(NAME), ["A source named 'source1' already exists."]);
}

#[test]
fn updating_into_another_name_conflicts() {
    let v = validator();
    let first = v.validate(&draft(source1()), &no_names()).unwrap();
    let mut value = source1();
    value["name"] = json!("source2");
    let second = v.validate(&draft(value), &no_names()).unwrap();

    let names: HashSet<String> = [first.name.clone(), second.name.clone()].into();
    let errors = v
        .validate_update(&second, &draft(source1()), &names)
        .unwrap_err();
    assert!(errors.contains(NAME));

    let patch = SourceDraft {
        name: Some(json!("source1")),
        ..SourceDraft::default()
    };
    assert!(
        v.validate_partial_update(&second, &patch, &names)
            .unwrap_err()
            .contains(NAME)
    );
}

#[test]
fn unprintable_and_overlong_names_are_rejected() {
    let v = validator();
    for name in ["\r\n", &"A".repeat(100)] {
        let mut value = source1();
        value["name"] = json!(name);
        assert!(v.validate(&draft(value), &no_names()).unwrap_err().contains(NAME));
    }
}

#[test]
fn negative_port_is_rejected() {
    let mut value = source1();
    value["port"] = json!(-1);
    let errors = validator().validate(&draft(value), &no_names()).unwrap_err();
    assert_eq!(errors.get(PORT).len(), 1);
}

#[test]
fn credentials_must_exist_and_be_present() {
    let v = validator();
    for credentials in [json!([]), json!([42]), json!(null)] {
        let mut value = source1();
        value["credentials"] = credentials.clone();
        let errors = v.validate(&draft(value), &no_names()).unwrap_err();
        assert!(errors.contains(CREDENTIALS), "{credentials}");
    }
}

#[test]
fn partial_update_of_port_is_accepted() {
    let v = validator();
    let names: HashSet<String> = ["source1".to_string()].into();
    let current = v.validate(&draft(source1()), &no_names()).unwrap();

    let patch = draft(json!({"port": 8080}));
    let updated = v.validate_partial_update(&current, &patch, &names).unwrap();
    assert_eq!(updated.port, 8080);
    assert_eq!(updated.name, current.name);
    assert_eq!(updated.credentials, current.credentials);
}

#[test]
fn revalidating_an_unchanged_source_is_idempotent() {
    let v = validator();
    let value = json!({
        "name": "sat",
        "hosts": ["10.10.[1:20].[1:25]", "sat.example.com"],
        "port": 443,
        "credentials": [2, 1, 2],
        "options": {"satellite_version": "6.2", "ssl_cert_verify": false},
    });
    let source = v.validate(&draft(value), &no_names()).unwrap();
    let names: HashSet<String> = [source.name.clone()].into();

    let first = v.validate_update(&source, &source.to_draft(), &names);
    let second = v.validate_update(&source, &source.to_draft(), &names);
    assert_eq!(first, Ok(source));
    assert_eq!(first, second);
}

#[test]
fn errors_are_keyed_by_field() {
    let errors = validator()
        .validate(&draft(json!({"name": "x", "port": 0})), &no_names())
        .unwrap_err();
    let body = serde_json::to_value(&errors).unwrap();

    assert!(body.get("hosts").is_some());
    assert!(body.get("port").is_some());
    assert!(body.get("credentials").is_some());
    assert!(body.get("name").is_none());
}
