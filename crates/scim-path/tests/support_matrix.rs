use scim_path::{
    add_value, exists_path, match_path, remove_value, replace_value, value, Error, Path,
};
use serde_json::{json, Map, Value};

const ENTERPRISE: &str = "urn:ietf:params:scim:schemas:extension:enterprise:2.0:User";

fn path(text: &str) -> Path {
    Path::parse(text).unwrap_or_else(|e| panic!("parse failed for '{text}': {e}"))
}

fn resource(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected an object, got {other}"),
    }
}

fn bjensen() -> Map<String, Value> {
    resource(json!({
        "schemas": ["urn:ietf:params:scim:schemas:core:2.0:User", ENTERPRISE],
        "userName": "bjensen",
        "name": {"givenName": "Barbara", "familyName": "Jensen"},
        "emails": [
            {"type": "work", "value": "bjensen@example.com", "primary": true},
            {"type": "home", "value": "babs@jensen.org"}
        ],
        "addresses": [
            {"type": "work", "locality": "Hollywood"},
            {"type": "home", "locality": "Anytown"}
        ],
        ENTERPRISE: {"employeeNumber": "701984", "manager": {"value": "26118915-6090-4610-87e4-49d8ca9f808d"}}
    }))
}

#[test]
fn add_then_match_round_trip_matrix() {
    let mut doc = resource(json!({}));
    add_value(&path("title"), &mut doc, json!("Tour Guide")).unwrap();
    assert_eq!(match_path(&path("title"), &doc).unwrap(), vec![json!("Tour Guide")]);

    add_value(&path("tags"), &mut doc, json!(["a", "b"])).unwrap();
    assert_eq!(match_path(&path("tags"), &doc).unwrap(), vec![json!(["a", "b"])]);

    add_value(&path("name.formatted"), &mut doc, json!("Ms. Barbara J Jensen III")).unwrap();
    assert_eq!(value(&path("name.formatted"), &doc).unwrap(), json!("Ms. Barbara J Jensen III"));
}

#[test]
fn add_union_is_idempotent_matrix() {
    let mut doc = resource(json!({"tags": ["a", "b"]}));
    add_value(&path("tags"), &mut doc, json!(["b", "c"])).unwrap();
    add_value(&path("tags"), &mut doc, json!(["b", "c"])).unwrap();
    assert_eq!(doc["tags"], json!(["a", "b", "c"]));

    let mut doc = resource(json!({"emails": [{"value": "a"}]}));
    add_value(&path("emails"), &mut doc, json!([{"value": "a"}, {"value": "b"}])).unwrap();
    assert_eq!(doc["emails"], json!([{"value": "a"}, {"value": "b"}]));
}

#[test]
fn replace_is_final_matrix() {
    let mut doc = bjensen();
    replace_value(&path("userName"), &mut doc, json!("babs")).unwrap();
    assert_eq!(value(&path("userName"), &doc).unwrap(), json!("babs"));

    replace_value(&path("emails"), &mut doc, json!([{"value": "only@example.com"}])).unwrap();
    assert_eq!(doc["emails"], json!([{"value": "only@example.com"}]));

    // Objects merge into objects.
    replace_value(&path("name"), &mut doc, json!({"givenName": "Babs"})).unwrap();
    assert_eq!(doc["name"], json!({"givenName": "Babs", "familyName": "Jensen"}));

    // Kind changes only through replace.
    replace_value(&path("name"), &mut doc, json!("Babs Jensen")).unwrap();
    assert_eq!(doc["name"], json!("Babs Jensen"));
}

#[test]
fn null_and_empty_array_are_noops_matrix() {
    for op in ["add", "replace"] {
        let mut doc = bjensen();
        for (target, empty) in [("userName", Value::Null), ("emails", json!([])), ("nickName", Value::Null)] {
            let result = if op == "add" {
                add_value(&path(target), &mut doc, empty)
            } else {
                replace_value(&path(target), &mut doc, empty)
            };
            result.unwrap();
        }
        assert_eq!(doc, bjensen(), "{op} changed the resource");

        let mut doc = resource(json!({"userName": "bjensen"}));
        for (target, empty) in [("name.givenName", Value::Null), ("urn:acme:ext:1.0:badge", json!([]))] {
            let result = if op == "add" {
                add_value(&path(target), &mut doc, empty)
            } else {
                replace_value(&path(target), &mut doc, empty)
            };
            result.unwrap();
        }
        assert_eq!(Value::Object(doc), json!({"userName": "bjensen"}), "{op} created intermediate objects");
    }
}

#[test]
fn filtered_replace_without_match_is_no_target_matrix() {
    let mut doc = bjensen();
    let err = replace_value(&path(r#"emails[type eq "other"]"#), &mut doc, json!({"value": "x"})).unwrap_err();
    assert!(matches!(err, Error::NoTarget(_)));

    let err = replace_value(&path(r#"emails[type eq "other"].value"#), &mut doc, json!("x")).unwrap_err();
    assert!(matches!(err, Error::NoTarget(_)));

    let err = replace_value(&path(r#"phoneNumbers[type eq "work"].value"#), &mut doc, json!("x")).unwrap_err();
    assert!(matches!(err, Error::NoTarget(_)));

    let err = replace_value(&path(r#"emails[type eq "fax"]"#), &mut doc, Value::Null).unwrap_err();
    assert!(matches!(err, Error::NoTarget(_)));

    replace_value(&path(r#"emails[type eq "work"]"#), &mut doc, Value::Null).unwrap();

    assert_eq!(doc, bjensen());
}

#[test]
fn filtered_replace_updates_matching_elements_matrix() {
    let mut doc = bjensen();
    replace_value(&path(r#"emails[type eq "work"].value"#), &mut doc, json!("barbara@example.com")).unwrap();
    assert_eq!(doc["emails"][0]["value"], "barbara@example.com");
    assert_eq!(doc["emails"][1]["value"], "babs@jensen.org");

    replace_value(&path(r#"addresses[type eq "home"]"#), &mut doc, json!({"locality": "Springfield"})).unwrap();
    assert_eq!(doc["addresses"][1], json!({"type": "home", "locality": "Springfield"}));

    replace_value(&path(r#"addresses[type eq "work"]"#), &mut doc, json!("gone")).unwrap();
    assert_eq!(doc["addresses"][0], json!("gone"));
}

#[test]
fn filtered_replace_on_singular_value_matrix() {
    let mut doc = resource(json!({"title": "Tour Guide"}));
    replace_value(&path(r#"title[value eq "Tour Guide"]"#), &mut doc, json!("Manager")).unwrap();
    assert_eq!(doc["title"], "Manager");

    let err = replace_value(&path(r#"title[value eq "Tour Guide"]"#), &mut doc, json!("x")).unwrap_err();
    assert!(matches!(err, Error::NoTarget(_)));
}

#[test]
fn remove_semantics_matrix() {
    let mut doc = bjensen();
    let removed = remove_value(&path(r#"emails[type eq "home"]"#), &mut doc).unwrap();
    assert_eq!(removed, vec![json!([{"type": "home", "value": "babs@jensen.org"}])]);
    assert_eq!(doc["emails"].as_array().map(Vec::len), Some(1));

    let removed = remove_value(&path(r#"emails[type eq "work"]"#), &mut doc).unwrap();
    assert_eq!(removed.len(), 1);
    assert!(!doc.contains_key("emails"));

    let removed = remove_value(&path("addresses.locality"), &mut doc).unwrap();
    assert_eq!(removed, vec![json!("Hollywood"), json!("Anytown")]);
    assert_eq!(doc["addresses"], json!([{"type": "work"}, {"type": "home"}]));

    assert!(remove_value(&path("nickName"), &mut doc).unwrap().is_empty());
}

#[test]
fn remove_without_match_keeps_array_matrix() {
    let mut doc = bjensen();
    let removed = remove_value(&path(r#"emails[type eq "other"]"#), &mut doc).unwrap();
    assert!(removed.is_empty());
    assert_eq!(doc, bjensen());
}

#[test]
fn fan_out_preserves_document_order_matrix() {
    let doc = bjensen();
    assert_eq!(
        match_path(&path("emails.value"), &doc).unwrap(),
        vec![json!("bjensen@example.com"), json!("babs@jensen.org")]
    );
    assert_eq!(
        match_path(&path(r#"emails[primary eq true].value"#), &doc).unwrap(),
        vec![json!("bjensen@example.com")]
    );
    // More than one match is still a valid single-value fetch.
    assert_eq!(value(&path("addresses.locality"), &doc).unwrap(), json!("Hollywood"));
}

#[test]
fn namespace_addressing_matrix() {
    let mut doc = bjensen();
    let employee = path(&format!("{ENTERPRISE}:employeeNumber"));
    assert_eq!(value(&employee, &doc).unwrap(), json!("701984"));
    assert_eq!(
        value(&path(&format!("{ENTERPRISE}:manager.value")), &doc).unwrap(),
        json!("26118915-6090-4610-87e4-49d8ca9f808d")
    );

    let extension = Path::with_namespace(ENTERPRISE).unwrap();
    assert!(exists_path(&extension, &doc).unwrap());

    remove_value(&employee, &mut doc).unwrap();
    remove_value(&path(&format!("{ENTERPRISE}:manager")), &mut doc).unwrap();
    assert!(!exists_path(&extension, &doc).unwrap());

    remove_value(&extension, &mut doc).unwrap();
    assert!(!doc.contains_key(ENTERPRISE));
    assert!(!exists_path(&extension, &doc).unwrap());

    add_value(&path(&format!("{ENTERPRISE}:division")), &mut doc, json!("Theme Park")).unwrap();
    assert_eq!(doc[ENTERPRISE], json!({"division": "Theme Park"}));
}

#[test]
fn root_path_matrix() {
    let mut doc = resource(json!({"userName": "bjensen"}));
    assert_eq!(match_path(&Path::root(), &doc).unwrap(), vec![json!({"userName": "bjensen"})]);

    add_value(&Path::root(), &mut doc, json!({"nickName": "Babs"})).unwrap();
    replace_value(&Path::root(), &mut doc, json!({"userName": "babs"})).unwrap();
    assert_eq!(Value::Object(doc.clone()), json!({"userName": "babs", "nickName": "Babs"}));

    let err = replace_value(&Path::root(), &mut doc, json!("babs")).unwrap_err();
    assert!(matches!(err, Error::InvalidValue(_)));
}

#[test]
fn auto_vivification_matrix() {
    let mut doc = resource(json!({"name": null}));
    add_value(&path("name.givenName"), &mut doc, json!("Barbara")).unwrap();
    add_value(&path("x.y.z"), &mut doc, json!(1)).unwrap();
    assert_eq!(
        Value::Object(doc.clone()),
        json!({"name": {"givenName": "Barbara"}, "x": {"y": {"z": 1}}})
    );

    let err = add_value(&path(r#"phones[type eq "work"].value"#), &mut doc, json!("555")).unwrap_err();
    assert!(matches!(err, Error::NoTarget(_)));
    assert!(!doc.contains_key("phones"));
}

#[test]
fn filter_errors_propagate_matrix() {
    let mut doc = bjensen();
    let bad = path(r#"emails[value gt true]"#);
    assert!(matches!(match_path(&bad, &doc), Err(Error::InvalidFilter(_))));
    assert!(matches!(remove_value(&bad, &mut doc), Err(Error::InvalidFilter(_))));
    assert_eq!(doc, bjensen());
}
