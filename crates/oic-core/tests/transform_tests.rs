use chrono::{DateTime, TimeZone, Utc};
use serde_json::json;

use oic_core::export::Resource;
use oic_core::parse;
use oic_core::parse::spec::SpecDocument;
use oic_core::transform::{self, CollectionBuilder, CollectionOptions};

const CHAT: &str = include_str!("fixtures/chat-v4.yaml");
const MINIMAL: &str = include_str!("fixtures/minimal.json");

fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()
}

fn chat_spec() -> SpecDocument {
    parse::from_yaml(CHAT).expect("should parse chat-v4.yaml")
}

#[test]
fn resource_order_is_root_environment_groups_requests() {
    let doc = CollectionBuilder::default()
        .build_at(&chat_spec(), fixed_time())
        .unwrap();

    let kinds: Vec<&str> = doc
        .resources
        .iter()
        .map(|r| match r {
            Resource::RequestGroup(_) => "group",
            Resource::Environment(_) => "environment",
            Resource::Request(_) => "request",
        })
        .collect();

    let mut expected = vec!["group", "environment"];
    expected.extend(["group"; 5]);
    expected.extend(["request"; 7]);
    assert_eq!(kinds, expected);

    assert_eq!(doc.resources[0].id(), "__FLD_1__");
    assert_eq!(doc.resources[0].parent_id(), "__WORKSPACE_ID__");
    assert_eq!(doc.resources[1].id(), "__ENV_1__");
    assert_eq!(doc.resources[1].parent_id(), "__WORKSPACE_ID__");
}

#[test]
fn request_count_matches_tag_count() {
    let spec = chat_spec();
    let expected: usize = spec
        .paths
        .values()
        .flat_map(|item| item.operations())
        .map(|(_, _, op)| op.tags.len())
        .sum();

    let doc = transform::build_collection(&spec).unwrap();
    assert_eq!(doc.requests().count(), expected);
    assert_eq!(expected, 7);
}

#[test]
fn tag_groups_sorted_case_insensitively() {
    let doc = CollectionBuilder::default()
        .build_at(&chat_spec(), fixed_time())
        .unwrap();

    let groups: Vec<(&str, &str)> = doc
        .groups()
        .skip(1)
        .map(|g| (g.id.as_str(), g.name.as_str()))
        .collect();
    assert_eq!(
        groups,
        vec![
            ("__FLD_2__", "bots"),
            ("__FLD_3__", "Channels"),
            ("__FLD_4__", "posts"),
            ("__FLD_5__", "system"),
            ("__FLD_6__", "users"),
        ]
    );
    assert!(doc.groups().skip(1).all(|g| g.parent_id == "__FLD_1__"));
}

#[test]
fn every_request_parent_is_a_group_named_after_a_source_tag() {
    let spec = chat_spec();
    let doc = CollectionBuilder::default().build_at(&spec, fixed_time()).unwrap();

    let all_tags: Vec<&str> = spec
        .paths
        .values()
        .flat_map(|item| item.operations())
        .flat_map(|(_, _, op)| op.tags.iter().map(String::as_str))
        .collect();

    for request in doc.requests() {
        let matching: Vec<_> = doc.groups().filter(|g| g.id == request.parent_id).collect();
        assert_eq!(matching.len(), 1, "parent of {} must resolve once", request.id);
        assert!(all_tags.contains(&matching[0].name.as_str()));
    }
}

#[test]
fn multi_tag_operation_yields_one_request_per_tag() {
    let doc = CollectionBuilder::default()
        .build_at(&chat_spec(), fixed_time())
        .unwrap();

    let copies: Vec<_> = doc
        .requests()
        .filter(|r| r.name == "Get a post for a user")
        .collect();
    assert_eq!(copies.len(), 2);
    assert_eq!(copies[0].id, "__REQ_2__");
    assert_eq!(copies[1].id, "__REQ_3__");
    assert_eq!(doc.group(&copies[0].parent_id).unwrap().name, "users");
    assert_eq!(doc.group(&copies[1].parent_id).unwrap().name, "posts");

    for copy in copies {
        assert_eq!(copy.url, "{{ api_root }}/users/{{ user_id }}/posts/{{ post_id }}");
        let names: Vec<&str> = copy.parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["user_id", "post_id"]);
    }
}

#[test]
fn environment_holds_fixed_entries_and_valid_path_variables() {
    let options = CollectionOptions {
        api_root: "http://localhost:8065/api/v4".to_string(),
        ..CollectionOptions::default()
    };
    let doc = CollectionBuilder::new(options)
        .build_at(&chat_spec(), fixed_time())
        .unwrap();

    let env = doc.environment().expect("should have an environment");
    let keys: Vec<&str> = env.data.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["api_root", "api_token", "user_id", "post_id", "team_id"]);
    assert_eq!(env.data["api_root"], "http://localhost:8065/api/v4");
    assert_eq!(env.data["api_token"], "");
    assert_eq!(env.data["user_id"], "user_id");
    assert!(!env.data.contains_key("v2"));

    let captured = transform::capture_path_variables(&chat_spec());
    assert!(captured.contains("v2"));
}

#[test]
fn request_bodies() {
    let doc = CollectionBuilder::default()
        .build_at(&chat_spec(), fixed_time())
        .unwrap();

    let create_user = doc.requests().find(|r| r.name == "Create a user").unwrap();
    assert_eq!(
        serde_json::to_value(&create_user.body).unwrap(),
        json!({
            "mimeType": "application/json",
            "text": "{\"username\":\"username\",\"email\":\"email\"}",
        })
    );

    let create_channel = doc.requests().find(|r| r.name == "Create a channel").unwrap();
    assert_eq!(
        create_channel.body.text.as_deref(),
        Some(r#"{"team_id":"team_id","name":"name","display_name":"display_name","type":"type"}"#)
    );
    assert_eq!(create_channel.parameters[0].name, "team_id");

    let get_users = doc.requests().find(|r| r.name == "Get users").unwrap();
    assert!(get_users.body.is_empty());
    assert!(get_users.parameters.is_empty());
}

#[test]
fn untagged_operation_is_dropped_without_error() {
    let doc = CollectionBuilder::default()
        .build_at(&chat_spec(), fixed_time())
        .unwrap();
    assert!(doc.requests().all(|r| r.name != "Untagged endpoint"));
}

#[test]
fn repeated_builds_differ_only_in_export_date() {
    let spec = chat_spec();
    let builder = CollectionBuilder::default();

    let first = builder.build_at(&spec, fixed_time()).unwrap();
    let second = builder.build_at(&spec, fixed_time()).unwrap();
    assert_eq!(first, second);

    let later = builder
        .build_at(&spec, Utc.with_ymd_and_hms(2025, 6, 7, 8, 9, 10).unwrap())
        .unwrap();
    let mut a = serde_json::to_value(&first).unwrap();
    let mut b = serde_json::to_value(&later).unwrap();
    assert_ne!(a["__export_date"], b["__export_date"]);
    a["__export_date"] = json!(null);
    b["__export_date"] = json!(null);
    assert_eq!(a, b);
}

#[test]
fn captures_do_not_leak_between_builds() {
    let builder = CollectionBuilder::default();
    builder.build_at(&chat_spec(), fixed_time()).unwrap();

    let minimal = parse::from_json(MINIMAL).unwrap();
    let doc = builder.build_at(&minimal, fixed_time()).unwrap();
    let env = doc.environment().unwrap();
    assert_eq!(env.data.len(), 2);
    assert_eq!(doc.requests().next().unwrap().id, "__REQ_0__");
}

#[test]
fn minimal_document_json() {
    let spec = parse::from_json(MINIMAL).unwrap();
    let options = CollectionOptions {
        name: "Minimal API".to_string(),
        source: "oic:test".to_string(),
        ..CollectionOptions::default()
    };
    let doc = CollectionBuilder::new(options).build_at(&spec, fixed_time()).unwrap();

    let value: serde_json::Value = serde_json::from_str(&doc.to_json_pretty().unwrap()).unwrap();
    assert_eq!(
        value,
        json!({
            "_type": "export",
            "__export_format": 3,
            "__export_date": "2024-01-02T03:04:05.000Z",
            "__export_source": "oic:test",
            "resources": [
                {
                    "_type": "request_group",
                    "_id": "__FLD_1__",
                    "parentId": "__WORKSPACE_ID__",
                    "name": "Minimal API",
                },
                {
                    "_type": "environment",
                    "_id": "__ENV_1__",
                    "parentId": "__WORKSPACE_ID__",
                    "name": "Base Environment",
                    "data": { "api_root": "", "api_token": "" },
                },
                {
                    "_type": "request_group",
                    "_id": "__FLD_2__",
                    "parentId": "__FLD_1__",
                    "name": "system",
                },
                {
                    "_type": "request",
                    "_id": "__REQ_0__",
                    "parentId": "__FLD_2__",
                    "name": "Ping",
                    "description": "Check the server is alive.",
                    "method": "get",
                    "url": "{{ api_root }}/ping",
                    "body": {},
                    "headers": [],
                    "parameters": [],
                    "authentication": { "token": "{{ api_token }}", "type": "bearer" },
                },
            ],
        })
    );
}

#[test]
fn unresolved_reference_is_an_error() {
    let yaml = r##"
paths:
  /x/{id}:
    get:
      tags: [x]
      parameters:
        - $ref: "#/parameters/Missing"
"##;
    let spec = parse::from_yaml(yaml).unwrap();
    let err = transform::build_collection(&spec).unwrap_err();
    assert_eq!(err.to_string(), "unresolved reference: #/parameters/Missing");
}
