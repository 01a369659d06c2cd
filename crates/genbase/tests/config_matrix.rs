//! Envelope validation, titles and emission.

use genbase::{
    serialize, CallRecord, Class, Config, ConfigError, Configs, ExportOptions, Node, Object,
    Param, Signature, Value, DEFAULT_TAB_TITLE,
};
use indexmap::IndexMap;
use proptest::prelude::*;
use serde_json::json;

fn node(value: serde_json::Value) -> Node {
    Node::from(value)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[test]
fn accepts_well_formed_envelope() {
    let config = Config::from_node(&node(json!({
        "META": {"type": "explanation", "subtype": "feature_attribution"},
        "CONTENT": {"features": [1, 2]},
        "extra": true
    })))
    .unwrap();
    assert_eq!(config.title().as_deref(), Some("explanation (feature_attribution)"));
    assert_eq!(config.content()["features"], node(json!([1, 2])));
}

#[test]
fn rejects_malformed_envelopes() {
    assert!(matches!(
        Config::from_node(&node(json!([1]))),
        Err(ConfigError::NotAMapping { found: "sequence" })
    ));
    assert!(matches!(
        Config::from_node(&node(json!({"CONTENT": {}}))),
        Err(ConfigError::MissingKey { key: "META" })
    ));
    assert!(matches!(
        Config::from_node(&node(json!({"META": {}}))),
        Err(ConfigError::MissingKey { key: "CONTENT" })
    ));
    assert!(matches!(
        Config::from_node(&node(json!({"META": "x", "CONTENT": {}}))),
        Err(ConfigError::SectionNotAMapping { key: "META", .. })
    ));
    assert!(matches!(Config::from_json_str("{"), Err(ConfigError::Json(_))));
}

#[test]
fn configs_accept_single_or_many() {
    let one = json!({"META": {"title": "A"}, "CONTENT": {}});
    assert_eq!(Configs::from_node(&node(one.clone())).unwrap().len(), 1);
    let many = Configs::from_node(&node(json!([one, {"META": {"title": "B"}, "CONTENT": {}}]))).unwrap();
    assert_eq!(many.tab_title(), "A | B");
    assert!(matches!(
        Configs::from_node(&node(json!("nope"))),
        Err(ConfigError::NotASequence { .. })
    ));
}

// ---------------------------------------------------------------------------
// Emission
// ---------------------------------------------------------------------------

#[test]
fn envelope_from_serialized_state() {
    let model = Object::builder(Class::new("text", "Explainer"))
        .attr("seed", 0)
        .attr("__hidden", 1)
        .build();
    let mut config = Config::default();
    config
        .insert_meta("type", "explanation")
        .insert_meta("title", "Local explanation")
        .insert_content("model", serialize(&Value::Object(model)));

    let json: serde_json::Value = serde_json::from_str(&config.to_json().unwrap()).unwrap();
    assert_eq!(
        json,
        json!({
            "META": {"type": "explanation", "title": "Local explanation"},
            "CONTENT": {"model": {"__class__": "text.Explainer", "seed": 0}}
        })
    );
    assert_eq!(
        config.to_yaml().unwrap(),
        "META:\n  type: explanation\n  title: Local explanation\nCONTENT:\n  model:\n    __class__: text.Explainer\n    seed: 0\n"
    );
    assert_eq!(serde_json::to_value(&config).unwrap(), json);
}

#[test]
fn call_record_as_content() {
    let sig = Signature::function("explain", [Param::required("n"), Param::var_keyword("kw")]).unwrap();
    let bound = sig.bind(vec![Value::Int(5)], IndexMap::new()).unwrap();
    let record = CallRecord::build(&sig, &bound, &ExportOptions::default()).unwrap();
    let mut config = Config::default();
    config.insert_content("callargs", record.to_node(&ExportOptions::default()));
    let back = Config::from_json_str(&config.to_json().unwrap()).unwrap();
    assert_eq!(back, config);
}

#[test]
fn opaque_content_fails_with_pointer() {
    let mut config = Config::default();
    config.insert_content("fn", serialize(&Value::Opaque("function".into())));
    let err = config.to_json().unwrap_err();
    assert_eq!(
        err.to_string(),
        "unserializable value of type `function` at `/CONTENT/fn`"
    );
}

// ---------------------------------------------------------------------------
// Titles
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn tab_title_lists_every_title(titles in proptest::collection::vec("[a-z]{1,6}", 0..6)) {
        let configs: Configs = titles
            .iter()
            .map(|t| {
                let mut c = Config::default();
                c.insert_meta("title", t.as_str());
                c
            })
            .collect::<Vec<_>>()
            .into();
        let tab = configs.tab_title();
        if titles.is_empty() {
            prop_assert_eq!(tab, DEFAULT_TAB_TITLE);
        } else {
            let parts: Vec<&str> = tab.split(" | ").collect();
            for t in &titles {
                prop_assert!(parts.contains(&t.as_str()));
            }
            let mut distinct = parts.clone();
            distinct.sort_unstable();
            distinct.dedup();
            prop_assert_eq!(distinct.len(), parts.len());
        }
    }
}
