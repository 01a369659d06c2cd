//! Argument binding against parameter schemas.

use genbase_calldict::{BindingError, Param, Signature, CALL_RECORD_PARAM};
use genbase_export::Value;
use indexmap::IndexMap;

fn kwargs<const N: usize>(entries: [(&str, Value); N]) -> IndexMap<String, Value> {
    entries
        .into_iter()
        .map(|(k, v)| (k.to_owned(), v))
        .collect()
}

fn abkw() -> Signature {
    Signature::function(
        "f",
        [
            Param::required("a"),
            Param::optional("b", 2),
            Param::var_keyword("kw"),
        ],
    )
    .unwrap()
}

// ---------------------------------------------------------------------------
// Defaults and catch-alls
// ---------------------------------------------------------------------------

#[test]
fn default_is_applied() {
    let bound = abkw().bind(vec![Value::Int(1)], IndexMap::new()).unwrap();
    assert_eq!(bound.get("a"), Some(&Value::Int(1)));
    assert_eq!(bound.get("b"), Some(&Value::Int(2)));
    assert_eq!(bound.get("kw"), Some(&Value::Map(IndexMap::new())));
}

#[test]
fn surplus_keywords_land_in_catch_all() {
    let bound = abkw()
        .bind(vec![Value::Int(1), Value::Int(3)], kwargs([("c", Value::Int(4))]))
        .unwrap();
    assert_eq!(bound.get("a"), Some(&Value::Int(1)));
    assert_eq!(bound.get("b"), Some(&Value::Int(3)));
    assert_eq!(bound.get("kw"), Some(&Value::map([("c", 4)])));
    let names: Vec<_> = bound.arguments().keys().cloned().collect();
    assert_eq!(names, vec!["a", "b", "kw"]);
}

#[test]
fn keyword_fills_positional_parameter() {
    let bound = abkw()
        .bind(vec![], kwargs([("b", Value::Int(5)), ("a", Value::Int(0))]))
        .unwrap();
    assert_eq!(bound.get("a"), Some(&Value::Int(0)));
    assert_eq!(bound.get("b"), Some(&Value::Int(5)));
}

#[test]
fn var_positional_collects_tuple() {
    let sig = Signature::function(
        "g",
        [
            Param::required("x"),
            Param::var_positional("rest"),
            Param::keyword_only_default("flag", false),
        ],
    )
    .unwrap();
    let bound = sig
        .bind(
            vec![Value::Int(1), Value::Int(2), Value::Int(3)],
            kwargs([("flag", Value::Bool(true))]),
        )
        .unwrap();
    assert_eq!(
        bound.get("rest"),
        Some(&Value::Tuple(vec![Value::Int(2), Value::Int(3)]))
    );
    assert_eq!(bound.get("flag"), Some(&Value::Bool(true)));

    let bound = sig.bind(vec![Value::Int(1)], IndexMap::new()).unwrap();
    assert_eq!(bound.get("rest"), Some(&Value::Tuple(vec![])));
    assert_eq!(bound.get("flag"), Some(&Value::Bool(false)));
}

#[test]
fn catch_all_name_as_keyword_is_just_a_keyword() {
    let bound = abkw()
        .bind(vec![Value::Int(1)], kwargs([("kw", Value::Int(9))]))
        .unwrap();
    assert_eq!(bound.get("kw"), Some(&Value::map([("kw", 9)])));
}

// ---------------------------------------------------------------------------
// Failures
// ---------------------------------------------------------------------------

#[test]
fn too_many_positional() {
    let err = abkw()
        .bind(vec![Value::Int(1), Value::Int(2), Value::Int(3)], IndexMap::new())
        .unwrap_err();
    assert_eq!(
        err,
        BindingError::TooManyPositional {
            callable: "f".into(),
            expected: 2,
            given: 3
        }
    );
    assert_eq!(err.to_string(), "f() takes 2 positional arguments but 3 were given");
}

#[test]
fn unexpected_keyword_without_catch_all() {
    let sig = Signature::function("h", [Param::required("a")]).unwrap();
    let err = sig
        .bind(vec![Value::Int(1)], kwargs([("z", Value::Null)]))
        .unwrap_err();
    assert_eq!(
        err,
        BindingError::UnexpectedKeyword {
            callable: "h".into(),
            name: "z".into()
        }
    );
}

#[test]
fn multiple_values() {
    let err = abkw()
        .bind(vec![Value::Int(1)], kwargs([("a", Value::Int(2))]))
        .unwrap_err();
    assert!(matches!(err, BindingError::MultipleValues { ref name, .. } if name == "a"));
}

#[test]
fn missing_required() {
    let err = abkw().bind(vec![], IndexMap::new()).unwrap_err();
    assert!(matches!(err, BindingError::MissingArgument { ref name, .. } if name == "a"));

    let sig = Signature::function("k", [Param::keyword_only("key")]).unwrap();
    let err = sig.bind(vec![], IndexMap::new()).unwrap_err();
    assert!(matches!(err, BindingError::MissingArgument { ref name, .. } if name == "key"));
}

#[test]
fn method_without_receiver() {
    let sig = Signature::method("fit", [Param::required("x")]).unwrap();
    let err = sig.bind(vec![], IndexMap::new()).unwrap_err();
    assert_eq!(err, BindingError::MissingReceiver { callable: "fit".into() });
}

#[test]
fn reserved_name_cannot_be_supplied() {
    let sig = Signature::function("f", [Param::var_keyword("kwargs")]).unwrap();
    let err = sig
        .bind(vec![], kwargs([(CALL_RECORD_PARAM, Value::Null)]))
        .unwrap_err();
    assert!(matches!(err, BindingError::ReservedArgument { .. }));

    let sig = Signature::function("f", [Param::optional(CALL_RECORD_PARAM, Value::Null)]).unwrap();
    let err = sig.bind(vec![Value::Int(1)], IndexMap::new()).unwrap_err();
    assert!(matches!(err, BindingError::ReservedArgument { .. }));
}
