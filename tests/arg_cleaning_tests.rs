use chrono::{NaiveDate, NaiveTime};
use std::sync::Arc;
use ttag::*;
use test_utils::*;

/// Argument Cleaning Tests
/// Single item gate, null bypass, per-domain cleaning and declaration errors

fn date() -> Value {
    Value::Date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap())
}

fn datetime() -> Value {
    Value::DateTime(
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(12, 30, 0)
            .unwrap(),
    )
}

fn time() -> Value {
    Value::Time(NaiveTime::from_hms_opt(12, 30, 0).unwrap())
}

#[test]
fn test_single_value_argument_rejects_lists() {
    let arg = Arg::integer().name("limit").build().unwrap();
    let err = arg
        .base_clean(Value::List(vec![Value::from(1), Value::from(2)]))
        .unwrap_err();
    assert!(err.is_validation());
    assert_eq!(err.argument(), Some("limit"));
    assert_eq!(err.to_string(), "Value for 'limit' must be a single item (got [1, 2])");

    // Lists are rejected before any cleaner sees them, whatever the domain
    let registry = create_test_registry();
    let args = vec![
        Arg::basic().name("anything").build().unwrap(),
        Arg::boolean().name("enabled").build().unwrap(),
        Arg::string().name("name").build().unwrap(),
        Arg::date().name("date").build().unwrap(),
        Arg::time().name("time").build().unwrap(),
        Arg::datetime().name("datetime").build().unwrap(),
        Arg::model_instance()
            .name("url")
            .model(registry.get("links.Link").unwrap())
            .build()
            .unwrap(),
        Arg::flag().name("loud").build().unwrap(),
    ];
    let lists = vec![
        Value::List(vec![]),
        Value::List(vec![Value::from("a")]),
        Value::List(vec![date(), time(), datetime(), link(&registry, 1)]),
    ];
    for arg in &args {
        for list in &lists {
            let err = arg.base_clean(list.clone()).unwrap_err();
            assert!(err.is_validation(), "{} accepted a list", arg.type_name());
            assert!(err.to_string().contains("must be a single item"));
        }
    }
}

#[test]
fn test_null_bypass_never_invokes_cleaner() {
    let counter = CountingCleaner::new();
    let nullable = Arg::custom(Arc::new(counter.clone()))
        .name("maybe")
        .null()
        .build()
        .unwrap();

    assert_eq!(nullable.base_clean(Value::Empty).unwrap(), Value::Empty);
    assert_eq!(counter.calls(), 0);

    assert_eq!(nullable.base_clean(Value::from("x")).unwrap(), Value::from("x"));
    assert_eq!(counter.calls(), 1);

    let strict_counter = CountingCleaner::new();
    let strict = Arg::custom(Arc::new(strict_counter.clone()))
        .name("strict")
        .build()
        .unwrap();
    assert_eq!(strict.base_clean(Value::Empty).unwrap(), Value::Empty);
    assert_eq!(strict_counter.calls(), 1);
}

#[test]
fn test_empty_reaches_typed_cleaner_without_null() {
    let age = Arg::integer().name("age").build().unwrap();
    let err = age.base_clean(Value::Empty).unwrap_err();
    assert_eq!(err.to_string(), "Value for 'age' must be an integer (got <empty>)");

    let nullable_age = Arg::integer().name("age").null().build().unwrap();
    assert_eq!(nullable_age.base_clean(Value::Empty).unwrap(), Value::Empty);
}

#[test]
fn test_integer_cleaning() {
    let arg = Arg::integer().name("limit").build().unwrap();
    assert_eq!(arg.base_clean(Value::from(42)).unwrap(), Value::Integer(42));
    assert_eq!(arg.base_clean(Value::from("42")).unwrap(), Value::Integer(42));
    assert_eq!(arg.base_clean(Value::from(" -7 ")).unwrap(), Value::Integer(-7));
    assert_eq!(arg.base_clean(Value::Float(3.9)).unwrap(), Value::Integer(3));
    assert_eq!(arg.base_clean(Value::Float(-3.9)).unwrap(), Value::Integer(-3));

    let err = arg.base_clean(Value::from("abc")).unwrap_err();
    assert_eq!(err.to_string(), "Value for 'limit' must be an integer (got 'abc')");
    assert!(arg.base_clean(Value::Bool(true)).is_err());
    assert!(arg.base_clean(Value::Float(f64::NAN)).is_err());
    // 2^63 does not fit an i64 and must not saturate to i64::MAX
    let err = arg.base_clean(Value::Float(9_223_372_036_854_775_808.0)).unwrap_err();
    assert!(err.is_validation());
    assert!(arg.base_clean(date()).is_err());
}

#[test]
fn test_string_cleaning() {
    let arg = Arg::string().name("name").build().unwrap();
    assert_eq!(arg.base_clean(Value::from("Dave")).unwrap(), Value::from("Dave"));
    assert_eq!(arg.base_clean(Value::from("")).unwrap(), Value::from(""));

    let err = arg.base_clean(Value::from(5)).unwrap_err();
    assert_eq!(err.to_string(), "Value for 'name' must be a string (got 5)");
}

#[test]
fn test_temporal_cleaning() {
    let date_arg = Arg::date().name("date").build().unwrap();
    let time_arg = Arg::time().name("time").build().unwrap();
    let datetime_arg = Arg::datetime().name("datetime").build().unwrap();

    assert_eq!(date_arg.base_clean(date()).unwrap(), date());
    assert_eq!(time_arg.base_clean(time()).unwrap(), time());
    assert_eq!(datetime_arg.base_clean(datetime()).unwrap(), datetime());

    // A date-time is not a pure date, and a date is not a date-time
    let err = date_arg.base_clean(datetime()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Value for 'date' must be a date (got 2024-03-01 12:30:00)"
    );
    assert!(datetime_arg.base_clean(date()).is_err());
    assert!(time_arg.base_clean(Value::from("12:30:00")).is_err());
}

#[test]
fn test_model_instance_cleaning() {
    let mut registry = create_test_registry();
    let link_class = registry.get("links.Link").unwrap();
    let arg = Arg::model_instance()
        .name("url")
        .model(link_class.clone())
        .build()
        .unwrap();

    let link = link(&registry, 1);
    assert_eq!(arg.base_clean(link.clone()).unwrap(), link);

    let featured = Value::Model(
        ModelInstance::new(registry.get("links.FeaturedLink").unwrap()).with_pk(2),
    );
    assert_eq!(arg.base_clean(featured.clone()).unwrap(), featured);

    let user = Value::Model(ModelInstance::new(registry.get("auth.User").unwrap()).with_pk(7));
    let err = arg.base_clean(user).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Value for 'url' must be an instance of links.Link (got <User: User object (7)>)"
    );

    let err = arg.base_clean(Value::from("http://example.com")).unwrap_err();
    assert!(err.is_validation());

    // Subclasses registered after the argument was declared still match
    let other = registry.register("links.Other", &["links.Link"]).unwrap();
    assert!(arg
        .base_clean(Value::Model(ModelInstance::new(other)))
        .is_ok());
}

#[test]
fn test_cleaning_is_idempotent() {
    let registry = create_test_registry();
    let cases = vec![
        (Arg::integer().build().unwrap(), Value::from("12")),
        (Arg::string().build().unwrap(), Value::from("x")),
        (Arg::date().build().unwrap(), date()),
        (Arg::time().build().unwrap(), time()),
        (Arg::datetime().build().unwrap(), datetime()),
        (
            Arg::model_instance()
                .model(registry.get("links.Link").unwrap())
                .build()
                .unwrap(),
            link(&registry, 3),
        ),
    ];
    for (arg, value) in cases {
        let once = arg.base_clean(value).unwrap();
        let twice = arg.base_clean(once.clone()).unwrap();
        assert_eq!(once, twice, "{} cleaning should be idempotent", arg.type_name());
    }
}

#[test]
fn test_multi_cleans_each_item_in_order() {
    let arg = Arg::integer().name("ids").multi().null().build().unwrap();
    let cleaned = arg
        .base_clean(Value::List(vec![
            Value::from("3"),
            Value::Empty,
            Value::from(1),
        ]))
        .unwrap();
    assert_eq!(
        cleaned,
        Value::List(vec![Value::Integer(3), Value::Empty, Value::Integer(1)])
    );

    let err = arg
        .base_clean(Value::List(vec![Value::from(1), Value::from("x")]))
        .unwrap_err();
    assert_eq!(err.to_string(), "Value for 'ids' must be an integer (got 'x')");

    let nested = Value::List(vec![Value::List(vec![Value::from(1)])]);
    assert!(arg.base_clean(nested).is_err());

    // A single value is still accepted by a multi argument
    assert_eq!(arg.base_clean(Value::from("4")).unwrap(), Value::Integer(4));
}

#[test]
fn test_declaration_errors_are_configuration_errors() {
    let cases = vec![
        Arg::integer().required().default(1).build(),
        Arg::model_instance().build(),
        Arg::integer()
            .model(ModelClass::new("links.Link").unwrap())
            .build(),
        Arg::flag().positional().build(),
        Arg::flag().multi().build(),
        Arg::flag().default(true).build(),
        Arg::flag().required().build(),
        Arg::integer().flag().build(),
    ];
    for result in cases {
        let err = result.unwrap_err();
        assert!(err.is_configuration(), "expected configuration error, got {}", err);
        assert_eq!(err.code(), TagErrorCode::ConfigurationError);
    }

    assert!(ModelClass::new("NotALabel").unwrap_err().is_configuration());
}

#[test]
fn test_accepted_option_combinations() {
    let flag = Arg::flag().build().unwrap();
    assert!(flag.is_flag());
    assert!(!flag.is_required());
    assert_eq!(flag.type_name(), "boolean");

    // null together with a default only logs a warning
    let arg = Arg::integer().default(1).null().build().unwrap();
    assert!(arg.is_null());
    assert_eq!(arg.default_value(), Some(&Value::Integer(1)));

    let positional = Arg::integer().name("limit").positional().build().unwrap();
    assert!(positional.is_required());
    let optional = Arg::integer().name("limit").positional().optional().build().unwrap();
    assert!(!optional.is_required());
    let defaulted = Arg::integer().name("limit").positional().default(3).build().unwrap();
    assert!(!defaulted.is_required());
}
