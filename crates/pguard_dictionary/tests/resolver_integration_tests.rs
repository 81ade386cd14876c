//! Integration tests for dictionary consolidation.

use std::collections::BTreeMap;

use pguard_dictionary::{
    resolve, Dictionary, DictionaryError, DictionaryResolver, ResolverOptions,
};
use tempfile::tempdir;

fn expected(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Earlier dictionaries sit higher in the stack than later ones.
#[test]
fn test_flattens_and_resolves_with_overrides() {
    let base = Dictionary::from_entries("base", [("FOO", "foo"), ("BAR", "{{FOO}} and bar")]);
    let overrides = Dictionary::from_entries(
        "overrides",
        [("BAZ", "{{FOO}} and {{BAR}} and baz"), ("FOO", "overridden foo")],
    );

    let consolidated = resolve(&[overrides, base]).unwrap();

    assert_eq!(
        consolidated.into_map(),
        expected(&[
            ("FOO", "overridden foo"),
            ("BAR", "overridden foo and bar"),
            ("BAZ", "overridden foo and overridden foo and bar and baz"),
        ])
    );
}

#[test]
fn test_layer_order_decides_winner() {
    let first = Dictionary::from_entries("first", [("KEY", "first")]);
    let second = Dictionary::from_entries("second", [("KEY", "second")]);
    let third = Dictionary::from_entries("third", [("KEY", "third")]);

    let consolidated = resolve(&[first.clone(), second.clone(), third.clone()]).unwrap();
    assert_eq!(consolidated.get("KEY"), Some("first"));

    let consolidated = resolve(&[third.clone(), first.clone(), second.clone()]).unwrap();
    assert_eq!(consolidated.get("KEY"), Some("third"));

    let consolidated = resolve(&[second, third, first]).unwrap();
    assert_eq!(consolidated.get("KEY"), Some("second"));
}

#[test]
fn test_handles_values_with_dollar_characters() {
    let dictionary =
        Dictionary::from_entries("dict", [("FOO", "value-with-$"), ("BAR", "{{FOO}} and bar")]);

    let consolidated = resolve(&[dictionary]).unwrap();

    assert_eq!(
        consolidated.into_map(),
        expected(&[("FOO", "value-with-$"), ("BAR", "value-with-$ and bar")])
    );
}

#[test]
fn test_backreference_syntax_is_not_interpreted() {
    let dictionary =
        Dictionary::from_entries("dict", [("FOO", "$1${1}$$\\1"), ("BAR", "<{{FOO}}>")]);

    let consolidated = resolve(&[dictionary]).unwrap();
    assert_eq!(consolidated.get("BAR"), Some("<$1${1}$$\\1>"));
}

#[test]
fn test_plain_values_are_unchanged() {
    let dictionary = Dictionary::from_entries(
        "dict",
        [("HOST", "db.internal"), ("PORT", "5432"), ("BRACES", "{not a placeholder}")],
    );

    let consolidated = resolve(&[dictionary.clone()]).unwrap();
    assert_eq!(consolidated.into_map(), dictionary.entries);
}

#[test]
fn test_resolution_is_idempotent() {
    let base = Dictionary::from_entries(
        "base",
        [("A", "a"), ("B", "{{A}}/b"), ("C", "{{B}}/{{A}}/c")],
    );

    let once = resolve(&[base]).unwrap();
    let again = resolve(&[Dictionary::from_entries("resolved", once.clone().into_map())]).unwrap();

    assert_eq!(once, again);
}

#[test]
fn test_empty_stack_resolves_to_empty_dictionary() {
    let consolidated = resolve(&[]).unwrap();
    assert!(consolidated.is_empty());

    let consolidated = resolve(&[Dictionary::new("empty")]).unwrap();
    assert!(consolidated.is_empty());
}

#[test]
fn test_self_reference_fails() {
    let dictionary = Dictionary::from_entries(
        "dict",
        [("FOO", "{{FOO}}"), ("BAR", "bar"), ("BAZ", "{{BAR}}")],
    );

    let err = resolve(&[dictionary]).unwrap_err();
    assert!(err.is_cyclic());
    assert_eq!(err.to_string(), "Dictionary entry 'FOO' refers to itself");
}

#[test]
fn test_transitive_cycle_fails() {
    let dictionary = Dictionary::from_entries(
        "dict",
        [("FOO", "{{BAR}}"), ("BAR", "{{BAZ}}"), ("BAZ", "{{FOO}}")],
    );

    let err = resolve(&[dictionary]).unwrap_err();
    assert!(err.is_cyclic(), "unexpected error: {err}");
}

#[test]
fn test_four_link_chain_across_layers_fails() {
    // FOO -> BAR -> BOZ -> FOZ -> FOO
    let one = Dictionary::from_entries(
        "one",
        [
            ("FOO", "{{BAZ}} and {{BAR}}"),
            ("BAR", "{{BAZ}} and {{BOZ}}"),
            ("BAZ", "baz"),
            ("BOZ", "{{BAZ}} and {{FOZ}}"),
        ],
    );
    let two = Dictionary::from_entries("two", [("FOZ", "foz and {{FOO}}")]);

    let err = resolve(&[one, two]).unwrap_err();
    assert!(err.is_cyclic(), "unexpected error: {err}");
}

#[test]
fn test_missing_reference_names_key() {
    let dictionary =
        Dictionary::from_entries("dict", [("FOO", "foo"), ("BAR", "{{QUX}} and bar")]);

    let err = resolve(&[dictionary]).unwrap_err();
    match err {
        DictionaryError::MissingReference { value, placeholder } => {
            assert_eq!(value, "{{QUX}} and bar");
            assert_eq!(placeholder, "QUX");
        }
        other => panic!("expected missing reference, got {other:?}"),
    }
}

#[test]
fn test_placeholder_keys_are_case_sensitive() {
    let dictionary = Dictionary::from_entries("dict", [("foo", "lower"), ("BAR", "{{FOO}}")]);

    let err = resolve(&[dictionary]).unwrap_err();
    assert!(err.is_missing_reference());
}

#[test]
fn test_inputs_are_not_modified() {
    let layers = vec![Dictionary::from_entries(
        "dict",
        [("FOO", "foo"), ("BAR", "{{FOO}}")],
    )];
    let before = layers.clone();

    resolve(&layers).unwrap();
    assert_eq!(layers, before);
}

#[test]
fn test_resolver_with_options() {
    let dictionary = Dictionary::from_entries(
        "dict",
        [("A", "a"), ("DEEP", "{{A}}{{A}}{{A}}{{A}}")],
    );

    let tight = DictionaryResolver::with_options(ResolverOptions::default().with_max_passes(2));
    let err = tight.resolve(&[dictionary.clone()]).unwrap_err();
    assert!(matches!(err, DictionaryError::PassLimitExceeded { passes: 2, .. }));

    let consolidated = DictionaryResolver::new().resolve(&[dictionary]).unwrap();
    assert_eq!(consolidated.get("DEEP"), Some("aaaa"));
}

#[test]
fn test_value_with_more_placeholders_than_default_floor() {
    let wide = "{{A}}".repeat(1100);
    let dictionary = Dictionary::from_entries("dict", [("A", "a"), ("V", wide.as_str())]);

    let consolidated = resolve(&[dictionary]).unwrap();
    assert_eq!(consolidated.get("V"), Some("a".repeat(1100).as_str()));
}

#[test]
fn test_braces_joined_across_placeholders_resolve() {
    // X and Y refer to each other as written, but once P inserts "{" the
    // remainder of X reads as the placeholder "{Y"
    let joined = format!("{}{}", "{{E}}".repeat(6), "{{P}}{{Y}}");
    let dictionary = Dictionary::from_entries(
        "dict",
        [
            ("E", ""),
            ("P", "{"),
            ("{Y", "z"),
            ("Y", "{{X}}"),
            ("X", joined.as_str()),
        ],
    );

    let consolidated = resolve(&[dictionary]).unwrap();
    assert_eq!(consolidated.get("X"), Some("z"));
    assert_eq!(consolidated.get("Y"), Some("z"));
}

#[test]
fn test_growing_cycle_is_reported_with_path() {
    let dictionary = Dictionary::from_entries(
        "dict",
        [("A", "a{{B}}"), ("B", "b{{C}}"), ("C", "c{{A}}")],
    );

    match resolve(&[dictionary]).unwrap_err() {
        DictionaryError::CyclicReference { cycle } => {
            assert_eq!(cycle.first(), cycle.last());
            assert_eq!(cycle.len(), 4);
        }
        other => panic!("expected cyclic reference, got {other:?}"),
    }
}

#[test]
fn test_resolve_dictionaries_from_files() {
    let dir = tempdir().unwrap();

    let base_path = dir.path().join("base.yaml");
    std::fs::write(&base_path, "entries:\n  HOST: base.example\n  URL: \"https://{{HOST}}/app\"\n")
        .unwrap();

    let prod_path = dir.path().join("prod.json");
    std::fs::write(&prod_path, r#"{"name": "production", "entries": {"HOST": "prod.example"}}"#)
        .unwrap();

    let layers = vec![
        Dictionary::from_file(&prod_path).unwrap(),
        Dictionary::from_file(&base_path).unwrap(),
    ];
    assert_eq!(layers[0].name, "production");
    assert_eq!(layers[1].name, "base");

    let consolidated = resolve(&layers).unwrap();
    assert_eq!(consolidated.get("URL"), Some("https://prod.example/app"));
}
