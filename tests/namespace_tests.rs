//! Namespace registration, lookup and introspection against the process-default store

mod common;

use catalogue::registry::{self, Key, Namespace, Registrant, Store};
use catalogue::{registrant, CatalogueError, RegistryError};
use common::{lock_global_registry, remainder, remainders};
use std::path::Path;

type Tokenizer = fn(&str) -> Vec<String>;

fn whitespace_tokenizer(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}

fn char_tokenizer(text: &str) -> Vec<String> {
    text.chars().map(String::from).collect()
}

#[test]
fn test_create_single_namespace() {
    let _guard = lock_global_registry();

    let test_registry = registry::create(["test"], false).unwrap();
    assert!(!registry::check_exists(&["test"]));

    let registered = test_registry
        .register("a", whitespace_tokenizer as Tokenizer)
        .unwrap();
    assert_eq!(registered("x y"), vec!["x", "y"]);
    assert!(registry::check_exists(&["test", "a"]));

    let found = test_registry.get("a").unwrap();
    assert_eq!(found.downcast_ref::<Tokenizer>().unwrap()("x y"), vec!["x", "y"]);
    assert!(test_registry.contains("a"));
    assert!(!test_registry.contains("b"));
    assert_eq!(Store::global().len(), 1);
}

#[test]
fn test_create_multi_namespace() {
    let _guard = lock_global_registry();

    let test_registry = registry::create(["x", "y", "z"], false).unwrap();
    test_registry
        .decorator("a")
        .unwrap()
        .apply(char_tokenizer as Tokenizer);
    assert!(registry::check_exists(&["x", "y", "z", "a"]));
    assert!(!registry::check_exists(&["x", "y", "a"]));

    let all = test_registry.get_all();
    assert_eq!(remainders(&all), vec![remainder(&["a"])]);
}

#[test]
fn test_handles_for_same_prefix_are_interchangeable() {
    let _guard = lock_global_registry();

    let first = registry::create(["shared", "ns"], false).unwrap();
    let second = registry::create(["shared", "ns"], false).unwrap();
    let registered = first
        .register_registrant("value", Registrant::new(99u32))
        .unwrap();

    assert!(second.get("value").unwrap().ptr_eq(&registered));
}

#[test]
fn test_get_missing_name() {
    let _guard = lock_global_registry();

    let test_registry = registry::create(["x", "y"], false).unwrap();
    test_registry.register("present", 1u8).unwrap();

    let err = test_registry.get("z").unwrap_err();
    assert!(matches!(err, RegistryError::NameNotFound { .. }));
    assert_eq!(err.missing(), "z");
    let message = err.to_string();
    assert!(message.contains("x -> y"), "{message}");
    assert!(message.contains("Available names: present"), "{message}");

    let wrapped: CatalogueError = err.into();
    assert!(wrapped.is_registry_error());
}

#[test]
fn test_decorator_takes_exactly_one_name() {
    let _guard = lock_global_registry();

    let test_registry = registry::create(["test"], false).unwrap();
    let err = test_registry.decorator_for(["x", "y"]).unwrap_err();
    assert!(matches!(err, CatalogueError::Arity { expected: 1, given: 2 }));
    assert!(!err.is_registry_error());
    assert!(Store::global().is_empty());
}

#[test]
fn test_empty_names_are_rejected() {
    assert!(matches!(
        registry::create(Vec::<String>::new(), false),
        Err(CatalogueError::InvalidKey { .. })
    ));
    assert!(matches!(
        Namespace::new(["ok", ""]),
        Err(CatalogueError::InvalidKey { .. })
    ));
}

#[test]
fn test_get_all_keeps_nested_remainders() {
    let _guard = lock_global_registry();

    let parent = registry::create(["pipeline"], false).unwrap();
    let child = registry::create(["pipeline", "components"], false).unwrap();
    parent.register("tagger", "tagger").unwrap();
    child.register("parser", "parser").unwrap();

    let all = parent.get_all();
    assert_eq!(
        remainders(&all),
        vec![remainder(&["components", "parser"]), remainder(&["tagger"])]
    );
    assert_eq!(remainders(&child.get_all()), vec![remainder(&["parser"])]);
}

#[test]
fn test_get_all_does_not_merge_dotted_and_nested_names() {
    let _guard = lock_global_registry();

    let ns = registry::create(["a"], false).unwrap();
    ns.register("c.d", "leaf").unwrap();
    Store::global().set(Key::new(["a", "c", "d"]).unwrap(), Registrant::new("nested"));
    Store::global().set(Key::new(["a"]).unwrap(), Registrant::new("root"));

    let all = ns.get_all();
    assert_eq!(all.len(), Store::global().get_all(ns.prefix()).len());
    assert_eq!(all.len(), 3);
    assert_eq!(all[&remainder(&["c.d"])].downcast_ref::<&str>(), Some(&"leaf"));
    assert_eq!(all[&remainder(&["c", "d"])].downcast_ref::<&str>(), Some(&"nested"));
    assert_eq!(all[&remainder(&[])].downcast_ref::<&str>(), Some(&"root"));
}

#[test]
fn test_find() {
    let _guard = lock_global_registry();

    let test_registry = registry::create(["test_find"], false).unwrap();
    let line = line!() + 2;
    let registered = test_registry
        .register_registrant("a", registrant!(whitespace_tokenizer as Tokenizer, doc = "  Split text on whitespace.\n"))
        .unwrap();
    assert!(registered.is::<Tokenizer>());

    let info = test_registry.find("a").unwrap();
    assert_eq!(info.module.as_deref(), Some(module_path!()));
    assert_eq!(info.line_no, Some(line));
    let file = info.file.unwrap();
    assert!(file.is_absolute());
    assert_eq!(file, Path::new(env!("CARGO_MANIFEST_DIR")).join(file!()));
    assert_eq!(info.docstring.as_deref(), Some("Split text on whitespace."));
    assert!(info.type_name.contains("fn("));

    assert!(matches!(
        test_registry.find("b"),
        Err(RegistryError::NameNotFound { .. })
    ));
}

#[test]
fn test_find_without_origin_capture() {
    let _guard = lock_global_registry();

    let test_registry = registry::create(["test_find_plain"], false).unwrap();
    let registered = test_registry
        .register_registrant("plain", Registrant::new(3u16))
        .unwrap();
    assert!(registered.origin().file.is_some());

    let info = test_registry.find("plain").unwrap();
    assert_eq!(info.module, None);
    assert_eq!(info.docstring, None);
    assert_eq!(info.line_no, registered.origin().line_no);
}

#[test]
fn test_find_after_plain_register_reports_compiler_path() {
    let _guard = lock_global_registry();

    let test_registry = registry::create(["test_find_register"], false).unwrap();
    let line = line!() + 1;
    test_registry.register("split", whitespace_tokenizer as Tokenizer).unwrap();

    let info = test_registry.find("split").unwrap();
    assert_eq!(info.line_no, Some(line));
    assert_eq!(info.file.as_deref(), Some(Path::new(file!())));
    assert_eq!(info.module, None);
}
