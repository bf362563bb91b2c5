use std::{path::Path, sync::Arc};

use testglob_config::{ConfigRegistry, ConfigSlot};
use tests::fixtures::*;

const PYTEST_INI: &str = "pytest.ini";
const PYPROJECT: &str = "pyproject.toml";

fn file<'a>(name: &'a str, source: &'a str) -> Option<(&'a Path, &'a str)> {
    Some((Path::new(name), source))
}

#[test]
fn first_load_reports_change() {
    let mut slot = ConfigSlot::new();
    assert!(slot.current().is_none());

    let source = pytest_ini("python_classes = Check*");
    assert!(slot.reload(file(PYTEST_INI, &source)));
    assert!(slot.current().unwrap().is_class("CheckThis"));
}

#[test]
fn unrelated_edits_are_not_changes() {
    _ = tracing_subscriber::fmt::try_init();

    let mut slot = ConfigSlot::new();
    assert!(slot.reload(file(
        PYTEST_INI,
        "[pytest]\npython_classes = Check*\naddopts = -q\n"
    )));
    let before = Arc::clone(slot.current().unwrap());

    assert!(!slot.reload(file(
        PYTEST_INI,
        "# touched\n[pytest]\naddopts = -ra\npython_classes = Check*\n"
    )));
    // The existing instance, and its compiled matchers, are kept.
    assert!(Arc::ptr_eq(&before, slot.current().unwrap()));
}

#[test]
fn edits_to_either_key_are_changes() {
    let mut slot = ConfigSlot::new();
    slot.reload(file(PYTEST_INI, &pytest_ini("python_classes = Check*")));

    assert!(slot.reload(file(
        PYTEST_INI,
        &pytest_ini("python_classes = Check*\npython_functions = check_*")
    )));
    assert!(slot.current().unwrap().is_function("check_a"));

    assert!(slot.reload(file(
        PYTEST_INI,
        &pytest_ini("python_classes = Suite*\npython_functions = check_*")
    )));
    assert!(slot.current().unwrap().is_class("SuiteA"));
}

#[test]
fn format_switch_with_same_values_is_not_a_change() {
    let mut slot = ConfigSlot::new();
    slot.reload(file(PYTEST_INI, &pytest_ini("python_classes = Check*")));
    assert!(!slot.reload(file(
        PYPROJECT,
        &pyproject_toml("python_classes = \"Check*\"")
    )));
}

#[test]
fn removal_and_broken_files() {
    _ = tracing_subscriber::fmt::try_init();

    let mut slot = ConfigSlot::new();
    assert!(slot.reload(file(PYTEST_INI, &pytest_ini("python_classes = Check*"))));

    // A file that fails to parse counts as no config at all.
    assert!(slot.reload(file(PYTEST_INI, "python_classes = Check*\n")));
    assert!(slot.current().is_none());

    assert!(slot.reload(file(PYTEST_INI, &pytest_ini("python_classes = Check*"))));
    assert!(slot.reload(None));
    assert!(slot.current().is_none());
    assert!(!slot.reload(None));
}

#[test]
fn config_without_keys_equals_no_config() {
    let mut slot = ConfigSlot::new();
    assert!(!slot.reload(file(PYTEST_INI, "[pytest]\naddopts = -q\n")));
    assert!(slot.current().is_none());

    assert!(!slot.reload(file("setup.cfg", "[tool:pytest]\npython_classes = X\n")));
}

#[test]
fn replace_directly() {
    let mut slot = ConfigSlot::new();
    assert!(slot.replace(Some(ini(&pytest_ini("python_functions = t_*")))));
    assert!(!slot.replace(Some(toml(&pyproject_toml(
        "python_functions = [\"t_*\"]"
    )))));
    assert!(slot.replace(None));
}

#[test]
fn registry_keeps_owners_apart() {
    let mut registry = ConfigRegistry::<String>::new();
    assert!(registry.is_empty());

    let a = pytest_ini("python_classes = Alpha*");
    let b = pyproject_toml("python_classes = \"Beta*\"");
    assert!(registry.reload("a".to_owned(), file(PYTEST_INI, &a)));
    assert!(registry.reload("b".to_owned(), file(PYPROJECT, &b)));
    assert!(!registry.reload("a".to_owned(), file(PYTEST_INI, &a)));
    assert_eq!(registry.len(), 2);

    assert!(registry.get("a").unwrap().is_class("AlphaOne"));
    assert!(!registry.get("a").unwrap().is_class("BetaOne"));
    assert!(registry.get("b").unwrap().is_class("BetaOne"));
    assert!(registry.get("c").is_none());

    let removed = registry.remove("a").unwrap();
    assert!(removed.is_class("AlphaTwo"));
    assert!(registry.get("a").is_none());
    assert_eq!(registry.iter().count(), 1);
}

#[test]
fn shared_across_threads() {
    let mut slot = ConfigSlot::new();
    slot.reload(file(PYTEST_INI, &pytest_ini("python_functions = spec_*")));
    let config = Arc::clone(slot.current().unwrap());

    let handles = (0..4)
        .map(|i| {
            let config = Arc::clone(&config);
            std::thread::spawn(move || config.is_function(&format!("spec_{i}")))
        })
        .collect::<Vec<_>>();

    for handle in handles {
        assert!(handle.join().unwrap());
    }
}
