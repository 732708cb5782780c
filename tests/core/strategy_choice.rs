use nfd_strategy_choice::core::error::NfdError;
use nfd_strategy_choice::core::name::Name;
use nfd_strategy_choice::core::strategy::Strategy;
use nfd_strategy_choice::core::strategy_choice::{StrategyChoice, StrategyTransition};
use nfd_strategy_choice::plugins::{best_route, broadcast};
use nfd_strategy_choice::subsystems;
use std::cell::RefCell;
use std::rc::Rc;

fn name(uri: &str) -> Name {
    uri.parse().unwrap()
}

fn best_route() -> Name {
    name(best_route::STRATEGY_NAME)
}

fn broadcast() -> Name {
    name(broadcast::STRATEGY_NAME)
}

fn table() -> StrategyChoice {
    subsystems::builtin_table(&best_route()).unwrap()
}

/// Every probe resolves; a name's effective strategy is its deepest assigned ancestor.
fn assert_resolves(table: &StrategyChoice, probes: &[(&str, &Name)]) {
    for (uri, expected) in probes {
        assert_eq!(
            table.find_effective_strategy(&name(uri)).name(),
            *expected,
            "effective strategy for {}",
            uri
        );
    }
}

#[test]
fn test_lookup_is_total_for_any_name() {
    let t = table();
    let br = best_route();
    assert_resolves(
        &t,
        &[("/", &br), ("/a", &br), ("/a/b/c/d/e/f", &br), ("/%00%FF", &br)],
    );
}

#[test]
fn test_longest_prefix_wins() {
    let mut t = table();
    let (br, bc) = (best_route(), broadcast());
    t.insert(&name("/a"), &bc).unwrap();
    t.insert(&name("/a/b/c"), &br).unwrap();

    assert_resolves(
        &t,
        &[
            ("/", &br),
            ("/a", &bc),
            ("/a/b", &bc),
            ("/a/b/c", &br),
            ("/a/b/c/d", &br),
            ("/ab", &br),
        ],
    );
}

#[test]
fn test_unset_restores_ancestor() {
    let mut t = table();
    let (br, bc) = (best_route(), broadcast());
    t.insert(&name("/a"), &bc).unwrap();
    t.insert(&name("/a/b"), &br).unwrap();

    assert!(t.erase(&name("/a/b")).unwrap());
    assert_resolves(&t, &[("/a/b", &bc), ("/a/b/x", &bc)]);

    assert!(t.erase(&name("/a")).unwrap());
    assert_resolves(&t, &[("/a/b", &br)]);
    assert_eq!(t.entries(), vec![(Name::root(), br)]);
}

#[test]
fn test_set_is_idempotent() {
    let mut t = table();
    let bc = broadcast();
    t.insert(&name("/a"), &bc).unwrap();
    let before = t.entries();
    t.insert(&name("/a"), &bc).unwrap();
    assert_eq!(t.entries(), before);
    assert_eq!(t.len(), 2);
}

#[test]
fn test_unknown_strategy_is_rejected_without_side_effects() {
    let mut t = table();
    let before = t.entries();
    let err = t
        .insert(&name("/a"), &name("/localhost/nfd/strategy/unknown"))
        .unwrap_err();
    assert!(matches!(err, NfdError::UnknownStrategy(_)));
    assert_eq!(t.entries(), before);
}

#[test]
fn test_replace_default_strategy() {
    let mut t = table();
    let bc = broadcast();
    t.set_default_strategy(&bc).unwrap();
    assert_eq!(t.get_default().name(), &bc);
    assert_eq!(t.get(&Name::root()), Some(&bc));
    assert!(matches!(t.erase(&Name::root()), Err(NfdError::CannotUnsetRoot)));
}

#[test]
fn test_duplicate_install_is_rejected() {
    let mut t = table();
    let err = t.install(broadcast::create(broadcast())).unwrap_err();
    assert!(matches!(err, NfdError::DuplicateStrategy(_)));
}

struct Recorder(Rc<RefCell<Vec<String>>>);

impl StrategyTransition for Recorder {
    fn on_strategy_change(&mut self, scope: &Name, old: &dyn Strategy, new: &dyn Strategy) {
        self.0
            .borrow_mut()
            .push(format!("{} {} -> {}", scope, old.name(), new.name()));
    }
}

#[test]
fn test_transition_hook_skips_scopes_with_own_assignment() {
    let changes = Rc::new(RefCell::new(Vec::new()));
    let mut t = table();
    let (br, bc) = (best_route(), broadcast());
    t.insert(&name("/a/x"), &br).unwrap();
    t.insert(&name("/a/y/z"), &bc).unwrap();
    t.set_transition(Box::new(Recorder(changes.clone())));

    t.insert(&name("/a"), &bc).unwrap();

    let mut seen = changes.borrow().clone();
    seen.sort();
    assert_eq!(
        seen,
        vec![
            format!("/a {} -> {}", br, bc),
            format!("/a/y {} -> {}", br, bc),
        ]
    );
}
