use nfd_strategy_choice::core::name::Name;
use nfd_strategy_choice::core::name_tree::NameTree;

fn name(uri: &str) -> Name {
    uri.parse().unwrap()
}

#[test]
fn test_insert_creates_intermediate_nodes() {
    let mut tree: NameTree<u32> = NameTree::new();
    let leaf = tree.insert(&name("/a/b/c"));

    assert_eq!(tree.len(), 4);
    assert_eq!(tree.prefix(leaf), Some(&name("/a/b/c")));
    let parent = tree.parent(leaf).unwrap();
    assert_eq!(tree.prefix(parent), Some(&name("/a/b")));
    assert!(tree.find(&name("/a")).is_some());
    assert!(tree.find(&name("/a/x")).is_none());

    // Inserting an existing prefix returns the same node.
    assert_eq!(tree.insert(&name("/a/b/c")), leaf);
    assert_eq!(tree.len(), 4);
}

#[test]
fn test_longest_prefix_match_with_payload_filter() {
    let mut tree: NameTree<&'static str> = NameTree::new();
    let a = tree.insert(&name("/a"));
    tree.set_payload(a, "a");
    tree.insert(&name("/a/b/c"));

    let deepest = tree.find_longest_prefix_match(&name("/a/b/c/d"));
    assert_eq!(tree.prefix(deepest), Some(&name("/a/b/c")));

    let assigned = tree
        .find_longest_prefix_match_with(&name("/a/b/c/d"), |payload| payload.is_some())
        .unwrap();
    assert_eq!(assigned, a);

    assert!(tree
        .find_longest_prefix_match_with(&name("/z"), |payload| payload.is_some())
        .is_none());
    assert_eq!(tree.find_longest_prefix_match(&name("/z")), tree.root());
}

#[test]
fn test_erase_if_empty_compacts_up_to_first_occupied_node() {
    let mut tree: NameTree<u32> = NameTree::new();
    let a = tree.insert(&name("/a"));
    tree.set_payload(a, 1);
    let leaf = tree.insert(&name("/a/b/c"));

    assert_eq!(tree.erase_if_empty(leaf), 2);
    assert!(!tree.contains(leaf));
    assert!(tree.contains(a));
    assert_eq!(tree.len(), 2);

    // Stale ids stay dead after their slot is reused.
    let reused = tree.insert(&name("/x"));
    assert!(tree.contains(reused));
    assert!(!tree.contains(leaf));
    assert_eq!(tree.payload(leaf), None);
}

#[test]
fn test_root_is_never_erased() {
    let mut tree: NameTree<u32> = NameTree::new();
    let root = tree.root();
    assert_eq!(tree.erase_if_empty(root), 0);
    assert!(tree.contains(root));
    assert_eq!(tree.prefix(root), Some(&Name::root()));
}

#[test]
fn test_descendants_where_stops_below_rejected_nodes() {
    let mut tree: NameTree<u32> = NameTree::new();
    let a = tree.insert(&name("/a"));
    let ab = tree.insert(&name("/a/b"));
    tree.set_payload(ab, 7);
    tree.insert(&name("/a/b/c"));
    tree.insert(&name("/a/d"));

    let mut seen: Vec<String> = tree
        .descendants_where(a, |_, payload| payload.is_none())
        .into_iter()
        .filter_map(|id| tree.prefix(id).map(|p| p.to_string()))
        .collect();
    seen.sort();
    assert_eq!(seen, vec!["/a", "/a/b", "/a/d"]);

    assert_eq!(tree.descendants(a).len(), 4);
}
