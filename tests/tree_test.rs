//! Insertion and the degree bound.

use degtree::util::testing;
use degtree::{NodeId, Tree, TreeError};
use proptest::prelude::*;
use rstest::{fixture, rstest};

#[fixture]
fn tree() -> Tree {
    testing::init_test_setup();
    Tree::new(3, 1)
}

fn child_keys(tree: &Tree, idx: NodeId) -> Vec<i64> {
    tree[idx].children().iter().map(|&c| tree[c].key).collect()
}

// ============================================================
// Capacity rule
// ============================================================

#[rstest]
#[case(1, 1, 0)]
#[case(2, 2, 1)]
#[case(3, 3, 2)]
#[case(5, 5, 4)]
fn given_max_degree_when_filling_then_root_and_inner_limits_differ(
    #[case] max_degree: usize,
    #[case] root_limit: usize,
    #[case] inner_limit: usize,
) {
    let mut tree = Tree::new(max_degree, 0);
    let root = tree.root();
    let inner = tree.new_node(100);

    let mut accepted_root = 0;
    let mut accepted_inner = 0;
    for key in 1..=10 {
        let child = tree.new_node(key);
        if tree.insert(root, child).is_ok() {
            accepted_root += 1;
        }
        let child = tree.new_node(key);
        if tree.insert(inner, child).is_ok() {
            accepted_inner += 1;
        }
    }

    assert_eq!(accepted_root, root_limit);
    assert_eq!(accepted_inner, inner_limit);
    assert_eq!(tree.child_limit(root), root_limit);
    assert_eq!(tree.child_limit(inner), inner_limit);
}

#[rstest]
fn given_full_inner_node_when_inserting_then_fails_and_tree_is_unchanged(mut tree: Tree) {
    let parent = tree.new_node(3);
    let a = tree.new_node(4);
    let b = tree.new_node(5);
    tree.insert(parent, a).unwrap();
    tree.insert(parent, b).unwrap();
    tree.insert(tree.root(), parent).unwrap();
    let children_before = tree[parent].children().to_vec();
    let rendered_before = tree.render();
    let count_before = tree.node_count();

    let extra = tree.new_node(6);
    let result = tree.insert(parent, extra);

    assert_eq!(
        result,
        Err(TreeError::DegreeLimitExceeded {
            key: 3,
            children: 2,
            limit: 2
        })
    );
    assert_eq!(tree[parent].children(), children_before.as_slice());
    assert_eq!(tree.render(), rendered_before);
    // only the rejected child itself was allocated
    assert_eq!(tree.node_count(), count_before + 1);
}

#[rstest]
fn given_insert_when_chaining_then_parent_is_returned(mut tree: Tree) {
    let parent = tree.new_node(6);
    let a = tree.new_node(9);
    let b = tree.new_node(7);

    let returned = tree.insert(parent, a).unwrap();
    let returned = tree.insert(returned, b).unwrap();

    assert_eq!(returned, parent);
    assert_eq!(child_keys(&tree, parent), vec![9, 7]);
}

#[rstest]
fn given_several_inserts_when_reading_children_then_insertion_order_is_kept(mut tree: Tree) {
    let root = tree.root();
    for key in [30, 10, 20] {
        let child = tree.new_node(key);
        tree.insert(root, child).unwrap();
    }
    assert_eq!(child_keys(&tree, root), vec![30, 10, 20]);
}

// ============================================================
// Re-wrapping and stale handles
// ============================================================

#[rstest]
fn given_held_child_handle_when_sibling_inserted_then_handle_goes_stale(mut tree: Tree) {
    let root = tree.root();
    let first = tree.new_node(2);
    let grandchild = tree.new_node(4);
    tree.insert(first, grandchild).unwrap();
    tree.insert(root, first).unwrap();
    assert_eq!(tree[root].children(), &[first]);

    let second = tree.new_node(3);
    tree.insert(root, second).unwrap();

    let live_first = tree[root].children()[0];
    assert_ne!(live_first, first, "existing child must be re-wrapped");
    assert_eq!(tree[root].children()[1], second, "new child is appended as-is");

    // same key, and the grandchildren are shared rather than copied
    assert_eq!(tree[live_first].key, tree[first].key);
    assert_eq!(tree[live_first].children(), tree[first].children());
    assert_eq!(tree[live_first].children(), &[grandchild]);
}

#[rstest]
fn given_stale_handle_when_live_copy_changes_then_they_diverge(mut tree: Tree) {
    let root = tree.root();
    let first = tree.new_node(2);
    tree.insert(root, first).unwrap();
    let second = tree.new_node(3);
    tree.insert(root, second).unwrap();
    let live_first = tree[root].children()[0];

    // identical content: still structurally equal despite differing identity
    assert!(tree.structurally_eq(first, live_first));

    let grandchild = tree.new_node(5);
    tree.insert(live_first, grandchild).unwrap();

    assert!(!tree.structurally_eq(first, live_first));
    assert!(tree[first].is_leaf());
    assert_eq!(child_keys(&tree, live_first), vec![5]);
}

#[rstest]
fn given_stale_handle_when_inserting_through_it_then_live_tree_is_untouched(mut tree: Tree) {
    let root = tree.root();
    let first = tree.new_node(2);
    tree.insert(root, first).unwrap();
    let second = tree.new_node(3);
    tree.insert(root, second).unwrap();
    let before = tree.render();

    let orphan = tree.new_node(99);
    tree.insert(first, orphan).unwrap();

    assert_eq!(tree.render(), before);
    assert_eq!(child_keys(&tree, first), vec![99]);
}

#[rstest]
fn given_grandchild_handle_when_inserting_into_its_parent_then_old_grandchildren_go_stale(
    mut tree: Tree,
) {
    let parent = tree.new_node(3);
    let a = tree.new_node(4);
    tree.insert(parent, a).unwrap();
    tree.insert(tree.root(), parent).unwrap();

    let b = tree.new_node(5);
    tree.insert(parent, b).unwrap();

    assert_ne!(tree[parent].children()[0], a);
    assert_eq!(child_keys(&tree, parent), vec![4, 5]);
    // the root's own child keeps its identity: it was inserted into, not re-wrapped
    assert_eq!(tree[tree.root()].children(), &[parent]);
}

// ============================================================
// Root detection through structural equality
// ============================================================

#[rstest]
fn given_node_equal_to_root_when_inserting_then_root_limit_applies() {
    let mut tree = Tree::new(2, 1);
    let root = tree.root();
    let child = tree.new_node(2);
    tree.insert(root, child).unwrap();

    // same key and the very same child handles as the root
    let root_children = tree[root].children().to_vec();
    let twin = tree.new_node_with_children(1, &root_children);
    assert!(tree.is_root(twin));
    assert_eq!(tree.child_limit(twin), 2);

    let extra = tree.new_node(3);
    assert!(tree.insert(twin, extra).is_ok());

    // an equal-looking but separately built node is not the root
    let copy = tree.new_node(2);
    let lookalike = tree.new_node_with_children(1, &[copy]);
    assert!(!tree.is_root(lookalike));
    let extra = tree.new_node(4);
    assert!(tree.insert(lookalike, extra).is_err());
}

#[rstest]
fn given_detached_leaf_with_root_key_when_compared_then_equals_empty_root(mut tree: Tree) {
    let twin = tree.new_node(1);
    assert!(tree.is_root(twin));
    let other = tree.new_node(2);
    assert!(!tree.is_root(other));
}

// ============================================================
// Cycles
// ============================================================

#[rstest]
#[should_panic(expected = "would create a cycle")]
fn given_node_when_inserting_it_below_itself_then_panics(mut tree: Tree) {
    let root = tree.root();
    let _ = tree.insert(root, root);
}

#[rstest]
#[should_panic(expected = "would create a cycle")]
fn given_ancestor_when_inserting_it_below_descendant_then_panics(mut tree: Tree) {
    let root = tree.root();
    let parent = tree.new_node(2);
    tree.insert(root, parent).unwrap();
    let grandchild = tree.new_node(3);
    tree.insert(parent, grandchild).unwrap();

    let _ = tree.insert(grandchild, root);
}

#[rstest]
fn given_detached_subtree_when_inserting_elsewhere_then_no_cycle_is_reported(mut tree: Tree) {
    let root = tree.root();
    let parent = tree.new_node(2);
    let leaf = tree.new_node(3);
    tree.insert(parent, leaf).unwrap();

    assert_eq!(tree.insert(root, parent), Ok(root));
    assert_eq!(tree.leaf_keys(), vec![3]);
}

// ============================================================
// Invariants under arbitrary insertion sequences
// ============================================================

/// Each choice picks, among the live nodes in preorder, the parent of the
/// next fresh node.
fn parent_choices(max_len: usize) -> impl Strategy<Value = Vec<prop::sample::Index>> {
    prop::collection::vec(any::<prop::sample::Index>(), 0..max_len)
}

fn grow(max_degree: usize, choices: &[prop::sample::Index]) -> Tree {
    let mut tree = Tree::new(max_degree, 0);
    for (key, choice) in (1..).zip(choices) {
        let live: Vec<NodeId> = tree.iter().map(|(idx, _)| idx).collect();
        let parent = live[choice.index(live.len())];
        let child = tree.new_node(key);
        let _ = tree.insert(parent, child);
    }
    tree
}

proptest! {
    #[test]
    fn given_random_insertions_when_checking_then_capacity_invariant_holds(
        max_degree in 1usize..=6,
        choices in parent_choices(200),
    ) {
        let mut tree = Tree::new(max_degree, 0);

        for (key, choice) in (1..).zip(&choices) {
            let live: Vec<NodeId> = tree.iter().map(|(idx, _)| idx).collect();
            let parent = live[choice.index(live.len())];
            let before = tree[parent].children().to_vec();
            let child = tree.new_node(key);

            match tree.insert(parent, child) {
                Ok(returned) => {
                    prop_assert_eq!(returned, parent);
                }
                Err(TreeError::DegreeLimitExceeded { children, limit, .. }) => {
                    prop_assert_eq!(children, before.len());
                    prop_assert_eq!(limit, tree.child_limit(parent));
                    prop_assert_eq!(tree[parent].children(), before.as_slice());
                }
                Err(other) => {
                    prop_assert!(false, "unexpected error: {}", other);
                }
            }
            prop_assert_eq!(tree.check_capacity(), None);
        }

        let root = tree.root();
        for (idx, node) in tree.iter() {
            let bound = if idx == root { max_degree } else { max_degree - 1 };
            prop_assert!(node.children().len() <= bound);
        }
    }

    #[test]
    fn given_tree_when_checking_eligibility_then_matches_definition(
        max_degree in 2usize..=5,
        choices in parent_choices(60),
    ) {
        let tree = grow(max_degree, &choices);

        for (idx, node) in tree.iter() {
            let n = node.children().len() as i64;
            let expected = n == 0 || n <= max_degree as i64 - 2;
            prop_assert_eq!(tree.is_eligible(idx), expected, "node {}", node.key);
        }
    }
}

#[rstest]
fn given_built_tree_when_querying_then_helpers_agree(mut tree: Tree) {
    let root = tree.root();
    let a = tree.new_node(2);
    let b = tree.new_node(3);
    let c = tree.new_node(4);
    tree.insert(b, c).unwrap();
    tree.insert(root, a).unwrap();
    tree.insert(root, b).unwrap();

    assert_eq!(tree.depth(), 3);
    assert_eq!(tree.leaf_keys(), vec![2, 4]);
    assert_eq!(tree.find(3), Some(b));
    assert_eq!(tree.find(42), None);
    let keys: Vec<i64> = tree.iter().map(|(_, n)| n.key).collect();
    assert_eq!(keys, vec![1, 2, 3, 4]);
}
