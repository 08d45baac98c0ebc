//! End-to-end scenarios against the public API, mirroring the external
//! command-driver behavior without going through the driver binary
//! itself.

use prbtree::PersistentRbTree;

#[test]
fn test_scenario_1_three_ascending_inserts() {
    let mut tree = PersistentRbTree::new();
    tree.insert(10);
    tree.insert(5);
    tree.insert(15);
    assert_eq!(
        tree.in_order(3).unwrap(),
        vec![(5, 1, 'R'), (10, 0, 'N'), (15, 1, 'R')]
    );
}

#[test]
fn test_insertion_rebalance_does_not_branch_on_uncle_color() {
    let mut tree = PersistentRbTree::new();
    for k in [10, 5, 15, 3] {
        tree.insert(k);
    }
    assert_eq!(
        tree.in_order(tree.current_version() as i64).unwrap(),
        vec![(3, 1, 'N'), (5, 0, 'N'), (10, 1, 'N'), (15, 2, 'R')]
    );
}

#[test]
fn test_scenario_2_successor_mid_tree() {
    let mut tree = PersistentRbTree::new();
    for k in [10, 5, 15, 3, 7] {
        tree.insert(k);
    }
    assert_eq!(tree.successor(6, 5).unwrap(), Some(7));
}

#[test]
fn test_scenario_3_successor_past_maximum_is_none() {
    let mut tree = PersistentRbTree::new();
    for k in [10, 5, 15, 3, 7] {
        tree.insert(k);
    }
    assert_eq!(tree.successor(18, 5).unwrap(), None);
}

#[test]
fn test_scenario_4_removal_is_invisible_to_earlier_versions() {
    let mut tree = PersistentRbTree::new();
    for k in [10, 5, 15, 3, 7] {
        tree.insert(k);
    }
    tree.remove(5).unwrap();
    let at_5: Vec<i64> = tree.in_order(5).unwrap().into_iter().map(|(k, _, _)| k).collect();
    let at_6: Vec<i64> = tree.in_order(6).unwrap().into_iter().map(|(k, _, _)| k).collect();
    assert_eq!(at_5, vec![3, 5, 7, 10, 15]);
    assert_eq!(at_6, vec![3, 7, 10, 15]);
}

#[test]
fn test_scenario_5_two_child_removal_then_reinsert() {
    let mut tree = PersistentRbTree::new();
    tree.insert(50);
    tree.insert(25);
    tree.insert(75);
    tree.remove(25).unwrap();
    tree.insert(60);

    let at = |v: i64| -> Vec<i64> {
        tree.in_order(v).unwrap().into_iter().map(|(k, _, _)| k).collect()
    };
    assert_eq!(at(2), vec![25, 50]);
    assert_eq!(at(4), vec![50, 75]);
    assert_eq!(at(5), vec![50, 60, 75]);
}

#[test]
fn test_scenario_6_second_insert_of_same_key_is_a_no_op() {
    let mut tree = PersistentRbTree::new();
    assert!(tree.insert(1));
    assert!(!tree.insert(1));
    assert_eq!(
        tree.in_order(tree.current_version() as i64).unwrap(),
        vec![(1, 0, 'N')]
    );
}

#[test]
fn test_law_successor_is_the_least_alive_key_strictly_greater() {
    let mut tree = PersistentRbTree::new();
    for k in [40, 20, 60, 10, 30, 50, 70] {
        tree.insert(k);
    }
    let v = tree.current_version() as i64;
    for probe in [0, 10, 15, 40, 69, 70, 71] {
        let expected = tree
            .in_order(v)
            .unwrap()
            .into_iter()
            .map(|(k, _, _)| k)
            .find(|&k| k > probe);
        assert_eq!(tree.successor(probe, v).unwrap(), expected);
    }
}

#[test]
fn test_law_in_order_is_strictly_ascending() {
    let mut tree = PersistentRbTree::new();
    for k in [9, 1, 8, 2, 7, 3, 6, 4, 5] {
        tree.insert(k);
    }
    let keys: Vec<i64> = tree
        .in_order(tree.current_version() as i64)
        .unwrap()
        .into_iter()
        .map(|(k, _, _)| k)
        .collect();
    let mut sorted = keys.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(keys, sorted);
}

#[test]
fn test_boundary_empty_and_single_element_trees() {
    let tree = PersistentRbTree::new();
    assert_eq!(tree.in_order(0).unwrap(), Vec::new());
    assert_eq!(tree.successor(0, 0).unwrap(), None);

    let mut single = PersistentRbTree::new();
    single.insert(42);
    assert_eq!(single.in_order(1).unwrap(), vec![(42, 0, 'N')]);
    assert_eq!(single.successor(42, 1).unwrap(), None);
    assert_eq!(single.successor(0, 1).unwrap(), Some(42));
}

#[test]
fn test_boundary_remove_of_root_and_of_absent_key() {
    let mut tree = PersistentRbTree::new();
    tree.insert(10);
    assert!(!tree.remove(999).unwrap());
    assert!(tree.remove(10).unwrap());
    assert_eq!(tree.in_order(tree.current_version() as i64).unwrap(), Vec::new());
}
