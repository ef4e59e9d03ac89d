use std::collections::BTreeSet;

use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use redblack::{
    GetTreeReadOnlyData, RedBlackTree, StackRedBlackTree, TreeNode, TreeReadOperations,
    TreeRemoveOperations, TreeWriteOperations, LLRB,
};

const SEED: u64 = 0x5EED_0042;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn shuffled(count: u64, seed: u64) -> Vec<u64> {
    let mut values: Vec<u64> = (0..count).collect();
    values.shuffle(&mut StdRng::seed_from_u64(seed));
    values
}

fn assert_height_bound<T, N>(tree: &T)
where
    T: GetTreeReadOnlyData<Node = N>,
    N: TreeNode<Value = u64>,
{
    let count: f64 = tree.len() as f64;
    assert!(
        tree.max_depth() as f64 <= 2.0 * (count + 1.0).log2(),
        "depth {} too large for {} items",
        tree.max_depth(),
        tree.len()
    );
}

fn insert_listed<T, N>(mut tree: T) -> anyhow::Result<()>
where
    T: GetTreeReadOnlyData<Node = N> + TreeWriteOperations<u64>,
    N: TreeNode<Value = u64>,
{
    for value in [5, 3, 8, 1, 4, 7, 9] {
        assert!(tree.insert(value));
    }
    assert_eq!(tree.to_list(), vec![1, 3, 4, 5, 7, 8, 9]);
    assert!(tree.check_invariant());
    tree.verify()?;
    Ok(())
}

#[test]
fn insert_returns_sorted_list() -> anyhow::Result<()> {
    init_logging();
    insert_listed(RedBlackTree::<u64>::new())?;
    insert_listed(StackRedBlackTree::<u64>::new())?;
    insert_listed(LLRB::<u64>::new())?;
    Ok(())
}

fn delete_middle<T, N>(mut tree: T) -> anyhow::Result<()>
where
    T: GetTreeReadOnlyData<Node = N> + TreeWriteOperations<u64> + TreeRemoveOperations<u64>,
    N: TreeNode<Value = u64>,
{
    for value in 0..30 {
        tree.insert(value);
    }
    assert_eq!(tree.remove(&15), Some(15));
    assert!(!tree.contains(&15));
    assert_eq!(tree.len(), 29);
    let expected: Vec<u64> = (0..30).filter(|value| *value != 15).collect();
    assert_eq!(tree.to_list(), expected);
    tree.verify()?;
    Ok(())
}

#[test]
fn delete_from_ascending_inserts() -> anyhow::Result<()> {
    init_logging();
    delete_middle(LLRB::<u64>::new())?;
    delete_middle(RedBlackTree::<u64>::new())?;
    Ok(())
}

fn single_item_delete_min<T, N>(mut tree: T) -> anyhow::Result<()>
where
    T: GetTreeReadOnlyData<Node = N> + TreeWriteOperations<u64> + TreeRemoveOperations<u64>,
    N: TreeNode<Value = u64>,
{
    tree.insert(42);
    assert_eq!(tree.remove_min(), Some(42));
    assert!(tree.is_empty());
    assert!(!tree.contains(&42));
    assert!(tree.to_list().is_empty());
    assert_eq!(tree.max_depth(), 0);
    tree.verify()?;

    // Underflow is a no-op.
    assert_eq!(tree.remove_min(), None);
    assert_eq!(tree.remove_max(), None);
    assert_eq!(tree.remove(&42), None);
    Ok(())
}

#[test]
fn delete_min_empties_single_item_tree() -> anyhow::Result<()> {
    init_logging();
    single_item_delete_min(LLRB::<u64>::new())?;
    single_item_delete_min(RedBlackTree::<u64>::new())?;
    Ok(())
}

fn drain_random<T, N>(mut tree: T, seed: u64) -> anyhow::Result<()>
where
    T: GetTreeReadOnlyData<Node = N> + TreeWriteOperations<u64> + TreeRemoveOperations<u64>,
    N: TreeNode<Value = u64>,
{
    let values: Vec<u64> = shuffled(500, seed);
    for value in values.iter() {
        tree.insert(*value);
    }
    tree.verify()?;
    assert_height_bound(&tree);

    let mut drained: Vec<u64> = Vec::with_capacity(values.len());
    while let Some(value) = tree.remove_min() {
        drained.push(value);
    }
    assert!(drained.windows(2).all(|pair| pair[0] <= pair[1]));
    let mut sorted: Vec<u64> = values;
    sorted.sort();
    assert_eq!(drained, sorted);
    assert!(tree.is_empty());
    Ok(())
}

#[test]
fn delete_min_drains_random_inserts() -> anyhow::Result<()> {
    init_logging();
    drain_random(LLRB::<u64>::new(), SEED)?;
    drain_random(RedBlackTree::<u64>::new(), SEED + 1)?;
    Ok(())
}

#[test]
fn delete_absent_is_noop() -> anyhow::Result<()> {
    init_logging();
    let mut tree: LLRB<u64> = LLRB::new();
    tree.insert(1);
    tree.insert(2);
    let before: Vec<u64> = tree.to_list();

    assert_eq!(tree.remove(&99), None);
    assert_eq!(tree.remove(&0), None);
    assert_eq!(tree.to_list(), before);
    assert_eq!(tree.len(), 2);
    tree.verify()?;
    Ok(())
}

fn reinsert_is_idempotent<T, N>(mut tree: T) -> anyhow::Result<()>
where
    T: GetTreeReadOnlyData<Node = N> + TreeWriteOperations<u64>,
    N: TreeNode<Value = u64>,
{
    for value in shuffled(100, SEED) {
        tree.insert(value);
    }
    let before: Vec<u64> = tree.to_list();
    for value in [0, 50, 99] {
        assert!(!tree.insert(value));
        assert_eq!(tree.to_list(), before);
        assert!(tree.check_invariant());
    }
    Ok(())
}

#[test]
fn duplicate_insert_is_idempotent() -> anyhow::Result<()> {
    init_logging();
    reinsert_is_idempotent(RedBlackTree::<u64>::new())?;
    reinsert_is_idempotent(StackRedBlackTree::<u64>::new())?;
    reinsert_is_idempotent(LLRB::<u64>::new())?;
    Ok(())
}

fn insert_then_delete<T, N>(mut tree: T) -> anyhow::Result<()>
where
    T: GetTreeReadOnlyData<Node = N> + TreeWriteOperations<u64> + TreeRemoveOperations<u64>,
    N: TreeNode<Value = u64>,
{
    for value in [0, 17, u64::MAX] {
        tree.insert(value);
        assert_eq!(tree.remove(&value), Some(value));
        assert!(tree.is_empty());
        assert!(!tree.contains(&value));
        tree.verify()?;
    }
    Ok(())
}

#[test]
fn insert_then_delete_round_trip() -> anyhow::Result<()> {
    init_logging();
    insert_then_delete(LLRB::<u64>::new())?;
    insert_then_delete(RedBlackTree::<u64>::new())?;
    Ok(())
}

#[test]
fn height_stays_logarithmic() -> anyhow::Result<()> {
    init_logging();
    for (round, count) in [1u64, 2, 3, 10, 100, 1_000].into_iter().enumerate() {
        let seed: u64 = SEED + round as u64;
        let mut parent_tree: RedBlackTree<u64> = RedBlackTree::new();
        let mut stack_tree: StackRedBlackTree<u64> = StackRedBlackTree::new();
        let mut llrb: LLRB<u64> = LLRB::new();
        for value in shuffled(count, seed) {
            parent_tree.insert(value);
            stack_tree.insert(value);
            llrb.insert(value);
        }
        assert_height_bound(&parent_tree);
        assert_height_bound(&stack_tree);
        assert_height_bound(&llrb);

        // Ascending order is the worst case for an unbalanced tree.
        let mut ascending: LLRB<u64> = LLRB::new();
        for value in 0..count {
            ascending.insert(value);
        }
        assert_height_bound(&ascending);
        ascending.verify()?;
    }
    Ok(())
}

#[test]
fn stack_and_parent_engines_build_same_shape() -> anyhow::Result<()> {
    init_logging();
    let mut parent_tree: RedBlackTree<u64> = RedBlackTree::new();
    let mut stack_tree: StackRedBlackTree<u64> = StackRedBlackTree::new();
    let mut rng: StdRng = StdRng::seed_from_u64(SEED);
    for _ in 0..2_000 {
        let value: u64 = rng.gen_range(0..500);
        assert_eq!(parent_tree.insert(value), stack_tree.insert(value));
    }
    parent_tree.verify()?;
    stack_tree.verify()?;
    assert_eq!(parent_tree.dump(), stack_tree.dump());
    Ok(())
}

fn random_ops_match_model<T, N>(mut tree: T, seed: u64) -> anyhow::Result<()>
where
    T: GetTreeReadOnlyData<Node = N> + TreeWriteOperations<u64> + TreeRemoveOperations<u64>,
    N: TreeNode<Value = u64>,
{
    let mut model: BTreeSet<u64> = BTreeSet::new();
    let mut rng: StdRng = StdRng::seed_from_u64(seed);
    for _ in 0..3_000 {
        let value: u64 = rng.gen_range(0..256);
        match rng.gen_range(0..5) {
            0 | 1 => assert_eq!(tree.insert(value), model.insert(value)),
            2 => assert_eq!(tree.remove(&value), model.take(&value)),
            3 => assert_eq!(tree.remove_min(), model.pop_first()),
            _ => assert_eq!(tree.remove_max(), model.pop_last()),
        }
        assert_eq!(tree.len(), model.len());
        if !model.is_empty() {
            assert_height_bound(&tree);
        }
    }
    tree.verify()?;
    assert_eq!(tree.to_list(), model.into_iter().collect::<Vec<u64>>());
    Ok(())
}

#[test]
fn random_operations_match_btree_set() -> anyhow::Result<()> {
    init_logging();
    random_ops_match_model(LLRB::<u64>::new(), SEED)?;
    random_ops_match_model(RedBlackTree::<u64>::new(), SEED)?;
    Ok(())
}

#[test]
fn iter_and_extremes() -> anyhow::Result<()> {
    init_logging();
    let mut tree: RedBlackTree<String> = RedBlackTree::new();
    for word in ["pear", "apple", "fig", "kiwi"] {
        tree.insert(word.to_string());
    }
    assert_eq!(tree.min().map(String::as_str), Some("apple"));
    assert_eq!(tree.max().map(String::as_str), Some("pear"));
    let words: Vec<&str> = tree.iter().map(String::as_str).collect();
    assert_eq!(words, vec!["apple", "fig", "kiwi", "pear"]);
    assert!(tree.contains(&"kiwi".to_string()));
    tree.verify()?;
    Ok(())
}
