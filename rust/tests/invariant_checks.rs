//! Randomized differential testing against `BTreeMap<K, Vec<V>>`, with the
//! full structural invariant check after every mutation.
//!
//! Keys are drawn from a small range so duplicate runs grow long enough to
//! span leaves and force null index keys at every order under test.

use std::collections::BTreeMap;

use bplusmulti::BPlusMultiMap;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Reference model: per key, a stack of values with the newest on top.
#[derive(Default)]
struct Model {
    entries: BTreeMap<i32, Vec<i32>>,
}

impl Model {
    fn insert(&mut self, key: i32, value: i32) {
        self.entries.entry(key).or_default().push(value);
    }

    fn search(&self, key: i32) -> Option<&i32> {
        self.entries.get(&key).and_then(|stack| stack.last())
    }

    fn delete(&mut self, key: i32) -> Option<i32> {
        let stack = self.entries.get_mut(&key)?;
        let value = stack.pop();
        if stack.is_empty() {
            self.entries.remove(&key);
        }
        value
    }

    fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// Expected iteration order: keys ascending, newest value first within
    /// each key.
    fn items(&self) -> Vec<(i32, i32)> {
        self.entries
            .iter()
            .flat_map(|(k, stack)| stack.iter().rev().map(move |v| (*k, *v)))
            .collect()
    }
}

fn compare_full(tree: &BPlusMultiMap<i32, i32>, model: &Model) {
    assert_eq!(tree.len(), model.len());
    let items: Vec<(i32, i32)> = tree.items().map(|(k, v)| (*k, *v)).collect();
    assert_eq!(items, model.items());
}

fn run_workload(order: usize, seed: u64, ops: usize, key_range: i32, delete_bias: bool) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut tree = BPlusMultiMap::new(order).unwrap();
    let mut model = Model::default();
    let mut counter = 0;

    for _ in 0..ops {
        let key = rng.gen_range(0..key_range);
        let delete_threshold = if delete_bias { 60 } else { 40 };
        match rng.gen_range(0..100) {
            p if p < delete_threshold => {
                assert_eq!(
                    tree.delete(&key),
                    model.delete(key),
                    "delete {} diverged (order {}, seed {})",
                    key,
                    order,
                    seed
                );
            }
            p if p < delete_threshold + 10 => {
                assert_eq!(tree.search(&key), model.search(key));
            }
            _ => {
                counter += 1;
                tree.insert(key, counter);
                model.insert(key, counter);
            }
        }
        tree.check_invariants_detailed().unwrap_or_else(|violation| {
            panic!(
                "invariant broken (order {}, seed {}): {}\n{}",
                order,
                seed,
                violation,
                tree.render_levels()
            )
        });
    }
    compare_full(&tree, &model);

    // Drain everything that is left.
    for key in 0..key_range {
        while tree.delete(&key).is_some() {
            model.delete(key);
            tree.check_invariants_detailed().unwrap();
        }
        assert_eq!(model.delete(key), None);
    }
    assert!(tree.is_empty());
}

#[test]
fn random_ops_small_key_range() {
    for order in [3, 4, 5, 8] {
        for seed in [1, 7, 42] {
            run_workload(order, seed, 1500, 8, false);
        }
    }
}

#[test]
fn random_ops_wide_key_range() {
    for order in [3, 4, 8] {
        run_workload(order, 99, 2000, 200, false);
    }
}

#[test]
fn random_ops_delete_heavy() {
    for order in [3, 5] {
        for seed in [11, 23] {
            run_workload(order, seed, 1500, 10, true);
        }
    }
}

#[test]
fn single_key_stress() {
    // Every entry shares one key, so almost every node carries a null
    // index key.
    let mut tree = BPlusMultiMap::new(3).unwrap();
    let mut model = Model::default();
    let mut rng = StdRng::seed_from_u64(5);

    for i in 0..600 {
        if rng.gen_bool(0.45) {
            assert_eq!(tree.delete(&0), model.delete(0));
        } else {
            tree.insert(0, i);
            model.insert(0, i);
        }
        tree.check_invariants_detailed().unwrap();
    }
    compare_full(&tree, &model);
}
