use super::*;

use crate::arena::Place;
use crate::balance::tests::{in_order, naive_tree};
use proptest::prelude::*;
use std::collections::BTreeMap;

fn validate_dict<P: KeyPolicy<Key = i64>>(dict: &Dictionary<P>) {
    let keys = in_order(&dict.arena, dict.arena.root);
    assert!(
        keys.windows(2).all(|w| w[0] < w[1]),
        "in-order keys must be strictly increasing"
    );
    assert_eq!(keys.len(), dict.len(), "weight must track entry count");
    let mut stack = Vec::new();
    assert_eq!(dict.arena.tree_weight(dict.arena.root, &mut stack), dict.weight);
    let allowed = dict.config().max_deletions.saturating_mul(dict.weight);
    assert!(
        dict.weight <= 3 || dict.deletions <= allowed,
        "deletions since rebuild exceed the configured ratio"
    );
}

#[derive(Clone, Debug)]
enum Op {
    Insert(i64, u32),
    Remove(i64),
    Get(i64),
    Rebalance,
    Clear,
}

fn ops_strategy() -> impl Strategy<Value = Vec<Op>> {
    let key = 0_i64..512;
    let op = prop_oneof![
        50 => (key.clone(), any::<u32>()).prop_map(|(k, v)| Op::Insert(k, v)),
        30 => key.clone().prop_map(Op::Remove),
        18 => key.clone().prop_map(Op::Get),
        1 => Just(Op::Rebalance),
        1 => Just(Op::Clear),
    ];
    prop::collection::vec(op, 0..=2000)
}

fn run_equivalence<P: KeyPolicy<Key = i64, Value = u32>>(
    ops: Vec<Op>,
    config: Config,
) -> Result<(), TestCaseError> {
    let mut dict = Dictionary::<P>::with_config(config).unwrap();
    let mut m: BTreeMap<i64, u32> = BTreeMap::new();

    for op in ops {
        match op {
            Op::Insert(key, value) => {
                let r = dict.insert(&key, &value).unwrap();
                let stored = *m.entry(key).or_insert(value);
                prop_assert_eq!(dict.key(r), Some(&key));
                prop_assert_eq!(dict.value(r), Some(&stored));
            }
            Op::Remove(key) => {
                let removed = dict.remove(&key);
                prop_assert_eq!(removed, m.remove(&key).is_some());
                prop_assert!(dict.get(&key).is_none());
            }
            Op::Get(key) => {
                let got = dict.get(&key).and_then(|r| dict.value(r).copied());
                prop_assert_eq!(got, m.get(&key).copied());
            }
            Op::Rebalance => dict.rebalance(),
            Op::Clear => {
                dict.clear();
                m.clear();
            }
        }
        prop_assert_eq!(dict.len(), m.len());
    }

    validate_dict(&dict);
    for (k, v) in &m {
        let r = dict.get(k);
        prop_assert!(r.is_some());
        prop_assert_eq!(r.and_then(|r| dict.value(r)), Some(v));
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        max_shrink_iters: 20_000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_equivalence_default(ops in ops_strategy()) {
        run_equivalence::<DefaultPolicy<i64, u32>>(ops, Config::default())?;
    }

    #[test]
    fn prop_equivalence_less_only(ops in ops_strategy()) {
        run_equivalence::<LessOnly<i64, u32>>(ops, Config::default())?;
    }

    #[test]
    fn prop_equivalence_eager_rebuilds(ops in ops_strategy()) {
        let config = Config::default().with_balance(1.1).with_max_deletions(1);
        run_equivalence::<DefaultPolicy<i64, u32>>(ops, config)?;
    }

    #[test]
    fn prop_insert_only_height_bound(keys in prop::collection::vec(any::<i64>(), 1..=3000)) {
        let mut dict = Dictionary::<DefaultPolicy<i64, ()>>::new();
        for k in &keys {
            dict.insert(k, &()).unwrap();
        }
        let n = dict.len();
        let bound = DEFAULT_BALANCE * ((n + 1) as f64).log2() + 2.0;
        prop_assert!(dict.height() as f64 <= bound, "n={} height={}", n, dict.height());
    }

    #[test]
    fn prop_perfect_balance_keeps_content(
        keys in prop::collection::btree_set(0_u64..100_000, 0..300),
    ) {
        let odds = keys.iter().skip(1).step_by(2).rev();
        let shuffled: Vec<u64> = odds.chain(keys.iter().step_by(2)).copied().collect();
        let mut arena = naive_tree(&shuffled);
        let mut stack = Vec::new();
        let w = arena.tree_weight(arena.root, &mut stack);
        arena.perfect_balance(Place::Root, w);
        let sorted: Vec<u64> = keys.iter().copied().collect();
        prop_assert_eq!(in_order(&arena, arena.root), sorted);
        prop_assert_eq!(arena.height(arena.root), w.next_power_of_two().ilog2() as usize);
    }
}

#[test]
fn exhaustive_insert_and_remove_orders_small_set() {
    fn permutations(items: &[i64]) -> Vec<Vec<i64>> {
        if items.len() <= 1 {
            return vec![items.to_vec()];
        }
        let mut out = Vec::new();
        for i in 0..items.len() {
            let mut rest = items.to_vec();
            let head = rest.remove(i);
            for mut tail in permutations(&rest) {
                tail.insert(0, head);
                out.push(tail);
            }
        }
        out
    }

    let keys = [1, 2, 3, 4, 5, 6];
    let perms = permutations(&keys);
    for insert_order in &perms {
        for remove_order in perms.iter().step_by(37) {
            let mut dict = Dictionary::<DefaultPolicy<i64, i64>>::new();
            for &k in insert_order {
                dict.insert(&k, &(k * 10)).unwrap();
            }
            validate_dict(&dict);
            for (i, &k) in remove_order.iter().enumerate() {
                assert!(dict.remove(&k));
                validate_dict(&dict);
                for &rest in &remove_order[i + 1..] {
                    let r = dict.get(&rest).unwrap();
                    assert_eq!(dict.value(r), Some(&(rest * 10)));
                }
            }
            assert!(dict.is_empty());
        }
    }
}
