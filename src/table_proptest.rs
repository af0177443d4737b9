#![cfg(test)]

// Property tests for Table kept inside the crate so they can reach
// `bucket_of` and chain-level accounting without widening the public API.

use crate::table::Table;
use crate::value::Value;
use core::hash::{BuildHasher, Hasher};
use hashbrown::HashMap;
use proptest::prelude::*;

// Pool-indexed operations to improve shrinking: indices shrink to earlier keys,
// pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    InsertText(usize, String),
    InsertNumber(usize, i64),
    Remove(usize),
    Search(usize),
    Contains(String),
    Bump(usize, i64),
    Format,
}

fn arb_value_text() -> impl Strategy<Value = String> {
    "/[a-z]{0,6}(/[a-z]{1,4}){0,2}"
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-f0-9]{0,6}", 1..=10).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let contains_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            (idx.clone(), arb_value_text()).prop_map(|(i, v)| OpI::InsertText(i, v)),
            (idx.clone(), any::<i64>()).prop_map(|(i, v)| OpI::InsertNumber(i, v)),
            idx.clone().prop_map(OpI::Remove),
            idx.clone().prop_map(OpI::Search),
            prop_oneof![
                contains_pool.prop_map(|s: String| s),
                "[a-f0-9]{0,6}".prop_map(|s| s)
            ]
            .prop_map(OpI::Contains),
            (idx.clone(), any::<i64>()).prop_map(|(i, d)| OpI::Bump(i, d)),
            Just(OpI::Format),
        ];
        proptest::collection::vec(op, 1..80).prop_map(move |ops| (pool.clone(), ops))
    })
}

fn run_against_model<S: BuildHasher>(
    mut sut: Table<S>,
    pool: Vec<String>,
    ops: Vec<OpI>,
) -> Result<(), TestCaseError> {
    let mut model: HashMap<String, Value> = HashMap::new();

    for op in ops {
        match op {
            OpI::InsertText(i, v) => {
                let k = &pool[i];
                let prev = sut.insert(k, v.as_str()).expect("insert");
                prop_assert_eq!(prev, model.insert(k.clone(), Value::Text(v)));
            }
            OpI::InsertNumber(i, v) => {
                let k = &pool[i];
                let prev = sut.insert(k, v).expect("insert");
                prop_assert_eq!(prev, model.insert(k.clone(), Value::Number(v)));
            }
            OpI::Remove(i) => {
                let k = &pool[i];
                let removed = sut.remove(k);
                prop_assert_eq!(removed, model.remove(k).is_some());
                prop_assert!(sut.search(k).is_none());
            }
            OpI::Search(i) => {
                let k = &pool[i];
                prop_assert_eq!(sut.search(k), model.get(k));
            }
            OpI::Contains(s) => {
                prop_assert_eq!(sut.contains_key(&s), model.contains_key(&s));
            }
            OpI::Bump(i, d) => {
                let k = &pool[i];
                match (sut.get_mut(k), model.get_mut(k)) {
                    (Some(Value::Number(a)), Some(Value::Number(b))) => {
                        *a = a.wrapping_add(d);
                        *b = b.wrapping_add(d);
                    }
                    (Some(a), Some(b)) => {
                        prop_assert_eq!(&*a, &*b);
                    }
                    (None, None) => {}
                    (a, b) => {
                        prop_assert!(false, "presence differs: {:?} vs {:?}", a, b);
                    }
                }
            }
            OpI::Format => {
                let mut out = Vec::new();
                sut.format(&mut out).expect("format to Vec");
                let text = String::from_utf8(out).expect("utf8");
                prop_assert_eq!(text.lines().count(), model.len());

                // Bucket indices along the output never decrease.
                let buckets: Vec<usize> = sut.iter().map(|(k, _)| sut.bucket_of(k)).collect();
                prop_assert!(buckets.windows(2).all(|w| w[0] <= w[1]));
            }
        }

        // Post-conditions after each op
        // 1) Size parity, and size equals the sum of chain lengths
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        let chained: usize = (0..sut.capacity()).map(|b| sut.chain_len(b)).sum();
        prop_assert_eq!(chained, sut.len());
        // 2) Every live entry is reachable with the model's value
        for (k, v) in &model {
            prop_assert_eq!(sut.search(k), Some(v));
        }
    }
    Ok(())
}

// Property: State-machine equivalence against hashbrown::HashMap.
// Invariants exercised across random operation sequences:
// - Upsert: inserting a present key returns the old value and keeps the size.
// - `remove` reports presence exactly and makes the key unsearchable.
// - `search`/`contains_key` parity with the model.
// - `format` emits one line per entry in bucket order.
// - `len` equals the total length of all chains after every op.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario(), cap in 0usize..12) {
        run_against_model(Table::new(cap).expect("table"), pool, ops)?;
    }
}

// Collision variant using a constant hasher so every key shares one chain.
#[derive(Clone, Default)]
struct ConstBuildHasher;
struct ConstHasher;
impl BuildHasher for ConstBuildHasher {
    type Hasher = ConstHasher;
    fn build_hasher(&self) -> Self::Hasher {
        ConstHasher
    }
}
impl Hasher for ConstHasher {
    fn write(&mut self, _bytes: &[u8]) {}
    fn finish(&self) -> u64 {
        0
    }
}

// Property: Same state-machine invariants as above, under worst-case
// collision behavior (constant hasher). This stresses head/middle/tail
// relinking in a single chain.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        let sut = Table::with_hasher(3, ConstBuildHasher).expect("table");
        run_against_model(sut, pool, ops)?;
    }
}

// Property: removing one key from an N-entry chain leaves the other N-1
// entries retrievable with unchanged values.
proptest! {
    #[test]
    fn prop_chain_integrity(n in 1usize..40, pick in any::<prop::sample::Index>()) {
        let mut t = Table::with_hasher(1, ConstBuildHasher).expect("table");
        let keys: Vec<String> = (0..n).map(|i| format!("{i:032x}")).collect();
        for (i, k) in keys.iter().enumerate() {
            t.insert(k, i as i64).expect("insert");
        }
        let victim = pick.index(n);
        prop_assert!(t.remove(&keys[victim]));
        prop_assert_eq!(t.chain_len(0), n - 1);
        for (i, k) in keys.iter().enumerate() {
            if i == victim {
                prop_assert!(t.search(k).is_none());
            } else {
                prop_assert_eq!(t.search(k), Some(&Value::Number(i as i64)));
            }
        }
    }
}
