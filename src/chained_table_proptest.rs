#![cfg(test)]

// Property tests for ChainedTable kept inside the crate so they can use the
// internal chain consistency check.

use crate::chained_table::ChainedTable;
use crate::config::TableConfig;
use crate::error::TableError;
use crate::hash::{djb2, shift_add};
use proptest::prelude::*;
use std::collections::HashMap;

// Pool-indexed operations to improve shrinking: indices shrink to earlier keys,
// pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Insert(usize, i32),
    Get(usize),
    Delete(usize),
    Contains(String),
    Mutate(usize, i32),
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{0,5}", 1..=16).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let contains_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            3 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Insert(i, v)),
            1 => idx.clone().prop_map(OpI::Get),
            2 => idx.clone().prop_map(OpI::Delete),
            1 => prop_oneof![contains_pool, "[a-z]{0,5}"].prop_map(OpI::Contains),
            1 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| OpI::Mutate(i, d)),
        ];
        proptest::collection::vec(op, 1..80).prop_map(move |ops| (pool.clone(), ops))
    })
}

// Drives one table against a std HashMap model and checks after every op:
// - duplicate inserts fail with the value handed back and nothing changed;
// - get/delete agree with the model; delete drops len by exactly one;
// - capacity only changes by doubling, and only on a successful insert
//   whose pre-insert load factor exceeded the maximum;
// - every entry sits on the chain its hash selects.
fn run<H: crate::hash::KeyHasher>(
    mut sut: ChainedTable<i32, H>,
    pool: &[String],
    ops: Vec<OpI>,
) -> Result<(), TestCaseError> {
    let mut model: HashMap<String, i32> = HashMap::new();
    for op in ops {
        let cap_before = sut.capacity();
        let len_before = sut.len();
        match op {
            OpI::Insert(i, v) => {
                let k = &pool[i];
                let already = model.contains_key(k);
                match sut.insert(k, v) {
                    Ok(()) => {
                        prop_assert!(!already, "insert must fail on duplicate");
                        model.insert(k.clone(), v);
                        let should_grow =
                            len_before as f64 > sut.max_load_factor() * cap_before as f64;
                        let expect_cap = if should_grow { cap_before * 2 } else { cap_before };
                        prop_assert_eq!(sut.capacity(), expect_cap);
                    }
                    Err(e) => {
                        prop_assert!(already, "duplicate error only when key exists");
                        prop_assert_eq!(e.kind(), TableError::DuplicateKey);
                        prop_assert_eq!(e.into_value(), v);
                        prop_assert_eq!(sut.capacity(), cap_before);
                    }
                }
            }
            OpI::Get(i) => {
                let k = &pool[i];
                prop_assert_eq!(sut.get(k), model.get(k));
            }
            OpI::Delete(i) => {
                let k = &pool[i];
                let got = sut.delete(k);
                prop_assert_eq!(got, model.remove(k));
                let expect_len = if got.is_some() { len_before - 1 } else { len_before };
                prop_assert_eq!(sut.len(), expect_len);
                prop_assert!(sut.get(k).is_none());
                prop_assert_eq!(sut.capacity(), cap_before, "no shrink on delete");
            }
            OpI::Contains(s) => {
                prop_assert_eq!(sut.contains_key(&s), model.contains_key(&s));
            }
            OpI::Mutate(i, d) => {
                let k = &pool[i];
                if let Some(v) = sut.get_mut(k) {
                    *v = v.saturating_add(d);
                    let mv = model.get_mut(k).expect("present in model");
                    *mv = mv.saturating_add(d);
                } else {
                    prop_assert!(!model.contains_key(k));
                }
            }
        }

        // Post-conditions after each op
        sut.assert_consistent();
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
    }

    // Teardown hands back exactly the live values.
    let mut released: Vec<i32> = Vec::new();
    sut.destroy_with(|v| released.push(v));
    let mut expected: Vec<i32> = model.into_values().collect();
    released.sort_unstable();
    expected.sort_unstable();
    prop_assert_eq!(released, expected);
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario(), cap in 0usize..8) {
        let sut = ChainedTable::try_new(cap, djb2).unwrap();
        run(sut, &pool, ops)?;
    }
}

fn constant(_: &[u8]) -> u64 {
    0
}

// Same invariants under worst-case collisions (every key on one chain) and
// under the weak shift-add hash with a custom load factor.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        let sut = ChainedTable::try_new(1, constant).unwrap();
        run(sut, &pool, ops)?;
    }

    #[test]
    fn prop_state_machine_custom_load_factor(
        (pool, ops) in arb_scenario(),
        lf in 0.25f64..4.0,
    ) {
        let cfg = TableConfig::new().with_initial_capacity(2).with_max_load_factor(lf);
        let sut = ChainedTable::with_config(cfg, shift_add).unwrap();
        run(sut, &pool, ops)?;
    }
}
