#![cfg(test)]

// Property tests for both backends kept inside the crate so they can arm the
// allocation failpoints and check bucket placement directly.

use crate::alloc::failpoint::{self, Site};
use crate::error::{AllocError, InsertError};
use crate::growth::GrowthSizes;
use crate::hash_sym_table::HashSymTable;
use crate::list_sym_table::ListSymTable;
use crate::symbol_table::SymbolTable;
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use std::collections::{BTreeMap, HashMap};

// Pool-indexed operations so shrinking moves toward earlier keys and
// shorter op lists.
#[derive(Clone, Debug)]
enum Op {
    Put(usize, i32),
    Replace(usize, i32),
    Get(usize),
    Contains(String),
    Remove(usize),
    Traverse,
    AddAll(i32),
    FailKeyCopy(bool),
    FailBuckets(bool),
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<Op>)> {
    proptest::collection::vec("[a-z]{0,5}", 1..=24).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let contains_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            6 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| Op::Put(i, v)),
            2 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| Op::Replace(i, v)),
            2 => idx.clone().prop_map(Op::Get),
            1 => prop_oneof![
                contains_pool.prop_map(|s: String| s),
                "[a-z]{0,5}".prop_map(|s| s)
            ]
            .prop_map(Op::Contains),
            3 => idx.clone().prop_map(Op::Remove),
            1 => Just(Op::Traverse),
            1 => (-3i32..=3).prop_map(Op::AddAll),
            1 => any::<bool>().prop_map(Op::FailKeyCopy),
            1 => any::<bool>().prop_map(Op::FailBuckets),
        ];
        proptest::collection::vec(op, 1..80).prop_map(move |ops| (pool.clone(), ops))
    })
}

fn disarm_all() {
    failpoint::disarm(Site::KeyCopy);
    failpoint::disarm(Site::BucketArray);
}

// Drive `sut` and a std HashMap model through `ops`, comparing after every
// step; `check` runs backend-specific structural assertions.
fn run_against_model<T, C>(
    sut: &mut T,
    pool: &[String],
    ops: Vec<Op>,
    check: C,
) -> Result<(), TestCaseError>
where
    T: SymbolTable<i32>,
    C: Fn(&T),
{
    let mut model: HashMap<String, i32> = HashMap::new();
    let mut key_copy_fails = false;

    for op in ops {
        match op {
            Op::Put(i, v) => {
                let k = &pool[i];
                let already = model.contains_key(k);
                match sut.try_put(k, v) {
                    Ok(()) => {
                        prop_assert!(!already, "put must fail on duplicate");
                        prop_assert!(!key_copy_fails, "put must fail while key copy fails");
                        model.insert(k.clone(), v);
                    }
                    Err(InsertError::DuplicateKey) => prop_assert!(already),
                    Err(InsertError::AllocFailed(e)) => {
                        prop_assert!(key_copy_fails && !already);
                        prop_assert_eq!(e, AllocError::KeyCopy { len: k.len() });
                    }
                }
            }
            Op::Replace(i, v) => {
                let k = &pool[i];
                let prev = sut.replace(k, v);
                let expected = model.get_mut(k).map(|m| std::mem::replace(m, v));
                prop_assert_eq!(prev, expected);
            }
            Op::Get(i) => {
                let k = &pool[i];
                prop_assert_eq!(sut.get(k), model.get(k));
            }
            Op::Contains(s) => {
                prop_assert_eq!(sut.contains(&s), model.contains_key(&s));
            }
            Op::Remove(i) => {
                let k = &pool[i];
                prop_assert_eq!(sut.remove(k), model.remove(k));
                prop_assert!(!sut.contains(k));
            }
            Op::Traverse => {
                let mut seen: BTreeMap<String, i32> = BTreeMap::new();
                let mut visits = 0usize;
                sut.for_each(|k, v| {
                    visits += 1;
                    seen.insert(k.to_string(), *v);
                });
                let expected: BTreeMap<String, i32> =
                    model.iter().map(|(k, v)| (k.clone(), *v)).collect();
                prop_assert_eq!(visits, model.len(), "each binding visited once");
                prop_assert_eq!(seen, expected);
            }
            Op::AddAll(d) => {
                sut.for_each_mut(|_, v| *v = v.wrapping_add(d));
                for v in model.values_mut() {
                    *v = v.wrapping_add(d);
                }
            }
            Op::FailKeyCopy(on) => {
                key_copy_fails = on;
                if on {
                    failpoint::arm(Site::KeyCopy);
                } else {
                    failpoint::disarm(Site::KeyCopy);
                }
            }
            Op::FailBuckets(on) => {
                if on {
                    failpoint::arm(Site::BucketArray);
                } else {
                    failpoint::disarm(Site::BucketArray);
                }
            }
        }

        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        check(&*sut);
    }
    Ok(())
}

// Property: HashSymTable on a short growth ladder behaves like a HashMap
// under random puts, replaces, removals, traversals and injected allocation
// failures; after every step each binding sits in the bucket its hash names
// and the tier never regresses.
proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]
    #[test]
    fn prop_hash_table_matches_model((pool, ops) in arb_scenario()) {
        disarm_all();
        let growth = GrowthSizes::new(vec![2, 5, 11, 23]).unwrap();
        let mut sut: HashSymTable<i32> = HashSymTable::with_growth(growth);
        let tier = std::cell::Cell::new(0usize);
        let res = run_against_model(&mut sut, &pool, ops, |t| {
            t.assert_consistent();
            assert!(t.tier() >= tier.get(), "tier regressed");
            tier.set(t.tier());
        });
        disarm_all();
        res?;
    }

    #[test]
    fn prop_list_table_matches_model((pool, ops) in arb_scenario()) {
        disarm_all();
        let mut sut: ListSymTable<i32> = ListSymTable::new();
        let res = run_against_model(&mut sut, &pool, ops, |t| {
            assert_eq!(t.iter().count(), t.len());
        });
        disarm_all();
        res?;
    }
}

// Property: with growth allocation always succeeding, the hash table keeps
// its load factor at or below one until the last tier.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_load_factor_bounded(n in 0usize..200) {
        disarm_all();
        let growth = GrowthSizes::new(vec![3, 7, 17, 37, 79, 163]).unwrap();
        let mut t: HashSymTable<usize> = HashSymTable::with_growth(growth);
        for i in 0..n {
            let key = format!("k{i}");
            prop_assert!(t.put(&key, i));
            let last = t.tier() + 1 == t.growth_sizes().len();
            prop_assert!(last || t.len() <= t.bucket_count());
        }
        for i in 0..n {
            prop_assert_eq!(t.get(&format!("k{i}")), Some(&i));
        }
    }
}
