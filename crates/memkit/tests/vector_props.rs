//! Property tests for `Vector` ordering and growth.
//!
//! Every operation sequence is mirrored on a `std::vec::Vec` model; the two
//! must agree after each step.

use memkit::allocator::{Arena, HeapAllocator};
use memkit::collections::Vector;
use memkit::core::VectorConfig;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Append(i32),
    AppendMany(Vec<i32>),
    Insert(usize, i32),
    InsertMany(usize, Vec<i32>),
    Erase(usize),
    EraseMany(usize, usize),
    UnorderedErase(usize),
    Pop,
    Reserve(usize),
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        any::<i32>().prop_map(Op::Append),
        prop::collection::vec(any::<i32>(), 0..20).prop_map(Op::AppendMany),
        (0..200usize, any::<i32>()).prop_map(|(p, v)| Op::Insert(p, v)),
        (0..200usize, prop::collection::vec(any::<i32>(), 0..10))
            .prop_map(|(p, v)| Op::InsertMany(p, v)),
        (0..200usize).prop_map(Op::Erase),
        (0..200usize, 0..8usize).prop_map(|(p, c)| Op::EraseMany(p, c)),
        (0..200usize).prop_map(Op::UnorderedErase),
        Just(Op::Pop),
        (0..300usize).prop_map(Op::Reserve),
    ]
}

fn apply(vector: &mut Vector<'_, i32>, model: &mut Vec<i32>, op: Op) {
    match op {
        Op::Append(v) => {
            vector.append(v).unwrap();
            model.push(v);
        }
        Op::AppendMany(items) => {
            vector.append_many(&items).unwrap();
            model.extend_from_slice(&items);
        }
        Op::Insert(pos, v) => {
            vector.insert(pos, v).unwrap();
            model.insert(pos.min(model.len()), v);
        }
        Op::InsertMany(pos, items) => {
            vector.insert_many(pos, &items).unwrap();
            let at = pos.min(model.len());
            model.splice(at..at, items);
        }
        Op::Erase(pos) if pos < model.len() => {
            assert_eq!(vector.erase(pos), model.remove(pos));
        }
        Op::EraseMany(pos, count) if pos + count <= model.len() => {
            vector.erase_many(pos, count);
            model.drain(pos..pos + count);
        }
        Op::UnorderedErase(pos) if pos < model.len() => {
            assert_eq!(vector.unordered_erase(pos), model.swap_remove(pos));
        }
        Op::Pop => assert_eq!(vector.pop(), model.pop()),
        Op::Reserve(capacity) => {
            vector.reserve(capacity).unwrap();
            model.truncate(capacity);
            assert_eq!(vector.capacity(), capacity);
        }
        // Out-of-range removals are preconditions, skipped here.
        _ => {}
    }
}

proptest! {
    #[test]
    fn vector_matches_std_model(ops in prop::collection::vec(arb_op(), 1..60)) {
        let arena = Arena::new();
        let mut vector = Vector::new(&arena);
        let mut model = Vec::new();

        for op in ops {
            apply(&mut vector, &mut model, op);
            prop_assert_eq!(vector.as_slice(), model.as_slice());
            prop_assert!(vector.len() <= vector.capacity());
        }
    }

    #[test]
    fn capacity_is_initial_times_power_of_two(count in 1..2000usize, initial in 1..100usize) {
        let heap = HeapAllocator::new();
        let config = VectorConfig::new().with_initial_capacity(initial);
        let mut vector = Vector::with_config(&heap, config).unwrap();

        for i in 0..count {
            vector.append(i).unwrap();
        }

        let ratio = vector.capacity() / initial;
        prop_assert_eq!(vector.capacity() % initial, 0);
        prop_assert!(ratio.is_power_of_two());
        prop_assert!(vector.capacity() >= count);
        prop_assert!(vector.capacity() / 2 < count || vector.capacity() == initial);
    }

    #[test]
    fn clone_matches_source(items in prop::collection::vec(any::<u16>(), 0..300)) {
        let arena = Arena::new();
        let mut source = Vector::new(&arena);
        source.append_many(&items).unwrap();

        let heap = HeapAllocator::new();
        let clone = source.clone_in(&heap).unwrap();
        prop_assert_eq!(clone.as_slice(), items.as_slice());
        prop_assert_eq!(clone.capacity(), items.len() + VectorConfig::DEFAULT_CLONE_SLACK);
    }
}
