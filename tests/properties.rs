//! Property tests for the container types

use proptest::prelude::*;
use taskboard::{CircularQueue, DynamicArray, PriorityTree, Stack, TaskHandle, TaskPriority};

#[derive(Debug, Clone)]
enum ArrayOp {
    Push(i32),
    Remove(usize),
}

fn array_op() -> impl Strategy<Value = ArrayOp> {
    prop_oneof![
        any::<i32>().prop_map(ArrayOp::Push),
        (0usize..16).prop_map(ArrayOp::Remove),
    ]
}

#[derive(Debug, Clone)]
enum QueueOp {
    Enqueue(u32),
    Dequeue,
}

fn queue_op() -> impl Strategy<Value = QueueOp> {
    prop_oneof![
        3 => any::<u32>().prop_map(QueueOp::Enqueue),
        1 => Just(QueueOp::Dequeue),
    ]
}

fn priority() -> impl Strategy<Value = TaskPriority> {
    prop_oneof![
        Just(TaskPriority::High),
        Just(TaskPriority::Medium),
        Just(TaskPriority::Low),
    ]
}

fn assert_sorted(handles: &[TaskHandle]) {
    for pair in handles.windows(2) {
        let a = (pair[0].priority.rank(), pair[0].id);
        let b = (pair[1].priority.rank(), pair[1].id);
        assert!(a < b, "{a:?} should sort before {b:?}");
    }
}

proptest! {
    #[test]
    fn dynamic_array_tracks_a_vec(
        capacity in 1usize..4,
        ops in prop::collection::vec(array_op(), 0..64),
    ) {
        let mut array = DynamicArray::with_capacity(capacity);
        let mut model = Vec::new();

        for op in ops {
            match op {
                ArrayOp::Push(value) => {
                    array.push(value);
                    model.push(value);
                }
                ArrayOp::Remove(index) => {
                    let removed = array.remove(index);
                    if index < model.len() {
                        prop_assert_eq!(removed.unwrap(), model.remove(index));
                    } else {
                        prop_assert!(removed.is_err());
                    }
                }
            }
        }

        prop_assert_eq!(array.len(), model.len());
        for (i, expected) in model.iter().enumerate() {
            prop_assert_eq!(array.get(i).unwrap(), expected);
        }
    }

    #[test]
    fn circular_queue_is_fifo_across_growth(
        capacity in 1usize..4,
        ops in prop::collection::vec(queue_op(), 0..96),
    ) {
        let mut queue = CircularQueue::with_capacity(capacity);
        let mut model = std::collections::VecDeque::new();

        for op in ops {
            match op {
                QueueOp::Enqueue(value) => {
                    queue.enqueue(value);
                    model.push_back(value);
                }
                QueueOp::Dequeue => prop_assert_eq!(queue.dequeue(), model.pop_front()),
            }
            prop_assert_eq!(queue.front(), model.front());
        }

        let snapshot: Vec<u32> = queue.snapshot().into_iter().collect();
        let expected: Vec<u32> = model.into_iter().collect();
        prop_assert_eq!(snapshot, expected);
    }

    #[test]
    fn stack_pops_in_reverse(values in prop::collection::vec(any::<i64>(), 0..64)) {
        let mut stack = Stack::with_capacity(1);
        for value in &values {
            stack.push(*value);
        }

        let snapshot: Vec<i64> = stack.snapshot().into_iter().collect();
        prop_assert_eq!(&snapshot, &values);

        let mut popped = Vec::new();
        while let Some(value) = stack.pop() {
            popped.push(value);
        }
        let mut reversed = values.clone();
        reversed.reverse();
        prop_assert_eq!(popped, reversed);
        prop_assert!(stack.peek().is_none());
    }

    #[test]
    fn priority_tree_stays_sorted_after_deletes(
        priorities in prop::collection::vec(priority(), 1..48),
        delete_mask in prop::collection::vec(any::<bool>(), 48),
    ) {
        let mut tree = PriorityTree::new();
        let handles: Vec<TaskHandle> = priorities
            .iter()
            .enumerate()
            .map(|(i, priority)| TaskHandle { id: i as u64 + 1, priority: *priority })
            .collect();
        for handle in &handles {
            tree.insert(*handle);
        }

        let in_order: Vec<TaskHandle> = tree.traverse_in_order().into_iter().collect();
        prop_assert_eq!(in_order.len(), handles.len());
        assert_sorted(&in_order);

        let mut remaining = Vec::new();
        for (handle, delete) in handles.iter().zip(&delete_mask) {
            if *delete {
                let before = tree.len();
                prop_assert_eq!(tree.delete_by_identity(handle), Some(*handle));
                prop_assert_eq!(tree.len(), before - 1);
            } else {
                remaining.push(*handle);
            }
        }

        let in_order: Vec<TaskHandle> = tree.traverse_in_order().into_iter().collect();
        prop_assert_eq!(in_order.len(), remaining.len());
        assert_sorted(&in_order);
        for handle in &remaining {
            prop_assert_eq!(tree.find_by_id(handle.id), Some(handle));
        }
    }
}
