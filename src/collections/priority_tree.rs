use super::{DynamicArray, Stack};
use std::cmp::Ordering;
use std::fmt;
use std::mem;

/// Payload that can be ordered by the tree's composite key.
///
/// The primary component is the numeric priority rank, the secondary one the
/// unique identifier. Two payloads with the same `key_id` are the same entity.
pub trait Prioritized {
    fn rank(&self) -> u8;
    fn key_id(&self) -> u64;
}

/// Composite key comparison: rank ascending, then identifier ascending.
///
/// In-order traversal therefore yields the lowest rank first.
pub fn compare_key<A, B>(a: &A, b: &B) -> Ordering
where
    A: Prioritized + ?Sized,
    B: Prioritized + ?Sized,
{
    a.rank()
        .cmp(&b.rank())
        .then_with(|| a.key_id().cmp(&b.key_id()))
}

type Link<T> = Option<Box<Node<T>>>;

struct Node<T> {
    item: T,
    left: Link<T>,
    right: Link<T>,
}

impl<T> Node<T> {
    fn leaf(item: T) -> Box<Self> {
        Box::new(Self {
            item,
            left: None,
            right: None,
        })
    }
}

/// Unbalanced binary search tree ordered by [`compare_key`].
///
/// No rotations are performed: inserting many same-rank payloads in ascending
/// id order degenerates into a right-leaning chain within that rank band.
/// Lookups by identifier alone cannot prune and visit every node.
///
/// Every walk (search, removal, traversal, drop, clone) is iterative, so a
/// degenerate chain costs time but never call-stack depth.
pub struct PriorityTree<T> {
    root: Link<T>,
    len: usize,
}

impl<T: Prioritized> PriorityTree<T> {
    pub fn new() -> Self {
        Self { root: None, len: 0 }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Insert as a new leaf; equal keys descend to the right
    pub fn insert(&mut self, item: T) {
        let mut slot = &mut self.root;
        while let Some(node) = slot {
            slot = match compare_key(&item, &node.item) {
                Ordering::Less => &mut node.left,
                _ => &mut node.right,
            };
        }
        *slot = Some(Node::leaf(item));
        self.len += 1;
    }

    /// Full search by identifier, visiting node, then left, then right
    pub fn find_by_id(&self, id: u64) -> Option<&T> {
        let mut pending = Stack::new();
        pending.push(self.root.as_deref()?);

        while let Some(node) = pending.pop() {
            if node.item.key_id() == id {
                return Some(&node.item);
            }
            if let Some(right) = node.right.as_deref() {
                pending.push(right);
            }
            if let Some(left) = node.left.as_deref() {
                pending.push(left);
            }
        }
        None
    }

    pub fn contains_id(&self, id: u64) -> bool {
        self.find_by_id(id).is_some()
    }

    /// Remove the node whose payload has the same identifier as `target`.
    ///
    /// Navigation uses `target`'s composite key, so `target` must carry the
    /// rank the payload was inserted under. Returns the removed payload.
    pub fn delete_by_identity<K>(&mut self, target: &K) -> Option<T>
    where
        K: Prioritized + ?Sized,
    {
        let removed = Self::remove_from(&mut self.root, target);
        if removed.is_some() {
            self.len -= 1;
        }
        removed
    }

    pub fn clear(&mut self) {
        dismantle(self.root.take());
        self.len = 0;
    }

    fn remove_from<K>(mut slot: &mut Link<T>, target: &K) -> Option<T>
    where
        K: Prioritized + ?Sized,
    {
        while slot
            .as_ref()
            .is_some_and(|node| node.item.key_id() != target.key_id())
        {
            let node = slot.as_mut()?;
            slot = match compare_key(target, &node.item) {
                Ordering::Less => &mut node.left,
                _ => &mut node.right,
            };
        }

        let node = slot.as_mut()?;
        if node.left.is_some() && node.right.is_some() {
            let successor = Self::take_min(&mut node.right)?;
            return Some(mem::replace(&mut node.item, successor));
        }

        let mut node = slot.take()?;
        *slot = node.left.take().or_else(|| node.right.take());
        Some(node.item)
    }

    /// Unlink the minimum of a subtree, splicing its right child into its place
    fn take_min(mut slot: &mut Link<T>) -> Option<T> {
        while slot.as_ref().is_some_and(|node| node.left.is_some()) {
            let node = slot.as_mut()?;
            slot = &mut node.left;
        }

        let node = slot.take()?;
        let Node { item, right, .. } = *node;
        *slot = right;
        Some(item)
    }
}

impl<T> PriorityTree<T> {
    fn visit_pre_order(&self, mut visit: impl FnMut(&T)) {
        let mut pending = Stack::new();
        if let Some(root) = self.root.as_deref() {
            pending.push(root);
        }
        while let Some(node) = pending.pop() {
            visit(&node.item);
            if let Some(right) = node.right.as_deref() {
                pending.push(right);
            }
            if let Some(left) = node.left.as_deref() {
                pending.push(left);
            }
        }
    }

    fn visit_in_order(&self, mut visit: impl FnMut(&T)) {
        let mut pending = Stack::new();
        let mut cursor = self.root.as_deref();
        loop {
            while let Some(node) = cursor {
                pending.push(node);
                cursor = node.left.as_deref();
            }
            let Some(node) = pending.pop() else {
                break;
            };
            visit(&node.item);
            cursor = node.right.as_deref();
        }
    }

    fn visit_post_order(&self, mut visit: impl FnMut(&T)) {
        // Node, right, left collected, then replayed in reverse
        let mut pending = Stack::new();
        let mut reversed = Stack::new();
        if let Some(root) = self.root.as_deref() {
            pending.push(root);
        }
        while let Some(node) = pending.pop() {
            reversed.push(node);
            if let Some(left) = node.left.as_deref() {
                pending.push(left);
            }
            if let Some(right) = node.right.as_deref() {
                pending.push(right);
            }
        }
        while let Some(node) = reversed.pop() {
            visit(&node.item);
        }
    }
}

impl<T: Prioritized + Clone> PriorityTree<T> {
    /// Left, node, right: ascending composite-key order
    pub fn traverse_in_order(&self) -> DynamicArray<T> {
        let mut out = DynamicArray::with_capacity(self.len);
        self.visit_in_order(|item| out.push(item.clone()));
        out
    }

    /// Node, left, right
    pub fn traverse_pre_order(&self) -> DynamicArray<T> {
        let mut out = DynamicArray::with_capacity(self.len);
        self.visit_pre_order(|item| out.push(item.clone()));
        out
    }

    /// Left, right, node
    pub fn traverse_post_order(&self) -> DynamicArray<T> {
        let mut out = DynamicArray::with_capacity(self.len);
        self.visit_post_order(|item| out.push(item.clone()));
        out
    }

    /// Canonical "sorted by priority" view, same as in-order
    pub fn all(&self) -> DynamicArray<T> {
        self.traverse_in_order()
    }
}

/// Free every node without recursing through `Box` drops
fn dismantle<T>(root: Link<T>) {
    let mut pending = Stack::new();
    if let Some(root) = root {
        pending.push(root);
    }
    while let Some(mut node) = pending.pop() {
        if let Some(left) = node.left.take() {
            pending.push(left);
        }
        if let Some(right) = node.right.take() {
            pending.push(right);
        }
    }
}

impl<T> Drop for PriorityTree<T> {
    fn drop(&mut self) {
        dismantle(self.root.take());
    }
}

/// Re-inserting in pre-order reproduces the exact shape
impl<T: Prioritized + Clone> Clone for PriorityTree<T> {
    fn clone(&self) -> Self {
        let mut copy = Self::new();
        self.visit_pre_order(|item| copy.insert(item.clone()));
        copy
    }
}

impl<T: fmt::Debug> fmt::Debug for PriorityTree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut items = f.debug_list();
        self.visit_in_order(|item| {
            items.entry(item);
        });
        items.finish()
    }
}

impl<T: Prioritized> Default for PriorityTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct Item {
        rank: u8,
        id: u64,
    }

    impl Prioritized for Item {
        fn rank(&self) -> u8 {
            self.rank
        }

        fn key_id(&self) -> u64 {
            self.id
        }
    }

    fn item(rank: u8, id: u64) -> Item {
        Item { rank, id }
    }

    fn ids(items: DynamicArray<Item>) -> Vec<u64> {
        items.into_iter().map(|i| i.id).collect()
    }

    fn sample_tree() -> PriorityTree<Item> {
        //          (2,1)
        //         /     \
        //     (1,2)     (3,3)
        //        \      /   \
        //      (1,5) (2,4) (3,6)
        let mut tree = PriorityTree::new();
        for it in [
            item(2, 1),
            item(1, 2),
            item(3, 3),
            item(2, 4),
            item(1, 5),
            item(3, 6),
        ] {
            tree.insert(it);
        }
        tree
    }

    #[test]
    fn test_compare_key_orders_rank_then_id() {
        assert_eq!(compare_key(&item(1, 9), &item(3, 1)), Ordering::Less);
        assert_eq!(compare_key(&item(2, 4), &item(2, 3)), Ordering::Greater);
        assert_eq!(compare_key(&item(2, 4), &item(2, 4)), Ordering::Equal);
    }

    #[test]
    fn test_traversals() {
        let tree = sample_tree();
        assert_eq!(tree.len(), 6);
        assert_eq!(ids(tree.traverse_in_order()), vec![2, 5, 1, 4, 3, 6]);
        assert_eq!(ids(tree.traverse_pre_order()), vec![1, 2, 5, 3, 4, 6]);
        assert_eq!(ids(tree.traverse_post_order()), vec![5, 2, 4, 6, 3, 1]);
        assert_eq!(ids(tree.all()), ids(tree.traverse_in_order()));
    }

    #[test]
    fn test_traversals_are_restartable() {
        let tree = sample_tree();
        let first = ids(tree.traverse_pre_order());
        let second = ids(tree.traverse_pre_order());
        assert_eq!(first, second);
        assert_eq!(tree.len(), 6);
    }

    #[test]
    fn test_find_by_id_searches_whole_tree() {
        let tree = sample_tree();
        assert_eq!(tree.find_by_id(5), Some(&item(1, 5)));
        assert_eq!(tree.find_by_id(4), Some(&item(2, 4)));
        assert_eq!(tree.find_by_id(99), None);
        assert!(tree.contains_id(6));
    }

    #[test]
    fn test_delete_leaf() {
        let mut tree = sample_tree();
        assert_eq!(tree.delete_by_identity(&item(1, 5)), Some(item(1, 5)));
        assert_eq!(tree.len(), 5);
        assert_eq!(ids(tree.traverse_in_order()), vec![2, 1, 4, 3, 6]);
    }

    #[test]
    fn test_delete_single_child_splices() {
        let mut tree = sample_tree();
        assert!(tree.delete_by_identity(&item(1, 2)).is_some());
        assert_eq!(ids(tree.traverse_pre_order()), vec![1, 5, 3, 4, 6]);
    }

    #[test]
    fn test_delete_two_children_uses_successor() {
        let mut tree = sample_tree();
        assert!(tree.delete_by_identity(&item(2, 1)).is_some());
        // Successor (2,4) moves into the root.
        assert_eq!(ids(tree.traverse_pre_order()), vec![4, 2, 5, 3, 6]);
        assert_eq!(ids(tree.traverse_in_order()), vec![2, 5, 4, 3, 6]);
        assert_eq!(tree.len(), 5);
    }

    #[test]
    fn test_delete_equal_rank_smaller_id() {
        let mut tree = PriorityTree::new();
        tree.insert(item(2, 10));
        tree.insert(item(2, 3));
        tree.insert(item(2, 12));

        assert!(tree.delete_by_identity(&item(2, 3)).is_some());
        assert_eq!(ids(tree.traverse_in_order()), vec![10, 12]);
    }

    #[test]
    fn test_delete_missing_is_noop() {
        let mut tree = sample_tree();
        assert_eq!(tree.delete_by_identity(&item(2, 42)), None);
        assert_eq!(tree.len(), 6);

        let mut empty: PriorityTree<Item> = PriorityTree::new();
        assert_eq!(empty.delete_by_identity(&item(1, 1)), None);
        assert_eq!(empty.len(), 0);
    }

    #[test]
    fn test_clear() {
        let mut tree = sample_tree();
        tree.clear();
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert!(tree.traverse_in_order().is_empty());
    }

    #[test]
    fn test_long_same_rank_chain() {
        let mut tree = PriorityTree::new();
        for id in 1..=20_000 {
            tree.insert(item(1, id));
        }

        assert_eq!(tree.find_by_id(20_000), Some(&item(1, 20_000)));
        assert_eq!(tree.delete_by_identity(&item(1, 20_000)), Some(item(1, 20_000)));
        assert_eq!(tree.delete_by_identity(&item(1, 10_000)), Some(item(1, 10_000)));
        assert_eq!(tree.len(), 19_998);

        let in_order = tree.traverse_in_order();
        assert_eq!(in_order.len(), 19_998);
        assert_eq!(in_order.first(), Some(&item(1, 1)));
        assert_eq!(in_order.last(), Some(&item(1, 19_999)));
        assert_eq!(tree.traverse_post_order().len(), 19_998);

        let copy = tree.clone();
        assert_eq!(copy.len(), tree.len());
        drop(copy);
        drop(tree);
    }

    #[test]
    fn test_clone_keeps_shape() {
        let tree = sample_tree();
        let copy = tree.clone();
        assert_eq!(ids(copy.traverse_pre_order()), ids(tree.traverse_pre_order()));
        assert_eq!(copy.len(), 6);
        assert_eq!(
            format!("{:?}", copy),
            format!("{:?}", tree.traverse_in_order().to_vec())
        );
    }
}
