//! Hand-rolled generic containers backing the task registry.
//!
//! - [`DynamicArray`]: growable, index-addressable sequence (capacity doubling)
//! - [`Stack`]: LIFO built on [`DynamicArray`]
//! - [`CircularQueue`]: FIFO ring buffer with linearizing growth
//! - [`PriorityTree`]: unbalanced BST ordered by a (rank, id) composite key

pub mod circular_queue;
pub mod dynamic_array;
pub mod priority_tree;
pub mod stack;

pub use circular_queue::*;
pub use dynamic_array::*;
pub use priority_tree::*;
pub use stack::*;

/// Initial backing capacity used by the containers when none is given
pub const DEFAULT_INITIAL_CAPACITY: usize = 10;

/// Structural errors raised by positional container operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CollectionError {
    /// Index outside `0..len` (or `0..=len` for insertion)
    #[error("Index out of range: {index} (len {len})")]
    OutOfRange { index: usize, len: usize },
}
