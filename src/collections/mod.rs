//! Data structures shared by the algorithm layer.

mod fibonacci_heap;
mod min_scored;
mod union_find;

pub use fibonacci_heap::{FibonacciHeap, HeapHandle};
pub use min_scored::MinScored;
pub use union_find::UnionFind;
