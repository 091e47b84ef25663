use std::cmp::Ordering;

/// A heap entry ordered by ascending score, so that a max-heap such as
/// [`BinaryHeap`](std::collections::BinaryHeap) pops the smallest score
/// first.  Scores are compared with [`f64::total_cmp`]; the payload does not
/// take part in the ordering.
#[derive(Clone, Copy, Debug)]
pub struct MinScored<T>(pub f64, pub T);

impl<T> PartialEq for MinScored<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T> Eq for MinScored<T> {}

impl<T> PartialOrd for MinScored<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for MinScored<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        other.0.total_cmp(&self.0)
    }
}
