/// Handle to an entry of a [`FibonacciHeap`].  Handles are never reused, so
/// a stale one simply refers to an entry that is no longer in the heap.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HeapHandle(usize);

#[derive(Clone, Debug)]
struct Entry<T> {
    key: f64,
    value: T,
    parent: Option<usize>,
    child: Option<usize>,
    left: usize,
    right: usize,
    degree: usize,
    marked: bool,
    in_heap: bool,
}

/// A min-ordered Fibonacci heap with decrease-key.
///
/// Entries live in an arena and the circular sibling lists are threaded
/// through arena indices.  `push` and `decrease_key` are amortized O(1),
/// `pop_min` amortized O(log n).
#[derive(Clone, Debug)]
pub struct FibonacciHeap<T> {
    entries: Vec<Entry<T>>,
    min: Option<usize>,
    len: usize,
}

impl<T> Default for FibonacciHeap<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            min: None,
            len: 0,
        }
    }
}

impl<T: Copy> FibonacciHeap<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn push(&mut self, key: f64, value: T) -> HeapHandle {
        let index = self.entries.len();
        self.entries.push(Entry {
            key,
            value,
            parent: None,
            child: None,
            left: index,
            right: index,
            degree: 0,
            marked: false,
            in_heap: true,
        });
        self.add_root(index);
        self.len += 1;
        HeapHandle(index)
    }

    pub fn peek_min(&self) -> Option<(f64, T)> {
        self.min.map(|m| (self.entries[m].key, self.entries[m].value))
    }

    /// Current key of an entry still in the heap.
    pub fn key(&self, handle: HeapHandle) -> Option<f64> {
        self.entries
            .get(handle.0)
            .filter(|entry| entry.in_heap)
            .map(|entry| entry.key)
    }

    pub fn contains(&self, handle: HeapHandle) -> bool {
        self.key(handle).is_some()
    }

    pub fn pop_min(&mut self) -> Option<(f64, T)> {
        let z = self.min?;
        if let Some(first_child) = self.entries[z].child.take() {
            for child in self.siblings(first_child) {
                self.entries[child].parent = None;
                self.entries[child].marked = false;
                self.add_root(child);
            }
            self.entries[z].degree = 0;
        }
        let next = self.entries[z].right;
        self.unlink(z);
        if next == z {
            self.min = None;
        } else {
            self.min = Some(next);
            self.consolidate();
        }
        self.len -= 1;
        let entry = &mut self.entries[z];
        entry.in_heap = false;
        Some((entry.key, entry.value))
    }

    /// Lowers an entry's key.  Returns false, leaving the heap untouched, if
    /// the entry is no longer in the heap or `key` is larger than its
    /// current key.
    pub fn decrease_key(&mut self, handle: HeapHandle, key: f64) -> bool {
        let x = handle.0;
        match self.entries.get(x) {
            Some(entry) if entry.in_heap && key <= entry.key => {}
            _ => return false,
        }
        self.entries[x].key = key;
        if let Some(parent) = self.entries[x].parent {
            if key < self.entries[parent].key {
                self.cut(x, parent);
                self.cascading_cut(parent);
            }
        }
        if let Some(min) = self.min {
            if key < self.entries[min].key {
                self.min = Some(x);
            }
        }
        true
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.min = None;
        self.len = 0;
    }

    /// Collects a circular sibling list starting at `start`.
    fn siblings(&self, start: usize) -> Vec<usize> {
        let mut list = vec![start];
        let mut next = self.entries[start].right;
        while next != start {
            list.push(next);
            next = self.entries[next].right;
        }
        list
    }

    /// Removes `x` from its sibling list, leaving it a list of one.
    fn unlink(&mut self, x: usize) {
        let (left, right) = (self.entries[x].left, self.entries[x].right);
        self.entries[left].right = right;
        self.entries[right].left = left;
        self.entries[x].left = x;
        self.entries[x].right = x;
    }

    /// Splices `y` into the sibling list right after `anchor`.
    fn splice_after(&mut self, anchor: usize, y: usize) {
        let right = self.entries[anchor].right;
        self.entries[y].left = anchor;
        self.entries[y].right = right;
        self.entries[anchor].right = y;
        self.entries[right].left = y;
    }

    fn add_root(&mut self, x: usize) {
        match self.min {
            None => {
                self.entries[x].left = x;
                self.entries[x].right = x;
                self.min = Some(x);
            }
            Some(min) => {
                self.splice_after(min, x);
                if self.entries[x].key < self.entries[min].key {
                    self.min = Some(x);
                }
            }
        }
    }

    /// Makes root `y` a child of root `x`.
    fn link(&mut self, y: usize, x: usize) {
        self.unlink(y);
        self.entries[y].parent = Some(x);
        self.entries[y].marked = false;
        match self.entries[x].child {
            None => self.entries[x].child = Some(y),
            Some(child) => self.splice_after(child, y),
        }
        self.entries[x].degree += 1;
    }

    /// Merges roots of equal degree until all root degrees differ.
    fn consolidate(&mut self) {
        let Some(start) = self.min else {
            return;
        };
        let mut by_degree: Vec<Option<usize>> = Vec::new();
        for root in self.siblings(start) {
            let mut x = root;
            let mut degree = self.entries[x].degree;
            loop {
                if degree >= by_degree.len() {
                    by_degree.resize(degree + 1, None);
                }
                match by_degree[degree].take() {
                    None => {
                        by_degree[degree] = Some(x);
                        break;
                    }
                    Some(mut y) => {
                        if self.entries[y].key < self.entries[x].key {
                            std::mem::swap(&mut x, &mut y);
                        }
                        self.link(y, x);
                        degree += 1;
                    }
                }
            }
        }
        self.min = None;
        for root in by_degree.into_iter().flatten() {
            if self
                .min
                .is_none_or(|min| self.entries[root].key < self.entries[min].key)
            {
                self.min = Some(root);
            }
        }
    }

    fn cut(&mut self, x: usize, parent: usize) {
        let next = self.entries[x].right;
        if self.entries[parent].child == Some(x) {
            self.entries[parent].child = (next != x).then_some(next);
        }
        self.unlink(x);
        self.entries[parent].degree -= 1;
        self.entries[x].parent = None;
        self.entries[x].marked = false;
        self.add_root(x);
    }

    fn cascading_cut(&mut self, mut y: usize) {
        while let Some(parent) = self.entries[y].parent {
            if !self.entries[y].marked {
                self.entries[y].marked = true;
                break;
            }
            self.cut(y, parent);
            y = parent;
        }
    }
}
