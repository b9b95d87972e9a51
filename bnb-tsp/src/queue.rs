use crate::cost::Cost;

/// Anything that can be ordered in a [`NodeQueue`].
pub trait LowerBounded {
    fn lower_bound(&self) -> Cost;
}

/// A binary min-heap ordered by lower bound.
///
/// Positions are 1-based: the minimum sits at position 1 and the children of position `p` are `2p` and `2p + 1`.
/// Position `p` is stored at `items[p - 1]`, so there is no slot for position 0. Elements with equal bounds come
/// out in no particular order.
#[derive(Clone, Debug)]
pub struct NodeQueue<T> {
    items: Vec<T>,
}

impl<T> Default for NodeQueue<T> {
    fn default() -> Self {
        NodeQueue { items: vec![] }
    }
}

impl<T> NodeQueue<T>
where
    T: LowerBounded,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        NodeQueue {
            items: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn peek_min(&self) -> Option<&T> {
        self.items.first()
    }

    /// The queued elements in heap order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn insert(&mut self, item: T) {
        self.items.push(item);
        self.sift_up(self.items.len());
    }

    pub fn extract_min(&mut self) -> Option<T> {
        let last = self.items.len();
        if last == 0 {
            return None;
        }
        self.items.swap(0, last - 1);
        let min = self.items.pop();
        self.sift_down(1);
        min
    }

    fn bound(&self, pos: usize) -> Cost {
        self.items[pos - 1].lower_bound()
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.items.swap(a - 1, b - 1);
    }

    fn sift_up(&mut self, mut pos: usize) {
        while pos > 1 {
            let parent = pos / 2;
            if self.bound(pos) < self.bound(parent) {
                self.swap(pos, parent);
                pos = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut pos: usize) {
        while let Some(child) = self.smallest_child(pos) {
            if self.bound(child) < self.bound(pos) {
                self.swap(pos, child);
                pos = child;
            } else {
                break;
            }
        }
    }

    /// The child of `pos` with the smaller bound, preferring the right child on ties.
    fn smallest_child(&self, pos: usize) -> Option<usize> {
        let left = 2 * pos;
        let right = left + 1;
        if left > self.items.len() {
            None
        } else if right > self.items.len() || self.bound(left) < self.bound(right) {
            Some(left)
        } else {
            Some(right)
        }
    }
}

impl<T> IntoIterator for NodeQueue<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}
