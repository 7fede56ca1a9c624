//! Fixed-capacity top-K retention.
//!
//! [`BoundedTopKHeap`] keeps the K greatest items of an arbitrary stream
//! under an injected total order:
//!
//! 1. While fewer than K items are held, every item is admitted.
//! 2. Once full, a new item is compared against the retained minimum.
//! 3. A strictly greater item evicts the minimum; anything else is dropped.
//!
//! - Admission: O(log K)
//! - Memory: O(K) regardless of stream length
//!
//! An item equal to the resident minimum is *not* admitted, so ties at the
//! eviction boundary favour whichever item arrived first.

use std::cmp::Ordering;

/// A total order over `T`, where `Greater` means "ranks higher".
pub trait TotalOrder<T> {
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

impl<T, F> TotalOrder<T> for F
where
    F: Fn(&T, &T) -> Ordering,
{
    #[inline(always)]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self(a, b)
    }
}

/// Binary min-heap that retains at most `capacity` items per push.
///
/// The capacity is supplied on every [`push_bounded`](Self::push_bounded)
/// call rather than stored, so one heap per trie node costs a single `Vec`.
#[derive(Debug, Clone)]
pub struct BoundedTopKHeap<T, O> {
    data: Vec<T>,
    order: O,
}

impl<T, O: TotalOrder<T> + Default> Default for BoundedTopKHeap<T, O> {
    fn default() -> Self {
        Self::new(O::default())
    }
}

impl<T, O: TotalOrder<T>> BoundedTopKHeap<T, O> {
    /// Creates an empty heap ordered by `order`.
    pub fn new(order: O) -> Self {
        Self {
            data: Vec::new(),
            order,
        }
    }

    /// Creates an empty heap with room for `capacity` items.
    pub fn with_capacity(capacity: usize, order: O) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
            order,
        }
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The lowest-ranked retained item, or `None` when empty.
    #[inline(always)]
    pub fn peek_min(&self) -> Option<&T> {
        self.data.first()
    }

    /// Offers `item`, keeping the `capacity` highest-ranked items seen.
    ///
    /// Returns `true` if the item was admitted.
    #[inline]
    pub fn push_bounded(&mut self, item: T, capacity: usize) -> bool {
        if self.data.len() < capacity {
            self.data.push(item);
            self.sift_up(self.data.len() - 1);
            return true;
        }

        match self.data.first() {
            Some(min) if self.order.compare(&item, min) == Ordering::Greater => {
                self.data[0] = item;
                self.sift_down(0);
                true
            }
            _ => false,
        }
    }

    /// Consumes the heap, returning retained items in arbitrary order.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Consumes the heap, returning retained items highest-ranked first.
    pub fn into_sorted_vec(self) -> Vec<T> {
        let Self { mut data, order } = self;
        data.sort_unstable_by(|a, b| order.compare(b, a));
        data
    }

    #[inline]
    fn sift_up(&mut self, mut pos: usize) {
        while pos > 0 {
            let parent = (pos - 1) / 2;
            if self.order.compare(&self.data[pos], &self.data[parent]) != Ordering::Less {
                break;
            }
            self.data.swap(pos, parent);
            pos = parent;
        }
    }

    #[inline]
    fn sift_down(&mut self, mut pos: usize) {
        let len = self.data.len();
        loop {
            let left = 2 * pos + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            let smallest = if right < len
                && self.order.compare(&self.data[right], &self.data[left]) == Ordering::Less
            {
                right
            } else {
                left
            };
            if self.order.compare(&self.data[smallest], &self.data[pos]) != Ordering::Less {
                break;
            }
            self.data.swap(pos, smallest);
            pos = smallest;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn by_value(a: &u32, b: &u32) -> Ordering {
        a.cmp(b)
    }

    fn heap() -> BoundedTopKHeap<u32, fn(&u32, &u32) -> Ordering> {
        BoundedTopKHeap::new(by_value as fn(&u32, &u32) -> Ordering)
    }

    /// Deterministic pseudo-random stream (xorshift).
    fn stream(n: usize, seed: u64) -> Vec<u32> {
        let mut state = seed.max(1);
        (0..n)
            .map(|_| {
                state ^= state << 13;
                state ^= state >> 7;
                state ^= state << 17;
                (state % 1000) as u32
            })
            .collect()
    }

    #[test]
    fn keeps_largest() {
        let mut h = heap();
        for v in [5, 2, 8, 10, 1] {
            h.push_bounded(v, 3);
        }
        assert_eq!(h.len(), 3);
        assert_eq!(h.into_sorted_vec(), vec![10, 8, 5]);
    }

    #[test]
    fn replaces_lowest_only_when_strictly_greater() {
        let mut h = heap();
        assert!(h.push_bounded(10, 2));
        assert!(h.push_bounded(20, 2));
        assert!(h.push_bounded(15, 2));
        assert!(!h.push_bounded(10, 2));
        assert!(!h.push_bounded(15, 2));
        assert_eq!(h.peek_min(), Some(&15));
        assert_eq!(h.into_sorted_vec(), vec![20, 15]);
    }

    #[test]
    fn tie_at_boundary_keeps_resident() {
        let mut h = BoundedTopKHeap::new(|a: &(u32, char), b: &(u32, char)| a.0.cmp(&b.0));
        h.push_bounded((7, 'a'), 1);
        h.push_bounded((7, 'b'), 1);
        assert_eq!(h.into_vec(), vec![(7, 'a')]);
    }

    #[test]
    fn zero_capacity_retains_nothing() {
        let mut h = heap();
        for v in 0..10 {
            assert!(!h.push_bounded(v, 0));
        }
        assert!(h.is_empty());
        assert_eq!(h.peek_min(), None);
    }

    #[test]
    fn capacity_above_input_retains_everything() {
        let mut h = heap();
        for v in [3, 1, 2] {
            h.push_bounded(v, 10);
        }
        assert_eq!(h.into_sorted_vec(), vec![3, 2, 1]);
    }

    #[test]
    fn peek_min_tracks_worst() {
        let mut h = heap();
        h.push_bounded(10, 5);
        h.push_bounded(5, 5);
        h.push_bounded(7, 5);
        assert_eq!(h.peek_min(), Some(&5));
    }

    #[test]
    fn exact_against_brute_force() {
        let n = 200;
        for seed in [1u64, 7, 42, 1234] {
            let input = stream(n, seed);
            for k in [0, 1, n / 2, n, n + 5] {
                let mut h = heap();
                for &v in &input {
                    h.push_bounded(v, k);
                }

                let mut expected = input.clone();
                expected.sort_unstable_by(|a, b| b.cmp(a));
                expected.truncate(k);

                assert_eq!(h.into_sorted_vec(), expected, "seed={seed} k={k}");
            }
        }
    }

    #[test]
    fn arrival_order_does_not_matter() {
        let input = stream(100, 99);
        let mut reversed = input.clone();
        reversed.reverse();
        let mut sorted = input.clone();
        sorted.sort_unstable();

        let top = |items: &[u32]| {
            let mut h = heap();
            for &v in items {
                h.push_bounded(v, 10);
            }
            h.into_sorted_vec()
        };

        assert_eq!(top(&input), top(&reversed));
        assert_eq!(top(&input), top(&sorted));
    }

    #[test]
    fn into_vec_contains_retained_set() {
        let mut h = heap();
        for v in 1..=5 {
            h.push_bounded(v, 2);
        }
        let mut items = h.into_vec();
        items.sort_unstable();
        assert_eq!(items, vec![4, 5]);
    }
}
