//! Array-backed binary min-heap holding the subtrees that still wait to be
//! merged. Children of slot `i` live at `2i + 1` and `2i + 2`.

use crate::error::HeapError;

/// Anything the queue can order. Smaller weight comes out first.
pub trait Weighted {
    fn weight(&self) -> u64;
}

impl Weighted for u64 {
    fn weight(&self) -> u64 {
        *self
    }
}

#[derive(Debug)]
pub struct MinPriorityQueue<T> {
    items: Vec<T>,
    capacity: usize,
}

impl<T: Weighted> MinPriorityQueue<T> {
    pub fn with_capacity(capacity: usize) -> Result<Self, HeapError> {
        if capacity == 0 {
            return Err(HeapError::ZeroCapacity);
        }

        Ok(MinPriorityQueue {
            items: Vec::with_capacity(capacity),
            capacity,
        })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn insert(&mut self, item: T) -> Result<(), HeapError> {
        if self.items.len() == self.capacity {
            return Err(HeapError::CapacityExceeded {
                capacity: self.capacity,
            });
        }

        self.items.push(item);
        self.sift_up(self.items.len() - 1);
        Ok(())
    }

    /// Removes the lightest item. The last element takes the root slot and
    /// sinks back down.
    pub fn extract_min(&mut self) -> Result<T, HeapError> {
        if self.items.is_empty() {
            return Err(HeapError::EmptyQueue);
        }

        let min = self.items.swap_remove(0);
        self.sift_down(0);
        Ok(min)
    }

    /// True when every element weighs at least as much as its parent.
    pub fn is_heap_ordered(&self) -> bool {
        (1..self.items.len())
            .all(|i| self.items[(i - 1) / 2].weight() <= self.items[i].weight())
    }

    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if self.items[index].weight() >= self.items[parent].weight() {
                return;
            }
            self.items.swap(index, parent);
            index = parent;
        }
    }

    fn sift_down(&mut self, mut index: usize) {
        let last = self.items.len();

        loop {
            let left = 2 * index + 1;
            if left >= last {
                return;
            }

            let right = left + 1;
            // ties between siblings go to the right child
            let child = if right >= last || self.items[left].weight() < self.items[right].weight() {
                left
            } else {
                right
            };

            if self.items[index].weight() <= self.items[child].weight() {
                return;
            }
            self.items.swap(index, child);
            index = child;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn zero_capacity_is_rejected() {
        let heap = MinPriorityQueue::<u64>::with_capacity(0);
        assert_eq!(heap.unwrap_err(), HeapError::ZeroCapacity);
    }

    #[test]
    fn insert_past_capacity_fails() {
        let mut heap = MinPriorityQueue::with_capacity(2).unwrap();
        heap.insert(5u64).unwrap();
        heap.insert(3u64).unwrap();

        assert_eq!(
            heap.insert(1u64),
            Err(HeapError::CapacityExceeded { capacity: 2 })
        );
        assert_eq!(heap.len(), 2);
    }

    #[test]
    fn extract_from_empty_fails() {
        let mut heap = MinPriorityQueue::<u64>::with_capacity(4).unwrap();
        assert_eq!(heap.extract_min(), Err(HeapError::EmptyQueue));
    }

    #[test]
    fn extracts_in_ascending_order() {
        let mut heap = MinPriorityQueue::with_capacity(16).unwrap();
        for value in [9u64, 4, 7, 1, 8, 2, 2, 6, 0, 5] {
            heap.insert(value).unwrap();
        }

        let mut drained = Vec::new();
        while !heap.is_empty() {
            drained.push(heap.extract_min().unwrap());
        }

        assert_eq!(drained, vec![0, 1, 2, 2, 4, 5, 6, 7, 8, 9]);
    }

    #[test]
    fn stays_ordered_under_mixed_operations() {
        let mut heap = MinPriorityQueue::with_capacity(64).unwrap();
        let mut rng = StdRng::seed_from_u64(0x2545_f491);

        for step in 0..500 {
            let value: u64 = rng.random_range(0..256);

            if step % 3 == 2 || heap.len() == heap.capacity() {
                let min = heap.extract_min().unwrap();
                assert!(heap.is_heap_ordered());
                if let Ok(next) = heap.extract_min() {
                    assert!(min <= next);
                    heap.insert(next).unwrap();
                }
            } else {
                heap.insert(value).unwrap();
            }

            assert!(heap.is_heap_ordered(), "heap order broken at step {}", step);
        }
    }
}
