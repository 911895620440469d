/// Bounded free list of retired entities kept for reuse.
#[derive(Clone, Debug)]
pub struct ObjectPool<T> {
    items: Vec<T>,
    trim_above: usize,
    trim_to: usize,
}

impl<T> ObjectPool<T> {
    /// Creates an empty pool that holds at most `trim_above` items and shrinks to
    /// `trim_to` items under memory pressure.
    #[must_use]
    pub const fn new(trim_above: usize, trim_to: usize) -> Self {
        Self {
            items: Vec::new(),
            trim_above,
            trim_to,
        }
    }

    /// Takes a retired item out of the pool, if one is available.
    pub fn acquire(&mut self) -> Option<T> {
        self.items.pop()
    }

    /// Returns an item to the pool; items beyond capacity are dropped.
    pub fn release(&mut self, item: T) {
        if self.items.len() < self.trim_above {
            self.items.push(item);
        }
    }

    /// Number of pooled items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns whether the pool is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Shrinks the pool to its reduced size when it is full, reporting whether it shrank.
    pub fn trim(&mut self) -> bool {
        if self.items.len() >= self.trim_above && self.items.len() > self.trim_to {
            self.items.truncate(self.trim_to);
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn release_is_capped_and_trim_halves() {
        let mut pool = ObjectPool::new(50, 25);
        for value in 0..80 {
            pool.release(value);
        }
        assert_eq!(pool.len(), 50);

        assert!(pool.trim());
        assert_eq!(pool.len(), 25);
        assert!(!pool.trim(), "only a full pool is trimmed");
        assert_eq!(pool.acquire(), Some(24));
    }
}
