use std::collections::VecDeque;

/// Fixed-capacity FIFO: pushing past capacity discards the oldest entry.
#[derive(Debug, Clone)]
pub struct Retained<T> {
    items: VecDeque<T>,
    capacity: usize,
}

impl<T> Retained<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, item: T) {
        if self.capacity == 0 {
            return;
        }
        if self.items.len() == self.capacity {
            self.items.pop_front();
        }
        self.items.push_back(item);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Oldest first.
    pub fn into_vec(self) -> Vec<T> {
        self.items.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_most_recent() {
        let mut r = Retained::with_capacity(3);
        for i in 0..5 {
            r.push(i);
        }
        assert_eq!(r.len(), 3);
        assert_eq!(r.into_vec(), vec![2, 3, 4]);
    }

    #[test]
    fn zero_capacity_keeps_nothing() {
        let mut r = Retained::with_capacity(0);
        r.push(1);
        assert!(r.is_empty());
    }
}
