use std::collections::VecDeque;

/// One buffered training example: `(features, label, weight, timestamp)`
/// (`SPEC_FULL.md` §4.2).
#[derive(Debug, Clone)]
pub struct ReplaySample<X, L> {
    pub x: X,
    pub y: L,
    pub w: f64,
    pub t: u64,
}

/// Per-class bounded recency buffers, one `VecDeque` per declared class,
/// each capped at `sizesam = ceil(sizelab * epsilon / n_classes)`.
pub struct ReplayBuffer<X, L> {
    sizesam: usize,
    buffers: Vec<VecDeque<ReplaySample<X, L>>>,
}

impl<X: Clone, L: Clone> ReplayBuffer<X, L> {
    pub fn new(n_classes: usize, sizesam: usize) -> Self {
        ReplayBuffer {
            sizesam,
            buffers: (0..n_classes).map(|_| VecDeque::with_capacity(sizesam)).collect(),
        }
    }

    pub fn add(&mut self, class_index: usize, x: X, y: L, w: f64, t: u64) {
        let buf = &mut self.buffers[class_index];
        buf.push_back(ReplaySample { x, y, w, t });
        while buf.len() > self.sizesam {
            buf.pop_front();
        }
    }

    pub fn len(&self, class_index: usize) -> usize {
        self.buffers[class_index].len()
    }

    /// All buffered entries across every class buffer, sorted ascending by
    /// timestamp. Non-destructive: the name is inherited from the spec, but
    /// (matching the Python source's `initalize_base_classifiers`, which
    /// iterates `self.learning_queues[i]` without clearing it) nothing is
    /// removed from the buffer.
    pub fn drain_sorted(&self) -> Vec<ReplaySample<X, L>> {
        let mut all: Vec<ReplaySample<X, L>> = self
            .buffers
            .iter()
            .flat_map(|buf| buf.iter().cloned())
            .collect();
        all.sort_by(|a, b| a.t.cmp(&b.t));
        all
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evicts_fifo_per_class() {
        let mut rb = ReplayBuffer::new(2, 2);
        rb.add(0, "a", 0u8, 1.0, 1);
        rb.add(0, "b", 0u8, 1.0, 2);
        rb.add(0, "c", 0u8, 1.0, 3);
        assert_eq!(rb.len(0), 2);
        let snap = rb.drain_sorted();
        assert_eq!(snap.iter().map(|s| s.x).collect::<Vec<_>>(), vec!["b", "c"]);
    }

    #[test]
    fn drain_sorted_merges_classes_by_timestamp() {
        let mut rb = ReplayBuffer::new(2, 10);
        rb.add(0, "xA'", 0u8, 1.0, 3);
        rb.add(1, "xB", 1u8, 1.0, 2);
        rb.add(0, "xA", 0u8, 1.0, 1);
        let snap = rb.drain_sorted();
        let ts: Vec<u64> = snap.iter().map(|s| s.t).collect();
        assert_eq!(ts, vec![1, 2, 3]);
    }

    #[test]
    fn drain_sorted_does_not_remove_entries() {
        let mut rb = ReplayBuffer::new(1, 5);
        rb.add(0, "a", 0u8, 1.0, 1);
        let _ = rb.drain_sorted();
        assert_eq!(rb.len(0), 1);
    }
}
