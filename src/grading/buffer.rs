// SimilarityBuffer - bounded rolling window of recent similarity samples

use std::collections::VecDeque;

/// Fixed-capacity FIFO of similarity samples for the active target
///
/// Pushing past capacity evicts the oldest sample. Samples are stored as
/// given; clamping is the grader's job.
#[derive(Debug, Clone)]
pub struct SimilarityBuffer {
    samples: VecDeque<f32>,
    capacity: usize,
}

impl SimilarityBuffer {
    /// Create an empty buffer
    ///
    /// A capacity of 0 is treated as 1; callers are expected to have
    /// validated the configuration already.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a sample, evicting the oldest when full
    pub fn push(&mut self, sample: f32) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Change capacity, keeping the newest samples
    pub fn resize(&mut self, capacity: usize) {
        let capacity = capacity.max(1);
        while self.samples.len() > capacity {
            self.samples.pop_front();
        }
        self.capacity = capacity;
    }

    /// Number of buffered samples `>= threshold`
    pub fn pass_count(&self, threshold: f32) -> usize {
        self.samples.iter().filter(|&&s| s >= threshold).count()
    }

    /// Lower median of the buffered samples
    ///
    /// Sorts ascending and takes index `len / 2` for odd lengths and
    /// `len / 2 - 1` for even lengths, i.e. the lower of the two middle
    /// elements. Returns `None` for an empty buffer.
    pub fn median(&self) -> Option<f32> {
        if self.samples.is_empty() {
            return None;
        }
        let mut sorted: Vec<f32> = self.samples.iter().copied().collect();
        sorted.sort_by(|a, b| a.total_cmp(b));
        Some(sorted[(sorted.len() - 1) / 2])
    }

    /// Samples in arrival order, oldest first
    pub fn snapshot(&self) -> Vec<f32> {
        self.samples.iter().copied().collect()
    }
}
