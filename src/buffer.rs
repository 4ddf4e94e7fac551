//! Fixed capacity sample ring.

use heapless::Deque;

/// A ring of the `N` most recent samples.
///
/// Pushing into a full buffer evicts the oldest sample, discarding from an
/// empty one does nothing.
pub struct SampleBuffer<T, const N: usize> {
    samples: Deque<T, N>,
}

impl<T: Copy, const N: usize> SampleBuffer<T, N> {
    const NON_ZERO: () = assert!(N > 0, "sample buffer capacity must be at least 1");

    pub const fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::NON_ZERO;
        Self {
            samples: Deque::new(),
        }
    }

    /// Push with overwrite of the oldest sample.
    pub fn push(&mut self, sample: T) {
        if self.samples.is_full() {
            self.samples.pop_front();
        }
        // cannot fail, a slot was freed above
        let _ = self.samples.push_back(sample);
    }

    pub fn oldest(&self) -> Option<T> {
        self.samples.front().copied()
    }

    pub fn latest(&self) -> Option<T> {
        self.samples.back().copied()
    }

    /// Remove the oldest sample.
    pub fn discard(&mut self) -> Option<T> {
        self.samples.pop_front()
    }

    pub fn flush(&mut self) {
        self.samples.clear();
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.samples.is_full()
    }

    /// Oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.samples.iter()
    }
}

impl<T: Copy, const N: usize> Default for SampleBuffer<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evicts_oldest_when_full() {
        let mut buf: SampleBuffer<u32, 3> = SampleBuffer::new();
        for v in 1..=5 {
            buf.push(v);
        }
        assert!(buf.is_full());
        assert_eq!(buf.len(), 3);
        assert_eq!(buf.oldest(), Some(3));
        assert_eq!(buf.latest(), Some(5));
    }

    #[test]
    fn discard_on_empty_is_noop() {
        let mut buf: SampleBuffer<u32, 2> = SampleBuffer::new();
        assert_eq!(buf.discard(), None);
        assert!(buf.is_empty());
        assert_eq!(buf.oldest(), None);
        assert_eq!(buf.latest(), None);

        buf.push(7);
        assert_eq!(buf.discard(), Some(7));
        assert_eq!(buf.discard(), None);
        assert_eq!(buf.len(), 0);
    }

    #[test]
    fn flush_empties() {
        let mut buf: SampleBuffer<u8, 4> = SampleBuffer::new();
        buf.push(1);
        buf.push(2);
        buf.flush();
        assert!(buf.is_empty());
        assert!(!buf.is_full());
        assert_eq!(buf.capacity(), 4);
    }

    #[test]
    fn single_slot_keeps_latest() {
        let mut buf: SampleBuffer<i32, 1> = SampleBuffer::default();
        buf.push(-1);
        buf.push(42);
        assert_eq!(buf.oldest(), Some(42));
        assert!(buf.iter().eq([42].iter()));
    }
}
