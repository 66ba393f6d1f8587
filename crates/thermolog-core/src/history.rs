//! Fixed-capacity circular history of calibrated samples.

/// Vacancy sentinel. A slot holding zero reads as "never written", so a
/// measured 0 °C is indistinguishable from empty history. Known protocol
/// ambiguity, kept; see DESIGN.md.
pub const EMPTY_SLOT: u8 = 0;

/// Circular log of one-byte samples.
///
/// The write index advances before the store, so slot 0 stays vacant
/// until the first wraparound and [`head`](Self::head) always names the
/// most recent sample. Reading the history backward is the report state
/// machine's job; this type only stores.
#[derive(Debug)]
pub struct SampleLog<const N: usize> {
    slots: [u8; N],
    head: usize,
}

impl<const N: usize> SampleLog<N> {
    pub const fn new() -> Self {
        Self {
            slots: [EMPTY_SLOT; N],
            head: 0,
        }
    }

    /// Store one sample, unconditionally overwriting the oldest entry
    /// when the log is full. No backpressure, no loss notification.
    pub fn record(&mut self, sample: u8) {
        self.head = if self.head + 1 >= N { 0 } else { self.head + 1 };
        self.slots[self.head] = sample;
    }

    /// Reset to the freshly-started state: every slot vacant, head at 0.
    pub fn clear(&mut self) {
        self.slots = [EMPTY_SLOT; N];
        self.head = 0;
    }

    /// Index of the most recently written slot.
    pub fn head(&self) -> usize {
        self.head
    }

    pub fn get(&self, index: usize) -> u8 {
        self.slots[index]
    }

    pub const fn capacity(&self) -> usize {
        N
    }
}

impl<const N: usize> Default for SampleLog<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_vacant() {
        let log = SampleLog::<4>::new();
        assert_eq!(log.head(), 0);
        for i in 0..log.capacity() {
            assert_eq!(log.get(i), EMPTY_SLOT);
        }
    }

    #[test]
    fn test_write_index_advances_before_store() {
        let mut log = SampleLog::<4>::new();
        log.record(21);
        assert_eq!(log.head(), 1, "first sample lands at slot 1");
        assert_eq!(log.get(1), 21);
        assert_eq!(log.get(0), EMPTY_SLOT, "slot 0 vacant until wraparound");
    }

    #[test]
    fn test_wraparound_overwrites_oldest() {
        let mut log = SampleLog::<4>::new();
        for sample in 1..=5 {
            log.record(sample);
        }
        // Five records into four slots: 1 was at slot 1 and got replaced
        // by 5 after the head wrapped through slot 0.
        assert_eq!(log.head(), 1);
        assert_eq!(log.get(1), 5);
        assert_eq!(log.get(0), 4);
        assert_eq!(log.get(3), 3);
        assert_eq!(log.get(2), 2);
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut log = SampleLog::<4>::new();
        for sample in 1..=5 {
            log.record(sample);
        }
        log.clear();
        assert_eq!(log.head(), 0);
        for i in 0..log.capacity() {
            assert_eq!(log.get(i), EMPTY_SLOT);
        }
    }
}
