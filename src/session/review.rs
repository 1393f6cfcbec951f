/// Tracks which slot the review carousel shows, independent of the capture target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewNavigator {
    displayed_index: usize,
    slot_count: usize,
}

impl ReviewNavigator {
    pub fn new(slot_count: usize) -> Self {
        Self {
            displayed_index: 0,
            slot_count,
        }
    }

    pub fn displayed_index(&self) -> usize {
        self.displayed_index
    }

    pub fn next(&mut self) -> usize {
        self.displayed_index = (self.displayed_index + 1) % self.slot_count;
        self.displayed_index
    }

    pub fn previous(&mut self) -> usize {
        self.displayed_index = (self.displayed_index + self.slot_count - 1) % self.slot_count;
        self.displayed_index
    }

    pub(crate) fn show(&mut self, index: usize) {
        debug_assert!(index < self.slot_count);
        self.displayed_index = index;
    }

    pub(crate) fn reset(&mut self) {
        self.displayed_index = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_wraps_to_first_slot() {
        let mut navigator = ReviewNavigator::new(3);
        assert_eq!(navigator.next(), 1);
        assert_eq!(navigator.next(), 2);
        assert_eq!(navigator.next(), 0);
    }

    #[test]
    fn previous_wraps_to_last_slot() {
        let mut navigator = ReviewNavigator::new(3);
        assert_eq!(navigator.previous(), 2);
        assert_eq!(navigator.previous(), 1);
    }

    #[test]
    fn full_cycle_returns_to_start() {
        for start in 0..3 {
            let mut navigator = ReviewNavigator::new(3);
            navigator.show(start);
            for _ in 0..3 {
                navigator.next();
            }
            assert_eq!(navigator.displayed_index(), start);
            for _ in 0..3 {
                navigator.previous();
            }
            assert_eq!(navigator.displayed_index(), start);
        }
    }

    #[test]
    fn single_slot_never_moves() {
        let mut navigator = ReviewNavigator::new(1);
        assert_eq!(navigator.next(), 0);
        assert_eq!(navigator.previous(), 0);
    }
}
