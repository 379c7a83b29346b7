//! Fixed-capacity ring buffer of sampled iterates.

/// Sampled convergence points for one run.
///
/// Slot 0 always holds the initial iterate of the most recent run; later
/// samples fill slots 1.. and wrap back to slot 1 when the buffer is full,
/// so the starting point is never overwritten. Unwritten slots stay `None`
/// until a sample lands in them and are filtered out on read-back.
#[derive(Debug, Clone)]
pub(crate) struct History<T> {
    slots: Vec<Option<T>>,
    cursor: usize,
}

impl<T: Copy> History<T> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        History {
            slots: vec![None; capacity],
            cursor: 0,
        }
    }

    /// Begin a run: store the initial iterate in slot 0 and rewind.
    pub(crate) fn restart(&mut self, x0: T) {
        self.cursor = 0;
        if let Some(slot) = self.slots.get_mut(0) {
            *slot = Some(x0);
        }
    }

    /// Append a sample at the next ring position.
    pub(crate) fn record(&mut self, x: T) {
        // A buffer this small has no room beyond the initial point.
        if self.slots.len() < 2 {
            return;
        }
        self.cursor += 1;
        self.slots[self.cursor] = Some(x);
        if self.cursor == self.slots.len() - 1 {
            self.cursor = 0; // next write wraps to slot 1
        }
    }

    /// The written entries, in slot order, empty markers dropped.
    pub(crate) fn written(&self) -> Vec<T> {
        self.slots.iter().flatten().copied().collect()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty() {
        let history = History::<f64>::with_capacity(4);
        assert!(history.is_empty());
        assert_eq!(history.written(), Vec::<f64>::new());
    }

    #[test]
    fn records_in_slot_order() {
        let mut history = History::with_capacity(4);
        history.restart(10.);
        history.record(8.);
        history.record(6.);
        assert_eq!(history.written(), vec![10., 8., 6.]);
    }

    #[test]
    fn wraps_to_slot_one_preserving_the_initial_point() {
        let mut history = History::with_capacity(3);
        history.restart(10.);
        history.record(8.);
        history.record(6.); // fills the last slot, cursor rewinds
        history.record(4.); // lands in slot 1
        assert_eq!(history.written(), vec![10., 4., 6.]);
    }

    #[test]
    fn degenerate_capacities_do_not_panic() {
        let mut history = History::with_capacity(0);
        history.restart(10.);
        history.record(8.);
        assert!(history.is_empty());

        let mut history = History::with_capacity(1);
        history.restart(10.);
        history.record(8.);
        assert_eq!(history.written(), vec![10.]);
    }
}
