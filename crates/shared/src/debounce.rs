use std::time::Duration;

/// Quiescence window for pan/zoom driven URL writes.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Identifies one scheduled value. Only the most recent ticket fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Last-write-wins debouncer with no clock of its own.
///
/// The caller arms a timer for every [`Debouncer::schedule`] and hands the
/// ticket back to [`Debouncer::fire`] when it elapses. A ticket superseded by
/// a later schedule yields nothing, so a burst collapses to its final value.
#[derive(Debug)]
pub struct Debouncer<T> {
    generation: u64,
    pending: Option<T>,
}

impl<T> Default for Debouncer<T> {
    fn default() -> Self {
        Debouncer {
            generation: 0,
            pending: None,
        }
    }
}

impl<T> Debouncer<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, value: T) -> Ticket {
        self.generation += 1;
        self.pending = Some(value);
        Ticket(self.generation)
    }

    pub fn fire(&mut self, ticket: Ticket) -> Option<T> {
        if ticket.0 != self.generation {
            return None;
        }
        self.pending.take()
    }

    /// Drop whatever is pending; outstanding tickets become no-ops.
    pub fn cancel(&mut self) {
        self.generation += 1;
        self.pending = None;
    }
}
