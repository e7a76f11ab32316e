/// Actions scheduled to run after a delay, drained at a fixed point of the frame.
#[derive(Debug, Clone)]
pub struct DeferredQueue<A> {
    entries: Vec<DeferredEntry<A>>,
}

#[derive(Debug, Clone)]
struct DeferredEntry<A> {
    remaining_ms: f32,
    action: A,
}

impl<A> Default for DeferredQueue<A> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<A> DeferredQueue<A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, action: A, delay_ms: f32) {
        let remaining_ms = if delay_ms.is_finite() {
            delay_ms.max(0.0)
        } else {
            0.0
        };
        self.entries.push(DeferredEntry {
            remaining_ms,
            action,
        });
    }

    /// Advances every entry by `dt_ms` and returns the due actions in scheduling order.
    pub fn drain_due(&mut self, dt_ms: f32) -> Vec<A> {
        let dt_ms = if dt_ms.is_finite() { dt_ms.max(0.0) } else { 0.0 };
        let mut due = Vec::new();
        let mut pending = Vec::with_capacity(self.entries.len());
        for mut entry in self.entries.drain(..) {
            entry.remaining_ms -= dt_ms;
            if entry.remaining_ms <= 0.0 {
                due.push(entry.action);
            } else {
                pending.push(entry);
            }
        }
        self.entries = pending;
        due
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
