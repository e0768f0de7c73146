//! Arrival ordering for events that reach the renderer along different paths.
//!
//! Activations render at once while content changes wait in the debouncer,
//! so a change can come out of the debouncer after a newer activation has
//! already rendered. Each event is stamped when it arrives; the renderer
//! accepts a stamp only if it is newer than the last one it rendered.

/// Hands out arrival stamps and remembers the newest one rendered.
#[derive(Debug, Default, Clone)]
pub struct Sequencer {
    next: u64,
    rendered: Option<u64>,
}

impl Sequencer {
    /// Creates a sequencer with nothing rendered yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamps an event at arrival time.
    pub fn stamp(&mut self) -> u64 {
        let stamp = self.next;
        self.next += 1;
        stamp
    }

    /// Records `stamp` as rendered if it is newer than every stamp rendered
    /// so far. Returns `false` for a stale stamp, which must not render.
    pub fn accept(&mut self, stamp: u64) -> bool {
        if self.rendered.is_some_and(|last| stamp <= last) {
            return false;
        }
        self.rendered = Some(stamp);
        true
    }
}
