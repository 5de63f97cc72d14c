use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    Idle,
    Loading,
    Ready,
    Failed,
}

/// One independently-loading piece of view state.
///
/// Every request is issued under a fresh generation. A completion is only
/// accepted while its generation is still the current one, so a superseded
/// request can never overwrite newer data regardless of arrival order.
#[derive(Debug, Clone)]
pub struct Slot<T> {
    pub data: T,
    pub status: LoadStatus,
    generation: u64,
    inflight: Option<u64>,
}

impl<T: Default> Default for Slot<T> {
    fn default() -> Self {
        Self {
            data: T::default(),
            status: LoadStatus::Idle,
            generation: 0,
            inflight: None,
        }
    }
}

impl<T: Default> Slot<T> {
    /// Empty slot whose next request is issued after `generation`. Used when a
    /// view is rebuilt so tickets from the previous instance stay stale.
    pub fn starting_at(generation: u64) -> Self {
        Self {
            generation,
            ..Self::default()
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_inflight(&self) -> bool {
        self.inflight.is_some()
    }

    /// Starts a new request, superseding any outstanding one. Existing data
    /// stays visible until the new result lands.
    pub fn begin(&mut self) -> u64 {
        self.generation += 1;
        self.inflight = Some(self.generation);
        if self.status != LoadStatus::Ready {
            self.status = LoadStatus::Loading;
        }
        self.generation
    }

    /// Like `begin`, but drops what was shown. Used when the request's input
    /// changed (a different date) and the old data no longer applies.
    pub fn restart(&mut self) -> u64 {
        self.data = T::default();
        self.status = LoadStatus::Idle;
        self.begin()
    }

    /// Invalidates any outstanding request and empties the slot.
    pub fn clear(&mut self) {
        self.generation += 1;
        self.inflight = None;
        self.data = T::default();
        self.status = LoadStatus::Idle;
    }

    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }

    /// Stores a completion. Returns `None` when the completion is stale,
    /// otherwise whether it succeeded. Failures leave the slot empty.
    pub fn settle(&mut self, generation: u64, result: Result<T, String>) -> Option<bool> {
        if !self.is_current(generation) {
            return None;
        }
        self.inflight = None;
        match result {
            Ok(data) => {
                self.data = data;
                self.status = LoadStatus::Ready;
                Some(true)
            }
            Err(_) => {
                self.data = T::default();
                self.status = LoadStatus::Failed;
                Some(false)
            }
        }
    }

    /// Loading with nothing to show yet.
    pub fn is_pending(&self) -> bool {
        self.status == LoadStatus::Loading
    }
}

/// Repeating refresh timer owned by a view. Stopped timers never fire.
#[derive(Debug, Clone)]
pub struct PollTimer {
    interval: Duration,
    next_due: Option<Instant>,
}

impl PollTimer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_due: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn start(&mut self, now: Instant) {
        self.next_due = Some(now + self.interval);
    }

    pub fn stop(&mut self) {
        self.next_due = None;
    }

    pub fn is_running(&self) -> bool {
        self.next_due.is_some()
    }

    /// True once per elapsed interval. Missed ticks collapse into one.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.next_due {
            Some(due) if now >= due => {
                self.next_due = Some(now + self.interval);
                true
            }
            _ => false,
        }
    }
}
