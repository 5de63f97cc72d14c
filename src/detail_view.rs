use crate::detail::MatchDetail;
use crate::load::{LoadStatus, Slot};
use crate::state::{LoadRequest, Payload, Section, Ticket};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailPhase {
    Loading,
    Failed,
    Loaded,
}

/// Match detail screen for one fixture id.
pub struct DetailView {
    fixture_id: u64,
    slot: Slot<Option<MatchDetail>>,
    closed: bool,
}

impl DetailView {
    /// `after_generation` is the last generation handed out by a previous
    /// detail view, so its late completions never match this one.
    pub fn new(fixture_id: u64, after_generation: u64) -> Self {
        Self {
            fixture_id,
            slot: Slot::starting_at(after_generation),
            closed: false,
        }
    }

    pub fn fixture_id(&self) -> u64 {
        self.fixture_id
    }

    pub fn generation(&self) -> u64 {
        self.slot.generation()
    }

    pub fn start(&mut self) -> Ticket {
        self.closed = false;
        Ticket::new(
            Section::Detail,
            self.slot.restart(),
            LoadRequest::MatchDetail(self.fixture_id),
        )
    }

    /// Manual reload; skipped while a load is outstanding.
    pub fn refresh(&mut self) -> Option<Ticket> {
        if self.closed || self.slot.is_inflight() {
            return None;
        }
        Some(Ticket::new(
            Section::Detail,
            self.slot.begin(),
            LoadRequest::MatchDetail(self.fixture_id),
        ))
    }

    pub fn close(&mut self) {
        self.closed = true;
        self.slot.clear();
    }

    /// Returns false when the completion was dropped as stale.
    pub fn apply(&mut self, ticket: &Ticket, payload: Result<Payload, String>) -> bool {
        if self.closed
            || ticket.section != Section::Detail
            || ticket.request != LoadRequest::MatchDetail(self.fixture_id)
        {
            return false;
        }
        self.slot
            .settle(ticket.generation, payload.and_then(Payload::into_detail))
            .is_some()
    }

    pub fn phase(&self) -> DetailPhase {
        match (self.slot.status, self.slot.data.as_ref()) {
            (_, Some(_)) => DetailPhase::Loaded,
            (LoadStatus::Ready | LoadStatus::Failed, None) => DetailPhase::Failed,
            (LoadStatus::Idle | LoadStatus::Loading, None) => DetailPhase::Loading,
        }
    }

    pub fn detail(&self) -> Option<&MatchDetail> {
        self.slot.data.as_ref()
    }
}
