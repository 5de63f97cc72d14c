use std::collections::HashMap;
use std::time::{Duration, Instant};

use chrono::NaiveDate;

use crate::format::{self, compare_labels};
use crate::load::{LoadStatus, PollTimer, Slot};
use crate::model::{DaySchedule, Fixture};
use crate::state::{LoadRequest, Payload, Section, Ticket};

/// Which sections the home screen shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeMode {
    /// Exactly one date, navigable.
    DateWindow,
    /// Live + today, with tomorrow and the upcoming week when today is empty.
    LiveFallback,
    /// `LiveFallback` plus an independent date picker section.
    Hybrid,
}

impl HomeMode {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "date" | "date-window" | "window" => Some(HomeMode::DateWindow),
            "live" | "live-fallback" | "fallback" => Some(HomeMode::LiveFallback),
            "hybrid" => Some(HomeMode::Hybrid),
            _ => None,
        }
    }

    pub fn has_live_sections(self) -> bool {
        matches!(self, HomeMode::LiveFallback | HomeMode::Hybrid)
    }

    pub fn has_date_picker(self) -> bool {
        matches!(self, HomeMode::DateWindow | HomeMode::Hybrid)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeagueOption {
    pub id: u64,
    pub label: String,
}

/// Distinct leagues among `fixtures`, labelled and sorted for display.
pub fn league_options<'a>(fixtures: impl IntoIterator<Item = &'a Fixture>) -> Vec<LeagueOption> {
    let mut labels: HashMap<u64, String> = HashMap::new();
    for f in fixtures {
        labels.insert(f.league_id, f.league_label());
    }
    let mut out: Vec<LeagueOption> = labels
        .into_iter()
        .map(|(id, label)| LeagueOption { id, label })
        .collect();
    out.sort_by(|a, b| compare_labels(&a.label, &b.label).then(a.id.cmp(&b.id)));
    out
}

pub fn filter_by_league(fixtures: &[Fixture], league: Option<u64>) -> Vec<&Fixture> {
    match league {
        None => fixtures.iter().collect(),
        Some(id) => fixtures.iter().filter(|f| f.league_id == id).collect(),
    }
}

pub struct HomeView {
    mode: HomeMode,
    upcoming_days: u32,
    pub selected_date: NaiveDate,
    pub live: Slot<Vec<Fixture>>,
    pub today: Slot<Vec<Fixture>>,
    pub tomorrow: Slot<Vec<Fixture>>,
    pub upcoming: Slot<Vec<DaySchedule>>,
    pub picked: Slot<Vec<Fixture>>,
    pub league: Option<u64>,
    pub selected: usize,
    last_success: Option<Instant>,
    timer: PollTimer,
    closed: bool,
}

impl HomeView {
    pub fn new(mode: HomeMode, today: NaiveDate, poll_interval: Duration, upcoming_days: u32) -> Self {
        Self {
            mode,
            upcoming_days,
            selected_date: today,
            live: Slot::default(),
            today: Slot::default(),
            tomorrow: Slot::default(),
            upcoming: Slot::default(),
            picked: Slot::default(),
            league: None,
            selected: 0,
            last_success: None,
            timer: PollTimer::new(poll_interval),
            closed: false,
        }
    }

    pub fn mode(&self) -> HomeMode {
        self.mode
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn is_polling(&self) -> bool {
        self.timer.is_running()
    }

    /// Mounts the view: starts the poll timer and issues the first loads.
    pub fn start(&mut self, now: Instant) -> Vec<Ticket> {
        self.closed = false;
        self.timer.start(now);
        self.refresh()
    }

    /// Tears the view down. Nothing issued before this is applied afterwards.
    pub fn close(&mut self) {
        self.closed = true;
        self.timer.stop();
    }

    pub fn poll(&mut self, now: Instant) -> Vec<Ticket> {
        if self.closed || !self.timer.fire(now) {
            return Vec::new();
        }
        self.refresh()
    }

    /// Loads every primary section that is not already waiting on a response.
    /// Fallback sections are driven by today's result, not by the timer.
    pub fn refresh(&mut self) -> Vec<Ticket> {
        if self.closed {
            return Vec::new();
        }
        let mut tickets = Vec::new();
        if self.mode.has_live_sections() {
            if !self.live.is_inflight() {
                tickets.push(Ticket::new(Section::Live, self.live.begin(), LoadRequest::Live));
            }
            if !self.today.is_inflight() {
                tickets.push(Ticket::new(Section::Today, self.today.begin(), LoadRequest::Today));
            }
        }
        if self.mode.has_date_picker() && !self.picked.is_inflight() {
            tickets.push(Ticket::new(
                Section::Picked,
                self.picked.begin(),
                LoadRequest::Date(self.selected_date),
            ));
        }
        tickets
    }

    /// Switches the picked date. The previous date's request, if still in
    /// flight, is superseded and its result will be dropped.
    pub fn set_date(&mut self, date: NaiveDate) -> Vec<Ticket> {
        if self.closed || !self.mode.has_date_picker() {
            return Vec::new();
        }
        self.selected_date = date;
        self.selected = 0;
        let generation = self.picked.restart();
        vec![Ticket::new(Section::Picked, generation, LoadRequest::Date(date))]
    }

    pub fn prev_day(&mut self) -> Vec<Ticket> {
        self.set_date(format::shift_date(self.selected_date, -1))
    }

    pub fn next_day(&mut self) -> Vec<Ticket> {
        self.set_date(format::shift_date(self.selected_date, 1))
    }

    pub fn jump_today(&mut self, today: NaiveDate) -> Vec<Ticket> {
        self.set_date(today)
    }

    /// Applies a completed load. Returns follow-up loads (the tomorrow /
    /// upcoming fallback when today turned out empty).
    pub fn apply(&mut self, ticket: &Ticket, payload: Result<Payload, String>, now: Instant) -> Vec<Ticket> {
        if self.closed {
            return Vec::new();
        }
        let mut follow_up = Vec::new();
        let outcome = match ticket.section {
            Section::Live => self.live.settle(ticket.generation, payload.and_then(Payload::into_fixtures)),
            Section::Tomorrow => {
                self.tomorrow.settle(ticket.generation, payload.and_then(Payload::into_fixtures))
            }
            Section::Picked => self.picked.settle(ticket.generation, payload.and_then(Payload::into_fixtures)),
            Section::Upcoming => {
                self.upcoming.settle(ticket.generation, payload.and_then(Payload::into_schedule))
            }
            Section::Today => {
                let outcome =
                    self.today.settle(ticket.generation, payload.and_then(Payload::into_fixtures));
                if outcome.is_some() {
                    if self.today.data.is_empty() {
                        follow_up = self.load_fallback();
                    } else {
                        self.tomorrow.clear();
                        self.upcoming.clear();
                    }
                }
                outcome
            }
            Section::Detail => None,
        };

        if outcome == Some(true) {
            self.last_success = Some(now);
            self.drop_missing_league();
        }
        self.clamp_selection();
        follow_up
    }

    fn load_fallback(&mut self) -> Vec<Ticket> {
        let mut tickets = Vec::new();
        if !self.tomorrow.is_inflight() {
            tickets.push(Ticket::new(
                Section::Tomorrow,
                self.tomorrow.begin(),
                LoadRequest::Tomorrow,
            ));
        }
        if !self.upcoming.is_inflight() {
            tickets.push(Ticket::new(
                Section::Upcoming,
                self.upcoming.begin(),
                LoadRequest::Upcoming {
                    days: self.upcoming_days,
                },
            ));
        }
        tickets
    }

    pub fn last_updated_text(&self, now: Instant) -> String {
        format::last_updated_text(self.last_success.map(|at| now.saturating_duration_since(at)))
    }

    /// Every fixture currently loaded, in display order, before filtering.
    pub fn loaded_fixtures(&self) -> Vec<&Fixture> {
        let mut out: Vec<&Fixture> = Vec::new();
        out.extend(self.live.data.iter());
        out.extend(self.today.data.iter());
        out.extend(self.tomorrow.data.iter());
        for day in &self.upcoming.data {
            out.extend(day.fixtures.iter());
        }
        out.extend(self.picked.data.iter());
        out
    }

    pub fn league_options(&self) -> Vec<LeagueOption> {
        league_options(self.loaded_fixtures())
    }

    pub fn league_label(&self) -> String {
        match self.league {
            None => format::ALL_LEAGUES.to_string(),
            Some(id) => self
                .league_options()
                .into_iter()
                .find(|opt| opt.id == id)
                .map(|opt| opt.label)
                .unwrap_or_else(|| format::league_fallback(id)),
        }
    }

    /// all → first league → … → last league → all
    pub fn cycle_league(&mut self) {
        let options = self.league_options();
        self.league = match self.league {
            None => options.first().map(|opt| opt.id),
            Some(current) => options
                .iter()
                .position(|opt| opt.id == current)
                .and_then(|idx| options.get(idx + 1))
                .map(|opt| opt.id),
        };
        self.selected = 0;
    }

    pub fn set_league(&mut self, league: Option<u64>) {
        self.league = league;
        self.selected = 0;
    }

    fn drop_missing_league(&mut self) {
        if let Some(id) = self.league
            && !self.loaded_fixtures().iter().any(|f| f.league_id == id)
        {
            self.league = None;
        }
    }

    pub fn filtered<'a>(&self, fixtures: &'a [Fixture]) -> Vec<&'a Fixture> {
        filter_by_league(fixtures, self.league)
    }

    /// Rows the cursor can land on, in the same order they are drawn.
    pub fn selectable(&self) -> Vec<&Fixture> {
        self.loaded_fixtures()
            .into_iter()
            .filter(|f| self.league.is_none_or(|id| f.league_id == id))
            .collect()
    }

    pub fn selected_fixture(&self) -> Option<&Fixture> {
        self.selectable().get(self.selected).copied()
    }

    pub fn select_next(&mut self) {
        let total = self.selectable().len();
        if total > 0 && self.selected + 1 < total {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    fn clamp_selection(&mut self) {
        let total = self.selectable().len();
        if total == 0 {
            self.selected = 0;
        } else if self.selected >= total {
            self.selected = total - 1;
        }
    }

    pub fn section_status(&self, section: Section) -> LoadStatus {
        match section {
            Section::Live => self.live.status,
            Section::Today => self.today.status,
            Section::Tomorrow => self.tomorrow.status,
            Section::Upcoming => self.upcoming.status,
            Section::Picked => self.picked.status,
            Section::Detail => LoadStatus::Idle,
        }
    }
}
