use std::collections::VecDeque;
use std::time::Instant;

use chrono::NaiveDate;
use chrono_tz::Tz;

use crate::config::Config;
use crate::detail::MatchDetail;
use crate::detail_view::DetailView;
use crate::home::HomeView;
use crate::model::{DaySchedule, Fixture};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Live,
    Today,
    Tomorrow,
    Upcoming,
    Picked,
    Detail,
}

impl Section {
    pub fn label(self) -> &'static str {
        match self {
            Section::Live => "live",
            Section::Today => "today",
            Section::Tomorrow => "tomorrow",
            Section::Upcoming => "upcoming",
            Section::Picked => "date",
            Section::Detail => "match detail",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadRequest {
    Live,
    Today,
    Tomorrow,
    Upcoming { days: u32 },
    Date(NaiveDate),
    MatchDetail(u64),
}

/// A load request tagged with the section and generation it was issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub section: Section,
    pub generation: u64,
    pub request: LoadRequest,
}

impl Ticket {
    pub fn new(section: Section, generation: u64, request: LoadRequest) -> Self {
        Self {
            section,
            generation,
            request,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Fixtures(Vec<Fixture>),
    Schedule(Vec<DaySchedule>),
    Detail(Option<MatchDetail>),
}

impl Payload {
    pub fn into_fixtures(self) -> Result<Vec<Fixture>, String> {
        match self {
            Payload::Fixtures(fixtures) => Ok(fixtures),
            _ => Err("unexpected payload for fixture list".to_string()),
        }
    }

    pub fn into_schedule(self) -> Result<Vec<DaySchedule>, String> {
        match self {
            Payload::Schedule(schedule) => Ok(schedule),
            _ => Err("unexpected payload for schedule".to_string()),
        }
    }

    pub fn into_detail(self) -> Result<Option<MatchDetail>, String> {
        match self {
            Payload::Detail(detail) => Ok(detail),
            _ => Err("unexpected payload for match detail".to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Delta {
    Loaded {
        ticket: Ticket,
        result: Result<Payload, String>,
    },
    Log(String),
}

#[derive(Debug, Clone)]
pub enum ProviderCommand {
    Load(Ticket),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Home,
    Detail,
}

pub struct AppState {
    pub screen: Screen,
    pub home: HomeView,
    pub detail: Option<DetailView>,
    pub display_tz: Tz,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
    /// Text typed into the go-to-date prompt while it is open.
    pub date_input: Option<String>,
    /// Last generation used by a torn-down detail view.
    detail_generation: u64,
}

impl AppState {
    pub fn new(config: &Config, today: NaiveDate) -> Self {
        Self {
            screen: Screen::Home,
            home: HomeView::new(
                config.home_mode,
                today,
                config.poll_interval,
                config.upcoming_days,
            ),
            detail: None,
            display_tz: config.display_tz,
            logs: VecDeque::with_capacity(200),
            help_overlay: false,
            date_input: None,
            detail_generation: 0,
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        const MAX_LOGS: usize = 200;
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    /// Opens the detail screen for `fixture_id`, tearing down any previous one.
    pub fn open_detail(&mut self, fixture_id: u64) -> Vec<Ticket> {
        self.teardown_detail();
        let mut view = DetailView::new(fixture_id, self.detail_generation);
        let ticket = view.start();
        self.detail = Some(view);
        self.screen = Screen::Detail;
        vec![ticket]
    }

    pub fn close_detail(&mut self) {
        self.teardown_detail();
        self.screen = Screen::Home;
    }

    fn teardown_detail(&mut self) {
        if let Some(mut view) = self.detail.take() {
            view.close();
            self.detail_generation = view.generation();
        }
    }

    pub fn poll(&mut self, now: Instant) -> Vec<Ticket> {
        self.home.poll(now)
    }
}

/// Applies one provider message. Returns any loads the result triggered.
pub fn apply_delta(state: &mut AppState, delta: Delta, now: Instant) -> Vec<Ticket> {
    match delta {
        Delta::Loaded { ticket, result } => {
            if let Err(err) = &result {
                state.push_log(format!("[WARN] {} load failed: {err}", ticket.section.label()));
            }
            match ticket.section {
                Section::Detail => {
                    if let Some(view) = state.detail.as_mut() {
                        view.apply(&ticket, result);
                    }
                    Vec::new()
                }
                _ => {
                    let follow_up = state.home.apply(&ticket, result, now);
                    if !follow_up.is_empty() {
                        state.push_log("[INFO] Today is empty, loading tomorrow and the upcoming week");
                    }
                    follow_up
                }
            }
        }
        Delta::Log(msg) => {
            state.push_log(msg);
            Vec::new()
        }
    }
}
