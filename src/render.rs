//! Display rows derived from fixtures. Nothing here touches the network or
//! the terminal; the UI draws whatever these functions return.

use chrono_tz::Tz;

use crate::detail::{MatchDetail, Participant, Side};
use crate::format::{self, DASH};
use crate::model::{Fixture, MatchStatus, Team};

pub const LOGO_MARK: &str = "◉";
pub const PLACEHOLDER_MARK: &str = "○";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Avatar {
    Logo(String),
    Placeholder,
}

impl Avatar {
    pub fn mark(&self) -> &'static str {
        match self {
            Avatar::Logo(_) => LOGO_MARK,
            Avatar::Placeholder => PLACEHOLDER_MARK,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamCell {
    pub name: String,
    pub avatar: Avatar,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRowView {
    pub id: u64,
    pub home: TeamCell,
    pub away: TeamCell,
    pub score: String,
    pub kickoff: String,
    pub status: MatchStatus,
    pub badge: &'static str,
}

pub fn match_row(f: &Fixture) -> MatchRowView {
    let status = f.status();
    MatchRowView {
        id: f.id,
        home: team_cell(f.home.as_ref()),
        away: team_cell(f.away.as_ref()),
        score: format::score_label(f.score_home, f.score_away),
        kickoff: non_empty(f.kickoff_bahrain.as_deref()).unwrap_or(DASH).to_string(),
        status,
        badge: format::badge_label(status),
    }
}

/// Header row of the detail screen.
pub fn detail_row(d: &MatchDetail, tz: Tz) -> MatchRowView {
    let status = d.status().unwrap_or(MatchStatus::Other(0));
    MatchRowView {
        id: d.id.unwrap_or_default(),
        home: participant_cell(d.home.as_ref()),
        away: participant_cell(d.away.as_ref()),
        score: format::score_label(d.score_home, d.score_away),
        kickoff: d.kickoff_display(tz),
        status,
        badge: format::badge_label(status),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRowView {
    pub minute: String,
    pub kind: String,
    pub player: String,
    pub team: Option<String>,
}

/// Events in the order the API returned them.
pub fn event_rows(d: &MatchDetail) -> Vec<EventRowView> {
    d.events
        .iter()
        .map(|e| {
            let team = match d.side_of(e) {
                Some(Side::Home) => d.home.as_ref().map(|p| p.name.clone()),
                Some(Side::Away) => d.away.as_ref().map(|p| p.name.clone()),
                None => None,
            };
            EventRowView {
                minute: format!("{}′", e.minute_label()),
                kind: e.kind.clone(),
                player: e.player_name.clone().unwrap_or_default(),
                team,
            }
        })
        .collect()
}

/// Single-line rendering used by the list views.
pub fn row_line(row: &MatchRowView) -> String {
    format!(
        "{} {}  {}  {} {}  [{}]  {}",
        row.home.avatar.mark(),
        row.home.name,
        row.score,
        row.away.name,
        row.away.avatar.mark(),
        row.badge,
        row.kickoff
    )
}

fn team_cell(team: Option<&Team>) -> TeamCell {
    match team {
        Some(t) => TeamCell {
            name: non_empty(Some(t.name.as_str())).unwrap_or(DASH).to_string(),
            avatar: avatar(t.logo.as_deref()),
        },
        None => placeholder_cell(),
    }
}

fn participant_cell(p: Option<&Participant>) -> TeamCell {
    match p {
        Some(p) => TeamCell {
            name: non_empty(Some(p.name.as_str())).unwrap_or(DASH).to_string(),
            avatar: avatar(p.logo.as_deref()),
        },
        None => placeholder_cell(),
    }
}

fn placeholder_cell() -> TeamCell {
    TeamCell {
        name: DASH.to_string(),
        avatar: Avatar::Placeholder,
    }
}

fn avatar(logo: Option<&str>) -> Avatar {
    match non_empty(logo) {
        Some(url) => Avatar::Logo(url.to_string()),
        None => Avatar::Placeholder,
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
