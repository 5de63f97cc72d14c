use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use chrono_tz::Tz;
use serde_json::Value;

use crate::format::{self, DASH, EVENT_FALLBACK};
use crate::model::{MatchStatus, value_as_u32};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Home,
    Away,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub id: Option<u64>,
    pub name: String,
    pub logo: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchEvent {
    pub id: Option<u64>,
    pub kind: String,
    pub minute: u32,
    pub extra_minute: Option<u32>,
    pub participant_id: Option<u64>,
    pub player_name: Option<String>,
    pub result: Option<String>,
}

impl MatchEvent {
    pub fn minute_label(&self) -> String {
        format::minute_label(self.minute, self.extra_minute)
    }
}

/// Normalized view of `/api/matches/{id}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchDetail {
    pub id: Option<u64>,
    pub name: Option<String>,
    pub league_name: Option<String>,
    pub state_id: Option<i64>,
    pub home: Option<Participant>,
    pub away: Option<Participant>,
    pub score_home: u32,
    pub score_away: u32,
    pub kickoff_utc: Option<NaiveDateTime>,
    pub events: Vec<MatchEvent>,
}

impl MatchDetail {
    pub fn status(&self) -> Option<MatchStatus> {
        self.state_id.map(MatchStatus::from_state_id)
    }

    pub fn kickoff_display(&self, tz: Tz) -> String {
        self.kickoff_utc
            .map(|utc| format::format_kickoff_in(utc, tz))
            .unwrap_or_else(|| DASH.to_string())
    }

    /// Which side an event belongs to, when its participant id is known.
    pub fn side_of(&self, event: &MatchEvent) -> Option<Side> {
        let pid = event.participant_id?;
        if self.home.as_ref().and_then(|p| p.id) == Some(pid) {
            return Some(Side::Home);
        }
        if self.away.as_ref().and_then(|p| p.id) == Some(pid) {
            return Some(Side::Away);
        }
        None
    }
}

/// Accepts the three envelope shapes the backend produces: the fixture
/// object itself, `{ "data": ... }`, or a list whose first element is the
/// fixture. Anything else yields `None`.
pub fn normalize_envelope(root: Value) -> Option<Value> {
    let inner = match root {
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Null) | None => Value::Object(map),
            Some(data) => data,
        },
        other => other,
    };
    let fixture = match inner {
        Value::Array(items) => items.into_iter().next()?,
        other => other,
    };
    let is_fixture = matches!(&fixture, Value::Object(map) if !map.is_empty());
    is_fixture.then_some(fixture)
}

/// Parses a detail body. `Ok(None)` means the payload was valid JSON but
/// carried no fixture.
pub fn parse_match_detail_json(raw: &str) -> Result<Option<MatchDetail>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(None);
    }
    let root: Value = serde_json::from_str(trimmed).context("invalid match detail json")?;
    Ok(match_detail_from_value(root))
}

pub fn match_detail_from_value(root: Value) -> Option<MatchDetail> {
    let fx = normalize_envelope(root)?;

    let participants = fx
        .get("participants")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();
    let home = find_participant(participants, "home");
    let away = find_participant(participants, "away");

    let scores = fx
        .get("scores")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();
    let (score_home, score_away) = current_score(scores);

    let kickoff_utc = pick_string(&fx, &["starting_at", "kickoff_utc"])
        .and_then(|raw| format::parse_naive_utc(&raw));

    let events = fx
        .get("events")
        .and_then(Value::as_array)
        .map(|list| list.iter().map(parse_event).collect())
        .unwrap_or_default();

    Some(MatchDetail {
        id: pick_u64(&fx, &["id"]),
        name: pick_string(&fx, &["name"]),
        league_name: fx
            .get("league")
            .and_then(|l| pick_string(l, &["name"]))
            .or_else(|| pick_string(&fx, &["league_name"])),
        state_id: fx.get("state_id").and_then(Value::as_i64),
        home,
        away,
        score_home,
        score_away,
        kickoff_utc,
        events,
    })
}

/// Goals from the `CURRENT`-tagged entries; other periods are ignored and a
/// missing side counts as 0.
pub fn current_score(scores: &[Value]) -> (u32, u32) {
    let mut home = 0;
    let mut away = 0;
    for entry in scores {
        if entry.get("description").and_then(Value::as_str) != Some("CURRENT") {
            continue;
        }
        let Some(score) = entry.get("score") else {
            continue;
        };
        let goals = score.get("goals").and_then(value_as_u32).unwrap_or(0);
        match score.get("participant").and_then(Value::as_str) {
            Some("home") => home = goals,
            Some("away") => away = goals,
            _ => {}
        }
    }
    (home, away)
}

/// Event type as shown to the user: the string itself, the object's `name`,
/// or a generic label.
pub fn event_type_label(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        Some(Value::Object(map)) => map
            .get("name")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(EVENT_FALLBACK)
            .to_string(),
        _ => EVENT_FALLBACK.to_string(),
    }
}

fn find_participant(list: &[Value], location: &str) -> Option<Participant> {
    let entry = list.iter().find(|p| {
        p.get("meta")
            .and_then(|m| m.get("location"))
            .and_then(Value::as_str)
            == Some(location)
    })?;
    Some(Participant {
        id: pick_u64(entry, &["id"]),
        name: pick_string(entry, &["name", "short_code"]).unwrap_or_default(),
        logo: pick_string(entry, &["image_path", "logo"]),
    })
}

fn parse_event(entry: &Value) -> MatchEvent {
    MatchEvent {
        id: pick_u64(entry, &["id"]),
        kind: event_type_label(entry.get("type")),
        minute: entry.get("minute").and_then(value_as_u32).unwrap_or(0),
        extra_minute: entry.get("extra_minute").and_then(value_as_u32),
        participant_id: pick_u64(entry, &["participant_id"]),
        player_name: pick_string(entry, &["player_name"]),
        result: pick_string(entry, &["result"]),
    }
}

fn pick_string(value: &Value, keys: &[&str]) -> Option<String> {
    for key in keys {
        match value.get(*key) {
            Some(Value::String(s)) if !s.trim().is_empty() => return Some(s.trim().to_string()),
            Some(Value::Number(n)) => return Some(n.to_string()),
            _ => {}
        }
    }
    None
}

fn pick_u64(value: &Value, keys: &[&str]) -> Option<u64> {
    for key in keys {
        if let Some(v) = value.get(*key) {
            if let Some(num) = v.as_u64() {
                return Some(num);
            }
            if let Some(num) = v.as_str().and_then(|s| s.trim().parse::<u64>().ok()) {
                return Some(num);
            }
        }
    }
    None
}
