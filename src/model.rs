use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::format;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub logo: Option<String>,
}

/// One match as served by the list endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fixture {
    pub id: u64,
    #[serde(default)]
    pub league_id: u64,
    #[serde(default)]
    pub league_name: Option<String>,
    #[serde(default)]
    pub state_id: i64,
    #[serde(default)]
    pub kickoff_utc: Option<String>,
    #[serde(default)]
    pub kickoff_bahrain: Option<String>,
    #[serde(default)]
    pub home: Option<Team>,
    #[serde(default)]
    pub away: Option<Team>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub score_home: u32,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub score_away: u32,
}

impl Fixture {
    pub fn status(&self) -> MatchStatus {
        MatchStatus::from_state_id(self.state_id)
    }

    /// League name from the backend, or the numbered fallback when the
    /// backend has no metadata for it.
    pub fn league_label(&self) -> String {
        match self.league_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format::league_fallback(self.league_id),
        }
    }
}

/// Closed set of states the UI distinguishes. Anything outside 1..=3 is
/// rendered like a scheduled match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStatus {
    Scheduled,
    Live,
    Finished,
    Other(i64),
}

impl MatchStatus {
    pub fn from_state_id(state_id: i64) -> Self {
        match state_id {
            1 => MatchStatus::Scheduled,
            2 => MatchStatus::Live,
            3 => MatchStatus::Finished,
            other => MatchStatus::Other(other),
        }
    }

    pub fn is_live(self) -> bool {
        self == MatchStatus::Live
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateResp {
    #[serde(default)]
    pub date_utc: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub fixtures: Vec<Fixture>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveResp {
    #[serde(default)]
    pub count: Option<u32>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub fixtures: Vec<Fixture>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySchedule {
    #[serde(default)]
    pub date_utc: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub fixtures: Vec<Fixture>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpcomingResp {
    #[serde(default)]
    pub days: Option<u32>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub schedule: Vec<DaySchedule>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

// Scores occasionally arrive as strings or null on not-started fixtures.
fn lenient_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_as_u32(&value).unwrap_or(0))
}

pub(crate) fn value_as_u32(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .map(|n| n.min(u32::MAX as u64) as u32),
        Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    }
}
