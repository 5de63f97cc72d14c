use std::cmp::Ordering;
use std::time::Duration;

use chrono::{Duration as ChronoDuration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::model::MatchStatus;

pub const DASH: &str = "—";
pub const LOADING: &str = "...جاري التحميل";
pub const NO_MATCHES: &str = "لا توجد مباريات لهذا الاختيار";
pub const LOAD_FAILED: &str = "تعذر التحميل";
pub const DETAIL_FAILED: &str = "تعذر تحميل تفاصيل المباراة";
pub const NO_EVENTS: &str = "لا توجد أحداث";
pub const BACK: &str = "العودة";
pub const ALL_LEAGUES: &str = "كل الدوريات";
pub const EVENT_FALLBACK: &str = "حدث";

pub const DEFAULT_DISPLAY_TZ: Tz = chrono_tz::Asia::Bahrain;

pub fn badge_label(status: MatchStatus) -> &'static str {
    match status {
        MatchStatus::Live => "مباشر",
        MatchStatus::Finished => "انتهت",
        MatchStatus::Scheduled | MatchStatus::Other(_) => "قريبًا",
    }
}

/// `45+2` when stoppage time is present, plain minute otherwise.
pub fn minute_label(minute: u32, extra_minute: Option<u32>) -> String {
    match extra_minute {
        Some(extra) if extra != 0 => format!("{minute}+{extra}"),
        _ => minute.to_string(),
    }
}

/// Label for a league the backend sent without a name.
pub fn league_fallback(league_id: u64) -> String {
    format!("الدوري #{league_id}")
}

pub fn score_label(home: u32, away: u32) -> String {
    format!("{home} : {away}")
}

/// Relative "last updated" line. Empty until the first successful load.
pub fn last_updated_text(elapsed: Option<Duration>) -> String {
    let Some(elapsed) = elapsed else {
        return String::new();
    };
    let secs = elapsed.as_secs();
    if secs < 60 {
        format!("آخر تحديث قبل {secs} ثانية")
    } else {
        format!("آخر تحديث قبل {} دقيقة", secs / 60)
    }
}

pub fn parse_display_tz(raw: &str) -> Option<Tz> {
    raw.trim().parse::<Tz>().ok()
}

/// Parses the backend's naive timestamps. They carry no offset and are UTC.
pub fn parse_naive_utc(raw: &str) -> Option<NaiveDateTime> {
    const FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
    ];

    let cleaned = raw.trim().trim_end_matches('Z');
    let cleaned = cleaned.split('.').next().unwrap_or(cleaned);
    if cleaned.is_empty() {
        return None;
    }
    for fmt in FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(cleaned, fmt) {
            return Some(dt);
        }
    }
    None
}

pub fn format_kickoff_in(utc: NaiveDateTime, tz: Tz) -> String {
    Utc.from_utc_datetime(&utc)
        .with_timezone(&tz)
        .format("%Y-%m-%d %H:%M")
        .to_string()
}

pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

pub fn shift_date(date: NaiveDate, days: i64) -> NaiveDate {
    date.checked_add_signed(ChronoDuration::days(days))
        .unwrap_or(date)
}

pub fn parse_date_input(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

/// Orders labels the way an Arabic reader expects: hamza-carrying alef
/// forms, taa marbuta and alef maqsura fold onto their base letters and
/// diacritics are ignored before comparing. Ties fall back to the raw text.
pub fn compare_labels(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.cmp(b))
}

fn collation_key(label: &str) -> String {
    label
        .chars()
        .filter(|c| !is_arabic_mark(*c))
        .map(|c| match c {
            'أ' | 'إ' | 'آ' | 'ٱ' => 'ا',
            'ة' => 'ه',
            'ى' => 'ي',
            other => other,
        })
        .flat_map(char::to_lowercase)
        .collect()
}

fn is_arabic_mark(c: char) -> bool {
    // harakat, superscript alef and tatweel
    matches!(c, '\u{064B}'..='\u{065F}' | '\u{0670}' | '\u{0640}')
}
