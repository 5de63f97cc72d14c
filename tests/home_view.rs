use std::time::{Duration, Instant};

use chrono::NaiveDate;
use goals_terminal::home::{HomeMode, HomeView, filter_by_league, league_options};
use goals_terminal::load::LoadStatus;
use goals_terminal::model::{DaySchedule, Fixture, Team};
use goals_terminal::state::{LoadRequest, Payload, Section, Ticket};

const POLL: Duration = Duration::from_secs(30);

fn day(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap()
}

fn fixture(id: u64, league_id: u64, league_name: Option<&str>) -> Fixture {
    Fixture {
        id,
        league_id,
        league_name: league_name.map(str::to_string),
        state_id: 1,
        kickoff_utc: None,
        kickoff_bahrain: Some("2025-08-16 20:00".to_string()),
        home: Some(Team {
            id: id * 10,
            name: format!("Home {id}"),
            code: None,
            logo: None,
        }),
        away: Some(Team {
            id: id * 10 + 1,
            name: format!("Away {id}"),
            code: None,
            logo: None,
        }),
        score_home: 0,
        score_away: 0,
    }
}

fn find(tickets: &[Ticket], section: Section) -> Ticket {
    tickets
        .iter()
        .find(|t| t.section == section)
        .cloned()
        .unwrap_or_else(|| panic!("no {section:?} ticket in {tickets:?}"))
}

fn sections(tickets: &[Ticket]) -> Vec<Section> {
    tickets.iter().map(|t| t.section).collect()
}

#[test]
fn modes_parse_from_config_names() {
    assert_eq!(HomeMode::parse("date-window"), Some(HomeMode::DateWindow));
    assert_eq!(HomeMode::parse(" Live "), Some(HomeMode::LiveFallback));
    assert_eq!(HomeMode::parse("hybrid"), Some(HomeMode::Hybrid));
    assert_eq!(HomeMode::parse("calendar"), None);
}

#[test]
fn hybrid_start_loads_live_today_and_picked_date() {
    let now = Instant::now();
    let mut home = HomeView::new(HomeMode::Hybrid, day("2025-08-16"), POLL, 7);
    let tickets = home.start(now);
    assert_eq!(sections(&tickets), vec![Section::Live, Section::Today, Section::Picked]);
    assert_eq!(
        find(&tickets, Section::Picked).request,
        LoadRequest::Date(day("2025-08-16"))
    );
    assert!(home.is_polling());
    assert_eq!(home.section_status(Section::Today), LoadStatus::Loading);
}

#[test]
fn date_window_only_loads_the_selected_date() {
    let now = Instant::now();
    let mut home = HomeView::new(HomeMode::DateWindow, day("2025-02-28"), POLL, 7);
    let tickets = home.start(now);
    assert_eq!(sections(&tickets), vec![Section::Picked]);

    let next = home.next_day();
    assert_eq!(next[0].request, LoadRequest::Date(day("2025-03-01")));
    let prev = home.prev_day();
    assert_eq!(prev[0].request, LoadRequest::Date(day("2025-02-28")));
    let jump = home.jump_today(day("2025-08-16"));
    assert_eq!(jump[0].request, LoadRequest::Date(day("2025-08-16")));
    assert_eq!(home.selected_date, day("2025-08-16"));
}

#[test]
fn live_fallback_has_no_date_picker() {
    let now = Instant::now();
    let mut home = HomeView::new(HomeMode::LiveFallback, day("2025-08-16"), POLL, 7);
    let tickets = home.start(now);
    assert_eq!(sections(&tickets), vec![Section::Live, Section::Today]);
    assert!(home.next_day().is_empty());
    assert_eq!(home.selected_date, day("2025-08-16"));
}

#[test]
fn empty_today_triggers_tomorrow_and_upcoming() {
    let now = Instant::now();
    let mut home = HomeView::new(HomeMode::LiveFallback, day("2025-08-16"), POLL, 7);
    let tickets = home.start(now);

    let today = find(&tickets, Section::Today);
    let follow_up = home.apply(&today, Ok(Payload::Fixtures(Vec::new())), now);
    assert_eq!(sections(&follow_up), vec![Section::Tomorrow, Section::Upcoming]);
    assert_eq!(
        find(&follow_up, Section::Upcoming).request,
        LoadRequest::Upcoming { days: 7 }
    );

    let tomorrow = find(&follow_up, Section::Tomorrow);
    home.apply(&tomorrow, Ok(Payload::Fixtures(vec![fixture(2, 8, None)])), now);
    let upcoming = find(&follow_up, Section::Upcoming);
    home.apply(
        &upcoming,
        Ok(Payload::Schedule(vec![DaySchedule {
            date_utc: "2025-08-18".to_string(),
            fixtures: vec![fixture(3, 8, None)],
        }])),
        now,
    );
    assert_eq!(home.tomorrow.data.len(), 1);
    assert_eq!(home.upcoming.data[0].fixtures[0].id, 3);
    let ids: Vec<u64> = home.loaded_fixtures().iter().map(|f| f.id).collect();
    assert_eq!(ids, vec![2, 3]);
}

#[test]
fn failed_today_also_falls_back() {
    let now = Instant::now();
    let mut home = HomeView::new(HomeMode::LiveFallback, day("2025-08-16"), POLL, 3);
    let tickets = home.start(now);
    let today = find(&tickets, Section::Today);
    let follow_up = home.apply(&today, Err("fetch failed 500: /api/fixtures/today".to_string()), now);
    assert_eq!(home.section_status(Section::Today), LoadStatus::Failed);
    assert_eq!(
        find(&follow_up, Section::Upcoming).request,
        LoadRequest::Upcoming { days: 3 }
    );
}

#[test]
fn non_empty_today_clears_fallback_sections() {
    let start = Instant::now();
    let mut home = HomeView::new(HomeMode::LiveFallback, day("2025-08-16"), POLL, 7);
    let tickets = home.start(start);
    let today = find(&tickets, Section::Today);
    let fallback = home.apply(&today, Ok(Payload::Fixtures(Vec::new())), start);
    let tomorrow = find(&fallback, Section::Tomorrow);
    home.apply(&tomorrow, Ok(Payload::Fixtures(vec![fixture(2, 8, None)])), start);

    let later = start + POLL;
    let tickets = home.poll(later);
    let today = find(&tickets, Section::Today);
    let follow_up = home.apply(&today, Ok(Payload::Fixtures(vec![fixture(1, 8, None)])), later);
    assert!(follow_up.is_empty());
    assert!(home.tomorrow.data.is_empty());
    assert!(home.upcoming.data.is_empty());
    assert_eq!(home.section_status(Section::Tomorrow), LoadStatus::Idle);

    // the upcoming request from the first fallback is superseded
    let upcoming = find(&fallback, Section::Upcoming);
    let late = vec![DaySchedule {
        date_utc: "2025-08-18".to_string(),
        fixtures: vec![fixture(3, 8, None)],
    }];
    assert!(home.apply(&upcoming, Ok(Payload::Schedule(late)), later).is_empty());
    assert!(home.upcoming.data.is_empty());
}

#[test]
fn stale_date_response_is_discarded() {
    let now = Instant::now();
    let mut home = HomeView::new(HomeMode::DateWindow, day("2025-08-16"), POLL, 7);
    home.start(now);

    let older = home.set_date(day("2025-08-17")).remove(0);
    let newer = home.set_date(day("2025-08-18")).remove(0);

    home.apply(&newer, Ok(Payload::Fixtures(vec![fixture(18, 8, None)])), now);
    home.apply(&older, Ok(Payload::Fixtures(vec![fixture(17, 8, None)])), now);

    let ids: Vec<u64> = home.picked.data.iter().map(|f| f.id).collect();
    assert_eq!(ids, vec![18]);
    assert_eq!(home.selected_date, day("2025-08-18"));
    assert_eq!(home.section_status(Section::Picked), LoadStatus::Ready);
}

#[test]
fn changing_date_hides_the_previous_days_rows() {
    let now = Instant::now();
    let mut home = HomeView::new(HomeMode::DateWindow, day("2025-08-16"), POLL, 7);
    let first = home.start(now).remove(0);
    home.apply(&first, Ok(Payload::Fixtures(vec![fixture(16, 8, None)])), now);
    assert_eq!(home.picked.data.len(), 1);

    home.next_day();
    assert!(home.picked.data.is_empty());
    assert_eq!(home.section_status(Section::Picked), LoadStatus::Loading);
}

#[test]
fn poll_skips_sections_still_in_flight() {
    let start = Instant::now();
    let mut home = HomeView::new(HomeMode::Hybrid, day("2025-08-16"), POLL, 7);
    let first = home.start(start);

    assert!(home.poll(start + Duration::from_secs(5)).is_empty());
    assert!(home.poll(start + POLL).is_empty());

    let live = find(&first, Section::Live);
    home.apply(&live, Ok(Payload::Fixtures(Vec::new())), start + POLL);
    let tickets = home.poll(start + POLL * 2);
    assert_eq!(sections(&tickets), vec![Section::Live]);
}

#[test]
fn closed_view_ignores_late_results_and_stops_polling() {
    let start = Instant::now();
    let mut home = HomeView::new(HomeMode::Hybrid, day("2025-08-16"), POLL, 7);
    let tickets = home.start(start);
    home.close();

    assert!(!home.is_polling());
    assert!(home.is_closed());
    let today = find(&tickets, Section::Today);
    assert!(home.apply(&today, Ok(Payload::Fixtures(Vec::new())), start).is_empty());
    assert!(home.today.data.is_empty());
    assert!(home.poll(start + POLL * 3).is_empty());
    assert!(home.refresh().is_empty());
    assert_eq!(home.last_updated_text(start + POLL), "");
}

#[test]
fn last_updated_counts_from_latest_success() {
    let start = Instant::now();
    let mut home = HomeView::new(HomeMode::LiveFallback, day("2025-08-16"), POLL, 7);
    let tickets = home.start(start);
    assert_eq!(home.last_updated_text(start), "");

    let live = find(&tickets, Section::Live);
    home.apply(&live, Ok(Payload::Fixtures(vec![fixture(1, 8, None)])), start);
    assert_eq!(
        home.last_updated_text(start + Duration::from_secs(10)),
        "آخر تحديث قبل 10 ثانية"
    );
    assert_eq!(
        home.last_updated_text(start + Duration::from_secs(125)),
        "آخر تحديث قبل 2 دقيقة"
    );

    // failures do not move the timestamp
    let today = find(&tickets, Section::Today);
    home.apply(&today, Err("boom".to_string()), start + Duration::from_secs(20));
    assert_eq!(
        home.last_updated_text(start + Duration::from_secs(30)),
        "آخر تحديث قبل 30 ثانية"
    );
}

#[test]
fn league_options_are_distinct_and_sorted() {
    let fixtures = vec![
        fixture(1, 944, None),
        fixture(2, 8, Some("Premier League")),
        fixture(3, 564, Some("La Liga")),
        fixture(4, 8, Some("Premier League")),
    ];
    let labels: Vec<(u64, String)> = league_options(&fixtures)
        .into_iter()
        .map(|opt| (opt.id, opt.label))
        .collect();
    assert_eq!(
        labels,
        vec![
            (564, "La Liga".to_string()),
            (8, "Premier League".to_string()),
            (944, "الدوري #944".to_string()),
        ]
    );

    assert_eq!(filter_by_league(&fixtures, None).len(), 4);
    let only_pl: Vec<u64> = filter_by_league(&fixtures, Some(8)).iter().map(|f| f.id).collect();
    assert_eq!(only_pl, vec![2, 4]);
    assert!(filter_by_league(&fixtures, Some(1)).is_empty());
}

#[test]
fn league_filter_cycles_and_resets_when_league_disappears() {
    let now = Instant::now();
    let mut home = HomeView::new(HomeMode::DateWindow, day("2025-08-16"), POLL, 7);
    let first = home.start(now).remove(0);
    home.apply(
        &first,
        Ok(Payload::Fixtures(vec![
            fixture(1, 8, Some("Premier League")),
            fixture(2, 564, Some("La Liga")),
            fixture(3, 8, Some("Premier League")),
        ])),
        now,
    );
    assert_eq!(home.league_label(), "كل الدوريات");

    home.cycle_league();
    assert_eq!(home.league, Some(564));
    assert_eq!(home.league_label(), "La Liga");
    home.cycle_league();
    assert_eq!(home.league, Some(8));
    let ids: Vec<u64> = home.selectable().iter().map(|f| f.id).collect();
    assert_eq!(ids, vec![1, 3]);
    home.select_next();
    assert_eq!(home.selected_fixture().map(|f| f.id), Some(3));
    home.select_next();
    assert_eq!(home.selected_fixture().map(|f| f.id), Some(3));
    home.cycle_league();
    assert_eq!(home.league, None);

    home.set_league(Some(564));
    let next = home.next_day().remove(0);
    home.apply(&next, Ok(Payload::Fixtures(vec![fixture(9, 8, Some("Premier League"))])), now);
    assert_eq!(home.league, None);
    assert_eq!(home.selectable().len(), 1);
}

#[test]
fn filtered_applies_current_league() {
    let mut home = HomeView::new(HomeMode::DateWindow, day("2025-08-16"), POLL, 7);
    let fixtures = vec![fixture(1, 8, None), fixture(2, 564, None)];
    assert_eq!(home.filtered(&fixtures).len(), 2);
    home.set_league(Some(564));
    let ids: Vec<u64> = home.filtered(&fixtures).iter().map(|f| f.id).collect();
    assert_eq!(ids, vec![2]);
}

#[test]
fn header_and_rows_share_the_unnamed_league_label() {
    let now = Instant::now();
    let mut home = HomeView::new(HomeMode::DateWindow, day("2025-08-16"), POLL, 7);
    let first = home.start(now).remove(0);
    home.apply(&first, Ok(Payload::Fixtures(vec![fixture(1, 944, None)])), now);

    home.cycle_league();
    assert_eq!(home.league_label(), home.picked.data[0].league_label());

    // a chosen league that has no loaded fixtures yet
    home.set_league(Some(77));
    assert_eq!(home.league_label(), "الدوري #77");
}
