use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use goals_terminal::api::decode_json;
use goals_terminal::detail::parse_match_detail_json;
use goals_terminal::home::{filter_by_league, league_options};
use goals_terminal::model::{DateResp, Fixture};
use goals_terminal::render::{match_row, row_line};

fn busy_day() -> Vec<Fixture> {
    let base: DateResp = decode_json("bench", DATE_JSON).expect("valid fixture json");
    (0..400u64)
        .map(|i| {
            let mut f = base.fixtures[(i % base.fixtures.len() as u64) as usize].clone();
            f.id = 1_000 + i;
            f.league_id = i % 37;
            f.league_name = (i % 5 != 0).then(|| format!("الدوري الممتاز {}", i % 37));
            f
        })
        .collect()
}

fn bench_date_parse(c: &mut Criterion) {
    c.bench_function("date_response_parse", |b| {
        b.iter(|| {
            let resp: DateResp = decode_json("bench", black_box(DATE_JSON)).unwrap();
            black_box(resp.fixtures.len());
        })
    });
}

fn bench_match_detail_parse(c: &mut Criterion) {
    c.bench_function("match_detail_parse", |b| {
        b.iter(|| {
            let detail = parse_match_detail_json(black_box(DETAIL_JSON)).unwrap();
            black_box(detail.map(|d| d.events.len()));
        })
    });
}

fn bench_league_options(c: &mut Criterion) {
    let fixtures = busy_day();
    c.bench_function("league_options_400", |b| {
        b.iter(|| {
            let options = league_options(black_box(&fixtures));
            black_box(options.len());
        })
    });
}

fn bench_filter_and_rows(c: &mut Criterion) {
    let fixtures = busy_day();
    c.bench_function("filter_and_render_rows_400", |b| {
        b.iter(|| {
            let lines: Vec<String> = filter_by_league(black_box(&fixtures), Some(3))
                .into_iter()
                .map(|f| row_line(&match_row(f)))
                .collect();
            black_box(lines.len());
        })
    });
}

criterion_group!(
    perf,
    bench_date_parse,
    bench_match_detail_parse,
    bench_league_options,
    bench_filter_and_rows
);
criterion_main!(perf);

static DATE_JSON: &str = include_str!("../tests/fixtures/fixtures_date.json");
static DETAIL_JSON: &str = include_str!("../tests/fixtures/match_detail.json");
