use std::io;
use std::sync::Arc;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chrono::Datelike;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use log::{info, warn};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use goals_terminal::api::ApiClient;
use goals_terminal::config::Config;
use goals_terminal::detail_view::DetailPhase;
use goals_terminal::format::{self, DASH};
use goals_terminal::home::{HomeMode, HomeView};
use goals_terminal::load::{LoadStatus, Slot};
use goals_terminal::logging;
use goals_terminal::model::{Fixture, MatchStatus};
use goals_terminal::provider::spawn_provider;
use goals_terminal::render::{self, MatchRowView};
use goals_terminal::state::{AppState, Delta, ProviderCommand, Screen, Ticket, apply_delta};

struct App {
    state: AppState,
    should_quit: bool,
    cmd_tx: Option<mpsc::Sender<ProviderCommand>>,
}

impl App {
    fn new(config: &Config, cmd_tx: Option<mpsc::Sender<ProviderCommand>>) -> Self {
        Self {
            state: AppState::new(config, format::today_utc()),
            should_quit: false,
            cmd_tx,
        }
    }

    fn dispatch(&mut self, tickets: Vec<Ticket>) {
        for ticket in tickets {
            let Some(tx) = &self.cmd_tx else {
                self.state.push_log("[INFO] Fetching unavailable");
                return;
            };
            if tx.send(ProviderCommand::Load(ticket)).is_err() {
                self.state.push_log("[WARN] Provider stopped; request dropped");
                return;
            }
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if self.state.date_input.is_some() {
            self.on_date_input_key(key);
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            KeyCode::Char('b') | KeyCode::Esc => {
                if self.state.help_overlay {
                    self.state.help_overlay = false;
                } else if self.state.screen == Screen::Detail {
                    self.state.close_detail();
                }
            }
            _ if self.state.screen == Screen::Detail => self.on_detail_key(key),
            _ => self.on_home_key(key),
        }
    }

    fn on_home_key(&mut self, key: KeyEvent) {
        let tickets = match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.state.home.select_next();
                Vec::new()
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.state.home.select_prev();
                Vec::new()
            }
            KeyCode::Char('h') | KeyCode::Left => self.state.home.prev_day(),
            KeyCode::Char('n') | KeyCode::Right => self.state.home.next_day(),
            KeyCode::Char('t') => self.state.home.jump_today(format::today_utc()),
            KeyCode::Char('g') => {
                if self.state.home.mode().has_date_picker() {
                    self.state.date_input = Some(String::new());
                }
                Vec::new()
            }
            KeyCode::Char('l') | KeyCode::Char('L') => {
                self.state.home.cycle_league();
                Vec::new()
            }
            KeyCode::Char('r') => {
                self.state.push_log("[INFO] Refresh requested");
                self.state.home.refresh()
            }
            KeyCode::Enter | KeyCode::Char('d') => {
                match self.state.home.selected_fixture().map(|f| f.id) {
                    Some(id) => self.state.open_detail(id),
                    None => {
                        self.state.push_log("[INFO] No match selected");
                        Vec::new()
                    }
                }
            }
            _ => Vec::new(),
        };
        self.dispatch(tickets);
    }

    fn on_detail_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('r')
            && let Some(ticket) = self.state.detail.as_mut().and_then(|d| d.refresh())
        {
            self.dispatch(vec![ticket]);
        }
    }

    fn on_date_input_key(&mut self, key: KeyEvent) {
        let Some(buf) = self.state.date_input.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Esc => self.state.date_input = None,
            KeyCode::Backspace => {
                buf.pop();
            }
            KeyCode::Char(c) if (c.is_ascii_digit() || c == '-') && buf.len() < 10 => buf.push(c),
            KeyCode::Enter => {
                let raw = buf.clone();
                self.state.date_input = None;
                match format::parse_date_input(&raw) {
                    Some(date) => {
                        let tickets = self.state.home.set_date(date);
                        self.dispatch(tickets);
                    }
                    None => self.state.push_log(format!("[WARN] Not a date: {raw}")),
                }
            }
            _ => {}
        }
    }

    fn shutdown(&mut self) {
        self.state.close_detail();
        self.state.home.close();
        self.cmd_tx = None;
    }
}

fn main() -> Result<()> {
    let config = Config::from_env();
    if let Some(path) = config.log_file.as_deref()
        && let Err(err) = logging::init_file_logger(path)
    {
        eprintln!("warning: {err:#}");
    }
    info!(
        "starting against {} ({:?}, poll {}s)",
        config.api_url,
        config.home_mode,
        config.poll_interval.as_secs()
    );

    let api = ApiClient::new(&config.api_url, config.http_timeout_secs)
        .context("failed to set up api client")?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let provider = spawn_provider(Arc::new(api), tx, cmd_rx, config.fetch_parallelism);

    let mut app = App::new(&config, Some(cmd_tx));
    let res = run_app(&mut terminal, &mut app, rx);
    app.shutdown();

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if provider.join().is_err() {
        warn!("provider thread panicked");
    }
    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    let initial = app.state.home.start(Instant::now());
    app.dispatch(initial);

    loop {
        let now = Instant::now();
        while let Ok(delta) = rx.try_recv() {
            let follow_up = apply_delta(&mut app.state, delta, now);
            app.dispatch(follow_up);
        }

        let due = app.state.poll(now);
        app.dispatch(due);

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(4),
            Constraint::Length(2),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(&app.state))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    match app.state.screen {
        Screen::Home => render_home(frame, chunks[1], &app.state.home),
        Screen::Detail => render_detail(frame, chunks[1], &app.state),
    }

    let console = Paragraph::new(console_text(&app.state))
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().title("Console").borders(Borders::TOP));
    frame.render_widget(console, chunks[2]);

    let footer = Paragraph::new(footer_text(&app.state))
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, chunks[3]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    let home = &state.home;
    let title = match state.screen {
        Screen::Home => {
            let mut parts = vec!["Goals4Arab".to_string(), mode_label(home.mode()).to_string()];
            if home.mode().has_date_picker() {
                parts.push(home.selected_date.format("%Y-%m-%d").to_string());
            }
            parts.push(home.league_label());
            parts.join(" | ")
        }
        Screen::Detail => "Goals4Arab | تفاصيل المباراة".to_string(),
    };
    format!("{title}\n{}", home.last_updated_text(Instant::now()))
}

fn footer_text(state: &AppState) -> String {
    if let Some(input) = &state.date_input {
        return format!("التاريخ (YYYY-MM-DD): {input}_   Enter OK | Esc Cancel");
    }
    let year = format::today_utc().year();
    let keys = match state.screen {
        Screen::Home if state.home.mode().has_date_picker() => {
            "j/k Move | Enter Details | h أمس | t اليوم | n غدًا | g Date | l League | r Refresh | ? Help | q Quit"
        }
        Screen::Home => "j/k Move | Enter Details | l League | r Refresh | ? Help | q Quit",
        Screen::Detail => "b/Esc العودة | r Refresh | ? Help | q Quit",
    };
    format!("{keys}   © {year} Goals4Arab")
}

fn mode_label(mode: HomeMode) -> &'static str {
    match mode {
        HomeMode::DateWindow => "DATE",
        HomeMode::LiveFallback => "LIVE",
        HomeMode::Hybrid => "LIVE+DATE",
    }
}

/// Accumulates section titles and rows while tracking which line holds the
/// cursor, so the list can scroll to it.
struct ListBuilder<'a> {
    home: &'a HomeView,
    lines: Vec<Line<'static>>,
    row_index: usize,
    selected_line: Option<usize>,
}

impl<'a> ListBuilder<'a> {
    fn new(home: &'a HomeView) -> Self {
        Self {
            home,
            lines: Vec::new(),
            row_index: 0,
            selected_line: None,
        }
    }

    fn title(&mut self, text: String) {
        if !self.lines.is_empty() {
            self.lines.push(Line::default());
        }
        self.lines.push(Line::styled(
            text,
            Style::default().add_modifier(Modifier::BOLD),
        ));
    }

    fn note(&mut self, text: &str) {
        self.lines
            .push(Line::styled(format!("  {text}"), Style::default().fg(Color::DarkGray)));
    }

    fn rows(&mut self, fixtures: &[&Fixture]) {
        for f in fixtures {
            let row = render::match_row(f);
            let selected = self.row_index == self.home.selected;
            if selected {
                self.selected_line = Some(self.lines.len());
            }
            self.lines.push(row_to_line(&row, selected));
            self.row_index += 1;
        }
    }

    fn fixture_section(&mut self, title: String, slot: &Slot<Vec<Fixture>>) {
        self.title(title);
        let visible = self.home.filtered(&slot.data);
        if slot.is_pending() && slot.data.is_empty() {
            self.note(format::LOADING);
        } else if visible.is_empty() {
            let msg = if slot.status == LoadStatus::Failed {
                format::LOAD_FAILED
            } else {
                format::NO_MATCHES
            };
            self.note(msg);
        } else {
            self.rows(&visible);
        }
    }
}

fn render_home(frame: &mut Frame, area: Rect, home: &HomeView) {
    let mut list = ListBuilder::new(home);

    if home.mode().has_live_sections() {
        list.fixture_section("مباشر الآن".to_string(), &home.live);
        list.fixture_section("مباريات اليوم".to_string(), &home.today);

        let today_settled = matches!(home.today.status, LoadStatus::Ready | LoadStatus::Failed);
        let has_fallback = !home.tomorrow.data.is_empty() || !home.upcoming.data.is_empty();
        if home.today.data.is_empty() && (today_settled || has_fallback) {
            list.fixture_section("مباريات الغد".to_string(), &home.tomorrow);

            list.title("الأسبوع القادم".to_string());
            let upcoming = &home.upcoming;
            if upcoming.is_pending() && upcoming.data.is_empty() {
                list.note(format::LOADING);
            } else if upcoming.status == LoadStatus::Failed {
                list.note(format::LOAD_FAILED);
            } else {
                let mut any = false;
                for day in &upcoming.data {
                    let visible = home.filtered(&day.fixtures);
                    if visible.is_empty() {
                        continue;
                    }
                    any = true;
                    list.lines.push(Line::styled(
                        format!(" {}", day.date_utc),
                        Style::default().fg(Color::Cyan),
                    ));
                    list.rows(&visible);
                }
                if !any {
                    list.note(format::NO_MATCHES);
                }
            }
        }
    }

    if home.mode().has_date_picker() {
        let title = format!("مباريات يوم {}", home.selected_date.format("%Y-%m-%d"));
        list.fixture_section(title, &home.picked);
    }

    let scroll = list
        .selected_line
        .map(|line| line.saturating_sub(area.height as usize / 2))
        .unwrap_or(0)
        .min(u16::MAX as usize) as u16;
    let paragraph = Paragraph::new(Text::from(list.lines)).scroll((scroll, 0));
    frame.render_widget(paragraph, area);
}

fn row_to_line(row: &MatchRowView, selected: bool) -> Line<'static> {
    let base = if selected {
        Style::default().fg(Color::White).bg(Color::DarkGray)
    } else {
        Style::default()
    };
    let badge_style = match row.status {
        MatchStatus::Live => base.fg(Color::Red).add_modifier(Modifier::BOLD),
        MatchStatus::Finished => base.fg(Color::Green),
        _ => base.fg(Color::Yellow),
    };
    let prefix = if selected { "> " } else { "  " };
    Line::from(vec![
        Span::styled(
            format!("{prefix}{} {}", row.home.avatar.mark(), row.home.name),
            base,
        ),
        Span::styled(
            format!("  {}  ", row.score),
            base.add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("{} {}", row.away.name, row.away.avatar.mark()),
            base,
        ),
        Span::styled(format!("  [{}]", row.badge), badge_style),
        Span::styled(format!("  {}", row.kickoff), base.fg(Color::DarkGray)),
    ])
}

fn render_detail(frame: &mut Frame, area: Rect, state: &AppState) {
    let Some(view) = state.detail.as_ref() else {
        let empty = Paragraph::new(format::DETAIL_FAILED);
        frame.render_widget(empty, area);
        return;
    };

    let detail = match (view.phase(), view.detail()) {
        (DetailPhase::Loaded, Some(detail)) => detail,
        (DetailPhase::Loading, _) => {
            frame.render_widget(Paragraph::new(format::LOADING), area);
            return;
        }
        _ => {
            let text = format!("{}\n\n[b] {}", format::DETAIL_FAILED, format::BACK);
            frame.render_widget(Paragraph::new(text), area);
            return;
        }
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(1)])
        .split(area);

    let header = render::detail_row(detail, state.display_tz);
    let league = detail.league_name.as_deref().unwrap_or(DASH);
    let header_lines = vec![
        row_to_line(&header, false),
        Line::styled(
            format!("  {}  |  {}", header.kickoff, league),
            Style::default().fg(Color::DarkGray),
        ),
    ];
    let title = detail
        .name
        .clone()
        .unwrap_or_else(|| format!("#{}", view.fixture_id()));
    let header_widget = Paragraph::new(Text::from(header_lines))
        .block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(header_widget, rows[0]);

    let events = render::event_rows(detail);
    let body = if events.is_empty() {
        format::NO_EVENTS.to_string()
    } else {
        events
            .iter()
            .map(|e| match &e.team {
                Some(team) => format!("{:>6}  {}  {}  ({team})", e.minute, e.kind, e.player),
                None => format!("{:>6}  {}  {}", e.minute, e.kind, e.player),
            })
            .collect::<Vec<_>>()
            .join("\n")
    };
    let events_widget =
        Paragraph::new(body).block(Block::default().title("الأحداث").borders(Borders::ALL));
    frame.render_widget(events_widget, rows[1]);
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No alerts yet".to_string();
    }
    let start = state.logs.len().saturating_sub(3);
    state
        .logs
        .iter()
        .skip(start)
        .cloned()
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Goals4Arab Terminal - Help",
        "",
        "Home:",
        "  j/k or ↑/↓   Move",
        "  Enter / d    Match details",
        "  h / ←        Previous day (أمس)",
        "  n / →        Next day (غدًا)",
        "  t            Today (اليوم)",
        "  g            Go to date",
        "  l            Cycle league filter",
        "  r            Refresh now",
        "",
        "Details:",
        "  b / Esc      Back (العودة)",
        "  r            Reload",
        "",
        "  ?            Toggle help",
        "  q            Quit",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
