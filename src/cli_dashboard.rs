//! Overview (system info, services, last task execution)
//! History (recent task runs)
//! Logs (latest log entries)

use std::{
  error::Error,
  fs::OpenOptions,
  io,
  sync::{mpsc, Mutex},
  thread,
  time::{Duration, Instant},
};

use crossterm::{
  event::{self, DisableMouseCapture, EnableMouseCapture, Event as CEvent, KeyCode},
  execute,
  terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use tui::{
  backend::{Backend, CrosstermBackend},
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Span, Spans},
  widgets::{Block, Borders, List, ListItem, Paragraph, Tabs},
  Terminal,
};
use tokio::runtime::Runtime;
use tracing::{error, info};
use cybersphere::config::Config;
use cybersphere::dashboard::{summarize_execution, ApiClient, DashboardState, TASK_NAMES};
use cybersphere::models::{LogLevel, TaskStatus};

const REFRESH_INTERVAL: Duration = Duration::from_secs(2);

#[derive(Clone, Copy)]
enum DashboardTab {
  Overview,
  History,
  Logs,
}

struct App {
  current_tab: DashboardTab,
  state: DashboardState,
  last_execution: Option<String>,
  last_error: Option<String>,
}

impl App {
  fn new() -> Self {
    Self {
      current_tab: DashboardTab::Overview,
      state: DashboardState::default(),
      last_execution: None,
      last_error: None,
    }
  }

  fn next_tab(&mut self) {
    self.current_tab = match self.current_tab {
      DashboardTab::Overview => DashboardTab::History,
      DashboardTab::History => DashboardTab::Logs,
      DashboardTab::Logs => DashboardTab::Overview,
    }
  }

  fn previous_tab(&mut self) {
    self.current_tab = match self.current_tab {
      DashboardTab::Overview => DashboardTab::Logs,
      DashboardTab::History => DashboardTab::Overview,
      DashboardTab::Logs => DashboardTab::History,
    }
  }

  fn apply_snapshot(&mut self, snapshot: Result<DashboardState, String>) {
    match snapshot {
      Ok(state) => {
        self.state = state;
        self.last_error = None;
      }
      Err(e) => self.last_error = Some(e),
    }
  }
}

fn task_for_key(key: KeyCode) -> Option<&'static str> {
  match key {
    KeyCode::Char('d') => Some(TASK_NAMES[0]),
    KeyCode::Char('s') => Some(TASK_NAMES[1]),
    KeyCode::Char('w') => Some(TASK_NAMES[2]),
    KeyCode::Char('a') => Some(TASK_NAMES[3]),
    _ => None,
  }
}

fn main() -> Result<(), Box<dyn Error>> {
  let config = Config::from_env();

  let log_file = OpenOptions::new()
    .create(true)
    .append(true)
    .open("cybersphere-cli.log")?;
  tracing_subscriber::fmt()
    .with_ansi(false)
    .with_writer(Mutex::new(log_file))
    .init();
  info!("Dashboard starting against {}", config.api_url);

  let rt = Runtime::new()?;
  let client = ApiClient::new(&config.api_url)?;

  let (tx, rx) = mpsc::channel::<Result<DashboardState, String>>();
  {
    let api_url = config.api_url.clone();
    thread::spawn(move || {
      let rt_bg = match Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
          error!("Failed to start refresh runtime: {}", e);
          return;
        }
      };
      let client = match ApiClient::new(&api_url) {
        Ok(client) => client,
        Err(e) => {
          error!("Failed to build refresh client: {:#}", e);
          return;
        }
      };
      loop {
        let snapshot = rt_bg.block_on(client.snapshot()).map_err(|e| {
          error!("Refresh failed: {:#}", e);
          format!("{:#}", e)
        });
        if tx.send(snapshot).is_err() {
          break;
        }
        thread::sleep(REFRESH_INTERVAL);
      }
    });
  }

  enable_raw_mode()?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(backend)?;

  let mut app = App::new();
  let tick_rate = Duration::from_millis(500);
  let mut last_tick = Instant::now();

  loop {
    if let Ok(snapshot) = rx.try_recv() {
      app.apply_snapshot(snapshot);
    }
    terminal.draw(|f| ui(f, &app))?;

    let timeout = tick_rate
      .checked_sub(last_tick.elapsed())
      .unwrap_or_else(|| Duration::from_secs(0));
    if event::poll(timeout)? {
      if let CEvent::Key(key) = event::read()? {
        match key.code {
          KeyCode::Char('q') => break,
          KeyCode::Right => app.next_tab(),
          KeyCode::Left => app.previous_tab(),
          code => {
            if let Some(task_name) = task_for_key(code) {
              app.last_execution = Some(match rt.block_on(client.execute(task_name)) {
                Ok(response) => summarize_execution(&response),
                Err(e) => format!("{}: {:#}", task_name, e),
              });
            }
          }
        }
      }
    }
    if last_tick.elapsed() >= tick_rate {
      last_tick = Instant::now();
    }
  }

  disable_raw_mode()?;
  execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
  terminal.show_cursor()?;
  Ok(())
}

fn ui<B: Backend>(f: &mut tui::Frame<B>, app: &App) {
  let chunks = Layout::default()
    .direction(Direction::Vertical)
    .margin(1)
    .constraints([
      Constraint::Length(3),
      Constraint::Min(0),
      Constraint::Length(3),
    ].as_ref())
    .split(f.size());

  let tab_titles = vec!["Overview", "History", "Logs"];
  let tabs = Tabs::new(
    tab_titles
      .iter()
      .map(|t| Spans::from(Span::styled(*t, Style::default().fg(Color::Yellow))))
      .collect(),
  )
    .block(Block::default().borders(Borders::ALL).title("HEX-CyberSphere"))
    .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
    .select(match app.current_tab {
      DashboardTab::Overview => 0,
      DashboardTab::History => 1,
      DashboardTab::Logs => 2,
    });
  f.render_widget(tabs, chunks[0]);

  match app.current_tab {
    DashboardTab::Overview => render_overview(f, app, chunks[1]),
    DashboardTab::History => render_history(f, app, chunks[1]),
    DashboardTab::Logs => render_logs(f, app, chunks[1]),
  }

  let footer = match &app.last_error {
    Some(e) => Paragraph::new(format!("API unreachable: {}", e)).style(Style::default().fg(Color::Red)),
    None => Paragraph::new("←/→: Switch Tabs | d/s/w/a: Run Task | q: Quit")
      .style(Style::default().fg(Color::White)),
  };
  f.render_widget(footer.block(Block::default().borders(Borders::ALL)), chunks[2]);
}

fn render_overview<B: Backend>(f: &mut tui::Frame<B>, app: &App, area: Rect) {
  let chunks = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Percentage(50), Constraint::Percentage(50)].as_ref())
    .split(area);

  let state = &app.state;
  let mut items = vec![
    ListItem::new(Spans::from(Span::styled(
      format!("{} v{}", state.system, state.version),
      Style::default().add_modifier(Modifier::BOLD),
    ))),
    ListItem::new(Spans::from(Span::raw(format!("Uptime: {}s", state.uptime_ms / 1000)))),
  ];
  items.extend(state.services.iter().map(|(name, status)| {
    ListItem::new(Spans::from(vec![
      Span::raw(format!("{}: ", name)),
      Span::styled(status.clone(), Style::default().fg(Color::Green)),
    ]))
  }));
  let services_list = List::new(items)
    .block(Block::default().borders(Borders::ALL).title("System"));
  f.render_widget(services_list, chunks[0]);

  let execution = app.last_execution.as_deref().unwrap_or("No task executed yet");
  let execution_view = Paragraph::new(execution)
    .block(Block::default().borders(Borders::ALL).title("Last Execution"));
  f.render_widget(execution_view, chunks[1]);
}

fn render_history<B: Backend>(f: &mut tui::Frame<B>, app: &App, area: Rect) {
  let items: Vec<ListItem> = app.state.history.iter().map(|t| {
    let (label, color) = match t.status {
      TaskStatus::Completed => ("completed", Color::Green),
      TaskStatus::Failed => ("failed", Color::Red),
    };
    ListItem::new(Spans::from(vec![
      Span::styled(format!("#{:<3}", t.id), Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
      Span::raw(format!("{} | ", t.name)),
      Span::styled(label, Style::default().fg(color)),
    ]))
  }).collect();
  let history_list = List::new(items)
    .block(Block::default().borders(Borders::ALL).title("Task History"));
  f.render_widget(history_list, area);
}

fn render_logs<B: Backend>(f: &mut tui::Frame<B>, app: &App, area: Rect) {
  let log_items: Vec<ListItem> = app.state.logs.iter().map(|l| {
    let (label, color) = match l.level {
      LogLevel::Info => ("INFO ", Color::Green),
      LogLevel::Warn => ("WARN ", Color::Yellow),
      LogLevel::Error => ("ERROR", Color::Red),
    };
    let timestamp = chrono::DateTime::<chrono::Utc>::from_timestamp_millis(l.timestamp)
      .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
      .unwrap_or_else(|| "N/A".into());
    ListItem::new(Spans::from(vec![
      Span::styled(timestamp, Style::default().fg(Color::DarkGray)),
      Span::raw(" "),
      Span::styled(label, Style::default().fg(color)),
      Span::raw(" - "),
      Span::raw(l.message.clone()),
    ]))
  }).collect();
  let logs_list = List::new(log_items)
    .block(Block::default().borders(Borders::ALL).title("Service Logs"));
  f.render_widget(logs_list, area);
}
