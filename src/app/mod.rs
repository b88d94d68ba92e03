use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::{Duration, Instant};

use crate::{
    store::{Store, Task},
    tasks::sort_tasks,
    theme::WidgetTheme,
    ui::draw,
};

// ─── App state ────────────────────────────────────────────────────────────────

pub struct App {
    pub store:       Store,
    pub theme:       WidgetTheme,
    pub theme_idx:   usize,
    pub tasks:       Vec<Task>,
    pub cursor:      usize,
    pub status:      String,
    pub running:     bool,
    refresh:         Duration,
    last_reload:     Instant,
}

impl App {
    pub async fn new(store: Store, theme: WidgetTheme, refresh: Duration) -> Result<Self> {
        let mut tasks = store.tasks_for_today().await.unwrap_or_default();
        sort_tasks(&mut tasks);

        let all = WidgetTheme::all_themes();
        let idx = all.iter().position(|t| t.name == theme.name).unwrap_or(0);

        Ok(Self {
            store,
            theme,
            theme_idx: idx,
            tasks,
            cursor: 0,
            status: String::new(),
            running: true,
            refresh,
            last_reload: Instant::now(),
        })
    }

    // ── TUI loop ──────────────────────────────────────────────────────────────

    pub async fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend  = CrosstermBackend::new(stdout);
        let mut term = Terminal::new(backend)?;

        let result = self.event_loop(&mut term).await;

        disable_raw_mode()?;
        execute!(term.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
        term.show_cursor()?;
        result
    }

    async fn event_loop(
        &mut self,
        term: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> Result<()> {
        let tick = Duration::from_millis(50);
        while self.running {
            term.draw(|f| draw(f, self))?;

            // The refresh cadence belongs to the host, not the view models:
            // each reload hands the next draw a fresh task snapshot.
            if self.last_reload.elapsed() >= self.refresh {
                self.reload().await;
            }

            if event::poll(tick)? {
                if let Event::Key(key) = event::read()? {
                    self.on_key(key).await?;
                }
            }
        }
        Ok(())
    }

    // ── Input ─────────────────────────────────────────────────────────────────

    async fn on_key(&mut self, key: crossterm::event::KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Down | KeyCode::Char('j') => {
                if self.cursor + 1 < self.tasks.len() { self.cursor += 1; }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.cursor = self.cursor.saturating_sub(1);
            }
            KeyCode::Char(' ') => self.toggle_selected().await?,
            KeyCode::Char('r') => self.reload().await,
            // T (Shift+T) — cycle through themes
            KeyCode::Char('T') => {
                let themes = WidgetTheme::all_themes();
                self.theme_idx = (self.theme_idx + 1) % themes.len();
                self.theme     = themes[self.theme_idx].clone();
                let _ = self.theme.save();
            }
            _ => {}
        }
        Ok(())
    }

    async fn toggle_selected(&mut self) -> Result<()> {
        if let Some(t) = self.tasks.get(self.cursor) {
            let (id, next) = (t.id.clone(), !t.completed);
            self.store.set_completed(&id, next).await?;
            self.reload().await;
        }
        Ok(())
    }

    // ── Helpers ───────────────────────────────────────────────────────────────

    async fn reload(&mut self) {
        match self.store.tasks_for_today().await {
            Ok(mut ts) => {
                sort_tasks(&mut ts);
                self.tasks = ts;
                if self.cursor >= self.tasks.len() {
                    self.cursor = self.tasks.len().saturating_sub(1);
                }
                self.status = format!(
                    "refreshed {}",
                    chrono::Local::now().format("%-I:%M %p")
                );
            }
            Err(e) => {
                tracing::error!("store reload failed: {e}");
                self.status = format!("✗ {e}");
            }
        }
        self.last_reload = Instant::now();
    }
}
