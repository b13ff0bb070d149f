//! Full-screen inference browser: API-key gate, filter form and the
//! expandable table, driven by the same fetch and view layers as the CLI.

mod handlers;
mod render;
pub mod state;
pub mod theme;
pub mod widgets;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::io;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::debug;

use crate::actions::{Credential, test_credentials};
use crate::config::{Config, HttpConfig};
use state::{App, Effect, Message};

const TICK: Duration = Duration::from_millis(100);

/// Run the browser until the user quits. The terminal is restored even when
/// the loop fails.
pub async fn run(config: Config, credential: Option<Credential>) -> Result<()> {
    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(&config, credential);
    let result = main_loop(&mut terminal, &mut app, &config.http).await;

    terminal::disable_raw_mode()?;
    crossterm::execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn main_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    http: &HttpConfig,
) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();

    if let Some(effect) = app.sync_fetch() {
        spawn_effect(app, effect, http, &tx);
    }

    loop {
        terminal.draw(|frame| {
            let area = frame.area();
            render::draw_ui(area, frame.buffer_mut(), app);
        })?;

        if app.should_quit {
            return Ok(());
        }

        while let Ok(message) = rx.try_recv() {
            if let Some(effect) = app.receive(message) {
                spawn_effect(app, effect, http, &tx);
            }
        }

        let ready = tokio::task::block_in_place(|| event::poll(TICK))?;
        if !ready {
            app.spinner.advance();
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if let Some(effect) = handlers::handle_key(app, key) {
                spawn_effect(app, effect, http, &tx);
            }
        }
    }
}

fn spawn_effect(
    app: &App,
    effect: Effect,
    http: &HttpConfig,
    tx: &mpsc::UnboundedSender<Message>,
) {
    let tx = tx.clone();
    match effect {
        Effect::Fetch {
            key,
            session,
            params,
        } => {
            let query = app.query.clone();
            debug!(query = key.query(), "fetching inferences");
            tokio::spawn(async move {
                let (_, outcome) = query.load(&session, &params).await;
                let _ = tx.send(Message::Fetched { key, outcome });
            });
        }
        Effect::CheckKey { base_url, raw_key } => {
            let http = http.clone();
            tokio::spawn(async move {
                let check = test_credentials(Some(&base_url), &raw_key, &http).await;
                let _ = tx.send(Message::KeyChecked { raw_key, check });
            });
        }
    }
}
