// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! # Guest Reel.
//!
//! A terminal kiosk for a live-event photo and video sharing backend.
//!
//! Guests' uploads are shown as a continuous slideshow in an MPV window
//! while the terminal shows captions, what is up next, event stats and a
//! command line for uploading, naming yourself and moderating.
//!
//! It uses an event-driven architecture where:
//!
//! * The **Main Thread** owns all state, including the slideshow scheduler,
//!   manages the terminal lifecycle and renders the UI.
//! * **Background Workers** handle backend requests (task worker, upload
//!   threads, pollers) and media display (MPV worker).
//! * **Event Loops** capture user input, timers and system ticks to drive
//!   the UI state.
//!
//! ## Architecture
//!
//! The application follows a strict setup-run-teardown pattern to ensure the
//! terminal state is preserved even in the event of a crash. Communication
//! between the UI and background workers is handled via `std::sync::mpsc`
//! channels.

mod api;
mod commander;
mod config;
mod events;
mod guest;
mod i18n;
mod logging;
mod model;
mod player;
mod pollers;
mod render;
mod slideshow;
mod tasks;
mod theme;
mod upload;
mod util;

use anyhow::{Context, Result};
use chrono::Utc;
use crossterm::{
    event::{self},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{
    env, io,
    sync::mpsc::{self, Receiver, Sender},
    thread,
    time::{Duration, Instant},
};
use tracing::{error, info, warn};

use crate::{
    api::ApiClient,
    commander::Commander,
    config::{AppConfig, Preferences},
    events::{AppEvent, process_events},
    guest::GuestIdentity,
    i18n::Language,
    model::{AdminStats, FrontendConfig, MyUpload, PublicStats},
    player::MediaDisplay,
    slideshow::{Scheduler, stage::LiveHost, timing::SlideTiming},
    tasks::AppTask,
    theme::Theme,
};

const TICK_INTERVAL: Duration = Duration::from_millis(250);
const TOAST_DURATION: Duration = Duration::from_secs(3);

/// What the right-hand panel lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SidePanel {
    UpNext,
    MyUploads,
}

impl SidePanel {
    fn toggled(self) -> Self {
        match self {
            SidePanel::UpNext => SidePanel::MyUploads,
            SidePanel::MyUploads => SidePanel::UpNext,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UploadStatus {
    Sending(u8),
    Retrying { attempt: u32, attempts: u32 },
}

#[derive(Debug, Clone, PartialEq)]
struct Toast {
    message: String,
    is_error: bool,
    shown_at: Instant,
}

impl Toast {
    fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) >= TOAST_DURATION
    }
}

/// Application state.
struct App {
    pub preferences: Preferences,
    pub language: Language,
    pub theme: Theme,
    pub side_panel: SidePanel,

    pub event_tx: Sender<AppEvent>,
    pub event_rx: Receiver<AppEvent>,

    pub task_tx: Sender<AppTask>,

    pub scheduler: Scheduler<LiveHost>,
    pub transition_window: Duration,

    pub commander: Commander,

    pub frontend_config: FrontendConfig,
    pub stats: Option<PublicStats>,
    pub admin_stats: Option<AdminStats>,
    pub identity: Option<GuestIdentity>,
    pub my_uploads: Vec<MyUpload>,
    pub upload: Option<UploadStatus>,
    pub toast: Option<Toast>,
}

impl App {
    /// Create a new instance of application state.
    ///
    /// The slideshow is wired to the MPV display and the task worker here but
    /// is not started until [`run`].
    pub fn new(
        config: &AppConfig,
        client: &ApiClient,
        identity: Option<GuestIdentity>,
        task_tx: Sender<AppTask>,
        event_tx: Sender<AppEvent>,
        event_rx: Receiver<AppEvent>,
    ) -> Result<Self> {
        let preferences = config::load_preferences();
        let locale = env::var("LANG").ok();
        let language = Language::detect(preferences.language, locale.as_deref());

        let display = MediaDisplay::new(&config.player, event_tx.clone()).context("Failed to start media display")?;
        let host = LiveHost::new(display, client.clone(), task_tx.clone(), event_tx.clone());
        let timing = SlideTiming::from(&config.slideshow);

        Ok(Self {
            theme: Theme::for_mode(preferences.theme),
            preferences,
            language,
            side_panel: SidePanel::UpNext,
            event_tx,
            event_rx,
            task_tx,
            scheduler: Scheduler::new(host, timing, config.slideshow.order),
            transition_window: Duration::from_millis(config.slideshow.transition_ms),
            commander: Commander::new(),
            frontend_config: FrontendConfig::default(),
            stats: None,
            admin_stats: None,
            identity,
            my_uploads: Vec::new(),
            upload: None,
            toast: None,
        })
    }

    pub fn notify(&mut self, message: impl Into<String>) {
        self.show_toast(message.into(), false);
    }

    pub fn notify_error(&mut self, message: impl Into<String>) {
        self.show_toast(message.into(), true);
    }

    fn show_toast(&mut self, message: String, is_error: bool) {
        self.toast = Some(Toast {
            message,
            is_error,
            shown_at: Instant::now(),
        });
    }
}

/// The entry point of the application.
///
/// Loads configuration, starts logging, the backend workers and the media
/// display, manages the terminal lifecycle, and returns an error if any part
/// of the execution fails.
fn main() -> Result<()> {
    let config = config::load_config();

    let log_path = logging::init_logging(&config).context("Failed to initialise logging")?;
    info!(log = %log_path.display(), server = %config.server_url, "Starting guestreel");

    let identity = guest::load_identity(Utc::now());

    let mut client = ApiClient::new(
        &config.server_url,
        config.admin_token.clone(),
        Duration::from_secs(config.request_timeout_secs),
    )
    .context("Failed to create backend client")?;
    client.set_identity(identity.clone());

    let (event_tx, event_rx) = mpsc::channel();
    let (task_tx, task_rx) = mpsc::channel();

    tasks::spawn_task_worker(client.clone(), task_rx, event_tx.clone());
    pollers::spawn_pollers(&client, &config.slideshow, &event_tx);

    let mut app = App::new(&config, &client, identity, task_tx, event_tx, event_rx)
        .context("Failed to initalise application")?;

    let mut terminal = setup_terminal(&app)?;
    let res = run(&mut terminal, &mut app);
    restore_terminal(&mut terminal);

    app.scheduler.dispose();

    if let Err(e) = &res {
        error!(error = %format!("{:#}", e), "Application error");
    }
    res.context("Application error occurred")
}

/// Prepares the terminal for the TUI application.
///
/// This function performs the following side effects:
/// * Sets the terminal background color based on the provided theme.
/// * Enables raw mode to capture all keyboard input.
/// * Switches the terminal to the alternate screen buffer.
///
/// # Errors
///
/// Returns an error if raw mode cannot be enabled or if the alternate screen
/// cannot be entered.
fn setup_terminal(app: &App) -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    // Set the background of the entire terminal window, without this we'd get
    // a thin black outline
    if let Err(e) = util::term::apply_theme_bg(&app.theme) {
        warn!(error = %e, "Failed to set terminal background");
    }

    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("Failed to create terminal")?;

    Ok(terminal)
}

/// Restores the terminal to its original state.
///
/// This reverses the changes made by [`setup_terminal`], including disabling
/// raw mode, leaving the alternate screen, and resetting the background color.
/// It also ensures the cursor is made visible again.
///
/// This function is best-effort and does not return a result, as it is
/// typically called during cleanup.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) {
    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    util::term::reset_terminal_bg().ok();
    terminal.show_cursor().ok();
}

/// Starts the input and tick threads and the slideshow, then enters the main
/// event loop.
///
/// # Errors
///
/// Returns an error if the event processing loop encounters an unrecoverable
/// application error.
fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    // Spawn a thread to translate raw key events to application events.
    let tx_keys = app.event_tx.clone();
    thread::spawn(move || {
        loop {
            if let Ok(event::Event::Key(key)) = event::read()
                && tx_keys.send(AppEvent::Key(key)).is_err()
            {
                break;
            }
        }
    });

    // Spawn a thread to send a periodic tick application event, this is
    // effectively the minimum "frame rate" for rendering the TUI application,
    // and it drives the transition animation.
    let tx_tick = app.event_tx.clone();
    thread::spawn(move || {
        while tx_tick.send(AppEvent::Tick).is_ok() {
            thread::sleep(TICK_INTERVAL);
        }
    });

    app.scheduler.start();
    if app.identity.is_some() {
        app.task_tx.send(AppTask::LoadMyUploads).context("Task worker is not running")?;
    }

    // Application event loop, process events until the user quits
    process_events(terminal, app)
}
