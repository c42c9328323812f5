//! TUI runtime - owns terminal, runs event loop, executes effects.
//!
//! This is the "Elm runtime" boundary: all side effects happen here.
//! The reducer stays pure and produces effects; this module executes them.
//!
//! ## Inbox Pattern
//!
//! - Handlers, countdowns and collaborators send `UiEvent`s to `inbox_tx`
//! - The runtime drains `inbox_rx` each loop iteration
//!
//! Structure:
//! - `mod.rs`: Core runtime (TuiRuntime, event loop, effect dispatch)
//! - `inbox.rs`: Inbox channel types
//! - `handlers/`: Effect handler implementations (API calls, collaborators)

mod handlers;
mod inbox;

use std::future::Future;
use std::io::Stdout;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use botdesk_core::api::ApiClient;
use botdesk_core::collaborators::{
    PaymentGateway, Responder, SimulatedGateway, SimulatedResponder,
};
use botdesk_core::config::Config;
use botdesk_core::payment::Countdown;
use crossterm::event;
use inbox::{UiEventReceiver, UiEventSender};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::common::{TaskCompleted, TaskId, TaskKind, TaskStarted};
use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::state::AppState;
use crate::{interrupt, render, terminal, update};

/// Frame cadence while something is animating (~60fps).
pub const FRAME_DURATION: Duration = Duration::from_millis(16);

/// Poll duration when idle. Longer timeout reduces CPU usage.
pub const IDLE_POLL_DURATION: Duration = Duration::from_millis(100);

/// Payment countdown resolution.
const COUNTDOWN_PERIOD: Duration = Duration::from_secs(1);

/// Full-screen TUI runtime.
///
/// Owns the terminal and state. Runs the event loop and executes effects.
/// Terminal state is guaranteed to be restored on drop, panic, or Ctrl+C.
pub struct TuiRuntime {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    /// Application state (split: tui + overlay).
    pub state: AppState,
    inbox_tx: UiEventSender,
    inbox_rx: UiEventReceiver,
    api: ApiClient,
    responder: Arc<dyn Responder>,
    gateway: Arc<dyn PaymentGateway>,
    /// Last time a Tick event was emitted.
    last_tick: Instant,
}

impl TuiRuntime {
    /// Creates a runtime wired to the simulated responder and gateway.
    ///
    /// # Errors
    /// Returns an error if the API client or the terminal cannot be set up.
    pub fn new(config: Config) -> Result<Self> {
        let responder = Arc::new(SimulatedResponder::new(config.ack_delay()));
        let gateway = Arc::new(SimulatedGateway::new(config.settlement_delay()));
        Self::with_collaborators(config, responder, gateway)
    }

    /// Creates a runtime with custom acknowledgment and settlement sources.
    ///
    /// # Errors
    /// Returns an error if the API client or the terminal cannot be set up.
    pub fn with_collaborators(
        config: Config,
        responder: Arc<dyn Responder>,
        gateway: Arc<dyn PaymentGateway>,
    ) -> Result<Self> {
        let api = ApiClient::from_config(&config)?;

        // Set up panic hook BEFORE entering alternate screen
        terminal::install_panic_hook();
        interrupt::init()?;
        interrupt::set_restore_hook(|| {
            let _ = terminal::restore_terminal();
        });
        interrupt::reset();

        let terminal = terminal::setup_terminal().context("Failed to setup terminal")?;
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();

        Ok(Self {
            terminal,
            state: AppState::new(config),
            inbox_tx,
            inbox_rx,
            api,
            responder,
            gateway,
            last_tick: Instant::now(),
        })
    }

    /// Runs the main event loop.
    ///
    /// # Errors
    /// Returns an error if the terminal cannot be read or drawn.
    pub fn run(&mut self) -> Result<()> {
        terminal::enable_input_features()?;

        self.execute_effect(UiEffect::CheckSession);
        let result = self.event_loop();

        let _ = terminal::disable_input_features();

        result
    }

    fn event_loop(&mut self) -> Result<()> {
        let mut dirty = true;

        while !self.state.tui.should_quit {
            if interrupt::is_interrupted() {
                self.state.tui.should_quit = true;
                break;
            }

            let events = self.collect_events()?;
            for event in events {
                // Everything but an idle tick can change what is on screen.
                if !matches!(event, UiEvent::Tick) || self.needs_fast_poll() {
                    dirty = true;
                }
                let effects = update::update(&mut self.state, event);
                self.execute_effects(effects);
            }

            if dirty {
                self.terminal.draw(|frame| {
                    render::render(&self.state, frame);
                })?;
                dirty = false;
            }
        }

        Ok(())
    }

    /// Spinner, notice expiry and the payment countdown redraw on every tick.
    fn needs_fast_poll(&self) -> bool {
        self.state.tui.tasks.is_any_running()
            || self.state.tui.notice.is_some()
            || self.state.tui.checkout.has_live_countdown()
    }

    // ========================================================================
    // Event Collection
    // ========================================================================

    fn collect_events(&mut self) -> Result<Vec<UiEvent>> {
        let mut events = Vec::new();

        let tick_interval = if self.needs_fast_poll() {
            FRAME_DURATION
        } else {
            IDLE_POLL_DURATION
        };

        while let Ok(ev) = self.inbox_rx.try_recv() {
            events.push(ev);
        }

        let time_until_tick = tick_interval.saturating_sub(self.last_tick.elapsed());
        let poll_duration = if events.is_empty() {
            time_until_tick
        } else {
            Duration::ZERO
        };

        if event::poll(poll_duration)? {
            events.push(UiEvent::Terminal(event::read()?));
            while event::poll(Duration::ZERO)? {
                events.push(UiEvent::Terminal(event::read()?));
            }
        }

        if self.last_tick.elapsed() >= tick_interval {
            events.push(UiEvent::Tick);
            self.last_tick = Instant::now();
        }

        Ok(events)
    }

    // ========================================================================
    // Effect Dispatch
    // ========================================================================

    fn execute_effects(&mut self, effects: Vec<UiEffect>) {
        for effect in effects {
            self.execute_effect(effect);
        }
    }

    fn dispatch_event(&mut self, event: UiEvent) {
        let effects = update::update(&mut self.state, event);
        if !effects.is_empty() {
            self.execute_effects(effects);
        }
    }

    /// Spawns a pure async handler and sends its result event to the inbox.
    fn spawn_effect<F, Fut>(&self, f: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = UiEvent> + Send + 'static,
    {
        let tx = self.inbox_tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(f().await);
        });
    }

    /// Spawns an async task with a uniform TaskStarted/TaskCompleted lifecycle.
    fn spawn_task<F, Fut>(&self, kind: TaskKind, id: TaskId, cancelable: bool, f: F)
    where
        F: FnOnce(Option<CancellationToken>) -> Fut + Send + 'static,
        Fut: Future<Output = UiEvent> + Send + 'static,
    {
        let tx = self.inbox_tx.clone();
        let cancel = cancelable.then(CancellationToken::new);
        let started = TaskStarted {
            id,
            cancel: cancel.clone(),
        };
        let _ = tx.send(UiEvent::TaskStarted { kind, started });
        tokio::spawn(async move {
            let inner = f(cancel).await;
            let completed = TaskCompleted {
                id,
                result: Box::new(inner),
            };
            let _ = tx.send(UiEvent::TaskCompleted { kind, completed });
        });
    }

    fn execute_effect(&mut self, effect: UiEffect) {
        match effect {
            UiEffect::Quit => {
                self.state.tui.should_quit = true;
            }
            UiEffect::CancelTask { kind, token } => {
                tracing::debug!(?kind, "cancelling task");
                if let Some(cancel) = token {
                    cancel.cancel();
                }
            }
            UiEffect::PersistTheme(theme) => {
                // The theme is already applied; a failed write only loses it for next launch.
                if let Err(err) = Config::save_theme(theme) {
                    tracing::warn!(error = %err, "failed to persist theme");
                }
            }

            // Collaborators
            UiEffect::RequestAck(pending) => {
                let responder = Arc::clone(&self.responder);
                self.spawn_effect(move || handlers::request_ack(responder, pending));
            }
            UiEffect::StartCountdown { session } => {
                let tx = self.inbox_tx.clone();
                let countdown = Countdown::spawn(COUNTDOWN_PERIOD, move || {
                    tx.send(UiEvent::PaymentTick { session }).is_ok()
                });
                self.dispatch_event(UiEvent::CountdownStarted { session, countdown });
            }
            UiEffect::Settle { task, ticket } => {
                let Some(task) = task else {
                    return;
                };
                let gateway = Arc::clone(&self.gateway);
                self.spawn_task(TaskKind::Settlement, task, false, move |_| {
                    handlers::settle(gateway, ticket)
                });
            }

            // API
            UiEffect::CheckSession => {
                let api = self.api.clone();
                self.spawn_effect(move || handlers::check_session(api));
            }
            UiEffect::Login {
                task,
                username,
                password,
            } => {
                let Some(task) = task else {
                    return;
                };
                let api = self.api.clone();
                self.spawn_task(TaskKind::Login, task, true, move |cancel| {
                    handlers::login(api, username, password, cancel)
                });
            }
            UiEffect::Logout => {
                let api = self.api.clone();
                self.spawn_effect(move || handlers::logout(api));
            }
            UiEffect::LoadBots { task } => {
                let Some(task) = task else {
                    return;
                };
                let api = self.api.clone();
                self.spawn_task(TaskKind::BotsLoad, task, false, move |_| {
                    handlers::load_bots(api)
                });
            }
            UiEffect::LoadBotData { bot_id } => {
                let api = self.api.clone();
                self.spawn_effect(move || handlers::load_bot_data(api, bot_id));
            }
            UiEffect::CreateBot { task, name, prefix } => {
                let Some(task) = task else {
                    return;
                };
                let api = self.api.clone();
                self.spawn_task(TaskKind::BotCreate, task, false, move |_| {
                    handlers::create_bot(api, name, prefix)
                });
            }
            UiEffect::RenameBot { task, bot_id, name } => {
                let Some(task) = task else {
                    return;
                };
                let api = self.api.clone();
                self.spawn_task(TaskKind::BotRename, task, false, move |_| {
                    handlers::rename_bot(api, bot_id, name)
                });
            }
            UiEffect::DeleteBot { task, bot_id } => {
                let Some(task) = task else {
                    return;
                };
                let api = self.api.clone();
                self.spawn_task(TaskKind::BotDelete, task, false, move |_| {
                    handlers::delete_bot(api, bot_id)
                });
            }
            UiEffect::FetchToken { bot_id } => {
                let api = self.api.clone();
                self.spawn_effect(move || handlers::fetch_token(api, bot_id));
            }
        }
    }
}

impl Drop for TuiRuntime {
    fn drop(&mut self) {
        let _ = terminal::restore_terminal();
    }
}
