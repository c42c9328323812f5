//! TUI reducer (update function).
//!
//! All state mutations happen here. The runtime calls `update(app, event)`
//! and executes the returned effects.
//!
//! This is the single source of truth for how events modify state.

use std::time::Instant;

use botdesk_core::api::ApiError;
use botdesk_core::transcript::{EventKind, LogEntry};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::common::TaskKind;
use crate::effects::UiEffect;
use crate::events::{ApiUiEvent, UiEvent};
use crate::features::{KeyOutcome, console, payment, rental, shop};
use crate::mutations::{PaymentMutation, ShopMutation, StateMutation};
use crate::overlays::{
    BotFormState, ConfirmState, LoginState, Overlay, OverlayExt, OverlayRequest,
    OverlayTransition, OverlayUpdate, TokenState,
};
use crate::state::{
    AppState, AuthStatus, ConsoleFocus, Notice, RentalField, Screen, TuiState,
};

/// The main reducer function.
///
/// Takes the current state and an event, mutates state, and returns effects
/// for the runtime to execute.
pub fn update(app: &mut AppState, event: UiEvent) -> Vec<UiEffect> {
    let mut effects = match event {
        UiEvent::Tick => {
            app.tui.spinner_frame = app.tui.spinner_frame.wrapping_add(1);
            if app
                .tui
                .notice
                .as_ref()
                .is_some_and(|n| n.is_expired(Instant::now()))
            {
                app.tui.notice = None;
            }
            vec![]
        }
        UiEvent::Terminal(term_event) => handle_terminal_event(app, term_event),
        UiEvent::AckArrived { route, reply } => {
            app.tui.panel.deliver_ack(route, reply);
            vec![]
        }
        UiEvent::PaymentTick { session } => {
            payment::on_tick(&mut app.tui, session);
            vec![]
        }
        UiEvent::CountdownStarted { session, countdown } => {
            payment::on_countdown_started(&mut app.tui, session, countdown);
            vec![]
        }
        UiEvent::Settled { ticket, result } => payment::on_settled(&mut app.tui, &ticket, result),
        UiEvent::Api(event) => handle_api_event(app, event),
        UiEvent::TaskStarted { kind, started } => {
            app.tui.tasks.state_mut(kind).on_started(&started);
            vec![]
        }
        UiEvent::TaskCompleted { kind, completed } => {
            let ok = app.tui.tasks.state_mut(kind).finish_if_active(completed.id);
            if ok {
                update(app, *completed.result)
            } else {
                tracing::debug!(?kind, id = completed.id.0, "ignoring stale task result");
                vec![]
            }
        }
    };
    assign_task_ids(&mut app.tui, &mut effects);
    effects
}

/// Stamps a fresh id on every task-backed effect that does not have one yet.
fn assign_task_ids(tui: &mut TuiState, effects: &mut [UiEffect]) {
    for effect in effects.iter_mut() {
        match effect {
            UiEffect::Login { task, .. }
            | UiEffect::LoadBots { task }
            | UiEffect::CreateBot { task, .. }
            | UiEffect::RenameBot { task, .. }
            | UiEffect::DeleteBot { task, .. }
            | UiEffect::Settle { task, .. } => {
                if task.is_none() {
                    *task = Some(tui.task_seq.next_id());
                }
            }
            _ => {}
        }
    }
}

// ============================================================================
// API Results
// ============================================================================

fn handle_api_event(app: &mut AppState, event: ApiUiEvent) -> Vec<UiEffect> {
    let tui = &mut app.tui;
    match event {
        ApiUiEvent::SessionChecked(Ok(Some(user))) => {
            tracing::info!(user = %user.username, "restored session");
            tui.auth = AuthStatus::LoggedIn(user);
            vec![UiEffect::LoadBots { task: None }]
        }
        ApiUiEvent::SessionChecked(Ok(None)) => {
            tui.auth = AuthStatus::LoggedOut;
            vec![]
        }
        ApiUiEvent::SessionChecked(Err(err)) => {
            tracing::warn!(error = %err, "session check failed");
            tui.auth = AuthStatus::LoggedOut;
            tui.notify(Notice::error("Server unavailable, showing sample data"));
            vec![]
        }
        ApiUiEvent::LoggedIn(Ok(user)) => {
            if matches!(app.overlay, Some(Overlay::Login(_))) {
                app.overlay = None;
            }
            tui.notify(Notice::success(format!("Welcome, {}", user.username)));
            tui.auth = AuthStatus::LoggedIn(user);
            vec![UiEffect::LoadBots { task: None }]
        }
        ApiUiEvent::LoggedIn(Err(err)) => {
            match app.overlay.as_mut() {
                Some(Overlay::Login(login)) => login.fail(err.message),
                _ => tui.notify(Notice::error(format!("Sign in failed: {err}"))),
            }
            vec![]
        }
        ApiUiEvent::LoggedOut(result) => {
            if let Err(err) = result {
                tracing::warn!(error = %err, "logout request failed, clearing local session");
            }
            tui.auth = AuthStatus::LoggedOut;
            tui.tasks.bots_load.clear();
            tui.directory.reset_to_sample();
            console::clamp_cursors(tui);
            tui.notify(Notice::info("Signed out, showing sample data"));
            vec![]
        }
        ApiUiEvent::BotsLoaded(result) => match tui.directory.apply_bots(result) {
            Ok(true) => {
                console::clamp_cursors(tui);
                let count = tui.directory.bots().len();
                tui.notify(Notice::info(format!("Loaded {count} bots")));
                match tui.directory.active_bot_id() {
                    Some(bot_id) => vec![UiEffect::LoadBotData {
                        bot_id: bot_id.to_string(),
                    }],
                    None => vec![],
                }
            }
            Ok(false) => {
                tui.notify(Notice::info("No bots on the server yet"));
                vec![]
            }
            Err(err) => {
                api_failure(tui, "Could not load bots", &err);
                vec![]
            }
        },
        ApiUiEvent::BotDataLoaded { bot_id, result } => {
            match tui.directory.apply_bot_data(&bot_id, result) {
                Ok(_) => console::clamp_cursors(tui),
                Err(err) => api_failure(tui, "Could not load groups and friends", &err),
            }
            vec![]
        }
        ApiUiEvent::BotCreated { name, result } => {
            match result {
                Ok(created) => {
                    tui.directory.add_bot(&name, created);
                    tui.panel.append_global(LogEntry::event(
                        EventKind::System,
                        "BOT",
                        format!("Bot \"{name}\" created"),
                    ));
                    tui.notify(Notice::success(format!("Created {name}")));
                }
                Err(err) => api_failure(tui, "Could not create bot", &err),
            }
            vec![]
        }
        ApiUiEvent::BotRenamed {
            bot_id,
            name,
            result,
        } => {
            match result {
                Ok(()) => {
                    if tui.directory.rename_bot(&bot_id, &name) {
                        tui.notify(Notice::success(format!("Renamed to {name}")));
                    }
                }
                Err(err) => api_failure(tui, "Could not rename bot", &err),
            }
            vec![]
        }
        ApiUiEvent::BotDeleted { bot_id, result } => match result {
            Ok(()) => {
                let was_active = tui.directory.active_bot_id() == Some(bot_id.as_str());
                let Some(removed) = tui.directory.remove_bot(&bot_id) else {
                    return vec![];
                };
                tui.panel.append_global(LogEntry::event(
                    EventKind::Leave,
                    "BOT",
                    format!("Bot \"{}\" deleted", removed.name),
                ));
                console::clamp_cursors(tui);
                match tui.directory.active_bot_id() {
                    Some(next) if was_active && tui.auth.is_logged_in() => {
                        vec![UiEffect::LoadBotData {
                            bot_id: next.to_string(),
                        }]
                    }
                    _ => vec![],
                }
            }
            Err(err) => {
                api_failure(tui, "Could not delete bot", &err);
                vec![]
            }
        },
        ApiUiEvent::TokenLoaded { bot_id, result } => {
            if let Some(Overlay::Token(token)) = app.overlay.as_mut()
                && token.bot_id == bot_id
            {
                match result {
                    Ok(value) => token.token = Some(value),
                    Err(err) => token.error = Some(err.message),
                }
            }
            vec![]
        }
    }
}

/// Shows an API failure; a 401 also drops the local session.
fn api_failure(tui: &mut TuiState, action: &str, err: &ApiError) {
    if err.is_unauthorized() {
        tui.auth = AuthStatus::LoggedOut;
        tui.notify(Notice::error(format!("{action}: session expired, sign in again")));
    } else {
        tui.notify(Notice::error(format!("{action}: {err}")));
    }
}

// ============================================================================
// StateMutation Dispatcher
// ============================================================================

fn apply_mutations(tui: &mut TuiState, mutations: Vec<StateMutation>) {
    for mutation in mutations {
        match mutation {
            StateMutation::Notice(notice) => tui.notify(notice),
            StateMutation::Payment(PaymentMutation::ConfirmCancel(gate)) => {
                payment::confirm_cancel(tui, gate);
            }
            StateMutation::Shop(ShopMutation::PurchaseConfirmed) => shop::confirm_purchase(tui),
        }
    }
}

fn apply_overlay_update(app: &mut AppState, update: OverlayUpdate) -> Vec<UiEffect> {
    let mut effects = update.effects;
    match update.transition {
        OverlayTransition::Stay => {}
        OverlayTransition::Close => {
            if matches!(app.overlay, Some(Overlay::Login(_))) && app.tui.tasks.login.is_running() {
                let token = app.tui.tasks.login.cancel.clone();
                app.tui.tasks.login.clear();
                effects.push(UiEffect::CancelTask {
                    kind: TaskKind::Login,
                    token,
                });
            }
            app.overlay = None;
        }
    }
    effects
}

fn open_overlay_request(app: &mut AppState, request: OverlayRequest) -> Vec<UiEffect> {
    let (overlay, effects) = match request {
        OverlayRequest::Login => (Overlay::Login(LoginState::open()), vec![]),
        OverlayRequest::CreateBot => (Overlay::BotForm(BotFormState::create()), vec![]),
        OverlayRequest::RenameBot { bot_id, name } => {
            (Overlay::BotForm(BotFormState::rename(bot_id, name)), vec![])
        }
        OverlayRequest::DeleteBot { bot_id, name } => {
            (Overlay::Confirm(ConfirmState::delete_bot(bot_id, name)), vec![])
        }
        OverlayRequest::Token { bot_id, name } => {
            let cached = app
                .tui
                .directory
                .bot(&bot_id)
                .and_then(|bot| bot.token.clone());
            let mut state = TokenState::open(bot_id.clone(), name, cached);
            let mut effects = vec![];
            if state.token.is_none() {
                if app.tui.auth.is_logged_in() {
                    effects.push(UiEffect::FetchToken { bot_id });
                } else {
                    state.error = Some("Sign in to view tokens".to_string());
                }
            }
            (Overlay::Token(state), effects)
        }
        OverlayRequest::Purchase { summary } => {
            (Overlay::Confirm(ConfirmState::purchase(summary)), vec![])
        }
        OverlayRequest::CancelPayment(gate) => {
            (Overlay::Confirm(ConfirmState::cancel_payment(gate)), vec![])
        }
    };
    app.overlay = Some(overlay);
    effects
}

// ============================================================================
// Terminal Event Handlers
// ============================================================================

fn handle_terminal_event(app: &mut AppState, event: Event) -> Vec<UiEffect> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => handle_key(app, key),
        Event::Paste(text) => {
            handle_paste(app, &text);
            vec![]
        }
        // Layout is recomputed every frame.
        _ => vec![],
    }
}

fn handle_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    if ctrl && key.code == KeyCode::Char('q') {
        return vec![UiEffect::Quit];
    }

    // Try to dispatch to the active overlay
    if let Some(mut update) = app.overlay.handle_key(&app.tui, key) {
        apply_mutations(&mut app.tui, std::mem::take(&mut update.mutations));
        return apply_overlay_update(app, update);
    }

    if let Some(effects) = handle_global_key(app, key) {
        return effects;
    }

    let outcome = match app.tui.screen {
        Screen::Console => console::handle_key(&mut app.tui, key),
        Screen::Shop => shop::handle_key(&mut app.tui, key),
        Screen::Rental => rental::handle_key(&mut app.tui, key),
        Screen::Payment => payment::handle_key(&mut app.tui, key),
    };
    apply_key_outcome(app, outcome)
}

/// Pastes into the focused text field of the current screen. Line breaks become spaces.
fn handle_paste(app: &mut AppState, text: &str) {
    if app.overlay.is_some() {
        return;
    }
    let text = text.replace(['\r', '\n'], " ");
    let tui = &mut app.tui;
    let field = match tui.screen {
        Screen::Console if tui.console.focus == ConsoleFocus::Composer => {
            Some(&mut tui.console.composer)
        }
        Screen::Rental => match tui.rental.field {
            RentalField::CustomDays => Some(&mut tui.rental.custom_days),
            RentalField::Prefix => Some(&mut tui.rental.prefix),
            RentalField::Email => Some(&mut tui.rental.email),
            RentalField::Tier | RentalField::Method => None,
        },
        _ => None,
    };
    if let Some(field) = field {
        field.push_str(&text);
    }
}

fn apply_key_outcome(app: &mut AppState, outcome: KeyOutcome) -> Vec<UiEffect> {
    let KeyOutcome {
        mut effects,
        overlay,
    } = outcome;
    if let Some(request) = overlay
        && app.overlay.is_none()
    {
        let mut overlay_effects = open_overlay_request(app, request);
        overlay_effects.append(&mut effects);
        return overlay_effects;
    }
    effects
}

/// Keys that work on every screen. `None` lets the screen handle the key.
fn handle_global_key(app: &mut AppState, key: KeyEvent) -> Option<Vec<UiEffect>> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let effects = match key.code {
        KeyCode::Char('c') if ctrl => vec![UiEffect::Quit],
        KeyCode::Char('t') if ctrl => {
            let theme = app.tui.theme.toggled();
            app.tui.theme = theme;
            app.tui
                .notify(Notice::info(format!("Theme: {}", theme.display_name())));
            vec![UiEffect::PersistTheme(theme)]
        }
        KeyCode::Char('l') if ctrl && app.tui.auth.is_logged_in() => vec![UiEffect::Logout],
        KeyCode::Char('l') if ctrl => open_overlay_request(app, OverlayRequest::Login),
        KeyCode::F(n @ 1..=4) => {
            navigate(&mut app.tui, Screen::ALL[usize::from(n - 1)]);
            vec![]
        }
        _ => return None,
    };
    Some(effects)
}

/// Switches screens unless a payment is running.
fn navigate(tui: &mut TuiState, screen: Screen) {
    if tui.screen == screen {
        return;
    }
    if tui.payment_in_progress() {
        tui.notify(Notice::error("Finish or cancel the payment first"));
        return;
    }
    if screen == Screen::Payment && tui.checkout.session().is_none() {
        tui.notify(Notice::info("No payment yet. Choose a plan on the Rental screen"));
        return;
    }
    tui.screen = screen;
}

#[cfg(test)]
mod tests {
    use botdesk_core::api::{ApiErrorKind, User};
    use botdesk_core::collaborators::Receipt;
    use botdesk_core::config::Config;
    use botdesk_core::directory::DataSource;
    use botdesk_core::payment::SessionState;
    use botdesk_core::transcript::{AckRoute, PendingAck};

    use super::*;
    use crate::common::{TaskCompleted, TaskId, TaskStarted};

    fn press(code: KeyCode) -> UiEvent {
        UiEvent::Terminal(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)))
    }

    fn ctrl(c: char) -> UiEvent {
        UiEvent::Terminal(Event::Key(KeyEvent::new(
            KeyCode::Char(c),
            KeyModifiers::CONTROL,
        )))
    }

    fn type_text(app: &mut AppState, text: &str) {
        for c in text.chars() {
            update(app, press(KeyCode::Char(c)));
        }
    }

    fn global_contents(app: &AppState) -> Vec<String> {
        app.tui
            .panel
            .global_entries()
            .map(|e| e.content().to_string())
            .collect()
    }

    fn open_rental_checkout(app: &mut AppState) -> Vec<UiEffect> {
        app.tui.screen = Screen::Rental;
        app.tui.rental.prefix = "!".to_string();
        app.tui.rental.email = "ops@example.com".to_string();
        update(app, press(KeyCode::Enter))
    }

    fn complete(app: &mut AppState, kind: TaskKind, id: TaskId, result: UiEvent) {
        update(
            app,
            UiEvent::TaskStarted {
                kind,
                started: TaskStarted { id, cancel: None },
            },
        );
        update(
            app,
            UiEvent::TaskCompleted {
                kind,
                completed: TaskCompleted {
                    id,
                    result: Box::new(result),
                },
            },
        );
    }

    fn user() -> User {
        User {
            id: "1".to_string(),
            username: "ops".to_string(),
            email: None,
        }
    }

    #[test]
    fn test_global_feed_restored_after_thread() {
        let mut app = AppState::new(Config::default());
        for text in ["first", "second", "third"] {
            update(
                &mut app,
                UiEvent::AckArrived {
                    route: AckRoute::Global,
                    reply: LogEntry::system(text),
                },
            );
        }
        let before = global_contents(&app);
        assert_eq!(before[..3], ["third", "second", "first"]);

        update(&mut app, press(KeyCode::Enter));
        assert!(app.tui.panel.is_thread());
        assert_eq!(app.tui.console.focus, ConsoleFocus::Composer);

        update(&mut app, press(KeyCode::Esc));
        assert!(!app.tui.panel.is_thread());
        assert_eq!(global_contents(&app), before);
    }

    #[test]
    fn test_global_events_buffered_while_thread_open() {
        let mut app = AppState::new(Config::default());
        update(&mut app, press(KeyCode::Enter));
        let thread_len = app.tui.panel.visible_len();

        update(
            &mut app,
            UiEvent::AckArrived {
                route: AckRoute::Global,
                reply: LogEntry::system("while away"),
            },
        );
        assert_eq!(app.tui.panel.visible_len(), thread_len);

        update(&mut app, press(KeyCode::Esc));
        assert_eq!(global_contents(&app)[0], "while away");
    }

    #[test]
    fn test_stale_thread_ack_discarded() {
        let mut app = AppState::new(Config::default());
        update(&mut app, press(KeyCode::Enter));
        type_text(&mut app, "hi");
        let effects = update(&mut app, press(KeyCode::Enter));
        let Some(UiEffect::RequestAck(PendingAck { route, .. })) = effects.into_iter().next()
        else {
            panic!("expected an ack request");
        };

        // Switch straight to another group.
        app.tui.console.focus = ConsoleFocus::Targets;
        update(&mut app, press(KeyCode::Down));
        update(&mut app, press(KeyCode::Enter));
        let seeded = app.tui.panel.visible_len();

        update(
            &mut app,
            UiEvent::AckArrived {
                route,
                reply: LogEntry::incoming("User", "Message received!"),
            },
        );
        assert_eq!(app.tui.panel.visible_len(), seeded);
    }

    #[test]
    fn test_payment_confirm_flow() {
        let mut app = AppState::new(Config::default());
        let effects = open_rental_checkout(&mut app);
        assert!(matches!(
            effects.as_slice(),
            [UiEffect::StartCountdown { .. }]
        ));
        assert_eq!(app.tui.screen, Screen::Payment);

        let effects = update(&mut app, press(KeyCode::Char('y')));
        let Some(UiEffect::Settle {
            task: Some(task),
            ticket,
        }) = effects.into_iter().next()
        else {
            panic!("expected a settle effect with a task id");
        };
        let receipt = Receipt {
            reference: ticket.charge().reference.clone(),
            amount: ticket.charge().amount,
        };
        assert_eq!(receipt.amount, 90_000);

        complete(
            &mut app,
            TaskKind::Settlement,
            task,
            UiEvent::Settled {
                ticket,
                result: Ok(receipt),
            },
        );

        let session = app.tui.checkout.session().expect("session kept for display");
        assert_eq!(session.state(), SessionState::Confirmed);
        assert!(!app.tui.checkout.has_live_countdown());
        assert_eq!(app.tui.screen, Screen::Console);
        assert!(app.tui.rental.prefix.is_empty());

        let effects = open_rental_checkout(&mut app);
        assert_eq!(effects.len(), 1);
        let session = app.tui.checkout.session().expect("fresh session");
        assert_eq!(session.state(), SessionState::Active);
        assert_eq!(session.remaining_secs(), 900);
    }

    #[test]
    fn test_navigation_locked_during_payment() {
        let mut app = AppState::new(Config::default());
        open_rental_checkout(&mut app);

        update(&mut app, press(KeyCode::F(1)));
        assert_eq!(app.tui.screen, Screen::Payment);
        assert!(app.tui.notice.is_some());
    }

    #[test]
    fn test_payment_window_expiry_returns_to_rental() {
        let mut config = Config::default();
        config.payment_window_secs = 2;
        let mut app = AppState::new(config);
        open_rental_checkout(&mut app);
        let session = app.tui.checkout.session().map(|s| s.id()).expect("session");

        update(&mut app, UiEvent::PaymentTick { session });
        assert_eq!(app.tui.screen, Screen::Payment);
        update(&mut app, UiEvent::PaymentTick { session });

        assert_eq!(
            app.tui.checkout.session().map(|s| s.state()),
            Some(SessionState::Expired)
        );
        assert_eq!(app.tui.screen, Screen::Rental);
    }

    #[test]
    fn test_cancel_payment_through_prompt() {
        let mut app = AppState::new(Config::default());
        open_rental_checkout(&mut app);

        update(&mut app, press(KeyCode::Char('c')));
        assert!(matches!(app.overlay, Some(Overlay::Confirm(_))));

        update(&mut app, press(KeyCode::Char('y')));
        assert!(app.overlay.is_none());
        assert_eq!(
            app.tui.checkout.session().map(|s| s.state()),
            Some(SessionState::Cancelled)
        );
        assert_eq!(app.tui.screen, Screen::Rental);
    }

    #[test]
    fn test_declined_cancel_keeps_session_running() {
        let mut app = AppState::new(Config::default());
        open_rental_checkout(&mut app);

        update(&mut app, press(KeyCode::Char('c')));
        update(&mut app, press(KeyCode::Char('n')));

        assert!(app.overlay.is_none());
        assert!(app.tui.payment_in_progress());
        assert_eq!(app.tui.screen, Screen::Payment);
    }

    #[test]
    fn test_login_flow_loads_bots() {
        let mut app = AppState::new(Config::default());
        update(&mut app, ctrl('l'));
        assert!(matches!(app.overlay, Some(Overlay::Login(_))));

        type_text(&mut app, "ops");
        update(&mut app, press(KeyCode::Enter));
        type_text(&mut app, "secret");
        let effects = update(&mut app, press(KeyCode::Enter));
        let Some(UiEffect::Login {
            task: Some(task), ..
        }) = effects.into_iter().next()
        else {
            panic!("expected a login effect with a task id");
        };

        update(
            &mut app,
            UiEvent::TaskStarted {
                kind: TaskKind::Login,
                started: TaskStarted { id: task, cancel: None },
            },
        );
        let effects = update(
            &mut app,
            UiEvent::TaskCompleted {
                kind: TaskKind::Login,
                completed: TaskCompleted {
                    id: task,
                    result: Box::new(UiEvent::Api(ApiUiEvent::LoggedIn(Ok(user())))),
                },
            },
        );

        assert!(app.overlay.is_none());
        assert!(app.tui.auth.is_logged_in());
        assert!(matches!(
            effects.as_slice(),
            [UiEffect::LoadBots { task: Some(_) }]
        ));
    }

    #[test]
    fn test_closing_login_cancels_running_task() {
        let mut app = AppState::new(Config::default());
        update(&mut app, ctrl('l'));
        let id = app.tui.task_seq.next_id();
        update(
            &mut app,
            UiEvent::TaskStarted {
                kind: TaskKind::Login,
                started: TaskStarted { id, cancel: None },
            },
        );

        let effects = update(&mut app, press(KeyCode::Esc));
        assert!(matches!(
            effects.as_slice(),
            [UiEffect::CancelTask {
                kind: TaskKind::Login,
                ..
            }]
        ));

        // The late result is stale now.
        update(
            &mut app,
            UiEvent::TaskCompleted {
                kind: TaskKind::Login,
                completed: TaskCompleted {
                    id,
                    result: Box::new(UiEvent::Api(ApiUiEvent::LoggedIn(Ok(user())))),
                },
            },
        );
        assert!(!app.tui.auth.is_logged_in());
    }

    #[test]
    fn test_session_check_failure_falls_back_to_sample() {
        let mut app = AppState::new(Config::default());
        update(
            &mut app,
            UiEvent::Api(ApiUiEvent::SessionChecked(Err(ApiError::new(
                ApiErrorKind::Network,
                "Cannot reach the server",
            )))),
        );

        assert_eq!(app.tui.auth, AuthStatus::LoggedOut);
        assert_eq!(app.tui.directory.source(), DataSource::Sample);
        assert!(app.tui.notice.is_some());
    }

    #[test]
    fn test_theme_toggle_persists() {
        let mut app = AppState::new(Config::default());
        let initial = app.tui.theme;

        let effects = update(&mut app, ctrl('t'));

        assert_eq!(app.tui.theme, initial.toggled());
        assert!(matches!(effects.as_slice(), [UiEffect::PersistTheme(t)] if *t == initial.toggled()));
    }

    #[test]
    fn test_paste_into_composer() {
        let mut app = AppState::new(Config::default());
        app.tui.console.focus = ConsoleFocus::Composer;

        update(
            &mut app,
            UiEvent::Terminal(Event::Paste("hello\nteam".to_string())),
        );
        assert_eq!(app.tui.console.composer, "hello team");
    }

    #[test]
    fn test_key_release_ignored() {
        let mut app = AppState::new(Config::default());
        let mut key = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL);
        key.kind = KeyEventKind::Release;

        let effects = update(&mut app, UiEvent::Terminal(Event::Key(key)));
        assert!(effects.is_empty());
    }
}
