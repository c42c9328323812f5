//! Console screen reducer: bot list, target list and composer.

use botdesk_core::api::BotStatus;
use botdesk_core::transcript::{EventKind, LogEntry, PanelError, PendingAck, Selection, TargetKind};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::effects::UiEffect;
use crate::features::KeyOutcome;
use crate::overlays::OverlayRequest;
use crate::state::{ConsoleFocus, Notice, TuiState};

pub fn handle_key(tui: &mut TuiState, key: KeyEvent) -> KeyOutcome {
    match key.code {
        KeyCode::Tab => {
            tui.console.focus = tui.console.focus.next();
            return KeyOutcome::none();
        }
        KeyCode::BackTab => {
            tui.console.focus = tui.console.focus.prev();
            return KeyOutcome::none();
        }
        _ => {}
    }

    match tui.console.focus {
        ConsoleFocus::Bots => handle_bots_key(tui, key),
        ConsoleFocus::Targets => handle_targets_key(tui, key),
        ConsoleFocus::Composer => handle_composer_key(tui, key),
    }
}

/// Keeps cursors inside their lists after the directory changed.
pub fn clamp_cursors(tui: &mut TuiState) {
    let bots = tui.directory.bots().len();
    tui.console.bot_cursor = tui.console.bot_cursor.min(bots.saturating_sub(1));
    let targets = target_count(tui);
    tui.console.target_cursor = tui.console.target_cursor.min(targets.saturating_sub(1));
}

fn target_count(tui: &TuiState) -> usize {
    match tui.console.target_tab {
        TargetKind::Group => tui.directory.groups().len(),
        TargetKind::Friend => tui.directory.friends().len(),
    }
}

fn move_cursor(cursor: &mut usize, len: usize, down: bool) {
    if len == 0 {
        *cursor = 0;
    } else if down {
        *cursor = (*cursor + 1).min(len - 1);
    } else {
        *cursor = cursor.saturating_sub(1);
    }
}

fn cursor_bot(tui: &TuiState) -> Option<(String, String, BotStatus)> {
    tui.directory
        .bots()
        .get(tui.console.bot_cursor)
        .map(|bot| (bot.id.clone(), bot.name.clone(), bot.status))
}

fn require_login(tui: &mut TuiState, action: &str) -> bool {
    if tui.auth.is_logged_in() {
        true
    } else {
        tui.notify(Notice::error(format!("Sign in to {action}")));
        false
    }
}

fn bot_event(message: String) -> LogEntry {
    LogEntry::event(EventKind::System, "BOT", message)
}

fn handle_bots_key(tui: &mut TuiState, key: KeyEvent) -> KeyOutcome {
    let len = tui.directory.bots().len();
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => {
            move_cursor(&mut tui.console.bot_cursor, len, false);
            KeyOutcome::none()
        }
        KeyCode::Down | KeyCode::Char('j') => {
            move_cursor(&mut tui.console.bot_cursor, len, true);
            KeyOutcome::none()
        }
        KeyCode::Enter => {
            let Some((id, name, _)) = cursor_bot(tui) else {
                return KeyOutcome::none();
            };
            tui.directory.set_active_bot(&id);
            tui.notify(Notice::info(format!("Active bot: {name}")));
            if tui.auth.is_logged_in() {
                KeyOutcome::effect(UiEffect::LoadBotData { bot_id: id })
            } else {
                KeyOutcome::none()
            }
        }
        KeyCode::Char('s') => {
            let Some((id, _, status)) = cursor_bot(tui) else {
                return KeyOutcome::none();
            };
            let next = match status {
                BotStatus::Online => BotStatus::Offline,
                BotStatus::Offline => BotStatus::Online,
            };
            if let Some(name) = tui.directory.set_status(&id, next) {
                let verb = match next {
                    BotStatus::Online => "started",
                    BotStatus::Offline => "stopped",
                };
                tui.panel
                    .append_global(bot_event(format!("Bot \"{name}\" {verb}")));
            }
            KeyOutcome::none()
        }
        KeyCode::Char('S') => {
            let changed = tui.directory.set_all(BotStatus::Online);
            tui.panel
                .append_global(bot_event(format!("Started all bots ({changed} changed)")));
            KeyOutcome::none()
        }
        KeyCode::Char('X') => {
            let changed = tui.directory.set_all(BotStatus::Offline);
            tui.panel
                .append_global(bot_event(format!("Stopped all bots ({changed} changed)")));
            KeyOutcome::none()
        }
        KeyCode::Char('R') => {
            if require_login(tui, "load your bots") {
                KeyOutcome::effect(UiEffect::LoadBots { task: None })
            } else {
                KeyOutcome::none()
            }
        }
        KeyCode::Char('n') => {
            if require_login(tui, "create bots") {
                KeyOutcome::overlay(OverlayRequest::CreateBot)
            } else {
                KeyOutcome::none()
            }
        }
        KeyCode::Char('r') => match cursor_bot(tui) {
            Some((bot_id, name, _)) if require_login(tui, "rename bots") => {
                KeyOutcome::overlay(OverlayRequest::RenameBot { bot_id, name })
            }
            _ => KeyOutcome::none(),
        },
        KeyCode::Char('d') => match cursor_bot(tui) {
            Some((bot_id, name, _)) if require_login(tui, "delete bots") => {
                KeyOutcome::overlay(OverlayRequest::DeleteBot { bot_id, name })
            }
            _ => KeyOutcome::none(),
        },
        KeyCode::Char('t') => match cursor_bot(tui) {
            Some((bot_id, name, _)) => KeyOutcome::overlay(OverlayRequest::Token { bot_id, name }),
            None => KeyOutcome::none(),
        },
        _ => KeyOutcome::none(),
    }
}

fn handle_targets_key(tui: &mut TuiState, key: KeyEvent) -> KeyOutcome {
    let len = target_count(tui);
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => {
            move_cursor(&mut tui.console.target_cursor, len, false);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            move_cursor(&mut tui.console.target_cursor, len, true);
        }
        KeyCode::Left | KeyCode::Char('g') => switch_tab(tui, TargetKind::Group),
        KeyCode::Right | KeyCode::Char('f') => switch_tab(tui, TargetKind::Friend),
        KeyCode::Enter => {
            let targets = tui.directory.targets(tui.console.target_tab);
            if let Some(target) = targets.into_iter().nth(tui.console.target_cursor) {
                match tui.panel.select_target(target) {
                    Selection::EnteredThread | Selection::SwitchedThread => {
                        tui.console.focus = ConsoleFocus::Composer;
                    }
                    Selection::ReturnedToGlobal => {}
                }
            }
        }
        KeyCode::Esc => {
            tui.panel.deselect();
        }
        _ => {}
    }
    KeyOutcome::none()
}

fn switch_tab(tui: &mut TuiState, kind: TargetKind) {
    if tui.console.target_tab != kind {
        tui.console.target_tab = kind;
        tui.console.target_cursor = 0;
    }
}

fn handle_composer_key(tui: &mut TuiState, key: KeyEvent) -> KeyOutcome {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Enter => {
            let result = tui.panel.send_to_thread(&tui.console.composer);
            submit(tui, result)
        }
        KeyCode::Char('r') if ctrl => {
            let result = tui.panel.run_command(&tui.console.composer);
            submit(tui, result)
        }
        KeyCode::Char('b') if ctrl => {
            let audience = tui.directory.audience(tui.console.target_tab);
            match tui.panel.broadcast(&tui.console.composer, audience) {
                Ok(()) => tui.console.composer.clear(),
                Err(err) => tui.notify(Notice::error(err.to_string())),
            }
            KeyOutcome::none()
        }
        KeyCode::Esc => {
            if !tui.panel.deselect() {
                tui.console.focus = ConsoleFocus::Targets;
            }
            KeyOutcome::none()
        }
        KeyCode::Backspace => {
            tui.console.composer.pop();
            KeyOutcome::none()
        }
        KeyCode::Char(c) if !ctrl => {
            tui.console.composer.push(c);
            KeyOutcome::none()
        }
        _ => KeyOutcome::none(),
    }
}

fn submit(tui: &mut TuiState, result: Result<PendingAck, PanelError>) -> KeyOutcome {
    match result {
        Ok(pending) => {
            tui.console.composer.clear();
            KeyOutcome::effect(UiEffect::RequestAck(pending))
        }
        Err(err) => {
            tui.notify(Notice::error(err.to_string()));
            KeyOutcome::none()
        }
    }
}
