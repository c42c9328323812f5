//! Transcript panel state machine.
//!
//! One surface shows either the global event feed or a single conversation
//! thread, never both.
//!
//! ```text
//!            select(t)                 select(t) again
//!   Global ───────────► Thread(t) ─────────────────────► Global
//!     ▲   snapshot feed     │  select(o), o != t             restore feed
//!     │                     ▼
//!     └──────────────── Thread(o)   (no re-snapshot, reseed)
//! ```
//!
//! The global feed is newest-first; a thread is oldest-first. Global entries
//! that arrive while a thread is showing are buffered into the saved feed so
//! that returning to `Global` loses and duplicates nothing.

use std::collections::VecDeque;
use std::fmt;

use chrono::{DateTime, Local};

/// What produced a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Event,
    IncomingMessage,
    OutgoingMessage,
}

/// Flavor of a global event; selects the icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventKind {
    Join,
    Leave,
    #[default]
    System,
}

impl EventKind {
    pub fn icon(self) -> &'static str {
        match self {
            EventKind::Join => "🎉",
            EventKind::Leave => "👋",
            EventKind::System => "⚙️",
        }
    }
}

/// One immutable line of the transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    kind: EntryKind,
    event: EventKind,
    timestamp: DateTime<Local>,
    sender: String,
    content: String,
}

impl LogEntry {
    pub fn event(event: EventKind, sender: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(EntryKind::Event, event, sender.into(), message.into())
    }

    pub fn system(message: impl Into<String>) -> Self {
        Self::event(EventKind::System, "SYSTEM", message)
    }

    pub fn incoming(sender: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(
            EntryKind::IncomingMessage,
            EventKind::default(),
            sender.into(),
            text.into(),
        )
    }

    pub fn outgoing(sender: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(
            EntryKind::OutgoingMessage,
            EventKind::default(),
            sender.into(),
            text.into(),
        )
    }

    fn new(kind: EntryKind, event: EventKind, sender: String, content: String) -> Self {
        Self {
            kind,
            event,
            timestamp: Local::now(),
            sender,
            content,
        }
    }

    #[must_use]
    pub fn at(mut self, timestamp: DateTime<Local>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    pub fn event_kind(&self) -> EventKind {
        self.event
    }

    pub fn timestamp(&self) -> DateTime<Local> {
        self.timestamp
    }

    pub fn sender(&self) -> &str {
        &self.sender
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Single-line rendering used by the feed and by plain-text output.
    pub fn rendered(&self) -> String {
        match self.kind {
            EntryKind::Event => format!("{} {}", self.event.icon(), self.content),
            EntryKind::IncomingMessage => format!("{}: {}", self.sender, self.content),
            EntryKind::OutgoingMessage => format!("→ {}", self.content),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKind {
    Group,
    Friend,
}

impl TargetKind {
    pub fn plural_label(self) -> &'static str {
        match self {
            TargetKind::Group => "groups",
            TargetKind::Friend => "friends",
        }
    }
}

/// Addressee of a conversation thread.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConversationTarget {
    pub id: String,
    pub kind: TargetKind,
    pub display_name: String,
}

impl ConversationTarget {
    pub fn new(id: impl Into<String>, kind: TargetKind, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            display_name: display_name.into(),
        }
    }

    fn same_as(&self, other: &ConversationTarget) -> bool {
        self.id == other.id && self.kind == other.kind
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelMode {
    Global,
    Thread,
}

/// Transition taken by `select_target`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    EnteredThread,
    SwitchedThread,
    ReturnedToGlobal,
}

/// Rejected panel operation. Nothing in the panel changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelError {
    EmptyMessage,
    NoActiveTarget,
    BroadcastInThread,
}

impl fmt::Display for PanelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PanelError::EmptyMessage => write!(f, "Please enter a message"),
            PanelError::NoActiveTarget => write!(f, "Please select a thread first"),
            PanelError::BroadcastInThread => write!(
                f,
                "Cannot send to all while a thread is open; deselect the thread first"
            ),
        }
    }
}

impl std::error::Error for PanelError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AckKind {
    Message,
    Command,
}

/// What the remote side is being asked to acknowledge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AckRequest {
    pub kind: AckKind,
    pub text: String,
    /// `None` when the request was issued from the global feed.
    pub target: Option<ConversationTarget>,
}

/// Where an acknowledgment lands once it arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AckRoute {
    Global,
    /// Only the thread visit identified by `epoch` accepts the reply.
    Thread { epoch: u64 },
}

/// An acknowledgment the panel is waiting for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAck {
    pub route: AckRoute,
    pub request: AckRequest,
}

/// Builds the opening exchange shown when a thread is entered.
pub type ThreadSeed = fn(&ConversationTarget) -> Vec<LogEntry>;

/// Canned greeting exchange: two incoming lines and the bot's reply.
pub fn greeting_exchange(_target: &ConversationTarget) -> Vec<LogEntry> {
    vec![
        LogEntry::incoming("Nguyen Van A", "Hello everyone!"),
        LogEntry::incoming("Tran Thi B", "Hello"),
        LogEntry::outgoing("Bot", "Hi! How can I help you?"),
    ]
}

/// Who a broadcast goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Audience {
    pub kind: TargetKind,
    pub count: usize,
}

#[derive(Debug)]
pub struct TranscriptPanel {
    mode: PanelMode,
    active_target: Option<ConversationTarget>,
    /// Entries on the surface, in render order for the current mode.
    visible: VecDeque<LogEntry>,
    /// Global feed held while a thread is showing, newest-first.
    saved_global: VecDeque<LogEntry>,
    /// Incremented on every thread entry; stale acknowledgments carry an old value.
    epoch: u64,
    global_count: usize,
    seed: ThreadSeed,
}

impl Default for TranscriptPanel {
    fn default() -> Self {
        Self::with_seed(greeting_exchange)
    }
}

impl TranscriptPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seed(seed: ThreadSeed) -> Self {
        Self {
            mode: PanelMode::Global,
            active_target: None,
            visible: VecDeque::new(),
            saved_global: VecDeque::new(),
            epoch: 0,
            global_count: 0,
            seed,
        }
    }

    pub fn mode(&self) -> PanelMode {
        self.mode
    }

    pub fn is_thread(&self) -> bool {
        self.mode == PanelMode::Thread
    }

    pub fn active_target(&self) -> Option<&ConversationTarget> {
        self.active_target.as_ref()
    }

    /// Entries on the surface in render order (newest-first for the feed,
    /// oldest-first for a thread).
    pub fn visible(&self) -> impl ExactSizeIterator<Item = &LogEntry> + '_ {
        self.visible.iter()
    }

    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    /// Number of global entries accepted so far, shown or buffered.
    pub fn global_count(&self) -> usize {
        self.global_count
    }

    /// Entries of the global feed, newest-first, whichever mode is showing.
    pub fn global_entries(&self) -> impl Iterator<Item = &LogEntry> + '_ {
        match self.mode {
            PanelMode::Global => self.visible.iter(),
            PanelMode::Thread => self.saved_global.iter(),
        }
    }

    /// Toggles or switches the conversation thread.
    pub fn select_target(&mut self, target: ConversationTarget) -> Selection {
        match (&self.mode, &self.active_target) {
            (PanelMode::Thread, Some(active)) if active.same_as(&target) => {
                self.return_to_global();
                Selection::ReturnedToGlobal
            }
            (PanelMode::Thread, _) => {
                tracing::debug!(target = %target.id, "switching thread");
                self.enter_thread(target);
                Selection::SwitchedThread
            }
            (PanelMode::Global, _) => {
                self.saved_global = std::mem::take(&mut self.visible);
                tracing::debug!(
                    target = %target.id,
                    saved = self.saved_global.len(),
                    "entering thread"
                );
                self.enter_thread(target);
                Selection::EnteredThread
            }
        }
    }

    /// Leaves the current thread, if any. Same as reselecting the active target.
    pub fn deselect(&mut self) -> bool {
        if self.is_thread() {
            self.return_to_global();
            true
        } else {
            false
        }
    }

    fn enter_thread(&mut self, target: ConversationTarget) {
        self.visible.clear();
        self.epoch = self.epoch.wrapping_add(1);
        self.visible.extend((self.seed)(&target));
        self.active_target = Some(target);
        self.mode = PanelMode::Thread;
    }

    fn return_to_global(&mut self) {
        self.visible = std::mem::take(&mut self.saved_global);
        self.active_target = None;
        self.mode = PanelMode::Global;
        tracing::debug!(restored = self.visible.len(), "returned to global feed");
    }

    /// Adds an entry to the global feed, buffering it while a thread is showing.
    pub fn append_global(&mut self, entry: LogEntry) {
        self.global_count += 1;
        match self.mode {
            PanelMode::Global => self.visible.push_front(entry),
            PanelMode::Thread => self.saved_global.push_front(entry),
        }
    }

    /// Appends an outgoing message to the open thread.
    ///
    /// # Errors
    /// Fails without changing anything when the text is blank or no thread is open.
    pub fn send_to_thread(&mut self, text: &str) -> Result<PendingAck, PanelError> {
        let text = non_empty(text)?;
        let target = self.thread_target()?;
        self.visible.push_back(LogEntry::outgoing("Bot", text));
        Ok(PendingAck {
            route: AckRoute::Thread { epoch: self.epoch },
            request: AckRequest {
                kind: AckKind::Message,
                text: text.to_string(),
                target: Some(target),
            },
        })
    }

    /// Runs a bot command in the open thread, or from the global feed.
    ///
    /// # Errors
    /// Fails without changing anything when the command is blank.
    pub fn run_command(&mut self, text: &str) -> Result<PendingAck, PanelError> {
        let text = non_empty(text)?;
        let route = match self.mode {
            PanelMode::Thread => {
                self.visible.push_back(LogEntry::outgoing("Bot", format!("⚡ {text}")));
                AckRoute::Thread { epoch: self.epoch }
            }
            PanelMode::Global => {
                self.append_global(LogEntry::system(format!("Running command: {text}")));
                AckRoute::Global
            }
        };
        Ok(PendingAck {
            route,
            request: AckRequest {
                kind: AckKind::Command,
                text: text.to_string(),
                target: self.active_target.clone(),
            },
        })
    }

    /// Logs a message sent to every target of one kind.
    ///
    /// # Errors
    /// Fails when the text is blank or a thread is open.
    pub fn broadcast(&mut self, text: &str, audience: Audience) -> Result<(), PanelError> {
        let text = non_empty(text)?;
        if self.is_thread() {
            return Err(PanelError::BroadcastInThread);
        }
        self.append_global(LogEntry::event(
            EventKind::System,
            "BOT",
            format!(
                "Sent a message to all {} {}: {text}",
                audience.count,
                audience.kind.plural_label()
            ),
        ));
        Ok(())
    }

    /// Attaches an arrived acknowledgment. Returns false if it was discarded
    /// because the thread it belonged to is no longer showing.
    pub fn deliver_ack(&mut self, route: AckRoute, reply: LogEntry) -> bool {
        match route {
            AckRoute::Global => {
                self.append_global(reply);
                true
            }
            AckRoute::Thread { epoch } if self.is_thread() && epoch == self.epoch => {
                self.visible.push_back(reply);
                true
            }
            AckRoute::Thread { epoch } => {
                tracing::debug!(epoch, current = self.epoch, "discarding stale thread ack");
                false
            }
        }
    }

    fn thread_target(&self) -> Result<ConversationTarget, PanelError> {
        match (&self.mode, &self.active_target) {
            (PanelMode::Thread, Some(target)) => Ok(target.clone()),
            _ => Err(PanelError::NoActiveTarget),
        }
    }
}

fn non_empty(text: &str) -> Result<&str, PanelError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        Err(PanelError::EmptyMessage)
    } else {
        Ok(trimmed)
    }
}
