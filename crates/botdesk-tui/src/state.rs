//! Application state composition.
//!
//! ```text
//! AppState
//! ├── tui: TuiState
//! │   ├── screen: Screen             (which funnel step is showing)
//! │   ├── panel: TranscriptPanel     (global feed / thread surface)
//! │   ├── directory: Directory       (bots, groups, friends)
//! │   ├── console: ConsoleState      (cursors, focus, composer)
//! │   ├── cart: Cart                 (command shop selection)
//! │   ├── rental: RentalForm         (tier, method, contact fields)
//! │   ├── checkout: Checkout         (payment session + countdown)
//! │   ├── auth: AuthStatus
//! │   ├── task_seq / tasks           (async task lifecycle)
//! │   └── notice: Option<Notice>     (transient status line message)
//! └── overlay: Option<Overlay>       (modal overlays)
//! ```
//!
//! The split lets overlay handlers take `&mut Overlay` and `&TuiState` at once.

use std::time::{Duration, Instant};

use botdesk_core::api::User;
use botdesk_core::cart::Cart;
use botdesk_core::config::{Config, Theme};
use botdesk_core::directory::Directory;
use botdesk_core::payment::{Checkout, PaymentMethod};
use botdesk_core::pricing::{self, RentalTier};
use botdesk_core::transcript::{LogEntry, TargetKind, TranscriptPanel};

use crate::common::{TaskSeq, Tasks};
use crate::overlays::Overlay;

/// How long a notice stays in the status line.
pub const NOTICE_TTL: Duration = Duration::from_secs(4);

pub struct AppState {
    pub tui: TuiState,
    pub overlay: Option<Overlay>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            tui: TuiState::new(config),
            overlay: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Console,
    Shop,
    Rental,
    Payment,
}

impl Screen {
    pub const ALL: [Screen; 4] = [Screen::Console, Screen::Shop, Screen::Rental, Screen::Payment];

    pub fn title(self) -> &'static str {
        match self {
            Screen::Console => "Console",
            Screen::Shop => "Commands",
            Screen::Rental => "Rental",
            Screen::Payment => "Payment",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub text: String,
    pub level: NoticeLevel,
    pub expires_at: Instant,
}

impl Notice {
    fn new(level: NoticeLevel, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            level,
            expires_at: Instant::now() + NOTICE_TTL,
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, text)
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, text)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, text)
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthStatus {
    Unknown,
    LoggedOut,
    LoggedIn(User),
}

impl AuthStatus {
    pub fn is_logged_in(&self) -> bool {
        matches!(self, AuthStatus::LoggedIn(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleFocus {
    Bots,
    Targets,
    Composer,
}

impl ConsoleFocus {
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            ConsoleFocus::Bots => ConsoleFocus::Targets,
            ConsoleFocus::Targets => ConsoleFocus::Composer,
            ConsoleFocus::Composer => ConsoleFocus::Bots,
        }
    }

    #[must_use]
    pub fn prev(self) -> Self {
        match self {
            ConsoleFocus::Bots => ConsoleFocus::Composer,
            ConsoleFocus::Targets => ConsoleFocus::Bots,
            ConsoleFocus::Composer => ConsoleFocus::Targets,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConsoleState {
    pub focus: ConsoleFocus,
    pub bot_cursor: usize,
    pub target_tab: TargetKind,
    pub target_cursor: usize,
    pub composer: String,
}

impl Default for ConsoleState {
    fn default() -> Self {
        Self {
            focus: ConsoleFocus::Targets,
            bot_cursor: 0,
            target_tab: TargetKind::Group,
            target_cursor: 0,
            composer: String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RentalField {
    Tier,
    CustomDays,
    Method,
    Prefix,
    Email,
}

impl RentalField {
    const ORDER: [RentalField; 5] = [
        RentalField::Tier,
        RentalField::CustomDays,
        RentalField::Method,
        RentalField::Prefix,
        RentalField::Email,
    ];

    #[must_use]
    pub fn next(self) -> Self {
        let idx = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(idx + 1) % Self::ORDER.len()]
    }

    #[must_use]
    pub fn prev(self) -> Self {
        let idx = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(idx + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }

    pub fn is_text(self) -> bool {
        matches!(
            self,
            RentalField::CustomDays | RentalField::Prefix | RentalField::Email
        )
    }
}

/// Rental screen inputs. The tier is always a valid, priced selection.
#[derive(Debug, Clone)]
pub struct RentalForm {
    pub tier: RentalTier,
    pub method: PaymentMethod,
    pub custom_days: String,
    pub prefix: String,
    pub email: String,
    pub field: RentalField,
}

impl Default for RentalForm {
    fn default() -> Self {
        Self {
            tier: RentalTier::default(),
            method: PaymentMethod::default(),
            custom_days: String::new(),
            prefix: String::new(),
            email: String::new(),
            field: RentalField::Tier,
        }
    }
}

impl RentalForm {
    /// Index of the selected preset card, if the tier is one of them.
    pub fn preset_index(&self) -> Option<usize> {
        pricing::PRESET_DAYS
            .iter()
            .position(|days| *days == self.tier.days.get())
    }

    pub fn clear_contact(&mut self) {
        self.prefix.clear();
        self.email.clear();
    }
}

/// TUI application state (non-overlay).
pub struct TuiState {
    pub should_quit: bool,
    pub config: Config,
    pub theme: Theme,
    pub screen: Screen,
    pub panel: TranscriptPanel,
    pub directory: Directory,
    pub console: ConsoleState,
    pub cart: Cart,
    pub shop_cursor: usize,
    pub rental: RentalForm,
    pub checkout: Checkout,
    pub auth: AuthStatus,
    pub task_seq: TaskSeq,
    pub tasks: Tasks,
    pub notice: Option<Notice>,
    /// Spinner animation frame counter (for running tasks).
    pub spinner_frame: usize,
}

impl TuiState {
    pub fn new(config: Config) -> Self {
        let mut panel = TranscriptPanel::new();
        panel.append_global(LogEntry::system("Console started"));

        Self {
            should_quit: false,
            theme: config.theme,
            checkout: Checkout::new(config.payment_window_secs()),
            config,
            screen: Screen::Console,
            panel,
            directory: Directory::default(),
            console: ConsoleState::default(),
            cart: Cart::default(),
            shop_cursor: 0,
            rental: RentalForm::default(),
            auth: AuthStatus::Unknown,
            task_seq: TaskSeq::default(),
            tasks: Tasks::default(),
            notice: None,
            spinner_frame: 0,
        }
    }

    pub fn notify(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }

    /// True while a payment session is running or settling; navigation is locked.
    pub fn payment_in_progress(&self) -> bool {
        self.checkout
            .session()
            .is_some_and(|s| !s.state().is_terminal())
    }
}
