//! Bots, groups and friends known to the console.
//!
//! Starts from a built-in sample dataset and is only ever replaced by a
//! successful server response, so a failed refresh leaves the last good data.

use crate::api::{ApiError, Bot, BotData, BotStatus, CreatedBot, Friend, Group, Presence};
use crate::transcript::{Audience, ConversationTarget, TargetKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    Sample,
    Server,
}

#[derive(Debug, Clone)]
pub struct Directory {
    bots: Vec<Bot>,
    groups: Vec<Group>,
    friends: Vec<Friend>,
    active_bot: Option<String>,
    source: DataSource,
}

impl Default for Directory {
    fn default() -> Self {
        Self::sample()
    }
}

fn bot(id: &str, name: &str, status: BotStatus) -> Bot {
    Bot {
        id: id.to_string(),
        name: name.to_string(),
        status,
        token: None,
        created_at: None,
    }
}

fn group(id: &str, name: &str, members: u32, online: u32) -> Group {
    Group {
        id: id.to_string(),
        name: name.to_string(),
        members,
        online,
    }
}

fn friend(id: &str, name: &str, status: Presence) -> Friend {
    Friend {
        id: id.to_string(),
        name: name.to_string(),
        status,
    }
}

fn sample_bots() -> Vec<Bot> {
    vec![
        bot("bot_sample_1", "Bot Main", BotStatus::Online),
        bot("bot_sample_2", "Bot Backup", BotStatus::Online),
        bot("bot_sample_3", "Bot Test", BotStatus::Offline),
    ]
}

fn sample_groups() -> Vec<Group> {
    vec![
        group("group_sample_1", "Study Group", 45, 12),
        group("group_sample_2", "Work Group", 23, 8),
        group("group_sample_3", "Family", 8, 5),
        group("group_sample_4", "Gaming", 67, 23),
        group("group_sample_5", "Project X", 15, 7),
    ]
}

fn sample_friends() -> Vec<Friend> {
    vec![
        friend("friend_sample_1", "Nguyen Van A", Presence::Online),
        friend("friend_sample_2", "Tran Thi B", Presence::Offline),
        friend("friend_sample_3", "Le Van C", Presence::Online),
        friend("friend_sample_4", "Pham Thi D", Presence::Away),
        friend("friend_sample_5", "Hoang Van E", Presence::Online),
    ]
}

impl Directory {
    pub fn sample() -> Self {
        let bots = sample_bots();
        let active_bot = bots.first().map(|b| b.id.clone());
        Self {
            bots,
            groups: sample_groups(),
            friends: sample_friends(),
            active_bot,
            source: DataSource::Sample,
        }
    }

    /// Drops server data and goes back to the sample dataset (logged out).
    pub fn reset_to_sample(&mut self) {
        *self = Self::sample();
    }

    pub fn source(&self) -> DataSource {
        self.source
    }

    pub fn bots(&self) -> &[Bot] {
        &self.bots
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn friends(&self) -> &[Friend] {
        &self.friends
    }

    pub fn bot(&self, id: &str) -> Option<&Bot> {
        self.bots.iter().find(|b| b.id == id)
    }

    pub fn active_bot_id(&self) -> Option<&str> {
        self.active_bot.as_deref()
    }

    pub fn active_bot(&self) -> Option<&Bot> {
        self.active_bot.as_deref().and_then(|id| self.bot(id))
    }

    pub fn set_active_bot(&mut self, id: &str) -> bool {
        if self.bot(id).is_some() {
            self.active_bot = Some(id.to_string());
            true
        } else {
            false
        }
    }

    pub fn online_bots(&self) -> usize {
        self.bots
            .iter()
            .filter(|b| b.status == BotStatus::Online)
            .count()
    }

    /// Applies a bot list fetch. Returns whether the list was replaced.
    ///
    /// # Errors
    /// Passes the fetch error through; nothing is modified in that case.
    pub fn apply_bots(&mut self, result: Result<Vec<Bot>, ApiError>) -> Result<bool, ApiError> {
        let bots = result.inspect_err(|err| {
            tracing::warn!(error = %err, "bot refresh failed, keeping previous list");
        })?;
        if bots.is_empty() {
            return Ok(false);
        }
        self.active_bot = bots.first().map(|b| b.id.clone());
        self.bots = bots;
        self.source = DataSource::Server;
        Ok(true)
    }

    /// Applies groups/friends fetched for `bot_id`. Data for a bot that is no
    /// longer active is ignored, as is a missing half of the payload.
    ///
    /// # Errors
    /// Passes the fetch error through; nothing is modified in that case.
    pub fn apply_bot_data(
        &mut self,
        bot_id: &str,
        result: Result<Option<BotData>, ApiError>,
    ) -> Result<bool, ApiError> {
        let data = result.inspect_err(|err| {
            tracing::warn!(bot = bot_id, error = %err, "bot data refresh failed");
        })?;
        if self.active_bot_id() != Some(bot_id) {
            return Ok(false);
        }
        let Some(data) = data else {
            return Ok(false);
        };
        let mut changed = false;
        if let Some(groups) = data.groups {
            self.groups = groups;
            changed = true;
        }
        if let Some(friends) = data.friends {
            self.friends = friends;
            changed = true;
        }
        Ok(changed)
    }

    pub fn add_bot(&mut self, name: &str, created: CreatedBot) {
        self.bots.push(Bot {
            id: created.bot_id,
            name: name.to_string(),
            status: BotStatus::Offline,
            token: Some(created.token),
            created_at: None,
        });
        if self.active_bot.is_none() {
            self.active_bot = self.bots.last().map(|b| b.id.clone());
        }
    }

    pub fn rename_bot(&mut self, id: &str, name: &str) -> bool {
        match self.bots.iter_mut().find(|b| b.id == id) {
            Some(bot) => {
                bot.name = name.to_string();
                true
            }
            None => false,
        }
    }

    pub fn remove_bot(&mut self, id: &str) -> Option<Bot> {
        let index = self.bots.iter().position(|b| b.id == id)?;
        let removed = self.bots.remove(index);
        if self.active_bot.as_deref() == Some(id) {
            self.active_bot = self.bots.first().map(|b| b.id.clone());
        }
        Some(removed)
    }

    /// Sets one bot's status; returns its name.
    pub fn set_status(&mut self, id: &str, status: BotStatus) -> Option<String> {
        let bot = self.bots.iter_mut().find(|b| b.id == id)?;
        bot.status = status;
        Some(bot.name.clone())
    }

    /// Sets every bot's status; returns how many bots changed.
    pub fn set_all(&mut self, status: BotStatus) -> usize {
        let mut changed = 0;
        for bot in self.bots.iter_mut().filter(|b| b.status != status) {
            bot.status = status;
            changed += 1;
        }
        changed
    }

    pub fn targets(&self, kind: TargetKind) -> Vec<ConversationTarget> {
        match kind {
            TargetKind::Group => self.groups.iter().map(Group::target).collect(),
            TargetKind::Friend => self.friends.iter().map(Friend::target).collect(),
        }
    }

    pub fn audience(&self, kind: TargetKind) -> Audience {
        let count = match kind {
            TargetKind::Group => self.groups.len(),
            TargetKind::Friend => self.friends.len(),
        };
        Audience { kind, count }
    }
}
