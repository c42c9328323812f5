use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(pub u64);

#[derive(Debug, Default)]
pub struct TaskSeq {
    next: u64,
}

impl TaskSeq {
    pub fn next_id(&mut self) -> TaskId {
        let id = TaskId(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    Login,
    BotsLoad,
    BotCreate,
    BotRename,
    BotDelete,
    Settlement,
}

#[derive(Debug, Clone)]
pub struct TaskStarted {
    pub id: TaskId,
    pub cancel: Option<CancellationToken>,
}

#[derive(Debug)]
pub struct TaskCompleted<E> {
    pub id: TaskId,
    pub result: E,
}

/// Task lifecycle state (stored in AppState, mutated only by reducer).
#[derive(Debug, Default, Clone)]
pub struct TaskState {
    pub active: Option<TaskId>,
    pub cancel: Option<CancellationToken>,
}

impl TaskState {
    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    pub fn on_started(&mut self, started: &TaskStarted) {
        self.active = Some(started.id);
        self.cancel = started.cancel.clone();
    }

    pub fn finish_if_active(&mut self, id: TaskId) -> bool {
        let ok = self.active == Some(id);
        if ok {
            self.active = None;
            self.cancel = None;
        }
        ok
    }

    pub fn clear(&mut self) {
        self.active = None;
        self.cancel = None;
    }
}

#[derive(Debug, Default, Clone)]
pub struct Tasks {
    pub login: TaskState,
    pub bots_load: TaskState,
    pub bot_create: TaskState,
    pub bot_rename: TaskState,
    pub bot_delete: TaskState,
    pub settlement: TaskState,
}

impl Tasks {
    pub fn state(&self, kind: TaskKind) -> &TaskState {
        match kind {
            TaskKind::Login => &self.login,
            TaskKind::BotsLoad => &self.bots_load,
            TaskKind::BotCreate => &self.bot_create,
            TaskKind::BotRename => &self.bot_rename,
            TaskKind::BotDelete => &self.bot_delete,
            TaskKind::Settlement => &self.settlement,
        }
    }

    pub fn state_mut(&mut self, kind: TaskKind) -> &mut TaskState {
        match kind {
            TaskKind::Login => &mut self.login,
            TaskKind::BotsLoad => &mut self.bots_load,
            TaskKind::BotCreate => &mut self.bot_create,
            TaskKind::BotRename => &mut self.bot_rename,
            TaskKind::BotDelete => &mut self.bot_delete,
            TaskKind::Settlement => &mut self.settlement,
        }
    }

    pub fn is_any_running(&self) -> bool {
        self.login.is_running()
            || self.bots_load.is_running()
            || self.bot_create.is_running()
            || self.bot_rename.is_running()
            || self.bot_delete.is_running()
            || self.settlement.is_running()
    }
}
