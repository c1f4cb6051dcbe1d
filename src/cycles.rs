//! 周期存储：周期列表 + 当前活动周期指针，所有修改只经过三个转换

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CycleError;

/// 周期 id（UUID v7，按创建时间大致递增）
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CycleId(uuid::Uuid);

impl CycleId {
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7())
    }
}

impl Default for CycleId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CycleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

/// 经表单校验后的新周期参数
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewCycle {
    pub task: String,
    pub minutes_amount: u32,
}

/// 一次计时周期
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cycle {
    pub id: CycleId,
    pub task: String,
    pub minutes_amount: u32,
    pub start_date: DateTime<Utc>,
    pub interrupted_date: Option<DateTime<Utc>>,
    pub finished_date: Option<DateTime<Utc>>,
}

impl Cycle {
    pub fn new(input: NewCycle, now: DateTime<Utc>) -> Self {
        Self {
            id: CycleId::new(),
            task: input.task,
            minutes_amount: input.minutes_amount,
            start_date: now,
            interrupted_date: None,
            finished_date: None,
        }
    }

    /// 目标时长（秒）
    pub fn total_seconds(&self) -> i64 {
        i64::from(self.minutes_amount) * 60
    }

    /// 既未中断也未完成
    pub fn is_open(&self) -> bool {
        self.interrupted_date.is_none() && self.finished_date.is_none()
    }
}

/// 转换请求
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CycleAction {
    AddNewCycle(Cycle),
    InterruptCurrentCycle,
    MarkCurrentCycleAsFinished,
}

/// 转换结果：是否真正改变了状态
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    Applied,
    /// 没有活动周期可操作，状态原样返回
    Ignored,
}

/// 全部周期（按创建顺序，只追加不删除）与活动周期 id
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CyclesState {
    pub cycles: Vec<Cycle>,
    pub active_cycle_id: Option<CycleId>,
}

impl CyclesState {
    pub fn active_cycle(&self) -> Option<&Cycle> {
        let id = self.active_cycle_id?;
        self.cycles.iter().find(|c| c.id == id)
    }

    fn active_index(&self) -> Option<usize> {
        let id = self.active_cycle_id?;
        self.cycles.iter().position(|c| c.id == id)
    }

    /// 检查「至多一个未结束周期」以及活动 id 指向该周期
    pub fn check_invariants(&self) -> Result<(), CycleError> {
        let open = self.cycles.iter().filter(|c| c.is_open()).count();
        if open > 1 {
            return Err(CycleError::MultipleOpenCycles { count: open });
        }
        if let Some(id) = self.active_cycle_id {
            match self.cycles.iter().find(|c| c.id == id) {
                None => return Err(CycleError::DanglingActiveCycle { id }),
                Some(c) if !c.is_open() => return Err(CycleError::ActiveCycleClosed { id }),
                Some(_) => {}
            }
        } else if open == 1 {
            return Err(CycleError::UntrackedOpenCycle);
        }
        Ok(())
    }
}

/// 纯转换函数：(state, action) -> state'
pub fn reduce(state: &CyclesState, action: CycleAction, now: DateTime<Utc>) -> (CyclesState, Transition) {
    match action {
        CycleAction::AddNewCycle(cycle) => {
            let mut next = state.clone();
            // 新周期替换旧活动周期前，先把旧的标记为中断
            if let Some(index) = next.active_index() {
                next.cycles[index].interrupted_date = Some(now);
            }
            next.active_cycle_id = Some(cycle.id);
            next.cycles.push(cycle);
            (next, Transition::Applied)
        }
        CycleAction::InterruptCurrentCycle => close_active(state, |c| c.interrupted_date = Some(now)),
        CycleAction::MarkCurrentCycleAsFinished => close_active(state, |c| c.finished_date = Some(now)),
    }
}

fn close_active(state: &CyclesState, mark: impl FnOnce(&mut Cycle)) -> (CyclesState, Transition) {
    let Some(index) = state.active_index() else {
        return (state.clone(), Transition::Ignored);
    };
    let mut next = state.clone();
    next.active_cycle_id = None;
    mark(&mut next.cycles[index]);
    (next, Transition::Applied)
}

/// 持有唯一的 `CyclesState`，只通过 [`CyclesStore::dispatch`] 修改
#[derive(Debug, Default)]
pub struct CyclesStore {
    state: CyclesState,
}

impl CyclesStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_state(state: CyclesState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &CyclesState {
        &self.state
    }

    pub fn cycles(&self) -> &[Cycle] {
        &self.state.cycles
    }

    pub fn active_cycle_id(&self) -> Option<CycleId> {
        self.state.active_cycle_id
    }

    pub fn active_cycle(&self) -> Option<&Cycle> {
        self.state.active_cycle()
    }

    /// 执行一次转换；结果违反不变量时回滚并返回错误
    pub fn dispatch(&mut self, action: CycleAction, now: DateTime<Utc>) -> Result<Transition, CycleError> {
        let kind = action_name(&action);
        let (next, transition) = reduce(&self.state, action, now);
        if transition == Transition::Ignored {
            tracing::debug!(action = kind, "no active cycle, transition ignored");
            return Ok(transition);
        }
        next.check_invariants()?;
        let previous = self.state.active_cycle_id;
        self.state = next;
        tracing::info!(
            action = kind,
            previous = ?previous.map(|id| id.to_string()),
            active = ?self.state.active_cycle_id.map(|id| id.to_string()),
            "cycle transition applied"
        );
        Ok(transition)
    }
}

fn action_name(action: &CycleAction) -> &'static str {
    match action {
        CycleAction::AddNewCycle(_) => "add_new_cycle",
        CycleAction::InterruptCurrentCycle => "interrupt_current_cycle",
        CycleAction::MarkCurrentCycleAsFinished => "mark_current_cycle_as_finished",
    }
}
