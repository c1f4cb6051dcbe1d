//! 计时采样：活动周期存在时每秒采样一次已用秒数，到点后标记完成

use chrono::{DateTime, TimeDelta, Utc};

use crate::cycles::{Cycle, CycleAction, CycleId, CyclesStore};
use crate::error::CycleError;

/// 采样间隔（秒）
pub const TICK_INTERVAL_SECS: i64 = 1;

/// 一次采样的结果
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClockEvent {
    /// 尚未到点，已用秒数
    Elapsed(i64),
    /// 已到点，已用秒数固定为总时长；周期已被标记完成
    Finished { elapsed: i64 },
}

impl ClockEvent {
    pub fn elapsed(self) -> i64 {
        match self {
            ClockEvent::Elapsed(s) | ClockEvent::Finished { elapsed: s } => s,
        }
    }
}

/// 自 `start` 起经过的整秒数（向零截断）
pub fn elapsed_seconds(start: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - start).num_seconds()
}

/// 单次采样，不修改任何状态；结果不会超过 `total_seconds`
pub fn sample(start: DateTime<Utc>, total_seconds: i64, now: DateTime<Utc>) -> ClockEvent {
    let elapsed = elapsed_seconds(start, now);
    if elapsed >= total_seconds {
        ClockEvent::Finished {
            elapsed: total_seconds,
        }
    } else {
        ClockEvent::Elapsed(elapsed.max(0))
    }
}

/// 绑定到某个周期的采样循环
#[derive(Clone, Debug)]
struct Ticker {
    generation: u64,
    cycle_id: CycleId,
    start_date: DateTime<Utc>,
    total_seconds: i64,
    next_due: DateTime<Utc>,
}

/// 循环启动/取消/结束次数，用于确认没有遗留的计时器
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ClockStats {
    pub started: u64,
    pub cancelled: u64,
    pub finished: u64,
}

impl ClockStats {
    /// 仍在运行的循环数，正常情况下只会是 0 或 1
    pub fn outstanding(&self) -> u64 {
        self.started - self.cancelled - self.finished
    }
}

/// 采样时钟。由宿主事件循环反复调用 [`ElapsedClock::tick`] 推进，
/// 活动周期变化时由 [`ElapsedClock::sync`] 停掉旧循环并为新周期开新循环。
#[derive(Debug, Default)]
pub struct ElapsedClock {
    ticker: Option<Ticker>,
    next_generation: u64,
    stats: ClockStats,
}

impl ElapsedClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.ticker.is_some()
    }

    /// 当前循环所属的周期
    pub fn running_for(&self) -> Option<CycleId> {
        self.ticker.as_ref().map(|t| t.cycle_id)
    }

    /// 当前循环的代号，每开一次新循环递增
    pub fn generation(&self) -> Option<u64> {
        self.ticker.as_ref().map(|t| t.generation)
    }

    pub fn stats(&self) -> ClockStats {
        self.stats
    }

    /// 下一次采样的时间
    pub fn next_due(&self) -> Option<DateTime<Utc>> {
        self.ticker.as_ref().map(|t| t.next_due)
    }

    /// 让循环跟随活动周期：周期相同则不动，不同则先停旧的再开新的
    pub fn sync(&mut self, active: Option<&Cycle>, now: DateTime<Utc>) {
        if self.running_for() == active.map(|c| c.id) {
            return;
        }
        self.cancel();
        if let Some(cycle) = active {
            self.start(cycle, now);
        }
    }

    /// 取消当前循环；返回是否真的有循环被取消
    pub fn cancel(&mut self) -> bool {
        let Some(ticker) = self.ticker.take() else {
            return false;
        };
        self.stats.cancelled += 1;
        tracing::debug!(
            cycle_id = %ticker.cycle_id,
            generation = ticker.generation,
            "clock loop cancelled"
        );
        true
    }

    fn start(&mut self, cycle: &Cycle, now: DateTime<Utc>) {
        let generation = self.next_generation;
        self.next_generation += 1;
        self.stats.started += 1;
        self.ticker = Some(Ticker {
            generation,
            cycle_id: cycle.id,
            start_date: cycle.start_date,
            total_seconds: cycle.total_seconds(),
            next_due: now + TimeDelta::seconds(TICK_INTERVAL_SECS),
        });
        tracing::debug!(
            cycle_id = %cycle.id,
            generation,
            total_seconds = cycle.total_seconds(),
            "clock loop started"
        );
    }

    /// 推进一次。未到采样时间或没有循环时返回 `None`。
    ///
    /// 到点时依次：标记周期完成，返回固定为总时长的已用秒数，停止本循环。
    pub fn tick(&mut self, store: &mut CyclesStore, now: DateTime<Utc>) -> Result<Option<ClockEvent>, CycleError> {
        let Some(ticker) = self.ticker.as_mut() else {
            return Ok(None);
        };
        if store.active_cycle_id() != Some(ticker.cycle_id) {
            // 周期已被其他转换结束
            self.cancel();
            return Ok(None);
        }
        if now < ticker.next_due {
            return Ok(None);
        }
        let step = TimeDelta::seconds(TICK_INTERVAL_SECS);
        while ticker.next_due <= now {
            ticker.next_due += step;
        }

        let event = sample(ticker.start_date, ticker.total_seconds, now);
        if let ClockEvent::Finished { elapsed } = event {
            store.dispatch(CycleAction::MarkCurrentCycleAsFinished, now)?;
            if let Some(done) = self.ticker.take() {
                self.stats.finished += 1;
                tracing::debug!(cycle_id = %done.cycle_id, elapsed, "clock loop finished");
            }
        }
        Ok(Some(event))
    }
}
