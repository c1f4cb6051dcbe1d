//! 计时会话：唯一的周期存储 + 采样时钟 + 已用秒数。
//!
//! 表单和界面只通过这里请求转换；每次转换后时钟都会按新的活动周期重新对齐。

use chrono::{DateTime, Utc};

use crate::clock::{ClockEvent, ElapsedClock};
use crate::cycles::{Cycle, CycleAction, CycleId, CyclesStore, NewCycle, Transition};
use crate::display::{self, Countdown};
use crate::error::CycleError;

#[derive(Debug, Default)]
pub struct CycleSession {
    store: CyclesStore,
    clock: ElapsedClock,
    amount_seconds_passed: i64,
}

impl CycleSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self) -> &CyclesStore {
        &self.store
    }

    pub fn clock(&self) -> &ElapsedClock {
        &self.clock
    }

    pub fn active_cycle(&self) -> Option<&Cycle> {
        self.store.active_cycle()
    }

    pub fn amount_seconds_passed(&self) -> i64 {
        self.amount_seconds_passed
    }

    pub fn create_new_cycle(&mut self, input: NewCycle, now: DateTime<Utc>) -> Result<CycleId, CycleError> {
        let cycle = Cycle::new(input, now);
        let id = cycle.id;
        self.store.dispatch(CycleAction::AddNewCycle(cycle), now)?;
        self.amount_seconds_passed = 0;
        self.clock.sync(self.store.active_cycle(), now);
        Ok(id)
    }

    pub fn interrupt_current_cycle(&mut self, now: DateTime<Utc>) -> Result<Transition, CycleError> {
        let transition = self.store.dispatch(CycleAction::InterruptCurrentCycle, now)?;
        self.clock.sync(self.store.active_cycle(), now);
        Ok(transition)
    }

    pub fn mark_current_cycle_as_finished(&mut self, now: DateTime<Utc>) -> Result<Transition, CycleError> {
        let transition = self.store.dispatch(CycleAction::MarkCurrentCycleAsFinished, now)?;
        self.clock.sync(self.store.active_cycle(), now);
        Ok(transition)
    }

    /// 由宿主循环反复调用；完成转换在更新已用秒数之前发生
    pub fn tick(&mut self, now: DateTime<Utc>) -> Result<Option<ClockEvent>, CycleError> {
        let event = self.clock.tick(&mut self.store, now)?;
        if let Some(event) = event {
            self.amount_seconds_passed = event.elapsed();
        }
        Ok(event)
    }

    pub fn countdown(&self) -> Countdown {
        match self.active_cycle() {
            Some(cycle) => display::countdown(cycle.total_seconds(), self.amount_seconds_passed),
            None => Countdown::idle(),
        }
    }

    pub fn window_title(&self, idle_title: &str) -> String {
        let countdown = self.active_cycle().map(|_| self.countdown());
        display::window_title(countdown.as_ref(), idle_title)
    }

    pub fn progress(&self) -> f32 {
        match self.active_cycle() {
            Some(cycle) => display::progress(cycle.total_seconds(), self.amount_seconds_passed),
            None => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 4, 8, 30, 0).unwrap()
    }

    fn input(minutes: u32) -> NewCycle {
        NewCycle {
            task: "read".into(),
            minutes_amount: minutes,
        }
    }

    #[test]
    fn new_cycle_resets_seconds_passed() {
        let mut session = CycleSession::new();
        session.create_new_cycle(input(5), t0()).unwrap();
        session.tick(t0() + TimeDelta::seconds(30)).unwrap();
        assert_eq!(session.amount_seconds_passed(), 30);

        let later = t0() + TimeDelta::seconds(31);
        session.create_new_cycle(input(5), later).unwrap();

        assert_eq!(session.amount_seconds_passed(), 0);
        assert_eq!(session.countdown().to_string(), "05:00");
        assert_eq!(session.clock().stats().outstanding(), 1);
        assert_eq!(session.clock().stats().cancelled, 1);
    }

    #[test]
    fn idle_session_shows_zeroes_and_idle_title() {
        let session = CycleSession::new();
        assert_eq!(session.countdown().to_string(), "00:00");
        assert_eq!(session.window_title("timer"), "timer");
        assert_eq!(session.progress(), 0.0);
    }

    #[test]
    fn title_mirrors_countdown_while_running() {
        let mut session = CycleSession::new();
        session.create_new_cycle(input(25), t0()).unwrap();
        session.tick(t0() + TimeDelta::seconds(61)).unwrap();
        assert_eq!(session.window_title("timer"), "23:59");
    }

    #[test]
    fn manual_finish_stops_the_clock() {
        let mut session = CycleSession::new();
        session.create_new_cycle(input(25), t0()).unwrap();

        let t = session.mark_current_cycle_as_finished(t0()).unwrap();

        assert_eq!(t, Transition::Applied);
        assert!(!session.clock().is_running());
        assert_eq!(session.clock().stats().outstanding(), 0);
    }
}
