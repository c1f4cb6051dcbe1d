use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use cycle_timer::clock::ClockEvent;
use cycle_timer::cycles::{NewCycle, Transition};
use cycle_timer::form::NewCycleForm;
use cycle_timer::session::CycleSession;

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 16, 9, 0, 0).unwrap()
}

fn at(secs: i64) -> DateTime<Utc> {
    t0() + TimeDelta::seconds(secs)
}

/// 按 1 秒节奏从 `from` 推进到 `to`（含），返回最后一次事件
fn run(session: &mut CycleSession, from: i64, to: i64) -> Option<ClockEvent> {
    let mut last = None;
    for s in from..=to {
        if let Some(event) = session.tick(at(s)).unwrap() {
            last = Some(event);
        }
    }
    last
}

#[test]
fn one_minute_cycle_counts_down_and_finishes() {
    let mut session = CycleSession::new();
    let mut form = NewCycleForm::new(25);
    form.task = "Write report".into();
    form.minutes_amount = "1".into();

    let id = form.submit_to(&mut session, t0()).unwrap().unwrap();
    assert_eq!(session.store().active_cycle_id(), Some(id));
    assert_eq!(session.countdown().to_string(), "01:00");

    assert_eq!(run(&mut session, 1, 59), Some(ClockEvent::Elapsed(59)));
    assert_eq!(session.countdown().to_string(), "00:01");
    assert_eq!(session.store().active_cycle_id(), Some(id));

    assert_eq!(
        session.tick(at(60)).unwrap(),
        Some(ClockEvent::Finished { elapsed: 60 })
    );
    assert_eq!(session.countdown().to_string(), "00:00");
    assert_eq!(session.amount_seconds_passed(), 60);
    assert_eq!(session.store().active_cycle_id(), None);
    let cycle = &session.store().cycles()[0];
    assert_eq!(cycle.finished_date, Some(at(60)));
    assert_eq!(cycle.interrupted_date, None);
    assert!(!session.clock().is_running());
    assert_eq!(session.clock().stats().outstanding(), 0);
}

#[test]
fn interrupt_after_ten_seconds_stops_the_clock() {
    let mut session = CycleSession::new();
    session
        .create_new_cycle(
            NewCycle {
                task: "Review".into(),
                minutes_amount: 5,
            },
            t0(),
        )
        .unwrap();
    run(&mut session, 1, 10);
    assert_eq!(session.amount_seconds_passed(), 10);

    let t = session.interrupt_current_cycle(at(10)).unwrap();

    assert_eq!(t, Transition::Applied);
    let cycle = &session.store().cycles()[0];
    assert_eq!(cycle.interrupted_date, Some(at(10)));
    assert_eq!(cycle.finished_date, None);
    assert_eq!(session.store().active_cycle_id(), None);
    assert!(!session.clock().is_running());
    assert_eq!(run(&mut session, 11, 400), None);
    assert_eq!(session.store().cycles()[0].finished_date, None);
    assert_eq!(session.countdown().to_string(), "00:00");

    let before = session.store().state().clone();
    assert_eq!(
        session.interrupt_current_cycle(at(500)).unwrap(),
        Transition::Ignored
    );
    assert_eq!(session.store().state(), &before);
}

#[test]
fn starting_again_replaces_the_timer() {
    let mut session = CycleSession::new();
    let first = NewCycle {
        task: "a".into(),
        minutes_amount: 1,
    };
    session.create_new_cycle(first.clone(), t0()).unwrap();
    run(&mut session, 1, 30);

    let second = session.create_new_cycle(first, at(30)).unwrap();

    let stats = session.clock().stats();
    assert_eq!(stats.started, 2);
    assert_eq!(stats.cancelled, 1);
    assert_eq!(stats.outstanding(), 1);
    assert_eq!(session.clock().running_for(), Some(second));
    assert_eq!(session.store().cycles()[0].interrupted_date, Some(at(30)));

    // 新循环以新周期的开始时间为准
    assert_eq!(session.tick(at(31)).unwrap(), Some(ClockEvent::Elapsed(1)));
    assert_eq!(session.countdown().to_string(), "00:59");
}

#[test]
fn form_rejections_never_reach_the_store() {
    let mut session = CycleSession::new();
    for (task, minutes) in [("", "25"), ("Write report", "0"), ("Write report", "61")] {
        let mut form = NewCycleForm::new(25);
        form.task = task.into();
        form.minutes_amount = minutes.into();
        assert_eq!(form.submit_to(&mut session, t0()).unwrap(), None);
    }
    assert!(session.store().cycles().is_empty());
    assert!(!session.clock().is_running());
}
