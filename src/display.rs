//! 倒计时显示：由总时长与已用秒数推出 MM:SS

use std::fmt;

/// 两位补零的分、秒
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Countdown {
    pub minutes: String,
    pub seconds: String,
}

impl Countdown {
    /// 无活动周期时显示 00:00
    pub fn idle() -> Self {
        Self::from_remaining(0)
    }

    pub fn from_remaining(remaining_secs: i64) -> Self {
        let remaining = remaining_secs.max(0);
        Self {
            minutes: format!("{:02}", remaining / 60),
            seconds: format!("{:02}", remaining % 60),
        }
    }

    /// 四个数字，依次为分十位、分个位、秒十位、秒个位
    pub fn digits(&self) -> [char; 4] {
        let mut m = self.minutes.chars();
        let mut s = self.seconds.chars();
        [
            m.next().unwrap_or('0'),
            m.next().unwrap_or('0'),
            s.next().unwrap_or('0'),
            s.next().unwrap_or('0'),
        ]
    }
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.minutes, self.seconds)
    }
}

pub fn remaining_seconds(total_secs: i64, elapsed_secs: i64) -> i64 {
    total_secs - elapsed_secs
}

pub fn countdown(total_secs: i64, elapsed_secs: i64) -> Countdown {
    Countdown::from_remaining(remaining_seconds(total_secs, elapsed_secs))
}

/// 窗口标题：计时中与倒计时一致，否则为空闲文案
pub fn window_title(countdown: Option<&Countdown>, idle_title: &str) -> String {
    match countdown {
        Some(c) => c.to_string(),
        None => idle_title.to_owned(),
    }
}

/// 进度 0.0..=1.0
pub fn progress(total_secs: i64, elapsed_secs: i64) -> f32 {
    if total_secs <= 0 {
        return 0.0;
    }
    let elapsed = elapsed_secs.clamp(0, total_secs);
    elapsed as f32 / total_secs as f32
}
