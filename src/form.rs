//! 新周期表单：任务名 + 时长，校验通过后清空并交给会话创建周期

use chrono::{DateTime, Utc};

use crate::cycles::{CycleId, NewCycle};
use crate::error::{CycleError, FormError};
use crate::session::CycleSession;

pub const MIN_MINUTES: u32 = 1;
pub const MAX_MINUTES: u32 = 60;
/// 输入框步进（只作建议，校验只看范围）
pub const MINUTES_STEP: u32 = 5;

/// 各字段的校验错误
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub task: Option<FormError>,
    pub minutes_amount: Option<FormError>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.task.is_none() && self.minutes_amount.is_none()
    }
}

#[derive(Clone, Debug)]
pub struct NewCycleForm {
    pub task: String,
    /// 原样保留用户输入，提交时再解析
    pub minutes_amount: String,
    default_minutes: u32,
    errors: FieldErrors,
}

impl Default for NewCycleForm {
    fn default() -> Self {
        Self::new(0)
    }
}

impl NewCycleForm {
    pub fn new(default_minutes: u32) -> Self {
        Self {
            task: String::new(),
            minutes_amount: default_minutes.to_string(),
            default_minutes,
            errors: FieldErrors::default(),
        }
    }

    /// 任务为空时禁止提交，与时长是否合法无关
    pub fn is_submit_disabled(&self) -> bool {
        self.task.is_empty()
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn validate(&self) -> Result<NewCycle, FieldErrors> {
        let task = self.task.trim();
        let mut errors = FieldErrors::default();
        if task.is_empty() {
            errors.task = Some(FormError::TaskRequired);
        }
        let minutes = match parse_minutes(&self.minutes_amount) {
            Ok(m) => Some(m),
            Err(e) => {
                errors.minutes_amount = Some(e);
                None
            }
        };
        match minutes {
            Some(minutes_amount) if errors.is_empty() => Ok(NewCycle {
                task: task.to_owned(),
                minutes_amount,
            }),
            _ => Err(errors),
        }
    }

    /// 校验并取走输入；成功时清空表单，失败时记录字段错误
    pub fn submit(&mut self) -> Option<NewCycle> {
        let input = self.checked()?;
        self.reset();
        Some(input)
    }

    /// 提交并在会话中创建周期。表单不合法时返回 `Ok(None)`。
    pub fn submit_to(&mut self, session: &mut CycleSession, now: DateTime<Utc>) -> Result<Option<CycleId>, CycleError> {
        let Some(input) = self.checked() else {
            return Ok(None);
        };
        let id = session.create_new_cycle(input, now)?;
        self.reset();
        Ok(Some(id))
    }

    fn checked(&mut self) -> Option<NewCycle> {
        if self.is_submit_disabled() {
            return None;
        }
        match self.validate() {
            Ok(input) => Some(input),
            Err(errors) => {
                tracing::debug!(?errors, "new cycle form rejected");
                self.errors = errors;
                None
            }
        }
    }

    pub fn reset(&mut self) {
        self.task.clear();
        self.minutes_amount = self.default_minutes.to_string();
        self.errors = FieldErrors::default();
    }

    /// 按步进增减时长，结果夹在允许范围内
    pub fn step_minutes(&mut self, up: bool) {
        let current = self
            .minutes_amount
            .trim()
            .parse::<u32>()
            .unwrap_or(self.default_minutes);
        let next = if up {
            current.saturating_add(MINUTES_STEP)
        } else {
            current.saturating_sub(MINUTES_STEP)
        };
        self.minutes_amount = next.clamp(MIN_MINUTES, MAX_MINUTES).to_string();
        self.errors.minutes_amount = None;
    }

    pub fn choose_suggestion(&mut self, task: &str) {
        self.task = task.to_owned();
        self.errors.task = None;
    }
}

pub fn parse_minutes(raw: &str) -> Result<u32, FormError> {
    let value: i64 = raw.trim().parse().map_err(|_| FormError::DurationNotANumber)?;
    if !(i64::from(MIN_MINUTES)..=i64::from(MAX_MINUTES)).contains(&value) {
        return Err(FormError::DurationOutOfRange);
    }
    Ok(value as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(task: &str, minutes: &str) -> NewCycleForm {
        let mut f = NewCycleForm::new(25);
        f.task = task.to_owned();
        f.minutes_amount = minutes.to_owned();
        f
    }

    #[test]
    fn empty_task_blocks_submit_regardless_of_duration() {
        let mut f = form("", "25");
        assert!(f.is_submit_disabled());
        assert_eq!(f.submit(), None);
        assert!(f.errors().is_empty());
    }

    #[test]
    fn whitespace_task_is_rejected_on_validate() {
        let f = form("   ", "25");
        assert!(!f.is_submit_disabled());
        let errors = f.validate().unwrap_err();
        assert_eq!(errors.task, Some(FormError::TaskRequired));
        assert_eq!(errors.minutes_amount, None);
    }

    #[test]
    fn rejects_durations_outside_range() {
        for bad in ["0", "61", "-5"] {
            let errors = form("Write report", bad).validate().unwrap_err();
            assert_eq!(errors.minutes_amount, Some(FormError::DurationOutOfRange), "{bad}");
        }
    }

    #[test]
    fn rejects_non_numeric_duration() {
        let errors = form("Write report", "abc").validate().unwrap_err();
        assert_eq!(errors.minutes_amount, Some(FormError::DurationNotANumber));
    }

    #[test]
    fn accepts_bounds_and_off_step_values() {
        for ok in ["1", "7", "60"] {
            assert!(form("Write report", ok).validate().is_ok(), "{ok}");
        }
    }

    #[test]
    fn valid_submit_trims_task_and_resets() {
        let mut f = form("  Write report ", " 1 ");
        let input = f.submit().unwrap();
        assert_eq!(input.task, "Write report");
        assert_eq!(input.minutes_amount, 1);
        assert_eq!(f.task, "");
        assert_eq!(f.minutes_amount, "25");
    }

    #[test]
    fn invalid_submit_keeps_input_and_records_errors() {
        let mut f = form("Write report", "61");
        assert_eq!(f.submit(), None);
        assert_eq!(f.task, "Write report");
        assert_eq!(f.errors().minutes_amount, Some(FormError::DurationOutOfRange));
        assert_eq!(f.errors().minutes_amount.unwrap().to_string(), "duration out of range");
    }

    #[test]
    fn stepping_stays_in_range() {
        let mut f = form("x", "58");
        f.step_minutes(true);
        assert_eq!(f.minutes_amount, "60");
        f.minutes_amount = "3".into();
        f.step_minutes(false);
        assert_eq!(f.minutes_amount, "1");
        f.step_minutes(true);
        assert_eq!(f.minutes_amount, "6");
    }

    #[test]
    fn suggestion_fills_task() {
        let mut f = NewCycleForm::new(25);
        f.choose_suggestion("Banana");
        assert_eq!(f.task, "Banana");
        assert!(!f.is_submit_disabled());
    }
}
