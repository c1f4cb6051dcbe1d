//! 错误类型

use std::path::PathBuf;
use thiserror::Error;

use crate::cycles::CycleId;

/// 表单字段校验错误，只在表单内部展示
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("task required")]
    TaskRequired,

    #[error("duration must be a whole number of minutes")]
    DurationNotANumber,

    #[error("duration out of range")]
    DurationOutOfRange,
}

/// 转换后状态不满足不变量
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CycleError {
    #[error("{count} cycles are open at the same time")]
    MultipleOpenCycles { count: usize },

    #[error("active cycle {id} is not in the cycle list")]
    DanglingActiveCycle { id: CycleId },

    #[error("active cycle {id} is already interrupted or finished")]
    ActiveCycleClosed { id: CycleId },

    #[error("an open cycle exists but no cycle is marked active")]
    UntrackedOpenCycle,
}

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(#[from] ValidationError),
}

/// 配置语义校验错误
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("default_minutes_amount must be within {min}..={max}, got {value}")]
    DefaultDurationOutOfRange { value: u32, min: u32, max: u32 },

    #[error("idle_title must not be empty")]
    EmptyIdleTitle,

    #[error("log_filter must not be empty")]
    EmptyLogFilter,

    #[error("window size must be positive")]
    InvalidWindowSize,
}

/// 程序入口的顶层错误
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("logging setup failed: {0}")]
    Logging(String),

    #[error("ui failed: {0}")]
    Ui(#[from] eframe::Error),
}
