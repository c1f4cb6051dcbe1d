//! 番茄式倒计时：命名任务、选择时长、开始一个周期，倒计时归零或被中断即结束

pub mod app;
pub mod clock;
pub mod config;
pub mod cycles;
pub mod display;
pub mod error;
pub mod form;
pub mod logging;
pub mod session;
