//! 日志：tracing fmt 输出，`RUST_LOG` 优先于配置里的过滤表达式

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::AppError;

pub fn env_filter(fallback: &str) -> Result<EnvFilter, AppError> {
    match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(from_env) if !from_env.trim().is_empty() => {
            EnvFilter::builder().parse(from_env).map_err(|e| AppError::Logging(e.to_string()))
        }
        _ => EnvFilter::builder().parse(fallback).map_err(|e| AppError::Logging(e.to_string())),
    }
}

pub fn init(fallback: &str) -> Result<(), AppError> {
    tracing_subscriber::registry()
        .with(env_filter(fallback)?)
        .with(fmt::layer().with_target(false))
        .try_init()
        .map_err(|e| AppError::Logging(e.to_string()))
}
