// src/logging/logger.rs

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

use crate::error::{Error, Result};

/// 安装全局 tracing 订阅者：JSON 格式，按小时滚动写入 `log_dir/file_name`
///
/// 返回的 guard 需要由调用方持有，drop 时刷盘。
/// 日志级别由 `RUST_LOG` 控制。
pub fn init(log_dir: impl AsRef<Path>, file_name: &str) -> Result<WorkerGuard> {
    let log_file = rolling::hourly(log_dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(log_file);
    let subscriber = Registry::default()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer().json().with_writer(non_blocking));
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| Error::Logging(e.to_string()))?;
    Ok(guard)
}

/// 没有日志目录时输出到 stdout
pub fn init_stdout() -> Result<()> {
    let subscriber = Registry::default()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer().json());
    tracing::subscriber::set_global_default(subscriber).map_err(|e| Error::Logging(e.to_string()))
}
