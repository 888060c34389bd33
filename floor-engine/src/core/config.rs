use std::time::Duration;

use shared::{AppError, AppResult};

use crate::clusters::DEFAULT_MAX_ENTRIES;
use crate::reservations::Thresholds;

pub const DEFAULT_PRELOAD_WINDOW_DAYS: u32 = 5;
pub const DEFAULT_MONITOR_INTERVAL_SECS: u64 = 60;
pub const DEFAULT_LATE_GRACE_MINUTES: i64 = 15;
pub const DEFAULT_ENDING_SOON_MINUTES: i64 = 30;

/// Thresholds longer than a day make no sense for a single service
const MAX_THRESHOLD_MINUTES: i64 = 24 * 60;

/// 引擎配置 - 楼面引擎的所有配置项
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | PRELOAD_WINDOW_DAYS | 5 | 预加载窗口半宽 (天) |
/// | MAX_CLUSTER_CACHE_ENTRIES | 100 | 拼桌缓存上限 |
/// | MONITOR_INTERVAL_SECS | 60 | 监控周期 (秒) |
/// | LATE_GRACE_MINUTES | 15 | 迟到宽限 (分钟) |
/// | ENDING_SOON_MINUTES | 30 | 即将结束阈值 (分钟) |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_DIR | - | 日志目录 (按天滚动) |
/// | FLOOR_SNAPSHOT | - | 启动时加载的 JSON 快照 |
///
/// # 示例
///
/// ```ignore
/// PRELOAD_WINDOW_DAYS=3 LOG_LEVEL=debug cargo run -p floor-engine
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// 预加载窗口: `[today - n, today + n]`
    pub preload_window_days: u32,
    /// 拼桌缓存最多保留的 (日期, 餐段) 条目
    pub max_cluster_cache_entries: usize,
    /// 监控周期
    pub monitor_interval_secs: u64,
    pub late_grace_minutes: i64,
    pub ending_soon_minutes: i64,
    pub log_level: String,
    pub log_dir: Option<String>,
    pub snapshot_path: Option<String>,
}

impl EngineConfig {
    /// 从环境变量加载配置
    ///
    /// 未设置或无法解析的变量使用默认值
    pub fn from_env() -> Self {
        Self {
            preload_window_days: std::env::var("PRELOAD_WINDOW_DAYS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_PRELOAD_WINDOW_DAYS),
            max_cluster_cache_entries: std::env::var("MAX_CLUSTER_CACHE_ENTRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_ENTRIES),
            monitor_interval_secs: std::env::var("MONITOR_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MONITOR_INTERVAL_SECS),
            late_grace_minutes: std::env::var("LATE_GRACE_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_LATE_GRACE_MINUTES),
            ending_soon_minutes: std::env::var("ENDING_SOON_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_ENDING_SOON_MINUTES),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok(),
            snapshot_path: std::env::var("FLOOR_SNAPSHOT").ok(),
        }
    }

    /// 校验配置取值
    ///
    /// 负数或超过一天的阈值、为零的缓存上限与监控周期视为配置错误
    pub fn validate(&self) -> AppResult<()> {
        if !(0..=MAX_THRESHOLD_MINUTES).contains(&self.late_grace_minutes) {
            return Err(AppError::config("LATE_GRACE_MINUTES must be between 0 and 1440")
                .with_detail("value", self.late_grace_minutes));
        }
        if !(1..=MAX_THRESHOLD_MINUTES).contains(&self.ending_soon_minutes) {
            return Err(AppError::config("ENDING_SOON_MINUTES must be between 1 and 1440")
                .with_detail("value", self.ending_soon_minutes));
        }
        if self.max_cluster_cache_entries == 0 {
            return Err(AppError::config("MAX_CLUSTER_CACHE_ENTRIES must be positive"));
        }
        if self.monitor_interval_secs == 0 {
            return Err(AppError::config("MONITOR_INTERVAL_SECS must be positive"));
        }
        Ok(())
    }

    /// 迟到 / 即将结束阈值
    pub fn thresholds(&self) -> Thresholds {
        Thresholds {
            late_grace: chrono::Duration::minutes(self.late_grace_minutes),
            ending_soon: chrono::Duration::minutes(self.ending_soon_minutes),
        }
    }

    pub fn monitor_interval(&self) -> Duration {
        // a zero period would make tokio::time::interval panic
        Duration::from_secs(self.monitor_interval_secs.max(1))
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            preload_window_days: DEFAULT_PRELOAD_WINDOW_DAYS,
            max_cluster_cache_entries: DEFAULT_MAX_ENTRIES,
            monitor_interval_secs: DEFAULT_MONITOR_INTERVAL_SECS,
            late_grace_minutes: DEFAULT_LATE_GRACE_MINUTES,
            ending_soon_minutes: DEFAULT_ENDING_SOON_MINUTES,
            log_level: "info".into(),
            log_dir: None,
            snapshot_path: None,
        }
    }
}
