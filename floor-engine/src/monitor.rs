//! 楼面监控调度器
//!
//! 按固定周期检查迟到与即将结束的预订，结果变化时通过 `watch` 通道发布。
//! 只读引擎，从不触发拼桌重算。

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDateTime;
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::core::{FloorAlerts, FloorEngine};

/// Wall clock used for each tick
pub type Clock = Arc<dyn Fn() -> NaiveDateTime + Send + Sync>;

/// 楼面监控调度器
pub struct FloorMonitor {
    engine: Arc<Mutex<FloorEngine>>,
    shutdown: CancellationToken,
    interval: Duration,
    alerts: watch::Sender<FloorAlerts>,
    clock: Clock,
}

impl FloorMonitor {
    pub fn new(engine: Arc<Mutex<FloorEngine>>, shutdown: CancellationToken, interval: Duration) -> Self {
        let (alerts, _) = watch::channel(FloorAlerts::default());
        Self {
            engine,
            shutdown,
            interval,
            alerts,
            clock: Arc::new(shared::time::now_local),
        }
    }

    /// Replace the wall clock, mainly for tests
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// 订阅告警变化
    pub fn subscribe(&self) -> watch::Receiver<FloorAlerts> {
        self.alerts.subscribe()
    }

    /// 主循环：首次立即检查，之后按周期触发，直到收到关机信号
    pub async fn run(self) {
        tracing::info!(interval_secs = self.interval.as_secs(), "Floor monitor started");

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.check();
                }
                _ = self.shutdown.cancelled() => {
                    tracing::info!("Floor monitor received shutdown signal");
                    return;
                }
            }
        }
    }

    /// 计算当前告警，变化时发布
    fn check(&self) {
        let now = (self.clock)();
        let alerts = self.engine.lock().alerts_at(now);

        let changed = self.alerts.send_if_modified(|current| {
            if *current == alerts {
                return false;
            }
            *current = alerts.clone();
            true
        });

        if !changed {
            tracing::debug!(at = %now, "Floor alerts unchanged");
            return;
        }
        if alerts.is_empty() {
            tracing::info!(at = %now, "Floor alerts cleared");
        } else {
            tracing::info!(
                at = %now,
                late = alerts.late.len(),
                ending_soon = alerts.ending_soon.len(),
                "Floor alerts changed"
            );
        }
    }
}
