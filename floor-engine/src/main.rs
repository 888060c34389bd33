use std::sync::Arc;

use floor_engine::{FloorEngine, FloorMonitor, FloorSnapshot, setup_environment};
use parking_lot::Mutex;
use shared::ReservationCategory;
use shared::time;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. 环境 (dotenv, 日志) 与配置
    let config = setup_environment()?;
    tracing::info!(?config, "Floor engine starting...");

    // 2. 构建引擎，可选加载快照
    let mut engine = FloorEngine::new(&config);
    if let Some(path) = &config.snapshot_path {
        let snapshot = FloorSnapshot::load(path)?;
        let now = time::now_local();

        engine.set_layout(snapshot.tables);
        engine.preload(now.date(), &snapshot.reservations);

        let category = ReservationCategory::for_time(now.time());
        let clusters = engine.recalculate(now, category);
        tracing::info!(category = %category, clusters = clusters.len(), "Initial clusters computed");
    }

    // 3. 启动监控
    let engine = Arc::new(Mutex::new(engine));
    let shutdown = CancellationToken::new();
    let monitor = FloorMonitor::new(engine.clone(), shutdown.clone(), config.monitor_interval());
    let handle = tokio::spawn(monitor.run());

    // 4. 等待关机信号
    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown requested");
    shutdown.cancel();
    handle.await?;

    Ok(())
}
