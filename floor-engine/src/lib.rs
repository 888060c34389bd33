//! Floor Engine - 餐厅楼面拼桌与在座预订索引
//!
//! # 架构概述
//!
//! - **预订索引** (`reservations`): 按日期分桶 + 分钟级活跃索引
//! - **布局指纹** (`layout`): 可见桌台的 SHA-256 签名
//! - **拼桌** (`clusters`): 连通分量识别、LRU 缓存、重算编排
//! - **引擎** (`core`): 配置、组合根、JSON 快照
//! - **监控** (`monitor`): 周期性迟到 / 即将结束检查
//!
//! # 模块结构
//!
//! ```text
//! floor-engine/src/
//! ├── core/          # 配置、引擎、快照
//! ├── reservations/  # 日期索引、分钟索引、查询
//! ├── layout/        # 布局签名
//! ├── clusters/      # 拼桌识别、缓存、编排
//! ├── monitor.rs     # 监控调度器
//! └── utils/         # 日志
//! ```

pub mod clusters;
pub mod core;
pub mod layout;
pub mod monitor;
pub mod reservations;
pub mod utils;

// Re-export 公共类型
pub use clusters::{ClusterCache, ClusterFinder, ClusterOrchestrator, ClusterState};
pub use crate::core::{EngineConfig, FloorAlerts, FloorEngine, FloorSnapshot};
pub use layout::LayoutSignature;
pub use monitor::FloorMonitor;
pub use reservations::{ReservationDateIndex, Thresholds};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 加载 `.env`、初始化日志并校验配置
pub fn setup_environment() -> shared::AppResult<EngineConfig> {
    dotenv::dotenv().ok();
    let config = EngineConfig::from_env();
    init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());
    if let Err(e) = config.validate() {
        tracing::error!(code = %e.code, error = %e, "Invalid configuration");
        return Err(e);
    }
    Ok(config)
}
