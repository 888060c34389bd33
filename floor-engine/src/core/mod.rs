//! 核心模块 - 配置、引擎、快照
//!
//! - [`EngineConfig`] - 引擎配置
//! - [`FloorEngine`] - 组合根
//! - [`FloorSnapshot`] - JSON 种子数据

pub mod config;
pub mod engine;
pub mod snapshot;

pub use config::EngineConfig;
pub use engine::{FloorAlerts, FloorEngine};
pub use snapshot::FloorSnapshot;
