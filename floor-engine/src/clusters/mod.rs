//! Table clusters (拼桌)
//!
//! - [`finder`]: connected components of a reservation's tables
//! - [`cache`]: bounded per-service store of computed clusters
//! - [`orchestrator`]: decides when a service's clusters are stale

pub mod cache;
pub mod finder;
pub mod orchestrator;

pub use cache::{ClusterCache, ClusterKey, DEFAULT_MAX_ENTRIES};
pub use finder::{ClusterFinder, adjacent, bounding_box, connected_components};
pub use orchestrator::{Baseline, ClusterOrchestrator, ClusterState};
