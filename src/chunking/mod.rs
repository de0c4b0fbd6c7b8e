//! 分块层
//!
//! 纯同步计算，不发起任何远程调用。

pub mod planner;
pub mod splitter;

pub use planner::{enforce_page_cap, BatchPlanner};
pub use splitter::ChunkSplitter;
