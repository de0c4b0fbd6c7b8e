//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `summary_orchestrator` - 单篇文档的 map-reduce
//! - 每个分块一次远程调用（Semaphore 限制并发）
//! - 按原始位置回填结果
//! - 合并调用
//!
//! ### `batch_processor` - 批量文档处理器
//! - 管理应用生命周期（初始化、运行、统计）
//! - 批量加载文档（Vec<Document>）
//! - 控制同时处理的文档数量
//! - 写出总结和失败记录
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<Document>)
//!     ↓
//! workflow::DocumentFlow (处理单篇 Document)
//!     ↓
//! summary_orchestrator (处理 Vec<Chunk>)
//!     ↓
//! services (能力层：remote summarizer / prompts / writer)
//! ```

pub mod batch_processor;
pub mod summary_orchestrator;

pub use batch_processor::App;
pub use summary_orchestrator::{OrchestratorOptions, SummaryOrchestrator, MERGE_SEPARATOR};
