//! # Paper Summarizer
//!
//! 把长篇论文切分成文本块，通过远程 LLM 服务做两阶段 map-reduce 总结
//!
//! ## 架构设计
//!
//! ### ① 分块层（Chunking）
//! - `chunking/` - 纯同步计算，不发起远程调用
//! - `ChunkSplitter` - 按词贪心装块
//! - `BatchPlanner` - 页面批次规划与分块数上限
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"
//! - `RemoteSummarizer` - 远程总结能力（`LlmService` 为 OpenAI 兼容实现）
//! - `PromptSet` - 提示词选择
//! - `OutputWriter` - 写总结和失败记录
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一篇文档"的完整处理流程
//! - `DocumentFlow` - 分块 → map → reduce，以及文档状态
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/summary_orchestrator` - 有界并发的 map-reduce
//! - `orchestrator/batch_processor` - 批量文档处理器
//!
//! ## 模块结构

pub mod chunking;
pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use chunking::{BatchPlanner, ChunkSplitter};
pub use config::Config;
pub use error::{ConfigError, PipelineError, SummarizerError};
pub use models::{Chunk, ChunkSummary, Document, MergedSummary, Page, SummaryReport};
pub use orchestrator::{App, OrchestratorOptions, SummaryOrchestrator};
pub use services::{LlmService, PromptSet, RemoteSummarizer};
pub use workflow::{DocumentCtx, DocumentFlow, FlowOptions};
