//! 文档级结果类型

use serde::Serialize;

use crate::models::chunk::ChunkDiagnostic;
use crate::models::mode::{SummaryMode, SummaryStyle};

/// 合并后的最终总结
#[derive(Debug, Clone, Serialize)]
pub struct MergedSummary {
    pub text: String,
    pub mode: SummaryMode,
    pub style: SummaryStyle,
    /// 参与 map 阶段的分块数
    pub chunks_processed: usize,
    /// 其中失败的分块数
    pub chunks_failed: usize,
}

/// 截断警告（非致命，随成功结果一起返回）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TruncationWarning {
    /// 分块数超过上限
    ChunksDropped { kept: usize, dropped: usize },
    /// 页数超过上限
    PagesDropped { kept: usize, dropped: usize },
}

impl std::fmt::Display for TruncationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TruncationWarning::ChunksDropped { kept, dropped } => {
                write!(f, "内容过多，只处理前 {} 个文本块，丢弃 {} 个", kept, dropped)
            }
            TruncationWarning::PagesDropped { kept, dropped } => {
                write!(f, "页数超过限制，只处理前 {} 页，丢弃 {} 页", kept, dropped)
            }
        }
    }
}

/// 单个文档的成功结果
#[derive(Debug, Clone, Serialize)]
pub struct SummaryReport {
    pub summary: MergedSummary,
    pub warnings: Vec<TruncationWarning>,
    /// 失败分块明细，只有开启 `collect_diagnostics` 时才有
    pub diagnostics: Option<Vec<ChunkDiagnostic>>,
}

/// 文档处理状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DocumentState {
    Pending,
    Chunking,
    Summarizing,
    Merging,
    Done,
    Failed,
}

impl DocumentState {
    /// 是否允许从当前状态迁移到 `next`
    pub fn can_transition_to(self, next: DocumentState) -> bool {
        use DocumentState::*;
        matches!(
            (self, next),
            (Pending, Chunking)
                | (Chunking, Summarizing)
                | (Chunking, Failed)
                | (Summarizing, Merging)
                | (Summarizing, Failed)
                | (Merging, Done)
                | (Merging, Failed)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, DocumentState::Done | DocumentState::Failed)
    }
}
