use serde::Serialize;

use crate::error::SummarizerError;

/// 文本块
///
/// `text` 的字符数不超过 `max_chunk_chars`，唯一的例外是单个超长词
/// 自成一块。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// 在整篇文档中的位置（0 基）
    pub position: usize,
    pub text: String,
}

impl Chunk {
    pub fn new(position: usize, text: impl Into<String>) -> Self {
        Self {
            position,
            text: text.into(),
        }
    }

    /// 字符数
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// 页面批次 `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Batch {
    pub start: usize,
    pub end: usize,
}

impl Batch {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// 单个分块的处理结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChunkOutcome {
    Summarized(String),
    Failed(SummarizerError),
}

/// 分块总结：位置 + 结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkSummary {
    pub position: usize,
    pub outcome: ChunkOutcome,
}

impl ChunkSummary {
    pub fn summarized(position: usize, text: impl Into<String>) -> Self {
        Self {
            position,
            outcome: ChunkOutcome::Summarized(text.into()),
        }
    }

    pub fn failed(position: usize, error: SummarizerError) -> Self {
        Self {
            position,
            outcome: ChunkOutcome::Failed(error),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, ChunkOutcome::Summarized(_))
    }

    /// 总结文本，失败时为空串
    pub fn text(&self) -> &str {
        match &self.outcome {
            ChunkOutcome::Summarized(text) => text,
            ChunkOutcome::Failed(_) => "",
        }
    }

    pub fn error(&self) -> Option<&SummarizerError> {
        match &self.outcome {
            ChunkOutcome::Summarized(_) => None,
            ChunkOutcome::Failed(e) => Some(e),
        }
    }
}

/// 分块级诊断信息（仅在调用方请求时返回）
#[derive(Debug, Clone, Serialize)]
pub struct ChunkDiagnostic {
    pub position: usize,
    pub error: String,
}
