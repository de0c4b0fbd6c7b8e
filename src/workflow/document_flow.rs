//! 文档处理流程 - 流程层
//!
//! 核心职责：定义"一篇文档"的完整处理流程
//!
//! 流程顺序：
//! 1. 页数上限 → 规划页面批次
//! 2. 每批分块（累加器在批次边界重置）→ 分块数上限
//! 3. map：并发总结每个分块
//! 4. reduce：合并为一篇总结
//!
//! 状态：`Pending → Chunking → Summarizing → Merging → Done`，任一阶段可进入 `Failed`。

use tracing::{error, info, warn};

use crate::chunking::{enforce_page_cap, BatchPlanner, ChunkSplitter};
use crate::config::Config;
use crate::error::PipelineError;
use crate::models::{
    Chunk, ChunkDiagnostic, ChunkSummary, Document, DocumentState, SummaryMode, SummaryReport,
    SummaryStyle, TruncationWarning,
};
use crate::orchestrator::SummaryOrchestrator;
use crate::workflow::document_ctx::DocumentCtx;

/// 流程参数
#[derive(Debug, Clone, Copy)]
pub struct FlowOptions {
    pub max_chunk_chars: usize,
    pub max_pages_per_batch: usize,
    pub max_chunks: usize,
    pub max_pages: Option<usize>,
    pub mode: SummaryMode,
    pub style: SummaryStyle,
    pub collect_diagnostics: bool,
}

impl FlowOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_chunk_chars: config.max_chunk_chars,
            max_pages_per_batch: config.max_pages_per_batch,
            max_chunks: config.max_chunks,
            max_pages: config.max_pages,
            mode: config.mode,
            style: config.style,
            collect_diagnostics: config.collect_diagnostics,
        }
    }
}

/// 文档处理流程
///
/// - 编排单篇文档的分块与总结
/// - 决定何时截断、何时失败
/// - 不持有任何文件资源
pub struct DocumentFlow {
    orchestrator: SummaryOrchestrator,
    splitter: ChunkSplitter,
    planner: BatchPlanner,
    options: FlowOptions,
}

impl DocumentFlow {
    pub fn new(orchestrator: SummaryOrchestrator, options: FlowOptions) -> Self {
        Self {
            orchestrator,
            splitter: ChunkSplitter::new(options.max_chunk_chars),
            planner: BatchPlanner::new(options.max_pages_per_batch, options.max_chunks),
            options,
        }
    }

    /// 把文档切成分块，截断信息写入 `warnings`
    ///
    /// 分块位置在整篇文档内连续编号。
    pub fn prepare_chunks(
        &self,
        document: &Document,
        ctx: &DocumentCtx,
        warnings: &mut Vec<TruncationWarning>,
    ) -> Vec<Chunk> {
        let (total_pages, page_warning) =
            enforce_page_cap(document.total_pages(), self.options.max_pages);
        if let Some(warning) = page_warning {
            warn!("{} ⚠️ {}", ctx, warning);
            warnings.push(warning);
        }

        let batches = self.planner.plan(total_pages);
        if batches.len() > 1 {
            info!(
                "{} 文档页数({})超过每批上限({})，将分 {} 批处理",
                ctx,
                total_pages,
                self.options.max_pages_per_batch,
                batches.len()
            );
        }

        let mut chunks = Vec::new();
        for (batch_num, batch) in batches.iter().enumerate() {
            let batch_chunks = self.splitter.split(&document.pages[batch.start..batch.end]);
            info!(
                "{} 📦 第 {}/{} 批 (页 {}-{}): {} 个分块",
                ctx,
                batch_num + 1,
                batches.len(),
                batch.start + 1,
                batch.end,
                batch_chunks.len()
            );
            chunks.extend(batch_chunks);
        }

        for (position, chunk) in chunks.iter_mut().enumerate() {
            chunk.position = position;
        }

        let (kept, chunk_warning) = self.planner.enforce_chunk_cap(chunks);
        if let Some(warning) = chunk_warning {
            warn!("{} ⚠️ {}", ctx, warning);
            warnings.push(warning);
        }

        kept
    }

    /// 运行完整流程
    pub async fn run(&self, document: &Document, ctx: &DocumentCtx) -> Result<SummaryReport, PipelineError> {
        let mut state = StateTracker::new(ctx);
        let mut warnings = Vec::new();

        state.advance(DocumentState::Chunking);
        let chunks = self.prepare_chunks(document, ctx, &mut warnings);

        if chunks.is_empty() {
            state.advance(DocumentState::Failed);
            let err = PipelineError::EmptyDocument {
                document: document.name.clone(),
            };
            error!("{} ❌ {}", ctx, err);
            return Err(err);
        }

        state.advance(DocumentState::Summarizing);
        let summaries = self
            .orchestrator
            .summarize_chunks(&chunks, self.options.mode, self.options.style)
            .await;

        if !summaries.iter().any(ChunkSummary::is_success) {
            state.advance(DocumentState::Failed);
            let err = PipelineError::AllChunksFailed {
                total: summaries.len(),
            };
            error!("{} ❌ {}", ctx, err);
            return Err(err);
        }

        state.advance(DocumentState::Merging);
        let summary = match self
            .orchestrator
            .merge(&summaries, self.options.mode, self.options.style)
            .await
        {
            Ok(summary) => summary,
            Err(err) => {
                state.advance(DocumentState::Failed);
                error!("{} ❌ {}", ctx, err);
                return Err(err);
            }
        };

        state.advance(DocumentState::Done);
        info!(
            "{} ✅ 总结完成: {} 个分块, 失败 {} 个",
            ctx, summary.chunks_processed, summary.chunks_failed
        );

        let diagnostics = self
            .options
            .collect_diagnostics
            .then(|| collect_diagnostics(&summaries));

        Ok(SummaryReport {
            summary,
            warnings,
            diagnostics,
        })
    }
}

fn collect_diagnostics(summaries: &[ChunkSummary]) -> Vec<ChunkDiagnostic> {
    summaries
        .iter()
        .filter_map(|s| {
            s.error().map(|e| ChunkDiagnostic {
                position: s.position,
                error: e.to_string(),
            })
        })
        .collect()
}

/// 状态迁移记录
struct StateTracker<'a> {
    ctx: &'a DocumentCtx,
    state: DocumentState,
}

impl<'a> StateTracker<'a> {
    fn new(ctx: &'a DocumentCtx) -> Self {
        Self {
            ctx,
            state: DocumentState::Pending,
        }
    }

    /// 迁移到下一状态，返回该迁移是否合法
    ///
    /// 非法迁移记录 `error!` 后仍然生效。
    fn advance(&mut self, next: DocumentState) -> bool {
        let legal = self.state.can_transition_to(next);
        if legal {
            tracing::debug!("{} 状态: {:?} -> {:?}", self.ctx, self.state, next);
        } else {
            error!("{} 非法状态迁移: {:?} -> {:?}", self.ctx, self.state, next);
        }
        self.state = next;
        legal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SummarizerError;
    use crate::orchestrator::OrchestratorOptions;
    use crate::services::{PromptSet, RemoteSummarizer};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// 回显分块字数；文本包含 "FAIL" 时失败
    struct EchoSummarizer {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl RemoteSummarizer for EchoSummarizer {
        async fn invoke(&self, _p: &str, text: &str, _t: f32, _m: u32) -> Result<String, SummarizerError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if text.contains("FAIL") {
                return Err(SummarizerError::Transport("boom".to_string()));
            }
            Ok(format!("{} words", text.split_whitespace().count()))
        }
    }

    fn flow(options: FlowOptions) -> (DocumentFlow, Arc<EchoSummarizer>) {
        let stub = Arc::new(EchoSummarizer {
            calls: AtomicUsize::new(0),
        });
        let orchestrator =
            SummaryOrchestrator::new(stub.clone(), PromptSet::default(), OrchestratorOptions::default());
        (DocumentFlow::new(orchestrator, options), stub)
    }

    fn options() -> FlowOptions {
        FlowOptions {
            max_chunk_chars: 20,
            max_pages_per_batch: 2,
            max_chunks: 100,
            max_pages: None,
            mode: SummaryMode::Standard,
            style: SummaryStyle::Academic,
            collect_diagnostics: true,
        }
    }

    #[test]
    fn test_accumulator_resets_at_batch_boundary() {
        let (flow, _) = flow(options());
        let doc = Document::from_page_texts("d", ["a", "b", "c"]);
        let mut warnings = Vec::new();

        let chunks = flow.prepare_chunks(&doc, &DocumentCtx::new("d", 1), &mut warnings);

        let texts: Vec<_> = chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["a b", "c"]);
        assert_eq!(chunks[1].position, 1);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_page_and_chunk_caps_reported() {
        let (flow, _) = flow(FlowOptions {
            max_chunk_chars: 1,
            max_chunks: 3,
            max_pages: Some(2),
            ..options()
        });
        let doc = Document::from_page_texts("d", ["a b c", "d e", "f g h"]);
        let mut warnings = Vec::new();

        let chunks = flow.prepare_chunks(&doc, &DocumentCtx::new("d", 1), &mut warnings);

        assert_eq!(chunks.len(), 3);
        assert_eq!(
            warnings,
            vec![
                TruncationWarning::PagesDropped { kept: 2, dropped: 1 },
                TruncationWarning::ChunksDropped { kept: 3, dropped: 2 },
            ]
        );
    }

    #[test]
    fn test_state_tracker_flags_illegal_transitions() {
        let ctx = DocumentCtx::new("d", 1);
        let mut tracker = StateTracker::new(&ctx);

        assert!(tracker.advance(DocumentState::Chunking));
        assert!(!tracker.advance(DocumentState::Done));
        assert_eq!(tracker.state, DocumentState::Done);
        assert!(!tracker.advance(DocumentState::Summarizing));
    }

    #[tokio::test]
    async fn test_empty_document_fails_without_remote_calls() {
        let (flow, stub) = flow(options());
        let doc = Document::from_page_texts("blank", ["", "  "]);

        let result = flow.run(&doc, &DocumentCtx::new("blank", 1)).await;

        assert!(matches!(result, Err(PipelineError::EmptyDocument { .. })));
        assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_partial_failure_still_done_with_diagnostics() {
        let (flow, _) = flow(options());
        let doc = Document::from_page_texts("d", ["one two", "FAIL here", "three"]);

        let report = flow.run(&doc, &DocumentCtx::new("d", 1)).await.unwrap();

        assert_eq!(report.summary.chunks_processed, 2);
        assert_eq!(report.summary.chunks_failed, 1);
        let diagnostics = report.diagnostics.unwrap();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].position, 0);
    }

    #[tokio::test]
    async fn test_diagnostics_hidden_unless_requested() {
        let (flow, _) = flow(FlowOptions {
            collect_diagnostics: false,
            ..options()
        });
        let doc = Document::from_page_texts("d", ["one two"]);

        let report = flow.run(&doc, &DocumentCtx::new("d", 1)).await.unwrap();
        assert!(report.diagnostics.is_none());
    }
}
