//! 分块总结编排器 - 编排层
//!
//! ## 职责
//!
//! 驱动两阶段的 map-reduce：
//!
//! 1. **map**：每个分块一次远程调用，用 Semaphore 限制同时进行的调用数
//! 2. **reduce**：按原始顺序拼接分块总结，再做一次合并调用
//!
//! ## 设计特点
//!
//! - **失败隔离**：单个分块失败只留下失败标记，不影响其他分块
//! - **按位置回填**：结果写入预分配数组的对应下标，完成顺序不影响输出顺序
//! - **随文档取消**：分块任务都挂在同一个 JoinSet 上，调用方放弃等待时全部中止

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{PipelineError, SummarizerError};
use crate::models::{
    Chunk, ChunkSummary, FailedChunkPolicy, MergedSummary, SummaryMode, SummaryStyle,
};
use crate::services::{PromptSet, RemoteSummarizer};

/// 合并输入中分块之间的分隔
pub const MERGE_SEPARATOR: &str = "\n\n";

/// 编排参数
#[derive(Debug, Clone, Copy)]
pub struct OrchestratorOptions {
    /// 同时进行的远程调用上限
    pub concurrency_limit: usize,
    pub per_call_timeout: Duration,
    pub temperature: f32,
    pub max_tokens: u32,
    pub failed_chunk_policy: FailedChunkPolicy,
}

impl OrchestratorOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            concurrency_limit: config.concurrency_limit,
            per_call_timeout: config.per_call_timeout(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            failed_chunk_policy: config.failed_chunk_policy,
        }
    }
}

impl Default for OrchestratorOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// 分块总结编排器
///
/// 远程客户端和提示词在构造时注入，之后只读共享。
#[derive(Clone)]
pub struct SummaryOrchestrator {
    summarizer: Arc<dyn RemoteSummarizer>,
    prompts: Arc<PromptSet>,
    options: OrchestratorOptions,
}

impl SummaryOrchestrator {
    pub fn new(
        summarizer: Arc<dyn RemoteSummarizer>,
        prompts: PromptSet,
        options: OrchestratorOptions,
    ) -> Self {
        Self {
            summarizer,
            prompts: Arc::new(prompts),
            options,
        }
    }

    /// map 阶段：并发总结所有分块
    ///
    /// 返回结果与输入一一对应、顺序相同。失败的分块带失败标记，不会返回错误。
    pub async fn summarize_chunks(
        &self,
        chunks: &[Chunk],
        mode: SummaryMode,
        style: SummaryStyle,
    ) -> Vec<ChunkSummary> {
        if chunks.is_empty() {
            return Vec::new();
        }

        let total = chunks.len();
        let semaphore = Arc::new(Semaphore::new(self.options.concurrency_limit.max(1)));
        let prompt: Arc<str> = Arc::from(self.prompts.for_chunk(mode, style));

        info!(
            "开始分块总结: {} 个分块, 最大并发 {}, 模式: {}, 风格: {}",
            total, self.options.concurrency_limit, mode, style
        );

        // 任务随 JoinSet 一起被丢弃时会被中止
        let mut tasks = JoinSet::new();
        for (slot, chunk) in chunks.iter().enumerate() {
            let semaphore = semaphore.clone();
            let summarizer = self.summarizer.clone();
            let prompt = prompt.clone();
            let text = chunk.text.clone();
            let options = self.options;

            tasks.spawn(async move {
                let outcome = match semaphore.acquire_owned().await {
                    Ok(_permit) => {
                        call_with_timeout(summarizer.as_ref(), &prompt, &text, &options).await
                    }
                    Err(_) => Err(SummarizerError::Transport("并发控制已关闭".to_string())),
                };
                (slot, outcome)
            });
        }

        let mut results: Vec<Option<ChunkSummary>> = vec![None; total];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((slot, Ok(text))) => {
                    debug!("分块 {}/{} 总结完成", slot + 1, total);
                    results[slot] = Some(ChunkSummary::summarized(chunks[slot].position, text));
                }
                Ok((slot, Err(e))) => {
                    warn!("⚠️ 分块 {}/{} 总结失败: {}", slot + 1, total, e);
                    results[slot] = Some(ChunkSummary::failed(chunks[slot].position, e));
                }
                Err(e) => {
                    warn!("分块任务异常终止: {}", e);
                }
            }
        }

        let summaries: Vec<ChunkSummary> = results
            .into_iter()
            .zip(chunks)
            .map(|(result, chunk)| {
                result.unwrap_or_else(|| {
                    ChunkSummary::failed(
                        chunk.position,
                        SummarizerError::Transport("分块任务异常终止".to_string()),
                    )
                })
            })
            .collect();

        let succeeded = summaries.iter().filter(|s| s.is_success()).count();
        info!("✓ 分块总结完成: 成功 {}/{}", succeeded, total);

        summaries
    }

    /// 按策略拼接分块总结，作为合并调用的输入
    pub fn merge_input(&self, summaries: &[ChunkSummary]) -> String {
        let parts: Vec<String> = summaries
            .iter()
            .filter_map(|summary| match (summary.is_success(), self.options.failed_chunk_policy) {
                (true, _) => Some(summary.text().to_string()),
                (false, FailedChunkPolicy::Placeholder) => Some(String::new()),
                (false, FailedChunkPolicy::Annotate) => {
                    Some(format!("[第 {} 部分总结失败]", summary.position + 1))
                }
                (false, FailedChunkPolicy::Omit) => None,
            })
            .collect();

        parts.join(MERGE_SEPARATOR)
    }

    /// reduce 阶段：合并所有分块总结
    ///
    /// 列表为空时返回 `NothingToMerge`，全部分块失败时返回 `AllChunksFailed`，
    /// 两种情况都不发起合并调用。
    pub async fn merge(
        &self,
        summaries: &[ChunkSummary],
        mode: SummaryMode,
        style: SummaryStyle,
    ) -> Result<MergedSummary, PipelineError> {
        if summaries.is_empty() {
            return Err(PipelineError::NothingToMerge);
        }

        let total = summaries.len();
        let failed = summaries.iter().filter(|s| !s.is_success()).count();

        if failed == total {
            return Err(PipelineError::AllChunksFailed { total });
        }
        if failed > 0 {
            warn!("⚠️ {} 个分块总结失败，继续合并其余 {} 个", failed, total - failed);
        }

        let merged_text = self.merge_input(summaries);
        info!("🔗 正在合并 {} 个分块总结...", total);

        let text = call_with_timeout(
            self.summarizer.as_ref(),
            self.prompts.for_merge(),
            &merged_text,
            &self.options,
        )
        .await
        .map_err(PipelineError::MergeFailure)?;

        Ok(MergedSummary {
            text,
            mode,
            style,
            chunks_processed: total,
            chunks_failed: failed,
        })
    }

    /// 完整的 map-reduce
    pub async fn summarize(
        &self,
        chunks: &[Chunk],
        mode: SummaryMode,
        style: SummaryStyle,
    ) -> Result<(MergedSummary, Vec<ChunkSummary>), PipelineError> {
        let summaries = self.summarize_chunks(chunks, mode, style).await;
        let merged = self.merge(&summaries, mode, style).await?;
        Ok((merged, summaries))
    }
}

/// 带超时的单次远程调用，超时与其他失败同等对待
async fn call_with_timeout(
    summarizer: &dyn RemoteSummarizer,
    prompt: &str,
    text: &str,
    options: &OrchestratorOptions,
) -> Result<String, SummarizerError> {
    match tokio::time::timeout(
        options.per_call_timeout,
        summarizer.invoke(prompt, text, options.temperature, options.max_tokens),
    )
    .await
    {
        Ok(result) => result,
        Err(_) => Err(SummarizerError::Timeout(options.per_call_timeout)),
    }
}
