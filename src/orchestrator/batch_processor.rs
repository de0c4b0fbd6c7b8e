//! 批量文档处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责批量文档的处理和资源管理。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：创建远程客户端、编排器和写入服务
//! 2. **批量加载**：扫描并加载所有待处理的文档（`Vec<Document>`）
//! 3. **并发控制**：使用 Semaphore 限制同时处理的文档数
//! 4. **分批处理**：每批完成后再开始下一批
//! 5. **结果落盘**：写出总结和失败分块记录
//! 6. **全局统计**：汇总所有文档的处理结果

use crate::config::Config;
use crate::models::{Document, SummaryReport};
use crate::orchestrator::summary_orchestrator::{OrchestratorOptions, SummaryOrchestrator};
use crate::services::{LlmService, OutputWriter, RemoteSummarizer};
use crate::utils::logging;
use crate::workflow::{DocumentCtx, DocumentFlow, FlowOptions};
use anyhow::Result;
use futures::future::join_all;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

/// 应用主结构
pub struct App {
    config: Config,
    flow: Arc<DocumentFlow>,
    writer: Arc<OutputWriter>,
}

/// 处理统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ProcessingStats {
    pub success: usize,
    pub failed: usize,
    pub total: usize,
}

/// 批次处理结果
#[derive(Debug, Default)]
struct BatchResult {
    success: usize,
    failed: usize,
}

impl App {
    /// 使用 OpenAI 兼容服务初始化应用
    pub fn initialize(config: Config) -> Result<Self> {
        config.validate()?;
        if config.llm_api_key.is_empty() {
            warn!("⚠️ 未设置 LLM_API_KEY，远程调用可能会失败");
        }

        let summarizer: Arc<dyn RemoteSummarizer> = Arc::new(LlmService::new(&config.llm_settings()));
        Ok(Self::with_summarizer(config, summarizer))
    }

    /// 使用指定的远程总结实现初始化应用
    pub fn with_summarizer(config: Config, summarizer: Arc<dyn RemoteSummarizer>) -> Self {
        logging::log_startup(&config);

        let orchestrator = SummaryOrchestrator::new(
            summarizer,
            config.prompts.clone(),
            OrchestratorOptions::from_config(&config),
        );
        let flow = DocumentFlow::new(orchestrator, FlowOptions::from_config(&config));
        let writer = OutputWriter::new(&config.output_folder, &config.diagnostics_file);

        Self {
            config,
            flow: Arc::new(flow),
            writer: Arc::new(writer),
        }
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<ProcessingStats> {
        let documents = self.load_documents().await?;

        if documents.is_empty() {
            warn!("⚠️ 没有找到待处理的文档，程序结束");
            return Ok(ProcessingStats::default());
        }

        logging::log_documents_loaded(documents.len(), self.config.max_concurrent_documents);

        let stats = self.process_all_documents(documents).await?;

        logging::print_final_stats(stats.success, stats.failed, stats.total, &self.config.output_folder);

        Ok(stats)
    }

    /// 加载文档
    async fn load_documents(&self) -> Result<Vec<Document>> {
        info!("📁 正在扫描待处理的文档...");
        crate::models::load_all_documents(&self.config.input_folder).await
    }

    /// 处理所有文档
    pub async fn process_all_documents(&self, documents: Vec<Document>) -> Result<ProcessingStats> {
        let window = self.config.max_concurrent_documents.max(1);
        let semaphore = Arc::new(Semaphore::new(window));
        let total_documents = documents.len();
        let total_batches = total_documents.div_ceil(window);
        let mut stats = ProcessingStats {
            total: total_documents,
            ..Default::default()
        };

        let mut remaining = documents.into_iter();
        for batch_index in 0..total_batches {
            let batch_start = batch_index * window;
            let batch_documents: Vec<Document> = remaining.by_ref().take(window).collect();
            let batch_end = batch_start + batch_documents.len();

            logging::log_batch_start(
                batch_index + 1,
                total_batches,
                batch_start + 1,
                batch_end,
                total_documents,
            );

            let batch_result = self
                .process_batch(batch_documents, batch_start, semaphore.clone())
                .await?;

            stats.success += batch_result.success;
            stats.failed += batch_result.failed;

            logging::log_batch_complete(
                batch_index + 1,
                batch_result.success,
                batch_result.success + batch_result.failed,
            );
        }

        Ok(stats)
    }

    /// 处理单个批次
    async fn process_batch(
        &self,
        batch_documents: Vec<Document>,
        batch_start: usize,
        semaphore: Arc<Semaphore>,
    ) -> Result<BatchResult> {
        let mut batch_handles = Vec::new();

        for (idx, document) in batch_documents.into_iter().enumerate() {
            let document_index = batch_start + idx + 1;
            let permit = semaphore.clone().acquire_owned().await?;

            let flow = self.flow.clone();
            let writer = self.writer.clone();
            let ctx = DocumentCtx::new(document.name.clone(), document_index);

            let handle = tokio::spawn(async move {
                let _permit = permit;
                match flow.run(&document, &ctx).await {
                    Ok(report) => match save_report(&writer, &ctx, &report).await {
                        Ok(()) => true,
                        Err(e) => {
                            error!("{} ❌ 保存结果失败: {}", ctx, e);
                            false
                        }
                    },
                    Err(e) => {
                        error!("{} ❌ 处理过程中发生错误: {}", ctx, e);
                        false
                    }
                }
            });
            batch_handles.push((document_index, handle));
        }

        let (indices, handles): (Vec<_>, Vec<_>) = batch_handles.into_iter().unzip();
        let mut result = BatchResult::default();

        for (document_index, joined) in indices.into_iter().zip(join_all(handles).await) {
            match joined {
                Ok(true) => result.success += 1,
                Ok(false) => result.failed += 1,
                Err(e) => {
                    error!("[文档 {}] 任务执行失败: {}", document_index, e);
                    result.failed += 1;
                }
            }
        }

        Ok(result)
    }
}

async fn save_report(writer: &OutputWriter, ctx: &DocumentCtx, report: &SummaryReport) -> Result<()> {
    for warning in &report.warnings {
        warn!("{} ⚠️ {}", ctx, warning);
    }

    let path = writer.write_summary(&ctx.name, report).await?;
    info!("{} 💾 总结已保存: {}", ctx, path.display());
    info!("{} 预览: {}", ctx, logging::truncate_text(&report.summary.text, 80));

    if let Some(diagnostics) = &report.diagnostics {
        writer.append_diagnostics(&ctx.name, diagnostics).await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SummarizerError;
    use async_trait::async_trait;

    struct FixedSummarizer;

    #[async_trait]
    impl RemoteSummarizer for FixedSummarizer {
        async fn invoke(&self, _p: &str, text: &str, _t: f32, _m: u32) -> Result<String, SummarizerError> {
            if text.contains("BROKEN") {
                return Err(SummarizerError::MalformedResponse("empty".to_string()));
            }
            Ok("总结".to_string())
        }
    }

    #[tokio::test]
    async fn test_run_processes_folder_and_isolates_failures() {
        let root = std::env::temp_dir().join(format!("paper_summarizer_app_{}", std::process::id()));
        let input = root.join("in");
        tokio::fs::create_dir_all(&input).await.unwrap();
        tokio::fs::write(input.join("good.txt"), "some words here").await.unwrap();
        tokio::fs::write(input.join("bad.txt"), "BROKEN").await.unwrap();
        tokio::fs::write(input.join("also_good.md"), "more words\u{000C}next page").await.unwrap();

        let config = Config {
            input_folder: input.to_string_lossy().to_string(),
            output_folder: root.join("out").to_string_lossy().to_string(),
            diagnostics_file: root.join("diag.jsonl").to_string_lossy().to_string(),
            max_concurrent_documents: 2,
            ..Config::default()
        };

        let app = App::with_summarizer(config, Arc::new(FixedSummarizer));
        let stats = app.run().await.unwrap();

        assert_eq!(stats, ProcessingStats { success: 2, failed: 1, total: 3 });
        assert!(root.join("out").join("good.md").exists());
        assert!(root.join("out").join("also_good.md").exists());
        assert!(!root.join("out").join("bad.md").exists());

        tokio::fs::remove_dir_all(&root).await.unwrap();
    }

    #[tokio::test]
    async fn test_same_stem_inputs_write_separate_summaries() {
        let root = std::env::temp_dir().join(format!("paper_summarizer_same_stem_{}", std::process::id()));
        let input = root.join("in");
        let output = root.join("out");
        tokio::fs::create_dir_all(&input).await.unwrap();
        tokio::fs::write(input.join("paper.md"), "markdown version").await.unwrap();
        tokio::fs::write(input.join("paper.txt"), "text version").await.unwrap();

        let config = Config {
            input_folder: input.to_string_lossy().to_string(),
            output_folder: output.to_string_lossy().to_string(),
            diagnostics_file: root.join("diag.jsonl").to_string_lossy().to_string(),
            ..Config::default()
        };

        let stats = App::with_summarizer(config, Arc::new(FixedSummarizer)).run().await.unwrap();

        assert_eq!(stats, ProcessingStats { success: 2, failed: 0, total: 2 });
        let mut written = Vec::new();
        let mut entries = tokio::fs::read_dir(&output).await.unwrap();
        while let Some(entry) = entries.next_entry().await.unwrap() {
            written.push(entry.file_name().to_string_lossy().to_string());
        }
        written.sort();
        assert_eq!(written, vec!["paper.md.md", "paper.txt.md"]);

        tokio::fs::remove_dir_all(&root).await.unwrap();
    }
}
