//! 结果写入服务 - 业务能力层
//!
//! 只负责把总结和失败记录落盘，不关心流程

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::models::{ChunkDiagnostic, SummaryReport};

/// 结果写入服务
///
/// 职责：
/// - 每篇文档的合并总结写成 `<name>.md`
/// - 失败分块以 JSON Lines 追加到诊断文件
pub struct OutputWriter {
    output_folder: PathBuf,
    diagnostics_path: PathBuf,
}

#[derive(Serialize)]
struct DiagnosticLine<'a> {
    document: &'a str,
    timestamp: String,
    #[serde(flatten)]
    diagnostic: &'a ChunkDiagnostic,
}

impl OutputWriter {
    pub fn new(output_folder: impl Into<PathBuf>, diagnostics_path: impl Into<PathBuf>) -> Self {
        Self {
            output_folder: output_folder.into(),
            diagnostics_path: diagnostics_path.into(),
        }
    }

    /// 写入合并总结，返回文件路径
    pub async fn write_summary(&self, document: &str, report: &SummaryReport) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_folder)
            .await
            .with_context(|| format!("无法创建输出目录: {}", self.output_folder.display()))?;

        let path = self.output_folder.join(format!("{}.md", document));
        debug!(
            "写入总结: {} | 长度: {} 字符",
            path.display(),
            report.summary.text.chars().count()
        );

        fs::write(&path, report.summary.text.as_bytes())
            .await
            .with_context(|| format!("无法写入总结文件: {}", path.display()))?;

        Ok(path)
    }

    /// 追加失败分块记录
    pub async fn append_diagnostics(&self, document: &str, diagnostics: &[ChunkDiagnostic]) -> Result<()> {
        if diagnostics.is_empty() {
            return Ok(());
        }

        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let mut lines = String::new();
        for diagnostic in diagnostics {
            let line = DiagnosticLine {
                document,
                timestamp: timestamp.clone(),
                diagnostic,
            };
            lines.push_str(&serde_json::to_string(&line)?);
            lines.push('\n');
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.diagnostics_path)
            .await
            .with_context(|| format!("无法打开诊断文件: {}", self.diagnostics_path.display()))?;
        file.write_all(lines.as_bytes()).await?;

        Ok(())
    }

    pub fn diagnostics_path(&self) -> &Path {
        &self.diagnostics_path
    }
}
