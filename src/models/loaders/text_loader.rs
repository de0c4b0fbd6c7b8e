//! 纯文本文档加载
//!
//! 二进制格式（PDF、Word）的文本提取由外部工具完成，例如
//! `pdftotext` 输出的文本用换页符 `\x0C` 分隔页面。

use crate::models::document::{Document, Page};
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;

/// 页面分隔符
pub const PAGE_SEPARATOR: char = '\u{000C}';

/// 支持的扩展名
const SUPPORTED_EXTENSIONS: &[&str] = &["txt", "md"];

/// 按换页符切分页面，空页保留
pub fn split_pages(content: &str) -> Vec<Page> {
    content
        .split(PAGE_SEPARATOR)
        .enumerate()
        .map(|(index, text)| Page::new(index, text))
        .collect()
}

/// 从文本文件加载文档
pub async fn load_document(path: &Path) -> Result<Document> {
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("无法读取文档: {}", path.display()))?;

    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "untitled".to_string());

    Ok(Document {
        name,
        file_path: Some(path.to_path_buf()),
        pages: split_pages(&content),
    })
}

/// 加载文件夹中所有支持的文档（按文件名排序）
pub async fn load_all_documents(folder_path: &str) -> Result<Vec<Document>> {
    let folder = PathBuf::from(folder_path);

    if !folder.exists() {
        anyhow::bail!("文件夹不存在: {}", folder_path);
    }

    let mut paths = Vec::new();
    let mut entries = fs::read_dir(&folder)
        .await
        .with_context(|| format!("无法读取文件夹: {}", folder_path))?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let supported = path
            .extension()
            .and_then(|s| s.to_str())
            .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext))
            .unwrap_or(false);
        if supported {
            paths.push(path);
        }
    }
    paths.sort();

    let mut documents = Vec::new();
    for path in paths {
        tracing::info!(
            "正在加载: {}",
            path.file_name().unwrap_or_default().to_string_lossy()
        );

        match load_document(&path).await {
            Ok(document) => {
                tracing::info!("成功加载 {} 页", document.total_pages());
                documents.push(document);
            }
            Err(e) => {
                tracing::warn!("加载文件失败 {}: {}", path.display(), e);
            }
        }
    }

    disambiguate_names(&mut documents);
    Ok(documents)
}

/// 同名（文件名主干相同）的文档改用完整文件名，避免输出文件互相覆盖
fn disambiguate_names(documents: &mut [Document]) {
    let mut stem_counts: HashMap<String, usize> = HashMap::new();
    for document in documents.iter() {
        *stem_counts.entry(document.name.clone()).or_default() += 1;
    }

    for document in documents.iter_mut() {
        if stem_counts.get(&document.name).copied().unwrap_or(0) < 2 {
            continue;
        }
        if let Some(file_name) = document.file_path.as_deref().and_then(Path::file_name) {
            let renamed = file_name.to_string_lossy().to_string();
            tracing::warn!("文档名 {} 重复，改用 {}", document.name, renamed);
            document.name = renamed;
        }
    }
}
