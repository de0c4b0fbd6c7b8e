//! 文档与页面
//!
//! 页面由外部提取器产生，之后只读

use std::path::PathBuf;

/// 页面（0 基索引）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub index: usize,
    pub text: String,
}

impl Page {
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
        }
    }
}

/// 待总结的文档
#[derive(Debug, Clone)]
pub struct Document {
    /// 文档名称（用于日志和输出文件名）
    pub name: String,
    /// 源文件路径
    pub file_path: Option<PathBuf>,
    /// 按物理顺序排列的页面
    pub pages: Vec<Page>,
}

impl Document {
    /// 从页面文本创建文档，索引按顺序分配
    pub fn from_page_texts<I, S>(name: impl Into<String>, texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let pages = texts
            .into_iter()
            .enumerate()
            .map(|(index, text)| Page::new(index, text))
            .collect();

        Self {
            name: name.into(),
            file_path: None,
            pages,
        }
    }

    pub fn total_pages(&self) -> usize {
        self.pages.len()
    }
}
