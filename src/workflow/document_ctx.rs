//! 文档处理上下文
//!
//! 封装"我正在处理第几篇文档"这一信息

use std::fmt::Display;

/// 文档处理上下文
#[derive(Debug, Clone)]
pub struct DocumentCtx {
    /// 文档名称
    pub name: String,

    /// 文档索引（从1开始，仅用于日志显示）
    pub document_index: usize,
}

impl DocumentCtx {
    pub fn new(name: impl Into<String>, document_index: usize) -> Self {
        Self {
            name: name.into(),
            document_index,
        }
    }
}

impl Display for DocumentCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[文档 {} {}]", self.document_index, self.name)
    }
}
