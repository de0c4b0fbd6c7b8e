//! 提示词模板
//!
//! 模板内容对流水线是不透明的字符串，这里只负责按模式/风格选择。

use serde::Deserialize;

use crate::models::{SummaryMode, SummaryStyle};

/// 提示词集合
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PromptSet {
    pub brief: String,
    pub standard: String,
    pub detailed: String,
    /// 科普风格统一使用的提示词
    pub popular: String,
    /// reduce 阶段的合并提示词
    pub merge: String,
}

impl Default for PromptSet {
    fn default() -> Self {
        Self {
            brief: "你是一名学术论文阅读助手。请用简洁的几句话概括以下论文片段的核心问题、方法和结论，不要展开细节。".to_string(),
            standard: "你是一名学术论文阅读助手。请总结以下论文片段，包括研究背景、研究目标、主要方法、创新点、实验结果和结论，使用 Markdown 格式输出。".to_string(),
            detailed: "你是一名学术论文阅读助手。请详细总结以下论文片段：逐条列出研究背景、核心问题、技术方案与具体实现、创新点、实验设置、性能指标、主要结论和研究局限，保留关键数据，使用 Markdown 格式输出。".to_string(),
            popular: "你是一名科普作者。请用通俗易懂的语言向非专业读者解释以下论文片段讲了什么、为什么重要，避免使用专业术语，必要时使用类比。".to_string(),
            merge: "以下是同一篇论文按顺序分段得到的多个部分总结。请把它们合并成一篇完整、连贯、不重复的总结，保持原有的结构和顺序，使用 Markdown 格式输出。".to_string(),
        }
    }
}

impl PromptSet {
    /// 选择 map 阶段的提示词
    ///
    /// 学术风格按模式选择；科普风格不区分模式。
    pub fn for_chunk(&self, mode: SummaryMode, style: SummaryStyle) -> &str {
        match style {
            SummaryStyle::Popular => &self.popular,
            SummaryStyle::Academic => match mode {
                SummaryMode::Brief => &self.brief,
                SummaryMode::Standard => &self.standard,
                SummaryMode::Detailed => &self.detailed,
            },
        }
    }

    pub fn for_merge(&self) -> &str {
        &self.merge
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_academic_style_selects_by_mode() {
        let prompts = PromptSet::default();
        assert_eq!(
            prompts.for_chunk(SummaryMode::Brief, SummaryStyle::Academic),
            prompts.brief
        );
        assert_eq!(
            prompts.for_chunk(SummaryMode::Detailed, SummaryStyle::Academic),
            prompts.detailed
        );
    }

    #[test]
    fn test_popular_style_ignores_mode() {
        let prompts = PromptSet::default();
        for mode in [SummaryMode::Brief, SummaryMode::Standard, SummaryMode::Detailed] {
            assert_eq!(prompts.for_chunk(mode, SummaryStyle::Popular), prompts.popular);
        }
    }
}
