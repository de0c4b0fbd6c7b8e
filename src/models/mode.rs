//! 总结模式与风格
//!
//! 纯配置枚举，只决定使用哪一个提示词模板

use serde::{Deserialize, Serialize};

/// 总结模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryMode {
    /// 简要
    Brief,
    /// 标准
    #[default]
    Standard,
    /// 详细
    Detailed,
}

impl SummaryMode {
    /// 获取显示名称
    pub fn name(self) -> &'static str {
        match self {
            SummaryMode::Brief => "简要模式",
            SummaryMode::Standard => "标准模式",
            SummaryMode::Detailed => "详细模式",
        }
    }

    /// 从字符串解析（英文标识或中文名称）
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "brief" | "简要" | "简要模式" => Some(SummaryMode::Brief),
            "standard" | "标准" | "标准模式" => Some(SummaryMode::Standard),
            "detailed" | "详细" | "详细模式" => Some(SummaryMode::Detailed),
            _ => None,
        }
    }
}

impl std::fmt::Display for SummaryMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// 总结风格
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryStyle {
    /// 学术模式
    #[default]
    Academic,
    /// 科普模式
    Popular,
}

impl SummaryStyle {
    pub fn name(self) -> &'static str {
        match self {
            SummaryStyle::Academic => "学术模式",
            SummaryStyle::Popular => "科普模式",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "academic" | "学术" | "学术模式" => Some(SummaryStyle::Academic),
            "popular" | "科普" | "科普模式" => Some(SummaryStyle::Popular),
            _ => None,
        }
    }
}

impl std::fmt::Display for SummaryStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// 失败分块在合并输入中的处理策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailedChunkPolicy {
    /// 保留空白占位（分块之间仍以空行分隔）
    #[default]
    Placeholder,
    /// 写入一行失败标注
    Annotate,
    /// 直接跳过
    Omit,
}

impl FailedChunkPolicy {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "placeholder" => Some(FailedChunkPolicy::Placeholder),
            "annotate" => Some(FailedChunkPolicy::Annotate),
            "omit" => Some(FailedChunkPolicy::Omit),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mode_from_both_names() {
        assert_eq!(SummaryMode::parse("brief"), Some(SummaryMode::Brief));
        assert_eq!(SummaryMode::parse("详细模式"), Some(SummaryMode::Detailed));
        assert_eq!(SummaryMode::parse(" 标准 "), Some(SummaryMode::Standard));
        assert_eq!(SummaryMode::parse("unknown"), None);
    }

    #[test]
    fn test_parse_style() {
        assert_eq!(SummaryStyle::parse("学术模式"), Some(SummaryStyle::Academic));
        assert_eq!(SummaryStyle::parse("popular"), Some(SummaryStyle::Popular));
        assert_eq!(SummaryStyle::default().to_string(), "学术模式");
    }

    #[test]
    fn test_policy_deserializes_from_snake_case() {
        #[derive(Deserialize)]
        struct Wrapper {
            policy: FailedChunkPolicy,
        }
        let w: Wrapper = toml::from_str("policy = \"annotate\"").unwrap();
        assert_eq!(w.policy, FailedChunkPolicy::Annotate);
    }
}
