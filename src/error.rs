use std::time::Duration;

use thiserror::Error;

/// 远程总结调用错误
///
/// 单个分块的调用失败只会变成一个失败标记，不会中断其他分块。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SummarizerError {
    /// 调用超时
    #[error("远程调用超时 (限制: {0:?})")]
    Timeout(Duration),
    /// 请求频率限制
    #[error("远程服务请求频率限制: {0}")]
    RateLimited(String),
    /// 网络传输失败
    #[error("网络传输失败: {0}")]
    Transport(String),
    /// 返回内容无法使用
    #[error("远程服务返回格式异常: {0}")]
    MalformedResponse(String),
}

/// 文档级流水线错误
///
/// 只有这些错误会让整个文档进入 Failed 状态。
#[derive(Debug, Error)]
pub enum PipelineError {
    /// 文档没有产生任何分块
    #[error("文档 {document} 没有可总结的文本")]
    EmptyDocument { document: String },
    /// 合并阶段收到空的分块总结列表
    #[error("没有可合并的分块总结")]
    NothingToMerge,
    /// 所有分块都失败，不再发起合并调用
    #[error("全部 {total} 个分块总结失败")]
    AllChunksFailed { total: usize },
    /// 最终合并调用失败
    #[error("合并总结失败: {0}")]
    MergeFailure(#[source] SummarizerError),
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 数值必须为正
    #[error("配置项 {key} 必须大于 0")]
    NonPositive { key: &'static str },
    /// 配置文件读取失败
    #[error("读取配置文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

impl SummarizerError {
    /// 是否为超时
    pub fn is_timeout(&self) -> bool {
        matches!(self, SummarizerError::Timeout(_))
    }
}
