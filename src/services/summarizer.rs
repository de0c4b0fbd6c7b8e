//! 远程总结能力的抽象
//!
//! 编排层只依赖这个 trait，测试中可以替换为确定性的桩实现。

use async_trait::async_trait;

use crate::error::SummarizerError;

/// 远程文本生成服务
///
/// 实现必须可以在多个并发任务间只读共享。
#[async_trait]
pub trait RemoteSummarizer: Send + Sync {
    /// 以 `prompt` 为指令处理 `text`，返回生成的文本
    async fn invoke(
        &self,
        prompt: &str,
        text: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String, SummarizerError>;
}
