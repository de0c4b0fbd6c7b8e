//! LLM 服务 - 业务能力层
//!
//! 只负责"把一段文本交给模型处理"这一能力，不关心分块和合并流程
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 支持自定义 API 端点和模型
//! - 兼容 OpenAI API 的服务（如 Azure, Gemini, Doubao 等）

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::LlmSettings;
use crate::error::SummarizerError;
use crate::services::summarizer::RemoteSummarizer;

/// LLM 服务
///
/// 职责：
/// - 调用 chat completions 接口完成单次总结
/// - 把 SDK 错误归类为超时以外的三类远程错误
/// - 构造后只读，可被多个分块任务共享
pub struct LlmService {
    client: Client<OpenAIConfig>,
    model_name: String,
}

impl LlmService {
    /// 创建新的 LLM 服务
    pub fn new(settings: &LlmSettings) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(&settings.api_key)
            .with_api_base(&settings.api_base_url);

        Self {
            client: Client::with_config(openai_config),
            model_name: settings.model_name.clone(),
        }
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    async fn send_to_llm(
        &self,
        system_message: &str,
        user_message: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String, OpenAIError> {
        debug!("调用 LLM API，模型: {}", self.model_name);
        debug!("用户消息长度: {} 字符", user_message.chars().count());

        let system_msg = ChatCompletionRequestSystemMessageArgs::default()
            .content(system_message)
            .build()?;
        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(user_message)
            .build()?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(vec![
                ChatCompletionRequestMessage::System(system_msg),
                ChatCompletionRequestMessage::User(user_msg),
            ])
            .temperature(temperature)
            .max_tokens(max_tokens)
            .build()?;

        let response = self.client.chat().create(request).await?;

        debug!("LLM API 调用成功");

        Ok(response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .unwrap_or_default())
    }
}

#[async_trait]
impl RemoteSummarizer for LlmService {
    async fn invoke(
        &self,
        prompt: &str,
        text: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String, SummarizerError> {
        let content = self
            .send_to_llm(prompt, text, temperature, max_tokens)
            .await
            .map_err(|e| {
                warn!("LLM API 调用失败: {}", e);
                classify_error(&e)
            })?;

        let content = content.trim();
        if content.is_empty() {
            return Err(SummarizerError::MalformedResponse(format!(
                "LLM 返回内容为空 (模型: {})",
                self.model_name
            )));
        }

        Ok(content.to_string())
    }
}

/// 把 SDK 错误归入远程调用错误分类
fn classify_error(err: &OpenAIError) -> SummarizerError {
    match err {
        OpenAIError::ApiError(api) => {
            let message = api.to_string();
            if is_rate_limit_message(&message) {
                SummarizerError::RateLimited(message)
            } else {
                SummarizerError::Transport(message)
            }
        }
        OpenAIError::JSONDeserialize(..) => SummarizerError::MalformedResponse(err.to_string()),
        other => {
            let message = other.to_string();
            if is_rate_limit_message(&message) {
                SummarizerError::RateLimited(message)
            } else {
                SummarizerError::Transport(message)
            }
        }
    }
}

fn is_rate_limit_message(message: &str) -> bool {
    let lower = message.to_lowercase();
    lower.contains("rate limit") || lower.contains("rate_limit") || lower.contains("429")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_service() -> LlmService {
        LlmService::new(&LlmSettings {
            api_key: std::env::var("LLM_API_KEY").unwrap_or_default(),
            api_base_url: std::env::var("LLM_API_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            model_name: std::env::var("LLM_MODEL_NAME").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
        })
    }

    #[test]
    fn test_rate_limit_detection() {
        assert!(is_rate_limit_message("Rate limit reached for requests"));
        assert!(is_rate_limit_message("code: rate_limit_exceeded"));
        assert!(is_rate_limit_message("HTTP 429 Too Many Requests"));
        assert!(!is_rate_limit_message("invalid api key"));
    }

    #[test]
    fn test_service_keeps_model_name() {
        let service = LlmService::new(&LlmSettings {
            api_key: "test".to_string(),
            api_base_url: "http://localhost:1/v1".to_string(),
            model_name: "test-model".to_string(),
        });
        assert_eq!(service.model_name(), "test-model");
    }

    /// 测试真实的总结调用
    ///
    /// 运行方式：
    /// ```bash
    /// LLM_API_KEY=... cargo test test_invoke_live -- --ignored --nocapture
    /// ```
    #[tokio::test]
    #[ignore]
    async fn test_invoke_live() {
        let _ = tracing_subscriber::fmt::try_init();

        let service = create_test_service();
        let result = service
            .invoke(
                "请用一句话总结下面的内容。",
                "Transformer 模型完全基于注意力机制，去掉了循环和卷积结构，在机器翻译任务上取得了更好的效果，同时训练更快。",
                0.3,
                256,
            )
            .await;

        match result {
            Ok(response) => {
                println!("LLM 响应: {}", response);
                assert!(!response.is_empty());
            }
            Err(e) => panic!("测试失败: {}", e),
        }
    }

    #[tokio::test]
    #[ignore]
    async fn test_unreachable_endpoint_is_transport_error() {
        let service = LlmService::new(&LlmSettings {
            api_key: "test".to_string(),
            api_base_url: "http://127.0.0.1:9/v1".to_string(),
            model_name: "test-model".to_string(),
        });

        let err = service.invoke("p", "t", 0.1, 16).await.unwrap_err();
        assert!(matches!(err, SummarizerError::Transport(_)), "{:?}", err);
    }
}
