use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::models::{FailedChunkPolicy, SummaryMode, SummaryStyle};
use crate::services::prompts::PromptSet;

/// 程序配置文件
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 单个文本块的最大字符数
    pub max_chunk_chars: usize,
    /// 每批最多处理的页数
    pub max_pages_per_batch: usize,
    /// 每篇文档最多处理的文本块数
    pub max_chunks: usize,
    /// 每篇文档最多处理的页数（不设置则不限制）
    pub max_pages: Option<usize>,
    /// 单篇文档内同时进行的远程调用数
    pub concurrency_limit: usize,
    /// 单次远程调用超时（秒）
    pub per_call_timeout_secs: u64,
    pub temperature: f32,
    pub max_tokens: u32,
    /// 同时处理的文档数量
    pub max_concurrent_documents: usize,
    pub mode: SummaryMode,
    pub style: SummaryStyle,
    /// 失败分块在合并输入中的处理方式
    pub failed_chunk_policy: FailedChunkPolicy,
    /// 是否在结果中附带失败分块明细
    pub collect_diagnostics: bool,
    /// 待处理文档目录
    pub input_folder: String,
    /// 总结输出目录
    pub output_folder: String,
    /// 失败分块记录文件
    pub diagnostics_file: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    pub prompts: PromptSet,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_chunk_chars: 4000,
            max_pages_per_batch: 50,
            max_chunks: 100,
            max_pages: None,
            concurrency_limit: 5,
            per_call_timeout_secs: 120,
            temperature: 0.7,
            max_tokens: 2000,
            max_concurrent_documents: 2,
            mode: SummaryMode::default(),
            style: SummaryStyle::default(),
            failed_chunk_policy: FailedChunkPolicy::default(),
            collect_diagnostics: false,
            input_folder: "input_docs".to_string(),
            output_folder: "output_summaries".to_string(),
            diagnostics_file: "chunk_failures.jsonl".to_string(),
            verbose_logging: false,
            llm_api_key: String::new(),
            llm_api_base_url: "https://api.openai.com/v1".to_string(),
            llm_model_name: "gpt-4o-mini".to_string(),
            prompts: PromptSet::default(),
        }
    }
}

/// 远程服务连接参数，构造后只读，所有任务共享
#[derive(Clone, Debug)]
pub struct LlmSettings {
    pub api_key: String,
    pub api_base_url: String,
    pub model_name: String,
}

impl Config {
    /// 默认配置 + 环境变量覆盖
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().apply_env()
    }

    /// 从 TOML 文件加载，再用环境变量覆盖
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let base = match path {
            Some(path) => Self::from_toml_file(path)?,
            None => Self::default(),
        };
        let config = base.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// 解析 TOML 文件
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|e| match e {
            ConfigError::TomlParseFailed { source, .. } => ConfigError::TomlParseFailed {
                path: path.display().to_string(),
                source,
            },
            other => other,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::TomlParseFailed {
            path: String::new(),
            source,
        })
    }

    fn apply_env(mut self) -> Result<Self, ConfigError> {
        env_parse("MAX_CHUNK_CHARS", &mut self.max_chunk_chars)?;
        env_parse("MAX_PAGES_PER_BATCH", &mut self.max_pages_per_batch)?;
        env_parse("MAX_CHUNKS", &mut self.max_chunks)?;
        if let Some(value) = env_value("MAX_PAGES") {
            self.max_pages = Some(parse_value("MAX_PAGES", &value)?);
        }
        env_parse("CONCURRENCY_LIMIT", &mut self.concurrency_limit)?;
        env_parse("PER_CALL_TIMEOUT_SECS", &mut self.per_call_timeout_secs)?;
        env_parse("TEMPERATURE", &mut self.temperature)?;
        env_parse("MAX_TOKENS", &mut self.max_tokens)?;
        env_parse("MAX_CONCURRENT_DOCUMENTS", &mut self.max_concurrent_documents)?;
        env_parse("COLLECT_DIAGNOSTICS", &mut self.collect_diagnostics)?;
        env_parse("VERBOSE_LOGGING", &mut self.verbose_logging)?;

        if let Some(value) = env_value("MODE") {
            self.mode = SummaryMode::parse(&value).ok_or_else(|| parse_error("MODE", &value, "SummaryMode"))?;
        }
        if let Some(value) = env_value("STYLE") {
            self.style = SummaryStyle::parse(&value).ok_or_else(|| parse_error("STYLE", &value, "SummaryStyle"))?;
        }
        if let Some(value) = env_value("FAILED_CHUNK_POLICY") {
            self.failed_chunk_policy = FailedChunkPolicy::parse(&value)
                .ok_or_else(|| parse_error("FAILED_CHUNK_POLICY", &value, "FailedChunkPolicy"))?;
        }

        self.input_folder = env_value("INPUT_FOLDER").unwrap_or(self.input_folder);
        self.output_folder = env_value("OUTPUT_FOLDER").unwrap_or(self.output_folder);
        self.diagnostics_file = env_value("DIAGNOSTICS_FILE").unwrap_or(self.diagnostics_file);
        self.llm_api_key = env_value("LLM_API_KEY").unwrap_or(self.llm_api_key);
        self.llm_api_base_url = env_value("LLM_API_BASE_URL").unwrap_or(self.llm_api_base_url);
        self.llm_model_name = env_value("LLM_MODEL_NAME").unwrap_or(self.llm_model_name);

        Ok(self)
    }

    /// 检查数值型配置
    pub fn validate(&self) -> Result<(), ConfigError> {
        let checks: [(&'static str, bool); 7] = [
            ("max_chunk_chars", self.max_chunk_chars > 0),
            ("max_pages_per_batch", self.max_pages_per_batch > 0),
            ("max_chunks", self.max_chunks > 0),
            ("concurrency_limit", self.concurrency_limit > 0),
            ("per_call_timeout_secs", self.per_call_timeout_secs > 0),
            ("max_tokens", self.max_tokens > 0),
            ("max_concurrent_documents", self.max_concurrent_documents > 0),
        ];
        if let Some((key, _)) = checks.iter().find(|(_, ok)| !ok) {
            return Err(ConfigError::NonPositive { key });
        }
        if self.max_pages == Some(0) {
            return Err(ConfigError::NonPositive { key: "max_pages" });
        }
        Ok(())
    }

    pub fn per_call_timeout(&self) -> Duration {
        Duration::from_secs(self.per_call_timeout_secs)
    }

    pub fn llm_settings(&self) -> LlmSettings {
        LlmSettings {
            api_key: self.llm_api_key.clone(),
            api_base_url: self.llm_api_base_url.clone(),
            model_name: self.llm_model_name.clone(),
        }
    }
}

fn env_value(var_name: &str) -> Option<String> {
    std::env::var(var_name).ok().filter(|v| !v.trim().is_empty())
}

fn env_parse<T: FromStr>(var_name: &str, target: &mut T) -> Result<(), ConfigError> {
    if let Some(value) = env_value(var_name) {
        *target = parse_value(var_name, &value)?;
    }
    Ok(())
}

fn parse_value<T: FromStr>(var_name: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| parse_error(var_name, value, std::any::type_name::<T>()))
}

fn parse_error(var_name: &str, value: &str, expected_type: &str) -> ConfigError {
    ConfigError::EnvVarParseFailed {
        var_name: var_name.to_string(),
        value: value.to_string(),
        expected_type: expected_type.to_string(),
    }
}
