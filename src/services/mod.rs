pub mod llm_service;
pub mod output_writer;
pub mod prompts;
pub mod summarizer;

pub use llm_service::LlmService;
pub use output_writer::OutputWriter;
pub use prompts::PromptSet;
pub use summarizer::RemoteSummarizer;
