//! 启动横幅、批次进度和最终统计的日志行

use tracing::info;

use crate::config::Config;

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 论文分块总结模式");
    info!("📊 同时处理文档数: {}", config.max_concurrent_documents);
    info!("📊 单篇文档最大并发调用: {}", config.concurrency_limit);
    info!(
        "✂️ 分块上限: {} 字符 / 每批 {} 页 / 最多 {} 块",
        config.max_chunk_chars, config.max_pages_per_batch, config.max_chunks
    );
    info!("📝 模式: {} | 风格: {}", config.mode, config.style);
    info!("{}", "=".repeat(60));
}

/// `max_concurrent` 即每轮同时处理的文档数
pub fn log_documents_loaded(total: usize, max_concurrent: usize) {
    info!("✓ 找到 {} 个待处理的文档", total);
    info!("📋 将以每批 {} 个的方式处理", max_concurrent);
}

/// `start`/`end` 为 1 基的文档序号
pub fn log_batch_start(
    batch_num: usize,
    total_batches: usize,
    start: usize,
    end: usize,
    total: usize,
) {
    info!("{}", "=".repeat(60));
    info!("📦 开始处理第 {}/{} 批", batch_num, total_batches);
    info!("📄 本批文档: {}-{} / 共 {} 个", start, end, total);
    info!("{}", "=".repeat(60));
}

pub fn log_batch_complete(batch_num: usize, success: usize, total: usize) {
    info!("{}", "─".repeat(60));
    info!("✓ 第 {} 批完成: 成功 {}/{}", batch_num, success, total);
    info!("{}", "─".repeat(60));
}

/// 汇总全部文档的成功/失败数，并给出总结所在目录
pub fn print_final_stats(success: usize, failed: usize, total: usize, output_folder: &str) {
    info!("{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", success, total);
    info!("❌ 失败: {}", failed);
    info!("{}", "=".repeat(60));
    info!("总结已保存至: {}", output_folder);
}

/// 按字符截断，超出部分以 `...` 结尾
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
