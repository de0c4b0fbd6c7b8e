use anyhow::Result;
use paper_summarizer::{logger, App, Config};
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<()> {
    // 配置文件路径：第一个命令行参数，或 SUMMARIZER_CONFIG 环境变量
    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("SUMMARIZER_CONFIG").ok())
        .map(PathBuf::from);

    // 加载配置
    let config = Config::load(config_path.as_deref())?;

    // 初始化日志
    logger::init_with_verbose(config.verbose_logging);

    // 初始化并运行应用
    let stats = App::initialize(config)?.run().await?;

    if stats.failed > 0 {
        std::process::exit(1);
    }

    Ok(())
}
