//! 诊所排程工具主程序
//!
//! 读取 JSON 排程草稿，运行排程引擎，并将结果以 JSON 输出到标准输出。

mod config;
mod draft;

use anyhow::{Context, Result};
use clap::Parser;
use crate::config::SchedulerConfig;
use crate::draft::{DraftOptions, SchedulingDraft};
use tokio::io::AsyncReadExt;
use tracing::{error, info};

/// 排程工具命令行参数
#[derive(Parser, Debug)]
#[command(name = "clinic-scheduler")]
#[command(about = "多次治疗排程：展开疗程与套餐场次并自动推算日期")]
struct Args {
    /// 排程草稿文件路径，`-` 表示标准输入
    #[arg(short, long, default_value = "-")]
    input: String,

    /// 配置文件路径
    #[arg(short, long)]
    config: Option<String>,

    /// 日志级别，覆盖配置文件
    #[arg(short, long)]
    log_level: Option<String>,

    /// 移除不再属于当前选择的场次
    #[arg(long)]
    prune: bool,

    /// 输出提交前校验结果
    #[arg(long)]
    validate: bool,

    /// 格式化输出
    #[arg(long)]
    pretty: bool,

    /// 打印当前生效的配置后退出
    #[arg(long)]
    dump_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = SchedulerConfig::load(args.config.as_deref())
        .context("Failed to load configuration")?;

    // 初始化日志，输出到标准错误以免混入结果
    let log_level = args.log_level.as_deref().unwrap_or(&config.logging.level);
    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_writer(std::io::stderr)
        .init();

    match args.config.as_deref() {
        Some(path) => info!("Configuration loaded successfully from: {}", path),
        None => info!("No configuration file given, using defaults and environment"),
    }

    if args.dump_config {
        println!("{}", config.to_toml()?);
        return Ok(());
    }

    info!("启动排程工具...");
    info!("  默认间隔: {}", config.scheduling.interval_text);
    info!("  默认时长: {} 分钟", config.scheduling.session_minutes);

    let text = read_input(&args.input).await?;
    let draft = match SchedulingDraft::from_json(&text) {
        Ok(draft) => draft,
        Err(e) => {
            error!("草稿解析失败: {}", e);
            return Err(e).context(format!("Invalid scheduling draft: {}", args.input));
        }
    };

    let outcome = draft.run(
        config.scheduling.clone(),
        DraftOptions {
            prune: args.prune,
            validate: args.validate,
        },
    );
    info!(
        "Scheduled {}/{} sessions across {} groups",
        outcome.overview.scheduled_sessions,
        outcome.overview.total_sessions,
        outcome.overview.groups
    );

    let output = if args.pretty {
        serde_json::to_string_pretty(&outcome)?
    } else {
        serde_json::to_string(&outcome)?
    };
    println!("{}", output);

    Ok(())
}

/// 读取草稿文本
async fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut text = String::new();
        tokio::io::stdin()
            .read_to_string(&mut text)
            .await
            .context("Failed to read draft from stdin")?;
        Ok(text)
    } else {
        tokio::fs::read_to_string(input)
            .await
            .with_context(|| format!("Failed to read draft file: {}", input))
    }
}
