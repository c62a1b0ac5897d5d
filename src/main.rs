//! API Vitals 主程序入口

use anyhow::{Context, Result};
use api_vitals::cli::args::{Args, Commands};
use api_vitals::cli::commands::{Command, ServeCommand, ValidateCommand};
use api_vitals::config::{Config, TomlConfigLoader};
use api_vitals::logging::{LogConfig, LoggingSystem};
use clap::Parser;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // 解析命令行参数
    let args = Args::parse();
    let config_path = args.get_config_path();

    // validate 自己加载配置文件，日志使用默认配置
    let config = match &args.command {
        Commands::Serve { .. } => TomlConfigLoader::new(true)
            .load_or_default(&config_path)
            .await
            .with_context(|| format!("加载配置文件失败: {}", config_path.display()))?,
        Commands::Validate { .. } => Config::default(),
    };

    // 初始化日志系统
    let mut log_config = LogConfig::from(&config.logging);
    if let Some(level) = args.log_level {
        log_config.level = level.into();
    }
    LoggingSystem::setup_logging(&log_config).context("初始化日志系统失败")?;

    info!("{} v{} 启动", api_vitals::APP_NAME, api_vitals::VERSION);
    if matches!(args.command, Commands::Serve { .. }) && !config_path.exists() {
        warn!("配置文件不存在: {}，使用默认配置", config_path.display());
    }

    // 执行命令
    let result = match &args.command {
        Commands::Serve { .. } => ServeCommand::new(config).execute(&args).await,
        Commands::Validate { .. } => ValidateCommand.execute(&args).await,
    };

    if let Err(e) = result {
        error!("命令执行失败: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
