//! 命令处理逻辑
//!
//! 实现各个CLI子命令

use crate::app::App;
use crate::cli::args::{Args, Commands};
use crate::config::{Config, ConfigLoader, TomlConfigLoader};
use crate::error::{ApiVitalsError, ConfigError, Result};
use async_trait::async_trait;
use std::path::Path;
use tokio::net::TcpListener;
use tracing::info;

/// 命令处理器trait
#[async_trait]
pub trait Command: Send + Sync {
    /// 执行命令
    async fn execute(&self, args: &Args) -> Result<()>;
}

/// 服务命令
pub struct ServeCommand {
    config: Config,
}

impl ServeCommand {
    /// # 参数
    /// * `config` - 已加载的配置，命令行覆盖项在执行时应用
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    fn effective_config(&self, args: &Args) -> Config {
        let mut config = self.config.clone();
        if let Commands::Serve { bind, port } = &args.command {
            if let Some(bind) = bind {
                config.server.bind_address = bind.clone();
            }
            if let Some(port) = port {
                config.server.port = *port;
            }
        }
        config
    }
}

#[async_trait]
impl Command for ServeCommand {
    async fn execute(&self, args: &Args) -> Result<()> {
        let config = self.effective_config(args);
        let addr = config
            .server
            .socket_addr()
            .map_err(|e| ApiVitalsError::Config(ConfigError::ValidationError(e)))?;

        let app = App::build(&config)?;
        let listener = TcpListener::bind(addr).await?;
        info!("{} v{} 开始服务", crate::APP_NAME, crate::VERSION);

        app.run(listener, crate::web::shutdown_signal()).await
    }
}

/// 验证命令
pub struct ValidateCommand;

#[async_trait]
impl Command for ValidateCommand {
    async fn execute(&self, args: &Args) -> Result<()> {
        if let Commands::Validate {
            config_path,
            verbose,
        } = &args.command
        {
            let config_file = config_path
                .clone()
                .unwrap_or_else(|| args.get_config_path());

            self.validate_config_file(&config_file, *verbose).await
        } else {
            Ok(())
        }
    }
}

impl ValidateCommand {
    /// 验证配置文件
    async fn validate_config_file(&self, config_path: &Path, verbose: bool) -> Result<()> {
        println!("验证配置文件: {}", config_path.display());

        let loader = TomlConfigLoader::new(true);
        let config = loader.load_from_file(config_path).await?;

        if verbose {
            println!("配置验证通过！");
            println!("服务配置:");
            println!("  监听地址: {}:{}", config.server.bind_address, config.server.port);
            println!("日志配置:");
            println!("  日志级别: {}", config.logging.level);
            println!("  JSON格式: {}", config.logging.json_format);
            println!("探测配置:");
            println!("  请求超时: {}秒", config.probe.request_timeout_seconds);
            println!("通知配置:");
            match config.webhook.effective_url() {
                Some(url) => {
                    println!("  webhook URL: {}", url);
                    println!("  消息字段名: {}", config.webhook.message_field_name);
                    println!("  发送超时: {}秒", config.webhook.timeout_seconds);
                }
                None => println!("  webhook: 未启用"),
            }
        } else {
            println!("✓ 配置文件验证通过");
        }

        Ok(())
    }
}
