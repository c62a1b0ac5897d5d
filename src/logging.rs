//! 日志系统模块
//!
//! 基于 tracing 的结构化日志，log crate 的记录通过 LogTracer 桥接过来。

use crate::config::LoggingConfig;
use log::LevelFilter;
use std::collections::HashMap;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::OnceLock;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::{fmt, prelude::*, registry, EnvFilter, Layer};

/// 全局初始化结果，进程内只初始化一次
static LOGGING_INIT: OnceLock<Result<(), String>> = OnceLock::new();

/// 日志配置结构
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// 日志级别
    pub level: LevelFilter,
    /// 日志文件路径（可选）
    pub file_path: Option<PathBuf>,
    /// 是否输出到控制台
    pub console: bool,
    /// 是否使用JSON格式
    pub json_format: bool,
    /// 模块级别日志控制
    pub module_levels: HashMap<String, LevelFilter>,
}

impl Default for LogConfig {
    fn default() -> Self {
        let mut module_levels = HashMap::new();
        // 依赖库的连接细节默认不输出
        module_levels.insert("hyper".to_string(), LevelFilter::Warn);
        module_levels.insert("reqwest".to_string(), LevelFilter::Warn);

        Self {
            level: LevelFilter::Info,
            file_path: None,
            console: true,
            json_format: false,
            module_levels,
        }
    }
}

impl From<&LoggingConfig> for LogConfig {
    fn from(config: &LoggingConfig) -> Self {
        let level = LevelFilter::from_str(&config.level).unwrap_or(LevelFilter::Info);
        Self {
            level,
            file_path: config.file_path.clone(),
            console: config.file_path.is_none(),
            json_format: config.json_format,
            ..Default::default()
        }
    }
}

/// 日志系统管理器
pub struct LoggingSystem;

impl LoggingSystem {
    /// 初始化日志系统
    ///
    /// 重复调用返回第一次初始化的结果，不会重新安装 subscriber。
    ///
    /// # 参数
    /// * `config` - 日志配置
    ///
    /// # 返回
    /// * `anyhow::Result<()>` - 初始化结果
    pub fn setup_logging(config: &LogConfig) -> anyhow::Result<()> {
        LOGGING_INIT
            .get_or_init(|| Self::perform_initialization(config).map_err(|e| e.to_string()))
            .as_ref()
            .map(|_| ())
            .map_err(|e| anyhow::anyhow!("日志系统初始化失败: {}", e))
    }

    /// 检查日志系统是否已初始化
    pub fn is_initialized() -> bool {
        matches!(LOGGING_INIT.get(), Some(Ok(())))
    }

    fn perform_initialization(config: &LogConfig) -> anyhow::Result<()> {
        // log crate 到 tracing 的桥接，单独安装，subscriber 不再重复安装
        Self::init_log_tracer();

        let env_filter = Self::build_filter(config);

        let result = match (&config.file_path, config.console) {
            (Some(file_path), false) => {
                if let Some(parent) = file_path.parent() {
                    if !parent.as_os_str().is_empty() {
                        std::fs::create_dir_all(parent)
                            .map_err(|e| anyhow::anyhow!("创建日志目录失败: {}", e))?;
                    }
                }
                let file = std::fs::OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(file_path)
                    .map_err(|e| anyhow::anyhow!("创建日志文件失败: {}", e))?;
                let file_layer = fmt::layer()
                    .with_writer(std::sync::Mutex::new(file))
                    .with_ansi(false)
                    .with_timer(fmt::time::ChronoUtc::rfc_3339());
                let file_layer = if config.json_format {
                    file_layer.json().boxed()
                } else {
                    file_layer.boxed()
                };
                tracing::subscriber::set_global_default(
                    registry().with(env_filter).with(file_layer),
                )
            }
            _ => {
                let fmt_layer = if config.json_format {
                    fmt::layer()
                        .json()
                        .with_timer(fmt::time::ChronoUtc::rfc_3339())
                        .with_file(true)
                        .with_line_number(true)
                        .boxed()
                } else {
                    fmt::layer()
                        .with_timer(fmt::time::ChronoUtc::rfc_3339())
                        .with_ansi(true)
                        .with_target(true)
                        .boxed()
                };
                tracing::subscriber::set_global_default(registry().with(env_filter).with(fmt_layer))
            }
        };

        match result {
            Ok(()) => {
                tracing::info!("日志系统初始化完成");
                tracing::debug!("日志配置: {:?}", config);
                Ok(())
            }
            // 测试进程里可能已有其他 subscriber
            Err(e) if e.to_string().contains("already been set") => Ok(()),
            Err(e) => Err(anyhow::anyhow!("tracing subscriber初始化失败: {}", e)),
        }
    }

    /// 安装 LogTracer，已有 logger 时忽略
    fn init_log_tracer() {
        static LOG_TRACER_INIT: OnceLock<()> = OnceLock::new();
        LOG_TRACER_INIT.get_or_init(|| {
            let _ = tracing_log::LogTracer::init();
        });
    }

    /// 构建过滤器，RUST_LOG 优先于配置
    fn build_filter(config: &LogConfig) -> EnvFilter {
        let mut filter = EnvFilter::builder()
            .with_default_directive(Self::level_directive(config.level))
            .from_env_lossy();

        for (module, level) in &config.module_levels {
            if let Ok(directive) = format!("{}={}", module, Self::level_to_string(*level)).parse() {
                filter = filter.add_directive(directive);
            }
        }
        filter
    }

    fn level_directive(level: LevelFilter) -> Directive {
        let level = match level {
            LevelFilter::Off => tracing_subscriber::filter::LevelFilter::OFF,
            LevelFilter::Error => tracing_subscriber::filter::LevelFilter::ERROR,
            LevelFilter::Warn => tracing_subscriber::filter::LevelFilter::WARN,
            LevelFilter::Info => tracing_subscriber::filter::LevelFilter::INFO,
            LevelFilter::Debug => tracing_subscriber::filter::LevelFilter::DEBUG,
            LevelFilter::Trace => tracing_subscriber::filter::LevelFilter::TRACE,
        };
        Directive::from(level)
    }

    fn level_to_string(level: LevelFilter) -> &'static str {
        match level {
            LevelFilter::Off => "off",
            LevelFilter::Error => "error",
            LevelFilter::Warn => "warn",
            LevelFilter::Info => "info",
            LevelFilter::Debug => "debug",
            LevelFilter::Trace => "trace",
        }
    }
}
