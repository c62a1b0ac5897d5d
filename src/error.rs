//! 错误处理模块
//!
//! 定义应用程序的统一错误类型

use thiserror::Error;

/// API Vitals 应用程序的主要错误类型
#[derive(Error, Debug)]
pub enum ApiVitalsError {
    /// 配置相关错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    /// 调度引擎相关错误
    #[error("调度引擎错误: {0}")]
    Engine(#[from] EngineError),

    /// 存储相关错误
    #[error("存储错误: {0}")]
    Store(#[from] StoreError),

    /// 通知相关错误
    #[error("通知错误: {0}")]
    Notification(#[from] NotificationError),

    /// IO错误
    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),

    /// 其他错误
    #[error("其他错误: {0}")]
    Other(#[from] anyhow::Error),
}

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 配置文件解析错误
    #[error("配置文件解析失败: {0}")]
    ParseError(String),

    /// 配置验证错误
    #[error("配置验证失败: {0}")]
    ValidationError(String),

    /// 配置文件不存在
    #[error("配置文件不存在: {path}")]
    FileNotFound { path: String },

    /// 环境变量替换错误
    #[error("环境变量替换失败: {var}")]
    EnvVarError { var: String },
}

/// 存储错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// 记录不存在
    #[error("记录不存在")]
    NotFound,

    /// 底层存储失败
    #[error("存储后端失败: {0}")]
    Backend(String),
}

/// 调度引擎错误类型
///
/// `start`/`stop` 只会返回这些错误；探测失败以事件状态记录，不在此出现。
#[derive(Error, Debug)]
pub enum EngineError {
    /// 健康检查不存在
    #[error("健康检查不存在: {0}")]
    NotFound(i64),

    /// 健康检查已在运行
    #[error("健康检查 {0} 已在运行")]
    AlreadyRunning(i64),

    /// 健康检查未运行
    #[error("健康检查 {0} 尚未启动")]
    NotRunning(i64),

    /// 健康检查定义无效
    #[error("健康检查定义无效: {0}")]
    Validation(String),

    /// 读取定义失败
    #[error("读取健康检查失败: {0}")]
    Store(StoreError),
}

impl From<StoreError> for EngineError {
    fn from(error: StoreError) -> Self {
        EngineError::Store(error)
    }
}

/// 通知错误类型
#[derive(Error, Debug)]
pub enum NotificationError {
    /// 发送失败
    #[error("通知发送失败: {0}")]
    SendError(String),

    /// webhook 返回非成功状态码
    #[error("webhook 返回状态码 {0}")]
    UnexpectedStatus(u16),

    /// 配置错误
    #[error("通知配置错误: {0}")]
    ConfigError(String),
}

/// 结果类型别名
pub type Result<T> = std::result::Result<T, ApiVitalsError>;
