//! 配置数据结构定义
//!
//! 定义应用程序的配置结构体和验证逻辑

use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

/// 主配置结构
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// HTTP 服务配置
    #[serde(default)]
    pub server: ServerConfig,
    /// 日志配置
    #[serde(default)]
    pub logging: LoggingConfig,
    /// 探测配置
    #[serde(default)]
    pub probe: ProbeConfig,
    /// 状态变化通知 webhook 配置
    #[serde(default)]
    pub webhook: WebhookConfig,
}

/// HTTP 服务配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    /// 绑定地址
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// 解析监听地址
    pub fn socket_addr(&self) -> Result<SocketAddr, String> {
        let ip: IpAddr = self
            .bind_address
            .parse()
            .map_err(|e| format!("无效的绑定地址 {}: {}", self.bind_address, e))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,
    /// 是否使用JSON格式
    #[serde(default)]
    pub json_format: bool,
    /// 日志文件路径（可选，设置后不再输出到控制台）
    #[serde(default)]
    pub file_path: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json_format: false,
            file_path: None,
        }
    }
}

/// 探测配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProbeConfig {
    /// 单次探测的执行超时（秒），与探测间隔无关
    #[serde(default = "default_timeout")]
    pub request_timeout_seconds: u64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            request_timeout_seconds: default_timeout(),
        }
    }
}

impl ProbeConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

/// webhook 配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WebhookConfig {
    /// webhook URL，为空时不发送通知
    #[serde(default = "default_webhook_url")]
    pub url: Option<String>,
    /// 消息字段名
    #[serde(default = "default_message_field_name")]
    pub message_field_name: String,
    /// 发送超时（秒）
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            url: default_webhook_url(),
            message_field_name: default_message_field_name(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl WebhookConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// 生效的 webhook URL，空字符串视为未配置
    pub fn effective_url(&self) -> Option<&str> {
        self.url.as_deref().filter(|url| !url.trim().is_empty())
    }
}

// 默认值函数
fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_timeout() -> u64 {
    5
}
fn default_webhook_url() -> Option<String> {
    Some("http://localhost:5050".to_string())
}
fn default_message_field_name() -> String {
    "message".to_string()
}

/// 配置验证函数
///
/// # 参数
/// * `config` - 要验证的配置
///
/// # 返回
/// * `Result<(), String>` - 验证结果，错误时返回错误信息
pub fn validate_config(config: &Config) -> Result<(), String> {
    if config.server.port == 0 {
        return Err("监听端口不能为0".to_string());
    }
    config.server.socket_addr()?;

    let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_log_levels.contains(&config.logging.level.as_str()) {
        return Err(format!(
            "无效的日志级别: {}，支持的级别: {:?}",
            config.logging.level, valid_log_levels
        ));
    }

    if config.probe.request_timeout_seconds == 0 {
        return Err("探测超时时间不能为0".to_string());
    }

    if let Some(url) = config.webhook.effective_url() {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(format!("webhook URL格式无效: {}", url));
        }
    }

    if config.webhook.message_field_name.trim().is_empty() {
        return Err("webhook 消息字段名不能为空".to_string());
    }

    if config.webhook.timeout_seconds == 0 {
        return Err("webhook 超时时间不能为0".to_string());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = Config::default();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.bind_address, "0.0.0.0");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.probe.request_timeout(), Duration::from_secs(5));
        assert_eq!(
            config.webhook.url.as_deref(),
            Some("http://localhost:5050")
        );
        assert_eq!(config.webhook.message_field_name, "message");
        assert_eq!(config.webhook.timeout(), Duration::from_secs(5));
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
[webhook]
message_field_name = "text"
"#,
        )
        .expect("解析失败");

        assert_eq!(config.webhook.message_field_name, "text");
        assert_eq!(config.webhook.timeout_seconds, 5);
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_config_validation_invalid_webhook_url() {
        let mut config = Config::default();
        config.webhook.url = Some("localhost:5050".to_string());

        let result = validate_config(&config);
        assert!(result.unwrap_err().contains("webhook URL格式无效"));
    }

    #[test]
    fn test_empty_webhook_url_disables_notification() {
        let mut config = Config::default();
        config.webhook.url = Some(String::new());

        assert!(config.webhook.effective_url().is_none());
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_config_validation_empty_field_name() {
        let mut config = Config::default();
        config.webhook.message_field_name = "  ".to_string();

        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_config_validation_zero_timeouts() {
        let mut config = Config::default();
        config.probe.request_timeout_seconds = 0;
        assert!(validate_config(&config)
            .unwrap_err()
            .contains("探测超时时间不能为0"));

        let mut config = Config::default();
        config.webhook.timeout_seconds = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = Config::default();
        config.logging.level = "verbose".to_string();

        assert!(validate_config(&config)
            .unwrap_err()
            .contains("无效的日志级别"));
    }

    #[test]
    fn test_server_socket_addr() {
        let mut server = ServerConfig::default();
        server.bind_address = "127.0.0.1".to_string();
        server.port = 9090;
        assert_eq!(
            server.socket_addr().unwrap(),
            "127.0.0.1:9090".parse::<SocketAddr>().unwrap()
        );

        server.bind_address = "not-an-ip".to_string();
        assert!(server.socket_addr().is_err());
    }
}
