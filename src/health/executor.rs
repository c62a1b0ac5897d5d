//! HTTP探测执行器实现
//!
//! 对一个探测目标发起单次HTTP请求，并把结果归约为 [`ProbeOutcome`]

use crate::error::{ApiVitalsError, Result};
use crate::health::definition::ProbeTarget;
use crate::health::result::{ProbeFailure, ProbeOutcome};
use async_trait::async_trait;
use reqwest::Client;
use std::time::{Duration, Instant};
use tokio::time::timeout;

/// 探测执行器trait
#[async_trait]
pub trait ProbeExecutor: Send + Sync {
    /// 执行一次探测
    ///
    /// 探测本身的失败体现在返回的 [`ProbeOutcome`] 中，该方法不会失败。
    async fn execute(&self, target: &ProbeTarget) -> ProbeOutcome;
}

/// HTTP探测执行器
pub struct HttpProbeExecutor {
    /// HTTP客户端
    client: Client,
    /// 单次探测的执行超时
    request_timeout: Duration,
}

impl HttpProbeExecutor {
    /// 创建新的HTTP探测执行器
    ///
    /// # 参数
    /// * `request_timeout` - 单次探测的执行超时
    ///
    /// # 返回
    /// * `Result<Self>` - 执行器实例
    pub fn new(request_timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(request_timeout)
            .user_agent(format!("{}/{}", crate::APP_NAME, crate::VERSION))
            .build()
            .map_err(|e| ApiVitalsError::Other(anyhow::anyhow!("创建HTTP客户端失败: {}", e)))?;

        Ok(Self {
            client,
            request_timeout,
        })
    }

    /// 构建HTTP请求
    fn build_request(&self, target: &ProbeTarget) -> reqwest::RequestBuilder {
        let mut request = self
            .client
            .request(target.method.clone(), target.url.clone())
            .headers(target.headers.clone());

        if !target.body.is_empty() {
            request = request.body(target.body.clone());
        }

        request
    }
}

#[async_trait]
impl ProbeExecutor for HttpProbeExecutor {
    async fn execute(&self, target: &ProbeTarget) -> ProbeOutcome {
        let start_time = Instant::now();
        let request = self.build_request(target);

        // 客户端超时之外再包一层，覆盖连接建立前的等待
        let response_result = timeout(self.request_timeout, request.send()).await;
        let elapsed = start_time.elapsed();

        match response_result {
            Ok(Ok(response)) => ProbeOutcome::Response {
                status: response.status(),
                elapsed,
            },
            Ok(Err(e)) => {
                tracing::debug!(
                    health_check_id = target.health_check_id,
                    error = %e,
                    "探测请求失败"
                );
                ProbeOutcome::Failed {
                    failure: ProbeFailure::classify(&e),
                    elapsed,
                }
            }
            Err(_) => ProbeOutcome::Failed {
                failure: ProbeFailure::Timeout,
                elapsed,
            },
        }
    }
}
