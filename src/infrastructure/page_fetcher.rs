//! 页面抓取器 - 基础设施层
//!
//! 持有唯一的 HTTP 客户端，只暴露"按 URL 取回原始文本"的能力

use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use crate::config::Config;
use crate::error::{AppError, AppResult, NetworkError};

/// 页面抓取能力
///
/// 职责：
/// - 发起一次 GET 请求并返回响应体文本
/// - 非 2xx 响应与传输失败统一报告为 `NetworkError`
/// - 不认识课程、日期
/// - 不做重试
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, NetworkError>;
}

/// 基于 reqwest 的页面抓取器
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// 创建新的抓取器，超时取自配置
    pub fn new(config: &Config) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::Config(format!("无法创建 HTTP 客户端: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, NetworkError> {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| NetworkError::transport(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NetworkError::HttpStatus {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("").to_string(),
                url: url.to_string(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| NetworkError::transport(url, e))?;

        debug!("✓ {} ({} 字节)", url, body.len());
        Ok(body)
    }
}
