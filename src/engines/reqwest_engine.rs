// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::engines::traits::EngineError;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use std::time::{Duration, Instant};
use tracing::debug;

/// HTTP抓取器
///
/// 基于reqwest实现的静态页面抓取器。每个任务持有自己的实例，
/// 任务之间不共享连接池和cookie。
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// 创建新的抓取器
    ///
    /// # 参数
    ///
    /// * `timeout` - 单次请求超时
    ///
    /// # 返回值
    ///
    /// * `Ok(HttpFetcher)` - 抓取器实例
    /// * `Err(EngineError)` - 客户端构建失败
    pub fn new(timeout: Duration) -> Result<Self, EngineError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static("ko-KR,ko;q=0.9,en-US;q=0.8,en;q=0.7"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .cookie_store(true)
            .build()?;

        Ok(Self { client })
    }

    /// 获取页面HTML
    ///
    /// # 参数
    ///
    /// * `url` - 目标URL
    /// * `user_agent` - 本次请求使用的 User-Agent
    ///
    /// # 返回值
    ///
    /// * `Ok(String)` - 2xx响应的正文
    /// * `Err(EngineError)` - 超时、连接失败或非2xx状态
    pub async fn get_html(&self, url: &str, user_agent: &str) -> Result<String, EngineError> {
        let start = Instant::now();

        let mut request = self.client.get(url);
        if let Ok(ua) = HeaderValue::from_str(user_agent) {
            request = request.header(USER_AGENT, ua);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(EngineError::BadStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let content = response.text().await?;
        debug!(
            "GET {} -> {} ({} bytes, {} ms)",
            url,
            status.as_u16(),
            content.len(),
            start.elapsed().as_millis()
        );

        Ok(content)
    }
}

#[cfg(test)]
#[path = "reqwest_engine_test.rs"]
mod tests;
