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

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// 引擎错误类型
#[derive(Error, Debug)]
pub enum EngineError {
    /// 请求失败
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    /// 非2xx响应
    #[error("Unexpected status {status} for {url}")]
    BadStatus { status: u16, url: String },
    /// 超时
    #[error("Timeout after {0:?}")]
    Timeout(Duration),
    /// 浏览器错误
    #[error("Browser error: {0}")]
    Browser(String),
}

impl EngineError {
    /// 判断是否为超时类错误
    pub fn is_timeout(&self) -> bool {
        match self {
            EngineError::RequestFailed(e) => e.is_timeout(),
            EngineError::Timeout(_) => true,
            _ => false,
        }
    }
}

/// 浏览器会话
///
/// 单个任务独占的一个浏览器实例加一个标签页
#[async_trait]
pub trait BrowserSession: Send {
    /// 打开页面，在页面加载超时内返回
    async fn navigate(&mut self, url: &str) -> Result<(), EngineError>;

    /// 等待选择器匹配的元素出现
    ///
    /// 超时返回 `EngineError::Timeout`
    async fn wait_for(&mut self, selector: &str, timeout: Duration) -> Result<(), EngineError>;

    /// 当前页面渲染后的HTML
    async fn content(&mut self) -> Result<String, EngineError>;

    /// 关闭浏览器并释放所有资源
    async fn close(self: Box<Self>) -> Result<(), EngineError>;
}

/// 浏览器启动器
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    /// 以指定 User-Agent 启动一个新的浏览器会话
    async fn launch(&self, user_agent: &str) -> Result<Box<dyn BrowserSession>, EngineError>;

    /// 启动器名称
    fn name(&self) -> &'static str;
}
