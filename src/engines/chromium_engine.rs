// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::engines::traits::{BrowserLauncher, BrowserSession, EngineError};
use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::network::{EnableParams, SetBlockedUrLsParams};
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// 渲染时屏蔽的资源类型
const BLOCKED_RESOURCE_PATTERNS: &[&str] = &[
    "*.png", "*.jpg", "*.jpeg", "*.gif", "*.webp", "*.svg", "*.ico", "*.css", "*.woff",
    "*.woff2", "*.ttf",
];

const ELEMENT_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Chromium 启动选项
#[derive(Debug, Clone)]
pub struct ChromiumOptions {
    /// 连接已运行的远程实例，而不是本地启动
    pub remote_debugging_url: Option<String>,
    /// 自定义 Chrome 可执行文件路径
    pub chrome_executable: Option<String>,
    pub headless: bool,
    /// 页面加载超时
    pub page_load_timeout: Duration,
    /// 是否屏蔽图片、样式表和字体
    pub block_resources: bool,
}

impl Default for ChromiumOptions {
    fn default() -> Self {
        Self {
            remote_debugging_url: None,
            chrome_executable: None,
            headless: true,
            page_load_timeout: Duration::from_secs(20),
            block_resources: true,
        }
    }
}

/// Chromium 启动器
///
/// 基于chromiumoxide实现。每次 `launch` 都会得到一个独立的浏览器进程，
/// 不在任务之间复用。
pub struct ChromiumLauncher {
    options: ChromiumOptions,
}

impl ChromiumLauncher {
    pub fn new(options: ChromiumOptions) -> Self {
        Self { options }
    }

    fn browser_config(&self) -> Result<BrowserConfig, EngineError> {
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .request_timeout(self.options.page_load_timeout)
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage");

        if self.options.block_resources {
            builder = builder.arg("--blink-settings=imagesEnabled=false");
        }
        if !self.options.headless {
            builder = builder.with_head();
        }
        if let Some(path) = &self.options.chrome_executable {
            builder = builder.chrome_executable(path);
        }

        builder.build().map_err(EngineError::Browser)
    }
}

#[async_trait]
impl BrowserLauncher for ChromiumLauncher {
    /// 启动浏览器并打开一个空白标签页
    ///
    /// # 参数
    ///
    /// * `user_agent` - 整个会话使用的 User-Agent
    ///
    /// # 返回值
    ///
    /// * `Ok(Box<dyn BrowserSession>)` - 可用的会话
    /// * `Err(EngineError)` - 浏览器无法启动或连接
    async fn launch(&self, user_agent: &str) -> Result<Box<dyn BrowserSession>, EngineError> {
        let (mut browser, mut handler, owned) =
            if let Some(url) = &self.options.remote_debugging_url {
                info!("Connecting to remote Chrome instance at: {}", url);
                let (browser, handler) = Browser::connect(url).await.map_err(|e| {
                    EngineError::Browser(format!("Failed to connect to remote Chrome: {}", e))
                })?;
                (browser, handler, false)
            } else {
                let (browser, handler) = Browser::launch(self.browser_config()?)
                    .await
                    .map_err(|e| EngineError::Browser(e.to_string()))?;
                (browser, handler, true)
            };

        // Spawn a handler to process browser events
        let handler_task = tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if h.is_err() {
                    break;
                }
            }
        });

        let page = match prepare_page(&browser, user_agent, self.options.block_resources).await {
            Ok(page) => page,
            Err(e) => {
                if owned {
                    let _ = browser.close().await;
                    let _ = browser.wait().await;
                }
                handler_task.abort();
                return Err(e);
            }
        };

        debug!("Browser session started (remote: {})", !owned);

        Ok(Box::new(ChromiumSession {
            browser,
            page,
            handler: handler_task,
            owned,
            page_load_timeout: self.options.page_load_timeout,
        }))
    }

    fn name(&self) -> &'static str {
        "chromium"
    }
}

async fn prepare_page(
    browser: &Browser,
    user_agent: &str,
    block_resources: bool,
) -> Result<Page, EngineError> {
    let page = browser
        .new_page("about:blank")
        .await
        .map_err(|e| EngineError::Browser(e.to_string()))?;

    page.set_user_agent(user_agent)
        .await
        .map_err(|e| EngineError::Browser(e.to_string()))?;

    if block_resources {
        let blocked = SetBlockedUrLsParams::new(
            BLOCKED_RESOURCE_PATTERNS
                .iter()
                .map(|p| p.to_string())
                .collect::<Vec<_>>(),
        );
        // Resource blocking is an optimisation; pages still render without it
        if let Err(e) = page.execute(EnableParams::default()).await {
            warn!("Failed to enable network domain: {}", e);
        } else if let Err(e) = page.execute(blocked).await {
            warn!("Failed to block resource URLs: {}", e);
        }
    }

    Ok(page)
}

/// 单个任务独占的浏览器会话
pub struct ChromiumSession {
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
    owned: bool,
    page_load_timeout: Duration,
}

#[async_trait]
impl BrowserSession for ChromiumSession {
    async fn navigate(&mut self, url: &str) -> Result<(), EngineError> {
        match tokio::time::timeout(self.page_load_timeout, self.page.goto(url)).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(EngineError::Browser(format!("Navigation to {} failed: {}", url, e))),
            Err(_) => Err(EngineError::Timeout(self.page_load_timeout)),
        }
    }

    async fn wait_for(&mut self, selector: &str, timeout: Duration) -> Result<(), EngineError> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            if self.page.find_element(selector).await.is_ok() {
                return Ok(());
            }
            if tokio::time::Instant::now() >= deadline {
                return Err(EngineError::Timeout(timeout));
            }
            tokio::time::sleep(ELEMENT_POLL_INTERVAL).await;
        }
    }

    async fn content(&mut self) -> Result<String, EngineError> {
        self.page
            .content()
            .await
            .map_err(|e| EngineError::Browser(e.to_string()))
    }

    async fn close(self: Box<Self>) -> Result<(), EngineError> {
        let ChromiumSession {
            mut browser,
            page,
            handler,
            owned,
            ..
        } = *self;

        let mut result = Ok(());
        if owned {
            if let Err(e) = browser.close().await {
                result = Err(EngineError::Browser(format!("Failed to close browser: {}", e)));
            }
            if let Err(e) = browser.wait().await {
                warn!("Failed to wait for browser process: {}", e);
            }
        } else if let Err(e) = page.close().await {
            result = Err(EngineError::Browser(format!("Failed to close page: {}", e)));
        }

        handler.abort();
        debug!("Browser session closed");
        result
    }
}
