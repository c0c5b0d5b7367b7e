// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod pages;

use async_trait::async_trait;
use forumcrawl::domain::community::{AdapterError, CommunityAdapter};
use forumcrawl::domain::models::post::{PostRecord, UnknownBoardPolicy};
use forumcrawl::domain::models::task::{Source, Task};
use forumcrawl::domain::services::compliance::ComplianceGate;
use forumcrawl::domain::services::sanitizer::ContentSanitizer;
use forumcrawl::engines::politeness::{FixedIdentity, NoDelay};
use forumcrawl::engines::traits::EngineError;
use forumcrawl::infrastructure::community::{
    ArcaLiveAdapter, ArcaLiveConfig, CrawlPolicy, DcInsideAdapter, DcInsideConfig,
};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

pub use fake_browser::FakeLauncher;

pub const ARCA_BASE: &str = "http://arca.test";

/// 零等待、固定身份的策略
pub fn test_policy(disallowed: &[&str]) -> CrawlPolicy {
    CrawlPolicy {
        gate: ComplianceGate::new(disallowed.iter().copied()),
        detail_delay: Arc::new(NoDelay),
        identity: Arc::new(FixedIdentity("forumcrawl-test".to_string())),
        sanitizer: ContentSanitizer::default(),
        unknown_board: UnknownBoardPolicy::Keep,
        unknown_board_placeholder: "unknown".to_string(),
    }
}

/// 指向 mock 服务器的 DC Inside 适配器，画廊和搜索共用同一个服务器
pub fn dc_adapter(server_uri: &str, disallowed: &[&str]) -> DcInsideAdapter {
    let base = Url::parse(server_uri).unwrap();
    let mut config = DcInsideConfig::new(base.clone(), base);
    config.request_timeout = Duration::from_secs(5);
    config.list_retry_delay = Arc::new(NoDelay);
    DcInsideAdapter::new(config, test_policy(disallowed))
}

/// 使用假浏览器的 Arca Live 适配器，等待时间缩短到毫秒级
pub fn arca_adapter(launcher: FakeLauncher, disallowed: &[&str]) -> ArcaLiveAdapter {
    let mut config = ArcaLiveConfig::new(Url::parse(ARCA_BASE).unwrap());
    config.list_wait = Duration::from_millis(20);
    config.content_wait = Duration::from_millis(20);
    config.comment_wait = Duration::from_millis(10);
    ArcaLiveAdapter::new(config, Arc::new(launcher), test_policy(disallowed))
}

pub fn record(source: Source, board_id: &str, post_id: &str) -> PostRecord {
    PostRecord {
        source,
        post_id: post_id.to_string(),
        title: format!("title {post_id}"),
        content: format!("content {post_id}"),
        comments: vec![],
        board_id: board_id.to_string(),
        url: format!("https://example.com/{board_id}/{post_id}"),
    }
}

/// 返回固定结果的适配器
pub struct StaticAdapter {
    pub source: Source,
    pub records: Vec<PostRecord>,
}

#[async_trait]
impl CommunityAdapter for StaticAdapter {
    async fn crawl(&self, _task: &Task) -> Result<Vec<PostRecord>, AdapterError> {
        Ok(self.records.clone())
    }

    fn source(&self) -> Source {
        self.source
    }

    fn name(&self) -> &'static str {
        "static"
    }
}

/// 先等待一段时间再返回固定结果的适配器
pub struct SlowAdapter {
    pub source: Source,
    pub delay: Duration,
    pub records: Vec<PostRecord>,
}

#[async_trait]
impl CommunityAdapter for SlowAdapter {
    async fn crawl(&self, _task: &Task) -> Result<Vec<PostRecord>, AdapterError> {
        tokio::time::sleep(self.delay).await;
        Ok(self.records.clone())
    }

    fn source(&self) -> Source {
        self.source
    }

    fn name(&self) -> &'static str {
        "slow"
    }
}

/// 总是返回任务级错误的适配器
pub struct FailingAdapter(pub Source);

#[async_trait]
impl CommunityAdapter for FailingAdapter {
    async fn crawl(&self, _task: &Task) -> Result<Vec<PostRecord>, AdapterError> {
        Err(AdapterError::Engine(EngineError::Browser(
            "browser failed to start".to_string(),
        )))
    }

    fn source(&self) -> Source {
        self.0
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}

/// 在抓取过程中崩溃的适配器
pub struct PanickingAdapter(pub Source);

#[async_trait]
impl CommunityAdapter for PanickingAdapter {
    async fn crawl(&self, _task: &Task) -> Result<Vec<PostRecord>, AdapterError> {
        panic!("adapter crashed mid-crawl");
    }

    fn source(&self) -> Source {
        self.0
    }

    fn name(&self) -> &'static str {
        "panicking"
    }
}
