// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::list_walker::{walk, BoardPager, PageOutcome};
use super::{block_text, inline_text, CrawlPolicy};
use crate::domain::community::{AdapterError, CommunityAdapter};
use crate::domain::models::post::{PostRecord, PostStub};
use crate::domain::models::task::{Source, Task, TaskOptions};
use crate::domain::services::merge::dedup;
use crate::engines::traits::{BrowserLauncher, BrowserSession};
use async_trait::async_trait;
use futures::FutureExt;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// 列表行出现即视为渲染完成，紧凑布局使用 `div.vrow.hybrid`
pub const LIST_WAIT_SELECTOR: &str = "div.list-table a.vrow.column, div.list-table div.vrow.hybrid";
pub const CONTENT_WAIT_SELECTOR: &str = "div.article-content";
pub const COMMENT_WAIT_SELECTOR: &str = "div#comment";

/// 已删除评论的占位文字，包含即视为已删除
const DELETED_COMMENT: &str = "삭제된 댓글입니다";

static LIST_ROW: Lazy<Selector> = Lazy::new(|| {
    selector("div.list-table a.vrow.column:not(.notice), div.list-table div.vrow.hybrid:not(.notice)")
});
static HYBRID_LINK: Lazy<Selector> = Lazy::new(|| selector("a.hybrid-title"));
static ROW_TITLE: Lazy<Selector> = Lazy::new(|| selector("span.title"));
static ROW_BADGE: Lazy<Selector> = Lazy::new(|| selector("span.badge"));
static ARTICLE_CONTENT: Lazy<Selector> = Lazy::new(|| selector(CONTENT_WAIT_SELECTOR));
static COMMENT_TEXT: Lazy<Selector> =
    Lazy::new(|| selector("div.comment-item div.message div.text"));

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector is valid CSS")
}

/// Arca Live 适配器配置
#[derive(Debug, Clone)]
pub struct ArcaLiveConfig {
    pub base_url: Url,
    /// 未指定频道时使用的聚合频道
    pub aggregate_channel: String,
    /// 列表行等待时间，超时即停止翻页
    pub list_wait: Duration,
    /// 正文容器等待时间，超时跳过该帖
    pub content_wait: Duration,
    /// 评论容器等待时间，超时仍保留正文
    pub comment_wait: Duration,
}

impl ArcaLiveConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            aggregate_channel: "breaking".to_string(),
            list_wait: Duration::from_secs(15),
            content_wait: Duration::from_secs(5),
            comment_wait: Duration::from_secs(1),
        }
    }
}

/// Arca Live 适配器
///
/// 列表和评论由客户端脚本渲染，需要驱动无头浏览器。
/// 每个任务启动一个浏览器会话，在任何退出路径上都会关闭。
pub struct ArcaLiveAdapter {
    config: ArcaLiveConfig,
    launcher: Arc<dyn BrowserLauncher>,
    policy: CrawlPolicy,
}

impl ArcaLiveAdapter {
    pub fn new(
        config: ArcaLiveConfig,
        launcher: Arc<dyn BrowserLauncher>,
        policy: CrawlPolicy,
    ) -> Self {
        Self {
            config,
            launcher,
            policy,
        }
    }
}

#[async_trait]
impl CommunityAdapter for ArcaLiveAdapter {
    async fn crawl(&self, task: &Task) -> Result<Vec<PostRecord>, AdapterError> {
        let TaskOptions::ArcaLive { channel_id } = task.options() else {
            return Err(AdapterError::SourceMismatch {
                adapter: self.name(),
                task_source: task.source(),
            });
        };

        if let Some(channel_id) = channel_id.as_deref() {
            if !self.policy.gate.is_allowed(Some(channel_id)) {
                warn!("Channel {} is disallowed by robots.txt, task skipped", channel_id);
                return Ok(vec![PostRecord::disallowed(Source::ArcaLive, channel_id)]);
            }
        }

        let channel = channel_id
            .clone()
            .unwrap_or_else(|| self.config.aggregate_channel.clone());
        // The aggregate channel lists posts from many channels; the badge tells them apart
        let scoped_channel = (channel != self.config.aggregate_channel).then(|| channel.clone());

        info!(
            "Crawling Arca Live (channel: {}, keyword: '{}', pages {}-{})",
            channel,
            task.keyword(),
            task.start_page(),
            task.end_page()
        );

        let user_agent = self.policy.identity.user_agent();
        let session = self.launcher.launch(&user_agent).await?;

        let mut pager = ArcaPager {
            config: &self.config,
            policy: &self.policy,
            session,
            channel,
            scoped_channel,
            keyword: task.keyword(),
        };

        let outcome = AssertUnwindSafe(walk(
            &mut pager,
            task.start_page(),
            task.end_page(),
            &self.policy,
        ))
        .catch_unwind()
        .await;

        if let Err(e) = pager.session.close().await {
            warn!("Failed to release browser session: {}", e);
        }

        match outcome {
            Ok(records) => {
                let records = dedup(records);
                info!("Arca Live task finished with {} posts", records.len());
                Ok(records)
            }
            Err(panic) => std::panic::resume_unwind(panic),
        }
    }

    fn source(&self) -> Source {
        Source::ArcaLive
    }

    fn name(&self) -> &'static str {
        "arcalive"
    }
}

struct ArcaPager<'a> {
    config: &'a ArcaLiveConfig,
    policy: &'a CrawlPolicy,
    session: Box<dyn BrowserSession>,
    channel: String,
    /// 非聚合频道时所有帖子都属于该频道
    scoped_channel: Option<String>,
    keyword: &'a str,
}

#[async_trait]
impl BoardPager for ArcaPager<'_> {
    async fn list_page(&mut self, page: u32) -> PageOutcome {
        let url = match channel_list_url(&self.config.base_url, &self.channel, self.keyword, page) {
            Ok(url) => url,
            Err(e) => {
                warn!("Failed to build list URL for page {}: {}", page, e);
                return PageOutcome::Stop;
            }
        };

        if let Err(e) = self.session.navigate(url.as_str()).await {
            warn!("Navigation to {} failed: {}", url, e);
            return PageOutcome::Stop;
        }
        if let Err(e) = self
            .session
            .wait_for(LIST_WAIT_SELECTOR, self.config.list_wait)
            .await
        {
            info!("No list rows rendered on {}: {}", url, e);
            return PageOutcome::Stop;
        }

        match self.session.content().await {
            Ok(html) => PageOutcome::Posts(parse_list(
                &html,
                &self.config.base_url,
                self.scoped_channel.as_deref(),
            )),
            Err(e) => {
                warn!("Failed to read list page {}: {}", url, e);
                PageOutcome::Stop
            }
        }
    }

    async fn fetch_detail(&mut self, stub: &PostStub) -> Option<PostRecord> {
        if let Err(e) = self.session.navigate(&stub.url).await {
            warn!("Post {} could not be opened: {}", stub.post_id, e);
            return None;
        }
        if let Err(e) = self
            .session
            .wait_for(CONTENT_WAIT_SELECTOR, self.config.content_wait)
            .await
        {
            warn!("Post {} content did not render: {}", stub.post_id, e);
            return None;
        }
        if let Err(e) = self
            .session
            .wait_for(COMMENT_WAIT_SELECTOR, self.config.comment_wait)
            .await
        {
            debug!("Post {} has no comment section: {}", stub.post_id, e);
        }

        let html = match self.session.content().await {
            Ok(html) => html,
            Err(e) => {
                warn!("Failed to read post {}: {}", stub.post_id, e);
                return None;
            }
        };

        let (content, comments) = parse_detail(&html)?;
        self.policy
            .finish_record(Source::ArcaLive, stub, &content, &comments)
    }
}

/// 频道列表地址
pub fn channel_list_url(
    base: &Url,
    channel: &str,
    keyword: &str,
    page: u32,
) -> Result<Url, url::ParseError> {
    let mut url = base.join(&format!("/b/{}", channel))?;
    {
        let mut query = url.query_pairs_mut();
        if !keyword.is_empty() {
            query
                .append_pair("target", "all")
                .append_pair("keyword", keyword);
        }
        query.append_pair("p", &page.to_string());
    }
    Ok(url)
}

/// 解析渲染后的频道列表
///
/// 公告行被排除。`scoped_channel` 为空时（聚合频道）所属频道取自行内徽章，
/// 没有徽章的帖子所属频道为 `None`。
pub fn parse_list(html: &str, base: &Url, scoped_channel: Option<&str>) -> Vec<PostStub> {
    let document = Html::parse_document(html);

    document
        .select(&LIST_ROW)
        .filter_map(|row| {
            let link = if row.value().name() == "a" {
                row
            } else {
                row.select(&HYBRID_LINK).next()?
            };
            let url = base.join(link.value().attr("href")?).ok()?;
            let post_id = post_id_from_path(&url)?;

            let title = link
                .select(&ROW_TITLE)
                .next()
                .map(inline_text)
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| inline_text(link));

            let board_id = match scoped_channel {
                Some(channel) => Some(channel.to_string()),
                None => row
                    .select(&ROW_BADGE)
                    .next()
                    .map(inline_text)
                    .filter(|b| !b.is_empty()),
            };

            Some(PostStub {
                post_id,
                title,
                url: url.to_string(),
                board_id,
            })
        })
        .collect()
}

/// 解析渲染后的帖子页，返回正文和评论
pub fn parse_detail(html: &str) -> Option<(String, Vec<String>)> {
    let document = Html::parse_document(html);
    let body = document.select(&ARTICLE_CONTENT).next()?;
    let comments = document
        .select(&COMMENT_TEXT)
        .map(block_text)
        .filter(|c| !c.is_empty() && !c.contains(DELETED_COMMENT))
        .collect();
    Some((block_text(body), comments))
}

fn post_id_from_path(url: &Url) -> Option<String> {
    let last = url.path_segments()?.filter(|s| !s.is_empty()).last()?;
    if !last.is_empty() && last.chars().all(|c| c.is_ascii_digit()) {
        Some(last.to_string())
    } else {
        None
    }
}
