// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::list_walker::{walk, BoardPager, PageOutcome};
use super::{block_text, inline_text, CrawlPolicy};
use crate::domain::community::{AdapterError, CommunityAdapter};
use crate::domain::models::post::{PostRecord, PostStub};
use crate::domain::models::task::{BoardKind, SearchField, SortMode, Source, Task, TaskOptions};
use crate::domain::services::merge::dedup;
use crate::engines::politeness::{RandomDelay, RateLimiter};
use crate::engines::reqwest_engine::HttpFetcher;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use url::Url;

static TBODY: Lazy<Selector> = Lazy::new(|| selector("tbody"));
static LIST_ROW: Lazy<Selector> = Lazy::new(|| selector("tbody tr"));
static ROW_WRITER: Lazy<Selector> = Lazy::new(|| selector("td.gall_writer"));
static ROW_TITLE_LINK: Lazy<Selector> =
    Lazy::new(|| selector("td.gall_tit a:not(.reply_numbox)"));
static SEARCH_CONTAINER: Lazy<Selector> = Lazy::new(|| selector("ul.sch_result_list"));
static SEARCH_ITEM: Lazy<Selector> = Lazy::new(|| selector("ul.sch_result_list li"));
static SEARCH_TITLE_LINK: Lazy<Selector> = Lazy::new(|| selector("a.tit_txt"));
static SEARCH_BOARD_LINK: Lazy<Selector> =
    Lazy::new(|| selector("p.link_dsc_txt.dsc_sub a.sub_txt"));
static DETAIL_BODY: Lazy<Selector> = Lazy::new(|| selector("div.write_div"));
static DETAIL_COMMENT: Lazy<Selector> = Lazy::new(|| selector("ul.cmt_list li p.usertxt"));

/// 内容行的 `data-type`，公告行为 `icon_notice`
const CONTENT_ROW_TYPES: &[&str] = &["icon_pic", "icon_txt"];

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector is valid CSS")
}

/// DC Inside 适配器配置
#[derive(Clone)]
pub struct DcInsideConfig {
    /// 画廊站点（列表与详情）
    pub gallery_base: Url,
    /// 全站搜索站点
    pub search_base: Url,
    pub request_timeout: Duration,
    /// 运营者账号名，其帖子不参与抓取
    pub operator_name: String,
    /// 列表页失败后、继续下一页之前的等待
    pub list_retry_delay: Arc<dyn RateLimiter>,
}

impl DcInsideConfig {
    pub fn new(gallery_base: Url, search_base: Url) -> Self {
        Self {
            gallery_base,
            search_base,
            request_timeout: Duration::from_secs(10),
            operator_name: "운영자".to_string(),
            list_retry_delay: Arc::new(RandomDelay::from_millis(2000, 4000)),
        }
    }
}

/// DC Inside 适配器
///
/// 服务端渲染的画廊，列表和详情都通过普通HTTP请求获取。
/// 每个任务创建独立的 `HttpFetcher`，任务结束即释放。
pub struct DcInsideAdapter {
    config: DcInsideConfig,
    policy: CrawlPolicy,
}

#[derive(Debug, Clone)]
enum ListMode {
    /// 画廊列表，可带关键词做版内搜索
    Board {
        board_id: String,
        kind: BoardKind,
        field: SearchField,
    },
    /// 全站搜索
    Search { sort: SortMode },
}

impl DcInsideAdapter {
    pub fn new(config: DcInsideConfig, policy: CrawlPolicy) -> Self {
        Self { config, policy }
    }

    async fn collect(&self, fetcher: &HttpFetcher, task: &Task, mode: ListMode) -> Vec<PostRecord> {
        let mut pager = DcPager {
            config: &self.config,
            policy: &self.policy,
            fetcher,
            keyword: task.keyword(),
            mode,
        };
        walk(&mut pager, task.start_page(), task.end_page(), &self.policy).await
    }
}

#[async_trait]
impl CommunityAdapter for DcInsideAdapter {
    async fn crawl(&self, task: &Task) -> Result<Vec<PostRecord>, AdapterError> {
        let TaskOptions::DcInside {
            board_id,
            board_kind,
            search_field,
            sort_mode,
            fallback_to_search,
        } = task.options()
        else {
            return Err(AdapterError::SourceMismatch {
                adapter: self.name(),
                task_source: task.source(),
            });
        };

        if let Some(board_id) = board_id.as_deref() {
            if !self.policy.gate.is_allowed(Some(board_id)) {
                warn!("Gallery {} is disallowed by robots.txt, task skipped", board_id);
                return Ok(vec![PostRecord::disallowed(Source::DcInside, board_id)]);
            }
        }

        info!(
            "Crawling DC Inside (gallery: {}, keyword: '{}', pages {}-{})",
            board_id.as_deref().unwrap_or("<search>"),
            task.keyword(),
            task.start_page(),
            task.end_page()
        );

        let fetcher = HttpFetcher::new(self.config.request_timeout)?;
        let mode = match board_id {
            Some(board_id) => ListMode::Board {
                board_id: board_id.clone(),
                kind: *board_kind,
                field: *search_field,
            },
            None => ListMode::Search { sort: *sort_mode },
        };

        let mut records = self.collect(&fetcher, task, mode).await;

        if records.is_empty()
            && *fallback_to_search
            && board_id.is_some()
            && !task.keyword().is_empty()
        {
            info!(
                "Gallery crawl returned nothing, falling back to integrated search for '{}'",
                task.keyword()
            );
            records = self
                .collect(&fetcher, task, ListMode::Search { sort: *sort_mode })
                .await;
        }

        let records = dedup(records);
        info!("DC Inside task finished with {} posts", records.len());
        Ok(records)
    }

    fn source(&self) -> Source {
        Source::DcInside
    }

    fn name(&self) -> &'static str {
        "dcinside"
    }
}

struct DcPager<'a> {
    config: &'a DcInsideConfig,
    policy: &'a CrawlPolicy,
    fetcher: &'a HttpFetcher,
    keyword: &'a str,
    mode: ListMode,
}

impl DcPager<'_> {
    fn list_url(&self, page: u32) -> Result<Url, url::ParseError> {
        match &self.mode {
            ListMode::Board {
                board_id,
                kind,
                field,
            } => board_list_url(
                &self.config.gallery_base,
                *kind,
                board_id,
                self.keyword,
                *field,
                page,
            ),
            ListMode::Search { sort } => {
                search_url(&self.config.search_base, self.keyword, page, *sort)
            }
        }
    }
}

#[async_trait]
impl BoardPager for DcPager<'_> {
    async fn list_page(&mut self, page: u32) -> PageOutcome {
        let url = match self.list_url(page) {
            Ok(url) => url,
            Err(e) => {
                warn!("Failed to build list URL for page {}: {}", page, e);
                return PageOutcome::Stop;
            }
        };

        let user_agent = self.policy.identity.user_agent();
        let html = match self.fetcher.get_html(url.as_str(), &user_agent).await {
            Ok(html) => html,
            Err(e) => {
                if e.is_timeout() {
                    warn!("List page {} timed out: {}", url, e);
                } else {
                    error!("List page {} failed: {}", url, e);
                }
                self.config.list_retry_delay.pause().await;
                return PageOutcome::Skip;
            }
        };

        let stubs = match &self.mode {
            ListMode::Board { board_id, .. } => parse_board_list(
                &html,
                &self.config.gallery_base,
                board_id,
                &self.config.operator_name,
            ),
            ListMode::Search { .. } => parse_search_results(&html, &self.config.gallery_base),
        };

        match stubs {
            Some(stubs) => PageOutcome::Posts(stubs),
            None => PageOutcome::Stop,
        }
    }

    async fn fetch_detail(&mut self, stub: &PostStub) -> Option<PostRecord> {
        let user_agent = self.policy.identity.user_agent();
        let html = match self.fetcher.get_html(&stub.url, &user_agent).await {
            Ok(html) => html,
            Err(e) => {
                warn!("Post {} could not be fetched: {}", stub.post_id, e);
                return None;
            }
        };

        let Some((content, comments)) = parse_detail(&html) else {
            debug!("Post {} has no content container", stub.post_id);
            return None;
        };

        self.policy
            .finish_record(Source::DcInside, stub, &content, &comments)
    }
}

/// 画廊列表地址
///
/// 带关键词时追加版内搜索参数
pub fn board_list_url(
    base: &Url,
    kind: BoardKind,
    board_id: &str,
    keyword: &str,
    field: SearchField,
    page: u32,
) -> Result<Url, url::ParseError> {
    let mut url = base.join(kind.list_path())?;
    {
        let mut query = url.query_pairs_mut();
        query
            .append_pair("id", board_id)
            .append_pair("page", &page.to_string());
        if !keyword.is_empty() {
            query
                .append_pair("search_pos", "")
                .append_pair("s_type", field.as_query_value())
                .append_pair("s_keyword", keyword);
        }
    }
    Ok(url)
}

/// 全站搜索地址
///
/// 关键词按UTF-8百分号编码后把 `%` 替换为 `.`，相关度排序额外插入 `sort/accuracy/`
pub fn search_url(
    base: &Url,
    keyword: &str,
    page: u32,
    sort: SortMode,
) -> Result<Url, url::ParseError> {
    let encoded = urlencoding::encode(keyword).replace('%', ".");
    let sort_segment = match sort {
        SortMode::Relevance => "sort/accuracy/",
        SortMode::Latest => "",
    };
    base.join(&format!("/post/p/{}/{}q/{}", page, sort_segment, encoded))
}

/// 解析画廊列表页
///
/// # 返回值
///
/// * `None` - 列表容器缺失，没有更多内容
/// * `Some(stubs)` - 过滤掉公告和运营者帖子之后的候选帖子
pub fn parse_board_list(
    html: &str,
    base: &Url,
    board_id: &str,
    operator_name: &str,
) -> Option<Vec<PostStub>> {
    let document = Html::parse_document(html);
    document.select(&TBODY).next()?;

    let stubs = document
        .select(&LIST_ROW)
        .filter(|row| is_content_row(*row, operator_name))
        .filter_map(|row| {
            let link = row.select(&ROW_TITLE_LINK).next()?;
            let url = base.join(link.value().attr("href")?).ok()?;
            let post_id = query_param(&url, "no")?;
            Some(PostStub {
                post_id,
                title: inline_text(link),
                url: url.to_string(),
                board_id: Some(board_id.to_string()),
            })
        })
        .collect();

    Some(stubs)
}

fn is_content_row(row: ElementRef<'_>, operator_name: &str) -> bool {
    let data_type = row.value().attr("data-type").unwrap_or_default();
    if !CONTENT_ROW_TYPES.contains(&data_type) {
        return false;
    }

    let by_operator = row
        .select(&ROW_WRITER)
        .next()
        .and_then(|writer| writer.value().attr("user_name"))
        .is_some_and(|name| name == operator_name);
    !by_operator
}

/// 解析全站搜索结果页
///
/// 所属画廊取自结果项下方画廊链接的 `id` 参数，缺失时为 `None`
pub fn parse_search_results(html: &str, base: &Url) -> Option<Vec<PostStub>> {
    let document = Html::parse_document(html);
    document.select(&SEARCH_CONTAINER).next()?;

    let stubs = document
        .select(&SEARCH_ITEM)
        .filter_map(|item| {
            let link = item.select(&SEARCH_TITLE_LINK).next()?;
            let url = base.join(link.value().attr("href")?).ok()?;
            let post_id = query_param(&url, "no")?;
            let board_id = item
                .select(&SEARCH_BOARD_LINK)
                .next()
                .and_then(|a| a.value().attr("href"))
                .and_then(|href| base.join(href).ok())
                .and_then(|board_url| query_param(&board_url, "id"));
            Some(PostStub {
                post_id,
                title: inline_text(link),
                url: url.to_string(),
                board_id,
            })
        })
        .collect();

    Some(stubs)
}

/// 解析详情页，返回正文和评论
pub fn parse_detail(html: &str) -> Option<(String, Vec<String>)> {
    let document = Html::parse_document(html);
    let body = document.select(&DETAIL_BODY).next()?;
    let comments = document
        .select(&DETAIL_COMMENT)
        .map(inline_text)
        .filter(|c| !c.is_empty())
        .collect();
    Some((block_text(body), comments))
}

fn query_param(url: &Url, key: &str) -> Option<String> {
    url.query_pairs()
        .find(|(k, v)| k == key && !v.is_empty())
        .map(|(_, v)| v.into_owned())
}
