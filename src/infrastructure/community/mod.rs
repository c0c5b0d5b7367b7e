// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 社区来源适配器
///
/// - `dcinside`：服务端渲染的画廊，直接通过HTTP抓取
/// - `arcalive`：客户端渲染的频道，通过无头浏览器抓取
/// - `list_walker`：两个适配器共用的分页循环
pub mod arcalive;
pub mod dcinside;
pub mod list_walker;

pub use arcalive::{ArcaLiveAdapter, ArcaLiveConfig};
pub use dcinside::{DcInsideAdapter, DcInsideConfig};
pub use list_walker::{walk, BoardPager, PageOutcome};

use crate::domain::models::post::{PostRecord, PostStub, UnknownBoardPolicy};
use crate::domain::models::task::Source;
use crate::domain::services::compliance::ComplianceGate;
use crate::domain::services::sanitizer::ContentSanitizer;
use crate::engines::politeness::{IdentityRotator, RateLimiter};
use scraper::ElementRef;
use std::sync::Arc;
use tracing::debug;

/// 单个来源的爬取策略
///
/// 合规名单、请求间隔、身份轮换和清洗规则都由外部注入，
/// 测试中可以替换为零等待、固定身份的实现。
#[derive(Clone)]
pub struct CrawlPolicy {
    pub gate: ComplianceGate,
    /// 同一任务内相邻两次详情抓取之间的等待
    pub detail_delay: Arc<dyn RateLimiter>,
    pub identity: Arc<dyn IdentityRotator>,
    pub sanitizer: ContentSanitizer,
    pub unknown_board: UnknownBoardPolicy,
    pub unknown_board_placeholder: String,
}

impl CrawlPolicy {
    /// 清洗详情内容并组装记录
    ///
    /// 清洗后正文为空时返回 `None`，这类帖子不会进入结果
    pub fn finish_record(
        &self,
        source: Source,
        stub: &PostStub,
        content: &str,
        comments: &[String],
    ) -> Option<PostRecord> {
        let content = self.sanitizer.clean(content);
        if content.is_empty() {
            debug!("Post {} has no content after sanitizing, skipped", stub.post_id);
            return None;
        }

        Some(PostRecord {
            source,
            post_id: stub.post_id.clone(),
            title: self.sanitizer.clean(&stub.title),
            content,
            comments: self.sanitizer.clean_all(comments),
            board_id: stub
                .board_id
                .clone()
                .unwrap_or_else(|| self.unknown_board_placeholder.clone()),
            url: stub.url.clone(),
        })
    }
}

/// 块级文本：每个非空文本节点去掉首尾空白后按行拼接
pub(crate) fn block_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// 行内文本：合并连续空白
pub(crate) fn inline_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
