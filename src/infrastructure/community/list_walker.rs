// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::CrawlPolicy;
use crate::domain::models::post::{PostRecord, PostStub, UnknownBoardPolicy};
use async_trait::async_trait;
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// 单个列表页的抓取结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    /// 本页解析出的候选帖子，为空时停止翻页
    Posts(Vec<PostStub>),
    /// 本页传输失败，跳过并继续下一页
    Skip,
    /// 列表容器缺失或导航超时，停止翻页
    Stop,
}

/// 按页浏览某个版块的两阶段协议
///
/// 每个任务持有自己的实现实例，因此方法可以使用 `&mut self`
#[async_trait]
pub trait BoardPager: Send {
    /// 抓取并解析一个列表页
    async fn list_page(&mut self, page: u32) -> PageOutcome;

    /// 抓取单个帖子的详情，失败或内容为空时返回 `None`
    async fn fetch_detail(&mut self, stub: &PostStub) -> Option<PostRecord>;
}

/// 分页循环
///
/// 从 `start_page` 翻到 `end_page`（包含），遇到空页或解析失败即停止。
/// 同一页内的帖子按顺序逐个抓取详情，相邻两次详情抓取之间插入等待。
///
/// # 参数
///
/// * `pager` - 来源相关的列表/详情实现
/// * `start_page` - 起始页
/// * `end_page` - 结束页（包含）
/// * `policy` - 合规名单、等待策略和未知版块策略
///
/// # 返回值
///
/// 按抓取顺序排列的记录，同一 `(board_id, post_id)` 成功抓取后不再重复抓取
pub async fn walk<P>(
    pager: &mut P,
    start_page: u32,
    end_page: u32,
    policy: &CrawlPolicy,
) -> Vec<PostRecord>
where
    P: BoardPager + ?Sized,
{
    let mut records = Vec::new();
    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut fetched_any = false;

    for page in start_page..=end_page {
        let stubs = match pager.list_page(page).await {
            PageOutcome::Posts(stubs) if stubs.is_empty() => {
                info!("Page {} has no posts, stopping pagination", page);
                break;
            }
            PageOutcome::Posts(stubs) => stubs,
            PageOutcome::Skip => {
                warn!("Page {} could not be fetched, skipping", page);
                continue;
            }
            PageOutcome::Stop => {
                info!("Page {} has no list content, stopping pagination", page);
                break;
            }
        };

        info!("Page {}: {} candidate posts", page, stubs.len());

        for mut stub in stubs {
            let board_id = match stub.board_id.take() {
                Some(board_id) => {
                    if !policy.gate.is_allowed(Some(&board_id)) {
                        debug!(
                            "Post {} belongs to disallowed board {}, skipped",
                            stub.post_id, board_id
                        );
                        continue;
                    }
                    board_id
                }
                None => match policy.unknown_board {
                    UnknownBoardPolicy::Keep => policy.unknown_board_placeholder.clone(),
                    UnknownBoardPolicy::Drop => {
                        debug!("Post {} has no known board, dropped", stub.post_id);
                        continue;
                    }
                },
            };

            let key = (board_id.clone(), stub.post_id.clone());
            if seen.contains(&key) {
                continue;
            }
            stub.board_id = Some(board_id);

            if fetched_any {
                policy.detail_delay.pause().await;
            }
            fetched_any = true;

            // Failed posts stay unseen so a later page can retry them
            if let Some(record) = pager.fetch_detail(&stub).await {
                debug!("Collected post {} from {}", record.post_id, record.board_id);
                seen.insert(key);
                records.push(record);
            }
        }
    }

    records
}
