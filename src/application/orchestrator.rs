// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::community::{AdapterError, CommunityAdapter};
use crate::domain::models::post::{CrawledRow, PostRecord, ResultTable};
use crate::domain::models::task::{Source, Task};
use crate::domain::services::merge::merge_interleaved;
use crate::infrastructure::metrics::{self, TaskOutcome};
use futures::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// 爬取任务编排器
///
/// 按来源把任务分发给对应的适配器，所有任务并发执行，
/// 全部结束后交错合并为一张结果表。单个任务的失败或崩溃只会让
/// 该任务的贡献为空，不影响其他任务。
pub struct CrawlOrchestrator {
    adapters: HashMap<Source, Arc<dyn CommunityAdapter>>,
}

struct Dispatched {
    source: Source,
    keyword: String,
    handle: Option<JoinHandle<Result<Vec<PostRecord>, AdapterError>>>,
}

impl CrawlOrchestrator {
    /// 创建编排器
    ///
    /// 同一来源注册多个适配器时后注册的生效
    pub fn new(adapters: Vec<Arc<dyn CommunityAdapter>>) -> Self {
        let adapters = adapters
            .into_iter()
            .map(|adapter| (adapter.source(), adapter))
            .collect();
        Self { adapters }
    }

    pub fn supports(&self, source: Source) -> bool {
        self.adapters.contains_key(&source)
    }

    /// 执行一批任务
    ///
    /// # 参数
    ///
    /// * `tasks` - 已通过结构校验的任务
    ///
    /// # 返回值
    ///
    /// 交错合并后的结果表，每行附带发起任务的来源和关键词。
    /// 所有任务都没有结果时返回空表。
    pub async fn run(&self, tasks: Vec<Task>) -> ResultTable {
        let start = Instant::now();
        let task_count = tasks.len();

        let dispatched: Vec<Dispatched> = tasks
            .into_iter()
            .map(|task| {
                let source = task.source();
                let keyword = task.keyword().to_string();
                let handle = self.adapters.get(&source).cloned().map(|adapter| {
                    tokio::spawn(async move { adapter.crawl(&task).await })
                });
                Dispatched {
                    source,
                    keyword,
                    handle,
                }
            })
            .collect();

        let tables = join_all(dispatched.into_iter().map(settle)).await;
        let rows = merge_interleaved(tables);

        info!(
            "Crawled {} rows from {} tasks in {} ms",
            rows.len(),
            task_count,
            start.elapsed().as_millis()
        );
        rows
    }
}

/// 等待单个任务结束并附加来源和关键词
async fn settle(dispatched: Dispatched) -> Vec<CrawledRow> {
    let Dispatched {
        source,
        keyword,
        handle,
    } = dispatched;

    let Some(handle) = handle else {
        warn!("No adapter registered for source {}, task ignored", source);
        metrics::record_task(source, TaskOutcome::Unrouted);
        return Vec::new();
    };

    let records = match handle.await {
        Ok(Ok(records)) => {
            let disallowed = records.len() == 1 && records[0].is_disallowed_marker();
            if disallowed {
                metrics::record_task(source, TaskOutcome::Disallowed);
            } else {
                metrics::record_task(source, TaskOutcome::Succeeded);
                metrics::record_posts(source, records.len());
            }
            records
        }
        Ok(Err(e)) => {
            warn!("{} task for '{}' failed: {}", source, keyword, e);
            metrics::record_task(source, TaskOutcome::Failed);
            Vec::new()
        }
        Err(e) => {
            warn!("{} task for '{}' aborted: {}", source, keyword, e);
            metrics::record_task(source, TaskOutcome::Panicked);
            Vec::new()
        }
    };

    records
        .into_iter()
        .map(|record| CrawledRow {
            record,
            task_source: source,
            task_keyword: keyword.clone(),
        })
        .collect()
}
