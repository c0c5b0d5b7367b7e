// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::post::PostRecord;
use crate::domain::models::task::{Source, Task};
use crate::engines::traits::EngineError;
use async_trait::async_trait;
use thiserror::Error;

/// 适配器错误
///
/// 单页或单帖的传输失败在适配器内部被吞掉，只有任务级故障才会返回到这里
#[derive(Debug, Error)]
pub enum AdapterError {
    /// 任务来源与适配器不匹配
    #[error("{adapter} adapter cannot handle a {task_source} task")]
    SourceMismatch {
        adapter: &'static str,
        task_source: Source,
    },
    /// 传输层初始化失败（例如浏览器无法启动）
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),
}

#[async_trait]
pub trait CommunityAdapter: Send + Sync {
    /// Crawl the page range of a single task and return its de-duplicated records.
    ///
    /// A disallowed board yields exactly one sentinel record and no network traffic.
    async fn crawl(&self, task: &Task) -> Result<Vec<PostRecord>, AdapterError>;

    /// The source this adapter serves
    fn source(&self) -> Source;

    /// Get the name of the adapter
    fn name(&self) -> &'static str;
}
