// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::post::CrawledRow;
use crate::domain::models::task::{Source, Task, TaskError, TaskOptions};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;
use validator::Validate;

fn default_page() -> u32 {
    1
}

/// 社区搜索请求
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct SearchRequestDto {
    #[validate(length(max = 64, message = "at most 64 tasks per request"), nested)]
    pub tasks: Vec<TaskDto>,
    /// 返回的最大行数，截断发生在交错合并之后
    #[validate(range(min = 1, max = 1000))]
    pub limit: Option<usize>,
}

/// 规划方提交的单个任务
///
/// 字段保持宽松的字符串形式，由 `into_task` 转换为强类型的 `Task`
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct TaskDto {
    #[validate(length(min = 1, message = "source cannot be empty"))]
    pub source: String,
    #[serde(default)]
    pub keyword: String,
    #[serde(default = "default_page")]
    #[validate(range(min = 1, message = "start_page must be at least 1"))]
    pub start_page: u32,
    #[serde(default = "default_page")]
    pub end_page: u32,
    #[serde(default, alias = "channel_id")]
    pub board_id: Option<String>,
    #[serde(default)]
    pub board_kind: Option<String>,
    #[serde(default)]
    pub search_field: Option<String>,
    #[serde(default)]
    pub sort_mode: Option<String>,
    #[serde(default)]
    pub fallback_to_search: bool,
}

impl TaskDto {
    /// 转换为强类型任务
    ///
    /// # 返回值
    ///
    /// * `Ok(Task)` - 结构合法的任务
    /// * `Err(TaskError)` - 来源未知、选项取值非法或页码范围错误
    pub fn into_task(self) -> Result<Task, TaskError> {
        let source: Source = self.source.parse()?;
        let options = match source {
            Source::DcInside => TaskOptions::DcInside {
                board_id: self.board_id,
                board_kind: parse_option("board_kind", self.board_kind)?,
                search_field: parse_option("search_field", self.search_field)?,
                sort_mode: parse_option("sort_mode", self.sort_mode)?,
                fallback_to_search: self.fallback_to_search,
            },
            Source::ArcaLive => TaskOptions::ArcaLive {
                channel_id: self.board_id,
            },
        };
        Task::new(self.keyword, self.start_page, self.end_page, options)
    }
}

impl SearchRequestDto {
    /// 转换全部任务
    ///
    /// 来源未知的任务记录警告后丢弃，其余结构错误直接返回
    pub fn into_tasks(self) -> Result<Vec<Task>, TaskError> {
        let mut tasks = Vec::with_capacity(self.tasks.len());
        for dto in self.tasks {
            match dto.into_task() {
                Ok(task) => tasks.push(task),
                Err(TaskError::UnknownSource(source)) => {
                    warn!("Dropping task with unknown source '{}'", source);
                }
                Err(e) => return Err(e),
            }
        }
        Ok(tasks)
    }
}

/// 选项取值沿用枚举自身的反序列化规则（包括别名），缺省时取默认值
fn parse_option<T>(field: &'static str, value: Option<String>) -> Result<T, TaskError>
where
    T: DeserializeOwned + Default,
{
    match value {
        None => Ok(T::default()),
        Some(raw) if raw.trim().is_empty() => Ok(T::default()),
        Some(raw) => {
            let normalized = raw.trim().to_ascii_lowercase();
            serde_json::from_value(serde_json::Value::String(normalized))
                .map_err(|_| TaskError::InvalidOption { field, value: raw })
        }
    }
}

/// 社区搜索响应
#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponseDto {
    pub request_id: Uuid,
    /// 截断前的总行数
    pub total: usize,
    pub rows: Vec<CrawledRow>,
    pub generated_at: DateTime<Utc>,
}
