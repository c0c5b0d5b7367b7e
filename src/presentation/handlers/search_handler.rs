// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::extract::{rejection::JsonRejection, Extension, Json};
use chrono::Utc;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::{
    application::{
        dto::search_request::{SearchRequestDto, SearchResponseDto},
        orchestrator::CrawlOrchestrator,
    },
    presentation::errors::AppError,
};

/// 处理社区搜索请求
///
/// # 参数
///
/// * `orchestrator` - 任务编排器
/// * `payload` - 搜索请求数据
///
/// # 返回值
///
/// 交错合并后的结果表，按 `limit` 截断
///
/// # 错误
///
/// 可能在以下情况下返回错误响应：
/// - 请求体无法解析
/// - 请求参数验证失败
/// - 任务结构不合法（页码范围、必填字段）
pub async fn search(
    Extension(orchestrator): Extension<Arc<CrawlOrchestrator>>,
    payload: Result<Json<SearchRequestDto>, JsonRejection>,
) -> Result<Json<SearchResponseDto>, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let limit = payload.limit;
    let tasks = payload.into_tasks()?;
    let request_id = Uuid::new_v4();
    info!("Community search {} with {} tasks", request_id, tasks.len());

    let mut rows = orchestrator.run(tasks).await;
    let total = rows.len();
    if let Some(limit) = limit {
        rows.truncate(limit);
    }

    Ok(Json(SearchResponseDto {
        request_id,
        total,
        rows,
        generated_at: Utc::now(),
    }))
}
