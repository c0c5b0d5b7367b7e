// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::MetricsSettings;
use crate::domain::models::task::Source;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tracing::{info, warn};

pub const TASKS_TOTAL: &str = "forumcrawl_tasks_total";
pub const POSTS_COLLECTED_TOTAL: &str = "forumcrawl_posts_collected_total";

/// 任务结束状态，作为指标标签
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOutcome {
    Succeeded,
    Disallowed,
    Failed,
    Panicked,
    Unrouted,
}

impl TaskOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskOutcome::Succeeded => "succeeded",
            TaskOutcome::Disallowed => "disallowed",
            TaskOutcome::Failed => "failed",
            TaskOutcome::Panicked => "panicked",
            TaskOutcome::Unrouted => "unrouted",
        }
    }
}

/// 启动 Prometheus 导出器
///
/// 未启用或地址无效时只记录日志，不影响服务启动
pub fn init_metrics(settings: &MetricsSettings) {
    if !settings.enabled {
        info!("Metrics exporter disabled");
        return;
    }

    let addr: SocketAddr = match settings.address.parse() {
        Ok(addr) => addr,
        Err(e) => {
            warn!("Invalid metrics address {}: {}", settings.address, e);
            return;
        }
    };

    // Ignore error if address is already in use (for development/testing)
    if let Err(e) = PrometheusBuilder::new().with_http_listener(addr).install() {
        warn!("Failed to install Prometheus recorder: {}. This might happen if the port is already in use.", e);
        return;
    }

    info!("Metrics exporter listening on {}", addr);
}

pub fn record_task(source: Source, outcome: TaskOutcome) {
    metrics::counter!(TASKS_TOTAL, "source" => source.as_str(), "outcome" => outcome.as_str())
        .increment(1);
}

pub fn record_posts(source: Source, count: usize) {
    metrics::counter!(POSTS_COLLECTED_TOTAL, "source" => source.as_str()).increment(count as u64);
}
