// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施层模块
///
/// 包含与外部站点交互的具体实现：
/// - 社区适配器（community）：两个来源的列表/详情抓取与共用的分页循环
/// - 指标（metrics）：任务与帖子计数，以及可选的 Prometheus 导出器
pub mod community;
pub mod metrics;
