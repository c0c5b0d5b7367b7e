// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// - 任务（task）：规划方下发的结构化抓取指令
/// - 帖子（post）：列表引用、帖子记录以及带任务标签的结果行
pub mod post;
pub mod task;
