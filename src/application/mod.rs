// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 任务编排、请求数据转换以及根据配置组装各组件
pub mod bootstrap;
pub mod dto;
pub mod orchestrator;
