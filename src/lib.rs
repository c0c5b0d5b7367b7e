// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 任务编排、请求数据转换和组件组装
pub mod application;

/// 配置模块
///
/// 处理应用程序的配置设置和环境变量
pub mod config;

/// 领域模块
///
/// 包含任务与帖子模型、适配器接口以及合规、清洗、合并等纯逻辑
pub mod domain;

/// 引擎模块
///
/// HTTP 与无头浏览器两种传输方式，以及请求间隔和身份轮换
pub mod engines;

/// 基础设施模块
///
/// 两个社区来源的适配器和指标
pub mod infrastructure;

/// 表示层模块
///
/// 处理HTTP请求和响应，包括路由和处理器
pub mod presentation;

/// 工具模块
///
/// 提供日志初始化等辅助功能
pub mod utils;
