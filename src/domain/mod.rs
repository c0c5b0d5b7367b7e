// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// 该模块包含系统的核心业务逻辑，包括：
/// - 领域模型（models）：任务、帖子记录和结果行
/// - 社区适配器接口（community）：各来源抓取实现的统一抽象
/// - 服务（services）：合规检查、内容清洗、去重与合并
///
/// 领域层不依赖于任何网络实现，适配器接口的具体实现位于基础设施层。
pub mod community;
pub mod models;
pub mod services;
