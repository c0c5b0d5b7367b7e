// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 纯函数式的业务规则，不做任何网络请求：
/// - 合规检查（compliance）：版块禁止列表
/// - 内容清洗（sanitizer）：去除链接和站点模板文字
/// - 合并（merge）：任务内去重与跨来源交错合并
pub mod compliance;
pub mod merge;
pub mod sanitizer;
