// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 社区适配器模块
///
/// 定义各来源抓取实现需要满足的接口
pub mod adapter;

pub use adapter::{AdapterError, CommunityAdapter};
