// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::collections::HashSet;

/// 合规检查器
///
/// 持有某一来源 robots.txt 中禁止抓取的版块/频道标识。
/// 列表由配置注入，不在代码中硬编码。
#[derive(Debug, Clone, Default)]
pub struct ComplianceGate {
    disallowed: HashSet<String>,
}

impl ComplianceGate {
    /// 创建新的合规检查器
    ///
    /// # 参数
    ///
    /// * `disallowed` - 禁止抓取的版块标识
    pub fn new<I, S>(disallowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            disallowed: disallowed
                .into_iter()
                .map(|id| id.as_ref().trim().to_string())
                .filter(|id| !id.is_empty())
                .collect(),
        }
    }

    /// 检查版块是否允许抓取
    ///
    /// `None` 表示未限定版块的全站/聚合搜索，总是允许
    pub fn is_allowed(&self, board_id: Option<&str>) -> bool {
        match board_id {
            Some(id) => !self.disallowed.contains(id.trim()),
            None => true,
        }
    }

    pub fn len(&self) -> usize {
        self.disallowed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.disallowed.is_empty()
    }
}
