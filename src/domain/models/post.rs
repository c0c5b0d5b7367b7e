// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::task::Source;
use serde::{Deserialize, Serialize};

/// 合规拒绝时填充的固定标记
pub const DISALLOWED_MARKER: &str = "robots.txt disallow";

/// 列表页解析出的帖子引用
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostStub {
    pub post_id: String,
    pub title: String,
    pub url: String,
    /// 所属版块，`None` 表示无法从列表中确定
    pub board_id: Option<String>,
}

/// 帖子记录
///
/// 详情抓取时创建，`content` 在清洗后保证非空
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostRecord {
    pub source: Source,
    pub post_id: String,
    pub title: String,
    pub content: String,
    /// 按页面顺序排列的评论正文
    pub comments: Vec<String>,
    pub board_id: String,
    pub url: String,
}

impl PostRecord {
    /// 构造合规拒绝哨兵记录
    pub fn disallowed(source: Source, board_id: &str) -> Self {
        Self {
            source,
            post_id: DISALLOWED_MARKER.to_string(),
            title: DISALLOWED_MARKER.to_string(),
            content: format!(
                "Board '{}' is disallowed by robots.txt; crawling was not attempted.",
                board_id
            ),
            comments: vec![DISALLOWED_MARKER.to_string()],
            board_id: DISALLOWED_MARKER.to_string(),
            url: DISALLOWED_MARKER.to_string(),
        }
    }

    pub fn is_disallowed_marker(&self) -> bool {
        self.post_id == DISALLOWED_MARKER && self.url == DISALLOWED_MARKER
    }
}

/// 无法确定所属版块时的处理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownBoardPolicy {
    /// 以占位版块名保留
    #[default]
    Keep,
    /// 丢弃
    Drop,
}

/// 最终结果表中的一行
///
/// 在帖子记录之外附加发起任务的来源和关键词，由编排器负责填充
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawledRow {
    #[serde(flatten)]
    pub record: PostRecord,
    pub task_source: Source,
    pub task_keyword: String,
}

/// 合并后的结果表
pub type ResultTable = Vec<CrawledRow>;
