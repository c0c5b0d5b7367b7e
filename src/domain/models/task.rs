// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// 任务构造错误
///
/// 只覆盖结构性校验，关键词和版块选择的语义正确性由上游规划方负责
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    #[error("start_page must be at least 1, got {0}")]
    InvalidStartPage(u32),

    #[error("end_page ({end}) must not be lower than start_page ({start})")]
    InvalidPageRange { start: u32, end: u32 },

    #[error("board id cannot be empty when provided")]
    EmptyBoardId,

    #[error("keyword is required for an unscoped {0} search")]
    MissingKeyword(Source),

    #[error("unknown source: {0}")]
    UnknownSource(String),

    #[error("invalid value for {field}: {value}")]
    InvalidOption { field: &'static str, value: String },
}

/// 数据来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// 服务端渲染站点，纯 HTTP 抓取
    #[serde(alias = "dc")]
    DcInside,
    /// 客户端渲染站点，需要无头浏览器
    #[serde(alias = "arca")]
    ArcaLive,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::DcInside => "dcinside",
            Source::ArcaLive => "arcalive",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Source {
    type Err = TaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dcinside" | "dc" => Ok(Source::DcInside),
            "arcalive" | "arca" => Ok(Source::ArcaLive),
            other => Err(TaskError::UnknownSource(other.to_string())),
        }
    }
}

/// 排序方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    /// 最新（站点默认顺序）
    #[default]
    Latest,
    /// 相关度
    #[serde(alias = "accuracy")]
    Relevance,
}

/// 版块类型，三种类型对应三个不同的列表路径
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BoardKind {
    Major,
    #[default]
    Minor,
    Mini,
}

impl BoardKind {
    /// 列表页路径模板
    pub fn list_path(&self) -> &'static str {
        match self {
            BoardKind::Major => "/board/lists",
            BoardKind::Minor => "/mgallery/board/lists",
            BoardKind::Mini => "/mini/board/lists",
        }
    }
}

/// 版块内搜索的匹配字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SearchField {
    #[default]
    SubjectAndBody,
    Subject,
    Body,
}

impl SearchField {
    pub fn as_query_value(&self) -> &'static str {
        match self {
            SearchField::SubjectAndBody => "search_subject_memo",
            SearchField::Subject => "search_subject",
            SearchField::Body => "search_memo",
        }
    }
}

/// 按来源区分的任务选项
///
/// 每个变体只携带该来源有效的字段
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum TaskOptions {
    DcInside {
        /// 为空表示全站搜索
        #[serde(default)]
        board_id: Option<String>,
        #[serde(default)]
        board_kind: BoardKind,
        #[serde(default)]
        search_field: SearchField,
        #[serde(default)]
        sort_mode: SortMode,
        /// 版块抓取无结果时改用全站搜索
        #[serde(default)]
        fallback_to_search: bool,
    },
    ArcaLive {
        /// 为空表示聚合频道
        #[serde(default)]
        channel_id: Option<String>,
    },
}

impl TaskOptions {
    pub fn source(&self) -> Source {
        match self {
            TaskOptions::DcInside { .. } => Source::DcInside,
            TaskOptions::ArcaLive { .. } => Source::ArcaLive,
        }
    }

    /// 任务指定的版块/频道标识
    pub fn board_id(&self) -> Option<&str> {
        match self {
            TaskOptions::DcInside { board_id, .. } => board_id.as_deref(),
            TaskOptions::ArcaLive { channel_id } => channel_id.as_deref(),
        }
    }
}

/// 爬取任务
///
/// 一次针对单一来源、单一关键词、有限页码范围的抓取请求。
/// 构造后不可变，字段只能通过访问器读取。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    keyword: String,
    start_page: u32,
    end_page: u32,
    #[serde(flatten)]
    options: TaskOptions,
}

impl Task {
    /// 创建并校验任务
    ///
    /// # 参数
    ///
    /// * `keyword` - 搜索关键词，允许为空（仅版块浏览）
    /// * `start_page` - 起始页（从1开始）
    /// * `end_page` - 结束页（包含）
    /// * `options` - 来源相关选项
    ///
    /// # 返回值
    ///
    /// * `Ok(Task)` - 结构合法的任务
    /// * `Err(TaskError)` - 页码范围或必填字段不合法
    pub fn new(
        keyword: impl Into<String>,
        start_page: u32,
        end_page: u32,
        options: TaskOptions,
    ) -> Result<Self, TaskError> {
        let keyword = keyword.into().trim().to_string();

        if start_page < 1 {
            return Err(TaskError::InvalidStartPage(start_page));
        }
        if end_page < start_page {
            return Err(TaskError::InvalidPageRange {
                start: start_page,
                end: end_page,
            });
        }

        let options = match options {
            TaskOptions::DcInside {
                board_id,
                board_kind,
                search_field,
                sort_mode,
                fallback_to_search,
            } => {
                let board_id = normalize_board_id(board_id)?;
                if board_id.is_none() && keyword.is_empty() {
                    return Err(TaskError::MissingKeyword(Source::DcInside));
                }
                TaskOptions::DcInside {
                    board_id,
                    board_kind,
                    search_field,
                    sort_mode,
                    fallback_to_search,
                }
            }
            TaskOptions::ArcaLive { channel_id } => TaskOptions::ArcaLive {
                channel_id: normalize_board_id(channel_id)?,
            },
        };

        Ok(Self {
            keyword,
            start_page,
            end_page,
            options,
        })
    }

    pub fn source(&self) -> Source {
        self.options.source()
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn start_page(&self) -> u32 {
        self.start_page
    }

    pub fn end_page(&self) -> u32 {
        self.end_page
    }

    pub fn options(&self) -> &TaskOptions {
        &self.options
    }

    pub fn board_id(&self) -> Option<&str> {
        self.options.board_id()
    }
}

fn normalize_board_id(board_id: Option<String>) -> Result<Option<String>, TaskError> {
    match board_id {
        Some(id) => {
            let id = id.trim();
            if id.is_empty() {
                Err(TaskError::EmptyBoardId)
            } else {
                Ok(Some(id.to_string()))
            }
        }
        None => Ok(None),
    }
}
