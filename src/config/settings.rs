// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::domain::models::post::UnknownBoardPolicy;
use crate::engines::politeness::DEFAULT_USER_AGENTS;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// 应用程序配置设置
///
/// 服务器、两个社区来源、礼貌策略、清洗规则和指标导出的全部配置项
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 服务器配置
    pub server: ServerSettings,
    /// DC Inside 配置
    pub dcinside: DcInsideSettings,
    /// Arca Live 配置
    pub arcalive: ArcaLiveSettings,
    /// 请求身份配置
    pub politeness: PolitenessSettings,
    /// 内容清洗配置
    pub sanitizer: SanitizerSettings,
    /// 爬取行为配置
    pub crawl: CrawlSettings,
    /// 指标配置
    pub metrics: MetricsSettings,
}

/// 服务器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// 服务器监听主机地址
    pub host: String,
    /// 服务器监听端口
    pub port: u16,
}

/// DC Inside 配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct DcInsideSettings {
    /// 画廊站点地址
    pub gallery_base_url: String,
    /// 全站搜索站点地址
    pub search_base_url: String,
    /// 单次请求超时（秒）
    pub request_timeout_secs: u64,
    /// 详情页之间的最小间隔（毫秒）
    pub detail_delay_min_ms: u64,
    /// 详情页之间的最大间隔（毫秒）
    pub detail_delay_max_ms: u64,
    /// 列表页失败后的最小等待（毫秒）
    pub list_retry_delay_min_ms: u64,
    /// 列表页失败后的最大等待（毫秒）
    pub list_retry_delay_max_ms: u64,
    /// 运营者账号名，其帖子不参与抓取
    pub operator_name: String,
    /// robots.txt 禁止的画廊
    pub disallowed_boards: Vec<String>,
}

/// Arca Live 配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ArcaLiveSettings {
    pub base_url: String,
    /// 未指定频道时使用的聚合频道
    pub aggregate_channel: String,
    /// 页面加载超时（秒）
    pub page_load_timeout_secs: u64,
    /// 列表行等待时间（秒）
    pub list_wait_secs: u64,
    /// 正文容器等待时间（秒）
    pub content_wait_secs: u64,
    /// 评论容器等待时间（毫秒）
    pub comment_wait_ms: u64,
    pub detail_delay_min_ms: u64,
    pub detail_delay_max_ms: u64,
    /// robots.txt 禁止的频道
    pub disallowed_channels: Vec<String>,
    pub headless: bool,
    /// 屏蔽图片、样式表和字体
    pub block_resources: bool,
    /// 远程 Chrome 调试地址
    pub remote_debugging_url: Option<String>,
    /// Chrome 可执行文件路径
    pub chrome_executable: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PolitenessSettings {
    /// User-Agent 池
    pub user_agents: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SanitizerSettings {
    /// 需要剔除的站点生成文本
    pub boilerplate: Vec<String>,
}

/// 爬取行为配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlSettings {
    /// 无法确定所属版块的帖子如何处理
    pub unknown_board_policy: UnknownBoardPolicy,
    /// 保留时使用的占位版块名
    pub unknown_board_placeholder: String,
}

/// 指标配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsSettings {
    /// 是否启动 Prometheus 导出器
    pub enabled: bool,
    /// 导出器监听地址
    pub address: String,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 依次加载默认值、`config/default`、`config/{APP_ENVIRONMENT}`
    /// 以及 `FORUMCRAWL__` 前缀的环境变量
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Self::defaults()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::with_prefix("FORUMCRAWL")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("dcinside.disallowed_boards")
                    .with_list_parse_key("arcalive.disallowed_channels")
                    .with_list_parse_key("sanitizer.boilerplate"),
            );

        builder.build()?.try_deserialize()
    }

    /// 只从默认值和指定文件加载配置
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::defaults()?
            .add_source(File::from(path.as_ref()))
            .build()?
            .try_deserialize()
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            // DC Inside
            .set_default("dcinside.gallery_base_url", "https://gall.dcinside.com")?
            .set_default("dcinside.search_base_url", "https://search.dcinside.com")?
            .set_default("dcinside.request_timeout_secs", 10)?
            .set_default("dcinside.detail_delay_min_ms", 3000)?
            .set_default("dcinside.detail_delay_max_ms", 5000)?
            .set_default("dcinside.list_retry_delay_min_ms", 2000)?
            .set_default("dcinside.list_retry_delay_max_ms", 4000)?
            .set_default("dcinside.operator_name", "운영자")?
            .set_default(
                "dcinside.disallowed_boards",
                vec![
                    "47",
                    "singo",
                    "stock_new",
                    "cat",
                    "dog",
                    "baseball_new8",
                    "m_entertainer1",
                    "stock_new2",
                    "ib_new",
                    "d_fighter_new1",
                    "produce48",
                    "sportsseoul",
                    "metakr",
                    "salgoonews",
                    "rezero",
                ],
            )?
            // Arca Live
            .set_default("arcalive.base_url", "https://arca.live")?
            .set_default("arcalive.aggregate_channel", "breaking")?
            .set_default("arcalive.page_load_timeout_secs", 20)?
            .set_default("arcalive.list_wait_secs", 15)?
            .set_default("arcalive.content_wait_secs", 5)?
            .set_default("arcalive.comment_wait_ms", 1000)?
            .set_default("arcalive.detail_delay_min_ms", 1500)?
            .set_default("arcalive.detail_delay_max_ms", 3500)?
            .set_default("arcalive.disallowed_channels", vec!["my"])?
            .set_default("arcalive.headless", true)?
            .set_default("arcalive.block_resources", true)?
            .set_default("politeness.user_agents", DEFAULT_USER_AGENTS.to_vec())?
            .set_default("sanitizer.boilerplate", vec!["- dc official App"])?
            .set_default("crawl.unknown_board_policy", "keep")?
            .set_default("crawl.unknown_board_placeholder", "unknown")?
            .set_default("metrics.enabled", false)?
            .set_default("metrics.address", "0.0.0.0:9000")
    }
}
