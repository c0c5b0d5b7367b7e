// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::orchestrator::CrawlOrchestrator;
use crate::config::settings::{ArcaLiveSettings, DcInsideSettings, Settings};
use crate::domain::community::CommunityAdapter;
use crate::domain::services::compliance::ComplianceGate;
use crate::domain::services::sanitizer::ContentSanitizer;
use crate::engines::chromium_engine::{ChromiumLauncher, ChromiumOptions};
use crate::engines::politeness::{IdentityRotator, RandomDelay, UserAgentPool};
use crate::infrastructure::community::{
    ArcaLiveAdapter, ArcaLiveConfig, CrawlPolicy, DcInsideAdapter, DcInsideConfig,
};
use anyhow::Context;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use url::Url;

/// 根据配置组装编排器和两个来源的适配器
pub fn build_orchestrator(settings: &Settings) -> anyhow::Result<CrawlOrchestrator> {
    let identity: Arc<dyn IdentityRotator> =
        Arc::new(UserAgentPool::new(settings.politeness.user_agents.clone()));
    let sanitizer = ContentSanitizer::new(settings.sanitizer.boilerplate.clone());

    let base_policy = |disallowed: &[String], min_ms: u64, max_ms: u64| CrawlPolicy {
        gate: ComplianceGate::new(disallowed),
        detail_delay: Arc::new(RandomDelay::from_millis(min_ms, max_ms)),
        identity: identity.clone(),
        sanitizer: sanitizer.clone(),
        unknown_board: settings.crawl.unknown_board_policy,
        unknown_board_placeholder: settings.crawl.unknown_board_placeholder.clone(),
    };

    let dc = &settings.dcinside;
    let dc_policy = base_policy(
        &dc.disallowed_boards,
        dc.detail_delay_min_ms,
        dc.detail_delay_max_ms,
    );
    let dcinside = DcInsideAdapter::new(dcinside_config(dc)?, dc_policy);

    let arca = &settings.arcalive;
    let arca_policy = base_policy(
        &arca.disallowed_channels,
        arca.detail_delay_min_ms,
        arca.detail_delay_max_ms,
    );
    let launcher = Arc::new(ChromiumLauncher::new(chromium_options(arca)));
    let arcalive = ArcaLiveAdapter::new(arcalive_config(arca)?, launcher, arca_policy);

    let adapters: Vec<Arc<dyn CommunityAdapter>> = vec![Arc::new(dcinside), Arc::new(arcalive)];
    info!(
        "Registered adapters: {}",
        adapters
            .iter()
            .map(|a| a.name())
            .collect::<Vec<_>>()
            .join(", ")
    );

    Ok(CrawlOrchestrator::new(adapters))
}

fn dcinside_config(settings: &DcInsideSettings) -> anyhow::Result<DcInsideConfig> {
    let gallery_base = Url::parse(&settings.gallery_base_url)
        .with_context(|| format!("invalid dcinside.gallery_base_url: {}", settings.gallery_base_url))?;
    let search_base = Url::parse(&settings.search_base_url)
        .with_context(|| format!("invalid dcinside.search_base_url: {}", settings.search_base_url))?;

    let mut config = DcInsideConfig::new(gallery_base, search_base);
    config.request_timeout = Duration::from_secs(settings.request_timeout_secs);
    config.operator_name = settings.operator_name.clone();
    config.list_retry_delay = Arc::new(RandomDelay::from_millis(
        settings.list_retry_delay_min_ms,
        settings.list_retry_delay_max_ms,
    ));
    Ok(config)
}

fn arcalive_config(settings: &ArcaLiveSettings) -> anyhow::Result<ArcaLiveConfig> {
    let base_url = Url::parse(&settings.base_url)
        .with_context(|| format!("invalid arcalive.base_url: {}", settings.base_url))?;

    Ok(ArcaLiveConfig {
        base_url,
        aggregate_channel: settings.aggregate_channel.clone(),
        list_wait: Duration::from_secs(settings.list_wait_secs),
        content_wait: Duration::from_secs(settings.content_wait_secs),
        comment_wait: Duration::from_millis(settings.comment_wait_ms),
    })
}

fn chromium_options(settings: &ArcaLiveSettings) -> ChromiumOptions {
    ChromiumOptions {
        remote_debugging_url: settings.remote_debugging_url.clone(),
        chrome_executable: settings.chrome_executable.clone(),
        headless: settings.headless,
        page_load_timeout: Duration::from_secs(settings.page_load_timeout_secs),
        block_resources: settings.block_resources,
    }
}
