// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use std::time::Duration;

/// 默认 User-Agent 池
pub const DEFAULT_USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/142.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/141.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/140.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/139.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_2_1) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
];

/// 请求间隔控制
///
/// 只在单个任务内部生效，等待期间不会阻塞其他任务
#[async_trait]
pub trait RateLimiter: Send + Sync {
    async fn pause(&self);
}

/// 身份轮换
pub trait IdentityRotator: Send + Sync {
    /// 为下一次请求挑选 User-Agent
    fn user_agent(&self) -> String;
}

/// 在区间内随机等待
#[derive(Debug, Clone)]
pub struct RandomDelay {
    min: Duration,
    max: Duration,
}

impl RandomDelay {
    pub fn new(min: Duration, max: Duration) -> Self {
        // Swapped bounds are tolerated rather than rejected
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    pub fn from_millis(min_ms: u64, max_ms: u64) -> Self {
        Self::new(Duration::from_millis(min_ms), Duration::from_millis(max_ms))
    }

    /// 抽取一次等待时长
    pub fn sample(&self) -> Duration {
        let min = self.min.as_millis() as u64;
        let max = self.max.as_millis() as u64;
        if min == max {
            return self.min;
        }
        Duration::from_millis(rand::random_range(min..=max))
    }
}

#[async_trait]
impl RateLimiter for RandomDelay {
    async fn pause(&self) {
        let delay = self.sample();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

/// 不等待，测试中使用
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

#[async_trait]
impl RateLimiter for NoDelay {
    async fn pause(&self) {}
}

/// 从固定池中随机挑选 User-Agent
#[derive(Debug, Clone)]
pub struct UserAgentPool {
    agents: Vec<String>,
}

impl Default for UserAgentPool {
    fn default() -> Self {
        Self::new(DEFAULT_USER_AGENTS.iter().copied())
    }
}

impl UserAgentPool {
    /// 创建 User-Agent 池，空池退回默认列表
    pub fn new<I, S>(agents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let agents: Vec<String> = agents
            .into_iter()
            .map(Into::into)
            .filter(|ua: &String| !ua.trim().is_empty())
            .collect();

        if agents.is_empty() {
            return Self {
                agents: DEFAULT_USER_AGENTS.iter().map(|s| s.to_string()).collect(),
            };
        }
        Self { agents }
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

impl IdentityRotator for UserAgentPool {
    fn user_agent(&self) -> String {
        self.agents[rand::random_range(0..self.agents.len())].clone()
    }
}

/// 固定身份，测试中使用
#[derive(Debug, Clone)]
pub struct FixedIdentity(pub String);

impl IdentityRotator for FixedIdentity {
    fn user_agent(&self) -> String {
        self.0.clone()
    }
}
