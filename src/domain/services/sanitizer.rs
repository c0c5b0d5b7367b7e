// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use once_cell::sync::Lazy;
use regex::Regex;

static URL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"https?://(?:[a-zA-Z0-9$\-@.&+:/?=!*(),]|%[0-9a-fA-F]{2})+")
        .expect("URL pattern is a valid regex")
});

/// 默认的站点模板文字（移动端应用签名）
pub const DEFAULT_BOILERPLATE: &[&str] = &["- dc official App"];

/// 内容清洗器
///
/// 去除标题、正文和评论中的链接以及站点自动生成的模板文字。
/// 对所有来源一视同仁，且幂等：对已清洗的文本再次清洗不会有变化。
#[derive(Debug, Clone)]
pub struct ContentSanitizer {
    boilerplate: Vec<String>,
}

impl Default for ContentSanitizer {
    fn default() -> Self {
        Self::new(DEFAULT_BOILERPLATE.iter().copied())
    }
}

impl ContentSanitizer {
    pub fn new<I, S>(boilerplate: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            boilerplate: boilerplate
                .into_iter()
                .map(Into::into)
                .filter(|s: &String| !s.is_empty())
                .collect(),
        }
    }

    /// 清洗一段文本
    ///
    /// 重复执行单轮清洗直到文本不再变化，因为删除模板文字可能让两侧的
    /// 片段重新拼出一个链接。每轮都只会缩短文本，所以一定会终止。
    pub fn clean(&self, text: &str) -> String {
        let mut current = self.clean_once(text);
        loop {
            let next = self.clean_once(&current);
            if next == current {
                return current;
            }
            current = next;
        }
    }

    /// 清洗评论列表，丢弃清洗后为空的评论
    pub fn clean_all(&self, texts: &[String]) -> Vec<String> {
        texts
            .iter()
            .map(|t| self.clean(t))
            .filter(|t| !t.is_empty())
            .collect()
    }

    fn clean_once(&self, text: &str) -> String {
        let mut cleaned = URL_PATTERN.replace_all(text, "").into_owned();
        for phrase in &self.boilerplate {
            cleaned = cleaned.replace(phrase.as_str(), "");
        }
        cleaned.trim().to_string()
    }
}
