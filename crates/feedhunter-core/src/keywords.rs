//! 关键词表加载（TOML）
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// 分类器使用的四张查找表
/// - `extensions`：Tier-1 路径后缀（大小写不敏感）
/// - `feed`：Tier-2 关键词，命中即接受
/// - `release` / `prerelease`：优先级判定用
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct KeywordTables {
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    #[serde(default = "default_feed")]
    pub feed: Vec<String>,
    #[serde(default = "default_release")]
    pub release: Vec<String>,
    #[serde(default = "default_prerelease")]
    pub prerelease: Vec<String>,
}

const EXTENSIONS: &[&str] = &[".xml", ".appcast"];

const FEED_KEYWORDS: &[&str] = &[
    "appcast", "update", "updates", "sparkle", "release", "releases", "version",
    "versions", "feed", "rss", "changelog", "download", "downloads",
];

const RELEASE_KEYWORDS: &[&str] = &["release", "prod", "stable"];

const PRERELEASE_KEYWORDS: &[&str] = &["beta", "alpha", "nightly", "dev", "tip", "test", "rc", "preview"];

fn owned(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn default_extensions() -> Vec<String> { owned(EXTENSIONS) }
fn default_feed() -> Vec<String> { owned(FEED_KEYWORDS) }
fn default_release() -> Vec<String> { owned(RELEASE_KEYWORDS) }
fn default_prerelease() -> Vec<String> { owned(PRERELEASE_KEYWORDS) }

impl Default for KeywordTables {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            feed: default_feed(),
            release: default_release(),
            prerelease: default_prerelease(),
        }
    }
}

impl KeywordTables {
    /// 从 TOML 文本解析；缺省字段回落到内置表
    pub fn from_toml_str(txt: &str) -> Result<Self> {
        let parsed: KeywordTables = toml::from_str(txt).context("parse keyword tables")?;
        Ok(parsed)
    }

    /// 从 TOML 文件加载
    pub fn load(path: &Path) -> Result<Self> {
        let txt = std::fs::read_to_string(path)
            .with_context(|| format!("read keyword tables {}", path.display()))?;
        Self::from_toml_str(&txt)
    }
}
