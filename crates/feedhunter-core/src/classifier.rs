//! URL 分类器（结构预筛 + 两级接受 + 优先级）
//!
//! 关键词匹配是纯子串语义，不做词边界判定：`updates` 出现在任何更长的单词里同样命中。
//! 这会带来一定误报，但属于既有行为，保持不变。
use aho_corasick::{AhoCorasick, BuildError};

use crate::candidate::Priority;
use crate::keywords::KeywordTables;
use crate::limits::MIN_URL_LENGTH;

/// 不可变分类配置：构造后只读，可跨线程共享
#[derive(Debug, Clone)]
pub struct Classifier {
    tables: KeywordTables,
    feed: AhoCorasick,
    release: AhoCorasick,
    prerelease: AhoCorasick,
}

/// 构建大小写不敏感的子串自动机（关键词均为 ASCII，与“先转小写再查找”等价）
fn build_matcher(words: &[String]) -> Result<AhoCorasick, BuildError> {
    AhoCorasick::builder().ascii_case_insensitive(true).build(words)
}

/// 大小写不敏感的后缀判断
fn ends_with_ci(s: &[u8], suffix: &[u8]) -> bool {
    s.len() >= suffix.len() && s[s.len() - suffix.len()..].eq_ignore_ascii_case(suffix)
}

impl Classifier {
    pub fn new(tables: KeywordTables) -> Result<Self, BuildError> {
        let feed = build_matcher(&tables.feed)?;
        let release = build_matcher(&tables.release)?;
        let prerelease = build_matcher(&tables.prerelease)?;
        Ok(Self { tables, feed, release, prerelease })
    }

    pub fn tables(&self) -> &KeywordTables {
        &self.tables
    }

    /// 判定 token 是否为候选 appcast URL；接受时返回其优先级
    /// 1) 以 http:// 或 https:// 开头且长度 ≥ 15
    /// 2) Tier-1：路径（? 或 # 之前）以 .xml/.appcast 结尾
    /// 3) Tier-2：首个空白之前的部分包含任一 feed 关键词
    pub fn classify(&self, token: &[u8]) -> Option<Priority> {
        if !(token.starts_with(b"http://") || token.starts_with(b"https://")) {
            return None;
        }
        if token.len() < MIN_URL_LENGTH {
            return None;
        }

        let url_end = token
            .iter()
            .position(|&b| matches!(b, b' ' | b'\t' | b'\r' | b'\n'))
            .unwrap_or(token.len());
        let url = &token[..url_end];
        let path_end = url
            .iter()
            .position(|&b| b == b'?' || b == b'#')
            .unwrap_or(url_end);

        let is_xml = self.is_feed_path(&token[..path_end]);
        if !is_xml && !self.feed.is_match(url) {
            return None;
        }

        let has_release = self.release.is_match(url);
        let has_prerelease = self.prerelease.is_match(url);
        Some(Priority::from_flags(is_xml, has_release, has_prerelease))
    }

    fn is_feed_path(&self, path: &[u8]) -> bool {
        self.tables
            .extensions
            .iter()
            .any(|ext| ends_with_ci(path, ext.as_bytes()))
    }
}

impl Default for Classifier {
    fn default() -> Self {
        // 内置表只有几十个短关键词，自动机构建不会超出任何容量限制
        Self::new(KeywordTables::default()).expect("build built-in keyword automata")
    }
}
