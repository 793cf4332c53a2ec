//! 候选收集：去重 + 容量上限
use crate::candidate::{Candidate, Priority};
use crate::limits::MAX_URLS;

/// 单次插入的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Insert {
    Added,
    /// 已存在相同 url（首次出现者保留，优先级不更新）
    Duplicate,
    /// 已满，静默丢弃
    Full,
}

/// 按发现顺序保存候选，url 两两不同，数量不超过 `MAX_URLS`
#[derive(Debug, Default)]
pub(crate) struct Collector {
    entries: Vec<Candidate>,
}

impl Collector {
    pub(crate) fn new() -> Self {
        Self { entries: Vec::with_capacity(MAX_URLS) }
    }

    /// 大小写敏感的线性查重；未重复且未满时追加
    pub(crate) fn insert(&mut self, url: &[u8], priority: Priority) -> Insert {
        if self.entries.iter().any(|c| c.url.as_bytes() == url) {
            return Insert::Duplicate;
        }
        if self.entries.len() >= MAX_URLS {
            return Insert::Full;
        }
        self.entries.push(Candidate { url: String::from_utf8_lossy(url).into_owned(), priority });
        Insert::Added
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn into_candidates(self) -> Vec<Candidate> {
        self.entries
    }
}
