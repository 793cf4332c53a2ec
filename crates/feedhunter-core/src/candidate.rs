//! 候选项、优先级与排序
use serde::Serialize;
use std::fmt;

/// 候选优先级（数值越小越可能是正式发布源）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    /// .xml/.appcast + release/prod/stable
    FeedRelease = 0,
    /// .xml/.appcast，无特殊标记
    Feed = 1,
    /// .xml/.appcast + 预发布标记
    FeedPrerelease = 2,
    /// 非 XML + release/prod/stable
    Release = 3,
    /// 非 XML，无特殊标记
    Plain = 4,
    /// 非 XML + 预发布标记
    Prerelease = 5,
}

impl Priority {
    /// 由三个判定位组合出优先级；release 先于 prerelease 判定
    pub fn from_flags(is_xml: bool, has_release: bool, has_prerelease: bool) -> Self {
        match (is_xml, has_release, has_prerelease) {
            (true, true, _) => Priority::FeedRelease,
            (true, false, true) => Priority::FeedPrerelease,
            (true, false, false) => Priority::Feed,
            (false, true, _) => Priority::Release,
            (false, false, true) => Priority::Prerelease,
            (false, false, false) => Priority::Plain,
        }
    }

    /// 整数等级 0..=5
    pub fn rank(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.rank())
    }
}

impl Serialize for Priority {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u8(self.rank())
    }
}

/// 通过分类且未重复的 token
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    pub url: String,
    pub priority: Priority,
}

/// 全序排序：优先级升序 → url 字节序升序
/// 相同优先级下不保留发现顺序，由字符串比较决定
pub(crate) fn sort_candidates(candidates: &mut [Candidate]) {
    candidates.sort_unstable_by(|a, b| {
        a.priority
            .cmp(&b.priority)
            .then_with(|| a.url.as_bytes().cmp(b.url.as_bytes()))
    });
}
