//! 输出缓冲区构建（换行分隔，容量固定）
use tracing::debug;

use crate::candidate::Candidate;
use crate::error::ExtractError;
use crate::limits::OUTPUT_BUFFER_SIZE;

/// 最终输出：按排序顺序的 `url\n` 序列，末尾有空间时追加 0 字节哨兵
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlList {
    buf: Vec<u8>,
    len: usize,
}

impl UrlList {
    /// 已写入字节数（不含哨兵）
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// 有效内容（不含哨兵）
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// 逐条 url（内容均为可打印 ASCII）
    pub fn urls(&self) -> impl Iterator<Item = &str> + '_ {
        self.as_bytes()
            .split(|&b| b == b'\n')
            .filter(|line| !line.is_empty())
            .filter_map(|line| std::str::from_utf8(line).ok())
    }

    /// 优先级最高的一条
    pub fn first(&self) -> Option<&str> {
        self.urls().next()
    }

    /// 交出原始缓冲区（含哨兵）与有效长度
    pub fn into_parts(self) -> (Vec<u8>, usize) {
        (self.buf, self.len)
    }
}

/// 按顺序写入候选；放不下的条目跳过，继续尝试后面的条目
/// 条目仅在 `written + url.len() + 1 < OUTPUT_BUFFER_SIZE` 时写入，总为哨兵保留一个字节
/// 返回输出与被跳过的条目数
pub(crate) fn build_output(sorted: &[Candidate]) -> Result<(UrlList, usize), ExtractError> {
    let mut buf: Vec<u8> = Vec::new();
    buf.try_reserve_exact(OUTPUT_BUFFER_SIZE)
        .map_err(|_| ExtractError::Allocation { requested: OUTPUT_BUFFER_SIZE })?;

    let mut skipped = 0usize;
    for c in sorted {
        let url = c.url.as_bytes();
        if buf.len() + url.len() + 1 < OUTPUT_BUFFER_SIZE {
            buf.extend_from_slice(url);
            buf.push(b'\n');
        } else {
            skipped += 1;
            debug!(url = %c.url, written = buf.len(), "output buffer full, entry skipped");
        }
    }

    let len = buf.len();
    if len < OUTPUT_BUFFER_SIZE {
        buf.push(0);
    }
    Ok((UrlList { buf, len }, skipped))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::Priority;

    fn c(url: String) -> Candidate {
        Candidate { url, priority: Priority::Plain }
    }

    #[test]
    fn writes_newline_separated_with_sentinel() {
        let v = vec![c("https://a.example/feed".into()), c("https://b.example/rss".into())];
        let (out, skipped) = build_output(&v).unwrap();
        assert_eq!(skipped, 0);
        assert_eq!(out.as_bytes(), b"https://a.example/feed\nhttps://b.example/rss\n");
        assert_eq!(out.first(), Some("https://a.example/feed"));
        let (raw, len) = out.into_parts();
        assert_eq!(raw.len(), len + 1);
        assert_eq!(raw[len], 0);
    }

    #[test]
    fn empty_input_gives_empty_buffer() {
        let (out, skipped) = build_output(&[]).unwrap();
        assert!(out.is_empty());
        assert_eq!(skipped, 0);
        assert_eq!(out.urls().count(), 0);
    }

    #[test]
    fn oversized_entry_is_skipped_and_later_ones_still_fit() {
        // 5 条 2047 字节的 url 已占满 10240；第 5 条放不下被跳过，短 url 仍写入
        let long = |ch: char| format!("https://{}", ch.to_string().repeat(2047 - 8));
        let v = vec![long('a'), long('b'), long('c'), long('d'), long('e'), "https://z.example/feed".to_string()]
            .into_iter()
            .map(c)
            .collect::<Vec<_>>();
        let (out, skipped) = build_output(&v).unwrap();
        assert_eq!(skipped, 1);
        assert_eq!(out.len(), 4 * 2048 + "https://z.example/feed\n".len());
        assert!(out.len() < OUTPUT_BUFFER_SIZE);
        let urls: Vec<&str> = out.urls().collect();
        assert_eq!(urls.len(), 5);
        assert_eq!(urls[4], "https://z.example/feed");
    }

    #[test]
    fn exact_fit_is_rejected_to_keep_sentinel_room() {
        // url + '\n' 恰好等于容量时不写入
        let url = format!("https://{}", "x".repeat(OUTPUT_BUFFER_SIZE - 1 - 8));
        let (out, skipped) = build_output(&[c(url)]).unwrap();
        assert_eq!(skipped, 1);
        assert!(out.is_empty());
    }
}
