//! 字节流分段：把任意二进制切成“可打印文本段”（token）
//!
//! 只做顺序拉取：底层 `BufRead` 每次给出一块缓冲，逐字节判定，不整读文件。
use std::io::{self, BufRead};

use crate::limits::MAX_TOKEN_BYTES;

/// 可打印 ASCII（0x20..=0x7E）或制表符
#[inline]
pub(crate) fn is_token_byte(b: u8) -> bool {
    b == 0x09 || (0x20..=0x7E).contains(&b)
}

/// token 扫描器（借出式迭代：返回的切片在下一次调用前有效）
pub(crate) struct TokenScanner<R> {
    reader: R,
    token: Vec<u8>,
    bytes_read: u64,
}

impl<R: BufRead> TokenScanner<R> {
    pub(crate) fn new(reader: R) -> Self {
        Self { reader, token: Vec::with_capacity(MAX_TOKEN_BYTES), bytes_read: 0 }
    }

    /// 已消费的输入字节数
    pub(crate) fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    /// 取下一个非空 token；输入结束返回 `None`
    /// - 超过 `MAX_TOKEN_BYTES` 的字节直接丢弃，段仍然延续到第一个不可打印字节
    /// - 输入末尾的残留段同样会被交出
    pub(crate) fn next_token(&mut self) -> io::Result<Option<&[u8]>> {
        self.token.clear();
        loop {
            let buf = match self.reader.fill_buf() {
                Ok(b) => b,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            if buf.is_empty() {
                // EOF：冲刷末尾 token
                return Ok(if self.token.is_empty() { None } else { Some(&self.token) });
            }

            let mut consumed = 0usize;
            let mut ended = false;
            for &b in buf {
                consumed += 1;
                if is_token_byte(b) {
                    if self.token.len() < MAX_TOKEN_BYTES {
                        self.token.push(b);
                    }
                } else if !self.token.is_empty() {
                    ended = true;
                    break;
                }
            }
            self.reader.consume(consumed);
            self.bytes_read += consumed as u64;

            if ended {
                return Ok(Some(&self.token));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(input: &[u8]) -> Vec<Vec<u8>> {
        let mut sc = TokenScanner::new(input);
        let mut out = Vec::new();
        while let Some(t) = sc.next_token().unwrap() {
            out.push(t.to_vec());
        }
        out
    }

    #[test]
    fn splits_on_non_printable_and_flushes_tail() {
        let toks = collect(b"\x00\x01abc\x00\x7fdef\tg\x80hi");
        assert_eq!(toks, vec![b"abc".to_vec(), b"def\tg".to_vec(), b"hi".to_vec()]);
    }

    #[test]
    fn newline_and_cr_terminate_tokens() {
        let toks = collect(b"one\ntwo\r\nthree");
        assert_eq!(toks, vec![b"one".to_vec(), b"two".to_vec(), b"three".to_vec()]);
    }

    #[test]
    fn empty_and_binary_only_inputs_yield_nothing() {
        assert!(collect(b"").is_empty());
        assert!(collect(&[0u8, 1, 2, 0xff, 0x80, 0x0a]).is_empty());
    }

    #[test]
    fn long_runs_are_truncated_but_consumed_whole() {
        let mut input = vec![b'a'; MAX_TOKEN_BYTES + 100];
        input.push(0);
        input.extend_from_slice(b"next");
        let toks = collect(&input);
        assert_eq!(toks.len(), 2);
        assert_eq!(toks[0].len(), MAX_TOKEN_BYTES);
        assert_eq!(toks[1], b"next".to_vec());
    }

    #[test]
    fn tokens_span_reader_buffer_boundaries() {
        let data = b"\x00hello world\x00tail".to_vec();
        let reader = std::io::BufReader::with_capacity(3, data.as_slice());
        let mut sc = TokenScanner::new(reader);
        let mut out = Vec::new();
        while let Some(t) = sc.next_token().unwrap() {
            out.push(String::from_utf8_lossy(t).into_owned());
        }
        assert_eq!(out, vec!["hello world", "tail"]);
        assert_eq!(sc.bytes_read(), data.len() as u64);
    }
}
