//! 单文件提取主流程：分段 → 分类 → 收集 → 排序 → 输出
//!
//! 每次调用独占自己的 token 缓冲、集合与输出缓冲，不共享任何可变状态，
//! 因此不同线程可以并发处理互不相关的输入。
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, info};

use crate::candidate::{sort_candidates, Candidate};
use crate::classifier::Classifier;
use crate::collector::{Collector, Insert};
use crate::error::ExtractError;
use crate::options::ScanStats;
use crate::output::{build_output, UrlList};
use crate::scanner::TokenScanner;

/// 一次完整提取的结果
#[derive(Debug, Clone)]
pub struct Extraction {
    /// 已排序的候选（最多 `MAX_URLS` 条）
    pub candidates: Vec<Candidate>,
    pub output: UrlList,
    pub stats: ScanStats,
}

/// 扫描字节流并返回排序后的候选
/// 读取失败即整体失败，不返回部分结果
pub fn scan_candidates<R: Read>(reader: R, classifier: &Classifier) -> Result<(Vec<Candidate>, ScanStats), ExtractError> {
    let mut scanner = TokenScanner::new(BufReader::new(reader));
    let mut collector = Collector::new();
    let mut stats = ScanStats::default();

    while let Some(token) = scanner.next_token()? {
        stats.tokens_seen += 1;
        let priority = match classifier.classify(token) {
            Some(p) => p,
            None => continue,
        };
        match collector.insert(token, priority) {
            Insert::Added => {
                stats.candidates_accepted += 1;
                debug!(url = %String::from_utf8_lossy(token), %priority, "candidate accepted");
            }
            Insert::Duplicate => stats.duplicates += 1,
            Insert::Full => {
                stats.dropped_at_capacity += 1;
                debug!(url = %String::from_utf8_lossy(token), "collection full, candidate dropped");
            }
        }
    }
    stats.bytes_read = scanner.bytes_read();
    debug!(collected = collector.len(), tokens = stats.tokens_seen, "scan complete");

    let mut candidates = collector.into_candidates();
    sort_candidates(&mut candidates);
    Ok((candidates, stats))
}

/// 对任意字节流执行完整流程（含输出缓冲区构建）
pub fn extract_from_reader<R: Read>(reader: R, classifier: &Classifier) -> Result<Extraction, ExtractError> {
    let (candidates, mut stats) = scan_candidates(reader, classifier)?;
    let (output, skipped) = build_output(&candidates)?;
    stats.output_skipped = skipped;
    Ok(Extraction { candidates, output, stats })
}

/// 按路径打开并提取 appcast URL（内置关键词表）
pub fn extract_appcast_urls(path: &Path) -> Result<UrlList, ExtractError> {
    extract_file(path, &Classifier::default()).map(|e| e.output)
}

/// 按路径打开并提取（自定义分类器）
pub fn extract_file(path: &Path, classifier: &Classifier) -> Result<Extraction, ExtractError> {
    let file = File::open(path)?;
    let extraction = extract_from_reader(file, classifier)?;
    info!(
        path = %path.display(),
        bytes = extraction.stats.bytes_read,
        tokens = extraction.stats.tokens_seen,
        urls = extraction.candidates.len(),
        "binary scanned"
    );
    Ok(extraction)
}
