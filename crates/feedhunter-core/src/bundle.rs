//! 多二进制扫描：主可执行文件优先，其余二进制并行扫描后合并
//!
//! 流程：
//! 1) 主二进制不限大小，先行扫描；只要有结果即直接返回；
//! 2) 否则在 Rayon 线程池上并行扫描次要二进制（按类型限制大小，不可读的文件记日志后跳过）；
//! 3) 按输入顺序合并 → 优先级稳定排序 → 保留首次出现者去重；
//! 4) 多于一条时可按本机架构关键词过滤（若无一命中则保留全部）。
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::candidate::Candidate;
use crate::classifier::Classifier;
use crate::options::BundleOptions;
use crate::scan::{extract_file, Extraction};

/// 待扫描的二进制集合
#[derive(Debug, Clone, Default)]
pub struct BundleTargets {
    /// 主可执行文件（不受大小限制）
    pub main: Option<PathBuf>,
    /// 次要二进制（framework、dylib、plugin 等）
    pub others: Vec<PathBuf>,
}

/// 结果来源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportOrigin {
    Main,
    Secondary,
    None,
}

#[derive(Debug, Clone)]
pub struct BundleReport {
    pub urls: Vec<Candidate>,
    pub origin: ReportOrigin,
    /// 实际完成扫描的文件数
    pub scanned: usize,
    /// 因超限或不可读而跳过的文件数
    pub skipped: usize,
}

/// 本机架构在 URL 中常见的标记
pub fn host_arch_keywords() -> &'static [&'static str] {
    if cfg!(target_arch = "aarch64") {
        &["arm64", "apple"]
    } else if cfg!(target_arch = "x86_64") {
        &["intel", "x86_64", "x64"]
    } else {
        &[]
    }
}

/// 路径中含 `plugins` 目录分量即视为插件
fn is_plugin(path: &Path) -> bool {
    path.components().any(|c| c.as_os_str() == "plugins")
}

fn size_limit_for(path: &Path, opts: &BundleOptions) -> Option<u64> {
    if is_plugin(path) { opts.plugin_size_limit } else { opts.framework_size_limit }
}

/// 扫描单个次要二进制；超限或失败返回 None
fn scan_secondary(path: &Path, classifier: &Classifier, opts: &BundleOptions) -> Option<Vec<Candidate>> {
    if let Some(limit) = size_limit_for(path, opts) {
        match std::fs::metadata(path) {
            Ok(md) if md.len() > limit => {
                info!(path = %path.display(), size = md.len(), limit, "skipped, file too large");
                return None;
            }
            Ok(_) => {}
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cannot stat binary");
                return None;
            }
        }
    }
    match extract_file(path, classifier) {
        Ok(ex) => Some(emitted_candidates(ex)),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "binary scan failed");
            None
        }
    }
}

/// 只保留真正写进输出缓冲区的候选（输出阶段被跳过的条目不参与合并）
fn emitted_candidates(ex: Extraction) -> Vec<Candidate> {
    let Extraction { candidates, output, .. } = ex;
    let emitted: HashSet<&str> = output.urls().collect();
    candidates.into_iter().filter(|c| emitted.contains(c.url.as_str())).collect()
}

/// 合并多个二进制的结果：优先级稳定排序后按 url 去重（首次出现者保留）
pub fn merge_candidates(per_binary: Vec<Vec<Candidate>>) -> Vec<Candidate> {
    let mut all: Vec<Candidate> = per_binary.into_iter().flatten().collect();
    all.sort_by_key(|c| c.priority);
    let mut seen: HashSet<String> = HashSet::new();
    all.retain(|c| seen.insert(c.url.clone()));
    all
}

/// 多于一条时仅保留包含任一架构关键词的 url；无一命中则原样返回
pub fn filter_by_arch(urls: Vec<Candidate>, keywords: &[&str]) -> Vec<Candidate> {
    if urls.len() <= 1 || keywords.is_empty() {
        return urls;
    }
    let matching: Vec<Candidate> = urls
        .iter()
        .filter(|c| {
            let lower = c.url.to_ascii_lowercase();
            keywords.iter().any(|k| lower.contains(k))
        })
        .cloned()
        .collect();
    if matching.is_empty() { urls } else { matching }
}

/// 扫描一组二进制并返回合并后的候选
pub fn scan_bundle(targets: &BundleTargets, classifier: &Classifier, opts: &BundleOptions) -> BundleReport {
    let mut scanned = 0usize;
    let mut skipped = 0usize;

    // 主二进制：不限大小，有结果即提前返回
    if let Some(main) = &targets.main {
        match extract_file(main, classifier) {
            Ok(ex) => {
                scanned += 1;
                let urls = emitted_candidates(ex);
                if !urls.is_empty() {
                    info!(path = %main.display(), urls = urls.len(), "urls found in main binary");
                    return BundleReport { urls, origin: ReportOrigin::Main, scanned, skipped };
                }
                debug!(path = %main.display(), "no urls in main binary");
            }
            Err(e) => {
                skipped += 1;
                warn!(path = %main.display(), error = %e, "main binary scan failed");
            }
        }
    }

    let others: Vec<&PathBuf> = targets
        .others
        .iter()
        .filter(|p| targets.main.as_ref() != Some(*p))
        .collect();
    if others.is_empty() {
        return BundleReport { urls: Vec::new(), origin: ReportOrigin::None, scanned, skipped };
    }

    let threads = opts.threads.unwrap_or_else(num_cpus::get).max(1);
    let results = run_parallel(&others, classifier, opts, threads);

    let mut per_binary = Vec::with_capacity(results.len());
    for r in results {
        match r {
            Some(v) => { scanned += 1; per_binary.push(v); }
            None => skipped += 1,
        }
    }

    let mut urls = merge_candidates(per_binary);
    if opts.arch_filter {
        urls = filter_by_arch(urls, host_arch_keywords());
    }
    let origin = if urls.is_empty() { ReportOrigin::None } else { ReportOrigin::Secondary };
    info!(binaries = others.len(), scanned, skipped, urls = urls.len(), "secondary binaries scanned");
    BundleReport { urls, origin, scanned, skipped }
}

/// 在专用线程池上并行扫描，结果保持输入顺序
fn run_parallel(paths: &[&PathBuf], classifier: &Classifier, opts: &BundleOptions, threads: usize) -> Vec<Option<Vec<Candidate>>> {
    use rayon::prelude::*;

    let scan_all = || -> Vec<Option<Vec<Candidate>>> {
        paths.par_iter().map(|p| scan_secondary(p, classifier, opts)).collect()
    };
    match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
        Ok(pool) => pool.install(scan_all),
        Err(e) => {
            // 线程池创建失败时退回全局池
            warn!(error = %e, "build rayon pool failed, using global pool");
            scan_all()
        }
    }
}
