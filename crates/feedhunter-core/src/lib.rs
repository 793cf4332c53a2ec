//! 二进制 appcast URL 提取库
//!
//! 设计要点：
//! - 把输入当作无结构字节流顺序拉取，切出可打印文本段，不整读文件。
//! - 两级判定：路径后缀（.xml/.appcast）直接接受，否则看关键词子串。
//! - 三个固定容量（单条长度、条数、输出字节数）都是显式常量，边界处确定性地接受或拒绝。
//! - 结果按优先级 → 字节序排序，两次扫描同一输入得到逐字节相同的输出。

mod limits;
mod error;
mod options;
mod candidate;
mod keywords;
mod scanner;
mod classifier;
mod collector;
mod output;
mod scan;
mod bundle;
mod select;

pub use limits::{MAX_TOKEN_BYTES, MAX_URLS, MAX_URL_LENGTH, MIN_URL_LENGTH, OUTPUT_BUFFER_SIZE};
pub use error::ExtractError;
pub use options::{BundleOptions, ScanStats};
pub use candidate::{Candidate, Priority};
pub use keywords::KeywordTables;
pub use classifier::Classifier;
pub use output::UrlList;
pub use scan::{extract_appcast_urls, extract_file, extract_from_reader, scan_candidates, Extraction};
pub use bundle::{
    filter_by_arch, host_arch_keywords, merge_candidates, scan_bundle, BundleReport, BundleTargets, ReportOrigin,
};
pub use select::{collect_app_binaries, collect_framework_binaries, collect_plugin_binaries, should_scan_binary};
