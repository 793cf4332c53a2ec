//! 单次提取的计数器与多二进制扫描的参数

/// 单次提取的统计信息（便于 CLI 打印与排查）
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScanStats {
    pub bytes_read: u64,
    pub tokens_seen: usize,
    /// 通过分类并进入集合的候选数
    pub candidates_accepted: usize,
    pub duplicates: usize,
    /// 集合已满后被丢弃的新候选数
    pub dropped_at_capacity: usize,
    /// 输出缓冲区放不下而跳过的条目数
    pub output_skipped: usize,
}

/// 多二进制扫描选项
#[derive(Debug, Clone)]
pub struct BundleOptions {
    /// 线程数：None 表示自动（等于 CPU 核数）
    pub threads: Option<usize>,
    /// 普通次要二进制（framework/dylib 等）的大小上限（字节）
    pub framework_size_limit: Option<u64>,
    /// 位于 plugins 目录下的二进制的大小上限（字节）
    pub plugin_size_limit: Option<u64>,
    /// 从 Contents/Frameworks 挑选的二进制上限（按大小降序）
    pub max_frameworks: usize,
    /// 从 Contents/MacOS/plugins 挑选的插件上限（UI 类优先）
    pub max_plugins: usize,
    /// 结果多于一条时是否按本机架构过滤
    pub arch_filter: bool,
}

impl Default for BundleOptions {
    fn default() -> Self {
        Self {
            threads: None,
            framework_size_limit: Some(30_000_000),
            plugin_size_limit: Some(15_000_000),
            max_frameworks: 10,
            max_plugins: 5,
            arch_filter: true,
        }
    }
}
