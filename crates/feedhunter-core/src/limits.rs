//! 固定容量常量（每次调用内强制执行）
//!
//! 三个上限都是确定性的接受/拒绝边界，而不是缓冲区溢出保护：
//! - 单个 token 最多保留 `MAX_TOKEN_BYTES` 字节，超出部分丢弃但继续扫描到该段结束；
//! - 收集器最多保留 `MAX_URLS` 条候选，之后的新候选静默丢弃；
//! - 输出缓冲区固定 `OUTPUT_BUFFER_SIZE` 字节，放不下的条目被跳过，后续条目继续尝试。

/// 单条 URL 的最大长度（含结尾哨兵字节）
pub const MAX_URL_LENGTH: usize = 2048;
/// token 实际可保留的字节数
pub const MAX_TOKEN_BYTES: usize = MAX_URL_LENGTH - 1;
/// 单次调用最多收集的候选 URL 数
pub const MAX_URLS: usize = 50;
/// 输出缓冲区容量（字节，含哨兵）
pub const OUTPUT_BUFFER_SIZE: usize = 10240;
/// 结构预筛的最短 token 长度（"https://a.co/x" 量级）
pub const MIN_URL_LENGTH: usize = 15;
