//! 致命错误类型
//!
//! 只有两类：输入不可读、输出缓冲区无法分配。格式混乱的输入不是错误，只会得到更少（或零个）结果。
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    /// 输入源无法打开或读取
    #[error("cannot read input: {0}")]
    Io(#[from] std::io::Error),
    /// 输出缓冲区无法分配
    #[error("cannot allocate {requested}-byte output buffer")]
    Allocation { requested: usize },
}
