//! # 错误类型模块
//!
//! 库层面的错误定义。命令行层 (`handler`) 使用 `anyhow` 为其附加上下文。

use std::path::PathBuf;
use thiserror::Error;

/// 转换流水线可能产生的错误。
#[derive(Error, Debug)]
pub enum Error {
    /// 输入文件不存在、不可读或无法被解码为图像。
    #[error("failed to decode image {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// 本库使用的 `Result` 别名。
pub type Result<T> = std::result::Result<T, Error>;
