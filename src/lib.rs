//! # bitmap_pack 库
//!
//! 本库包含图像到 `bitmap_128_t` 打包位图转换工具的核心逻辑。

// 声明库包含的所有模块。

pub mod bitmap;
pub mod cli;
pub mod constants;
pub mod error;
pub mod handler;
pub mod imaging;
pub mod packer;

pub use error::{Error, Result};
