//! # 命令行接口模块
//!
//! 使用 `clap` 定义了程序的命令行结构，包括子命令和参数。
//! 所有用户通过命令行与程序交互的入口点都在此模块中定义。

use crate::constants::DEFAULT_THRESHOLD;
use crate::imaging::Resample;
use clap::{Args, Parser};
use std::path::PathBuf;

/// 将图像转换为 128×128 单色位图，并输出 `bitmap_128_t` 类型的 C 数组初始化器。
#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = "将图像转换为 128×128 单色位图，并输出 `bitmap_128_t` 类型的 C 数组初始化器。\n较暗的像素 (亮度小于阈值) 被置位，每行打包为两个 64 位字。"
)]
pub struct Cli {
    /// 输出调试日志 (也可以通过 RUST_LOG 环境变量控制)。
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令：convert (转换) 和 preview (预览)。
#[derive(Parser, Debug)]
pub enum Commands {
    /// 将图像转换为 C 数组初始化器。
    Convert(ConvertArgs),

    /// 在终端中以字符画的形式预览二值化结果。
    Preview(PreviewArgs),
}

/// 两个子命令共用的采样参数。
#[derive(Args, Debug, Clone)]
pub struct SamplingArgs {
    /// 输入图像文件路径 (如 PNG, BMP)。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 二值化阈值 (0-255)。亮度小于该值的像素被置位。
    #[arg(short, long, default_value_t = DEFAULT_THRESHOLD)]
    pub threshold: u8,

    /// 缩放到 128×128 时使用的重采样滤波器。
    #[arg(short = 'r', long, value_enum, default_value_t = Resample::default())]
    pub filter: Resample,
}

/// 'convert' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct ConvertArgs {
    #[command(flatten)]
    pub sampling: SamplingArgs,

    /// 生成的变量名。默认由输入文件名 (不含扩展名) 推导。
    #[arg(short, long)]
    pub name: Option<String>,

    /// 保存初始化器的文件路径。省略时输出到标准输出。
    #[arg(short, long)]
    pub dest: Option<PathBuf>,

    /// 目标文件已存在时强制覆盖。
    #[arg(short, long)]
    pub force: bool,
}

/// 'preview' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct PreviewArgs {
    #[command(flatten)]
    pub sampling: SamplingArgs,
}
