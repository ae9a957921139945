//! # 命令处理逻辑模块
//!
//! 包含处理 `convert` 和 `preview` 子命令的高级业务逻辑。
//! 本模块负责协调文件 I/O、调用核心打包流水线以及向用户报告结果。

use crate::bitmap::Bitmap;
use crate::cli::{ConvertArgs, PreviewArgs, SamplingArgs};
use crate::constants::BITMAP_SIZE;
use crate::imaging::ImageCrate;
use crate::packer::{convert, format};
use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// 处理 'Convert' 命令的执行逻辑。
///
/// 负责确定变量名、检查输出文件是否可写、运行转换流水线，
/// 最后把初始化器写入目标文件或标准输出。文本在写出前已完整生成，
/// 失败时不会留下不完整的输出。
///
/// # Arguments
///
/// * `args` - 包含输入路径、阈值和输出选项的 `ConvertArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 显式给出的变量名不是合法的 C 标识符。
/// * 目标文件已存在且未指定 `--force`。
/// * 输入图像无法读取或解码。
/// * 无法写入目标文件或标准输出。
pub fn handle_convert(args: ConvertArgs) -> Result<()> {
    handle_convert_to(args, &mut io::stdout().lock())
}

/// 与 [`handle_convert`] 相同，但未指定 `dest` 时把初始化器写入 `out` 而不是标准输出。
///
/// # Errors
///
/// 与 [`handle_convert`] 相同。
pub fn handle_convert_to<W: Write>(args: ConvertArgs, out: &mut W) -> Result<()> {
    let name = symbol_name(args.name.as_deref(), &args.sampling.image)?;

    if let Some(dest) = &args.dest {
        anyhow::ensure!(
            args.force || !dest.exists(),
            "Output file already exists: {}\nUse --force to overwrite it.",
            dest.to_string_lossy().red().bold()
        );
    }

    let bitmap = load_bitmap(&args.sampling)?;
    let text = format(&bitmap, &name);

    match &args.dest {
        Some(dest) => {
            fs::write(dest, text).with_context(|| {
                format!(
                    "Unable to write to target file: {}",
                    dest.to_string_lossy().red().bold()
                )
            })?;

            println!(
                "The bitmap {} has been successfully generated and saved: {}",
                name.green().bold(),
                dest.to_string_lossy().green().bold()
            );
        }
        None => write_output(out, &text)?,
    }

    Ok(())
}

/// 处理 'Preview' 命令的执行逻辑。
///
/// 运行与 `convert` 相同的流水线，但输出字符画而不是初始化器，
/// 便于在写入固件前确认阈值和滤波器的选择。
///
/// # Errors
///
/// 输入图像无法读取或解码，或无法写入标准输出时返回错误。
pub fn handle_preview(args: PreviewArgs) -> Result<()> {
    handle_preview_to(args, &mut io::stdout().lock())
}

/// 与 [`handle_preview`] 相同，但字符画写入 `out`。统计信息仍输出到标准错误。
///
/// # Errors
///
/// 与 [`handle_preview`] 相同。
pub fn handle_preview_to<W: Write>(args: PreviewArgs, out: &mut W) -> Result<()> {
    let bitmap = load_bitmap(&args.sampling)?;
    write_output(out, &bitmap.render_preview())?;

    eprintln!(
        "{} of {} pixels set (threshold {}, filter {})",
        bitmap.count_ones().to_string().green().bold(),
        BITMAP_SIZE * BITMAP_SIZE,
        args.sampling.threshold,
        args.sampling.filter
    );

    Ok(())
}

fn load_bitmap(sampling: &SamplingArgs) -> Result<Bitmap> {
    tracing::debug!(
        threshold = sampling.threshold,
        filter = %sampling.filter,
        "converting {}",
        sampling.image.display()
    );

    let backend = ImageCrate::new(sampling.filter);
    convert(&sampling.image, sampling.threshold, &backend).with_context(|| {
        format!(
            "Unable to convert image file: {}",
            sampling.image.to_string_lossy().red().bold()
        )
    })
}

fn write_output<W: Write>(out: &mut W, text: &str) -> Result<()> {
    out.write_all(text.as_bytes())
        .and_then(|()| out.flush())
        .context("Unable to write the generated output")
}

/// 确定生成的变量名。
///
/// 显式给出的名字必须已经是合法的 C 标识符；
/// 否则由输入文件名 (不含扩展名) 经 [`sanitize_identifier`] 推导。
pub fn symbol_name(explicit: Option<&str>, image: &Path) -> Result<String> {
    match explicit {
        Some(name) => {
            anyhow::ensure!(
                is_c_identifier(name),
                "Invalid symbol name: {}\nA name must start with a letter or '_' and contain only letters, digits and '_'.",
                name.red().bold()
            );
            Ok(name.to_owned())
        }
        None => {
            let stem = image
                .file_stem()
                .map(|stem| stem.to_string_lossy())
                .unwrap_or_default();
            Ok(sanitize_identifier(&stem))
        }
    }
}

/// 把任意字符串转换为合法的 C 标识符。
///
/// 非 `[A-Za-z0-9_]` 的字符被替换为 `_`，以数字开头时补一个前导 `_`，
/// 空字符串变为 `bitmap`。
pub fn sanitize_identifier(raw: &str) -> String {
    let mut ident: String = raw
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();

    if ident.is_empty() {
        ident.push_str("bitmap");
    } else if ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }

    ident
}

fn is_c_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
