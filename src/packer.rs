//! # 位图打包模块
//!
//! 转换流水线的核心：解码 → 灰度 → 缩放 → 二值化 → 打包，
//! 以及把结果格式化为 C 风格的数组初始化器。

use crate::bitmap::Bitmap;
use crate::constants::{BITMAP_SIZE, BITMAP_TYPE_NAME, HEX_WIDTH};
use crate::error::Result;
use crate::imaging::{GrayGrid, Imaging};
use std::path::Path;

/// 读取 `path` 处的图像并将其转换为 128×128 的打包位图。
///
/// 图像先转换为灰度，再由 `backend` 缩放到 128×128 (不保持宽高比)，
/// 最后按 `threshold` 二值化，见 [`binarize`]。
///
/// # Arguments
///
/// * `path` - 输入图像路径。
/// * `threshold` - 二值化阈值，亮度严格小于该值的像素被置位。
/// * `backend` - 负责解码与缩放的图像后端。
///
/// # Errors
///
/// 文件不存在、不可读或无法解码时返回 [`crate::Error::Decode`]。
pub fn convert<B: Imaging + ?Sized>(path: &Path, threshold: u8, backend: &B) -> Result<Bitmap> {
    let gray = backend.decode_grayscale(path)?;
    let resized = backend.resize(&gray, BITMAP_SIZE, BITMAP_SIZE);
    let bitmap = binarize(&resized, threshold);

    tracing::debug!(
        threshold,
        set_bits = bitmap.count_ones(),
        "packed {}",
        path.display()
    );

    Ok(bitmap)
}

/// 对已经是 128×128 的灰度网格做二值化并打包。
///
/// 亮度 `< threshold` 的像素记为 1 (较暗的像素被点亮)，等于阈值时记为 0。
/// 超出 128×128 画布的像素被忽略，不足的部分保持为 0。
pub fn binarize(grid: &GrayGrid, threshold: u8) -> Bitmap {
    let mut bitmap = Bitmap::new();
    for (y, row) in (0..BITMAP_SIZE).zip(grid.rows()) {
        for (x, &intensity) in (0..BITMAP_SIZE).zip(row) {
            if intensity < threshold {
                bitmap.set(x, y, true);
            }
        }
    }
    bitmap
}

/// 将位图格式化为 `bitmap_128_t` 的初始化器文本。
///
/// ```text
/// const bitmap_128_t name = {
///     {0x0000000000000000, 0x0000000000000000},
///     ...
/// };
/// ```
///
/// 十六进制数字为大写、固定 16 位并补零；每行都以换行结尾。
pub fn format(bitmap: &Bitmap, name: &str) -> String {
    let rows: String = bitmap
        .rows()
        .iter()
        .map(|row| {
            let [left, right] = row.words();
            format!(
                "    {{0x{left:0width$X}, 0x{right:0width$X}}},\n",
                width = HEX_WIDTH
            )
        })
        .collect();

    format!("const {BITMAP_TYPE_NAME} {name} = {{\n{rows}}};\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitmap::BitRow;
    use rand::Rng;

    fn uniform(value: u8) -> GrayGrid {
        GrayGrid::from_fn(BITMAP_SIZE, BITMAP_SIZE, |_, _| value)
    }

    #[test]
    fn test_threshold_boundary() {
        assert_eq!(binarize(&uniform(128), 128).count_ones(), 0);
        assert_eq!(binarize(&uniform(127), 128).count_ones(), 128 * 128);
        assert_eq!(binarize(&uniform(255), 0).count_ones(), 0);
        assert_eq!(binarize(&uniform(0), 0).count_ones(), 0);
        assert_eq!(binarize(&uniform(254), 255).count_ones(), 128 * 128);
    }

    #[test]
    fn test_binarize_matches_pixels_and_round_trips() {
        let mut rng = rand::rng();
        let grid = GrayGrid::from_fn(BITMAP_SIZE, BITMAP_SIZE, |_, _| rng.random::<u8>());
        let threshold = 100;

        let bitmap = binarize(&grid, threshold);
        let unpacked = bitmap.unpack();

        for y in 0..BITMAP_SIZE {
            for x in 0..BITMAP_SIZE {
                let expected = grid.get(x, y) < threshold;
                assert_eq!(unpacked[y as usize][x as usize], expected, "pixel ({x}, {y})");
            }
        }
    }

    #[test]
    fn test_binarize_ignores_pixels_outside_canvas() {
        let grid = GrayGrid::from_fn(130, 130, |x, y| if x >= 128 || y >= 128 { 0 } else { 255 });
        assert_eq!(binarize(&grid, 128), Bitmap::new());
    }

    #[test]
    fn test_format_all_zero() {
        let text = format(&Bitmap::new(), "blank");
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 130);
        assert_eq!(lines[0], "const bitmap_128_t blank = {");
        assert!(
            lines[1..129]
                .iter()
                .all(|line| *line == "    {0x0000000000000000, 0x0000000000000000},")
        );
        assert_eq!(lines[129], "};");
        assert!(text.ends_with("};\n"));
    }

    #[test]
    fn test_format_uses_uppercase_zero_padded_hex() {
        let mut rows = [BitRow::default(); 128];
        rows[0] = BitRow([0xABCD, u64::MAX]);
        let text = format(&Bitmap::from_rows(rows), "logo");

        assert_eq!(
            text.lines().nth(1),
            Some("    {0x000000000000ABCD, 0xFFFFFFFFFFFFFFFF},")
        );
    }
}
