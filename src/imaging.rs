//! # 图像后端模块
//!
//! 把 "解码为灰度" 和 "缩放" 两个步骤抽象为 [`Imaging`] trait，
//! 打包逻辑只依赖 [`GrayGrid`]，不直接接触具体的图像库。
//! 默认实现 [`ImageCrate`] 基于 `image` crate。

use crate::error::{Error, Result};
use clap::ValueEnum;
use image::{
    ColorType, DynamicImage, GrayImage, ImageBuffer, ImageError, ImageReader, Luma, Rgb,
    imageops::FilterType,
};
use std::fmt;
use std::path::Path;

/// 按行存储的 8 位灰度网格。
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GrayGrid(GrayImage);

impl GrayGrid {
    /// 由原始字节构造网格。长度与 `width * height` 不符时返回 `None`。
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        GrayImage::from_raw(width, height, data).map(Self)
    }

    /// 逐像素调用 `f(x, y)` 生成网格。
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> u8) -> Self {
        Self(ImageBuffer::from_fn(width, height, |x, y| Luma([f(x, y)])))
    }

    pub fn width(&self) -> u32 {
        self.0.width()
    }

    pub fn height(&self) -> u32 {
        self.0.height()
    }

    /// 读取 `(x, y)` 处的亮度。
    ///
    /// # Panics
    ///
    /// 坐标越界时 panic，与切片索引的行为一致。
    pub fn get(&self, x: u32, y: u32) -> u8 {
        assert!(
            x < self.width() && y < self.height(),
            "pixel ({x}, {y}) out of bounds"
        );
        self.0.get_pixel(x, y).0[0]
    }

    /// 自上而下逐行迭代。
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        // chunks_exact 不接受 0，空宽度的网格也没有任何行
        self.0.as_raw().chunks_exact(self.width().max(1) as usize)
    }

    pub fn as_image(&self) -> &GrayImage {
        &self.0
    }
}

impl From<GrayImage> for GrayGrid {
    fn from(image: GrayImage) -> Self {
        Self(image)
    }
}

/// ITU-R 601-2 亮度变换：`L = (R * 299 + G * 587 + B * 114) / 1000`，向下取整。
pub fn luma_601(r: u8, g: u8, b: u8) -> u8 {
    let weighted = u32::from(r) * 299 + u32::from(g) * 587 + u32::from(b) * 114;
    // 最大为 255 * 1000，除以 1000 后落在 u8 范围内
    (weighted / 1000) as u8
}

/// 把解码后的图像转换为灰度。
///
/// 已经是灰度的图像直接取亮度通道；彩色图像丢弃 alpha 后按 [`luma_601`] 计算。
fn to_grayscale(image: DynamicImage) -> GrayImage {
    match image.color() {
        ColorType::L8 | ColorType::La8 | ColorType::L16 | ColorType::La16 => image.into_luma8(),
        _ => {
            let rgb = image.into_rgb8();
            ImageBuffer::from_fn(rgb.width(), rgb.height(), |x, y| {
                let Rgb([r, g, b]) = *rgb.get_pixel(x, y);
                Luma([luma_601(r, g, b)])
            })
        }
    }
}

/// 缩放时使用的重采样滤波器。
///
/// 滤波器直接决定最终的位输出，因此必须显式选择；默认使用双线性。
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Resample {
    /// 最近邻，适合本身就是像素画的输入。
    Nearest,
    /// 双线性 (三角形滤波器)。
    #[default]
    Bilinear,
    /// 双三次 (Catmull-Rom)。
    Bicubic,
    Gaussian,
    Lanczos3,
}

impl From<Resample> for FilterType {
    fn from(value: Resample) -> Self {
        match value {
            Resample::Nearest => FilterType::Nearest,
            Resample::Bilinear => FilterType::Triangle,
            Resample::Bicubic => FilterType::CatmullRom,
            Resample::Gaussian => FilterType::Gaussian,
            Resample::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

impl fmt::Display for Resample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Resample::Nearest => "nearest",
            Resample::Bilinear => "bilinear",
            Resample::Bicubic => "bicubic",
            Resample::Gaussian => "gaussian",
            Resample::Lanczos3 => "lanczos3",
        };
        f.write_str(name)
    }
}

/// 图像解码与缩放的最小接口。
pub trait Imaging {
    /// 读取并解码 `path` 处的图像，转换为单通道灰度。
    ///
    /// # Errors
    ///
    /// 文件无法读取或无法解码时返回 [`Error::Decode`]。
    fn decode_grayscale(&self, path: &Path) -> Result<GrayGrid>;

    /// 将网格缩放到恰好 `width` × `height`，不保持宽高比。
    fn resize(&self, grid: &GrayGrid, width: u32, height: u32) -> GrayGrid;
}

/// 基于 `image` crate 的默认后端。
#[derive(Clone, Copy, Debug, Default)]
pub struct ImageCrate {
    pub filter: Resample,
}

impl ImageCrate {
    pub fn new(filter: Resample) -> Self {
        Self { filter }
    }
}

impl Imaging for ImageCrate {
    fn decode_grayscale(&self, path: &Path) -> Result<GrayGrid> {
        let decode_error = |source: ImageError| Error::Decode {
            path: path.to_path_buf(),
            source,
        };

        // 按文件内容识别格式，不依赖扩展名
        let image = ImageReader::open(path)
            .and_then(|reader| reader.with_guessed_format())
            .map_err(|err| decode_error(ImageError::IoError(err)))?
            .decode()
            .map_err(decode_error)?;

        tracing::debug!(
            width = image.width(),
            height = image.height(),
            color = ?image.color(),
            "decoded {}",
            path.display()
        );

        Ok(to_grayscale(image).into())
    }

    fn resize(&self, grid: &GrayGrid, width: u32, height: u32) -> GrayGrid {
        image::imageops::resize(grid.as_image(), width, height, self.filter.into()).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_rejects_wrong_length() {
        assert!(GrayGrid::from_raw(2, 2, vec![0; 3]).is_none());
        assert!(GrayGrid::from_raw(2, 2, vec![0; 4]).is_some());
    }

    #[test]
    fn test_from_fn_is_row_major() {
        let grid = GrayGrid::from_fn(3, 2, |x, y| (y * 10 + x) as u8);
        let rows: Vec<&[u8]> = grid.rows().collect();
        assert_eq!(rows, vec![&[0u8, 1, 2][..], &[10u8, 11, 12][..]]);
        assert_eq!(grid.get(2, 1), 12);
    }

    #[test]
    fn test_resize_produces_requested_dimensions() {
        let backend = ImageCrate::default();
        let grid = GrayGrid::from_fn(37, 300, |x, _| x as u8);
        let resized = backend.resize(&grid, 128, 128);
        assert_eq!((resized.width(), resized.height()), (128, 128));
    }

    #[test]
    fn test_nearest_upscale_replicates_blocks() {
        let backend = ImageCrate::new(Resample::Nearest);
        let grid = GrayGrid::from_raw(2, 1, vec![0, 255]).unwrap();
        let resized = backend.resize(&grid, 128, 128);
        assert!(resized.rows().all(|row| row[..64].iter().all(|&p| p == 0)));
        assert!(resized.rows().all(|row| row[64..].iter().all(|&p| p == 255)));
    }

    #[test]
    fn test_luma_601_weights() {
        assert_eq!(luma_601(0, 0, 0), 0);
        assert_eq!(luma_601(255, 255, 255), 255);
        assert_eq!(luma_601(200, 100, 100), 129);
        assert_eq!(luma_601(255, 0, 0), 76);
        assert_eq!(luma_601(0, 255, 0), 149);
        assert_eq!(luma_601(0, 0, 255), 29);
    }

    #[test]
    fn test_colour_image_uses_601_weights() {
        let image = DynamicImage::ImageRgb8(ImageBuffer::from_pixel(4, 4, Rgb([200, 100, 100])));
        let gray = to_grayscale(image);
        assert!(gray.pixels().all(|p| p.0[0] == 129));
    }

    #[test]
    fn test_gray_image_keeps_intensity() {
        let image = DynamicImage::ImageLuma8(ImageBuffer::from_pixel(4, 4, Luma([128])));
        let gray = to_grayscale(image);
        assert!(gray.pixels().all(|p| p.0[0] == 128));
    }

    #[test]
    fn test_decode_missing_file_is_decode_error() {
        let backend = ImageCrate::default();
        let result = backend.decode_grayscale(Path::new("definitely/not/here.png"));
        assert!(matches!(result, Err(Error::Decode { .. })));
    }
}
