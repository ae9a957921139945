/// 目标位图的边长 (像素)。输入图像无论尺寸如何都会被缩放到这个正方形画布。
pub const BITMAP_SIZE: u32 = 128;

/// 每个打包字的位数。
pub const WORD_BITS: usize = 64;

/// 每行所需的 `u64` 字数量: 128 / 64 = 2。
pub const WORDS_PER_ROW: usize = BITMAP_SIZE as usize / WORD_BITS;

/// 默认的二值化阈值。亮度严格小于该值的像素被视为 "点亮"。
pub const DEFAULT_THRESHOLD: u8 = 128;

/// 生成的初始化器中使用的 C 类型名。
pub const BITMAP_TYPE_NAME: &str = "bitmap_128_t";

/// 十六进制字面量的固定宽度 (一个 `u64` 需要 16 位十六进制数字)。
pub const HEX_WIDTH: usize = WORD_BITS / 4;
