//! # 位图数据模块
//!
//! 128×128 单色位图的内存表示，与固件中的
//! `typedef uint64_t bitmap_128_t[128][2];` 逐位对应。
//!
//! 第 `x` 列位于字 `x / 64` 的第 `63 - (x % 64)` 位，即每个字的最高位是最左侧的像素。

use crate::constants::{BITMAP_SIZE, WORD_BITS, WORDS_PER_ROW};

const ROWS: usize = BITMAP_SIZE as usize;

/// 一行 128 个像素，打包为两个 `u64`。
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct BitRow(pub [u64; WORDS_PER_ROW]);

impl BitRow {
    /// 返回 `x` 所在的字下标以及该字内的掩码。
    fn locate(x: u32) -> (usize, u64) {
        assert!(x < BITMAP_SIZE, "column {x} out of bounds");
        let x = x as usize;
        let shift = WORD_BITS - 1 - (x % WORD_BITS);
        (x / WORD_BITS, 1u64 << shift)
    }

    pub fn get(&self, x: u32) -> bool {
        let (index, mask) = Self::locate(x);
        self.0[index] & mask != 0
    }

    pub fn set(&mut self, x: u32, level: bool) {
        let (index, mask) = Self::locate(x);
        if level {
            self.0[index] |= mask;
        } else {
            self.0[index] &= !mask;
        }
    }

    pub fn words(&self) -> [u64; WORDS_PER_ROW] {
        self.0
    }

    /// 从左到右依次给出每一列的位值。
    pub fn bits(&self) -> impl Iterator<Item = bool> + '_ {
        (0..BITMAP_SIZE).map(|x| self.get(x))
    }

    pub fn count_ones(&self) -> u32 {
        self.0.iter().map(|word| word.count_ones()).sum()
    }
}

/// 自上而下的 128 行位图。行数由数组类型固定。
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Bitmap {
    rows: [BitRow; ROWS],
}

impl Default for Bitmap {
    fn default() -> Self {
        Self::new()
    }
}

impl Bitmap {
    /// 全部清零的位图。
    pub fn new() -> Self {
        Self {
            rows: [BitRow::default(); ROWS],
        }
    }

    pub fn from_rows(rows: [BitRow; ROWS]) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[BitRow; ROWS] {
        &self.rows
    }

    /// 读取第 `y` 行第 `x` 列的位。
    ///
    /// # Panics
    ///
    /// 任一坐标不小于 128 时 panic。
    pub fn get(&self, x: u32, y: u32) -> bool {
        self.row(y).get(x)
    }

    /// 写入第 `y` 行第 `x` 列的位；`false` 会清除该位。
    ///
    /// # Panics
    ///
    /// 任一坐标不小于 128 时 panic。
    pub fn set(&mut self, x: u32, y: u32, level: bool) {
        assert!(y < BITMAP_SIZE, "row {y} out of bounds");
        self.rows[y as usize].set(x, level);
    }

    fn row(&self, y: u32) -> &BitRow {
        assert!(y < BITMAP_SIZE, "row {y} out of bounds");
        &self.rows[y as usize]
    }

    /// 把打包的位展开回 128×128 的布尔网格。
    pub fn unpack(&self) -> Vec<Vec<bool>> {
        self.rows.iter().map(|row| row.bits().collect()).collect()
    }

    /// 被置位的像素总数。
    pub fn count_ones(&self) -> u32 {
        self.rows.iter().map(BitRow::count_ones).sum()
    }

    /// 终端预览：置位像素显示为 `#`，其余为 `.`，每行以换行结尾。
    pub fn render_preview(&self) -> String {
        let mut out = String::with_capacity(ROWS * (ROWS + 1));
        for row in &self.rows {
            out.extend(row.bits().map(|bit| if bit { '#' } else { '.' }));
            out.push('\n');
        }
        out
    }
}
