use serde::{Deserialize, Serialize};

/// 每个超块包含的 64 位字数
const WORDS_PER_SUPER: usize = 8;

/// 支持 O(1) rank 的位向量。
///
/// 两级目录：超块（512 bit）记录绝对前缀计数，块（64 bit）记录相对超块的计数，
/// 查询时只需一次 popcount。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankBitVec {
    words: Vec<u64>,
    supers: Vec<u64>,
    blocks: Vec<u16>,
    len: usize,
}

impl RankBitVec {
    #[cfg(test)]
    pub(crate) fn from_bools(bits: &[bool]) -> Self {
        Self::from_fn(bits.len(), |i| bits[i])
    }

    /// 由长度和逐位取值函数构建
    pub fn from_fn<F: Fn(usize) -> bool>(len: usize, bit: F) -> Self {
        // 多留一个字，保证 rank1(len) 不越界
        let num_words = len / 64 + 1;
        let mut words = vec![0u64; num_words];
        for i in 0..len {
            if bit(i) {
                words[i / 64] |= 1u64 << (i % 64);
            }
        }

        let mut supers = Vec::with_capacity(num_words / WORDS_PER_SUPER + 1);
        let mut blocks = Vec::with_capacity(num_words);
        let mut total = 0u64;
        let mut in_super = 0u16;
        for (w, word) in words.iter().enumerate() {
            if w % WORDS_PER_SUPER == 0 {
                supers.push(total);
                in_super = 0;
            }
            blocks.push(in_super);
            let ones = word.count_ones();
            total += u64::from(ones);
            in_super += ones as u16;
        }

        Self { words, supers, blocks, len }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn get(&self, i: usize) -> bool {
        debug_assert!(i < self.len);
        (self.words[i / 64] >> (i % 64)) & 1 == 1
    }

    /// `[0, i)` 中 1 的个数，`i <= len`
    #[inline]
    pub fn rank1(&self, i: usize) -> usize {
        debug_assert!(i <= self.len);
        let w = i / 64;
        let mask = (1u64 << (i % 64)) - 1;
        let base = self.supers[w / WORDS_PER_SUPER] + u64::from(self.blocks[w]);
        base as usize + (self.words[w] & mask).count_ones() as usize
    }

    /// `[0, i)` 中 0 的个数
    #[inline]
    pub fn rank0(&self, i: usize) -> usize {
        i - self.rank1(i)
    }

    pub fn count_ones(&self) -> usize {
        self.rank1(self.len)
    }

    pub fn count_zeros(&self) -> usize {
        self.len - self.count_ones()
    }
}
