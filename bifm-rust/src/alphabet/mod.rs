//! 字母表与秩映射。
//!
//! 每个字母表把输入字节映射到稠密秩 `[0, SIZE)`。索引内部把秩整体加 1，
//! 秩 0 保留给哨兵（序列终止符），因此哨兵永远无法作为查询符号出现。

mod dna;
mod protein;

pub use dna::{Dna4, Dna5};
pub use protein::AminoAcid;

use crate::error::{IndexError, Result};

/// 索引支持的最大秩数（含哨兵）
pub const MAX_SIGMA: usize = 32;

/// 哨兵在文本中的内部秩
pub const SENTINEL: u8 = 0;

/// 有限字母表。
///
/// 实现者只需给出符号与秩的双射；编码、校验等都由默认方法完成。
/// 字母表在编译期选定，查询热路径上没有动态分发。
pub trait Alphabet: Copy + Clone + std::fmt::Debug + Send + Sync + 'static {
    /// 持久化时记录的名称，加载索引时用于校验
    const NAME: &'static str;
    /// 符号个数（不含哨兵）
    const SIZE: usize;

    /// 符号 -> 秩，非法符号返回 None
    fn rank_of(symbol: u8) -> Option<u8>;

    /// 秩 -> 规范符号
    fn symbol_of(rank: u8) -> u8;

    /// 含哨兵的秩数 Σ
    #[inline]
    fn sigma() -> usize {
        Self::SIZE + 1
    }

    /// 构建前检查 Σ 是否在支持范围内
    fn check_size() -> Result<()> {
        let sigma = Self::sigma();
        if sigma > MAX_SIGMA {
            return Err(IndexError::AlphabetTooLarge { sigma, max: MAX_SIGMA });
        }
        Ok(())
    }

    /// 符号 -> 文本内部秩（秩 + 1）
    #[inline]
    fn text_rank(symbol: u8) -> Option<u8> {
        Self::rank_of(symbol).map(|r| r + 1)
    }

    /// 把查询编码为内部秩；遇到非法符号时报告其位置，不产生部分结果。
    fn encode_query(query: &[u8]) -> Result<Vec<u8>> {
        query
            .iter()
            .enumerate()
            .map(|(position, &symbol)| {
                Self::text_rank(symbol).ok_or(IndexError::Alphabet { symbol, sequence: None, position })
            })
            .collect()
    }
}
