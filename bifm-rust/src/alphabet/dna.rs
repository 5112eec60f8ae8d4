use super::Alphabet;

/// 四碱基字母表 {A, C, G, T}，大小写不敏感，U 视为 T。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dna4;

/// 五碱基字母表 {A, C, G, N, T}（N 按字典序排在 G 与 T 之间）。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dna5;

impl Alphabet for Dna4 {
    const NAME: &'static str = "dna4";
    const SIZE: usize = 4;

    #[inline]
    fn rank_of(symbol: u8) -> Option<u8> {
        match symbol.to_ascii_uppercase() {
            b'A' => Some(0),
            b'C' => Some(1),
            b'G' => Some(2),
            b'T' | b'U' => Some(3),
            _ => None,
        }
    }

    #[inline]
    fn symbol_of(rank: u8) -> u8 {
        match rank {
            0 => b'A',
            1 => b'C',
            2 => b'G',
            _ => b'T',
        }
    }
}

impl Alphabet for Dna5 {
    const NAME: &'static str = "dna5";
    const SIZE: usize = 5;

    #[inline]
    fn rank_of(symbol: u8) -> Option<u8> {
        match symbol.to_ascii_uppercase() {
            b'A' => Some(0),
            b'C' => Some(1),
            b'G' => Some(2),
            b'N' => Some(3),
            b'T' | b'U' => Some(4),
            _ => None,
        }
    }

    #[inline]
    fn symbol_of(rank: u8) -> u8 {
        match rank {
            0 => b'A',
            1 => b'C',
            2 => b'G',
            3 => b'N',
            _ => b'T',
        }
    }
}
