use super::Alphabet;

const RESIDUES: &[u8; 20] = b"ACDEFGHIKLMNPQRSTVWY";

/// 20 种标准氨基酸（单字母码，大小写不敏感）。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AminoAcid;

impl Alphabet for AminoAcid {
    const NAME: &'static str = "aa20";
    const SIZE: usize = 20;

    #[inline]
    fn rank_of(symbol: u8) -> Option<u8> {
        let up = symbol.to_ascii_uppercase();
        RESIDUES.iter().position(|&r| r == up).map(|p| p as u8)
    }

    #[inline]
    fn symbol_of(rank: u8) -> u8 {
        RESIDUES[(rank as usize).min(RESIDUES.len() - 1)]
    }
}
