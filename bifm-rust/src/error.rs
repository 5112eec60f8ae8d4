use std::fmt;

/// 索引构建与查询的错误类型。
///
/// 构建期错误（`Alphabet` / `AlphabetTooLarge` / `SizeOverflow` / `EmptyInput` /
/// `InvalidConfig`）都会让构建整体失败，不会产出部分索引；
/// 查询期只可能出现 `Alphabet`，且不会修改游标或索引。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexError {
    /// 符号不属于声明的字母表
    Alphabet {
        symbol: u8,
        /// 所在序列编号（查询时为 None）
        sequence: Option<usize>,
        position: usize,
    },
    /// 字母表（含哨兵）超过支持的上限
    AlphabetTooLarge { sigma: usize, max: usize },
    /// 拼接后的文本长度超过索引整数宽度
    SizeOverflow { len: usize, max: usize },
    /// 空序列或空集合
    EmptyInput { sequence: Option<usize> },
    /// 配置非法（例如采样步长为 0）
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, IndexError>;

impl fmt::Display for IndexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexError::Alphabet { symbol, sequence: Some(seq), position } => write!(
                f,
                "symbol {:?} (0x{:02x}) at position {} of sequence {} is not in the alphabet",
                *symbol as char, symbol, position, seq
            ),
            IndexError::Alphabet { symbol, sequence: None, position } => write!(
                f,
                "query symbol {:?} (0x{:02x}) at position {} is not in the alphabet",
                *symbol as char, symbol, position
            ),
            IndexError::AlphabetTooLarge { sigma, max } => {
                write!(f, "alphabet of {} ranks exceeds the supported maximum of {}", sigma, max)
            }
            IndexError::SizeOverflow { len, max } => {
                write!(f, "assembled text length {} exceeds the index capacity of {}", len, max)
            }
            IndexError::EmptyInput { sequence: Some(seq) } => {
                write!(f, "sequence {} is empty", seq)
            }
            IndexError::EmptyInput { sequence: None } => write!(f, "no sequences to index"),
            IndexError::InvalidConfig(msg) => write!(f, "invalid index configuration: {}", msg),
        }
    }
}

impl std::error::Error for IndexError {}
