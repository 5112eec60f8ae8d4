use serde::{Deserialize, Serialize};

use crate::error::{IndexError, Result};

/// 默认后缀数组采样步长
pub const DEFAULT_SAMPLING_STRIDE: u32 = 16;

/// 索引构建参数。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexConfig {
    /// 文本位置是该值倍数的后缀会被采样；locate 最多需要 `stride - 1` 次 LF 回退
    pub sampling_stride: u32,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self { sampling_stride: DEFAULT_SAMPLING_STRIDE }
    }
}

impl IndexConfig {
    pub fn with_sampling_stride(sampling_stride: u32) -> Self {
        Self { sampling_stride }
    }

    pub fn validate(&self) -> Result<()> {
        if self.sampling_stride == 0 {
            return Err(IndexError::InvalidConfig("sampling stride must be at least 1".to_string()));
        }
        Ok(())
    }
}
