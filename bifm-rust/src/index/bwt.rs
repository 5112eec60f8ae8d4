/// 根据后缀数组构建 BWT：`bwt[i] = text[sa[i] - 1]`，`sa[i] == 0` 时取文本末尾（循环）。
/// text 为秩编码文本（0 为终止符）。
pub fn build_bwt(text: &[u8], sa: &[u32]) -> Vec<u8> {
    let n = text.len();
    if n == 0 {
        return Vec::new();
    }
    sa.iter()
        .map(|&p| {
            let i = p as usize;
            if i == 0 { text[n - 1] } else { text[i - 1] }
        })
        .collect()
}

/// 累计计数表 C：`c[r]` = 文本中秩严格小于 r 的符号数，长度 sigma + 1，`c[sigma] == n`。
pub fn count_table(text: &[u8], sigma: usize) -> Vec<u32> {
    let mut freq = vec![0u32; sigma];
    for &ch in text {
        freq[ch as usize] += 1;
    }
    let mut c = Vec::with_capacity(sigma + 1);
    let mut acc = 0u32;
    c.push(0);
    for f in freq {
        acc += f;
        c.push(acc);
    }
    c
}
