//! 通用工具函数

/// 返回第一个非空的文本，空字符串视为缺失（空白字符串保留）
pub fn first_non_empty<'a, I>(candidates: I) -> Option<&'a str>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    candidates
        .into_iter()
        .flatten()
        .find(|text| !text.is_empty())
}

/// 零值视为未配置
pub fn positive_or(value: Option<u32>, fallback: u32) -> u32 {
    value.filter(|v| *v > 0).unwrap_or(fallback)
}
