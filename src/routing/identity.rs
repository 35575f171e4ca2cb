/// 从对象键中提取的应用名
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedIdentity {
    /// 文件名中第一个分隔符之前的部分
    pub identity: String,
    /// 文件名中是否存在应用名
    pub ok: bool,
}

/// 从对象键中提取应用名。
///
/// 取对象键最后一个路径段作为文件名，再取文件名中第一个分隔符之前的部分。
/// 如果提取结果与完整的对象键相同，说明文件名中没有应用名，`ok` 为 `false`。
///
/// # 参数
///
/// * `key` - 对象键。
/// * `path_delimiter` - 路径分隔符，通常为 `/`。
/// * `token_delimiter` - 应用名分隔符。
///
/// # 示例
///
/// ```
/// use file_router::routing::extract_identity;
///
/// let extracted = extract_identity("incoming/app1_report.csv", "/", "_");
/// assert_eq!(extracted.identity, "app1");
/// assert!(extracted.ok);
///
/// let extracted = extract_identity("noapplicationname.csv", "/", "_");
/// assert!(!extracted.ok);
/// ```
pub fn extract_identity(
    key: &str,
    path_delimiter: &str,
    token_delimiter: &str,
) -> ExtractedIdentity {
    let leaf = key.rsplit(path_delimiter).next().unwrap_or(key);
    let identity = leaf.split(token_delimiter).next().unwrap_or(leaf);

    ExtractedIdentity {
        identity: identity.to_string(),
        ok: identity != key,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_identity_from_flat_key() {
        let extracted = extract_identity("app1_report.csv", "/", "_");
        assert_eq!(extracted.identity, "app1");
        assert!(extracted.ok);

        // 只取第一个分隔符之前的部分
        let extracted = extract_identity("app1_2024_q3.csv", "/", "_");
        assert_eq!(extracted.identity, "app1");
    }

    #[test]
    fn test_extract_identity_uses_leaf_segment() {
        let extracted = extract_identity("in_box/2024/app2_data.json", "/", "_");
        assert_eq!(extracted.identity, "app2");
        assert!(extracted.ok);
    }

    #[test]
    fn test_extract_identity_custom_delimiter() {
        let extracted = extract_identity("app1-report.csv", "/", "-");
        assert_eq!(extracted.identity, "app1");
        assert!(extracted.ok);
    }

    #[test]
    fn test_extract_identity_without_delimiter() {
        let extracted = extract_identity("noapplicationname.csv", "/", "_");
        assert_eq!(extracted.identity, "noapplicationname.csv");
        assert!(!extracted.ok);
    }

    #[test]
    fn test_extract_identity_nested_key_without_token() {
        // 文件名中没有分隔符，但提取结果与完整键不同
        let extracted = extract_identity("folder/report.csv", "/", "_");
        assert_eq!(extracted.identity, "report.csv");
        assert!(extracted.ok);
    }

    #[test]
    fn test_extract_identity_leading_delimiter() {
        let extracted = extract_identity("_report.csv", "/", "_");
        assert_eq!(extracted.identity, "");
        assert!(extracted.ok);
    }
}
