use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

/// 复制源中需要编码的字符集合
///
/// 保留路径分隔符与 RFC 3986 中的非保留字符。
const COPY_SOURCE_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// 解码 S3 事件通知中的对象键
///
/// S3 事件中的键采用表单编码：空格编码为 `+`，其他字符使用百分号编码。
///
/// # 参数
///
/// * `raw` - 事件中携带的原始键
///
/// # 返回值
///
/// 解码后的对象键，非法的 UTF-8 序列会被替换字符代替
///
/// # 示例
///
/// ```
/// use file_router::utils::key::decode_event_key;
///
/// assert_eq!(decode_event_key("app1_my+report.csv"), "app1_my report.csv");
/// assert_eq!(decode_event_key("in%2Fapp1_a%2Bb.csv"), "in/app1_a+b.csv");
/// ```
pub fn decode_event_key(raw: &str) -> String {
    let plus_decoded = raw.replace('+', " ");
    percent_decode_str(&plus_decoded)
        .decode_utf8_lossy()
        .into_owned()
}

/// 构建 CopyObject 请求的复制源
///
/// # 参数
///
/// * `bucket` - 源存储桶
/// * `key` - 对象键
///
/// # 返回值
///
/// `bucket/key` 形式的字符串，键经过百分号编码
///
/// # 示例
///
/// ```
/// use file_router::utils::key::encode_copy_source;
///
/// assert_eq!(encode_copy_source("inbound", "app1_report.csv"), "inbound/app1_report.csv");
/// assert_eq!(encode_copy_source("inbound", "dir/app1 a+b.csv"), "inbound/dir/app1%20a%2Bb.csv");
/// ```
pub fn encode_copy_source(bucket: &str, key: &str) -> String {
    let encoded = utf8_percent_encode(key, COPY_SOURCE_ENCODE_SET);
    format!("{bucket}/{encoded}")
}
