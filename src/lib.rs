//! 文件路由器库
//!
//! 当对象写入入站存储桶时，根据文件名中的应用名把它搬移到该应用的出站存储桶：
//! - 从对象键提取应用名
//! - 在映射表中查找应用的目标存储桶
//! - 检查目标存储桶的公开访问与应用的白名单是否匹配
//! - 通过 "复制 + 删除" 搬移对象，失败时隔离到错误存储桶

pub mod config;
pub mod error;
pub mod handler;
pub mod relocation;
pub mod routing;
pub mod store;
pub mod utils;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::LocalTime;

/// 初始化日志订阅器
///
/// 设置了 `RUST_LOG` 时使用其中的过滤规则，否则输出 INFO 及以上级别的日志。
/// 是否输出详细信息由路由配置中的 `verbose` 决定。
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(LocalTime::rfc_3339())
        .with_target(false)
        .with_ansi(false)
        .init();
}
