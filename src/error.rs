//! 错误类型模块
//!
//! 该模块定义了路由过程中的错误分类：
//! - 存储调用失败的故障类别（`FaultKind`）
//! - S3 调用失败（`StorageFault`）
//! - 映射表/策略表查询失败（`StoreError`）
//! - 中止本次调用的致命错误（`RouterError`）

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// 底层调用失败的故障类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultKind {
    /// 存储桶或对象不存在
    NotFound,
    /// 权限不足
    PermissionDenied,
    /// 限流、超时或网络故障
    Transient,
    /// 其他无法归类的故障
    Unknown,
}

/// 表示资源不存在的错误码
const NOT_FOUND_CODES: &[&str] = &[
    "NoSuchBucket",
    "NoSuchKey",
    "NotFound",
    "ResourceNotFoundException",
];

/// 表示权限不足的错误码
const PERMISSION_DENIED_CODES: &[&str] = &[
    "AccessDenied",
    "AccessDeniedException",
    "AllAccessDisabled",
    "InvalidAccessKeyId",
    "SignatureDoesNotMatch",
    "UnrecognizedClientException",
];

/// 表示限流或服务端暂时不可用的错误码
const TRANSIENT_CODES: &[&str] = &[
    "SlowDown",
    "Throttling",
    "ThrottlingException",
    "RequestTimeout",
    "ServiceUnavailable",
    "InternalError",
    "InternalServerError",
    "ProvisionedThroughputExceededException",
    "RequestLimitExceeded",
];

impl FaultKind {
    /// 根据 AWS 错误码判断故障类别。
    ///
    /// # 参数
    ///
    /// * `code` - 服务端返回的错误码，可能不存在。
    ///
    /// # 返回值
    ///
    /// 对应的故障类别，未知错误码返回 `FaultKind::Unknown`。
    pub fn from_error_code(code: Option<&str>) -> Self {
        match code {
            Some(code) if NOT_FOUND_CODES.contains(&code) => Self::NotFound,
            Some(code) if PERMISSION_DENIED_CODES.contains(&code) => Self::PermissionDenied,
            Some(code) if TRANSIENT_CODES.contains(&code) => Self::Transient,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NotFound => "not found",
            Self::PermissionDenied => "permission denied",
            Self::Transient => "transient",
            Self::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// 单次 S3 调用失败
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{kind} fault: {message}")]
pub struct StorageFault {
    /// 故障类别
    pub kind: FaultKind,
    /// 底层错误描述
    pub message: String,
}

impl StorageFault {
    pub fn new(kind: FaultKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// 映射表或策略表查询失败
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("query against table {table} failed ({kind}): {message}")]
pub struct StoreError {
    /// 表名
    pub table: String,
    /// 故障类别
    pub kind: FaultKind,
    /// 底层错误描述
    pub message: String,
}

/// 配置错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("environment variable {0} must be set")]
    Missing(&'static str),
    #[error("environment variable {0} must not be empty")]
    Empty(&'static str),
}

/// 中止本次调用的致命错误
///
/// 可以被吸收为路由决策的情况（缺少应用名、映射不存在、公开访问违规）
/// 不会出现在这里。
#[derive(Debug, Error)]
pub enum RouterError {
    /// 映射表或策略表不可用
    #[error(transparent)]
    Store(#[from] StoreError),
    /// 无法读取目标存储桶的 ACL
    #[error("cannot inspect access control of bucket {bucket}: {fault}")]
    Exposure { bucket: String, fault: StorageFault },
    /// 触发事件缺少必要字段
    #[error("invalid trigger event: {0}")]
    InvalidEvent(String),
}
