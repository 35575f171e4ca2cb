//! 存储访问模块
//!
//! 该模块定义路由核心依赖的外部协作方接口：
//! - 映射表：应用名 -> 目标存储桶
//! - 白名单表：应用名 -> 是否允许公开访问
//! - 对象存储：ACL 读取、复制与删除
//!
//! 生产实现位于 `dynamodb` 与 `s3` 子模块，测试中使用 mockall 生成的替身。

pub mod dynamodb;
pub mod s3;

use crate::error::{FaultKind, StorageFault, StoreError};
use async_trait::async_trait;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
#[cfg(test)]
use mockall::automock;

pub use dynamodb::DynamoTable;
pub use s3::S3Storage;

/// "所有用户" 组的 URI，出现在 ACL 中即表示公开访问
pub const ALL_USERS_GROUP_URI: &str = "http://acs.amazonaws.com/groups/global/AllUsers";

/// ACL 授权对象
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Grantee {
    /// 预定义的用户组
    Group { uri: String },
    /// 以账户 ID 标识的用户
    CanonicalUser { id: String },
    /// 以邮箱标识的用户
    Email { email: String },
    /// 其他无法识别的授权对象
    Other,
}

/// 存储桶 ACL 中的一条授权
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AclGrant {
    pub grantee: Grantee,
    /// 权限名称，如 `READ`、`WRITE`、`FULL_CONTROL`
    pub permission: String,
}

impl AclGrant {
    /// 判断该授权是否授予了 "所有用户" 组。
    pub fn is_all_users(&self) -> bool {
        matches!(&self.grantee, Grantee::Group { uri } if uri == ALL_USERS_GROUP_URI)
    }
}

/// 白名单表中的一条记录
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PolicyRecord {
    /// 原始的公开访问标志，可能缺失或格式错误
    pub public_access_allowed: Option<String>,
}

/// 应用名到目标存储桶的映射表
#[cfg_attr(test, automock)]
#[async_trait]
pub trait MappingStore: Send + Sync {
    /// 按应用名精确查找目标存储桶。
    ///
    /// # 返回值
    ///
    /// 找到映射时返回 `Some(bucket)`，没有记录时返回 `None`。
    ///
    /// # Errors
    ///
    /// 表不可用或查询失败时返回错误。
    async fn destination_for(&self, identity: &str) -> Result<Option<String>, StoreError>;
}

/// 公开访问白名单表
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PolicyStore: Send + Sync {
    /// 按应用名查找白名单记录。
    ///
    /// # Errors
    ///
    /// 表不可用或查询失败时返回错误。
    async fn policy_for(&self, identity: &str) -> Result<Option<PolicyRecord>, StoreError>;
}

/// 对象存储客户端
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// 获取存储桶的 ACL 授权列表。
    async fn bucket_grants(&self, bucket: &str) -> Result<Vec<AclGrant>, StorageFault>;

    /// 将对象从源存储桶复制到目标存储桶，保持键不变。
    async fn copy_object(
        &self,
        source_bucket: &str,
        destination_bucket: &str,
        key: &str,
    ) -> Result<(), StorageFault>;

    /// 从存储桶中删除对象。
    async fn delete_object(&self, bucket: &str, key: &str) -> Result<(), StorageFault>;
}

/// 根据 SDK 错误判断故障类别。
///
/// 超时与网络分发失败视为暂时性故障，服务端错误按错误码归类。
pub(crate) fn classify_sdk_error<E, R>(err: &SdkError<E, R>) -> FaultKind
where
    E: ProvideErrorMetadata,
{
    match err {
        SdkError::TimeoutError(_) | SdkError::DispatchFailure(_) => FaultKind::Transient,
        SdkError::ServiceError(service) => FaultKind::from_error_code(service.err().code()),
        _ => FaultKind::Unknown,
    }
}

/// 将 SDK 错误转换为带故障类别的 `StorageFault`。
pub(crate) fn storage_fault<E, R>(err: SdkError<E, R>) -> StorageFault
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    let kind = classify_sdk_error(&err);
    StorageFault::new(kind, DisplayErrorContext(&err).to_string())
}
