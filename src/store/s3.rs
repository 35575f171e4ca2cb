//! S3 对象存储模块
//!
//! 该模块负责与 S3 存储桶的交互：读取 ACL、复制对象和删除对象。
//! 每次调用只发送一次请求，重试策略由 SDK 客户端决定。

use crate::error::StorageFault;
use crate::store::{AclGrant, Grantee, ObjectStorage, storage_fault};
use crate::utils::key::encode_copy_source;
use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::types::Type;

/// 基于 `aws_sdk_s3::Client` 的对象存储
#[derive(Debug, Clone)]
pub struct S3Storage {
    client: Client,
}

impl S3Storage {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

/// 将 SDK 的授权对象转换为本地类型。
fn convert_grantee(grantee: &aws_sdk_s3::types::Grantee) -> Grantee {
    match grantee.r#type() {
        Type::Group => Grantee::Group {
            uri: grantee.uri().unwrap_or_default().to_string(),
        },
        Type::CanonicalUser => Grantee::CanonicalUser {
            id: grantee.id().unwrap_or_default().to_string(),
        },
        Type::AmazonCustomerByEmail => Grantee::Email {
            email: grantee.email_address().unwrap_or_default().to_string(),
        },
        _ => Grantee::Other,
    }
}

#[async_trait]
impl ObjectStorage for S3Storage {
    async fn bucket_grants(&self, bucket: &str) -> Result<Vec<AclGrant>, StorageFault> {
        let output = self
            .client
            .get_bucket_acl()
            .bucket(bucket)
            .send()
            .await
            .map_err(storage_fault)?;

        let grants = output
            .grants()
            .iter()
            .filter_map(|grant| {
                let grantee = convert_grantee(grant.grantee()?);
                let permission = grant
                    .permission()
                    .map(|p| p.as_str().to_string())
                    .unwrap_or_default();
                Some(AclGrant {
                    grantee,
                    permission,
                })
            })
            .collect();

        Ok(grants)
    }

    async fn copy_object(
        &self,
        source_bucket: &str,
        destination_bucket: &str,
        key: &str,
    ) -> Result<(), StorageFault> {
        self.client
            .copy_object()
            .copy_source(encode_copy_source(source_bucket, key))
            .bucket(destination_bucket)
            .key(key)
            .send()
            .await
            .map_err(storage_fault)?;
        Ok(())
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<(), StorageFault> {
        self.client
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(storage_fault)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ALL_USERS_GROUP_URI;

    #[test]
    fn test_convert_group_grantee() {
        let sdk_grantee = aws_sdk_s3::types::Grantee::builder()
            .r#type(Type::Group)
            .uri(ALL_USERS_GROUP_URI)
            .build()
            .unwrap();

        assert_eq!(
            convert_grantee(&sdk_grantee),
            Grantee::Group {
                uri: ALL_USERS_GROUP_URI.to_string()
            }
        );
    }

    #[test]
    fn test_convert_canonical_user_grantee() {
        let sdk_grantee = aws_sdk_s3::types::Grantee::builder()
            .r#type(Type::CanonicalUser)
            .id("owner-id")
            .build()
            .unwrap();

        assert_eq!(
            convert_grantee(&sdk_grantee),
            Grantee::CanonicalUser {
                id: "owner-id".to_string()
            }
        );
    }
}
