use crate::error::RouterError;
use crate::store::MappingStore;

/// 映射查找结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// 找到了应用的目标存储桶
    Mapped(String),
    /// 映射表中没有该应用，使用错误存储桶
    NotFound { fallback: String },
}

impl Resolution {
    /// 本次解析得到的存储桶
    pub fn bucket(&self) -> &str {
        match self {
            Self::Mapped(bucket) => bucket,
            Self::NotFound { fallback } => fallback,
        }
    }
}

/// 查找应用的目标存储桶。
///
/// # 参数
///
/// * `identity` - 应用名。
/// * `mappings` - 映射表。
/// * `error_bucket` - 找不到映射时使用的错误存储桶。
/// * `verbose` - 是否输出详细日志。
///
/// # Errors
///
/// 映射表不可用时返回 `RouterError::Store`；没有记录不是错误。
pub async fn resolve_destination(
    identity: &str,
    mappings: &dyn MappingStore,
    error_bucket: &str,
    verbose: bool,
) -> Result<Resolution, RouterError> {
    let resolution = match mappings.destination_for(identity).await? {
        Some(bucket) => Resolution::Mapped(bucket),
        None => {
            tracing::error!(
                application = identity,
                error_bucket,
                "application not found in mapping table, directing file to error bucket"
            );
            Resolution::NotFound {
                fallback: error_bucket.to_string(),
            }
        }
    };

    if verbose {
        tracing::info!(
            application = identity,
            bucket = resolution.bucket(),
            "destination bucket resolved"
        );
    }

    Ok(resolution)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FaultKind, StoreError};
    use crate::store::MockMappingStore;

    #[tokio::test]
    async fn test_resolve_mapped_destination() {
        let mut mappings = MockMappingStore::new();
        mappings
            .expect_destination_for()
            .withf(|identity| identity == "app1")
            .times(1)
            .returning(|_| Ok(Some("out-bucket".to_string())));

        let resolution = resolve_destination("app1", &mappings, "error-filestore", false)
            .await
            .unwrap();
        assert_eq!(resolution, Resolution::Mapped("out-bucket".to_string()));
        assert_eq!(resolution.bucket(), "out-bucket");
    }

    #[tokio::test]
    async fn test_resolve_unmapped_identity_falls_back() {
        let mut mappings = MockMappingStore::new();
        mappings.expect_destination_for().returning(|_| Ok(None));

        let resolution = resolve_destination("ghost", &mappings, "error-filestore", true)
            .await
            .unwrap();
        assert_eq!(
            resolution,
            Resolution::NotFound {
                fallback: "error-filestore".to_string(),
            }
        );
        assert_eq!(resolution.bucket(), "error-filestore");
    }

    #[tokio::test]
    async fn test_resolve_propagates_store_failure() {
        let mut mappings = MockMappingStore::new();
        mappings.expect_destination_for().returning(|_| {
            Err(StoreError {
                table: "apps".to_string(),
                kind: FaultKind::Transient,
                message: "dispatch failure".to_string(),
            })
        });

        let result = resolve_destination("app1", &mappings, "error-filestore", false).await;
        match result {
            Err(RouterError::Store(err)) => assert_eq!(err.kind, FaultKind::Transient),
            other => panic!("expected store error, got {other:?}"),
        }
    }
}
