//! 对象搬移模块
//!
//! 通过 "复制 + 删除" 把对象从源存储桶搬移到目标存储桶。
//! 两步之间没有事务，搬移结果用 `RelocationOutcome` 明确表示：
//!
//! - 复制成功、删除成功：`Moved`
//! - 复制成功、删除失败：`Failed(DeleteFailed)`，对象同时存在于两个存储桶
//! - 复制失败、隔离复制成功：`Quarantined`，源对象保留
//! - 复制失败、隔离复制失败：`Failed(CopyFailed)`，对象只存在于源存储桶

use crate::error::StorageFault;
use crate::store::ObjectStorage;
use serde::Serialize;

/// 需要人工处理的搬移失败
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RelocationFailure {
    /// 已复制到目标存储桶，但源对象删除失败
    DeleteFailed { fault: StorageFault },
    /// 复制到目标存储桶失败，隔离复制也失败或未尝试
    CopyFailed {
        copy_fault: StorageFault,
        quarantine_fault: Option<StorageFault>,
    },
}

/// 搬移结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RelocationOutcome {
    /// 对象已搬移到目标存储桶
    Moved,
    /// 对象已复制到错误存储桶，源对象保留
    Quarantined { copy_fault: StorageFault },
    /// 搬移失败
    Failed { failure: RelocationFailure },
}

impl RelocationOutcome {
    /// 是否成功搬移到目标存储桶
    pub fn is_moved(&self) -> bool {
        matches!(self, Self::Moved)
    }
}

/// 复制对象，失败时记录错误日志。
async fn copy_file(
    storage: &dyn ObjectStorage,
    source_bucket: &str,
    destination_bucket: &str,
    key: &str,
    verbose: bool,
) -> Result<(), StorageFault> {
    if verbose {
        tracing::info!(key, source_bucket, destination_bucket, "copying file");
    }

    match storage
        .copy_object(source_bucket, destination_bucket, key)
        .await
    {
        Ok(()) => {
            if verbose {
                tracing::info!(key, source_bucket, destination_bucket, "file copied");
            }
            Ok(())
        }
        Err(fault) => {
            tracing::error!(
                key,
                source_bucket,
                destination_bucket,
                fault = %fault,
                "an error occurred copying file"
            );
            Err(fault)
        }
    }
}

/// 删除对象，失败时记录错误日志。
async fn delete_file(
    storage: &dyn ObjectStorage,
    bucket: &str,
    key: &str,
    verbose: bool,
) -> Result<(), StorageFault> {
    if verbose {
        tracing::info!(key, bucket, "deleting file");
    }

    match storage.delete_object(bucket, key).await {
        Ok(()) => {
            if verbose {
                tracing::info!(key, bucket, "file deleted");
            }
            Ok(())
        }
        Err(fault) => {
            tracing::error!(key, bucket, fault = %fault, "an error occurred deleting file");
            Err(fault)
        }
    }
}

/// 把对象从源存储桶搬移到目标存储桶。
///
/// 只有在确认复制到目标存储桶成功后才会删除源对象；
/// 复制失败时尝试把对象复制到错误存储桶进行隔离，但不删除源对象。
/// 每次调用只尝试一次，不做重试。
///
/// # 参数
///
/// * `source_bucket` - 源存储桶。
/// * `destination_bucket` - 路由决策得到的目标存储桶。
/// * `key` - 对象键。
/// * `storage` - 对象存储客户端。
/// * `error_bucket` - 错误存储桶。
/// * `verbose` - 是否输出详细日志。
pub async fn relocate(
    source_bucket: &str,
    destination_bucket: &str,
    key: &str,
    storage: &dyn ObjectStorage,
    error_bucket: &str,
    verbose: bool,
) -> RelocationOutcome {
    let copied = copy_file(storage, source_bucket, destination_bucket, key, verbose).await;
    let copy_fault = match copied {
        Ok(()) => {
            return match delete_file(storage, source_bucket, key, verbose).await {
                Ok(()) => {
                    if verbose {
                        tracing::info!(key, source_bucket, destination_bucket, "file moved");
                    }
                    RelocationOutcome::Moved
                }
                Err(fault) => {
                    tracing::error!(
                        key,
                        source_bucket,
                        destination_bucket,
                        "file copied but not deleted from source, object is duplicated"
                    );
                    RelocationOutcome::Failed {
                        failure: RelocationFailure::DeleteFailed { fault },
                    }
                }
            };
        }
        Err(fault) => fault,
    };

    // 目标本身就是错误存储桶时，再复制一次只是重复同一个请求
    if destination_bucket == error_bucket {
        tracing::error!(key, source_bucket, "leaving file in source bucket");
        return RelocationOutcome::Failed {
            failure: RelocationFailure::CopyFailed {
                copy_fault,
                quarantine_fault: None,
            },
        };
    }

    match copy_file(storage, source_bucket, error_bucket, key, verbose).await {
        Ok(()) => {
            tracing::warn!(
                key,
                source_bucket,
                error_bucket,
                "file quarantined in error bucket, source object kept"
            );
            RelocationOutcome::Quarantined { copy_fault }
        }
        Err(quarantine_fault) => {
            tracing::error!(key, source_bucket, "leaving file in source bucket");
            RelocationOutcome::Failed {
                failure: RelocationFailure::CopyFailed {
                    copy_fault,
                    quarantine_fault: Some(quarantine_fault),
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FaultKind;
    use crate::store::MockObjectStorage;

    fn denied() -> StorageFault {
        StorageFault::new(FaultKind::PermissionDenied, "AccessDenied")
    }

    #[tokio::test]
    async fn test_copy_and_delete_succeed() {
        let mut storage = MockObjectStorage::new();
        storage
            .expect_copy_object()
            .withf(|src, dst, key| src == "inbound" && dst == "out-bucket" && key == "app1_a.csv")
            .times(1)
            .returning(|_, _, _| Ok(()));
        storage
            .expect_delete_object()
            .withf(|bucket, key| bucket == "inbound" && key == "app1_a.csv")
            .times(1)
            .returning(|_, _| Ok(()));

        let outcome = relocate(
            "inbound",
            "out-bucket",
            "app1_a.csv",
            &storage,
            "error-filestore",
            true,
        )
        .await;
        assert_eq!(outcome, RelocationOutcome::Moved);
        assert!(outcome.is_moved());
    }

    #[tokio::test]
    async fn test_delete_failure_is_not_retried() {
        let mut storage = MockObjectStorage::new();
        storage
            .expect_copy_object()
            .times(1)
            .returning(|_, _, _| Ok(()));
        storage
            .expect_delete_object()
            .times(1)
            .returning(|_, _| Err(denied()));

        let outcome = relocate(
            "inbound",
            "out-bucket",
            "app1_a.csv",
            &storage,
            "error-filestore",
            false,
        )
        .await;
        assert_eq!(
            outcome,
            RelocationOutcome::Failed {
                failure: RelocationFailure::DeleteFailed { fault: denied() },
            }
        );
    }

    #[tokio::test]
    async fn test_copy_failure_quarantines_without_delete() {
        let mut storage = MockObjectStorage::new();
        storage
            .expect_copy_object()
            .withf(|_, dst, _| dst == "out-bucket")
            .times(1)
            .returning(|_, _, _| Err(denied()));
        storage
            .expect_copy_object()
            .withf(|_, dst, _| dst == "error-filestore")
            .times(1)
            .returning(|_, _, _| Ok(()));
        storage.expect_delete_object().times(0);

        let outcome = relocate(
            "inbound",
            "out-bucket",
            "app1_a.csv",
            &storage,
            "error-filestore",
            false,
        )
        .await;
        assert_eq!(
            outcome,
            RelocationOutcome::Quarantined {
                copy_fault: denied(),
            }
        );
        assert!(!outcome.is_moved());
    }

    #[tokio::test]
    async fn test_both_copies_fail() {
        let mut storage = MockObjectStorage::new();
        storage
            .expect_copy_object()
            .times(2)
            .returning(|_, _, _| Err(denied()));
        storage.expect_delete_object().times(0);

        let outcome = relocate(
            "inbound",
            "out-bucket",
            "app1_a.csv",
            &storage,
            "error-filestore",
            false,
        )
        .await;
        assert_eq!(
            outcome,
            RelocationOutcome::Failed {
                failure: RelocationFailure::CopyFailed {
                    copy_fault: denied(),
                    quarantine_fault: Some(denied()),
                },
            }
        );
    }

    #[tokio::test]
    async fn test_error_bucket_destination_is_not_copied_twice() {
        let mut storage = MockObjectStorage::new();
        storage
            .expect_copy_object()
            .times(1)
            .returning(|_, _, _| Err(denied()));
        storage.expect_delete_object().times(0);

        let outcome = relocate(
            "inbound",
            "error-filestore",
            "noapplicationname.csv",
            &storage,
            "error-filestore",
            false,
        )
        .await;
        assert!(matches!(
            outcome,
            RelocationOutcome::Failed {
                failure: RelocationFailure::CopyFailed {
                    quarantine_fault: None,
                    ..
                },
            }
        ));
    }
}
