use crate::error::RouterError;
use crate::store::PolicyStore;

/// 判断应用是否允许其目标存储桶公开访问。
///
/// 标志以字符串形式存储，只有忽略大小写等于 `"true"` 时才允许。
/// 没有记录、缺少标志或标志格式错误都视为不允许。
///
/// # Errors
///
/// 白名单表不可用时返回 `RouterError::Store`。
pub async fn is_public_access_allowed(
    identity: &str,
    policies: &dyn PolicyStore,
    verbose: bool,
) -> Result<bool, RouterError> {
    let allowed = match policies.policy_for(identity).await? {
        Some(record) => match record.public_access_allowed.as_deref() {
            Some(flag) if flag.eq_ignore_ascii_case("true") => true,
            flag => {
                if verbose {
                    tracing::info!(
                        application = identity,
                        flag = flag.unwrap_or("<missing>"),
                        "public access flag is not \"true\""
                    );
                }
                false
            }
        },
        None => {
            if verbose {
                tracing::info!(
                    application = identity,
                    "no public access record for application"
                );
            }
            false
        }
    };

    if verbose {
        tracing::info!(
            application = identity,
            allowed,
            "public access policy evaluated"
        );
    }

    Ok(allowed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FaultKind, StoreError};
    use crate::store::{MockPolicyStore, PolicyRecord};

    fn store_with(flag: Option<&'static str>) -> MockPolicyStore {
        let mut policies = MockPolicyStore::new();
        policies.expect_policy_for().returning(move |_| {
            Ok(Some(PolicyRecord {
                public_access_allowed: flag.map(str::to_string),
            }))
        });
        policies
    }

    #[tokio::test]
    async fn test_flag_true_case_insensitive() {
        for flag in ["true", "TRUE", "True"] {
            let allowed = is_public_access_allowed("app1", &store_with(Some(flag)), false)
                .await
                .unwrap();
            assert!(allowed, "flag {flag} should allow public access");
        }
    }

    #[tokio::test]
    async fn test_false_or_malformed_flag_denies() {
        for flag in ["false", "yes", "1", ""] {
            let allowed = is_public_access_allowed("app1", &store_with(Some(flag)), true)
                .await
                .unwrap();
            assert!(!allowed, "flag {flag} should deny public access");
        }
    }

    #[tokio::test]
    async fn test_missing_flag_denies() {
        let allowed = is_public_access_allowed("app1", &store_with(None), false)
            .await
            .unwrap();
        assert!(!allowed);
    }

    #[tokio::test]
    async fn test_missing_record_denies() {
        let mut policies = MockPolicyStore::new();
        policies.expect_policy_for().returning(|_| Ok(None));

        let allowed = is_public_access_allowed("app1", &policies, true)
            .await
            .unwrap();
        assert!(!allowed);
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let mut policies = MockPolicyStore::new();
        policies.expect_policy_for().returning(|_| {
            Err(StoreError {
                table: "whitelist".to_string(),
                kind: FaultKind::PermissionDenied,
                message: "AccessDeniedException".to_string(),
            })
        });

        let result = is_public_access_allowed("app1", &policies, false).await;
        assert!(matches!(result, Err(RouterError::Store(_))));
    }
}
