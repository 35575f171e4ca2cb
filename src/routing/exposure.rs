use crate::error::RouterError;
use crate::store::ObjectStorage;

/// 检查存储桶是否对所有用户公开。
///
/// 只要 ACL 中存在授予 "所有用户" 组的授权即视为公开，无论授予的是何种权限。
///
/// # Errors
///
/// 存储桶不存在或无法读取 ACL 时返回 `RouterError::Exposure`，此时无法安全地做出决定。
pub async fn has_public_access(
    bucket: &str,
    storage: &dyn ObjectStorage,
    verbose: bool,
) -> Result<bool, RouterError> {
    let grants = storage
        .bucket_grants(bucket)
        .await
        .map_err(|fault| RouterError::Exposure {
            bucket: bucket.to_string(),
            fault,
        })?;

    let mut public = false;
    for grant in grants.iter().filter(|g| g.is_all_users()) {
        public = true;
        if verbose {
            tracing::info!(
                bucket,
                permission = %grant.permission,
                "public permission detected on bucket"
            );
        }
    }

    Ok(public)
}
