use crate::error::RouterError;
use crate::routing::{
    Resolution, RoutingContext, extract_identity, has_public_access, is_public_access_allowed,
    resolve_destination,
};
use serde::Serialize;

/// 选择目标存储桶的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionReason {
    /// 使用映射表中的目标存储桶
    Mapped,
    /// 文件名中没有应用名
    NoApplicationName,
    /// 映射表中没有该应用
    MappingNotFound,
    /// 目标存储桶公开且应用不在白名单中
    PublicExposureDenied,
    /// 目标存储桶与源存储桶相同
    SourceBucketLoop,
}

/// 单个对象在单次调用中的路由决策
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoutingDecision {
    /// 最终目标存储桶
    pub destination: String,
    pub reason: DecisionReason,
}

impl RoutingDecision {
    fn mapped(destination: impl Into<String>) -> Self {
        Self {
            destination: destination.into(),
            reason: DecisionReason::Mapped,
        }
    }

    /// 使用错误存储桶的决策。
    pub fn error(error_bucket: impl Into<String>, reason: DecisionReason) -> Self {
        Self {
            destination: error_bucket.into(),
            reason,
        }
    }
}

/// 决定对象的最终目标存储桶。
///
/// 依次执行：
/// 1. 提取应用名，没有应用名时使用错误存储桶。
/// 2. 查找应用的目标存储桶。
/// 3. 查找结果为错误存储桶时直接返回，不检查公开访问。
/// 4. 读取白名单标志，并检查目标存储桶是否公开。
/// 5. 目标存储桶公开且不在白名单中时使用错误存储桶。
/// 6. 否则使用目标存储桶。
///
/// # 参数
///
/// * `key` - 对象键。
/// * `ctx` - 路由上下文。
///
/// # Errors
///
/// 映射表或白名单表不可用、无法读取目标存储桶 ACL 时返回错误，
/// 不会把基础设施故障伪装成错误存储桶路由。
pub async fn decide_destination(
    key: &str,
    ctx: &RoutingContext<'_>,
) -> Result<RoutingDecision, RouterError> {
    let config = ctx.config;
    let error_bucket = config.error_bucket.as_str();
    let verbose = config.verbose;

    let extracted = extract_identity(key, &config.path_delimiter, &config.token_delimiter);
    // 空应用名无法作为分区键查询
    if !extracted.ok || extracted.identity.is_empty() {
        tracing::error!(
            key,
            error_bucket,
            "application name not provided, moving to error bucket"
        );
        return Ok(RoutingDecision::error(
            error_bucket,
            DecisionReason::NoApplicationName,
        ));
    }

    let identity = extracted.identity.as_str();
    if verbose {
        tracing::info!(
            key,
            application = identity,
            "application name read from key"
        );
    }

    let resolution = resolve_destination(identity, ctx.mappings, error_bucket, verbose).await?;
    let candidate = match resolution {
        Resolution::Mapped(bucket) if bucket != error_bucket => bucket,
        Resolution::Mapped(_) => return Ok(RoutingDecision::mapped(error_bucket)),
        Resolution::NotFound { .. } => {
            return Ok(RoutingDecision::error(
                error_bucket,
                DecisionReason::MappingNotFound,
            ));
        }
    };

    let allowed = is_public_access_allowed(identity, ctx.policies, verbose).await?;
    let exposed = has_public_access(&candidate, ctx.storage, verbose).await?;

    if exposed && !allowed {
        tracing::error!(
            application = identity,
            bucket = %candidate,
            error_bucket,
            "destination bucket is public and application is not whitelisted"
        );
        return Ok(RoutingDecision::error(
            error_bucket,
            DecisionReason::PublicExposureDenied,
        ));
    }

    Ok(RoutingDecision::mapped(candidate))
}
