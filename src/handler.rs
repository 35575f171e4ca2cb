//! 调用入口模块
//!
//! 该模块负责处理 S3 事件通知：取出源存储桶与对象键，
//! 执行路由决策与对象搬移，并返回本次调用的结果报告。

use crate::error::RouterError;
use crate::relocation::{RelocationOutcome, relocate};
use crate::routing::{DecisionReason, RoutingContext, RoutingDecision, decide_destination};
use crate::utils::key::decode_event_key;
use aws_lambda_events::event::s3::S3Event;
use lambda_runtime::LambdaEvent;
use serde::Serialize;

/// 触发事件中的对象
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectEvent {
    /// 源存储桶
    pub bucket: String,
    /// 解码后的对象键
    pub key: String,
}

impl ObjectEvent {
    /// 从 S3 事件中取出第一条记录。
    ///
    /// 每次调用只处理一个对象，多余的记录会被记录日志并忽略。
    ///
    /// # Errors
    ///
    /// 事件中没有记录，或记录缺少存储桶名称/对象键时返回 `RouterError::InvalidEvent`。
    pub fn from_s3_event(event: &S3Event) -> Result<Self, RouterError> {
        let record = event
            .records
            .first()
            .ok_or_else(|| RouterError::InvalidEvent("event contains no records".to_string()))?;

        if event.records.len() > 1 {
            tracing::warn!(
                records = event.records.len(),
                "event contains more than one record, only the first is processed"
            );
        }

        let bucket = record
            .s3
            .bucket
            .name
            .clone()
            .filter(|name| !name.is_empty())
            .ok_or_else(|| RouterError::InvalidEvent("record has no bucket name".to_string()))?;

        let key = record
            .s3
            .object
            .key
            .as_deref()
            .filter(|key| !key.is_empty())
            .map(decode_event_key)
            .ok_or_else(|| RouterError::InvalidEvent("record has no object key".to_string()))?;

        Ok(Self { bucket, key })
    }
}

/// 单次调用的结果报告
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvocationReport {
    pub source_bucket: String,
    pub key: String,
    pub destination: String,
    pub reason: DecisionReason,
    pub outcome: RelocationOutcome,
}

/// 处理单个对象：决定目标存储桶并搬移对象。
///
/// # Errors
///
/// 映射表、白名单表或 ACL 不可用时返回错误，此时不会尝试搬移对象。
/// 对象已位于错误存储桶中时返回 `RouterError::InvalidEvent`。
pub async fn process_object(
    object: &ObjectEvent,
    ctx: &RoutingContext<'_>,
) -> Result<InvocationReport, RouterError> {
    let config = ctx.config;
    if object.bucket == config.error_bucket {
        let reason = format!("object {} is already in the error bucket", object.key);
        return Err(RouterError::InvalidEvent(reason));
    }

    let mut decision = decide_destination(&object.key, ctx).await?;

    if decision.destination == object.bucket {
        tracing::error!(
            key = %object.key,
            bucket = %object.bucket,
            "destination is the source bucket, moving to error bucket"
        );
        decision = RoutingDecision::error(&config.error_bucket, DecisionReason::SourceBucketLoop);
    }

    let outcome = relocate(
        &object.bucket,
        &decision.destination,
        &object.key,
        ctx.storage,
        &config.error_bucket,
        config.verbose,
    )
    .await;

    if outcome.is_moved() {
        tracing::info!(
            key = %object.key,
            source_bucket = %object.bucket,
            destination_bucket = %decision.destination,
            "file successfully moved"
        );
    } else {
        tracing::error!(
            key = %object.key,
            source_bucket = %object.bucket,
            outcome = ?outcome,
            "there was a problem processing file"
        );
    }

    Ok(InvocationReport {
        source_bucket: object.bucket.clone(),
        key: object.key.clone(),
        destination: decision.destination,
        reason: decision.reason,
        outcome,
    })
}

/// 处理 S3 事件通知。
///
/// # Errors
///
/// 事件无效或发生致命错误时返回错误。
pub async fn handle_s3_event(
    event: &S3Event,
    ctx: &RoutingContext<'_>,
) -> Result<InvocationReport, RouterError> {
    let object = ObjectEvent::from_s3_event(event)?;
    process_object(&object, ctx).await
}

/// Lambda 函数处理器
pub async fn function_handler(
    event: LambdaEvent<S3Event>,
    ctx: &RoutingContext<'_>,
) -> Result<InvocationReport, lambda_runtime::Error> {
    let report = handle_s3_event(&event.payload, ctx).await?;
    Ok(report)
}
