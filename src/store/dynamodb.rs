//! DynamoDB 映射表模块
//!
//! 映射表与白名单表都以 `APPLICATION_NAME` 为分区键，
//! 同一张表可以同时承担两种角色。

use crate::error::{StorageFault, StoreError};
use crate::store::{MappingStore, PolicyRecord, PolicyStore, storage_fault};
use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::types::AttributeValue;
use std::collections::HashMap;

/// 分区键属性名
pub const APPLICATION_NAME_ATTR: &str = "APPLICATION_NAME";

/// 目标存储桶属性名
pub const TARGET_BUCKET_ATTR: &str = "TARGET_BUCKET";

/// 公开访问标志属性名
pub const PUBLIC_ACCESS_ALLOWED_ATTR: &str = "PUBLIC_ACCESS_ALLOWED";

type Item = HashMap<String, AttributeValue>;

/// 以应用名为键的 DynamoDB 表
#[derive(Debug, Clone)]
pub struct DynamoTable {
    client: Client,
    table: String,
}

impl DynamoTable {
    pub fn new(client: Client, table: impl Into<String>) -> Self {
        Self {
            client,
            table: table.into(),
        }
    }

    /// 查询应用名对应的第一条记录。
    ///
    /// # Errors
    ///
    /// 查询失败时返回带故障类别的 `StoreError`。
    async fn first_item(&self, identity: &str) -> Result<Option<Item>, StoreError> {
        let output = self
            .client
            .query()
            .table_name(&self.table)
            .key_condition_expression("#app = :app")
            .expression_attribute_names("#app", APPLICATION_NAME_ATTR)
            .expression_attribute_values(":app", AttributeValue::S(identity.to_string()))
            .limit(1)
            .send()
            .await
            .map_err(|e| {
                let StorageFault { kind, message } = storage_fault(e);
                StoreError {
                    table: self.table.clone(),
                    kind,
                    message,
                }
            })?;

        Ok(output.items().first().cloned())
    }
}

/// 读取字符串属性
fn string_attr(item: &Item, name: &str) -> Option<String> {
    match item.get(name)? {
        AttributeValue::S(value) => Some(value.clone()),
        _ => None,
    }
}

/// 读取目标存储桶，属性缺失、为空或不是字符串时返回 `None`。
fn target_bucket(item: &Item) -> Option<String> {
    string_attr(item, TARGET_BUCKET_ATTR).filter(|bucket| !bucket.is_empty())
}

/// 读取公开访问标志，布尔属性转换为 `"true"` / `"false"`。
fn public_access_flag(item: &Item) -> Option<String> {
    match item.get(PUBLIC_ACCESS_ALLOWED_ATTR)? {
        AttributeValue::Bool(value) => Some(value.to_string()),
        _ => string_attr(item, PUBLIC_ACCESS_ALLOWED_ATTR),
    }
}

#[async_trait]
impl MappingStore for DynamoTable {
    async fn destination_for(&self, identity: &str) -> Result<Option<String>, StoreError> {
        let Some(item) = self.first_item(identity).await? else {
            return Ok(None);
        };

        let bucket = target_bucket(&item);
        if bucket.is_none() {
            tracing::warn!(
                table = %self.table,
                application = identity,
                "mapping record has no usable {TARGET_BUCKET_ATTR} attribute"
            );
        }
        Ok(bucket)
    }
}

#[async_trait]
impl PolicyStore for DynamoTable {
    async fn policy_for(&self, identity: &str) -> Result<Option<PolicyRecord>, StoreError> {
        let item = self.first_item(identity).await?;
        Ok(item.map(|item| PolicyRecord {
            public_access_allowed: public_access_flag(&item),
        }))
    }
}
