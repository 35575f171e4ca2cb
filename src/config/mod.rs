//! 文件路由器的配置模块。
//!
//! 该模块负责从环境变量加载路由配置，并创建 AWS 客户端。
//! 配置在冷启动时构建一次，之后通过引用传递给各个组件。

use crate::error::ConfigError;
use aws_config::BehaviorVersion;
use aws_config::Region;
use aws_config::SdkConfig;
use aws_config::meta::region::RegionProviderChain;
use std::env;

/// 默认的错误存储桶
pub const DEFAULT_ERROR_BUCKET: &str = "error-filestore";

/// 默认的路径分隔符
pub const DEFAULT_PATH_DELIMITER: &str = "/";

/// 默认的应用名分隔符
pub const DEFAULT_TOKEN_DELIMITER: &str = "_";

/// 路由配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterConfig {
    /// 是否输出详细日志
    pub verbose: bool,
    /// 错误/回退存储桶名称
    pub error_bucket: String,
    /// 应用名到目标存储桶的映射表
    pub mapping_table: String,
    /// 公开访问白名单表
    pub policy_table: String,
    /// 映射表所在区域，未设置时使用 SDK 默认链
    pub store_region: Option<String>,
    /// 对象键的路径分隔符
    pub path_delimiter: String,
    /// 文件名中应用名的分隔符
    pub token_delimiter: String,
}

impl RouterConfig {
    /// 从进程环境变量加载配置。
    ///
    /// # 环境变量
    ///
    /// * `VERBOSE` / `verbose` - 详细日志开关（默认：false）
    /// * `ERROR_BUCKET` - 错误存储桶（默认：error-filestore）
    /// * `MAPPING_TABLE` - 映射表名称（必须设置）
    /// * `POLICY_TABLE` - 白名单表名称（默认与 `MAPPING_TABLE` 相同）
    /// * `STORE_REGION` - 映射表所在区域
    /// * `PATH_DELIMITER` - 路径分隔符（默认：/）
    /// * `TOKEN_DELIMITER` - 应用名分隔符（默认：_）
    ///
    /// # Errors
    ///
    /// 当必需的变量缺失或为空时返回错误。
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// 使用给定的查找函数加载配置。
    ///
    /// # 参数
    ///
    /// * `lookup` - 根据变量名返回变量值的函数。
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let verbose = lookup("VERBOSE")
            .or_else(|| lookup("verbose"))
            .is_some_and(|v| v.eq_ignore_ascii_case("true"));

        let error_bucket = non_empty(
            "ERROR_BUCKET",
            lookup("ERROR_BUCKET").unwrap_or_else(|| DEFAULT_ERROR_BUCKET.to_string()),
        )?;

        let mapping_table = non_empty(
            "MAPPING_TABLE",
            lookup("MAPPING_TABLE").ok_or(ConfigError::Missing("MAPPING_TABLE"))?,
        )?;

        let policy_table = non_empty(
            "POLICY_TABLE",
            lookup("POLICY_TABLE").unwrap_or_else(|| mapping_table.clone()),
        )?;

        let store_region = lookup("STORE_REGION").filter(|r| !r.is_empty());

        let path_delimiter = non_empty(
            "PATH_DELIMITER",
            lookup("PATH_DELIMITER").unwrap_or_else(|| DEFAULT_PATH_DELIMITER.to_string()),
        )?;

        let token_delimiter = non_empty(
            "TOKEN_DELIMITER",
            lookup("TOKEN_DELIMITER").unwrap_or_else(|| DEFAULT_TOKEN_DELIMITER.to_string()),
        )?;

        Ok(Self {
            verbose,
            error_bucket,
            mapping_table,
            policy_table,
            store_region,
            path_delimiter,
            token_delimiter,
        })
    }
}

fn non_empty(name: &'static str, value: String) -> Result<String, ConfigError> {
    if value.is_empty() {
        Err(ConfigError::Empty(name))
    } else {
        Ok(value)
    }
}

/// 使用标准 AWS 环境变量加载共享配置。
///
/// # 标准 AWS 环境变量
///
/// * `AWS_ACCESS_KEY_ID` - AWS 访问密钥 ID
/// * `AWS_SECRET_ACCESS_KEY` - AWS 秘密访问密钥
/// * `AWS_REGION` - AWS 区域
/// * `AWS_ENDPOINT_URL` - 兼容服务的端点 URL
pub async fn load_sdk_config() -> SdkConfig {
    aws_config::load_defaults(BehaviorVersion::latest()).await
}

/// 创建 S3 客户端。
pub fn create_s3_client(sdk_config: &SdkConfig) -> aws_sdk_s3::Client {
    aws_sdk_s3::Client::new(sdk_config)
}

/// 创建 DynamoDB 客户端。
///
/// 如果配置了 `store_region`，则优先使用该区域，否则沿用共享配置中的区域。
pub async fn create_dynamodb_client(
    sdk_config: &SdkConfig,
    store_region: Option<&str>,
) -> aws_sdk_dynamodb::Client {
    let store_region = store_region.map(|r| Region::new(r.to_string()));
    let region_provider =
        RegionProviderChain::first_try(store_region).or_else(sdk_config.region().cloned());

    let mut builder = aws_sdk_dynamodb::config::Builder::from(sdk_config);
    if let Some(region) = region_provider.region().await {
        builder = builder.region(region);
    }
    aws_sdk_dynamodb::Client::from_conf(builder.build())
}
