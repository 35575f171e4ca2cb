use anyhow::{Context, Result};
use file_router::config::{self, RouterConfig};
use file_router::handler::function_handler;
use file_router::routing::RoutingContext;
use file_router::store::{DynamoTable, S3Storage};
use lambda_runtime::{run, service_fn};

#[tokio::main]
async fn main() -> Result<()> {
    // 加载 .env 文件（本地运行时）
    dotenvy::dotenv().ok();

    file_router::init_tracing();

    let router_config = RouterConfig::from_env().context("failed to load router configuration")?;

    // 冷启动时创建一次客户端
    let sdk_config = config::load_sdk_config().await;
    let storage = S3Storage::new(config::create_s3_client(&sdk_config));
    let dynamodb =
        config::create_dynamodb_client(&sdk_config, router_config.store_region.as_deref()).await;
    let mappings = DynamoTable::new(dynamodb.clone(), &router_config.mapping_table);
    let policies = DynamoTable::new(dynamodb, &router_config.policy_table);

    tracing::info!(
        error_bucket = %router_config.error_bucket,
        mapping_table = %router_config.mapping_table,
        policy_table = %router_config.policy_table,
        verbose = router_config.verbose,
        "file router started"
    );

    let ctx = RoutingContext::new(&router_config, &mappings, &policies, &storage);
    run(service_fn(|event| function_handler(event, &ctx)))
        .await
        .map_err(|e| anyhow::anyhow!(e))
}
