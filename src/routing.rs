//! 路由决策模块
//!
//! 该模块根据对象键决定文件的最终去向：
//! - `identity`：从对象键提取应用名
//! - `mapping`：查找应用对应的目标存储桶
//! - `policy`：读取应用的公开访问白名单标志
//! - `exposure`：检查存储桶是否对所有用户公开
//! - `decision`：组合以上步骤得出最终目标存储桶

pub mod decision;
pub mod exposure;
pub mod identity;
pub mod mapping;
pub mod policy;

use crate::config::RouterConfig;
use crate::store::{MappingStore, ObjectStorage, PolicyStore};

pub use decision::{DecisionReason, RoutingDecision, decide_destination};
pub use exposure::has_public_access;
pub use identity::{ExtractedIdentity, extract_identity};
pub use mapping::{Resolution, resolve_destination};
pub use policy::is_public_access_allowed;

/// 单次调用的路由上下文
///
/// 客户端在冷启动时创建一次，每次调用通过引用组装上下文，
/// 不持有任何跨调用的可变状态。
#[derive(Clone, Copy)]
pub struct RoutingContext<'a> {
    pub config: &'a RouterConfig,
    pub mappings: &'a dyn MappingStore,
    pub policies: &'a dyn PolicyStore,
    pub storage: &'a dyn ObjectStorage,
}

impl<'a> RoutingContext<'a> {
    pub fn new(
        config: &'a RouterConfig,
        mappings: &'a dyn MappingStore,
        policies: &'a dyn PolicyStore,
        storage: &'a dyn ObjectStorage,
    ) -> Self {
        Self {
            config,
            mappings,
            policies,
            storage,
        }
    }
}
