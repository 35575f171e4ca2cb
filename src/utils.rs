//! 工具函数模块
//!
//! 此模块包含了项目中使用的工具函数：
//! - 对象键处理工具（事件键解码、复制源编码）

pub mod key;
