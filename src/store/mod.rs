//! 存储模块
//!
//! 调度引擎只通过这里的两个trait读写健康检查定义和探测事件

pub mod memory;

use crate::error::StoreError;
use crate::health::{HealthCheckDefinition, NewHealthCheck, NewProbeEvent, ProbeEvent};
use async_trait::async_trait;

pub use memory::MemoryStore;

/// 存储操作结果
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// 健康检查定义存储
#[async_trait]
pub trait DefinitionStore: Send + Sync {
    /// 按ID读取定义，不存在时返回 `StoreError::NotFound`
    async fn get_definition(&self, id: i64) -> StoreResult<HealthCheckDefinition>;

    /// 保存新定义并返回分配了ID的记录
    async fn create_definition(&self, new: NewHealthCheck) -> StoreResult<HealthCheckDefinition>;

    /// 按ID升序列出全部定义
    async fn list_definitions(&self) -> StoreResult<Vec<HealthCheckDefinition>>;

    /// 删除定义，不存在时返回 `StoreError::NotFound`
    async fn delete_definition(&self, id: i64) -> StoreResult<()>;
}

/// 探测事件存储，只追加
#[async_trait]
pub trait EventStore: Send + Sync {
    /// 追加事件并返回分配了ID的记录
    async fn append_event(&self, event: NewProbeEvent) -> StoreResult<ProbeEvent>;

    /// 读取某个健康检查最近的一条事件，没有事件时返回 `StoreError::NotFound`
    async fn most_recent_event(&self, health_check_id: i64) -> StoreResult<ProbeEvent>;

    /// 按创建时间列出某个健康检查的全部事件
    async fn list_events(&self, health_check_id: i64) -> StoreResult<Vec<ProbeEvent>>;
}
