//! Tenant data store
//!
//! The [`TenantStore`] trait is the request/response data-access surface the
//! HTTP layer consumes. It enforces the schema's uniqueness invariants:
//! - tenant `subdomain` and `slug` are unique
//! - `(tenant_id, email)` is unique among users
//! - users and posts must reference existing records
//!
//! Two backends implement it: [`PgStore`] for production and [`MemoryStore`]
//! for tests and database-less local development.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::types::{
    NewPost, NewTenant, NewUser, Post, PostId, PostStatus, Tenant, TenantId, TenantSettings, User,
    UserId, UserRole,
};

#[async_trait]
pub trait TenantStore: Send + Sync {
    // Tenants

    /// Get tenant by subdomain, active or not
    async fn get_tenant_by_subdomain(&self, subdomain: &str) -> StoreResult<Option<Tenant>>;

    async fn get_tenant(&self, tenant_id: TenantId) -> StoreResult<Option<Tenant>>;

    /// List active tenants in creation order
    async fn list_active_tenants(&self) -> StoreResult<Vec<Tenant>>;

    /// Create a new, active tenant
    async fn create_tenant(&self, tenant: NewTenant) -> StoreResult<TenantId>;

    /// Replace a tenant's settings
    async fn update_tenant_settings(
        &self,
        tenant_id: TenantId,
        settings: TenantSettings,
    ) -> StoreResult<()>;

    /// Soft delete: keeps the data but marks the tenant inactive
    async fn deactivate_tenant(&self, tenant_id: TenantId) -> StoreResult<()>;

    // Users

    async fn get_users_by_tenant(&self, tenant_id: TenantId) -> StoreResult<Vec<User>>;

    async fn get_user_by_email(&self, tenant_id: TenantId, email: &str)
        -> StoreResult<Option<User>>;

    /// Create a new, active user within an existing tenant
    async fn create_user(&self, user: NewUser) -> StoreResult<UserId>;

    async fn update_user_role(&self, user_id: UserId, role: UserRole) -> StoreResult<()>;

    // Posts

    /// List a tenant's posts in creation order, optionally filtered by status
    async fn list_posts(
        &self,
        tenant_id: TenantId,
        status: Option<PostStatus>,
    ) -> StoreResult<Vec<Post>>;

    async fn create_post(&self, post: NewPost) -> StoreResult<PostId>;

    // Maintenance

    /// True when no tenant exists
    async fn is_empty(&self) -> StoreResult<bool>;

    /// Delete all posts, users and tenants
    async fn clear(&self) -> StoreResult<()>;

    /// Cheap connectivity probe for health checks
    async fn ping(&self) -> StoreResult<()>;
}
