//! In-memory tenant store (for testing and development)

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use time::OffsetDateTime;

use super::TenantStore;
use crate::error::{StoreError, StoreResult};
use crate::types::{
    NewPost, NewTenant, NewUser, Post, PostId, PostStatus, Tenant, TenantId, TenantSettings, User,
    UserId, UserRole,
};

#[derive(Default)]
struct Tables {
    tenants: Vec<Tenant>,
    users: Vec<User>,
    posts: Vec<Post>,
}

/// Thread-safe in-memory store.
///
/// All tables sit behind one lock so a uniqueness check and the insert that
/// follows it happen atomically. Rows are kept in insertion order.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|_| StoreError::Database("memory store lock poisoned".to_string()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|_| StoreError::Database("memory store lock poisoned".to_string()))
    }
}

#[async_trait]
impl TenantStore for MemoryStore {
    async fn get_tenant_by_subdomain(&self, subdomain: &str) -> StoreResult<Option<Tenant>> {
        let tables = self.read()?;
        Ok(tables
            .tenants
            .iter()
            .find(|t| t.subdomain == subdomain)
            .cloned())
    }

    async fn get_tenant(&self, tenant_id: TenantId) -> StoreResult<Option<Tenant>> {
        let tables = self.read()?;
        Ok(tables.tenants.iter().find(|t| t.id == tenant_id).cloned())
    }

    async fn list_active_tenants(&self) -> StoreResult<Vec<Tenant>> {
        let tables = self.read()?;
        Ok(tables
            .tenants
            .iter()
            .filter(|t| t.is_active)
            .cloned()
            .collect())
    }

    async fn create_tenant(&self, tenant: NewTenant) -> StoreResult<TenantId> {
        let mut tables = self.write()?;

        if tables.tenants.iter().any(|t| t.subdomain == tenant.subdomain) {
            return Err(StoreError::SubdomainTaken(tenant.subdomain));
        }
        if tables.tenants.iter().any(|t| t.slug == tenant.slug) {
            return Err(StoreError::SlugTaken(tenant.slug));
        }

        let id = TenantId::new();
        tables.tenants.push(Tenant {
            id,
            name: tenant.name,
            subdomain: tenant.subdomain,
            slug: tenant.slug,
            is_active: true,
            settings: tenant.settings,
            created_at: OffsetDateTime::now_utc(),
        });
        Ok(id)
    }

    async fn update_tenant_settings(
        &self,
        tenant_id: TenantId,
        settings: TenantSettings,
    ) -> StoreResult<()> {
        let mut tables = self.write()?;
        let tenant = tables
            .tenants
            .iter_mut()
            .find(|t| t.id == tenant_id)
            .ok_or(StoreError::TenantNotFound)?;
        tenant.settings = Some(settings);
        Ok(())
    }

    async fn deactivate_tenant(&self, tenant_id: TenantId) -> StoreResult<()> {
        let mut tables = self.write()?;
        let tenant = tables
            .tenants
            .iter_mut()
            .find(|t| t.id == tenant_id)
            .ok_or(StoreError::TenantNotFound)?;
        tenant.is_active = false;
        Ok(())
    }

    async fn get_users_by_tenant(&self, tenant_id: TenantId) -> StoreResult<Vec<User>> {
        let tables = self.read()?;
        Ok(tables
            .users
            .iter()
            .filter(|u| u.tenant_id == tenant_id)
            .cloned()
            .collect())
    }

    async fn get_user_by_email(
        &self,
        tenant_id: TenantId,
        email: &str,
    ) -> StoreResult<Option<User>> {
        let tables = self.read()?;
        Ok(tables
            .users
            .iter()
            .find(|u| u.tenant_id == tenant_id && u.email == email)
            .cloned())
    }

    async fn create_user(&self, user: NewUser) -> StoreResult<UserId> {
        let mut tables = self.write()?;

        if !tables.tenants.iter().any(|t| t.id == user.tenant_id) {
            return Err(StoreError::TenantNotFound);
        }
        if tables
            .users
            .iter()
            .any(|u| u.tenant_id == user.tenant_id && u.email == user.email)
        {
            return Err(StoreError::UserAlreadyExists { email: user.email });
        }

        let id = UserId::new();
        tables.users.push(User {
            id,
            tenant_id: user.tenant_id,
            name: user.name,
            email: user.email,
            role: user.role,
            is_active: true,
            created_at: OffsetDateTime::now_utc(),
        });
        Ok(id)
    }

    async fn update_user_role(&self, user_id: UserId, role: UserRole) -> StoreResult<()> {
        let mut tables = self.write()?;
        let user = tables
            .users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or(StoreError::UserNotFound)?;
        user.role = role;
        Ok(())
    }

    async fn list_posts(
        &self,
        tenant_id: TenantId,
        status: Option<PostStatus>,
    ) -> StoreResult<Vec<Post>> {
        let tables = self.read()?;
        Ok(tables
            .posts
            .iter()
            .filter(|p| p.tenant_id == tenant_id)
            .filter(|p| status.map_or(true, |s| p.status == s))
            .cloned()
            .collect())
    }

    async fn create_post(&self, post: NewPost) -> StoreResult<PostId> {
        let mut tables = self.write()?;

        if !tables.tenants.iter().any(|t| t.id == post.tenant_id) {
            return Err(StoreError::TenantNotFound);
        }
        let author = tables
            .users
            .iter()
            .find(|u| u.id == post.author_id)
            .ok_or(StoreError::UserNotFound)?;
        if author.tenant_id != post.tenant_id {
            return Err(StoreError::AuthorNotInTenant);
        }

        let id = PostId::new();
        tables.posts.push(Post {
            id,
            tenant_id: post.tenant_id,
            author_id: post.author_id,
            title: post.title,
            content: post.content,
            status: post.status,
            created_at: OffsetDateTime::now_utc(),
        });
        Ok(id)
    }

    async fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.read()?.tenants.is_empty())
    }

    async fn clear(&self) -> StoreResult<()> {
        let mut tables = self.write()?;
        tables.posts.clear();
        tables.users.clear();
        tables.tenants.clear();
        Ok(())
    }

    async fn ping(&self) -> StoreResult<()> {
        self.read().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_tenant(subdomain: &str, slug: &str) -> NewTenant {
        NewTenant {
            name: format!("{} Inc", subdomain),
            subdomain: subdomain.to_string(),
            slug: slug.to_string(),
            settings: None,
        }
    }

    fn new_user(tenant_id: TenantId, email: &str) -> NewUser {
        NewUser {
            tenant_id,
            name: "Test User".to_string(),
            email: email.to_string(),
            role: UserRole::Member,
        }
    }

    #[tokio::test]
    async fn test_create_and_fetch_tenant_by_subdomain() {
        let store = MemoryStore::new();
        let id = store.create_tenant(new_tenant("acme", "acme-corp")).await.unwrap();

        let tenant = store.get_tenant_by_subdomain("acme").await.unwrap().unwrap();
        assert_eq!(tenant.id, id);
        assert!(tenant.is_active);
        assert_eq!(tenant.slug, "acme-corp");

        assert!(store.get_tenant_by_subdomain("other").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_subdomain_rejected() {
        let store = MemoryStore::new();
        store.create_tenant(new_tenant("acme", "acme-1")).await.unwrap();

        let err = store
            .create_tenant(new_tenant("acme", "acme-2"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::SubdomainTaken(ref s) if s == "acme"));
        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn test_duplicate_slug_rejected() {
        let store = MemoryStore::new();
        store.create_tenant(new_tenant("acme", "shared")).await.unwrap();

        let err = store
            .create_tenant(new_tenant("globex", "shared"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::SlugTaken(_)));
    }

    #[tokio::test]
    async fn test_deactivate_hides_tenant_from_active_list() {
        let store = MemoryStore::new();
        let a = store.create_tenant(new_tenant("a", "a")).await.unwrap();
        let b = store.create_tenant(new_tenant("b", "b")).await.unwrap();

        store.deactivate_tenant(a).await.unwrap();

        let active: Vec<_> = store
            .list_active_tenants()
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(active, vec![b]);

        // Soft delete keeps the record
        let tenant = store.get_tenant(a).await.unwrap().unwrap();
        assert!(!tenant.is_active);
    }

    #[tokio::test]
    async fn test_missing_tenant_updates_fail() {
        let store = MemoryStore::new();
        let missing = TenantId::new();

        assert!(matches!(
            store.deactivate_tenant(missing).await,
            Err(StoreError::TenantNotFound)
        ));
        assert!(matches!(
            store
                .update_tenant_settings(missing, TenantSettings::default())
                .await,
            Err(StoreError::TenantNotFound)
        ));
    }

    #[tokio::test]
    async fn test_update_settings() {
        let store = MemoryStore::new();
        let id = store.create_tenant(new_tenant("acme", "acme")).await.unwrap();
        let settings = TenantSettings {
            primary_color: Some("#10b981".to_string()),
            ..Default::default()
        };

        store.update_tenant_settings(id, settings.clone()).await.unwrap();

        let tenant = store.get_tenant(id).await.unwrap().unwrap();
        assert_eq!(tenant.settings, Some(settings));
    }

    #[tokio::test]
    async fn test_user_requires_existing_tenant() {
        let store = MemoryStore::new();
        let err = store
            .create_user(new_user(TenantId::new(), "a@b.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::TenantNotFound));
    }

    #[tokio::test]
    async fn test_user_email_unique_per_tenant() {
        let store = MemoryStore::new();
        let acme = store.create_tenant(new_tenant("acme", "acme")).await.unwrap();
        let globex = store.create_tenant(new_tenant("globex", "globex")).await.unwrap();

        store.create_user(new_user(acme, "jo@x.com")).await.unwrap();

        let err = store
            .create_user(new_user(acme, "jo@x.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::UserAlreadyExists { ref email } if email == "jo@x.com"));

        // Same email in another tenant is fine
        store.create_user(new_user(globex, "jo@x.com")).await.unwrap();

        assert_eq!(store.get_users_by_tenant(acme).await.unwrap().len(), 1);
        let found = store.get_user_by_email(globex, "jo@x.com").await.unwrap();
        assert_eq!(found.unwrap().tenant_id, globex);
    }

    #[tokio::test]
    async fn test_update_user_role() {
        let store = MemoryStore::new();
        let acme = store.create_tenant(new_tenant("acme", "acme")).await.unwrap();
        let user = store.create_user(new_user(acme, "jo@x.com")).await.unwrap();

        store.update_user_role(user, UserRole::Admin).await.unwrap();
        let fetched = store.get_user_by_email(acme, "jo@x.com").await.unwrap().unwrap();
        assert_eq!(fetched.role, UserRole::Admin);

        assert!(matches!(
            store.update_user_role(UserId::new(), UserRole::Viewer).await,
            Err(StoreError::UserNotFound)
        ));
    }

    #[tokio::test]
    async fn test_posts_filtered_by_status_and_checked_for_author() {
        let store = MemoryStore::new();
        let acme = store.create_tenant(new_tenant("acme", "acme")).await.unwrap();
        let globex = store.create_tenant(new_tenant("globex", "globex")).await.unwrap();
        let author = store.create_user(new_user(acme, "jo@x.com")).await.unwrap();

        for status in [PostStatus::Draft, PostStatus::Published] {
            store
                .create_post(NewPost {
                    tenant_id: acme,
                    author_id: author,
                    title: format!("{} post", status),
                    content: String::new(),
                    status,
                })
                .await
                .unwrap();
        }

        assert_eq!(store.list_posts(acme, None).await.unwrap().len(), 2);
        let published = store
            .list_posts(acme, Some(PostStatus::Published))
            .await
            .unwrap();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].title, "published post");

        let err = store
            .create_post(NewPost {
                tenant_id: globex,
                author_id: author,
                title: "cross-tenant".to_string(),
                content: String::new(),
                status: PostStatus::Draft,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::AuthorNotInTenant));

        let err = store
            .create_post(NewPost {
                tenant_id: acme,
                author_id: UserId::new(),
                title: "ghost".to_string(),
                content: String::new(),
                status: PostStatus::Draft,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::UserNotFound));
    }

    #[tokio::test]
    async fn test_clear_empties_all_tables() {
        let store = MemoryStore::new();
        let acme = store.create_tenant(new_tenant("acme", "acme")).await.unwrap();
        store.create_user(new_user(acme, "jo@x.com")).await.unwrap();
        assert!(!store.is_empty().await.unwrap());

        store.clear().await.unwrap();

        assert!(store.is_empty().await.unwrap());
        assert!(store.get_users_by_tenant(acme).await.unwrap().is_empty());
    }
}
