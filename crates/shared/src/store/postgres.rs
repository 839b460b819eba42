//! PostgreSQL tenant store
//!
//! Uniqueness is enforced by the unique constraints created in the initial
//! migration; constraint violations are mapped back to named store errors.

use async_trait::async_trait;
use sqlx::{types::Json, FromRow, PgPool};
use time::OffsetDateTime;

use super::TenantStore;
use crate::error::{StoreError, StoreResult};
use crate::types::{
    NewPost, NewTenant, NewUser, Post, PostId, PostStatus, Tenant, TenantId, TenantSettings, User,
    UserId, UserRole,
};

/// PostgreSQL unique violation
const UNIQUE_VIOLATION: &str = "23505";
/// PostgreSQL foreign key violation
const FOREIGN_KEY_VIOLATION: &str = "23503";

const POSTS_AUTHOR_FKEY: &str = "posts_author_id_fkey";

#[derive(Debug, FromRow)]
struct TenantRow {
    id: TenantId,
    name: String,
    subdomain: String,
    slug: String,
    is_active: bool,
    settings: Option<Json<TenantSettings>>,
    created_at: OffsetDateTime,
}

impl From<TenantRow> for Tenant {
    fn from(row: TenantRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            subdomain: row.subdomain,
            slug: row.slug,
            is_active: row.is_active,
            settings: row.settings.map(|s| s.0),
            created_at: row.created_at,
        }
    }
}

const TENANT_COLUMNS: &str = "id, name, subdomain, slug, is_active, settings, created_at";
const USER_COLUMNS: &str = "id, tenant_id, name, email, role, is_active, created_at";
const POST_COLUMNS: &str = "id, tenant_id, author_id, title, content, status, created_at";

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Name of the violated unique constraint, if `err` is a unique violation
fn unique_violation(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) => {
            Some(db_err.constraint().unwrap_or_default().to_string())
        }
        _ => None,
    }
}

/// Name of the violated foreign key constraint, if `err` is a foreign key violation
fn foreign_key_violation(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db_err)
            if db_err.code().as_deref() == Some(FOREIGN_KEY_VIOLATION) =>
        {
            Some(db_err.constraint().unwrap_or_default().to_string())
        }
        _ => None,
    }
}

/// Missing record behind a post insert's foreign key violation
fn post_reference_error(constraint: &str) -> StoreError {
    if constraint == POSTS_AUTHOR_FKEY {
        StoreError::UserNotFound
    } else {
        StoreError::TenantNotFound
    }
}

async fn tenant_exists(pool: &PgPool, tenant_id: TenantId) -> StoreResult<bool> {
    let row: Option<(TenantId,)> = sqlx::query_as("SELECT id FROM tenants WHERE id = $1")
        .bind(tenant_id)
        .fetch_optional(pool)
        .await?;
    Ok(row.is_some())
}

#[async_trait]
impl TenantStore for PgStore {
    async fn get_tenant_by_subdomain(&self, subdomain: &str) -> StoreResult<Option<Tenant>> {
        let row: Option<TenantRow> = sqlx::query_as(&format!(
            "SELECT {} FROM tenants WHERE subdomain = $1",
            TENANT_COLUMNS
        ))
        .bind(subdomain)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Tenant::from))
    }

    async fn get_tenant(&self, tenant_id: TenantId) -> StoreResult<Option<Tenant>> {
        let row: Option<TenantRow> =
            sqlx::query_as(&format!("SELECT {} FROM tenants WHERE id = $1", TENANT_COLUMNS))
                .bind(tenant_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(Tenant::from))
    }

    async fn list_active_tenants(&self) -> StoreResult<Vec<Tenant>> {
        let rows: Vec<TenantRow> = sqlx::query_as(&format!(
            "SELECT {} FROM tenants WHERE is_active = TRUE ORDER BY created_at",
            TENANT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Tenant::from).collect())
    }

    async fn create_tenant(&self, tenant: NewTenant) -> StoreResult<TenantId> {
        let id = TenantId::new();

        let result = sqlx::query(
            r#"
            INSERT INTO tenants (id, name, subdomain, slug, is_active, settings, created_at)
            VALUES ($1, $2, $3, $4, TRUE, $5, NOW())
            "#,
        )
        .bind(id)
        .bind(&tenant.name)
        .bind(&tenant.subdomain)
        .bind(&tenant.slug)
        .bind(tenant.settings.map(Json))
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(id),
            Err(err) => match unique_violation(&err).as_deref() {
                Some("tenants_slug_key") => Err(StoreError::SlugTaken(tenant.slug)),
                Some(_) => Err(StoreError::SubdomainTaken(tenant.subdomain)),
                None => Err(err.into()),
            },
        }
    }

    async fn update_tenant_settings(
        &self,
        tenant_id: TenantId,
        settings: TenantSettings,
    ) -> StoreResult<()> {
        let result = sqlx::query("UPDATE tenants SET settings = $1 WHERE id = $2")
            .bind(Json(settings))
            .bind(tenant_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::TenantNotFound);
        }
        Ok(())
    }

    async fn deactivate_tenant(&self, tenant_id: TenantId) -> StoreResult<()> {
        let result = sqlx::query("UPDATE tenants SET is_active = FALSE WHERE id = $1")
            .bind(tenant_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::TenantNotFound);
        }
        Ok(())
    }

    async fn get_users_by_tenant(&self, tenant_id: TenantId) -> StoreResult<Vec<User>> {
        let users: Vec<User> = sqlx::query_as(&format!(
            "SELECT {} FROM users WHERE tenant_id = $1 ORDER BY created_at",
            USER_COLUMNS
        ))
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn get_user_by_email(
        &self,
        tenant_id: TenantId,
        email: &str,
    ) -> StoreResult<Option<User>> {
        let user: Option<User> = sqlx::query_as(&format!(
            "SELECT {} FROM users WHERE tenant_id = $1 AND email = $2",
            USER_COLUMNS
        ))
        .bind(tenant_id)
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn create_user(&self, user: NewUser) -> StoreResult<UserId> {
        if !tenant_exists(&self.pool, user.tenant_id).await? {
            return Err(StoreError::TenantNotFound);
        }

        let id = UserId::new();
        let result = sqlx::query(
            r#"
            INSERT INTO users (id, tenant_id, name, email, role, is_active, created_at)
            VALUES ($1, $2, $3, $4, $5, TRUE, NOW())
            "#,
        )
        .bind(id)
        .bind(user.tenant_id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(user.role)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(id),
            Err(err) if unique_violation(&err).is_some() => {
                Err(StoreError::UserAlreadyExists { email: user.email })
            }
            // Tenant removed between the existence check and the insert
            Err(err) if foreign_key_violation(&err).is_some() => Err(StoreError::TenantNotFound),
            Err(err) => Err(err.into()),
        }
    }

    async fn update_user_role(&self, user_id: UserId, role: UserRole) -> StoreResult<()> {
        let result = sqlx::query("UPDATE users SET role = $1 WHERE id = $2")
            .bind(role)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::UserNotFound);
        }
        Ok(())
    }

    async fn list_posts(
        &self,
        tenant_id: TenantId,
        status: Option<PostStatus>,
    ) -> StoreResult<Vec<Post>> {
        let posts: Vec<Post> = sqlx::query_as(&format!(
            r#"
            SELECT {}
            FROM posts
            WHERE tenant_id = $1 AND ($2::VARCHAR IS NULL OR status = $2)
            ORDER BY created_at
            "#,
            POST_COLUMNS
        ))
        .bind(tenant_id)
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        Ok(posts)
    }

    async fn create_post(&self, post: NewPost) -> StoreResult<PostId> {
        if !tenant_exists(&self.pool, post.tenant_id).await? {
            return Err(StoreError::TenantNotFound);
        }

        let author: Option<(TenantId,)> =
            sqlx::query_as("SELECT tenant_id FROM users WHERE id = $1")
                .bind(post.author_id)
                .fetch_optional(&self.pool)
                .await?;
        match author {
            None => return Err(StoreError::UserNotFound),
            Some((tenant_id,)) if tenant_id != post.tenant_id => {
                return Err(StoreError::AuthorNotInTenant)
            }
            Some(_) => {}
        }

        let id = PostId::new();
        let result = sqlx::query(
            r#"
            INSERT INTO posts (id, tenant_id, author_id, title, content, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, NOW())
            "#,
        )
        .bind(id)
        .bind(post.tenant_id)
        .bind(post.author_id)
        .bind(&post.title)
        .bind(&post.content)
        .bind(post.status)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(id),
            // Tenant or author removed since the checks above
            Err(err) => match foreign_key_violation(&err) {
                Some(constraint) => Err(post_reference_error(&constraint)),
                None => Err(err.into()),
            },
        }
    }

    async fn is_empty(&self) -> StoreResult<bool> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tenants")
            .fetch_one(&self.pool)
            .await?;
        Ok(count == 0)
    }

    async fn clear(&self) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM posts").execute(&mut *tx).await?;
        sqlx::query("DELETE FROM users").execute(&mut *tx).await?;
        sqlx::query("DELETE FROM tenants").execute(&mut *tx).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
