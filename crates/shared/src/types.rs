//! Common types used across Tenantkit

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

// =============================================================================
// ID Wrappers
// =============================================================================

/// Tenant ID wrapper
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type,
)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct TenantId(pub Uuid);

impl TenantId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TenantId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TenantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// User ID wrapper
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type,
)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct UserId(pub Uuid);

impl UserId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Post ID wrapper
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type,
)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct PostId(pub Uuid);

impl PostId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PostId {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Enums
// =============================================================================

/// User role within a tenant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    #[default]
    Member,
    Viewer,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::Member => write!(f, "member"),
            Self::Viewer => write!(f, "viewer"),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "member" => Ok(Self::Member),
            "viewer" => Ok(Self::Viewer),
            _ => Err(format!("Invalid user role: {}", s)),
        }
    }
}

/// Publication status of a post
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

impl std::fmt::Display for PostStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Draft => write!(f, "draft"),
            Self::Published => write!(f, "published"),
            Self::Archived => write!(f, "archived"),
        }
    }
}

impl std::str::FromStr for PostStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "published" => Ok(Self::Published),
            "archived" => Ok(Self::Archived),
            _ => Err(format!("Invalid post status: {}", s)),
        }
    }
}

// =============================================================================
// Models
// =============================================================================

/// Per-tenant branding and domain settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_domain: Option<String>,
}

/// Tenant (customer organization) model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    pub id: TenantId,
    pub name: String,
    /// Unique subdomain label, e.g. "acme" for acme.example.com
    pub subdomain: String,
    /// Unique URL-friendly name
    pub slug: String,
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<TenantSettings>,
    pub created_at: OffsetDateTime,
}

/// User model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub tenant_id: TenantId,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub is_active: bool,
    pub created_at: OffsetDateTime,
}

/// Tenant-scoped content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: PostId,
    pub tenant_id: TenantId,
    pub author_id: UserId,
    pub title: String,
    pub content: String,
    pub status: PostStatus,
    pub created_at: OffsetDateTime,
}

// =============================================================================
// Inputs
// =============================================================================

/// Fields required to create a tenant. New tenants are always active.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTenant {
    pub name: String,
    pub subdomain: String,
    pub slug: String,
    #[serde(default)]
    pub settings: Option<TenantSettings>,
}

/// Fields required to create a user inside an existing tenant
#[derive(Debug, Clone)]
pub struct NewUser {
    pub tenant_id: TenantId,
    pub name: String,
    pub email: String,
    pub role: UserRole,
}

#[derive(Debug, Clone)]
pub struct NewPost {
    pub tenant_id: TenantId,
    pub author_id: UserId,
    pub title: String,
    pub content: String,
    pub status: PostStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_role_round_trips_through_str() {
        for role in [UserRole::Admin, UserRole::Member, UserRole::Viewer] {
            assert_eq!(role.to_string().parse::<UserRole>(), Ok(role));
        }
        assert!("owner".parse::<UserRole>().is_err());
        // Stored values are lowercase only
        assert!("Admin".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_post_status_parse() {
        assert_eq!("published".parse::<PostStatus>(), Ok(PostStatus::Published));
        assert!("deleted".parse::<PostStatus>().is_err());
        assert_eq!(PostStatus::default(), PostStatus::Draft);
    }

    #[test]
    fn test_tenant_settings_serialize_camel_case() {
        let settings = TenantSettings {
            primary_color: Some("#3b82f6".to_string()),
            logo: None,
            custom_domain: Some("acme.io".to_string()),
        };
        let json = serde_json::to_value(&settings).unwrap();
        assert_eq!(json["primaryColor"], "#3b82f6");
        assert_eq!(json["customDomain"], "acme.io");
        assert!(json.get("logo").is_none());
    }
}
