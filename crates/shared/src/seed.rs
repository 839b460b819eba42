//! Development seed data
//!
//! Creates sample tenants and users for exercising subdomain routing locally:
//! - http://acme.localhost:3000
//! - http://techstartup.localhost:3000
//! - http://demo.localhost:3000

use serde::Serialize;

use crate::error::StoreResult;
use crate::store::TenantStore;
use crate::types::{NewPost, NewTenant, NewUser, PostStatus, TenantSettings, UserRole};

/// Result of a seed attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedOutcome {
    Seeded { tenants: usize, users: usize, posts: usize },
    /// At least one tenant already existed; nothing was written
    AlreadySeeded,
}

struct SeedTenant {
    name: &'static str,
    subdomain: &'static str,
    slug: &'static str,
    primary_color: &'static str,
    user_name: &'static str,
    user_email: &'static str,
    user_role: UserRole,
    post: Option<(&'static str, &'static str)>,
}

const SEED_TENANTS: &[SeedTenant] = &[
    SeedTenant {
        name: "Acme Corporation",
        subdomain: "acme",
        slug: "acme-corp",
        primary_color: "#3b82f6",
        user_name: "John Doe",
        user_email: "john@acme.com",
        user_role: UserRole::Admin,
        post: Some(("Welcome to Acme", "This is our first post!")),
    },
    SeedTenant {
        name: "Tech Startup Inc",
        subdomain: "techstartup",
        slug: "tech-startup",
        primary_color: "#8b5cf6",
        user_name: "Jane Smith",
        user_email: "jane@techstartup.com",
        user_role: UserRole::Admin,
        post: Some((
            "Tech Startup Launches",
            "We're excited to announce our launch!",
        )),
    },
    SeedTenant {
        name: "Demo Company",
        subdomain: "demo",
        slug: "demo-company",
        primary_color: "#10b981",
        user_name: "Demo User",
        user_email: "user@demo.com",
        user_role: UserRole::Member,
        post: None,
    },
];

/// Seed sample tenants, one user per tenant and a few published posts.
///
/// Does nothing if any tenant already exists.
pub async fn seed_test_data(store: &dyn TenantStore) -> StoreResult<SeedOutcome> {
    if !store.is_empty().await? {
        tracing::info!("Test data already exists, skipping seed");
        return Ok(SeedOutcome::AlreadySeeded);
    }

    let mut posts = 0;
    for seed in SEED_TENANTS {
        let tenant_id = store
            .create_tenant(NewTenant {
                name: seed.name.to_string(),
                subdomain: seed.subdomain.to_string(),
                slug: seed.slug.to_string(),
                settings: Some(TenantSettings {
                    primary_color: Some(seed.primary_color.to_string()),
                    logo: Some(String::new()),
                    custom_domain: None,
                }),
            })
            .await?;

        let author_id = store
            .create_user(NewUser {
                tenant_id,
                name: seed.user_name.to_string(),
                email: seed.user_email.to_string(),
                role: seed.user_role,
            })
            .await?;

        if let Some((title, content)) = seed.post {
            store
                .create_post(NewPost {
                    tenant_id,
                    author_id,
                    title: title.to_string(),
                    content: content.to_string(),
                    status: PostStatus::Published,
                })
                .await?;
            posts += 1;
        }
    }

    tracing::info!(
        tenants = SEED_TENANTS.len(),
        posts,
        "Test data seeded successfully"
    );

    Ok(SeedOutcome::Seeded {
        tenants: SEED_TENANTS.len(),
        users: SEED_TENANTS.len(),
        posts,
    })
}

/// Remove all posts, users and tenants. Use with caution.
pub async fn clear_test_data(store: &dyn TenantStore) -> StoreResult<()> {
    store.clear().await?;
    tracing::warn!("All test data cleared");
    Ok(())
}
