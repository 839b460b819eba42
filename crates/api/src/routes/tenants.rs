//! Tenant management routes

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tenantkit_shared::{NewTenant, Tenant, TenantId, TenantSettings};

use crate::{
    error::{ApiError, ApiResult},
    routing::RESERVED_SUBDOMAINS,
    state::AppState,
};

// =============================================================================
// Request/Response Types
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTenantRequest {
    pub name: String,
    pub subdomain: String,
    pub slug: String,
    #[serde(default)]
    pub settings: Option<TenantSettings>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTenantResponse {
    pub tenant_id: TenantId,
}

#[derive(Debug, Serialize)]
pub struct TenantListResponse {
    pub tenants: Vec<Tenant>,
    pub total: usize,
}

// =============================================================================
// Handlers
// =============================================================================

/// List all active tenants
pub async fn list_active(State(state): State<AppState>) -> ApiResult<Json<TenantListResponse>> {
    let tenants = state.store.list_active_tenants().await?;
    let total = tenants.len();
    Ok(Json(TenantListResponse { tenants, total }))
}

/// Get tenant by subdomain
pub async fn get_by_subdomain(
    State(state): State<AppState>,
    Path(subdomain): Path<String>,
) -> ApiResult<Json<Tenant>> {
    state
        .store
        .get_tenant_by_subdomain(&subdomain)
        .await?
        .map(Json)
        .ok_or(ApiError::TenantNotFound(subdomain))
}

/// Create a new tenant
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateTenantRequest>,
) -> ApiResult<(StatusCode, Json<CreateTenantResponse>)> {
    let name = req.name.trim().to_string();
    validate_name(&name)?;
    validate_slug(&req.slug)?;
    validate_subdomain(&req.subdomain)?;

    let tenant_id = state
        .store
        .create_tenant(NewTenant {
            name,
            subdomain: req.subdomain.clone(),
            slug: req.slug,
            settings: req.settings,
        })
        .await?;

    tracing::info!(tenant_id = %tenant_id, subdomain = %req.subdomain, "Tenant created");

    Ok((StatusCode::CREATED, Json(CreateTenantResponse { tenant_id })))
}

/// Replace tenant branding and domain settings
pub async fn update_settings(
    State(state): State<AppState>,
    Path(tenant_id): Path<TenantId>,
    Json(settings): Json<TenantSettings>,
) -> ApiResult<StatusCode> {
    state
        .store
        .update_tenant_settings(tenant_id, settings)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Deactivate a tenant. Data is kept; the tenant site stops resolving.
pub async fn deactivate(
    State(state): State<AppState>,
    Path(tenant_id): Path<TenantId>,
) -> ApiResult<StatusCode> {
    state.store.deactivate_tenant(tenant_id).await?;
    tracing::info!(tenant_id = %tenant_id, "Tenant deactivated");
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Validation
// =============================================================================

fn validate_name(name: &str) -> Result<(), ApiError> {
    if name.is_empty() || name.chars().count() > 100 {
        return Err(ApiError::Validation(
            "Tenant name must be between 1 and 100 characters".to_string(),
        ));
    }
    Ok(())
}

fn validate_slug(slug: &str) -> Result<(), ApiError> {
    if slug.is_empty() || slug.len() > 50 {
        return Err(ApiError::Validation(
            "Tenant slug must be between 1 and 50 characters".to_string(),
        ));
    }

    // Format: lowercase, alphanumeric, hyphens
    if !slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(ApiError::Validation(
            "Slug must contain only lowercase letters, numbers, and hyphens".to_string(),
        ));
    }
    Ok(())
}

/// A subdomain must be a single DNS label the router will classify as a tenant
pub(crate) fn validate_subdomain(subdomain: &str) -> Result<(), ApiError> {
    if subdomain.is_empty() || subdomain.len() > 63 {
        return Err(ApiError::Validation(
            "Subdomain must be between 1 and 63 characters".to_string(),
        ));
    }

    if !subdomain
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(ApiError::Validation(
            "Subdomain can only contain lowercase letters, numbers, and hyphens".to_string(),
        ));
    }

    if subdomain.starts_with('-') || subdomain.ends_with('-') {
        return Err(ApiError::Validation(
            "Subdomain cannot start or end with a hyphen".to_string(),
        ));
    }

    if RESERVED_SUBDOMAINS.contains(&subdomain) || subdomain == "localhost" {
        return Err(ApiError::Validation(format!(
            "Subdomain '{}' is reserved",
            subdomain
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_subdomain() {
        // Valid
        assert!(validate_subdomain("acme").is_ok());
        assert!(validate_subdomain("tenant1").is_ok());
        assert!(validate_subdomain("tech-startup").is_ok());
        assert!(validate_subdomain("a").is_ok());

        // Invalid
        assert!(validate_subdomain("").is_err());
        assert!(validate_subdomain("Acme").is_err());
        assert!(validate_subdomain("acme.io").is_err());
        assert!(validate_subdomain("-acme").is_err());
        assert!(validate_subdomain("acme-").is_err());
        assert!(validate_subdomain(&"a".repeat(64)).is_err());

        // Reserved router labels
        assert!(validate_subdomain("app").is_err());
        assert!(validate_subdomain("www").is_err());
        assert!(validate_subdomain("localhost").is_err());
    }

    #[test]
    fn test_validate_slug() {
        assert!(validate_slug("acme-corp").is_ok());
        assert!(validate_slug("").is_err());
        assert!(validate_slug("Acme Corp").is_err());
        assert!(validate_slug(&"a".repeat(51)).is_err());
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Acme Corporation").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name(&"n".repeat(101)).is_err());

        // Limit is in characters, matching VARCHAR(100)
        assert!(validate_name(&"é".repeat(60)).is_ok());
        assert!(validate_name(&"é".repeat(100)).is_ok());
        assert!(validate_name(&"é".repeat(101)).is_err());
    }
}
