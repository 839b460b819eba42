//! Site pages
//!
//! Pages are mounted on their rewritten paths: `/app/...` for the app
//! dashboard and `/tenant/...` for tenant sites. Each returns a JSON page
//! descriptor the frontend renders.

use axum::{extract::State, http::HeaderMap, Json};
use serde::Serialize;
use tenantkit_shared::{Post, PostStatus, Tenant};

use crate::{
    error::{ApiError, ApiResult},
    routing::{SiteClass, TENANT_SUBDOMAIN_HEADER},
    state::AppState,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse {
    pub page: &'static str,
    #[serde(flatten)]
    pub site: SiteClass,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant: Option<Tenant>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenants: Option<Vec<Tenant>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub posts: Option<Vec<Post>>,
}

impl PageResponse {
    fn new(page: &'static str, site: SiteClass, title: impl Into<String>) -> Self {
        Self {
            page,
            site,
            title: title.into(),
            tenant: None,
            tenants: None,
            posts: None,
        }
    }
}

// =============================================================================
// Main site
// =============================================================================

pub async fn home() -> Json<PageResponse> {
    Json(PageResponse::new("home", SiteClass::MainSite, "Multi-Tenant Platform"))
}

pub async fn about() -> Json<PageResponse> {
    Json(PageResponse::new("about", SiteClass::MainSite, "About"))
}

pub async fn dashboard() -> Json<PageResponse> {
    Json(PageResponse::new("dashboard", SiteClass::MainSite, "Dashboard"))
}

// =============================================================================
// App site
// =============================================================================

/// App dashboard with the active tenant directory
pub async fn app_home(State(state): State<AppState>) -> ApiResult<Json<PageResponse>> {
    let tenants = state.store.list_active_tenants().await?;
    let mut page = PageResponse::new("app_home", SiteClass::AppSite, "App Dashboard");
    page.tenants = Some(tenants);
    Ok(Json(page))
}

pub async fn app_settings(State(state): State<AppState>) -> ApiResult<Json<PageResponse>> {
    let tenants = state.store.list_active_tenants().await?;
    let mut page = PageResponse::new("app_settings", SiteClass::AppSite, "Settings");
    page.tenants = Some(tenants);
    Ok(Json(page))
}

// =============================================================================
// Tenant site
// =============================================================================

pub async fn tenant_home(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<PageResponse>> {
    let tenant = current_tenant(&state, &headers).await?;
    let title = format!("Welcome to {}'s Site", tenant.name);
    Ok(Json(tenant_page("tenant_home", tenant, title)))
}

pub async fn tenant_about(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<PageResponse>> {
    let tenant = current_tenant(&state, &headers).await?;
    let title = format!("About {}", tenant.name);
    Ok(Json(tenant_page("tenant_about", tenant, title)))
}

/// Tenant demo page showing the tenant's published posts
pub async fn tenant_demo(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<PageResponse>> {
    let tenant = current_tenant(&state, &headers).await?;
    let posts = state
        .store
        .list_posts(tenant.id, Some(PostStatus::Published))
        .await?;

    let title = format!("{} Demo", tenant.name);
    let mut page = tenant_page("tenant_demo", tenant, title);
    page.posts = Some(posts);
    Ok(Json(page))
}

fn tenant_page(page: &'static str, tenant: Tenant, title: String) -> PageResponse {
    let mut response = PageResponse::new(page, SiteClass::TenantSite(tenant.subdomain.clone()), title);
    response.tenant = Some(tenant);
    response
}

/// Resolve the tenant the subdomain router forwarded. Inactive tenants are
/// treated as missing.
async fn current_tenant(state: &AppState, headers: &HeaderMap) -> ApiResult<Tenant> {
    let subdomain = headers
        .get(TENANT_SUBDOMAIN_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Missing tenant subdomain".to_string()))?;

    match state.store.get_tenant_by_subdomain(subdomain).await? {
        Some(tenant) if tenant.is_active => Ok(tenant),
        _ => {
            tracing::debug!(subdomain = %subdomain, "Tenant site requested for unknown tenant");
            Err(ApiError::TenantNotFound(subdomain.to_string()))
        }
    }
}
