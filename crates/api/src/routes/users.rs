//! Tenant user routes

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tenantkit_shared::{NewUser, TenantId, User, UserId, UserRole};

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
};

// =============================================================================
// Request/Response Types
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: String,
}

#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub users: Vec<User>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserResponse {
    pub user_id: UserId,
}

// =============================================================================
// Handlers
// =============================================================================

/// List all users in a tenant
pub async fn list_users(
    State(state): State<AppState>,
    Path(tenant_id): Path<TenantId>,
) -> ApiResult<Json<UserListResponse>> {
    let users = state.store.get_users_by_tenant(tenant_id).await?;
    let total = users.len();
    Ok(Json(UserListResponse { users, total }))
}

/// Look up a tenant user by email
pub async fn get_by_email(
    State(state): State<AppState>,
    Path(tenant_id): Path<TenantId>,
    Query(query): Query<EmailQuery>,
) -> ApiResult<Json<User>> {
    state
        .store
        .get_user_by_email(tenant_id, &query.email)
        .await?
        .map(Json)
        .ok_or(ApiError::UserNotFound)
}

/// Add a user to a tenant. Role defaults to member.
pub async fn create_user(
    State(state): State<AppState>,
    Path(tenant_id): Path<TenantId>,
    Json(req): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<CreateUserResponse>)> {
    let name = req.name.trim().to_string();
    if name.is_empty() {
        return Err(ApiError::Validation("Name is required".to_string()));
    }

    let email = req.email.trim().to_string();
    if !email.contains('@') {
        return Err(ApiError::Validation("Invalid email address".to_string()));
    }

    let role = match req.role.as_deref() {
        Some(role) => parse_role(role)?,
        None => UserRole::default(),
    };

    let user_id = state
        .store
        .create_user(NewUser {
            tenant_id,
            name,
            email,
            role,
        })
        .await?;

    tracing::info!(tenant_id = %tenant_id, user_id = %user_id, role = %role, "User created");

    Ok((StatusCode::CREATED, Json(CreateUserResponse { user_id })))
}

/// Change a user's role
pub async fn update_role(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    Json(req): Json<UpdateRoleRequest>,
) -> ApiResult<StatusCode> {
    let role = parse_role(&req.role)?;
    state.store.update_user_role(user_id, role).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn parse_role(role: &str) -> Result<UserRole, ApiError> {
    role.parse().map_err(|_| {
        ApiError::Validation("Invalid role. Must be one of: admin, member, viewer".to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_role() {
        assert_eq!(parse_role("admin").unwrap(), UserRole::Admin);
        assert_eq!(parse_role("viewer").unwrap(), UserRole::Viewer);
        assert!(parse_role("owner").is_err());
        assert!(parse_role("Admin").is_err());
    }
}
