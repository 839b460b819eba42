//! Tenant post routes

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tenantkit_shared::{NewPost, Post, PostId, PostStatus, TenantId, UserId};

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct ListPostsQuery {
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    pub author_id: UserId,
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PostListResponse {
    pub posts: Vec<Post>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostResponse {
    pub post_id: PostId,
}

/// List a tenant's posts, optionally filtered by `?status=`
pub async fn list_posts(
    State(state): State<AppState>,
    Path(tenant_id): Path<TenantId>,
    Query(query): Query<ListPostsQuery>,
) -> ApiResult<Json<PostListResponse>> {
    let status = query.status.as_deref().map(parse_status).transpose()?;
    let posts = state.store.list_posts(tenant_id, status).await?;
    let total = posts.len();
    Ok(Json(PostListResponse { posts, total }))
}

/// Create a post. The author must belong to the tenant.
pub async fn create_post(
    State(state): State<AppState>,
    Path(tenant_id): Path<TenantId>,
    Json(req): Json<CreatePostRequest>,
) -> ApiResult<(StatusCode, Json<CreatePostResponse>)> {
    let title = req.title.trim().to_string();
    if title.is_empty() {
        return Err(ApiError::Validation("Title is required".to_string()));
    }

    let status = match req.status.as_deref() {
        Some(status) => parse_status(status)?,
        None => PostStatus::default(),
    };

    let post_id = state
        .store
        .create_post(NewPost {
            tenant_id,
            author_id: req.author_id,
            title,
            content: req.content,
            status,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(CreatePostResponse { post_id })))
}

fn parse_status(status: &str) -> Result<PostStatus, ApiError> {
    status.parse().map_err(|_| {
        ApiError::Validation(
            "Invalid status. Must be one of: draft, published, archived".to_string(),
        )
    })
}
