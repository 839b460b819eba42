//! Development seed endpoints
//!
//! Active only when `ENABLE_DEV_SEED` is set; otherwise both
//! handlers answer 404 so production deployments do not expose them.

use axum::{extract::State, http::StatusCode, Json};
use tenantkit_shared::{clear_test_data, seed_test_data, SeedOutcome};

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
};

/// Insert the sample tenants unless any tenant already exists
pub async fn seed(State(state): State<AppState>) -> ApiResult<(StatusCode, Json<SeedOutcome>)> {
    ensure_enabled(&state)?;

    let outcome = seed_test_data(state.store.as_ref()).await?;
    let status = match outcome {
        SeedOutcome::Seeded { .. } => StatusCode::CREATED,
        SeedOutcome::AlreadySeeded => StatusCode::OK,
    };
    Ok((status, Json(outcome)))
}

/// Delete every tenant, user and post
pub async fn clear(State(state): State<AppState>) -> ApiResult<StatusCode> {
    ensure_enabled(&state)?;

    clear_test_data(state.store.as_ref()).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn ensure_enabled(state: &AppState) -> Result<(), ApiError> {
    if state.config.enable_dev_seed {
        Ok(())
    } else {
        Err(ApiError::FeatureDisabled("dev seed"))
    }
}
