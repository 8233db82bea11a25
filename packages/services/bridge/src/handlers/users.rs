//! 사용자 리소스
//!
//! 처리 순서: role 검사 → 리소스 조회 → 객체 검사

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::{Extension, Json};
use gk_core::auth::{Identity, User};
use gk_core::permissions::PermissionId;

use crate::error::{BridgeError, Result};
use crate::state::AppState;

/// `GET /users/{id}`
pub async fn user_detail(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> Result<Json<User>> {
    let permissions = state.access.permissions();
    permissions.has_permission(&identity, PermissionId::UserDetail)?;

    let user = state.users.get(&id).ok_or_else(|| BridgeError::NotFound {
        message: format!("user {}", id),
    })?;

    permissions.has_object_permission(&identity, PermissionId::UserDetail, &user)?;

    Ok(Json(user))
}
