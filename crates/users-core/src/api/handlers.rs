//! Route handlers for account endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use postgate_auth_core::RequireCaller;
use serde_json::{json, Value};

use super::ApiState;
use crate::types::{
    LoginRequest, RegisterRequest, SetRoleRequest, SetStatusRequest, UpdateUserRequest, UserFilter,
};
use crate::Result;

pub async fn register(
    State(state): State<ApiState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<Value>)> {
    let result = state.auth_service.register(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "User registered successfully",
            "data": result,
        })),
    ))
}

pub async fn login(
    State(state): State<ApiState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<Value>> {
    let result = state.auth_service.login(request).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Login successful",
        "data": result,
    })))
}

pub async fn me(
    State(state): State<ApiState>,
    RequireCaller(caller): RequireCaller,
) -> Result<Json<Value>> {
    let user = state.auth_service.current_user(&caller).await?;
    Ok(Json(json!({ "success": true, "data": user })))
}

pub async fn list_users(
    State(state): State<ApiState>,
    RequireCaller(caller): RequireCaller,
    Query(filter): Query<UserFilter>,
) -> Result<Json<Value>> {
    let users = state.auth_service.list_users(&caller, filter).await?;
    Ok(Json(json!({ "success": true, "count": users.len(), "data": users })))
}

pub async fn update_user(
    State(state): State<ApiState>,
    RequireCaller(caller): RequireCaller,
    Path(id): Path<String>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<Value>> {
    let user = state.auth_service.update_profile(&caller, &id, request).await?;
    Ok(Json(json!({ "success": true, "data": user })))
}

pub async fn set_role(
    State(state): State<ApiState>,
    RequireCaller(caller): RequireCaller,
    Path(id): Path<String>,
    Json(request): Json<SetRoleRequest>,
) -> Result<Json<Value>> {
    let user = state.auth_service.set_role(&caller, &id, request.role).await?;
    Ok(Json(json!({ "success": true, "data": user })))
}

pub async fn set_status(
    State(state): State<ApiState>,
    RequireCaller(caller): RequireCaller,
    Path(id): Path<String>,
    Json(request): Json<SetStatusRequest>,
) -> Result<Json<Value>> {
    let user = state.auth_service.set_active(&caller, &id, request.active).await?;
    Ok(Json(json!({ "success": true, "data": user })))
}
