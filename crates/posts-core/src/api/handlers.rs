//! Route handlers for post endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use postgate_auth_core::{MaybeCaller, RequireCaller};
use serde_json::{json, Value};

use super::PostsState;
use crate::types::{CommentRequest, CreatePostRequest, PostFilter, UpdatePostRequest};
use crate::Result;

pub async fn list_posts(
    State(state): State<PostsState>,
    MaybeCaller(caller): MaybeCaller,
    Query(filter): Query<PostFilter>,
) -> Result<Json<Value>> {
    let page = state.service.list(caller.as_ref(), filter).await?;
    Ok(Json(json!({
        "success": true,
        "count": page.posts.len(),
        "total": page.total,
        "page": page.page,
        "pages": page.pages,
        "data": page.posts,
    })))
}

pub async fn get_post(
    State(state): State<PostsState>,
    MaybeCaller(caller): MaybeCaller,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    let post = state.service.get(caller.as_ref(), &id).await?;
    Ok(Json(json!({ "success": true, "data": post })))
}

pub async fn create_post(
    State(state): State<PostsState>,
    RequireCaller(caller): RequireCaller,
    Json(request): Json<CreatePostRequest>,
) -> Result<(StatusCode, Json<Value>)> {
    let post = state.service.create(&caller, request).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Post created successfully",
            "data": post,
        })),
    ))
}

pub async fn update_post(
    State(state): State<PostsState>,
    RequireCaller(caller): RequireCaller,
    Path(id): Path<String>,
    Json(request): Json<UpdatePostRequest>,
) -> Result<Json<Value>> {
    let post = state.service.update(&caller, &id, request).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Post updated successfully",
        "data": post,
    })))
}

pub async fn delete_post(
    State(state): State<PostsState>,
    RequireCaller(caller): RequireCaller,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    state.service.delete(&caller, &id).await?;
    Ok(Json(json!({ "success": true, "message": "Post deleted successfully" })))
}

pub async fn toggle_like(
    State(state): State<PostsState>,
    RequireCaller(caller): RequireCaller,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    let like = state.service.toggle_like(&caller, &id).await?;
    Ok(Json(json!({ "success": true, "data": like })))
}

pub async fn add_comment(
    State(state): State<PostsState>,
    RequireCaller(caller): RequireCaller,
    Path(id): Path<String>,
    Json(request): Json<CommentRequest>,
) -> Result<(StatusCode, Json<Value>)> {
    let comment = state.service.add_comment(&caller, &id, request).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Comment added successfully",
            "data": comment,
        })),
    ))
}

pub async fn delete_comment(
    State(state): State<PostsState>,
    RequireCaller(caller): RequireCaller,
    Path((id, comment_id)): Path<(String, String)>,
) -> Result<Json<Value>> {
    state.service.delete_comment(&caller, &id, &comment_id).await?;
    Ok(Json(json!({ "success": true, "message": "Comment deleted successfully" })))
}
