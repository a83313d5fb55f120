use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use application::services::CreatePostRequest;
use application::{
    ConnectionRequestDto, MediaUpload, NotificationDto, PendingRequestDto, PostDto, RelationDto,
    UserSummaryDto,
};
use domain::{PostId, RequestId, UserId};

use crate::{auth::AuthenticatedUser, error::ApiError, state::AppState, ws};

#[derive(Debug, Deserialize)]
struct CommentPayload {
    content: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api", api_routes())
        .route("/ws", get(ws::websocket_upgrade))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/connection/send/{user_id}", post(send_request))
        .route("/connection/accept/{connection_id}", put(accept_request))
        .route("/connection/reject/{connection_id}", put(reject_request))
        .route("/connection/status/{user_id}", get(connection_status))
        .route("/connection/requests", get(pending_requests))
        .route("/connection/list", get(connection_list))
        .route("/connection/{user_id}", delete(remove_connection))
        .route("/post", post(create_post).get(get_posts))
        .route("/post/{post_id}/like", put(toggle_like))
        .route("/post/{post_id}/comment", put(add_comment))
        .route("/notification", get(get_notifications))
        .route("/notification/read", put(mark_notifications_read))
}

async fn health() -> StatusCode {
    StatusCode::OK
}

async fn send_request(
    State(state): State<AppState>,
    AuthenticatedUser(current): AuthenticatedUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ConnectionRequestDto>, ApiError> {
    let dto = state
        .connection_service
        .send(current, UserId::from(user_id))
        .await?;

    Ok(Json(dto))
}

async fn accept_request(
    State(state): State<AppState>,
    AuthenticatedUser(current): AuthenticatedUser,
    Path(connection_id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    state
        .connection_service
        .accept(RequestId::from(connection_id), current)
        .await?;

    Ok(Json(json!({ "message": "connection accepted" })))
}

async fn reject_request(
    State(state): State<AppState>,
    AuthenticatedUser(current): AuthenticatedUser,
    Path(connection_id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    state
        .connection_service
        .reject(RequestId::from(connection_id), current)
        .await?;

    Ok(Json(json!({ "message": "connection rejected" })))
}

async fn connection_status(
    State(state): State<AppState>,
    AuthenticatedUser(current): AuthenticatedUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<RelationDto>, ApiError> {
    let dto = state
        .connection_service
        .relation(current, UserId::from(user_id))
        .await?;

    Ok(Json(dto))
}

async fn remove_connection(
    State(state): State<AppState>,
    AuthenticatedUser(current): AuthenticatedUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    state
        .connection_service
        .remove(current, UserId::from(user_id))
        .await?;

    Ok(Json(json!({ "message": "connection removed" })))
}

async fn pending_requests(
    State(state): State<AppState>,
    AuthenticatedUser(current): AuthenticatedUser,
) -> Result<Json<Vec<PendingRequestDto>>, ApiError> {
    let requests = state.connection_service.pending_incoming(current).await?;
    Ok(Json(requests))
}

async fn connection_list(
    State(state): State<AppState>,
    AuthenticatedUser(current): AuthenticatedUser,
) -> Result<Json<Vec<UserSummaryDto>>, ApiError> {
    let connections = state.connection_service.connections(current).await?;
    Ok(Json(connections))
}

/// multipart 表单：`description` 文本字段，`image` 可选文件字段
async fn create_post(
    State(state): State<AppState>,
    AuthenticatedUser(current): AuthenticatedUser,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<PostDto>), ApiError> {
    let mut description: Option<String> = None;
    let mut image: Option<MediaUpload> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| ApiError::bad_request(format!("invalid multipart body: {}", err)))?
    {
        match field.name() {
            Some("description") => {
                let text = field
                    .text()
                    .await
                    .map_err(|err| ApiError::bad_request(err.to_string()))?;
                description = Some(text);
            }
            Some("image") => {
                let filename = field.file_name().unwrap_or("upload").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|err| ApiError::bad_request(err.to_string()))?;
                image = Some(MediaUpload {
                    filename,
                    bytes: bytes.to_vec(),
                });
            }
            _ => {}
        }
    }

    let description =
        description.ok_or_else(|| ApiError::bad_request("description field is required"))?;

    let dto = state
        .post_service
        .create(CreatePostRequest {
            author: current,
            description,
            image,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(dto)))
}

async fn get_posts(State(state): State<AppState>) -> Result<Json<Vec<PostDto>>, ApiError> {
    let posts = state.post_service.feed().await?;
    Ok(Json(posts))
}

async fn toggle_like(
    State(state): State<AppState>,
    AuthenticatedUser(current): AuthenticatedUser,
    Path(post_id): Path<Uuid>,
) -> Result<Json<PostDto>, ApiError> {
    let dto = state
        .post_service
        .toggle_like(PostId::from(post_id), current)
        .await?;

    Ok(Json(dto))
}

async fn add_comment(
    State(state): State<AppState>,
    AuthenticatedUser(current): AuthenticatedUser,
    Path(post_id): Path<Uuid>,
    Json(payload): Json<CommentPayload>,
) -> Result<Json<PostDto>, ApiError> {
    let dto = state
        .post_service
        .add_comment(PostId::from(post_id), current, payload.content)
        .await?;

    Ok(Json(dto))
}

async fn get_notifications(
    State(state): State<AppState>,
    AuthenticatedUser(current): AuthenticatedUser,
) -> Result<Json<Vec<NotificationDto>>, ApiError> {
    let notifications = state.notification_service.feed(current).await?;
    Ok(Json(notifications))
}

async fn mark_notifications_read(
    State(state): State<AppState>,
    AuthenticatedUser(current): AuthenticatedUser,
) -> Result<Json<Value>, ApiError> {
    let updated = state.notification_service.mark_all_read(current).await?;
    Ok(Json(json!({ "updated": updated })))
}
