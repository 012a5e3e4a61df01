use crate::AppState;
use crate::api::error::AppError;
use crate::api::extract::{ApiJson, ApiQuery};
use crate::api::handlers::users::required;
use crate::api::middleware::auth::AuthUser;
use crate::api::response::{ApiResponse, Empty, MAX_LIMIT, PageQuery, Pagination};
use crate::services::media_host::UploadSignature;
use crate::services::video_service::{
    CommentResponse, LikeToggle, NewVideo, ShareCount, VideoPatch, VideoResponse,
};
use crate::utils::validation::{decode_media_payload, normalize_hashtags, sanitize_file_name};
use axum::{
    Extension,
    extract::{Path, State},
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

pub const DEFAULT_TRENDING_LIMIT: u64 = 10;

#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateVideoRequest {
    #[validate(length(max = 100, message = "Title cannot be more than 100 characters"))]
    pub title: Option<String>,
    #[validate(length(max = 500, message = "Description cannot be more than 500 characters"))]
    pub description: Option<String>,
    pub category: Option<String>,
    /// Base64 payload, data URL or remote http(s) URL
    pub file: Option<String>,
    pub file_name: Option<String>,
    pub hashtags: Option<Vec<String>>,
    pub is_private: Option<bool>,
    /// Seconds
    pub duration: Option<f64>,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVideoRequest {
    #[validate(length(max = 100, message = "Title cannot be more than 100 characters"))]
    pub title: Option<String>,
    #[validate(length(max = 500, message = "Description cannot be more than 500 characters"))]
    pub description: Option<String>,
    pub category: Option<String>,
    pub hashtags: Option<Vec<String>>,
    pub is_private: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CommentRequest {
    pub text: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TrendingQuery {
    /// Number of videos (default 10, max 100)
    pub limit: Option<u64>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SignatureQuery {
    pub token: Option<String>,
    /// Unix timestamp; defaults to one hour from now
    pub expire: Option<i64>,
}

/// Trimmed value of a field that may be omitted but never blanked.
fn non_blank(value: &Option<String>, field: &str) -> Result<Option<String>, AppError> {
    match value {
        None => Ok(None),
        Some(_) => required(value)
            .map(Some)
            .ok_or_else(|| AppError::BadRequest(format!("{} cannot be empty", field))),
    }
}

fn paginated(
    videos: Vec<VideoResponse>,
    total: u64,
    query: &PageQuery,
) -> ApiResponse<Vec<VideoResponse>> {
    let pagination = Pagination::compute(query.page(), query.limit(), total);
    ApiResponse::list(videos).with_pagination(pagination)
}

#[utoipa::path(
    get,
    path = "/api/videos",
    params(PageQuery),
    responses((status = 200, description = "Newest public videos", body = [VideoResponse])),
    tag = "videos"
)]
pub async fn list_videos(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> Result<ApiResponse<Vec<VideoResponse>>, AppError> {
    let (videos, total) = state.videos.list_public(&query, None).await?;
    Ok(paginated(videos, total, &query))
}

#[utoipa::path(
    get,
    path = "/api/videos/trending",
    params(TrendingQuery),
    responses((status = 200, description = "Most viewed public videos of the last 7 days", body = [VideoResponse])),
    tag = "videos"
)]
pub async fn trending_videos(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<TrendingQuery>,
) -> Result<ApiResponse<Vec<VideoResponse>>, AppError> {
    let limit = query
        .limit
        .filter(|l| *l >= 1)
        .unwrap_or(DEFAULT_TRENDING_LIMIT)
        .min(MAX_LIMIT);
    let videos = state.videos.trending(limit).await?;
    Ok(ApiResponse::list(videos))
}

#[utoipa::path(
    get,
    path = "/api/videos/category/{category_id}",
    params(("category_id" = String, Path, description = "Category key"), PageQuery),
    responses((status = 200, description = "Public videos in the category", body = [VideoResponse])),
    tag = "videos"
)]
pub async fn videos_by_category(
    State(state): State<AppState>,
    Path(category_id): Path<String>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> Result<ApiResponse<Vec<VideoResponse>>, AppError> {
    let (videos, total) = state
        .videos
        .list_public(&query, Some(&category_id))
        .await?;
    Ok(paginated(videos, total, &query))
}

#[utoipa::path(
    get,
    path = "/api/videos/{id}",
    params(("id" = String, Path, description = "Video id")),
    responses(
        (status = 200, description = "The video; counts one view", body = VideoResponse),
        (status = 404, description = "Video not found")
    ),
    tag = "videos"
)]
pub async fn get_video(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<VideoResponse>, AppError> {
    state.videos.record_view(&id).await?;
    let video = state.videos.get(&id).await?;
    Ok(ApiResponse::ok(video))
}

#[utoipa::path(
    put,
    path = "/api/videos/{id}/share",
    params(("id" = String, Path, description = "Video id")),
    responses(
        (status = 200, description = "Share counted", body = ShareCount),
        (status = 404, description = "Video not found")
    ),
    tag = "videos"
)]
pub async fn share_video(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<ShareCount>, AppError> {
    let shares = state.videos.record_share(&id).await?;
    Ok(ApiResponse::ok(shares))
}

#[utoipa::path(
    post,
    path = "/api/videos",
    request_body = CreateVideoRequest,
    responses(
        (status = 201, description = "Video published", body = VideoResponse),
        (status = 400, description = "Missing title, category or file"),
        (status = 401, description = "Unauthorized")
    ),
    security(("jwt" = [])),
    tag = "videos"
)]
pub async fn create_video(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    ApiJson(payload): ApiJson<CreateVideoRequest>,
) -> Result<ApiResponse<VideoResponse>, AppError> {
    let (Some(title), Some(category), Some(file)) = (
        required(&payload.title),
        required(&payload.category),
        required(&payload.file),
    ) else {
        return Err(AppError::BadRequest(
            "Please provide a title, category and video file".to_string(),
        ));
    };
    payload.validate()?;

    let source = decode_media_payload(&file).map_err(|e| AppError::BadRequest(e.message))?;
    let original_name = required(&payload.file_name).unwrap_or_else(|| "video.mp4".to_string());

    let input = NewVideo {
        title,
        description: required(&payload.description),
        category,
        hashtags: normalize_hashtags(payload.hashtags.unwrap_or_default()),
        is_private: payload.is_private.unwrap_or(false),
        duration: payload.duration,
        source,
        file_name: format!("{}-{}", Uuid::new_v4(), sanitize_file_name(&original_name)),
    };

    let video = state.videos.publish(&user, input).await?;
    Ok(ApiResponse::created(video))
}

#[utoipa::path(
    put,
    path = "/api/videos/{id}",
    params(("id" = String, Path, description = "Video id")),
    request_body = UpdateVideoRequest,
    responses(
        (status = 200, description = "Video updated", body = VideoResponse),
        (status = 401, description = "Not the owner"),
        (status = 404, description = "Video not found")
    ),
    security(("jwt" = [])),
    tag = "videos"
)]
pub async fn update_video(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<UpdateVideoRequest>,
) -> Result<ApiResponse<VideoResponse>, AppError> {
    payload.validate()?;

    let patch = VideoPatch {
        title: non_blank(&payload.title, "Title")?,
        description: payload.description,
        category: non_blank(&payload.category, "Category")?,
        hashtags: payload.hashtags.map(normalize_hashtags),
        is_private: payload.is_private,
    };

    let video = state.videos.update(&id, &user.id, patch).await?;
    Ok(ApiResponse::ok(video))
}

#[utoipa::path(
    delete,
    path = "/api/videos/{id}",
    params(("id" = String, Path, description = "Video id")),
    responses(
        (status = 200, description = "Video deleted", body = Empty),
        (status = 401, description = "Not the owner"),
        (status = 404, description = "Video not found")
    ),
    security(("jwt" = [])),
    tag = "videos"
)]
pub async fn delete_video(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<ApiResponse<Empty>, AppError> {
    state.videos.delete(&id, &user.id).await?;
    Ok(ApiResponse::ok(Empty {}))
}

#[utoipa::path(
    put,
    path = "/api/videos/{id}/like",
    params(("id" = String, Path, description = "Video id")),
    responses(
        (status = 200, description = "Like toggled", body = LikeToggle),
        (status = 404, description = "Video not found")
    ),
    security(("jwt" = [])),
    tag = "videos"
)]
pub async fn like_video(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<ApiResponse<LikeToggle>, AppError> {
    let toggle = state.videos.toggle_like(&id, &user.id).await?;
    Ok(ApiResponse::ok(toggle))
}

#[utoipa::path(
    post,
    path = "/api/videos/{id}/comments",
    params(("id" = String, Path, description = "Video id")),
    request_body = CommentRequest,
    responses(
        (status = 201, description = "All comments, newest first", body = [CommentResponse]),
        (status = 400, description = "Empty comment"),
        (status = 404, description = "Video not found")
    ),
    security(("jwt" = [])),
    tag = "videos"
)]
pub async fn add_comment(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<CommentRequest>,
) -> Result<ApiResponse<Vec<CommentResponse>>, AppError> {
    let text = payload.text.unwrap_or_default();
    let comments = state.videos.add_comment(&id, &user, &text).await?;
    Ok(ApiResponse::created(comments))
}

#[utoipa::path(
    delete,
    path = "/api/videos/{id}/comments/{comment_id}",
    params(
        ("id" = String, Path, description = "Video id"),
        ("comment_id" = String, Path, description = "Comment id")
    ),
    responses(
        (status = 200, description = "Remaining comments", body = [CommentResponse]),
        (status = 401, description = "Neither author nor video owner"),
        (status = 404, description = "Video or comment not found")
    ),
    security(("jwt" = [])),
    tag = "videos"
)]
pub async fn delete_comment(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Path((id, comment_id)): Path<(String, String)>,
) -> Result<ApiResponse<Vec<CommentResponse>>, AppError> {
    let comments = state
        .videos
        .delete_comment(&id, &comment_id, &user.id)
        .await?;
    Ok(ApiResponse::ok(comments))
}

#[utoipa::path(
    get,
    path = "/api/videos/upload-signature",
    params(SignatureQuery),
    responses(
        (status = 200, description = "Signed direct-upload parameters", body = UploadSignature),
        (status = 401, description = "Unauthorized")
    ),
    security(("jwt" = [])),
    tag = "videos"
)]
pub async fn upload_signature(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<SignatureQuery>,
) -> Result<ApiResponse<UploadSignature>, AppError> {
    let signature = state
        .media
        .upload_signature(query.token, query.expire)
        .await?;
    Ok(ApiResponse::ok(signature))
}
