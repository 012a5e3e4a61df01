use crate::AppState;
use crate::api::error::AppError;
use crate::api::extract::ApiJson;
use crate::api::middleware::auth::AuthUser;
use crate::api::response::{ApiResponse, Empty};
use crate::entities::{prelude::*, users};
use crate::services::media_host::UploadRequest;
use crate::services::video_service::VideoResponse;
use crate::utils::auth::{LONG_SESSION_DAYS, SHORT_SESSION_DAYS};
use crate::utils::cookies::{logout_cookie, token_cookie};
use crate::utils::validation::{avatar_initial, decode_media_payload, normalize_username};
use axum::{
    Extension,
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Duration, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, SqlErr,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

pub const AVATAR_FOLDER: &str = "/avatars";
pub const SUGGESTED_USERS_LIMIT: u64 = 5;

/// Fields returned alongside a freshly issued token.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub id: String,
    pub username: String,
    pub display_name: String,
    pub email: String,
    pub avatar_url: Option<String>,
    pub avatar_initial: String,
}

impl From<&users::Model> for AccountResponse {
    fn from(user: &users::Model) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            display_name: user.display_name.clone(),
            email: user.email.clone(),
            avatar_url: user.avatar_url.clone(),
            avatar_initial: user.avatar_initial.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthPayload {
    pub token: String,
    pub user: AccountResponse,
}

/// Profile as anyone may see it.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublicProfile {
    pub id: String,
    pub username: String,
    pub display_name: String,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub avatar_url: Option<String>,
    pub avatar_initial: String,
    pub followers: i64,
    pub following: i64,
    pub is_pro: bool,
    pub category: String,
    pub created_at: DateTime<Utc>,
}

impl From<&users::Model> for PublicProfile {
    fn from(user: &users::Model) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            display_name: user.display_name.clone(),
            bio: user.bio.clone(),
            location: user.location.clone(),
            website: user.website.clone(),
            avatar_url: user.avatar_url.clone(),
            avatar_initial: user.avatar_initial.clone(),
            followers: user.followers,
            following: user.following,
            is_pro: user.is_pro,
            category: user.category.clone(),
            created_at: user.created_at,
        }
    }
}

/// Profile as its owner sees it.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PrivateProfile {
    #[serde(flatten)]
    pub profile: PublicProfile,
    pub email: String,
}

impl From<&users::Model> for PrivateProfile {
    fn from(user: &users::Model) -> Self {
        Self {
            profile: user.into(),
            email: user.email.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SuggestedUser {
    pub id: String,
    pub username: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub avatar_initial: String,
    pub followers: i64,
    pub is_pro: bool,
}

impl From<users::Model> for SuggestedUser {
    fn from(user: users::Model) -> Self {
        Self {
            id: user.id,
            username: user.username,
            display_name: user.display_name,
            avatar_url: user.avatar_url,
            avatar_initial: user.avatar_initial,
            followers: user.followers,
            is_pro: user.is_pro,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 30, message = "Username must be 1-30 characters"))]
    pub username: Option<String>,
    #[validate(length(min = 1, max = 50, message = "Display name must be 1-50 characters"))]
    pub display_name: Option<String>,
    #[validate(email(message = "Please provide a valid email"))]
    pub email: Option<String>,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    /// 30-day session instead of 1 day
    #[serde(default)]
    pub remember_me: bool,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 50, message = "Display name must be 1-50 characters"))]
    pub display_name: Option<String>,
    #[validate(length(max = 200, message = "Bio cannot be more than 200 characters"))]
    pub bio: Option<String>,
    #[validate(length(max = 100))]
    pub location: Option<String>,
    #[validate(length(max = 200))]
    pub website: Option<String>,
    #[validate(length(max = 50))]
    pub category: Option<String>,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AvatarRequest {
    /// Base64 image or data URL
    pub avatar: Option<String>,
}

/// Trimmed, non-empty value of an optional field.
pub(crate) fn required(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn duplicate_as_bad_request(e: DbErr) -> AppError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            AppError::BadRequest("User already exists".to_string())
        }
        _ => AppError::Database(e),
    }
}

/// Issues a token, sets the session cookie and wraps both in the envelope.
fn session_response(
    state: &AppState,
    user: &users::Model,
    days: i64,
    created: bool,
) -> Result<Response, AppError> {
    let ttl = Duration::days(days);
    let token = user.issue_token(&state.config.jwt_secret, ttl)?;
    let cookie = token_cookie(&token, ttl, state.config.is_production());

    let payload = AuthPayload {
        token,
        user: user.into(),
    };
    let body = if created {
        ApiResponse::created(payload)
    } else {
        ApiResponse::ok(payload)
    };

    Ok(([(header::SET_COOKIE, cookie)], body).into_response())
}

async fn find_by_username(state: &AppState, raw: &str) -> Result<users::Model, AppError> {
    Users::find()
        .filter(users::Column::Username.eq(normalize_username(raw)))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

#[utoipa::path(
    post,
    path = "/api/users/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = AuthPayload),
        (status = 400, description = "Missing fields or user already exists")
    ),
    tag = "users"
)]
pub async fn register(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RegisterRequest>,
) -> Result<Response, AppError> {
    let (Some(username), Some(display_name), Some(email), Some(password)) = (
        required(&payload.username),
        required(&payload.display_name),
        required(&payload.email),
        payload.password.clone().filter(|p| !p.is_empty()),
    ) else {
        return Err(AppError::BadRequest(
            "Please provide username, displayName, email and password".to_string(),
        ));
    };
    payload.validate()?;

    let username = normalize_username(&username);
    let email = email.to_lowercase();

    let existing = Users::find()
        .filter(
            Condition::any()
                .add(users::Column::Username.eq(&username))
                .add(users::Column::Email.eq(&email)),
        )
        .one(&state.db)
        .await?;
    if existing.is_some() {
        return Err(AppError::BadRequest("User already exists".to_string()));
    }

    let user = users::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        username: Set(username.clone()),
        avatar_initial: Set(avatar_initial(&display_name, &username)),
        display_name: Set(display_name),
        email: Set(email),
        // Hashed by the before_save hook
        password: Set(password),
        bio: Set(None),
        location: Set(None),
        website: Set(None),
        avatar_url: Set(None),
        followers: Set(0),
        following: Set(0),
        is_pro: Set(false),
        category: Set(String::new()),
        created_at: Set(Utc::now()),
    }
    .insert(&state.db)
    .await
    .map_err(duplicate_as_bad_request)?;

    info!("👤 Registered {}", user.username);

    session_response(&state, &user, LONG_SESSION_DAYS, true)
}

#[utoipa::path(
    post,
    path = "/api/users/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = AuthPayload),
        (status = 400, description = "Missing email or password"),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "users"
)]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<Response, AppError> {
    let (Some(email), Some(password)) = (
        required(&payload.email),
        payload.password.clone().filter(|p| !p.is_empty()),
    ) else {
        return Err(AppError::BadRequest(
            "Please provide an email and password".to_string(),
        ));
    };

    let user = Users::find()
        .filter(users::Column::Email.eq(email.to_lowercase()))
        .one(&state.db)
        .await?;

    // Same answer for unknown email and wrong password
    let user = match user {
        Some(user) if user.verify_password(&password) => user,
        _ => return Err(AppError::Unauthorized("Invalid credentials".to_string())),
    };

    let days = if payload.remember_me {
        LONG_SESSION_DAYS
    } else {
        SHORT_SESSION_DAYS
    };

    info!("🔑 {} logged in", user.username);
    session_response(&state, &user, days, false)
}

#[utoipa::path(
    get,
    path = "/api/users/logout",
    responses((status = 200, description = "Session cookie cleared", body = Empty)),
    tag = "users"
)]
pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::SET_COOKIE, logout_cookie(state.config.is_production()))],
        ApiResponse::ok(Empty {}),
    )
}

#[utoipa::path(
    get,
    path = "/api/users/me",
    responses(
        (status = 200, description = "Current user", body = PrivateProfile),
        (status = 401, description = "Unauthorized")
    ),
    security(("jwt" = [])),
    tag = "users"
)]
pub async fn get_me(Extension(AuthUser(user)): Extension<AuthUser>) -> ApiResponse<PrivateProfile> {
    ApiResponse::ok(PrivateProfile::from(&user))
}

#[utoipa::path(
    put,
    path = "/api/users/me",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = PrivateProfile),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Unauthorized")
    ),
    security(("jwt" = [])),
    tag = "users"
)]
pub async fn update_me(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    ApiJson(payload): ApiJson<UpdateProfileRequest>,
) -> Result<ApiResponse<PrivateProfile>, AppError> {
    payload.validate()?;

    let mut active: users::ActiveModel = user.clone().into();

    if let Some(display_name) = required(&payload.display_name) {
        active.avatar_initial = Set(avatar_initial(&display_name, &user.username));
        active.display_name = Set(display_name);
    }
    if let Some(bio) = payload.bio {
        active.bio = Set(Some(bio));
    }
    if let Some(location) = payload.location {
        active.location = Set(Some(location));
    }
    if let Some(website) = payload.website {
        active.website = Set(Some(website));
    }
    if let Some(category) = payload.category {
        active.category = Set(category);
    }
    if let Some(password) = payload.password.filter(|p| !p.is_empty()) {
        active.password = Set(password);
    }

    if !active.is_changed() {
        return Ok(ApiResponse::ok(PrivateProfile::from(&user)));
    }

    let updated = active.update(&state.db).await?;
    Ok(ApiResponse::ok(PrivateProfile::from(&updated)))
}

#[utoipa::path(
    post,
    path = "/api/users/avatar",
    request_body = AvatarRequest,
    responses(
        (status = 200, description = "Avatar uploaded", body = PublicProfile),
        (status = 400, description = "Missing or malformed image"),
        (status = 401, description = "Unauthorized")
    ),
    security(("jwt" = [])),
    tag = "users"
)]
pub async fn upload_avatar(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    ApiJson(payload): ApiJson<AvatarRequest>,
) -> Result<ApiResponse<PublicProfile>, AppError> {
    let avatar = required(&payload.avatar)
        .ok_or_else(|| AppError::BadRequest("Please upload an image".to_string()))?;
    let source = decode_media_payload(&avatar).map_err(|e| AppError::BadRequest(e.message))?;

    let uploaded = state
        .media
        .upload(UploadRequest {
            source,
            folder: AVATAR_FOLDER.to_string(),
            file_name: format!("avatar-{}", user.id),
        })
        .await?;

    let mut active: users::ActiveModel = user.into();
    active.avatar_url = Set(Some(uploaded.url));
    let updated = active.update(&state.db).await?;

    Ok(ApiResponse::ok(PublicProfile::from(&updated)))
}

#[utoipa::path(
    get,
    path = "/api/users/{username}",
    params(("username" = String, Path, description = "Handle, with or without the leading @")),
    responses(
        (status = 200, description = "Public profile", body = PublicProfile),
        (status = 404, description = "User not found")
    ),
    tag = "users"
)]
pub async fn get_user_by_username(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<ApiResponse<PublicProfile>, AppError> {
    let user = find_by_username(&state, &username).await?;
    Ok(ApiResponse::ok(PublicProfile::from(&user)))
}

#[utoipa::path(
    get,
    path = "/api/users/{username}/videos",
    params(("username" = String, Path, description = "Handle, with or without the leading @")),
    responses(
        (status = 200, description = "Public videos uploaded by the user", body = [VideoResponse]),
        (status = 404, description = "User not found")
    ),
    tag = "users"
)]
pub async fn get_user_videos(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<ApiResponse<Vec<VideoResponse>>, AppError> {
    let user = find_by_username(&state, &username).await?;
    let videos = state.videos.by_user(&user.id).await?;
    Ok(ApiResponse::list(videos))
}

#[utoipa::path(
    get,
    path = "/api/users/{username}/liked-videos",
    params(("username" = String, Path, description = "Handle, with or without the leading @")),
    responses(
        (status = 200, description = "Public videos the user liked", body = [VideoResponse]),
        (status = 404, description = "User not found")
    ),
    tag = "users"
)]
pub async fn get_user_liked_videos(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<ApiResponse<Vec<VideoResponse>>, AppError> {
    let user = find_by_username(&state, &username).await?;
    let videos = state.videos.liked_by(&user.id).await?;
    Ok(ApiResponse::list(videos))
}

#[utoipa::path(
    get,
    path = "/api/users/suggested",
    responses((status = 200, description = "Most followed users", body = [SuggestedUser])),
    tag = "users"
)]
pub async fn get_suggested_users(
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<SuggestedUser>>, AppError> {
    let users = Users::find()
        .order_by_desc(users::Column::Followers)
        .order_by_asc(users::Column::CreatedAt)
        .limit(SUGGESTED_USERS_LIMIT)
        .all(&state.db)
        .await?
        .into_iter()
        .map(SuggestedUser::from)
        .collect();

    Ok(ApiResponse::list(users))
}
